//! Ordered, append-only header field storage backed by an [`Arena`].
//!
//! A [`FieldStore`] is filled by the wire parser in one of two ways:
//!
//! - [`FieldStore::add_complete_header`] when the whole field is known at once,
//!   as with HPACK/QPACK decoded fields;
//! - [`FieldStore::begin_header_name`] followed by any number of
//!   [`FieldStore::append_to_open_name`] / [`FieldStore::append_to_open_value`]
//!   calls when the field arrives in pieces, as with an HTTP/1 callback parser
//!   fed one socket read at a time.
//!
//! Fields are kept in arrival order and are never removed or reordered. Header
//! fields and trailer fields are stored in separate sections.

use std::borrow::{Borrow, BorrowMut};
use std::iter::FusedIterator;
use std::slice;

use http::HeaderMap;
use tracing::trace;

use crate::arena::{Arena, Span};
use crate::ensure;
use crate::error::HeaderError;
use crate::field::{HeaderField, Token};

/// Maximum number of header and trailer fields a store accepts by default
pub const MAX_HEADER_NUM: usize = 100;

/// Maximum number of name and value bytes a store accepts by default
pub const MAX_HEADER_BYTES: usize = 64 * 1024;

/// Limits enforced while fields are added to a [`FieldStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldStoreLimits {
    /// Maximum number of fields, headers and trailers together
    pub max_fields: usize,
    /// Maximum of [`FieldStore::buffer_size`]
    pub max_buffer_size: usize,
}

impl Default for FieldStoreLimits {
    fn default() -> Self {
        Self { max_fields: MAX_HEADER_NUM, max_buffer_size: MAX_HEADER_BYTES }
    }
}

#[derive(Debug, Clone, Copy)]
struct StoredField {
    name: Span,
    value: Span,
    sensitive: bool,
    token: Option<Token>,
}

impl StoredField {
    #[inline]
    fn resolve(self, arena: &Arena) -> HeaderField<'_> {
        HeaderField { name: arena.get(self.name), value: arena.get(self.value), sensitive: self.sensitive, token: self.token }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Headers,
    Trailers,
}

#[derive(Debug, Clone, Copy)]
enum Part {
    Name,
    Value,
}

/// Ordered collection of header fields whose bytes live in one [`Arena`].
///
/// The arena is held through `A`, so a store can either own its arena
/// (`FieldStore<Arena>`, the default) or borrow one (`FieldStore<&mut Arena>`)
/// that outlives it.
#[derive(Debug)]
pub struct FieldStore<A = Arena> {
    arena: A,
    headers: Vec<StoredField>,
    trailers: Vec<StoredField>,
    /// section whose last field is open for incremental append
    open: Option<Section>,
    header_key_prev: bool,
    buffer_size: usize,
    limits: FieldStoreLimits,
}

impl Default for FieldStore<Arena> {
    fn default() -> Self {
        Self::with_arena(Arena::default())
    }
}

impl FieldStore<Arena> {
    /// Creates a store owning an arena with default sizing.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<A: Borrow<Arena>> FieldStore<A> {
    /// Creates a store over `arena` with the default limits.
    pub fn with_arena(arena: A) -> Self {
        Self::with_limits(arena, FieldStoreLimits::default())
    }

    pub fn with_limits(arena: A, limits: FieldStoreLimits) -> Self {
        Self {
            arena,
            headers: Vec::new(),
            trailers: Vec::new(),
            open: None,
            header_key_prev: false,
            buffer_size: 0,
            limits,
        }
    }

    pub fn arena(&self) -> &Arena {
        self.arena.borrow()
    }

    pub fn limits(&self) -> &FieldStoreLimits {
        &self.limits
    }

    /// Number of header fields, trailers excluded.
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Number of header and trailer fields.
    pub fn num_fields(&self) -> usize {
        self.headers.len() + self.trailers.len()
    }

    /// Total name and value bytes received so far, headers and trailers.
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Returns true if the most recent incremental append went to a field name.
    ///
    /// An HTTP/1 callback parser uses this to tell whether the next name
    /// fragment continues the open field or starts a new one.
    pub fn header_key_prev(&self) -> bool {
        self.header_key_prev
    }

    /// Returns true if a header or trailer field is open for incremental append.
    pub fn has_open_field(&self) -> bool {
        self.open.is_some()
    }

    /// All header fields, in insertion order.
    pub fn all_fields(&self) -> Fields<'_> {
        Fields { arena: self.arena(), inner: self.headers.iter() }
    }

    /// All trailer fields, in insertion order.
    pub fn trailers(&self) -> Fields<'_> {
        Fields { arena: self.arena(), inner: self.trailers.iter() }
    }

    /// Returns the header field at `index` in insertion order.
    pub fn get(&self, index: usize) -> Option<HeaderField<'_>> {
        self.headers.get(index).map(|field| field.resolve(self.arena()))
    }

    /// Returns the first header field classified as `token`.
    pub fn lookup_by_token(&self, token: Token) -> Option<HeaderField<'_>> {
        self.position_by_token(token).and_then(|index| self.get(index))
    }

    /// Returns the index of the first header field classified as `token`.
    pub fn position_by_token(&self, token: Token) -> Option<usize> {
        self.headers.iter().position(|field| field.token == Some(token))
    }

    /// Returns the first header field whose name equals `name` byte for byte.
    ///
    /// No case folding is done; names are expected to be lower-cased already.
    pub fn lookup_by_name(&self, name: &[u8]) -> Option<HeaderField<'_>> {
        self.all_fields().find(|field| field.name == name)
    }

    /// Header fields classified as `token`, in insertion order.
    pub fn fields_by_token(&self, token: Token) -> impl Iterator<Item = HeaderField<'_>> {
        self.all_fields().filter(move |field| field.token == Some(token))
    }

    /// Parses the first `content-length` field as a decimal number.
    ///
    /// Returns `None` when the field is absent, empty, not all digits or does
    /// not fit in a `u64`.
    pub fn content_length(&self) -> Option<u64> {
        let field = self.lookup_by_token(Token::ContentLength)?;
        parse_decimal(field.value)
    }

    /// Copies every header field into a [`HeaderMap`].
    ///
    /// Pseudo header fields are skipped since `http` keeps them in the request
    /// or response parts rather than in the map. Sensitive fields produce
    /// sensitive values.
    ///
    /// # Errors
    ///
    /// Returns [`HeaderError::InvalidHeader`] for the first field the `http`
    /// crate rejects.
    pub fn to_header_map(&self) -> Result<HeaderMap, HeaderError> {
        let mut map = HeaderMap::with_capacity(self.len());
        for field in self.all_fields().filter(|field| !field.is_pseudo()) {
            let (name, value) = field.to_http()?;
            map.append(name, value);
        }
        Ok(map)
    }

    fn check_limits(&self, new_fields: usize, new_bytes: usize) -> Result<(), HeaderError> {
        let max_fields = self.limits.max_fields;
        ensure!(self.num_fields() + new_fields <= max_fields, HeaderError::too_many_fields(max_fields));

        let size = self.buffer_size + new_bytes;
        let max_size = self.limits.max_buffer_size;
        ensure!(size <= max_size, HeaderError::too_large_header(size, max_size));
        Ok(())
    }
}

impl<A: BorrowMut<Arena>> FieldStore<A> {
    /// Starts a new header field named `name` with an empty value and leaves
    /// it open for [`append_to_open_name`](Self::append_to_open_name) and
    /// [`append_to_open_value`](Self::append_to_open_value).
    ///
    /// A field that is still open is closed as by
    /// [`finish_open_header_lookup`](Self::finish_open_header_lookup).
    ///
    /// # Errors
    ///
    /// Returns an error if a limit is exceeded or the arena is exhausted.
    pub fn begin_header_name(&mut self, name: &[u8]) -> Result<(), HeaderError> {
        self.begin_name(Section::Headers, name)
    }

    /// Extends the name of the open header field.
    ///
    /// # Errors
    ///
    /// Returns [`HeaderError::NoOpenField`] if no header field is open, or an
    /// error if a limit is exceeded or the arena is exhausted.
    pub fn append_to_open_name(&mut self, bytes: &[u8]) -> Result<(), HeaderError> {
        self.append(Section::Headers, Part::Name, bytes)
    }

    /// Extends the value of the open header field.
    ///
    /// # Errors
    ///
    /// Same as [`append_to_open_name`](Self::append_to_open_name).
    pub fn append_to_open_value(&mut self, bytes: &[u8]) -> Result<(), HeaderError> {
        self.append(Section::Headers, Part::Value, bytes)
    }

    /// Closes the open header or trailer field, classifying it as `token`.
    ///
    /// Does nothing when no field is open.
    pub fn finish_open_header(&mut self, token: Option<Token>) {
        let Some(section) = self.open.take() else {
            return;
        };
        if let Some(field) = self.section_mut(section).last_mut() {
            field.token = token;
        }
    }

    /// Closes the open field, classifying its complete name with [`Token::lookup`].
    pub fn finish_open_header_lookup(&mut self) {
        let Some(section) = self.open else {
            return;
        };
        let token = match section {
            Section::Headers => self.headers.last(),
            Section::Trailers => self.trailers.last(),
        }
        .and_then(|field| Token::lookup(self.arena().get(field.name)));
        self.finish_open_header(token);
    }

    /// Appends a complete header field in one step.
    ///
    /// Closes any field left open by the incremental API first, classifying it
    /// by its name.
    ///
    /// # Errors
    ///
    /// Returns an error if a limit is exceeded or the arena is exhausted. The
    /// store is unchanged in that case.
    pub fn add_complete_header(&mut self, name: &[u8], value: &[u8], sensitive: bool, token: Option<Token>) -> Result<(), HeaderError> {
        self.add_complete(Section::Headers, name, value, sensitive, token)
    }

    /// Trailer counterpart of [`begin_header_name`](Self::begin_header_name).
    ///
    /// # Errors
    ///
    /// Returns an error if a limit is exceeded or the arena is exhausted.
    pub fn begin_trailer_name(&mut self, name: &[u8]) -> Result<(), HeaderError> {
        self.begin_name(Section::Trailers, name)
    }

    /// # Errors
    ///
    /// Returns [`HeaderError::NoOpenField`] if no trailer field is open, or an
    /// error if a limit is exceeded or the arena is exhausted.
    pub fn append_to_open_trailer_name(&mut self, bytes: &[u8]) -> Result<(), HeaderError> {
        self.append(Section::Trailers, Part::Name, bytes)
    }

    /// # Errors
    ///
    /// Same as [`append_to_open_trailer_name`](Self::append_to_open_trailer_name).
    pub fn append_to_open_trailer_value(&mut self, bytes: &[u8]) -> Result<(), HeaderError> {
        self.append(Section::Trailers, Part::Value, bytes)
    }

    /// # Errors
    ///
    /// Returns an error if a limit is exceeded or the arena is exhausted.
    pub fn add_complete_trailer(&mut self, name: &[u8], value: &[u8], sensitive: bool, token: Option<Token>) -> Result<(), HeaderError> {
        self.add_complete(Section::Trailers, name, value, sensitive, token)
    }

    /// Replaces the value of the header field at `index`.
    ///
    /// The new value is copied into the store's arena. This does not count
    /// against the buffer size limit, which only covers received bytes.
    ///
    /// # Errors
    ///
    /// Returns [`HeaderError::NoSuchField`] if `index` is out of bounds, or an
    /// allocation error if the arena is exhausted. The old value is kept in
    /// both cases.
    pub fn set_header_value(&mut self, index: usize, value: &[u8]) -> Result<(), HeaderError> {
        ensure!(index < self.headers.len(), HeaderError::no_such_field(index));

        let span = self.arena_mut().alloc(value)?;
        self.headers[index].value = span;
        Ok(())
    }

    fn begin_name(&mut self, section: Section, name: &[u8]) -> Result<(), HeaderError> {
        self.check_limits(1, name.len())?;

        let span = self.arena_mut().alloc(name)?;
        self.finish_open_header_lookup();
        self.section_mut(section).push(StoredField { name: span, value: Span::EMPTY, sensitive: false, token: None });

        self.open = Some(section);
        self.header_key_prev = true;
        self.buffer_size += name.len();
        Ok(())
    }

    fn append(&mut self, section: Section, part: Part, bytes: &[u8]) -> Result<(), HeaderError> {
        ensure!(self.open == Some(section), HeaderError::NoOpenField);
        self.check_limits(0, bytes.len())?;

        let fields = match section {
            Section::Headers => &mut self.headers,
            Section::Trailers => &mut self.trailers,
        };
        let field = fields.last_mut().ok_or(HeaderError::NoOpenField)?;
        let span = match part {
            Part::Name => &mut field.name,
            Part::Value => &mut field.value,
        };
        let arena: &mut Arena = self.arena.borrow_mut();
        *span = arena.extend(*span, bytes)?;

        self.header_key_prev = matches!(part, Part::Name);
        self.buffer_size += bytes.len();
        Ok(())
    }

    fn add_complete(&mut self, section: Section, name: &[u8], value: &[u8], sensitive: bool, token: Option<Token>) -> Result<(), HeaderError> {
        self.check_limits(1, name.len() + value.len())?;

        let arena = self.arena_mut();
        let name_span = arena.alloc(name)?;
        let value_span = arena.alloc(value)?;

        self.finish_open_header_lookup();
        self.header_key_prev = false;
        self.section_mut(section).push(StoredField { name: name_span, value: value_span, sensitive, token });
        self.buffer_size += name.len() + value.len();

        trace!(name = ?String::from_utf8_lossy(name), ?token, "added header field");
        Ok(())
    }

    fn arena_mut(&mut self) -> &mut Arena {
        self.arena.borrow_mut()
    }

    fn section_mut(&mut self, section: Section) -> &mut Vec<StoredField> {
        match section {
            Section::Headers => &mut self.headers,
            Section::Trailers => &mut self.trailers,
        }
    }
}

/// Iterator over the fields of a [`FieldStore`] section.
#[derive(Debug, Clone)]
pub struct Fields<'a> {
    arena: &'a Arena,
    inner: slice::Iter<'a, StoredField>,
}

impl<'a> Iterator for Fields<'a> {
    type Item = HeaderField<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|field| field.resolve(self.arena))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Fields<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|field| field.resolve(self.arena))
    }
}

impl ExactSizeIterator for Fields<'_> {}

impl FusedIterator for Fields<'_> {}

fn parse_decimal(bytes: &[u8]) -> Option<u64> {
    if bytes.is_empty() {
        return None;
    }
    bytes.iter().try_fold(0u64, |acc, b| {
        if !b.is_ascii_digit() {
            return None;
        }
        acc.checked_mul(10)?.checked_add(u64::from(b - b'0'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::ArenaConfig;

    fn pairs<'a>(fields: impl Iterator<Item = HeaderField<'a>>) -> Vec<(&'a str, &'a str)> {
        fields.map(|field| (std::str::from_utf8(field.name).unwrap(), std::str::from_utf8(field.value).unwrap())).collect()
    }

    #[test]
    fn append_last_header() {
        let mut arena = Arena::new(16, 16);
        let mut fs = FieldStore::with_arena(&mut arena);

        fs.begin_header_name(b"alpha").unwrap();
        fs.append_to_open_name(b"BRAVO").unwrap();
        // enough to force a relocation
        fs.append_to_open_name(b"golF0123456789").unwrap();

        fs.append_to_open_value(b"Charlie").unwrap();
        fs.append_to_open_value(b"deltA").unwrap();
        // enough to force a relocation
        fs.append_to_open_value(b"echo0123456789").unwrap();

        fs.add_complete_header(b"echo", b"foxtrot", false, None).unwrap();

        assert_eq!(pairs(fs.all_fields()), vec![("alphaBRAVOgolF0123456789", "CharliedeltAecho0123456789"), ("echo", "foxtrot")]);
        assert!(!fs.has_open_field());
        assert_eq!(fs.buffer_size(), 24 + 26 + 4 + 7);
    }

    #[test]
    fn relocation_keeps_neighbours_intact() {
        let mut fs = FieldStore::with_arena(Arena::new(16, 64));

        fs.add_complete_header(b"a", b"1", false, None).unwrap();
        fs.begin_header_name(b"b").unwrap();
        for chunk in [&b"0123456789"[..], b"abcdefghij", b"ABCDEFGHIJ", b"!"] {
            fs.append_to_open_value(chunk).unwrap();
        }
        fs.finish_open_header(None);
        fs.add_complete_header(b"c", b"3", false, None).unwrap();

        assert_eq!(pairs(fs.all_fields()), vec![("a", "1"), ("b", "0123456789abcdefghijABCDEFGHIJ!"), ("c", "3")]);
        assert!(fs.arena().block_count() > 1);
    }

    #[test]
    fn lookup_header() {
        let mut fs = FieldStore::with_arena(Arena::new(16, 16));

        fs.add_complete_header(b"alpha", b"0", false, None).unwrap();
        fs.add_complete_header(b":authority", b"1", false, Some(Token::Authority)).unwrap();
        fs.add_complete_header(b"content-length", b"2", false, Some(Token::ContentLength)).unwrap();

        // by token
        assert_eq!(fs.lookup_by_token(Token::Authority), Some(HeaderField::with_token(b":authority", b"1", false, Some(Token::Authority))));
        assert_eq!(fs.lookup_by_token(Token::Method), None);

        // by name
        assert_eq!(fs.lookup_by_name(b"alpha"), Some(HeaderField::new(b"alpha", b"0")));
        assert_eq!(fs.lookup_by_name(b"bravo"), None);
        assert_eq!(fs.lookup_by_name(b"Alpha"), None);
    }

    #[test]
    fn lookup_returns_first_match() {
        let mut fs = FieldStore::new();

        fs.add_complete_header(b"cookie", b"a=1", false, Some(Token::Cookie)).unwrap();
        fs.add_complete_header(b"cookie", b"b=2", true, Some(Token::Cookie)).unwrap();

        assert_eq!(fs.lookup_by_token(Token::Cookie).map(|field| field.value), Some(&b"a=1"[..]));
        assert_eq!(fs.lookup_by_name(b"cookie").map(|field| field.value), Some(&b"a=1"[..]));
        assert_eq!(fs.fields_by_token(Token::Cookie).count(), 2);
        assert_eq!(fs.position_by_token(Token::Cookie), Some(0));
    }

    #[test]
    fn append_without_open_field() {
        let mut fs = FieldStore::new();

        assert!(matches!(fs.append_to_open_name(b"x"), Err(HeaderError::NoOpenField)));
        assert!(matches!(fs.append_to_open_value(b"x"), Err(HeaderError::NoOpenField)));

        fs.begin_header_name(b"x").unwrap();
        fs.add_complete_header(b"y", b"z", false, None).unwrap();
        // a one-shot field closes the open one
        assert!(matches!(fs.append_to_open_value(b"late"), Err(HeaderError::NoOpenField)));

        fs.begin_header_name(b"w").unwrap();
        // headers and trailers are opened separately
        assert!(matches!(fs.append_to_open_trailer_value(b"v"), Err(HeaderError::NoOpenField)));
    }

    #[test]
    fn begin_classifies_field_left_open() {
        let mut fs = FieldStore::new();

        fs.begin_header_name(b"cookie").unwrap();
        fs.append_to_open_value(b"lb=deadbeef").unwrap();
        fs.begin_header_name(b"host").unwrap();
        fs.append_to_open_value(b"example.com").unwrap();
        fs.finish_open_header_lookup();

        let tokens: Vec<_> = fs.all_fields().map(|field| field.token).collect();
        assert_eq!(tokens, vec![Some(Token::Cookie), Some(Token::Host)]);
        assert_eq!(crate::downstream::find_affinity(&fs, b"lb"), 0xdead_beef);
    }

    #[test]
    fn one_shot_add_classifies_field_left_open() {
        let mut fs = FieldStore::new();

        fs.begin_header_name(b"content-").unwrap();
        fs.append_to_open_name(b"length").unwrap();
        fs.append_to_open_value(b"42").unwrap();
        fs.add_complete_header(b"x-trace", b"1", false, None).unwrap();

        assert_eq!(fs.get(0).map(|field| field.token), Some(Some(Token::ContentLength)));
        assert_eq!(fs.content_length(), Some(42));
    }

    #[test]
    fn explicit_token_is_not_overridden() {
        let mut fs = FieldStore::new();

        fs.begin_header_name(b"cookie").unwrap();
        fs.append_to_open_value(b"a=1").unwrap();
        fs.finish_open_header(None);
        fs.begin_header_name(b"host").unwrap();

        assert_eq!(fs.get(0).map(|field| field.token), Some(None));
    }

    #[test]
    fn one_shot_add_resets_header_key_prev() {
        let mut fs = FieldStore::new();

        fs.begin_header_name(b"x-a").unwrap();
        assert!(fs.header_key_prev());
        fs.add_complete_header(b"x-b", b"2", false, None).unwrap();

        assert!(!fs.header_key_prev());
        assert!(!fs.has_open_field());
    }

    #[test]
    fn trickled_value_keeps_arena_linear() {
        let mut fs = FieldStore::new();

        fs.begin_header_name(b"x-big").unwrap();
        for _ in 0..16384 {
            fs.append_to_open_value(b"a").unwrap();
        }
        fs.finish_open_header_lookup();

        assert_eq!(fs.get(0).map(|field| field.value.len()), Some(16384));
        assert_eq!(fs.buffer_size(), 16389);
        assert!(fs.arena().allocated() <= 4 * 16384, "allocated {}", fs.arena().allocated());
        assert!(fs.arena().block_count() <= 8, "blocks {}", fs.arena().block_count());
    }

    #[test]
    fn header_key_prev_tracks_last_append() {
        let mut fs = FieldStore::new();

        fs.begin_header_name(b"con").unwrap();
        assert!(fs.header_key_prev());
        fs.append_to_open_name(b"tent-length").unwrap();
        assert!(fs.header_key_prev());
        fs.append_to_open_value(b"12").unwrap();
        assert!(!fs.header_key_prev());
        fs.finish_open_header_lookup();

        assert_eq!(fs.lookup_by_token(Token::ContentLength).map(|field| field.value), Some(&b"12"[..]));
        assert_eq!(fs.content_length(), Some(12));
    }

    #[test]
    fn trailers_are_kept_apart() {
        let mut fs = FieldStore::new();

        fs.add_complete_header(b"te", b"trailers", false, Some(Token::Te)).unwrap();
        fs.begin_trailer_name(b"grpc-").unwrap();
        fs.append_to_open_trailer_name(b"status").unwrap();
        fs.append_to_open_trailer_value(b"0").unwrap();
        fs.finish_open_header(None);
        fs.add_complete_trailer(b"x-checksum", b"abc", false, None).unwrap();

        assert_eq!(fs.len(), 1);
        assert_eq!(fs.num_fields(), 3);
        assert_eq!(pairs(fs.trailers()), vec![("grpc-status", "0"), ("x-checksum", "abc")]);
        assert_eq!(fs.lookup_by_name(b"grpc-status"), None);
    }

    #[test]
    fn too_many_fields() {
        let limits = FieldStoreLimits { max_fields: 2, ..FieldStoreLimits::default() };
        let mut fs = FieldStore::with_limits(Arena::default(), limits);

        fs.add_complete_header(b"a", b"1", false, None).unwrap();
        fs.add_complete_trailer(b"b", b"2", false, None).unwrap();

        assert!(matches!(fs.add_complete_header(b"c", b"3", false, None), Err(HeaderError::TooManyFields { max_num: 2 })));
        assert!(matches!(fs.begin_header_name(b"d"), Err(HeaderError::TooManyFields { max_num: 2 })));
        assert_eq!(fs.num_fields(), 2);
    }

    #[test]
    fn too_large_header() {
        let limits = FieldStoreLimits { max_buffer_size: 8, ..FieldStoreLimits::default() };
        let mut fs = FieldStore::with_limits(Arena::default(), limits);

        fs.begin_header_name(b"host").unwrap();
        fs.append_to_open_value(b"abcd").unwrap();

        let err = fs.append_to_open_value(b"e").unwrap_err();
        assert!(matches!(err, HeaderError::TooLargeHeader { current_size: 9, max_size: 8 }));
        assert_eq!(fs.get(0).map(|field| field.value), Some(&b"abcd"[..]));
    }

    #[test]
    fn arena_exhaustion_leaves_store_unchanged() {
        let config = ArenaConfig { block_size: 16, isolation_threshold: 16, max_bytes: Some(16) };
        let mut fs = FieldStore::with_arena(Arena::with_config(config));

        fs.begin_header_name(b"x-long").unwrap();
        // 6 bytes of the only permitted block are used, 11 more need a second one
        let err = fs.append_to_open_value(b"0123456789a").unwrap_err();

        assert!(err.is_allocation_failure());
        assert_eq!(pairs(fs.all_fields()), vec![("x-long", "")]);
        assert_eq!(fs.buffer_size(), 6);
        assert!(fs.has_open_field());
    }

    #[test]
    fn set_header_value_replaces_in_place() {
        let mut fs = FieldStore::new();

        fs.add_complete_header(b"location", b"http://a/", false, Some(Token::Location)).unwrap();
        fs.add_complete_header(b"server", b"x", false, Some(Token::Server)).unwrap();
        fs.set_header_value(0, b"https://b/").unwrap();

        assert_eq!(pairs(fs.all_fields()), vec![("location", "https://b/"), ("server", "x")]);
        assert_eq!(fs.lookup_by_token(Token::Location).map(|field| field.token), Some(Some(Token::Location)));
    }

    #[test]
    fn set_header_value_out_of_bounds() {
        let mut fs = FieldStore::new();
        fs.add_complete_header(b"server", b"x", false, Some(Token::Server)).unwrap();
        let allocated = fs.arena().allocated();

        let err = fs.set_header_value(1, &[b'v'; 4096]).unwrap_err();

        assert!(matches!(err, HeaderError::NoSuchField { index: 1 }));
        assert_eq!(fs.arena().allocated(), allocated);
        assert_eq!(pairs(fs.all_fields()), vec![("server", "x")]);
    }

    #[test]
    fn content_length_parsing() {
        for (value, expected) in [(&b"599"[..], Some(599)), (&b""[..], None), (&b"+5"[..], None), (&b"1 "[..], None), (&b"99999999999999999999"[..], None)] {
            let mut fs = FieldStore::new();
            fs.add_complete_header(b"content-length", value, false, Some(Token::ContentLength)).unwrap();
            assert_eq!(fs.content_length(), expected);
        }

        assert_eq!(FieldStore::new().content_length(), None);
    }

    #[test]
    fn header_map_conversion() {
        let mut fs = FieldStore::new();

        fs.add_complete_header(b":method", b"GET", false, Some(Token::Method)).unwrap();
        fs.add_complete_header(b"cookie", b"a=1", true, Some(Token::Cookie)).unwrap();
        fs.add_complete_header(b"cookie", b"b=2", false, Some(Token::Cookie)).unwrap();
        fs.add_complete_header(b"accept", b"*/*", false, None).unwrap();

        let map = fs.to_header_map().unwrap();

        assert_eq!(map.len(), 3);
        let cookies: Vec<_> = map.get_all(http::header::COOKIE).iter().collect();
        assert_eq!(cookies, vec!["a=1", "b=2"]);
        assert!(cookies[0].is_sensitive());
        assert!(!cookies[1].is_sensitive());
        assert_eq!(map.get(http::header::ACCEPT).unwrap(), "*/*");
    }
}
