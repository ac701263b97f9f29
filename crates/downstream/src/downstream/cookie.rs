//! Cookie header crumbling and assembly.
//!
//! Clients may send any number of `cookie` fields, each holding one or more
//! `;`-separated cookie pairs. What the backend receives depends on its
//! protocol:
//!
//! - HTTP/2 backends get one `cookie` field per pair ("crumbs", see
//!   [RFC 9113 Section 8.2.3](https://www.rfc-editor.org/rfc/rfc9113#section-8.2.3)),
//!   which lets HPACK index each pair on its own.
//! - HTTP/1 backends get a single `cookie` header with every pair joined by
//!   `"; "`, since many of them do not accept repeated cookie headers.

use std::borrow::Borrow;

use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

use crate::arena::Arena;
use crate::field::{FieldStore, HeaderField, Token};

/// Separator placed between joined cookie values
const COOKIE_SEPARATOR: &[u8] = b"; ";

/// Cookies prepared for one backend protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieOutput<'a> {
    /// One field per cookie pair
    Crumbs(Vec<HeaderField<'a>>),
    /// The value of a single `cookie` header, empty if there were no cookies
    Assembled(Bytes),
}

/// Splits `value` on `;`, drops at most one leading space of each segment and
/// skips segments left empty.
fn crumbs(value: &[u8]) -> impl Iterator<Item = &[u8]> {
    value.split(|b| *b == b';').map(|segment| segment.strip_prefix(b" ").unwrap_or(segment)).filter(|segment| !segment.is_empty())
}

/// Splits every `cookie` field of `fs` into one field per cookie pair.
///
/// Crumbs keep the order of their source fields and, within a field, their
/// left to right order. Each crumb inherits the sensitivity of the field it
/// came from.
pub fn crumble<A: Borrow<Arena>>(fs: &FieldStore<A>) -> Vec<HeaderField<'_>> {
    let mut nva = Vec::with_capacity(count_crumbs(fs));

    for field in fs.fields_by_token(Token::Cookie) {
        for crumb in crumbs(field.value) {
            nva.push(HeaderField::with_token(Token::Cookie.as_bytes(), crumb, field.sensitive, Some(Token::Cookie)));
        }
    }

    trace!(crumbs = nva.len(), "crumbled request cookie");
    nva
}

/// Number of fields [`crumble`] emits for `fs`, computed without building them.
pub fn count_crumbs<A: Borrow<Arena>>(fs: &FieldStore<A>) -> usize {
    fs.fields_by_token(Token::Cookie).map(|field| crumbs(field.value).count()).sum()
}

/// Strips the trailing run of `;` and space bytes.
fn trim_cookie_tail(value: &[u8]) -> &[u8] {
    let end = value.iter().rposition(|b| *b != b';' && *b != b' ').map_or(0, |last| last + 1);
    &value[..end]
}

/// Joins every `cookie` field of `fs` into a single header value.
///
/// Trailing `;` and spaces are removed from each field before joining with
/// `"; "`, and fields left empty are skipped, so
/// `["alpha", "bravo;", "charlie; ", "delta;;"]` becomes
/// `"alpha; bravo; charlie; delta"`.
pub fn assemble<A: Borrow<Arena>>(fs: &FieldStore<A>) -> Bytes {
    let len = fs.fields_by_token(Token::Cookie).map(|field| field.value.len() + COOKIE_SEPARATOR.len()).sum();
    let mut buf = BytesMut::with_capacity(len);

    for value in fs.fields_by_token(Token::Cookie).map(|field| trim_cookie_tail(field.value)) {
        if value.is_empty() {
            continue;
        }
        if !buf.is_empty() {
            buf.put_slice(COOKIE_SEPARATOR);
        }
        buf.put_slice(value);
    }

    buf.freeze()
}
