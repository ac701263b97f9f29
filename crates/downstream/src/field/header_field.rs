use http::{HeaderName, HeaderValue};

use crate::error::HeaderError;
use crate::field::Token;

/// One header name/value pair as seen by the forwarding layer.
///
/// The byte views borrow from the [`FieldStore`](crate::field::FieldStore) that
/// holds them, or are `'static` literals for names the transforms emit
/// themselves (such as `cookie`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderField<'a> {
    pub name: &'a [u8],
    pub value: &'a [u8],
    /// Must never be added to a compression index (HPACK "never indexed")
    pub sensitive: bool,
    pub token: Option<Token>,
}

impl<'a> HeaderField<'a> {
    /// Creates a non-sensitive field without a token.
    pub const fn new(name: &'a [u8], value: &'a [u8]) -> Self {
        Self { name, value, sensitive: false, token: None }
    }

    /// Creates a field with every attribute given.
    pub const fn with_token(name: &'a [u8], value: &'a [u8], sensitive: bool, token: Option<Token>) -> Self {
        Self { name, value, sensitive, token }
    }

    /// Returns true if the field is an HTTP/2 pseudo header like `:path`.
    pub fn is_pseudo(&self) -> bool {
        self.name.starts_with(b":")
    }

    /// Converts the field into `http` header types.
    ///
    /// The sensitivity flag is carried over with [`HeaderValue::set_sensitive`],
    /// which is what HTTP/2 encoders read to emit a never-indexed literal.
    ///
    /// # Errors
    ///
    /// Returns [`HeaderError::InvalidHeader`] if the name or value contains bytes
    /// the `http` crate rejects. Pseudo header names always fail.
    pub fn to_http(&self) -> Result<(HeaderName, HeaderValue), HeaderError> {
        let name = HeaderName::from_bytes(self.name).map_err(HeaderError::invalid_header)?;
        let mut value = HeaderValue::from_bytes(self.value).map_err(HeaderError::invalid_header)?;
        value.set_sensitive(self.sensitive);
        Ok((name, value))
    }
}
