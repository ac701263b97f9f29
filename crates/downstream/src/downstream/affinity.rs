//! Session affinity cookie extraction.
//!
//! With cookie based affinity the proxy sets a cookie whose value is the
//! backend identifier as 8 hex digits. On later requests the identifier is read
//! back here and handed to the load balancer, which pins the client to that
//! backend.

use std::borrow::Borrow;

use tracing::trace;

use crate::arena::Arena;
use crate::field::{FieldStore, Token};

/// Number of hex digits in an affinity token
const AFFINITY_TOKEN_LEN: usize = 8;

/// Decodes exactly 8 hex digits, either case, as a big-endian `u32`.
fn parse_affinity_token(value: &[u8]) -> Option<u32> {
    if value.len() != AFFINITY_TOKEN_LEN {
        return None;
    }
    value.iter().try_fold(0u32, |acc, b| char::from(*b).to_digit(16).map(|digit| (acc << 4) | digit))
}

/// Finds the cookie named `name` in the `cookie` fields of `fs` and decodes its
/// value as an affinity token.
///
/// Only the first cookie with that exact name counts. Returns 0 if there is no
/// such cookie or if its value is not 8 hex digits.
pub fn find_affinity<A: Borrow<Arena>>(fs: &FieldStore<A>, name: &[u8]) -> u32 {
    for field in fs.fields_by_token(Token::Cookie) {
        for crumb in field.value.split(|b| *b == b';') {
            let start = crumb.iter().position(|b| *b != b' ' && *b != b'\t').unwrap_or(crumb.len());
            let crumb = &crumb[start..];

            let Some(eq) = crumb.iter().position(|b| *b == b'=') else {
                continue;
            };
            if &crumb[..eq] != name {
                continue;
            }

            let affinity = parse_affinity_token(&crumb[eq + 1..]).unwrap_or(0);
            trace!(affinity, "found affinity cookie");
            return affinity;
        }
    }
    0
}
