//! Header field representation and storage.
//!
//! This module holds what the wire parser produces and the forwarding layer
//! consumes:
//!
//! - [`Token`]: classification of well-known header names
//! - [`HeaderField`]: one borrowed name/value pair with its sensitivity flag
//! - [`FieldStore`]: the ordered, arena-backed collection of fields of one
//!   request or response, built in one shot or incrementally
//!
//! # Example
//!
//! ```
//! use micro_downstream::arena::Arena;
//! use micro_downstream::field::{FieldStore, Token};
//!
//! let mut arena = Arena::new(16, 16);
//! let mut fs = FieldStore::with_arena(&mut arena);
//!
//! // a name split across two reads
//! fs.begin_header_name(b"user-").unwrap();
//! fs.append_to_open_name(b"agent").unwrap();
//! fs.append_to_open_value(b"curl/8.5.0").unwrap();
//! fs.finish_open_header_lookup();
//!
//! fs.add_complete_header(b"cookie", b"sid=1", true, Some(Token::Cookie)).unwrap();
//!
//! let ua = fs.lookup_by_token(Token::UserAgent).unwrap();
//! assert_eq!(ua.value, b"curl/8.5.0");
//! assert_eq!(fs.all_fields().count(), 2);
//! ```

mod token;
pub use token::Token;

mod header_field;
pub use header_field::HeaderField;

mod field_store;
pub use field_store::FieldStore;
pub use field_store::FieldStoreLimits;
pub use field_store::Fields;
pub use field_store::MAX_HEADER_BYTES;
pub use field_store::MAX_HEADER_NUM;
