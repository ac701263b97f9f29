//! Header handling core of an HTTP/1 and HTTP/2 reverse proxy
//!
//! This crate stores the header fields of a request or response while they are
//! being parsed and provides the transforms a proxy applies before forwarding
//! them. Bytes are copied once into a per-message arena and handed out as
//! borrowed slices afterwards.
//!
//! # Features
//!
//! - Block arena with isolated large allocations and in-place growth
//! - Field store that accepts names and values split across reads
//! - Header and trailer sections with size and count limits
//! - Cookie crumbling for HTTP/2 backends and assembly for HTTP/1 backends
//! - Location rewriting that hides the backend host from clients
//! - Session affinity cookie decoding
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use micro_downstream::downstream::Downstream;
//! use micro_downstream::field::Token;
//!
//! let mut downstream = Downstream::new();
//! downstream.set_request_downstream_host("backend.internal");
//!
//! let req = downstream.request_mut();
//! req.authority = Bytes::from_static(b"example.com");
//! req.fs.add_complete_header(b"cookie", b"sid=1; lb=0000002a", true, Some(Token::Cookie)).unwrap();
//!
//! assert_eq!(downstream.count_crumble_request_cookie(), 2);
//! assert_eq!(downstream.find_affinity_cookie(b"lb"), 42);
//!
//! let resp = downstream.response_mut();
//! resp.fs.add_complete_header(b"location", b"http://backend.internal/login", false, Some(Token::Location)).unwrap();
//!
//! downstream.rewrite_location_response_header(b"https").unwrap();
//! let location = downstream.response().fs.lookup_by_token(Token::Location).unwrap();
//! assert_eq!(location.value, b"https://example.com/login");
//! ```
//!
//! # Architecture
//!
//! The crate is organized into several key modules:
//!
//! - [`arena`]: Block storage for field bytes
//! - [`field`]: Field classification, representation and the field store
//! - [`downstream`]: Per-request state and the forwarding transforms
//! - [`error`]: The error type shared by every fallible operation
//!
//! # Error Handling
//!
//! Only operations that allocate or enforce limits can fail. They return
//! [`error::HeaderError`], which distinguishes arena exhaustion from limit
//! violations. A failed operation leaves the store as it was before the call.
//!
//! # Limitations
//!
//! - No wire parsing, HPACK or connection handling; callers feed already
//!   tokenized names and values
//! - Field stores are not shared across threads while being written

pub mod arena;
pub mod downstream;
pub mod error;
pub mod field;

mod utils;
pub(crate) use utils::ensure;
