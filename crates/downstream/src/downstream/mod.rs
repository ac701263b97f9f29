//! Per-request forwarding state and the header transforms applied to it.
//!
//! A [`Downstream`] owns the request and response field stores of one
//! forwarded request. The transforms read those stores and never modify the
//! fields they were given, except for the Location rewrite which replaces one
//! response value:
//!
//! - [`cookie`]: crumbling cookies for HTTP/2 backends, assembling them for HTTP/1
//! - [`location`]: rewriting redirects that point at the backend itself
//! - [`affinity`]: decoding the session affinity cookie for load balancing
//! - [`version`]: whether a client can receive interim responses
//!
//! The free functions are usable on any [`FieldStore`](crate::field::FieldStore);
//! [`Downstream`] exposes them bound to its own request and response.

pub mod affinity;
pub mod cookie;
pub mod location;
pub mod version;

mod connection;
pub use connection::BackendConnection;
pub use connection::BackendProtocol;

mod request;
pub use request::DownstreamRequest;

mod response;
pub use response::DownstreamResponse;

mod state;
pub use state::Downstream;
pub use state::DownstreamConfig;

pub use affinity::find_affinity;
pub use cookie::{CookieOutput, assemble, count_crumbs, crumble};
pub use location::rewrite_location_uri;
pub use version::supports_non_final;
