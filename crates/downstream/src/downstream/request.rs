//! Request half of a [`Downstream`](crate::downstream::Downstream).

use bytes::Bytes;
use http::Version;

use crate::arena::Arena;
use crate::downstream::DownstreamConfig;
use crate::field::FieldStore;

/// The client request being forwarded.
///
/// Scalars are filled in by the frontend parser next to the header fields.
/// `authority` and `scheme` are what the client sees and are what Location
/// rewriting substitutes back in.
#[derive(Debug)]
pub struct DownstreamRequest {
    pub fs: FieldStore,
    /// Scheme the client used, `https` or `http`
    pub scheme: Bytes,
    /// Client visible authority, `host[:port]`
    pub authority: Bytes,
    pub http_major: u8,
    pub http_minor: u8,
}

impl DownstreamRequest {
    pub(crate) fn new(config: &DownstreamConfig) -> Self {
        Self {
            fs: FieldStore::with_limits(Arena::with_config(config.arena), config.limits),
            scheme: Bytes::new(),
            authority: Bytes::new(),
            http_major: 1,
            http_minor: 1,
        }
    }

    /// The request version as an `http` type, `None` for versions it has no constant for.
    pub fn version(&self) -> Option<Version> {
        to_version(self.http_major, self.http_minor)
    }

    pub fn set_version(&mut self, version: Version) {
        (self.http_major, self.http_minor) = from_version(version);
    }
}

pub(crate) fn to_version(major: u8, minor: u8) -> Option<Version> {
    match (major, minor) {
        (0, 9) => Some(Version::HTTP_09),
        (1, 0) => Some(Version::HTTP_10),
        (1, 1) => Some(Version::HTTP_11),
        (2, 0) => Some(Version::HTTP_2),
        (3, 0) => Some(Version::HTTP_3),
        _ => None,
    }
}

pub(crate) fn from_version(version: Version) -> (u8, u8) {
    match version {
        Version::HTTP_09 => (0, 9),
        Version::HTTP_10 => (1, 0),
        Version::HTTP_2 => (2, 0),
        Version::HTTP_3 => (3, 0),
        _ => (1, 1),
    }
}
