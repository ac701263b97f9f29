//! Response half of a [`Downstream`](crate::downstream::Downstream).

use http::{StatusCode, Version};

use crate::arena::Arena;
use crate::downstream::DownstreamConfig;
use crate::downstream::request::{from_version, to_version};
use crate::field::FieldStore;

/// The backend response being forwarded back to the client.
#[derive(Debug)]
pub struct DownstreamResponse {
    pub fs: FieldStore,
    pub status: Option<StatusCode>,
    pub http_major: u8,
    pub http_minor: u8,
}

impl DownstreamResponse {
    pub(crate) fn new(config: &DownstreamConfig) -> Self {
        Self {
            fs: FieldStore::with_limits(Arena::with_config(config.arena), config.limits),
            status: None,
            http_major: 1,
            http_minor: 1,
        }
    }

    pub fn version(&self) -> Option<Version> {
        to_version(self.http_major, self.http_minor)
    }

    pub fn set_version(&mut self, version: Version) {
        (self.http_major, self.http_minor) = from_version(version);
    }

    /// Returns true for an interim 1xx response.
    pub fn is_non_final(&self) -> bool {
        self.status.is_some_and(|status| status.is_informational())
    }
}
