use std::collections::TryReserveError;
use thiserror::Error;

/// Errors raised while storing or rewriting header fields.
///
/// Every transform over a finished field store is total, so the only fallible
/// paths are the ones that need memory from an [`Arena`](crate::arena::Arena)
/// or that enforce the store limits.
#[derive(Error, Debug)]
pub enum HeaderError {
    #[error("arena exhausted, requested {requested} bytes with {allocated} of {max_bytes} already allocated")]
    Exhausted { requested: usize, allocated: usize, max_bytes: usize },

    #[error("arena allocation of {requested} bytes failed: {source}")]
    OutOfMemory {
        requested: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("header size too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeHeader { current_size: usize, max_size: usize },

    #[error("header number exceed the limit {max_num}")]
    TooManyFields { max_num: usize },

    #[error("no header field is open for append")]
    NoOpenField,

    #[error("no header field at index {index}")]
    NoSuchField { index: usize },

    #[error("invalid header: {reason}")]
    InvalidHeader { reason: String },
}

impl HeaderError {
    pub fn exhausted(requested: usize, allocated: usize, max_bytes: usize) -> Self {
        Self::Exhausted { requested, allocated, max_bytes }
    }

    pub fn out_of_memory(requested: usize, source: TryReserveError) -> Self {
        Self::OutOfMemory { requested, source }
    }

    pub fn too_large_header(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeHeader { current_size, max_size }
    }

    pub fn too_many_fields(max_num: usize) -> Self {
        Self::TooManyFields { max_num }
    }

    pub fn no_such_field(index: usize) -> Self {
        Self::NoSuchField { index }
    }

    pub fn invalid_header<S: ToString>(str: S) -> Self {
        Self::InvalidHeader { reason: str.to_string() }
    }

    /// Returns true if the error came from the arena running out of memory,
    /// either against its configured limit or the global allocator.
    pub fn is_allocation_failure(&self) -> bool {
        matches!(self, Self::Exhausted { .. } | Self::OutOfMemory { .. })
    }
}
