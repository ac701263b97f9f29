//! Block arena backing header field bytes.
//!
//! Header names and values are copied once into an [`Arena`] while they are
//! received and then referenced through [`Span`]s. A span is an index triple
//! (block, offset, length) rather than a pointer, so moving an allocation to a
//! bigger block while it is still being extended only replaces the span held by
//! the caller; nothing can dangle.
//!
//! # Allocation strategy
//!
//! - Small allocations are bumped into the current shared block of
//!   `block_size` bytes. A new shared block is started when the current one is
//!   full.
//! - Allocations of at least `isolation_threshold` bytes get a dedicated block
//!   of exactly that size and never become the current block.
//! - [`Arena::extend`] grows a span in place when it is the last thing written
//!   into its block and the block has spare room. Otherwise the existing bytes
//!   and the new bytes are copied together into fresh space. A relocated span
//!   of at least `isolation_threshold` bytes gets a dedicated block with room
//!   for twice its current length, so a value that arrives one byte at a time
//!   costs capacity linear in its final length.
//!
//! Blocks are only ever filled up to the capacity they were created with, so
//! the bytes behind a span are never moved by the underlying `Vec`.

use std::ops::Range;

use tracing::{trace, warn};

use crate::ensure;
use crate::error::HeaderError;

/// Default size of a shared arena block
pub const DEFAULT_BLOCK_SIZE: usize = 1024;

/// Default size at or above which an allocation gets its own block
pub const DEFAULT_ISOLATION_THRESHOLD: usize = 1024;

/// Sizing and limits for an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Capacity of each shared block
    pub block_size: usize,
    /// Allocations of at least this many bytes are placed in a dedicated block
    pub isolation_threshold: usize,
    /// Upper bound on the total capacity of all blocks, `None` for unbounded
    pub max_bytes: Option<usize>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self { block_size: DEFAULT_BLOCK_SIZE, isolation_threshold: DEFAULT_ISOLATION_THRESHOLD, max_bytes: None }
    }
}

/// A view into bytes owned by an [`Arena`].
///
/// Spans are only meaningful for the arena that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    block: usize,
    offset: usize,
    len: usize,
}

impl Span {
    /// The empty span. Resolves to `&[]` in every arena.
    pub const EMPTY: Span = Span { block: 0, offset: 0, len: 0 };

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    fn end(&self) -> usize {
        self.offset + self.len
    }

    #[inline]
    fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }
}

/// Bump allocator over a list of owned byte blocks.
#[derive(Debug, Default)]
pub struct Arena {
    config: ArenaConfig,
    blocks: Vec<Vec<u8>>,
    /// index of the shared block small allocations are bumped into
    current: Option<usize>,
    /// sum of the capacities of all blocks
    allocated: usize,
}

impl Arena {
    /// Creates an arena with the given shared block size and isolation threshold.
    pub fn new(block_size: usize, isolation_threshold: usize) -> Self {
        Self::with_config(ArenaConfig { block_size, isolation_threshold, max_bytes: None })
    }

    /// Creates an arena from a full [`ArenaConfig`].
    pub fn with_config(config: ArenaConfig) -> Self {
        Self { config, blocks: Vec::new(), current: None, allocated: 0 }
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Total capacity of all blocks allocated so far.
    pub fn allocated(&self) -> usize {
        self.allocated
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Copies `bytes` into the arena and returns the span covering them.
    ///
    /// # Errors
    ///
    /// Returns an allocation error if a new block is needed and either the
    /// configured `max_bytes` would be exceeded or the allocator refuses. The
    /// arena is left unchanged in that case.
    pub fn alloc(&mut self, bytes: &[u8]) -> Result<Span, HeaderError> {
        if bytes.is_empty() {
            return Ok(Span::EMPTY);
        }

        let block = self.reserve(bytes.len())?;
        let buf = &mut self.blocks[block];
        let offset = buf.len();
        buf.extend_from_slice(bytes);

        Ok(Span { block, offset, len: bytes.len() })
    }

    /// Appends `more` to the bytes addressed by `span` and returns the span of
    /// the combined content.
    ///
    /// The returned span may address a different block than `span`. The old
    /// span still resolves to the old bytes, but callers must continue with the
    /// returned one.
    ///
    /// # Errors
    ///
    /// Same as [`Arena::alloc`]. On error `span` is still valid and its content
    /// is untouched.
    pub fn extend(&mut self, span: Span, more: &[u8]) -> Result<Span, HeaderError> {
        if more.is_empty() {
            return Ok(span);
        }
        if span.is_empty() {
            return self.alloc(more);
        }

        let new_len = span.len + more.len();

        // grow in place when this span is the tail of its block
        let buf = &mut self.blocks[span.block];
        if span.end() == buf.len() && buf.capacity() - buf.len() >= more.len() {
            buf.extend_from_slice(more);
            return Ok(Span { len: new_len, ..span });
        }

        let block = if new_len >= self.config.isolation_threshold {
            self.new_isolated_block(new_len, span.len.saturating_mul(2))?
        } else {
            self.reserve(new_len)?
        };
        trace!(from_block = span.block, to_block = block, new_len, "relocating arena allocation");

        let offset = self.blocks[block].len();
        self.copy_into(span, block);
        self.blocks[block].extend_from_slice(more);

        Ok(Span { block, offset, len: new_len })
    }

    /// Resolves a span to its bytes.
    ///
    /// # Panics
    ///
    /// Panics if `span` was produced by a different arena and does not fit
    /// inside this one.
    #[inline]
    pub fn get(&self, span: Span) -> &[u8] {
        if span.is_empty() {
            return &[];
        }
        &self.blocks[span.block][span.range()]
    }

    /// Returns the index of a block that has room for `size` more bytes.
    fn reserve(&mut self, size: usize) -> Result<usize, HeaderError> {
        if size >= self.config.isolation_threshold {
            return self.new_block(size);
        }

        if let Some(current) = self.current {
            let buf = &self.blocks[current];
            if buf.capacity() - buf.len() >= size {
                return Ok(current);
            }
        }

        let block = self.new_block(self.config.block_size.max(size))?;
        self.current = Some(block);
        Ok(block)
    }

    /// Starts a dedicated block for `len` bytes, with `preferred` capacity if
    /// the limit allows it.
    fn new_isolated_block(&mut self, len: usize, preferred: usize) -> Result<usize, HeaderError> {
        if preferred > len && self.fits(preferred) {
            return self.new_block(preferred);
        }
        self.new_block(len)
    }

    fn fits(&self, capacity: usize) -> bool {
        self.config.max_bytes.is_none_or(|max_bytes| self.allocated.checked_add(capacity).is_some_and(|total| total <= max_bytes))
    }

    fn new_block(&mut self, capacity: usize) -> Result<usize, HeaderError> {
        if let Some(max_bytes) = self.config.max_bytes {
            let fits = self.fits(capacity);
            if !fits {
                warn!(requested = capacity, allocated = self.allocated, max_bytes, "arena limit reached");
            }
            ensure!(fits, HeaderError::exhausted(capacity, self.allocated, max_bytes));
        }

        let mut buf = Vec::new();
        buf.try_reserve_exact(capacity).map_err(|e| HeaderError::out_of_memory(capacity, e))?;
        self.allocated += capacity;
        self.blocks.push(buf);

        trace!(capacity, blocks = self.blocks.len(), "allocated arena block");
        Ok(self.blocks.len() - 1)
    }

    /// Copies the bytes of `span` to the end of block `dst`, which must have room.
    fn copy_into(&mut self, span: Span, dst: usize) {
        if span.block == dst {
            self.blocks[dst].extend_from_within(span.range());
            return;
        }

        let (src_buf, dst_buf) = if span.block < dst {
            let (head, tail) = self.blocks.split_at_mut(dst);
            (&head[span.block], &mut tail[0])
        } else {
            let (head, tail) = self.blocks.split_at_mut(span.block);
            (&tail[0], &mut head[dst])
        };
        dst_buf.extend_from_slice(&src_buf[span.range()]);
    }
}
