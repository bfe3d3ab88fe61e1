//! Per-connection accumulation buffer.
//!
//! [`AccumulationBuffer`] holds bytes received from the transport that have
//! not yet been parsed into frames. It keeps an independent read cursor over
//! a growable [`BytesMut`] region whose length is the write cursor:
//!
//! ```text
//! 0            read_cursor          write_cursor        capacity
//! |-- consumed --|---- unconsumed ----|------ free ------|
//! ```
//!
//! Bytes before the read cursor are reclaimable. [`compact`] moves the
//! unconsumed region to the front once free trailing capacity drops below
//! [`COMPACT_LOW_WATER_MARK`], and [`clear`] rewinds both cursors once
//! everything has been consumed. Neither reorders or drops unconsumed bytes.
//!
//! [`compact`]: AccumulationBuffer::compact
//! [`clear`]: AccumulationBuffer::clear

use bytes::{Bytes, BytesMut};
use thiserror::Error;

use crate::byte_order::read_le_u32;

/// Free trailing capacity below which [`AccumulationBuffer::compact`]
/// reclaims consumed bytes.
pub const COMPACT_LOW_WATER_MARK: usize = 10_000;

/// Initial storage reserved for a new connection.
pub const DEFAULT_BUFFER_CAPACITY: usize = 64 * 1024;

/// Errors raised when a read asks for more bytes than are buffered.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum BufferError {
    /// Not enough unconsumed bytes to satisfy the read.
    #[error("buffer underflow: requested {requested} bytes, {available} available")]
    Underflow {
        /// Bytes the caller asked for.
        requested: usize,
        /// Unconsumed bytes present.
        available: usize,
    },
}

/// Append-only byte region with read/write cursors and mark/reset.
///
/// # Examples
///
/// ```
/// use streamframe::buffer::AccumulationBuffer;
///
/// let mut buf = AccumulationBuffer::new();
/// buf.extend_from_slice(&[5, 0, 0, 0, 0xAA]);
/// buf.mark();
/// assert_eq!(buf.read_u32_le(), Ok(5));
/// assert_eq!(buf.readable_bytes(), 1);
/// assert!(buf.reset());
/// assert_eq!(buf.readable_bytes(), 5);
/// ```
#[derive(Debug)]
pub struct AccumulationBuffer {
    storage: BytesMut,
    read_cursor: usize,
    marked_cursor: Option<usize>,
}

impl AccumulationBuffer {
    /// Create a buffer with [`DEFAULT_BUFFER_CAPACITY`] bytes reserved.
    #[must_use]
    pub fn new() -> Self { Self::with_capacity(DEFAULT_BUFFER_CAPACITY) }

    /// Create a buffer with `capacity` bytes reserved.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: BytesMut::with_capacity(capacity),
            read_cursor: 0,
            marked_cursor: None,
        }
    }

    /// Number of unconsumed bytes.
    #[must_use]
    pub fn readable_bytes(&self) -> usize { self.write_cursor() - self.read_cursor }

    /// Returns `true` when no unconsumed bytes remain.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.readable_bytes() == 0 }

    /// Position of the next byte to read.
    #[must_use]
    pub const fn read_cursor(&self) -> usize { self.read_cursor }

    /// Position at which the next arrival is appended.
    #[must_use]
    pub fn write_cursor(&self) -> usize { self.storage.len() }

    /// Total storage currently allocated.
    #[must_use]
    pub fn capacity(&self) -> usize { self.storage.capacity() }

    /// Free bytes after the write cursor.
    #[must_use]
    pub fn free_capacity(&self) -> usize { self.capacity() - self.write_cursor() }

    /// Append newly received bytes at the write cursor, growing storage as
    /// needed.
    pub fn extend_from_slice(&mut self, bytes: &[u8]) { self.storage.extend_from_slice(bytes); }

    /// Snapshot the read cursor so a partial read can be undone.
    pub fn mark(&mut self) { self.marked_cursor = Some(self.read_cursor); }

    /// Restore the read cursor saved by [`mark`](Self::mark).
    ///
    /// Returns `false` without moving anything if no mark is set.
    pub fn reset(&mut self) -> bool {
        match self.marked_cursor.take() {
            Some(mark) => {
                self.read_cursor = mark;
                true
            }
            None => false,
        }
    }

    /// Consume four bytes as a little-endian `u32`.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Underflow`] if fewer than four bytes are
    /// readable; the cursor does not move.
    pub fn read_u32_le(&mut self) -> Result<u32, BufferError> {
        let bytes = self.read_array::<4>()?;
        Ok(read_le_u32(bytes))
    }

    /// Consume exactly `N` bytes into an array.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Underflow`] if fewer than `N` bytes are
    /// readable; the cursor does not move.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], BufferError> {
        let start = self.claim(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.storage[start..start + N]);
        Ok(out)
    }

    /// Consume exactly `n` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Underflow`] if fewer than `n` bytes are
    /// readable; the cursor does not move.
    pub fn read_exact(&mut self, n: usize) -> Result<Bytes, BufferError> {
        let start = self.claim(n)?;
        Ok(Bytes::copy_from_slice(&self.storage[start..start + n]))
    }

    /// Unconsumed bytes, without moving the cursor.
    #[must_use]
    pub fn unconsumed(&self) -> &[u8] { &self.storage[self.read_cursor..] }

    /// Reclaim consumed bytes when free trailing capacity is running low.
    ///
    /// Unconsumed bytes move to the front of storage and the cursors are
    /// rebased. A mark that pointed into the consumed region is dropped.
    /// Returns `true` if bytes were moved.
    pub fn compact(&mut self) -> bool {
        if self.read_cursor == 0 || self.free_capacity() >= COMPACT_LOW_WATER_MARK {
            return false;
        }
        let shift = self.read_cursor;
        let remaining = self.readable_bytes();
        self.storage.copy_within(shift.., 0);
        self.storage.truncate(remaining);
        self.read_cursor = 0;
        self.marked_cursor = self
            .marked_cursor
            .and_then(|mark| mark.checked_sub(shift));
        tracing::trace!(shift, remaining, "accumulation buffer compacted");
        true
    }

    /// Rewind both cursors to zero once everything has been consumed.
    ///
    /// Storage capacity is retained. Returns `false` and leaves the buffer
    /// untouched if unconsumed bytes remain.
    pub fn clear(&mut self) -> bool {
        if !self.is_empty() {
            return false;
        }
        self.discard_all();
        true
    }

    /// Drop every buffered byte, consumed or not.
    pub fn discard_all(&mut self) {
        self.storage.clear();
        self.read_cursor = 0;
        self.marked_cursor = None;
    }

    /// Advance the read cursor by `n`, returning where the read starts.
    fn claim(&mut self, n: usize) -> Result<usize, BufferError> {
        let available = self.readable_bytes();
        if available < n {
            return Err(BufferError::Underflow {
                requested: n,
                available,
            });
        }
        let start = self.read_cursor;
        self.read_cursor += n;
        Ok(start)
    }
}

impl Default for AccumulationBuffer {
    fn default() -> Self { Self::new() }
}
