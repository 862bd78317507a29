//! Incremental reassembly of length-prefixed access units.
//!
//! Packet format:
//! - LENGTH (4 bytes): body length, little-endian `u32`
//! - BODY (LENGTH bytes): one H.264 access unit
//!
//! A [`PendingPacket`] holds the single unit currently being reassembled.
//! It is fed the transport's chunks one after another and reports how many
//! bytes of each chunk it took, so the caller can hand the remaining suffix
//! back in once the completed unit has been taken.

use alloc::vec::Vec;

/// Size of the length prefix in bytes
pub const HEADER_LEN: usize = 4;

/// Default upper bound for a declared access unit length (512 KiB)
pub const DEFAULT_MAX_ACCESS_UNIT_LEN: u32 = 512 * 1024;

/// Allocator for packet bodies
///
/// Returns an empty `Vec` with capacity for `len` bytes, or `None` if the
/// memory is not available. Boards with several memory regions can route
/// large bodies to external RAM this way.
pub type BodyAllocator = fn(len: usize) -> Option<Vec<u8>>;

/// Default [`BodyAllocator`]: fallible reservation on the global heap
pub fn heap_body(len: usize) -> Option<Vec<u8>> {
    let mut body = Vec::new();
    body.try_reserve_exact(len).ok()?;
    Some(body)
}

/// Errors that can occur while reassembling or encoding packets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketError {
    /// Declared length exceeds the configured maximum; framing is lost
    Oversized {
        /// Length announced by the header
        declared: u32,
        /// Configured maximum
        max: u32,
    },
    /// The body buffer could not be allocated
    OutOfMemory {
        /// Number of bytes requested
        requested: u32,
    },
    /// Output buffer too small for encoding
    BufferTooSmall,
}

/// Reassembly progress of a [`PendingPacket`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketState {
    /// Fewer than four length bytes have been read
    AwaitingHeader,
    /// Length known, body still incomplete
    AccumulatingBody,
    /// Body complete, ready to be taken
    Complete,
}

/// Body of one completed packet
///
/// Owned and immutable. Decoding takes it by value, so the same bytes can
/// never be handed to the decoder twice.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccessUnit {
    data: Vec<u8>,
}

impl AccessUnit {
    /// Wrap already-assembled bytes
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// The H.264 bitstream bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the unit carries no bytes
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Release the underlying buffer
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

impl AsRef<[u8]> for AccessUnit {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

/// The access unit currently under reconstruction
///
/// Invariants:
/// - `buffer` is `None` while fewer than [`HEADER_LEN`] header bytes are read
/// - bytes written never exceed the declared length
/// - only one packet is in flight; the next header is not parsed until the
///   completed body has been taken with [`PendingPacket::take`]
#[derive(Debug, Clone)]
pub struct PendingPacket {
    header: [u8; HEADER_LEN],
    header_read: usize,
    declared_len: u32,
    buffer: Option<Vec<u8>>,
    max_len: u32,
    allocate: BodyAllocator,
}

impl Default for PendingPacket {
    fn default() -> Self {
        Self::new()
    }
}

impl PendingPacket {
    /// Create an empty packet using [`DEFAULT_MAX_ACCESS_UNIT_LEN`]
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_ACCESS_UNIT_LEN)
    }

    /// Create an empty packet that rejects units longer than `max_len`
    pub fn with_max_len(max_len: u32) -> Self {
        Self {
            header: [0; HEADER_LEN],
            header_read: 0,
            declared_len: 0,
            buffer: None,
            max_len,
            allocate: heap_body,
        }
    }

    /// Use `allocate` for body buffers instead of [`heap_body`]
    pub fn with_allocator(mut self, allocate: BodyAllocator) -> Self {
        self.allocate = allocate;
        self
    }

    /// Discard any partial header or body
    pub fn reset(&mut self) {
        self.header_read = 0;
        self.declared_len = 0;
        self.buffer = None;
    }

    /// Number of length-prefix bytes consumed so far (0-4)
    pub fn header_bytes_read(&self) -> usize {
        self.header_read
    }

    fn header_complete(&self) -> bool {
        self.header_read == HEADER_LEN
    }

    /// Declared body length, once the header is complete
    pub fn declared_len(&self) -> Option<u32> {
        self.header_complete().then_some(self.declared_len)
    }

    /// Body bytes copied so far
    pub fn bytes_written(&self) -> u32 {
        self.buffer.as_ref().map_or(0, |b| b.len() as u32)
    }

    /// Whether a body buffer is currently held
    pub fn has_buffer(&self) -> bool {
        self.buffer.is_some()
    }

    /// Maximum accepted body length
    pub fn max_len(&self) -> u32 {
        self.max_len
    }

    /// Current reassembly progress
    pub fn state(&self) -> PacketState {
        if !self.header_complete() {
            PacketState::AwaitingHeader
        } else if self.is_complete() {
            PacketState::Complete
        } else {
            PacketState::AccumulatingBody
        }
    }

    /// Whether the body is complete
    ///
    /// A declared length of zero is complete as soon as the header is read.
    pub fn is_complete(&self) -> bool {
        self.header_complete() && self.bytes_written() >= self.declared_len
    }

    /// Feed a chunk of stream bytes
    ///
    /// Returns the number of bytes consumed from `chunk` (header bytes plus
    /// body bytes). Fewer than `chunk.len()` bytes are consumed only when the
    /// packet completes inside the chunk; the caller takes the unit and feeds
    /// the remaining suffix again. A completed packet consumes nothing until
    /// it has been taken.
    ///
    /// On [`PacketError::Oversized`] or [`PacketError::OutOfMemory`] the
    /// packet is reset to the empty state before returning.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<usize, PacketError> {
        let mut offset = 0;

        if self.buffer.is_none() {
            let start = self.header_read;
            let take = (HEADER_LEN - start).min(chunk.len());
            self.header[start..start + take].copy_from_slice(&chunk[..take]);
            self.header_read += take;
            offset = take;
            if !self.header_complete() {
                return Ok(offset);
            }

            self.declared_len = u32::from_le_bytes(self.header);
            self.buffer = Some(self.allocate_body()?);
        }

        let declared = self.declared_len as usize;
        let Some(buffer) = self.buffer.as_mut() else {
            return Ok(offset);
        };
        let to_copy = (chunk.len() - offset).min(declared - buffer.len());
        buffer.extend_from_slice(&chunk[offset..offset + to_copy]);

        Ok(offset + to_copy)
    }

    /// Take the completed body and reset to the empty state
    ///
    /// Returns `None` if the packet is not complete yet.
    pub fn take(&mut self) -> Option<AccessUnit> {
        if !self.is_complete() {
            return None;
        }
        let data = self.buffer.take().unwrap_or_default();
        self.reset();
        Some(AccessUnit::new(data))
    }

    fn allocate_body(&mut self) -> Result<Vec<u8>, PacketError> {
        let declared = self.declared_len;
        if declared > self.max_len {
            self.reset();
            return Err(PacketError::Oversized {
                declared,
                max: self.max_len,
            });
        }

        if declared == 0 {
            return Ok(Vec::new());
        }
        match (self.allocate)(declared as usize) {
            Some(body) => Ok(body),
            None => {
                self.reset();
                Err(PacketError::OutOfMemory {
                    requested: declared,
                })
            }
        }
    }
}
