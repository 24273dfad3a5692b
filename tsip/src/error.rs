use thiserror::Error;

/// Sticky error state of a [`ByteCursor`](crate::ByteCursor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CursorError {
    /// A read asked for more bytes than the cursor holds
    #[error("buffer underflow, wanted {wanted} bytes but {available} remain")]
    BufferUnderflow { wanted: usize, available: usize },

    /// A write wrapped around the fixed capacity
    #[error("buffer overflow, write wrapped past capacity {capacity}")]
    BufferOverflow { capacity: usize },

    /// The fill/drain indices no longer describe valid storage
    #[error("buffer corrupted")]
    BufferCorrupted,
}

/// Errors returned by the message dispatcher. Each one means the frame was
/// discarded without touching any output entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("frame too small ({len} bytes after the message id)")]
    FrameTooSmall { len: usize },

    #[error("frame of {len} bytes does not fit a cursor of capacity {capacity}")]
    FrameTooLarge { len: usize, capacity: usize },

    #[error("unknown message id 0x{id:02x}")]
    UnknownMessageId { id: u8, previous: Option<u8> },

    /// The cursor already held an error when it was handed over.
    #[error("cursor not decodable: {0}")]
    Cursor(CursorError),
}

/// Errors raised while removing DLE stuffing from the raw byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FramingError {
    #[error("frame exceeds {max} bytes")]
    FrameTooLong { max: usize },

    #[error("unexpected byte 0x{0:02x} after DLE")]
    UnexpectedByteAfterDle(u8),

    #[error("frame is truncated")]
    Truncated,
}

/// Insert refused by a table configured with [`OverflowPolicy::Reject`](crate::OverflowPolicy::Reject).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("table full (capacity {capacity})")]
    Full { capacity: usize },
}

/// A decoded value fell outside its documented range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[error("field {field} of {message} out of bounds")]
pub struct FieldOutOfBounds {
    pub message: &'static str,
    pub field: &'static str,
}
