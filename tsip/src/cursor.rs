use byteorder::{BigEndian, ByteOrder};
use num_traits::Zero;

use crate::{constants::MAX_FRAME_LEN, error::CursorError};

/// A fixed-capacity byte store with a write index (`fill`) and a read index
/// (`drain`), used to hold exactly one de-stuffed TSIP frame while it is decoded.
///
/// All multi-byte reads are big-endian, the fixed wire order of TSIP.
///
/// Two read APIs are offered:
/// - `get_*` never fails: a read past the filled bytes returns zero and leaves a
///   sticky [`CursorError::BufferUnderflow`] that can be polled with [`ByteCursor::error`].
///   The message decoders use these.
/// - `try_get_*` returns a `Result` and leaves the cursor untouched on failure.
///
/// The capacity is chosen at construction and never changes.
#[derive(Debug, Clone)]
pub struct ByteCursor {
    storage: Box<[u8]>,
    fill: usize,
    drain: usize,
    withheld: usize,
    error: Option<CursorError>,
    underflowed: bool,
    busy: bool,
}

impl Default for ByteCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteCursor {
    /// Creates an empty cursor of [`MAX_FRAME_LEN`] bytes.
    pub fn new() -> Self {
        Self::with_capacity(MAX_FRAME_LEN)
    }

    /// Creates an empty cursor. A zero capacity is rounded up to one byte.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: vec![0; capacity.max(1)].into_boxed_slice(),
            fill: 0,
            drain: 0,
            withheld: 0,
            error: None,
            underflowed: false,
            busy: false,
        }
    }

    /// Creates a cursor large enough for `frame` and fills it.
    pub fn from_frame(frame: &[u8]) -> Self {
        let mut cursor = Self::with_capacity(MAX_FRAME_LEN.max(frame.len() + 1));
        cursor.put_buffer(frame);
        cursor
    }

    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Appends one byte. The write index wraps modulo the capacity, which
    /// flags [`CursorError::BufferOverflow`]; the storage never grows.
    pub fn put(&mut self, byte: u8) {
        self.storage[self.fill] = byte;
        self.fill += 1;
        if self.fill == self.storage.len() {
            self.fill = 0;
            self.set_error(CursorError::BufferOverflow {
                capacity: self.storage.len(),
            });
        }
    }

    pub fn put_buffer(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.put(byte);
        }
    }

    /// Number of bytes still readable.
    pub fn remaining(&self) -> usize {
        self.fill
            .saturating_sub(self.withheld)
            .saturating_sub(self.drain)
    }

    /// Number of bytes read since the last reset.
    pub fn position(&self) -> usize {
        self.drain
    }

    /// Zeroes the storage and rewinds both indices. Also clears the sticky error.
    pub fn reset(&mut self) {
        self.storage.fill(0);
        self.fill = 0;
        self.drain = 0;
        self.withheld = 0;
        self.clear_error();
    }

    /// Peeks at the byte `index` positions past the read index without consuming it.
    pub fn char_at(&self, index: usize) -> Option<u8> {
        let at = self.drain.checked_add(index)?;
        if at < self.fill {
            Some(self.storage[at])
        } else {
            None
        }
    }

    /// Hides the last `count` filled bytes from every read until [`ByteCursor::release`].
    pub fn withhold(&mut self, count: usize) {
        self.withheld = count;
    }

    pub fn release(&mut self) {
        self.withheld = 0;
    }

    /// First error recorded since the last reset, if any.
    pub fn error(&self) -> Option<CursorError> {
        self.error
    }

    /// True when any zero-filled read or failed skip happened since the last
    /// reset, even if another error was recorded first.
    pub fn has_underflowed(&self) -> bool {
        self.underflowed
    }

    pub fn clear_error(&mut self) {
        self.error = None;
        self.underflowed = false;
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Marks the cursor as being decoded. Advisory only: nothing checks it
    /// before reading.
    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    /// Checks `drain <= fill < capacity`. A violation is recorded as
    /// [`CursorError::BufferCorrupted`], after which every read returns zero.
    pub fn is_consistent(&mut self) -> bool {
        if self.error == Some(CursorError::BufferCorrupted) {
            return false;
        }
        if self.fill < self.storage.len() && self.drain <= self.fill {
            true
        } else {
            self.error = Some(CursorError::BufferCorrupted);
            false
        }
    }

    /// Advances the read index by `count` if that many bytes remain. Otherwise
    /// records an underflow and leaves the position unchanged.
    pub fn skip(&mut self, count: usize) {
        if let Err(e) = self.try_skip(count) {
            self.set_error(e);
        }
    }

    pub fn try_skip(&mut self, count: usize) -> Result<(), CursorError> {
        self.check_available(count)?;
        self.drain += count;
        Ok(())
    }

    pub fn get_u8(&mut self) -> u8 {
        self.take(1, |b| b[0])
    }

    pub fn get_i16(&mut self) -> i16 {
        self.take(2, BigEndian::read_i16)
    }

    pub fn get_u16(&mut self) -> u16 {
        self.take(2, BigEndian::read_u16)
    }

    pub fn get_i32(&mut self) -> i32 {
        self.take(4, BigEndian::read_i32)
    }

    pub fn get_u32(&mut self) -> u32 {
        self.take(4, BigEndian::read_u32)
    }

    pub fn get_f32(&mut self) -> f32 {
        self.take(4, BigEndian::read_f32)
    }

    pub fn get_f64(&mut self) -> f64 {
        self.take(8, BigEndian::read_f64)
    }

    /// Reads `K` raw bytes, or `K` zeroes on underflow.
    pub fn get_bytes<const K: usize>(&mut self) -> [u8; K] {
        match self.try_get_bytes::<K>() {
            Ok(bytes) => bytes,
            Err(e) => {
                self.set_error(e);
                [0; K]
            },
        }
    }

    pub fn try_get_u8(&mut self) -> Result<u8, CursorError> {
        self.try_take(1, |b| b[0])
    }

    pub fn try_get_i16(&mut self) -> Result<i16, CursorError> {
        self.try_take(2, BigEndian::read_i16)
    }

    pub fn try_get_u16(&mut self) -> Result<u16, CursorError> {
        self.try_take(2, BigEndian::read_u16)
    }

    pub fn try_get_i32(&mut self) -> Result<i32, CursorError> {
        self.try_take(4, BigEndian::read_i32)
    }

    pub fn try_get_u32(&mut self) -> Result<u32, CursorError> {
        self.try_take(4, BigEndian::read_u32)
    }

    pub fn try_get_f32(&mut self) -> Result<f32, CursorError> {
        self.try_take(4, BigEndian::read_f32)
    }

    pub fn try_get_f64(&mut self) -> Result<f64, CursorError> {
        self.try_take(8, BigEndian::read_f64)
    }

    pub fn try_get_bytes<const K: usize>(&mut self) -> Result<[u8; K], CursorError> {
        self.try_take(K, |b| {
            let mut out = [0; K];
            out.copy_from_slice(b);
            out
        })
    }

    fn take<T: Zero>(&mut self, width: usize, read: impl FnOnce(&[u8]) -> T) -> T {
        match self.try_take(width, read) {
            Ok(value) => value,
            Err(e) => {
                self.set_error(e);
                T::zero()
            },
        }
    }

    fn try_take<T>(&mut self, width: usize, read: impl FnOnce(&[u8]) -> T) -> Result<T, CursorError> {
        self.check_available(width)?;
        let start = self.drain;
        self.drain += width;
        Ok(read(&self.storage[start..start + width]))
    }

    fn check_available(&mut self, width: usize) -> Result<(), CursorError> {
        if !self.is_consistent() {
            return Err(CursorError::BufferCorrupted);
        }
        let available = self.remaining();
        if available < width {
            return Err(CursorError::BufferUnderflow {
                wanted: width,
                available,
            });
        }
        Ok(())
    }

    // The first error sticks, except that corruption always wins.
    fn set_error(&mut self, error: CursorError) {
        if matches!(error, CursorError::BufferUnderflow { .. }) {
            self.underflowed = true;
        }
        if self.error.is_none() || error == CursorError::BufferCorrupted {
            self.error = Some(error);
        }
    }
}
