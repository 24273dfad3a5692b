//! DLE framing and de-stuffing.
//!
//! On the wire a TSIP message is `DLE <id> <payload> DLE ETX`, with every
//! literal DLE inside the id/payload doubled. The [`Deframer`] turns the raw
//! byte stream into de-stuffed [`Frame`]s, which are what the dispatcher
//! decodes. [`stuff`] is the inverse, used to build test captures.

use log::{debug, trace};

use crate::{
    constants::{DLE, ETX, FRAME_TRAILER_LEN, MAX_FRAME_LEN},
    error::FramingError,
};

/// One de-stuffed message: `[id][payload][DLE][ETX]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Vec<u8>,
}

impl Frame {
    /// Builds the de-stuffed frame for `id` and `payload`.
    pub fn new(id: u8, payload: &[u8]) -> Self {
        let mut bytes = Vec::with_capacity(payload.len() + 1 + FRAME_TRAILER_LEN);
        bytes.push(id);
        bytes.extend_from_slice(payload);
        bytes.extend_from_slice(&[DLE, ETX]);
        Self { bytes }
    }

    pub fn id(&self) -> u8 {
        self.bytes[0]
    }

    pub fn payload(&self) -> &[u8] {
        &self.bytes[1..self.bytes.len() - FRAME_TRAILER_LEN]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Encodes `id` and `payload` into wire bytes, doubling every DLE.
pub fn stuff(id: u8, payload: &[u8]) -> Vec<u8> {
    let mut wire = Vec::with_capacity(2 * payload.len() + 5);
    wire.push(DLE);
    for &byte in core::iter::once(&id).chain(payload) {
        wire.push(byte);
        if byte == DLE {
            wire.push(DLE);
        }
    }
    wire.extend_from_slice(&[DLE, ETX]);
    wire
}

/// De-stuffs a single complete wire frame. Bytes after the first frame are ignored.
pub fn unstuff(wire: &[u8]) -> Result<Frame, FramingError> {
    let mut deframer = Deframer::new();
    deframer
        .consume(wire)
        .next()
        .unwrap_or(Err(FramingError::Truncated))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Looking for the DLE that opens a frame
    Idle,
    /// Saw the opening DLE, next byte is the message id
    Start,
    Body,
    /// Saw a DLE inside a frame
    Escape,
}

/// Streaming de-stuffer. Bytes between frames are discarded.
///
/// ```
/// use tsip::{framing::stuff, Deframer};
///
/// let mut deframer = Deframer::new();
/// let wire = stuff(0x4d, &[0x10, 0x00, 0x00, 0x00]);
/// let frames: Vec<_> = deframer.consume(&wire).collect();
/// assert_eq!(frames.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Deframer {
    state: State,
    buf: Vec<u8>,
    max_len: usize,
    discarded: usize,
}

impl Default for Deframer {
    fn default() -> Self {
        Self::new()
    }
}

impl Deframer {
    /// Accepts frames that fit a default [`ByteCursor`](crate::ByteCursor),
    /// which keeps one slot free.
    pub fn new() -> Self {
        Self::with_max_len(MAX_FRAME_LEN - 1)
    }

    /// Frames longer than `max_len` de-stuffed bytes are dropped with
    /// [`FramingError::FrameTooLong`].
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            state: State::Idle,
            buf: Vec::with_capacity(max_len),
            max_len,
            discarded: 0,
        }
    }

    pub fn is_buffer_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn buffer_len(&self) -> usize {
        self.buf.len()
    }

    /// Bytes seen outside any frame so far.
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// Feeds `data` and returns an iterator over the frames it completes.
    /// A partial frame at the end is kept for the next call.
    pub fn consume<'a>(&'a mut self, data: &'a [u8]) -> FrameIter<'a> {
        FrameIter {
            deframer: self,
            data,
            offset: 0,
        }
    }

    /// Feeds one byte.
    pub fn push(&mut self, byte: u8) -> Option<Result<Frame, FramingError>> {
        match self.state {
            State::Idle => {
                if byte == DLE {
                    self.state = State::Start;
                } else {
                    self.discarded += 1;
                    trace!("discarding 0x{byte:02x} outside of a frame");
                }
                None
            },
            State::Start => {
                match byte {
                    // repeated sync bytes
                    DLE => {},
                    // tail of a frame we joined late
                    ETX => self.state = State::Idle,
                    id => {
                        self.buf.clear();
                        self.buf.push(id);
                        self.state = State::Body;
                    },
                }
                None
            },
            State::Body => {
                if byte == DLE {
                    self.state = State::Escape;
                    None
                } else {
                    self.append(byte)
                }
            },
            State::Escape => match byte {
                DLE => {
                    self.state = State::Body;
                    self.append(DLE)
                },
                ETX => {
                    self.buf.extend_from_slice(&[DLE, ETX]);
                    self.state = State::Idle;
                    Some(Ok(Frame {
                        bytes: core::mem::take(&mut self.buf),
                    }))
                },
                other => {
                    // A lone DLE opens the next frame; the unfinished one is lost.
                    debug!(
                        "DLE followed by 0x{other:02x}, dropping {} buffered bytes",
                        self.buf.len()
                    );
                    self.buf.clear();
                    self.buf.push(other);
                    self.state = State::Body;
                    Some(Err(FramingError::UnexpectedByteAfterDle(other)))
                },
            },
        }
    }

    fn append(&mut self, byte: u8) -> Option<Result<Frame, FramingError>> {
        if self.buf.len() + FRAME_TRAILER_LEN >= self.max_len {
            debug!("frame exceeds {} bytes, dropping it", self.max_len);
            self.buf.clear();
            self.state = State::Idle;
            return Some(Err(FramingError::FrameTooLong { max: self.max_len }));
        }
        self.buf.push(byte);
        None
    }
}

/// Iterator returned by [`Deframer::consume`].
pub struct FrameIter<'a> {
    deframer: &'a mut Deframer,
    data: &'a [u8],
    offset: usize,
}

impl Iterator for FrameIter<'_> {
    type Item = Result<Frame, FramingError>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.offset < self.data.len() {
            let byte = self.data[self.offset];
            self.offset += 1;
            if let Some(result) = self.deframer.push(byte) {
                return Some(result);
            }
        }
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn stuff_doubles_dle() {
        assert_eq!(
            stuff(0x4d, &[0x10, 0x01]),
            vec![DLE, 0x4d, DLE, DLE, 0x01, DLE, ETX]
        );
    }

    #[test]
    fn unstuff_collapses_dle() {
        let frame = unstuff(&[DLE, 0x4d, DLE, DLE, 0x01, DLE, ETX]).unwrap();
        assert_eq!(frame.id(), 0x4d);
        assert_eq!(frame.payload(), &[0x10, 0x01]);
        assert_eq!(frame.as_bytes(), &[0x4d, 0x10, 0x01, DLE, ETX]);
    }

    #[test]
    fn unstuff_truncated() {
        assert_eq!(
            unstuff(&[DLE, 0x4d, 0x01, DLE]),
            Err(FramingError::Truncated)
        );
    }

    #[test]
    fn deframer_byte_by_byte() {
        let wire = stuff(0x41, &[0x10, 0x10, 0x20]);
        let mut deframer = Deframer::new();
        for b in wire.iter().take(wire.len() - 1) {
            assert!(deframer.push(*b).is_none());
        }
        let frame = deframer.push(ETX).unwrap().unwrap();
        assert_eq!(frame, Frame::new(0x41, &[0x10, 0x10, 0x20]));
        assert!(deframer.is_buffer_empty());
    }

    #[test]
    fn deframer_garbage_between_frames() {
        let mut data = vec![0xff, 0x03, 0x55];
        data.extend(stuff(0x4e, b"Y"));
        data.extend([0x00, 0x01]);
        data.extend(stuff(0x4d, &[0, 0, 0, 0]));
        let mut deframer = Deframer::new();
        let ids: Vec<u8> = deframer
            .consume(&data)
            .map(|f| f.unwrap().id())
            .collect();
        assert_eq!(ids, vec![0x4e, 0x4d]);
        assert_eq!(deframer.discarded(), 5);
    }

    #[test]
    fn deframer_frame_split_across_calls() {
        let wire = stuff(0x56, &[1, 2, 3, 4]);
        let mut deframer = Deframer::new();
        assert_eq!(deframer.consume(&wire[..3]).count(), 0);
        assert!(!deframer.is_buffer_empty());
        let frames: Vec<_> = deframer.consume(&wire[3..]).collect();
        assert_eq!(frames, vec![Ok(Frame::new(0x56, &[1, 2, 3, 4]))]);
    }

    #[test]
    fn deframer_skips_late_join_tail() {
        // DLE ETX from a frame we only saw the end of
        let mut data = vec![0x22, DLE, ETX];
        data.extend(stuff(0x4e, b"N"));
        let mut deframer = Deframer::new();
        let frames: Vec<_> = deframer.consume(&data).collect();
        assert_eq!(frames, vec![Ok(Frame::new(0x4e, b"N"))]);
    }

    #[test]
    fn deframer_unexpected_byte_after_dle() {
        let data = [DLE, 0x4e, DLE, 0x47, 0x00, DLE, ETX];
        let mut deframer = Deframer::new();
        let frames: Vec<_> = deframer.consume(&data).collect();
        assert_eq!(
            frames,
            vec![
                Err(FramingError::UnexpectedByteAfterDle(0x47)),
                Ok(Frame::new(0x47, &[0x00])),
            ]
        );
    }

    #[test]
    fn deframer_too_long() {
        let mut deframer = Deframer::with_max_len(8);
        let wire = stuff(0x58, &[0; 16]);
        let frames: Vec<_> = deframer.consume(&wire).collect();
        assert_eq!(frames, vec![Err(FramingError::FrameTooLong { max: 8 })]);
    }
}
