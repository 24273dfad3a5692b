use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use log::{debug, trace, warn};

use crate::{
    config::DecoderConfig,
    constants::{DLE, ETX, FRAME_TRAILER_LEN},
    cursor::ByteCursor,
    error::{CursorError, DecodeError, FieldOutOfBounds},
    packets::LASSEN_PACKETS,
    state::ReceiverState,
};

/// A message decoder: reads its payload from the cursor into the state and
/// returns the payload length it expected, which is only used for diagnostics.
pub type DecodeFn = fn(&mut ByteCursor, &mut ReceiverState, &mut DecodeContext) -> usize;

/// Registry entry for one message id.
#[derive(Debug, Clone, Copy)]
pub struct Entry {
    pub label: &'static str,
    pub decode: DecodeFn,
}

/// State carried from one dispatch call to the next.
#[derive(Debug, Clone)]
pub struct DecodeContext {
    config: DecoderConfig,
    last_id: Option<u8>,
    out_of_bounds: Option<FieldOutOfBounds>,
    now: DateTime<Utc>,
    clock: fn() -> DateTime<Utc>,
}

impl Default for DecodeContext {
    fn default() -> Self {
        Self::new(DecoderConfig::default())
    }
}

impl DecodeContext {
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            config,
            last_id: None,
            out_of_bounds: None,
            now: Utc::now(),
            clock: Utc::now,
        }
    }

    /// Replaces the wall clock sampled at the start of every decode.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self.now = clock();
        self
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Id of the last message decoded successfully.
    pub fn last_id(&self) -> Option<u8> {
        self.last_id
    }

    /// Wall-clock time at the start of the current (or last) decode.
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Most recent out-of-bounds field since the last [`DecodeContext::take_out_of_bounds`].
    pub fn out_of_bounds(&self) -> Option<FieldOutOfBounds> {
        self.out_of_bounds
    }

    pub fn take_out_of_bounds(&mut self) -> Option<FieldOutOfBounds> {
        self.out_of_bounds.take()
    }

    pub(crate) fn flag(&mut self, message: &'static str, field: &'static str) {
        warn!("{message}: field {field} out of bounds");
        self.out_of_bounds = Some(FieldOutOfBounds { message, field });
    }

    /// Checks `value` against `range`, flagging and clamping it when outside.
    pub(crate) fn clamp<T: PartialOrd + Copy>(
        &mut self,
        message: &'static str,
        field: &'static str,
        value: T,
        range: core::ops::RangeInclusive<T>,
    ) -> T {
        if range.contains(&value) {
            return value;
        }
        self.flag(message, field);
        if value < *range.start() {
            *range.start()
        } else {
            *range.end()
        }
    }

    fn tick(&mut self) {
        self.now = (self.clock)();
    }
}

/// Result of decoding one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    pub id: u8,
    pub label: &'static str,
    /// Payload bytes present in the frame
    pub payload_len: usize,
    /// Payload bytes the decoder expected
    pub expected: usize,
    /// Bytes left after the decoder and the frame trailer were consumed
    pub leftover: usize,
    /// At least one field was zero-filled because the payload was too short
    pub underflow: bool,
    /// Sticky cursor error left by the decoder, before the cursor was reset
    pub cursor_error: Option<CursorError>,
}

/// Maps message ids to decoders.
///
/// [`Registry::lassen`] holds every built-in decoder; entries can be
/// replaced or removed to change which messages are understood.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: BTreeMap<u8, Entry>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::lassen()
    }
}

impl Registry {
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// All messages understood by Lassen-class receivers.
    pub fn lassen() -> Self {
        let mut registry = Self::empty();
        for &(id, label, decode) in LASSEN_PACKETS {
            registry.register(id, label, decode);
        }
        registry
    }

    /// Adds or replaces the decoder for `id`, returning the previous entry.
    pub fn register(&mut self, id: u8, label: &'static str, decode: DecodeFn) -> Option<Entry> {
        self.entries.insert(id, Entry { label, decode })
    }

    pub fn unregister(&mut self, id: u8) -> Option<Entry> {
        self.entries.remove(&id)
    }

    pub fn get(&self, id: u8) -> Option<&Entry> {
        self.entries.get(&id)
    }

    pub fn contains(&self, id: u8) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn label(&self, id: u8) -> Option<&'static str> {
        self.entries.get(&id).map(|e| e.label)
    }

    pub fn ids(&self) -> impl Iterator<Item = u8> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decodes the single frame held by `cursor` (`[DLE...] id payload DLE ETX`).
    ///
    /// The cursor is always reset on return, so its error state is reported
    /// in the result: a cursor that arrives already flagged is refused with
    /// [`DecodeError::Cursor`], and whatever the decoder leaves behind is in
    /// [`Decoded::cursor_error`]. Errors mean the frame was discarded; a short
    /// payload is not an error, see [`Decoded::underflow`].
    pub fn dispatch(
        &self,
        cursor: &mut ByteCursor,
        state: &mut ReceiverState,
        ctx: &mut DecodeContext,
    ) -> Result<Decoded, DecodeError> {
        if cursor.is_busy() {
            warn!("cursor already being decoded");
        }
        cursor.set_busy(true);
        let result = match cursor.error() {
            Some(error) => {
                warn!("refusing frame, cursor holds {error}");
                Err(DecodeError::Cursor(error))
            },
            None => self.dispatch_frame(cursor, state, ctx),
        };
        cursor.set_busy(false);
        cursor.reset();
        result
    }

    fn dispatch_frame(
        &self,
        cursor: &mut ByteCursor,
        state: &mut ReceiverState,
        ctx: &mut DecodeContext,
    ) -> Result<Decoded, DecodeError> {
        while cursor.remaining() > FRAME_TRAILER_LEN && cursor.char_at(0) == Some(DLE) {
            cursor.skip(1);
        }

        let id = cursor.get_u8();
        if cursor.remaining() < FRAME_TRAILER_LEN || id == 0 {
            debug!("frame too small: id 0x{id:02x}, {} bytes", cursor.remaining());
            return Err(DecodeError::FrameTooSmall {
                len: cursor.remaining(),
            });
        }

        let Some(entry) = self.entries.get(&id) else {
            warn!(
                "unknown message id 0x{id:02x} after 0x{:02x}",
                ctx.last_id.unwrap_or(0)
            );
            return Err(DecodeError::UnknownMessageId {
                id,
                previous: ctx.last_id,
            });
        };

        ctx.tick();
        let payload_len = cursor.remaining() - FRAME_TRAILER_LEN;
        trace!("0x{id:02x} {}: {payload_len} payload bytes", entry.label);

        let start = cursor.position();
        cursor.withhold(FRAME_TRAILER_LEN);
        let expected = (entry.decode)(cursor, state, ctx);
        let consumed = cursor.position() - start;
        cursor.release();

        let underflow = cursor.has_underflowed();
        let cursor_error = cursor.error();
        if consumed != expected {
            debug!(
                "0x{id:02x} {}: expected {expected} payload bytes, read {consumed}",
                entry.label
            );
        }

        cursor.skip(FRAME_TRAILER_LEN);
        let leftover = cursor.remaining();
        match leftover {
            0 => {},
            1 => {
                if cursor.char_at(0) != Some(ETX) {
                    debug!(
                        "0x{id:02x} {}: stray byte 0x{:02x} after frame",
                        entry.label,
                        cursor.char_at(0).unwrap_or(0)
                    );
                }
            },
            n => warn!(
                "0x{id:02x} {}: length mismatch, {payload_len} payload bytes, {n} left over",
                entry.label
            ),
        }

        ctx.last_id = Some(id);
        Ok(Decoded {
            id,
            label: entry.label,
            payload_len,
            expected,
            leftover,
            underflow,
            cursor_error,
        })
    }
}
