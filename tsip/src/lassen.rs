use chrono::{DateTime, Utc};
use log::trace;

use crate::{
    config::DecoderConfig,
    cursor::ByteCursor,
    dispatch::{DecodeContext, Decoded, Registry},
    error::{DecodeError, FieldOutOfBounds},
    state::ReceiverState,
};

/// Decoder for the TSIP reports of a Lassen-class receiver.
///
/// Holds the message registry, the decoded receiver state and the context
/// carried between frames. Frames are fed either as de-stuffed byte slices
/// with [`Lassen::decode_frame`] or through a caller-owned cursor with
/// [`Lassen::decode_message`].
///
/// ```
/// use tsip::{framing::Frame, Lassen};
///
/// let mut payload = 86_399.5f32.to_be_bytes().to_vec();
/// payload.extend(2190i16.to_be_bytes());
/// payload.extend(18.0f32.to_be_bytes());
///
/// let mut lassen = Lassen::new();
/// let decoded = lassen.decode_frame(Frame::new(0x41, &payload).as_bytes()).unwrap();
/// assert_eq!(decoded.label, "GPS time");
/// assert_eq!(lassen.state().gps_time().extended_week(), 2190);
/// ```
#[derive(Debug, Clone)]
pub struct Lassen {
    registry: Registry,
    state: ReceiverState,
    context: DecodeContext,
    cursor: ByteCursor,
}

impl Default for Lassen {
    fn default() -> Self {
        Self::new()
    }
}

impl Lassen {
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            registry: Registry::lassen(),
            state: ReceiverState::new(&config),
            context: DecodeContext::new(config),
            cursor: ByteCursor::new(),
        }
    }

    /// Replaces the wall clock used to time-stamp 0x41 reports.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.context = self.context.with_clock(clock);
        self
    }

    pub fn config(&self) -> &DecoderConfig {
        self.context.config()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Decodes the frame held by `cursor`, which is reset afterwards.
    pub fn decode_message(&mut self, cursor: &mut ByteCursor) -> Result<Decoded, DecodeError> {
        self.registry
            .dispatch(cursor, &mut self.state, &mut self.context)
    }

    /// Decodes one de-stuffed frame: `id payload DLE ETX`.
    pub fn decode_frame(&mut self, frame: &[u8]) -> Result<Decoded, DecodeError> {
        let capacity = self.cursor.capacity();
        if frame.len() >= capacity {
            return Err(DecodeError::FrameTooLarge {
                len: frame.len(),
                capacity,
            });
        }
        trace!("frame {frame:02x?}");
        self.cursor.reset();
        self.cursor.put_buffer(frame);
        self.registry
            .dispatch(&mut self.cursor, &mut self.state, &mut self.context)
    }

    /// Forgets every tracked satellite and rewinds the internal cursor.
    pub fn reset_frame(&mut self) {
        self.cursor.reset();
        self.state.reset_tables();
    }

    pub fn state(&self) -> &ReceiverState {
        &self.state
    }

    /// Owned copy of the state, for handing to another thread.
    pub fn snapshot(&self) -> ReceiverState {
        self.state.clone()
    }

    /// Id of the last frame decoded successfully.
    pub fn last_message_id(&self) -> Option<u8> {
        self.context.last_id()
    }

    pub fn out_of_bounds(&self) -> Option<FieldOutOfBounds> {
        self.context.out_of_bounds()
    }

    /// Returns and clears the out-of-bounds diagnostic.
    pub fn take_out_of_bounds(&mut self) -> Option<FieldOutOfBounds> {
        self.context.take_out_of_bounds()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{framing::Frame, packets::testing::fixed_clock};

    fn tracking_payload(prn: u8, acquired: u8) -> Vec<u8> {
        let mut bytes = vec![prn, 0x08, acquired, 0];
        bytes.extend([0u8; 16]);
        bytes.extend([0, 0, 0, 0]);
        bytes
    }

    #[test]
    fn decode_frame_updates_state() {
        let mut lassen = Lassen::new().with_clock(fixed_clock);
        let frame = Frame::new(0x4d, &12.5f32.to_be_bytes());
        let decoded = lassen.decode_frame(frame.as_bytes()).unwrap();
        assert_eq!(decoded.id, 0x4d);
        assert_eq!(decoded.payload_len, 4);
        assert_eq!(decoded.leftover, 0);
        assert!(!decoded.underflow);
        assert_eq!(lassen.state().oscillator_offset().offset(), 12.5);
        assert_eq!(lassen.last_message_id(), Some(0x4d));
    }

    #[test]
    fn frame_larger_than_cursor_rejected() {
        let mut lassen = Lassen::new();
        let frame = vec![0x48; 2048];
        assert_eq!(
            lassen.decode_frame(&frame),
            Err(DecodeError::FrameTooLarge {
                len: 2048,
                capacity: 1024
            })
        );
        assert_eq!(lassen.last_message_id(), None);
    }

    #[test]
    fn reset_frame_clears_tables() {
        let mut lassen = Lassen::new();
        for prn in [3, 8] {
            let frame = Frame::new(0x5c, &tracking_payload(prn, 1));
            lassen.decode_frame(frame.as_bytes()).unwrap();
        }
        assert_eq!(lassen.state().tracking().len(), 2);
        lassen.reset_frame();
        assert!(lassen.state().tracking().is_empty());
        assert!(lassen.state().raw_measurements().is_empty());
    }

    #[test]
    fn snapshot_is_detached() {
        let mut lassen = Lassen::new();
        lassen
            .decode_frame(Frame::new(0x4e, b"Y").as_bytes())
            .unwrap();
        let snapshot = lassen.snapshot();
        lassen
            .decode_frame(Frame::new(0x4e, b"N").as_bytes())
            .unwrap();
        assert!(snapshot.set_time_response().accepted());
        assert!(!lassen.state().set_time_response().accepted());
    }

    #[test]
    fn removed_decoder_is_unknown() {
        let mut lassen = Lassen::new();
        lassen.decode_frame(Frame::new(0x4e, b"Y").as_bytes()).unwrap();
        lassen.registry_mut().unregister(0x4d);
        let frame = Frame::new(0x4d, &1.0f32.to_be_bytes());
        assert_eq!(
            lassen.decode_frame(frame.as_bytes()),
            Err(DecodeError::UnknownMessageId {
                id: 0x4d,
                previous: Some(0x4e)
            })
        );
    }
}
