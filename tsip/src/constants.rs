/// Data Link Escape: frame start marker, and escape byte for a literal 0x10 in a payload.
pub const DLE: u8 = 0x10;
/// End of Text: follows a DLE to terminate a frame.
pub const ETX: u8 = 0x03;

/// Bytes following the payload of every de-stuffed frame (DLE ETX).
pub const FRAME_TRAILER_LEN: usize = 2;

/// Documented worst case for a single de-stuffed message.
pub const MAX_FRAME_LEN: usize = 1024;

/// Receiver channel count, which bounds the tracking tables and the PRN lists.
pub const TRACKING_CHANNELS: usize = 12;

/// Slots in the signal level table.
pub const SIGNAL_LEVEL_SLOTS: usize = 64;

/// Highest GPS PRN with a slot in per-satellite pages (0x49, 0x59).
pub const GPS_PRN_COUNT: usize = 32;

/// GPS epoch (1980-01-06T00:00:00Z) as a Unix timestamp.
pub(crate) const GPS_EPOCH_UNIX_SECONDS: i64 = 315_964_800;
pub(crate) const SECONDS_PER_WEEK: f64 = 604_800.0;
