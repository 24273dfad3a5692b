use chrono::{DateTime, Duration, Utc};

use crate::{
    constants::{GPS_EPOCH_UNIX_SECONDS, SECONDS_PER_WEEK},
    cursor::ByteCursor,
    dispatch::DecodeContext,
    error::FieldOutOfBounds,
    state::ReceiverState,
};

pub(crate) const GPS_TIME_LEN: usize = 10;
const LABEL: &str = "GPS time";

/// Highest week number accepted by [`GpsTime::check_bounds`].
pub const MAX_GPS_WEEK: i16 = 2048;

/// GPS time report (0x41)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GpsTime {
    pub(crate) time_of_week: f32,
    pub(crate) extended_week: i16,
    pub(crate) utc_offset: f32,
    pub(crate) captured_at: Option<DateTime<Utc>>,
    pub(crate) delta: f64,
}

impl GpsTime {
    pub fn new(time_of_week: f32, extended_week: i16, utc_offset: f32) -> Self {
        Self {
            time_of_week,
            extended_week,
            utc_offset,
            captured_at: None,
            delta: 0.0,
        }
    }

    /// Seconds into the GPS week
    pub fn time_of_week(&self) -> f32 {
        self.time_of_week
    }

    /// Week number counted from 1980-01-06, without 1024-week rollover
    pub fn extended_week(&self) -> i16 {
        self.extended_week
    }

    /// GPS minus UTC, in seconds
    pub fn utc_offset(&self) -> f32 {
        self.utc_offset
    }

    /// Wall-clock time at which the report was decoded
    pub fn captured_at(&self) -> Option<DateTime<Utc>> {
        self.captured_at
    }

    /// Wall clock minus receiver UTC at capture, in seconds
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// UTC time reported by the receiver.
    pub fn utc(&self) -> Option<DateTime<Utc>> {
        let epoch = DateTime::from_timestamp(GPS_EPOCH_UNIX_SECONDS, 0)?;
        let seconds = f64::from(self.extended_week) * SECONDS_PER_WEEK
            + f64::from(self.time_of_week)
            - f64::from(self.utc_offset);
        if !seconds.is_finite() {
            return None;
        }
        epoch.checked_add_signed(Duration::nanoseconds((seconds * 1e9).round() as i64))
    }

    pub fn check_bounds(&self) -> Result<(), FieldOutOfBounds> {
        let field = if self.extended_week > MAX_GPS_WEEK {
            "extended_week"
        } else if !(0.0..SECONDS_PER_WEEK as f32).contains(&self.time_of_week) {
            "time_of_week"
        } else if self.utc_offset < 0.0 {
            "utc_offset"
        } else {
            return Ok(());
        };
        Err(FieldOutOfBounds {
            message: LABEL,
            field,
        })
    }
}

pub(crate) fn decode_gps_time(
    cursor: &mut ByteCursor,
    state: &mut ReceiverState,
    ctx: &mut DecodeContext,
) -> usize {
    let time = &mut state.gps_time;
    time.time_of_week = cursor.get_f32();
    time.extended_week = cursor.get_i16();
    time.utc_offset = cursor.get_f32();
    time.captured_at = Some(ctx.now());
    time.delta = time
        .utc()
        .and_then(|utc| (ctx.now() - utc).num_microseconds())
        .map_or(0.0, |us| us as f64 * 1e-6);
    if let Err(e) = time.check_bounds() {
        ctx.flag(e.message, e.field);
    }
    GPS_TIME_LEN
}
