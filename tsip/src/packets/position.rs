use crate::{cursor::ByteCursor, dispatch::DecodeContext, state::ReceiverState};

pub(crate) const LLA_SINGLE_LEN: usize = 20;
pub(crate) const LLA_DOUBLE_LEN: usize = 36;
pub(crate) const ECEF_SINGLE_LEN: usize = 16;
pub(crate) const ECEF_DOUBLE_LEN: usize = 36;

/// Width of the floating point fields a fix was reported with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Precision {
    #[default]
    Single,
    Double,
}

/// Latitude/longitude/altitude fix (0x4A single precision, 0x84 double precision)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub(crate) latitude: f64,
    pub(crate) longitude: f64,
    pub(crate) altitude: f64,
    pub(crate) clock_bias: f64,
    pub(crate) time_of_fix: f32,
    pub(crate) precision: Precision,
    pub(crate) valid: bool,
}

impl Position {
    /// Latitude in radians, positive north
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in radians, positive east
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn latitude_degrees(&self) -> f64 {
        self.latitude.to_degrees()
    }

    pub fn longitude_degrees(&self) -> f64 {
        self.longitude.to_degrees()
    }

    /// Altitude in meters
    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    /// Receiver clock bias in meters
    pub fn clock_bias(&self) -> f64 {
        self.clock_bias
    }

    /// GPS time of week of the fix, in seconds
    pub fn time_of_fix(&self) -> f32 {
        self.time_of_fix
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Every field of the last report was present
    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

/// Earth-centered, earth-fixed fix (0x42 single precision, 0x83 double precision)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EcefPosition {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) z: f64,
    /// Only reported in double precision
    pub(crate) clock_bias: Option<f64>,
    pub(crate) time_of_fix: f32,
    pub(crate) precision: Precision,
}

impl EcefPosition {
    /// Meters
    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    pub fn clock_bias(&self) -> Option<f64> {
        self.clock_bias
    }

    pub fn time_of_fix(&self) -> f32 {
        self.time_of_fix
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }
}

pub(crate) fn decode_lla_single(
    cursor: &mut ByteCursor,
    state: &mut ReceiverState,
    _ctx: &mut DecodeContext,
) -> usize {
    let pos = &mut state.position;
    pos.latitude = f64::from(cursor.get_f32());
    pos.longitude = f64::from(cursor.get_f32());
    pos.altitude = f64::from(cursor.get_f32());
    pos.clock_bias = f64::from(cursor.get_f32());
    pos.time_of_fix = cursor.get_f32();
    pos.precision = Precision::Single;
    pos.valid = cursor.error().is_none();
    LLA_SINGLE_LEN
}

pub(crate) fn decode_lla_double(
    cursor: &mut ByteCursor,
    state: &mut ReceiverState,
    _ctx: &mut DecodeContext,
) -> usize {
    let pos = &mut state.position;
    pos.latitude = cursor.get_f64();
    pos.longitude = cursor.get_f64();
    pos.altitude = cursor.get_f64();
    pos.clock_bias = cursor.get_f64();
    pos.time_of_fix = cursor.get_f32();
    pos.precision = Precision::Double;
    pos.valid = cursor.error().is_none();
    LLA_DOUBLE_LEN
}

pub(crate) fn decode_ecef_single(
    cursor: &mut ByteCursor,
    state: &mut ReceiverState,
    _ctx: &mut DecodeContext,
) -> usize {
    let pos = &mut state.ecef_position;
    pos.x = f64::from(cursor.get_f32());
    pos.y = f64::from(cursor.get_f32());
    pos.z = f64::from(cursor.get_f32());
    pos.clock_bias = None;
    pos.time_of_fix = cursor.get_f32();
    pos.precision = Precision::Single;
    ECEF_SINGLE_LEN
}

pub(crate) fn decode_ecef_double(
    cursor: &mut ByteCursor,
    state: &mut ReceiverState,
    _ctx: &mut DecodeContext,
) -> usize {
    let pos = &mut state.ecef_position;
    pos.x = cursor.get_f64();
    pos.y = cursor.get_f64();
    pos.z = cursor.get_f64();
    pos.clock_bias = Some(cursor.get_f64());
    pos.time_of_fix = cursor.get_f32();
    pos.precision = Precision::Double;
    ECEF_DOUBLE_LEN
}
