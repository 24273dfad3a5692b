//! Receiver configuration and housekeeping reports.

use log::debug;

use crate::{
    constants::GPS_PRN_COUNT, cursor::ByteCursor, dispatch::DecodeContext,
    state::ReceiverState,
};

pub(crate) const SYSTEM_MESSAGE_LEN: usize = 22;
pub(crate) const OPERATING_PARAMETERS_LEN: usize = 17;
pub(crate) const LAST_FIX_LEN: usize = 8;
pub(crate) const SATELLITE_SELECTION_LEN: usize = 1 + GPS_PRN_COUNT;

/// Unparsable packet (0x13)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnparsablePacket {
    pub(crate) packet_id: u8,
}

impl UnparsablePacket {
    /// Id of the command the receiver rejected
    pub fn packet_id(&self) -> u8 {
        self.packet_id
    }
}

/// GPS system message (0x48)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SystemMessage {
    pub(crate) text: String,
}

impl SystemMessage {
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Almanac health page (0x49)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlmanacHealthPage {
    pub(crate) health: [u8; GPS_PRN_COUNT],
}

impl AlmanacHealthPage {
    /// Health byte of `prn` (1..=32)
    pub fn health(&self, prn: u8) -> Option<u8> {
        let index = usize::from(prn).checked_sub(1)?;
        self.health.get(index).copied()
    }

    pub fn is_healthy(&self, prn: u8) -> bool {
        self.health(prn) == Some(0)
    }

    pub fn as_bytes(&self) -> &[u8; GPS_PRN_COUNT] {
        &self.health
    }
}

/// Dynamics code of the navigation filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dynamics {
    #[default]
    Land,
    Sea,
    Air,
    Stationary,
    Other(u8),
}

impl From<u8> for Dynamics {
    fn from(code: u8) -> Self {
        match code {
            1 => Self::Land,
            2 => Self::Sea,
            3 => Self::Air,
            4 => Self::Stationary,
            x => Self::Other(x),
        }
    }
}

/// Operating parameters (0x4C)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OperatingParameters {
    pub(crate) dynamics: u8,
    pub(crate) elevation_mask: f32,
    pub(crate) signal_mask: f32,
    pub(crate) pdop_mask: f32,
    pub(crate) pdop_switch: f32,
}

impl OperatingParameters {
    pub fn dynamics_code(&self) -> u8 {
        self.dynamics
    }

    pub fn dynamics(&self) -> Dynamics {
        Dynamics::from(self.dynamics)
    }

    /// Radians above the horizon
    pub fn elevation_mask(&self) -> f32 {
        self.elevation_mask
    }

    pub fn signal_mask(&self) -> f32 {
        self.signal_mask
    }

    pub fn pdop_mask(&self) -> f32 {
        self.pdop_mask
    }

    /// PDOP below which 3D fixes are used
    pub fn pdop_switch(&self) -> f32 {
        self.pdop_switch
    }
}

/// Oscillator offset (0x4D)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OscillatorOffset {
    pub(crate) offset: f32,
}

impl OscillatorOffset {
    /// Hz
    pub fn offset(&self) -> f32 {
        self.offset
    }
}

/// Response to set GPS time (0x4E)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetTimeResponse {
    pub(crate) response: u8,
}

impl SetTimeResponse {
    pub fn response(&self) -> u8 {
        self.response
    }

    /// `'Y'`: the receiver took the time
    pub fn accepted(&self) -> bool {
        self.response == b'Y'
    }
}

/// Information about last computed fix (0x57)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LastFixInfo {
    pub(crate) source: u8,
    pub(crate) diagnostic: u8,
    pub(crate) time_of_fix: f32,
    pub(crate) week: i16,
}

impl LastFixInfo {
    /// 0 no previous fix, 1 regular fix
    pub fn source(&self) -> u8 {
        self.source
    }

    pub fn has_fix(&self) -> bool {
        self.source != 0
    }

    pub fn diagnostic(&self) -> u8 {
        self.diagnostic
    }

    pub fn time_of_fix(&self) -> f32 {
        self.time_of_fix
    }

    pub fn week(&self) -> i16 {
        self.week
    }
}

/// Satellite enable/health status (0x59)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SatelliteSelection {
    pub(crate) operation: u8,
    pub(crate) flags: [u8; GPS_PRN_COUNT],
}

impl SatelliteSelection {
    /// 3 enable/disable flags, 6 heed/ignore health flags
    pub fn operation(&self) -> u8 {
        self.operation
    }

    /// Flag byte of `prn` (1..=32)
    pub fn flag(&self, prn: u8) -> Option<u8> {
        let index = usize::from(prn).checked_sub(1)?;
        self.flags.get(index).copied()
    }

    pub fn flags(&self) -> &[u8; GPS_PRN_COUNT] {
        &self.flags
    }
}

pub(crate) fn decode_unparsable(
    cursor: &mut ByteCursor,
    state: &mut ReceiverState,
    _ctx: &mut DecodeContext,
) -> usize {
    state.unparsable.packet_id = cursor.get_u8();
    let rest = cursor.remaining();
    if rest > 0 {
        debug!("skipping {rest} bytes of rejected packet 0x{:02x}", state.unparsable.packet_id);
        cursor.skip(rest);
    }
    1 + rest
}

pub(crate) fn decode_system_message(
    cursor: &mut ByteCursor,
    state: &mut ReceiverState,
    _ctx: &mut DecodeContext,
) -> usize {
    let raw = cursor.get_bytes::<SYSTEM_MESSAGE_LEN>();
    state.system_message.text = String::from_utf8_lossy(&raw)
        .trim_end_matches(['\0', ' '])
        .to_owned();
    SYSTEM_MESSAGE_LEN
}

pub(crate) fn decode_almanac_health_page(
    cursor: &mut ByteCursor,
    state: &mut ReceiverState,
    _ctx: &mut DecodeContext,
) -> usize {
    state.almanac_health.health = cursor.get_bytes();
    GPS_PRN_COUNT
}

pub(crate) fn decode_operating_parameters(
    cursor: &mut ByteCursor,
    state: &mut ReceiverState,
    _ctx: &mut DecodeContext,
) -> usize {
    let params = &mut state.operating_parameters;
    params.dynamics = cursor.get_u8();
    params.elevation_mask = cursor.get_f32();
    params.signal_mask = cursor.get_f32();
    params.pdop_mask = cursor.get_f32();
    params.pdop_switch = cursor.get_f32();
    OPERATING_PARAMETERS_LEN
}

pub(crate) fn decode_oscillator_offset(
    cursor: &mut ByteCursor,
    state: &mut ReceiverState,
    _ctx: &mut DecodeContext,
) -> usize {
    state.oscillator_offset.offset = cursor.get_f32();
    4
}

pub(crate) fn decode_set_time_response(
    cursor: &mut ByteCursor,
    state: &mut ReceiverState,
    _ctx: &mut DecodeContext,
) -> usize {
    state.set_time_response.response = cursor.get_u8();
    1
}

pub(crate) fn decode_last_fix(
    cursor: &mut ByteCursor,
    state: &mut ReceiverState,
    _ctx: &mut DecodeContext,
) -> usize {
    let fix = &mut state.last_fix;
    fix.source = cursor.get_u8();
    fix.diagnostic = cursor.get_u8();
    fix.time_of_fix = cursor.get_f32();
    fix.week = cursor.get_i16();
    LAST_FIX_LEN
}

pub(crate) fn decode_satellite_selection(
    cursor: &mut ByteCursor,
    state: &mut ReceiverState,
    _ctx: &mut DecodeContext,
) -> usize {
    let selection = &mut state.satellite_selection;
    selection.operation = cursor.get_u8();
    selection.flags = cursor.get_bytes();
    SATELLITE_SELECTION_LEN
}
