use log::debug;

use crate::{
    constants::TRACKING_CHANNELS, cursor::ByteCursor, dispatch::DecodeContext,
    state::ReceiverState,
};

/// Payload bytes before the PRN list
pub(crate) const SOLUTION_HEADER_LEN: usize = 17;

/// Fix dimension from bits 0-2 of the 0x6D mode byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FixType {
    NoFix,
    /// 1D clock fix
    Clock1D,
    Fix2D,
    Fix3D,
    /// Overdetermined clock fix
    ClockOverdetermined,
    Unknown(u8),
}

impl From<u8> for FixType {
    fn from(bits: u8) -> Self {
        match bits {
            0 => Self::NoFix,
            1 => Self::Clock1D,
            3 => Self::Fix2D,
            4 => Self::Fix3D,
            5 => Self::ClockOverdetermined,
            x => Self::Unknown(x),
        }
    }
}

/// All-in-view satellite selection (0x6D)
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolutionStatus {
    pub(crate) mode: u8,
    pub(crate) pdop: f32,
    pub(crate) hdop: f32,
    pub(crate) vdop: f32,
    pub(crate) tdop: f32,
    pub(crate) prns: Vec<u8>,
}

impl SolutionStatus {
    /// Raw mode byte
    pub fn mode_byte(&self) -> u8 {
        self.mode
    }

    /// Fix type bits (0-2)
    pub fn mode(&self) -> u8 {
        self.mode & 0x07
    }

    pub fn fix_type(&self) -> FixType {
        FixType::from(self.mode())
    }

    /// Automatic fix mode, bit 3 clear
    pub fn auto(&self) -> bool {
        self.mode & 0x08 == 0
    }

    /// Number of satellites in the solution (bits 4-7)
    pub fn nsv(&self) -> u8 {
        self.mode >> 4
    }

    pub fn pdop(&self) -> f32 {
        self.pdop
    }

    pub fn hdop(&self) -> f32 {
        self.hdop
    }

    pub fn vdop(&self) -> f32 {
        self.vdop
    }

    pub fn tdop(&self) -> f32 {
        self.tdop
    }

    /// PRN of the `index`th satellite used in the solution
    pub fn prn(&self, index: usize) -> Option<u8> {
        self.prns.get(index).copied()
    }

    pub fn prns(&self) -> &[u8] {
        &self.prns
    }
}

/// Also marks the start of a fix cycle: the raw measurement counter is reset.
pub(crate) fn decode_solution_status(
    cursor: &mut ByteCursor,
    state: &mut ReceiverState,
    _ctx: &mut DecodeContext,
) -> usize {
    let status = &mut state.solution;
    status.mode = cursor.get_u8();
    status.pdop = cursor.get_f32();
    status.hdop = cursor.get_f32();
    status.vdop = cursor.get_f32();
    status.tdop = cursor.get_f32();

    let nsv = usize::from(status.nsv());
    status.prns.clear();
    for i in 0..nsv {
        let prn = cursor.get_u8();
        if i < TRACKING_CHANNELS {
            status.prns.push(prn);
        }
    }
    if nsv > TRACKING_CHANNELS {
        debug!("{nsv} satellites in solution, keeping {TRACKING_CHANNELS}");
    }

    state.raw_measurements.reset_cycle();
    SOLUTION_HEADER_LEN + nsv
}
