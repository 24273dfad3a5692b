use bitflags::bitflags;

use crate::{
    config::HealthLayout, cursor::ByteCursor, dispatch::DecodeContext, state::ReceiverState,
};

pub(crate) const MACHINE_STATUS_LEN: usize = 3;

/// First byte of the health report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReceiverStatus {
    #[default]
    DoingFixes,
    NoGpsTime,
    NeedsInitialization,
    PdopTooHigh,
    NoUsableSatellites,
    OneUsableSatellite,
    TwoUsableSatellites,
    ThreeUsableSatellites,
    ChosenSatelliteUnusable,
    Other(u8),
}

impl From<u8> for ReceiverStatus {
    fn from(code: u8) -> Self {
        match code {
            0x00 => Self::DoingFixes,
            0x01 => Self::NoGpsTime,
            0x02 => Self::NeedsInitialization,
            0x03 => Self::PdopTooHigh,
            0x08 => Self::NoUsableSatellites,
            0x09 => Self::OneUsableSatellite,
            0x0a => Self::TwoUsableSatellites,
            0x0b => Self::ThreeUsableSatellites,
            0x0c => Self::ChosenSatelliteUnusable,
            x => Self::Other(x),
        }
    }
}

bitflags! {
    /// Error flags, second byte of the health report
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct HealthFlags: u8 {
        const BATTERY_BACKUP_FAILED = 0x01;
        const ANTENNA_FEEDLINE_FAULT = 0x10;
        /// Set when the feedline fault is a short, clear when open
        const ANTENNA_SHORTED = 0x20;
    }
}

/// Health of receiver (0x46)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealthStatus {
    pub(crate) status: u8,
    pub(crate) flags: HealthFlags,
    /// Only sent by receivers using [`HealthLayout::Extended`]
    pub(crate) reserved: Option<[u8; 4]>,
}

impl HealthStatus {
    pub fn status_code(&self) -> u8 {
        self.status
    }

    pub fn status(&self) -> ReceiverStatus {
        ReceiverStatus::from(self.status)
    }

    pub fn is_doing_fixes(&self) -> bool {
        self.status == 0
    }

    pub fn flags(&self) -> HealthFlags {
        self.flags
    }

    pub fn reserved(&self) -> Option<[u8; 4]> {
        self.reserved
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct MachineStatus1: u8 {
        /// No real-time clock at power-up, the battery backup did not hold
        const RTC_UNAVAILABLE = 0x02;
        const ALMANAC_INCOMPLETE = 0x08;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct MachineStatus2: u8 {
        const SUPERPACKETS_SUPPORTED = 0x01;
    }
}

/// Machine code/status (0x4B)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MachineStatus {
    pub(crate) machine_id: u8,
    pub(crate) status1: MachineStatus1,
    pub(crate) status2: MachineStatus2,
}

impl MachineStatus {
    pub fn machine_id(&self) -> u8 {
        self.machine_id
    }

    pub fn status1(&self) -> MachineStatus1 {
        self.status1
    }

    pub fn status2(&self) -> MachineStatus2 {
        self.status2
    }

    /// The clock was lost across power-down. Antenna faults are only
    /// reported by 0x46, see [`HealthFlags`].
    pub fn battery_backup_failed(&self) -> bool {
        self.status1.contains(MachineStatus1::RTC_UNAVAILABLE)
    }

    pub fn almanac_complete(&self) -> bool {
        !self.status1.contains(MachineStatus1::ALMANAC_INCOMPLETE)
    }

    pub fn superpackets_supported(&self) -> bool {
        self.status2.contains(MachineStatus2::SUPERPACKETS_SUPPORTED)
    }
}

pub(crate) fn decode_health(
    cursor: &mut ByteCursor,
    state: &mut ReceiverState,
    ctx: &mut DecodeContext,
) -> usize {
    let layout = ctx.config().health_layout;
    let health = &mut state.health;
    health.status = cursor.get_u8();
    health.flags = HealthFlags::from_bits_retain(cursor.get_u8());
    health.reserved = match layout {
        HealthLayout::Documented => None,
        HealthLayout::Extended => Some(cursor.get_bytes::<4>()),
    };
    layout.payload_len()
}

pub(crate) fn decode_machine_status(
    cursor: &mut ByteCursor,
    state: &mut ReceiverState,
    _ctx: &mut DecodeContext,
) -> usize {
    let machine = &mut state.machine;
    machine.machine_id = cursor.get_u8();
    machine.status1 = MachineStatus1::from_bits_retain(cursor.get_u8());
    machine.status2 = MachineStatus2::from_bits_retain(cursor.get_u8());
    MACHINE_STATUS_LEN
}
