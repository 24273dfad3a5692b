use bitflags::bitflags;

use crate::{cursor::ByteCursor, dispatch::DecodeContext, state::ReceiverState};

pub(crate) const IO_OPTIONS_LEN: usize = 4;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct PositionOptions: u8 {
        /// Output 0x42/0x83
        const ECEF = 0x01;
        /// Output 0x4A/0x84
        const LLA = 0x02;
        /// Altitude above mean sea level instead of the ellipsoid
        const MSL_ALTITUDE = 0x04;
        const DOUBLE_PRECISION = 0x10;
        const SUPERPACKETS = 0x20;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct VelocityOptions: u8 {
        /// Output 0x43
        const ECEF = 0x01;
        /// Output 0x56
        const ENU = 0x02;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct TimingOptions: u8 {
        /// Fix times in UTC instead of GPS time
        const UTC = 0x01;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct AuxiliaryOptions: u8 {
        /// Output 0x5A
        const RAW_MEASUREMENTS = 0x01;
        const DOPPLER_SMOOTHED = 0x02;
        /// Signal levels in dB-Hz instead of AMU
        const DB_HZ = 0x08;
    }
}

/// I/O options (0x55)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IoOptions {
    pub(crate) position: PositionOptions,
    pub(crate) velocity: VelocityOptions,
    pub(crate) timing: TimingOptions,
    pub(crate) auxiliary: AuxiliaryOptions,
}

impl IoOptions {
    pub fn position(&self) -> PositionOptions {
        self.position
    }

    pub fn velocity(&self) -> VelocityOptions {
        self.velocity
    }

    pub fn timing(&self) -> TimingOptions {
        self.timing
    }

    pub fn auxiliary(&self) -> AuxiliaryOptions {
        self.auxiliary
    }
}

pub(crate) fn decode_io_options(
    cursor: &mut ByteCursor,
    state: &mut ReceiverState,
    _ctx: &mut DecodeContext,
) -> usize {
    let options = &mut state.io_options;
    options.position = PositionOptions::from_bits_retain(cursor.get_u8());
    options.velocity = VelocityOptions::from_bits_retain(cursor.get_u8());
    options.timing = TimingOptions::from_bits_retain(cursor.get_u8());
    options.auxiliary = AuxiliaryOptions::from_bits_retain(cursor.get_u8());
    IO_OPTIONS_LEN
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::packets::testing::Harness;

    #[test]
    fn io_options_interpret() {
        let mut h = Harness::new();
        assert_eq!(h.run(decode_io_options, &[0x12, 0x02, 0x00, 0x09]), 4);
        let options = h.state.io_options();
        assert_eq!(
            options.position(),
            PositionOptions::LLA | PositionOptions::DOUBLE_PRECISION
        );
        assert_eq!(options.velocity(), VelocityOptions::ENU);
        assert!(options.timing().is_empty());
        assert!(options.auxiliary().contains(AuxiliaryOptions::DB_HZ));
        assert!(options
            .auxiliary()
            .contains(AuxiliaryOptions::RAW_MEASUREMENTS));
    }

    #[test]
    fn io_options_keeps_unknown_bits() {
        let mut h = Harness::new();
        h.run(decode_io_options, &[0x80, 0x00, 0x00, 0x00]);
        assert_eq!(h.state.io_options().position().bits(), 0x80);
    }
}
