use crate::{cursor::ByteCursor, dispatch::DecodeContext, state::ReceiverState};

/// Differential fix mode reported in 0x82
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DgpsFixMode {
    /// Differential fixes off
    #[default]
    ManualOff,
    /// Differential fixes only
    ManualOn,
    /// Differential when available, no corrections received
    AutoOff,
    /// Differential when available, corrections in use
    AutoOn,
    Other(u8),
}

impl From<u8> for DgpsFixMode {
    fn from(mode: u8) -> Self {
        match mode {
            0 => Self::ManualOff,
            1 => Self::ManualOn,
            2 => Self::AutoOff,
            3 => Self::AutoOn,
            x => Self::Other(x),
        }
    }
}

impl DgpsFixMode {
    /// Corrections are being applied, the report carries station details
    pub fn is_differential(self) -> bool {
        matches!(self, Self::ManualOn | Self::AutoOn)
    }
}

/// DGPS position fix mode (0x82)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DgpsMode {
    pub(crate) mode: DgpsFixMode,
    pub(crate) rtcm_version: Option<u8>,
    pub(crate) reference_station: Option<i16>,
}

impl DgpsMode {
    pub fn mode(&self) -> DgpsFixMode {
        self.mode
    }

    pub fn rtcm_version(&self) -> Option<u8> {
        self.rtcm_version
    }

    pub fn reference_station(&self) -> Option<i16> {
        self.reference_station
    }
}

pub(crate) fn decode_dgps_mode(
    cursor: &mut ByteCursor,
    state: &mut ReceiverState,
    _ctx: &mut DecodeContext,
) -> usize {
    let dgps = &mut state.dgps;
    dgps.mode = DgpsFixMode::from(cursor.get_u8());
    if dgps.mode.is_differential() {
        dgps.rtcm_version = Some(cursor.get_u8());
        dgps.reference_station = Some(cursor.get_i16());
        4
    } else {
        dgps.rtcm_version = None;
        dgps.reference_station = None;
        1
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::packets::testing::Harness;

    #[test]
    fn dgps_auto_on_carries_station() {
        let mut h = Harness::new();
        assert_eq!(h.run(decode_dgps_mode, &[3, 2, 0x01, 0x2c]), 4);
        let dgps = h.state.dgps();
        assert_eq!(dgps.mode(), DgpsFixMode::AutoOn);
        assert_eq!(dgps.rtcm_version(), Some(2));
        assert_eq!(dgps.reference_station(), Some(300));
    }

    #[test]
    fn dgps_off_clears_station() {
        let mut h = Harness::new();
        h.run(decode_dgps_mode, &[1, 2, 0x00, 0x07]);
        assert_eq!(h.run(decode_dgps_mode, &[2]), 1);
        let dgps = h.state.dgps();
        assert_eq!(dgps.mode(), DgpsFixMode::AutoOff);
        assert_eq!(dgps.rtcm_version(), None);
        assert_eq!(dgps.reference_station(), None);
        assert_eq!(h.cursor.error(), None);
    }
}
