use chrono::NaiveDate;

use crate::{cursor::ByteCursor, dispatch::DecodeContext, state::ReceiverState};

pub(crate) const SOFTWARE_VERSION_LEN: usize = 10;

/// Firmware revision and build date of one processor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FirmwareRevision {
    pub(crate) major: u8,
    pub(crate) minor: u8,
    pub(crate) month: u8,
    pub(crate) day: u8,
    /// Years since 1900
    pub(crate) year: u8,
}

impl FirmwareRevision {
    pub fn major(&self) -> u8 {
        self.major
    }

    pub fn minor(&self) -> u8 {
        self.minor
    }

    pub fn year(&self) -> u16 {
        1900 + u16::from(self.year)
    }

    /// Build date, `None` when the receiver reports an impossible date
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(
            i32::from(self.year()),
            u32::from(self.month),
            u32::from(self.day),
        )
    }

    fn read(cursor: &mut ByteCursor) -> Self {
        Self {
            major: cursor.get_u8(),
            minor: cursor.get_u8(),
            month: cursor.get_u8(),
            day: cursor.get_u8(),
            year: cursor.get_u8(),
        }
    }
}

impl core::fmt::Display for FirmwareRevision {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.major, self.minor)?;
        if let Some(date) = self.date() {
            write!(f, " ({date})")?;
        }
        Ok(())
    }
}

/// Software version (0x45)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SoftwareVersion {
    pub(crate) navigation: FirmwareRevision,
    pub(crate) signal_processor: FirmwareRevision,
}

impl SoftwareVersion {
    pub fn navigation(&self) -> FirmwareRevision {
        self.navigation
    }

    pub fn signal_processor(&self) -> FirmwareRevision {
        self.signal_processor
    }
}

pub(crate) fn decode_software_version(
    cursor: &mut ByteCursor,
    state: &mut ReceiverState,
    _ctx: &mut DecodeContext,
) -> usize {
    state.version.navigation = FirmwareRevision::read(cursor);
    state.version.signal_processor = FirmwareRevision::read(cursor);
    SOFTWARE_VERSION_LEN
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::packets::testing::Harness;

    #[test]
    fn software_version_interpret() {
        let mut h = Harness::new();
        assert_eq!(
            h.run(decode_software_version, &[1, 12, 3, 14, 104, 1, 3, 2, 29, 104]),
            10
        );
        let version = h.state.version();
        assert_eq!(version.navigation().major(), 1);
        assert_eq!(version.navigation().minor(), 12);
        assert_eq!(version.navigation().date(), NaiveDate::from_ymd_opt(2004, 3, 14));
        assert_eq!(version.navigation().to_string(), "1.12 (2004-03-14)");
        assert_eq!(version.signal_processor().year(), 2004);
        assert_eq!(version.signal_processor().date(), NaiveDate::from_ymd_opt(2004, 2, 29));
    }

    #[test]
    fn invalid_build_date() {
        let mut h = Harness::new();
        h.run(decode_software_version, &[2, 1, 13, 1, 100, 0, 0, 0, 0, 0]);
        assert_eq!(h.state.version().navigation().date(), None);
        assert_eq!(h.state.version().navigation().to_string(), "2.01");
    }
}
