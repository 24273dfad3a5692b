use log::debug;

use crate::{
    constants::SIGNAL_LEVEL_SLOTS, cursor::ByteCursor, dispatch::DecodeContext,
    state::ReceiverState,
};

const SIGNAL_LEVEL_RECORD_LEN: usize = 5;

/// Signal level of one satellite (0x47)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignalLevel {
    pub prn: u8,
    /// AMU or dB-Hz, see [`AuxiliaryOptions`](crate::AuxiliaryOptions)
    pub level: f32,
}

impl SignalLevel {
    pub const fn new(prn: u8, level: f32) -> Self {
        Self { prn, level }
    }
}

/// Signal levels of every satellite in the last 0x47 report. Slots past the
/// reported count are cleared.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalLevels {
    slots: [SignalLevel; SIGNAL_LEVEL_SLOTS],
    count: usize,
}

impl Default for SignalLevels {
    fn default() -> Self {
        Self {
            slots: [SignalLevel::default(); SIGNAL_LEVEL_SLOTS],
            count: 0,
        }
    }
}

impl SignalLevels {
    /// Slot `index`, cleared or not
    pub fn get(&self, index: usize) -> Option<&SignalLevel> {
        self.slots.get(index)
    }

    /// Stored entries only
    pub fn as_slice(&self) -> &[SignalLevel] {
        &self.slots[..self.count]
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn level_of(&self, prn: u8) -> Option<f32> {
        self.as_slice()
            .iter()
            .find(|s| s.prn == prn)
            .map(|s| s.level)
    }

    fn clear(&mut self) {
        self.slots = [SignalLevel::default(); SIGNAL_LEVEL_SLOTS];
        self.count = 0;
    }
}

impl core::ops::Index<usize> for SignalLevels {
    type Output = SignalLevel;

    fn index(&self, index: usize) -> &Self::Output {
        &self.slots[index]
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for SignalLevels {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.as_slice())
    }
}

pub(crate) fn decode_signal_levels(
    cursor: &mut ByteCursor,
    state: &mut ReceiverState,
    ctx: &mut DecodeContext,
) -> usize {
    let stored = ctx.config().signal_levels_stored();
    let levels = &mut state.signal_levels;
    levels.clear();

    let count = usize::from(cursor.get_u8());
    for i in 0..count {
        let prn = cursor.get_u8();
        let level = cursor.get_f32();
        if i < stored {
            levels.slots[i] = SignalLevel::new(prn, level);
            levels.count = i + 1;
        }
    }
    if count > stored {
        debug!("{count} signal levels reported, keeping {stored}");
    }
    1 + count * SIGNAL_LEVEL_RECORD_LEN
}
