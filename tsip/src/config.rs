use crate::{
    constants::{SIGNAL_LEVEL_SLOTS, TRACKING_CHANNELS},
    tracking::OverflowPolicy,
};

/// Payload layout of the health report (0x46).
///
/// The protocol reference documents two bytes, receivers in the field send
/// four more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HealthLayout {
    /// Status byte and error flags only
    Documented,
    /// Status, error flags and four trailing bytes
    #[default]
    Extended,
}

impl HealthLayout {
    pub const fn payload_len(self) -> usize {
        match self {
            Self::Documented => 2,
            Self::Extended => 6,
        }
    }
}

/// Decoder settings. `Default` reproduces the behaviour of the Lassen
/// firmware tools: 6-byte health reports, 12 stored signal levels, raw
/// measurements dropped when full, tracking status clamped to the last slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DecoderConfig {
    pub health_layout: HealthLayout,
    /// Signal levels stored per 0x47 report, at most 64
    pub max_signal_levels: usize,
    pub table_capacity: usize,
    pub raw_measurement_policy: OverflowPolicy,
    pub tracking_policy: OverflowPolicy,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            health_layout: HealthLayout::Extended,
            max_signal_levels: TRACKING_CHANNELS,
            table_capacity: TRACKING_CHANNELS,
            raw_measurement_policy: OverflowPolicy::Drop,
            tracking_policy: OverflowPolicy::ClampLast,
        }
    }
}

impl DecoderConfig {
    /// Both tracking tables refuse inserts once full.
    pub fn strict() -> Self {
        Self::default().with_table_policy(OverflowPolicy::Reject)
    }

    pub fn with_health_layout(mut self, layout: HealthLayout) -> Self {
        self.health_layout = layout;
        self
    }

    pub fn with_max_signal_levels(mut self, count: usize) -> Self {
        self.max_signal_levels = count.min(SIGNAL_LEVEL_SLOTS);
        self
    }

    pub fn with_table_capacity(mut self, capacity: usize) -> Self {
        self.table_capacity = capacity;
        self
    }

    /// Same policy for both tracking tables.
    pub fn with_table_policy(mut self, policy: OverflowPolicy) -> Self {
        self.raw_measurement_policy = policy;
        self.tracking_policy = policy;
        self
    }

    pub fn with_raw_measurement_policy(mut self, policy: OverflowPolicy) -> Self {
        self.raw_measurement_policy = policy;
        self
    }

    pub fn with_tracking_policy(mut self, policy: OverflowPolicy) -> Self {
        self.tracking_policy = policy;
        self
    }

    pub(crate) fn signal_levels_stored(&self) -> usize {
        self.max_signal_levels.min(SIGNAL_LEVEL_SLOTS)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn strict_rejects_in_both_tables() {
        let config = DecoderConfig::strict();
        assert_eq!(config.raw_measurement_policy, OverflowPolicy::Reject);
        assert_eq!(config.tracking_policy, OverflowPolicy::Reject);
        assert_eq!(config.health_layout, HealthLayout::Extended);
    }

    #[test]
    fn signal_levels_capped_at_slots() {
        let config = DecoderConfig::default().with_max_signal_levels(500);
        assert_eq!(config.max_signal_levels, SIGNAL_LEVEL_SLOTS);
    }
}
