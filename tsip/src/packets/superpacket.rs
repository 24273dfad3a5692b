use bitflags::bitflags;
use chrono::{DateTime, NaiveDate, Utc};
use core::f64::consts::{FRAC_PI_2, PI};
use log::warn;

use crate::{cursor::ByteCursor, dispatch::DecodeContext, state::ReceiverState};

pub const PRIMARY_TIMING_SUBCODE: u8 = 0xab;
pub const SUPPLEMENTAL_TIMING_SUBCODE: u8 = 0xac;

pub(crate) const PRIMARY_TIMING_LEN: usize = 16;
pub(crate) const SUPPLEMENTAL_TIMING_LEN: usize = 67;

const PRIMARY_LABEL: &str = "primary timing";
const SUPPLEMENTAL_LABEL: &str = "supplemental timing";

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct TimingFlags: u8 {
        /// Date and time are UTC, GPS when clear
        const UTC_TIME = 0x01;
        /// PPS is aligned to UTC, GPS when clear
        const UTC_PPS = 0x02;
        const TIME_NOT_SET = 0x04;
        const UTC_UNAVAILABLE = 0x08;
        const TIME_FROM_USER = 0x10;
    }
}

/// Primary timing packet (0x8F-AB)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrimaryTiming {
    pub(crate) time_of_week: u32,
    pub(crate) week: u16,
    pub(crate) utc_offset: i16,
    pub(crate) flags: TimingFlags,
    pub(crate) seconds: u8,
    pub(crate) minutes: u8,
    pub(crate) hours: u8,
    pub(crate) day: u8,
    pub(crate) month: u8,
    pub(crate) year: u16,
}

impl PrimaryTiming {
    /// Whole seconds into the GPS week
    pub fn time_of_week(&self) -> u32 {
        self.time_of_week
    }

    pub fn week(&self) -> u16 {
        self.week
    }

    /// Leap seconds between GPS and UTC
    pub fn utc_offset(&self) -> i16 {
        self.utc_offset
    }

    pub fn flags(&self) -> TimingFlags {
        self.flags
    }

    pub fn seconds(&self) -> u8 {
        self.seconds
    }

    pub fn minutes(&self) -> u8 {
        self.minutes
    }

    pub fn hours(&self) -> u8 {
        self.hours
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    /// Calendar time carried by the packet. A leap second is folded into the
    /// last nanosecond of the previous second as chrono does.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        let date = NaiveDate::from_ymd_opt(
            i32::from(self.year),
            u32::from(self.month),
            u32::from(self.day),
        )?;
        let (hours, minutes) = (u32::from(self.hours), u32::from(self.minutes));
        let time = if self.seconds == 60 {
            date.and_hms_milli_opt(hours, minutes, 59, 1_000)?
        } else {
            date.and_hms_opt(hours, minutes, u32::from(self.seconds))?
        };
        Some(time.and_utc())
    }
}

/// Supplemental timing packet (0x8F-AC)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SupplementalTiming {
    pub(crate) receiver_mode: u8,
    pub(crate) disciplining_mode: u8,
    pub(crate) survey_progress: u8,
    pub(crate) holdover: u32,
    pub(crate) critical_alarms: u16,
    pub(crate) minor_alarms: u16,
    pub(crate) decoding_status: u8,
    pub(crate) disciplining_activity: u8,
    pub(crate) spare_status: [u8; 2],
    pub(crate) pps_offset: f32,
    pub(crate) clock_offset: f32,
    pub(crate) dac_value: u32,
    pub(crate) dac_voltage: f32,
    pub(crate) temperature: f32,
    pub(crate) latitude: f64,
    pub(crate) longitude: f64,
    pub(crate) altitude: f64,
    pub(crate) quantization_error: f32,
}

impl SupplementalTiming {
    pub fn receiver_mode(&self) -> u8 {
        self.receiver_mode
    }

    pub fn disciplining_mode(&self) -> u8 {
        self.disciplining_mode
    }

    /// Percent
    pub fn survey_progress(&self) -> u8 {
        self.survey_progress
    }

    /// Seconds in holdover
    pub fn holdover(&self) -> u32 {
        self.holdover
    }

    pub fn critical_alarms(&self) -> u16 {
        self.critical_alarms
    }

    pub fn minor_alarms(&self) -> u16 {
        self.minor_alarms
    }

    pub fn decoding_status(&self) -> u8 {
        self.decoding_status
    }

    pub fn disciplining_activity(&self) -> u8 {
        self.disciplining_activity
    }

    pub fn spare_status(&self) -> [u8; 2] {
        self.spare_status
    }

    /// ns
    pub fn pps_offset(&self) -> f32 {
        self.pps_offset
    }

    /// 10 MHz offset in ppb
    pub fn clock_offset(&self) -> f32 {
        self.clock_offset
    }

    pub fn dac_value(&self) -> u32 {
        self.dac_value
    }

    /// Volts
    pub fn dac_voltage(&self) -> f32 {
        self.dac_voltage
    }

    /// Degrees Celsius
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Radians
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Radians
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Meters
    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    pub fn quantization_error(&self) -> f32 {
        self.quantization_error
    }
}

fn decode_primary_timing(
    cursor: &mut ByteCursor,
    state: &mut ReceiverState,
    ctx: &mut DecodeContext,
) {
    let timing = &mut state.primary_timing;
    timing.time_of_week = cursor.get_u32();
    timing.week = cursor.get_u16();
    timing.utc_offset = cursor.get_i16();
    timing.flags = TimingFlags::from_bits_retain(cursor.get_u8());
    timing.seconds = ctx.clamp(PRIMARY_LABEL, "seconds", cursor.get_u8(), 0..=60);
    timing.minutes = ctx.clamp(PRIMARY_LABEL, "minutes", cursor.get_u8(), 0..=59);
    timing.hours = ctx.clamp(PRIMARY_LABEL, "hours", cursor.get_u8(), 0..=23);
    timing.day = ctx.clamp(PRIMARY_LABEL, "day", cursor.get_u8(), 1..=31);
    timing.month = ctx.clamp(PRIMARY_LABEL, "month", cursor.get_u8(), 1..=12);
    timing.year = ctx.clamp(PRIMARY_LABEL, "year", cursor.get_u16(), 1980..=u16::MAX);
}

fn decode_supplemental_timing(
    cursor: &mut ByteCursor,
    state: &mut ReceiverState,
    ctx: &mut DecodeContext,
) {
    const LABEL: &str = SUPPLEMENTAL_LABEL;
    let timing = &mut state.supplemental_timing;
    timing.receiver_mode = ctx.clamp(LABEL, "receiver_mode", cursor.get_u8(), 0..=7);
    timing.disciplining_mode = ctx.clamp(LABEL, "disciplining_mode", cursor.get_u8(), 0..=6);
    timing.survey_progress = ctx.clamp(LABEL, "survey_progress", cursor.get_u8(), 0..=100);
    timing.holdover = cursor.get_u32();
    timing.critical_alarms = cursor.get_u16();
    timing.minor_alarms = cursor.get_u16();
    timing.decoding_status = cursor.get_u8();
    timing.disciplining_activity =
        ctx.clamp(LABEL, "disciplining_activity", cursor.get_u8(), 0..=8);
    timing.spare_status = cursor.get_bytes();
    timing.pps_offset = cursor.get_f32();
    timing.clock_offset = cursor.get_f32();
    timing.dac_value = cursor.get_u32();
    timing.dac_voltage = ctx.clamp(LABEL, "dac_voltage", cursor.get_f32(), -10.0..=10.0);
    timing.temperature = ctx.clamp(LABEL, "temperature", cursor.get_f32(), -55.0..=125.0);
    timing.latitude = ctx.clamp(LABEL, "latitude", cursor.get_f64(), -FRAC_PI_2..=FRAC_PI_2);
    timing.longitude = ctx.clamp(LABEL, "longitude", cursor.get_f64(), -PI..=PI);
    timing.altitude = cursor.get_f64();
    timing.quantization_error = cursor.get_f32();
    cursor.skip(4);
}

pub(crate) fn decode_superpacket(
    cursor: &mut ByteCursor,
    state: &mut ReceiverState,
    ctx: &mut DecodeContext,
) -> usize {
    let subcode = cursor.get_u8();
    match subcode {
        PRIMARY_TIMING_SUBCODE => {
            decode_primary_timing(cursor, state, ctx);
            1 + PRIMARY_TIMING_LEN
        },
        SUPPLEMENTAL_TIMING_SUBCODE => {
            decode_supplemental_timing(cursor, state, ctx);
            1 + SUPPLEMENTAL_TIMING_LEN
        },
        _ => {
            warn!(
                "superpacket 0x8f-{subcode:02x} not supported, {} bytes left unread",
                cursor.remaining()
            );
            1
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::packets::testing::Harness;
    use chrono::TimeZone;

    fn primary(seconds: u8, month: u8, year: u16) -> Vec<u8> {
        let mut bytes = vec![PRIMARY_TIMING_SUBCODE];
        bytes.extend(518_418u32.to_be_bytes());
        bytes.extend(2190u16.to_be_bytes());
        bytes.extend(18i16.to_be_bytes());
        bytes.push(0x03);
        bytes.extend([seconds, 0, 0, 1, month]);
        bytes.extend(year.to_be_bytes());
        bytes
    }

    fn supplemental(temperature: f32, latitude: f64) -> Vec<u8> {
        let mut bytes = vec![SUPPLEMENTAL_TIMING_SUBCODE, 0, 0, 100];
        bytes.extend(0u32.to_be_bytes());
        bytes.extend(0x0001u16.to_be_bytes());
        bytes.extend(0x0040u16.to_be_bytes());
        bytes.extend([0, 0, 0, 0]);
        bytes.extend(12.5f32.to_be_bytes());
        bytes.extend(0.25f32.to_be_bytes());
        bytes.extend(32_768u32.to_be_bytes());
        bytes.extend(1.5f32.to_be_bytes());
        bytes.extend(temperature.to_be_bytes());
        bytes.extend(latitude.to_be_bytes());
        bytes.extend((-1.2f64).to_be_bytes());
        bytes.extend(150.0f64.to_be_bytes());
        bytes.extend(0.5f32.to_be_bytes());
        bytes.extend([0u8; 4]);
        bytes
    }

    #[test]
    fn primary_timing_interpret() {
        let mut h = Harness::new();
        assert_eq!(h.run(decode_superpacket, &primary(0, 1, 2022)), 17);
        assert_eq!(h.cursor.remaining(), 0);
        let timing = h.state.primary_timing();
        assert_eq!(timing.time_of_week(), 518_418);
        assert_eq!(timing.week(), 2190);
        assert_eq!(timing.utc_offset(), 18);
        assert_eq!(timing.flags(), TimingFlags::UTC_TIME | TimingFlags::UTC_PPS);
        assert_eq!(
            timing.datetime(),
            Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).single()
        );
        assert_eq!(h.ctx.out_of_bounds(), None);
    }

    #[test]
    fn primary_timing_clamps() {
        let mut h = Harness::new();
        h.run(decode_superpacket, &primary(61, 13, 1970));
        let timing = h.state.primary_timing();
        assert_eq!(timing.seconds(), 60);
        assert_eq!(timing.month(), 12);
        assert_eq!(timing.year(), 1980);
        // last flagged field wins
        assert_eq!(h.ctx.out_of_bounds().map(|e| e.field), Some("year"));
    }

    #[test]
    fn leap_second_datetime() {
        let mut h = Harness::new();
        h.run(decode_superpacket, &primary(60, 1, 2022));
        let datetime = h.state.primary_timing().datetime();
        assert!(datetime.is_some());
        assert_eq!(h.ctx.out_of_bounds(), None);
    }

    #[test]
    fn supplemental_timing_interpret() {
        let mut h = Harness::new();
        assert_eq!(h.run(decode_superpacket, &supplemental(40.0, 0.6)), 68);
        assert_eq!(h.cursor.remaining(), 0);
        let timing = h.state.supplemental_timing();
        assert_eq!(timing.survey_progress(), 100);
        assert_eq!(timing.critical_alarms(), 1);
        assert_eq!(timing.minor_alarms(), 0x40);
        assert_eq!(timing.pps_offset(), 12.5);
        assert_eq!(timing.clock_offset(), 0.25);
        assert_eq!(timing.dac_value(), 32_768);
        assert_eq!(timing.dac_voltage(), 1.5);
        assert_eq!(timing.temperature(), 40.0);
        assert_eq!(timing.latitude(), 0.6);
        assert_eq!(timing.longitude(), -1.2);
        assert_eq!(timing.altitude(), 150.0);
        assert_eq!(timing.quantization_error(), 0.5);
        assert_eq!(h.ctx.out_of_bounds(), None);
    }

    #[test]
    fn supplemental_timing_clamps() {
        let mut h = Harness::new();
        h.run(decode_superpacket, &supplemental(200.0, 2.0));
        let timing = h.state.supplemental_timing();
        assert_eq!(timing.temperature(), 125.0);
        assert_eq!(timing.latitude(), FRAC_PI_2);
        assert_eq!(h.ctx.out_of_bounds().map(|e| e.field), Some("latitude"));
    }

    #[test]
    fn unknown_subcode_left_unread() {
        let mut h = Harness::new();
        assert_eq!(h.run(decode_superpacket, &[0x20, 1, 2, 3]), 1);
        assert_eq!(h.cursor.remaining(), 3);
    }
}
