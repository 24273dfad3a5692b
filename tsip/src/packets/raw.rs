use log::{debug, warn};

use crate::{
    cursor::ByteCursor,
    dispatch::DecodeContext,
    state::ReceiverState,
    tracking::{BoundedTable, PrnKeyed},
};

pub(crate) const RAW_MEASUREMENT_LEN: usize = 25;
pub(crate) const TRACKING_STATUS_LEN: usize = 24;

/// Raw measurements of the current fix cycle (table A, 0x5A)
pub type RawMeasurementTable = BoundedTable<RawMeasurement>;

/// Tracking status per satellite (table B, 0x5C)
pub type TrackingTable = BoundedTable<TrackingStatus>;

/// One satellite's raw pseudorange measurement (0x5A)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawMeasurement {
    pub(crate) prn: u8,
    pub(crate) sample_length: f32,
    pub(crate) signal_level: f32,
    pub(crate) code_phase: f32,
    pub(crate) doppler: f32,
    pub(crate) time_of_measurement: f64,
}

impl RawMeasurement {
    /// Integration time in ms
    pub fn sample_length(&self) -> f32 {
        self.sample_length
    }

    pub fn signal_level(&self) -> f32 {
        self.signal_level
    }

    /// In 1/16 of a C/A code chip
    pub fn code_phase(&self) -> f32 {
        self.code_phase
    }

    /// Hz
    pub fn doppler(&self) -> f32 {
        self.doppler
    }

    /// GPS time of week in seconds
    pub fn time_of_measurement(&self) -> f64 {
        self.time_of_measurement
    }
}

impl PrnKeyed for RawMeasurement {
    fn prn(&self) -> u8 {
        self.prn
    }
}

/// One channel's tracking status (0x5C)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackingStatus {
    pub(crate) prn: u8,
    pub(crate) channel_code: u8,
    pub(crate) acquisition_flag: u8,
    pub(crate) ephemeris_flag: u8,
    pub(crate) signal_level: f32,
    pub(crate) time_of_last_measurement: f32,
    pub(crate) elevation: f32,
    pub(crate) azimuth: f32,
    pub(crate) old_measurement: u8,
    pub(crate) integer_msec: u8,
    pub(crate) bad_data: u8,
    pub(crate) data_collection: u8,
}

impl TrackingStatus {
    /// Channel number in bits 3-7, slot in bits 0-2
    pub fn channel_code(&self) -> u8 {
        self.channel_code
    }

    pub fn channel(&self) -> u8 {
        self.channel_code >> 3
    }

    /// 0 never acquired, 1 acquired, 2 re-opened search
    pub fn acquisition_flag(&self) -> u8 {
        self.acquisition_flag
    }

    pub fn is_acquired(&self) -> bool {
        self.acquisition_flag == 1
    }

    pub fn ephemeris_flag(&self) -> u8 {
        self.ephemeris_flag
    }

    pub fn has_ephemeris(&self) -> bool {
        self.ephemeris_flag != 0
    }

    pub fn signal_level(&self) -> f32 {
        self.signal_level
    }

    pub fn time_of_last_measurement(&self) -> f32 {
        self.time_of_last_measurement
    }

    /// Radians
    pub fn elevation(&self) -> f32 {
        self.elevation
    }

    /// Radians
    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn old_measurement(&self) -> u8 {
        self.old_measurement
    }

    pub fn integer_msec(&self) -> u8 {
        self.integer_msec
    }

    pub fn bad_data(&self) -> u8 {
        self.bad_data
    }

    pub fn data_collection(&self) -> u8 {
        self.data_collection
    }
}

impl PrnKeyed for TrackingStatus {
    fn prn(&self) -> u8 {
        self.prn
    }
}

impl RawMeasurementTable {
    /// Starts a new fix cycle.
    pub fn reset_cycle(&mut self) {
        self.clear();
    }
}

fn read_raw_measurement(cursor: &mut ByteCursor) -> RawMeasurement {
    RawMeasurement {
        prn: cursor.get_u8(),
        sample_length: cursor.get_f32(),
        signal_level: cursor.get_f32(),
        code_phase: cursor.get_f32(),
        doppler: cursor.get_f32(),
        time_of_measurement: cursor.get_f64(),
    }
}

pub(crate) fn decode_raw_measurements(
    cursor: &mut ByteCursor,
    state: &mut ReceiverState,
    _ctx: &mut DecodeContext,
) -> usize {
    let mut records = 0;
    while cursor.remaining() >= RAW_MEASUREMENT_LEN {
        let measurement = read_raw_measurement(cursor);
        records += 1;
        if let Err(e) = state.raw_measurements.push(measurement) {
            warn!("raw measurement for PRN {}: {e}", measurement.prn);
        }
    }
    debug!(
        "{records} raw measurements, {} in this cycle",
        state.raw_measurements.len()
    );
    // a record is expected even when the payload is short
    records.max(1) * RAW_MEASUREMENT_LEN
}

pub(crate) fn decode_tracking_status(
    cursor: &mut ByteCursor,
    state: &mut ReceiverState,
    _ctx: &mut DecodeContext,
) -> usize {
    let status = TrackingStatus {
        prn: cursor.get_u8(),
        channel_code: cursor.get_u8(),
        acquisition_flag: cursor.get_u8(),
        ephemeris_flag: cursor.get_u8(),
        signal_level: cursor.get_f32(),
        time_of_last_measurement: cursor.get_f32(),
        elevation: cursor.get_f32(),
        azimuth: cursor.get_f32(),
        old_measurement: cursor.get_u8(),
        integer_msec: cursor.get_u8(),
        bad_data: cursor.get_u8(),
        data_collection: cursor.get_u8(),
    };
    if status.acquisition_flag != 0 {
        if let Err(e) = state.tracking.upsert(status) {
            warn!("tracking status for PRN {}: {e}", status.prn);
        }
    }
    TRACKING_STATUS_LEN
}
