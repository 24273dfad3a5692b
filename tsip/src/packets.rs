mod dgps;
mod health;
mod io_options;
mod position;
mod raw;
mod receiver;
mod satellite;
mod signal;
mod status;
mod superpacket;
mod time;
mod velocity;
mod version;

pub use dgps::*;
pub use health::*;
pub use io_options::*;
pub use position::*;
pub use raw::*;
pub use receiver::*;
pub use satellite::*;
pub use signal::*;
pub use status::*;
pub use superpacket::*;
pub use time::*;
pub use velocity::*;
pub use version::*;

use crate::dispatch::DecodeFn;

/// Every message a Lassen-class receiver reports, with its decoder.
pub(crate) const LASSEN_PACKETS: &[(u8, &str, DecodeFn)] = &[
    (0x13, "unparsable packet", receiver::decode_unparsable),
    (0x41, "GPS time", time::decode_gps_time),
    (0x42, "single-precision XYZ position", position::decode_ecef_single),
    (0x43, "velocity fix XYZ", velocity::decode_ecef_velocity),
    (0x45, "software version", version::decode_software_version),
    (0x46, "health of receiver", health::decode_health),
    (0x47, "signal levels", signal::decode_signal_levels),
    (0x48, "GPS system message", receiver::decode_system_message),
    (0x49, "almanac health page", receiver::decode_almanac_health_page),
    (0x4a, "single-precision LLA position", position::decode_lla_single),
    (0x4b, "machine code/status", health::decode_machine_status),
    (0x4c, "operating parameters", receiver::decode_operating_parameters),
    (0x4d, "oscillator offset", receiver::decode_oscillator_offset),
    (0x4e, "response to set GPS time", receiver::decode_set_time_response),
    (0x55, "I/O options", io_options::decode_io_options),
    (0x56, "velocity fix ENU", velocity::decode_enu_velocity),
    (0x57, "information about last computed fix", receiver::decode_last_fix),
    (0x58, "satellite system data", satellite::decode_satellite_data),
    (0x59, "satellite enable/health status", receiver::decode_satellite_selection),
    (0x5a, "raw measurement data", raw::decode_raw_measurements),
    (0x5c, "satellite tracking status", raw::decode_tracking_status),
    (0x6d, "all-in-view satellite selection", status::decode_solution_status),
    (0x82, "DGPS position fix mode", dgps::decode_dgps_mode),
    (0x83, "double-precision XYZ position", position::decode_ecef_double),
    (0x84, "double-precision LLA position", position::decode_lla_double),
    (0x8f, "superpacket", superpacket::decode_superpacket),
];

#[cfg(test)]
pub(crate) mod testing {
    use chrono::{DateTime, TimeZone, Utc};

    use crate::{
        config::DecoderConfig,
        cursor::ByteCursor,
        dispatch::{DecodeContext, DecodeFn},
        state::ReceiverState,
    };

    pub(crate) fn fixed_clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_default()
    }

    /// Runs one decoder directly on a payload, without the frame around it.
    pub(crate) struct Harness {
        pub cursor: ByteCursor,
        pub state: ReceiverState,
        pub ctx: DecodeContext,
    }

    impl Harness {
        pub fn new() -> Self {
            Self::with_config(DecoderConfig::default())
        }

        pub fn with_config(config: DecoderConfig) -> Self {
            Self {
                cursor: ByteCursor::new(),
                state: ReceiverState::new(&config),
                ctx: DecodeContext::new(config).with_clock(fixed_clock),
            }
        }

        /// Returns the expected length reported by the decoder.
        pub fn run(&mut self, decode: DecodeFn, payload: &[u8]) -> usize {
            self.cursor.reset();
            self.cursor.put_buffer(payload);
            decode(&mut self.cursor, &mut self.state, &mut self.ctx)
        }
    }
}
