use crate::{
    config::DecoderConfig,
    packets::{
        AlmanacHealthPage, DgpsMode, EcefPosition, EcefVelocity, GpsTime, HealthStatus, IoOptions,
        LastFixInfo, MachineStatus, OperatingParameters, OscillatorOffset, Position,
        PrimaryTiming, RawMeasurementTable, SatelliteData, SatelliteSelection, SetTimeResponse,
        SignalLevels, SoftwareVersion, SolutionStatus, SupplementalTiming, SystemMessage,
        TrackingTable, UnparsablePacket, Velocity,
    },
    tracking::{BoundedTable, RAW_MEASUREMENT_LABEL, TRACKING_LABEL},
};

/// Everything decoded so far. Each message overwrites the entity it targets,
/// the two tracking tables accumulate across messages.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReceiverState {
    pub(crate) gps_time: GpsTime,
    pub(crate) position: Position,
    pub(crate) ecef_position: EcefPosition,
    pub(crate) velocity: Velocity,
    pub(crate) ecef_velocity: EcefVelocity,
    pub(crate) solution: SolutionStatus,
    pub(crate) signal_levels: SignalLevels,
    pub(crate) raw_measurements: RawMeasurementTable,
    pub(crate) tracking: TrackingTable,
    pub(crate) version: SoftwareVersion,
    pub(crate) health: HealthStatus,
    pub(crate) machine: MachineStatus,
    pub(crate) dgps: DgpsMode,
    pub(crate) io_options: IoOptions,
    pub(crate) satellite_data: SatelliteData,
    pub(crate) system_message: SystemMessage,
    pub(crate) almanac_health: AlmanacHealthPage,
    pub(crate) operating_parameters: OperatingParameters,
    pub(crate) oscillator_offset: OscillatorOffset,
    pub(crate) set_time_response: SetTimeResponse,
    pub(crate) last_fix: LastFixInfo,
    pub(crate) satellite_selection: SatelliteSelection,
    pub(crate) unparsable: UnparsablePacket,
    pub(crate) primary_timing: PrimaryTiming,
    pub(crate) supplemental_timing: SupplementalTiming,
}

impl Default for ReceiverState {
    fn default() -> Self {
        Self::new(&DecoderConfig::default())
    }
}

impl ReceiverState {
    pub fn new(config: &DecoderConfig) -> Self {
        Self {
            gps_time: GpsTime::default(),
            position: Position::default(),
            ecef_position: EcefPosition::default(),
            velocity: Velocity::default(),
            ecef_velocity: EcefVelocity::default(),
            solution: SolutionStatus::default(),
            signal_levels: SignalLevels::default(),
            raw_measurements: BoundedTable::new(
                RAW_MEASUREMENT_LABEL,
                config.table_capacity,
                config.raw_measurement_policy,
            ),
            tracking: BoundedTable::new(
                TRACKING_LABEL,
                config.table_capacity,
                config.tracking_policy,
            ),
            version: SoftwareVersion::default(),
            health: HealthStatus::default(),
            machine: MachineStatus::default(),
            dgps: DgpsMode::default(),
            io_options: IoOptions::default(),
            satellite_data: SatelliteData::default(),
            system_message: SystemMessage::default(),
            almanac_health: AlmanacHealthPage::default(),
            operating_parameters: OperatingParameters::default(),
            oscillator_offset: OscillatorOffset::default(),
            set_time_response: SetTimeResponse::default(),
            last_fix: LastFixInfo::default(),
            satellite_selection: SatelliteSelection::default(),
            unparsable: UnparsablePacket::default(),
            primary_timing: PrimaryTiming::default(),
            supplemental_timing: SupplementalTiming::default(),
        }
    }

    /// 0x41
    pub fn gps_time(&self) -> &GpsTime {
        &self.gps_time
    }

    /// 0x4A, 0x84
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// 0x42, 0x83
    pub fn ecef_position(&self) -> &EcefPosition {
        &self.ecef_position
    }

    /// 0x56
    pub fn velocity(&self) -> &Velocity {
        &self.velocity
    }

    /// 0x43
    pub fn ecef_velocity(&self) -> &EcefVelocity {
        &self.ecef_velocity
    }

    /// 0x6D
    pub fn solution(&self) -> &SolutionStatus {
        &self.solution
    }

    /// 0x47
    pub fn signal_levels(&self) -> &SignalLevels {
        &self.signal_levels
    }

    /// 0x5A, reset on every 0x6D
    pub fn raw_measurements(&self) -> &RawMeasurementTable {
        &self.raw_measurements
    }

    /// 0x5C
    pub fn tracking(&self) -> &TrackingTable {
        &self.tracking
    }

    /// 0x45
    pub fn version(&self) -> &SoftwareVersion {
        &self.version
    }

    /// 0x46
    pub fn health(&self) -> &HealthStatus {
        &self.health
    }

    /// 0x4B
    pub fn machine(&self) -> &MachineStatus {
        &self.machine
    }

    /// 0x82
    pub fn dgps(&self) -> &DgpsMode {
        &self.dgps
    }

    /// 0x55
    pub fn io_options(&self) -> &IoOptions {
        &self.io_options
    }

    /// 0x58
    pub fn satellite_data(&self) -> &SatelliteData {
        &self.satellite_data
    }

    /// 0x48
    pub fn system_message(&self) -> &SystemMessage {
        &self.system_message
    }

    /// 0x49
    pub fn almanac_health(&self) -> &AlmanacHealthPage {
        &self.almanac_health
    }

    /// 0x4C
    pub fn operating_parameters(&self) -> &OperatingParameters {
        &self.operating_parameters
    }

    /// 0x4D
    pub fn oscillator_offset(&self) -> &OscillatorOffset {
        &self.oscillator_offset
    }

    /// 0x4E
    pub fn set_time_response(&self) -> &SetTimeResponse {
        &self.set_time_response
    }

    /// 0x57
    pub fn last_fix(&self) -> &LastFixInfo {
        &self.last_fix
    }

    /// 0x59
    pub fn satellite_selection(&self) -> &SatelliteSelection {
        &self.satellite_selection
    }

    /// 0x13
    pub fn unparsable(&self) -> &UnparsablePacket {
        &self.unparsable
    }

    /// 0x8F-AB
    pub fn primary_timing(&self) -> &PrimaryTiming {
        &self.primary_timing
    }

    /// 0x8F-AC
    pub fn supplemental_timing(&self) -> &SupplementalTiming {
        &self.supplemental_timing
    }

    /// Empties both tracking tables.
    pub fn reset_tables(&mut self) {
        self.raw_measurements.reset_cycle();
        self.tracking.clear();
    }
}
