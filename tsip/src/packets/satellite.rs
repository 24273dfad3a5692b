use log::debug;

use crate::{cursor::ByteCursor, dispatch::DecodeContext, state::ReceiverState};

const HEADER_LEN: usize = 4;
/// Operation code of a 0x58 report that carries data
pub const OPERATION_DATA_OUT: u8 = 2;

pub(crate) const ALMANAC_LEN: usize = 66;
pub(crate) const ALMANAC_HEALTH_LEN: usize = 37;
pub(crate) const IONOSPHERE_LEN: usize = 40;
pub(crate) const UTC_LEN: usize = 39;
pub(crate) const EPHEMERIS_LEN: usize = 167;

/// Almanac of one satellite (0x58 type 2)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Almanac {
    pub t_oa_raw: u8,
    pub health: u8,
    pub e: f32,
    pub t_oa: f32,
    pub i_0: f32,
    pub omega_dot: f32,
    pub sqrt_a: f32,
    pub omega_0: f32,
    pub omega: f32,
    pub m_0: f32,
    pub a_f0: f32,
    pub a_f1: f32,
    pub axis: f32,
    pub n: f32,
    pub omega_n: f32,
    pub odot_n: f32,
    pub t_zc: f32,
    pub week: i16,
    pub wn_oa: i16,
}

impl Almanac {
    fn read(cursor: &mut ByteCursor) -> Self {
        Self {
            t_oa_raw: cursor.get_u8(),
            health: cursor.get_u8(),
            e: cursor.get_f32(),
            t_oa: cursor.get_f32(),
            i_0: cursor.get_f32(),
            omega_dot: cursor.get_f32(),
            sqrt_a: cursor.get_f32(),
            omega_0: cursor.get_f32(),
            omega: cursor.get_f32(),
            m_0: cursor.get_f32(),
            a_f0: cursor.get_f32(),
            a_f1: cursor.get_f32(),
            axis: cursor.get_f32(),
            n: cursor.get_f32(),
            omega_n: cursor.get_f32(),
            odot_n: cursor.get_f32(),
            t_zc: cursor.get_f32(),
            week: cursor.get_i16(),
            wn_oa: cursor.get_i16(),
        }
    }
}

/// Health page of the almanac (0x58 type 3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlmanacHealth {
    pub week_a: u8,
    /// Indexed by PRN - 1
    pub health: [u8; 32],
    pub t_oa: u8,
    pub current_t_oa: u8,
    pub week: u16,
}

impl AlmanacHealth {
    fn read(cursor: &mut ByteCursor) -> Self {
        Self {
            week_a: cursor.get_u8(),
            health: cursor.get_bytes(),
            t_oa: cursor.get_u8(),
            current_t_oa: cursor.get_u8(),
            week: cursor.get_u16(),
        }
    }
}

/// Klobuchar ionosphere model (0x58 type 4)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ionosphere {
    pub alpha: [f32; 4],
    pub beta: [f32; 4],
}

impl Ionosphere {
    fn read(cursor: &mut ByteCursor) -> Self {
        cursor.skip(8);
        let mut iono = Self::default();
        for a in iono.alpha.iter_mut() {
            *a = cursor.get_f32();
        }
        for b in iono.beta.iter_mut() {
            *b = cursor.get_f32();
        }
        iono
    }
}

/// GPS to UTC parameters (0x58 type 5)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UtcParameters {
    pub a_0: f64,
    pub a_1: f32,
    /// Current leap seconds
    pub delta_t_ls: i16,
    pub t_ot: f32,
    pub wn_t: i16,
    pub wn_lsf: i16,
    pub dn: i16,
    /// Leap seconds after the next scheduled change
    pub delta_t_lsf: i16,
}

impl UtcParameters {
    fn read(cursor: &mut ByteCursor) -> Self {
        cursor.skip(13);
        Self {
            a_0: cursor.get_f64(),
            a_1: cursor.get_f32(),
            delta_t_ls: cursor.get_i16(),
            t_ot: cursor.get_f32(),
            wn_t: cursor.get_i16(),
            wn_lsf: cursor.get_i16(),
            dn: cursor.get_i16(),
            delta_t_lsf: cursor.get_i16(),
        }
    }
}

/// Broadcast ephemeris of one satellite (0x58 type 6)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ephemeris {
    pub sv: u8,
    pub t_ephem: f32,
    pub week: i16,
    pub code_l2: u8,
    pub l2_p_data: u8,
    pub sv_acc_raw: u8,
    pub health: u8,
    pub iodc: i16,
    pub t_gd: f32,
    pub t_oc: f32,
    pub a_f2: f32,
    pub a_f1: f32,
    pub a_f0: f32,
    pub sv_acc: f32,
    pub iode: u8,
    pub fit_interval: u8,
    pub c_rs: f32,
    pub delta_n: f32,
    pub m_0: f64,
    pub c_uc: f32,
    pub e: f64,
    pub c_us: f32,
    pub sqrt_a: f64,
    pub t_oe: f32,
    pub c_ic: f32,
    pub omega_0: f64,
    pub c_is: f32,
    pub i_0: f64,
    pub c_rc: f32,
    pub omega: f64,
    pub omega_dot: f32,
    pub idot: f32,
    pub axis: f64,
    pub n: f64,
    pub r1me2: f64,
    pub omega_n: f64,
    pub odot_n: f64,
}

impl Ephemeris {
    fn read(cursor: &mut ByteCursor) -> Self {
        Self {
            sv: cursor.get_u8(),
            t_ephem: cursor.get_f32(),
            week: cursor.get_i16(),
            code_l2: cursor.get_u8(),
            l2_p_data: cursor.get_u8(),
            sv_acc_raw: cursor.get_u8(),
            health: cursor.get_u8(),
            iodc: cursor.get_i16(),
            t_gd: cursor.get_f32(),
            t_oc: cursor.get_f32(),
            a_f2: cursor.get_f32(),
            a_f1: cursor.get_f32(),
            a_f0: cursor.get_f32(),
            sv_acc: cursor.get_f32(),
            iode: cursor.get_u8(),
            fit_interval: cursor.get_u8(),
            c_rs: cursor.get_f32(),
            delta_n: cursor.get_f32(),
            m_0: cursor.get_f64(),
            c_uc: cursor.get_f32(),
            e: cursor.get_f64(),
            c_us: cursor.get_f32(),
            sqrt_a: cursor.get_f64(),
            t_oe: cursor.get_f32(),
            c_ic: cursor.get_f32(),
            omega_0: cursor.get_f64(),
            c_is: cursor.get_f32(),
            i_0: cursor.get_f64(),
            c_rc: cursor.get_f32(),
            omega: cursor.get_f64(),
            omega_dot: cursor.get_f32(),
            idot: cursor.get_f32(),
            axis: cursor.get_f64(),
            n: cursor.get_f64(),
            r1me2: cursor.get_f64(),
            omega_n: cursor.get_f64(),
            odot_n: cursor.get_f64(),
        }
    }
}

/// Record carried by a 0x58 report, selected by its data type
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SatelliteRecord {
    Almanac(Almanac),
    AlmanacHealth(AlmanacHealth),
    Ionosphere(Ionosphere),
    Utc(UtcParameters),
    Ephemeris(Box<Ephemeris>),
}

/// Satellite system data (0x58)
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SatelliteData {
    pub(crate) operation: u8,
    pub(crate) data_type: u8,
    pub(crate) prn: u8,
    pub(crate) length: u8,
    pub(crate) record: Option<SatelliteRecord>,
}

impl SatelliteData {
    pub fn operation(&self) -> u8 {
        self.operation
    }

    pub fn data_type(&self) -> u8 {
        self.data_type
    }

    pub fn prn(&self) -> u8 {
        self.prn
    }

    /// Record length announced by the receiver
    pub fn length(&self) -> u8 {
        self.length
    }

    pub fn record(&self) -> Option<&SatelliteRecord> {
        self.record.as_ref()
    }
}

/// Fixed record length of a data type, `None` for types not decoded
fn record_len(data_type: u8) -> Option<usize> {
    match data_type {
        2 => Some(ALMANAC_LEN),
        3 => Some(ALMANAC_HEALTH_LEN),
        4 => Some(IONOSPHERE_LEN),
        5 => Some(UTC_LEN),
        6 => Some(EPHEMERIS_LEN),
        _ => None,
    }
}

pub(crate) fn decode_satellite_data(
    cursor: &mut ByteCursor,
    state: &mut ReceiverState,
    _ctx: &mut DecodeContext,
) -> usize {
    let data = &mut state.satellite_data;
    data.operation = cursor.get_u8();
    if data.operation != OPERATION_DATA_OUT {
        data.data_type = 0;
        data.prn = 0;
        data.length = 0;
        data.record = None;
        return 1;
    }
    data.data_type = cursor.get_u8();
    data.prn = cursor.get_u8();
    data.length = cursor.get_u8();
    let announced = usize::from(data.length);

    let Some(fixed) = record_len(data.data_type) else {
        debug!("satellite data type {} not decoded", data.data_type);
        data.record = None;
        cursor.skip(announced);
        return HEADER_LEN + announced;
    };
    if announced != fixed {
        debug!(
            "satellite data type {} announces {announced} bytes, record is {fixed}",
            data.data_type
        );
    }

    data.record = Some(match data.data_type {
        2 => SatelliteRecord::Almanac(Almanac::read(cursor)),
        3 => SatelliteRecord::AlmanacHealth(AlmanacHealth::read(cursor)),
        4 => SatelliteRecord::Ionosphere(Ionosphere::read(cursor)),
        5 => SatelliteRecord::Utc(UtcParameters::read(cursor)),
        _ => SatelliteRecord::Ephemeris(Box::new(Ephemeris::read(cursor))),
    });
    if announced > fixed {
        cursor.skip(announced - fixed);
    }
    HEADER_LEN + fixed.max(announced)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::packets::testing::Harness;

    fn header(data_type: u8, prn: u8, length: u8) -> Vec<u8> {
        vec![OPERATION_DATA_OUT, data_type, prn, length]
    }

    #[test]
    fn utc_parameters_interpret() {
        let mut payload = header(5, 0, 39);
        payload.extend([0u8; 13]);
        payload.extend(1.5e-9f64.to_be_bytes());
        payload.extend(2.0e-15f32.to_be_bytes());
        payload.extend(18i16.to_be_bytes());
        payload.extend(405_504.0f32.to_be_bytes());
        payload.extend(2190i16.to_be_bytes());
        payload.extend(1929i16.to_be_bytes());
        payload.extend(7i16.to_be_bytes());
        payload.extend(18i16.to_be_bytes());

        let mut h = Harness::new();
        assert_eq!(h.run(decode_satellite_data, &payload), 43);
        assert_eq!(h.cursor.remaining(), 0);
        let data = h.state.satellite_data();
        assert_eq!(data.data_type(), 5);
        let Some(SatelliteRecord::Utc(utc)) = data.record() else {
            panic!("expected UTC parameters, got {:?}", data.record());
        };
        assert_eq!(utc.a_0, 1.5e-9);
        assert_eq!(utc.delta_t_ls, 18);
        assert_eq!(utc.t_ot, 405_504.0);
        assert_eq!(utc.wn_t, 2190);
        assert_eq!(utc.dn, 7);
        assert_eq!(utc.delta_t_lsf, 18);
    }

    #[test]
    fn ionosphere_interpret() {
        let mut payload = header(4, 0, 40);
        payload.extend([0u8; 8]);
        for v in [1.0f32, 2.0, 3.0, 4.0, -1.0, -2.0, -3.0, -4.0] {
            payload.extend(v.to_be_bytes());
        }
        let mut h = Harness::new();
        h.run(decode_satellite_data, &payload);
        assert_eq!(
            h.state.satellite_data().record(),
            Some(&SatelliteRecord::Ionosphere(Ionosphere {
                alpha: [1.0, 2.0, 3.0, 4.0],
                beta: [-1.0, -2.0, -3.0, -4.0],
            }))
        );
    }

    #[test]
    fn almanac_health_with_padding() {
        let mut payload = header(3, 0, 39);
        payload.push(42);
        payload.extend((1..=32).map(|prn| if prn == 30 { 0x3f } else { 0 }));
        payload.extend([16, 17]);
        payload.extend(2190u16.to_be_bytes());
        payload.extend([0xee, 0xee]);

        let mut h = Harness::new();
        assert_eq!(h.run(decode_satellite_data, &payload), 43);
        assert_eq!(h.cursor.remaining(), 0);
        let Some(SatelliteRecord::AlmanacHealth(page)) = h.state.satellite_data().record() else {
            panic!("expected almanac health");
        };
        assert_eq!(page.week_a, 42);
        assert_eq!(page.health[29], 0x3f);
        assert_eq!(page.week, 2190);
    }

    #[test]
    fn ephemeris_reads_whole_record() {
        let mut payload = header(6, 17, 167);
        payload.push(17);
        payload.extend([0u8; 166]);
        let mut h = Harness::new();
        assert_eq!(h.run(decode_satellite_data, &payload), 171);
        assert_eq!(h.cursor.remaining(), 0);
        assert_eq!(h.cursor.error(), None);
        assert_eq!(h.state.satellite_data().prn(), 17);
        assert!(matches!(
            h.state.satellite_data().record(),
            Some(SatelliteRecord::Ephemeris(e)) if e.sv == 17
        ));
    }

    #[test]
    fn unknown_type_skipped() {
        let mut payload = header(9, 1, 3);
        payload.extend([1, 2, 3]);
        let mut h = Harness::new();
        assert_eq!(h.run(decode_satellite_data, &payload), 7);
        assert_eq!(h.state.satellite_data().record(), None);
        assert_eq!(h.cursor.remaining(), 0);
    }

    #[test]
    fn no_data_operation() {
        let mut h = Harness::new();
        assert_eq!(h.run(decode_satellite_data, &[3, 2, 5, 0]), 1);
        let data = h.state.satellite_data();
        assert_eq!(data.operation(), 3);
        assert_eq!(data.record(), None);
    }
}
