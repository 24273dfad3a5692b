use crate::{cursor::ByteCursor, dispatch::DecodeContext, state::ReceiverState};

pub(crate) const VELOCITY_LEN: usize = 20;

/// East/north/up velocity fix (0x56)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Velocity {
    pub(crate) east: f32,
    pub(crate) north: f32,
    pub(crate) up: f32,
    pub(crate) clock_bias_rate: f32,
    pub(crate) time_of_fix: f32,
}

impl Velocity {
    /// m/s
    pub fn east(&self) -> f32 {
        self.east
    }

    pub fn north(&self) -> f32 {
        self.north
    }

    pub fn up(&self) -> f32 {
        self.up
    }

    /// m/s
    pub fn clock_bias_rate(&self) -> f32 {
        self.clock_bias_rate
    }

    pub fn time_of_fix(&self) -> f32 {
        self.time_of_fix
    }

    /// Horizontal speed over the ground in m/s
    pub fn ground_speed(&self) -> f32 {
        self.east.hypot(self.north)
    }

    /// Direction of travel in degrees clockwise from north, in [0, 360)
    pub fn heading_degrees(&self) -> f32 {
        self.east.atan2(self.north).to_degrees().rem_euclid(360.0)
    }
}

/// Earth-centered, earth-fixed velocity fix (0x43)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EcefVelocity {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) z: f32,
    pub(crate) clock_bias_rate: f32,
    pub(crate) time_of_fix: f32,
}

impl EcefVelocity {
    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn z(&self) -> f32 {
        self.z
    }

    pub fn clock_bias_rate(&self) -> f32 {
        self.clock_bias_rate
    }

    pub fn time_of_fix(&self) -> f32 {
        self.time_of_fix
    }
}

pub(crate) fn decode_enu_velocity(
    cursor: &mut ByteCursor,
    state: &mut ReceiverState,
    _ctx: &mut DecodeContext,
) -> usize {
    let vel = &mut state.velocity;
    vel.east = cursor.get_f32();
    vel.north = cursor.get_f32();
    vel.up = cursor.get_f32();
    vel.clock_bias_rate = cursor.get_f32();
    vel.time_of_fix = cursor.get_f32();
    VELOCITY_LEN
}

pub(crate) fn decode_ecef_velocity(
    cursor: &mut ByteCursor,
    state: &mut ReceiverState,
    _ctx: &mut DecodeContext,
) -> usize {
    let vel = &mut state.ecef_velocity;
    vel.x = cursor.get_f32();
    vel.y = cursor.get_f32();
    vel.z = cursor.get_f32();
    vel.clock_bias_rate = cursor.get_f32();
    vel.time_of_fix = cursor.get_f32();
    VELOCITY_LEN
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::packets::testing::Harness;

    fn payload(values: [f32; 5]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_be_bytes()).collect()
    }

    #[test]
    fn enu_velocity_interpret() {
        let mut h = Harness::new();
        assert_eq!(
            h.run(decode_enu_velocity, &payload([3.0, 4.0, -0.5, 0.25, 1.5])),
            20
        );
        let vel = h.state.velocity();
        assert_eq!(vel.east(), 3.0);
        assert_eq!(vel.north(), 4.0);
        assert_eq!(vel.up(), -0.5);
        assert_eq!(vel.clock_bias_rate(), 0.25);
        assert_eq!(vel.time_of_fix(), 1.5);
        assert_eq!(vel.ground_speed(), 5.0);
    }

    #[test]
    fn heading_is_clockwise_from_north() {
        let mut h = Harness::new();
        h.run(decode_enu_velocity, &payload([-1.0, 0.0, 0.0, 0.0, 0.0]));
        assert!((h.state.velocity().heading_degrees() - 270.0).abs() < 1e-4);
    }

    #[test]
    fn ecef_velocity_interpret() {
        let mut h = Harness::new();
        h.run(decode_ecef_velocity, &payload([1.0, -2.0, 3.0, 0.5, 9.0]));
        let vel = h.state.ecef_velocity();
        assert_eq!((vel.x(), vel.y(), vel.z()), (1.0, -2.0, 3.0));
        assert_eq!(vel.clock_bias_rate(), 0.5);
        assert_eq!(vel.time_of_fix(), 9.0);
    }
}
