use skiff_proto::Vec3;

/// Scene rotation derived from the accelerometer alone (radians).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Attitude {
    /// Rotation about the scene's x axis.
    pub pitch: f64,
    /// Rotation about the scene's z axis.
    pub roll: f64,
}

impl Attitude {
    pub fn from_accel(a: &Vec3) -> Self {
        Self {
            pitch: a.y.atan2(a.z),
            roll: a.x.atan2(a.z),
        }
    }

    /// The dashboard labels roll as "heading".
    pub fn heading_label(&self) -> String {
        degrees_label(self.roll.to_degrees())
    }
}

/// Rounds half up (toward +inf), so -0.5 becomes 0 and 2.5 becomes 3.
pub fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

pub fn degrees_label(deg: f64) -> String {
    format!("{}°", round_half_up(deg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_4;

    #[test]
    fn pitch_and_roll_from_gravity() {
        let a = Attitude::from_accel(&Vec3 { x: 0.0, y: 1.0, z: 1.0 });
        assert!((a.pitch - FRAC_PI_4).abs() < 1e-12);
        assert_eq!(a.roll, 0.0);

        let b = Attitude::from_accel(&Vec3 { x: 1.0, y: 0.0, z: 1.0 });
        assert!((b.roll - FRAC_PI_4).abs() < 1e-12);
        assert_eq!(b.heading_label(), "45°");
    }

    #[test]
    fn level_boat_reads_zero() {
        let a = Attitude::from_accel(&Vec3 { x: 0.0, y: 0.0, z: 9.81 });
        assert_eq!(a, Attitude { pitch: 0.0, roll: 0.0 });
        assert_eq!(a.heading_label(), "0°");
    }

    #[test]
    fn rounding() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-0.5), 0);
        assert_eq!(round_half_up(-0.7), -1);
        assert_eq!(round_half_up(89.49), 89);
    }
}
