use glam::{DQuat, DVec3};

/// Axis-angle rotation, angle in radians. The axis is kept normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    axis: DVec3,
    angle: f64,
}

impl Rotation {
    pub const IDENTITY: Rotation = Rotation {
        axis: DVec3::Z,
        angle: 0.0,
    };

    /// A null axis yields the identity rotation.
    pub fn new(axis: DVec3, angle: f64) -> Self {
        let len = axis.length();
        if len == 0.0 || !len.is_finite() {
            return Self::IDENTITY;
        }
        Self {
            axis: axis / len,
            angle,
        }
    }

    pub fn from_quat(quat: DQuat) -> Self {
        let (axis, angle) = quat.normalize().to_axis_angle();
        Self::new(axis, angle)
    }

    pub fn axis(&self) -> DVec3 {
        self.axis
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn to_quat(&self) -> DQuat {
        DQuat::from_axis_angle(self.axis, self.angle)
    }

    pub fn mult_vec(&self, v: DVec3) -> DVec3 {
        self.to_quat() * v
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Placement {
    pub base: DVec3,
    pub rotation: Rotation,
}

impl Placement {
    pub fn new(base: DVec3, rotation: Rotation) -> Self {
        Self { base, rotation }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: DVec3, b: DVec3) {
        assert!((a - b).length() < 1e-12, "{:?} != {:?}", a, b);
    }

    #[test]
    fn null_axis_is_identity() {
        let rot = Rotation::new(DVec3::ZERO, 1.0);
        assert_eq!(rot, Rotation::IDENTITY);
        assert_close(rot.mult_vec(DVec3::X), DVec3::X);
    }

    #[test]
    fn axis_is_normalized() {
        let rot = Rotation::new(DVec3::new(0.0, 0.0, 2.0), 0.5);
        assert_close(rot.axis(), DVec3::Z);
        assert_eq!(rot.angle(), 0.5);
    }

    #[test]
    fn quarter_turn_about_z() {
        let rot = Rotation::new(DVec3::Z, std::f64::consts::FRAC_PI_2);
        assert_close(rot.mult_vec(DVec3::X), DVec3::Y);
        assert_close(rot.mult_vec(DVec3::Y), -DVec3::X);
    }

    #[test]
    fn quat_round_trip_keeps_rotation() {
        let rot = Rotation::new(DVec3::new(1.0, 1.0, 0.0), 0.75);
        let back = Rotation::from_quat(rot.to_quat());
        assert_close(back.axis(), rot.axis());
        assert!((back.angle() - rot.angle()).abs() < 1e-12);
    }
}
