use glam::{DMat3, DVec3};

use crate::core::{loader::InputParams, placement::Rotation};

/// Camera as seen by the host: the camera looks down its local -Z axis with
/// local +Y up.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraSpec {
    pub name: String,
    pub position: DVec3,
    pub rotation: Rotation,
    pub up: DVec3,
    pub target: DVec3,
}

impl CameraSpec {
    /// Orients a camera at `position` so that it faces `target`. A degenerate
    /// view direction leaves the camera unrotated.
    pub fn look_at(name: String, position: DVec3, target: DVec3, up: DVec3) -> Self {
        let forward = (target - position).normalize_or_zero();
        let right = forward.cross(up).normalize_or_zero();
        let rotation = if forward == DVec3::ZERO || right == DVec3::ZERO {
            log::warn!("camera-{} - can't orient towards target, keeping identity", name);
            Rotation::IDENTITY
        } else {
            let true_up = right.cross(forward);
            let basis = DMat3::from_cols(right, true_up, -forward);
            Rotation::from_quat(glam::DQuat::from_mat3(&basis))
        };
        Self {
            name,
            position,
            rotation,
            up,
            target,
        }
    }

    pub fn load(params: &mut InputParams) -> anyhow::Result<Self> {
        params.set_name("camera".into());
        let name = params.get_str("name")?;
        params.set_name(format!("camera-{}", name).into());

        let position: DVec3 = params.get_float3("position")?.into();
        let up: DVec3 = params.get_float3_or("up", [0.0, 1.0, 0.0]).into();

        let camera = if params.contains_key("axis") || params.contains_key("angle") {
            let axis = params.get_float3("axis")?.into();
            let angle = params.get_float("angle")?;
            let mut camera = Self {
                name,
                position,
                rotation: Rotation::new(axis, angle),
                up,
                target: position,
            };
            camera.target = if params.contains_key("target") {
                params.get_float3("target")?.into()
            } else {
                position + camera.view_direction()
            };
            camera
        } else {
            let target = params.get_float3("target")?.into();
            Self::look_at(name, position, target, up)
        };

        params.check_unused_keys();

        Ok(camera)
    }

    /// Direction the camera looks at, in world space.
    pub fn view_direction(&self) -> DVec3 {
        self.rotation.mult_vec(DVec3::new(0.0, 0.0, -1.0))
    }
}

#[cfg(test)]
mod tests {
    use std::convert::TryInto;

    use super::*;

    fn assert_close(a: DVec3, b: DVec3) {
        assert!((a - b).length() < 1e-9, "{:?} != {:?}", a, b);
    }

    #[test]
    fn look_at_faces_target() {
        let camera = CameraSpec::look_at(
            "cam".to_owned(),
            DVec3::new(0.0, -10.0, 0.0),
            DVec3::ZERO,
            DVec3::Z,
        );
        assert_close(camera.view_direction(), DVec3::Y);
        assert_close(camera.rotation.mult_vec(DVec3::Y), DVec3::Z);
    }

    #[test]
    fn look_at_degenerate_keeps_identity() {
        let camera = CameraSpec::look_at("cam".to_owned(), DVec3::ONE, DVec3::ONE, DVec3::Y);
        assert_eq!(camera.rotation, Rotation::IDENTITY);
    }

    #[test]
    fn explicit_rotation_wins_over_target() {
        let json = serde_json::json!({
            "name": "cam",
            "position": [1, 2, 3],
            "axis": [0, 0, 1],
            "angle": 1.5,
        });
        let mut params: InputParams = (&json).try_into().unwrap();
        let camera = CameraSpec::load(&mut params).unwrap();
        assert_eq!(camera.rotation, Rotation::new(DVec3::Z, 1.5));
        assert_close(camera.target, camera.position + camera.view_direction());
        assert_eq!(camera.up, DVec3::Y);
    }

    #[test]
    fn malformed_target_is_reported() {
        let json = serde_json::json!({
            "name": "cam",
            "position": [1, 2, 3],
            "axis": [0, 0, 1],
            "angle": 1.5,
            "target": [0, 0],
        });
        let mut params: InputParams = (&json).try_into().unwrap();
        let err = CameraSpec::load(&mut params).err().unwrap();
        assert!(err.to_string().contains("'target'"), "{}", err);
    }
}
