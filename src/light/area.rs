use glam::DVec3;

use crate::core::{
    color::Color,
    loader::InputParams,
    placement::{Placement, Rotation},
};

#[derive(Debug, Clone, PartialEq)]
pub struct AreaLight {
    pub name: String,
    pub placement: Placement,
    pub size_u: f64,
    pub size_v: f64,
    pub color: Color,
    pub power: f64,
}

impl AreaLight {
    pub fn new(
        name: String,
        placement: Placement,
        size_u: f64,
        size_v: f64,
        color: Color,
        power: f64,
    ) -> Self {
        Self {
            name,
            placement,
            size_u,
            size_v,
            color,
            power,
        }
    }

    pub fn load(name: String, params: &mut InputParams) -> anyhow::Result<Self> {
        let base = params.get_float3("position")?.into();
        let axis = params.get_float3_or("axis", [0.0, 0.0, 1.0]).into();
        let angle = params.get_float_or("angle", 0.0);
        let size_u = params.get_float("size_u")?;
        let size_v = params.get_float("size_v")?;
        let color = params
            .get_float3("color")
            .map_or(Color::WHITE, Color::from);
        let power = super::load_power(params)?;

        Ok(Self::new(
            name,
            Placement::new(base, Rotation::new(axis, angle)),
            size_u,
            size_v,
            color,
            power,
        ))
    }

    /// return (axis u, axis v, emission direction)
    ///
    /// The direction is `u × v`; swapping the operands flips the lit side.
    pub fn axes(&self) -> (DVec3, DVec3, DVec3) {
        let rot = &self.placement.rotation;
        let axis_u = rot.mult_vec(DVec3::X);
        let axis_v = rot.mult_vec(DVec3::Y);
        (axis_u, axis_v, axis_u.cross(axis_v))
    }
}
