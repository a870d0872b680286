use glam::DVec3;

use crate::core::{color::Color, loader::InputParams};

#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    pub name: String,
    pub location: DVec3,
    pub color: Color,
    /// host-UI units, see `EMISSION_SCALE`
    pub power: f64,
}

impl PointLight {
    pub fn new(name: String, location: DVec3, color: Color, power: f64) -> Self {
        Self {
            name,
            location,
            color,
            power,
        }
    }

    pub fn load(name: String, params: &mut InputParams) -> anyhow::Result<Self> {
        let location = params.get_float3("location")?.into();
        let color = params
            .get_float3("color")
            .map_or(Color::WHITE, Color::from);
        let power = super::load_power(params)?;

        Ok(Self::new(name, location, color, power))
    }
}
