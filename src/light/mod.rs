mod area;
mod point;

pub use area::*;
pub use point::*;

use crate::{
    core::loader::InputParams,
    renderer::{Renderer, RendererT},
};

#[enum_dispatch::enum_dispatch(LightSpec)]
pub trait LightT {
    fn name(&self) -> &str;

    /// scene-description fragment of this light in the given renderer's format
    fn export(&self, renderer: &Renderer) -> String;
}

#[enum_dispatch::enum_dispatch]
#[derive(Debug, Clone, PartialEq)]
pub enum LightSpec {
    PointLight,
    AreaLight,
}

pub fn create_light_from_params(params: &mut InputParams) -> anyhow::Result<LightSpec> {
    params.set_name("light".into());
    let ty = params.get_str("type")?;
    let name = params.get_str("name")?;
    params.set_name(format!("light-{}-{}", ty, name).into());

    let res = match ty.as_str() {
        "point" => PointLight::load(name, params)?.into(),
        "area" => AreaLight::load(name, params)?.into(),
        _ => anyhow::bail!("{}: unknown type '{}'", params.name(), ty),
    };

    params.check_unused_keys();

    Ok(res)
}

fn load_power(params: &mut InputParams) -> anyhow::Result<f64> {
    let power = params.get_float("power")?;
    if power < 0.0 {
        log::warn!("{} - negative power {}", params.name(), power);
    }
    Ok(power)
}

impl LightT for PointLight {
    fn name(&self) -> &str {
        &self.name
    }

    fn export(&self, renderer: &Renderer) -> String {
        renderer.write_pointlight(self)
    }
}

impl LightT for AreaLight {
    fn name(&self) -> &str {
        &self.name
    }

    fn export(&self, renderer: &Renderer) -> String {
        renderer.write_arealight(self)
    }
}

#[cfg(test)]
mod tests {
    use std::convert::TryInto;

    use super::*;
    use crate::core::color::Color;

    fn load(json: serde_json::Value) -> anyhow::Result<LightSpec> {
        let mut params: InputParams = (&json).try_into()?;
        create_light_from_params(&mut params)
    }

    #[test]
    fn point_light_from_params() {
        let light = load(serde_json::json!({
            "type": "point",
            "name": "lamp",
            "location": [1, 2, 3],
            "color": [1, 0.5, 0],
            "power": 2,
        }))
        .unwrap();
        assert_eq!(light.name(), "lamp");
        match light {
            LightSpec::PointLight(point) => {
                assert_eq!(point.location, glam::DVec3::new(1.0, 2.0, 3.0));
                assert_eq!(point.power, 2.0);
            }
            _ => panic!("expected point light"),
        }
    }

    #[test]
    fn area_light_from_params() {
        let light = load(serde_json::json!({
            "type": "area",
            "name": "panel",
            "position": [0, 0, 5],
            "axis": [1, 0, 0],
            "angle": 3.141592653589793,
            "size_u": 2,
            "size_v": 1.5,
            "color": [1, 1, 1],
            "power": 10,
        }))
        .unwrap();
        match light {
            LightSpec::AreaLight(area) => {
                assert_eq!(area.placement.base, glam::DVec3::new(0.0, 0.0, 5.0));
                assert_eq!(area.size_u, 2.0);
                assert_eq!(area.size_v, 1.5);
            }
            _ => panic!("expected area light"),
        }
    }

    #[test]
    fn light_color_defaults_to_white() {
        let light = load(serde_json::json!({
            "type": "point",
            "name": "lamp",
            "location": [0, 0, 0],
            "power": 1,
        }))
        .unwrap();
        match light {
            LightSpec::PointLight(point) => assert_eq!(point.color, Color::WHITE),
            _ => panic!("expected point light"),
        }
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = load(serde_json::json!({ "type": "spot", "name": "s" })).unwrap_err();
        assert_eq!(err.to_string(), "light-spot-s: unknown type 'spot'");
    }
}
