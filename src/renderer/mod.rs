mod cycles;
mod invoke;
mod util;

pub use cycles::*;
pub use invoke::*;

use crate::{
    camera::CameraSpec,
    core::{color::Color, mesh::Mesh},
    light::{AreaLight, PointLight},
};

/// Conversion from host light power to renderer emission strength.
pub const EMISSION_SCALE: f64 = 100.0;

/// A renderer module: turns scene entities into fragments of the renderer's
/// scene-description format and knows how its executable is driven.
#[enum_dispatch::enum_dispatch(Renderer)]
pub trait RendererT {
    /// prefix of the preference keys, e.g. `Cycles` for `CyclesPath`
    fn preference_name(&self) -> &'static str;

    /// default project template, holding the content marker
    fn template(&self) -> &'static str;

    /// closing tag of the scene root, used when a template lacks the marker
    fn closing_tag(&self) -> Option<&'static str>;

    fn write_camera(&self, camera: &CameraSpec) -> String;

    fn write_object(&self, name: &str, mesh: &Mesh, color: Color, opacity: f64) -> String;

    fn write_pointlight(&self, light: &PointLight) -> String;

    fn write_arealight(&self, light: &AreaLight) -> String;

    /// arguments following the executable and the stored extra parameters
    fn render_args(&self, request: &RenderRequest) -> Vec<String>;
}

#[enum_dispatch::enum_dispatch]
#[derive(Debug, Clone, Copy)]
pub enum Renderer {
    CyclesRenderer,
}

pub fn create_renderer(ty: &str) -> anyhow::Result<Renderer> {
    match ty.to_ascii_lowercase().as_str() {
        "cycles" => Ok(CyclesRenderer.into()),
        _ => anyhow::bail!("renderer: unknown type '{}'", ty),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderer_names_are_case_insensitive() {
        let renderer = create_renderer("Cycles").unwrap();
        assert_eq!(renderer.preference_name(), "Cycles");
        assert!(create_renderer("luxcore").is_err());
    }
}
