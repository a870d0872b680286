use std::collections::HashSet;

use crate::{
    camera::CameraSpec,
    core::{color::Color, loader::InputParams, mesh::Mesh},
    light::{LightSpec, LightT},
};

/// A host object ready for export: geometry plus its display material.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub name: String,
    pub mesh: Mesh,
    pub color: Color,
    /// in [0, 1], 1 being fully opaque
    pub opacity: f64,
}

impl SceneObject {
    pub fn new(name: String, mesh: Mesh, color: Color, opacity: f64) -> Self {
        Self {
            name,
            mesh,
            color,
            opacity: opacity.clamp(0.0, 1.0),
        }
    }

    pub fn load(params: &mut InputParams) -> anyhow::Result<Self> {
        params.set_name("object".into());
        let name = params.get_str("name")?;
        params.set_name(format!("object-{}", name).into());

        let mesh = if params.contains_key("file") {
            Mesh::load_obj(params.get_file_path("file")?)?
        } else {
            let vertices = params
                .get_float_2darray("vertices", None, Some(3))?
                .into_iter()
                .map(|v| glam::DVec3::new(v[0], v[1], v[2]))
                .collect();
            let faces = params
                .get_index_2darray("faces", None, Some(3))?
                .into_iter()
                .map(|f| [f[0], f[1], f[2]])
                .collect();
            Mesh::try_new(vertices, faces)
                .map_err(|e| anyhow::anyhow!("{} - {}", params.name(), e))?
        };

        let color: Color = params.get_float3_or("color", [0.8, 0.8, 0.8]).into();
        if !color.is_finite() {
            anyhow::bail!("{} - 'color' should be finite", params.name());
        }
        let opacity = params.get_float_or("opacity", 1.0);
        if !(0.0..=1.0).contains(&opacity) {
            log::warn!(
                "{} - opacity {} clamped to [0, 1]",
                params.name(),
                opacity
            );
        }

        params.check_unused_keys();

        Ok(Self::new(name, mesh, color, opacity))
    }
}

#[derive(Debug, Default)]
pub struct Scene {
    camera: Option<CameraSpec>,
    objects: Vec<SceneObject>,
    lights: Vec<LightSpec>,
    object_names: HashSet<String>,
    light_names: HashSet<String>,
}

impl Scene {
    pub fn set_camera(&mut self, camera: CameraSpec) -> anyhow::Result<()> {
        if self.camera.is_some() {
            anyhow::bail!("Camera has been set before");
        }
        self.camera = Some(camera);
        Ok(())
    }

    pub fn add_object(&mut self, object: SceneObject) -> anyhow::Result<()> {
        if !self.object_names.insert(object.name.clone()) {
            anyhow::bail!("Duplicated object name '{}'", object.name);
        }
        self.objects.push(object);
        Ok(())
    }

    pub fn add_light(&mut self, light: LightSpec) -> anyhow::Result<()> {
        if !self.light_names.insert(light.name().to_owned()) {
            anyhow::bail!("Duplicated light name '{}'", light.name());
        }
        self.lights.push(light);
        Ok(())
    }

    pub fn camera(&self) -> Option<&CameraSpec> {
        self.camera.as_ref()
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn lights(&self) -> &[LightSpec] {
        &self.lights
    }
}
