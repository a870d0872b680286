use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    core::scene::Scene,
    light::LightT,
    renderer::{Renderer, RendererT},
};

/// Marker replaced by the generated scene content inside a template.
pub const CONTENT_MARKER: &str = "<!-- RaytracingContent -->";

/// A render project: the scene-description file handed to the renderer and
/// the template the generated content is wrapped into.
pub struct Project {
    page_result: PathBuf,
    template: Option<String>,
}

impl Project {
    pub fn new<P: AsRef<Path>>(page_result: P) -> Self {
        Self {
            page_result: page_result.as_ref().to_path_buf(),
            template: None,
        }
    }

    pub fn with_template(mut self, template: String) -> Self {
        self.template = Some(template);
        self
    }

    pub fn load_template<P: AsRef<Path>>(self, path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let template = std::fs::read_to_string(path)
            .with_context(|| format!("project - can't read template '{}'", path.display()))?;
        Ok(self.with_template(template))
    }

    pub fn page_result(&self) -> &Path {
        &self.page_result
    }

    /// Wraps `content` into the template: the content marker is replaced,
    /// otherwise the content goes before the renderer's closing tag, or at
    /// the end of the template.
    pub fn compose(&self, renderer: &Renderer, content: &str) -> String {
        let template = self
            .template
            .as_deref()
            .unwrap_or_else(|| renderer.template());

        if template.contains(CONTENT_MARKER) {
            return template.replacen(CONTENT_MARKER, content, 1);
        }
        log::warn!("project - template has no '{}' marker", CONTENT_MARKER);
        if let Some(pos) = renderer.closing_tag().and_then(|tag| template.rfind(tag)) {
            let mut text = template.to_owned();
            text.insert_str(pos, content);
            text.insert(pos + content.len(), '\n');
            return text;
        }
        format!("{}{}\n", template, content)
    }

    /// Formats the whole scene (camera, objects, lights) and writes the
    /// scene-description file, returning its path.
    pub fn export(&self, renderer: &Renderer, scene: &Scene) -> anyhow::Result<PathBuf> {
        let mut content = String::new();

        match scene.camera() {
            Some(camera) => {
                log::debug!(
                    "camera '{}' looks at {:?}, up {:?}",
                    camera.name,
                    camera.target,
                    camera.up
                );
                content += &renderer.write_camera(camera);
            }
            None => log::warn!("project - scene has no camera"),
        }
        for object in scene.objects() {
            content += &renderer.write_object(
                &object.name,
                &object.mesh,
                object.color,
                object.opacity,
            );
        }
        for light in scene.lights() {
            content += &light.export(renderer);
        }

        log::info!(
            "{} objects, {} lights",
            scene.objects().len(),
            scene.lights().len()
        );

        let text = self.compose(renderer, &content);
        std::fs::write(&self.page_result, text).with_context(|| {
            format!(
                "project - can't write scene file '{}'",
                self.page_result.display()
            )
        })?;

        Ok(self.page_result.clone())
    }
}
