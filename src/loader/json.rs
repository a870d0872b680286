use std::{
    convert::TryInto,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    camera::CameraSpec,
    core::{
        loader::InputParams,
        scene::{Scene, SceneObject},
    },
    light,
};

/// Reads the host's scene export: `camera`, `objects` and `lights`. Each
/// field may also be a string naming a json file next to the scene file.
pub fn load_scene<P: AsRef<Path>>(path: P) -> anyhow::Result<Scene> {
    let path = path.as_ref().to_path_buf();
    let mut scene = Scene::default();

    let json_value = read_json(&path).context("scene - can't read scene file")?;

    if let Some(camera_value) = json_value.get("camera") {
        load_from_value_or_external(
            &mut scene,
            &path,
            camera_value,
            "json-camera",
            &load_camera,
            false,
        )?;
    } else {
        log::warn!("scene - There is no 'camera' field");
    }

    let object_value = json_value
        .get("objects")
        .context("scene - There is no 'objects' field")?;
    load_from_value_or_external(
        &mut scene,
        &path,
        object_value,
        "json-objects",
        &load_object,
        true,
    )?;

    if let Some(light_value) = json_value.get("lights") {
        load_from_value_or_external(
            &mut scene,
            &path,
            light_value,
            "json-lights",
            &load_light,
            true,
        )?;
    }

    Ok(scene)
}

fn load_camera(scene: &mut Scene, params: &mut InputParams) -> anyhow::Result<()> {
    scene.set_camera(CameraSpec::load(params)?)
}

fn load_object(scene: &mut Scene, params: &mut InputParams) -> anyhow::Result<()> {
    scene.add_object(SceneObject::load(params)?)
}

fn load_light(scene: &mut Scene, params: &mut InputParams) -> anyhow::Result<()> {
    scene.add_light(light::create_light_from_params(params)?)
}

fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let json_file = std::fs::File::open(path)
        .with_context(|| format!("can't open '{}'", path.display()))?;
    let json_reader = std::io::BufReader::new(json_file);
    let json_value = serde_json::from_reader(json_reader)
        .with_context(|| format!("'{}' is not valid json", path.display()))?;
    Ok(json_value)
}

fn load_from_object<F: Fn(&mut Scene, &mut InputParams) -> anyhow::Result<()>>(
    scene: &mut Scene,
    path: &PathBuf,
    value: &serde_json::Value,
    load_func: &F,
) -> anyhow::Result<()> {
    let mut params: InputParams = value.try_into()?;
    params.set_base_path(path.clone());
    load_func(scene, &mut params)
}

fn load_from_value_or_external<F: Fn(&mut Scene, &mut InputParams) -> anyhow::Result<()>>(
    scene: &mut Scene,
    path: &PathBuf,
    value: &serde_json::Value,
    env: &str,
    load_func: &F,
    allow_array: bool,
) -> anyhow::Result<()> {
    if let Some(json_path) = value.as_str() {
        let external_path = path.with_file_name(json_path);
        let json_value = read_json(&external_path)
            .with_context(|| format!("{} - External json file not found", env))?;
        load_from_value_or_external(scene, path, &json_value, env, load_func, allow_array)?;
    } else if let Some(array) = value.as_array() {
        if allow_array {
            for ele in array {
                load_from_object(scene, path, ele, load_func)?;
            }
        } else {
            anyhow::bail!("{} - Field should not be an array", env);
        }
    } else {
        load_from_object(scene, path, value, load_func)?;
    }

    Ok(())
}
