use std::path::PathBuf;

use anyhow::Context;
use structopt::StructOpt;

mod camera;
mod core;
mod light;
mod loader;
mod renderer;

use crate::{
    core::{preferences::RenderPreferences, project::Project},
    renderer::RenderRequest,
};

#[derive(StructOpt)]
#[structopt(
    name = "cycles-exporter",
    about = "Export a host scene to a renderer scene description and render it"
)]
struct Opt {
    /// Scene json exported by the host application
    #[structopt(parse(from_os_str))]
    scene: PathBuf,

    /// Renderer preferences json (executable path, extra parameters, prefix)
    #[structopt(short, long, parse(from_os_str))]
    preferences: Option<PathBuf>,

    /// Scene-description file to write [default: <scene>.xml]
    #[structopt(long, parse(from_os_str))]
    project: Option<PathBuf>,

    /// Project template containing the content marker
    #[structopt(long, parse(from_os_str))]
    template: Option<PathBuf>,

    /// Rendered image [default: <scene>.png]
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,

    #[structopt(long, default_value = "800")]
    width: u32,

    #[structopt(long, default_value = "600")]
    height: u32,

    /// Inserted before the executable unless the `Prefix` preference is set
    #[structopt(long, default_value = "")]
    prefix: String,

    /// Run the renderer with its own UI instead of in the background
    #[structopt(long)]
    external: bool,

    #[structopt(long, default_value = "cycles")]
    renderer: String,

    /// Only write the scene description
    #[structopt(long)]
    no_render: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opt = Opt::from_args();
    let renderer = renderer::create_renderer(&opt.renderer)?;

    log::info!("Loading scene '{}'...", opt.scene.display());
    let scene = loader::load_scene(&opt.scene)?;

    let project_path = opt
        .project
        .clone()
        .unwrap_or_else(|| opt.scene.with_extension("xml"));
    let mut project = Project::new(&project_path);
    if let Some(template) = &opt.template {
        project = project.load_template(template)?;
    }
    log::info!("Exporting to '{}'...", project.page_result().display());
    let scene_path = project.export(&renderer, &scene)?;
    log::info!("Scene description written to '{}'", scene_path.display());

    if opt.no_render {
        return Ok(());
    }

    let mut prefs = match &opt.preferences {
        Some(path) => RenderPreferences::load(path)?,
        None => RenderPreferences::default(),
    };
    let output = match opt.output {
        Some(output) => output,
        None => opt.scene.with_extension("png"),
    };
    let request = RenderRequest {
        scene_path,
        prefix: opt.prefix,
        external: opt.external,
        output,
        width: opt.width,
        height: opt.height,
    };

    let begin_time = std::time::Instant::now();
    let output = renderer::render(&renderer, &mut prefs, &request).context("render failed")?;
    log::info!(
        "Finished '{}', time used: {:?}",
        output.display(),
        begin_time.elapsed()
    );

    Ok(())
}
