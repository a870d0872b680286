use std::{
    fmt,
    path::PathBuf,
    process::{Command, ExitStatus},
};

use super::{util, Renderer, RendererT};
use crate::core::preferences::RenderPreferences;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(
        "Unable to locate renderer executable. Please set the correct path in the '{key}' preference"
    )]
    RendererNotFound { key: String },
    #[error("invalid image size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("can't start renderer '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("renderer exited with {status}: {stderr}")]
    Process { status: ExitStatus, stderr: String },
}

/// One export + render invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    /// previously written scene-description file
    pub scene_path: PathBuf,
    /// used when the `Prefix` preference is empty
    pub prefix: String,
    /// run the renderer with its own UI instead of in the background
    pub external: bool,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl fmt::Display for RenderCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Assembles `<prefix> <executable> <extra-params> <renderer args>`.
///
/// Prefix and extra parameters are split on whitespace; the executable path
/// stays a single token.
pub fn build_command(
    renderer: &Renderer,
    prefs: &mut RenderPreferences,
    request: &RenderRequest,
) -> Result<RenderCommand, RenderError> {
    let path_key = format!("{}Path", renderer.preference_name());
    let params_key = format!("{}Parameters", renderer.preference_name());

    let mut prefix = prefs.get_string("Prefix", "");
    if prefix.is_empty() {
        prefix = request.prefix.trim().to_owned();
    }
    let renderer_path = prefs.get_string(&path_key, "");
    let extra_params = prefs.get_string(&params_key, "");

    if renderer_path.is_empty() {
        return Err(RenderError::RendererNotFound { key: path_key });
    }
    if request.width == 0 || request.height == 0 {
        return Err(RenderError::InvalidSize {
            width: request.width,
            height: request.height,
        });
    }

    let mut tokens = prefix
        .split_whitespace()
        .map(str::to_owned)
        .chain(std::iter::once(renderer_path));
    // the chain ends with the executable, so there is at least one token
    let program = tokens.next().unwrap_or_default();
    let mut args = tokens.collect::<Vec<_>>();
    args.extend(extra_params.split_whitespace().map(str::to_owned));
    args.extend(renderer.render_args(request));

    Ok(RenderCommand { program, args })
}

/// Runs the renderer synchronously and returns the output image path.
///
/// Unlike a fire-and-forget shell call, a nonzero exit status is reported as
/// `RenderError::Process` carrying the renderer's stderr.
pub fn render(
    renderer: &Renderer,
    prefs: &mut RenderPreferences,
    request: &RenderRequest,
) -> Result<PathBuf, RenderError> {
    let command = build_command(renderer, prefs, request).map_err(|err| {
        log::error!("{}", err);
        err
    })?;
    log::info!("{}", command);

    let spinner = if request.external {
        None
    } else {
        Some(util::render_spinner(format!(
            "Rendering {}x{} to '{}'",
            request.width,
            request.height,
            request.output.display()
        )))
    };
    let output = Command::new(&command.program)
        .args(&command.args)
        .output();
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let output = output.map_err(|source| RenderError::Spawn {
        program: command.program.clone(),
        source,
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    for line in stdout.lines() {
        log::debug!("{}", line);
    }
    if !output.status.success() {
        return Err(RenderError::Process {
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        });
    }

    util::report_output_image(&request.output);
    Ok(request.output.clone())
}
