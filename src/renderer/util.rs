/// Spinner shown on the terminal while an external renderer blocks.
pub fn render_spinner(message: String) -> indicatif::ProgressBar {
    let spinner = indicatif::ProgressBar::new_spinner();
    spinner.set_style(
        indicatif::ProgressStyle::default_spinner().template("[{elapsed_precise}] {spinner} {msg}"),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(100);
    spinner
}

/// Logs the size of the rendered image, or warns when it can't be read back.
pub fn report_output_image(path: &std::path::Path) {
    match image::image_dimensions(path) {
        Ok((width, height)) => {
            log::info!("Rendered image '{}' ({}x{})", path.display(), width, height)
        }
        Err(e) => log::warn!("Can't read rendered image '{}': {}", path.display(), e),
    }
}
