//! Render command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::config::CliOverrides;
use crate::gif::render_gif;
use crate::output::{resolve_output_path, save_png};
use crate::renderer::{render_frame, Dither, RenderOptions};

use super::{
    check_strict, input_stem, load_animation, resolve_config, EXIT_ERROR, EXIT_INVALID_ARGS,
    EXIT_SUCCESS,
};

/// Execute the render command
pub fn run_render(
    input: &Path,
    frame: usize,
    config_path: Option<&Path>,
    overrides: &CliOverrides,
    gif: bool,
    output: Option<&Path>,
    strict: bool,
) -> ExitCode {
    let config = match resolve_config(config_path, overrides) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let animation = match load_animation(input) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(code) = check_strict(&animation, strict) {
        return code;
    }

    let options = RenderOptions::new(config.render.scale, Dither::from_enabled(config.render.dither));
    let stem = input_stem(input);
    let default_dir = input.parent().unwrap_or_else(|| Path::new(""));

    if gif {
        let path = resolve_output_path(output, default_dir, &format!("{}.gif", stem));
        if let Err(e) = render_gif(&animation, &options, &path) {
            eprintln!("Error: Failed to write '{}': {}", path.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
        println!("Saved: {}", path.display());
        return ExitCode::from(EXIT_SUCCESS);
    }

    let Some(selected) = animation.frame(frame) else {
        eprintln!(
            "Error: Frame {} out of range (animation has {} frames)",
            frame,
            animation.frame_count()
        );
        return ExitCode::from(EXIT_INVALID_ARGS);
    };

    let image = render_frame(selected, animation.resolved_palette(), &options);
    let path = resolve_output_path(output, default_dir, &format!("{}_frame{}.png", stem, frame));
    if let Err(e) = save_png(&image, &path) {
        eprintln!("Error: Failed to write '{}': {}", path.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }
    println!("Saved: {} ({}x{})", path.display(), image.width(), image.height());
    ExitCode::from(EXIT_SUCCESS)
}
