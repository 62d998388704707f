//! Generate command implementation

use std::path::Path;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use crate::config::CliOverrides;
use crate::generate::gemini::GeminiClient;
use crate::generate::ApiKey;
use crate::gif::render_gif;
use crate::output::write_bytes;
use crate::renderer::{Dither, RenderOptions};
use crate::session::{GenerationOutcome, Session};
use crate::spritesheet::sanitize_filename;
use crate::terminal::render_palette_swatches;

use super::play::run_player;
use super::{resolve_config, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the generate command
pub fn run_generate(
    prompt: &str,
    config_path: Option<&Path>,
    overrides: &CliOverrides,
    gif: bool,
    play: bool,
) -> ExitCode {
    let config = match resolve_config(config_path, overrides) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let api_key = match ApiKey::from_env() {
        Ok(k) => k,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let client = match GeminiClient::new(
        api_key,
        config.generation.base_url.clone(),
        Duration::from_secs(config.generation.timeout_secs),
    ) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let mut session =
        Session::new(prompt, config.generation.model).with_temperature(config.generation.temperature);
    session.set_dithering(config.render.dither);

    eprintln!("Painting your story with {}...", config.generation.model.label());
    match session.generate_with(&client, Instant::now()) {
        None => {
            eprintln!("Error: Prompt must not be empty");
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
        Some(GenerationOutcome::Installed) => {}
        Some(_) => {
            eprintln!("Error: {}", session.last_error().unwrap_or("generation failed"));
            return ExitCode::from(EXIT_ERROR);
        }
    }

    let Some(animation) = session.animation().cloned() else {
        return ExitCode::from(EXIT_ERROR);
    };
    let out_dir = &config.output.dir;
    let stem = sanitize_filename(prompt);

    // Saved animation, the input format for render/sheet/play
    let json_path = out_dir.join(format!("{}.json", stem));
    let saved = animation
        .to_json_pretty()
        .map_err(crate::output::OutputError::from)
        .and_then(|json| write_bytes(json.as_bytes(), &json_path));
    if let Err(e) = saved {
        eprintln!("Error: Failed to write '{}': {}", json_path.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }
    println!("Saved: {}", json_path.display());

    match session.export_spritesheet() {
        Some(Ok(export)) => {
            let sheet_path = out_dir.join(&export.filename);
            if let Err(e) = write_bytes(&export.png, &sheet_path) {
                eprintln!("Error: Failed to write '{}': {}", sheet_path.display(), e);
                return ExitCode::from(EXIT_ERROR);
            }
            println!("Saved: {} ({}x{})", sheet_path.display(), export.width, export.height);
        }
        Some(Err(e)) => {
            eprintln!("Error: Failed to encode spritesheet: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
        None => {}
    }

    if gif {
        let gif_path = out_dir.join(format!("{}.gif", stem));
        let options = RenderOptions::new(config.render.scale, Dither::from_enabled(session.dithering()));
        if let Err(e) = render_gif(&animation, &options, &gif_path) {
            eprintln!("Error: Failed to write '{}': {}", gif_path.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
        println!("Saved: {}", gif_path.display());
    }

    println!("{} frames", animation.frame_count());
    if let Some(cadence) = session.cadence_readout() {
        println!("{}", cadence);
    }
    if atty::is(atty::Stream::Stdout) {
        println!("{}", render_palette_swatches(animation.palette(), animation.resolved_palette()));
    } else {
        println!("Palette: {}", animation.palette().join(" "));
    }

    if play {
        return run_player(&mut session, None);
    }

    session.shutdown();
    ExitCode::from(EXIT_SUCCESS)
}
