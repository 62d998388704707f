//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod generate;
mod play;
mod render;
mod sheet;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use crate::config::{load_config, merge_cli_overrides, BloomConfig, CliOverrides, MAX_SCALE};
use crate::generate::Model;
use crate::models::AnimationData;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Pixel Bloom - sketch tiny stories in motion as looping 16x16 pixel art
#[derive(Parser)]
#[command(name = "bloom")]
#[command(about = "Pixel Bloom - generate, play and export looping 16x16 pixel-art animations")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG wins when set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to a bloom.toml (default: discovered from the current directory).
    /// Every command reads it; render, play and generate take their defaults from it.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate an animation from a prompt (requires API_KEY)
    Generate {
        /// Describe the loop, e.g. "a campfire crackling at night"
        prompt: String,

        /// Model to generate with
        #[arg(short, long, value_enum)]
        model: Option<Model>,

        /// Directory for the saved animation, spritesheet and GIF
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Pixel size for the GIF preview (1-64)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_SCALE as i64))]
        scale: Option<u32>,

        /// Apply the checkerboard dithering effect to previews
        #[arg(long)]
        dither: bool,

        /// Turn dithering off even when bloom.toml enables it
        #[arg(long, conflicts_with = "dither")]
        no_dither: bool,

        /// Also write a looping GIF preview
        #[arg(long)]
        gif: bool,

        /// Play the animation in the terminal afterwards
        #[arg(long)]
        play: bool,
    },
    /// Render one frame of a saved animation to PNG (or all frames to GIF)
    Render {
        /// Saved animation JSON
        input: PathBuf,

        /// Frame index (0-based)
        #[arg(short, long, default_value = "0")]
        frame: usize,

        /// Pixel size (1-64, default from config or 20)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_SCALE as i64))]
        scale: Option<u32>,

        /// Apply the checkerboard dithering effect
        #[arg(long)]
        dither: bool,

        /// Turn dithering off even when bloom.toml enables it
        #[arg(long, conflicts_with = "dither")]
        no_dither: bool,

        /// Write a looping GIF of every frame instead of one PNG
        #[arg(long)]
        gif: bool,

        /// Output file or directory (ends with /)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Strict mode: palette indices that do not resolve are errors
        #[arg(long)]
        strict: bool,
    },
    /// Export the spritesheet of a saved animation
    Sheet {
        /// Saved animation JSON
        input: PathBuf,

        /// Prompt used to name the file (default: input file name)
        #[arg(short, long)]
        prompt: Option<String>,

        /// Output file or directory (ends with /)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print a data:image/png URL instead of writing a file
        #[arg(long)]
        data_url: bool,

        /// Strict mode: palette indices that do not resolve are errors
        #[arg(long)]
        strict: bool,
    },
    /// Play a saved animation in the terminal
    Play {
        /// Saved animation JSON
        input: PathBuf,

        /// Apply the checkerboard dithering effect
        #[arg(long)]
        dither: bool,

        /// Turn dithering off even when bloom.toml enables it
        #[arg(long, conflicts_with = "dither")]
        no_dither: bool,

        /// Stop after this many loops (default: forever on a terminal, once otherwise)
        #[arg(long)]
        loops: Option<u32>,
    },
}

/// `--dither` / `--no-dither` as a config override. Neither flag leaves the
/// config value alone.
fn dither_override(dither: bool, no_dither: bool) -> Option<bool> {
    match (dither, no_dither) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

/// Set up the tracing subscriber. Logs go to stderr.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // A second init (tests driving `run` twice) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Load bloom.toml (explicit path or discovered) and apply CLI overrides.
pub(crate) fn resolve_config(path: Option<&Path>, overrides: &CliOverrides) -> Result<BloomConfig, ExitCode> {
    match load_config(path) {
        Ok(mut config) => {
            merge_cli_overrides(&mut config, overrides);
            Ok(config)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            Err(ExitCode::from(EXIT_INVALID_ARGS))
        }
    }
}

/// Read and validate a saved animation file.
pub(crate) fn load_animation(path: &Path) -> Result<AnimationData, ExitCode> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: Cannot open input file '{}': {}", path.display(), e);
            return Err(ExitCode::from(EXIT_INVALID_ARGS));
        }
    };
    AnimationData::from_json(&contents).map_err(|e| {
        eprintln!("Error: '{}' is not a valid animation: {}", path.display(), e);
        ExitCode::from(EXIT_INVALID_ARGS)
    })
}

/// In strict mode, report cells that do not resolve and fail.
pub(crate) fn check_strict(animation: &AnimationData, strict: bool) -> Result<(), ExitCode> {
    if !strict {
        return Ok(());
    }
    let unresolved = animation.unresolved_cells();
    if unresolved.is_empty() {
        return Ok(());
    }
    for cell in unresolved.iter().take(10) {
        eprintln!(
            "Error: frame {} cell ({}, {}) has value {} which does not resolve to a palette color",
            cell.frame, cell.x, cell.y, cell.value
        );
    }
    if unresolved.len() > 10 {
        eprintln!("Error: ... and {} more", unresolved.len() - 10);
    }
    Err(ExitCode::from(EXIT_ERROR))
}

/// Input file stem, used to name derived outputs.
pub(crate) fn input_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("animation")
        .to_string()
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Generate {
            prompt,
            model,
            out_dir,
            scale,
            dither,
            no_dither,
            gif,
            play,
        } => {
            let overrides = CliOverrides {
                model,
                scale,
                dither: dither_override(dither, no_dither),
                out_dir,
            };
            generate::run_generate(&prompt, config_path, &overrides, gif, play)
        }
        Commands::Render {
            input,
            frame,
            scale,
            dither,
            no_dither,
            gif,
            output,
            strict,
        } => {
            let overrides = CliOverrides {
                scale,
                dither: dither_override(dither, no_dither),
                ..Default::default()
            };
            render::run_render(&input, frame, config_path, &overrides, gif, output.as_deref(), strict)
        }
        Commands::Sheet {
            input,
            prompt,
            output,
            data_url,
            strict,
        } => sheet::run_sheet(&input, config_path, prompt.as_deref(), output.as_deref(), data_url, strict),
        Commands::Play {
            input,
            dither,
            no_dither,
            loops,
        } => {
            let overrides = CliOverrides {
                dither: dither_override(dither, no_dither),
                ..Default::default()
            };
            play::run_play(&input, config_path, &overrides, loops)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dither_flags_override_config() {
        assert_eq!(dither_override(false, false), None);
        assert_eq!(dither_override(true, false), Some(true));
        assert_eq!(dither_override(false, true), Some(false));
    }

    #[test]
    fn test_no_dither_conflicts_with_dither() {
        let result = Cli::try_parse_from(["bloom", "play", "anim.json", "--dither", "--no-dither"]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from(["bloom", "play", "anim.json", "--no-dither"]).unwrap();
        assert!(matches!(cli.command, Commands::Play { no_dither: true, dither: false, .. }));
    }
}
