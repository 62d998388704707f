//! Sheet command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::config::CliOverrides;
use crate::output::{resolve_output_path, save_png, to_data_url};
use crate::spritesheet::{render_spritesheet, spritesheet_filename};

use super::{check_strict, input_stem, load_animation, resolve_config, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the sheet command
pub fn run_sheet(
    input: &Path,
    config_path: Option<&Path>,
    prompt: Option<&str>,
    output: Option<&Path>,
    data_url: bool,
    strict: bool,
) -> ExitCode {
    // The sheet has no tunables, but a broken config is still an error
    if let Err(code) = resolve_config(config_path, &CliOverrides::default()) {
        return code;
    }
    let animation = match load_animation(input) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(code) = check_strict(&animation, strict) {
        return code;
    }

    let sheet = render_spritesheet(&animation);

    if data_url {
        return match to_data_url(&sheet) {
            Ok(url) => {
                println!("{}", url);
                ExitCode::from(EXIT_SUCCESS)
            }
            Err(e) => {
                eprintln!("Error: Failed to encode spritesheet: {}", e);
                ExitCode::from(EXIT_ERROR)
            }
        };
    }

    let prompt = prompt.map(str::to_string).unwrap_or_else(|| input_stem(input));
    let default_dir = input.parent().unwrap_or_else(|| Path::new(""));
    let path = resolve_output_path(output, default_dir, &spritesheet_filename(&prompt));
    if let Err(e) = save_png(&sheet, &path) {
        eprintln!("Error: Failed to write '{}': {}", path.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }
    println!("Saved: {} ({}x{})", path.display(), sheet.width(), sheet.height());
    ExitCode::from(EXIT_SUCCESS)
}
