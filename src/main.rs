//! Pixel Bloom - command-line tool for generating and exporting pixel-art loops

use std::process::ExitCode;

use pixelbloom::cli;

fn main() -> ExitCode {
    cli::run()
}
