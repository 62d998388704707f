//! Terminal rendering utilities for colored frame display
//!
//! Provides ANSI escape sequence generation for displaying frames with
//! true-color backgrounds in terminal emulators that support 24-bit color.

use image::{Rgba, RgbaImage};

use crate::models::ResolvedPalette;

/// ANSI escape sequence to reset all formatting
pub const ANSI_RESET: &str = "\x1b[0m";

/// Move the cursor to the top-left corner and clear the screen
pub const ANSI_CLEAR_HOME: &str = "\x1b[2J\x1b[H";

/// Convert RGBA color to ANSI 24-bit background escape sequence.
///
/// Transparent colors (alpha = 0) are rendered as a dark gray background
/// to visually distinguish them from opaque colors.
///
/// # Examples
///
/// ```
/// use pixelbloom::terminal::color_to_ansi_bg;
/// use image::Rgba;
///
/// assert_eq!(color_to_ansi_bg(Rgba([255, 0, 0, 255])), "\x1b[48;2;255;0;0m");
/// assert_eq!(color_to_ansi_bg(Rgba([0, 0, 0, 0])), "\x1b[48;5;236m");
/// ```
pub fn color_to_ansi_bg(rgba: Rgba<u8>) -> String {
    if rgba[3] == 0 {
        "\x1b[48;5;236m".to_string()
    } else {
        format!("\x1b[48;2;{};{};{}m", rgba[0], rgba[1], rgba[2])
    }
}

/// Render an image as lines of colored cells, two spaces per pixel so the
/// cells come out roughly square.
///
/// Meant for frames rendered at pixel size 1; larger surfaces work but get
/// wide quickly.
pub fn render_ansi_frame(image: &RgbaImage) -> String {
    let mut output = String::new();
    for y in 0..image.height() {
        for x in 0..image.width() {
            output.push_str(&color_to_ansi_bg(*image.get_pixel(x, y)));
            output.push_str("  ");
        }
        output.push_str(ANSI_RESET);
        output.push('\n');
    }
    output
}

/// One swatch per palette entry: a colored block followed by the raw string.
pub fn render_palette_swatches(palette: &[String], resolved: &ResolvedPalette) -> String {
    palette
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            let swatch = match resolved.get(i as i64) {
                Some(color) => format!("{}    {}", color_to_ansi_bg(color), ANSI_RESET),
                None => "  ??".to_string(),
            };
            format!("{} {}", swatch, raw)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
