//! Palette color parsing
//!
//! Generated palettes are nominally hex strings, but anything a browser canvas
//! would accept as a fill style is honored:
//! - Hex: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`
//! - Functional: `rgb()`, `rgba()`, `hsl()`, `hsla()`, `hwb()`, `oklch()`
//! - Named: `red`, `blue`, `transparent`, etc.

use image::Rgba;
use lightningcss::traits::Parse;
use lightningcss::values::color::CssColor;
use thiserror::Error;

/// Error type for color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input string was empty (or only whitespace)
    #[error("empty color string")]
    Empty,
    /// Invalid length (must be 3, 4, 6, or 8 hex chars after #)
    #[error("invalid color length {0}, expected 3, 4, 6, or 8")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
    /// CSS parsing error from lightningcss
    #[error("CSS parse error: {0}")]
    CssParse(String),
}

/// Parse a palette color string into an RGBA color.
///
/// Hex strings take a fast path; every other form is handed to lightningcss.
///
/// # Examples
///
/// ```
/// use pixelbloom::color::parse_color;
///
/// assert_eq!(parse_color("#F00").unwrap(), image::Rgba([255, 0, 0, 255]));
/// assert_eq!(parse_color("#1a1a1e").unwrap(), image::Rgba([26, 26, 30, 255]));
/// assert_eq!(parse_color("blue").unwrap(), image::Rgba([0, 0, 255, 255]));
/// ```
///
/// # Errors
///
/// Returns `ColorError` if the input is empty or unparseable.
pub fn parse_color(s: &str) -> Result<Rgba<u8>, ColorError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ColorError::Empty);
    }

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex_color(hex);
    }

    parse_css_color(s)
}

/// Parse the digits of a hex color (without the leading `#`)
fn parse_hex_color(hex: &str) -> Result<Rgba<u8>, ColorError> {
    let digits = hex
        .chars()
        .map(|c| c.to_digit(16).map(|d| d as u8).ok_or(ColorError::InvalidHex(c)))
        .collect::<Result<Vec<u8>, _>>()?;

    match digits.as_slice() {
        // Short forms double each digit: #F00 -> #FF0000
        [r, g, b] => Ok(Rgba([r * 17, g * 17, b * 17, 255])),
        [r, g, b, a] => Ok(Rgba([r * 17, g * 17, b * 17, a * 17])),
        [r1, r2, g1, g2, b1, b2] => Ok(Rgba([r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2, 255])),
        [r1, r2, g1, g2, b1, b2, a1, a2] => Ok(Rgba([
            r1 * 16 + r2,
            g1 * 16 + g2,
            b1 * 16 + b2,
            a1 * 16 + a2,
        ])),
        other => Err(ColorError::InvalidLength(other.len())),
    }
}

/// Parse a CSS color using lightningcss (rgb, hsl, hwb, oklch, named colors)
fn parse_css_color(s: &str) -> Result<Rgba<u8>, ColorError> {
    let css_color = CssColor::parse_string(s).map_err(|e| ColorError::CssParse(e.to_string()))?;
    css_color_to_rgba(css_color)
}

/// Convert a lightningcss CssColor to RGBA
fn css_color_to_rgba(color: CssColor) -> Result<Rgba<u8>, ColorError> {
    use lightningcss::values::color::FloatColor;

    let rgb_color = color
        .to_rgb()
        .map_err(|_| ColorError::CssParse("cannot convert color to RGB".to_string()))?;

    match rgb_color {
        CssColor::RGBA(rgba) => Ok(Rgba([rgba.red, rgba.green, rgba.blue, rgba.alpha])),
        // Float colors show up when components have 'none' values
        CssColor::Float(float_color) => match float_color.as_ref() {
            FloatColor::RGB(rgb) => Ok(Rgba([
                (rgb.r * 255.0).round() as u8,
                (rgb.g * 255.0).round() as u8,
                (rgb.b * 255.0).round() as u8,
                (rgb.alpha * 255.0).round() as u8,
            ])),
            _ => Err(ColorError::CssParse("unexpected float color format".to_string())),
        },
        _ => Err(ColorError::CssParse("color conversion did not produce RGB".to_string())),
    }
}
