//! Spritesheet export - every frame side by side in one horizontal strip

use std::sync::OnceLock;

use image::{Rgba, RgbaImage};
use regex::{Captures, Regex};

use crate::models::{AnimationData, GRID_SIZE};

/// Transparent color for cells that are never painted
const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Longest filename stem taken from a prompt.
pub const MAX_STEM_LEN: usize = 30;

/// Stem used when nothing survives sanitization.
pub const FALLBACK_STEM: &str = "animation";

/// Composite all frames into a `16 * frame_count` by `16` strip, one image
/// pixel per logical pixel.
///
/// Unlike the interactive renderer there is no background fill: every cell
/// that resolves is painted (index 0 included) and the rest stays transparent.
///
/// # Examples
///
/// ```
/// use pixelbloom::models::{AnimationData, Frame};
/// use pixelbloom::spritesheet::render_spritesheet;
///
/// let anim = AnimationData::from_parts(
///     vec!["#000000".to_string(), "#FFFFFF".to_string()],
///     vec![Frame::filled(1), Frame::filled(0), Frame::filled(1)],
///     100,
/// ).unwrap();
/// let sheet = render_spritesheet(&anim);
/// assert_eq!(sheet.dimensions(), (48, 16));
/// ```
pub fn render_spritesheet(animation: &AnimationData) -> RgbaImage {
    let frame_count = animation.frame_count() as u32;
    let size = GRID_SIZE as u32;
    let mut sheet = RgbaImage::from_pixel(size * frame_count, size, TRANSPARENT);
    let palette = animation.resolved_palette();

    for (i, frame) in animation.frames().iter().enumerate() {
        let dest_x = i as u32 * size;
        for y in 0..GRID_SIZE {
            for x in 0..GRID_SIZE {
                let color = frame.cell(x, y).and_then(|index| palette.get(index));
                if let Some(color) = color {
                    sheet.put_pixel(dest_x + x as u32, y as u32, color);
                }
            }
        }
    }

    sheet
}

fn non_alphanumeric() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9]").expect("static pattern is valid"))
}

/// Turn a prompt into a filename stem.
///
/// Lowercases, replaces every character outside `[a-z0-9]` with `-`, keeps
/// at most 30 characters, and falls back to `"animation"` when no letter or
/// digit is left (a stem of only dashes names nothing).
///
/// Characters are counted in UTF-16 code units, so a character outside the
/// Basic Multilingual Plane (most emoji) becomes two dashes.
///
/// ```
/// use pixelbloom::spritesheet::sanitize_filename;
///
/// assert_eq!(sanitize_filename("A Campfire! @ Night"), "a-campfire----night");
/// assert_eq!(sanitize_filename("???"), "animation");
/// assert_eq!(sanitize_filename("🔥fire"), "--fire");
/// ```
pub fn sanitize_filename(prompt: &str) -> String {
    let lowered = prompt.to_lowercase();
    let replaced = non_alphanumeric().replace_all(&lowered, |caps: &Captures| {
        let units = caps[0].chars().next().map_or(1, char::len_utf16);
        "-".repeat(units)
    });
    // Only ASCII is left, one byte per code unit
    let stem: String = replaced.chars().take(MAX_STEM_LEN).collect();
    if stem.chars().all(|c| c == '-') {
        FALLBACK_STEM.to_string()
    } else {
        stem
    }
}

/// Suggested download name: `<stem>-spritesheet.png`.
pub fn spritesheet_filename(prompt: &str) -> String {
    format!("{}-spritesheet.png", sanitize_filename(prompt))
}
