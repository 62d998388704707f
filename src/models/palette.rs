//! Palette resolution: color strings to RGBA, indexed by cell value.

use image::Rgba;

use crate::color::parse_color;

/// A palette whose entries have been parsed once up front.
///
/// Entries that are empty or fail to parse stay `None`; cells pointing at
/// them are skipped by every renderer rather than reported as errors.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedPalette {
    colors: Vec<Option<Rgba<u8>>>,
}

impl ResolvedPalette {
    /// Parse every palette entry, logging the ones that cannot be used.
    pub fn from_colors(colors: &[String]) -> Self {
        let colors = colors
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                if raw.is_empty() {
                    return None;
                }
                match parse_color(raw) {
                    Ok(rgba) => Some(rgba),
                    Err(e) => {
                        tracing::warn!(index, color = %raw, error = %e, "unusable palette entry");
                        None
                    }
                }
            })
            .collect();
        Self { colors }
    }

    /// Look up a cell value. Negative or out-of-range indices resolve to `None`.
    pub fn get(&self, index: i64) -> Option<Rgba<u8>> {
        let index = usize::try_from(index).ok()?;
        self.colors.get(index).copied().flatten()
    }

    /// The background color (entry 0), if it resolves.
    pub fn background(&self) -> Option<Rgba<u8>> {
        self.get(0)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette(colors: &[&str]) -> ResolvedPalette {
        let owned: Vec<String> = colors.iter().map(|c| c.to_string()).collect();
        ResolvedPalette::from_colors(&owned)
    }

    #[test]
    fn test_resolves_in_range_indices() {
        let p = palette(&["#000000", "#FF0000", "#00FF00"]);
        assert_eq!(p.len(), 3);
        assert_eq!(p.background(), Some(Rgba([0, 0, 0, 255])));
        assert_eq!(p.get(2), Some(Rgba([0, 255, 0, 255])));
    }

    #[test]
    fn test_out_of_range_and_negative_are_unresolved() {
        let p = palette(&["#000000", "#FF0000", "#00FF00", "#0000FF", "#FFFFFF"]);
        assert_eq!(p.get(9), None);
        assert_eq!(p.get(5), None);
        assert_eq!(p.get(-1), None);
    }

    #[test]
    fn test_empty_and_bad_entries_are_unresolved() {
        let p = palette(&["", "#nothex", "#123456"]);
        assert_eq!(p.background(), None);
        assert_eq!(p.get(1), None);
        assert_eq!(p.get(2), Some(Rgba([0x12, 0x34, 0x56, 255])));
    }

    #[test]
    fn test_empty_palette() {
        let p = ResolvedPalette::default();
        assert!(p.is_empty());
        assert_eq!(p.background(), None);
    }
}
