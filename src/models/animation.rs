//! Animation data: the validated result of one generation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::palette::ResolvedPalette;

/// Width and height of every frame, in logical pixels.
pub const GRID_SIZE: usize = 16;

/// Error raised when a generation response cannot become an [`AnimationData`].
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing, empty, or out of its allowed range
    #[error("invalid animation data structure: {0}")]
    InvalidResponseShape(String),
    /// The payload is not JSON of the expected shape
    #[error("animation JSON could not be parsed: {0}")]
    Json(#[from] serde_json::Error),
}

impl ValidationError {
    fn shape(msg: impl Into<String>) -> Self {
        Self::InvalidResponseShape(msg.into())
    }
}

/// One frame: rows of palette indices, 16x16 by contract.
///
/// Rows are kept exactly as generated, cell values included. Short rows or
/// missing rows are tolerated and simply have no cell at those coordinates,
/// and a cell that is not an integer (null, a float, a string) reads as
/// absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frame(Vec<Vec<Value>>);

impl Frame {
    pub fn new(rows: Vec<Vec<i64>>) -> Self {
        Self(
            rows.into_iter()
                .map(|row| row.into_iter().map(Value::from).collect())
                .collect(),
        )
    }

    /// A full 16x16 frame with every cell set to `index`.
    pub fn filled(index: i64) -> Self {
        Self(vec![vec![Value::from(index); GRID_SIZE]; GRID_SIZE])
    }

    /// The palette index at column `x`, row `y`, if the generated grid has
    /// an integer there.
    pub fn cell(&self, x: usize, y: usize) -> Option<i64> {
        self.raw_cell(x, y).and_then(Value::as_i64)
    }

    fn raw_cell(&self, x: usize, y: usize) -> Option<&Value> {
        self.0.get(y).and_then(|row| row.get(x))
    }
}

/// The response shape as it arrives from the generation service.
///
/// Every field is optional so a missing field can be reported by name
/// instead of surfacing as an opaque deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAnimation {
    pub palette: Option<Vec<String>>,
    pub frames: Option<Vec<Frame>>,
    #[serde(rename = "cadenceMs")]
    pub cadence_ms: Option<i64>,
}

/// A validated animation. Immutable once built; a new generation replaces
/// it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimationData {
    palette: Vec<String>,
    frames: Vec<Frame>,
    #[serde(rename = "cadenceMs")]
    cadence_ms: u32,
    #[serde(skip)]
    resolved: ResolvedPalette,
}

/// A cell whose value does not resolve to a usable palette color.
#[derive(Debug, Clone, PartialEq)]
pub struct UnresolvedCell {
    pub frame: usize,
    pub x: usize,
    pub y: usize,
    /// The cell as generated: an out-of-range index, or not an index at all
    pub value: Value,
}

impl TryFrom<RawAnimation> for AnimationData {
    type Error = ValidationError;

    fn try_from(raw: RawAnimation) -> Result<Self, Self::Error> {
        let palette = match raw.palette {
            Some(p) if !p.is_empty() => p,
            Some(_) => return Err(ValidationError::shape("palette is empty")),
            None => return Err(ValidationError::shape("missing palette")),
        };
        let frames = match raw.frames {
            Some(f) if !f.is_empty() => f,
            Some(_) => return Err(ValidationError::shape("frames is empty")),
            None => return Err(ValidationError::shape("missing frames")),
        };
        let cadence_ms = match raw.cadence_ms {
            Some(ms) if ms > 0 => u32::try_from(ms)
                .map_err(|_| ValidationError::shape(format!("cadenceMs {} is too large", ms)))?,
            Some(ms) => {
                return Err(ValidationError::shape(format!("cadenceMs must be positive, got {}", ms)))
            }
            None => return Err(ValidationError::shape("missing cadenceMs")),
        };

        Ok(Self::new(palette, frames, cadence_ms))
    }
}

impl AnimationData {
    fn new(palette: Vec<String>, frames: Vec<Frame>, cadence_ms: u32) -> Self {
        let resolved = ResolvedPalette::from_colors(&palette);
        Self {
            palette,
            frames,
            cadence_ms,
            resolved,
        }
    }

    /// Build from already-typed parts, applying the same checks as a response.
    pub fn from_parts(
        palette: Vec<String>,
        frames: Vec<Frame>,
        cadence_ms: i64,
    ) -> Result<Self, ValidationError> {
        Self::try_from(RawAnimation {
            palette: Some(palette),
            frames: Some(frames),
            cadence_ms: Some(cadence_ms),
        })
    }

    /// Parse and validate a JSON document in the wire shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixelbloom::models::AnimationData;
    ///
    /// let anim = AnimationData::from_json(
    ///     r##"{"palette": ["#000000", "#FFCC00"], "frames": [[[0, 1]]], "cadenceMs": 120}"##,
    /// ).unwrap();
    /// assert_eq!(anim.frame_count(), 1);
    /// assert_eq!(anim.cadence_ms(), 120);
    ///
    /// assert!(AnimationData::from_json(r##"{"palette": ["#000"], "frames": [[[0]]]}"##).is_err());
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        let raw: RawAnimation = serde_json::from_str(json)?;
        Self::try_from(raw)
    }

    /// Serialize back to the wire shape.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn palette(&self) -> &[String] {
        &self.palette
    }

    pub fn resolved_palette(&self) -> &ResolvedPalette {
        &self.resolved
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn cadence_ms(&self) -> u32 {
        self.cadence_ms
    }

    /// Every cell in the 16x16 area whose value does not resolve.
    ///
    /// Missing cells (ragged rows) are not reported; they are simply absent.
    pub fn unresolved_cells(&self) -> Vec<UnresolvedCell> {
        let mut cells = Vec::new();
        for (frame_index, frame) in self.frames.iter().enumerate() {
            for y in 0..GRID_SIZE {
                for x in 0..GRID_SIZE {
                    let Some(value) = frame.raw_cell(x, y) else {
                        continue;
                    };
                    if value.as_i64().and_then(|i| self.resolved.get(i)).is_none() {
                        cells.push(UnresolvedCell {
                            frame: frame_index,
                            x,
                            y,
                            value: value.clone(),
                        });
                    }
                }
            }
        }
        cells
    }
}
