//! PNG output: files, in-memory bytes and data URLs

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{ImageOutputFormat, RgbaImage};
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    /// Serializing an animation to JSON failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Create the parent directory of `path` if it does not exist yet.
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Save an RGBA image to a PNG file, creating parent directories as needed.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    ensure_parent_dir(path)?;
    image.save_with_format(path, image::ImageFormat::Png)?;
    tracing::debug!(path = %path.display(), width = image.width(), height = image.height(), "wrote png");
    Ok(())
}

/// Encode an RGBA image as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, OutputError> {
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageOutputFormat::Png)?;
    Ok(bytes.into_inner())
}

/// Encode an RGBA image as a `data:image/png;base64,...` URL.
pub fn to_data_url(image: &RgbaImage) -> Result<String, OutputError> {
    let bytes = encode_png(image)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(bytes)))
}

/// Write raw bytes to `path`, creating parent directories as needed.
pub fn write_bytes(bytes: &[u8], path: &Path) -> Result<(), OutputError> {
    ensure_parent_dir(path)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Resolve where an export lands.
///
/// | `output` | Result |
/// |----------|--------|
/// | none | `default_dir/default_name` |
/// | ends with `/` or is a directory | `output/default_name` |
/// | anything else | `output` as given |
pub fn resolve_output_path(output: Option<&Path>, default_dir: &Path, default_name: &str) -> PathBuf {
    match output {
        Some(path) => {
            let is_dir = path.as_os_str().to_string_lossy().ends_with('/') || path.is_dir();
            if is_dir {
                path.join(default_name)
            } else {
                path.to_path_buf()
            }
        }
        None => default_dir.join(default_name),
    }
}
