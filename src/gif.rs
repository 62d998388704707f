//! Looping GIF preview of an animation

use crate::models::AnimationData;
use crate::output::{ensure_parent_dir, OutputError};
use crate::renderer::{render_frame, RenderOptions};
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// GIF delays are stored in centiseconds; this converts a cadence and keeps
/// it at least one centisecond.
pub fn gif_delay_cs(cadence_ms: u32) -> u32 {
    (cadence_ms / 10).max(1)
}

/// Render every frame with the pixel renderer and write an infinitely
/// looping GIF that advances at the animation's cadence.
pub fn render_gif(animation: &AnimationData, options: &RenderOptions, path: &Path) -> Result<(), OutputError> {
    ensure_parent_dir(path)?;

    let file = File::create(path)?;
    let mut encoder = GifEncoder::new(BufWriter::new(file));
    encoder.set_repeat(Repeat::Infinite)?;

    let delay = Delay::from_numer_denom_ms(gif_delay_cs(animation.cadence_ms()) * 10, 1);
    let palette = animation.resolved_palette();
    for frame in animation.frames() {
        let image = render_frame(frame, palette, options);
        encoder.encode_frame(Frame::from_parts(image, 0, 0, delay))?;
    }

    tracing::debug!(
        path = %path.display(),
        frames = animation.frame_count(),
        cadence_ms = animation.cadence_ms(),
        "wrote gif"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Frame;
    use crate::renderer::Dither;
    use image::AnimationDecoder;
    use image::codecs::gif::GifDecoder;
    use tempfile::tempdir;

    fn animation(cadence_ms: i64) -> AnimationData {
        AnimationData::from_parts(
            vec!["#000000".into(), "#FF0000".into()],
            vec![Frame::filled(0), Frame::filled(1), Frame::filled(0)],
            cadence_ms,
        )
        .unwrap()
    }

    #[test]
    fn test_gif_delay_conversion() {
        assert_eq!(gif_delay_cs(150), 15);
        assert_eq!(gif_delay_cs(500), 50);
        assert_eq!(gif_delay_cs(5), 1);
    }

    #[test]
    fn test_render_gif_writes_all_frames() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preview/loop.gif");

        render_gif(&animation(200), &RenderOptions::new(2, Dither::Off), &path).unwrap();

        let decoder = GifDecoder::new(File::open(&path).unwrap()).unwrap();
        let frames = decoder.into_frames().collect_frames().unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].buffer().dimensions(), (32, 32));
        assert_eq!(frames[1].delay().numer_denom_ms(), (200, 1));
    }
}
