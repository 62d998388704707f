//! Frame rendering to image buffers
//!
//! Each logical pixel of a 16x16 frame becomes a flat `pixel_size` square
//! block. The background color (palette entry 0) is filled first; every other
//! cell that resolves is painted on top.

use image::{Rgba, RgbaImage};

use crate::models::{Frame, ResolvedPalette, GRID_SIZE};

/// Default block size for interactive display.
pub const DEFAULT_PIXEL_SIZE: u32 = 20;

/// Transparent color used when the background does not resolve
const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Dithering applied to foreground (non-background) cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dither {
    #[default]
    Off,
    /// Checkerboard thinning: only cells where `x + y` is even are painted
    Checker,
}

impl Dither {
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            Dither::Checker
        } else {
            Dither::Off
        }
    }

    /// Whether the cell at (x, y) is thinned out by this pattern.
    pub fn skips(self, x: usize, y: usize) -> bool {
        match self {
            Dither::Off => false,
            Dither::Checker => (x + y) % 2 != 0,
        }
    }
}

/// Render options for a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Side length in surface pixels of one logical pixel
    pub pixel_size: u32,
    pub dither: Dither,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            pixel_size: DEFAULT_PIXEL_SIZE,
            dither: Dither::Off,
        }
    }
}

impl RenderOptions {
    pub fn new(pixel_size: u32, dither: Dither) -> Self {
        Self {
            pixel_size: pixel_size.max(1),
            dither,
        }
    }

    /// Side length of the rendered surface.
    pub fn surface_size(&self) -> u32 {
        GRID_SIZE as u32 * self.pixel_size.max(1)
    }
}

/// Render one frame to a fresh RGBA surface.
///
/// Cells holding index 0 are left to the background fill, and dithering
/// never thins them. Cells that are missing or do not resolve to a palette
/// color are skipped without error.
///
/// # Examples
///
/// ```
/// use pixelbloom::models::{Frame, ResolvedPalette};
/// use pixelbloom::renderer::{render_frame, Dither, RenderOptions};
///
/// let palette = ResolvedPalette::from_colors(&["#000000".to_string(), "#FF0000".to_string()]);
/// let image = render_frame(&Frame::filled(1), &palette, &RenderOptions::new(2, Dither::Off));
/// assert_eq!(image.dimensions(), (32, 32));
/// assert_eq!(*image.get_pixel(31, 31), image::Rgba([255, 0, 0, 255]));
/// ```
pub fn render_frame(frame: &Frame, palette: &ResolvedPalette, options: &RenderOptions) -> RgbaImage {
    let size = options.surface_size();
    let mut image = RgbaImage::from_pixel(size, size, TRANSPARENT);
    draw_frame(&mut image, frame, palette, options);
    image
}

/// Full redraw of `frame` onto an existing surface of the right size.
fn draw_frame(image: &mut RgbaImage, frame: &Frame, palette: &ResolvedPalette, options: &RenderOptions) {
    let background = palette.background().unwrap_or(TRANSPARENT);
    for pixel in image.pixels_mut() {
        *pixel = background;
    }

    let pixel_size = options.pixel_size.max(1);
    for y in 0..GRID_SIZE {
        for x in 0..GRID_SIZE {
            let Some(index) = frame.cell(x, y) else {
                continue;
            };
            if index == 0 {
                continue;
            }
            if options.dither.skips(x, y) {
                continue;
            }
            if let Some(color) = palette.get(index) {
                fill_block(image, x as u32 * pixel_size, y as u32 * pixel_size, pixel_size, color);
            }
        }
    }
}

/// Paint a flat square block, clipped to the surface.
pub(crate) fn fill_block(image: &mut RgbaImage, left: u32, top: u32, size: u32, color: Rgba<u8>) {
    let right = (left + size).min(image.width());
    let bottom = (top + size).min(image.height());
    for py in top..bottom {
        for px in left..right {
            image.put_pixel(px, py, color);
        }
    }
}

/// A drawing surface that remembers what it last showed.
///
/// Hosts call [`Canvas::draw`] whenever the frame, palette, pixel size or
/// dithering may have changed. Every call repaints the whole surface, so no
/// stale pixels from a previous frame survive.
#[derive(Debug, Default)]
pub struct Canvas {
    image: Option<RgbaImage>,
    last: Option<(Frame, ResolvedPalette, RenderOptions)>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Redraw the surface. Returns `true` when any input differs from the
    /// previous draw.
    pub fn draw(&mut self, frame: &Frame, palette: &ResolvedPalette, options: &RenderOptions) -> bool {
        let changed = match &self.last {
            Some((f, p, o)) => f != frame || p != palette || o != options,
            None => true,
        };

        let size = options.surface_size();
        let image = match self.image.take() {
            Some(existing) if existing.dimensions() == (size, size) => existing,
            _ => RgbaImage::new(size, size),
        };
        let image = self.image.insert(image);
        draw_frame(image, frame, palette, options);

        if changed {
            tracing::trace!(pixel_size = options.pixel_size, dither = ?options.dither, "canvas inputs changed");
            self.last = Some((frame.clone(), palette.clone(), *options));
        }
        changed
    }

    /// The current surface, if anything has been drawn.
    pub fn image(&self) -> Option<&RgbaImage> {
        self.image.as_ref()
    }

    /// Drop the surface, e.g. when no animation is loaded.
    pub fn clear(&mut self) {
        self.image = None;
        self.last = None;
    }
}
