//! Application state for one interactive session.
//!
//! All mutation goes through a handful of transitions: starting a generation,
//! finishing one, ticking playback, and toggling dithering. Views (the CLI,
//! a terminal player, a GUI host) read the state and render it.

use std::sync::Arc;
use std::time::Instant;

use crate::generate::{AnimationSource, GenerateError, GenerationRequest, Model};
use crate::models::{AnimationData, Frame};
use crate::output::{encode_png, OutputError};
use crate::playback::Playback;
use crate::renderer::{Canvas, Dither, RenderOptions};
use crate::spritesheet::{render_spritesheet, spritesheet_filename};

/// Proof that a generation was started. Results are only accepted for the
/// most recent ticket.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationTicket {
    id: u64,
    pub request: GenerationRequest,
}

impl GenerationTicket {
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// What happened to a finished generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    Installed,
    Failed,
    /// A newer generation was started; the result was dropped
    Stale,
}

/// A spritesheet ready to hand to the user.
#[derive(Debug, Clone)]
pub struct SpritesheetExport {
    pub filename: String,
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug)]
pub struct Session {
    pub prompt: String,
    pub model: Model,
    temperature: f32,
    playback: Playback,
    loading: bool,
    last_error: Option<String>,
    dithering: bool,
    issued: u64,
    in_flight: Option<u64>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new("", Model::default())
    }
}

impl Session {
    pub fn new(prompt: impl Into<String>, model: Model) -> Self {
        Self {
            prompt: prompt.into(),
            model,
            temperature: crate::generate::request::DEFAULT_TEMPERATURE,
            playback: Playback::new(),
            loading: false,
            last_error: None,
            dithering: false,
            issued: 0,
            in_flight: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Start a generation for the current prompt and model.
    ///
    /// Returns `None` without touching any state when the prompt is blank or
    /// a generation is already in flight. Otherwise the current animation is
    /// cleared, the frame index reset and the session marked loading.
    pub fn begin_generation(&mut self) -> Option<GenerationTicket> {
        if self.loading || self.prompt.trim().is_empty() {
            tracing::debug!(loading = self.loading, "generation request ignored");
            return None;
        }

        self.issued += 1;
        self.in_flight = Some(self.issued);
        self.loading = true;
        self.last_error = None;
        self.playback.clear();

        Some(GenerationTicket {
            id: self.issued,
            request: GenerationRequest::new(self.prompt.clone(), self.model)
                .with_temperature(self.temperature),
        })
    }

    /// Apply the result of a generation.
    ///
    /// Results for anything but the latest ticket are ignored. On success the
    /// animation replaces whatever was there; on failure the details are
    /// logged and the user sees one generic message.
    pub fn finish_generation(
        &mut self,
        ticket: &GenerationTicket,
        result: Result<AnimationData, GenerateError>,
        now: Instant,
    ) -> GenerationOutcome {
        if self.in_flight != Some(ticket.id) {
            tracing::debug!(ticket = ticket.id, "dropping result of superseded generation");
            return GenerationOutcome::Stale;
        }
        self.in_flight = None;
        self.loading = false;

        match result {
            Ok(animation) => {
                self.playback.install(Arc::new(animation), now);
                GenerationOutcome::Installed
            }
            Err(e) => {
                tracing::error!(error = %e, prompt = %ticket.request.prompt, "error generating animation");
                self.last_error = Some(e.user_message().to_string());
                GenerationOutcome::Failed
            }
        }
    }

    /// Begin, call the source, finish. `None` when the request was ignored.
    pub fn generate_with(&mut self, source: &dyn AnimationSource, now: Instant) -> Option<GenerationOutcome> {
        let ticket = self.begin_generation()?;
        let result = source.generate(&ticket.request);
        Some(self.finish_generation(&ticket, result, now))
    }

    /// Show an animation that did not come from a generation (a saved file).
    pub fn load(&mut self, animation: AnimationData, now: Instant) {
        self.last_error = None;
        self.playback.install(Arc::new(animation), now);
    }

    /// Drive playback. Returns the number of frame advances.
    pub fn tick(&mut self, now: Instant) -> u64 {
        self.playback.advance(now)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.playback.next_deadline()
    }

    pub fn toggle_dithering(&mut self) -> bool {
        self.dithering = !self.dithering;
        self.dithering
    }

    pub fn set_dithering(&mut self, enabled: bool) {
        self.dithering = enabled;
    }

    pub fn dithering(&self) -> bool {
        self.dithering
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn animation(&self) -> Option<&Arc<AnimationData>> {
        self.playback.animation()
    }

    pub fn frame_index(&self) -> usize {
        self.playback.frame_index()
    }

    pub fn current_frame(&self) -> Option<&Frame> {
        self.playback.current_frame()
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    /// "Frame i of n", or a placeholder when nothing is loaded.
    pub fn frame_readout(&self) -> String {
        match self.animation() {
            Some(anim) => format!("Frame {} of {}", self.frame_index() + 1, anim.frame_count()),
            None => "No animation loaded.".to_string(),
        }
    }

    /// "Frame cadence N ms", when an animation is loaded.
    pub fn cadence_readout(&self) -> Option<String> {
        self.animation()
            .map(|anim| format!("Frame cadence {} ms", anim.cadence_ms()))
    }

    /// Draw the frame on screen right now, with the session's dithering, onto
    /// `canvas`. With nothing loaded the canvas is cleared.
    ///
    /// Returns whether the picture changed since the canvas was last drawn.
    pub fn redraw(&self, canvas: &mut Canvas, pixel_size: u32) -> bool {
        let (Some(anim), Some(frame)) = (self.animation(), self.current_frame()) else {
            let had_image = canvas.image().is_some();
            canvas.clear();
            return had_image;
        };
        let options = RenderOptions::new(pixel_size, Dither::from_enabled(self.dithering));
        canvas.draw(frame, anim.resolved_palette(), &options)
    }

    /// The spritesheet download. `None` until an animation exists.
    pub fn export_spritesheet(&self) -> Option<Result<SpritesheetExport, OutputError>> {
        let anim = self.animation()?;
        let sheet = render_spritesheet(anim);
        let (width, height) = sheet.dimensions();
        Some(encode_png(&sheet).map(|png| SpritesheetExport {
            filename: spritesheet_filename(&self.prompt),
            png,
            width,
            height,
        }))
    }

    /// Tear down playback.
    pub fn shutdown(&mut self) {
        self.playback.shutdown();
    }
}
