//! End-to-end tests of the library pipeline: generate through a source,
//! install into a session, play back, render and export.

use std::cell::RefCell;
use std::time::{Duration, Instant};

use image::Rgba;
use pixelbloom::generate::{AnimationSource, GenerateError, GenerationRequest, Model, USER_FACING_ERROR};
use pixelbloom::models::{AnimationData, Frame, ValidationError};
use pixelbloom::renderer::{render_frame, Canvas, Dither, RenderOptions};
use pixelbloom::session::{GenerationOutcome, Session};
use pixelbloom::spritesheet::{render_spritesheet, sanitize_filename};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Replays canned results and records the requests it saw.
struct ScriptedSource {
    results: RefCell<Vec<Result<AnimationData, GenerateError>>>,
    seen: RefCell<Vec<GenerationRequest>>,
}

impl ScriptedSource {
    fn new(results: Vec<Result<AnimationData, GenerateError>>) -> Self {
        Self {
            results: RefCell::new(results),
            seen: RefCell::new(Vec::new()),
        }
    }
}

impl AnimationSource for ScriptedSource {
    fn generate(&self, request: &GenerationRequest) -> Result<AnimationData, GenerateError> {
        self.seen.borrow_mut().push(request.clone());
        self.results.borrow_mut().remove(0)
    }
}

fn two_color(frames: Vec<Frame>, cadence_ms: i64) -> AnimationData {
    AnimationData::from_parts(vec!["#000000".into(), "#FF0000".into()], frames, cadence_ms).unwrap()
}

fn blinking(frame_count: usize, cadence_ms: i64) -> AnimationData {
    let frames = (0..frame_count)
        .map(|i| Frame::filled(if i % 2 == 0 { 1 } else { 0 }))
        .collect();
    two_color(frames, cadence_ms)
}

#[test]
fn test_generation_installs_and_plays() {
    let source = ScriptedSource::new(vec![Ok(blinking(4, 100))]);
    let mut session = Session::new("a blinking light", Model::Pro);
    let start = Instant::now();

    let outcome = session.generate_with(&source, start);
    assert_eq!(outcome, Some(GenerationOutcome::Installed));
    assert!(!session.is_loading());
    assert_eq!(session.frame_index(), 0);
    assert_eq!(session.frame_readout(), "Frame 1 of 4");
    assert_eq!(session.cadence_readout().as_deref(), Some("Frame cadence 100 ms"));

    let seen = source.seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].prompt, "a blinking light");
    assert_eq!(seen[0].model, Model::Pro);
    drop(seen);

    // After k cadence periods the index is k mod n
    for k in 1..=9u32 {
        session.tick(start + Duration::from_millis(100) * k);
        assert_eq!(session.frame_index(), k as usize % 4);
    }
}

#[test]
fn test_failed_generation_keeps_nothing() {
    let malformed = AnimationData::from_json(r##"{"palette": ["#000"]}"##).unwrap_err();
    assert!(matches!(malformed, ValidationError::InvalidResponseShape(_)));

    let source = ScriptedSource::new(vec![
        Ok(blinking(2, 100)),
        Err(GenerateError::MalformedResponse(malformed)),
    ]);
    let mut session = Session::new("first", Model::Flash);
    session.generate_with(&source, Instant::now());
    assert!(session.animation().is_some());

    session.prompt = "second".into();
    let outcome = session.generate_with(&source, Instant::now());
    assert_eq!(outcome, Some(GenerationOutcome::Failed));
    // A new request clears the previous animation before the result is known
    assert!(session.animation().is_none());
    assert_eq!(session.last_error(), Some(USER_FACING_ERROR));
    assert_eq!(session.frame_readout(), "No animation loaded.");
    assert!(session.next_deadline().is_none());
    assert!(session.export_spritesheet().is_none());
}

#[test]
fn test_superseded_result_is_dropped() {
    let mut session = Session::new("first", Model::Flash);
    let now = Instant::now();

    let first = session.begin_generation().expect("should start");
    // In flight: a second request is ignored
    assert!(session.begin_generation().is_none());
    session.finish_generation(&first, Ok(blinking(2, 100)), now);

    let second = session.begin_generation().expect("should start again");
    assert_eq!(session.finish_generation(&first, Ok(blinking(3, 50)), now), GenerationOutcome::Stale);
    assert!(session.is_loading());
    assert_eq!(session.finish_generation(&second, Ok(blinking(5, 80)), now), GenerationOutcome::Installed);
    assert_eq!(session.animation().map(|a| a.frame_count()), Some(5));
}

#[test]
fn test_replacing_animation_keeps_one_timer() {
    let mut session = Session::new("loop", Model::Flash);
    let start = Instant::now();

    session.load(blinking(3, 100), start);
    let first_timer = session.playback().timer_id();
    session.load(blinking(2, 40), start);
    let second_timer = session.playback().timer_id();

    assert!(first_timer.is_some());
    assert_ne!(first_timer, second_timer);
    assert_eq!(session.frame_index(), 0);
    assert_eq!(session.next_deadline(), Some(start + Duration::from_millis(40)));
}

#[test]
fn test_redraw_respects_dithering() {
    let mut canvas = Canvas::new();
    let mut session = Session::new("solid", Model::Flash);
    session.load(two_color(vec![Frame::filled(1)], 100), Instant::now());

    session.redraw(&mut canvas, 1);
    let plain = canvas.image().unwrap();
    assert_eq!(plain.dimensions(), (16, 16));
    assert!(plain.pixels().all(|p| *p == RED));

    assert!(session.toggle_dithering());
    session.redraw(&mut canvas, 1);
    let dithered = canvas.image().unwrap();
    for y in 0..16u32 {
        for x in 0..16u32 {
            let expected = if (x + y) % 2 == 0 { RED } else { BLACK };
            assert_eq!(*dithered.get_pixel(x, y), expected, "cell ({x}, {y})");
        }
    }
}

#[test]
fn test_render_reaches_every_pixel() {
    let anim = blinking(1, 100);
    let options = RenderOptions::new(20, Dither::Off);
    let image = render_frame(&anim.frames()[0], anim.resolved_palette(), &options);
    assert_eq!(image.dimensions(), (320, 320));
    assert!(image.pixels().all(|p| *p == RED));
}

#[test]
fn test_spritesheet_export() {
    let source = ScriptedSource::new(vec![Ok(blinking(5, 100))]);
    let mut session = Session::new("A Campfire! @ Night", Model::Flash);
    session.generate_with(&source, Instant::now());

    let export = session.export_spritesheet().unwrap().unwrap();
    assert_eq!(export.filename, "a-campfire----night-spritesheet.png");
    assert_eq!((export.width, export.height), (80, 16));

    let decoded = image::load_from_memory(&export.png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (80, 16));
    // Frame 0 is all index 1, frame 1 all index 0 (painted, not left clear)
    assert_eq!(*decoded.get_pixel(0, 0), RED);
    assert_eq!(*decoded.get_pixel(16, 0), BLACK);
}

#[test]
fn test_spritesheet_skips_unresolved_cells() {
    let mut rows = vec![vec![1i64; 16]; 16];
    rows[3][4] = 7;
    rows[5][6] = -1;
    let anim = two_color(vec![Frame::new(rows)], 100);

    let sheet = render_spritesheet(&anim);
    assert_eq!(*sheet.get_pixel(4, 3), TRANSPARENT);
    assert_eq!(*sheet.get_pixel(6, 5), TRANSPARENT);
    assert_eq!(*sheet.get_pixel(0, 0), RED);
    assert_eq!(anim.unresolved_cells().len(), 2);
}

#[test]
fn test_non_integer_cells_render_as_gaps() {
    let json = r##"{
        "palette": ["#000000", "#FF0000"],
        "frames": [[[1, null, 1.0, 1], [1, 1, "1", 1]]],
        "cadenceMs": 100
    }"##;
    let anim = AnimationData::from_json(json).expect("non-integer cells are not a shape error");
    assert_eq!(anim.unresolved_cells().len(), 3);

    let frame = render_frame(&anim.frames()[0], anim.resolved_palette(), &RenderOptions::new(1, Dither::Off));
    assert_eq!(*frame.get_pixel(0, 0), RED);
    assert_eq!(*frame.get_pixel(1, 0), BLACK);
    assert_eq!(*frame.get_pixel(2, 0), BLACK);
    assert_eq!(*frame.get_pixel(2, 1), BLACK);
    assert_eq!(*frame.get_pixel(3, 1), RED);

    let sheet = render_spritesheet(&anim);
    assert_eq!(*sheet.get_pixel(1, 0), TRANSPARENT);
    assert_eq!(*sheet.get_pixel(3, 0), RED);
}

#[test]
fn test_filename_properties() {
    let prompts = [
        "a campfire",
        "Ünïcödé ✨ sparkles",
        "!!!",
        "",
        "🔥🔥🔥 a very long prompt about fire",
        "a very long prompt about a dragon in a cave",
    ];
    for prompt in prompts {
        let stem = sanitize_filename(prompt);
        assert!(!stem.is_empty());
        assert!(stem.chars().count() <= 30);
        assert!(stem.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
    }
    assert_eq!(sanitize_filename("a very long prompt about a dragon in a cave"), "a-very-long-prompt-about-a-dra");
}
