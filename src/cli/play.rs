//! Play command implementation (terminal playback)

use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use crate::config::CliOverrides;
use crate::playback::PlaybackState;
use crate::renderer::Canvas;
use crate::session::Session;
use crate::terminal::{render_ansi_frame, ANSI_CLEAR_HOME};

use super::{input_stem, load_animation, resolve_config, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the play command
pub fn run_play(
    input: &Path,
    config_path: Option<&Path>,
    overrides: &CliOverrides,
    loops: Option<u32>,
) -> ExitCode {
    let config = match resolve_config(config_path, overrides) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let animation = match load_animation(input) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let mut session = Session::new(input_stem(input), config.generation.model);
    session.set_dithering(config.render.dither);
    session.load(animation, Instant::now());
    run_player(&mut session, loops)
}

/// Drive the session's playback timer and redraw each frame to stdout.
///
/// On a terminal the screen is redrawn in place and playback runs until
/// interrupted unless `loops` says otherwise. Piped output gets each frame
/// once, one after another.
pub(crate) fn run_player(session: &mut Session, loops: Option<u32>) -> ExitCode {
    let interactive = atty::is(atty::Stream::Stdout);
    let frame_count = session.animation().map_or(0, |a| a.frame_count()) as u64;
    let loops = loops.or(if interactive { None } else { Some(1) });
    // The first frame is on screen before any tick, so a full loop is one
    // tick short of frame_count * loops.
    let total_ticks = loops.map(|l| (u64::from(l) * frame_count).saturating_sub(1));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut canvas = Canvas::new();
    let mut ticks = 0u64;

    if let Err(e) = draw(session, &mut canvas, &mut out, interactive) {
        eprintln!("Error: {}", e);
        return ExitCode::from(EXIT_ERROR);
    }

    while session.playback().state() == PlaybackState::Playing {
        if total_ticks.is_some_and(|total| ticks >= total) {
            break;
        }
        let Some(deadline) = session.next_deadline() else {
            break;
        };
        let now = Instant::now();
        if deadline > now {
            std::thread::sleep(deadline - now);
        }

        let fired = session.tick(Instant::now());
        if fired == 0 {
            continue;
        }
        ticks += fired;
        if let Err(e) = draw(session, &mut canvas, &mut out, interactive) {
            eprintln!("Error: {}", e);
            session.shutdown();
            return ExitCode::from(EXIT_ERROR);
        }
    }

    session.shutdown();
    ExitCode::from(EXIT_SUCCESS)
}

/// One terminal cell per logical pixel.
const TERMINAL_PIXEL_SIZE: u32 = 1;

fn draw(session: &Session, canvas: &mut Canvas, out: &mut impl Write, interactive: bool) -> io::Result<()> {
    session.redraw(canvas, TERMINAL_PIXEL_SIZE);
    let Some(image) = canvas.image() else {
        return Ok(());
    };
    if interactive {
        write!(out, "{}", ANSI_CLEAR_HOME)?;
    }
    write!(out, "{}", render_ansi_frame(image))?;
    writeln!(out, "{}", session.frame_readout())?;
    if let Some(cadence) = session.cadence_readout() {
        writeln!(out, "{}", cadence)?;
    }
    out.flush()
}
