//! Playback controller: cycles the current frame index at the animation's
//! cadence.
//!
//! The controller owns at most one armed timer. The timer is a deadline, not
//! a thread: the host asks [`Playback::next_deadline`] when to come back and
//! calls [`Playback::advance`] with the current time, which fires one tick per
//! elapsed period. Installing or clearing an animation always cancels the live
//! timer before a new one may be armed.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::models::{AnimationData, Frame};

/// Whether anything is playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No animation, no timer
    Idle,
    /// Animation present, timer armed
    Playing,
}

/// The single live periodic timer.
#[derive(Debug)]
struct ArmedTimer {
    id: u64,
    period: Duration,
    next_due: Instant,
}

/// Frame-index state machine for one animation at a time.
#[derive(Debug, Default)]
pub struct Playback {
    animation: Option<Arc<AnimationData>>,
    frame_index: usize,
    timer: Option<ArmedTimer>,
    timers_armed: u64,
}

impl Playback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current animation and start playing it from frame 0.
    pub fn install(&mut self, animation: Arc<AnimationData>, now: Instant) {
        self.cancel_timer();
        self.frame_index = 0;
        let frame_count = animation.frame_count();
        let period = Duration::from_millis(u64::from(animation.cadence_ms()));
        self.animation = Some(animation);
        if frame_count > 0 {
            self.arm_timer(period, now);
        }
    }

    /// Drop the current animation and go idle.
    pub fn clear(&mut self) {
        self.cancel_timer();
        self.animation = None;
        self.frame_index = 0;
    }

    /// Tear down: cancel any live timer. Also runs on drop.
    pub fn shutdown(&mut self) {
        self.clear();
    }

    fn arm_timer(&mut self, period: Duration, now: Instant) {
        self.timers_armed += 1;
        let id = self.timers_armed;
        tracing::debug!(timer = id, period_ms = period.as_millis() as u64, "playback timer armed");
        self.timer = Some(ArmedTimer {
            id,
            period,
            next_due: now + period,
        });
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            tracing::debug!(timer = timer.id, "playback timer cancelled");
        }
    }

    /// Fire every tick that is due at `now`. Returns how many fired.
    pub fn advance(&mut self, now: Instant) -> u64 {
        let frame_count = self.frame_count();
        let Some(timer) = self.timer.as_mut() else {
            return 0;
        };
        if frame_count == 0 || now < timer.next_due {
            return 0;
        }

        let period_ns = timer.period.as_nanos().max(1);
        let ticks = 1 + now.duration_since(timer.next_due).as_nanos() / period_ns;
        timer.next_due += Duration::from_nanos((period_ns * ticks) as u64);

        let step = (ticks % frame_count as u128) as usize;
        self.frame_index = (self.frame_index + step) % frame_count;
        ticks as u64
    }

    /// When the next tick is due, if a timer is armed.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.as_ref().map(|t| t.next_due)
    }

    pub fn state(&self) -> PlaybackState {
        if self.timer.is_some() {
            PlaybackState::Playing
        } else {
            PlaybackState::Idle
        }
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn frame_count(&self) -> usize {
        self.animation.as_ref().map_or(0, |a| a.frame_count())
    }

    pub fn animation(&self) -> Option<&Arc<AnimationData>> {
        self.animation.as_ref()
    }

    /// The frame that should be on screen right now.
    pub fn current_frame(&self) -> Option<&Frame> {
        self.animation.as_ref()?.frame(self.frame_index)
    }

    /// Identifier of the live timer. Each arming gets a fresh id.
    pub fn timer_id(&self) -> Option<u64> {
        self.timer.as_ref().map(|t| t.id)
    }
}

impl Drop for Playback {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}
