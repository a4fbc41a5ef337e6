/// Render loop state and pacing.
///
/// `Countdown` owns the phase clock and the frame counter; nothing else
/// touches them. Each tick:
///
///   1. advance the clock by the previous tick's *measured* duration
///   2. derive phase + banner text from the clock
///   3. banner → join with art → colorize with the phase's look
///   4. hand the frame to the terminal
///   5. sleep for whatever is left of the frame interval
///   6. measure the whole tick, feed it back into step 1
///
/// Because the clock only ever moves by real elapsed time, slow terminal
/// writes stretch frames instead of slowing the countdown down.

use std::io;
use std::time::Duration;

use tracing::{debug, info, trace};

use super::clock::Clock;
use super::phase::{frame_text, Phase, PhaseClock, PhaseSnapshot};
use crate::config::AppConfig;
use crate::domain::art::Art;
use crate::domain::color::StyledBlock;
use crate::domain::layout::{banner, multi_line_join, LayoutError};
use crate::error::AppError;

const BANNER_TOP: char = '=';
const BANNER_SIDE: char = '|';

/// One composed tick, ready to draw.
#[derive(Debug)]
pub struct Frame {
    pub phase: Phase,
    pub styled: StyledBlock,
    /// Target interval for this phase.
    pub interval: Duration,
}

pub struct Countdown<'a> {
    config: &'a AppConfig,
    art: Art,
    clock: PhaseClock,
    frame: u64,
    last_phase: Option<Phase>,
}

impl<'a> Countdown<'a> {
    pub fn new(config: &'a AppConfig, art: Art) -> Self {
        Countdown { config, art, clock: PhaseClock::new(), frame: 0, last_phase: None }
    }

    pub fn advance(&mut self, elapsed: Duration) {
        self.clock.advance(elapsed);
    }

    pub fn clock(&self) -> PhaseClock {
        self.clock
    }

    pub fn frames(&self) -> u64 {
        self.frame
    }

    pub fn is_finished(&self) -> bool {
        self.config.timings.is_finished(self.clock)
    }

    pub fn snapshot(&self) -> PhaseSnapshot {
        self.config.timings.snapshot(self.clock)
    }

    /// Build the frame for the current clock and bump the frame counter.
    pub fn compose(&mut self) -> Result<Frame, LayoutError> {
        let snap = self.snapshot();
        if self.last_phase != Some(snap.phase) {
            info!(phase = ?snap.phase, at = self.clock.secs(), "phase change");
            self.last_phase = Some(snap.phase);
        }

        let display = &self.config.display;
        let text = frame_text(snap, self.clock, &self.config.timings, &display.text)?;
        let framed = banner(&text, display.banner_width, self.art.height, BANNER_TOP, BANNER_SIDE)?;
        let content = multi_line_join(&[self.art.text, &framed, self.art.text], display.section_padding);

        let look = self.config.look(snap.phase);
        let position = (self.frame as f64 * look.speed).floor() as i64;
        let styled = look.animation.apply(&content, position, &look.palette, look.inverted);

        self.frame += 1;
        Ok(Frame {
            phase: snap.phase,
            styled,
            interval: Duration::from_secs_f64(1.0 / look.frame_rate),
        })
    }
}

/// Time left to sleep once a frame has cost `render_cost`.
pub fn frame_sleep(interval: Duration, render_cost: Duration) -> Duration {
    interval.saturating_sub(render_cost)
}

/// Drive `countdown` to its end, drawing each frame with `draw`.
///
/// Returns the number of frames drawn. Layout or I/O failures stop the loop
/// immediately; the caller restores the terminal.
pub fn run_loop<C, D>(countdown: &mut Countdown<'_>, clock: &C, mut draw: D) -> Result<u64, AppError>
where
    C: Clock,
    D: FnMut(&StyledBlock) -> io::Result<()>,
{
    let mut last_tick = Duration::ZERO;
    loop {
        countdown.advance(last_tick);
        if countdown.is_finished() {
            break;
        }

        let started = clock.now();
        let frame = countdown.compose()?;
        trace!(phase = ?frame.phase, frame = countdown.frames(), "tick");
        draw(&frame.styled)?;

        let cost = clock.now().saturating_sub(started);
        clock.sleep(frame_sleep(frame.interval, cost));
        last_tick = clock.now().saturating_sub(started);
    }
    debug!(frames = countdown.frames(), elapsed = countdown.clock().secs(), "countdown finished");
    Ok(countdown.frames())
}
