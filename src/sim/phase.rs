/// Phase state machine: elapsed time → phase, progress, and banner text.
///
/// Nothing here stores the phase. It is recomputed from the clock on every
/// tick:
///
///   Heating      t < heat
///   Cooling      heat ≤ t < heat + cool
///   Celebrating  heat + cool ≤ t   (the loop ends at heat + cool + timeout)
///
/// Non-positive durations never divide: a zero-length span reports
/// progress 1.0 (already complete).

use std::time::Duration;

use crate::domain::layout::{progress_bar, BarStyle, LayoutError};

pub const HEAT_MESSAGE: &str = "HEAT";
pub const COOL_MESSAGE: &str = "COOL";

const CELEBRATE_WORD: &str = "DAB!";
const CELEBRATE_COLS: usize = 4;
const CELEBRATE_ROWS: usize = 5;
const CELEBRATE_MAX_WORDS: usize = CELEBRATE_COLS * CELEBRATE_ROWS;
/// Seconds for the celebration grid to fill.
const CELEBRATE_RAMP_SECS: f64 = 3.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Heating,
    Cooling,
    Celebrating,
}

/// Elapsed time since the countdown started.
///
/// Advanced by measured tick durations, never by a nominal step. Kept as a
/// `Duration` so repeated advances add up exactly.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct PhaseClock(Duration);

impl PhaseClock {
    pub fn new() -> Self {
        PhaseClock(Duration::ZERO)
    }

    #[allow(dead_code)]
    pub fn at(secs: f64) -> Self {
        PhaseClock(Duration::from_secs_f64(secs.max(0.0)))
    }

    pub fn advance(&mut self, elapsed: Duration) {
        self.0 += elapsed;
    }

    pub fn secs(self) -> f64 {
        self.0.as_secs_f64()
    }
}

/// The three configured durations, in seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timings {
    pub heat: f64,
    pub cool: f64,
    pub timeout: f64,
}

impl Timings {
    pub fn new(heat: i64, cool: i64, timeout: i64) -> Self {
        Timings { heat: heat as f64, cool: cool as f64, timeout: timeout as f64 }
    }

    /// End of the cooling phase.
    pub fn total(&self) -> f64 {
        self.heat.max(0.0) + self.cool.max(0.0)
    }

    /// Time at which the loop stops.
    pub fn end(&self) -> f64 {
        self.total() + self.timeout.max(0.0)
    }

    pub fn is_finished(&self, clock: PhaseClock) -> bool {
        clock.secs() >= self.end()
    }

    pub fn snapshot(&self, clock: PhaseClock) -> PhaseSnapshot {
        let t = clock.secs();
        let heat = self.heat.max(0.0);
        if t < heat {
            PhaseSnapshot { phase: Phase::Heating, progress: fraction(t, heat) }
        } else if t < self.total() {
            PhaseSnapshot { phase: Phase::Cooling, progress: fraction(t - heat, self.cool) }
        } else {
            PhaseSnapshot {
                phase: Phase::Celebrating,
                progress: fraction(t - self.total(), CELEBRATE_RAMP_SECS),
            }
        }
    }
}

/// `elapsed / span` clamped to [0, 1]; an empty span is complete.
fn fraction(elapsed: f64, span: f64) -> f64 {
    if span <= 0.0 {
        return 1.0;
    }
    (elapsed.max(0.0) / span).min(1.0)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseSnapshot {
    pub phase: Phase,
    pub progress: f64,
}

/// How the banner text is formatted.
#[derive(Clone, Copy, Debug)]
pub struct TextSettings {
    pub bar_width: usize,
    pub bar_style: BarStyle,
    pub decimals: usize,
    pub time_field_width: usize,
}

/// Banner contents for one frame.
pub fn frame_text(
    snap: PhaseSnapshot,
    clock: PhaseClock,
    timings: &Timings,
    settings: &TextSettings,
) -> Result<String, LayoutError> {
    let ramp = settings.bar_style.ramp();
    match snap.phase {
        Phase::Heating => {
            let bar = progress_bar(settings.bar_width, snap.progress, ramp, None, false)?;
            Ok(countdown_text(HEAT_MESSAGE, &bar, clock.secs(), settings))
        }
        Phase::Cooling => {
            let bar = progress_bar(settings.bar_width, snap.progress, ramp, None, true)?;
            let remaining = (timings.total() - clock.secs()).max(0.0);
            Ok(countdown_text(COOL_MESSAGE, &bar, remaining, settings))
        }
        Phase::Celebrating => Ok(celebration_text(snap.progress)),
    }
}

fn countdown_text(message: &str, bar: &str, secs: f64, settings: &TextSettings) -> String {
    let time = format!("{:<w$.p$}", secs, w = settings.time_field_width, p = settings.decimals);
    format!("\n{message}\n\n{bar}\n\n{time}")
}

/// Number of celebration words shown at a given ramp progress.
pub fn celebration_words(progress: f64) -> usize {
    ((progress * CELEBRATE_MAX_WORDS as f64).floor() as usize).clamp(1, CELEBRATE_MAX_WORDS)
}

fn celebration_text(progress: f64) -> String {
    let mut remaining = celebration_words(progress);
    let mut text = String::from("\n");
    while remaining > 0 {
        let row = remaining.min(CELEBRATE_COLS);
        for _ in 0..row {
            text.push_str(CELEBRATE_WORD);
            text.push(' ');
        }
        text.push('\n');
        remaining -= row;
    }
    text
}
