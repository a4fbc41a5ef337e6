/// Tone sequencer: plays a fixed schedule of tone events on its own thread.
///
/// Each event waits relative to the previous event's *scheduled* start.
/// Before sleeping, the sequencer subtracts everything that has already
/// elapsed since that start (playback time plus any lateness), so a slow
/// tone delays only itself and the schedule as a whole stays pinned to
/// wall-clock zero.
///
/// The thread shares nothing with the render loop. It is never joined; the
/// process exit ends it.

use std::io;
use std::thread;
use std::time::Duration;

use tracing::{debug, trace};

use super::clock::{Clock, SystemClock};
use super::phase::Timings;

/// One burst of back-to-back tones.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneEvent {
    /// Seconds after the previous event's start (negative clamps to 0).
    pub wait_before: f64,
    pub start_hz: f32,
    pub tone_secs: f32,
    pub count: u32,
    /// Frequency change applied after each tone; may be negative.
    pub step_hz: f32,
}

impl ToneEvent {
    pub const fn new(wait_before: f64, start_hz: f32, tone_secs: f32, count: u32, step_hz: f32) -> Self {
        ToneEvent { wait_before, start_hz, tone_secs, count, step_hz }
    }

    pub fn wait(&self) -> Duration {
        Duration::from_secs_f64(self.wait_before.max(0.0))
    }

    /// Total playback length of the burst.
    pub fn playback(&self) -> Duration {
        Duration::from_secs_f64((self.tone_secs.max(0.0) * self.count as f32) as f64)
    }
}

/// Ordered, immutable list of tone events.
#[derive(Clone, Debug, PartialEq)]
pub struct ToneSchedule {
    events: Vec<ToneEvent>,
}

impl ToneSchedule {
    pub fn new(events: Vec<ToneEvent>) -> Self {
        ToneSchedule { events }
    }

    /// Start chirp, heat→cool chime, end chime, then two trailing chimes a
    /// second apart.
    pub fn for_timings(timings: &Timings) -> Self {
        ToneSchedule::new(vec![
            ToneEvent::new(0.0, 350.0, 0.05, 7, 60.0),
            ToneEvent::new(timings.heat, 550.0, 0.06, 6, -75.0),
            ToneEvent::new(timings.cool, 550.0, 0.05, 5, 60.0),
            ToneEvent::new(1.0, 550.0, 0.05, 5, 60.0),
            ToneEvent::new(1.0, 550.0, 0.05, 5, 60.0),
        ])
    }

    pub fn events(&self) -> &[ToneEvent] {
        &self.events
    }
}

// ── Collaborator seams ──

/// Blocking audio output.
pub trait TonePlayer {
    /// Play `count` tones starting at `freq_hz`, each `duration_s` long,
    /// shifting by `step_hz` per tone. Returns once playback has finished.
    fn play_tone(&mut self, freq_hz: f32, duration_s: f32, count: u32, step_hz: f32, amplitude: f32);
}

impl<T: TonePlayer + ?Sized> TonePlayer for Box<T> {
    fn play_tone(&mut self, freq_hz: f32, duration_s: f32, count: u32, step_hz: f32, amplitude: f32) {
        (**self).play_tone(freq_hz, duration_s, count, step_hz, amplitude);
    }
}

// ── Sequencing ──

/// Play every event of `schedule` in order, blocking the calling thread.
pub fn run_schedule<P, C>(schedule: &ToneSchedule, player: &mut P, clock: &C, amplitude: f32)
where
    P: TonePlayer + ?Sized,
    C: Clock,
{
    let mut scheduled_start = clock.now();
    for (i, event) in schedule.events().iter().enumerate() {
        let correction = clock.now().saturating_sub(scheduled_start);
        let wait = event.wait();
        clock.sleep(wait.saturating_sub(correction));
        scheduled_start += wait;

        let started = clock.now();
        debug!(event = i, hz = event.start_hz, at = ?started, length = ?event.playback(), "tone event");
        player.play_tone(event.start_hz, event.tone_secs, event.count, event.step_hz, amplitude);
        trace!(event = i, took = ?clock.now().saturating_sub(started), "tone event finished");
    }
}

/// Start the sequencer on a detached background thread.
///
/// The player is built on that thread, since audio output handles are
/// usually not `Send`.
pub fn spawn<F, P>(schedule: ToneSchedule, amplitude: f32, make_player: F) -> io::Result<()>
where
    F: FnOnce() -> P + Send + 'static,
    P: TonePlayer,
{
    thread::Builder::new()
        .name("tone-sequencer".into())
        .spawn(move || {
            let clock = SystemClock::new();
            let mut player = make_player();
            run_schedule(&schedule, &mut player, &clock, amplitude);
            debug!("tone schedule complete");
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::clock::FakeClock;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records start times; playback takes its nominal length plus `overrun`.
    struct RecordingPlayer {
        clock: FakeClock,
        overrun: Duration,
        starts: Rc<RefCell<Vec<(Duration, f32)>>>,
    }

    impl TonePlayer for RecordingPlayer {
        fn play_tone(&mut self, freq_hz: f32, duration_s: f32, count: u32, _step: f32, _amp: f32) {
            self.starts.borrow_mut().push((self.clock.now(), freq_hz));
            let nominal = Duration::from_secs_f32(duration_s * count as f32);
            self.clock.advance(nominal + self.overrun);
        }
    }

    fn run(events: Vec<ToneEvent>, overrun: Duration) -> Vec<(Duration, f32)> {
        let clock = FakeClock::default();
        // Origin away from zero so absolute values don't hide bugs
        clock.advance(Duration::from_secs(100));
        let starts = Rc::new(RefCell::new(Vec::new()));
        let mut player = RecordingPlayer { clock: clock.clone(), overrun, starts: starts.clone() };
        run_schedule(&ToneSchedule::new(events), &mut player, &clock, 0.3);
        let origin = Duration::from_secs(100);
        let out = starts.borrow().iter().map(|&(t, hz)| (t - origin, hz)).collect();
        out
    }

    fn close(a: Duration, secs: f64) -> bool {
        (a.as_secs_f64() - secs).abs() < 1e-3
    }

    #[test]
    fn second_event_pinned_to_schedule() {
        let events = vec![
            ToneEvent::new(0.0, 350.0, 0.05, 7, 60.0),
            ToneEvent::new(25.0, 550.0, 0.06, 6, -75.0),
        ];
        for overrun_ms in [0, 40, 2_000] {
            let starts = run(events.clone(), Duration::from_millis(overrun_ms));
            assert_eq!(starts.len(), 2);
            assert!(close(starts[0].0, 0.0));
            assert!(close(starts[1].0, 25.0), "overrun {overrun_ms}ms: {:?}", starts[1].0);
            assert_eq!(starts[1].1, 550.0);
        }
    }

    #[test]
    fn late_event_does_not_shift_the_rest() {
        // First burst runs 3s long and blows through the 1s wait
        let events = vec![
            ToneEvent::new(0.0, 300.0, 1.0, 1, 0.0),
            ToneEvent::new(1.0, 400.0, 0.1, 1, 0.0),
            ToneEvent::new(5.0, 500.0, 0.1, 1, 0.0),
        ];
        let starts = run(events, Duration::from_secs(2));
        assert!(close(starts[0].0, 0.0));
        assert!(close(starts[1].0, 3.0)); // as early as possible
        assert!(close(starts[2].0, 6.0)); // back on schedule
    }

    #[test]
    fn negative_waits_start_immediately() {
        let events = vec![
            ToneEvent::new(-4.0, 300.0, 0.1, 1, 0.0),
            ToneEvent::new(-1.0, 400.0, 0.1, 2, 0.0),
        ];
        let starts = run(events, Duration::ZERO);
        assert!(close(starts[0].0, 0.0));
        assert!(close(starts[1].0, 0.1));
    }

    #[test]
    fn schedule_follows_timings() {
        let schedule = ToneSchedule::for_timings(&Timings::new(10, 20, 8));
        let waits: Vec<f64> = schedule.events().iter().map(|e| e.wait_before).collect();
        assert_eq!(waits, vec![0.0, 10.0, 20.0, 1.0, 1.0]);

        let starts = run(schedule.events().to_vec(), Duration::ZERO);
        let at: Vec<f64> = starts.iter().map(|(t, _)| t.as_secs_f64()).collect();
        for (got, want) in at.iter().zip([0.0, 10.0, 30.0, 31.0, 32.0]) {
            assert!((got - want).abs() < 1e-3, "{got} vs {want}");
        }
    }

    #[test]
    fn playback_length() {
        let ev = ToneEvent::new(0.0, 350.0, 0.05, 7, 60.0);
        assert!((ev.playback().as_secs_f64() - 0.35).abs() < 1e-6);
    }
}
