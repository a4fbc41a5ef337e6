/// Sound engine: blocking sine-tone bursts via rodio.
///
/// A burst is `count` back-to-back tones, each `duration_s` long, the pitch
/// moving by `step_hz` per tone. Samples are generated in memory and played
/// on a fresh `Sink`; `play_tone` returns when the sink drains.
///
/// Compile without the "sound" feature, or run without an output device,
/// and `SilentPlayer` takes over: same blocking time, no audio.

use std::thread;
use std::time::Duration;

use tracing::info;

use crate::sim::tones::TonePlayer;

#[cfg_attr(not(feature = "sound"), allow(dead_code))]
const SAMPLE_RATE: u32 = 44_100;

#[cfg(feature = "sound")]
mod inner {
    use rodio::{buffer::SamplesBuffer, OutputStream, OutputStreamHandle, Sink};
    use tracing::warn;

    use super::{burst_length, tone_samples, SAMPLE_RATE};
    use crate::sim::tones::TonePlayer;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;
            Some(SoundEngine { _stream: stream, handle })
        }
    }

    impl TonePlayer for SoundEngine {
        fn play_tone(&mut self, freq_hz: f32, duration_s: f32, count: u32, step_hz: f32, amplitude: f32) {
            let samples = tone_samples(SAMPLE_RATE, freq_hz, duration_s, count, step_hz, amplitude);
            match Sink::try_new(&self.handle) {
                Ok(sink) => {
                    sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples));
                    sink.sleep_until_end();
                }
                Err(e) => {
                    warn!("audio sink unavailable: {e}");
                    std::thread::sleep(burst_length(duration_s, count));
                }
            }
        }
    }
}

// ════════════════════════════════════════════════════════════
//  Waveform generator
// ════════════════════════════════════════════════════════════

/// Mono samples for one burst.
///
/// Phase carries across tone boundaries so pitch steps don't click.
/// Frequencies that step below zero are held at zero (silence).
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
pub fn tone_samples(
    sample_rate: u32,
    freq_hz: f32,
    duration_s: f32,
    count: u32,
    step_hz: f32,
    amplitude: f32,
) -> Vec<f32> {
    let per_tone = (sample_rate as f32 * duration_s.max(0.0)) as usize;
    let mut samples = Vec::with_capacity(per_tone * count as usize);
    let mut phase = 0.0_f32;
    for i in 0..count {
        let freq = (freq_hz + step_hz * i as f32).max(0.0);
        let delta = freq * std::f32::consts::TAU / sample_rate as f32;
        for _ in 0..per_tone {
            samples.push(phase.sin() * amplitude);
            phase = (phase + delta) % std::f32::consts::TAU;
        }
    }
    samples
}

fn burst_length(duration_s: f32, count: u32) -> Duration {
    Duration::from_secs_f32(duration_s.max(0.0) * count as f32)
}

/// Keeps the schedule's timing without producing sound.
pub struct SilentPlayer;

impl TonePlayer for SilentPlayer {
    fn play_tone(&mut self, _freq_hz: f32, duration_s: f32, count: u32, _step_hz: f32, _amplitude: f32) {
        thread::sleep(burst_length(duration_s, count));
    }
}

// ════════════════════════════════════════════════════════════
//  Public API
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

/// Best available player: the audio device if there is one, else silence.
/// Call on the thread that will use it.
pub fn open_player() -> Box<dyn TonePlayer> {
    #[cfg(feature = "sound")]
    {
        if let Some(engine) = SoundEngine::new() {
            return Box::new(engine);
        }
        info!("no audio output device, tones muted");
    }
    #[cfg(not(feature = "sound"))]
    info!("built without sound support, tones muted");
    Box::new(SilentPlayer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_has_expected_length() {
        let s = tone_samples(1000, 100.0, 0.05, 7, 60.0, 0.3);
        assert_eq!(s.len(), 50 * 7);
    }

    #[test]
    fn amplitude_bounds_samples() {
        let s = tone_samples(8000, 550.0, 0.06, 6, -75.0, 0.3);
        assert!(s.iter().all(|v| v.abs() <= 0.3 + 1e-6));
        assert!(s.iter().any(|v| v.abs() > 0.25));
    }

    #[test]
    fn negative_frequency_is_silent() {
        let s = tone_samples(1000, 50.0, 0.01, 3, -100.0, 1.0);
        // tones 2 and 3 sit at 0 Hz: phase frozen where tone 1 left it
        let tail = &s[10..];
        assert!(tail.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn degenerate_bursts_are_empty() {
        assert!(tone_samples(1000, 440.0, 0.0, 5, 0.0, 0.5).is_empty());
        assert!(tone_samples(1000, 440.0, 0.1, 0, 0.0, 0.5).is_empty());
        assert!(tone_samples(1000, 440.0, -1.0, 3, 0.0, 0.5).is_empty());
    }

    #[test]
    fn silent_player_blocks_for_burst() {
        let started = std::time::Instant::now();
        SilentPlayer.play_tone(440.0, 0.01, 3, 0.0, 0.3);
        assert!(started.elapsed() >= Duration::from_millis(29));
    }
}
