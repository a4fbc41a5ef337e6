/// External configuration loader.
///
/// Reads `config.toml` from `--config`, else the executable's directory,
/// else the CWD. Falls back to defaults if the file is missing or
/// incomplete. Command-line values override whatever the file says.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::cli::Cli;
use crate::domain::color::{ColorToken, Cycle, Palette, PaletteName};
use crate::domain::layout::BarStyle;
use crate::sim::phase::{Phase, TextSettings, Timings};

const FALLBACK_FRAME_RATE: f64 = 30.0;
/// Slowest allowed animation; keeps the frame interval representable.
const MIN_FRAME_RATE: f64 = 0.1;
/// Fastest allowed palette travel, in positions per frame.
const MAX_SPEED: f64 = 1000.0;

// ── Public Config Struct ──

/// Fully resolved settings for one run. Built once, never mutated.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub timings: Timings,
    pub display: DisplayConfig,
    pub heat: PhaseLook,
    pub cool: PhaseLook,
    pub celebrate: PhaseLook,
    pub sound: SoundConfig,
}

#[derive(Clone, Debug)]
pub struct DisplayConfig {
    pub banner_width: usize,
    pub section_padding: usize,
    pub clear_screen: bool,
    pub text: TextSettings,
}

/// How one phase is animated.
#[derive(Clone, Debug)]
pub struct PhaseLook {
    pub frame_rate: f64,
    /// Palette positions advanced per rendered frame.
    pub speed: f64,
    pub animation: Cycle,
    pub palette: Palette,
    pub inverted: bool,
}

#[derive(Clone, Debug)]
pub struct SoundConfig {
    pub enabled: bool,
    pub amplitude: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::resolve(TomlConfig::default(), &Cli::default())
    }
}

impl AppConfig {
    pub fn look(&self, phase: Phase) -> &PhaseLook {
        match phase {
            Phase::Heating => &self.heat,
            Phase::Cooling => &self.cool,
            Phase::Celebrating => &self.celebrate,
        }
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    display: TomlDisplay,
    #[serde(default)]
    heat: TomlLook,
    #[serde(default)]
    cool: TomlLook,
    #[serde(default)]
    celebrate: TomlLook,
    #[serde(default)]
    sound: TomlSound,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_heat")]
    heat: i64,
    #[serde(default = "default_cool")]
    cool: i64,
    #[serde(default = "default_timeout")]
    timeout: i64,
}

#[derive(Deserialize, Debug)]
struct TomlDisplay {
    #[serde(default = "default_banner_width")]
    banner_width: usize,
    #[serde(default = "default_bar_width")]
    progress_bar_width: usize,
    #[serde(default = "default_bar_style")]
    bar_style: BarStyle,
    #[serde(default = "default_padding")]
    section_padding: usize,
    #[serde(default = "default_decimals")]
    decimals: usize,
    #[serde(default = "default_time_field")]
    time_field_width: usize,
    #[serde(default = "default_true")]
    clear_screen: bool,
}

/// Every key optional; missing ones take the phase's own default.
#[derive(Deserialize, Debug, Default)]
struct TomlLook {
    frame_rate: Option<f64>,
    speed: Option<f64>,
    animation: Option<Cycle>,
    palette: Option<PaletteName>,
    /// Custom 256-color codes; overrides `palette` when non-empty.
    colors: Option<Vec<u8>>,
    inverted: Option<bool>,
}

#[derive(Deserialize, Debug)]
struct TomlSound {
    #[serde(default = "default_true")]
    enabled: bool,
    #[serde(default = "default_amplitude")]
    amplitude: f32,
}

// ── Defaults ──

fn default_heat() -> i64 { 25 }
fn default_cool() -> i64 { 25 }
fn default_timeout() -> i64 { 8 }
fn default_banner_width() -> usize { 23 }
fn default_bar_width() -> usize { 21 }
fn default_bar_style() -> BarStyle { BarStyle::Braille }
fn default_padding() -> usize { 2 }
fn default_decimals() -> usize { 2 }
fn default_time_field() -> usize { 6 }
fn default_true() -> bool { true }
fn default_amplitude() -> f32 { 0.3 }

/// Built-in look per phase: (speed, animation, palette, inverted).
fn phase_defaults(phase: Phase) -> (f64, Cycle, PaletteName, bool) {
    match phase {
        Phase::Heating => (1.0, Cycle::Pulse, PaletteName::Red, false),
        Phase::Cooling => (0.5, Cycle::Horizontal, PaletteName::Blue, true),
        Phase::Celebrating => (3.0, Cycle::Vertical, PaletteName::Rainbow, true),
    }
}

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            heat: default_heat(),
            cool: default_cool(),
            timeout: default_timeout(),
        }
    }
}

impl Default for TomlDisplay {
    fn default() -> Self {
        TomlDisplay {
            banner_width: default_banner_width(),
            progress_bar_width: default_bar_width(),
            bar_style: default_bar_style(),
            section_padding: default_padding(),
            decimals: default_decimals(),
            time_field_width: default_time_field(),
            clear_screen: default_true(),
        }
    }
}

impl Default for TomlSound {
    fn default() -> Self {
        TomlSound {
            enabled: default_true(),
            amplitude: default_amplitude(),
        }
    }
}

impl TomlLook {
    fn resolve(self, phase: Phase) -> PhaseLook {
        let (speed, animation, palette, inverted) = phase_defaults(phase);
        let frame_rate = match self.frame_rate {
            Some(fps) if fps > 0.0 && fps.is_finite() => {
                if fps < MIN_FRAME_RATE {
                    warn!(?phase, fps, "frame rate too low, using {MIN_FRAME_RATE}");
                }
                fps.max(MIN_FRAME_RATE)
            }
            Some(fps) => {
                warn!(?phase, fps, "ignoring non-positive frame rate");
                FALLBACK_FRAME_RATE
            }
            None => FALLBACK_FRAME_RATE,
        };
        let speed = match self.speed {
            Some(s) if s.is_finite() => {
                if s.abs() > MAX_SPEED {
                    warn!(?phase, speed = s, "animation speed clamped to ±{MAX_SPEED}");
                }
                s.clamp(-MAX_SPEED, MAX_SPEED)
            }
            Some(s) => {
                warn!(?phase, speed = s, "ignoring non-finite animation speed");
                speed
            }
            None => speed,
        };
        let named = self.palette.unwrap_or(palette);
        let palette = match self.colors {
            Some(codes) => Palette::new(codes.into_iter().map(ColorToken::indexed).collect())
                .unwrap_or_else(|e| {
                    warn!(?phase, "{e}, using the {named:?} palette");
                    Palette::builtin(named)
                }),
            None => Palette::builtin(named),
        };
        PhaseLook {
            frame_rate,
            speed,
            animation: self.animation.unwrap_or(animation),
            palette,
            inverted: self.inverted.unwrap_or(inverted),
        }
    }
}

// ── Loading ──

impl AppConfig {
    /// Load `config.toml` and apply command-line overrides.
    pub fn load(cli: &Cli) -> Self {
        let toml_cfg = match &cli.config {
            Some(path) => load_file(path),
            None => load_toml(&candidate_dirs()),
        };
        Self::resolve(toml_cfg, cli)
    }

    fn resolve(toml_cfg: TomlConfig, cli: &Cli) -> Self {
        let timings = Timings::new(
            cli.heat.unwrap_or(toml_cfg.timing.heat),
            cli.cool.unwrap_or(toml_cfg.timing.cool),
            cli.timeout.unwrap_or(toml_cfg.timing.timeout),
        );
        let d = toml_cfg.display;
        AppConfig {
            timings,
            display: DisplayConfig {
                banner_width: d.banner_width,
                section_padding: d.section_padding,
                clear_screen: d.clear_screen && !cli.no_clear,
                text: TextSettings {
                    bar_width: d.progress_bar_width,
                    bar_style: d.bar_style,
                    decimals: d.decimals,
                    time_field_width: d.time_field_width,
                },
            },
            heat: toml_cfg.heat.resolve(Phase::Heating),
            cool: toml_cfg.cool.resolve(Phase::Cooling),
            celebrate: toml_cfg.celebrate.resolve(Phase::Celebrating),
            sound: SoundConfig {
                enabled: toml_cfg.sound.enabled && !cli.mute,
                amplitude: toml_cfg.sound.amplitude.clamp(0.0, 1.0),
            },
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// First readable config.toml wins; an unreadable one is skipped.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => return parse_or_default(&path, &text),
                Err(e) => {
                    warn!(path = %path.display(), "could not read config: {e}");
                }
            }
        }
    }
    debug!("no readable config.toml found, using defaults");
    TomlConfig::default()
}

/// Explicit `--config` path: no fallback search.
fn load_file(path: &Path) -> TomlConfig {
    match std::fs::read_to_string(path) {
        Ok(text) => parse_or_default(path, &text),
        Err(e) => {
            warn!(path = %path.display(), "could not read config, using defaults: {e}");
            TomlConfig::default()
        }
    }
}

fn parse_or_default(path: &Path, text: &str) -> TomlConfig {
    match parse(text) {
        Ok(cfg) => {
            debug!(path = %path.display(), "loaded config");
            cfg
        }
        Err(e) => {
            warn!(path = %path.display(), "config parse error, using defaults: {e}");
            TomlConfig::default()
        }
    }
}

fn parse(text: &str) -> Result<TomlConfig, toml::de::Error> {
    toml::from_str::<TomlConfig>(text)
}
