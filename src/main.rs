/// Entry point and render loop wiring.

mod cli;
mod config;
mod domain;
mod error;
mod sim;
mod ui;

use std::io;
use std::process::{self, ExitCode};

use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::AppConfig;
use domain::art::Art;
use sim::clock::SystemClock;
use sim::countdown::{run_loop, Countdown};
use sim::tones::{self, ToneSchedule};
use ui::renderer::{restore_terminal, Renderer};
use ui::sound;

fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();
    let config = AppConfig::load(&cli);
    info!(timings = ?config.timings, sound = config.sound.enabled, "starting countdown");

    // Ctrl-C ends the whole process, tone thread included; put the terminal
    // back first. The stdout lock is held through exit so no half-drawn
    // frame can land after the reset.
    if let Err(e) = ctrlc::set_handler(|| {
        let mut out = io::stdout().lock();
        let _ = restore_terminal(&mut out);
        process::exit(0);
    }) {
        warn!("could not install Ctrl-C handler: {e}");
    }

    let mut renderer = Renderer::stdout();

    if let Err(e) = renderer.init(config.display.clear_screen) {
        let _ = renderer.cleanup();
        eprintln!("Terminal init failed: {e}");
        return ExitCode::FAILURE;
    }

    if config.sound.enabled {
        let schedule = ToneSchedule::for_timings(&config.timings);
        if let Err(e) = tones::spawn(schedule, config.sound.amplitude, sound::open_player) {
            warn!("could not start tone sequencer: {e}");
        }
    }

    let mut countdown = Countdown::new(&config, Art::default());
    let result = run_loop(&mut countdown, &SystemClock::new(), |frame| renderer.draw(frame));

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    match result {
        Ok(frames) => {
            debug!(frames, "done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` controls verbosity; quiet (warnings only) by default so log
/// lines don't tear through the frame.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
