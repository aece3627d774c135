#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a headless VR survival round.

mod autopilot;

use std::{path::PathBuf, time::Duration};

use anyhow::{ensure, Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;
use vr_survival_core::{Event, Phase};
use vr_survival_system_interaction::InteractionConfig;
use vr_survival_system_session::{Session, SessionConfig, TomlFileStore};

use autopilot::Autopilot;

/// Input rig the autopilot drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum RigChoice {
    /// Tracked headset with two hand controllers.
    Controller,
    /// Keyboard and mouse emulation.
    Desktop,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless VR survival round driven by an autopilot", long_about = None)]
struct Args {
    /// Seconds of simulated time to run.
    #[arg(long, default_value_t = 90.0)]
    seconds: f32,

    /// Simulation steps per second.
    #[arg(long, default_value_t = 60)]
    tick_rate: u32,

    /// Session configuration TOML; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// File the lighting settings are persisted to on restart.
    #[arg(long, default_value = "lighting.toml")]
    settings: PathBuf,

    /// Overrides the spawn seed from the configuration.
    #[arg(long)]
    seed: Option<u64>,

    /// Input rig the autopilot drives.
    #[arg(long, value_enum, default_value_t = RigChoice::Controller)]
    rig: RigChoice,

    /// Restart once after the first game over.
    #[arg(long)]
    restart: bool,
}

#[derive(Debug, Default)]
struct Tally {
    spawned: usize,
    destroyed: usize,
    shots: usize,
    escalations: usize,
}

impl Tally {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::EnemySpawned { .. } => self.spawned += 1,
                Event::EnemyDestroyed { enemy, .. } => {
                    self.destroyed += 1;
                    tracing::debug!(enemy = enemy.get(), "enemy destroyed");
                }
                Event::ProjectileFired { .. } => self.shots += 1,
                Event::ScreenFlashed { .. } => self.escalations += 1,
                Event::NotificationShown { text } => tracing::info!(%text, "notification"),
                Event::PhaseChanged { phase } => tracing::info!(?phase, "phase changed"),
                _ => {}
            }
        }
    }
}

/// Built-in configuration with the interaction preset matching `rig`.
fn default_config(rig: RigChoice) -> SessionConfig {
    let interaction = match rig {
        RigChoice::Controller => InteractionConfig::controller_grab_teleport(),
        RigChoice::Desktop => InteractionConfig::emulated_grab_teleport(),
    };
    SessionConfig {
        interaction,
        ..SessionConfig::default()
    }
}

/// Entry point for the VR survival command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    ensure!(args.tick_rate > 0, "--tick-rate must be positive");
    ensure!(
        args.seconds.is_finite() && args.seconds > 0.0,
        "--seconds must be a positive number"
    );

    let mut config = match &args.config {
        Some(path) => SessionConfig::from_file(path)
            .with_context(|| format!("Failed to load session config at {}", path.display()))?,
        None => default_config(args.rig),
    };
    if let Some(seed) = args.seed {
        config.director.seed = seed;
    }

    let store = TomlFileStore::new(&args.settings);
    let mut session = Session::new(config, store);
    let mut autopilot = match args.rig {
        RigChoice::Controller => Autopilot::controller(),
        RigChoice::Desktop => Autopilot::desktop(),
    };
    let mut restarts_left = u32::from(args.restart);

    let dt = Duration::from_secs_f64(1.0 / f64::from(args.tick_rate));
    let frames = (f64::from(args.seconds) * f64::from(args.tick_rate)).ceil() as u64;
    let mut tally = Tally::default();
    tracing::info!(frames, rig = ?args.rig, "running headless round");

    for _ in 0..frames {
        let mut input = autopilot.plan(&session);
        if session.phase() == Phase::GameOver {
            if restarts_left == 0 {
                break;
            }
            restarts_left -= 1;
            input.restart = true;
        }
        let events = session.step(dt, &input, autopilot.source());
        tally.record(&events);
    }

    tracing::info!(
        spawned = tally.spawned,
        destroyed = tally.destroyed,
        shots = tally.shots,
        escalations = tally.escalations,
        "round finished"
    );
    println!("{}", session.info_text());
    println!("{}", session.ammo_text());
    Ok(())
}
