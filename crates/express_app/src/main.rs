// SPDX-License-Identifier: MIT OR Apache-2.0
//! Railway express demo application.
//!
//! A headless rendition of the classic switchable-junction train demo:
//! - Track topology with a toggleable junction
//! - A train hopping between section clips as they finish
//! - Speed ramps, wheel sound, horn, and wind side effects
//!
//! ## Architecture
//!
//! The binary owns the event loop. Each timestep it fires due script
//! actions, advances the headless engine, and dispatches the resulting
//! events (finished clips, ramp ticks) into the train controller. An
//! optional RON config file passed as the first argument overrides the
//! built-in demo scene and script.

mod config;
mod engine;
mod sim;

use config::AppConfig;
use sim::Simulation;
use std::path::Path;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Sim(#[from] sim::SimError),
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("express_app=info".parse().unwrap())
        .add_directive("express_train=debug".parse().unwrap());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting railway express v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run() {
        tracing::error!("startup failed: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::load(Path::new(&path))?,
        None => AppConfig::default(),
    };

    let mut sim = Simulation::new(&config)?;
    sim.run();
    Ok(())
}
