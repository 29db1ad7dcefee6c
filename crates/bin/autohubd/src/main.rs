//! # autohubd — autohub daemon
//!
//! Composition root that wires the adapters into the controller and runs
//! the tick loop.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Install the `tracing` subscriber
//! - Construct the daylight and weather services (adapters)
//! - Build areas and automations, injecting devices via port traits
//! - Run the tick scheduler until SIGINT, then stop it cleanly
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;
mod setup;

use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use autohub_adapter_virtual::{FixedDaylight, VirtualWeatherStation};
use autohub_app::automation::ServiceContext;
use autohub_app::ports::{Clock, SystemClock};
use autohub_app::scheduler::TickScheduler;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.logging.filter).context("parsing log filter")?,
        )
        .init();

    // Services
    let (sunrise, sunset) = config.daylight.times()?;
    let context = ServiceContext::new(
        Arc::new(FixedDaylight::new(sunrise, sunset)),
        Arc::new(VirtualWeatherStation::new(config.weather.outside_temperature)),
    );
    let clock = Arc::new(SystemClock);

    // Areas and automations
    let installation = setup::build(&config, context, clock.now())?;
    tracing::info!(
        areas = installation.controller.areas().len(),
        roller_shutters = installation.shutters.len(),
        lamps = installation.lamps.len(),
        "controller ready"
    );
    let controller = Arc::new(Mutex::new(installation.controller));

    // Tick loop
    let scheduler = TickScheduler::start(Arc::clone(&controller), clock, config.tick_interval());

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;
    tracing::info!("shutdown requested");

    let ticks = scheduler.stop().await.context("stopping tick scheduler")?;
    let snapshots = controller
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .snapshots();
    tracing::info!(
        ticks,
        state = %serde_json::to_string(&snapshots)?,
        "autohubd stopped"
    );

    Ok(())
}
