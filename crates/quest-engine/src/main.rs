//! # Quest Engine
//!
//! Headless driver for Quinn's Quest.
//!
//! Loads `quest.toml`, plays the campaign with the scripted autopilot and
//! prints a run report. The config path comes from the first argument, then
//! `$QUEST_CONFIG`, then the working directory. `quest --init [PATH]` writes
//! the default config instead. Set `QUEST_LOG=json` for structured log lines.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod autopilot;
mod config;
mod runner;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::EngineConfig;
use crate::runner::Runner;

/// Main entry point.
fn main() -> Result<()> {
    let json_logs = std::env::var("QUEST_LOG").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    tracing_subscriber::registry()
        .with(json_logs.then(|| fmt::layer().json()))
        .with((!json_logs).then(fmt::layer))
        .with(EnvFilter::from_default_env().add_directive("quest=info".parse()?))
        .init();

    info!("Quinn's Quest starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut args = std::env::args_os().skip(1);
    let config = match args.next() {
        Some(flag) if flag == "--init" => {
            let path = args.next().map_or_else(EngineConfig::config_path, Into::into);
            EngineConfig::default().save_to(&path)?;
            return Ok(());
        },
        Some(path) => EngineConfig::load_from(path),
        None => EngineConfig::load(),
    };
    let format = config.report_format;

    let report = Runner::new(config)?.run()?;
    println!("{}", report.render(format)?);
    if report.completed() {
        info!("Claire is safe");
    }

    info!("Quinn's Quest shutdown complete");
    Ok(())
}
