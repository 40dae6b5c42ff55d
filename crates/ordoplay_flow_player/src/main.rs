// SPDX-License-Identifier: MIT OR Apache-2.0
//! `OrdoPlay` flow player.
//!
//! Plays the guard patrol demo on a fixed-step clock and prints the final
//! blackboard. Usage: `ordoplay_flow_player [config.ron]`

use ordoplay_flow_player::{PlayerConfig, Result};
use std::path::Path;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn load_config() -> Result<PlayerConfig> {
    match std::env::args().nth(1) {
        Some(path) => PlayerConfig::load(Path::new(&path)),
        None => Ok(PlayerConfig::default()),
    }
}

fn main() {
    let config = load_config();

    // RUST_LOG wins over the configured filter
    let log_filter = config
        .as_ref()
        .map_or(ordoplay_flow_player::config::DEFAULT_LOG_FILTER, |c| c.log_filter.as_str());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting OrdoPlay flow player v{}", env!("CARGO_PKG_VERSION"));

    let summary = match config.and_then(|config| ordoplay_flow_player::run(&config)) {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!("Player failed: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        frames = summary.frames,
        steps = summary.steps,
        elapsed = summary.elapsed_time,
        finished = summary.finished,
        "Run complete"
    );
    for (key, value) in summary.blackboard.iter() {
        println!("{key} = {value}");
    }
}
