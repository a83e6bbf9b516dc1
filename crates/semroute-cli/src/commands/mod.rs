//! CLI command implementations.

pub mod batch;
pub mod classify;
pub mod init;
pub mod intents;

use anyhow::{Context, Result};
use colored::Colorize;
use semroute::prelude::*;
use std::path::Path;

use crate::config::Config;

/// Load the config, apply a threshold override and build the router.
pub fn load_router(config_path: Option<&Path>, threshold: Option<f32>) -> Result<Router> {
    let mut config = Config::load(config_path)?;
    if let Some(threshold) = threshold {
        config.router.threshold = Some(threshold);
    }
    build_router(&config)
}

pub fn build_router(config: &Config) -> Result<Router> {
    let catalog =
        IntentCatalog::build(config.intents.clone()).context("Invalid intent catalog")?;
    let encoder = config.build_encoder()?;
    Router::new(catalog, encoder, config.router).context("Failed to build router")
}

/// Print the ranked scores, marking the winner.
pub fn print_ranking(result: &RoutingResult) {
    for (i, entry) in result.ranked().iter().enumerate() {
        let rank = format!("{}.", i + 1);
        let score = format!("({:.3})", entry.score);
        let name = if result.intent() == Some(entry.intent.as_str()) {
            entry.intent.white().bold()
        } else {
            entry.intent.normal()
        };
        println!("  {} {} {}", rank.blue(), name, score.dimmed());
    }
}

/// One-line verdict, e.g. `✓ BookFlight (0.873)`.
pub fn verdict(result: &RoutingResult) -> String {
    match result {
        RoutingResult::Matched {
            intent, confidence, ..
        } => format!(
            "{} {} {}",
            "✓".green(),
            intent.cyan().bold(),
            format!("({:.3})", confidence).dimmed()
        ),
        RoutingResult::NoMatch { reason, .. } => {
            format!("{} {} {}", "•".yellow(), "no match".yellow(), format!("({reason})").dimmed())
        }
    }
}
