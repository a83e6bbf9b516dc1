//! List the configured intent catalog.

use anyhow::{Context, Result};
use colored::Colorize;
use semroute::prelude::*;
use std::path::Path;

use crate::config::{Config, EncoderConfig};

pub fn run(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;
    let catalog =
        IntentCatalog::build(config.intents.clone()).context("Invalid intent catalog")?;

    let encoder = match &config.encoder {
        EncoderConfig::Hashing { dimension } => format!("hashing ({dimension} dims)"),
        EncoderConfig::WordVectors { path, .. } => format!("word-vectors ({})", path.display()),
        EncoderConfig::Api { provider, .. } => format!("api ({provider})"),
    };
    let threshold = config
        .router
        .threshold
        .map(|t| format!("{t:.3}"))
        .unwrap_or_else(|| "none".to_string());

    println!("{}", "Intent Catalog".white().bold());
    println!("{}", "═".repeat(40).dimmed());
    println!("  Encoder:     {}", encoder.cyan());
    println!("  Aggregation: {}", config.router.aggregation.to_string().cyan());
    println!("  Threshold:   {}", threshold.cyan());
    println!();

    for intent in catalog.intents() {
        println!(
            "{} {}",
            intent.name().blue().bold(),
            format!("({} examples)", intent.examples().len()).dimmed()
        );
        for example in intent.examples() {
            println!("    {} {}", "-".dimmed(), example);
        }
    }

    println!();
    println!(
        "{} {} intents, {} examples",
        "✓".green(),
        catalog.len().to_string().cyan(),
        catalog.example_count().to_string().cyan()
    );

    Ok(())
}
