//! Classify a single query.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use super::{load_router, print_ranking, verdict};

pub fn run(query: &str, config_path: Option<&Path>, threshold: Option<f32>, json: bool) -> Result<()> {
    let router = load_router(config_path, threshold)?;
    let result = router.classify(query)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{} {}", "→".blue(), query.cyan());
    println!("{}", verdict(&result));
    println!();
    print_ranking(&result);

    Ok(())
}
