//! Classify one query per line from a file or stdin.

use anyhow::{Context, Result};
use colored::Colorize;
use semroute::prelude::*;
use serde::Serialize;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::warn;

use super::{load_router, verdict};

/// Counts reported after a batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct BatchSummary {
    pub matched: usize,
    pub no_match: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.matched + self.no_match + self.failed
    }
}

#[derive(Serialize)]
struct BatchLine<'a> {
    line: usize,
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a RoutingResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn run(
    file: Option<&Path>,
    config_path: Option<&Path>,
    threshold: Option<f32>,
    json: bool,
) -> Result<()> {
    let router = load_router(config_path, threshold)?;

    let reader: Box<dyn BufRead> = match file {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(std::io::stdin())),
    };

    let summary = classify_lines(&router, reader, json)?;

    if json {
        eprintln!("{}", serde_json::to_string(&summary)?);
    } else {
        println!();
        println!(
            "{} {} queries: {} matched, {} no match, {} failed",
            "✓".green(),
            summary.total().to_string().cyan(),
            summary.matched.to_string().green(),
            summary.no_match.to_string().yellow(),
            summary.failed.to_string().red()
        );
    }

    Ok(())
}

/// Classify every non-blank line. Per-query failures go to stderr and the run
/// continues; only read errors abort.
pub fn classify_lines<R: BufRead>(router: &Router, reader: R, json: bool) -> Result<BatchSummary> {
    let mut summary = BatchSummary::default();

    for (i, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read input")?;
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        let line_no = i + 1;

        match router.classify(query) {
            Ok(result) => {
                if result.is_match() {
                    summary.matched += 1;
                } else {
                    summary.no_match += 1;
                }

                if json {
                    let out = BatchLine {
                        line: line_no,
                        query,
                        result: Some(&result),
                        error: None,
                    };
                    println!("{}", serde_json::to_string(&out)?);
                } else {
                    println!("{:>4}  {}  {}", line_no.to_string().dimmed(), verdict(&result), query);
                }
            }
            Err(e) => {
                summary.failed += 1;
                warn!(line = line_no, error = %e, "query failed");

                if json {
                    let out = BatchLine {
                        line: line_no,
                        query,
                        result: None,
                        error: Some(e.to_string()),
                    };
                    println!("{}", serde_json::to_string(&out)?);
                } else {
                    eprintln!("{} line {}: {}", "✗".red(), line_no, e);
                }
            }
        }
    }

    Ok(summary)
}
