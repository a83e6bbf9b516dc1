//! Initialize a new semroute project.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::{Config, CONFIG_FILE};

pub fn run(path: Option<String>, force: bool) -> Result<()> {
    let base_path = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    println!("{} Initializing semroute project...", "→".blue());

    std::fs::create_dir_all(&base_path)
        .with_context(|| format!("Failed to create {}", base_path.display()))?;

    let config_path = base_path.join(CONFIG_FILE);
    if config_path.exists() && !force {
        bail!(
            "{} already exists (use {} to overwrite)",
            config_path.display(),
            "--force".cyan()
        );
    }

    Config::default().save(&config_path)?;
    println!("  {} Created {}", "✓".green(), config_path.display());

    println!();
    println!("{} semroute project initialized!", "✓".green().bold());
    println!();
    println!("Next steps:");
    println!("  {} edit the [[intents]] in {}", "1.".blue(), CONFIG_FILE);
    println!("  {} semroute intents", "2.".blue());
    println!("  {} semroute classify \"book me a flight\"", "3.".blue());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_default_config_and_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("project");
        let base_str = base.to_string_lossy().into_owned();

        run(Some(base_str.clone()), false).unwrap();
        let config = Config::load_from(&base.join(CONFIG_FILE)).unwrap();
        assert_eq!(config.intents.len(), 3);

        std::fs::write(base.join(CONFIG_FILE), "[router]\n").unwrap();
        let err = run(Some(base_str.clone()), false).unwrap_err();
        assert!(err.to_string().contains("already exists"));

        run(Some(base_str), true).unwrap();
        let config = Config::load_from(&base.join(CONFIG_FILE)).unwrap();
        assert_eq!(config.intents.len(), 3);
    }
}
