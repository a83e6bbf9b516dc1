//! Configuration management for the semroute CLI.

use anyhow::{bail, Context, Result};
use semroute::core::catalog::IntentSpec;
use semroute::core::encoder::Encoder;
use semroute::core::router::RouterConfig;
use semroute::embeddings::{HashingEncoder, WordVectorEncoder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Config file name looked up in the current and parent directories.
pub const CONFIG_FILE: &str = "semroute.toml";

/// semroute project configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub router: RouterConfig,
    #[serde(default)]
    pub encoder: EncoderConfig,
    #[serde(default)]
    pub intents: Vec<IntentSpec>,

    /// Directory of the loaded file; relative paths resolve against it.
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

/// Which embedding backend to build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum EncoderConfig {
    Hashing {
        #[serde(default = "default_dimension")]
        dimension: usize,
    },
    WordVectors {
        path: PathBuf,
        #[serde(default = "default_lowercase")]
        lowercase: bool,
    },
    Api {
        #[serde(default = "default_provider")]
        provider: String,
        #[serde(default)]
        model: Option<String>,
        #[serde(default)]
        endpoint: Option<String>,
        #[serde(default)]
        dimensions: Option<usize>,
        #[serde(default = "default_api_key_env")]
        api_key_env: String,
        #[serde(default)]
        timeout_secs: Option<u64>,
    },
}

// Default value functions
fn default_dimension() -> usize { 256 }
fn default_lowercase() -> bool { true }
fn default_provider() -> String { "openai".to_string() }
fn default_api_key_env() -> String { "OPENAI_API_KEY".to_string() }
fn default_threshold() -> f32 { 0.25 }

impl Default for EncoderConfig {
    fn default() -> Self {
        EncoderConfig::Hashing {
            dimension: default_dimension(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            router: RouterConfig::default().with_threshold(default_threshold()),
            encoder: EncoderConfig::default(),
            intents: default_intents(),
            base_dir: None,
        }
    }
}

/// Starter catalog written by `semroute init`.
fn default_intents() -> Vec<IntentSpec> {
    vec![
        IntentSpec::new(
            "BookFlight",
            [
                "book a flight to paris",
                "i need a plane ticket",
                "find me flights to tokyo",
                "reserve a seat on the next flight",
            ],
        ),
        IntentSpec::new(
            "WeatherInfo",
            [
                "what is the weather like today",
                "is it going to rain tomorrow",
                "weather forecast for the weekend",
                "how hot is it outside",
            ],
        ),
        IntentSpec::new(
            "SmallTalk",
            [
                "hello how are you",
                "good morning",
                "tell me a joke",
                "nice to meet you",
            ],
        ),
    ]
}

impl Config {
    /// Load config from `explicit`, or from semroute.toml in the current or
    /// parent directories. Falls back to the defaults when nothing is found.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => find_config_file(&std::env::current_dir()?),
        };

        match path {
            Some(path) => Self::load_from(&path),
            None => {
                info!("no {} found, using built-in defaults", CONFIG_FILE);
                Ok(Config::default())
            }
        }
    }

    /// Load and parse one config file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        debug!(path = %path.display(), intents = config.intents.len(), "loaded config");
        Ok(config)
    }

    /// Save config to the specified path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_toml()?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Generate default config as TOML string.
    pub fn default_toml() -> Result<String> {
        Config::default().to_toml()
    }

    /// Resolve a path from the config file against the file's directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Build the configured encoder.
    pub fn build_encoder(&self) -> Result<Arc<dyn Encoder>> {
        match &self.encoder {
            EncoderConfig::Hashing { dimension } => {
                if *dimension == 0 {
                    bail!("encoder.dimension must be greater than zero");
                }
                Ok(Arc::new(HashingEncoder::new(*dimension)))
            }
            EncoderConfig::WordVectors { path, lowercase } => {
                let path = self.resolve_path(path);
                let encoder = WordVectorEncoder::from_path(&path)
                    .with_context(|| format!("Failed to load word vectors: {}", path.display()))?
                    .with_lowercase(*lowercase);
                Ok(Arc::new(encoder))
            }
            #[cfg(feature = "api")]
            EncoderConfig::Api {
                provider,
                model,
                endpoint,
                dimensions,
                api_key_env,
                timeout_secs,
            } => {
                use semroute::embeddings::{ApiConfig, ApiEncoder};

                let api_key = std::env::var(api_key_env)
                    .with_context(|| format!("Environment variable {} is not set", api_key_env))?;

                let mut config = match provider.as_str() {
                    "openai" => ApiConfig::openai(&api_key),
                    "voyage" => ApiConfig::voyage(&api_key),
                    "cohere" => ApiConfig::cohere(&api_key),
                    "custom" => {
                        let Some(endpoint) = endpoint else {
                            bail!("encoder.endpoint is required for the custom provider");
                        };
                        let Some(model) = model else {
                            bail!("encoder.model is required for the custom provider");
                        };
                        let mut config = ApiConfig::custom(endpoint, &api_key, model, 0);
                        config.dimensions = *dimensions;
                        config
                    }
                    other => bail!(
                        "Unknown API provider {:?} (expected openai, voyage, cohere or custom)",
                        other
                    ),
                };

                if let Some(model) = model {
                    config = config.with_model(model);
                }
                if let Some(dimensions) = dimensions {
                    config = config.with_dimensions(*dimensions);
                }
                if let Some(secs) = timeout_secs {
                    config = config.with_timeout(*secs);
                }

                Ok(Arc::new(ApiEncoder::new(config)?))
            }
            #[cfg(not(feature = "api"))]
            EncoderConfig::Api { .. } => bail!(
                "encoder kind \"api\" requires semroute built with the `api` feature"
            ),
        }
    }
}

/// Find semroute.toml in `start` or its parent directories.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}
