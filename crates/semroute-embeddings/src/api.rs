//! API-based encoders (OpenAI, Voyage, Cohere, OpenAI-compatible endpoints).
//!
//! Requires the `api` feature. Requests are blocking and are not retried;
//! retry policy belongs to whoever wraps this encoder.

use crate::{EmbeddingError, EmbeddingResult};
use semroute_core::encoder::Encoder;
use semroute_core::error::EncoderResult;
use semroute_core::types::Vector;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// API provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiProvider {
    /// OpenAI embeddings (text-embedding-3-small, text-embedding-3-large).
    OpenAI,
    /// Voyage AI embeddings (voyage-large-2, voyage-code-2).
    Voyage,
    /// Cohere embeddings (embed-english-v3.0).
    Cohere,
    /// Custom API endpoint.
    Custom,
}

/// Configuration for API-based encoders.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// API provider.
    pub provider: ApiProvider,
    /// API key (required for most providers).
    pub api_key: String,
    /// Model name.
    pub model: String,
    /// API endpoint (optional, uses default for provider).
    pub endpoint: Option<String>,
    /// Embedding dimension (for providers that support it).
    pub dimensions: Option<usize>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Create config for OpenAI embeddings.
    pub fn openai(api_key: &str) -> Self {
        Self {
            provider: ApiProvider::OpenAI,
            api_key: api_key.to_string(),
            model: "text-embedding-3-small".to_string(),
            endpoint: None,
            dimensions: Some(1536),
            timeout_secs: 30,
        }
    }

    /// Create config for Voyage AI.
    pub fn voyage(api_key: &str) -> Self {
        Self {
            provider: ApiProvider::Voyage,
            api_key: api_key.to_string(),
            model: "voyage-large-2".to_string(),
            endpoint: None,
            dimensions: Some(1024),
            timeout_secs: 30,
        }
    }

    /// Create config for Cohere.
    pub fn cohere(api_key: &str) -> Self {
        Self {
            provider: ApiProvider::Cohere,
            api_key: api_key.to_string(),
            model: "embed-english-v3.0".to_string(),
            endpoint: None,
            dimensions: Some(1024),
            timeout_secs: 30,
        }
    }

    /// Create config for a custom API endpoint.
    pub fn custom(endpoint: &str, api_key: &str, model: &str, dimensions: usize) -> Self {
        Self {
            provider: ApiProvider::Custom,
            api_key: api_key.to_string(),
            model: model.to_string(),
            endpoint: Some(endpoint.to_string()),
            dimensions: Some(dimensions),
            timeout_secs: 30,
        }
    }

    /// Set the model.
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Set dimensions (for models that support dimension reduction).
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    /// Set timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

// ============================================================================
// Request/Response types for different APIs
// ============================================================================

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    input: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    data: Vec<OpenAIEmbedding>,
}

#[derive(Debug, Deserialize)]
struct OpenAIEmbedding {
    embedding: Vec<f32>,
}

#[derive(Debug, Serialize)]
struct VoyageRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct VoyageResponse {
    data: Vec<VoyageEmbedding>,
}

#[derive(Debug, Deserialize)]
struct VoyageEmbedding {
    embedding: Vec<f32>,
}

#[derive(Debug, Serialize)]
struct CohereRequest {
    model: String,
    texts: Vec<String>,
    input_type: String,
}

#[derive(Debug, Deserialize)]
struct CohereResponse {
    embeddings: Vec<Vec<f32>>,
}

// ============================================================================
// ApiEncoder implementation
// ============================================================================

/// API-based encoder for cloud embedding services.
///
/// Owns its HTTP client for its whole lifetime.
///
/// # Example
///
/// ```rust,ignore
/// use semroute_embeddings::{ApiConfig, ApiEncoder};
///
/// let config = ApiConfig::openai(&std::env::var("OPENAI_API_KEY")?);
/// let encoder = ApiEncoder::new(config)?;
/// let router = Router::builder(Arc::new(encoder))
///     .intent("BookFlight", ["book a flight"])
///     .build()?;
/// ```
pub struct ApiEncoder {
    config: ApiConfig,
    client: reqwest::blocking::Client,
}

impl ApiEncoder {
    /// Create a new API encoder with the given config.
    pub fn new(config: ApiConfig) -> EmbeddingResult<Self> {
        if config.provider == ApiProvider::Custom && config.endpoint.is_none() {
            return Err(EmbeddingError::InvalidInput(
                "Custom provider requires an endpoint".to_string(),
            ));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EmbeddingError::ApiError(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Get the API endpoint for the configured provider.
    pub fn endpoint(&self) -> &str {
        if let Some(ref endpoint) = self.config.endpoint {
            return endpoint;
        }

        match self.config.provider {
            ApiProvider::OpenAI => "https://api.openai.com/v1/embeddings",
            ApiProvider::Voyage => "https://api.voyageai.com/v1/embeddings",
            ApiProvider::Cohere => "https://api.cohere.ai/v1/embed",
            ApiProvider::Custom => "",
        }
    }

    /// POST a JSON request and decode the JSON response.
    fn post<Req, Resp>(&self, request: &Req) -> EmbeddingResult<Resp>
    where
        Req: Serialize,
        Resp: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .map_err(|e| EmbeddingError::ApiError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(EmbeddingError::ApiError(format!(
                "{:?} API error {}: {}",
                self.config.provider, status, body
            )));
        }

        response
            .json()
            .map_err(|e| EmbeddingError::ApiError(e.to_string()))
    }

    /// Embed texts with whichever wire format the provider speaks.
    pub fn embed_batch(&self, texts: &[&str]) -> EmbeddingResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        if texts.iter().any(|t| t.trim().is_empty()) {
            return Err(EmbeddingError::InvalidInput("Empty text".to_string()));
        }

        let input: Vec<String> = texts.iter().map(|s| s.to_string()).collect();
        let vectors = match self.config.provider {
            // Custom endpoints use the OpenAI-compatible format
            ApiProvider::OpenAI | ApiProvider::Custom => {
                let resp: OpenAIResponse = self.post(&OpenAIRequest {
                    model: self.config.model.clone(),
                    input,
                    dimensions: self.config.dimensions,
                })?;
                resp.data.into_iter().map(|e| e.embedding).collect()
            }
            ApiProvider::Voyage => {
                let resp: VoyageResponse = self.post(&VoyageRequest {
                    model: self.config.model.clone(),
                    input,
                })?;
                resp.data.into_iter().map(|e| e.embedding).collect()
            }
            ApiProvider::Cohere => {
                let resp: CohereResponse = self.post(&CohereRequest {
                    model: self.config.model.clone(),
                    texts: input,
                    input_type: "classification".to_string(),
                })?;
                resp.embeddings
            }
        };

        check_response(texts.len(), vectors)
    }
}

/// One non-empty vector per input, all of the same length.
fn check_response(expected: usize, vectors: Vec<Vec<f32>>) -> EmbeddingResult<Vec<Vec<f32>>> {
    if vectors.len() != expected {
        return Err(EmbeddingError::ApiError(format!(
            "Expected {} embeddings, got {}",
            expected,
            vectors.len()
        )));
    }
    if vectors.iter().any(Vec::is_empty) {
        return Err(EmbeddingError::ApiError("Empty embedding returned".to_string()));
    }
    if let Some(first) = vectors.first() {
        let dimension = first.len();
        if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
            return Err(EmbeddingError::DimensionMismatch {
                expected: dimension,
                got: bad.len(),
            });
        }
    }
    Ok(vectors)
}

impl Encoder for ApiEncoder {
    fn encode(&self, text: &str) -> EncoderResult<Vector> {
        let vectors = self.embed_batch(&[text])?;
        vectors
            .into_iter()
            .next()
            .map(Vector::from)
            .ok_or_else(|| EmbeddingError::ApiError("No embedding returned".to_string()).into())
    }

    fn encode_batch(&self, texts: &[&str]) -> EncoderResult<Vec<Vector>> {
        let vectors = self.embed_batch(texts)?;
        debug!(
            provider = ?self.config.provider,
            model = %self.config.model,
            count = vectors.len(),
            "encoded batch"
        );
        Ok(vectors.into_iter().map(Vector::from).collect())
    }

    fn dimension(&self) -> Option<usize> {
        self.config.dimensions
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
