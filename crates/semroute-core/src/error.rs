//! Error types for routing operations.
//!
//! Every failure in the pipeline is reported through [`RouterError`]; nothing
//! is coerced into a default score or a zero vector.

use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Result type for routing operations.
pub type Result<T> = std::result::Result<T, RouterError>;

/// Result type returned by encoders.
pub type EncoderResult<T> = std::result::Result<T, EncoderError>;

/// Errors that can occur while building a router or classifying a query.
#[derive(Debug, Error)]
pub enum RouterError {
    /// Malformed catalog or router configuration.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Two vectors of different length were compared.
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// A vector with zero (or non-finite) norm cannot be normalized.
    #[error("Degenerate vector: cannot normalize (|a| = {norm_a}, |b| = {norm_b})")]
    DegenerateVector { norm_a: f64, norm_b: f64 },

    /// Aggregation was asked to reduce an empty score list.
    #[error("Cannot aggregate an empty score list")]
    EmptyAggregation,

    /// Decision was asked to rank zero intents.
    #[error("Intent catalog is empty")]
    EmptyCatalog,

    /// The query text was empty or whitespace-only.
    #[error("Query is empty")]
    EmptyQuery,

    /// Failure raised by the encoder, passed through untouched.
    #[error(transparent)]
    Encoder(#[from] EncoderError),
}

/// Catalog and router configuration errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Duplicate intent name: {0}")]
    DuplicateIntent(String),

    #[error("Intent name is empty")]
    EmptyIntentName,

    #[error("Intent {0} has no examples")]
    NoExamples(String),

    #[error("Intent {intent} has a blank example at index {index}")]
    BlankExample { intent: String, index: usize },

    #[error("Intent {intent} example {index} encodes to a zero or non-finite vector")]
    DegenerateExample { intent: String, index: usize },

    #[error("Invalid threshold: {0} (must be finite)")]
    InvalidThreshold(f32),

    #[error("Invalid top-k: {0} (must be at least 1)")]
    InvalidTopK(usize),
}

/// Opaque error produced by an [`Encoder`](crate::encoder::Encoder).
///
/// The router never inspects it. Callers that know which backend they plugged
/// in can recover the concrete error with [`EncoderError::downcast_ref`].
pub struct EncoderError(Box<dyn StdError + Send + Sync + 'static>);

impl EncoderError {
    /// Wrap any backend error.
    pub fn new<E>(error: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync + 'static>>,
    {
        Self(error.into())
    }

    /// Borrow the concrete backend error, if it is of type `T`.
    pub fn downcast_ref<T: StdError + 'static>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Unwrap into the boxed backend error.
    pub fn into_inner(self) -> Box<dyn StdError + Send + Sync + 'static> {
        self.0
    }
}

impl fmt::Debug for EncoderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for EncoderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl StdError for EncoderError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

// Convenience constructors
impl RouterError {
    pub fn duplicate_intent(name: impl Into<String>) -> Self {
        RouterError::Configuration(ConfigError::DuplicateIntent(name.into()))
    }

    pub fn no_examples(name: impl Into<String>) -> Self {
        RouterError::Configuration(ConfigError::NoExamples(name.into()))
    }

    pub fn blank_example(intent: impl Into<String>, index: usize) -> Self {
        RouterError::Configuration(ConfigError::BlankExample {
            intent: intent.into(),
            index,
        })
    }

    pub fn degenerate_example(intent: impl Into<String>, index: usize) -> Self {
        RouterError::Configuration(ConfigError::DegenerateExample {
            intent: intent.into(),
            index,
        })
    }

    pub fn dimension_mismatch(expected: usize, got: usize) -> Self {
        RouterError::DimensionMismatch { expected, got }
    }

    /// True for errors caused by a malformed catalog or config.
    pub fn is_configuration(&self) -> bool {
        matches!(self, RouterError::Configuration(_))
    }
}
