//! semroute Core Prelude: convenient imports for common usage.
//!
//! ```rust
//! use semroute_core::prelude::*;
//! ```

// Re-export commonly used types
pub use crate::types::{NoMatchReason, RoutingResult, ScoreEntry, Vector};

// Pipeline stages
pub use crate::aggregation::{Aggregation, AggregationPolicy};
pub use crate::catalog::{Intent, IntentCatalog, IntentSpec};
pub use crate::decision::decide;
pub use crate::similarity::cosine_similarity;

// Re-export the Encoder trait
pub use crate::encoder::Encoder;

// Re-export the Router
pub use crate::router::{Router, RouterBuilder, RouterConfig};

// Re-export error types
pub use crate::error::{ConfigError, EncoderError, EncoderResult, Result, RouterError};

#[cfg(feature = "async")]
pub use crate::async_router::{AsyncEncoder, AsyncRouter, BlockingEncoder};
