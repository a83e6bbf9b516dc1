//! # Semroute Embeddings
//!
//! Encoder backends for semroute intent routing.
//!
//! Every backend implements [`semroute_core::encoder::Encoder`], so any of
//! them can be handed to a router:
//! - [`HashingEncoder`]: feature hashing, no model files needed
//! - [`WordVectorEncoder`]: averaged word vectors from a `.vec` table
//! - `ApiEncoder`: remote embedding APIs (OpenAI, Voyage, Cohere, custom)
//!
//! ## Features
//!
//! - `api`: API-based embeddings (OpenAI, Voyage, etc.)
//!
//! ## Usage
//!
//! ```rust
//! use semroute_core::prelude::*;
//! use semroute_embeddings::HashingEncoder;
//! use std::sync::Arc;
//!
//! let router = Router::builder(Arc::new(HashingEncoder::new(256)))
//!     .intent("BookFlight", ["book a flight to paris", "find me plane tickets"])
//!     .intent("WeatherInfo", ["is it raining today", "what is the weather forecast"])
//!     .build()
//!     .unwrap();
//!
//! let result = router.classify("book a flight").unwrap();
//! assert_eq!(result.intent(), Some("BookFlight"));
//! ```

mod error;
mod hashing;
mod normalize;
mod word_vectors;

pub use error::{EmbeddingError, EmbeddingResult};
pub use hashing::HashingEncoder;
pub use normalize::{mean_pool, normalize_l2};
pub use word_vectors::WordVectorEncoder;

#[cfg(feature = "api")]
mod api;
#[cfg(feature = "api")]
pub use api::{ApiConfig, ApiEncoder, ApiProvider};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::normalize_l2;
    pub use crate::{EmbeddingError, EmbeddingResult};
    pub use crate::{HashingEncoder, WordVectorEncoder};

    #[cfg(feature = "api")]
    pub use crate::{ApiConfig, ApiEncoder, ApiProvider};
}
