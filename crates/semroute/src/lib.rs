//! # semroute
//!
//! Semantic nearest-neighbor intent routing.
//!
//! Declare intents as a handful of example phrases, pick an embedding backend,
//! and route free-text queries to the closest intent, or to an explicit
//! no-match when nothing is close enough.
//!
//! ## Quick Start
//!
//! ```rust
//! use semroute::prelude::*;
//! use std::sync::Arc;
//!
//! let router = Router::builder(Arc::new(HashingEncoder::new(256)))
//!     .intent("BookFlight", ["book a flight to paris", "find me plane tickets"])
//!     .intent("WeatherInfo", ["is it raining today", "what is the weather forecast"])
//!     .intent("SmallTalk", ["hello how are you", "nice to meet you"])
//!     .build()
//!     .unwrap();
//!
//! let result = router.classify("is it raining today").unwrap();
//! assert_eq!(result.intent(), Some("WeatherInfo"));
//! assert_eq!(result.confidence(), Some(1.0));
//!
//! for entry in result.ranked() {
//!     println!("{} {:.3}", entry.intent, entry.score);
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`semroute_core`]: data model, catalog, cosine scoring, aggregation,
//!   decision and the [`Router`](prelude::Router)
//! - [`semroute_embeddings`]: encoder backends (hashing, word vectors, APIs)
//!
//! ## Thresholds
//!
//! Without a threshold the best-scoring intent always wins, even for
//! gibberish. With one, a top score strictly below it yields
//! `RoutingResult::NoMatch`, which still carries the full ranking:
//!
//! ```rust
//! use semroute::prelude::*;
//! use std::sync::Arc;
//!
//! let router = Router::builder(Arc::new(HashingEncoder::default()))
//!     .intent("BookFlight", ["book a flight"])
//!     .threshold(0.99)
//!     .build()
//!     .unwrap();
//!
//! let result = router.classify("quarterly tax filing deadline").unwrap();
//! assert!(!result.is_match());
//! assert_eq!(result.ranked().len(), 1);
//! ```

pub use semroute_core as core;
pub use semroute_embeddings as embeddings;

/// Prelude module for convenient imports.
///
/// ```rust
/// use semroute::prelude::*;
/// ```
pub mod prelude {
    pub use semroute_core::prelude::*;

    // Encoder backends
    pub use semroute_embeddings::{
        EmbeddingError, EmbeddingResult, HashingEncoder, WordVectorEncoder,
    };

    #[cfg(feature = "api")]
    pub use semroute_embeddings::{ApiConfig, ApiEncoder, ApiProvider};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
