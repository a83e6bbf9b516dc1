//! # semroute Core
//!
//! Semantic nearest-neighbor intent routing.
//!
//! A fixed set of named intents, each described by a few example utterances,
//! is embedded into a vector space once. Each incoming query is embedded, scored
//! against every intent's examples with cosine similarity, reduced to one score
//! per intent, and resolved to a match or an explicit no-match:
//!
//! ```text
//! text ──Encoder──▶ Vector ──similarity + aggregation──▶ [ScoreEntry] ──decide──▶ RoutingResult
//! ```
//!
//! The embedding backend is injected through the [`Encoder`](encoder::Encoder)
//! trait; the core knows nothing about how vectors are produced.
//!
//! ## Quick Start
//!
//! ```rust
//! use semroute_core::prelude::*;
//! use std::sync::Arc;
//!
//! // A toy encoder: one axis per known phrase
//! struct Phrasebook;
//!
//! impl Encoder for Phrasebook {
//!     fn encode(&self, text: &str) -> EncoderResult<Vector> {
//!         let v = match text {
//!             "book a flight" => vec![1.0, 0.0, 0.0],
//!             "is it raining" => vec![0.0, 1.0, 0.0],
//!             _ => vec![0.0, 0.0, 1.0],
//!         };
//!         Ok(Vector::from(v))
//!     }
//!
//!     fn model_name(&self) -> &str {
//!         "phrasebook"
//!     }
//! }
//!
//! let router = Router::builder(Arc::new(Phrasebook))
//!     .intent("BookFlight", ["book a flight"])
//!     .intent("WeatherInfo", ["is it raining"])
//!     .threshold(0.5)
//!     .build()
//!     .unwrap();
//!
//! let result = router.classify("book a flight").unwrap();
//! assert_eq!(result.intent(), Some("BookFlight"));
//!
//! let result = router.classify("completely unrelated").unwrap();
//! assert!(!result.is_match());
//! ```

pub mod aggregation;
pub mod catalog;
pub mod decision;
pub mod encoder;
pub mod error;
pub mod router;
pub mod similarity;
pub mod types;
pub mod prelude;

#[cfg(feature = "async")]
pub mod async_router;
