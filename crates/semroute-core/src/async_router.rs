//! Async encoders and router.
//!
//! Requires the `async` feature:
//! ```toml
//! semroute-core = { version = "0.1", features = ["async"] }
//! ```
//!
//! Catalog pre-encoding runs every (intent, example) slot concurrently with a
//! bounded number of requests in flight. Results are written by slot, so the
//! completion order does not matter.
//!
//! # Example
//!
//! ```rust,ignore
//! use semroute_core::async_router::{AsyncRouter, BlockingEncoder};
//! use semroute_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let encoder = Arc::new(BlockingEncoder::new(my_encoder));
//!     let catalog = IntentCatalog::build(specs)?;
//!     let router = AsyncRouter::new(catalog, encoder, RouterConfig::default()).await?;
//!     let result = router.classify("is it raining in Berlin").await?;
//!     Ok(())
//! }
//! ```

use crate::aggregation::AggregationPolicy;
use crate::catalog::IntentCatalog;
use crate::decision::decide;
use crate::encoder::Encoder;
use crate::error::{EncoderError, EncoderResult, Result, RouterError};
use crate::router::{log_result, score_intents, validate_query, RouterConfig};
use crate::types::{RoutingResult, Vector};
use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::{debug, info};

/// Default cap on concurrent encoder calls during catalog encoding.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 8;

/// Non-blocking counterpart of [`Encoder`].
#[async_trait]
pub trait AsyncEncoder: Send + Sync {
    /// Encode a single text.
    async fn encode(&self, text: &str) -> EncoderResult<Vector>;

    /// Model name/identifier.
    fn model_name(&self) -> &str;
}

/// Runs a blocking [`Encoder`] on tokio's blocking thread pool.
pub struct BlockingEncoder<E> {
    inner: Arc<E>,
}

impl<E: Encoder + 'static> BlockingEncoder<E> {
    pub fn new(encoder: E) -> Self {
        Self {
            inner: Arc::new(encoder),
        }
    }

    pub fn from_arc(encoder: Arc<E>) -> Self {
        Self { inner: encoder }
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }
}

#[async_trait]
impl<E: Encoder + 'static> AsyncEncoder for BlockingEncoder<E> {
    async fn encode(&self, text: &str) -> EncoderResult<Vector> {
        let encoder = Arc::clone(&self.inner);
        let text = text.to_string();
        tokio::task::spawn_blocking(move || encoder.encode(&text))
            .await
            .map_err(EncoderError::new)?
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}

impl IntentCatalog {
    /// Encode every example concurrently, at most `max_in_flight` at a time.
    ///
    /// Same guarantees as [`IntentCatalog::encode_all`]: vectors are replaced,
    /// not appended, and a failure or dimension mismatch leaves the previous
    /// vectors in place. The first encoder failure is returned.
    pub async fn encode_all_concurrent(
        &mut self,
        encoder: &dyn AsyncEncoder,
        max_in_flight: usize,
    ) -> Result<()> {
        let slots: Vec<(usize, usize, &str)> = self
            .intents()
            .enumerate()
            .flat_map(|(i, intent)| {
                intent
                    .examples()
                    .iter()
                    .enumerate()
                    .map(move |(j, example)| (i, j, example.as_str()))
            })
            .collect();

        let done: Vec<(usize, usize, Vector)> = stream::iter(slots)
            .map(|(i, j, text)| async move {
                encoder
                    .encode(text)
                    .await
                    .map(|vector| (i, j, vector))
                    .map_err(RouterError::from)
            })
            .buffer_unordered(max_in_flight.max(1))
            .try_collect()
            .await?;

        let mut encoded: Vec<Vec<Option<Vector>>> = self
            .intents()
            .map(|intent| vec![None; intent.examples().len()])
            .collect();
        for (i, j, vector) in done {
            encoded[i][j] = Some(vector);
        }

        debug!(
            intents = encoded.len(),
            model = encoder.model_name(),
            "encoded catalog concurrently"
        );

        let encoded = encoded
            .into_iter()
            .map(|slots| slots.into_iter().flatten().collect())
            .collect();
        self.install_vectors(encoded)
    }
}

/// Async counterpart of [`Router`](crate::router::Router).
pub struct AsyncRouter {
    catalog: IntentCatalog,
    encoder: Arc<dyn AsyncEncoder>,
    policy: Arc<dyn AggregationPolicy>,
    config: RouterConfig,
}

impl AsyncRouter {
    /// Build a router, encoding the catalog concurrently.
    pub async fn new(
        catalog: IntentCatalog,
        encoder: Arc<dyn AsyncEncoder>,
        config: RouterConfig,
    ) -> Result<Self> {
        Self::with_max_in_flight(catalog, encoder, config, DEFAULT_MAX_IN_FLIGHT).await
    }

    pub async fn with_max_in_flight(
        mut catalog: IntentCatalog,
        encoder: Arc<dyn AsyncEncoder>,
        config: RouterConfig,
        max_in_flight: usize,
    ) -> Result<Self> {
        config.validate()?;
        if catalog.is_empty() {
            return Err(RouterError::EmptyCatalog);
        }

        catalog
            .encode_all_concurrent(encoder.as_ref(), max_in_flight)
            .await?;

        info!(
            intents = catalog.len(),
            examples = catalog.example_count(),
            dimension = catalog.dimension(),
            model = encoder.model_name(),
            "async router ready"
        );

        Ok(Self {
            catalog,
            encoder,
            policy: Arc::new(config.aggregation),
            config,
        })
    }

    /// Classify one query. Same semantics as
    /// [`Router::classify`](crate::router::Router::classify).
    pub async fn classify(&self, text: &str) -> Result<RoutingResult> {
        validate_query(text)?;

        let query = self.encoder.encode(text).await?;
        let entries = score_intents(&self.catalog, &query, self.policy.as_ref())?;
        let result = decide(entries, self.config.threshold)?;

        log_result(&result);
        Ok(result)
    }

    pub fn catalog(&self) -> &IntentCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::IntentSpec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Sleeps longer for shorter texts, so completions arrive out of order.
    struct SlowEncoder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AsyncEncoder for SlowEncoder {
        async fn encode(&self, text: &str) -> EncoderResult<Vector> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let delay = 40u64.saturating_sub(text.len() as u64 * 2);
            tokio::time::sleep(Duration::from_millis(delay)).await;
            if text == "explode" {
                return Err(EncoderError::new("backend unavailable"));
            }
            Ok(Vector::from(vec![text.len() as f32, 1.0]))
        }

        fn model_name(&self) -> &str {
            "slow"
        }
    }

    struct Lengths;

    impl Encoder for Lengths {
        fn encode(&self, text: &str) -> EncoderResult<Vector> {
            Ok(Vector::from(vec![text.len() as f32, 1.0]))
        }

        fn model_name(&self) -> &str {
            "lengths"
        }
    }

    fn specs() -> Vec<IntentSpec> {
        vec![
            IntentSpec::new("Short", ["hi", "hey"]),
            IntentSpec::new("Long", ["a considerably longer utterance"]),
        ]
    }

    #[tokio::test]
    async fn concurrent_encoding_matches_sequential() {
        let mut sequential = IntentCatalog::build(specs()).unwrap();
        sequential.encode_all(&Lengths).unwrap();

        let mut concurrent = IntentCatalog::build(specs()).unwrap();
        let encoder = SlowEncoder {
            calls: AtomicUsize::new(0),
        };
        concurrent.encode_all_concurrent(&encoder, 4).await.unwrap();

        for (a, b) in sequential.intents().zip(concurrent.intents()) {
            assert_eq!(a.vectors(), b.vectors());
        }
        assert_eq!(encoder.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn concurrent_encoding_propagates_failure() {
        let mut catalog = IntentCatalog::build(vec![
            IntentSpec::new("Ok", ["fine"]),
            IntentSpec::new("Bad", ["explode"]),
        ])
        .unwrap();
        let encoder = SlowEncoder {
            calls: AtomicUsize::new(0),
        };

        let err = catalog.encode_all_concurrent(&encoder, 2).await.unwrap_err();
        assert!(matches!(err, RouterError::Encoder(_)));
        assert_eq!(err.to_string(), "backend unavailable");
        assert!(!catalog.is_encoded());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn async_router_with_blocking_encoder() {
        let encoder: Arc<dyn AsyncEncoder> = Arc::new(BlockingEncoder::new(Lengths));
        let catalog = IntentCatalog::build(specs()).unwrap();
        let router = AsyncRouter::new(catalog, encoder, RouterConfig::default())
            .await
            .unwrap();

        // Vectors [len, 1.0]: cosine prefers the example with the closest length ratio
        let result = router.classify("a considerably longer utterance").await.unwrap();
        assert_eq!(result.intent(), Some("Long"));
        assert_eq!(result.confidence(), Some(1.0));

        assert!(matches!(
            router.classify("").await,
            Err(RouterError::EmptyQuery)
        ));
    }

    #[tokio::test]
    async fn async_router_rejects_empty_catalog() {
        let encoder: Arc<dyn AsyncEncoder> = Arc::new(SlowEncoder {
            calls: AtomicUsize::new(0),
        });
        let catalog = IntentCatalog::build(Vec::new()).unwrap();
        let err = AsyncRouter::new(catalog, encoder, RouterConfig::default())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, RouterError::EmptyCatalog));
    }
}
