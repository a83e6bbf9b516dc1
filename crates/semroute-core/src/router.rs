//! The router: encode query, score against catalog, aggregate, decide.

use crate::aggregation::{Aggregation, AggregationPolicy};
use crate::catalog::{IntentCatalog, IntentSpec};
use crate::decision::decide;
use crate::encoder::Encoder;
use crate::error::{ConfigError, Result, RouterError};
use crate::similarity::similarities;
use crate::types::{RoutingResult, ScoreEntry};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Router configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Minimum top score for a match. `None` always matches the best intent.
    #[serde(default)]
    pub threshold: Option<f32>,
    /// How per-example similarities are reduced to one score per intent.
    #[serde(default)]
    pub aggregation: Aggregation,
}

impl RouterConfig {
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(threshold) = self.threshold {
            if !threshold.is_finite() {
                return Err(ConfigError::InvalidThreshold(threshold).into());
            }
        }
        self.aggregation.validate()
    }
}

/// Score a query vector against every intent of an encoded catalog.
///
/// Entries come back in catalog order, each tagged with its declaration
/// position.
pub fn score_intents(
    catalog: &IntentCatalog,
    query: &[f32],
    policy: &dyn AggregationPolicy,
) -> Result<Vec<ScoreEntry>> {
    if let Some(dimension) = catalog.dimension() {
        if query.len() != dimension {
            return Err(RouterError::dimension_mismatch(dimension, query.len()));
        }
    }

    catalog
        .intents()
        .enumerate()
        .map(|(position, intent)| {
            let scores = similarities(query, intent.vectors())?;
            let score = policy.aggregate(&scores)?;
            Ok(ScoreEntry::new(intent.name(), score, position))
        })
        .collect()
}

pub(crate) fn validate_query(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(RouterError::EmptyQuery);
    }
    Ok(())
}

pub(crate) fn log_result(result: &RoutingResult) {
    match result {
        RoutingResult::Matched {
            intent, confidence, ..
        } => debug!(intent = %intent, confidence, "query matched"),
        RoutingResult::NoMatch { reason, .. } => debug!(reason = %reason, "query did not match"),
    }
}

/// Semantic nearest-neighbor intent router.
///
/// Examples are encoded once at construction; afterwards [`Router::classify`]
/// only reads shared state, so one router can serve concurrent callers.
///
/// # Example
///
/// ```rust,ignore
/// use semroute_core::prelude::*;
///
/// let router = Router::builder(encoder)
///     .intent("BookFlight", ["book a flight", "find me tickets"])
///     .intent("WeatherInfo", ["is it raining", "weather today"])
///     .threshold(0.5)
///     .build()?;
///
/// match router.classify("book me a flight to Tokyo")? {
///     RoutingResult::Matched { intent, confidence, .. } => println!("{intent} ({confidence:.2})"),
///     RoutingResult::NoMatch { reason, .. } => println!("no match: {reason}"),
/// }
/// ```
pub struct Router {
    catalog: IntentCatalog,
    encoder: Arc<dyn Encoder>,
    policy: Arc<dyn AggregationPolicy>,
    config: RouterConfig,
}

impl Router {
    /// Build a router, encoding every catalog example with `encoder`.
    ///
    /// # Errors
    ///
    /// Fails on an invalid config, an empty catalog, or any encoding error.
    pub fn new(
        catalog: IntentCatalog,
        encoder: Arc<dyn Encoder>,
        config: RouterConfig,
    ) -> Result<Self> {
        let policy: Arc<dyn AggregationPolicy> = Arc::new(config.aggregation);
        Self::with_policy(catalog, encoder, policy, config)
    }

    /// Build a router with a custom aggregation policy. `config.aggregation`
    /// is ignored.
    pub fn with_policy(
        mut catalog: IntentCatalog,
        encoder: Arc<dyn Encoder>,
        policy: Arc<dyn AggregationPolicy>,
        config: RouterConfig,
    ) -> Result<Self> {
        config.validate()?;
        if catalog.is_empty() {
            return Err(RouterError::EmptyCatalog);
        }

        catalog.encode_all(encoder.as_ref())?;

        info!(
            intents = catalog.len(),
            examples = catalog.example_count(),
            dimension = catalog.dimension(),
            model = encoder.model_name(),
            aggregation = policy.name(),
            threshold = config.threshold,
            "router ready"
        );

        Ok(Self {
            catalog,
            encoder,
            policy,
            config,
        })
    }

    /// Start building a router around `encoder`.
    pub fn builder(encoder: Arc<dyn Encoder>) -> RouterBuilder {
        RouterBuilder::new(encoder)
    }

    /// Classify one query.
    ///
    /// Encodes `text` exactly once, scores it against every intent and applies
    /// the threshold policy.
    ///
    /// # Errors
    ///
    /// [`RouterError::EmptyQuery`] for blank text; encoder failures are passed
    /// through as [`RouterError::Encoder`]; similarity errors
    /// (dimension mismatch, degenerate vector) are reported as-is.
    pub fn classify(&self, text: &str) -> Result<RoutingResult> {
        validate_query(text)?;

        let query = self.encoder.encode(text)?;
        let entries = score_intents(&self.catalog, &query, self.policy.as_ref())?;
        let result = decide(entries, self.config.threshold)?;

        log_result(&result);
        Ok(result)
    }

    /// Classify many queries independently.
    ///
    /// A failing query yields an `Err` in its slot; the rest still run.
    pub fn classify_batch(&self, texts: &[&str]) -> Vec<Result<RoutingResult>> {
        texts.iter().map(|text| self.classify(text)).collect()
    }

    pub fn catalog(&self) -> &IntentCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn policy(&self) -> &dyn AggregationPolicy {
        self.policy.as_ref()
    }

    pub fn encoder_name(&self) -> &str {
        self.encoder.model_name()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("intents", &self.catalog.len())
            .field("encoder", &self.encoder.model_name())
            .field("policy", &self.policy)
            .field("config", &self.config)
            .finish()
    }
}

/// Incremental construction of a [`Router`].
pub struct RouterBuilder {
    encoder: Arc<dyn Encoder>,
    specs: Vec<IntentSpec>,
    config: RouterConfig,
    policy: Option<Arc<dyn AggregationPolicy>>,
}

impl RouterBuilder {
    pub fn new(encoder: Arc<dyn Encoder>) -> Self {
        Self {
            encoder,
            specs: Vec::new(),
            config: RouterConfig::default(),
            policy: None,
        }
    }

    /// Add one intent.
    pub fn intent<I, S>(mut self, name: impl Into<String>, examples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.specs.push(IntentSpec::new(name, examples));
        self
    }

    /// Add several intents.
    pub fn intents(mut self, specs: impl IntoIterator<Item = IntentSpec>) -> Self {
        self.specs.extend(specs);
        self
    }

    pub fn threshold(mut self, threshold: f32) -> Self {
        self.config.threshold = Some(threshold);
        self
    }

    pub fn aggregation(mut self, aggregation: Aggregation) -> Self {
        self.config.aggregation = aggregation;
        self
    }

    /// Use a custom aggregation policy instead of a built-in one.
    pub fn policy(mut self, policy: Arc<dyn AggregationPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<Router> {
        let catalog = IntentCatalog::build(self.specs)?;
        match self.policy {
            Some(policy) => Router::with_policy(catalog, self.encoder, policy, self.config),
            None => Router::new(catalog, self.encoder, self.config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EncoderResult;
    use crate::types::Vector;

    /// Maps a fixed set of texts to fixed vectors.
    struct TableEncoder;

    impl Encoder for TableEncoder {
        fn encode(&self, text: &str) -> EncoderResult<Vector> {
            let v = match text {
                "north" => vec![0.0, 1.0],
                "east" => vec![1.0, 0.0],
                "north-east" => vec![1.0, 1.0],
                "nowhere" => vec![0.0, 0.0],
                "wide" => vec![1.0, 0.0, 0.0],
                _ => vec![-1.0, -1.0],
            };
            Ok(Vector::from(v))
        }

        fn model_name(&self) -> &str {
            "table"
        }
    }

    #[derive(Debug)]
    struct AlwaysHalf;

    impl AggregationPolicy for AlwaysHalf {
        fn aggregate(&self, scores: &[f32]) -> Result<f32> {
            if scores.is_empty() {
                return Err(RouterError::EmptyAggregation);
            }
            Ok(0.5)
        }

        fn name(&self) -> &str {
            "always_half"
        }
    }

    fn router(threshold: Option<f32>) -> Router {
        let mut builder = Router::builder(Arc::new(TableEncoder))
            .intent("Up", ["north"])
            .intent("Right", ["east"]);
        if let Some(t) = threshold {
            builder = builder.threshold(t);
        }
        builder.build().unwrap()
    }

    #[test]
    fn classifies_exact_example() {
        let result = router(None).classify("east").unwrap();
        assert_eq!(result.intent(), Some("Right"));
        assert_eq!(result.confidence(), Some(1.0));
        assert_eq!(result.score_of("Up"), Some(0.0));
    }

    #[test]
    fn diagonal_ties_go_to_first_declared() {
        let result = router(None).classify("north-east").unwrap();
        assert_eq!(result.intent(), Some("Up"));
        let ranked = result.ranked();
        assert!((ranked[0].score - ranked[1].score).abs() < 1e-6);
    }

    #[test]
    fn threshold_gates_weak_matches() {
        let result = router(Some(0.9)).classify("north-east").unwrap();
        assert!(!result.is_match());
        assert_eq!(result.ranked().len(), 2);
    }

    #[test]
    fn blank_query_is_rejected() {
        assert!(matches!(
            router(None).classify("  \n"),
            Err(RouterError::EmptyQuery)
        ));
    }

    #[test]
    fn zero_query_vector_is_degenerate() {
        assert!(matches!(
            router(None).classify("nowhere"),
            Err(RouterError::DegenerateVector { .. })
        ));
    }

    #[test]
    fn query_dimension_mismatch_is_reported() {
        assert!(matches!(
            router(None).classify("wide"),
            Err(RouterError::DimensionMismatch {
                expected: 2,
                got: 3
            })
        ));
    }

    #[test]
    fn empty_catalog_is_rejected_at_build() {
        let err = Router::builder(Arc::new(TableEncoder)).build().unwrap_err();
        assert!(matches!(err, RouterError::EmptyCatalog));
    }

    #[test]
    fn non_finite_threshold_is_rejected() {
        let err = Router::builder(Arc::new(TableEncoder))
            .intent("Up", ["north"])
            .threshold(f32::NAN)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            RouterError::Configuration(ConfigError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn custom_policy_is_used() {
        let router = Router::builder(Arc::new(TableEncoder))
            .intent("Up", ["north"])
            .intent("Right", ["east"])
            .policy(Arc::new(AlwaysHalf))
            .build()
            .unwrap();

        assert_eq!(router.policy().name(), "always_half");
        let result = router.classify("east").unwrap();
        // Both score 0.5; first declared wins
        assert_eq!(result.intent(), Some("Up"));
        assert_eq!(result.confidence(), Some(0.5));
    }

    #[test]
    fn batch_isolates_failures() {
        let results = router(None).classify_batch(&["north", "", "east"]);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().intent(), Some("Up"));
        assert!(matches!(results[1], Err(RouterError::EmptyQuery)));
        assert_eq!(results[2].as_ref().unwrap().intent(), Some("Right"));
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: RouterConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RouterConfig::default());

        let config: RouterConfig =
            serde_json::from_str(r#"{"threshold":0.6,"aggregation":"mean"}"#).unwrap();
        assert_eq!(config.threshold, Some(0.6));
        assert_eq!(config.aggregation, Aggregation::Mean);
    }
}
