//! Routing through the bundled encoder backends.

use semroute_core::prelude::*;
use semroute_embeddings::{HashingEncoder, WordVectorEncoder};
use std::io::Cursor;
use std::sync::Arc;

const VECTORS: &str = "\
6 3
book 1.0 0.0 0.0
flight 0.9 0.1 0.0
ticket 0.8 0.2 0.0
rain 0.0 1.0 0.0
weather 0.1 0.9 0.0
hello 0.0 0.0 1.0
";

fn word_vector_router(threshold: Option<f32>) -> Router {
    let encoder = WordVectorEncoder::from_reader(Cursor::new(VECTORS)).unwrap();
    let mut builder = Router::builder(Arc::new(encoder))
        .intent("BookFlight", ["book a flight", "buy a ticket"])
        .intent("WeatherInfo", ["will it rain", "weather today"])
        .intent("SmallTalk", ["hello there"]);
    if let Some(t) = threshold {
        builder = builder.threshold(t);
    }
    builder.build().unwrap()
}

#[test]
fn word_vectors_route_by_meaning_not_spelling() {
    let router = word_vector_router(Some(0.8));

    let result = router.classify("I need a plane ticket").unwrap();
    assert_eq!(result.intent(), Some("BookFlight"));

    let result = router.classify("Rain?").unwrap();
    assert_eq!(result.intent(), Some("WeatherInfo"));
}

#[test]
fn out_of_vocabulary_query_is_degenerate() {
    let router = word_vector_router(None);
    let err = router.classify("quantum chromodynamics").unwrap_err();
    assert!(matches!(err, RouterError::DegenerateVector { .. }));
}

#[test]
fn out_of_vocabulary_example_fails_the_build() {
    let encoder = WordVectorEncoder::from_reader(Cursor::new(VECTORS)).unwrap();
    let err = Router::builder(Arc::new(encoder))
        .intent("Greet", ["hello"])
        .intent("Unknown", ["hello", "xyzzy plugh"])
        .build()
        .unwrap_err();

    assert!(err.is_configuration());
    assert!(matches!(
        err,
        RouterError::Configuration(ConfigError::DegenerateExample { ref intent, index: 1 })
            if intent == "Unknown"
    ));
}

#[test]
fn tokenless_example_fails_the_build() {
    let err = Router::builder(Arc::new(HashingEncoder::default()))
        .intent("BookFlight", ["book a flight"])
        .intent("Ack", ["k"])
        .build()
        .unwrap_err();

    assert!(matches!(
        err,
        RouterError::Configuration(ConfigError::DegenerateExample { index: 0, .. })
    ));
}

#[test]
fn hashing_encoder_recovers_every_example() {
    let router = Router::builder(Arc::new(HashingEncoder::default()))
        .intent("BookFlight", ["book a flight to paris", "find me plane tickets"])
        .intent("WeatherInfo", ["is it raining today", "weather forecast for tomorrow"])
        .intent("SmallTalk", ["hello how are you", "tell me a joke"])
        .threshold(0.5)
        .build()
        .unwrap();

    for intent in router.catalog().intents() {
        for example in intent.examples() {
            let result = router.classify(example).unwrap();
            assert_eq!(result.intent(), Some(intent.name()), "example {example:?}");
            assert_eq!(result.confidence(), Some(1.0));
        }
    }
}

#[test]
fn blank_and_tokenless_queries_fail_cleanly() {
    let router = Router::builder(Arc::new(HashingEncoder::default()))
        .intent("BookFlight", ["book a flight"])
        .build()
        .unwrap();

    // Whitespace is rejected before the encoder runs
    assert!(matches!(router.classify("  "), Err(RouterError::EmptyQuery)));

    // Punctuation reaches the encoder and yields a zero vector
    assert!(matches!(
        router.classify("?!"),
        Err(RouterError::DegenerateVector { .. })
    ));
}
