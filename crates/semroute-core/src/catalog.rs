//! Intent catalog: named intents, their example utterances and encodings.

use crate::encoder::Encoder;
use crate::error::{ConfigError, Result, RouterError};
use crate::types::Vector;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Configuration-time description of one intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentSpec {
    pub name: String,
    pub examples: Vec<String>,
}

impl IntentSpec {
    pub fn new<I, S>(name: impl Into<String>, examples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            examples: examples.into_iter().map(Into::into).collect(),
        }
    }
}

/// A named intent with its example utterances.
///
/// Once the owning catalog has been encoded, `vectors()` is aligned with
/// `examples()`: same length, same order.
#[derive(Debug, Clone)]
pub struct Intent {
    name: String,
    examples: Vec<String>,
    vectors: Vec<Vector>,
}

impl Intent {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn examples(&self) -> &[String] {
        &self.examples
    }

    /// Encoded examples; empty until the catalog is encoded.
    pub fn vectors(&self) -> &[Vector] {
        &self.vectors
    }

    pub fn is_encoded(&self) -> bool {
        self.vectors.len() == self.examples.len()
    }
}

/// Ordered, name-unique set of intents.
///
/// Insertion order is preserved and drives both encoding order and the
/// tie-break in ranking.
#[derive(Debug, Clone, Default)]
pub struct IntentCatalog {
    intents: Vec<Intent>,
    index: HashMap<String, usize>,
}

impl IntentCatalog {
    /// Build a catalog from intent specs.
    ///
    /// # Errors
    ///
    /// [`RouterError::Configuration`] if a name is blank or duplicated, an intent
    /// has no examples, or an example is empty/whitespace-only.
    pub fn build<I>(specs: I) -> Result<Self>
    where
        I: IntoIterator<Item = IntentSpec>,
    {
        let mut catalog = IntentCatalog::default();

        for spec in specs {
            if spec.name.trim().is_empty() {
                return Err(ConfigError::EmptyIntentName.into());
            }
            if catalog.index.contains_key(&spec.name) {
                return Err(RouterError::duplicate_intent(spec.name));
            }
            if spec.examples.is_empty() {
                return Err(RouterError::no_examples(spec.name));
            }
            if let Some(index) = spec.examples.iter().position(|e| e.trim().is_empty()) {
                return Err(RouterError::blank_example(spec.name, index));
            }

            catalog.index.insert(spec.name.clone(), catalog.intents.len());
            catalog.intents.push(Intent {
                name: spec.name,
                examples: spec.examples,
                vectors: Vec::new(),
            });
        }

        Ok(catalog)
    }

    /// Encode every example with `encoder`, in insertion order.
    ///
    /// Existing vectors are replaced, so encoding twice with the same encoder
    /// yields the same stored vectors. If any example fails to encode, or the
    /// encoder produces vectors of different lengths, the catalog keeps its
    /// previous vectors and the error is returned.
    pub fn encode_all(&mut self, encoder: &dyn Encoder) -> Result<()> {
        let mut encoded = Vec::with_capacity(self.intents.len());
        for intent in &self.intents {
            let texts: Vec<&str> = intent.examples.iter().map(String::as_str).collect();
            let vectors = encoder.encode_batch(&texts)?;
            debug!(
                intent = %intent.name,
                examples = texts.len(),
                model = encoder.model_name(),
                "encoded intent examples"
            );
            encoded.push(vectors);
        }

        self.install_vectors(encoded)
    }

    /// Validate and store freshly encoded vectors, one list per intent.
    ///
    /// Nothing is written unless every vector has a usable norm and all share
    /// one dimension.
    pub(crate) fn install_vectors(&mut self, encoded: Vec<Vec<Vector>>) -> Result<()> {
        debug_assert_eq!(encoded.len(), self.intents.len());

        let mut dimension: Option<usize> = None;
        for (intent, vectors) in self.intents.iter().zip(encoded.iter()) {
            if vectors.len() != intent.examples.len() {
                return Err(RouterError::Encoder(crate::error::EncoderError::new(format!(
                    "encoder returned {} vectors for {} examples of intent {}",
                    vectors.len(),
                    intent.examples.len(),
                    intent.name
                ))));
            }
            for (index, vector) in vectors.iter().enumerate() {
                let norm = vector.norm();
                if !norm.is_finite() || norm == 0.0 {
                    return Err(RouterError::degenerate_example(&intent.name, index));
                }
                match dimension {
                    None => dimension = Some(vector.dimension()),
                    Some(expected) if expected != vector.dimension() => {
                        return Err(RouterError::dimension_mismatch(expected, vector.dimension()));
                    }
                    Some(_) => {}
                }
            }
        }

        for (intent, vectors) in self.intents.iter_mut().zip(encoded) {
            intent.vectors = vectors;
        }
        Ok(())
    }

    /// Intents in insertion order. The iterator is lazy and `Clone`, so it can
    /// be restarted.
    pub fn intents(&self) -> std::slice::Iter<'_, Intent> {
        self.intents.iter()
    }

    /// Look up an intent by name.
    pub fn get(&self, name: &str) -> Option<&Intent> {
        self.index.get(name).map(|&i| &self.intents[i])
    }

    /// Declaration index of an intent.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Intent names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.intents.iter().map(|i| i.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    /// Total number of example utterances.
    pub fn example_count(&self) -> usize {
        self.intents.iter().map(|i| i.examples.len()).sum()
    }

    /// True once every intent holds one vector per example.
    pub fn is_encoded(&self) -> bool {
        self.intents.iter().all(Intent::is_encoded)
    }

    /// Dimension of the stored vectors, if the catalog has been encoded.
    pub fn dimension(&self) -> Option<usize> {
        if !self.is_encoded() {
            return None;
        }
        self.intents
            .iter()
            .flat_map(|i| i.vectors.first())
            .map(Vector::dimension)
            .next()
    }
}
