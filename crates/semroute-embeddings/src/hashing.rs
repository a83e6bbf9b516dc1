//! Feature-hashing encoder (no external model).
//!
//! Words are hashed into a fixed-dimension space with several seeded hash
//! functions and a sign hash, then the result is L2 normalized. Texts that
//! share words end up close together; it is a lexical baseline rather than a
//! semantic model, but it needs no download and is fully deterministic.

use crate::normalize::normalize_l2;
use crate::{EmbeddingError, EmbeddingResult};
use semroute_core::encoder::Encoder;
use semroute_core::error::EncoderResult;
use semroute_core::types::Vector;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Hash-based bag-of-words encoder.
///
/// # Example
///
/// ```rust
/// use semroute_core::encoder::Encoder;
/// use semroute_embeddings::HashingEncoder;
///
/// let encoder = HashingEncoder::new(128);
/// let vec = encoder.encode("hello world").unwrap();
/// assert_eq!(vec.dimension(), 128);
/// ```
#[derive(Debug, Clone)]
pub struct HashingEncoder {
    dimension: usize,
    num_hashes: usize,
}

impl HashingEncoder {
    /// Create a new hashing encoder with the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
            num_hashes: 4, // Multiple hashes for better distribution
        }
    }

    /// Override the number of hash functions per token.
    pub fn with_hashes(mut self, num_hashes: usize) -> Self {
        self.num_hashes = num_hashes.max(1);
        self
    }

    /// Split text into lowercase alphanumeric words of two or more characters.
    pub fn tokenize(text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|s| s.chars().count() > 1)
            .map(|s| s.to_string())
            .collect()
    }

    /// Hash a word with a seed to get an index.
    fn hash_with_seed(&self, word: &str, seed: u64) -> usize {
        let mut hasher = DefaultHasher::new();
        seed.hash(&mut hasher);
        word.hash(&mut hasher);
        (hasher.finish() as usize) % self.dimension
    }

    /// Hash a word with a seed to get a sign (+1 or -1).
    fn sign_hash(&self, word: &str, seed: u64) -> f32 {
        let mut hasher = DefaultHasher::new();
        (seed + 1000).hash(&mut hasher);
        word.hash(&mut hasher);
        if hasher.finish() % 2 == 0 { 1.0 } else { -1.0 }
    }

    /// Embed text into a raw vector.
    ///
    /// Text with no usable tokens (e.g. punctuation only) yields a zero
    /// vector; the router reports that as a degenerate vector.
    pub fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::InvalidInput("Empty text".to_string()));
        }

        let tokens = Self::tokenize(text);
        let mut vector = vec![0.0f32; self.dimension];

        for token in &tokens {
            for seed in 0..self.num_hashes as u64 {
                let idx = self.hash_with_seed(token, seed);
                let sign = self.sign_hash(token, seed);
                vector[idx] += sign;
            }
        }

        normalize_l2(&mut vector);
        Ok(vector)
    }
}

impl Default for HashingEncoder {
    fn default() -> Self {
        Self::new(256)
    }
}

impl Encoder for HashingEncoder {
    fn encode(&self, text: &str) -> EncoderResult<Vector> {
        Ok(Vector::from(self.embed(text)?))
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.dimension)
    }

    fn model_name(&self) -> &str {
        "hashing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semroute_core::similarity::cosine_similarity;

    #[test]
    fn test_hashing_encoder() {
        let encoder = HashingEncoder::new(128);

        let v1 = encoder.encode("hello world").unwrap();
        let v2 = encoder.encode("hello world").unwrap();
        let v3 = encoder.encode("goodbye universe").unwrap();

        assert_eq!(v1.dimension(), 128);

        // Same text should produce same embedding
        assert_eq!(v1, v2);
        assert_eq!(cosine_similarity(&v1, &v2).unwrap(), 1.0);

        // Different text should produce different embedding
        let sim_diff = cosine_similarity(&v1, &v3).unwrap();
        assert!(sim_diff < 0.9);
    }

    #[test]
    fn test_similar_texts() {
        let encoder = HashingEncoder::new(256);

        let v1 = encoder.encode("book a flight to tokyo").unwrap();
        let v2 = encoder.encode("book me a flight").unwrap();
        let v3 = encoder.encode("is it raining today").unwrap();

        let sim_related = cosine_similarity(&v1, &v2).unwrap();
        let sim_unrelated = cosine_similarity(&v1, &v3).unwrap();

        // Related texts should have higher similarity
        assert!(sim_related > sim_unrelated);
    }

    #[test]
    fn case_and_punctuation_are_ignored() {
        let encoder = HashingEncoder::default();
        let v1 = encoder.encode("Is it raining?").unwrap();
        let v2 = encoder.encode("is it raining").unwrap();
        assert_eq!(v1, v2);
    }

    #[test]
    fn empty_text_is_invalid() {
        let encoder = HashingEncoder::default();
        let err = encoder.embed("   ").unwrap_err();
        assert!(matches!(err, EmbeddingError::InvalidInput(_)));

        // Through the Encoder trait the backend error is preserved
        let err = encoder.encode("").unwrap_err();
        assert!(err.downcast_ref::<EmbeddingError>().is_some());
    }

    #[test]
    fn punctuation_only_is_zero_vector() {
        let encoder = HashingEncoder::new(16);
        let v = encoder.encode("?!").unwrap();
        assert_eq!(v.norm(), 0.0);
    }
}
