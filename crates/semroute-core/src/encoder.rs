//! The text-to-vector capability the router consumes.

use crate::error::EncoderResult;
use crate::types::Vector;
use std::sync::Arc;

/// Converts text into a fixed-length [`Vector`].
///
/// Implementations own their model or client for their whole lifetime. They
/// must be deterministic for identical input while a router is alive, and must
/// not return an empty vector for non-empty input. Calls may block on model
/// inference or a network round-trip.
pub trait Encoder: Send + Sync {
    /// Encode a single text.
    fn encode(&self, text: &str) -> EncoderResult<Vector>;

    /// Encode several texts, returning one vector per input in the same order.
    fn encode_batch(&self, texts: &[&str]) -> EncoderResult<Vec<Vector>> {
        // Default implementation: encode one by one
        texts.iter().map(|t| self.encode(t)).collect()
    }

    /// Output dimension, when the backend knows it up front.
    fn dimension(&self) -> Option<usize> {
        None
    }

    /// Model name/identifier.
    fn model_name(&self) -> &str;
}

impl<E: Encoder + ?Sized> Encoder for &E {
    fn encode(&self, text: &str) -> EncoderResult<Vector> {
        (**self).encode(text)
    }

    fn encode_batch(&self, texts: &[&str]) -> EncoderResult<Vec<Vector>> {
        (**self).encode_batch(texts)
    }

    fn dimension(&self) -> Option<usize> {
        (**self).dimension()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

impl<E: Encoder + ?Sized> Encoder for Box<E> {
    fn encode(&self, text: &str) -> EncoderResult<Vector> {
        (**self).encode(text)
    }

    fn encode_batch(&self, texts: &[&str]) -> EncoderResult<Vec<Vector>> {
        (**self).encode_batch(texts)
    }

    fn dimension(&self) -> Option<usize> {
        (**self).dimension()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

impl<E: Encoder + ?Sized> Encoder for Arc<E> {
    fn encode(&self, text: &str) -> EncoderResult<Vector> {
        (**self).encode(text)
    }

    fn encode_batch(&self, texts: &[&str]) -> EncoderResult<Vec<Vector>> {
        (**self).encode_batch(texts)
    }

    fn dimension(&self) -> Option<usize> {
        (**self).dimension()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
