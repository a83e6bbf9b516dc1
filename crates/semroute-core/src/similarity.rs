//! Cosine similarity between vectors.

use crate::error::{Result, RouterError};

/// Compute cosine similarity: `dot(a, b) / (|a| * |b|)`.
///
/// Accumulates in `f64` and clamps to [-1, 1], so a vector compared with
/// itself scores exactly 1.0.
///
/// # Errors
///
/// - [`RouterError::DimensionMismatch`] if the lengths differ.
/// - [`RouterError::DegenerateVector`] if either norm is zero or not finite.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(RouterError::dimension_mismatch(a.len(), b.len()));
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let norm_a = norm_a.sqrt();
    let norm_b = norm_b.sqrt();

    if !is_usable_norm(norm_a) || !is_usable_norm(norm_b) {
        return Err(RouterError::DegenerateVector { norm_a, norm_b });
    }

    Ok((dot / (norm_a * norm_b)).clamp(-1.0, 1.0) as f32)
}

/// Similarities of `query` against each vector in `examples`, in order.
pub fn similarities<V: AsRef<[f32]>>(query: &[f32], examples: &[V]) -> Result<Vec<f32>> {
    examples
        .iter()
        .map(|example| cosine_similarity(query, example.as_ref()))
        .collect()
}

fn is_usable_norm(norm: f64) -> bool {
    norm.is_finite() && norm > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0];
        let b = vec![1.0, 0.0];
        let c = vec![0.0, 1.0];
        let d = vec![-1.0, 0.0];

        assert!((cosine_similarity(&a, &b).unwrap() - 1.0).abs() < 1e-6); // Same direction
        assert!(cosine_similarity(&a, &c).unwrap().abs() < 1e-6); // Orthogonal
        assert!((cosine_similarity(&a, &d).unwrap() + 1.0).abs() < 1e-6); // Opposite
    }

    #[test]
    fn self_similarity_is_exactly_one() {
        let v = vec![0.1, 0.7, -0.3, 0.2567, 1e-3];
        assert_eq!(cosine_similarity(&v, &v).unwrap(), 1.0);
    }

    #[test]
    fn magnitude_is_ignored() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![10.0, 20.0, 30.0];
        assert!((cosine_similarity(&a, &b).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn dimension_mismatch_is_an_error() {
        let a = vec![1.0; 4];
        let b = vec![1.0; 5];
        match cosine_similarity(&a, &b) {
            Err(RouterError::DimensionMismatch { expected, got }) => {
                assert_eq!(expected, 4);
                assert_eq!(got, 5);
            }
            other => panic!("expected dimension mismatch, got {other:?}"),
        }
    }

    #[test]
    fn zero_vector_is_degenerate() {
        let a = vec![0.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!(matches!(
            cosine_similarity(&a, &b),
            Err(RouterError::DegenerateVector { .. })
        ));
        assert!(matches!(
            cosine_similarity(&b, &a),
            Err(RouterError::DegenerateVector { .. })
        ));
    }

    #[test]
    fn empty_vectors_are_degenerate() {
        let empty: Vec<f32> = vec![];
        assert!(matches!(
            cosine_similarity(&empty, &empty),
            Err(RouterError::DegenerateVector { .. })
        ));
    }

    #[test]
    fn non_finite_components_are_degenerate() {
        let a = vec![f32::NAN, 1.0];
        let b = vec![1.0, 1.0];
        assert!(matches!(
            cosine_similarity(&a, &b),
            Err(RouterError::DegenerateVector { .. })
        ));

        let c = vec![f32::INFINITY, 1.0];
        assert!(matches!(
            cosine_similarity(&c, &b),
            Err(RouterError::DegenerateVector { .. })
        ));
    }

    #[test]
    fn similarities_preserve_order() {
        let query = vec![1.0, 0.0];
        let examples = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        let scores = similarities(&query, &examples).unwrap();
        assert_eq!(scores.len(), 2);
        assert!(scores[0].abs() < 1e-6);
        assert!((scores[1] - 1.0).abs() < 1e-6);
    }
}
