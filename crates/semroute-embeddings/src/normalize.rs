//! Vector normalization and pooling utilities.

/// L2 normalize a vector (unit length). Zero vectors are left unchanged.
pub fn normalize_l2(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in vector.iter_mut() {
            *v /= norm;
        }
    }
}

/// Element-wise mean of equally sized vectors.
///
/// Returns a zero vector of length `dimension` when `vectors` is empty.
pub fn mean_pool<'a, I>(vectors: I, dimension: usize) -> Vec<f32>
where
    I: IntoIterator<Item = &'a [f32]>,
{
    let mut sum = vec![0.0f32; dimension];
    let mut count = 0usize;
    for vector in vectors {
        for (acc, v) in sum.iter_mut().zip(vector.iter()) {
            *acc += v;
        }
        count += 1;
    }

    if count > 0 {
        let scale = 1.0 / count as f32;
        for v in sum.iter_mut() {
            *v *= scale;
        }
    }
    sum
}
