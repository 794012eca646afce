use thiserror::Error;

/// Numeric precondition violations on embedding vectors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VectorError {
    #[error("cannot average an empty set of vectors")]
    EmptyInput,

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Element-wise mean of a set of equally sized vectors
///
/// Accumulates in f64 so that averaging many embeddings does not drift.
///
/// # Errors
/// * `EmptyInput` if `vectors` is empty
/// * `DimensionMismatch` if any vector differs in length from the first
pub fn average<V: AsRef<[f32]>>(vectors: &[V]) -> Result<Vec<f32>, VectorError> {
    let first = vectors.first().ok_or(VectorError::EmptyInput)?.as_ref();
    let dimension = first.len();
    let mut sum = vec![0.0f64; dimension];

    for vector in vectors {
        let vector = vector.as_ref();
        if vector.len() != dimension {
            return Err(VectorError::DimensionMismatch {
                expected: dimension,
                actual: vector.len(),
            });
        }
        for (acc, value) in sum.iter_mut().zip(vector) {
            *acc += *value as f64;
        }
    }

    let count = vectors.len() as f64;
    Ok(sum.into_iter().map(|total| (total / count) as f32).collect())
}

/// Cosine distance (`1 - cos θ`), in [0, 2]
///
/// A zero vector on either side has no direction; its distance is 1,
/// which makes its similarity 0 rather than a division by zero.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> Result<f64, VectorError> {
    if a.len() != b.len() {
        return Err(VectorError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(1.0);
    }

    Ok(1.0 - (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0))
}

/// Cosine similarity in [-1, 1], defined as `1 - cosine_distance`
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, VectorError> {
    cosine_distance(a, b).map(|distance| 1.0 - distance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_single_vector_is_identity() {
        let v = vec![0.25f32, -1.5, 3.0];
        assert_eq!(average(&[v.clone()]).unwrap(), v);
    }

    #[test]
    fn test_average_elementwise_mean() {
        let avg = average(&[vec![1.0f32, 2.0], vec![3.0, 6.0]]).unwrap();
        assert_eq!(avg, vec![2.0, 4.0]);
    }

    #[test]
    fn test_average_empty_fails() {
        let empty: Vec<Vec<f32>> = vec![];
        assert_eq!(average(&empty), Err(VectorError::EmptyInput));
    }

    #[test]
    fn test_average_dimension_mismatch() {
        let result = average(&[vec![1.0f32, 2.0], vec![3.0]]);
        assert_eq!(
            result,
            Err(VectorError::DimensionMismatch { expected: 2, actual: 1 })
        );
    }

    #[test]
    fn test_cosine_identical_vectors() {
        let v = [0.3f32, 0.4, 0.5];
        let sim = cosine_similarity(&v, &v).unwrap();
        assert!((sim - 1.0).abs() < 1e-9, "expected 1.0, got {}", sim);
    }

    #[test]
    fn test_cosine_orthogonal_and_opposite() {
        let sim = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap();
        assert!(sim.abs() < 1e-9);

        let sim = cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]).unwrap();
        assert!((sim + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_zero_vector_is_zero_not_error() {
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[0.0, 0.0]), Ok(0.0));
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[0.0, 0.0]), Ok(0.0));
    }

    #[test]
    fn test_cosine_tiny_magnitude_vectors_are_not_zero() {
        let v = [1e-8f32, 0.0];
        let sim = cosine_similarity(&v, &v).unwrap();
        assert!((sim - 1.0).abs() < 1e-9, "expected 1.0, got {}", sim);

        let sim = cosine_similarity(&[1e-20f32, 1e-20], &[1e-20, 0.0]).unwrap();
        assert!((sim - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_dimension_mismatch() {
        assert_eq!(
            cosine_similarity(&[1.0, 0.0, 0.0], &[1.0, 0.0]),
            Err(VectorError::DimensionMismatch { expected: 3, actual: 2 })
        );
    }

    #[test]
    fn test_cosine_distance_range() {
        let d = cosine_distance(&[1.0, 0.0], &[0.6, 0.8]).unwrap();
        assert!((d - 0.4).abs() < 1e-6);
    }
}
