//! Output-shape normalization and dimensionality capping.
//!
//! The embedding endpoint may hand back one of three shapes depending on its
//! pooling configuration. Rather than sniffing the response at runtime, the
//! call site declares the shape it is configured to produce ([`OutputShape`])
//! and decoding becomes a single deterministic transform.

use crate::errors::EmbedError;

/// Shape the configured model is expected to produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputShape {
    /// A single pre-pooled vector wrapped in a response object.
    Pooled,
    /// One vector per input token; the adapter mean-pools across tokens.
    TokenMatrix,
    /// A bare flat numeric sequence, used unchanged.
    Flat,
}

/// Tagged embedding output, decoded according to the declared shape.
#[derive(Debug, Clone, PartialEq)]
pub enum EmbeddingOutput {
    Pooled(Vec<f32>),
    TokenMatrix(Vec<Vec<f32>>),
    Flat(Vec<f32>),
}

impl EmbeddingOutput {
    /// Normalizes any shape into a single flat vector.
    pub fn into_flat(self) -> Result<Vec<f32>, EmbedError> {
        match self {
            EmbeddingOutput::Pooled(v) | EmbeddingOutput::Flat(v) => {
                if v.is_empty() {
                    return Err(EmbedError::UnexpectedOutputFormat(
                        "empty embedding vector".into(),
                    ));
                }
                Ok(v)
            }
            EmbeddingOutput::TokenMatrix(rows) => mean_pool(&rows),
        }
    }
}

/// Per-dimension arithmetic mean across token vectors.
///
/// `[[1,2],[3,4],[5,6]]` pools to `[3,4]`. An empty matrix or ragged rows are
/// a shape error.
pub fn mean_pool(rows: &[Vec<f32>]) -> Result<Vec<f32>, EmbedError> {
    let Some(first) = rows.first() else {
        return Err(EmbedError::UnexpectedOutputFormat(
            "token matrix has no rows".into(),
        ));
    };
    let dim = first.len();
    if dim == 0 {
        return Err(EmbedError::UnexpectedOutputFormat(
            "token vectors have zero dimensions".into(),
        ));
    }

    let mut acc = vec![0f32; dim];
    for row in rows {
        if row.len() != dim {
            return Err(EmbedError::UnexpectedOutputFormat(format!(
                "ragged token matrix: expected {dim} dims, got {}",
                row.len()
            )));
        }
        for (slot, value) in acc.iter_mut().zip(row) {
            *slot += *value;
        }
    }

    let n = rows.len() as f32;
    for slot in &mut acc {
        *slot /= n;
    }
    Ok(acc)
}

/// Caps a vector at `max_dim` by nearest-index selection.
///
/// For target length `N` and source length `L`, output index `i` takes source
/// index `floor(i * L / N)`. Deterministic and lossy, no interpolation.
/// Vectors already within the limit are returned unchanged.
pub fn cap_dimensions(vector: Vec<f32>, max_dim: usize) -> Vec<f32> {
    let len = vector.len();
    if max_dim == 0 || len <= max_dim {
        return vector;
    }
    (0..max_dim).map(|i| vector[i * len / max_dim]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_pool_averages_per_dimension() {
        let rows = vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]];
        assert_eq!(mean_pool(&rows).unwrap(), vec![3.0, 4.0]);
    }

    #[test]
    fn mean_pool_rejects_empty_matrix() {
        assert!(matches!(
            mean_pool(&[]),
            Err(EmbedError::UnexpectedOutputFormat(_))
        ));
    }

    #[test]
    fn mean_pool_rejects_ragged_rows() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(matches!(
            mean_pool(&rows),
            Err(EmbedError::UnexpectedOutputFormat(_))
        ));
    }

    #[test]
    fn cap_leaves_short_vectors_unchanged() {
        let v = vec![0.5, 1.5, 2.5];
        assert_eq!(cap_dimensions(v.clone(), 8), v);
        assert_eq!(cap_dimensions(v.clone(), 3), v);
    }

    #[test]
    fn cap_is_deterministic_nearest_index() {
        let v: Vec<f32> = (0..10).map(|i| i as f32).collect();
        // floor(i * 10 / 4) for i in 0..4 -> indices 0, 2, 5, 7.
        let capped = cap_dimensions(v.clone(), 4);
        assert_eq!(capped, vec![0.0, 2.0, 5.0, 7.0]);
        assert_eq!(capped, cap_dimensions(v, 4));
    }

    #[test]
    fn cap_always_yields_target_length() {
        for len in [5usize, 17, 100, 3072, 4096] {
            let v: Vec<f32> = (0..len).map(|i| i as f32).collect();
            let capped = cap_dimensions(v, 4);
            assert_eq!(capped.len(), 4);
        }
    }

    #[test]
    fn flat_output_passes_through() {
        let out = EmbeddingOutput::Flat(vec![0.25, 0.75]);
        assert_eq!(out.into_flat().unwrap(), vec![0.25, 0.75]);
    }

    #[test]
    fn empty_pooled_output_is_a_shape_error() {
        assert!(matches!(
            EmbeddingOutput::Pooled(Vec::new()).into_flat(),
            Err(EmbedError::UnexpectedOutputFormat(_))
        ));
    }
}
