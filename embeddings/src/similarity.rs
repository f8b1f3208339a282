//! Similarity computation for embeddings.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::Embedding;
use crate::error::{EmbeddingError, Result};

/// Compute the cosine similarity between two embeddings.
///
/// Returns a value between -1.0 and 1.0, where 1.0 means identical
/// direction and 0.0 means orthogonal vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot_product / (magnitude_a * magnitude_b))
}

/// An id ranked by similarity to a query vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedMatch {
    /// ID of the matched item.
    pub id: String,

    /// Cosine similarity score.
    pub score: f32,
}

/// Rank candidates by cosine similarity to the query, descending, keeping
/// the top `k`.
pub fn top_k(
    query: &Embedding,
    candidates: &[(String, Embedding)],
    k: usize,
) -> Result<Vec<RankedMatch>> {
    let mut scores: Vec<(OrderedFloat<f32>, String)> = Vec::with_capacity(candidates.len());

    for (id, embedding) in candidates {
        let score = cosine_similarity(query, embedding)?;
        scores.push((OrderedFloat(score), id.clone()));
    }

    scores.sort_by(|a, b| b.0.cmp(&a.0));

    Ok(scores
        .into_iter()
        .take(k)
        .map(|(score, id)| RankedMatch { id, score: score.0 })
        .collect())
}
