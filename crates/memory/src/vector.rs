//! Vector similarity kernel for long-term memory ranking.

use percept_core::error::MemoryError;

/// Compute cosine similarity between two vectors.
///
/// Returns a value in [-1, 1] where 1 = identical, 0 = orthogonal, -1 =
/// opposite. Mismatched lengths mean two different embedding spaces were
/// mixed — a contract violation, reported as
/// [`MemoryError::DimensionMismatch`]. Zero-magnitude vectors yield 0.0
/// (defined, not an error).
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, MemoryError> {
    if a.len() != b.len() {
        return Err(MemoryError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < 1e-10 {
        return Ok(0.0);
    }

    Ok((dot / denom) as f32)
}
