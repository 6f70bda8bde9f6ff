// Resume screening: text extraction, JD similarity, keyword coverage,
// upload staging, and the per-candidate pipeline.
// Embeddings go through llm_client via the Embedder seam.

pub mod extract;
pub mod handlers;
pub mod keywords;
pub mod pipeline;
pub mod scorer;
pub mod upload;

/// Rounds to `places` decimal places from the exact binary value, so `12.35`
/// (stored just below) becomes `12.3`.
pub fn round_dp(value: f64, places: usize) -> f64 {
    format!("{value:.places$}").parse().unwrap_or(value)
}
