//! Similarity Scoring: embeds the JD and the resume and reduces them to one match score.
//!
//! Algorithm:
//! 1. Embed each text through the `Embedder` seam (JD first, then resume).
//! 2. Cosine similarity of the two vectors, rounded to 4 dp.
//! 3. Threshold into a `MatchLabel`: ≥0.75 Excellent, ≥0.60 Good, ≥0.45 Moderate, else Weak.
//!
//! Keyword coverage is computed alongside and does not affect the similarity.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::llm_client::Embedder;
use crate::screening::keywords::{keyword_gap, KeywordGap};
use crate::screening::round_dp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchLabel {
    #[serde(rename = "Excellent Match")]
    Excellent,
    #[serde(rename = "Good Match")]
    Good,
    #[serde(rename = "Moderate Match")]
    Moderate,
    #[serde(rename = "Weak Match")]
    Weak,
}

impl MatchLabel {
    pub fn from_similarity(similarity: f64) -> Self {
        if similarity >= 0.75 {
            MatchLabel::Excellent
        } else if similarity >= 0.60 {
            MatchLabel::Good
        } else if similarity >= 0.45 {
            MatchLabel::Moderate
        } else {
            MatchLabel::Weak
        }
    }
}

/// Resume-vs-JD score. Produced once per resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeScore {
    pub similarity: f64,
    pub similarity_pct: f64,
    pub label: MatchLabel,
    pub keyword_gap: KeywordGap,
}

/// Cosine similarity. Mismatched lengths and zero vectors score 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Embeds both texts and returns their cosine similarity rounded to 4 dp.
/// Embedding failures propagate; nothing is retried here.
pub async fn similarity_score(
    jd_text: &str,
    resume_text: &str,
    embedder: &dyn Embedder,
) -> Result<f64, AppError> {
    let jd_vec = embedder.embed(jd_text).await?;
    let resume_vec = embedder.embed(resume_text).await?;

    if jd_vec.len() != resume_vec.len() {
        return Err(AppError::Llm(format!(
            "Embedding dimensions differ: {} vs {}",
            jd_vec.len(),
            resume_vec.len()
        )));
    }

    Ok(round_dp(cosine_similarity(&jd_vec, &resume_vec), 4))
}

pub async fn score_candidate(
    jd_text: &str,
    resume_text: &str,
    embedder: &dyn Embedder,
) -> Result<ResumeScore, AppError> {
    let similarity = similarity_score(jd_text, resume_text, embedder).await?;
    let keyword_gap = keyword_gap(jd_text, resume_text);
    let label = MatchLabel::from_similarity(similarity);

    debug!(
        "Resume scored: similarity={similarity}, label={label:?}, coverage={}",
        keyword_gap.coverage
    );

    Ok(ResumeScore {
        similarity,
        similarity_pct: round_dp(similarity * 100.0, 1),
        label,
        keyword_gap,
    })
}
