//! Report Aggregation: combines resume similarity and code grade into a final score.
//!
//! final = 0.6 × similarity + 0.4 × grade_score when a successful review is present,
//! otherwise final = similarity. A failed review counts as no review.

use serde::{Deserialize, Serialize};

use crate::review::models::ReviewOutcome;
use crate::screening::round_dp;
use crate::screening::scorer::ResumeScore;

pub const RESUME_WEIGHT: f64 = 0.6;
pub const CODE_WEIGHT: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Strong Hire")]
    StrongHire,
    Consider,
    Maybe,
    Pass,
}

impl Recommendation {
    /// Total over all floats: ≥0.72 Strong Hire, ≥0.55 Consider, ≥0.40 Maybe, else Pass.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.72 {
            Recommendation::StrongHire
        } else if score >= 0.55 {
            Recommendation::Consider
        } else if score >= 0.40 {
            Recommendation::Maybe
        } else {
            Recommendation::Pass
        }
    }
}

/// Per-candidate report. Built per request, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub name: String,
    pub resume_score: ResumeScore,
    pub code_review: Option<ReviewOutcome>,
    pub final_score: f64,
    pub final_pct: f64,
    pub recommendation: Recommendation,
}

pub fn build_report(
    name: String,
    resume_score: ResumeScore,
    code_review: Option<ReviewOutcome>,
) -> Report {
    let final_score = match code_review.as_ref().and_then(ReviewOutcome::grade_score) {
        Some(grade_score) => resume_score.similarity * RESUME_WEIGHT + grade_score * CODE_WEIGHT,
        None => resume_score.similarity,
    };

    Report {
        name,
        resume_score,
        code_review,
        final_score: round_dp(final_score, 4),
        final_pct: round_dp(final_score * 100.0, 1),
        recommendation: Recommendation::from_score(final_score),
    }
}

/// Highest final score first. Ties keep upload order.
pub fn rank_reports(reports: &mut [Report]) {
    reports.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
}
