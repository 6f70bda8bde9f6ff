//! Candidate pipeline: one resume (and optionally one code sample) → one `Report`.
//!
//! Flow: stage upload → extract text → score against JD → review code (if any)
//!       → build report. The staged file is gone by the time this returns.

use tracing::info;

use crate::errors::AppError;
use crate::report::{build_report, Report};
use crate::screening::extract::candidate_name;
use crate::screening::scorer::score_candidate;
use crate::screening::upload::{StagedResume, UploadedFile};
use crate::state::AppState;

pub struct CandidateSubmission<'a> {
    pub resume: &'a UploadedFile,
    /// Display name; derived from the resume file name when absent.
    pub name: Option<&'a str>,
    pub code: Option<&'a str>,
}

pub async fn evaluate_candidate(
    state: &AppState,
    jd_text: &str,
    submission: CandidateSubmission<'_>,
) -> Result<Report, AppError> {
    let staged = StagedResume::stage(&state.config.upload_dir, submission.resume).await?;

    let name = submission
        .name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| candidate_name(staged.safe_name()));

    let resume_text = staged.extract_text().await?;
    let resume_score = score_candidate(jd_text, &resume_text, state.embedder.as_ref()).await?;

    let code_review = match submission.code.map(str::trim) {
        Some(code) if !code.is_empty() => Some(state.reviewer.review(code).await),
        _ => None,
    };

    let report = build_report(name, resume_score, code_review);
    info!(
        "Evaluated {}: final={} ({:?}), code grade={:?}",
        report.name,
        report.final_score,
        report.recommendation,
        report.code_review.as_ref().map(|r| r.review().grade)
    );
    Ok(report)
}
