//! Axum route handlers for the Screening API.

use axum::extract::{Multipart, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::report::{rank_reports, Report};
use crate::screening::extract::allowed_file;
use crate::screening::pipeline::{evaluate_candidate, CandidateSubmission};
use crate::screening::upload::{MultipartForm, UploadedFile};
use crate::state::AppState;

const JD_PREVIEW_CHARS: usize = 300;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub reports: Vec<Report>,
    pub jd_preview: String,
    pub generated_at: DateTime<Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
///
/// Multipart: `jd_text` + one or more `resumes` PDFs. Scores every resume against
/// the JD, one at a time, and returns the reports ranked by final score.
/// A resume that fails to parse aborts the whole batch.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let form = MultipartForm::read(multipart).await?;

    let jd_text = required_jd(&form)?;

    let uploads: Vec<&UploadedFile> = form.files("resumes").collect();
    if uploads.is_empty() {
        return Err(AppError::Validation(
            "Please upload at least one resume.".to_string(),
        ));
    }

    let accepted = accepted_pdfs(uploads);
    if accepted.is_empty() {
        return Err(AppError::Validation(
            "Only PDF resumes are accepted.".to_string(),
        ));
    }

    info!("Analyzing {} resume(s) against JD", accepted.len());

    let mut reports = Vec::with_capacity(accepted.len());
    for resume in accepted {
        let report = evaluate_candidate(
            &state,
            jd_text,
            CandidateSubmission {
                resume,
                name: None,
                code: None,
            },
        )
        .await?;
        reports.push(report);
    }

    rank_reports(&mut reports);

    Ok(Json(AnalyzeResponse {
        reports,
        jd_preview: jd_text.chars().take(JD_PREVIEW_CHARS).collect(),
        generated_at: Utc::now(),
    }))
}

/// POST /api/v1/evaluate
///
/// Multipart: `jd_text`, one `resume` PDF, optional `code` and `candidate_name`.
/// Runs the full pipeline for a single candidate, code review included.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Report>, AppError> {
    let form = MultipartForm::read(multipart).await?;

    let jd_text = required_jd(&form)?;

    let resume = form
        .files("resume")
        .next()
        .ok_or_else(|| AppError::Validation("Please upload a resume.".to_string()))?;
    if !allowed_file(&resume.file_name) {
        return Err(AppError::Validation(
            "Only PDF resumes are accepted.".to_string(),
        ));
    }

    let report = evaluate_candidate(
        &state,
        jd_text,
        CandidateSubmission {
            resume,
            name: form.text("candidate_name"),
            code: form.text("code"),
        },
    )
    .await?;

    Ok(Json(report))
}

fn required_jd(form: &MultipartForm) -> Result<&str, AppError> {
    let jd_text = form.text("jd_text").map(str::trim).unwrap_or_default();
    if jd_text.is_empty() {
        return Err(AppError::Validation(
            "Please enter a job description.".to_string(),
        ));
    }
    Ok(jd_text)
}

fn accepted_pdfs(uploads: Vec<&UploadedFile>) -> Vec<&UploadedFile> {
    uploads
        .into_iter()
        .filter(|upload| {
            let ok = allowed_file(&upload.file_name);
            if !ok {
                warn!("Skipping non-PDF upload '{}'", upload.file_name);
            }
            ok
        })
        .collect()
}
