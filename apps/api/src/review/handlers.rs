//! Axum route handlers for the Code Review API.

use axum::{extract::State, Form, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::review::models::ReviewOutcome;
use crate::state::AppState;

const DEFAULT_CANDIDATE_NAME: &str = "Candidate";

#[derive(Debug, Deserialize)]
pub struct CodeReviewForm {
    #[serde(default)]
    pub code: String,
    pub candidate_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CodeReviewResponse {
    pub name: String,
    pub review: ReviewOutcome,
}

/// POST /api/v1/code-review
///
/// Reviews a single code sample. Provider failures come back inside `review`
/// with `status: "failure"`, not as an HTTP error.
pub async fn handle_code_review(
    State(state): State<AppState>,
    Form(form): Form<CodeReviewForm>,
) -> Result<Json<CodeReviewResponse>, AppError> {
    let code = form.code.trim();
    if code.is_empty() {
        return Err(AppError::Validation("No code provided".to_string()));
    }

    let name = form
        .candidate_name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| DEFAULT_CANDIDATE_NAME.to_string());

    info!("Reviewing {} chars of code for {}", code.len(), name);
    let review = state.reviewer.review(code).await;
    if !review.is_success() {
        info!("Code review for {} returned a failure result", name);
    }

    Ok(Json(CodeReviewResponse { name, review }))
}
