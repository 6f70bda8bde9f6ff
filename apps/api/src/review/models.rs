use serde::{Deserialize, Serialize};

/// Letter grade assigned by the code review. `N/A` only appears on failed reviews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
    #[serde(rename = "N/A")]
    NotAvailable,
}

impl Grade {
    /// Fixed weight used in final-score arithmetic. Never taken from the model reply.
    pub fn score(self) -> f64 {
        match self {
            Grade::A => 0.92,
            Grade::B => 0.75,
            Grade::C => 0.55,
            Grade::D => 0.35,
            Grade::F => 0.10,
            Grade::NotAvailable => 0.0,
        }
    }

    /// Coerces whatever the model put in `grade` to A–F, falling back to C.
    pub fn from_reply(raw: Option<&str>) -> Self {
        match raw.map(|g| g.trim().to_uppercase()).as_deref() {
            Some("A") => Grade::A,
            Some("B") => Grade::B,
            Some("C") => Grade::C,
            Some("D") => Grade::D,
            Some("F") => Grade::F,
            _ => Grade::C,
        }
    }
}

/// A normalized code review verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeReview {
    pub language: String,
    pub grade: Grade,
    pub grade_score: f64,
    pub summary: String,
    pub bugs: Vec<String>,
    pub security_issues: Vec<String>,
    pub style_issues: Vec<String>,
    pub strengths: Vec<String>,
    /// "Low" / "Medium" / "High" as reported by the model; "" if absent, "Unknown" on failure.
    pub complexity: String,
    pub maintainability: String,
    pub refactored_snippet: String,
    pub total_issues: usize,
    pub has_critical: bool,
}

impl CodeReview {
    /// The shape every failed review carries so consumers can render it like a real one.
    pub fn placeholder() -> Self {
        Self {
            language: "Unknown".to_string(),
            grade: Grade::NotAvailable,
            grade_score: Grade::NotAvailable.score(),
            summary: String::new(),
            bugs: vec![],
            security_issues: vec![],
            style_issues: vec![],
            strengths: vec![],
            complexity: "Unknown".to_string(),
            maintainability: "Unknown".to_string(),
            refactored_snippet: String::new(),
            total_issues: 0,
            has_critical: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    EmptyInput,
    Unparseable,
    RateLimited,
    InvalidCredentials,
    Provider,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewFailure {
    pub kind: FailureKind,
    pub error: String,
    /// Last unparsed model reply, when the failure was a parse failure.
    pub raw: String,
    #[serde(flatten)]
    pub review: CodeReview,
}

impl ReviewFailure {
    pub fn new(kind: FailureKind, error: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            kind,
            error: error.into(),
            raw: raw.into(),
            review: CodeReview::placeholder(),
        }
    }
}

/// Result of a review request. Failures are values, not errors, so the
/// rest of the pipeline always has something to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReviewOutcome {
    Success(CodeReview),
    Failure(ReviewFailure),
}

impl ReviewOutcome {
    /// Grade score usable in final-score arithmetic. `None` for failures.
    pub fn grade_score(&self) -> Option<f64> {
        match self {
            ReviewOutcome::Success(review) => Some(review.grade_score),
            ReviewOutcome::Failure(_) => None,
        }
    }

    pub fn review(&self) -> &CodeReview {
        match self {
            ReviewOutcome::Success(review) => review,
            ReviewOutcome::Failure(failure) => &failure.review,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ReviewOutcome::Success(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_grade_score_table() {
        assert_eq!(Grade::A.score(), 0.92);
        assert_eq!(Grade::B.score(), 0.75);
        assert_eq!(Grade::C.score(), 0.55);
        assert_eq!(Grade::D.score(), 0.35);
        assert_eq!(Grade::F.score(), 0.10);
        assert_eq!(Grade::NotAvailable.score(), 0.0);
    }

    #[test]
    fn test_grade_from_reply_defaults_to_c() {
        assert_eq!(Grade::from_reply(None), Grade::C);
        assert_eq!(Grade::from_reply(Some("")), Grade::C);
        assert_eq!(Grade::from_reply(Some("A+")), Grade::C);
        assert_eq!(Grade::from_reply(Some("N/A")), Grade::C);
    }

    #[test]
    fn test_grade_from_reply_is_case_insensitive() {
        assert_eq!(Grade::from_reply(Some("b")), Grade::B);
        assert_eq!(Grade::from_reply(Some(" f ")), Grade::F);
    }

    #[test]
    fn test_grade_serializes_not_available_as_slash() {
        assert_eq!(serde_json::to_value(Grade::NotAvailable).unwrap(), json!("N/A"));
        assert_eq!(serde_json::to_value(Grade::D).unwrap(), json!("D"));
    }

    #[test]
    fn test_failure_serializes_uniform_shape() {
        let outcome = ReviewOutcome::Failure(ReviewFailure::new(
            FailureKind::RateLimited,
            "slow down",
            "",
        ));
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["status"], "failure");
        assert_eq!(value["kind"], "rate_limited");
        assert_eq!(value["error"], "slow down");
        assert_eq!(value["grade"], "N/A");
        assert_eq!(value["grade_score"], 0.0);
        assert_eq!(value["language"], "Unknown");
        assert_eq!(value["complexity"], "Unknown");
        assert_eq!(value["maintainability"], "Unknown");
        assert_eq!(value["bugs"], json!([]));
        assert_eq!(value["total_issues"], 0);
        assert_eq!(value["has_critical"], false);
    }

    #[test]
    fn test_failure_has_no_usable_grade_score() {
        let outcome = ReviewOutcome::Failure(ReviewFailure::new(FailureKind::Provider, "x", ""));
        assert_eq!(outcome.grade_score(), None);
        assert_eq!(outcome.review().grade, Grade::NotAvailable);
        assert!(!outcome.is_success());
    }
}
