//! Code Reviewer: sends a code sample to the model and turns its reply into a `ReviewOutcome`.
//!
//! Flow: truncate → fill prompt → generate → strip fences → parse JSON object → normalize.
//! Failed attempts are classified by `RetryPolicy`; exhausted or permanent failures come
//! back as `ReviewOutcome::Failure`, never as an error.

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::llm_client::{GenerationSettings, TextGenerator};
use crate::review::models::{CodeReview, FailureKind, Grade, ReviewFailure, ReviewOutcome};
use crate::review::prompts::CODE_REVIEW_PROMPT_TEMPLATE;
use crate::review::retry::{ErrorClass, RetryDecision, RetryPolicy};

/// Longest code sample sent to the model, in characters.
pub const MAX_CODE_LENGTH: usize = 8000;

pub const REVIEW_SETTINGS: GenerationSettings = GenerationSettings {
    temperature: 0.2,
    max_output_tokens: 1500,
};

const FENCE_LINES: [&str; 3] = ["```json", "```", "~~~"];

#[derive(Clone)]
pub struct CodeReviewer {
    generator: Arc<dyn TextGenerator>,
    policy: RetryPolicy,
}

impl CodeReviewer {
    pub fn new(generator: Arc<dyn TextGenerator>, policy: RetryPolicy) -> Self {
        Self { generator, policy }
    }

    pub async fn review(&self, code: &str) -> ReviewOutcome {
        if code.trim().is_empty() {
            return failure(FailureKind::EmptyInput, "No code was provided.", "");
        }

        let code = truncate_chars(code, MAX_CODE_LENGTH);
        let prompt = CODE_REVIEW_PROMPT_TEMPLATE.replace("{code}", code);

        let mut attempt = 0;
        loop {
            attempt += 1;

            let (class, detail, raw) = match self.generator.generate(&prompt, REVIEW_SETTINGS).await
            {
                Ok(reply) => {
                    let cleaned = strip_markdown(&reply);
                    match parse_reply(&cleaned) {
                        Some(value) => {
                            let review = normalize_review(&value);
                            info!(
                                "Code review succeeded on attempt {}: grade={:?}, issues={}",
                                attempt, review.grade, review.total_issues
                            );
                            return ReviewOutcome::Success(review);
                        }
                        None => (
                            ErrorClass::Unparseable,
                            "reply was not a JSON object".to_string(),
                            cleaned,
                        ),
                    }
                }
                Err(e) => {
                    let message = e.to_string();
                    (RetryPolicy::classify(&message), message, String::new())
                }
            };

            match self.policy.decide(class, attempt) {
                RetryDecision::RetryAfter(delay) => {
                    warn!(
                        "Code review attempt {} failed ({:?}: {}), retrying after {}ms...",
                        attempt,
                        class,
                        detail,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                RetryDecision::GiveUp => {
                    warn!(
                        "Code review gave up after attempt {} ({:?}: {})",
                        attempt, class, detail
                    );
                    return give_up(class, attempt, detail, raw);
                }
            }
        }
    }
}

fn give_up(class: ErrorClass, attempts: u32, detail: String, raw: String) -> ReviewOutcome {
    match class {
        ErrorClass::Unparseable => failure(
            FailureKind::Unparseable,
            format!("AI returned an unparseable response after {attempts} attempts."),
            raw,
        ),
        ErrorClass::RateLimited => failure(
            FailureKind::RateLimited,
            "Gemini API rate limit hit. Please wait a moment and try again.",
            "",
        ),
        ErrorClass::InvalidCredentials => failure(
            FailureKind::InvalidCredentials,
            "Invalid or missing GEMINI_API_KEY.",
            "",
        ),
        ErrorClass::Transient => failure(
            FailureKind::Provider,
            format!("Gemini API error: {detail}"),
            "",
        ),
    }
}

fn failure(kind: FailureKind, error: impl Into<String>, raw: impl Into<String>) -> ReviewOutcome {
    ReviewOutcome::Failure(ReviewFailure::new(kind, error, raw))
}

/// Cuts `code` to at most `max` characters without splitting a char.
fn truncate_chars(code: &str, max: usize) -> &str {
    match code.char_indices().nth(max) {
        Some((idx, _)) => &code[..idx],
        None => code,
    }
}

/// Drops lines that are only a code fence marker (```json, ```, ~~~).
pub fn strip_markdown(text: &str) -> String {
    text.lines()
        .filter(|line| !FENCE_LINES.contains(&line.trim()))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn parse_reply(text: &str) -> Option<Value> {
    serde_json::from_str::<Value>(text)
        .ok()
        .filter(Value::is_object)
}

/// Coerces a parsed reply into a `CodeReview`, defaulting anything missing or mistyped.
/// `grade_score` always comes from the grade table, never from the reply.
pub fn normalize_review(reply: &Value) -> CodeReview {
    let grade = Grade::from_reply(reply.get("grade").and_then(Value::as_str));

    let bugs = string_list(reply, "bugs");
    let security_issues = string_list(reply, "security_issues");
    let style_issues = string_list(reply, "style_issues");
    let strengths = string_list(reply, "strengths");

    let mut language = string_field(reply, "language");
    if language.is_empty() {
        language = "Unknown".to_string();
    }

    let total_issues = bugs.len() + security_issues.len() + style_issues.len();
    let has_critical = !bugs.is_empty() || !security_issues.is_empty();

    CodeReview {
        language,
        grade,
        grade_score: grade.score(),
        summary: string_field(reply, "summary"),
        bugs,
        security_issues,
        style_issues,
        strengths,
        complexity: string_field(reply, "complexity"),
        maintainability: string_field(reply, "maintainability"),
        refactored_snippet: string_field(reply, "refactored_snippet"),
        total_issues,
        has_critical,
    }
}

fn string_field(reply: &Value, key: &str) -> String {
    reply
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn string_list(reply: &Value, key: &str) -> Vec<String> {
    reply
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    // structured findings, e.g. {"line": 3, "issue": "..."}
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}
