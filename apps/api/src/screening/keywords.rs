//! Keyword coverage: which of a fixed technical vocabulary the JD asks for,
//! and which of those the resume mentions.

use serde::{Deserialize, Serialize};

use crate::screening::round_dp;

/// Fixed vocabulary. Matching is plain lower-cased substring search, so short
/// terms like "go" or "rest" also hit inside longer words.
pub const TECH_KEYWORDS: [&str; 30] = [
    "python",
    "machine learning",
    "deep learning",
    "flask",
    "docker",
    "kubernetes",
    "react",
    "sql",
    "nosql",
    "tensorflow",
    "pytorch",
    "nlp",
    "computer vision",
    "api",
    "git",
    "linux",
    "aws",
    "gcp",
    "ci/cd",
    "microservices",
    "rest",
    "graphql",
    "typescript",
    "java",
    "c++",
    "rust",
    "go",
    "agile",
    "scrum",
    "system design",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordGap {
    /// Vocabulary terms found in the JD, in vocabulary order.
    pub required: Vec<String>,
    pub present: Vec<String>,
    pub missing: Vec<String>,
    /// present / required, 2 dp. 1.0 when the JD names none of the vocabulary.
    pub coverage: f64,
}

pub fn keyword_gap(jd_text: &str, resume_text: &str) -> KeywordGap {
    let jd_lower = jd_text.to_lowercase();
    let resume_lower = resume_text.to_lowercase();

    let required: Vec<&str> = TECH_KEYWORDS
        .iter()
        .copied()
        .filter(|k| jd_lower.contains(*k))
        .collect();

    let (present, missing): (Vec<&str>, Vec<&str>) =
        required.iter().copied().partition(|k| resume_lower.contains(*k));

    let coverage = if required.is_empty() {
        1.0
    } else {
        round_dp(present.len() as f64 / required.len() as f64, 2)
    };

    KeywordGap {
        required: to_owned(&required),
        present: to_owned(&present),
        missing: to_owned(&missing),
        coverage,
    }
}

fn to_owned(keywords: &[&str]) -> Vec<String> {
    keywords.iter().map(|k| k.to_string()).collect()
}
