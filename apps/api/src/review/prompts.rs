// Prompt constants for the code review call.

/// Code review prompt template. Replace `{code}` before sending.
pub const CODE_REVIEW_PROMPT_TEMPLATE: &str = r#"You are a senior software engineer doing a strict code review.
Analyze the code below and respond ONLY with a valid JSON object.
Do NOT use markdown code fences. Do NOT include any text outside the JSON object.

Code to review:
---
{code}
---

Return a JSON object with this EXACT schema (all fields required):
{
  "language": "detected programming language",
  "grade": "A or B or C or D or F",
  "grade_score": <float 0.0 to 1.0 matching grade: A=0.92, B=0.75, C=0.55, D=0.35, F=0.1>,
  "summary": "2-3 sentence honest assessment of overall code quality",
  "bugs": [
    "each bug stated clearly, e.g. 'Line 12: division by zero if denominator is 0'"
  ],
  "security_issues": [
    "each security issue, e.g. 'SQL query is built by string concatenation: injection risk'"
  ],
  "style_issues": [
    "each style or readability issue, e.g. 'Variable name x is not descriptive'"
  ],
  "strengths": [
    "what the code does well, e.g. 'Early returns keep nesting shallow'"
  ],
  "complexity": "Low / Medium / High",
  "maintainability": "Low / Medium / High",
  "refactored_snippet": "an improved version of the worst section only, or an empty string if the code is already clean"
}

Grading rubric:
A = clean, secure, readable, no issues
B = minor style issues, no bugs
C = some bugs or security issues, mostly readable
D = multiple bugs, poor structure
F = broken, insecure, unreadable
"#;
