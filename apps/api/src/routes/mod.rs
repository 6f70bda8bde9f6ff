pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::review::handlers as review;
use crate::screening::handlers as screening;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {uri}"))
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Screening API
        .route("/api/v1/analyze", post(screening::handle_analyze))
        .route("/api/v1/evaluate", post(screening::handle_evaluate))
        // Code Review API
        .route("/api/v1/code-review", post(review::handle_code_review))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::llm_client::{GenerationSettings, LlmError, TextGenerator};
    use crate::review::retry::RetryPolicy;
    use crate::review::reviewer::CodeReviewer;
    use crate::screening::scorer::tests::MarkerEmbedder;

    const BOUNDARY: &str = "screener-test-boundary";

    struct FixedGenerator;

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        async fn generate(
            &self,
            _prompt: &str,
            _settings: GenerationSettings,
        ) -> Result<String, LlmError> {
            Ok(json!({
                "language": "Python",
                "grade": "B",
                "grade_score": 0.1,
                "summary": "Fine.",
                "bugs": [],
                "security_issues": [],
                "style_issues": ["naming"],
                "strengths": ["short"],
                "complexity": "Low",
                "maintainability": "High",
                "refactored_snippet": ""
            })
            .to_string())
        }
    }

    fn test_app() -> (Router, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState {
            config: Config::for_tests("http://127.0.0.1:9", dir.path().to_path_buf()),
            embedder: Arc::new(MarkerEmbedder),
            reviewer: CodeReviewer::new(Arc::new(FixedGenerator), RetryPolicy::default()),
        };
        (build_router(state), dir)
    }

    fn multipart_request(uri: &str, fields: &[(&str, &str)], files: &[(&str, &str, &[u8])]) -> Request<Body> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        for (name, file_name, bytes) in files {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    /// Single-page PDF whose only content is `text` in Helvetica.
    fn minimal_pdf(text: &str) -> Vec<u8> {
        let content = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>".to_string(),
            format!("<< /Length {} >>\nstream\n{content}\nendstream", content.len()),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>".to_string(),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
        }

        let xref_at = pdf.len();
        let mut tail = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            tail.push_str(&format!("{offset:010} 00000 n \n"));
        }
        tail.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
            objects.len() + 1
        ));
        pdf.extend_from_slice(tail.as_bytes());
        pdf
    }

    fn form_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _dir) = test_app();
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let (app, _dir) = test_app();
        let response = app
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_code_review_requires_code() {
        let (app, _dir) = test_app();
        let response = app
            .oneshot(form_request("/api/v1/code-review", "code=%20%20&candidate_name=Ada"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"]["message"],
            "No code provided"
        );
    }

    #[tokio::test]
    async fn test_code_review_returns_normalized_review() {
        let (app, _dir) = test_app();
        let response = app
            .oneshot(form_request(
                "/api/v1/code-review",
                "code=print%281%29&candidate_name=Ada",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["name"], "Ada");
        assert_eq!(body["review"]["status"], "success");
        assert_eq!(body["review"]["grade"], "B");
        assert_eq!(body["review"]["grade_score"], 0.75);
        assert_eq!(body["review"]["total_issues"], 1);
    }

    #[tokio::test]
    async fn test_code_review_default_name() {
        let (app, _dir) = test_app();
        let response = app
            .oneshot(form_request("/api/v1/code-review", "code=x%3D1"))
            .await
            .unwrap();
        assert_eq!(json_body(response).await["name"], "Candidate");
    }

    #[tokio::test]
    async fn test_analyze_requires_job_description() {
        let (app, _dir) = test_app();
        let request = multipart_request(
            "/api/v1/analyze",
            &[("jd_text", "   ")],
            &[("resumes", "a.pdf", &b"%PDF"[..])],
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"]["message"],
            "Please enter a job description."
        );
    }

    #[tokio::test]
    async fn test_analyze_requires_a_resume() {
        let (app, _dir) = test_app();
        let request = multipart_request(
            "/api/v1/analyze",
            &[("jd_text", "Rust engineer")],
            &[("resumes", "", &b""[..])],
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"]["message"],
            "Please upload at least one resume."
        );
    }

    #[tokio::test]
    async fn test_analyze_rejects_only_non_pdf_uploads() {
        let (app, _dir) = test_app();
        let request = multipart_request(
            "/api/v1/analyze",
            &[("jd_text", "Rust engineer")],
            &[("resumes", "cv.docx", &b"PK"[..])],
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"]["message"],
            "Only PDF resumes are accepted."
        );
    }

    #[tokio::test]
    async fn test_analyze_unreadable_pdf_aborts_batch_and_cleans_up() {
        let (app, dir) = test_app();
        let request = multipart_request(
            "/api/v1/analyze",
            &[("jd_text", "Rust engineer")],
            &[("resumes", "broken.pdf", &b"not really a pdf"[..])],
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_evaluate_requires_resume() {
        let (app, _dir) = test_app();
        let request = multipart_request(
            "/api/v1/evaluate",
            &[("jd_text", "Rust engineer"), ("code", "fn main() {}")],
            &[],
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"]["message"],
            "Please upload a resume."
        );
    }

    const MATCHING_JD: &str = "Looking for a Python developer with Docker and AWS experience";

    #[tokio::test]
    async fn test_analyze_ranks_reports_and_cleans_up() {
        let (app, dir) = test_app();
        let weak = minimal_pdf("unrelated career history");
        let strong = minimal_pdf("Python and Docker engineer");
        let long_jd = format!("{MATCHING_JD}. {}", "Remote friendly team. ".repeat(20));
        assert!(long_jd.chars().count() > 300);

        let request = multipart_request(
            "/api/v1/analyze",
            &[("jd_text", long_jd.as_str())],
            &[
                ("resumes", "weak_one.pdf", &weak[..]),
                ("resumes", "jane_doe.pdf", &strong[..]),
            ],
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        let reports = body["reports"].as_array().unwrap();
        assert_eq!(reports.len(), 2);

        assert_eq!(reports[0]["name"], "Jane Doe");
        assert_eq!(reports[0]["resume_score"]["similarity"], 0.8);
        assert_eq!(reports[0]["resume_score"]["label"], "Excellent Match");
        assert_eq!(reports[0]["resume_score"]["keyword_gap"]["coverage"], 0.67);
        assert_eq!(reports[0]["resume_score"]["keyword_gap"]["missing"], json!(["aws"]));
        assert_eq!(reports[0]["code_review"], Value::Null);
        assert_eq!(reports[0]["final_score"], 0.8);
        assert_eq!(reports[0]["recommendation"], "Strong Hire");

        assert_eq!(reports[1]["name"], "Weak One");
        assert_eq!(reports[1]["final_score"], 0.0);
        assert_eq!(reports[1]["recommendation"], "Pass");

        let preview = body["jd_preview"].as_str().unwrap();
        assert_eq!(preview.chars().count(), 300);
        assert!(preview.starts_with(MATCHING_JD));
        assert!(body["generated_at"].is_string());

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_evaluate_weights_resume_and_code() {
        let (app, dir) = test_app();
        let resume = minimal_pdf("Python and Docker engineer");
        let request = multipart_request(
            "/api/v1/evaluate",
            &[
                ("jd_text", MATCHING_JD),
                ("code", "def add(a, b): return a + b"),
                ("candidate_name", "  Jane Q Public "),
            ],
            &[("resume", "jane_doe.pdf", &resume[..])],
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let report = json_body(response).await;
        assert_eq!(report["name"], "Jane Q Public");
        assert_eq!(report["code_review"]["status"], "success");
        assert_eq!(report["code_review"]["grade"], "B");
        // 0.6 * 0.8 + 0.4 * 0.75
        assert_eq!(report["final_score"], 0.78);
        assert_eq!(report["final_pct"], 78.0);
        assert_eq!(report["recommendation"], "Strong Hire");

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_evaluate_blank_code_skips_review() {
        let (app, dir) = test_app();
        let resume = minimal_pdf("Python and Docker engineer");
        let request = multipart_request(
            "/api/v1/evaluate",
            &[("jd_text", MATCHING_JD), ("code", "   ")],
            &[("resume", "jane_doe.pdf", &resume[..])],
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let report = json_body(response).await;
        assert_eq!(report["name"], "Jane Doe");
        assert_eq!(report["code_review"], Value::Null);
        assert_eq!(report["final_score"], 0.8);
        assert_eq!(report["final_pct"], 80.0);

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
