pub mod health;
pub mod index;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let reports = ServeDir::new(state.reports.dir());

    Router::new()
        .route("/", get(index::index_handler))
        .route("/health", get(health::health_handler))
        .route("/analyze", post(handlers::handle_analyze))
        .nest_service("/reports", reports)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::analysis::interpreter::Interpreter;
    use crate::analysis::models::{Charts, Interpretation};
    use crate::config::Config;
    use crate::errors::AppError;
    use crate::report::font::test_font;
    use crate::report::ReportWriter;

    struct CannedInterpreter;

    #[async_trait]
    impl Interpreter for CannedInterpreter {
        async fn interpret(
            &self,
            charts: &Charts,
            _question: Option<&str>,
        ) -> Result<Interpretation, AppError> {
            Ok(Interpretation {
                bazi: format!("八字 {}", charts.bazi.eight_characters()),
                ziwei: "紫微解读".to_string(),
                zhouyi: "卦象解读".to_string(),
            })
        }
    }

    struct UnavailableInterpreter;

    #[async_trait]
    impl Interpreter for UnavailableInterpreter {
        async fn interpret(
            &self,
            _charts: &Charts,
            _question: Option<&str>,
        ) -> Result<Interpretation, AppError> {
            Err(AppError::Llm("connection refused".to_string()))
        }
    }

    fn app(dir: PathBuf, interpreter: Arc<dyn Interpreter>) -> Router {
        let config = Config {
            llm_api_key: "test-key".to_string(),
            llm_base_url: "http://127.0.0.1:1".to_string(),
            llm_model: "test-model".to_string(),
            report_dir: dir.clone(),
            report_font_path: None,
            report_retention: None,
            public_base_url: "http://fortune.test".to_string(),
            port: 8080,
            rust_log: "info".to_string(),
        };
        build_router(AppState {
            config,
            interpreter,
            reports: ReportWriter::new(dir, test_font()),
        })
    }

    fn analyze(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    const VALID: &str = r#"{
        "birth": {"year": 2000, "month": 1, "day": 1, "hour": 12, "gender": "male"},
        "divination": {}
    }"#;

    #[tokio::test]
    async fn test_analyze_returns_readings_and_report_url() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path().to_path_buf(), Arc::new(CannedInterpreter));

        let response = app.oneshot(analyze(VALID)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["bazi"], "八字 己卯 丙子 戊午 戊午");
        assert_eq!(body["ziwei"], "紫微解读");
        assert_eq!(body["zhouyi"], "卦象解读");
        assert_eq!(body["charts"]["zhouyi"]["lines"].as_array().unwrap().len(), 6);

        let url = body["pdf_report"].as_str().unwrap();
        let file_name = url.strip_prefix("http://fortune.test/reports/").unwrap();
        assert!(dir.path().join(file_name).exists());
    }

    #[tokio::test]
    async fn test_report_is_served() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path().to_path_buf(), Arc::new(CannedInterpreter));

        let response = app.clone().oneshot(analyze(VALID)).await.unwrap();
        let body = json_body(response).await;
        let url = body["pdf_report"].as_str().unwrap();
        let path = url.strip_prefix("http://fortune.test").unwrap();

        let response = app
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF-"));

        let text: String = pdf_extract::extract_text_from_mem(&bytes)
            .unwrap()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        assert!(text.contains("玄学综合分析报告"), "unexpected report text: {text}");
        assert!(text.contains("一、八字分析"), "unexpected report text: {text}");
    }

    #[tokio::test]
    async fn test_missing_birth_field_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path().to_path_buf(), Arc::new(CannedInterpreter));

        let response = app
            .oneshot(analyze(r#"{"birth": {"year": 2000, "month": 1, "hour": 12, "gender": "male"}}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_invalid_values_are_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path().to_path_buf(), Arc::new(CannedInterpreter));

        for birth in [
            json!({"year": 2000, "month": 2, "day": 30, "hour": 12, "gender": "male"}),
            json!({"year": 2000, "month": 1, "day": 1, "hour": 24, "gender": "male"}),
            json!({"year": 1800, "month": 1, "day": 1, "hour": 12, "gender": "male"}),
            json!({"year": 2000, "month": 1, "day": 1, "hour": 12, "gender": "other"}),
        ] {
            let body = json!({ "birth": birth }).to_string();
            let response = app.clone().oneshot(analyze(&body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{birth}");
        }
    }

    #[tokio::test]
    async fn test_interpreter_failure_is_bad_gateway() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path().to_path_buf(), Arc::new(UnavailableInterpreter));

        let response = app.oneshot(analyze(VALID)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "LLM_ERROR");
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path().to_path_buf(), Arc::new(CannedInterpreter));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "fortune-api");
    }

    #[tokio::test]
    async fn test_index_serves_form() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path().to_path_buf(), Arc::new(CannedInterpreter));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("<form"));
        assert!(html.contains("/analyze"));
    }
}
