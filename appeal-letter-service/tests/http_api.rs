mod common;

use appeal_letter_service::{AppState, GenerationVariant, build_router};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use common::*;
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

const BOUNDARY: &str = "appeal-test-boundary";

enum Part {
    File(&'static str, Vec<u8>),
    Text(&'static str, &'static str),
}

fn multipart_body(parts: Vec<Part>) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::File(name, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{name}.pdf\"\r\n\
                         Content-Type: application/pdf\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(&bytes);
            }
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}").as_bytes(),
                );
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn all_documents() -> Vec<Part> {
    vec![
        Part::File("eob", eob_pdf()),
        Part::File("medical_records", medical_pdf()),
        Part::File("denial_letter", denial_pdf()),
    ]
}

fn app(provider: Arc<ScriptedProvider>) -> Router {
    let state = AppState {
        pipeline: Arc::new(pipeline(provider, GenerationVariant::Full)),
    };
    build_router(state, 10 * 1024 * 1024)
}

fn post(uri: &str, parts: Vec<Part>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

async fn body_json(response: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

#[tokio::test]
async fn health_check_reports_healthy() {
    let response = app(ScriptedProvider::new())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "healthy");
}

#[tokio::test]
async fn generate_returns_all_outputs() {
    let provider = ScriptedProvider::new();
    let mut parts = all_documents();
    parts.push(Part::Text("api_key", "sk-or-test"));

    let response = app(provider.clone())
        .oneshot(post("/appeal/generate", parts))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "completed");
    assert_eq!(json["appeal_letter"], "response #1");
    assert_eq!(json["medical_summary"], "response #2");
    assert_eq!(json["rebuttal_suggestions"], "response #3");
    assert_eq!(json["patient_info"]["name"].as_str().unwrap().trim(), "John Smith");
    assert_eq!(json["download"]["file_name"], "appeal_letter.txt");
    assert_eq!(json["download"]["mime_type"], "text/plain");
    assert_eq!(provider.calls().len(), 3);
}

#[tokio::test]
async fn variant_field_selects_two_call_run() {
    let provider = ScriptedProvider::new();
    let mut parts = all_documents();
    parts.push(Part::Text("api_key", "sk-or-test"));
    parts.push(Part::Text("variant", "appeal_and_summary"));

    let response = app(provider.clone())
        .oneshot(post("/appeal/generate", parts))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json.get("rebuttal_suggestions").is_none());
    assert_eq!(provider.calls().len(), 2);
}

#[tokio::test]
async fn download_serves_the_letter_as_plain_text() {
    let mut parts = all_documents();
    parts.push(Part::Text("api_key", "sk-or-test"));

    let response = app(ScriptedProvider::new())
        .oneshot(post("/appeal/generate?download=true", parts))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert_eq!(content_type, "text/plain");
    assert_eq!(disposition, "attachment; filename=\"appeal_letter.txt\"");
    assert_eq!(body_bytes(response).await, b"response #1");
}

#[tokio::test]
async fn missing_api_key_is_a_bad_request() {
    let provider = ScriptedProvider::new();
    let response = app(provider.clone())
        .oneshot(post("/appeal/generate", all_documents()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("API key"));
    assert_eq!(json["stage"], "documents_pending");
    assert_eq!(provider.connects(), 0);
}

#[tokio::test]
async fn missing_document_is_a_bad_request() {
    let provider = ScriptedProvider::new();
    let parts = vec![
        Part::File("eob", eob_pdf()),
        Part::File("denial_letter", denial_pdf()),
        Part::Text("api_key", "sk-or-test"),
    ];

    let response = app(provider.clone())
        .oneshot(post("/appeal/generate", parts))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("Medical Records"));
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn rejected_key_is_unauthorized() {
    let mut parts = all_documents();
    parts.push(Part::Text("api_key", "sk-or-revoked"));

    let response = app(ScriptedProvider::rejecting())
        .oneshot(post("/appeal/generate", parts))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn upstream_failure_is_a_bad_gateway() {
    let mut parts = all_documents();
    parts.push(Part::Text("api_key", "sk-or-test"));

    let response = app(ScriptedProvider::failing_on_call(1))
        .oneshot(post("/appeal/generate", parts))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["stage"], "agent_invoking");
}

#[tokio::test]
async fn preview_reports_unreadable_documents_individually() {
    let parts = vec![
        Part::File("eob", eob_pdf()),
        Part::File("medical_records", b"not a pdf".to_vec()),
    ];

    let response = app(ScriptedProvider::new())
        .oneshot(post("/appeal/preview", parts))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let documents = json["documents"].as_array().unwrap();
    assert_eq!(documents.len(), 2);
    assert_eq!(documents[0]["document"], "eob");
    assert!(documents[0]["text"].as_str().unwrap().contains("Claim 88213"));
    assert_eq!(documents[1]["document"], "medical_records");
    assert!(documents[1]["error"].is_string());
}
