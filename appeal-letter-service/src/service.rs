use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::{HeaderValue, Request, StatusCode, header},
    middleware::{Next, from_fn},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{Instrument, debug, error, info};
use uuid::Uuid;

use crate::{
    agent::OpenRouterProvider,
    config::ServiceConfig,
    error::AppealError,
    models::{
        DocumentKind, DocumentSet, DownloadArtifact, GenerateResponse, GenerationRequest,
        GenerationVariant, PreviewResponse, UploadedDocument,
    },
    pipeline::AppealPipeline,
};

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<Value>)>;
type ApiError = (StatusCode, Json<Value>);

const API_KEY_FIELD: &str = "api_key";
const VARIANT_FIELD: &str = "variant";

fn bad_request_error(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn internal_error(message: &str, details: &str) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": message,
            "details": details
        })),
    )
}

fn appeal_error(err: &AppealError) -> ApiError {
    let status = match err {
        AppealError::MissingInput(_) => StatusCode::BAD_REQUEST,
        AppealError::DocumentParse { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        AppealError::AgentInit(_) => StatusCode::UNAUTHORIZED,
        AppealError::AgentInvocation { .. } => StatusCode::BAD_GATEWAY,
        AppealError::Workflow(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(json!({
            "error": err.to_string(),
            "stage": err.stage(),
        })),
    )
}

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<AppealPipeline>,
}

pub fn create_app(config: &ServiceConfig) -> Router {
    let provider = Arc::new(OpenRouterProvider::new(config.agent_settings()));
    let pipeline = AppealPipeline::new(provider, config.variant);
    let app_state = AppState {
        pipeline: Arc::new(pipeline),
    };
    build_router(app_state, config.max_upload_bytes)
}

pub fn build_router(app_state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/appeal/preview", post(preview_documents))
        .route("/appeal/generate", post(generate_appeal))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(from_fn(correlation_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Tag every request with a correlation id and run it inside a span carrying it
async fn correlation_id_middleware(mut request: Request<axum::body::Body>, next: Next) -> Response {
    let correlation_id = Uuid::new_v4().to_string();

    if let Ok(value) = HeaderValue::from_str(&correlation_id) {
        request.headers_mut().insert("x-correlation-id", value);
    }

    let span = tracing::info_span!("http_request", correlation_id = %correlation_id);
    next.run(request).instrument(span).await
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "Medical Claim Appeal Generator",
        "version": "1.0.0",
        "description": "Generates medical claim appeal letters, record summaries and rebuttal suggestions from uploaded PDFs",
        "endpoints": {
            "POST /appeal/preview": "Extract and return the text of the uploaded documents",
            "POST /appeal/generate": "Generate the appeal letter (add ?download=true for appeal_letter.txt)",
            "GET /health": "Health check"
        },
        "form_fields": {
            "eob": "Explanation of Benefits PDF",
            "medical_records": "Medical records PDF",
            "denial_letter": "Denial letter PDF",
            "api_key": "OpenRouter API key (generate only)",
            "variant": "full | appeal_and_summary (optional)"
        }
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Multipart fields of one upload form
#[derive(Default)]
struct UploadForm {
    documents: DocumentSet,
    api_key: Option<String>,
    variant: Option<GenerationVariant>,
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request_error(&format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();

        if let Some(kind) = DocumentKind::from_field_name(&name) {
            let file_name = field.file_name().unwrap_or(kind.field_name()).to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| bad_request_error(&format!("Failed to read {}: {e}", kind.label())))?;
            // an empty file slot counts as not uploaded
            if !bytes.is_empty() {
                debug!(document = %kind, size = bytes.len(), "received upload");
                form.documents
                    .insert(UploadedDocument::new(kind, file_name, bytes.to_vec()));
            }
        } else if name == API_KEY_FIELD {
            let key = field
                .text()
                .await
                .map_err(|e| bad_request_error(&format!("Failed to read api_key: {e}")))?;
            form.api_key = Some(key);
        } else if name == VARIANT_FIELD {
            let raw = field
                .text()
                .await
                .map_err(|e| bad_request_error(&format!("Failed to read variant: {e}")))?;
            let variant = GenerationVariant::parse(&raw)
                .ok_or_else(|| bad_request_error(&format!("Unknown variant: {raw}")))?;
            form.variant = Some(variant);
        } else {
            debug!(field = %name, "ignoring unknown form field");
        }
    }

    Ok(form)
}

async fn preview_documents(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<PreviewResponse> {
    let form = read_upload_form(multipart).await?;
    info!(
        documents = form.documents.present().count(),
        "Previewing uploaded documents"
    );

    let pipeline = state.pipeline.clone();
    let documents = tokio::task::spawn_blocking(move || pipeline.preview(&form.documents))
        .await
        .map_err(|e| {
            error!("Preview worker failed: {}", e);
            internal_error("Failed to preview documents", &e.to_string())
        })?;

    Ok(Json(PreviewResponse { documents }))
}

#[derive(Debug, Default, Deserialize)]
struct GenerateQuery {
    #[serde(default)]
    download: bool,
}

async fn generate_appeal(
    State(state): State<AppState>,
    Query(query): Query<GenerateQuery>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let form = read_upload_form(multipart).await?;
    info!("Generating appeal letter");

    let request = GenerationRequest {
        credential: form.api_key,
        documents: form.documents,
        variant: form.variant,
    };

    let report = state
        .pipeline
        .generate(request)
        .await
        .map_err(|e| appeal_error(&e))?;

    info!(session_id = %report.session_id, "Appeal letter generated");

    if query.download {
        Ok(download_response(report.download))
    } else {
        Ok(Json(GenerateResponse::from(report)).into_response())
    }
}

/// The letter exactly as generated, served as an attachment
fn download_response(artifact: DownloadArtifact) -> Response {
    (
        [
            (header::CONTENT_TYPE, artifact.mime_type),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", artifact.file_name),
            ),
        ],
        artifact.content,
    )
        .into_response()
}
