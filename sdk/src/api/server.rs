//! HTTP server for the OLI validation API.
//!
//! # API Endpoints
//!
//! | Method | Path                  | Description                              |
//! |--------|-----------------------|------------------------------------------|
//! | GET    | `/health`             | Health check                             |
//! | POST   | `/api/validate/csv`   | Validate a CSV (multipart `file` or raw) |
//! | POST   | `/api/validate/rows`  | Validate JSON rows                       |
//! | GET    | `/api/chains`         | Known chains                             |
//! | GET    | `/api/categories`     | Usage and paymaster categories           |
//! | GET    | `/api/logs`           | SSE stream for real-time logs            |

use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Query, Request, State},
    http::{header, Method, StatusCode},
    response::{sse::Event, IntoResponse, Json, Response, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_error, log_info, LOG_BROADCASTER};
use super::types::{
    error_response, request_options, split_fields, CsvQuery, CsvResponse, RowsResponse,
    ValidateRowsRequest,
};
use crate::config::SdkConfig;
use crate::error::{ServerError, ServerResult};
use crate::pipeline::validate_csv_bytes;
use crate::projects::{options_with_source, ProjectSource};
use crate::reference::{CATEGORIES, CHAINS, PAYMASTER_CATEGORIES};
use crate::validation::{validate_bulk, ValidationOptions};

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub options: ValidationOptions,
    pub projects: ProjectSource,
}

impl AppState {
    pub fn new(options: ValidationOptions, projects: ProjectSource) -> Self {
        Self { options, projects }
    }

    pub fn from_config(config: &SdkConfig) -> Self {
        Self::new(
            config.validation_options(),
            ProjectSource::Remote(config.project_client()),
        )
    }
}

type SharedState = Arc<AppState>;

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::BadRequest(_) | ServerError::Validation(_) | ServerError::Csv(_) => {
                StatusCode::BAD_REQUEST
            }
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            log_error(self.to_string());
        }
        (status, Json(error_response(&self.to_string()))).into_response()
    }
}

/// Build the router without binding a socket.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/validate/csv", post(validate_csv_upload))
        .route("/api/validate/rows", post(validate_rows))
        .route("/api/chains", get(chains))
        .route("/api/categories", get(categories))
        .route("/api/logs", get(sse_logs))
        .layer(cors)
        .with_state(Arc::new(state))
}

/// Start the HTTP server
pub async fn start_server(config: SdkConfig) -> ServerResult<()> {
    let port = config.port;
    let app = router(AppState::from_config(&config));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    eprintln!("OLI validation server running on http://localhost:{}", port);
    eprintln!("   POST /api/validate/csv  - Validate a CSV upload");
    eprintln!("   POST /api/validate/rows - Validate JSON rows");
    eprintln!("   GET  /api/logs          - SSE log stream");
    eprintln!("   GET  /health            - Health check");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Internal(format!("cannot bind {}: {}", addr, e)))?;
    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "oli-sdk",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "csv": "POST /api/validate/csv",
            "rows": "POST /api/validate/rows",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

async fn chains() -> Json<Value> {
    Json(json!({ "chains": CHAINS }))
}

async fn categories() -> Json<Value> {
    Json(json!({
        "categories": CATEGORIES,
        "paymasterCategories": PAYMASTER_CATEGORIES,
    }))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    // lagged receivers skip what they missed
    let stream = BroadcastStream::new(rx).filter_map(|result| {
        let entry = result.ok()?;
        let json = serde_json::to_string(&entry).ok()?;
        Some(Ok(Event::default().data(json)))
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

async fn validate_rows(
    State(state): State<SharedState>,
    Json(request): Json<ValidateRowsRequest>,
) -> ServerResult<Json<RowsResponse>> {
    let options = request_options(
        &state.options,
        request.mode.as_deref(),
        request.allowed_fields,
        request.max_rows,
    )?;
    let options = options_with_source(&options, &state.projects).await;

    log_info(format!("Validating {} rows ({} mode)", request.rows.len(), options.mode.id));
    let result = validate_bulk(&request.rows, &options)?;
    Ok(Json(RowsResponse::from(result)))
}

/// Accepts `multipart/form-data` with a `file` field, or the CSV as the raw
/// request body.
async fn validate_csv_upload(
    State(state): State<SharedState>,
    Query(query): Query<CsvQuery>,
    request: Request,
) -> ServerResult<Json<CsvResponse>> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    let (bytes, file_name) = if is_multipart {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| ServerError::BadRequest(format!("Multipart error: {}", e)))?;
        read_file_field(multipart).await?
    } else {
        let body = Bytes::from_request(request, &())
            .await
            .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?;
        (body.to_vec(), None)
    };

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ServerError::BadRequest("No CSV content provided".to_string()));
    }

    log_info(format!(
        "New upload: {} ({} bytes)",
        file_name.as_deref().unwrap_or("request body"),
        bytes.len()
    ));

    let options = request_options(
        &state.options,
        query.mode.as_deref(),
        query.allowed_fields.as_deref().map(split_fields),
        None,
    )?;
    let options = options_with_source(&options, &state.projects).await;

    let report = validate_csv_bytes(&bytes, &options)?;
    Ok(Json(CsvResponse::new(report, file_name)))
}

async fn read_file_field(mut multipart: Multipart) -> ServerResult<(Vec<u8>, Option<String>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Multipart error: {}", e)))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?;
            return Ok((data.to_vec(), file_name));
        }
    }
    Err(ServerError::BadRequest("No file provided".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttestationRow, ProjectRecord};
    use crate::pipeline::ValidationStatus;
    use axum::body::Body;

    const ADDRESS: &str = "0x1234567890123456789012345678901234567890";

    fn state() -> SharedState {
        Arc::new(AppState::new(
            ValidationOptions::default(),
            ProjectSource::List(vec![ProjectRecord::new("growthepie")]),
        ))
    }

    #[tokio::test]
    async fn test_validate_rows_handler() {
        let request = ValidateRowsRequest {
            rows: vec![AttestationRow::from_pairs([
                ("chain_id", "eip155:1"),
                ("address", ADDRESS),
                ("owner_project", "growthpie"),
            ])],
            ..Default::default()
        };

        let Json(response) = validate_rows(State(state()), Json(request)).await.unwrap();
        assert_eq!(response.status, ValidationStatus::Error);
        assert_eq!(response.result.diagnostics.errors[0].code, "PROJECT_INVALID");
        assert!(!response.validation_id.is_empty());
    }

    #[tokio::test]
    async fn test_validate_rows_rejects_empty_and_bad_mode() {
        let empty = validate_rows(State(state()), Json(ValidateRowsRequest::default())).await;
        assert!(matches!(empty, Err(ServerError::Validation(_))));

        let bad_mode = ValidateRowsRequest {
            rows: vec![AttestationRow::new()],
            mode: Some("expert".to_string()),
            ..Default::default()
        };
        let response = validate_rows(State(state()), Json(bad_mode)).await.unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_csv_raw_body() {
        let request = Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "text/csv")
            .body(Body::from(format!("origin_key,address\nmainnet,{ADDRESS}\n")))
            .unwrap();

        let Json(response) = validate_csv_upload(State(state()), Query(CsvQuery::default()), request)
            .await
            .unwrap();
        assert!(response.report.valid);
        assert_eq!(response.report.rows[0].text("chain_id"), "eip155:1");
        assert_eq!(response.file_name, None);
    }

    #[tokio::test]
    async fn test_csv_multipart_upload() {
        let boundary = "XBOUNDARY";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"labels.csv\"\r\n\
             Content-Type: text/csv\r\n\r\n\
             chain_id,address\r\neip155:8453,{ADDRESS}\r\n\
             \r\n--{boundary}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
            .body(Body::from(body))
            .unwrap();

        let Json(response) = validate_csv_upload(State(state()), Query(CsvQuery::default()), request)
            .await
            .unwrap();
        assert_eq!(response.file_name.as_deref(), Some("labels.csv"));
        assert_eq!(response.report.rows.len(), 1);
        assert!(response.report.valid, "{:?}", response.report.diagnostics);
    }

    #[tokio::test]
    async fn test_csv_empty_body_is_bad_request() {
        let request = Request::builder()
            .method("POST")
            .body(Body::from("  \n"))
            .unwrap();
        let result = validate_csv_upload(State(state()), Query(CsvQuery::default()), request).await;
        assert!(matches!(result, Err(ServerError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_reference_endpoints() {
        let Json(chains) = chains().await;
        assert!(chains["chains"].as_array().unwrap().iter().any(|c| c["caip2"] == "eip155:1"));

        let Json(categories) = categories().await;
        assert!(categories["paymasterCategories"].as_array().unwrap().len() >= 3);
    }
}
