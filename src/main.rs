//! Thin HTTP surface over the valuation pipeline. No business logic
//! lives here; handlers validate, delegate and map error kinds to
//! status codes.

use axum::{
    extract::rejection::JsonRejection,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use clearvalue_backend::clock::Clock;
use clearvalue_backend::domain::{ComparableProperty, RegressionConfig, Report, SubjectProperty};
use clearvalue_backend::error::CoreError;
use clearvalue_backend::geocode::geocode;
use clearvalue_backend::ingestion::{parse_csv, validate_comp, ParseOutcome};
use clearvalue_backend::report::generate_report;
use clearvalue_backend::subject::{validate_subject, FieldError, SubjectInput};

#[derive(Clone)]
struct AppState {
    http: reqwest::Client,
    geocode_api_key: Option<String>,
    clock: Clock,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clearvalue_backend=info,api_server=info".into()),
        )
        .init();

    let geocode_api_key = std::env::var("GOOGLE_MAPS_API_KEY").ok();
    if geocode_api_key.is_none() {
        warn!("GOOGLE_MAPS_API_KEY not set; subject geocoding disabled");
    }

    let state = AppState {
        http: reqwest::Client::new(),
        geocode_api_key,
        clock: Clock::system(),
    };

    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/v1/parser/parse-csv", post(parse_csv_route))
        .route("/api/v1/subject/validate", post(validate_subject_route))
        .route("/api/v1/report/generate", post(generate_report_route))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3001);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("ClearValue API listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "service": "clearvalue-api" }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParseCsvRequest {
    csv_content: String,
}

/// Parse failures are soft: the outcome carries `success: false` plus the
/// row errors, and the route still answers 200.
async fn parse_csv_route(
    State(state): State<AppState>,
    payload: Result<Json<ParseCsvRequest>, JsonRejection>,
) -> Result<Json<ParseOutcome>, ApiError> {
    let Json(request) = payload.map_err(malformed)?;
    Ok(Json(parse_csv(&request.csv_content, &state.clock)))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubjectValidateResponse {
    subject: SubjectProperty,
    geocoded: bool,
}

async fn validate_subject_route(
    State(state): State<AppState>,
    payload: Result<Json<SubjectInput>, JsonRejection>,
) -> Result<Json<SubjectValidateResponse>, ApiError> {
    let Json(input) = payload.map_err(malformed)?;
    let mut subject = validate_subject(&input, &state.clock).map_err(field_errors)?;

    let mut geocoded = false;
    if subject.coordinates.is_none() {
        if let Some(coords) = geocode(
            &state.http,
            state.geocode_api_key.as_deref(),
            &subject.address,
        )
        .await
        {
            subject.coordinates = Some(coords);
            geocoded = true;
        }
    }

    Ok(Json(SubjectValidateResponse { subject, geocoded }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateReportRequest {
    subject: SubjectInput,
    comps: Vec<ComparableProperty>,
    config: RegressionConfig,
}

async fn generate_report_route(
    State(state): State<AppState>,
    payload: Result<Json<GenerateReportRequest>, JsonRejection>,
) -> Result<Json<Report>, ApiError> {
    let Json(request) = payload.map_err(malformed)?;
    let mut subject = validate_subject(&request.subject, &state.clock).map_err(field_errors)?;

    let mut comp_errors = Vec::new();
    for (i, comp) in request.comps.iter().enumerate() {
        if let Err(message) = validate_comp(comp, &state.clock) {
            comp_errors.push(json!({ "comp": i, "message": message }));
        }
    }
    if !comp_errors.is_empty() {
        return Err(validation(
            "One or more comps failed validation",
            Some(serde_json::Value::Array(comp_errors)),
        ));
    }

    // Best-effort: a subject without coordinates still gets a report, just
    // without distance features.
    if subject.coordinates.is_none() {
        subject.coordinates = geocode(
            &state.http,
            state.geocode_api_key.as_deref(),
            &subject.address,
        )
        .await;
    }

    let report = generate_report(&subject, &request.comps, &request.config, &state.clock)
        .map_err(core_error)?;
    Ok(Json(report))
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    message: String,
    code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn malformed(rejection: JsonRejection) -> ApiError {
    ApiError {
        status: StatusCode::BAD_REQUEST,
        body: ErrorBody {
            error: "Malformed request body".to_string(),
            message: rejection.body_text(),
            code: "MALFORMED_INPUT".to_string(),
            details: None,
        },
    }
}

fn validation(message: &str, details: Option<serde_json::Value>) -> ApiError {
    ApiError {
        status: StatusCode::BAD_REQUEST,
        body: ErrorBody {
            error: "Validation failed".to_string(),
            message: message.to_string(),
            code: "VALIDATION_ERROR".to_string(),
            details,
        },
    }
}

fn field_errors(errors: Vec<FieldError>) -> ApiError {
    validation(
        "Subject property failed validation",
        serde_json::to_value(errors).ok(),
    )
}

fn core_error(err: CoreError) -> ApiError {
    let status = match err {
        CoreError::InsufficientComps { .. } => StatusCode::BAD_REQUEST,
        CoreError::DegenerateFit => StatusCode::UNPROCESSABLE_ENTITY,
    };
    ApiError {
        status,
        body: ErrorBody {
            error: "Report generation failed".to_string(),
            message: err.to_string(),
            code: err.code().to_string(),
            details: None,
        },
    }
}
