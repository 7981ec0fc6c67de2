//! HTTP API
//!
//! - POST /contacts - Store a contact
//! - GET /contacts/{name} - Look up a contact by name
//! - POST /vapi/call-latest - Call the most recently added contact
//! - POST /vapi/brochure-answer - Answer a question from the brochure PDF
//! - GET /health - Liveness and contact count

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{debug, error, info, warn, Level};

use crate::ai_client::CompletionClient;
use crate::brochure::{self, BROCHURE_UNAVAILABLE};
use crate::db::{Contact, Database, NewContact};
use crate::error::Result;
use crate::settings::Config;
use crate::vapi_client::VapiClient;

const MAX_BODY_BYTES: usize = 64 * 1024;

// ============================================================================
// AppState
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub vapi: Arc<VapiClient>,
    pub completions: Arc<CompletionClient>,
    /// Client for brochure downloads
    pub http: reqwest::Client,
    pub brochure_url: String,
    pub start_time: Instant,
}

impl AppState {
    /// Wire the outbound clients from config around an opened store
    pub fn from_config(config: &Config, db: Arc<Database>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .user_agent(concat!("salescall/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let vapi = VapiClient::new(
            http.clone(),
            &config.vapi_base_url,
            &config.vapi_api_key,
            &config.vapi_assistant_id,
            &config.vapi_phone_number_id,
        );
        let completions = CompletionClient::new(
            http.clone(),
            &config.openai_base_url,
            &config.openai_api_key,
            &config.openai_model,
        );

        Ok(Self {
            db,
            vapi: Arc::new(vapi),
            completions: Arc::new(completions),
            http,
            brochure_url: config.brochure_url.clone(),
            start_time: Instant::now(),
        })
    }
}

// ============================================================================
// Error type
// ============================================================================

pub struct AppError(StatusCode, String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.0, Json(serde_json::json!({"detail": self.1}))).into_response()
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        error!(error = %e, "contact store failure");
        AppError(StatusCode::INTERNAL_SERVER_ERROR, "Contact store error".to_string())
    }
}

fn not_found(msg: impl Into<String>) -> AppError {
    AppError(StatusCode::NOT_FOUND, msg.into())
}

// ============================================================================
// Request / Response types
// ============================================================================

#[derive(Serialize)]
struct CreateContactResponse {
    message: String,
    contact: Contact,
}

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

#[derive(Serialize)]
struct BrochureAnswer {
    output: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    contacts: usize,
    uptime_secs: u64,
}

/// `input` from a brochure question body, with or without a JSON content type.
///
/// Missing or null is the empty question; any other non-string value is used
/// in its JSON rendering.
fn question_from_body(body: &[u8]) -> std::result::Result<String, AppError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        debug!(error = %e, "brochure question is not JSON");
        AppError(StatusCode::BAD_REQUEST, "Request body must be a JSON object".to_string())
    })?;
    let Value::Object(mut fields) = value else {
        return Err(AppError(StatusCode::BAD_REQUEST, "Request body must be a JSON object".to_string()));
    };

    Ok(match fields.remove("input") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(input)) => input,
        Some(other) => other.to_string(),
    })
}

// ============================================================================
// Handlers
// ============================================================================

// POST /contacts
async fn create_contact_handler(
    State(state): State<AppState>,
    Json(req): Json<NewContact>,
) -> std::result::Result<(StatusCode, Json<CreateContactResponse>), AppError> {
    let contact = state.db.create_contact(&req.name, &req.phone_number)?;
    info!(id = contact.id, name = %contact.name, "Contact added");

    Ok((StatusCode::CREATED, Json(CreateContactResponse {
        message: "Contact added".to_string(),
        contact,
    })))
}

// GET /contacts/{name}
async fn get_contact_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> std::result::Result<Json<Contact>, AppError> {
    match state.db.find_contact_by_name(&name)? {
        Some(contact) => Ok(Json(contact)),
        None => {
            debug!(%name, "contact lookup missed");
            Err(not_found("Contact not found"))
        }
    }
}

// POST /vapi/call-latest
async fn call_latest_handler(
    State(state): State<AppState>,
) -> std::result::Result<Json<MessageResponse>, AppError> {
    let Some(contact) = state.db.find_latest_contact()? else {
        warn!("No contacts found in the database.");
        return Err(not_found("No contacts found to call"));
    };

    info!(
        id = contact.id,
        name = %contact.name,
        phone_number = %contact.phone_number,
        "Latest contact fetched"
    );

    // Reported as initiated regardless of how VAPI answered.
    state.vapi.dispatch_call(&contact.name, &contact.phone_number).await;

    Ok(Json(MessageResponse {
        message: "VAPI call initiated".to_string(),
    }))
}

// POST /vapi/brochure-answer
async fn brochure_answer_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> std::result::Result<Json<BrochureAnswer>, AppError> {
    let question = question_from_body(&body)?;
    let brochure_text = brochure::load_brochure_text(&state.http, &state.brochure_url).await;

    if brochure_text.is_empty() {
        return Ok(Json(BrochureAnswer {
            output: BROCHURE_UNAVAILABLE.to_string(),
        }));
    }

    let prompt = brochure::build_brochure_prompt(&question, &brochure_text);
    let answer = state.completions.complete(&prompt).await.map_err(|e| {
        error!(error = %e, "brochure completion failed");
        AppError(StatusCode::BAD_GATEWAY, "Completion request failed".to_string())
    })?;

    Ok(Json(BrochureAnswer { output: answer }))
}

// GET /health
async fn health_handler(
    State(state): State<AppState>,
) -> std::result::Result<Json<HealthResponse>, AppError> {
    let contacts = state.db.count_contacts()?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        contacts,
        uptime_secs: state.start_time.elapsed().as_secs(),
    }))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/contacts", post(create_contact_handler))
        .route("/contacts/{name}", get(get_contact_handler))
        .route("/vapi/call-latest", post(call_latest_handler))
        .route("/vapi/brochure-answer", post(brochure_answer_handler))
        .route("/health", get(health_handler))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
