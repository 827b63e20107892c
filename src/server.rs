//! HTTP surface: axum router, handlers, and error mapping.
//!
//! Thin layer over the session/store/progress modules. Status mapping:
//! 400 invalid input (bad language code, failed validation), 401 missing
//! identity or bad API key, 403 ownership violation, 500 only when even
//! the backup write failed.

use crate::auth::{AuthContext, IDENTITY_HEADER};
use crate::config::Config;
use crate::corpus::{Glossary, SourceCorpus};
use crate::error::PortalError;
use crate::i18n::{Language, LanguageRegistry};
use crate::progress::aggregate;
use crate::security::api_key_matches;
use crate::session::{Session, UnitScope};
use crate::snapshot::LanguageSnapshot;
use crate::store::{RecordStore, SaveOutcome, SnapshotKind};
use crate::workflow::{Actor, TransitionAction};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: RecordStore,
    pub corpus: Arc<SourceCorpus>,
    pub glossary: Arc<Glossary>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/languages", get(list_languages))
        .route("/api/glossary", get(get_glossary))
        .route(
            "/api/translations/:lang",
            get(get_translations).post(put_translations),
        )
        .route("/api/translations/:lang/units/:id", post(save_string_unit))
        .route(
            "/api/translations/:lang/glossary/:term",
            post(save_glossary_term),
        )
        .route("/api/progress/:lang", get(get_progress))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// HTTP-facing wrapper mapping the error taxonomy onto status codes.
struct ApiError(PortalError);

impl From<PortalError> for ApiError {
    fn from(err: PortalError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            PortalError::Validation(_)
            | PortalError::InvalidLanguage(_)
            | PortalError::MalformedInput(_) => StatusCode::BAD_REQUEST,
            PortalError::Authorization(_) => StatusCode::FORBIDDEN,
            PortalError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = json!({
            "error": self.0.kind(),
            "message": self.0.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": "unauthorized", "message": message})),
    )
        .into_response()
}

fn header_email(headers: &HeaderMap) -> Option<&str> {
    headers.get(IDENTITY_HEADER).and_then(|v| v.to_str().ok())
}

async fn healthz() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// Enabled translation targets (the canonical source language is excluded).
async fn list_languages() -> Json<Value> {
    let languages: Vec<Value> = LanguageRegistry::get()
        .list_targets()
        .iter()
        .map(|config| {
            json!({
                "code": config.code,
                "name": config.name,
                "native_name": config.native_name,
            })
        })
        .collect();
    Json(json!({"languages": languages}))
}

/// The curated term set, grouped by category. Term *translations* live in
/// the per-language snapshots and are edited through the glossary
/// transition endpoint.
async fn get_glossary(State(state): State<AppState>) -> Json<Value> {
    Json(serde_json::to_value(&*state.glossary).unwrap_or(Value::Null))
}

/// The stored override snapshot, or an empty default when nothing is saved.
async fn get_translations(
    State(state): State<AppState>,
    Path(lang): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let language = Language::target_from_code(&lang)?;
    let snapshot = state.store.load(language, SnapshotKind::Override).await;
    Ok(Json(snapshot.to_value()))
}

/// Full-snapshot overwrite, guarded by the optional API key.
async fn put_translations(
    State(state): State<AppState>,
    Path(lang): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let presented = headers.get("x-api-key").and_then(|v| v.to_str().ok());
    if !api_key_matches(state.config.api_key.as_deref(), presented) {
        return Ok(unauthorized("invalid or missing API key"));
    }

    let language = Language::target_from_code(&lang)?;
    let snapshot = LanguageSnapshot::from_value(body);
    let outcome = state.store.save(language, &snapshot).await;
    info!(
        "Snapshot overwrite for {}: {} records, outcome {:?}",
        language,
        snapshot.record_count(),
        outcome
    );
    Ok(save_response(outcome, json!({"records": snapshot.record_count()})))
}

/// Request body for a guarded workflow transition.
#[derive(Debug, Deserialize)]
struct TransitionRequest {
    action: TransitionAction,
    text: String,
    translator: String,
}

async fn save_string_unit(
    State(state): State<AppState>,
    Path((lang, id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<TransitionRequest>,
) -> Result<Response, ApiError> {
    save_unit(state, &lang, UnitScope::StringUnit, &id, &headers, body).await
}

async fn save_glossary_term(
    State(state): State<AppState>,
    Path((lang, term)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<TransitionRequest>,
) -> Result<Response, ApiError> {
    save_unit(state, &lang, UnitScope::GlossaryTerm, &term, &headers, body).await
}

/// Shared transition path for both unit namespaces.
///
/// The proxy header decides privilege; the declared translator identity in
/// the body is what gets recorded on the unit.
async fn save_unit(
    state: AppState,
    lang: &str,
    scope: UnitScope,
    id: &str,
    headers: &HeaderMap,
    body: TransitionRequest,
) -> Result<Response, ApiError> {
    let Some(auth) = AuthContext::resolve(
        header_email(headers),
        &state.config.admin_emails,
        state.config.require_auth,
    ) else {
        return Ok(unauthorized("authentication required"));
    };

    let language = Language::target_from_code(lang)?;
    let actor = Actor::new(body.translator, auth.is_admin);
    let mut session = Session::open(&state.store, language, actor).await;

    let outcome = session
        .save_unit(&state.store, scope, id, body.action, &body.text)
        .await?;
    let record = session.effective_record(scope, id);
    Ok(save_response(
        outcome,
        json!({"record": serde_json::to_value(&record).unwrap_or(Value::Null)}),
    ))
}

/// Map a save outcome onto the response: degraded (backup) saves are still
/// 2xx with `backed_up: true`, only a double failure is a server error.
fn save_response(outcome: SaveOutcome, extra: Value) -> Response {
    if !outcome.is_success() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "store_unavailable",
                "message": "both the primary and the backup save failed",
            })),
        )
            .into_response();
    }

    let mut body = json!({
        "success": true,
        "backed_up": outcome.is_degraded(),
    });
    if let (Some(map), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
        for (k, v) in extra {
            map.insert(k.clone(), v.clone());
        }
    }
    (StatusCode::OK, Json(body)).into_response()
}

/// Progress report over the effective (baseline + override) snapshot.
async fn get_progress(
    State(state): State<AppState>,
    Path(lang): Path<String>,
) -> Result<Response, ApiError> {
    let language = Language::target_from_code(&lang)?;
    let baseline = state.store.load(language, SnapshotKind::Baseline).await;
    let overrides = state.store.load(language, SnapshotKind::Override).await;
    let effective = crate::merge::merge(&baseline, &overrides);
    let report = aggregate(&effective, &state.corpus);
    Ok(Json(serde_json::to_value(&report).unwrap_or(Value::Null)).into_response())
}
