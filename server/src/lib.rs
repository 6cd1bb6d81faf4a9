pub mod sessions;

use anyhow::Result;
use axum::{
    extract::{rejection::JsonRejection, ConnectInfo, Path, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    routing::{get, post},
    Json, Router,
};
use engine::SharedIndex;
use serde::{Deserialize, Serialize};
use sessions::{ChatSession, SessionStore};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    pub session_id: Option<String>,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub session_id: String,
    pub confidence: f64,
    pub category: String,
}

#[derive(Serialize)]
pub struct CategoryStats {
    pub name: String,
    pub entries: usize,
}

#[derive(Serialize)]
pub struct StatsResponse {
    /// Knowledge base file being served, if any.
    pub source: Option<String>,
    pub categories: Vec<CategoryStats>,
    pub vocabulary: usize,
    pub sessions: usize,
}

#[derive(Serialize)]
pub struct ReloadResponse {
    pub categories: usize,
    pub entries: usize,
}

#[derive(Clone)]
pub struct AppState {
    pub index: Arc<SharedIndex>,
    pub sessions: Arc<SessionStore>,
    pub admin_token: Option<String>,
}

impl AppState {
    pub fn new(index: SharedIndex, admin_token: Option<String>) -> Self {
        Self { index: Arc::new(index), sessions: Arc::new(SessionStore::new()), admin_token }
    }
}

/// Build the router and start the idle-session sweeper. Must run inside a tokio runtime.
pub fn build_app(kb_path: String, session_ttl: Duration) -> Result<Router> {
    // Build the index once; handlers only take snapshots
    let index = SharedIndex::load(&kb_path);
    let admin_token = std::env::var("ADMIN_TOKEN").ok();
    let app_state = AppState::new(index, admin_token);
    spawn_session_sweeper(app_state.sessions.clone(), session_ttl);

    let cors = cors_layer(std::env::var("CORS_ALLOW_ORIGIN").ok().as_deref());
    Ok(router(app_state).layer(cors))
}

/// Drop sessions idle for longer than `ttl`, checking every `ttl / 4` (at least once a second).
pub fn spawn_session_sweeper(sessions: Arc<SessionStore>, ttl: Duration) -> tokio::task::JoinHandle<()> {
    let period = (ttl / 4).max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let removed = sessions.prune_idle(ttl);
            if removed > 0 {
                tracing::info!(removed, remaining = sessions.len(), "expired idle chat sessions");
            }
        }
    })
}

/// Origins from a comma-separated list; entries that are not valid header values are ignored.
fn allowed_origins(raw: Option<&str>) -> Vec<HeaderValue> {
    raw.into_iter()
        .flat_map(|val| val.split(','))
        .filter_map(|s| s.trim().parse().ok())
        .collect()
}

/// Permissive unless at least one configured origin parses.
fn cors_layer(allowed: Option<&str>) -> CorsLayer {
    let origins = allowed_origins(allowed);
    let origin = if origins.is_empty() { AllowOrigin::any() } else { AllowOrigin::list(origins) };
    CorsLayer::new().allow_origin(origin).allow_methods(Any).allow_headers(Any)
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/chat", post(chat_handler))
        .route("/sessions/:session_id", get(session_handler))
        .route("/admin/reload", post(reload_handler))
        .route("/admin/stats", get(stats_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn chat_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    peer: Option<ConnectInfo<SocketAddr>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<serde_json::Value>)> {
    let Json(req) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "rejected chat body");
        (rejection.status(), Json(serde_json::json!({ "error": rejection.body_text() })))
    })?;
    let message = req.message.trim();
    if message.is_empty() {
        return Err((StatusCode::BAD_REQUEST, Json(serde_json::json!({ "error": "Empty message" }))));
    }

    let user_ip = client_ip(&headers, peer.map(|ConnectInfo(addr)| addr));
    let session_id = state.sessions.resume_or_create(req.session_id.as_deref(), user_ip);
    state.sessions.record(&session_id, message.to_string(), false, None);

    let reply = state.index.generate_response(message);
    state.sessions.record(&session_id, reply.text.clone(), true, Some(reply.confidence));
    tracing::info!(%session_id, category = %reply.category, confidence = reply.confidence, "chat reply");

    Ok(Json(ChatResponse { response: reply.text, session_id, confidence: reply.confidence, category: reply.category }))
}

async fn session_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(session_id): Path<String>,
) -> Result<Json<ChatSession>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    state
        .sessions
        .get(&session_id)
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "session not found".into()))
}

// --- Admin endpoints ---
async fn reload_handler(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<ReloadResponse>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    let fresh = state.index.reload();
    Ok(Json(ReloadResponse { categories: fresh.knowledge_base().categories().len(), entries: fresh.num_entries() }))
}

async fn stats_handler(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<StatsResponse>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    let snapshot = state.index.snapshot();
    let categories = snapshot
        .knowledge_base()
        .categories()
        .iter()
        .map(|c| CategoryStats { name: c.name.clone(), entries: c.entries.len() })
        .collect();
    let source = state.index.source().map(|p| p.display().to_string());
    Ok(Json(StatsResponse { source, categories, vocabulary: snapshot.weights().vocabulary_len(), sessions: state.sessions.len() }))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}

/// First `X-Forwarded-For` hop, else the peer address.
fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
    headers
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_ip_prefers_forwarded_header() {
        let mut headers = HeaderMap::new();
        let peer: SocketAddr = "192.168.1.5:4000".parse().unwrap();
        assert_eq!(client_ip(&headers, Some(peer)).as_deref(), Some("192.168.1.5"));
        headers.insert("X-Forwarded-For", "203.0.113.7, 10.0.0.1".parse().unwrap());
        assert_eq!(client_ip(&headers, Some(peer)).as_deref(), Some("203.0.113.7"));
        assert_eq!(client_ip(&HeaderMap::new(), None), None);
    }

    #[test]
    fn origins_are_split_and_filtered() {
        assert!(allowed_origins(None).is_empty());
        assert!(allowed_origins(Some("")).is_empty());
        assert!(allowed_origins(Some("\u{7f}bad")).is_empty());
        let origins = allowed_origins(Some("https://a.example, https://b.example"));
        assert_eq!(origins, vec![HeaderValue::from_static("https://a.example"), HeaderValue::from_static("https://b.example")]);
    }
}
