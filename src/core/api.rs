//! HTTP + WebSocket API for blink decoding sessions
//!
//! Endpoints:
//! - GET /health - Health check
//! - POST /session/new - Create new session (optional config override)
//! - GET /session/{id} - Get decoder state
//! - POST /session/{id}/frame - Feed one frame
//! - DELETE /session/{id} - End session
//! - WS /ws/{id} - Live updates

use axum::{
    extract::{Path, State, WebSocketUpgrade, ws::{Message, WebSocket}},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, broadcast::error::RecvError, RwLock};
use tracing::{debug, info, warn};

use crate::core::{Frame, MorseDecoder};
use crate::types::{ConfigError, DecodeEvent, DecoderConfig, DecoderOutput};

/// One decoding session: one eye stream, one decoder
#[derive(Debug)]
pub struct Session {
    pub id: String,
    pub decoder: MorseDecoder,
    pub update_tx: broadcast::Sender<DecoderOutput>,
}

/// App state
pub struct AppState {
    pub sessions: RwLock<HashMap<String, Session>>,
    pub default_config: DecoderConfig,
    max_sessions: usize,
    next_id: AtomicU64,
}

impl AppState {
    pub fn new(default_config: DecoderConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            default_config,
            max_sessions: crate::MAX_SESSIONS,
            next_id: AtomicU64::new(1),
        }
    }

    /// Limit on live sessions; `POST /session/new` fails with 503 beyond it
    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions;
        self
    }

    /// Receiver for a session's per-frame output, if the session exists
    pub async fn subscribe(&self, id: &str) -> Option<broadcast::Receiver<DecoderOutput>> {
        let sessions = self.sessions.read().await;
        sessions.get(id).map(|session| session.update_tx.subscribe())
    }
}

/// API failures
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("session {0} not found")]
    SessionNotFound(String),

    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),

    #[error("session limit reached ({0} active)")]
    TooManySessions(usize),
}

/// Error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
            ApiError::TooManySessions(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

/// Create new session request
#[derive(Debug, Default, Deserialize)]
pub struct NewSessionRequest {
    pub config: Option<DecoderConfig>,
}

/// Create new session response
#[derive(Debug, Serialize)]
pub struct NewSessionResponse {
    pub session_id: String,
    pub websocket_url: String,
    pub config: DecoderConfig,
}

/// Frame response: state after the frame plus what it did
#[derive(Debug, Serialize)]
pub struct FrameResponse {
    pub output: DecoderOutput,
    pub events: Vec<DecodeEvent>,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub sessions_active: usize,
}

/// Create the API router with fresh state
pub fn create_router(default_config: DecoderConfig) -> Router {
    router(Arc::new(AppState::new(default_config)))
}

/// Create the API router over existing state
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/session/new", post(create_session))
        .route("/session/:id", get(get_session).delete(end_session))
        .route("/session/:id/frame", post(push_frame))
        .route("/ws/:id", get(websocket_handler))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let sessions = state.sessions.read().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        sessions_active: sessions.len(),
    })
}

/// Create new session
async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewSessionRequest>,
) -> Result<Json<NewSessionResponse>, ApiError> {
    let config = req.config.unwrap_or(state.default_config);
    config.validate()?;

    let mut sessions = state.sessions.write().await;
    if sessions.len() >= state.max_sessions {
        warn!("refusing new session, {} active", sessions.len());
        return Err(ApiError::TooManySessions(sessions.len()));
    }

    let session_id = generate_session_id(&state.next_id);
    let (tx, _) = broadcast::channel(100);
    let session = Session {
        id: session_id.clone(),
        decoder: MorseDecoder::new(config),
        update_tx: tx,
    };

    sessions.insert(session_id.clone(), session);
    drop(sessions);
    info!("session {} created", session_id);

    Ok(Json(NewSessionResponse {
        websocket_url: format!("/ws/{}", session_id),
        session_id,
        config,
    }))
}

/// Get decoder state at the last frame time
async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DecoderOutput>, ApiError> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or(ApiError::SessionNotFound(id))?;
    Ok(Json(session.decoder.current_output()))
}

/// Feed one frame to the session's decoder
async fn push_frame(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(frame): Json<Frame>,
) -> Result<Json<FrameResponse>, ApiError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(ApiError::SessionNotFound(id))?;

    let now = frame.timestamp();
    let events = session.decoder.process_frame(now, frame.closed);
    let output = session.decoder.output(now, &events);

    if !events.is_empty() {
        debug!("session {}: {:?}", session.id, events);
    }
    // No subscribers is fine
    let _ = session.update_tx.send(output.clone());

    Ok(Json(FrameResponse { output, events }))
}

/// End a session
async fn end_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let removed = state.sessions.write().await.remove(&id);
    match removed {
        Some(session) => {
            info!(
                "session {} ended after {} frames, text {:?}",
                id,
                session.decoder.frame_count(),
                session.decoder.decoded_text()
            );
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(ApiError::SessionNotFound(id)),
    }
}

/// WebSocket handler for live updates
async fn websocket_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, ApiError> {
    let rx = state.subscribe(&id).await;
    let rx = rx.ok_or(ApiError::SessionNotFound(id))?;
    Ok(ws.on_upgrade(move |socket| handle_websocket(socket, rx)))
}

/// Forward decoder updates until either side goes away
async fn handle_websocket(socket: WebSocket, mut rx: broadcast::Receiver<DecoderOutput>) {
    let (mut sender, mut receiver) = socket.split();

    let mut send_task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(update) => {
                    let json = serde_json::to_string(&update).unwrap_or_default();
                    if sender.send(Message::Text(json)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("websocket subscriber lagged, skipped {} updates", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if matches!(msg, Message::Close(_)) {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }
}

/// Generate session ID
fn generate_session_id(counter: &AtomicU64) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    let seq = counter.fetch_add(1, Ordering::Relaxed);
    format!("session_{:x}_{}", nanos, seq)
}

/// Run the API server
pub async fn run_server(
    addr: &str,
    default_config: DecoderConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let router = create_router(default_config);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("blinkmorse API listening on {}", addr);
    axum::serve(listener, router).await?;
    Ok(())
}
