//! Translation Agent Server
//!
//! HTTP API for detection, classification, translation, transcription,
//! synthesis, and turn-based conversation sessions.

pub mod http;
pub mod metrics;
pub mod session;
pub mod state;
pub mod turns;

pub use http::create_router;
pub use metrics::{
    init_metrics, record_error, record_llm_latency, record_request, record_stt_latency,
    record_total_latency, record_tts_latency,
};
pub use session::{Session, SessionManager};
pub use state::AppState;

use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Session error: {0}")]
    Session(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ServerError> for axum::http::StatusCode {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::Session(_) => axum::http::StatusCode::NOT_FOUND,
            ServerError::InvalidRequest(_) => axum::http::StatusCode::BAD_REQUEST,
            ServerError::Internal(_) => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<translate_agent_core::Error> for ServerError {
    fn from(err: translate_agent_core::Error) -> Self {
        ServerError::Internal(err.to_string())
    }
}

impl axum::response::IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let message = self.to_string();
        let status = axum::http::StatusCode::from(self);
        (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
    }
}
