use api_types::ApiResponse;
use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

pub use server::{router, run_with_listener};

mod health;
mod server;
mod user;

pub(crate) const NOT_FOUND_MESSAGE: &str = "User not found";
pub(crate) const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Failure of a request, turned into an error envelope.
#[derive(Debug)]
pub enum ServerError {
    /// The request is malformed or misses a required field.
    Validation(String),
    /// The addressed user does not exist.
    NotFound(String),
    /// The engine failed. `context` is the only text the client sees for
    /// internal failures.
    Engine {
        context: &'static str,
        source: EngineError,
    },
}

impl ServerError {
    /// Wrap engine errors of a handler with the message shown to clients.
    pub fn engine(context: &'static str) -> impl FnOnce(EngineError) -> ServerError {
        move |source| ServerError::Engine { context, source }
    }
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::InvalidField(_) | EngineError::InvalidValue(_) => StatusCode::BAD_REQUEST,
        EngineError::NotInitialized | EngineError::Database(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn message_for_engine_error(err: EngineError, context: &str) -> String {
    match err {
        EngineError::InvalidField(_) | EngineError::InvalidValue(_) => err.to_string(),
        other => {
            tracing::error!("{context}: {other}");
            context.to_string()
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Validation(err) => {
                tracing::debug!("rejected request: {err}");
                (StatusCode::BAD_REQUEST, err)
            }
            ServerError::NotFound(err) => (StatusCode::NOT_FOUND, err),
            ServerError::Engine { context, source } => (
                status_for_engine_error(&source),
                message_for_engine_error(source, context),
            ),
        };

        (status, Json(ApiResponse::<()>::error(error))).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        ServerError::Engine {
            context: INTERNAL_ERROR_MESSAGE,
            source: value,
        }
    }
}
