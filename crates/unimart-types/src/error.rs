use thiserror::Error;
use uuid::Uuid;

/// Errors from chat store operations.
///
/// These propagate to the immediate caller. External-service failures
/// never appear here: the advisor and the listing assistant absorb them
/// at their own boundary (fail open).
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("session '{0}' not found")]
    SessionNotFound(Uuid),

    #[error("message text is empty")]
    EmptyMessage,
}

/// Errors from generative-AI service calls.
///
/// Internal to the advisor/assistant boundary: every variant is mapped
/// to the safe default before anything reaches the caller.
#[derive(Debug, Error)]
pub enum GenAiError {
    #[error("http request failed: {0}")]
    Http(String),

    #[error("api error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("missing api key")]
    MissingApiKey,
}
