use astra::Response;
// errors.rs
use thiserror::Error;

/// Errors originating from either the server logic
/// (routing, validation, etc.) or downstream layers (the MLS provider).
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("{0}")]
    Provider(String),
    #[error("Internal Server Error")]
    InternalError,
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;

impl ServerError {
    pub fn status_code(&self) -> u16 {
        match self {
            ServerError::NotFound => 404,
            ServerError::BadRequest(_) => 400,
            ServerError::Provider(_) => 502,
            ServerError::InternalError => 500,
        }
    }

    /// Message safe to hand back to the client.
    pub fn client_message(&self) -> String {
        match self {
            ServerError::BadRequest(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}
