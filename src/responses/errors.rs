use crate::errors::ServerError;
use astra::{Body, Response, ResponseBuilder};
use serde::Serialize;

pub use crate::errors::ResultResp;

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
}

/// Convert a ServerError into a `{ success: false, message }` JSON response.
pub fn error_to_response(err: ServerError) -> Response {
    let status = err.status_code();
    if status >= 500 {
        log::error!("❌ {status}: {err}");
    } else {
        log::debug!("{status}: {err}");
    }

    let body = ErrorBody {
        success: false,
        message: err.client_message(),
    };
    let json = serde_json::to_string(&body)
        .unwrap_or_else(|_| r#"{"success":false,"message":"Internal Server Error"}"#.to_string());

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(json))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}
