pub mod errors;
pub mod json;

pub use errors::{error_to_response, ResultResp};

// Normal JSON response
pub use json::json_ok;
