//! Error responses of the Graph API
//!
//! Failed calls answer with an OData error:
//!
//! ```json
//! { "error": { "code": "ErrorInvalidRecipients", "message": "..." } }
//! ```

use serde::Deserialize;

use super::error::{self, Error};

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ODataError,
}

#[derive(Debug, Deserialize)]
struct ODataError {
    code: Option<String>,
    message: Option<String>,
}

/// Builds the error for a non-success response
///
/// Bodies which aren't an OData error are used as the message.
pub(crate) fn failure(status: u16, body: &str) -> Error {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(ErrorResponse { error }) => error::transport_failure(
            status,
            error.code,
            error.message.unwrap_or_default(),
        ),
        Err(_) => {
            let body = body.trim();
            let message = if body.is_empty() {
                "empty response".to_owned()
            } else {
                body.to_owned()
            };
            error::transport_failure(status, None, message)
        }
    }
}
