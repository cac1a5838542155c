//! Unified SDK error types.

use thiserror::Error;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("WebSocket error: {0}")]
    Ws(#[from] WsError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl SdkError {
    /// Text to show the end user for a failed call (toast or inline message).
    ///
    /// Server-provided `detail` strings are passed through as-is; transport and
    /// server faults collapse to a generic sentence.
    pub fn user_message(&self) -> String {
        match self {
            SdkError::Http(HttpError::Unauthorized) | SdkError::Auth(AuthError::SessionExpired) => {
                "Session expired. Please log in again.".to_string()
            }
            SdkError::Auth(AuthError::NotAuthenticated) => "Please log in to continue.".to_string(),
            SdkError::Auth(AuthError::LoginFailed(detail))
            | SdkError::Http(HttpError::BadRequest(detail))
            | SdkError::Http(HttpError::NotFound(detail))
                if !detail.is_empty() =>
            {
                detail.clone()
            }
            SdkError::Http(HttpError::RateLimited { .. }) => {
                "Too many requests. Please wait a moment and try again.".to_string()
            }
            SdkError::Http(HttpError::Timeout) => "The request timed out.".to_string(),
            SdkError::Http(HttpError::ServerError { .. })
            | SdkError::Http(HttpError::MaxRetriesExceeded { .. }) => {
                "Server error. Please try again later.".to_string()
            }
            #[cfg(feature = "http")]
            SdkError::Http(HttpError::Reqwest(_)) => {
                "Network error. Check your connection and try again.".to_string()
            }
            SdkError::Validation(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

/// HTTP-layer errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Timeout")]
    Timeout,

    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },
}

/// WebSocket errors.
#[derive(Error, Debug)]
pub enum WsError {
    #[error("Not connected")]
    NotConnected,

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

/// Authentication errors.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Login failed: {0}")]
    LoginFailed(String),

    #[error("Session expired")]
    SessionExpired,

    #[error("Credential storage error: {0}")]
    Storage(String),
}

/// Extract the human-readable message from an error response body.
///
/// The backend is FastAPI: errors are `{"detail": "..."}`, and request
/// validation failures are `{"detail": [{"msg": "...", ...}, ...]}`.
/// Anything else is returned unchanged.
pub(crate) fn detail_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.to_string();
    };
    match value.get("detail") {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Array(items)) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            if msgs.is_empty() {
                body.to_string()
            } else {
                msgs.join("; ")
            }
        }
        _ => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_message_string() {
        assert_eq!(
            detail_message(r#"{"detail":"Invalid credentials"}"#),
            "Invalid credentials"
        );
    }

    #[test]
    fn test_detail_message_validation_list() {
        let body = r#"{"detail":[{"loc":["query","query"],"msg":"String should have at least 2 characters","type":"string_too_short"}]}"#;
        assert_eq!(
            detail_message(body),
            "String should have at least 2 characters"
        );
    }

    #[test]
    fn test_detail_message_passthrough() {
        assert_eq!(detail_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(detail_message(r#"{"error":"x"}"#), r#"{"error":"x"}"#);
    }

    #[test]
    fn test_user_message_prefers_server_detail() {
        let err = SdkError::Http(HttpError::BadRequest("Not enough shares".into()));
        assert_eq!(err.user_message(), "Not enough shares");
    }

    #[test]
    fn test_user_message_unauthorized() {
        let err = SdkError::Http(HttpError::Unauthorized);
        assert_eq!(err.user_message(), "Session expired. Please log in again.");
        let err = SdkError::Auth(AuthError::NotAuthenticated);
        assert_eq!(err.user_message(), "Please log in to continue.");
    }

    #[test]
    fn test_user_message_server_error_is_generic() {
        let err = SdkError::Http(HttpError::ServerError {
            status: 500,
            body: "Traceback ...".into(),
        });
        assert_eq!(err.user_message(), "Server error. Please try again later.");
    }

    #[test]
    fn test_user_message_empty_detail_falls_back() {
        let err = SdkError::Http(HttpError::NotFound(String::new()));
        assert_eq!(err.user_message(), "HTTP error: Not found: ");
    }
}
