//! Error types for backend calls.

use hdrprobe_core::ProbeError;
use thiserror::Error;

/// Errors that can occur while talking to the processing backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection, DNS or timeout failure
    #[error("Request failed: {0}")]
    Transport(String),

    /// Non-success HTTP status; `detail` is the server's message
    #[error("{detail}")]
    Backend { status: u16, detail: String },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Expected a base64 data URL")]
    InvalidDataUrl,

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("Decoded image has no pixels")]
    InvalidRaster,

    #[error("Rendered image is {actual:?}, server reported {reported:?}")]
    RasterSizeMismatch {
        reported: (u32, u32),
        actual: (u32, u32),
    },
}

impl ClientError {
    /// Convert into the controller's error type for the named operation.
    pub fn into_probe_error(self, operation: &str) -> ProbeError {
        ProbeError::network(operation, self.to_string())
    }
}

impl From<ureq::Error> for ClientError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, response) => {
                let body = response.into_string().unwrap_or_default();
                ClientError::Backend {
                    status,
                    detail: backend_detail(status, &body),
                }
            }
            ureq::Error::Transport(transport) => ClientError::Transport(transport.to_string()),
        }
    }
}

/// Extract the message from a FastAPI style `{"detail": ...}` body.
///
/// Falls back to the raw body, then to the status code.
pub fn backend_detail(status: u16, body: &str) -> String {
    let body = body.trim();
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str(body) {
        match map.get("detail") {
            Some(serde_json::Value::String(detail)) => return detail.clone(),
            Some(other) => return other.to_string(),
            None => {}
        }
    }
    if body.is_empty() {
        format!("HTTP {status}")
    } else {
        body.to_string()
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_from_fastapi_body() {
        assert_eq!(
            backend_detail(404, r#"{"detail":"Session not found"}"#),
            "Session not found"
        );
    }

    #[test]
    fn test_detail_from_validation_body() {
        let detail = backend_detail(422, r#"{"detail":[{"loc":["body","x"]}]}"#);
        assert_eq!(detail, r#"[{"loc":["body","x"]}]"#);
    }

    #[test]
    fn test_detail_fallbacks() {
        assert_eq!(backend_detail(502, "Bad Gateway"), "Bad Gateway");
        assert_eq!(backend_detail(500, "  "), "HTTP 500");
    }

    #[test]
    fn test_into_probe_error_keeps_message() {
        let err = ClientError::Backend {
            status: 400,
            detail: "Selected pixel has zero luminance".to_string(),
        };
        assert_eq!(
            err.into_probe_error("calibrate"),
            ProbeError::network("calibrate", "Selected pixel has zero luminance")
        );
    }
}
