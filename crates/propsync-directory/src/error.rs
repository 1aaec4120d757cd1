//! Directory client error types.

use serde::Deserialize;
use thiserror::Error;

/// Result alias for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Error that can occur while talking to the directory service.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The request could not be completed at all (connect, timeout, TLS, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The directory answered with a non-success status.
    #[error("directory returned HTTP {status}: {detail}")]
    Remote { status: u16, detail: String },

    /// The addressed entity does not exist (HTTP 404).
    #[error("not found: {0}")]
    NotFound(String),

    /// A success response could not be decoded.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// The client was configured with unusable settings.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DirectoryError {
    /// Whether this error means the call never reached the service.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// HTTP status of a remote failure, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            Self::NotFound(_) => Some(404),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for DirectoryError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            DirectoryError::Transport(format!("request timed out: {e}"))
        } else if e.is_decode() {
            DirectoryError::Parse(e.to_string())
        } else {
            DirectoryError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for DirectoryError {
    fn from(e: serde_json::Error) -> Self {
        DirectoryError::Parse(e.to_string())
    }
}

/// Error payload returned by the directory on failed requests.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Render the body the way it is logged: every part, `none` when absent.
    #[must_use]
    pub fn describe(&self) -> String {
        let code = match &self.code {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "none".to_string(),
        };
        format!(
            "code: {code}, reason: {}, message: {}",
            self.reason.as_deref().unwrap_or("none"),
            self.message.as_deref().unwrap_or("none"),
        )
    }

    /// Turn a raw response body into the detail string carried by
    /// [`DirectoryError::Remote`].
    #[must_use]
    pub fn detail_from(body: &str) -> String {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) if parsed.code.is_some() || parsed.reason.is_some() || parsed.message.is_some() => {
                parsed.describe()
            }
            _ if body.trim().is_empty() => "<no body>".to_string(),
            _ => body.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_from_structured_body() {
        let detail = ErrorBody::detail_from(
            r#"{"code": 400, "reason": "Bad Request", "message": "timezone is invalid"}"#,
        );
        assert_eq!(
            detail,
            "code: 400, reason: Bad Request, message: timezone is invalid"
        );
    }

    #[test]
    fn test_detail_from_partial_body() {
        let detail = ErrorBody::detail_from(r#"{"reason": "Conflict"}"#);
        assert_eq!(detail, "code: none, reason: Conflict, message: none");
    }

    #[test]
    fn test_detail_from_plain_text() {
        assert_eq!(ErrorBody::detail_from("gateway down"), "gateway down");
        assert_eq!(ErrorBody::detail_from("   "), "<no body>");
    }

    #[test]
    fn test_status_accessor() {
        let remote = DirectoryError::Remote {
            status: 503,
            detail: "down".to_string(),
        };
        assert_eq!(remote.status(), Some(503));
        assert_eq!(DirectoryError::NotFound("x".into()).status(), Some(404));
        assert!(DirectoryError::Transport("refused".into()).is_transport());
        assert_eq!(DirectoryError::Transport("refused".into()).status(), None);
    }
}
