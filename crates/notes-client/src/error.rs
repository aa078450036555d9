//! Error types for API calls

/// Errors surfaced to callers of the notes API client.
///
/// Only `AuthenticationExpired` is synthesized by the client itself; it is
/// always accompanied by cleared credentials and a login redirect.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request never produced a response
    #[error("network error: {0}")]
    Network(String),

    /// Non-401 error status from the API
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },

    /// 401 on a request that was already retried after a refresh
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("authentication expired: {reason}")]
    AuthenticationExpired {
        reason: String,
        #[source]
        source: Option<notes_auth::Error>,
    },

    /// Login or registration was refused by the auth server
    #[error("authentication failed: {0}")]
    Auth(#[source] notes_auth::Error),

    #[error("invalid response: {0}")]
    Decode(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("token store error: {0}")]
    TokenStore(String),
}

impl Error {
    /// HTTP status carried by the error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Server { status, .. } => Some(*status),
            Error::Unauthorized(_) => Some(401),
            _ => None,
        }
    }

    /// The API's `{"detail": "..."}` message, when the body has one.
    pub fn detail(&self) -> Option<String> {
        let body = match self {
            Error::Server { body, .. } | Error::Unauthorized(body) => body,
            _ => return None,
        };
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        match value.get("detail")? {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Result alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn detail_is_extracted_from_json_body() {
        let err = Error::Server {
            status: 404,
            body: r#"{"detail":"Note not found"}"#.into(),
        };
        assert_eq!(err.detail().as_deref(), Some("Note not found"));
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn structured_detail_is_rendered_as_json() {
        let err = Error::Server {
            status: 422,
            body: r#"{"detail":[{"loc":["body","title"],"msg":"field required"}]}"#.into(),
        };
        assert!(err.detail().unwrap().contains("field required"));
    }

    #[test]
    fn detail_is_none_for_plain_bodies() {
        let err = Error::Unauthorized("nope".into());
        assert!(err.detail().is_none());
        assert_eq!(err.status(), Some(401));
        assert!(Error::Network("refused".into()).detail().is_none());
    }

    #[test]
    fn authentication_expired_exposes_source() {
        let err = Error::AuthenticationExpired {
            reason: "token refresh failed".into(),
            source: Some(notes_auth::Error::Http("connection refused".into())),
        };
        assert_eq!(err.to_string(), "authentication expired: token refresh failed");
        let source = err.source().expect("source must be kept");
        assert!(source.to_string().contains("connection refused"));
    }
}
