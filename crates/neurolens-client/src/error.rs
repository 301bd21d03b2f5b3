//! Client error taxonomy.
//!
//! Every failure the executor can produce falls into one of four kinds, so
//! callers branch on [`ErrorKind`] instead of matching message text. A fifth,
//! [`ClientError::InvalidArgument`], is raised before any request is built.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("cannot reach backend at {url}: {source}")]
    Connectivity {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error! status: {status} ({url})")]
    Http { status: u16, url: String },

    #[error("response from {url} is not JSON (content-type: {})", .content_type.as_deref().unwrap_or("<missing>"))]
    Format {
        content_type: Option<String>,
        url: String,
    },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },
}

/// Fieldless view of [`ClientError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Connectivity,
    Http,
    Format,
    Decode,
    InvalidArgument,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Connectivity => "connectivity",
            ErrorKind::Http => "http",
            ErrorKind::Format => "format",
            ErrorKind::Decode => "decode",
            ErrorKind::InvalidArgument => "invalid_argument",
        }
    }
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Connectivity { .. } => ErrorKind::Connectivity,
            ClientError::Http { .. } => ErrorKind::Http,
            ClientError::Format { .. } => ErrorKind::Format,
            ClientError::Decode { .. } => ErrorKind::Decode,
            ClientError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
        }
    }

    /// HTTP status code, only for [`ClientError::Http`].
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The full URL the failing request was sent to, if one was sent.
    pub fn url(&self) -> Option<&str> {
        match self {
            ClientError::Connectivity { url, .. }
            | ClientError::Http { url, .. }
            | ClientError::Format { url, .. }
            | ClientError::Decode { url, .. } => Some(url),
            ClientError::InvalidArgument { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_error() -> ClientError {
        let source = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        ClientError::Decode { url: "http://x/model/layers".to_string(), source }
    }

    #[test]
    fn test_http_error_carries_status() {
        let err = ClientError::Http { status: 500, url: "http://x/model/load".to_string() };
        assert_eq!(err.kind(), ErrorKind::Http);
        assert_eq!(err.status(), Some(500));
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_format_error_reports_missing_content_type() {
        let err = ClientError::Format { content_type: None, url: "http://x/".to_string() };
        assert_eq!(err.kind(), ErrorKind::Format);
        assert_eq!(err.status(), None);
        assert!(err.to_string().contains("<missing>"));
    }

    #[test]
    fn test_decode_error_keeps_url() {
        let err = decode_error();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert_eq!(err.url(), Some("http://x/model/layers"));
        assert_eq!(err.kind().as_str(), "decode");
    }

    #[test]
    fn test_invalid_argument_has_no_url() {
        let err = ClientError::InvalidArgument { name: "bias_value", reason: "must be finite, got NaN".into() };
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.url(), None);
        assert_eq!(err.status(), None);
        assert!(err.to_string().contains("bias_value"));
    }
}
