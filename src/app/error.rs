use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaddockError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    #[error("JSON decoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PaddockError {
    /// Deployment defects that must reach the caller instead of being
    /// absorbed by a fallback.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingCredential(_) | Self::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, PaddockError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_is_configuration() {
        assert!(PaddockError::MissingCredential("catalog api key").is_configuration());
        assert!(PaddockError::Config("bad".into()).is_configuration());
    }

    #[test]
    fn test_transient_errors_are_not_configuration() {
        let status = PaddockError::Status {
            url: "https://example.com".into(),
            status: 503,
        };
        assert!(!status.is_configuration());
        assert!(!PaddockError::Upstream("quota".into()).is_configuration());
    }

    #[test]
    fn test_status_display() {
        let err = PaddockError::Status {
            url: "https://example.com/feed".into(),
            status: 404,
        };
        assert_eq!(
            err.to_string(),
            "Request to https://example.com/feed failed with status 404"
        );
    }
}
