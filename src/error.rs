use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for gitignore-create operations
#[derive(Error, Debug)]
pub enum GitignoreError {
    /// The template service did not answer within the configured timeout
    #[error("API request timed out after {secs} seconds: {url}")]
    Timeout { url: String, secs: f64 },

    /// The configured service URL cannot carry template paths
    #[error("Invalid API URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// Connection, DNS, TLS or body decoding failure
    #[error("Network error while requesting {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a 5xx status
    #[error("API server error: {status}")]
    ServerError { status: u16 },

    /// The catalog endpoint answered with a non-2xx status
    #[error("API returned error: {status}")]
    UnexpectedStatus { status: u16 },

    /// The response body carried the service's error marker
    #[error("Language not found: {names}")]
    TemplateNotFound { names: String },

    /// A template name that cannot be sent to the service
    #[error("Invalid template name: {name:?}")]
    InvalidName { name: String },

    /// A query was built from zero template names
    #[error("No templates selected")]
    EmptyQuery,

    /// Reading or writing the output file failed
    #[error("Filesystem error at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Terminal or stdout IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GitignoreError {
    /// Whether this error came from talking to the service rather than from its answer
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. }
                | Self::Network { .. }
                | Self::ServerError { .. }
                | Self::UnexpectedStatus { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, GitignoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GitignoreError::Timeout {
            url: "https://example.test/list".to_string(),
            secs: 10.0,
        };
        assert_eq!(
            format!("{err}"),
            "API request timed out after 10 seconds: https://example.test/list"
        );

        let err = GitignoreError::Timeout {
            url: "https://example.test/list".to_string(),
            secs: 0.25,
        };
        assert!(format!("{err}").contains("after 0.25 seconds"));

        let err = GitignoreError::InvalidBaseUrl {
            url: "mailto:x".to_string(),
            reason: "expected an http or https URL".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "Invalid API URL \"mailto:x\": expected an http or https URL"
        );

        let err = GitignoreError::ServerError { status: 503 };
        assert_eq!(format!("{err}"), "API server error: 503");

        let err = GitignoreError::UnexpectedStatus { status: 404 };
        assert_eq!(format!("{err}"), "API returned error: 404");

        let err = GitignoreError::TemplateNotFound {
            names: "nope,python".to_string(),
        };
        assert_eq!(format!("{err}"), "Language not found: nope,python");

        let err = GitignoreError::InvalidName {
            name: " ".to_string(),
        };
        assert_eq!(format!("{err}"), "Invalid template name: \" \"");

        let err = GitignoreError::Filesystem {
            path: PathBuf::from("/nowhere/.gitignore"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(format!("{err}").contains("/nowhere/.gitignore"));
        assert!(format!("{err}").contains("denied"));
    }

    #[test]
    fn test_transport_classification() {
        assert!(GitignoreError::ServerError { status: 500 }.is_transport());
        assert!(GitignoreError::UnexpectedStatus { status: 404 }.is_transport());
        assert!(
            GitignoreError::Timeout {
                url: String::new(),
                secs: 1.0
            }
            .is_transport()
        );
        assert!(
            !GitignoreError::TemplateNotFound {
                names: "x".to_string()
            }
            .is_transport()
        );
        assert!(!GitignoreError::EmptyQuery.is_transport());
        assert!(
            !GitignoreError::InvalidBaseUrl {
                url: String::new(),
                reason: String::new()
            }
            .is_transport()
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "test");
        let err: GitignoreError = io_err.into();
        assert!(matches!(err, GitignoreError::Io(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: GitignoreError = json_err.into();
        assert!(matches!(err, GitignoreError::Json(_)));
    }
}
