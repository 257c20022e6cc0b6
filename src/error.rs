//! Error types for sheetdash
//!
//! All modules use `DashResult<T>` as their return type.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for sheetdash operations
pub type DashResult<T> = Result<T, DashError>;

/// Boxed cause carried by transport failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Coarse classification shown to the user next to an error message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnknownSelection,
    Fetch,
    Parse,
    Config,
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::UnknownSelection => "unknown selection",
            Self::Fetch => "fetch error",
            Self::Parse => "parse error",
            Self::Config => "configuration error",
            Self::Internal => "internal error",
        };
        f.write_str(label)
    }
}

/// All errors that can occur in sheetdash
#[derive(Error, Debug)]
pub enum DashError {
    // Selection errors
    #[error("Unknown {field}: {value}")]
    UnknownSelection { field: &'static str, value: String },

    #[error("No {field} selected")]
    MissingSelection { field: &'static str },

    // Fetch errors
    #[error("Request to {target} failed: {source}")]
    Fetch {
        target: String,
        #[source]
        source: BoxError,
    },

    #[error("HTTP {status} from {target}")]
    HttpStatus { target: String, status: u16 },

    #[error("Expected CSV from {target} but got {content_type}")]
    NotCsv {
        target: String,
        content_type: String,
    },

    // Parse errors
    #[error("Malformed CSV from {target} (line {line}): {reason}")]
    Parse {
        target: String,
        line: usize,
        reason: String,
    },

    /// Any of the above, prefixed with what was being loaded
    #[error("{context}: {source}")]
    Load {
        context: &'static str,
        #[source]
        source: Box<DashError>,
    },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Invalid source catalog: {0}")]
    CatalogInvalid(String),

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl DashError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a transport failure for a target
    pub fn fetch(target: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Fetch {
            target: target.into(),
            source: source.into(),
        }
    }

    /// Prefix an error with what was being loaded
    pub fn load(context: &'static str, source: DashError) -> Self {
        Self::Load {
            context,
            source: Box::new(source),
        }
    }

    /// Classify the error for presentation
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Load { source, .. } => source.kind(),
            Self::UnknownSelection { .. } | Self::MissingSelection { .. } => {
                ErrorKind::UnknownSelection
            }
            Self::Fetch { .. } | Self::HttpStatus { .. } | Self::NotCsv { .. } => ErrorKind::Fetch,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::ConfigInvalid { .. }
            | Self::CatalogInvalid(_)
            | Self::ConfigDirCreate { .. }
            | Self::TomlParse(_) => ErrorKind::Config,
            Self::Io { .. }
            | Self::Json(_)
            | Self::TomlSerialize(_)
            | Self::Internal(_)
            | Self::User(_) => ErrorKind::Internal,
        }
    }

    /// Check if trying the same selection again may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Load { source, .. } => source.is_retryable(),
            Self::Fetch { .. } => true,
            Self::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Load { source, .. } => source.hint(),
            Self::UnknownSelection { .. } | Self::MissingSelection { .. } => {
                Some("Run: sheetdash sources")
            }
            Self::NotCsv { .. } => {
                Some("Share the sheet with \"Anyone with the link\" so it can be exported")
            }
            Self::HttpStatus { status: 401 | 403, .. } => {
                Some("The sheet is not publicly link-shared")
            }
            Self::HttpStatus { status: 404, .. } => {
                Some("Check the sheet id and tab name in the config")
            }
            Self::ConfigInvalid { .. } | Self::CatalogInvalid(_) => {
                Some("Run: sheetdash config show")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DashError::UnknownSelection {
            field: "country",
            value: "Brazil".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown country: Brazil");
    }

    #[test]
    fn error_kind() {
        let err = DashError::MissingSelection { field: "month" };
        assert_eq!(err.kind(), ErrorKind::UnknownSelection);

        let err = DashError::HttpStatus {
            target: "https://example.test".to_string(),
            status: 500,
        };
        assert_eq!(err.kind(), ErrorKind::Fetch);

        let err = DashError::Parse {
            target: "https://example.test".to_string(),
            line: 3,
            reason: "unterminated quoted field".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn error_hint() {
        let err = DashError::HttpStatus {
            target: "https://example.test".to_string(),
            status: 403,
        };
        assert_eq!(err.hint(), Some("The sheet is not publicly link-shared"));
    }

    #[test]
    fn load_context_delegates() {
        let err = DashError::load(
            "Could not load lead data",
            DashError::UnknownSelection {
                field: "country",
                value: "Brazil".to_string(),
            },
        );
        assert_eq!(
            err.to_string(),
            "Could not load lead data: Unknown country: Brazil"
        );
        assert_eq!(err.kind(), ErrorKind::UnknownSelection);
        assert_eq!(err.hint(), Some("Run: sheetdash sources"));
    }

    #[test]
    fn error_retryable() {
        let err = DashError::fetch("https://example.test", "connection reset");
        assert!(err.is_retryable());

        let err = DashError::HttpStatus {
            target: "https://example.test".to_string(),
            status: 404,
        };
        assert!(!err.is_retryable());
    }
}
