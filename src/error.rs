//! Error types for userdir-sync
//!
//! Every fallible operation in the crate returns `Result<T, Error>`.
//! Callers that need to branch on failure class use [`Error::kind`], which
//! collapses the variants into the small [`ErrorKind`] taxonomy the
//! pagination engine reasons about.

use std::collections::BTreeMap;
use thiserror::Error;

/// Field name → list of reasons, as reported by the server on validation failure
pub type FieldFailures = BTreeMap<String, Vec<String>>;

/// The main error type for userdir-sync
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Network Errors
    // ============================================================================
    #[error("Network unreachable: {message}")]
    Connectivity { message: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    // ============================================================================
    // API Response Errors
    // ============================================================================
    #[error("Empty collection: {message}")]
    EmptyCollection { message: String },

    #[error("{message}")]
    Validation { message: String },

    #[error("{message}")]
    ValidationFailures {
        message: String,
        fails: FieldFailures,
    },

    #[error("Unexpected response: {message}")]
    Protocol { message: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("{0}")]
    Other(String),
}

/// Coarse classification of an [`Error`]
///
/// The engine matches on this exhaustively, so adding a kind forces every
/// decision point to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No network path to the host
    Connectivity,
    /// Valid response reporting that the collection holds no items
    EmptyCollection,
    /// Server rejected the request input (single message or per-field)
    Validation,
    /// Response did not match any known schema
    Protocol,
    /// Transport problem other than unreachability (timeouts, 5xx after retries)
    Transport,
    /// Local misconfiguration or programming error
    Internal,
}

impl Error {
    /// Create a connectivity error
    pub fn connectivity(message: impl Into<String>) -> Self {
        Self::Connectivity {
            message: message.into(),
        }
    }

    /// Create an empty-collection error
    pub fn empty(message: impl Into<String>) -> Self {
        Self::EmptyCollection {
            message: message.into(),
        }
    }

    /// Create a single validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a per-field validation error
    pub fn validation_failures(message: impl Into<String>, fails: FieldFailures) -> Self {
        Self::ValidationFailures {
            message: message.into(),
            fails,
        }
    }

    /// Create a protocol error
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Connectivity { .. } => ErrorKind::Connectivity,
            Error::Http(e) if e.is_connect() => ErrorKind::Connectivity,
            Error::Http(e) if e.is_decode() => ErrorKind::Protocol,
            Error::Http(_) | Error::Timeout { .. } => ErrorKind::Transport,
            Error::HttpStatus { status, .. } if *status >= 500 => ErrorKind::Transport,
            Error::HttpStatus { .. } | Error::Protocol { .. } | Error::JsonParse(_) => {
                ErrorKind::Protocol
            }
            Error::EmptyCollection { .. } => ErrorKind::EmptyCollection,
            Error::Validation { .. } | Error::ValidationFailures { .. } => ErrorKind::Validation,
            Error::Config { .. } | Error::InvalidUrl(_) | Error::Other(_) => ErrorKind::Internal,
        }
    }

    /// Shortcut for `kind() == ErrorKind::Connectivity`
    pub fn is_connectivity(&self) -> bool {
        self.kind() == ErrorKind::Connectivity
    }

    /// Per-field failures, if the server reported any
    pub fn field_failures(&self) -> Option<&FieldFailures> {
        match self {
            Error::ValidationFailures { fails, .. } => Some(fails),
            _ => None,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Timeout { .. } => true,
            Error::Http(e) => e.is_timeout() || e.is_connect(),
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for userdir-sync
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
