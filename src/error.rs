//! Error types for postmgn.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=config, 3=not_found, 5=remote, etc.)
//! - Context-aware recovery hints
//! - Structured JSON output for `--json` consumers

use std::path::PathBuf;
use thiserror::Error;

use crate::model::ResourceKind;

/// Result type alias for postmgn operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Config / state (exit 2)
    ConfigMissing,
    AmbiguousState,
    ConfigError,
    IgnoreFileError,

    // Not Found (exit 3)
    DocumentNotFound,

    // Validation (exit 4)
    InvalidArgument,

    // Remote (exit 5)
    ApiError,
    MalformedResponse,
    TransportError,

    // I/O (exit 8)
    IoError,
    JsonError,

    // Prompt (exit 9)
    PromptError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::ConfigMissing => "CONFIG_MISSING",
            Self::AmbiguousState => "AMBIGUOUS_STATE",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IgnoreFileError => "IGNORE_FILE_ERROR",
            Self::DocumentNotFound => "DOCUMENT_NOT_FOUND",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::ApiError => "API_ERROR",
            Self::MalformedResponse => "MALFORMED_RESPONSE",
            Self::TransportError => "TRANSPORT_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::PromptError => "PROMPT_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::ConfigMissing
            | Self::AmbiguousState
            | Self::ConfigError
            | Self::IgnoreFileError => 2,
            Self::DocumentNotFound => 3,
            Self::InvalidArgument => 4,
            Self::ApiError | Self::MalformedResponse | Self::TransportError => 5,
            Self::IoError | Self::JsonError => 8,
            Self::PromptError => 9,
        }
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur while syncing a project.
#[derive(Error, Debug)]
pub enum Error {
    #[error("No Postman API key available")]
    ConfigMissing,

    #[error("Postman API error: {operation} {kind} returned {status}: {message}")]
    Api {
        kind: ResourceKind,
        operation: &'static str,
        status: u16,
        message: String,
    },

    #[error("Unexpected Postman response to {operation} {kind}: {message}")]
    MalformedResponse {
        kind: ResourceKind,
        operation: &'static str,
        message: String,
    },

    #[error("No local {kind} document for '{name}' at {}", path.display())]
    NotFound {
        kind: ResourceKind,
        name: String,
        path: PathBuf,
    },

    #[error(
        "Both {} and {} contain mappings; refusing to guess which one is current",
        legacy.display(),
        private.display()
    )]
    AmbiguousState { legacy: PathBuf, private: PathBuf },

    #[error("Could not exclude the private config from version control via {}: {source}", path.display())]
    IgnoreFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::ConfigMissing => ErrorCode::ConfigMissing,
            Self::AmbiguousState { .. } => ErrorCode::AmbiguousState,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::IgnoreFile { .. } => ErrorCode::IgnoreFileError,
            Self::NotFound { .. } => ErrorCode::DocumentNotFound,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Api { .. } => ErrorCode::ApiError,
            Self::MalformedResponse { .. } => ErrorCode::MalformedResponse,
            Self::Http(_) => ErrorCode::TransportError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Prompt(_) => ErrorCode::PromptError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// True when the remote answered that the resource does not exist.
    #[must_use]
    pub const fn is_remote_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }

    /// Context-aware recovery hint for the operator.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::ConfigMissing => Some(
                "Set POSTMAN_API_KEY, or run `postmgn init` and paste a key from \
                 https://go.postman.co/settings/me/api-keys"
                    .to_string(),
            ),

            Self::Api { status: 401 | 403, .. } => Some(
                "The API key was rejected. Update `apiKey` in postmgn.private.config \
                 or set POSTMAN_API_KEY."
                    .to_string(),
            ),

            Self::NotFound { kind, name, .. } => Some(format!(
                "Run `postmgn export` to fetch it, or remove '{name}' from the {kind} list in postmgn.config."
            )),

            Self::AmbiguousState { legacy, .. } => Some(format!(
                "Delete {} once you have confirmed postmgn.private.config is up to date.",
                legacy.display()
            )),

            Self::IgnoreFile { .. } => Some(
                "Add postmgn.private.config to .gitignore manually, then retry.".to_string(),
            ),

            Self::Api { .. }
            | Self::MalformedResponse { .. }
            | Self::Http(_)
            | Self::Prompt(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::InvalidArgument(_)
            | Self::Config(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}
