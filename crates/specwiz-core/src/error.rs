//! Error types for the wizard workflow library.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::{ItemType, StepType};

/// Comprehensive error type for all wizard operations.
///
/// The first group of variants are client-side guards raised before any
/// backend call is made. Everything else originates from the backend, the
/// transport, or local configuration.
#[derive(Error, Debug)]
pub enum WizardError {
    /// Fetching the summary or detail slice failed
    #[error("Failed to load wizard state for project {project_id}: {message}")]
    Load { project_id: u64, message: String },

    /// Run attempted on a step gated behind the objective step
    #[error("Step '{step_type}' is locked until the objective step is completed")]
    LockedStep { step_type: StepType },

    /// Approval attempted with zero selected items
    #[error("At least one item must be selected to approve step '{step_type}'")]
    NoSelection { step_type: StepType },

    /// Selection change attempted on an approved, read-only step
    #[error(
        "Step '{step_type}' is approved; '{item_type}' items are read-only until it is rejected or regenerated"
    )]
    ApprovedStep {
        step_type: StepType,
        item_type: ItemType,
    },

    /// Another step command is still in flight
    #[error("Step '{running}' is still running; cannot start '{requested}'")]
    StepBusy {
        running: StepType,
        requested: StepType,
    },

    /// The backend rejected the request; carries the server's message
    #[error("{message}")]
    Backend { status: Option<u16>, message: String },

    /// Transport-level failure talking to the backend
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// A sequential bulk selection stopped partway through
    #[error("Bulk selection stopped after {applied} of {requested} toggles: {source}")]
    BulkSelect {
        applied: usize,
        requested: usize,
        #[source]
        source: Box<WizardError>,
    },

    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating transport errors with optional context.
pub struct HttpErrorBuilder {
    message: String,
}

impl HttpErrorBuilder {
    /// Create a new transport error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: reqwest::Error) -> WizardError {
        WizardError::Http {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> WizardError {
        WizardError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl WizardError {
    /// Creates a builder for transport errors.
    pub fn http(message: impl Into<String>) -> HttpErrorBuilder {
        HttpErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Creates a backend error carrying the server-provided message.
    pub fn backend(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Backend {
            status,
            message: message.into(),
        }
    }

    /// True for rejections raised locally, before any backend call.
    pub fn is_client_guard(&self) -> bool {
        matches!(
            self,
            Self::LockedStep { .. }
                | Self::NoSelection { .. }
                | Self::ApprovedStep { .. }
                | Self::StepBusy { .. }
                | Self::InvalidInput { .. }
        )
    }

    /// HTTP status reported by the backend, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Backend { status, .. } => *status,
            Self::Http { source, .. } => source.status().map(|s| s.as_u16()),
            Self::BulkSelect { source, .. } => source.status(),
            _ => None,
        }
    }
}

/// Extension trait for Result to provide concise error mapping with
/// anyhow-style context.
pub trait ResultExt<T, E> {
    /// Add context to any error type, converting to WizardError.
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Add lazy context to any error type, converting to WizardError.
    fn with_context_lazy<C, F>(self, f: F) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

/// Specialized extension trait for transport-related Results.
pub trait HttpResultExt<T> {
    /// Map transport errors with a message.
    fn http_context(self, message: &str) -> Result<T>;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| WizardError::Configuration {
            message: format!("{}: {}", context, e),
        })
    }

    fn with_context_lazy<C, F>(self, f: F) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| WizardError::Configuration {
            message: format!("{}: {}", f(), e),
        })
    }
}

impl<T> HttpResultExt<T> for std::result::Result<T, reqwest::Error> {
    fn http_context(self, message: &str) -> Result<T> {
        self.map_err(|e| WizardError::http(message).with_source(e))
    }
}

/// Result type alias for wizard operations
pub type Result<T> = std::result::Result<T, WizardError>;
