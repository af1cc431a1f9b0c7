//! Error types and handling for the `SafarAI` service

use thiserror::Error;

/// Main error type for the `SafarAI` service
#[derive(Error, Debug)]
pub enum SafarAiError {
    /// Missing or invalid caller input; fixable by correcting the request
    #[error("Invalid input for '{field}': {message}")]
    Validation { field: String, message: String },

    /// Search provider failure (network, non-success status, malformed data)
    #[error("Search provider error: {message}")]
    Provider { message: String },

    /// Language-model completion failure or timeout
    #[error("Model error: {message}")]
    Model { message: String },

    /// A search returned nothing although a later step needs results
    #[error("No {subject} found")]
    EmptyResult { subject: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl SafarAiError {
    /// Create a new validation error for the given input field
    pub fn validation<F: Into<String>, S: Into<String>>(field: F, message: S) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new search provider error
    pub fn provider<S: Into<String>>(message: S) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }

    /// Create a new model error
    pub fn model<S: Into<String>>(message: S) -> Self {
        Self::Model {
            message: message.into(),
        }
    }

    /// Create a new empty-result error
    pub fn empty_result<S: Into<String>>(subject: S) -> Self {
        Self::EmptyResult {
            subject: subject.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Stable machine-readable kind, surfaced to API callers
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            SafarAiError::Validation { .. } => "validation_error",
            SafarAiError::Provider { .. } => "provider_error",
            SafarAiError::Model { .. } => "model_error",
            SafarAiError::EmptyResult { .. } => "empty_result_error",
            SafarAiError::Config { .. } => "config_error",
            SafarAiError::Io { .. } => "io_error",
        }
    }

    /// Input field that caused a validation error
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            SafarAiError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Whether the caller can fix this by changing the request
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SafarAiError::Validation { .. } | SafarAiError::EmptyResult { .. }
        )
    }

    /// Get a user-friendly error message.
    ///
    /// Upstream failures are reported without provider detail; the full
    /// error only goes to the log.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SafarAiError::Validation { field, message } => {
                format!("Invalid input for '{field}': {message}")
            }
            SafarAiError::Provider { .. } => {
                "The travel search service is unavailable. Please try again later.".to_string()
            }
            SafarAiError::Model { .. } => {
                "The AI assistant could not complete the request. Please try again later."
                    .to_string()
            }
            SafarAiError::EmptyResult { subject } => format!("No {subject} found"),
            SafarAiError::Config { .. } => {
                "Service configuration error. Please contact the operator.".to_string()
            }
            SafarAiError::Io { .. } => "Internal file operation failed.".to_string(),
        }
    }
}
