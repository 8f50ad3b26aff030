// src/error.rs
//! Application error types with structured error handling.
//!
//! Error types form the vocabulary for failure modes in the system.
//! Every failure inside the animation pipeline is fatal to the whole
//! request: the first one observed is the one surfaced to the caller.

use std::fmt;
use thiserror::Error;

/// Who is to blame for a failure, as far as a client is concerned.
///
/// The service boundary uses this to pick a response status, keeping
/// "the request was wrong" apart from "we could not execute it".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The caller sent something we cannot work with.
    BadInput,
    /// A remote tile server failed or returned garbage.
    UpstreamFailure,
    /// Something went wrong on our side.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadInput => write!(f, "bad_input"),
            Self::UpstreamFailure => write!(f, "upstream_failure"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed endpoint '{endpoint}': {reason}")]
    MalformedEndpoint { endpoint: String, reason: String },

    #[error("URL generator cancelled before all tasks were issued")]
    GeneratorCancelled,

    #[error("Failed to fetch tile {url}: {reason}")]
    FetchFailed {
        url: String,
        status: Option<u16>,
        reason: String,
    },

    #[error("Could not decode tile image for '{value}': {source}")]
    DecodeFailed {
        value: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Error loading font file {path}: {reason}")]
    FontUnavailable { path: String, reason: String },

    #[error("Failed to assemble animation: {0}")]
    AssemblyFailed(String),

    #[error("Malformed request body: {0}")]
    MalformedRequest(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error(transparent)]
    Validation(#[from] crate::types::ValidationError),
}

impl AppError {
    /// Classifies the failure for the client-facing boundary.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MalformedEndpoint { .. }
            | Self::InvalidTimestamp(_)
            | Self::MalformedRequest(_)
            | Self::Validation(_) => ErrorCategory::BadInput,
            Self::FetchFailed { .. } | Self::DecodeFailed { .. } => ErrorCategory::UpstreamFailure,
            Self::GeneratorCancelled
            | Self::FontUnavailable { .. }
            | Self::AssemblyFailed(_)
            | Self::Configuration(_)
            | Self::Io(_)
            | Self::InternalError { .. } => ErrorCategory::Internal,
        }
    }
}

// Allow converting from anyhow::Error, preserving the message
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError {
            message: err.to_string(),
            source: None,
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalError {
            message: format!(
                "Pipeline task failed with join error: {}. This may indicate a panic in a worker.",
                err
            ),
            source: Some(Box::new(err)),
        }
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Configuration(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;
