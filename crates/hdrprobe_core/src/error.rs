//! Error types surfaced by probe, calibration and backend operations.

use thiserror::Error;

/// Errors that can occur while operating on a session.
///
/// None of these are fatal: the session, the displayed image and the
/// annotation store stay valid after any of them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProbeError {
    /// Operation attempted before an image was uploaded
    #[error("No image loaded")]
    NoActiveSession,

    /// Transport or backend failure on any endpoint
    #[error("{message}")]
    NetworkFailure {
        /// Backend operation that failed (e.g. "render")
        operation: String,
        /// Human-readable failure detail
        message: String,
    },

    /// Calibration input that is not a finite positive number
    #[error("Please provide a positive number (got '{input}')")]
    InvalidReferenceValue {
        /// The raw operator input
        input: String,
    },

    /// Region probe over a zero-area rectangle
    #[error("Region has no pixels")]
    DegenerateRegion,
}

impl ProbeError {
    /// Create a network failure for the given operation.
    pub fn network(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NetworkFailure {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create an invalid reference value error.
    pub fn invalid_reference_value(input: impl Into<String>) -> Self {
        Self::InvalidReferenceValue {
            input: input.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProbeError>;
