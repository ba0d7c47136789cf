//! Error types for loading, saving and validating problems.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::ValidationResult;
use crate::xml::deserialize::DeserializeError;
use crate::xml::serialize::SerializeError;

/// Top-level error for problem files.
///
/// Carries an [`ErrorContext`] so messages can name the file, the byte
/// offset and the parameter that caused the failure.
#[derive(Debug, Error)]
pub enum TrajectoryError {
    /// IO error occurred while reading or writing the file.
    #[error("IO error{context}: {source}")]
    Io {
        #[source]
        source: std::io::Error,
        context: ErrorContext,
    },

    /// The XML could not be read as a problem.
    #[error("Deserialization error{context}: {source}")]
    Deserialize {
        #[source]
        source: DeserializeError,
        context: ErrorContext,
    },

    /// The problem could not be written.
    #[error("Serialization error: {0}")]
    Serialize(#[from] SerializeError),

    /// The problem was read but violates its consistency rules.
    #[error("Validation error{context}: {message}")]
    Validation {
        message: String,
        context: ErrorContext,
        warnings: Vec<String>,
        errors: Vec<String>,
    },
}

impl TrajectoryError {
    /// The context attached to this error, if any.
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            TrajectoryError::Io { context, .. }
            | TrajectoryError::Deserialize { context, .. }
            | TrajectoryError::Validation { context, .. } => Some(context),
            TrajectoryError::Serialize(_) => None,
        }
    }
}

impl From<DeserializeError> for TrajectoryError {
    fn from(source: DeserializeError) -> Self {
        let context = match source.parameter() {
            Some(name) => ErrorContext::new().with_parameter(name),
            None => ErrorContext::new(),
        };
        TrajectoryError::Deserialize { source, context }
    }
}

/// Context information for error reporting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorContext {
    /// The file path where the error occurred (if available).
    pub file_path: Option<PathBuf>,
    /// Byte offset into the document (if available).
    pub position: Option<usize>,
    /// The parameter being read (if available).
    pub parameter: Option<String>,
}

impl ErrorContext {
    /// Create a new empty error context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an error context with file path.
    pub fn with_file_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            file_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Add the parameter being read.
    pub fn with_parameter<S: Into<String>>(mut self, parameter: S) -> Self {
        self.parameter = Some(parameter.into());
        self
    }

    /// Add a byte offset.
    pub fn with_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    /// Fill in every field of `self` that `other` leaves empty.
    pub fn merge(mut self, other: ErrorContext) -> Self {
        self.file_path = self.file_path.or(other.file_path);
        self.position = self.position.or(other.position);
        self.parameter = self.parameter.or(other.parameter);
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();

        if let Some(ref path) = self.file_path {
            parts.push(format!(" in file '{}'", path.display()));
        }

        if let Some(position) = self.position {
            parts.push(format!(" at byte {}", position));
        }

        if let Some(ref parameter) = self.parameter {
            parts.push(format!(" while reading parameter '{}'", parameter));
        }

        if parts.is_empty() {
            return Ok(());
        }

        write!(f, "{}", parts.join(","))
    }
}

/// Helper trait for turning validation results into errors.
pub trait ToTrajectoryError {
    /// `Ok` with the warnings unless the result is invalid.
    fn to_trajectory_error(self, context: ErrorContext) -> Result<Vec<String>, TrajectoryError>;
}

impl ToTrajectoryError for ValidationResult {
    fn to_trajectory_error(self, context: ErrorContext) -> Result<Vec<String>, TrajectoryError> {
        match self {
            ValidationResult::Valid(_) => Ok(Vec::new()),
            ValidationResult::Warnings(_, warnings) => Ok(warnings),
            ValidationResult::Invalid(warnings, errors) => {
                let message = if errors.len() == 1 {
                    errors[0].clone()
                } else {
                    format!("{} validation errors", errors.len())
                };
                Err(TrajectoryError::Validation {
                    message,
                    context,
                    warnings,
                    errors,
                })
            }
        }
    }
}
