//! CopasiML persistence of time-course problems.

pub mod deserialize;
pub mod errors;
pub mod quick;
pub mod schema;
pub mod serialize;

use std::fs;
use std::path::Path;

use log::warn;
use quick_xml::Reader;

pub use deserialize::{DeserializeError, deserialize_document, deserialize_problem};
pub use errors::{ErrorContext, ToTrajectoryError, TrajectoryError};
pub use serialize::{SerializeError, serialize_problem};

use crate::problem::TrajectoryProblem;
use crate::types::Validate;

impl TrajectoryProblem {
    /// Read a problem from CopasiML text.
    ///
    /// Accepts a bare `<Problem>` group or a full document, in which case the
    /// problem of the time-course task is used.
    pub fn from_xml_str(xml: &str) -> Result<Self, TrajectoryError> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);
        let mut buf = Vec::new();

        deserialize_document(&mut reader, &mut buf).map_err(|source| {
            let position = reader.buffer_position();
            match TrajectoryError::from(source) {
                TrajectoryError::Deserialize { source, context } => TrajectoryError::Deserialize {
                    source,
                    context: context.with_position(position),
                },
                other => other,
            }
        })
    }

    /// Read a problem from a CopasiML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TrajectoryError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| TrajectoryError::Io {
            source,
            context: ErrorContext::with_file_path(path),
        })?;

        Self::from_xml_str(&text).map_err(|err| with_file(err, path))
    }

    /// Read a problem from a file and reject it unless it validates.
    ///
    /// Validation warnings are logged.
    pub fn load_validated(path: impl AsRef<Path>) -> Result<Self, TrajectoryError> {
        let path = path.as_ref();
        let problem = Self::from_path(path)?;
        let warnings = problem
            .validate()
            .to_trajectory_error(ErrorContext::with_file_path(path))?;
        for warning in warnings {
            warn!("{}: {}", path.display(), warning);
        }
        Ok(problem)
    }

    /// Write the problem as a standalone CopasiML `<Problem>` document.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TrajectoryError> {
        let path = path.as_ref();
        let xml = self.to_xml()?;
        fs::write(path, xml).map_err(|source| TrajectoryError::Io {
            source,
            context: ErrorContext::with_file_path(path),
        })
    }
}

/// Attach `path` to the context of `err`.
fn with_file(err: TrajectoryError, path: &Path) -> TrajectoryError {
    let file = ErrorContext::with_file_path(path);
    match err {
        TrajectoryError::Deserialize { source, context } => TrajectoryError::Deserialize {
            source,
            context: context.merge(file),
        },
        TrajectoryError::Io { source, context } => TrajectoryError::Io {
            source,
            context: context.merge(file),
        },
        TrajectoryError::Validation {
            message,
            context,
            warnings,
            errors,
        } => TrajectoryError::Validation {
            message,
            context: context.merge(file),
            warnings,
            errors,
        },
        other => other,
    }
}
