pub mod grid;
pub mod problem;
#[cfg(feature = "sedml")]
pub mod sedml;
pub mod xml;

pub mod types;

#[cfg(test)]
mod test_utils;

pub use crate::grid::{GridError, GridWarning, MAX_OUTPUT_POINTS, OutputSchedule, TimeGrid};
pub use crate::problem::{OutputValues, StepAnchor, TrajectoryProblem, ValuesParseError};
#[cfg(feature = "sedml")]
pub use crate::sedml::{OneStep, SedSimulation, SedmlError, UniformTimeCourse};
pub use crate::types::{Validate, ValidationResult, WithWarnings};
pub use crate::xml::{ErrorContext, TrajectoryError};
