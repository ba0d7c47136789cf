//! Time grid resolution.
//!
//! A problem stores duration, step size and step number independently so
//! that each setter round-trips exactly. Before a run the three have to
//! agree: the quantity that was set last (the [`StepAnchor`]) is kept and
//! the other one is derived from it and the duration.
//!
//! Resolution never fails for finite input apart from a zero step number.
//! Values that cannot be honoured (step sizes below machine resolution,
//! step counts beyond `u32::MAX`, step sizes pointing against the run) are
//! corrected and reported as [`GridWarning`]s.

pub mod schedule;

use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::problem::{StepAnchor, TrajectoryProblem};
use crate::types::WithWarnings;

pub use schedule::OutputSchedule;

/// Step sizes smaller than this multiple of `EPSILON * |duration|` cannot be
/// distinguished from zero over the run.
const MIN_STEP_FACTOR: f64 = 100.0;

/// Largest number of regular points an [`OutputSchedule`] will hold.
pub const MAX_OUTPUT_POINTS: u32 = 1 << 24;

/// Errors that prevent a consistent grid from being built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// A parameter is NaN or infinite.
    #[error("{field} is not a finite number: {value}")]
    NonFinite { field: &'static str, value: f64 },

    /// The step number anchors the grid but is zero.
    #[error("StepNumber must be greater than 0")]
    ZeroStepNumber,

    /// The grid has more points than a schedule can hold.
    #[error("{points} output points exceed the limit of {limit}")]
    TooManyPoints { points: u64, limit: u32 },
}

/// Corrections made while resolving a grid or building a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GridWarning {
    /// The step size was raised to the smallest usable value.
    StepSizeTooSmall { requested: f64, used: f64 },
    /// The step count exceeded `u32::MAX` and was clamped.
    StepNumberOverflow { requested: f64 },
    /// The step size pointed against the direction of the run.
    StepSizeSignCorrected { requested: f64, used: f64 },
    /// The output start time lies past the end of the run.
    OutputStartAfterEnd { output_start_time: f64, end_time: f64 },
    /// The step size is below the time resolution at the run's times, so
    /// neighbouring points were merged.
    StepBelowResolution { step_size: f64, resolution: f64 },
}

impl fmt::Display for GridWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridWarning::StepSizeTooSmall { requested, used } => write!(
                f,
                "step size {} is too small for the duration, using {}",
                requested, used
            ),
            GridWarning::StepNumberOverflow { requested } => write!(
                f,
                "step number {} exceeds the maximum {}, clamped",
                requested,
                u32::MAX
            ),
            GridWarning::StepSizeSignCorrected { requested, used } => write!(
                f,
                "step size {} points against the duration, using {}",
                requested, used
            ),
            GridWarning::OutputStartAfterEnd {
                output_start_time,
                end_time,
            } => write!(
                f,
                "output start time {} lies past the end of the run at {}, no output",
                output_start_time, end_time
            ),
            GridWarning::StepBelowResolution {
                step_size,
                resolution,
            } => write!(
                f,
                "step size {} is below the time resolution {}, coincident points merged",
                step_size, resolution
            ),
        }
    }
}

/// A consistent (duration, step size, step number) triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeGrid {
    pub duration: f64,
    pub step_size: f64,
    pub step_number: u32,
}

impl TimeGrid {
    /// Resolve the grid of `problem`, keeping its anchor quantity.
    pub fn resolve(
        problem: &TrajectoryProblem,
    ) -> Result<WithWarnings<TimeGrid, GridWarning>, GridError> {
        let duration = finite("Duration", problem.duration())?;
        let requested = finite("StepSize", problem.step_size())?;
        let min_step = MIN_STEP_FACTOR * f64::EPSILON * duration.abs();
        let mut warnings = Vec::new();

        let grid = match problem.anchor() {
            StepAnchor::StepNumber => {
                if problem.step_number() == 0 {
                    return Err(GridError::ZeroStepNumber);
                }
                // duration / u32::MAX is always above the minimum step size.
                TimeGrid {
                    duration,
                    step_size: duration / f64::from(problem.step_number()),
                    step_number: problem.step_number(),
                }
            }
            StepAnchor::StepSize => {
                if duration == 0.0 {
                    // Nothing to step over; keep whatever was set.
                    return Ok(WithWarnings::Ok(TimeGrid {
                        duration,
                        step_size: requested,
                        step_number: 0,
                    }));
                }

                let mut step_size = requested;
                if step_size.abs() < min_step {
                    let used = min_step.copysign(duration);
                    warnings.push(GridWarning::StepSizeTooSmall {
                        requested: step_size,
                        used,
                    });
                    step_size = used;
                }

                let mut steps = (duration / step_size).abs().ceil();
                if steps > f64::from(u32::MAX) {
                    warnings.push(GridWarning::StepNumberOverflow { requested: steps });
                    steps = f64::from(u32::MAX);
                    step_size = duration / steps;
                }

                let signed = step_size.abs().copysign(duration);
                if signed != step_size {
                    warnings.push(GridWarning::StepSizeSignCorrected {
                        requested: step_size,
                        used: signed,
                    });
                }

                TimeGrid {
                    duration,
                    step_size: signed,
                    step_number: steps as u32,
                }
            }
        };

        for warning in &warnings {
            warn!("{}", warning);
        }

        Ok(WithWarnings::from_parts(grid, warnings))
    }

    /// Whether the run goes backwards in time.
    pub fn is_reverse(&self) -> bool {
        self.duration < 0.0
    }

    /// End of the run for a given initial time.
    pub fn end_time(&self, initial_time: f64) -> f64 {
        initial_time + self.duration
    }
}

impl StepAnchor {
    /// The anchor under which a stored (duration, step size, step number)
    /// triple resolves to itself, preferring the step number on a tie.
    ///
    /// Triples that match neither anchor fall back to the step number.
    pub fn matching(duration: f64, step_size: f64, step_number: u32) -> Self {
        let count = f64::from(step_number);
        if step_number != 0 && duration / count == step_size {
            StepAnchor::StepNumber
        } else if (duration == 0.0 && step_number == 0)
            || (duration / step_size).abs().ceil() == count
        {
            StepAnchor::StepSize
        } else {
            StepAnchor::StepNumber
        }
    }
}

fn finite(field: &'static str, value: f64) -> Result<f64, GridError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(GridError::NonFinite { field, value })
    }
}

impl TrajectoryProblem {
    /// Resolve the time grid without modifying the problem.
    pub fn time_grid(&self) -> Result<WithWarnings<TimeGrid, GridWarning>, GridError> {
        TimeGrid::resolve(self)
    }

    /// Resolve the time grid and write the derived step size and step
    /// number back. The anchor is left as it was.
    pub fn sync(&mut self) -> Result<Vec<GridWarning>, GridError> {
        let (grid, warnings) = TimeGrid::resolve(self)?.into();
        let anchor = self.anchor();
        self.set_step_size(grid.step_size);
        self.set_step_number(grid.step_number);
        self.set_anchor(anchor);
        Ok(warnings)
    }
}
