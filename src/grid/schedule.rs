//! Output schedule: the time points at which a run reports state.

use std::iter;

use itertools::Itertools;
use log::warn;

use super::{GridError, GridWarning, MAX_OUTPUT_POINTS, MIN_STEP_FACTOR, TimeGrid, finite};
use crate::problem::TrajectoryProblem;

/// The ordered output times of one run.
///
/// Points follow the direction of integration, so a backward run yields
/// decreasing times. The last point, when present, is exactly the end of the
/// run.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchedule {
    grid: TimeGrid,
    initial_time: f64,
    times: Vec<f64>,
    warnings: Vec<GridWarning>,
}

impl OutputSchedule {
    /// Build the schedule of `problem` for a model starting at `initial_time`.
    pub fn new(problem: &TrajectoryProblem, initial_time: f64) -> Result<Self, GridError> {
        let initial_time = finite("InitialTime", initial_time)?;
        let output_start = finite("OutputStartTime", problem.output_start_time())?;
        let (grid, mut warnings) = TimeGrid::resolve(problem)?.into();

        let end_time = grid.end_time(initial_time);
        let reverse = grid.is_reverse();

        let after_end = if reverse {
            output_start < end_time && !coincident(output_start, end_time)
        } else {
            output_start > end_time && !coincident(output_start, end_time)
        };
        if after_end {
            let warning = GridWarning::OutputStartAfterEnd {
                output_start_time: output_start,
                end_time,
            };
            warn!("{}", warning);
            warnings.push(warning);
            return Ok(Self {
                grid,
                initial_time,
                times: Vec::new(),
                warnings,
            });
        }

        let uniform: Vec<f64> = if problem.automatic_step_size() {
            vec![initial_time, end_time]
        } else {
            let points = u64::from(grid.step_number) + 1;
            if points > u64::from(MAX_OUTPUT_POINTS) {
                return Err(GridError::TooManyPoints {
                    points,
                    limit: MAX_OUTPUT_POINTS,
                });
            }

            let min_gap = resolution(initial_time, end_time);
            if grid.step_number > 1 && grid.step_size.abs() <= min_gap {
                let warning = GridWarning::StepBelowResolution {
                    step_size: grid.step_size,
                    resolution: min_gap,
                };
                warn!("{}", warning);
                warnings.push(warning);
            }

            (0..grid.step_number)
                .map(|i| initial_time + f64::from(i) * grid.step_size)
                .chain(iter::once(end_time))
                .collect()
        };

        let mut explicit: Vec<f64> = if problem.use_values() {
            problem.values().within(initial_time, end_time).collect()
        } else {
            Vec::new()
        };
        if reverse {
            explicit.reverse();
        }

        let mut times: Vec<f64> = uniform
            .into_iter()
            .merge_by(explicit, |a, b| if reverse { a >= b } else { a <= b })
            .dedup_by(|a, b| coincident(*a, *b))
            .filter(|t| {
                coincident(*t, output_start)
                    || if reverse {
                        *t < output_start
                    } else {
                        *t > output_start
                    }
            })
            .collect();

        if let Some(last) = times.last_mut()
            && coincident(*last, end_time)
        {
            *last = end_time;
        }

        Ok(Self {
            grid,
            initial_time,
            times,
            warnings,
        })
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn first(&self) -> Option<f64> {
        self.times.first().copied()
    }

    pub fn last(&self) -> Option<f64> {
        self.times.last().copied()
    }

    /// The resolved grid the schedule was built from.
    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    pub fn initial_time(&self) -> f64 {
        self.initial_time
    }

    pub fn end_time(&self) -> f64 {
        self.grid.end_time(self.initial_time)
    }

    /// Corrections made while resolving the grid or placing the points.
    pub fn warnings(&self) -> &[GridWarning] {
        &self.warnings
    }
}

impl IntoIterator for OutputSchedule {
    type Item = f64;
    type IntoIter = std::vec::IntoIter<f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.times.into_iter()
    }
}

impl<'a> IntoIterator for &'a OutputSchedule {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.times.iter()
    }
}

/// Smallest separation of two distinct output points near `a` and `b`.
fn resolution(a: f64, b: f64) -> f64 {
    MIN_STEP_FACTOR * f64::EPSILON * a.abs().max(b.abs()).max(1.0)
}

/// Two times closer than the resolution are the same output point.
fn coincident(a: f64, b: f64) -> bool {
    (a - b).abs() <= resolution(a, b)
}

impl TrajectoryProblem {
    /// Output times of a run starting at `initial_time`.
    pub fn output_schedule(&self, initial_time: f64) -> Result<OutputSchedule, GridError> {
        OutputSchedule::new(self, initial_time)
    }
}
