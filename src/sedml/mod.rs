//! Import of SED-ML simulation settings.
//!
//! Only the timing of a simulation is mapped. A `uniformTimeCourse` becomes
//! an output start time, a duration and a step number; a `oneStep` becomes a
//! single step of the requested length.

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::problem::TrajectoryProblem;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SedmlError {
    #[error("uniformTimeCourse requires at least one point")]
    NoPoints,

    #[error("{field} is not a finite number: {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("output interval is empty but starts after the initial time {initial_time}")]
    EmptyInterval { initial_time: f64 },
}

/// A SED-ML `uniformTimeCourse` simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniformTimeCourse {
    pub initial_time: f64,
    pub output_start_time: f64,
    pub output_end_time: f64,
    pub number_of_points: u32,
}

impl UniformTimeCourse {
    pub fn new(
        initial_time: f64,
        output_start_time: f64,
        output_end_time: f64,
        number_of_points: u32,
    ) -> Self {
        Self {
            initial_time,
            output_start_time,
            output_end_time,
            number_of_points,
        }
    }

    /// Write the timing of this simulation into `problem`.
    ///
    /// When output starts after the initial time, the run covers the whole
    /// span and extra steps of the output spacing are added in front of the
    /// requested points.
    pub fn apply_to(&self, problem: &mut TrajectoryProblem) -> Result<(), SedmlError> {
        finite("initialTime", self.initial_time)?;
        finite("outputStartTime", self.output_start_time)?;
        finite("outputEndTime", self.output_end_time)?;
        if self.number_of_points == 0 {
            return Err(SedmlError::NoPoints);
        }

        let points = self.number_of_points;
        let (duration, step_number) = if self.initial_time != self.output_start_time {
            let step_size = (self.output_end_time - self.output_start_time) / f64::from(points);
            if step_size == 0.0 {
                return Err(SedmlError::EmptyInterval {
                    initial_time: self.initial_time,
                });
            }
            let additional = ((self.output_start_time - self.initial_time) / step_size).ceil();
            let total = (f64::from(points) + additional).clamp(1.0, f64::from(u32::MAX));
            debug!(
                "uniformTimeCourse: {} additional steps before output start",
                additional
            );
            (self.output_end_time, total as u32)
        } else {
            (self.output_end_time - self.output_start_time, points)
        };

        problem.set_output_start_time(self.output_start_time);
        problem.set_duration(duration);
        problem.set_step_number(step_number);
        Ok(())
    }
}

/// A SED-ML `oneStep` simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OneStep {
    pub step: f64,
}

impl OneStep {
    pub fn new(step: f64) -> Self {
        Self { step }
    }

    pub fn apply_to(&self, problem: &mut TrajectoryProblem) -> Result<(), SedmlError> {
        finite("step", self.step)?;
        problem.set_output_start_time(0.0);
        problem.set_duration(self.step);
        problem.set_step_number(1);
        Ok(())
    }
}

/// The SED-ML simulation kinds that map onto a time course.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SedSimulation {
    UniformTimeCourse(UniformTimeCourse),
    OneStep(OneStep),
}

impl SedSimulation {
    pub fn apply_to(&self, problem: &mut TrajectoryProblem) -> Result<(), SedmlError> {
        match self {
            SedSimulation::UniformTimeCourse(tc) => tc.apply_to(problem),
            SedSimulation::OneStep(step) => step.apply_to(problem),
        }
    }
}

impl From<UniformTimeCourse> for SedSimulation {
    fn from(tc: UniformTimeCourse) -> Self {
        SedSimulation::UniformTimeCourse(tc)
    }
}

impl From<OneStep> for SedSimulation {
    fn from(step: OneStep) -> Self {
        SedSimulation::OneStep(step)
    }
}

impl TrajectoryProblem {
    /// A default problem with the timing of `simulation`.
    pub fn from_sedml(simulation: &SedSimulation) -> Result<Self, SedmlError> {
        let mut problem = TrajectoryProblem::default();
        simulation.apply_to(&mut problem)?;
        Ok(problem)
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), SedmlError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SedmlError::NonFinite { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::StepAnchor;
    use crate::test_utils::assert_float_eq;

    #[test]
    fn test_time_course_from_initial_time() {
        let tc = UniformTimeCourse::new(0.0, 0.0, 10.0, 100);
        let problem = TrajectoryProblem::from_sedml(&tc.into()).unwrap();
        assert_eq!(problem.output_start_time(), 0.0);
        assert_eq!(problem.duration(), 10.0);
        assert_eq!(problem.step_number(), 100);
        assert_eq!(problem.anchor(), StepAnchor::StepNumber);
    }

    #[test]
    fn test_time_course_with_delayed_output() {
        // Output spacing (10 - 5) / 20 = 0.25, so 20 extra steps cover [0, 5].
        let tc = UniformTimeCourse::new(0.0, 5.0, 10.0, 20);
        let problem = TrajectoryProblem::from_sedml(&tc.into()).unwrap();
        assert_eq!(problem.output_start_time(), 5.0);
        assert_eq!(problem.duration(), 10.0);
        assert_eq!(problem.step_number(), 40);

        let grid = problem.time_grid().unwrap().unwrap();
        assert_float_eq(grid.step_size, 0.25, 1e-12);
    }

    #[test]
    fn test_time_course_partial_step_rounds_up() {
        let tc = UniformTimeCourse::new(0.0, 0.25, 1.25, 2);
        let problem = TrajectoryProblem::from_sedml(&tc.into()).unwrap();
        // step 0.5, 0.25 / 0.5 = 0.5 rounds up to one extra step
        assert_eq!(problem.step_number(), 3);
    }

    #[test]
    fn test_time_course_errors() {
        assert_eq!(
            UniformTimeCourse::new(0.0, 0.0, 1.0, 0).apply_to(&mut TrajectoryProblem::new()),
            Err(SedmlError::NoPoints)
        );
        assert!(matches!(
            UniformTimeCourse::new(0.0, f64::NAN, 1.0, 10).apply_to(&mut TrajectoryProblem::new()),
            Err(SedmlError::NonFinite {
                field: "outputStartTime",
                ..
            })
        ));
        assert!(matches!(
            UniformTimeCourse::new(0.0, 2.0, 2.0, 10).apply_to(&mut TrajectoryProblem::new()),
            Err(SedmlError::EmptyInterval { .. })
        ));
    }

    #[test]
    fn test_failed_import_leaves_problem_untouched() {
        let mut problem = TrajectoryProblem::new();
        problem.set_duration(3.0);
        let before = problem.clone();
        let _ = OneStep::new(f64::INFINITY).apply_to(&mut problem);
        assert_eq!(problem, before);
    }

    #[test]
    fn test_one_step() {
        let mut problem = TrajectoryProblem::new();
        problem.set_output_start_time(4.0);
        OneStep::new(0.5).apply_to(&mut problem).unwrap();
        assert_eq!(problem.output_start_time(), 0.0);
        assert_eq!(problem.duration(), 0.5);
        assert_eq!(problem.step_number(), 1);
    }

    #[test]
    fn test_simulation_from_kind() {
        let sim: SedSimulation = OneStep::new(2.0).into();
        assert!(matches!(sim, SedSimulation::OneStep(OneStep { step }) if step == 2.0));
    }
}
