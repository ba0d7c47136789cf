// A time-course problem describes how long a model is simulated and where
// its state is reported:
// ·         Duration:  length of the run in model time units (negative runs backwards)
// ·         Step size / step number:  regular output interval, given either as a
//           size or as a count; whichever was set last determines the other
// ·         Output start time:  no output before this time
// ·         Time series requested:  keep the full trajectory in memory
// OPTIONAL flags with defaults of false:
// ·         Automatic step size:  report at the integrator's internal steps
// ·         Output event:  also report at event times
// ·         Start in steady state:  compute a steady state before the run
// ·         Continue on simultaneous events:  do not stop when events coincide
// ·         Use values:  also report at the explicit times in `values`

pub mod values;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{Validate, ValidationResult};

pub use values::{OutputValues, ValuesParseError};

/// Which of step size and step number was set last.
///
/// The other quantity is derived from it and the duration when the time
/// grid is resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepAnchor {
    #[default]
    StepNumber,
    StepSize,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrajectoryProblem {
    /// Let the integrator choose the output steps.
    automatic_step_size: bool,
    /// Number of regular output intervals.
    step_number: u32,
    /// Length of one regular output interval.
    step_size: f64,
    /// Length of the run.
    duration: f64,
    /// Whether the full time series is kept in memory.
    time_series_requested: bool,
    /// Model time before which no output is produced.
    output_start_time: f64,
    /// Whether event times are added to the output.
    output_event: bool,
    /// Whether the run starts from a steady state.
    start_in_steady_state: bool,
    /// Whether simultaneous events are processed without stopping.
    continue_simultaneous_events: bool,
    /// Whether `values` are added to the output.
    use_values: bool,
    /// Explicit output times.
    values: OutputValues,
    /// Which of step size / step number was set last.
    anchor: StepAnchor,
}

impl Default for TrajectoryProblem {
    fn default() -> Self {
        Self {
            automatic_step_size: false,
            step_number: 100,
            step_size: 0.01,
            duration: 1.0,
            time_series_requested: true,
            output_start_time: 0.0,
            output_event: false,
            start_in_steady_state: false,
            continue_simultaneous_events: false,
            use_values: false,
            values: OutputValues::new(),
            anchor: StepAnchor::StepNumber,
        }
    }
}

impl TrajectoryProblem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step_number(&self) -> u32 {
        self.step_number
    }

    /// Sets the number of output intervals and makes it the grid anchor.
    pub fn set_step_number(&mut self, step_number: u32) {
        self.step_number = step_number;
        self.anchor = StepAnchor::StepNumber;
    }

    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    /// Sets the output interval length and makes it the grid anchor.
    pub fn set_step_size(&mut self, step_size: f64) {
        self.step_size = step_size;
        self.anchor = StepAnchor::StepSize;
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn set_duration(&mut self, duration: f64) {
        self.duration = duration;
    }

    pub fn output_start_time(&self) -> f64 {
        self.output_start_time
    }

    pub fn set_output_start_time(&mut self, output_start_time: f64) {
        self.output_start_time = output_start_time;
    }

    pub fn time_series_requested(&self) -> bool {
        self.time_series_requested
    }

    pub fn set_time_series_requested(&mut self, requested: bool) {
        self.time_series_requested = requested;
    }

    pub fn automatic_step_size(&self) -> bool {
        self.automatic_step_size
    }

    pub fn set_automatic_step_size(&mut self, automatic: bool) {
        self.automatic_step_size = automatic;
    }

    pub fn output_event(&self) -> bool {
        self.output_event
    }

    pub fn set_output_event(&mut self, output_event: bool) {
        self.output_event = output_event;
    }

    pub fn start_in_steady_state(&self) -> bool {
        self.start_in_steady_state
    }

    pub fn set_start_in_steady_state(&mut self, steady_state: bool) {
        self.start_in_steady_state = steady_state;
    }

    pub fn continue_simultaneous_events(&self) -> bool {
        self.continue_simultaneous_events
    }

    pub fn set_continue_simultaneous_events(&mut self, continue_events: bool) {
        self.continue_simultaneous_events = continue_events;
    }

    pub fn use_values(&self) -> bool {
        self.use_values
    }

    pub fn set_use_values(&mut self, use_values: bool) {
        self.use_values = use_values;
    }

    pub fn values(&self) -> &OutputValues {
        &self.values
    }

    pub fn set_values(&mut self, values: OutputValues) {
        self.values = values;
    }

    /// Parses and stores an explicit values list such as `"0.5 1, 2"`.
    ///
    /// The record is left unchanged if the list does not parse.
    pub fn set_values_str(&mut self, values: &str) -> Result<(), ValuesParseError> {
        self.values = values.parse()?;
        Ok(())
    }

    pub fn anchor(&self) -> StepAnchor {
        self.anchor
    }

    pub fn set_anchor(&mut self, anchor: StepAnchor) {
        self.anchor = anchor;
    }
}

impl Validate for TrajectoryProblem {
    fn validate(&self) -> ValidationResult {
        let mut warnings = Vec::new();
        let mut errors = Vec::new();

        for (name, value) in [
            ("Duration", self.duration),
            ("StepSize", self.step_size),
            ("OutputStartTime", self.output_start_time),
        ] {
            if !value.is_finite() {
                errors.push(format!("{} is not a valid number: {}", name, value));
            }
        }

        match self.anchor {
            StepAnchor::StepNumber if self.step_number == 0 => {
                errors.push("StepNumber must be greater than 0".to_string());
            }
            StepAnchor::StepSize if self.step_size == 0.0 && self.duration != 0.0 => {
                errors.push("StepSize must be non-zero for a non-zero Duration".to_string());
            }
            _ => {}
        }

        if self.anchor == StepAnchor::StepSize
            && self.duration != 0.0
            && self.step_size != 0.0
            && self.step_size.is_sign_negative() != self.duration.is_sign_negative()
        {
            warnings.push(format!(
                "StepSize ({}) and Duration ({}) have opposite signs; the step size sign will follow the duration",
                self.step_size, self.duration
            ));
        }

        if self.use_values && self.values.is_empty() {
            warnings.push("Use Values is set but no values are given".to_string());
        }

        if self.duration > 0.0
            && self.output_start_time.is_finite()
            && !(0.0..=self.duration).contains(&self.output_start_time)
        {
            warnings.push(format!(
                "OutputStartTime ({}) lies outside the run [0, {}]",
                self.output_start_time, self.duration
            ));
        }

        ValidationResult::from_messages(warnings, errors)
    }
}

impl fmt::Display for TrajectoryProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "AutomaticStepSize: {}", self.automatic_step_size)?;
        writeln!(f, "StepNumber: {}", self.step_number)?;
        writeln!(f, "StepSize: {}", self.step_size)?;
        writeln!(f, "Duration: {}", self.duration)?;
        writeln!(f, "TimeSeriesRequested: {}", self.time_series_requested)?;
        writeln!(f, "OutputStartTime: {}", self.output_start_time)?;
        writeln!(f, "Output Event: {}", self.output_event)?;
        writeln!(f, "Start in Steady State: {}", self.start_in_steady_state)?;
        writeln!(
            f,
            "Continue on Simultaneous Events: {}",
            self.continue_simultaneous_events
        )?;
        writeln!(f, "Use Values: {}", self.use_values)?;
        write!(f, "Values: {}", self.values)
    }
}
