//! CopasiML layout of a time-course problem.
//!
//! A problem is stored as a flat group of typed parameters:
//!
//! ```xml
//! <Problem>
//!   <Parameter name="AutomaticStepSize" type="bool" value="0"/>
//!   <Parameter name="StepNumber" type="unsignedInteger" value="100"/>
//!   <Parameter name="StepSize" type="float" value="0.01"/>
//!   ...
//! </Problem>
//! ```
//!
//! Inside a complete CopasiML document the group sits under
//! `<Task type="timeCourse">`.

use std::fmt;
use std::str::FromStr;

pub const PROBLEM_TAG: &str = "Problem";
pub const PARAMETER_TAG: &str = "Parameter";
pub const TASK_TAG: &str = "Task";
pub const TIME_COURSE_TASK: &str = "timeCourse";

pub const AUTOMATIC_STEP_SIZE: &str = "AutomaticStepSize";
pub const STEP_NUMBER: &str = "StepNumber";
pub const STEP_SIZE: &str = "StepSize";
pub const DURATION: &str = "Duration";
pub const TIME_SERIES_REQUESTED: &str = "TimeSeriesRequested";
pub const OUTPUT_START_TIME: &str = "OutputStartTime";
pub const OUTPUT_EVENT: &str = "Output Event";
pub const START_IN_STEADY_STATE: &str = "Start in Steady State";
pub const CONTINUE_SIMULTANEOUS_EVENTS: &str = "Continue on Simultaneous Events";
pub const USE_VALUES: &str = "Use Values";
pub const VALUES: &str = "Values";

/// The value type a CopasiML parameter declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterType {
    Bool,
    UnsignedInteger,
    Float,
    String,
}

impl ParameterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterType::Bool => "bool",
            ParameterType::UnsignedInteger => "unsignedInteger",
            ParameterType::Float => "float",
            ParameterType::String => "string",
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParameterType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bool" => Ok(ParameterType::Bool),
            "unsignedInteger" => Ok(ParameterType::UnsignedInteger),
            "float" => Ok(ParameterType::Float),
            "string" => Ok(ParameterType::String),
            other => Err(format!("unknown parameter type '{}'", other)),
        }
    }
}

/// Every problem parameter in write order, with its declared type.
pub const PROBLEM_PARAMETERS: &[(&str, ParameterType)] = &[
    (AUTOMATIC_STEP_SIZE, ParameterType::Bool),
    (STEP_NUMBER, ParameterType::UnsignedInteger),
    (STEP_SIZE, ParameterType::Float),
    (DURATION, ParameterType::Float),
    (TIME_SERIES_REQUESTED, ParameterType::Bool),
    (OUTPUT_START_TIME, ParameterType::Float),
    (OUTPUT_EVENT, ParameterType::Bool),
    (START_IN_STEADY_STATE, ParameterType::Bool),
    (CONTINUE_SIMULTANEOUS_EVENTS, ParameterType::Bool),
    (USE_VALUES, ParameterType::Bool),
    (VALUES, ParameterType::String),
];

/// The canonical name and declared type of a known problem parameter.
pub fn lookup_parameter(name: &str) -> Option<(&'static str, ParameterType)> {
    PROBLEM_PARAMETERS
        .iter()
        .find(|(known, _)| *known == name)
        .copied()
}
