//! XML serialization of a time-course problem.

use std::io::Write;

use log::debug;
use quick_xml::Writer;
use thiserror::Error;

use crate::problem::TrajectoryProblem;
use crate::xml::quick::{AttrList, XmlEmitter};
use crate::xml::schema::{self, ParameterType};

/// Errors that can occur during XML serialization.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("XML serialization error: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Helper type for XML writer operations.
pub type XmlWriter = Writer<Vec<u8>>;

/// Write one `<Parameter name=".." type=".." value=".."/>` element.
fn write_parameter<W: Write>(
    emitter: &mut XmlEmitter<'_, W>,
    name: &str,
    kind: ParameterType,
    value: impl FnOnce(&mut AttrList),
) -> Result<(), SerializeError> {
    let mut attrs = AttrList::new();
    attrs.add("name", name).add("type", kind.as_str());
    value(&mut attrs);
    emitter.empty_elem_with_attrs(schema::PARAMETER_TAG, &attrs)
}

/// Write the `<Problem>` group of `problem`.
pub fn serialize_problem<W: Write>(
    writer: &mut Writer<W>,
    problem: &TrajectoryProblem,
) -> Result<(), SerializeError> {
    // Store the resolved pair so the grid survives a reload whichever
    // anchor the reader settles on.
    let (step_number, step_size) = match problem.time_grid() {
        Ok(resolved) => {
            let grid = *resolved.value();
            (grid.step_number, grid.step_size)
        }
        Err(err) => {
            debug!("writing unresolved step values: {}", err);
            (problem.step_number(), problem.step_size())
        }
    };

    let mut emitter = XmlEmitter::new(writer);
    emitter.write_start(schema::PROBLEM_TAG)?;

    for &(name, kind) in schema::PROBLEM_PARAMETERS {
        write_parameter(&mut emitter, name, kind, |attrs| {
            match name {
                schema::AUTOMATIC_STEP_SIZE => {
                    attrs.add_bool("value", problem.automatic_step_size())
                }
                schema::STEP_NUMBER => attrs.add_u32("value", step_number),
                schema::STEP_SIZE => attrs.add_f64("value", step_size),
                schema::DURATION => attrs.add_f64("value", problem.duration()),
                schema::TIME_SERIES_REQUESTED => {
                    attrs.add_bool("value", problem.time_series_requested())
                }
                schema::OUTPUT_START_TIME => attrs.add_f64("value", problem.output_start_time()),
                schema::OUTPUT_EVENT => attrs.add_bool("value", problem.output_event()),
                schema::START_IN_STEADY_STATE => {
                    attrs.add_bool("value", problem.start_in_steady_state())
                }
                schema::CONTINUE_SIMULTANEOUS_EVENTS => {
                    attrs.add_bool("value", problem.continue_simultaneous_events())
                }
                schema::USE_VALUES => attrs.add_bool("value", problem.use_values()),
                _ => attrs.add("value", problem.values().to_string()),
            };
        })?;
    }

    emitter.write_end(schema::PROBLEM_TAG)
}

impl TrajectoryProblem {
    /// Render the problem as a standalone CopasiML `<Problem>` document.
    pub fn to_xml(&self) -> Result<String, SerializeError> {
        let mut writer: XmlWriter = Writer::new_with_indent(Vec::new(), b' ', 2);
        XmlEmitter::new(&mut writer).xml_decl()?;
        serialize_problem(&mut writer, self)?;
        Ok(String::from_utf8(writer.into_inner())?)
    }
}
