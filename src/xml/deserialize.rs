//! XML deserialization of a time-course problem.
//!
//! Reads either a bare `<Problem>` group or the problem of the first
//! `<Task type="timeCourse">` of a complete CopasiML document. Parameters
//! missing from the group keep their defaults; unknown parameters are
//! skipped.

use std::io::BufRead;

use log::debug;
use quick_xml::Reader;
use quick_xml::events::Event;
use thiserror::Error;

use crate::problem::{StepAnchor, TrajectoryProblem};
use crate::xml::quick::{Attrs, parse_bool, skip_element};
use crate::xml::schema::{self, ParameterType};

/// Errors that can occur during XML deserialization.
#[derive(Debug, Error)]
pub enum DeserializeError {
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("XML attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),
    #[error("Deserialization error: {0}")]
    Custom(String),
    #[error("Unexpected end of XML")]
    UnexpectedEof,
    #[error("Unexpected element: expected {expected}, found {found}")]
    UnexpectedElement { expected: String, found: String },
    #[error("Missing required field: {0}")]
    MissingField(String),
    #[error("Parameter '{name}' has type '{found}', expected '{expected}'")]
    TypeMismatch {
        name: String,
        expected: ParameterType,
        found: String,
    },
    #[error("Parameter '{name}' has invalid value '{value}': {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },
    #[error("No time-course problem found")]
    NoProblem,
}

impl DeserializeError {
    /// The parameter the error refers to, if any.
    pub fn parameter(&self) -> Option<&str> {
        match self {
            DeserializeError::TypeMismatch { name, .. }
            | DeserializeError::InvalidValue { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Find and read the time-course problem of a document.
pub fn deserialize_document<R: BufRead>(
    reader: &mut Reader<R>,
    buf: &mut Vec<u8>,
) -> Result<TrajectoryProblem, DeserializeError> {
    // A <Problem> counts when it is the root or belongs to a timeCourse task.
    let mut in_task = false;
    let mut in_time_course = false;

    loop {
        buf.clear();
        match reader.read_event_into(buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"Task" => {
                    let attrs = Attrs::from_start(&e, reader)?;
                    in_task = true;
                    in_time_course = attrs.get_opt("type") == Some(schema::TIME_COURSE_TASK);
                }
                b"Problem" if !in_task || in_time_course => {
                    buf.clear();
                    return deserialize_problem_impl(reader, buf);
                }
                b"Problem" => skip_element(reader, buf, b"Problem")?,
                _ => {}
            },
            Event::Empty(e) if e.name().as_ref() == b"Problem" && (!in_task || in_time_course) => {
                return Ok(TrajectoryProblem::default());
            }
            Event::End(e) if e.name().as_ref() == b"Task" => {
                in_task = false;
                in_time_course = false;
            }
            Event::Eof => return Err(DeserializeError::NoProblem),
            _ => {}
        }
    }
}

/// Deserialize a problem group.
///
/// This function expects the reader to be positioned at the start of a <Problem> element.
pub fn deserialize_problem<R: BufRead>(
    reader: &mut Reader<R>,
    buf: &mut Vec<u8>,
) -> Result<TrajectoryProblem, DeserializeError> {
    buf.clear();
    match reader.read_event_into(buf)? {
        Event::Start(e) if e.name().as_ref() == b"Problem" => {}
        Event::Empty(e) if e.name().as_ref() == b"Problem" => {
            return Ok(TrajectoryProblem::default());
        }
        Event::Start(e) | Event::Empty(e) => {
            return Err(DeserializeError::UnexpectedElement {
                expected: schema::PROBLEM_TAG.to_string(),
                found: String::from_utf8_lossy(e.name().as_ref()).to_string(),
            });
        }
        _ => {
            return Err(DeserializeError::Custom(
                "Expected Problem start tag".to_string(),
            ));
        }
    }
    buf.clear();
    deserialize_problem_impl(reader, buf)
}

/// Internal implementation of problem deserialization, after the start tag.
pub(crate) fn deserialize_problem_impl<R: BufRead>(
    reader: &mut Reader<R>,
    buf: &mut Vec<u8>,
) -> Result<TrajectoryProblem, DeserializeError> {
    let mut problem = TrajectoryProblem::default();
    // Restore the anchor: size if only size was given, otherwise whichever
    // anchor reproduces the stored pair.
    let mut saw_step_number = false;
    let mut saw_step_size = false;

    loop {
        buf.clear();
        match reader.read_event_into(buf)? {
            Event::Empty(e) if e.name().as_ref() == b"Parameter" => {
                let attrs = Attrs::from_start(&e, reader)?;
                match apply_parameter(&mut problem, &attrs)? {
                    Some(schema::STEP_NUMBER) => saw_step_number = true,
                    Some(schema::STEP_SIZE) => saw_step_size = true,
                    _ => {}
                }
            }
            Event::Start(e) if e.name().as_ref() == b"Parameter" => {
                let attrs = Attrs::from_start(&e, reader)?;
                skip_element(reader, buf, b"Parameter")?;
                match apply_parameter(&mut problem, &attrs)? {
                    Some(schema::STEP_NUMBER) => saw_step_number = true,
                    Some(schema::STEP_SIZE) => saw_step_size = true,
                    _ => {}
                }
            }
            Event::Start(e) => {
                let name = e.name().as_ref().to_vec();
                debug!(
                    "skipping <{}> inside problem",
                    String::from_utf8_lossy(&name)
                );
                skip_element(reader, buf, &name)?;
            }
            Event::End(e) if e.name().as_ref() == b"Problem" => break,
            Event::Eof => return Err(DeserializeError::UnexpectedEof),
            _ => {}
        }
    }

    let anchor = match (saw_step_number, saw_step_size) {
        (false, true) => StepAnchor::StepSize,
        (true, true) => StepAnchor::matching(
            problem.duration(),
            problem.step_size(),
            problem.step_number(),
        ),
        _ => StepAnchor::StepNumber,
    };
    problem.set_anchor(anchor);

    Ok(problem)
}

/// Apply one `<Parameter>` to `problem`.
///
/// Returns the name of the known parameter that was applied, or `None` for
/// an unknown parameter.
fn apply_parameter(
    problem: &mut TrajectoryProblem,
    attrs: &Attrs,
) -> Result<Option<&'static str>, DeserializeError> {
    let name = attrs.get_req("name")?;
    let Some((known, expected)) = schema::lookup_parameter(name) else {
        debug!("skipping unknown problem parameter '{}'", name);
        return Ok(None);
    };

    let declared = attrs.get_req("type")?;
    if declared.parse::<ParameterType>().ok() != Some(expected) {
        return Err(DeserializeError::TypeMismatch {
            name: known.to_string(),
            expected,
            found: declared.to_string(),
        });
    }

    let value = attrs.get_req("value")?;
    let invalid = |reason: String| DeserializeError::InvalidValue {
        name: known.to_string(),
        value: value.to_string(),
        reason,
    };

    match expected {
        ParameterType::Bool => {
            let flag = parse_bool(value).ok_or_else(|| invalid("expected 0 or 1".to_string()))?;
            match known {
                schema::AUTOMATIC_STEP_SIZE => problem.set_automatic_step_size(flag),
                schema::TIME_SERIES_REQUESTED => problem.set_time_series_requested(flag),
                schema::OUTPUT_EVENT => problem.set_output_event(flag),
                schema::START_IN_STEADY_STATE => problem.set_start_in_steady_state(flag),
                schema::CONTINUE_SIMULTANEOUS_EVENTS => {
                    problem.set_continue_simultaneous_events(flag)
                }
                _ => problem.set_use_values(flag),
            }
        }
        ParameterType::UnsignedInteger => {
            let count = value
                .trim()
                .parse::<u32>()
                .map_err(|e| invalid(e.to_string()))?;
            problem.set_step_number(count);
        }
        ParameterType::Float => {
            let number = value
                .trim()
                .parse::<f64>()
                .map_err(|e| invalid(e.to_string()))?;
            match known {
                schema::STEP_SIZE => problem.set_step_size(number),
                schema::DURATION => problem.set_duration(number),
                _ => problem.set_output_start_time(number),
            }
        }
        ParameterType::String => {
            problem
                .set_values_str(value)
                .map_err(|e| invalid(e.to_string()))?;
        }
    }

    Ok(Some(known))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(xml: &str) -> Result<TrajectoryProblem, DeserializeError> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);
        let mut buf = Vec::new();
        deserialize_document(&mut reader, &mut buf)
    }

    #[test]
    fn test_missing_parameters_keep_defaults() {
        let problem = read(
            r#"<Problem><Parameter name="Duration" type="float" value="20"/></Problem>"#,
        )
        .unwrap();
        assert_eq!(problem.duration(), 20.0);
        assert_eq!(problem.step_number(), 100);
        assert_eq!(problem.anchor(), StepAnchor::StepNumber);
    }

    #[test]
    fn test_step_size_only_restores_size_anchor() {
        let problem = read(
            r#"<Problem><Parameter name="StepSize" type="float" value="0.5"/></Problem>"#,
        )
        .unwrap();
        assert_eq!(problem.step_size(), 0.5);
        assert_eq!(problem.anchor(), StepAnchor::StepSize);
    }

    #[test]
    fn test_anchor_follows_stored_pair() {
        // ceil(1 / 0.3) = 4, but 1 / 4 != 0.3: only the size anchor fits.
        let problem = read(
            r#"<Problem>
                 <Parameter name="StepNumber" type="unsignedInteger" value="4"/>
                 <Parameter name="StepSize" type="float" value="0.3"/>
                 <Parameter name="Duration" type="float" value="1"/>
               </Problem>"#,
        )
        .unwrap();
        assert_eq!(problem.anchor(), StepAnchor::StepSize);

        let problem = read(
            r#"<Problem>
                 <Parameter name="StepNumber" type="unsignedInteger" value="4"/>
                 <Parameter name="StepSize" type="float" value="0.25"/>
                 <Parameter name="Duration" type="float" value="1"/>
               </Problem>"#,
        )
        .unwrap();
        assert_eq!(problem.anchor(), StepAnchor::StepNumber);
    }

    #[test]
    fn test_unknown_parameter_is_skipped() {
        let problem = read(
            r#"<Problem>
                 <Parameter name="Deterministic" type="bool" value="1"/>
                 <Parameter name="StepNumber" type="unsignedInteger" value="7"/>
               </Problem>"#,
        )
        .unwrap();
        assert_eq!(problem.step_number(), 7);
    }

    #[test]
    fn test_type_mismatch_names_parameter() {
        let err = read(
            r#"<Problem><Parameter name="StepNumber" type="float" value="7"/></Problem>"#,
        )
        .unwrap_err();
        assert!(matches!(err, DeserializeError::TypeMismatch { .. }));
        assert_eq!(err.parameter(), Some("StepNumber"));
    }

    #[test]
    fn test_invalid_value_names_parameter() {
        let err = read(
            r#"<Problem><Parameter name="StepNumber" type="unsignedInteger" value="-3"/></Problem>"#,
        )
        .unwrap_err();
        assert_eq!(err.parameter(), Some("StepNumber"));

        let err = read(
            r#"<Problem><Parameter name="Use Values" type="bool" value="maybe"/></Problem>"#,
        )
        .unwrap_err();
        assert_eq!(err.parameter(), Some("Use Values"));
    }

    #[test]
    fn test_finds_time_course_task_in_document() {
        let problem = read(
            r#"<?xml version="1.0" encoding="UTF-8"?>
            <COPASI>
              <ListOfTasks>
                <Task key="Task_1" name="Steady-State" type="steadyState">
                  <Problem>
                    <Parameter name="Duration" type="float" value="999"/>
                  </Problem>
                </Task>
                <Task key="Task_2" name="Time-Course" type="timeCourse">
                  <Report reference="Report_1" target="" append="1"/>
                  <Problem>
                    <Parameter name="Duration" type="float" value="50"/>
                  </Problem>
                </Task>
              </ListOfTasks>
            </COPASI>"#,
        )
        .unwrap();
        assert_eq!(problem.duration(), 50.0);
    }

    #[test]
    fn test_document_without_problem() {
        assert!(matches!(
            read("<COPASI><ListOfTasks/></COPASI>"),
            Err(DeserializeError::NoProblem)
        ));
    }

    #[test]
    fn test_truncated_problem() {
        assert!(read(r#"<Problem><Parameter name="Duration" type="float" value="1"/>"#).is_err());
    }

    #[test]
    fn test_deserialize_problem_rejects_other_root() {
        let mut reader = Reader::from_str("<Task/>");
        let mut buf = Vec::new();
        assert!(matches!(
            deserialize_problem(&mut reader, &mut buf),
            Err(DeserializeError::UnexpectedElement { .. })
        ));
    }
}
