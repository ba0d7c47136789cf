//! Explicit output time points.
//!
//! A time-course run can report state at user-listed times in addition to
//! its regular grid. The list is entered as free text, e.g. `"0.5 1, 2.25"`,
//! and stored as a sorted set without duplicates.

use std::{fmt, str::FromStr};

use nom::{
    Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::multispace1,
    combinator::{all_consuming, value, verify},
    multi::{many0, many1, separated_list0},
    number::complete::double,
    sequence::delimited,
};
use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised when a values list contains something that is not a number.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Invalid output value '{token}' at position {position}")]
pub struct ValuesParseError {
    /// Byte offset of the offending token in the input.
    pub position: usize,
    /// The offending token (up to the next separator).
    pub token: String,
}

/// A sorted set of output times.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<f64>", into = "Vec<f64>")]
pub struct OutputValues {
    points: Vec<f64>,
}

impl OutputValues {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points inside the closed interval spanned by `a` and `b`, in ascending order.
    pub fn within(&self, a: f64, b: f64) -> impl Iterator<Item = f64> + '_ {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        self.points
            .iter()
            .copied()
            .filter(move |t| *t >= lo && *t <= hi)
    }
}

/// Non-finite points are dropped; they cannot be stored or reached by a run.
impl FromIterator<f64> for OutputValues {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut points: Vec<f64> = iter
            .into_iter()
            .filter(|point| {
                if !point.is_finite() {
                    warn!("dropping non-finite output value {}", point);
                }
                point.is_finite()
            })
            .collect();
        points.sort_by(f64::total_cmp);
        points.dedup();
        Self { points }
    }
}

impl From<Vec<f64>> for OutputValues {
    fn from(points: Vec<f64>) -> Self {
        points.into_iter().collect()
    }
}

impl From<OutputValues> for Vec<f64> {
    fn from(values: OutputValues) -> Self {
        values.points
    }
}

impl<'a> IntoIterator for &'a OutputValues {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl FromStr for OutputValues {
    type Err = ValuesParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_values(s).map(OutputValues::from)
    }
}

impl fmt::Display for OutputValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, point) in self.points.iter().enumerate() {
            if idx > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", point)?;
        }
        Ok(())
    }
}

/// One or more separators: whitespace and/or commas.
fn separator(input: &str) -> nom::IResult<&str, ()> {
    value((), many1(alt((multispace1, tag(","))))).parse(input)
}

/// Optional separators at either end of the list.
fn padding(input: &str) -> nom::IResult<&str, ()> {
    value((), many0(alt((multispace1, tag(","))))).parse(input)
}

fn finite_number(input: &str) -> nom::IResult<&str, f64> {
    verify(double, |v: &f64| v.is_finite()).parse(input)
}

/// Parse a whitespace/comma separated list of finite numbers.
pub fn parse_values(input: &str) -> Result<Vec<f64>, ValuesParseError> {
    let mut list = all_consuming(delimited(
        padding,
        separated_list0(separator, finite_number),
        padding,
    ));

    match list.parse(input) {
        Ok((_, points)) => Ok(points),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let position = input.len() - e.input.len();
            let token = e
                .input
                .split(|c: char| c.is_whitespace() || c == ',')
                .find(|t| !t.is_empty())
                .unwrap_or_default()
                .to_string();
            Err(ValuesParseError { position, token })
        }
        Err(nom::Err::Incomplete(_)) => Err(ValuesParseError {
            position: input.len(),
            token: String::new(),
        }),
    }
}
