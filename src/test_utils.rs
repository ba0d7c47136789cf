#![cfg(test)]

// Helper function to assert floating point equality with tolerance
pub fn assert_float_eq(a: f64, b: f64, tolerance: f64) {
    assert!(
        (a - b).abs() < tolerance,
        "Expected {} to be approximately equal to {} (tolerance: {})",
        a,
        b,
        tolerance
    );
}

/// Assert `a` matches `b` within a tolerance relative to `b`.
pub fn assert_relative_eq(a: f64, b: f64, tolerance: f64) {
    let scale = b.abs().max(f64::MIN_POSITIVE);
    assert!(
        (a - b).abs() / scale <= tolerance,
        "Expected {} to be within relative tolerance {} of {}",
        a,
        tolerance,
        b
    );
}

/// A CopasiML problem group with every parameter set away from its default.
pub fn non_default_problem_xml() -> String {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<Problem>
  <Parameter name="AutomaticStepSize" type="bool" value="1"/>
  <Parameter name="StepNumber" type="unsignedInteger" value="42"/>
  <Parameter name="StepSize" type="float" value="0.25"/>
  <Parameter name="Duration" type="float" value="10.5"/>
  <Parameter name="TimeSeriesRequested" type="bool" value="0"/>
  <Parameter name="OutputStartTime" type="float" value="2"/>
  <Parameter name="Output Event" type="bool" value="1"/>
  <Parameter name="Start in Steady State" type="bool" value="1"/>
  <Parameter name="Continue on Simultaneous Events" type="bool" value="1"/>
  <Parameter name="Use Values" type="bool" value="1"/>
  <Parameter name="Values" type="string" value="1 2.5 4"/>
</Problem>"#
        .to_string()
}
