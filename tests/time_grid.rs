//! Grid resolution and output schedule tests.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use trajectory::{
    GridError, GridWarning, MAX_OUTPUT_POINTS, OutputValues, StepAnchor, TrajectoryProblem,
};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn problem(duration: f64) -> TrajectoryProblem {
    let mut problem = TrajectoryProblem::new();
    problem.set_duration(duration);
    problem
}

#[test]
fn test_step_number_anchor_derives_size() -> anyhow::Result<()> {
    init();
    let mut problem = problem(10.0);
    problem.set_step_number(40);

    let grid = problem.time_grid()?.unwrap();
    assert_eq!(grid.step_number, 40);
    assert_eq!(grid.step_size, 0.25);
    Ok(())
}

#[test]
fn test_step_size_anchor_derives_number() -> anyhow::Result<()> {
    init();
    let mut problem = problem(10.0);
    problem.set_step_size(0.3);

    let resolved = problem.time_grid()?;
    assert!(resolved.is_ok());
    let grid = resolved.unwrap();
    assert_eq!(grid.step_number, 34);
    assert_eq!(grid.step_size, 0.3);
    Ok(())
}

#[test]
fn test_sync_writes_back_and_keeps_anchor() -> anyhow::Result<()> {
    init();
    let mut problem = problem(2.0);
    problem.set_step_size(0.5);

    let warnings = problem.sync()?;
    assert!(warnings.is_empty());
    assert_eq!(problem.step_number(), 4);
    assert_eq!(problem.step_size(), 0.5);
    assert_eq!(problem.anchor(), StepAnchor::StepSize);
    Ok(())
}

#[test]
fn test_sign_is_corrected_for_backward_run() -> anyhow::Result<()> {
    init();
    let mut problem = problem(-4.0);
    problem.set_step_size(1.0);

    let (grid, warnings) = problem.time_grid()?.into();
    assert_eq!(grid.step_size, -1.0);
    assert_eq!(grid.step_number, 4);
    assert_eq!(
        warnings,
        vec![GridWarning::StepSizeSignCorrected {
            requested: 1.0,
            used: -1.0
        }]
    );
    Ok(())
}

#[test]
fn test_grid_errors() {
    let mut zero = problem(1.0);
    zero.set_step_number(0);
    assert_eq!(zero.time_grid().unwrap_err(), GridError::ZeroStepNumber);

    let infinite = problem(f64::INFINITY);
    assert!(matches!(
        infinite.time_grid(),
        Err(GridError::NonFinite { field: "Duration", .. })
    ));
}

#[test]
fn test_schedule_uniform_points() -> anyhow::Result<()> {
    init();
    let mut problem = problem(1.0);
    problem.set_step_number(4);

    let schedule = problem.output_schedule(0.0)?;
    assert_eq!(schedule.times(), &[0.0, 0.25, 0.5, 0.75, 1.0]);
    assert!(schedule.warnings().is_empty());
    Ok(())
}

#[test]
fn test_schedule_respects_output_start() -> anyhow::Result<()> {
    let mut problem = problem(1.0);
    problem.set_step_number(4);
    problem.set_output_start_time(0.5);

    let schedule = problem.output_schedule(0.0)?;
    assert_eq!(schedule.times(), &[0.5, 0.75, 1.0]);
    Ok(())
}

#[test]
fn test_schedule_merges_explicit_values() -> anyhow::Result<()> {
    let mut problem = problem(1.0);
    problem.set_step_number(2);
    problem.set_use_values(true);
    problem.set_values(OutputValues::from(vec![0.5, 0.1, 3.0]));

    let schedule = problem.output_schedule(0.0)?;
    // 3.0 lies beyond the end and 0.5 is already a grid point.
    assert_eq!(schedule.times(), &[0.0, 0.1, 0.5, 1.0]);
    Ok(())
}

#[test]
fn test_schedule_values_ignored_unless_enabled() -> anyhow::Result<()> {
    let mut problem = problem(1.0);
    problem.set_step_number(1);
    problem.set_values(OutputValues::from(vec![0.3]));

    assert_eq!(problem.output_schedule(0.0)?.times(), &[0.0, 1.0]);
    Ok(())
}

#[test]
fn test_schedule_automatic_step_size() -> anyhow::Result<()> {
    let mut problem = problem(5.0);
    problem.set_automatic_step_size(true);

    let schedule = problem.output_schedule(1.0)?;
    assert_eq!(schedule.times(), &[1.0, 6.0]);
    Ok(())
}

#[test]
fn test_schedule_backward_run() -> anyhow::Result<()> {
    let mut problem = problem(-1.0);
    problem.set_step_number(2);
    problem.set_output_start_time(10.0);

    let schedule = problem.output_schedule(10.0)?;
    assert_eq!(schedule.times(), &[10.0, 9.5, 9.0]);
    assert_eq!(schedule.end_time(), 9.0);
    Ok(())
}

#[test]
fn test_schedule_output_start_after_end() -> anyhow::Result<()> {
    init();
    let mut problem = problem(1.0);
    problem.set_output_start_time(5.0);

    let schedule = problem.output_schedule(0.0)?;
    assert!(schedule.is_empty());
    assert!(matches!(
        schedule.warnings(),
        [GridWarning::OutputStartAfterEnd { .. }]
    ));
    Ok(())
}

#[test]
fn test_schedule_refuses_oversized_grids() {
    init();
    let mut by_number = problem(1.0);
    by_number.set_step_number(u32::MAX);
    assert!(by_number.time_grid().is_ok());
    assert_eq!(
        by_number.output_schedule(0.0).unwrap_err(),
        GridError::TooManyPoints {
            points: u64::from(u32::MAX) + 1,
            limit: MAX_OUTPUT_POINTS,
        }
    );

    // A zero step size is clamped to the smallest usable step, which
    // still needs u32::MAX steps.
    let mut by_size = problem(1.0);
    by_size.set_step_size(0.0);
    assert_eq!(by_size.time_grid().unwrap().unwrap().step_number, u32::MAX);
    assert!(matches!(
        by_size.output_schedule(0.0),
        Err(GridError::TooManyPoints { .. })
    ));
}

proptest! {
    #[test]
    fn prop_number_anchor_spans_duration(
        duration in -1.0e4f64..1.0e4,
        n in 1u32..10_000,
    ) {
        let mut problem = problem(duration);
        problem.set_step_number(n);

        let grid = problem.time_grid().unwrap().unwrap();
        prop_assert_eq!(grid.step_number, n);
        let span = grid.step_size * f64::from(n);
        prop_assert!((span - duration).abs() <= 1e-9 * duration.abs().max(1.0));
    }

    #[test]
    fn prop_size_anchor_covers_duration(
        duration in 1.0e-3f64..1.0e4,
        size in 1.0e-2f64..1.0e2,
    ) {
        let mut problem = problem(duration);
        problem.set_step_size(size);

        let grid = problem.time_grid().unwrap().unwrap();
        prop_assert_eq!(grid.step_size, size);
        prop_assert!(f64::from(grid.step_number) * size >= duration * (1.0 - 1e-12));
        prop_assert!(f64::from(grid.step_number.saturating_sub(1)) * size < duration);
    }

    #[test]
    fn prop_schedule_is_monotone_and_ends_at_end(
        t0 in -100.0f64..100.0,
        duration in prop_oneof![-1.0e3f64..-1.0e-3, 1.0e-3f64..1.0e3],
        n in 1u32..500,
    ) {
        let mut problem = problem(duration);
        problem.set_step_number(n);
        problem.set_output_start_time(t0);

        let schedule = problem.output_schedule(t0).unwrap();
        let times = schedule.times();
        prop_assert_eq!(times.len(), n as usize + 1);
        prop_assert_eq!(schedule.last(), Some(t0 + duration));
        for pair in times.windows(2) {
            if duration > 0.0 {
                prop_assert!(pair[0] < pair[1]);
            } else {
                prop_assert!(pair[0] > pair[1]);
            }
        }
    }
}
