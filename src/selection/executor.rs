//! CPU execution of the selection kernel
//!
//! One invocation per input point, grouped into workgroups of
//! `WORKGROUP_SIZE` the way the compute shader is dispatched. Groups run in
//! parallel on a rayon pool; invocations past the end of the batch window
//! exit without touching the output or the counter.

use super::report::PassReport;
use crate::batch::BatchWindow;
use crate::compaction::{OutputCount, PointAppender};
use crate::config::SelectionConfig;
use crate::constants::{dispatch::WORKGROUP_SIZE, distribution::WORKER_THREAD_PREFIX};
use crate::error::{LodError, LodResult};
use crate::lod::evaluate_point;
use crate::point::Point;
use crate::view::ViewParameters;
use rayon::prelude::*;
use std::time::Instant;

/// Runs selection passes on a dedicated worker pool
pub struct SelectionExecutor {
    thread_pool: rayon::ThreadPool,
}

impl SelectionExecutor {
    pub fn new(num_threads: usize) -> LodResult<Self> {
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("{}-{}", WORKER_THREAD_PREFIX, i))
            .build()?;

        log::info!(
            "[SelectionExecutor::new] Created selection pool with {} threads",
            thread_pool.current_num_threads()
        );

        Ok(Self { thread_pool })
    }

    pub fn from_config(config: &SelectionConfig) -> LodResult<Self> {
        Self::new(config.resolved_worker_threads())
    }

    pub fn num_threads(&self) -> usize {
        self.thread_pool.current_num_threads()
    }

    /// Run one pass on this executor's pool
    pub fn run_pass(
        &self,
        input: &[Point],
        view: &ViewParameters,
        window: BatchWindow,
        output: &mut [Point],
        count: &mut OutputCount,
    ) -> LodResult<PassReport> {
        self.thread_pool
            .install(|| run_pass(input, view, window, output, count))
    }

    /// Select from the whole input into a freshly allocated buffer
    pub fn select_all(&self, input: &[Point], view: &ViewParameters) -> LodResult<Vec<Point>> {
        self.thread_pool.install(|| select_all(input, view))
    }
}

/// Run one selection pass on the current rayon pool.
///
/// Appends admitted points from `input[window]` to `output` starting at the
/// current value of `count`. The host resets `count` when a new selection
/// begins; several windows may append into the same output in between.
pub fn run_pass(
    input: &[Point],
    view: &ViewParameters,
    window: BatchWindow,
    output: &mut [Point],
    count: &mut OutputCount,
) -> LodResult<PassReport> {
    window.validate(input.len())?;

    let start_count = count.load();
    let required = start_count as usize + window.size as usize;
    if required > output.len() {
        return Err(LodError::OutputTooSmall {
            required,
            capacity: output.len(),
        });
    }

    let started = Instant::now();
    {
        let appender = PointAppender::new(output, count);
        (0..window.workgroup_count())
            .into_par_iter()
            .try_for_each(|group| run_workgroup(group, input, view, window, &appender))?;
    }
    let elapsed = started.elapsed();

    let total_count = count.load();
    let report = PassReport {
        window,
        admitted: total_count - start_count,
        total_count,
        elapsed,
    };

    log::debug!(
        "[selection::run_pass] window {}+{}: admitted {} ({} total) in {:.3}ms, {:.1}M points/ms",
        window.offset,
        window.size,
        report.admitted,
        total_count,
        elapsed.as_secs_f64() * 1000.0,
        report.throughput_points_per_ms() / 1.0e6
    );

    Ok(report)
}

/// Select from the whole input into a freshly allocated buffer
pub fn select_all(input: &[Point], view: &ViewParameters) -> LodResult<Vec<Point>> {
    let mut output = vec![Point::default(); input.len()];
    let mut count = OutputCount::new();
    run_pass(input, view, BatchWindow::full(input.len()), &mut output, &mut count)?;
    output.truncate(count.load() as usize);
    Ok(output)
}

fn run_workgroup(
    group: u32,
    input: &[Point],
    view: &ViewParameters,
    window: BatchWindow,
    appender: &PointAppender<'_>,
) -> LodResult<()> {
    let first = group * WORKGROUP_SIZE;
    for local_index in first..first.saturating_add(WORKGROUP_SIZE) {
        invoke(local_index, input, view, window, appender)?;
    }
    Ok(())
}

/// One invocation: cull, test spacing, append
#[inline]
fn invoke(
    local_index: u32,
    input: &[Point],
    view: &ViewParameters,
    window: BatchWindow,
    appender: &PointAppender<'_>,
) -> LodResult<()> {
    if !window.contains_local(local_index) {
        return Ok(());
    }

    let point = &input[window.input_index(local_index)];
    if evaluate_point(point, view).is_admitted() {
        appender.push(*point)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn line_of_points(count: u32) -> Vec<Point> {
        (0..count)
            .map(|i| Point::new(Vec3::new(i as f32 * 0.001, 0.0, 0.0), 0, i))
            .collect()
    }

    #[test]
    fn test_window_outside_input_is_rejected() {
        let input = line_of_points(10);
        let mut output = vec![Point::default(); 10];
        let mut count = OutputCount::new();
        let result = run_pass(
            &input,
            &ViewParameters::default(),
            BatchWindow::new(5, 6),
            &mut output,
            &mut count,
        );
        assert!(matches!(result, Err(LodError::BatchOutOfBounds { .. })));
        assert_eq!(count.load(), 0);
    }

    #[test]
    fn test_output_sized_against_current_count() {
        let input = line_of_points(10);
        let mut output = vec![Point::default(); 10];
        let mut count = OutputCount::new();
        count.reserve_slot();

        let result = run_pass(
            &input,
            &ViewParameters::default(),
            BatchWindow::full(10),
            &mut output,
            &mut count,
        );
        assert!(matches!(
            result,
            Err(LodError::OutputTooSmall { required: 11, capacity: 10 })
        ));
    }

    #[test]
    fn test_partial_workgroup_only_touches_window() {
        // 130 points, window of 3 in the middle: 1 workgroup of 128 invocations
        let input = line_of_points(130);
        let mut output = vec![Point::default(); 3];
        let mut count = OutputCount::new();

        let report = run_pass(
            &input,
            &ViewParameters::default(),
            BatchWindow::new(60, 3),
            &mut output,
            &mut count,
        )
        .expect("pass succeeds");

        assert_eq!(report.admitted, 3);
        let mut colors: Vec<u32> = output.iter().map(Point::color).collect();
        colors.sort_unstable();
        assert_eq!(colors, vec![60, 61, 62]);
    }

    #[test]
    fn test_executor_uses_requested_threads() {
        let executor = SelectionExecutor::new(2).expect("pool builds");
        assert_eq!(executor.num_threads(), 2);

        let input = line_of_points(1_000);
        let selected = executor
            .select_all(&input, &ViewParameters::default())
            .expect("pass succeeds");
        assert_eq!(selected.len(), 1_000);
    }
}
