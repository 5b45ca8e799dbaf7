//! Double-buffered selection spread over several frames
//!
//! The back buffer is filled one batch window per frame. Once the scheduler
//! completes a cycle the back buffer holds a full selection and is swapped
//! to the front, where the render side reads it until the next swap.

use super::scheduler::{BatchScheduler, ScheduledBatch};
use crate::compaction::{DrawParameters, OutputCount};
use crate::config::SelectionConfig;
use crate::error::LodResult;
use crate::point::Point;
use crate::selection::{PassReport, SelectionExecutor};
use crate::view::ViewParameters;
use parking_lot::{RwLock, RwLockReadGuard};
use std::sync::Arc;

/// Output buffer plus the count of valid entries
#[derive(Debug, Default)]
pub struct SelectionBuffer {
    points: Vec<Point>,
    count: OutputCount,
}

impl SelectionBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: vec![Point::default(); capacity],
            count: OutputCount::new(),
        }
    }

    /// Valid entries only, stale slots past the count are never exposed
    pub fn selected(&self) -> &[Point] {
        &self.points[..self.len()]
    }

    pub fn len(&self) -> usize {
        (self.count.load() as usize).min(self.points.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.points.len()
    }

    pub fn draw_parameters(&self) -> DrawParameters {
        self.count.draw_parameters()
    }

    fn resize(&mut self, capacity: usize) {
        self.points.resize(capacity, Point::default());
        self.count.reset();
    }
}

/// Result of one frame of progressive selection
#[derive(Debug, Clone, Copy)]
pub struct FrameOutcome {
    pub batch: ScheduledBatch,
    pub report: PassReport,

    /// The back buffer was completed and is now the front buffer
    pub swapped: bool,
}

pub struct ProgressiveSelection {
    front: Arc<RwLock<SelectionBuffer>>,
    back: SelectionBuffer,
    scheduler: BatchScheduler,
}

impl ProgressiveSelection {
    pub fn new(total: u32, points_per_frame: u32) -> Self {
        Self {
            front: Arc::new(RwLock::new(SelectionBuffer::default())),
            back: SelectionBuffer::with_capacity(total as usize),
            scheduler: BatchScheduler::new(total, points_per_frame),
        }
    }

    pub fn from_config(total: u32, config: &SelectionConfig) -> Self {
        Self::new(total, config.resolved_points_per_frame(total))
    }

    /// Process the next batch window of `input` into the back buffer
    pub fn advance(
        &mut self,
        input: &[Point],
        view: &ViewParameters,
        executor: &SelectionExecutor,
    ) -> LodResult<FrameOutcome> {
        let total = input.len().min(u32::MAX as usize) as u32;
        if total != self.scheduler.total() {
            log::info!(
                "[ProgressiveSelection::advance] Input changed from {} to {} points, restarting cycle",
                self.scheduler.total(),
                total
            );
            self.scheduler.restart(total);
            self.back.resize(total as usize);
        }

        let batch = self.scheduler.next_batch();
        let report = executor.run_pass(
            input,
            view,
            batch.window,
            &mut self.back.points,
            &mut self.back.count,
        )?;

        let swapped = batch.completes_cycle;
        if swapped {
            self.swap_buffers();
        }

        Ok(FrameOutcome {
            batch,
            report,
            swapped,
        })
    }

    fn swap_buffers(&mut self) {
        {
            let mut front = self.front.write();
            std::mem::swap(&mut *front, &mut self.back);
            log::info!(
                "[ProgressiveSelection::swap_buffers] Cycle {} complete, {} points selected",
                self.scheduler.cycles_completed(),
                front.len()
            );
        }

        let capacity = self.scheduler.total() as usize;
        if self.back.capacity() != capacity {
            self.back.resize(capacity);
        } else {
            self.back.count.reset();
        }
    }

    /// Read the last complete selection
    pub fn front(&self) -> RwLockReadGuard<'_, SelectionBuffer> {
        self.front.read()
    }

    /// Shared handle for a render thread
    pub fn shared_front(&self) -> Arc<RwLock<SelectionBuffer>> {
        Arc::clone(&self.front)
    }

    /// Points appended to the back buffer so far in this cycle
    pub fn pending(&self) -> usize {
        self.back.len()
    }

    pub fn scheduler(&self) -> &BatchScheduler {
        &self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn cloud(count: u32) -> Vec<Point> {
        (0..count)
            .map(|i| Point::new(Vec3::new((i % 100) as f32 * 0.01, 0.0, 0.0), 0, i))
            .collect()
    }

    #[test]
    fn test_front_only_changes_on_cycle_completion() {
        let executor = SelectionExecutor::new(2).expect("pool builds");
        let input = cloud(1_000);
        let view = ViewParameters::default();
        let mut progressive = ProgressiveSelection::new(1_000, 300);

        for frame in 0..3 {
            let outcome = progressive.advance(&input, &view, &executor).expect("frame runs");
            assert!(!outcome.swapped, "frame {}", frame);
            assert!(progressive.front().is_empty());
        }
        assert_eq!(progressive.pending(), 900);

        let outcome = progressive.advance(&input, &view, &executor).expect("frame runs");
        assert!(outcome.swapped);
        assert_eq!(outcome.batch.window.size, 100);
        assert_eq!(progressive.front().len(), 1_000);
        assert_eq!(progressive.front().draw_parameters().count, 1_000);
        assert_eq!(progressive.pending(), 0);

        let mut colors: Vec<u32> = progressive.front().selected().iter().map(Point::color).collect();
        colors.sort_unstable();
        assert_eq!(colors, (0..1_000).collect::<Vec<u32>>());
    }

    #[test]
    fn test_changed_input_restarts_cycle() {
        let executor = SelectionExecutor::new(1).expect("pool builds");
        let view = ViewParameters::default();
        let mut progressive = ProgressiveSelection::new(500, 200);

        progressive.advance(&cloud(500), &view, &executor).expect("frame runs");
        assert_eq!(progressive.pending(), 200);

        let outcome = progressive.advance(&cloud(150), &view, &executor).expect("frame runs");
        assert!(outcome.swapped);
        assert_eq!(progressive.front().len(), 150);
        assert_eq!(progressive.scheduler().total(), 150);
    }
}
