//! Spreads selection of one cloud over several frames
//!
//! Each frame processes the next window of the input. When the last window
//! of a cloud has been handed out the cycle is complete and the scheduler
//! wraps to the start for the next cycle.

use super::window::BatchWindow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchScheduler {
    total: u32,
    points_per_frame: u32,
    next_offset: u32,
    cycles_completed: u64,
}

/// Window for this frame and whether it finishes the current cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledBatch {
    pub window: BatchWindow,
    pub completes_cycle: bool,
}

impl BatchScheduler {
    pub fn new(total: u32, points_per_frame: u32) -> Self {
        if points_per_frame == 0 {
            log::warn!("[BatchScheduler::new] points_per_frame of 0 clamped to 1");
        }
        Self {
            total,
            points_per_frame: points_per_frame.max(1),
            next_offset: 0,
            cycles_completed: 0,
        }
    }

    /// Hand out the window for the next frame
    pub fn next_batch(&mut self) -> ScheduledBatch {
        let remaining = self.total - self.next_offset;
        let size = remaining.min(self.points_per_frame);
        let window = BatchWindow::new(self.next_offset, size);

        let completes_cycle = size == remaining;
        if completes_cycle {
            self.next_offset = 0;
            self.cycles_completed += 1;
        } else {
            self.next_offset += size;
        }

        ScheduledBatch {
            window,
            completes_cycle,
        }
    }

    /// Frames needed for one full pass over the cloud (at least one)
    pub fn frames_per_cycle(&self) -> u32 {
        self.total.div_ceil(self.points_per_frame).max(1)
    }

    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    /// Fraction of the current cycle already handed out
    pub fn progress(&self) -> f32 {
        if self.total == 0 {
            return 1.0;
        }
        self.next_offset as f32 / self.total as f32
    }

    /// Abandon the current cycle, e.g. after the input cloud changed
    pub fn restart(&mut self, total: u32) {
        self.total = total;
        self.next_offset = 0;
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn points_per_frame(&self) -> u32 {
        self.points_per_frame
    }
}
