/// Batch windows and multi-frame distribution
///
/// A pass only ever processes one contiguous window of the input. The
/// scheduler and progressive selection are host-side policy on top of that:
/// they decide which window runs in which frame.

pub mod progressive;
pub mod scheduler;
pub mod window;

pub use progressive::{FrameOutcome, ProgressiveSelection, SelectionBuffer};
pub use scheduler::{BatchScheduler, ScheduledBatch};
pub use window::BatchWindow;
