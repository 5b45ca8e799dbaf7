//! Continuous level-of-detail point selection
//!
//! Takes a large cloud of LOD-tagged points and, per view, keeps the ones
//! that are visible and coarse enough for their screen position. The kept
//! points are compacted into a dense buffer plus indirect draw arguments.
//!
//! The kernel runs on a rayon pool (`selection`) or as a wgpu compute
//! shader (`gpu`, behind the default `gpu` feature). Both read the same
//! constants. Output order is unspecified, and the jitter hash may differ
//! in the last bits between host and device `cos`.

pub mod batch;
pub mod compaction;
pub mod config;
pub mod constants;
pub mod error;
pub mod lod;
pub mod point;
pub mod selection;
pub mod synthetic;
pub mod view;

#[cfg(feature = "gpu")]
pub mod gpu;

pub use batch::{BatchScheduler, BatchWindow, FrameOutcome, ProgressiveSelection, SelectionBuffer};
pub use compaction::{DrawParameters, OutputCount, PointAppender};
pub use config::{Backend, SelectionConfig};
pub use error::{LodError, LodErrorContext, LodResult};
pub use lod::{cull_point, evaluate_point, CullReason, Verdict, Visibility};
pub use point::Point;
pub use selection::{run_pass, select_all, PassReport, SelectionExecutor};
pub use view::ViewParameters;

#[cfg(feature = "gpu")]
pub use gpu::{GpuContext, GpuSelector};
