/// Per-point level-of-detail selection
///
/// Key components:
/// - Extended-frustum visibility culling
/// - View-dependent spacing model with per-point jitter
/// - Admission gate combining both into a verdict

pub mod admission;
pub mod culling;
pub mod spacing;

pub use admission::{evaluate_point, Verdict};
pub use culling::{cull_point, CullReason, Visibility};
pub use spacing::{hash_to_unit, jitter, native_spacing, target_spacing, SpacingSample};
