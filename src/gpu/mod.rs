//! wgpu compute backend
//!
//! Runs the same selection kernel as `selection::run_pass`, as a WGSL
//! compute shader whose output feeds an indirect draw directly.

pub mod context;
pub mod layouts;
pub mod pipeline;
pub mod selector;
pub mod shader_source;

pub use context::GpuContext;
pub use layouts::{GpuBatchWindow, GpuViewParameters};
pub use pipeline::{dispatch_dimensions, FilterPointsPipeline};
pub use selector::GpuSelector;
