/// Parallel selection passes on the CPU
///
/// The executor mirrors the compute dispatch: workgroups of invocations,
/// one per input point of the batch window, compacting admitted points
/// through an atomic counter.

pub mod executor;
pub mod report;

pub use executor::{run_pass, select_all, SelectionExecutor};
pub use report::PassReport;
