//! Indirect draw argument block and the shared output counter

use bytemuck::{Pod, Zeroable};
use std::sync::atomic::{AtomicU32, Ordering};

/// Indirect draw arguments produced by a selection pass
/// Matches wgpu's DrawIndirect command layout exactly
/// Total size: 16 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct DrawParameters {
    /// Number of selected points (vertex count)
    pub count: u32,

    /// Number of instances to draw
    pub prim_count: u32,

    /// Offset into the selected point buffer
    pub first: u32,

    /// Offset into the instance buffer
    pub base_instance: u32,
}

impl DrawParameters {
    /// State the host writes before a pass: empty, one instance
    pub const RESET: Self = Self {
        count: 0,
        prim_count: 1,
        first: 0,
        base_instance: 0,
    };

    pub fn new(count: u32) -> Self {
        Self { count, ..Self::RESET }
    }

    pub fn reset(&mut self) {
        *self = Self::RESET;
    }
}

impl Default for DrawParameters {
    fn default() -> Self {
        Self::RESET
    }
}

/// Head of the append-only output buffer
///
/// Only ever advanced through `reserve_slot` or `try_reserve_slot`, both
/// linearizable read-modify-writes: every caller observes a distinct,
/// previously unassigned value. The host resets it between passes.
#[derive(Debug, Default)]
pub struct OutputCount {
    count: AtomicU32,
}

impl OutputCount {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next output slot, returning the pre-increment value
    #[inline]
    pub fn reserve_slot(&self) -> u32 {
        // Slot uniqueness only needs atomicity; the pass join orders the reads
        self.count.fetch_add(1, Ordering::Relaxed)
    }

    /// Reserve the next slot only if it lies below `capacity`
    ///
    /// On `Err` the count is left untouched and holds the current value, so
    /// it keeps matching the number of live entries.
    #[inline]
    pub fn try_reserve_slot(&self, capacity: u32) -> Result<u32, u32> {
        self.count
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |count| {
                (count < capacity).then_some(count + 1)
            })
    }

    /// Read after the pass has completed
    pub fn load(&self) -> u32 {
        self.count.load(Ordering::Acquire)
    }

    pub fn reset(&mut self) {
        *self.count.get_mut() = 0;
    }

    /// Draw arguments for the current count
    pub fn draw_parameters(&self) -> DrawParameters {
        DrawParameters::new(self.load())
    }
}
