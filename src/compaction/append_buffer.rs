//! Lock-free stream compaction into a dense output slice

use super::draw_parameters::OutputCount;
use crate::error::{LodError, LodResult};
use crate::point::Point;
use std::marker::PhantomData;

/// Shared append handle over an output slice for the duration of one pass
///
/// Every append reserves a slot with a fetch-and-add on the output count
/// and then writes into that slot. Reserved slots are unique, so concurrent
/// appends never touch the same element.
pub struct PointAppender<'a> {
    slots: *mut Point,
    capacity: usize,
    count: &'a OutputCount,
    _output: PhantomData<&'a mut [Point]>,
}

// SAFETY: The appender only writes through `slots` at indices handed out by
// `OutputCount::try_reserve_slot`, which never returns the same value twice while
// the appender holds the exclusive borrows of both the slice and the counter.
// Point is plain data, so moving writes across threads is sound.
unsafe impl Send for PointAppender<'_> {}
unsafe impl Sync for PointAppender<'_> {}

impl<'a> PointAppender<'a> {
    /// Borrow the output slice and counter exclusively for one pass
    pub fn new(output: &'a mut [Point], count: &'a mut OutputCount) -> Self {
        Self {
            slots: output.as_mut_ptr(),
            capacity: output.len(),
            count,
            _output: PhantomData,
        }
    }

    /// Append a point, returning the slot it was written to
    ///
    /// A full output reports `OutputOverflow` without advancing the count,
    /// so the count still equals the number of written entries.
    #[inline]
    pub fn push(&self, point: Point) -> LodResult<u32> {
        let bound = self.capacity.min(u32::MAX as usize) as u32;
        let slot = self
            .count
            .try_reserve_slot(bound)
            .map_err(|slot| LodError::OutputOverflow {
                slot,
                capacity: self.capacity,
            })?;
        let index = slot as usize;

        // SAFETY: try_reserve_slot only grants index < capacity, which keeps
        // the write inside the borrowed slice, and the slot was reserved by
        // this call alone (see the Sync impl).
        unsafe {
            self.slots.add(index).write(point);
        }

        Ok(slot)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots still free before the output is full
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.count.load() as usize)
    }
}
