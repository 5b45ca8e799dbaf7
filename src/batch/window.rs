//! Contiguous input sub-range processed by one pass

use crate::constants::dispatch::WORKGROUP_SIZE;
use crate::error::{LodError, LodResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BatchWindow {
    pub offset: u32,
    pub size: u32,
}

impl BatchWindow {
    pub fn new(offset: u32, size: u32) -> Self {
        Self { offset, size }
    }

    /// Window covering an entire input buffer
    pub fn full(len: usize) -> Self {
        Self {
            offset: 0,
            size: len.min(u32::MAX as usize) as u32,
        }
    }

    /// One past the last input index (as usize, cannot overflow)
    #[inline]
    pub fn end(&self) -> usize {
        self.offset as usize + self.size as usize
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Whether an invocation with this local index does any work
    #[inline]
    pub fn contains_local(&self, local_index: u32) -> bool {
        local_index < self.size
    }

    /// Input index for a local invocation index
    #[inline]
    pub fn input_index(&self, local_index: u32) -> usize {
        self.offset as usize + local_index as usize
    }

    /// Groups of `WORKGROUP_SIZE` invocations needed to cover the window
    pub fn workgroup_count(&self) -> u32 {
        self.size.div_ceil(WORKGROUP_SIZE)
    }

    /// Check the window against an input buffer of `len` points
    pub fn validate(&self, len: usize) -> LodResult<()> {
        if self.end() > len {
            return Err(LodError::BatchOutOfBounds {
                offset: self.offset,
                size: self.size,
                len,
            });
        }
        Ok(())
    }
}
