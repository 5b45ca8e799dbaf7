//! Uniform layouts shared with `filter_points.wgsl`
//!
//! Field order and padding follow WGSL uniform alignment. Sizes are pinned
//! by tests below; changing a struct here means changing the shader too.

use crate::batch::BatchWindow;
use crate::view::ViewParameters;
use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuViewParameters {
    pub transform: [[f32; 4]; 4],
    pub world: [[f32; 4]; 4],
    /// xyz = pivot, w unused
    pub pivot: [f32; 4],
    pub screen_size: [f32; 2],
    pub clod: f32,
    pub scale: f32,
    pub spacing: f32,
    pub frustum_extent: f32,
    pub _padding: [f32; 2],
}

impl From<&ViewParameters> for GpuViewParameters {
    fn from(view: &ViewParameters) -> Self {
        Self {
            transform: view.transform.to_cols_array_2d(),
            world: view.world.to_cols_array_2d(),
            pivot: view.pivot.extend(0.0).to_array(),
            screen_size: view.screen_size.to_array(),
            clod: view.clod,
            scale: view.scale,
            spacing: view.spacing,
            frustum_extent: view.frustum_extent,
            _padding: [0.0; 2],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct GpuBatchWindow {
    pub offset: u32,
    pub size: u32,
    pub _padding: [u32; 2],
}

impl From<BatchWindow> for GpuBatchWindow {
    fn from(window: BatchWindow) -> Self {
        Self {
            offset: window.offset,
            size: window.size,
            _padding: [0; 2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec3};
    use std::mem::{align_of, size_of};

    #[test]
    fn test_uniform_sizes() {
        assert_eq!(size_of::<GpuViewParameters>(), 176);
        assert_eq!(size_of::<GpuViewParameters>() % 16, 0);
        assert_eq!(size_of::<GpuBatchWindow>(), 16);
        assert_eq!(align_of::<GpuViewParameters>(), 4);
    }

    #[test]
    fn test_view_conversion_is_column_major() {
        let view = ViewParameters {
            transform: Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)),
            pivot: Vec3::new(4.0, 5.0, 6.0),
            clod: 2.0,
            ..ViewParameters::default()
        };
        let gpu = GpuViewParameters::from(&view);

        // Translation lives in the fourth column
        assert_eq!(gpu.transform[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(gpu.pivot, [4.0, 5.0, 6.0, 0.0]);
        assert_eq!(gpu.clod, 2.0);
        assert_eq!(gpu.frustum_extent, view.frustum_extent);
    }
}
