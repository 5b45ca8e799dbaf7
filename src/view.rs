//! Per-pass view parameters
//!
//! Produced by the host once per pass (or once per frame when selection is
//! spread over several frames) and read-only for the duration of the pass.

use crate::config::SelectionConfig;
use crate::constants::{selection::FRUSTUM_EXTENT, tuning};
use glam::{Mat4, Vec2, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewParameters {
    /// Combined model-view-projection matrix
    pub transform: Mat4,

    /// Model matrix, used for the world-space distance to the pivot
    pub world: Mat4,

    /// Screen dimensions in pixels
    pub screen_size: Vec2,

    /// Reference position for distance computation (usually the camera)
    pub pivot: Vec3,

    /// Global continuous-LOD factor, larger values select fewer points
    pub clod: f32,

    pub scale: f32,

    /// Base point spacing of the coarsest level
    pub spacing: f32,

    /// Half-width of the extended frustum in clip units
    pub frustum_extent: f32,
}

impl ViewParameters {
    /// Create view parameters with default tuning values
    pub fn new(transform: Mat4, world: Mat4, screen_size: Vec2, pivot: Vec3) -> Self {
        Self {
            transform,
            world,
            screen_size,
            pivot,
            clod: tuning::DEFAULT_CLOD,
            scale: tuning::DEFAULT_SCALE,
            spacing: tuning::DEFAULT_SPACING,
            frustum_extent: FRUSTUM_EXTENT,
        }
    }

    /// Build from separate camera matrices. The pivot is the camera position.
    pub fn from_camera(
        view: Mat4,
        projection: Mat4,
        world: Mat4,
        screen_size: Vec2,
        camera_position: Vec3,
    ) -> Self {
        Self::new(projection * view * world, world, screen_size, camera_position)
    }

    /// Apply tuning values from a configuration
    pub fn with_config(mut self, config: &SelectionConfig) -> Self {
        self.clod = config.clod;
        self.scale = config.scale;
        self.spacing = config.spacing;
        self.frustum_extent = config.frustum_extent;
        self
    }

    pub fn with_clod(mut self, clod: f32) -> Self {
        self.clod = clod;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_frustum_extent(mut self, extent: f32) -> Self {
        self.frustum_extent = extent;
        self
    }
}

impl Default for ViewParameters {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Mat4::IDENTITY, Vec2::new(1920.0, 1080.0), Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_camera_composes_mvp() {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);
        let projection = Mat4::perspective_rh(60f32.to_radians(), 16.0 / 9.0, 0.1, 100.0);
        let world = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));

        let params = ViewParameters::from_camera(
            view,
            projection,
            world,
            Vec2::new(1280.0, 720.0),
            Vec3::new(0.0, 0.0, 10.0),
        );

        let expected = projection * view * world;
        assert!(params.transform.abs_diff_eq(expected, 1e-6));
        assert_eq!(params.world, world);
        assert_eq!(params.pivot, Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(params.frustum_extent, FRUSTUM_EXTENT);
    }

    #[test]
    fn test_config_overrides_tuning() {
        let config = SelectionConfig {
            clod: 4.0,
            scale: 0.5,
            spacing: 2.0,
            frustum_extent: 1.5,
            ..SelectionConfig::default()
        };
        let params = ViewParameters::default().with_config(&config);
        assert_eq!(params.clod, 4.0);
        assert_eq!(params.scale, 0.5);
        assert_eq!(params.spacing, 2.0);
        assert_eq!(params.frustum_extent, 1.5);
    }
}
