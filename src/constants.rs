// clod-select constants - SINGLE SOURCE OF TRUTH
//
// Both the CPU kernel and the WGSL compute shader read these values.
// The GPU side receives them as a generated header (see gpu::shader_source).

/// Tuned selection constants. These encode perceptual calibration, keep the literals.
pub mod selection {
    /// Half-width of the extended frustum in clip units (strict view is 1.0)
    pub const FRUSTUM_EXTENT: f32 = 2.0;

    /// How quickly the density target relaxes away from the screen center
    pub const CENTER_FALLOFF: f32 = 0.7;

    /// Floor of the center weighting term, bounds the peripheral relaxation
    pub const MIN_CENTER_WEIGHT: f32 = 0.3;

    /// Scales `distance * clod` down to spacing units
    pub const TARGET_SPACING_DIVISOR: f32 = 1000.0;

    /// Multiplier inside the jitter hash `fract(cos(n) * k)`
    pub const JITTER_MULTIPLIER: f32 = 123456.789;

    /// Largest f32 strictly below 1.0
    pub const JITTER_MAX: f32 = 1.0 - f32::EPSILON / 2.0;
}

/// Default tuning values for view parameters
pub mod tuning {
    pub const DEFAULT_CLOD: f32 = 1.0;
    pub const DEFAULT_SCALE: f32 = 1.0;
    pub const DEFAULT_SPACING: f32 = 1.0;
}

/// Packed attribute word layout
pub mod attributes {
    /// LOD level lives in the top byte
    pub const LEVEL_SHIFT: u32 = 24;
    pub const LEVEL_MASK: u32 = 0xFF00_0000;

    /// Remaining 24 bits are RGB
    pub const COLOR_MASK: u32 = 0x00FF_FFFF;

    pub const MAX_LEVEL: u8 = u8::MAX;
}

/// Dispatch geometry shared by CPU and GPU paths
pub mod dispatch {
    /// Invocations per group (matches `@workgroup_size` in filter_points.wgsl)
    pub const WORKGROUP_SIZE: u32 = 128;

    /// wgpu limit on workgroups per dispatch dimension
    pub const MAX_WORKGROUPS_PER_DIMENSION: u32 = 65_535;
}

/// Multi-frame distribution defaults
pub mod distribution {
    /// Points processed per frame when the cloud is spread over several frames
    pub const DEFAULT_POINTS_PER_FRAME: u32 = 18_000_000;

    /// Prefix for worker thread names
    pub const WORKER_THREAD_PREFIX: &str = "clod-select";
}
