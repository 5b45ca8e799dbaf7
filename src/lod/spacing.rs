//! Spacing model
//!
//! A point's native spacing shrinks by half per LOD level. The jitter term
//! pushes each point a random fraction of a level further, which blends the
//! discrete levels into a continuous density falloff instead of visible bands.

use crate::constants::selection::{
    CENTER_FALLOFF, JITTER_MAX, JITTER_MULTIPLIER, MIN_CENTER_WEIGHT, TARGET_SPACING_DIVISOR,
};
use crate::point::Point;
use crate::view::ViewParameters;
use glam::Vec2;

/// Deterministic per-point jitter in [0, 1)
///
/// Pure function of the coordinate sum, so a point keeps its jitter across
/// passes regardless of thread count or dispatch order.
#[inline]
pub fn jitter(point: &Point) -> f32 {
    hash_to_unit(point.x + point.y + point.z)
}

/// `fract(cos(n) * k)` with GLSL `fract` semantics (`v - floor(v)`)
#[inline]
pub fn hash_to_unit(n: f32) -> f32 {
    let v = n.cos() * JITTER_MULTIPLIER;
    (v - v.floor()).min(JITTER_MAX)
}

/// Spacing the point's own level provides: `scale * spacing / 2^(level + jitter)`
#[inline]
pub fn native_spacing(scale: f32, base_spacing: f32, level: u8, jitter: f32) -> f32 {
    scale * base_spacing / (level as f32 + jitter).exp2()
}

/// Spacing the view requires at world distance `d` and screen-center distance `dc`
#[inline]
pub fn target_spacing(distance: f32, center_distance: f32, clod: f32) -> f32 {
    let center_weight = (1.0 - CENTER_FALLOFF * center_distance).max(MIN_CENTER_WEIGHT);
    (distance * clod) / (TARGET_SPACING_DIVISOR * center_weight)
}

/// Both sides of the spacing comparison for one point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpacingSample {
    pub jitter: f32,
    pub native: f32,
    pub target: f32,
}

impl SpacingSample {
    /// Evaluate a visible point given its clip-space x/y
    pub fn evaluate(point: &Point, projected_xy: Vec2, view: &ViewParameters) -> Self {
        let jitter = jitter(point);
        let native = native_spacing(view.scale, view.spacing, point.level(), jitter);

        let world_position = view.world.transform_point3(point.position());
        let distance = world_position.distance(view.pivot);
        let center_distance = projected_xy.length();
        let target = target_spacing(distance, center_distance, view.clod);

        Self {
            jitter,
            native,
            target,
        }
    }

    /// Finer than required means a coarser level already covers this region
    #[inline]
    pub fn is_too_fine(&self) -> bool {
        self.native < self.target
    }
}
