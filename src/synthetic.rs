//! Synthetic LOD-tagged clouds for tests, benches and the demo binary
//!
//! Points are scattered over a gently rolling surface. Each level holds four
//! times the points of the one above it, which doubles linear density per
//! level the way a surface sampled by an octree does.

use crate::point::Point;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Levels generated by `generate_layered_cloud`
pub const SYNTHETIC_LEVELS: u8 = 6;

/// Number of points each level receives out of `count`
///
/// Proportional to `4^level`; rounding leftovers go to the finest level.
pub fn level_populations(count: usize, levels: u8) -> Vec<usize> {
    if levels == 0 {
        return Vec::new();
    }

    let weights: Vec<f64> = (0..levels).map(|level| 4f64.powi(level as i32)).collect();
    let total_weight: f64 = weights.iter().sum();

    let mut populations: Vec<usize> = weights
        .iter()
        .map(|weight| (count as f64 * weight / total_weight).floor() as usize)
        .collect();

    let assigned: usize = populations.iter().sum();
    if let Some(finest) = populations.last_mut() {
        *finest += count - assigned;
    }
    populations
}

/// Generate `count` points in `[-half_extent, half_extent]` on x/y, coarse levels first
pub fn generate_layered_cloud(count: usize, half_extent: f32, seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut points = Vec::with_capacity(count);

    for (level, population) in level_populations(count, SYNTHETIC_LEVELS)
        .into_iter()
        .enumerate()
    {
        for _ in 0..population {
            let x = rng.gen_range(-half_extent..=half_extent);
            let y = rng.gen_range(-half_extent..=half_extent);
            let z = surface_height(x, y, half_extent);
            let rgb = rng.gen::<u32>();
            points.push(Point::new(Vec3::new(x, y, z), level as u8, rgb));
        }
    }

    log::debug!(
        "[synthetic::generate_layered_cloud] Generated {} points over {} levels (seed {})",
        points.len(),
        SYNTHETIC_LEVELS,
        seed
    );

    points
}

fn surface_height(x: f32, y: f32, half_extent: f32) -> f32 {
    let frequency = std::f32::consts::TAU / half_extent.max(f32::EPSILON);
    0.05 * half_extent * (x * frequency).sin() * (y * frequency).cos()
}
