//! Compute-shader selection checked against the CPU kernel
//!
//! Skipped when no adapter is available. Comparisons use views where the
//! verdict does not hinge on the jitter hash, since GPU `cos` may differ
//! from the host's in the last bits.

#![cfg(feature = "gpu")]

use clod_select::batch::BatchWindow;
use clod_select::compaction::DrawParameters;
use clod_select::error::LodError;
use clod_select::gpu::{GpuContext, GpuSelector};
use clod_select::point::Point;
use clod_select::selection::select_all;
use clod_select::view::ViewParameters;
use glam::{Mat4, Vec3, Vec4};

fn init_gpu() -> Option<GpuContext> {
    match GpuContext::new_blocking() {
        Ok(context) => Some(context),
        Err(e) => {
            println!("Skipping GPU test - {}", e);
            None
        }
    }
}

/// Grid spanning [-3, 3] on x/y so part of it lies outside the extended frustum
fn grid(levels: u8) -> Vec<Point> {
    let mut points = Vec::new();
    let mut color = 0u32;
    for ix in -12..=12 {
        for iy in -12..=12 {
            let position = Vec3::new(ix as f32 * 0.25, iy as f32 * 0.25, 0.5);
            points.push(Point::new(position, (color % levels as u32) as u8, color));
            color += 1;
        }
    }
    points
}

fn sorted(mut points: Vec<Point>) -> Vec<Point> {
    points.sort_by_key(|p| p.attributes);
    points
}

#[test]
fn test_gpu_culling_matches_cpu() {
    let Some(context) = init_gpu() else { return };

    let input = grid(6);
    // clod 0 admits every visible point, so only the culler decides
    let view = ViewParameters::default().with_clod(0.0);

    let selector = GpuSelector::new(context, &input).expect("selector");
    let gpu = sorted(selector.select_blocking(&view).expect("gpu selection"));
    let cpu = sorted(select_all(&input, &view).expect("cpu selection"));

    // |x|, |y| <= 2.0 on a 0.25 grid: 17 x 17 points
    assert_eq!(cpu.len(), 17 * 17);
    assert_eq!(gpu, cpu);
}

#[test]
fn test_gpu_discards_everything_behind_near_plane() {
    let Some(context) = init_gpu() else { return };

    let input = grid(1);
    let view = ViewParameters {
        transform: Mat4::from_cols(Vec4::X, Vec4::Y, Vec4::Z, Vec4::new(0.0, 0.0, 0.0, -1.0)),
        clod: 0.0,
        ..ViewParameters::default()
    };

    let selector = GpuSelector::new(context, &input).expect("selector");
    assert!(selector.select_blocking(&view).expect("gpu selection").is_empty());
    assert_eq!(
        selector.read_draw_parameters().expect("readback"),
        DrawParameters::RESET
    );
}

#[test]
fn test_gpu_windows_append_and_reset() {
    let Some(context) = init_gpu() else { return };

    let input = grid(1);
    let view = ViewParameters::default().with_clod(0.0);
    let selector = GpuSelector::new(context, &input).expect("selector");
    let len = input.len() as u32;

    selector.begin_selection();
    let first = selector
        .run_pass(&view, BatchWindow::new(0, len / 2))
        .expect("first window");
    let second = selector
        .run_pass(&view, BatchWindow::new(len / 2, len - len / 2))
        .expect("second window");

    assert_eq!(second.total_count, first.admitted + second.admitted);

    let parameters = selector.read_draw_parameters().expect("readback");
    assert_eq!(parameters.count, second.total_count);
    assert_eq!(parameters.prim_count, 1);
    assert_eq!(parameters.first, 0);
    assert_eq!(parameters.base_instance, 0);

    let batched = sorted(selector.read_selected().expect("readback"));
    assert_eq!(batched, sorted(select_all(&input, &view).expect("cpu selection")));

    // A new selection starts from an empty count
    selector.begin_selection();
    assert_eq!(selector.read_draw_parameters().expect("readback").count, 0);
}

#[test]
fn test_gpu_rejects_window_past_input() {
    let Some(context) = init_gpu() else { return };

    let input = grid(1);
    let selector = GpuSelector::new(context, &input).expect("selector");
    let result = selector.run_pass(
        &ViewParameters::default(),
        BatchWindow::new(input.len() as u32 - 10, 20),
    );
    assert!(matches!(result, Err(LodError::BatchOutOfBounds { .. })));
}

#[test]
fn test_gpu_empty_cloud() {
    let Some(context) = init_gpu() else { return };

    let selector = GpuSelector::new(context, &[]).expect("selector");
    assert_eq!(selector.point_count(), 0);
    assert!(selector
        .select_blocking(&ViewParameters::default())
        .expect("empty selection")
        .is_empty());
}
