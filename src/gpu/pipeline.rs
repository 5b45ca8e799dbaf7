//! Compute pipeline for the point selection kernel

use super::layouts::{GpuBatchWindow, GpuViewParameters};
use super::shader_source::filter_points_source;
use crate::batch::BatchWindow;
use crate::compaction::DrawParameters;
use crate::constants::dispatch::MAX_WORKGROUPS_PER_DIMENSION;
use crate::view::ViewParameters;

/// Split a workgroup count into a 2D grid that stays under the per-dimension limit
///
/// The shader flattens `(x, y)` back into a local index; trailing groups of
/// the last row fall outside the window and exit early.
pub fn dispatch_dimensions(workgroups: u32) -> (u32, u32) {
    if workgroups <= MAX_WORKGROUPS_PER_DIMENSION {
        return (workgroups, 1);
    }
    let rows = workgroups.div_ceil(MAX_WORKGROUPS_PER_DIMENSION);
    (MAX_WORKGROUPS_PER_DIMENSION, rows)
}

/// Selection kernel pipeline plus its per-pass uniforms
///
/// Bindings:
/// 0 input points (read), 1 target points (read_write), 2 view uniform,
/// 3 draw parameters (atomic count), 4 batch window uniform.
pub struct FilterPointsPipeline {
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    view_buffer: wgpu::Buffer,
    batch_buffer: wgpu::Buffer,
}

impl FilterPointsPipeline {
    pub fn new(device: &wgpu::Device) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Filter Points Shader"),
            source: wgpu::ShaderSource::Wgsl(filter_points_source().into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Filter Points Bind Group Layout"),
            entries: &[
                // Input points
                storage_entry(0, true),
                // Target points
                storage_entry(1, false),
                // View parameters
                uniform_entry(2),
                // Draw parameters
                storage_entry(3, false),
                // Batch window
                uniform_entry(4),
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Filter Points Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Filter Points Pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: "main",
        });

        let view_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("View Parameters Uniform"),
            size: std::mem::size_of::<GpuViewParameters>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let batch_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Batch Window Uniform"),
            size: std::mem::size_of::<GpuBatchWindow>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            pipeline,
            bind_group_layout,
            view_buffer,
            batch_buffer,
        }
    }

    pub fn update_view(&self, queue: &wgpu::Queue, view: &ViewParameters) {
        let data = GpuViewParameters::from(view);
        queue.write_buffer(&self.view_buffer, 0, bytemuck::bytes_of(&data));
    }

    /// Queue writes land before the next submit, so one window per submission
    pub fn update_batch(&self, queue: &wgpu::Queue, window: BatchWindow) {
        let data = GpuBatchWindow::from(window);
        queue.write_buffer(&self.batch_buffer, 0, bytemuck::bytes_of(&data));
    }

    /// Restore `{count: 0, prim_count: 1, first: 0, base_instance: 0}` before a new selection
    pub fn reset_draw_parameters(&self, queue: &wgpu::Queue, draw_parameters: &wgpu::Buffer) {
        queue.write_buffer(draw_parameters, 0, bytemuck::bytes_of(&DrawParameters::RESET));
    }

    pub fn create_bind_group(
        &self,
        device: &wgpu::Device,
        input_points: &wgpu::Buffer,
        target_points: &wgpu::Buffer,
        draw_parameters: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Filter Points Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: input_points.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: target_points.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: self.view_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: draw_parameters.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: self.batch_buffer.as_entire_binding(),
                },
            ],
        })
    }

    /// Record the selection dispatch for `window`
    pub fn dispatch(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        bind_group: &wgpu::BindGroup,
        window: BatchWindow,
    ) {
        let workgroups = window.workgroup_count();
        if workgroups == 0 {
            return;
        }
        let (x, y) = dispatch_dimensions(workgroups);

        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("Filter Points Pass"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        pass.dispatch_workgroups(x, y, 1);
    }
}

fn storage_entry(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::dispatch::WORKGROUP_SIZE;

    #[test]
    fn test_small_dispatch_is_one_row() {
        assert_eq!(dispatch_dimensions(0), (0, 1));
        assert_eq!(dispatch_dimensions(1), (1, 1));
        assert_eq!(
            dispatch_dimensions(MAX_WORKGROUPS_PER_DIMENSION),
            (MAX_WORKGROUPS_PER_DIMENSION, 1)
        );
    }

    #[test]
    fn test_large_dispatch_covers_window() {
        // 86M points
        let window = BatchWindow::new(0, 86_000_000);
        let (x, y) = dispatch_dimensions(window.workgroup_count());
        assert!(x <= MAX_WORKGROUPS_PER_DIMENSION);
        assert!(y <= MAX_WORKGROUPS_PER_DIMENSION);
        assert!(x as u64 * y as u64 * WORKGROUP_SIZE as u64 >= window.size as u64);
        // No spare row
        assert!((x as u64 * (y as u64 - 1)) * (WORKGROUP_SIZE as u64) < window.size as u64);
    }
}
