//! GPU-resident selection for one point cloud
//!
//! The input cloud is uploaded once. Each pass writes the view and batch
//! uniforms, dispatches the kernel and leaves the selected points and their
//! draw arguments in GPU buffers, ready for `draw_indirect`.

use super::context::GpuContext;
use super::pipeline::FilterPointsPipeline;
use crate::batch::BatchWindow;
use crate::compaction::DrawParameters;
use crate::error::{gpu_operation_error, LodError, LodErrorContext, LodResult};
use crate::point::Point;
use crate::selection::PassReport;
use crate::view::ViewParameters;
use bytemuck::Pod;
use std::mem::size_of;
use std::time::Instant;
use wgpu::util::DeviceExt;

pub struct GpuSelector {
    context: GpuContext,
    pipeline: FilterPointsPipeline,
    input_buffer: wgpu::Buffer,
    target_buffer: wgpu::Buffer,
    draw_parameters_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    point_count: u32,
}

impl GpuSelector {
    /// Upload `input` and allocate an output buffer of equal capacity
    pub fn new(context: GpuContext, input: &[Point]) -> LodResult<Self> {
        let point_count = BatchWindow::full(input.len()).size;
        // Zero-sized storage bindings are invalid, keep one slot minimum
        let buffer_size = (point_count.max(1) as u64) * size_of::<Point>() as u64;

        let limit = context.max_storage_binding();
        if buffer_size > limit {
            return Err(LodError::GpuBufferTooLarge {
                buffer: "point buffer",
                required: buffer_size,
                limit,
            });
        }

        let device = &context.device;
        let pipeline = FilterPointsPipeline::new(device);

        let input_buffer = if input.is_empty() {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Input Points Buffer"),
                size: buffer_size,
                usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        } else {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Input Points Buffer"),
                contents: bytemuck::cast_slice(&input[..point_count as usize]),
                usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            })
        };

        let target_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Selected Points Buffer"),
            size: buffer_size,
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::VERTEX
                | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        let draw_parameters_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Draw Parameters Buffer"),
            contents: bytemuck::bytes_of(&DrawParameters::RESET),
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::INDIRECT
                | wgpu::BufferUsages::COPY_DST
                | wgpu::BufferUsages::COPY_SRC,
        });

        let bind_group = pipeline.create_bind_group(
            device,
            &input_buffer,
            &target_buffer,
            &draw_parameters_buffer,
        );

        log::info!(
            "[GpuSelector::new] Uploaded {} points ({:.1} MB)",
            point_count,
            buffer_size as f64 / (1024.0 * 1024.0)
        );

        Ok(Self {
            context,
            pipeline,
            input_buffer,
            target_buffer,
            draw_parameters_buffer,
            bind_group,
            point_count,
        })
    }

    pub fn point_count(&self) -> u32 {
        self.point_count
    }

    pub fn context(&self) -> &GpuContext {
        &self.context
    }

    /// Selected points, bindable as a vertex buffer
    pub fn target_buffer(&self) -> &wgpu::Buffer {
        &self.target_buffer
    }

    /// Indirect draw arguments for `target_buffer`
    pub fn draw_parameters_buffer(&self) -> &wgpu::Buffer {
        &self.draw_parameters_buffer
    }

    /// Replace the cloud contents without reallocating; the length must match
    pub fn upload(&self, input: &[Point]) -> LodResult<()> {
        if input.len() != self.point_count as usize {
            return Err(LodError::InputLengthMismatch {
                expected: self.point_count as usize,
                actual: input.len(),
            });
        }
        self.context
            .queue
            .write_buffer(&self.input_buffer, 0, bytemuck::cast_slice(input));
        Ok(())
    }

    /// Reset the draw arguments, starting a new selection
    pub fn begin_selection(&self) {
        self.pipeline
            .reset_draw_parameters(&self.context.queue, &self.draw_parameters_buffer);
    }

    /// Submit one pass without waiting for it
    ///
    /// Points admitted from `window` are appended after whatever earlier
    /// passes of the current selection produced.
    pub fn submit_pass(&self, view: &ViewParameters, window: BatchWindow) -> LodResult<()> {
        window.validate(self.point_count as usize)?;

        self.pipeline.update_view(&self.context.queue, view);
        self.pipeline.update_batch(&self.context.queue, window);

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Filter Points Encoder"),
            });
        self.pipeline.dispatch(&mut encoder, &self.bind_group, window);
        self.context.queue.submit(Some(encoder.finish()));
        Ok(())
    }

    /// Run one pass and wait for it, reporting what it appended
    pub fn run_pass(&self, view: &ViewParameters, window: BatchWindow) -> LodResult<PassReport> {
        let start_count = self.read_draw_parameters()?.count;
        let required = start_count as usize + window.size as usize;
        if required > self.point_count as usize {
            return Err(LodError::OutputTooSmall {
                required,
                capacity: self.point_count as usize,
            });
        }

        let started = Instant::now();
        self.submit_pass(view, window)?;
        self.context.device.poll(wgpu::Maintain::Wait);
        let elapsed = started.elapsed();

        let total_count = self.read_draw_parameters()?.count;
        let report = PassReport {
            window,
            admitted: total_count - start_count,
            total_count,
            elapsed,
        };

        log::debug!(
            "[GpuSelector::run_pass] window {}+{}: admitted {} ({} total) in {:.3}ms",
            window.offset,
            window.size,
            report.admitted,
            total_count,
            elapsed.as_secs_f64() * 1000.0
        );

        Ok(report)
    }

    /// Full selection over the whole cloud, read back to the host
    pub fn select_blocking(&self, view: &ViewParameters) -> LodResult<Vec<Point>> {
        self.begin_selection();
        self.run_pass(view, BatchWindow::full(self.point_count as usize))?;
        self.read_selected()
    }

    /// Current draw arguments. `run_pass` rejects windows that could push the
    /// count past the buffer, so `count` never exceeds `point_count` here.
    pub fn read_draw_parameters(&self) -> LodResult<DrawParameters> {
        let values: Vec<DrawParameters> = self.read_buffer(&self.draw_parameters_buffer, 1)?;
        values
            .into_iter()
            .next()
            .ok_or_else(|| gpu_operation_error("read_draw_parameters", "empty readback"))
    }

    /// The first `count` points of the target buffer
    pub fn read_selected(&self) -> LodResult<Vec<Point>> {
        let count = self.read_draw_parameters()?.count.min(self.point_count);
        self.read_buffer(&self.target_buffer, count as usize)
    }

    fn read_buffer<T: Pod>(&self, source: &wgpu::Buffer, len: usize) -> LodResult<Vec<T>> {
        let size = (len * size_of::<T>()) as u64;
        if size == 0 {
            return Ok(Vec::new());
        }

        let device = &self.context.device;
        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Selection Readback Buffer"),
            size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Selection Readback Encoder"),
        });
        encoder.copy_buffer_to_buffer(source, 0, &staging, 0, size);
        self.context.queue.submit(Some(encoder.finish()));

        let slice = staging.slice(..);
        let (sender, receiver) = futures::channel::oneshot::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            sender.send(result).ok();
        });
        device.poll(wgpu::Maintain::Wait);

        pollster::block_on(receiver)
            .lod_context("map_async")?
            .lod_context("map_async")?;

        let data = slice.get_mapped_range();
        let values = bytemuck::cast_slice::<u8, T>(&data).to_vec();
        drop(data);
        staging.unmap();

        Ok(values)
    }
}
