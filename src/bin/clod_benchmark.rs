//! Orbit a camera around a synthetic cloud and report per-frame selection
//!
//! Usage: clod_benchmark [--config FILE] [--points N] [--frames N]
//!                       [--backend cpu|gpu] [--seed N] [--json]

use anyhow::{bail, Context, Result};
use clod_select::batch::ProgressiveSelection;
use clod_select::config::{Backend, SelectionConfig};
use clod_select::selection::{PassReport, SelectionExecutor};
use clod_select::synthetic::generate_layered_cloud;
use clod_select::view::ViewParameters;
use glam::{Mat4, Vec2, Vec3};
use serde::Serialize;

const HALF_EXTENT: f32 = 100.0;
const SCREEN_SIZE: Vec2 = Vec2::new(1920.0, 1080.0);

struct Args {
    config: Option<String>,
    points: usize,
    frames: u32,
    backend: Option<Backend>,
    seed: u64,
    json: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            config: None,
            points: 2_000_000,
            frames: 12,
            backend: None,
            seed: 42,
            json: false,
        }
    }
}

#[derive(Serialize)]
struct FrameRecord {
    frame: u32,
    backend: Backend,
    #[serde(flatten)]
    report: PassReport,
    throughput_points_per_ms: f64,
    completes_cycle: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);

    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "--config" => args.config = Some(iter.next().context("--config needs a path")?),
            "--points" => {
                args.points = iter
                    .next()
                    .context("--points needs a value")?
                    .parse()
                    .context("--points must be an integer")?
            }
            "--frames" => {
                args.frames = iter
                    .next()
                    .context("--frames needs a value")?
                    .parse()
                    .context("--frames must be an integer")?
            }
            "--seed" => {
                args.seed = iter
                    .next()
                    .context("--seed needs a value")?
                    .parse()
                    .context("--seed must be an integer")?
            }
            "--backend" => {
                args.backend = Some(match iter.next().as_deref() {
                    Some("cpu") => Backend::Cpu,
                    Some("gpu") => Backend::Gpu,
                    other => bail!("unknown backend {:?}, expected cpu or gpu", other),
                })
            }
            "--json" => args.json = true,
            other => bail!("unknown argument '{}'", other),
        }
    }

    Ok(args)
}

/// Camera circling the cloud, one full turn over `frames`
fn orbit_view(frame: u32, frames: u32, config: &SelectionConfig) -> ViewParameters {
    let angle = frame as f32 / frames.max(1) as f32 * std::f32::consts::TAU;
    let eye = Vec3::new(angle.cos() * HALF_EXTENT, angle.sin() * HALF_EXTENT, 0.5 * HALF_EXTENT);
    let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Z);
    let projection = Mat4::perspective_rh(
        60f32.to_radians(),
        SCREEN_SIZE.x / SCREEN_SIZE.y,
        0.1,
        10.0 * HALF_EXTENT,
    );
    ViewParameters::from_camera(view, projection, Mat4::IDENTITY, SCREEN_SIZE, eye).with_config(config)
}

fn run_cpu(
    args: &Args,
    config: &SelectionConfig,
    cloud: &[clod_select::Point],
) -> Result<Vec<FrameRecord>> {
    let executor = SelectionExecutor::from_config(config)?;
    let mut progressive = ProgressiveSelection::from_config(cloud.len() as u32, config);
    let mut records = Vec::with_capacity(args.frames as usize);

    for frame in 0..args.frames {
        let view = orbit_view(frame, args.frames, config);
        let outcome = progressive.advance(cloud, &view, &executor)?;
        records.push(FrameRecord {
            frame,
            backend: Backend::Cpu,
            report: outcome.report,
            throughput_points_per_ms: outcome.report.throughput_points_per_ms(),
            completes_cycle: outcome.swapped,
        });
    }

    Ok(records)
}

#[cfg(feature = "gpu")]
fn run_gpu(
    args: &Args,
    config: &SelectionConfig,
    cloud: &[clod_select::Point],
) -> Result<Vec<FrameRecord>> {
    use clod_select::batch::BatchScheduler;
    use clod_select::gpu::{GpuContext, GpuSelector};

    let context = GpuContext::new_blocking()?;
    if !args.json {
        println!("GPU: {} ({:?})", context.adapter_info.name, context.adapter_info.backend);
    }

    let selector = GpuSelector::new(context, cloud)?;
    let total = selector.point_count();
    let mut scheduler = BatchScheduler::new(total, config.resolved_points_per_frame(total));
    let mut records = Vec::with_capacity(args.frames as usize);

    for frame in 0..args.frames {
        let batch = scheduler.next_batch();
        if batch.window.offset == 0 {
            selector.begin_selection();
        }

        let view = orbit_view(frame, args.frames, config);
        let report = selector.run_pass(&view, batch.window)?;
        records.push(FrameRecord {
            frame,
            backend: Backend::Gpu,
            report,
            throughput_points_per_ms: report.throughput_points_per_ms(),
            completes_cycle: batch.completes_cycle,
        });
    }

    Ok(records)
}

#[cfg(not(feature = "gpu"))]
fn run_gpu(
    _args: &Args,
    _config: &SelectionConfig,
    _cloud: &[clod_select::Point],
) -> Result<Vec<FrameRecord>> {
    bail!("built without the 'gpu' feature")
}

fn print_table(records: &[FrameRecord]) {
    println!(
        "{:>5} {:>10} {:>10} {:>10} {:>10} {:>12} {:>6}",
        "frame", "offset", "size", "admitted", "total", "points/ms", "cycle"
    );
    for record in records {
        println!(
            "{:>5} {:>10} {:>10} {:>10} {:>10} {:>12.0} {:>6}",
            record.frame,
            record.report.window.offset,
            record.report.window.size,
            record.report.admitted,
            record.report.total_count,
            record.throughput_points_per_ms,
            if record.completes_cycle { "yes" } else { "" }
        );
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args()?;
    let mut config = match &args.config {
        Some(path) => SelectionConfig::load(path)
            .with_context(|| format!("loading selection config from {}", path))?,
        None => SelectionConfig::default(),
    };
    if let Some(backend) = args.backend {
        config.backend = backend;
    }

    if !args.json {
        println!("=== Continuous LOD Selection Benchmark ===\n");
        println!("Points: {}", args.points);
        println!("Frames: {}", args.frames);
        println!("Backend: {:?}", config.backend);
        println!("CLOD: {}", config.clod);
        println!();
    }

    let cloud = generate_layered_cloud(args.points, HALF_EXTENT, args.seed);

    let records = match config.backend {
        Backend::Cpu => run_cpu(&args, &config, &cloud)?,
        Backend::Gpu => run_gpu(&args, &config, &cloud)?,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        print_table(&records);
    }

    Ok(())
}
