//! Headless hand-mesh viewer: drives the synthetic tracking source through a
//! fixed number of frames and rebuilds every finger tube each frame.

mod config;

use anyhow::{Context, Result};
use config::ViewerConfig;
use engine_core::{Time, Transform};
use polyhand::{HandModel, PolyHand};
use renderer::{GpuContext, GpuMesh};
use std::time::Instant;
use tracking::{FingerType, SyntheticHand};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ViewerConfig::load();
    log::info!(
        "Simulating {} frames at {} Hz ({} sides, smooth: {})",
        config.frames,
        config.rate_hz,
        config.hand.default.sides,
        config.hand.default.smooth_normals
    );

    let source = SyntheticHand::new(config.source.clone());
    let mut hand = PolyHand::new(&config.hand).context("Invalid hand configuration")?;
    let device = Transform::from_position(config.device_position).with_uniform_scale(config.device_scale);

    let gpu = if config.gpu {
        match GpuContext::headless() {
            Ok(ctx) => Some(ctx),
            Err(e) => {
                log::warn!("GPU upload disabled: {:#}", e);
                None
            }
        }
    } else {
        None
    };
    let mut gpu_meshes: Vec<GpuMesh> = match &gpu {
        Some(ctx) => FingerType::ALL
            .iter()
            .map(|f| GpuMesh::new(&ctx.device, f.name()))
            .collect(),
        None => Vec::new(),
    };

    let mut time = Time::with_fixed_rate(config.rate_hz);
    let started = Instant::now();
    let mut last_counts = (0, 0);

    for _ in 0..config.frames {
        time.step_fixed();
        let frame = source.sample(time.elapsed_seconds());
        hand.update_hand(&frame, &device)
            .with_context(|| format!("Rebuild failed on frame {}", time.frame_count()))?;

        let mut vertices = 0;
        let mut indices = 0;
        for (finger, mesh) in hand.finger_meshes() {
            vertices += mesh.vertices().len();
            indices += mesh.triangles().len();
            if let (Some(ctx), Some(gpu_mesh)) = (&gpu, gpu_meshes.get_mut(finger.index())) {
                gpu_mesh.upload(&ctx.device, &ctx.queue, mesh);
            }
        }
        if let Some(ctx) = &gpu {
            ctx.queue.submit(std::iter::empty());
        }

        log::debug!(
            "Frame {}: {} fingers tracked, {} vertices, {} indices",
            time.frame_count(),
            frame.tracked_count(),
            vertices,
            indices
        );
        last_counts = (vertices, indices);
    }

    let elapsed = started.elapsed();
    let per_frame = elapsed.as_secs_f64() * 1e6 / f64::from(config.frames.max(1));
    let reallocations: u32 = gpu_meshes.iter().map(GpuMesh::reallocations).sum();
    log::info!(
        "Built {} frames in {:?} ({:.1} us/frame), final hand {} vertices / {} indices, {} GPU reallocations",
        time.frame_count(),
        elapsed,
        per_frame,
        last_counts.0,
        last_counts.1,
        reallocations
    );

    Ok(())
}
