//! Headless Tessera driver: builds a volume from configuration, scatters
//! random voxels into it for a number of ticks, and reports what the mesher
//! produced.

mod stats;

use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use glam::{IVec3, Vec3};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use tessera_config::{CliArgs, Config};
use tessera_volume::{MaterialHandle, ThreadingMode, Volume, VolumeSettings};
use tessera_voxel::Rgba8;

use crate::stats::MeshStats;

/// How long one tick may wait for background meshes before moving on.
const MESH_WAIT: Duration = Duration::from_secs(30);

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = match args.config.clone().map(Ok).unwrap_or_else(Config::default_dir) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    tessera_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let mut volume = match Volume::create(volume_settings(&config)) {
        Ok(volume) => volume,
        Err(e) => {
            tracing::error!("failed to create volume: {e}");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        volume = ?volume.volume_dims(),
        chunk = ?volume.chunk_dims(),
        chunks = volume.chunk_count(),
        threading = ?volume.threading(),
        "volume ready"
    );

    let mut stats = MeshStats::default();
    settle(&volume);
    volume.deliver_ready(&mut stats);

    let mut rng = Xoshiro256StarStar::seed_from_u64(config.demo.seed);
    let voxel_count = volume.voxels().len();
    let writes = writes_per_tick(voxel_count, config.demo.fill_ratio);
    let started = Instant::now();

    for tick in 0..config.demo.ticks {
        scatter_voxels(&mut volume, &mut rng, writes);
        let dirty = volume.dirty_count();
        let report = volume.tick();
        settle(&volume);
        let delivered = volume.deliver_ready(&mut stats);

        tracing::debug!(
            tick,
            dirty,
            regenerated = report.regenerated,
            failed = report.failed,
            delivered,
            "tick complete"
        );
    }

    let failed_chunks = volume.chunks().filter(|c| c.last_error().is_some()).count();
    tracing::info!(
        ticks = config.demo.ticks,
        elapsed_ms = started.elapsed().as_millis() as u64,
        meshes = stats.meshes,
        empty = stats.empty,
        faces = stats.faces,
        vertices = stats.vertices,
        triangles = stats.triangles,
        peak_vertices = stats.peak_vertices,
        upload_bytes = stats.upload_bytes,
        degraded = stats.degraded,
        failed_chunks,
        "demo finished"
    );

    ExitCode::SUCCESS
}

/// Volume creation parameters from the `volume` and `meshing` config sections.
fn volume_settings(config: &Config) -> VolumeSettings {
    let volume = &config.volume;
    VolumeSettings {
        chunk_dims: IVec3::from_array(volume.chunk_size),
        volume_dims: IVec3::from_array(volume.volume_size),
        origin: Vec3::from_array(volume.origin),
        voxel_scale: Vec3::from_array(volume.voxel_scale),
        material: volume.material.map(MaterialHandle),
        collider: volume.collider,
        threading: volume.threading,
        algorithm: volume.algorithm,
        seamless_chunks: volume.seamless_chunks,
        worker_threads: config.meshing.worker_threads,
        vertex_limit: config.meshing.vertex_limit,
    }
}

/// Voxel writes per tick for a fill ratio, clamped to `0..=1`. A non-finite
/// ratio writes nothing.
fn writes_per_tick(voxel_count: usize, fill_ratio: f32) -> usize {
    let ratio = if fill_ratio.is_finite() {
        fill_ratio.clamp(0.0, 1.0)
    } else {
        0.0
    };
    (voxel_count as f64 * f64::from(ratio)).round() as usize
}

/// Waits for background meshing so each tick's output is delivered in the
/// same tick.
fn settle(volume: &Volume) {
    if volume.threading() == ThreadingMode::MultiThreaded && !volume.wait_for_meshes(MESH_WAIT) {
        tracing::warn!("background meshing did not finish within {MESH_WAIT:?}");
    }
}

/// Writes `count` random voxels. One in four writes clears the cell.
fn scatter_voxels(volume: &mut Volume, rng: &mut Xoshiro256StarStar, count: usize) {
    let dims = volume.volume_dims();
    for _ in 0..count {
        let index = IVec3::new(
            rng.gen_range(0..dims.x),
            rng.gen_range(0..dims.y),
            rng.gen_range(0..dims.z),
        );
        let color = if rng.gen_ratio(1, 4) {
            Rgba8::EMPTY
        } else {
            Rgba8::opaque(rng.r#gen(), rng.r#gen(), rng.r#gen())
        };
        volume.set_voxel(index, color);
    }
}
