//! Volume, meshing and demo settings, persisted as `config.ron`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tessera_mesh::{ColliderKind, MeshingAlgorithm, ThreadingMode};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Volume shape and behaviour.
    pub volume: VolumeConfig,
    /// Meshing worker settings.
    pub meshing: MeshingConfig,
    pub debug: DebugConfig,
    /// Settings for the headless demo driver.
    pub demo: DemoConfig,
}

/// Volume configuration, applied when a volume is created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VolumeConfig {
    /// Voxels per chunk along each axis (clamped to 1..=16).
    pub chunk_size: [i32; 3],
    /// Voxels in the whole volume along each axis (clamped to >= 1).
    pub volume_size: [i32; 3],
    /// World-space size of one voxel.
    pub voxel_scale: [f32; 3],
    /// World-space position of voxel (0, 0, 0)'s minimum corner.
    pub origin: [f32; 3],
    pub collider: ColliderKind,
    pub threading: ThreadingMode,
    pub algorithm: MeshingAlgorithm,
    /// Opaque material handle handed to the renderer.
    pub material: Option<u32>,
    /// Let chunk meshes see neighbor chunks so faces between two solid
    /// chunks are culled.
    pub seamless_chunks: bool,
}

/// Meshing worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MeshingConfig {
    /// Background worker threads (0 = derive from CPU count).
    pub worker_threads: usize,
    /// Meshes above this many vertices are flagged as degraded.
    pub vertex_limit: usize,
}

/// Diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// `tracing` filter directive, e.g. `"warn,tessera_volume=debug"`.
    pub log_level: String,
}

/// Headless demo configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    /// Number of update ticks to run.
    pub ticks: u32,
    /// Seed for the random voxel fill.
    pub seed: u64,
    /// Fraction of voxels (0.0 - 1.0) written with a random color each tick.
    pub fill_ratio: f32,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            chunk_size: [8, 8, 8],
            volume_size: [16, 16, 16],
            voxel_scale: [1.0, 1.0, 1.0],
            origin: [0.0, 0.0, 0.0],
            collider: ColliderKind::default(),
            threading: ThreadingMode::default(),
            algorithm: MeshingAlgorithm::default(),
            material: Some(0),
            seamless_chunks: false,
        }
    }
}

impl Default for MeshingConfig {
    fn default() -> Self {
        Self {
            worker_threads: 0,
            vertex_limit: tessera_mesh::MAX_INDEXABLE_VERTICES,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            ticks: 10,
            seed: 0x7e55_e7a,
            fill_ratio: 0.05,
        }
    }
}

// --- Persistence ---

impl Config {
    /// Per-user configuration directory for Tessera.
    pub fn default_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|d| d.join("tessera"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Reads `config.ron` from `config_dir`. When the file is missing, the
    /// defaults are written there and returned.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Read configuration from {}", config_path.display());
            Ok(config)
        } else {
            let defaults = Self::default();
            defaults.save(config_dir)?;
            log::info!("Wrote default configuration to {}", config_path.display());
            Ok(defaults)
        }
    }

    /// Writes `config.ron` into `config_dir`, creating the directory if needed.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join(CONFIG_FILE);
        let layout = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .struct_names(false)
            .enumerate_arrays(false);
        let text = ron::ser::to_string_pretty(self, layout).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, text).map_err(|source| ConfigError::Write {
            path: config_path,
            source,
        })
    }

    /// Re-reads `config.ron`. Returns the new settings only if they differ
    /// from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let on_disk = Self::read(&config_dir.join(CONFIG_FILE))?;
        if on_disk == *self {
            return Ok(None);
        }
        log::info!("Configuration changed on disk");
        Ok(Some(on_disk))
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&contents).map_err(ConfigError::Parse)
    }
}
