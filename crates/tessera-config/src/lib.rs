//! Configuration for Tessera volumes.
//!
//! Settings persist to disk as RON files, tolerate missing and unknown fields,
//! and can be overridden from the command line via clap.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, DemoConfig, MeshingConfig, VolumeConfig};
pub use error::ConfigError;
pub use tessera_mesh::{ColliderKind, MeshingAlgorithm, ThreadingMode};
