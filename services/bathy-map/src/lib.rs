//! Bathymetry map job library.
//!
//! Exposes the configuration and pipeline so the binary stays thin and
//! integration tests can drive whole runs.

pub mod config;
pub mod pipeline;

pub use config::{DatasetConfig, InputFiles, MapConfig};
pub use pipeline::{run, write_atomic, RunSummary};
