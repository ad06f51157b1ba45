//! Common types and utilities shared across the bathymetry map crates.

pub mod bbox;
pub mod depth;
pub mod error;
pub mod grid;
pub mod path;
pub mod sample;

pub use bbox::BoundingBox;
pub use depth::{normalize_depth, normalize_depths};
pub use error::{BathyError, BathyResult};
pub use grid::{BathymetryGrid, Grid, GridShape};
pub use path::{CompoundPath, CompoundPathBuilder, PathCommand, SubPath};
pub use sample::{CoastlineVertex, Landmark, Sample};
