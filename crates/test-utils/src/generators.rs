//! Synthetic dataset generators.
//!
//! Everything is produced as text in the same delimited format the real
//! input files use, so tests exercise the full read path.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::paths::write_text_file;

/// A regular lon/lat lattice scanned row by row from the north-west corner.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticGrid {
    /// Longitude of the first column
    pub west: f64,
    /// Latitude of the first row
    pub north: f64,
    /// Node spacing in degrees (both axes)
    pub step: f64,
    pub rows: usize,
    pub cols: usize,
}

impl SyntheticGrid {
    pub fn lon(&self, col: usize) -> f64 {
        self.west + col as f64 * self.step
    }

    pub fn lat(&self, row: usize) -> f64 {
        self.north - row as f64 * self.step
    }

    /// Bathymetry file contents with elevation from `elevation(lon, lat)`.
    pub fn bathymetry_text<F>(&self, elevation: F) -> String
    where
        F: Fn(f64, f64) -> f64,
    {
        let mut text = String::from("* synthetic bathymetry\n* lon,lat,depth\n");
        for row in 0..self.rows {
            for col in 0..self.cols {
                let (lon, lat) = (self.lon(col), self.lat(row));
                let _ = writeln!(text, "{:.6},{:.6},{:.3}", lon, lat, elevation(lon, lat));
            }
        }
        text
    }

    /// Write the bathymetry file into `dir` and return its path.
    pub fn write_bathymetry<F>(&self, dir: &Path, name: &str, elevation: F) -> PathBuf
    where
        F: Fn(f64, f64) -> f64,
    {
        write_text_file(dir, name, &self.bathymetry_text(elevation))
    }
}

/// A sloping sea floor: land to the west, deepening eastwards to `max_depth`.
pub fn sloping_shelf(west: f64, east: f64, max_depth: f64) -> impl Fn(f64, f64) -> f64 {
    let span = (east - west).max(f64::EPSILON);
    move |lon, _lat| {
        let t = (lon - west) / span;
        // 10% of the width is above sea level
        -(t - 0.1) * max_depth
    }
}

/// Coastline file contents for one closed rectangle.
pub fn rectangle_coastline(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> String {
    format!(
        "* x,y,code\n{min_x},{max_y},1\n{max_x},{max_y},2\n{max_x},{min_y},2\n{min_x},{min_y},2\n{min_x},{max_y},79\n"
    )
}

/// Landmark file contents for the given anchors.
pub fn landmark_text(landmarks: &[(f64, f64, &str)]) -> String {
    let mut text = String::from("* x,y,label\n");
    for (x, y, label) in landmarks {
        let _ = writeln!(text, "{},{},{}", x, y, label);
    }
    text
}
