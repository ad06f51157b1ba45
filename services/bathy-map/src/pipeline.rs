//! The map job: parse, reshape, normalise, render, write.
//!
//! Stages run one after another and any failure aborts the run before the
//! output file is touched.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use bathy_common::{
    BathymetryGrid, CoastlineVertex, CompoundPath, Grid, GridShape, Landmark, Sample,
};
use bathy_parser::read_records;
use renderer::{MapRenderer, MapScene};
use tracing::{debug, info, warn};

use crate::config::MapConfig;

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output: PathBuf,
    pub grid: GridShape,
    pub samples: usize,
    pub coastline_subpaths: usize,
    /// Coastline vertices dropped for unknown command codes
    pub skipped_vertices: usize,
    pub landmarks: usize,
    pub png_bytes: usize,
    pub elapsed: Duration,
}

/// Run the whole job described by `config`.
pub fn run(config: &MapConfig) -> Result<RunSummary> {
    config.validate()?;
    let started = Instant::now();
    let shape = config.grid_shape();

    // Parse
    let stage = Instant::now();
    let samples: Vec<Sample> = read_records(&config.inputs.bathymetry).with_context(|| {
        format!("Failed to read bathymetry from {:?}", config.inputs.bathymetry)
    })?;
    let vertices: Vec<CoastlineVertex> = read_records(&config.inputs.coastline).with_context(|| {
        format!("Failed to read coastline from {:?}", config.inputs.coastline)
    })?;
    let landmarks: Vec<Landmark> = read_records(&config.inputs.landmarks).with_context(|| {
        format!("Failed to read landmarks from {:?}", config.inputs.landmarks)
    })?;
    info!(
        samples = samples.len(),
        vertices = vertices.len(),
        landmarks = landmarks.len(),
        elapsed_ms = stage.elapsed().as_millis() as u64,
        "Parsed input files"
    );

    // Reshape and normalise
    let stage = Instant::now();
    let sample_count = samples.len();
    let grid = Grid::from_row_major(samples, shape)
        .context("Bathymetry file does not match the configured dataset extent")?;
    let mut bathymetry = BathymetryGrid::from_samples(&grid);
    drop(grid);
    bathymetry.normalize_depths();

    match bathymetry.depth_range() {
        Some((shallow, deep)) => debug!(shallow, deep, "Depth range"),
        None => warn!("Bathymetry grid holds no sea cells"),
    }
    info!(
        rows = shape.rows,
        cols = shape.cols,
        elapsed_ms = stage.elapsed().as_millis() as u64,
        "Reshaped bathymetry grid"
    );

    let coastline = CompoundPath::from_vertices(&vertices);
    if coastline.skipped_vertices() > 0 {
        warn!(
            skipped = coastline.skipped_vertices(),
            "Coastline vertices with unknown command codes were dropped"
        );
    }

    // Render
    let stage = Instant::now();
    let renderer = MapRenderer::new(config.style.clone()).context("Failed to set up renderer")?;
    let scene = MapScene {
        bathymetry: &bathymetry,
        coastline: &coastline,
        landmarks: &landmarks,
        bounds: config.viewport,
    };
    let png = renderer.render_png(&scene).context("Failed to render map")?;
    info!(
        bytes = png.len(),
        elapsed_ms = stage.elapsed().as_millis() as u64,
        "Rendered PNG"
    );

    // Write
    write_atomic(&config.output, &png)?;
    info!(output = ?config.output, "Wrote map");

    Ok(RunSummary {
        output: config.output.clone(),
        grid: shape,
        samples: sample_count,
        coastline_subpaths: coastline.subpaths().len(),
        skipped_vertices: coastline.skipped_vertices(),
        landmarks: landmarks.len(),
        png_bytes: png.len(),
        elapsed: started.elapsed(),
    })
}

/// Write `bytes` to a hidden sibling file, then rename it over `path`.
///
/// Readers never see a half-written file; on failure the temporary file is
/// removed and `path` is left as it was.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("Output path {:?} has no file name", path))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {:?}", parent))?;
    }

    let mut tmp_name = OsString::from(".");
    tmp_name.push(file_name);
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    let result = fs::write(&tmp, bytes)
        .with_context(|| format!("Failed to write {:?}", tmp))
        .and_then(|_| {
            fs::rename(&tmp, path)
                .with_context(|| format!("Failed to move {:?} to {:?}", tmp, path))
        });

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}
