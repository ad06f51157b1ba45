//! Dense row-major grids and the bathymetry field built from them.

use std::ops::{Index, Range};

use serde::{Deserialize, Serialize};

use crate::depth::normalize_depths;
use crate::{BathyError, BathyResult, BoundingBox, Sample};

const MINUTES_PER_DEGREE: f64 = 60.0;

/// Row and column counts of a regular grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    pub rows: usize,
    pub cols: usize,
}

impl GridShape {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Shape of a dataset sampled `samples_per_minute` times per arcminute
    /// over `extent`.
    ///
    /// This is metadata known out-of-band; nothing is inferred from the
    /// samples themselves.
    pub fn from_extent(extent: &BoundingBox, samples_per_minute: f64) -> Self {
        let per_degree = MINUTES_PER_DEGREE * samples_per_minute;
        Self {
            rows: (extent.height() * per_degree).round().max(0.0) as usize,
            cols: (extent.width() * per_degree).round().max(0.0) as usize,
        }
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Row-major offset of (row, col).
    #[inline]
    pub fn flat_index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }
}

/// A dense 2D array stored in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    shape: GridShape,
    values: Vec<T>,
}

impl<T> Grid<T> {
    /// Reshape a flat scan-ordered sequence into a grid.
    ///
    /// `grid[(r, c)] == values[r * cols + c]`. The sequence length must match
    /// the shape exactly; a short or long sequence is a `GridSizeMismatch`.
    pub fn from_row_major(values: Vec<T>, shape: GridShape) -> BathyResult<Self> {
        if values.len() != shape.len() {
            return Err(BathyError::GridSizeMismatch {
                rows: shape.rows,
                cols: shape.cols,
                expected: shape.len(),
                actual: values.len(),
            });
        }
        Ok(Self { shape, values })
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn rows(&self) -> usize {
        self.shape.rows
    }

    pub fn cols(&self) -> usize {
        self.shape.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row >= self.shape.rows || col >= self.shape.cols {
            return None;
        }
        self.values.get(self.shape.flat_index(row, col))
    }

    pub fn row(&self, row: usize) -> Option<&[T]> {
        if row >= self.shape.rows {
            return None;
        }
        let start = self.shape.flat_index(row, 0);
        Some(&self.values[start..start + self.shape.cols])
    }

    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.values
    }

    /// Elementwise transform preserving the shape.
    pub fn map<U, F>(&self, f: F) -> Grid<U>
    where
        F: Fn(&T) -> U,
    {
        Grid {
            shape: self.shape,
            values: self.values.iter().map(f).collect(),
        }
    }
}

impl<T: Clone> Grid<T> {
    /// Copy out a rectangular window. Ranges are clamped to the grid.
    pub fn subset(&self, rows: Range<usize>, cols: Range<usize>) -> Grid<T> {
        let row_end = rows.end.min(self.shape.rows);
        let col_end = cols.end.min(self.shape.cols);
        let row_start = rows.start.min(row_end);
        let col_start = cols.start.min(col_end);

        let shape = GridShape::new(row_end - row_start, col_end - col_start);
        let mut values = Vec::with_capacity(shape.len());
        for row in row_start..row_end {
            let offset = self.shape.flat_index(row, 0);
            values.extend_from_slice(&self.values[offset + col_start..offset + col_end]);
        }

        Grid { shape, values }
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(
            row < self.shape.rows && col < self.shape.cols,
            "grid index ({}, {}) out of range for {}x{}",
            row,
            col,
            self.shape.rows,
            self.shape.cols
        );
        &self.values[self.shape.flat_index(row, col)]
    }
}

/// Coordinate and depth grids describing one bathymetry field.
///
/// `depth` holds f32 because that is what the renderer consumes; NaN marks
/// cells without a depth (land, once normalised).
#[derive(Debug, Clone)]
pub struct BathymetryGrid {
    pub lon: Grid<f64>,
    pub lat: Grid<f64>,
    pub depth: Grid<f32>,
}

impl BathymetryGrid {
    /// Split a reshaped sample grid into coordinate and raw-depth grids.
    pub fn from_samples(samples: &Grid<Sample>) -> Self {
        Self {
            lon: samples.map(|s| s.lon),
            lat: samples.map(|s| s.lat),
            depth: samples.map(|s| s.depth as f32),
        }
    }

    /// Convert raw elevations to depths, masking land with NaN.
    pub fn normalize_depths(&mut self) {
        normalize_depths(self.depth.as_mut_slice());
    }

    pub fn shape(&self) -> GridShape {
        self.depth.shape()
    }

    /// Longitudes along the first row.
    pub fn lon_axis(&self) -> Vec<f64> {
        self.lon.row(0).map(<[f64]>::to_vec).unwrap_or_default()
    }

    /// Latitudes down the first column.
    pub fn lat_axis(&self) -> Vec<f64> {
        (0..self.lat.rows())
            .filter_map(|row| self.lat.get(row, 0).copied())
            .collect()
    }

    /// Min and max of the non-NaN depths.
    pub fn depth_range(&self) -> Option<(f32, f32)> {
        self.depth
            .as_slice()
            .iter()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Window of the grid covering `bbox`, widened by one node on each side
    /// so cells straddling the edge are kept. `None` if nothing overlaps.
    pub fn crop(&self, bbox: &BoundingBox) -> Option<BathymetryGrid> {
        let cols = axis_window(&self.lon_axis(), bbox.min_x, bbox.max_x)?;
        let rows = axis_window(&self.lat_axis(), bbox.min_y, bbox.max_y)?;

        Some(BathymetryGrid {
            lon: self.lon.subset(rows.clone(), cols.clone()),
            lat: self.lat.subset(rows.clone(), cols.clone()),
            depth: self.depth.subset(rows, cols),
        })
    }
}

/// Index range of axis nodes inside [min, max], plus one node either side.
fn axis_window(axis: &[f64], min: f64, max: f64) -> Option<Range<usize>> {
    let mut inside = axis
        .iter()
        .enumerate()
        .filter(|(_, &v)| v >= min && v <= max)
        .map(|(i, _)| i);

    let first = inside.next()?;
    let last = inside.last().unwrap_or(first);

    Some(first.saturating_sub(1)..(last + 2).min(axis.len()))
}
