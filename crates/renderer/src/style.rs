//! Style configuration for the bathymetry map.
//!
//! Sizes are in typographic points and converted to pixels with the output
//! DPI, so the same style renders consistently at any resolution.

use std::path::PathBuf;

use bathy_common::{BathyError, BathyResult};
use serde::{Deserialize, Serialize};

use crate::colormap::Color;

const POINTS_PER_INCH: f32 = 72.0;

/// Color stop for the depth ramp.
///
/// `value` is a position in [0, 1] along the display range.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ColorStop {
    pub value: f32,
    pub color: String,
}

impl ColorStop {
    pub fn new(value: f32, color: &str) -> Self {
        Self {
            value,
            color: color.to_string(),
        }
    }
}

/// Parse hex color string to RGB
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}

/// Parse a hex color into an opaque [`Color`], or a config error naming `field`.
pub fn parse_color(hex: &str, field: &str) -> BathyResult<Color> {
    hex_to_rgb(hex)
        .map(|(r, g, b)| Color::new(r, g, b, 255))
        .ok_or_else(|| BathyError::Config(format!("{} has invalid color '{}'", field, hex)))
}

/// Colour range of the depth ramp in data units.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct DisplayRange {
    pub min: f32,
    pub max: f32,
}

/// Contour overlay options.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ContourStyle {
    pub levels: Vec<f32>,
    pub line_color: String,
    pub line_width_pt: f32,
    pub smoothing_passes: u32,
    pub labels_enabled: bool,
    pub label_font_pt: f32,
    /// Minimum distance between labels along a line
    pub label_spacing_pt: f32,
}

impl Default for ContourStyle {
    fn default() -> Self {
        Self {
            levels: vec![20.0, 50.0, 100.0, 200.0],
            line_color: "#000000".to_string(),
            line_width_pt: 0.1,
            smoothing_passes: 0,
            labels_enabled: true,
            label_font_pt: 2.0,
            label_spacing_pt: 72.0,
        }
    }
}

/// Land polygon options.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LandStyle {
    pub fill_color: String,
    pub edge_color: String,
    pub edge_width_pt: f32,
}

impl Default for LandStyle {
    fn default() -> Self {
        Self {
            // light grey-green
            fill_color: "#D2E376".to_string(),
            edge_color: "#000000".to_string(),
            edge_width_pt: 0.1,
        }
    }
}

/// Free text options (title, axis labels, landmarks).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TextStyle {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub colorbar_label: String,
    pub title_font_pt: f32,
    pub axis_label_font_pt: f32,
    pub tick_font_pt: f32,
    pub colorbar_tick_font_pt: f32,
    pub landmark_font_pt: f32,
    pub color: String,
    /// TrueType font; when unset a list of common system fonts is tried.
    pub font_path: Option<PathBuf>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            title: "False Bay".to_string(),
            x_label: "Longitude (Degrees.E)".to_string(),
            y_label: "Latitude (Degrees.N)".to_string(),
            colorbar_label: "Depth (m)".to_string(),
            title_font_pt: 12.0,
            axis_label_font_pt: 10.0,
            tick_font_pt: 10.0,
            colorbar_tick_font_pt: 8.0,
            landmark_font_pt: 4.0,
            color: "#000000".to_string(),
            font_path: None,
        }
    }
}

/// Complete map style.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MapStyle {
    pub figure_width_in: f32,
    pub figure_height_in: f32,
    pub dpi: f32,
    pub background: String,
    pub color_stops: Vec<ColorStop>,
    pub display_range: DisplayRange,
    pub grid_line_color: String,
    pub grid_line_width_pt: f32,
    pub frame_width_pt: f32,
    pub contour: ContourStyle,
    pub land: LandStyle,
    pub text: TextStyle,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            figure_width_in: 6.4,
            figure_height_in: 4.8,
            dpi: 600.0,
            background: "#FFFFFF".to_string(),
            color_stops: blues_stops(),
            display_range: DisplayRange {
                min: 0.0,
                max: 200.0,
            },
            grid_line_color: "#B0B0B0".to_string(),
            grid_line_width_pt: 0.8,
            frame_width_pt: 0.8,
            contour: ContourStyle::default(),
            land: LandStyle::default(),
            text: TextStyle::default(),
        }
    }
}

impl MapStyle {
    /// Convert a size in points to pixels at this style's DPI.
    pub fn px(&self, points: f32) -> f32 {
        points * self.dpi / POINTS_PER_INCH
    }

    /// Output image size in pixels.
    pub fn canvas_size(&self) -> (u32, u32) {
        (
            (self.figure_width_in * self.dpi).round() as u32,
            (self.figure_height_in * self.dpi).round() as u32,
        )
    }

    /// Check sizes, ranges and colors before any drawing happens.
    pub fn validate(&self) -> BathyResult<()> {
        let (width, height) = self.canvas_size();
        if !(self.dpi > 0.0) || width == 0 || height == 0 {
            return Err(BathyError::Config(format!(
                "figure {}x{} in at {} dpi has no pixels",
                self.figure_width_in, self.figure_height_in, self.dpi
            )));
        }
        if !(self.display_range.max > self.display_range.min) {
            return Err(BathyError::Config(format!(
                "display range [{}, {}] is empty",
                self.display_range.min, self.display_range.max
            )));
        }
        if self.color_stops.is_empty() {
            return Err(BathyError::Config("no color stops".to_string()));
        }
        for stop in &self.color_stops {
            parse_color(&stop.color, "color_stops")?;
        }
        parse_color(&self.background, "background")?;
        parse_color(&self.grid_line_color, "grid_line_color")?;
        parse_color(&self.contour.line_color, "contour.line_color")?;
        parse_color(&self.land.fill_color, "land.fill_color")?;
        parse_color(&self.land.edge_color, "land.edge_color")?;
        parse_color(&self.text.color, "text.color")?;
        Ok(())
    }
}

/// The matplotlib "Blues" sequential ramp (ColorBrewer 9-class).
pub fn blues_stops() -> Vec<ColorStop> {
    const BLUES: [&str; 9] = [
        "#F7FBFF", "#DEEBF7", "#C6DBEF", "#9ECAE1", "#6BAED6", "#4292C6", "#2171B5", "#08519C",
        "#08306B",
    ];
    let last = (BLUES.len() - 1) as f32;
    BLUES
        .iter()
        .enumerate()
        .map(|(i, hex)| ColorStop::new(i as f32 / last, hex))
        .collect()
}
