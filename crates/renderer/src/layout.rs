//! Figure geometry: where the map, colorbar and furniture go on the canvas.

use bathy_common::{BathyError, BathyResult, BoundingBox};

use crate::style::MapStyle;

// Axes placement as fractions of the figure (left, bottom, right, top).
const AXES_LEFT: f32 = 0.1;
const AXES_BOTTOM: f32 = 0.1;
const AXES_RIGHT: f32 = 1.0;
const AXES_TOP: f32 = 0.9;

// Share of the axes width given to the colorbar and the gap before it.
const COLORBAR_FRACTION: f32 = 0.15;
const COLORBAR_PAD: f32 = 0.05;
const COLORBAR_ASPECT: f32 = 20.0;

/// Axis-aligned rectangle in pixel coordinates (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PixelRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Shrink on all sides by `margin`, never below zero size.
    pub fn inset(&self, margin: f32) -> PixelRect {
        let margin = margin.min(self.width / 2.0).min(self.height / 2.0).max(0.0);
        PixelRect::new(
            self.x + margin,
            self.y + margin,
            self.width - 2.0 * margin,
            self.height - 2.0 * margin,
        )
    }

    pub fn to_skia(&self) -> Option<tiny_skia::Rect> {
        tiny_skia::Rect::from_xywh(self.x, self.y, self.width, self.height)
    }
}

/// Maps geographic coordinates onto a pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub bounds: BoundingBox,
    pub rect: PixelRect,
}

impl Viewport {
    pub fn new(bounds: BoundingBox, rect: PixelRect) -> Self {
        Self { bounds, rect }
    }

    /// Pixel position of (lon, lat). North is up.
    pub fn project(&self, lon: f64, lat: f64) -> (f32, f32) {
        let fx = (lon - self.bounds.min_x) / self.bounds.width();
        let fy = (self.bounds.max_y - lat) / self.bounds.height();
        (
            self.rect.x + (fx as f32) * self.rect.width,
            self.rect.y + (fy as f32) * self.rect.height,
        )
    }

    /// Geographic position of a pixel.
    pub fn unproject(&self, px: f32, py: f32) -> (f64, f64) {
        let fx = ((px - self.rect.x) / self.rect.width) as f64;
        let fy = ((py - self.rect.y) / self.rect.height) as f64;
        (
            self.bounds.min_x + fx * self.bounds.width(),
            self.bounds.max_y - fy * self.bounds.height(),
        )
    }
}

/// Resolved positions of every part of the figure.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureLayout {
    pub width: u32,
    pub height: u32,
    /// Map area; equal degrees on both axes
    pub plot: PixelRect,
    pub colorbar: PixelRect,
    pub viewport: Viewport,
}

impl FigureLayout {
    pub fn compute(style: &MapStyle, bounds: &BoundingBox) -> BathyResult<Self> {
        if !bounds.is_valid() || bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return Err(BathyError::Config(format!(
                "viewport {:?} has no area",
                bounds
            )));
        }

        let (width, height) = style.canvas_size();
        let (w, h) = (width as f32, height as f32);

        let axes_x = AXES_LEFT * w;
        let axes_y = (1.0 - AXES_TOP) * h;
        let axes_w = (AXES_RIGHT - AXES_LEFT) * w;
        let axes_h = (AXES_TOP - AXES_BOTTOM) * h;

        let region_w = axes_w * (1.0 - COLORBAR_FRACTION - COLORBAR_PAD);

        let data_w = bounds.width() as f32;
        let data_h = bounds.height() as f32;
        let scale = (region_w / data_w).min(axes_h / data_h);
        let plot_w = data_w * scale;
        let plot_h = data_h * scale;

        let plot = PixelRect::new(
            axes_x + (region_w - plot_w) / 2.0,
            axes_y + (axes_h - plot_h) / 2.0,
            plot_w,
            plot_h,
        );

        let colorbar = PixelRect::new(
            axes_x + region_w + COLORBAR_PAD * axes_w,
            plot.y,
            (plot_h / COLORBAR_ASPECT).max(1.0),
            plot_h,
        );

        tracing::debug!(
            width,
            height,
            plot_x = plot.x,
            plot_y = plot.y,
            plot_w,
            plot_h,
            "Computed figure layout"
        );

        Ok(Self {
            width,
            height,
            plot,
            colorbar,
            viewport: Viewport::new(*bounds, plot),
        })
    }
}

/// Round tick positions covering [min, max], at most `max_ticks` of them.
///
/// Steps are 1, 2, 2.5 or 5 times a power of ten.
pub fn nice_ticks(min: f64, max: f64, max_ticks: usize) -> Vec<f64> {
    if !(max > min) || max_ticks == 0 || !min.is_finite() || !max.is_finite() {
        return vec![];
    }

    let step = nice_step(min, max, max_ticks);
    let first = (min / step - 1e-9).ceil() as i64;
    let last = (max / step + 1e-9).floor() as i64;

    (first..=last)
        .map(|i| {
            let v = i as f64 * step;
            if v.abs() < step * 1e-9 {
                0.0
            } else {
                v
            }
        })
        .collect()
}

/// Tick step that `nice_ticks` uses for the same inputs.
pub fn nice_step(min: f64, max: f64, max_ticks: usize) -> f64 {
    let raw = (max - min) / max_ticks.max(1) as f64;
    let magnitude = 10f64.powf(raw.log10().floor());

    [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|&s| (max - min) / s <= max_ticks as f64)
        .unwrap_or(10.0 * magnitude)
}

/// Tick label with just enough decimals for `step`.
pub fn format_tick(value: f64, step: f64) -> String {
    let mut decimals = 0;
    let mut scaled = step;
    while decimals < 6 && (scaled - scaled.round()).abs() > 1e-6 {
        scaled *= 10.0;
        decimals += 1;
    }
    format!("{:.*}", decimals, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn false_bay() -> BoundingBox {
        BoundingBox::new(18.2, -34.6, 19.0, -33.8)
    }

    #[test]
    fn test_project_corners() {
        let vp = Viewport::new(false_bay(), PixelRect::new(10.0, 20.0, 800.0, 800.0));

        let (x, y) = vp.project(18.2, -33.8);
        assert!((x - 10.0).abs() < 1e-3 && (y - 20.0).abs() < 1e-3);

        let (x, y) = vp.project(19.0, -34.6);
        assert!((x - 810.0).abs() < 1e-3 && (y - 820.0).abs() < 1e-3);
    }

    #[test]
    fn test_unproject_inverts_project() {
        let vp = Viewport::new(false_bay(), PixelRect::new(0.0, 0.0, 400.0, 400.0));
        let (px, py) = vp.project(18.5, -34.25);
        let (lon, lat) = vp.unproject(px, py);
        assert!((lon - 18.5).abs() < 1e-4);
        assert!((lat + 34.25).abs() < 1e-4);
    }

    #[test]
    fn test_equal_aspect_plot() {
        let layout = FigureLayout::compute(&MapStyle::default(), &false_bay()).unwrap();
        assert_eq!((layout.width, layout.height), (3840, 2880));
        assert!((layout.plot.width - layout.plot.height).abs() < 1e-2);
        assert!(layout.colorbar.x > layout.plot.right());
        assert!(layout.colorbar.right() < layout.width as f32);
    }

    #[test]
    fn test_rejects_empty_viewport() {
        let flat = BoundingBox::new(18.2, -34.0, 19.0, -34.0);
        assert!(FigureLayout::compute(&MapStyle::default(), &flat).is_err());
    }

    #[test]
    fn test_nice_ticks() {
        assert_eq!(nice_ticks(0.0, 200.0, 5), vec![0.0, 50.0, 100.0, 150.0, 200.0]);

        let lons = nice_ticks(18.2, 19.0, 5);
        assert_eq!(lons.len(), 5);
        assert!((lons[0] - 18.2).abs() < 1e-9);
        assert!((lons[4] - 19.0).abs() < 1e-9);
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(150.0, 50.0), "150");
        assert_eq!(format_tick(18.4, 0.2), "18.4");
        assert_eq!(format_tick(-34.25, 0.25), "-34.25");
    }

    #[test]
    fn test_inset() {
        let r = PixelRect::new(0.0, 0.0, 10.0, 4.0).inset(3.0);
        assert_eq!(r, PixelRect::new(2.0, 2.0, 6.0, 0.0));
    }
}
