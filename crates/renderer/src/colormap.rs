//! Value-to-color mapping for gridded depth data.

use bathy_common::{BathyError, BathyResult};

use crate::style::{parse_color, ColorStop, DisplayRange};

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0, 255);
    pub const WHITE: Color = Color::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Linear color interpolation
fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;

    let mix = |a: u8, b: u8| (a as f32 * t_inv + b as f32 * t).round() as u8;
    Color::new(
        mix(color1.r, color2.r),
        mix(color1.g, color2.g),
        mix(color1.b, color2.b),
        mix(color1.a, color2.a),
    )
}

/// A piecewise-linear color ramp over a fixed display range.
///
/// Values outside the range clamp to the end colors; NaN has no color.
#[derive(Debug, Clone)]
pub struct ColorMap {
    /// (position in [0, 1], color), sorted by position
    stops: Vec<(f32, Color)>,
    min: f32,
    max: f32,
}

impl ColorMap {
    pub fn from_stops(stops: &[ColorStop], range: DisplayRange) -> BathyResult<Self> {
        if stops.is_empty() {
            return Err(BathyError::Config("color map needs at least one stop".to_string()));
        }
        if !(range.max > range.min) {
            return Err(BathyError::Config(format!(
                "color map range [{}, {}] is empty",
                range.min, range.max
            )));
        }

        let mut parsed = stops
            .iter()
            .map(|s| Ok((s.value.clamp(0.0, 1.0), parse_color(&s.color, "color_stops")?)))
            .collect::<BathyResult<Vec<_>>>()?;
        parsed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        Ok(Self {
            stops: parsed,
            min: range.min,
            max: range.max,
        })
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Color for a data value, or `None` for NaN.
    pub fn color_for(&self, value: f32) -> Option<Color> {
        if value.is_nan() {
            return None;
        }
        let t = ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0);
        Some(self.color_at(t))
    }

    /// Color at a normalised position along the ramp.
    pub fn color_at(&self, t: f32) -> Color {
        let first = self.stops[0];
        if t <= first.0 {
            return first.1;
        }

        for pair in self.stops.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if t <= hi.0 {
                let span = hi.0 - lo.0;
                if span <= f32::EPSILON {
                    return hi.1;
                }
                return interpolate_color(lo.1, hi.1, (t - lo.0) / span);
            }
        }

        self.stops[self.stops.len() - 1].1
    }
}
