//! Record types read from the delimited input files.

/// One bathymetry measurement. Depth is in metres, positive above sea level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub lon: f64,
    pub lat: f64,
    pub depth: f64,
}

impl Sample {
    pub fn new(lon: f64, lat: f64, depth: f64) -> Self {
        Self { lon, lat, depth }
    }
}

/// A coastline vertex with its raw path command code.
///
/// The code is kept uninterpreted; see [`crate::path::PathCommand::from_code`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoastlineVertex {
    pub x: f64,
    pub y: f64,
    pub code: i32,
}

impl CoastlineVertex {
    pub fn new(x: f64, y: f64, code: i32) -> Self {
        Self { x, y, code }
    }
}

/// A text label anchored at a map position.
#[derive(Debug, Clone, PartialEq)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

impl Landmark {
    pub fn new(x: f64, y: f64, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
        }
    }

    /// Text as drawn on the map: a leader dash pointing at the anchor.
    pub fn display_text(&self) -> String {
        format!("-{}", self.text)
    }
}
