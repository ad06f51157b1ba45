//! Image rendering for bathymetry maps.
//!
//! Implements the layers of a map figure:
//! - Flat-shaded depth raster with a color ramp
//! - Contour lines (marching squares) with labels
//! - Filled coastline polygons
//! - Axes, grid, colorbar and text

pub mod colormap;
pub mod contour;
pub mod glyphs;
pub mod layout;
pub mod map;
pub mod png;
pub mod style;
pub mod text;

pub use colormap::{Color, ColorMap};
pub use layout::{FigureLayout, PixelRect, Viewport};
pub use map::{MapRenderer, MapScene};
pub use png::encode_png;
pub use style::{ColorStop, ContourStyle, DisplayRange, LandStyle, MapStyle, TextStyle};
pub use text::TextRenderer;
