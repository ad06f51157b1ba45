//! TrueType text for titles, axis labels and landmark names.

use std::path::{Path, PathBuf};

use bathy_common::{BathyError, BathyResult};
use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use rusttype::{Font, Scale};

use crate::colormap::Color;

/// Fonts tried when none is configured.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

/// Top-left corner of a `width` x `height` box whose anchor sits on (x, y).
pub fn anchor_origin(x: f32, y: f32, width: f32, height: f32, h: HAlign, v: VAlign) -> (f32, f32) {
    let left = match h {
        HAlign::Left => x,
        HAlign::Center => x - width / 2.0,
        HAlign::Right => x - width,
    };
    let top = match v {
        VAlign::Top => y,
        VAlign::Center => y - height / 2.0,
        VAlign::Bottom => y - height,
    };
    (left, top)
}

/// Draws strings with a loaded TrueType font.
pub struct TextRenderer {
    font: Font<'static>,
    source: PathBuf,
}

impl std::fmt::Debug for TextRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRenderer")
            .field("source", &self.source)
            .finish()
    }
}

impl TextRenderer {
    pub fn load(path: impl AsRef<Path>) -> BathyResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| BathyError::io(path, e))?;
        let font = Font::try_from_vec(data).ok_or_else(|| {
            BathyError::Render(format!("{} is not a usable TrueType font", path.display()))
        })?;

        Ok(Self {
            font,
            source: path.to_path_buf(),
        })
    }

    /// Load the configured font, falling back to common system fonts.
    ///
    /// Returns `None` when nothing loads; free text is then left out.
    pub fn discover(configured: Option<&Path>) -> Option<Self> {
        if let Some(path) = configured {
            match Self::load(path) {
                Ok(renderer) => return Some(renderer),
                Err(e) => tracing::warn!(error = %e, "Configured font unavailable"),
            }
        }

        for candidate in SYSTEM_FONTS {
            if let Ok(renderer) = Self::load(candidate) {
                tracing::debug!(font = candidate, "Using system font");
                return Some(renderer);
            }
        }

        tracing::warn!("No TrueType font found; title, axis labels and landmarks will be skipped");
        None
    }

    /// Width and height in pixels of `text` at `size` px.
    pub fn measure(&self, text: &str, size: f32) -> (u32, u32) {
        if text.is_empty() {
            return (0, 0);
        }
        let (w, h) = text_size(Scale::uniform(size), &self.font, text);
        (w.max(0) as u32, h.max(0) as u32)
    }

    /// Draw `text` so that the chosen anchor of its box sits on (x, y).
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &self,
        img: &mut RgbaImage,
        text: &str,
        x: f32,
        y: f32,
        size: f32,
        color: Color,
        h: HAlign,
        v: VAlign,
    ) {
        if text.is_empty() || size <= 0.0 {
            return;
        }
        let (w, th) = self.measure(text, size);
        let (left, top) = anchor_origin(x, y, w as f32, th as f32, h, v);

        draw_text_mut(
            img,
            Rgba(color.to_array()),
            left.round() as i32,
            top.round() as i32,
            Scale::uniform(size),
            &self.font,
            text,
        );
    }

    /// Draw `text` reading bottom to top, centred on (x, y).
    pub fn draw_vertical(&self, img: &mut RgbaImage, text: &str, x: f32, y: f32, size: f32, color: Color) {
        let (w, h) = self.measure(text, size);
        if w == 0 || h == 0 {
            return;
        }

        // a little headroom for descenders
        let pad = (size * 0.25).ceil() as u32;
        let mut strip = RgbaImage::from_pixel(w + 2 * pad, h + 2 * pad, Rgba([0, 0, 0, 0]));
        draw_text_mut(
            &mut strip,
            Rgba(color.to_array()),
            pad as i32,
            pad as i32,
            Scale::uniform(size),
            &self.font,
            text,
        );

        let rotated = imageops::rotate270(&strip);
        let left = x - rotated.width() as f32 / 2.0;
        let top = y - rotated.height() as f32 / 2.0;
        imageops::overlay(img, &rotated, left.round() as i64, top.round() as i64);
    }
}
