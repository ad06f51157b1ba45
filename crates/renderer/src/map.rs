//! Full map composition: depth raster, contours, coastline, furniture and text.

use std::time::Instant;

use bathy_common::{BathyError, BathyResult, BathymetryGrid, BoundingBox, CompoundPath, Landmark};
use image::RgbaImage;
use tiny_skia::{
    ColorU8, FillRule, LineCap, Mask, Paint, PathBuilder, Pixmap, Stroke, Transform,
};

use crate::colormap::{Color, ColorMap};
use crate::contour::{draw_contours, generate_all_contours, Contour, ContourConfig, Point};
use crate::glyphs::{draw_stroke_text, StrokeText};
use crate::layout::{format_tick, nice_step, nice_ticks, FigureLayout, PixelRect, Viewport};
use crate::png::encode_png;
use crate::style::{parse_color, MapStyle};
use crate::text::{anchor_origin, HAlign, TextRenderer, VAlign};

const MAX_AXIS_TICKS: usize = 5;
const TICK_LENGTH_PT: f32 = 3.5;
const TICK_PAD_PT: f32 = 3.5;
const LABEL_PAD_PT: f32 = 4.0;
const TITLE_PAD_PT: f32 = 6.0;

/// Everything drawn on one map.
#[derive(Debug, Clone, Copy)]
pub struct MapScene<'a> {
    pub bathymetry: &'a BathymetryGrid,
    pub coastline: &'a CompoundPath,
    pub landmarks: &'a [Landmark],
    /// Visible longitude/latitude window
    pub bounds: BoundingBox,
}

#[derive(Debug, Clone, Copy)]
struct Palette {
    background: Color,
    grid: Color,
    contour: Color,
    land_fill: Color,
    land_edge: Color,
    text: Color,
}

impl Palette {
    fn from_style(style: &MapStyle) -> BathyResult<Self> {
        Ok(Self {
            background: parse_color(&style.background, "background")?,
            grid: parse_color(&style.grid_line_color, "grid_line_color")?,
            contour: parse_color(&style.contour.line_color, "contour.line_color")?,
            land_fill: parse_color(&style.land.fill_color, "land.fill_color")?,
            land_edge: parse_color(&style.land.edge_color, "land.edge_color")?,
            text: parse_color(&style.text.color, "text.color")?,
        })
    }
}

/// A tick label waiting to be drawn, anchored at (x, y).
#[derive(Debug, Clone)]
struct TickLabel {
    x: f32,
    y: f32,
    text: String,
    size: f32,
    h: HAlign,
    v: VAlign,
}

/// Renders [`MapScene`]s with a fixed style.
#[derive(Debug)]
pub struct MapRenderer {
    style: MapStyle,
    colormap: ColorMap,
    palette: Palette,
    text: Option<TextRenderer>,
}

impl MapRenderer {
    /// Validate `style` and look up a font for free text.
    pub fn new(style: MapStyle) -> BathyResult<Self> {
        let text = TextRenderer::discover(style.text.font_path.as_deref());
        Self::with_text(style, text)
    }

    /// Build with an explicit text renderer (or none).
    pub fn with_text(style: MapStyle, text: Option<TextRenderer>) -> BathyResult<Self> {
        style.validate()?;
        let colormap = ColorMap::from_stops(&style.color_stops, style.display_range)?;
        let palette = Palette::from_style(&style)?;

        Ok(Self {
            style,
            colormap,
            palette,
            text,
        })
    }

    pub fn style(&self) -> &MapStyle {
        &self.style
    }

    /// Render the scene to a PNG byte stream tagged with the style DPI.
    pub fn render_png(&self, scene: &MapScene<'_>) -> BathyResult<Vec<u8>> {
        let img = self.render(scene)?;
        encode_png(img.as_raw(), img.width(), img.height(), Some(self.style.dpi))
    }

    /// Render the scene to an RGBA image.
    pub fn render(&self, scene: &MapScene<'_>) -> BathyResult<RgbaImage> {
        let start = Instant::now();
        let layout = FigureLayout::compute(&self.style, &scene.bounds)?;

        let mut pixmap = Pixmap::new(layout.width, layout.height).ok_or_else(|| {
            BathyError::Render(format!(
                "cannot allocate {}x{} canvas",
                layout.width, layout.height
            ))
        })?;
        let bg = self.palette.background;
        pixmap.fill(tiny_skia::Color::from_rgba8(bg.r, bg.g, bg.b, bg.a));

        let plot_mask = rect_mask(layout.width, layout.height, &layout.plot)?;

        let cropped = scene.bathymetry.crop(&scene.bounds);
        match &cropped {
            Some(grid) => self.draw_depth_raster(&mut pixmap, grid, &layout.viewport),
            None => tracing::warn!(
                bounds = ?scene.bounds,
                "Bathymetry grid does not overlap the viewport"
            ),
        }

        self.draw_coastline(&mut pixmap, scene.coastline, &layout.viewport, &plot_mask);

        // contour lines sit above the land fill
        if let Some(grid) = &cropped {
            self.draw_depth_contours(&mut pixmap, grid, &layout, &plot_mask);
        }

        let mut tick_labels = self.draw_axes(&mut pixmap, &layout);
        tick_labels.extend(self.draw_colorbar(&mut pixmap, &layout));

        if self.text.is_none() {
            self.draw_glyph_labels(&mut pixmap, &tick_labels);
        }

        let mut img = pixmap_to_image(&pixmap)?;

        if let Some(text) = &self.text {
            self.draw_text(&mut img, text, &layout, &tick_labels, scene.landmarks);
        }

        tracing::info!(
            width = layout.width,
            height = layout.height,
            landmarks = scene.landmarks.len(),
            font = self.text.is_some(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Rendered map"
        );

        Ok(img)
    }

    /// Flat-shaded cells: cell (r, c) spans nodes r..r+1 and c..c+1 and takes
    /// the depth at node (r, c).
    fn draw_depth_raster(&self, pixmap: &mut Pixmap, grid: &BathymetryGrid, viewport: &Viewport) {
        let lon_axis = grid.lon_axis();
        let lat_axis = grid.lat_axis();
        let (width, height) = (pixmap.width() as usize, pixmap.height() as usize);
        let rect = viewport.rect;

        let x0 = rect.x.floor().max(0.0) as usize;
        let x1 = (rect.right().ceil() as usize).min(width);
        let y0 = rect.y.floor().max(0.0) as usize;
        let y1 = (rect.bottom().ceil() as usize).min(height);

        let columns: Vec<Option<usize>> = (x0..x1)
            .map(|px| {
                let cx = px as f32 + 0.5;
                if cx < rect.x || cx > rect.right() {
                    return None;
                }
                let (lon, _) = viewport.unproject(cx, rect.y);
                cell_index(&lon_axis, lon)
            })
            .collect();

        let mut painted = 0usize;
        let pixels = pixmap.pixels_mut();
        for py in y0..y1 {
            let cy = py as f32 + 0.5;
            if cy < rect.y || cy > rect.bottom() {
                continue;
            }
            let (_, lat) = viewport.unproject(rect.x, cy);
            let Some(row) = cell_index(&lat_axis, lat) else {
                continue;
            };

            for (i, col) in columns.iter().enumerate() {
                let Some(col) = *col else {
                    continue;
                };
                let depth = grid.depth[(row, col)];
                if let Some(c) = self.colormap.color_for(depth) {
                    pixels[py * width + x0 + i] = ColorU8::from_rgba(c.r, c.g, c.b, c.a).premultiply();
                    painted += 1;
                }
            }
        }

        tracing::debug!(painted, rows = grid.shape().rows, cols = grid.shape().cols, "Drew depth raster");
    }

    fn contour_config(&self) -> ContourConfig {
        let style = &self.style.contour;
        ContourConfig {
            levels: style.levels.clone(),
            line_width: self.style.px(style.line_width_pt),
            line_color: self.palette.contour,
            smoothing_passes: style.smoothing_passes,
            labels_enabled: style.labels_enabled,
            label_font_size: self.style.px(style.label_font_pt),
            label_spacing: self.style.px(style.label_spacing_pt),
        }
    }

    fn draw_depth_contours(
        &self,
        pixmap: &mut Pixmap,
        grid: &BathymetryGrid,
        layout: &FigureLayout,
        mask: &Mask,
    ) {
        let config = self.contour_config();
        let shape = grid.shape();
        let contours = generate_all_contours(grid.depth.as_slice(), shape.cols, shape.rows, &config);

        let lon_axis = grid.lon_axis();
        let lat_axis = grid.lat_axis();
        let projected: Vec<Contour> = contours
            .iter()
            .map(|c| {
                c.map_points(|p| {
                    let lon = axis_lerp(&lon_axis, p.x as f64);
                    let lat = axis_lerp(&lat_axis, p.y as f64);
                    let (x, y) = layout.viewport.project(lon, lat);
                    Point::new(x, y)
                })
            })
            .collect();

        draw_contours(pixmap, &projected, &config, &layout.plot, Some(mask));
    }

    fn draw_coastline(
        &self,
        pixmap: &mut Pixmap,
        coastline: &CompoundPath,
        viewport: &Viewport,
        mask: &Mask,
    ) {
        let mut pb = PathBuilder::new();
        for subpath in coastline.subpaths() {
            let mut vertices = subpath.vertices().iter();
            let Some(&(x, y)) = vertices.next() else {
                continue;
            };
            let (px, py) = viewport.project(x, y);
            pb.move_to(px, py);
            for &(x, y) in vertices {
                let (px, py) = viewport.project(x, y);
                pb.line_to(px, py);
            }
            if subpath.is_closed() {
                pb.close();
            }
        }

        let Some(path) = pb.finish() else {
            tracing::debug!("Coastline is empty");
            return;
        };

        pixmap.fill_path(
            &path,
            &paint(self.palette.land_fill),
            FillRule::Winding,
            Transform::identity(),
            Some(mask),
        );

        let stroke = Stroke {
            width: self.style.px(self.style.land.edge_width_pt),
            ..Stroke::default()
        };
        pixmap.stroke_path(
            &path,
            &paint(self.palette.land_edge),
            &stroke,
            Transform::identity(),
            Some(mask),
        );

        tracing::debug!(
            subpaths = coastline.subpaths().len(),
            vertices = coastline.vertex_count(),
            "Drew coastline"
        );
    }

    /// Grid lines, frame and tick marks; returns the tick labels to draw.
    fn draw_axes(&self, pixmap: &mut Pixmap, layout: &FigureLayout) -> Vec<TickLabel> {
        let plot = layout.plot;
        let bounds = layout.viewport.bounds;
        let tick_len = self.style.px(TICK_LENGTH_PT);
        let pad = self.style.px(TICK_PAD_PT);
        let size = self.style.px(self.style.text.tick_font_pt);

        let grid_paint = paint(self.palette.grid);
        let grid_width = self.style.px(self.style.grid_line_width_pt);
        let ink = paint(self.palette.text);
        let frame_width = self.style.px(self.style.frame_width_pt);

        let mut labels = Vec::new();

        let x_step = nice_step(bounds.min_x, bounds.max_x, MAX_AXIS_TICKS);
        for lon in nice_ticks(bounds.min_x, bounds.max_x, MAX_AXIS_TICKS) {
            let (x, _) = layout.viewport.project(lon, bounds.min_y);
            stroke_line(pixmap, (x, plot.y), (x, plot.bottom()), &grid_paint, grid_width);
            stroke_line(pixmap, (x, plot.bottom()), (x, plot.bottom() + tick_len), &ink, frame_width);
            labels.push(TickLabel {
                x,
                y: plot.bottom() + tick_len + pad,
                text: format_tick(lon, x_step),
                size,
                h: HAlign::Center,
                v: VAlign::Top,
            });
        }

        let y_step = nice_step(bounds.min_y, bounds.max_y, MAX_AXIS_TICKS);
        for lat in nice_ticks(bounds.min_y, bounds.max_y, MAX_AXIS_TICKS) {
            let (_, y) = layout.viewport.project(bounds.min_x, lat);
            stroke_line(pixmap, (plot.x, y), (plot.right(), y), &grid_paint, grid_width);
            stroke_line(pixmap, (plot.x - tick_len, y), (plot.x, y), &ink, frame_width);
            labels.push(TickLabel {
                x: plot.x - tick_len - pad,
                y,
                text: format_tick(lat, y_step),
                size,
                h: HAlign::Right,
                v: VAlign::Center,
            });
        }

        stroke_rect(pixmap, &plot, &ink, frame_width);
        labels
    }

    /// Vertical depth ramp beside the map, deepest at the top.
    fn draw_colorbar(&self, pixmap: &mut Pixmap, layout: &FigureLayout) -> Vec<TickLabel> {
        let bar = layout.colorbar;
        let (width, height) = (pixmap.width() as usize, pixmap.height() as usize);

        let x0 = bar.x.round().max(0.0) as usize;
        let x1 = (bar.right().round() as usize).min(width);
        let y0 = bar.y.round().max(0.0) as usize;
        let y1 = (bar.bottom().round() as usize).min(height);

        let pixels = pixmap.pixels_mut();
        for py in y0..y1 {
            if x0 >= x1 {
                break;
            }
            let t = 1.0 - ((py as f32 + 0.5 - bar.y) / bar.height).clamp(0.0, 1.0);
            let c = self.colormap.color_at(t);
            let color = ColorU8::from_rgba(c.r, c.g, c.b, c.a).premultiply();
            pixels[py * width + x0..py * width + x1].fill(color);
        }

        let ink = paint(self.palette.text);
        let frame_width = self.style.px(self.style.frame_width_pt);
        stroke_rect(pixmap, &bar, &ink, frame_width);

        let tick_len = self.style.px(TICK_LENGTH_PT);
        let pad = self.style.px(TICK_PAD_PT);
        let size = self.style.px(self.style.text.colorbar_tick_font_pt);
        let (min, max) = (self.colormap.min() as f64, self.colormap.max() as f64);
        let step = nice_step(min, max, MAX_AXIS_TICKS);

        nice_ticks(min, max, MAX_AXIS_TICKS)
            .into_iter()
            .map(|value| {
                let y = bar.bottom() - ((value - min) / (max - min)) as f32 * bar.height;
                stroke_line(pixmap, (bar.right(), y), (bar.right() + tick_len, y), &ink, frame_width);
                TickLabel {
                    x: bar.right() + tick_len + pad,
                    y,
                    text: format_tick(value, step),
                    size,
                    h: HAlign::Left,
                    v: VAlign::Center,
                }
            })
            .collect()
    }

    /// Tick labels drawn as stroke numerals when no font is available.
    fn draw_glyph_labels(&self, pixmap: &mut Pixmap, labels: &[TickLabel]) {
        for label in labels {
            // stroke numerals are drawn at cap height
            let style = StrokeText {
                size: label.size * 0.7,
                color: self.palette.text,
                background: None,
            };
            let w = style.width(&label.text);
            let (left, top) = anchor_origin(label.x, label.y, w, style.size, label.h, label.v);
            draw_stroke_text(
                pixmap,
                left + w / 2.0,
                top + style.size / 2.0,
                0.0,
                &label.text,
                &style,
                None,
            );
        }
    }

    fn draw_text(
        &self,
        img: &mut RgbaImage,
        text: &TextRenderer,
        layout: &FigureLayout,
        tick_labels: &[TickLabel],
        landmarks: &[Landmark],
    ) {
        let style = &self.style.text;
        let color = self.palette.text;
        let plot = layout.plot;

        for label in tick_labels {
            text.draw(img, &label.text, label.x, label.y, label.size, color, label.h, label.v);
        }

        let label_pad = self.style.px(LABEL_PAD_PT);
        let tick_space = self.style.px(TICK_LENGTH_PT + TICK_PAD_PT);
        let tick_size = self.style.px(style.tick_font_pt);
        let widest = |align: HAlign| {
            tick_labels
                .iter()
                .filter(|l| l.h == align)
                .map(|l| text.measure(&l.text, l.size).0)
                .max()
                .unwrap_or(0) as f32
        };

        let title_size = self.style.px(style.title_font_pt);
        text.draw(
            img,
            &style.title,
            plot.center_x(),
            plot.y - self.style.px(TITLE_PAD_PT),
            title_size,
            color,
            HAlign::Center,
            VAlign::Bottom,
        );

        let axis_size = self.style.px(style.axis_label_font_pt);
        let tick_height = text.measure("0123456789", tick_size).1 as f32;
        text.draw(
            img,
            &style.x_label,
            plot.center_x(),
            plot.bottom() + tick_space + tick_height + label_pad,
            axis_size,
            color,
            HAlign::Center,
            VAlign::Top,
        );

        let y_tick_width = widest(HAlign::Right);
        let y_label_height = text.measure(&style.y_label, axis_size).1 as f32;
        text.draw_vertical(
            img,
            &style.y_label,
            plot.x - tick_space - y_tick_width - label_pad - y_label_height / 2.0,
            plot.center_y(),
            axis_size,
            color,
        );

        let bar = layout.colorbar;
        let cb_size = self.style.px(style.colorbar_tick_font_pt);
        let cb_tick_width = widest(HAlign::Left);
        let cb_label_height = text.measure(&style.colorbar_label, cb_size).1 as f32;
        text.draw_vertical(
            img,
            &style.colorbar_label,
            bar.right() + tick_space + cb_tick_width + label_pad + cb_label_height / 2.0,
            bar.center_y(),
            axis_size,
            color,
        );

        let landmark_size = self.style.px(style.landmark_font_pt);
        for landmark in landmarks {
            let (x, y) = layout.viewport.project(landmark.x, landmark.y);
            text.draw(
                img,
                &landmark.display_text(),
                x,
                y,
                landmark_size,
                color,
                HAlign::Left,
                VAlign::Center,
            );
        }
    }
}

/// Index of the cell containing `value` along a monotonic node axis.
///
/// Works for ascending and descending axes; `None` outside the axis span.
pub fn cell_index(axis: &[f64], value: f64) -> Option<usize> {
    if axis.len() < 2 || value.is_nan() {
        return None;
    }
    let first = axis[0];
    let last = axis[axis.len() - 1];
    let max_cell = axis.len() - 2;

    let nodes_before = if last >= first {
        if value < first || value > last {
            return None;
        }
        axis.partition_point(|&a| a <= value)
    } else {
        if value > first || value < last {
            return None;
        }
        axis.partition_point(|&a| a >= value)
    };

    Some(nodes_before.saturating_sub(1).min(max_cell))
}

/// Coordinate at fractional node index `t` along `axis`.
pub fn axis_lerp(axis: &[f64], t: f64) -> f64 {
    match axis.len() {
        0 => f64::NAN,
        1 => axis[0],
        n => {
            let i = (t.floor().max(0.0) as usize).min(n - 2);
            let frac = t - i as f64;
            axis[i] + frac * (axis[i + 1] - axis[i])
        }
    }
}

fn paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

fn stroke_line(pixmap: &mut Pixmap, from: (f32, f32), to: (f32, f32), paint: &Paint<'_>, width: f32) {
    let mut pb = PathBuilder::new();
    pb.move_to(from.0, from.1);
    pb.line_to(to.0, to.1);
    if let Some(path) = pb.finish() {
        let stroke = Stroke {
            width,
            line_cap: LineCap::Butt,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, paint, &stroke, Transform::identity(), None);
    }
}

fn stroke_rect(pixmap: &mut Pixmap, rect: &PixelRect, paint: &Paint<'_>, width: f32) {
    if let Some(r) = rect.to_skia() {
        let path = PathBuilder::from_rect(r);
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, paint, &stroke, Transform::identity(), None);
    }
}

fn rect_mask(width: u32, height: u32, rect: &PixelRect) -> BathyResult<Mask> {
    let mut mask = Mask::new(width, height)
        .ok_or_else(|| BathyError::Render(format!("cannot allocate {}x{} mask", width, height)))?;
    let r = rect
        .to_skia()
        .ok_or_else(|| BathyError::Render(format!("plot area {:?} is degenerate", rect)))?;
    mask.fill_path(&PathBuilder::from_rect(r), FillRule::Winding, true, Transform::identity());
    Ok(mask)
}

fn pixmap_to_image(pixmap: &Pixmap) -> BathyResult<RgbaImage> {
    let mut raw = Vec::with_capacity(pixmap.pixels().len() * 4);
    for pixel in pixmap.pixels() {
        let c = pixel.demultiply();
        raw.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), raw)
        .ok_or_else(|| BathyError::Render("pixel buffer does not match canvas size".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_index_ascending() {
        let axis = [18.0, 18.5, 19.0];
        assert_eq!(cell_index(&axis, 18.0), Some(0));
        assert_eq!(cell_index(&axis, 18.7), Some(1));
        // last node belongs to the last cell
        assert_eq!(cell_index(&axis, 19.0), Some(1));
        assert_eq!(cell_index(&axis, 19.1), None);
    }

    #[test]
    fn test_cell_index_descending() {
        let axis = [-34.0, -34.5, -35.0];
        assert_eq!(cell_index(&axis, -34.0), Some(0));
        assert_eq!(cell_index(&axis, -34.2), Some(0));
        assert_eq!(cell_index(&axis, -34.6), Some(1));
        assert_eq!(cell_index(&axis, -35.0), Some(1));
        assert_eq!(cell_index(&axis, -33.9), None);
    }

    #[test]
    fn test_cell_index_needs_two_nodes() {
        assert_eq!(cell_index(&[18.0], 18.0), None);
    }

    #[test]
    fn test_axis_lerp() {
        let axis = [-34.0, -34.5, -35.0];
        assert!((axis_lerp(&axis, 0.0) + 34.0).abs() < 1e-12);
        assert!((axis_lerp(&axis, 1.5) + 34.75).abs() < 1e-12);
        assert!((axis_lerp(&axis, 2.0) + 35.0).abs() < 1e-12);
    }
}
