//! Contour line (isoline) rendering using marching squares algorithm.
//!
//! Contours are extracted in grid index space (x = column, y = row), then
//! projected to pixels by the caller and stroked onto the map canvas with
//! numeric labels placed along each line.

use std::collections::HashMap;

use tiny_skia::{LineCap, LineJoin, Mask, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::colormap::Color;
use crate::glyphs::{draw_stroke_text, StrokeText};
use crate::layout::PixelRect;

/// A point in 2D space (grid index or pixel coordinates)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn distance(&self, other: &Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// A line segment between two points
#[derive(Debug, Clone)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

/// A complete contour line (polyline)
#[derive(Debug, Clone)]
pub struct Contour {
    pub level: f32,
    pub points: Vec<Point>,
    pub closed: bool,
}

impl Contour {
    /// Same contour with every point passed through `f`.
    pub fn map_points<F>(&self, f: F) -> Contour
    where
        F: Fn(Point) -> Point,
    {
        Contour {
            level: self.level,
            points: self.points.iter().map(|&p| f(p)).collect(),
            closed: self.closed,
        }
    }

    /// Polyline length.
    pub fn length(&self) -> f32 {
        self.points.windows(2).map(|w| w[0].distance(&w[1])).sum()
    }
}

/// Pixel-space options for drawing contours
#[derive(Debug, Clone)]
pub struct ContourConfig {
    /// Contour levels to draw
    pub levels: Vec<f32>,
    /// Line width in pixels
    pub line_width: f32,
    /// Line color
    pub line_color: Color,
    /// Number of smoothing passes (0 = no smoothing)
    pub smoothing_passes: u32,
    /// Whether to draw labels on contour lines
    pub labels_enabled: bool,
    /// Font size for labels
    pub label_font_size: f32,
    /// Minimum spacing between labels (in pixels)
    pub label_spacing: f32,
}

impl Default for ContourConfig {
    fn default() -> Self {
        Self {
            levels: vec![],
            line_width: 1.0,
            line_color: Color::BLACK,
            smoothing_passes: 0,
            labels_enabled: true,
            label_font_size: 10.0,
            label_spacing: 150.0,
        }
    }
}

/// Label text for a level, formatted without decimals.
pub fn format_level(level: f32) -> String {
    format!("{:.0}", level)
}

/// Marching squares algorithm to generate contour lines
///
/// # Arguments
/// * `data` - Grid data in row-major order
/// * `width` - Grid width
/// * `height` - Grid height
/// * `level` - Contour level to extract
///
/// Cells touching a NaN corner produce nothing, so lines stop at no-data.
pub fn march_squares(data: &[f32], width: usize, height: usize, level: f32) -> Vec<Segment> {
    if width < 2 || height < 2 || data.len() != width * height {
        return vec![];
    }

    let mut segments = Vec::new();

    for y in 0..(height - 1) {
        for x in 0..(width - 1) {
            let tl = data[y * width + x];
            let tr = data[y * width + x + 1];
            let bl = data[(y + 1) * width + x];
            let br = data[(y + 1) * width + x + 1];

            if tl.is_nan() || tr.is_nan() || bl.is_nan() || br.is_nan() {
                continue;
            }

            let mut cell_index = 0u8;
            if tl >= level {
                cell_index |= 1;
            }
            if tr >= level {
                cell_index |= 2;
            }
            if br >= level {
                cell_index |= 4;
            }
            if bl >= level {
                cell_index |= 8;
            }

            let corners = CellCorners { tl, tr, br, bl };
            segments.extend(cell_segments(cell_index, x as f32, y as f32, &corners, level));
        }
    }

    segments
}

struct CellCorners {
    tl: f32,
    tr: f32,
    br: f32,
    bl: f32,
}

/// Line segments for one marching squares cell, with edge crossings
/// placed by linear interpolation.
fn cell_segments(cell_index: u8, x: f32, y: f32, c: &CellCorners, level: f32) -> Vec<Segment> {
    let top = || interpolate_edge(x, y, x + 1.0, y, c.tl, c.tr, level);
    let right = || interpolate_edge(x + 1.0, y, x + 1.0, y + 1.0, c.tr, c.br, level);
    let bottom = || interpolate_edge(x, y + 1.0, x + 1.0, y + 1.0, c.bl, c.br, level);
    let left = || interpolate_edge(x, y, x, y + 1.0, c.tl, c.bl, level);
    let seg = |start: Point, end: Point| Segment { start, end };

    match cell_index {
        0 | 15 => vec![],
        1 | 14 => vec![seg(left(), top())],
        2 | 13 => vec![seg(top(), right())],
        3 | 12 => vec![seg(left(), right())],
        4 | 11 => vec![seg(right(), bottom())],
        // saddles: resolve by the cell centre value
        5 | 10 => {
            let centre = (c.tl + c.tr + c.br + c.bl) / 4.0;
            let tl_side_high = cell_index == 5;
            if (centre >= level) == tl_side_high {
                vec![seg(left(), bottom()), seg(top(), right())]
            } else {
                vec![seg(left(), top()), seg(right(), bottom())]
            }
        }
        6 | 9 => vec![seg(top(), bottom())],
        7 | 8 => vec![seg(left(), bottom())],
        _ => vec![],
    }
}

/// Linearly interpolate between two edge points based on data values
fn interpolate_edge(
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    val1: f32,
    val2: f32,
    level: f32,
) -> Point {
    if (val2 - val1).abs() < 1e-6 {
        return Point::new((x1 + x2) / 2.0, (y1 + y2) / 2.0);
    }

    let t = ((level - val1) / (val2 - val1)).clamp(0.0, 1.0);
    Point::new(x1 + t * (x2 - x1), y1 + t * (y2 - y1))
}

/// Segment ids bucketed by endpoint position.
struct EndpointIndex {
    cell: f32,
    buckets: HashMap<(i64, i64), Vec<usize>>,
}

impl EndpointIndex {
    fn new(segments: &[Segment], cell: f32) -> Self {
        let mut buckets: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
        for (i, seg) in segments.iter().enumerate() {
            let start = Self::key(seg.start, cell);
            let end = Self::key(seg.end, cell);
            buckets.entry(start).or_default().push(i);
            if end != start {
                buckets.entry(end).or_default().push(i);
            }
        }
        Self { cell, buckets }
    }

    fn key(p: Point, cell: f32) -> (i64, i64) {
        ((p.x / cell).floor() as i64, (p.y / cell).floor() as i64)
    }

    /// Ids of segments with an endpoint in the 3x3 buckets around `p`.
    fn near(&self, p: Point, out: &mut Vec<usize>) {
        let (kx, ky) = Self::key(p, self.cell);
        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(ids) = self.buckets.get(&(kx + dx, ky + dy)) {
                    out.extend_from_slice(ids);
                }
            }
        }
    }
}

/// Connect line segments into continuous polylines
///
/// Segments are chained greedily from both ends of the growing line; at each
/// step the lowest-numbered unused segment touching either end is taken.
pub fn connect_segments(segments: Vec<Segment>, level: f32) -> Vec<Contour> {
    const EPSILON: f32 = 0.001;

    // bucket size must be at least EPSILON for the 3x3 lookup to see every match
    let index = EndpointIndex::new(&segments, EPSILON * 10.0);
    let mut contours = Vec::new();
    let mut used = vec![false; segments.len()];
    let mut candidates = Vec::new();

    for start_idx in 0..segments.len() {
        if used[start_idx] {
            continue;
        }
        used[start_idx] = true;

        let mut points = std::collections::VecDeque::new();
        points.push_back(segments[start_idx].start);
        points.push_back(segments[start_idx].end);

        loop {
            let head = points[0];
            let tail = points[points.len() - 1];

            candidates.clear();
            index.near(tail, &mut candidates);
            index.near(head, &mut candidates);
            candidates.sort_unstable();
            candidates.dedup();

            let mut joined = false;
            for &i in &candidates {
                if used[i] {
                    continue;
                }
                let seg = &segments[i];
                if seg.start.distance(&tail) < EPSILON {
                    points.push_back(seg.end);
                } else if seg.end.distance(&tail) < EPSILON {
                    points.push_back(seg.start);
                } else if seg.end.distance(&head) < EPSILON {
                    points.push_front(seg.start);
                } else if seg.start.distance(&head) < EPSILON {
                    points.push_front(seg.end);
                } else {
                    continue;
                }
                used[i] = true;
                joined = true;
                break;
            }
            if !joined {
                break;
            }
        }

        let points: Vec<Point> = points.into_iter().collect();
        let closed = points.len() > 2 && points[0].distance(&points[points.len() - 1]) < EPSILON;
        contours.push(Contour {
            level,
            points,
            closed,
        });
    }

    contours
}

/// Apply Chaikin's corner cutting algorithm for smoothing
pub fn smooth_contour(contour: &Contour, iterations: u32) -> Contour {
    if iterations == 0 || contour.points.len() < 3 {
        return contour.clone();
    }

    let mut points = contour.points.clone();

    for _ in 0..iterations {
        let n = points.len();
        let pairs = if contour.closed { n } else { n - 1 };
        let mut new_points = Vec::with_capacity(pairs * 2 + 2);

        if !contour.closed {
            new_points.push(points[0]);
        }
        for i in 0..pairs {
            let p1 = points[i];
            let p2 = points[(i + 1) % n];
            new_points.push(Point::new(0.75 * p1.x + 0.25 * p2.x, 0.75 * p1.y + 0.25 * p2.y));
            new_points.push(Point::new(0.25 * p1.x + 0.75 * p2.x, 0.25 * p1.y + 0.75 * p2.y));
        }
        if !contour.closed {
            new_points.push(points[n - 1]);
        }

        points = new_points;
    }

    Contour {
        level: contour.level,
        points,
        closed: contour.closed,
    }
}

/// Generate all contours for every configured level, in grid index space.
pub fn generate_all_contours(
    data: &[f32],
    width: usize,
    height: usize,
    config: &ContourConfig,
) -> Vec<Contour> {
    let mut all_contours = Vec::new();

    for &level in &config.levels {
        let segments = march_squares(data, width, height, level);
        let segment_count = segments.len();

        let contours: Vec<Contour> = connect_segments(segments, level)
            .into_iter()
            .map(|c| smooth_contour(&c, config.smoothing_passes))
            .collect();

        tracing::debug!(
            level,
            segments = segment_count,
            lines = contours.len(),
            "Generated contour level"
        );

        all_contours.extend(contours);
    }

    all_contours
}

/// Stroke pixel-space contours onto `pixmap`, then label them.
///
/// Labels are only placed inside `clip`.
pub fn draw_contours(
    pixmap: &mut Pixmap,
    contours: &[Contour],
    config: &ContourConfig,
    clip: &PixelRect,
    mask: Option<&Mask>,
) {
    let color = config.line_color;
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;

    let stroke = Stroke {
        width: config.line_width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };

    let mut label_positions: Vec<LabelPosition> = Vec::new();

    for contour in contours {
        if contour.points.len() < 2 {
            continue;
        }

        let mut pb = PathBuilder::new();
        pb.move_to(contour.points[0].x, contour.points[0].y);
        for point in &contour.points[1..] {
            pb.line_to(point.x, point.y);
        }
        if contour.closed {
            pb.close();
        }

        if let Some(path) = pb.finish() {
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), mask);
        }

        if config.labels_enabled {
            collect_label_positions(contour, config, clip, &mut label_positions);
        }
    }

    let text = StrokeText {
        size: config.label_font_size,
        color,
        background: Some(Color::new(255, 255, 255, 220)),
    };
    for pos in &label_positions {
        draw_stroke_text(pixmap, pos.x, pos.y, pos.angle, &pos.text, &text, mask);
    }

    tracing::debug!(
        lines = contours.len(),
        labels = label_positions.len(),
        "Drew contours"
    );
}

/// Position and metadata for a contour label
#[derive(Debug, Clone)]
struct LabelPosition {
    x: f32,
    y: f32,
    angle: f32,
    text: String,
}

/// Collect label positions along a contour line
fn collect_label_positions(
    contour: &Contour,
    config: &ContourConfig,
    clip: &PixelRect,
    positions: &mut Vec<LabelPosition>,
) {
    let total_length = contour.length();
    if total_length < config.label_spacing * 0.5 {
        return;
    }

    let label_text = format_level(contour.level);
    let margin = config.label_font_size * 2.0;

    let num_labels = ((total_length / config.label_spacing).floor() as usize).max(1);
    let spacing = total_length / (num_labels as f32 + 1.0);

    let mut accumulated_length = 0.0;
    let mut next_label_at = spacing;
    let mut label_count = 0;

    for pair in contour.points.windows(2) {
        if label_count >= num_labels {
            break;
        }

        let (p1, p2) = (pair[0], pair[1]);
        let dx = p2.x - p1.x;
        let dy = p2.y - p1.y;
        let segment_length = (dx * dx + dy * dy).sqrt();

        while segment_length > 0.0
            && accumulated_length + segment_length >= next_label_at
            && label_count < num_labels
        {
            let t = (next_label_at - accumulated_length) / segment_length;
            let x = p1.x + t * dx;
            let y = p1.y + t * dy;

            if clip.inset(margin).contains(x, y) {
                let angle = dy.atan2(dx);
                // keep text upright
                let angle = if angle.abs() > std::f32::consts::FRAC_PI_2 {
                    angle + std::f32::consts::PI
                } else {
                    angle
                };

                let min_distance = config.label_font_size * 4.0;
                let has_overlap = positions.iter().any(|pos| {
                    (pos.x - x).powi(2) + (pos.y - y).powi(2) < min_distance * min_distance
                });

                if !has_overlap {
                    positions.push(LabelPosition {
                        x,
                        y,
                        angle,
                        text: label_text.clone(),
                    });
                }
            }

            next_label_at += spacing;
            label_count += 1;
        }

        accumulated_length += segment_length;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_edge() {
        let p = interpolate_edge(0.0, 0.0, 1.0, 0.0, 0.0, 10.0, 5.0);
        assert!((p.x - 0.5).abs() < 0.01);
        assert!((p.y - 0.0).abs() < 0.01);
    }

    #[test]
    fn test_march_squares_flat() {
        let data = vec![50.0; 9];
        let segments = march_squares(&data, 3, 3, 50.0);
        assert_eq!(segments.len(), 0);
    }

    #[test]
    fn test_march_squares_pit() {
        // deep hole in the centre
        let data = vec![
            0.0, 0.0, 0.0, //
            0.0, 100.0, 0.0, //
            0.0, 0.0, 0.0,
        ];
        let segments = march_squares(&data, 3, 3, 50.0);
        assert_eq!(segments.len(), 4);

        let contours = connect_segments(segments, 50.0);
        assert_eq!(contours.len(), 1);
        assert!(contours[0].closed);
    }

    #[test]
    fn test_format_level() {
        assert_eq!(format_level(20.0), "20");
        assert_eq!(format_level(199.6), "200");
    }

    #[test]
    fn test_contour_length() {
        let contour = Contour {
            level: 20.0,
            points: vec![Point::new(0.0, 0.0), Point::new(3.0, 4.0), Point::new(3.0, 10.0)],
            closed: false,
        };
        assert!((contour.length() - 11.0).abs() < 1e-5);
    }
}
