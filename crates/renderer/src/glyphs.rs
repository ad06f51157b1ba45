//! Stroke-drawn numerals for contour and tick labels.
//!
//! Numbers are drawn as simple seven-segment style strokes so they render
//! without a font file. Only digits, `-` and `.` have shapes; anything else
//! leaves a blank cell.

use tiny_skia::{
    FillRule, LineCap, LineJoin, Mask, Paint, PathBuilder, Pixmap, Stroke, Transform,
};

use crate::colormap::Color;

/// Appearance of stroke-drawn text.
#[derive(Debug, Clone, Copy)]
pub struct StrokeText {
    /// Character cell height in pixels
    pub size: f32,
    pub color: Color,
    /// Optional box drawn behind the text
    pub background: Option<Color>,
}

impl StrokeText {
    fn char_width(&self) -> f32 {
        self.size * 0.6
    }

    fn char_spacing(&self) -> f32 {
        self.size * 0.1
    }

    /// Total advance width of `text`.
    pub fn width(&self, text: &str) -> f32 {
        let n = text.chars().count() as f32;
        if n == 0.0 {
            return 0.0;
        }
        n * (self.char_width() + self.char_spacing()) - self.char_spacing()
    }
}

/// Draw `text` centred on (x, y), rotated by `angle` radians.
pub fn draw_stroke_text(
    pixmap: &mut Pixmap,
    x: f32,
    y: f32,
    angle: f32,
    text: &str,
    style: &StrokeText,
    mask: Option<&Mask>,
) {
    let char_width = style.char_width();
    let char_spacing = style.char_spacing();
    let text_width = style.width(text);

    let cos_a = angle.cos();
    let sin_a = angle.sin();

    if let Some(bg) = style.background {
        let padding = style.size * 0.2;
        let half_w = text_width / 2.0 + padding;
        let half_h = style.size / 2.0 + padding;
        let corners = [
            (-half_w, -half_h),
            (half_w, -half_h),
            (half_w, half_h),
            (-half_w, half_h),
        ];

        let mut pb = PathBuilder::new();
        for (i, (cx, cy)) in corners.iter().enumerate() {
            let rx = cx * cos_a - cy * sin_a + x;
            let ry = cx * sin_a + cy * cos_a + y;
            if i == 0 {
                pb.move_to(rx, ry);
            } else {
                pb.line_to(rx, ry);
            }
        }
        pb.close();

        if let Some(path) = pb.finish() {
            let mut paint = Paint::default();
            paint.set_color_rgba8(bg.r, bg.g, bg.b, bg.a);
            paint.anti_alias = true;
            pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), mask);
        }
    }

    let mut paint = Paint::default();
    paint.set_color_rgba8(style.color.r, style.color.g, style.color.b, style.color.a);
    paint.anti_alias = true;

    let stroke = Stroke {
        width: (char_width * 0.15).max(0.5),
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };

    let start_x = -text_width / 2.0;
    for (i, ch) in text.chars().enumerate() {
        let local_x = start_x + i as f32 * (char_width + char_spacing) + char_width / 2.0;
        let cx = local_x * cos_a + x;
        let cy = local_x * sin_a + y;

        let segments = glyph_segments(ch, char_width / 2.0, style.size / 2.0);
        if segments.is_empty() {
            continue;
        }

        let mut pb = PathBuilder::new();
        for ((x1, y1), (x2, y2)) in segments {
            pb.move_to(x1 * cos_a - y1 * sin_a + cx, x1 * sin_a + y1 * cos_a + cy);
            pb.line_to(x2 * cos_a - y2 * sin_a + cx, x2 * sin_a + y2 * cos_a + cy);
        }
        if let Some(path) = pb.finish() {
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), mask);
        }
    }
}

type GlyphSegment = ((f32, f32), (f32, f32));

/// Stroke segments of one character, relative to its cell centre.
fn glyph_segments(ch: char, half_w: f32, half_h: f32) -> Vec<GlyphSegment> {
    let (l, r, t, b, m) = (-half_w, half_w, -half_h, half_h, 0.0);

    let top = ((l, t), (r, t));
    let middle = ((l, m), (r, m));
    let bottom = ((l, b), (r, b));
    let upper_left = ((l, t), (l, m));
    let upper_right = ((r, t), (r, m));
    let lower_left = ((l, m), (l, b));
    let lower_right = ((r, m), (r, b));

    match ch {
        '0' => vec![top, upper_right, lower_right, bottom, lower_left, upper_left],
        '1' => vec![((0.0, t), (0.0, b))],
        '2' => vec![top, upper_right, middle, lower_left, bottom],
        '3' => vec![top, upper_right, middle, lower_right, bottom],
        '4' => vec![upper_left, middle, upper_right, lower_right],
        '5' => vec![top, upper_left, middle, lower_right, bottom],
        '6' => vec![top, upper_left, lower_left, bottom, lower_right, middle],
        '7' => vec![top, ((r, t), (0.0, b))],
        '8' => vec![top, upper_right, lower_right, bottom, lower_left, upper_left, middle],
        '9' => vec![middle, upper_left, top, upper_right, lower_right, bottom],
        '-' => vec![((l * 0.8, m), (r * 0.8, m))],
        '.' => vec![((0.0, b * 0.8), (0.0, b))],
        _ => vec![],
    }
}
