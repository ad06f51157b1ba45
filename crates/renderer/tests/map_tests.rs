//! Tests for full map composition.

use bathy_common::{
    BathymetryGrid, BoundingBox, CoastlineVertex, CompoundPath, Grid, GridShape, Landmark, Sample,
};
use renderer::layout::FigureLayout;
use renderer::{MapRenderer, MapScene, MapStyle, TextRenderer};
use test_utils::{assert_approx_eq, sloping_shelf, SyntheticGrid};

// ============================================================================
// Helper functions
// ============================================================================

fn false_bay() -> BoundingBox {
    BoundingBox::new(18.2, -34.6, 19.0, -33.8)
}

/// 17x17 nodes over the viewport, land along the western edge.
fn shelf_grid() -> BathymetryGrid {
    let lattice = SyntheticGrid {
        west: 18.2,
        north: -33.8,
        step: 0.05,
        rows: 17,
        cols: 17,
    };
    let elevation = sloping_shelf(18.2, 19.0, 200.0);

    let samples: Vec<Sample> = (0..lattice.rows)
        .flat_map(|row| (0..lattice.cols).map(move |col| (row, col)))
        .map(|(row, col)| {
            let (lon, lat) = (lattice.lon(col), lattice.lat(row));
            Sample::new(lon, lat, elevation(lon, lat))
        })
        .collect();

    let grid = Grid::from_row_major(samples, GridShape::new(17, 17)).unwrap();
    let mut bathymetry = BathymetryGrid::from_samples(&grid);
    bathymetry.normalize_depths();
    bathymetry
}

fn square_coastline() -> CompoundPath {
    CompoundPath::from_vertices(&[
        CoastlineVertex::new(18.1, -34.1, 1),
        CoastlineVertex::new(18.4, -34.1, 2),
        CoastlineVertex::new(18.4, -34.4, 2),
        CoastlineVertex::new(18.1, -34.4, 2),
        CoastlineVertex::new(18.1, -34.1, 79),
    ])
}

fn small_style() -> MapStyle {
    MapStyle {
        dpi: 50.0,
        ..MapStyle::default()
    }
}

// ============================================================================
// Rendering tests
// ============================================================================

#[test]
fn test_render_layers() {
    let bathymetry = shelf_grid();
    let coastline = square_coastline();
    let landmarks = vec![Landmark::new(18.5, -34.3, "Seal Island")];
    let scene = MapScene {
        bathymetry: &bathymetry,
        coastline: &coastline,
        landmarks: &landmarks,
        bounds: false_bay(),
    };

    let style = small_style();
    let layout = FigureLayout::compute(&style, &false_bay()).unwrap();
    let renderer = MapRenderer::with_text(style, None).unwrap();
    let img = renderer.render(&scene).unwrap();

    assert_eq!(img.dimensions(), (320, 240));

    // figure background
    assert_eq!(img.get_pixel(1, 1).0, [255, 255, 255, 255]);

    // deep water is dark blue
    let (x, y) = layout.viewport.project(18.95, -34.3);
    let deep = img.get_pixel(x as u32, y as u32).0;
    assert!(deep[2] > 100 && deep[0] < 100, "deep water pixel {:?}", deep);

    // land polygon fill
    let (x, y) = layout.viewport.project(18.3, -34.25);
    assert_eq!(img.get_pixel(x as u32, y as u32).0, [0xD2, 0xE3, 0x76, 255]);

    // colorbar is darkest at the top
    let bar = layout.colorbar;
    let top = img.get_pixel(bar.center_x() as u32, (bar.y + 3.0) as u32).0;
    let bottom = img.get_pixel(bar.center_x() as u32, (bar.bottom() - 3.0) as u32).0;
    let sum = |p: [u8; 4]| p[0] as u32 + p[1] as u32 + p[2] as u32;
    assert!(sum(top) < sum(bottom));
}

#[test]
fn test_contours_drawn_over_land() {
    let bathymetry = shelf_grid();
    let coastline = square_coastline();
    let scene = MapScene {
        bathymetry: &bathymetry,
        coastline: &coastline,
        landmarks: &[],
        bounds: false_bay(),
    };

    let mut style = small_style();
    style.contour.line_width_pt = 2.0;
    style.contour.labels_enabled = false;
    let layout = FigureLayout::compute(&style, &false_bay()).unwrap();
    let renderer = MapRenderer::with_text(style, None).unwrap();
    let img = renderer.render(&scene).unwrap();

    // the 20 m isobath runs along lon 18.36, inside the land square
    let land = [0xD2, 0xE3, 0x76, 255];
    let (x, y) = layout.viewport.project(18.36, -34.25);
    let (x, y) = (x.round() as u32, y.round() as u32);
    let on_line = (x - 1..=x + 1).map(|px| img.get_pixel(px, y).0);
    assert!(on_line.into_iter().any(|p| p != land && p[0] < 0xD2));

    // away from the line the fill is untouched
    let (x, y) = layout.viewport.project(18.25, -34.25);
    assert_eq!(img.get_pixel(x as u32, y as u32).0, land);
}

#[test]
fn test_landmark_text_starts_at_anchor() {
    // Needs a TrueType font on the machine running the tests
    if TextRenderer::discover(None).is_none() {
        return;
    }

    let bathymetry = shelf_grid();
    let coastline = CompoundPath::default();
    let landmarks = vec![Landmark::new(18.6, -34.2, "Seal Island")];
    let bare = MapScene {
        bathymetry: &bathymetry,
        coastline: &coastline,
        landmarks: &[],
        bounds: false_bay(),
    };
    let labelled = MapScene {
        landmarks: &landmarks,
        ..bare
    };

    let style = MapStyle {
        dpi: 100.0,
        ..MapStyle::default()
    };
    let layout = FigureLayout::compute(&style, &false_bay()).unwrap();
    let renderer = MapRenderer::with_text(style, TextRenderer::discover(None)).unwrap();
    let without = renderer.render(&bare).unwrap();
    let with = renderer.render(&labelled).unwrap();

    let (ax, ay) = layout.viewport.project(18.6, -34.2);
    let (ax, ay) = (ax.round() as i64, ay.round() as i64);
    let changed = |xs: std::ops::RangeInclusive<i64>, ys: std::ops::RangeInclusive<i64>| {
        let mut count = 0;
        for y in ys {
            for x in xs.clone() {
                if without.get_pixel(x as u32, y as u32) != with.get_pixel(x as u32, y as u32) {
                    count += 1;
                }
            }
        }
        count
    };

    // ink to the right of the anchor, around its row, none to the left
    assert!(changed(ax..=ax + 40, ay - 2..=ay + 2) > 0);
    assert_eq!(changed(ax - 40..=ax - 2, ay - 10..=ay + 10), 0);
    // vertically centred: nothing far above or below
    assert_eq!(changed(ax..=ax + 40, ay - 30..=ay - 12), 0);
    assert_eq!(changed(ax..=ax + 40, ay + 12..=ay + 30), 0);
}

#[test]
fn test_layout_keeps_degrees_square() {
    let layout = FigureLayout::compute(&small_style(), &false_bay()).unwrap();
    assert_approx_eq!(layout.plot.width, layout.plot.height, 1e-3);

    let wide = BoundingBox::new(18.0, -34.6, 19.6, -33.8);
    let layout = FigureLayout::compute(&small_style(), &wide).unwrap();
    assert_approx_eq!(layout.plot.width, 2.0 * layout.plot.height, 1e-3);
}

#[test]
fn test_render_without_overlap_leaves_plot_blank() {
    let bathymetry = shelf_grid();
    let coastline = CompoundPath::default();
    let bounds = BoundingBox::new(25.0, -40.0, 26.0, -39.0);
    let scene = MapScene {
        bathymetry: &bathymetry,
        coastline: &coastline,
        landmarks: &[],
        bounds,
    };

    let style = small_style();
    let layout = FigureLayout::compute(&style, &bounds).unwrap();
    let renderer = MapRenderer::with_text(style, None).unwrap();
    let img = renderer.render(&scene).unwrap();

    let (x, y) = layout.viewport.project(25.3, -39.3);
    assert_eq!(img.get_pixel(x as u32, y as u32).0, [255, 255, 255, 255]);
}

#[test]
fn test_render_png_has_canvas_size() {
    let bathymetry = shelf_grid();
    let coastline = square_coastline();
    let scene = MapScene {
        bathymetry: &bathymetry,
        coastline: &coastline,
        landmarks: &[],
        bounds: false_bay(),
    };

    let renderer = MapRenderer::with_text(small_style(), None).unwrap();
    let png = renderer.render_png(&scene).unwrap();

    let decoded = image::load_from_memory(&png).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (320, 240));
}

#[test]
fn test_invalid_style_rejected() {
    let mut style = small_style();
    style.contour.line_color = "black".to_string();
    assert!(MapRenderer::with_text(style, None).is_err());
}

#[test]
fn test_degenerate_viewport_rejected() {
    let bathymetry = shelf_grid();
    let coastline = CompoundPath::default();
    let scene = MapScene {
        bathymetry: &bathymetry,
        coastline: &coastline,
        landmarks: &[],
        bounds: BoundingBox::new(18.5, -34.0, 18.5, -33.0),
    };

    let renderer = MapRenderer::with_text(small_style(), None).unwrap();
    assert!(renderer.render(&scene).is_err());
}
