use std::collections::BTreeMap;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use kurbo::Shape as _;

use crate::{
    foundation::core::{Affine, BezPath, Point, Rect, Vec2},
    foundation::error::{CoverError, CoverResult},
    motif::resolve::MotifKind,
};

/// Outline stroke width for shapes, in unit-box coordinates.
pub const SHAPE_STROKE_WIDTH: f64 = 0.08;
/// Outline stroke width for icons: 1.6 units of the 24-unit icon grid.
pub const ICON_STROKE_WIDTH: f64 = 1.6 / ICON_GRID;
/// Side of the square grid icon path data is authored in.
pub const ICON_GRID: f64 = 24.0;

const CURVE_TOLERANCE: f64 = 1e-4;

/// Identifier to outline lookup consumed by the composer.
///
/// Every path lives in a unit box centered at the origin (`[-0.5, 0.5]²`); the composer scales
/// it by the placement size.
pub trait GeometryLookup {
    fn shape(&self, id: &str) -> Option<&BezPath>;
    fn icon(&self, id: &str) -> Option<&BezPath>;

    fn lookup(&self, kind: MotifKind, id: &str) -> Option<&BezPath> {
        match kind {
            MotifKind::Shape => self.shape(id),
            MotifKind::Icon => self.icon(id),
        }
    }
}

#[derive(Clone, Debug)]
struct IconEntry {
    category: String,
    path: BezPath,
}

/// Shape and icon outlines keyed by identifier.
#[derive(Clone, Debug, Default)]
pub struct GeometryLibrary {
    shapes: BTreeMap<String, BezPath>,
    icons: BTreeMap<String, IconEntry>,
}

impl GeometryLibrary {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in vocabulary: 17 shapes and 14 icons.
    pub fn builtin() -> CoverResult<Self> {
        let mut lib = Self::empty();
        for (id, path) in builtin_shapes() {
            lib.insert_shape(id, path);
        }
        for (id, category, d) in BUILTIN_ICONS {
            lib.insert_icon_svg(id, category, d)?;
        }
        Ok(lib)
    }

    /// Register a shape outline already expressed in the unit box.
    pub fn insert_shape(&mut self, id: impl Into<String>, path: BezPath) {
        self.shapes.insert(id.into(), path);
    }

    /// Register an icon from SVG path data on the 24-unit icon grid.
    pub fn insert_icon_svg(
        &mut self,
        id: impl Into<String>,
        category: impl Into<String>,
        svg_path_d: &str,
    ) -> CoverResult<()> {
        let id = id.into();
        let d = svg_path_d.trim();
        if d.is_empty() {
            return Err(CoverError::validation(format!(
                "icon '{id}' path data must be non-empty"
            )));
        }
        let mut path = BezPath::from_svg(d)
            .map_err(|e| CoverError::validation(format!("icon '{id}' has invalid path data: {e}")))?;
        path.apply_affine(icon_to_unit());
        self.icons.insert(
            id,
            IconEntry {
                category: category.into(),
                path,
            },
        );
        Ok(())
    }

    pub fn shape_ids(&self) -> impl Iterator<Item = &str> {
        self.shapes.keys().map(String::as_str)
    }

    pub fn icon_ids(&self) -> impl Iterator<Item = &str> {
        self.icons.keys().map(String::as_str)
    }

    pub fn icon_category(&self, id: &str) -> Option<&str> {
        self.icons.get(id).map(|e| e.category.as_str())
    }

    /// Icon identifiers whose category is one of `categories`, in identifier order.
    pub fn icons_in_categories(&self, categories: &[&str]) -> Vec<String> {
        self.icons
            .iter()
            .filter(|(_, e)| categories.contains(&e.category.as_str()))
            .map(|(id, _)| id.clone())
            .collect()
    }
}

impl GeometryLookup for GeometryLibrary {
    fn shape(&self, id: &str) -> Option<&BezPath> {
        self.shapes.get(id)
    }

    fn icon(&self, id: &str) -> Option<&BezPath> {
        self.icons.get(id).map(|e| &e.path)
    }
}

fn icon_to_unit() -> Affine {
    let half = ICON_GRID * 0.5;
    Affine::scale(1.0 / ICON_GRID) * Affine::translate(Vec2::new(-half, -half))
}

fn builtin_shapes() -> Vec<(&'static str, BezPath)> {
    let half = 0.5;
    vec![
        ("circle", kurbo::Circle::new(Point::ORIGIN, half).to_path(CURVE_TOLERANCE)),
        ("square", Rect::new(-half, -half, half, half).to_path(CURVE_TOLERANCE)),
        (
            "rounded-square",
            kurbo::RoundedRect::new(-half, -half, half, half, 0.2).to_path(CURVE_TOLERANCE),
        ),
        ("rectangle", Rect::new(-half, -0.3, half, 0.3).to_path(CURVE_TOLERANCE)),
        ("triangle", star_polygon(3, half, half)),
        (
            "right-triangle",
            closed_polyline(&[(-half, -half), (half, 0.0), (-half, half)]),
        ),
        (
            "diamond",
            closed_polyline(&[(0.0, -half), (half, 0.0), (0.0, half), (-half, 0.0)]),
        ),
        ("pentagon", star_polygon(5, half, half)),
        ("hexagon", star_polygon(6, half, half)),
        ("octagon", star_polygon(8, half, half)),
        ("star", star_polygon(5, half, half * 0.5)),
        ("plus", crossed_bars(0.2, 0.0)),
        ("x", crossed_bars(0.18, FRAC_PI_4)),
        ("line", Rect::new(-half, -0.04, half, 0.04).to_path(CURVE_TOLERANCE)),
        ("arc", arc_path(half, 0.0, PI, false)),
        ("ring", ring(half, half * 0.6)),
        ("half-circle", arc_path(half, 0.0, -PI, true)),
    ]
}

fn closed_polyline(points: &[(f64, f64)]) -> BezPath {
    let mut path = BezPath::new();
    for (i, &(x, y)) in points.iter().enumerate() {
        if i == 0 {
            path.move_to((x, y));
        } else {
            path.line_to((x, y));
        }
    }
    path.close_path();
    path
}

/// Regular polygon (`inner == outer`) or star with `points` tips, first tip pointing up.
fn star_polygon(points: usize, outer: f64, inner: f64) -> BezPath {
    let vertices = if inner == outer { points } else { points * 2 };
    let pts: Vec<(f64, f64)> = (0..vertices)
        .map(|i| {
            let radius = if i % 2 == 0 { outer } else { inner };
            let angle = i as f64 / vertices as f64 * TAU - FRAC_PI_2;
            (angle.cos() * radius, angle.sin() * radius)
        })
        .collect();
    closed_polyline(&pts)
}

fn crossed_bars(thickness: f64, rotation: f64) -> BezPath {
    let bar = Rect::new(-thickness * 0.5, -0.5, thickness * 0.5, 0.5).to_path(CURVE_TOLERANCE);
    let mut path = BezPath::new();
    for angle in [rotation, rotation + FRAC_PI_2] {
        let mut b = bar.clone();
        b.apply_affine(Affine::rotate(angle));
        path.extend(b);
    }
    path
}

fn arc_path(radius: f64, start: f64, sweep: f64, close: bool) -> BezPath {
    let arc = kurbo::Arc {
        center: Point::ORIGIN,
        radii: Vec2::new(radius, radius),
        start_angle: start,
        sweep_angle: sweep,
        x_rotation: 0.0,
    };
    let mut path = arc.to_path(CURVE_TOLERANCE);
    if close {
        path.close_path();
    }
    path
}

/// Annulus; the inner contour runs against the outer one so non-zero filling leaves a hole.
fn ring(outer: f64, inner: f64) -> BezPath {
    let mut path = arc_path(outer, 0.0, TAU, true);
    path.extend(arc_path(inner, 0.0, -TAU, true));
    path
}

/// `(id, category, path data)` on the 24-unit grid.
const BUILTIN_ICONS: [(&str, &str, &str); 14] = [
    ("music-note", "music", "M6 3v12.5A2.5 2.5 0 1 0 8 18V8h8V3H6z"),
    ("equalizer", "music", "M4 6h2v12H4V6zm7 3h2v9h-2V9zm7-5h2v14h-2V4z"),
    (
        "headphones",
        "music",
        "M4 13v5h3v-5H4zm13 0v5h3v-5h-3zM4 11a8 8 0 1 1 16 0v1h-2v-1a6 6 0 1 0-12 0v1H4v-1z",
    ),
    (
        "microphone",
        "music",
        "M12 2a3 3 0 0 1 3 3v6a3 3 0 0 1-6 0V5a3 3 0 0 1 3-3zm5 9a5 5 0 0 1-10 0H5a7 7 0 0 0 14 0h-2zm-6 9h2v2h-2v-2z",
    ),
    (
        "dumbbell",
        "fitness",
        "M3 10h2v4H3v-4zm16 0h2v4h-2v-4zM7 8h2v8H7V8zm8 0h2v8h-2V8zM9 11h6v2H9v-2z",
    ),
    (
        "flame",
        "fitness",
        "M12 2s2 3 2 5a2 2 0 0 1-4 0c0-2 2-5 2-5zm-4 9a4 4 0 1 0 8 0c0-2.5-2-4.5-4-6c-2 1.5-4 3.5-4 6z",
    ),
    (
        "heart-pulse",
        "fitness",
        "M12 20s-6-4.35-8-7.5C2.5 9 4.5 6 7.5 6c1.7 0 3 1 4.5 2.5C13.5 7 14.8 6 16.5 6C19.5 6 21.5 9 20 12.5C18 15.65 12 20 12 20zm-1-8h2l1 2l2-4l2 6h-2l-1-2l-2 4l-2-6l-2 4H6l3-6l2 2z",
    ),
    (
        "sparkles",
        "general",
        "M12 2l1.5 4.5L18 8l-4.5 1.5L12 14l-1.5-4.5L6 8l4.5-1.5L12 2zm6 8l1 3l3 1l-3 1l-1 3l-1-3l-3-1l3-1l1-3z",
    ),
    (
        "sun",
        "general",
        "M12 6a6 6 0 1 1 0 12a6 6 0 0 1 0-12zm0-4h2v3h-2V2zm0 17h2v3h-2v-3zM4 11h3v2H4v-2zm13 0h3v2h-3v-2zM5.6 5.6l2.1 2.1l-1.4 1.4L4.2 7l1.4-1.4zm12.1 12.1l2.1 2.1l-1.4 1.4l-2.1-2.1l1.4-1.4zm0-12.1L20 7l-1.4 1.4l-2.1-2.1l1.4-1.4zM5.6 18.4l1.4 1.4l-2.1 2.1l-1.4-1.4l2.1-2.1z",
    ),
    ("moon", "general", "M14.5 2a8 8 0 1 0 7.5 11.5A9 9 0 1 1 14.5 2z"),
    (
        "arrow-right",
        "arrows",
        "M4 11h10.5L11 7.5L12.5 6L18 11.5L12.5 17L11 15.5L14.5 12H4v-1z",
    ),
    (
        "arrow-up",
        "arrows",
        "M11 4v10.5L7.5 11L6 12.5L11.5 18L17 12.5L15.5 11L12 14.5V4h-1z",
    ),
    (
        "grid",
        "abstract",
        "M4 4h6v6H4V4zm10 0h6v6h-6V4zM4 14h6v6H4v-6zm10 0h6v6h-6v-6z",
    ),
    (
        "orbit",
        "abstract",
        "M12 8a4 4 0 1 0 0 8a4 4 0 0 0 0-8zm8-2c0 4-3.6 6.5-8 6.5S4 10 4 6s3.6-6.5 8-6.5s8 2.5 8 6.5zm0 12c0 4-3.6 6.5-8 6.5S4 22 4 18s3.6-6.5 8-6.5s8 2.5 8 6.5z",
    ),
];

#[cfg(test)]
#[path = "../../tests/unit/motif/geometry.rs"]
mod tests;
