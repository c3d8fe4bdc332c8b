use crate::{
    foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8, Vec2},
    foundation::error::{CoverError, CoverResult},
    foundation::math::Fnv1a64,
    render::surface::{PathPaint, StateStack, Surface, SurfaceFingerprint},
    text::font::{FontSpec, MonospaceMeasure, TextMeasure},
};

/// One recorded draw call, with the transform and alpha-scaled color active when it was issued.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    FillRect {
        rect: Rect,
        transform: Affine,
        color: Rgba8,
    },
    Path {
        path: BezPath,
        paint: PathPaint,
        transform: Affine,
        color: Rgba8,
    },
    Text {
        text: String,
        origin: Point,
        font: FontSpec,
        tracking_em: f64,
        transform: Affine,
        color: Rgba8,
    },
}

/// Surface that records draw calls instead of rasterizing them.
///
/// Text is measured with fixed-advance metrics, so layouts are reproducible without any font
/// files.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    canvas: Canvas,
    state: StateStack,
    metrics: MonospaceMeasure,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(canvas: Canvas) -> CoverResult<Self> {
        canvas.validate()?;
        Ok(Self {
            canvas,
            state: StateStack::new(),
            metrics: MonospaceMeasure::default(),
            ops: Vec::new(),
        })
    }

    pub fn with_metrics(mut self, metrics: MonospaceMeasure) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<DrawOp> {
        self.ops
    }

    /// Number of `save` calls not yet matched by a `restore`.
    pub fn save_depth(&self) -> usize {
        self.state.depth()
    }
}

impl TextMeasure for RecordingSurface {
    fn measure(&self, text: &str, font: &FontSpec) -> f64 {
        self.metrics.measure(text, font)
    }
}

impl Surface for RecordingSurface {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba8) -> CoverResult<()> {
        self.ops.push(DrawOp::FillRect {
            rect,
            transform: self.state.transform(),
            color: self.state.paint(color),
        });
        Ok(())
    }

    fn draw_path(&mut self, path: &BezPath, paint: PathPaint, color: Rgba8) -> CoverResult<()> {
        if let PathPaint::Stroke { width } = paint
            && !(width.is_finite() && width > 0.0)
        {
            return Err(CoverError::render(format!(
                "stroke width must be finite and > 0, got {width}"
            )));
        }
        self.ops.push(DrawOp::Path {
            path: path.clone(),
            paint,
            transform: self.state.transform(),
            color: self.state.paint(color),
        });
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        origin: Point,
        font: &FontSpec,
        tracking_em: f64,
        color: Rgba8,
    ) -> CoverResult<()> {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            origin,
            font: font.clone(),
            tracking_em,
            transform: self.state.transform(),
            color: self.state.paint(color),
        });
        Ok(())
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.state.set_alpha(alpha);
    }

    fn save(&mut self) {
        self.state.save();
    }

    fn restore(&mut self) {
        self.state.restore();
    }

    fn translate(&mut self, offset: Vec2) {
        self.state.translate(offset);
    }

    fn rotate(&mut self, radians: f64) {
        self.state.rotate(radians);
    }

    fn scale(&mut self, factor: f64) {
        self.state.scale(factor);
    }
}

impl SurfaceFingerprint for RecordingSurface {
    /// FNV-1a over every recorded op, floats hashed by bit pattern.
    fn fingerprint(&mut self) -> u64 {
        let mut h = Fnv1a64::new_default();
        h.write_u32(self.canvas.size);
        for op in &self.ops {
            match op {
                DrawOp::FillRect {
                    rect,
                    transform,
                    color,
                } => {
                    h.write_u8(b'R');
                    for v in [rect.x0, rect.y0, rect.x1, rect.y1] {
                        h.write_f64(v);
                    }
                    write_affine(&mut h, *transform);
                    write_color(&mut h, *color);
                }
                DrawOp::Path {
                    path,
                    paint,
                    transform,
                    color,
                } => {
                    h.write_u8(b'P');
                    write_path(&mut h, path);
                    match paint {
                        PathPaint::Fill => h.write_u8(0),
                        PathPaint::Stroke { width } => {
                            h.write_u8(1);
                            h.write_f64(*width);
                        }
                    }
                    write_affine(&mut h, *transform);
                    write_color(&mut h, *color);
                }
                DrawOp::Text {
                    text,
                    origin,
                    font,
                    tracking_em,
                    transform,
                    color,
                } => {
                    h.write_u8(b'T');
                    h.write_str(text);
                    h.write_f64(origin.x);
                    h.write_f64(origin.y);
                    h.write_str(&font.family);
                    h.write_u32(u32::from(font.weight));
                    h.write_f64(font.size_px);
                    h.write_f64(*tracking_em);
                    write_affine(&mut h, *transform);
                    write_color(&mut h, *color);
                }
            }
        }
        h.finish()
    }
}

fn write_path(h: &mut Fnv1a64, path: &BezPath) {
    use kurbo::PathEl;

    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => write_points(h, b'M', &[p]),
            PathEl::LineTo(p) => write_points(h, b'L', &[p]),
            PathEl::QuadTo(p1, p2) => write_points(h, b'Q', &[p1, p2]),
            PathEl::CurveTo(p1, p2, p3) => write_points(h, b'C', &[p1, p2, p3]),
            PathEl::ClosePath => write_points(h, b'Z', &[]),
        }
    }
}

fn write_points(h: &mut Fnv1a64, tag: u8, points: &[Point]) {
    h.write_u8(tag);
    for p in points {
        h.write_f64(p.x);
        h.write_f64(p.y);
    }
}

fn write_affine(h: &mut Fnv1a64, a: Affine) {
    for c in a.as_coeffs() {
        h.write_f64(c);
    }
}

fn write_color(h: &mut Fnv1a64, c: Rgba8) {
    h.write_bytes(&[c.r, c.g, c.b, c.a]);
}

#[cfg(test)]
#[path = "../../tests/unit/render/recording.rs"]
mod tests;
