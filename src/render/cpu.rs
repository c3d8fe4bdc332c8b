use std::{borrow::Cow, cell::RefCell, sync::Arc};

use crate::{
    foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8, Vec2},
    foundation::error::{CoverError, CoverResult},
    render::{
        FrameRGBA,
        surface::{PathPaint, StateStack, Surface, SurfaceFingerprint},
    },
    text::font::{FontSpec, MonospaceMeasure, TextMeasure},
};

/// Raw font file bytes shared between surfaces.
pub type FontBytes = Arc<Vec<u8>>;

/// Parley shaping over caller-registered fonts only (no system font discovery).
///
/// Several files of one family (weights, styles) may be registered; parley picks the face per run
/// and drawing uses that same face.
struct TextShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    families: Vec<String>,
}

impl TextShaper {
    fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: Vec::new(),
        }
    }

    fn register(&mut self, bytes: &[u8]) -> CoverResult<String> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| CoverError::validation("no font families registered from font bytes"))?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CoverError::validation("registered font family has no name"))?
            .to_string();

        tracing::debug!(family = %family, bytes = bytes.len(), "font registered");
        if !self.families.contains(&family) {
            self.families.push(family.clone());
        }
        Ok(family)
    }

    /// Registered family matching `family` (case-insensitive), else the first registered one.
    fn resolve(&self, family: &str) -> Option<&str> {
        self.families
            .iter()
            .find(|f| f.eq_ignore_ascii_case(family))
            .or_else(|| self.families.first())
            .map(String::as_str)
    }

    fn layout(
        &mut self,
        text: &str,
        font: &FontSpec,
        tracking_em: f64,
    ) -> Option<parley::Layout<()>> {
        let family = self.resolve(&font.family)?.to_string();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font.size_px as f32));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(font.weight)),
        ));
        builder.push_default(parley::style::StyleProperty::LetterSpacing(
            (tracking_em * font.size_px) as f32,
        ));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        Some(layout)
    }
}

/// CPU raster surface backed by `vello_cpu`, with text shaped by `parley`.
///
/// Without registered fonts, text is measured with fixed-advance metrics and drawing non-empty
/// text fails with a render error.
pub struct CpuSurface {
    canvas: Canvas,
    side: u16,
    ctx: vello_cpu::RenderContext,
    state: StateStack,
    shaper: RefCell<TextShaper>,
    fallback_metrics: MonospaceMeasure,
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("canvas", &self.canvas)
            .field("families", &self.shaper.borrow().families)
            .finish()
    }
}

impl CpuSurface {
    pub fn new(canvas: Canvas) -> CoverResult<Self> {
        canvas.validate()?;
        let side = u16::try_from(canvas.size).map_err(|_| {
            CoverError::validation(format!(
                "canvas size {} exceeds the CPU surface limit of {}",
                canvas.size,
                u16::MAX
            ))
        })?;
        Ok(Self {
            canvas,
            side,
            ctx: vello_cpu::RenderContext::new(side, side),
            state: StateStack::new(),
            shaper: RefCell::new(TextShaper::new()),
            fallback_metrics: MonospaceMeasure::default(),
        })
    }

    /// Register one font file; returns the family name it registered.
    pub fn register_font(&mut self, bytes: &[u8]) -> CoverResult<String> {
        self.shaper.get_mut().register(bytes)
    }

    pub fn register_fonts(&mut self, fonts: &[FontBytes]) -> CoverResult<()> {
        for font in fonts {
            self.register_font(font)?;
        }
        Ok(())
    }

    pub fn has_fonts(&self) -> bool {
        !self.shaper.borrow().families.is_empty()
    }

    /// Rasterize everything drawn so far.
    pub fn snapshot(&mut self) -> FrameRGBA {
        self.ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(self.side, self.side);
        self.ctx.render_to_pixmap(&mut pixmap);
        FrameRGBA {
            width: self.canvas.size,
            height: self.canvas.size,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }

    #[tracing::instrument(level = "debug", skip(self), fields(size = self.canvas.size))]
    pub fn into_frame(mut self) -> FrameRGBA {
        self.snapshot()
    }

    fn apply_paint(&mut self, color: Rgba8) {
        let c = self.state.paint(color);
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
    }
}

impl TextMeasure for CpuSurface {
    fn measure(&self, text: &str, font: &FontSpec) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        match self.shaper.borrow_mut().layout(text, font, 0.0) {
            Some(layout) => f64::from(layout.width()),
            None => self.fallback_metrics.measure(text, font),
        }
    }
}

impl Surface for CpuSurface {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba8) -> CoverResult<()> {
        self.ctx.set_transform(affine_to_cpu(self.state.transform()));
        self.apply_paint(color);
        self.ctx.fill_rect(&rect_to_cpu(rect));
        Ok(())
    }

    fn draw_path(&mut self, path: &BezPath, paint: PathPaint, color: Rgba8) -> CoverResult<()> {
        self.ctx.set_transform(affine_to_cpu(self.state.transform()));
        self.apply_paint(color);
        let cpu_path = bezpath_to_cpu(path);
        match paint {
            PathPaint::Fill => self.ctx.fill_path(&cpu_path),
            PathPaint::Stroke { width } => {
                if !(width.is_finite() && width > 0.0) {
                    return Err(CoverError::render(format!(
                        "stroke width must be finite and > 0, got {width}"
                    )));
                }
                self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
                self.ctx.stroke_path(&cpu_path);
            }
        }
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
        if text.trim().is_empty() {
            return Ok(());
        }
        let shaped = self.shaper.borrow_mut().layout(text, font, tracking_em);
        let Some(layout) = shaped else {
            return Err(CoverError::render(format!(
                "no font registered to draw '{}' text",
                font.family
            )));
        };

        let baseline = layout
            .lines()
            .next()
            .map(|line| f64::from(line.metrics().baseline))
            .unwrap_or(0.0);
        let placed = self.state.transform() * Affine::translate(Vec2::new(origin.x, origin.y - baseline));
        self.ctx.set_transform(affine_to_cpu(placed));
        self.apply_paint(color);

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                // The face parley shaped this run with, so glyph ids and advances match.
                let shaped_run = run.run();
                self.ctx
                    .glyph_run(shaped_run.font())
                    .font_size(shaped_run.font_size())
                    .normalized_coords(shaped_run.normalized_coords())
                    .fill_glyphs(glyphs);
            }
        }
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

impl SurfaceFingerprint for CpuSurface {
    /// Hash of the rasterized pixels.
    fn fingerprint(&mut self) -> u64 {
        self.snapshot().fingerprint()
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
