use crate::{
    foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8, Vec2},
    foundation::error::CoverResult,
    text::font::{FontSpec, TextMeasure},
};

/// How a path is painted.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub enum PathPaint {
    Fill,
    /// Outline with a width in the current user space.
    Stroke { width: f64 },
}

/// Drawing capability handed to the composer, one per render call.
///
/// Mirrors a 2D canvas: geometry is given in user space and mapped through the current transform,
/// and every paint is multiplied by the current global alpha. `save`/`restore` push and pop both.
pub trait Surface: TextMeasure {
    fn canvas(&self) -> Canvas;

    fn fill_rect(&mut self, rect: Rect, color: Rgba8) -> CoverResult<()>;

    fn draw_path(&mut self, path: &BezPath, paint: PathPaint, color: Rgba8) -> CoverResult<()>;

    /// Draw one line of text with its left baseline point at `origin`.
    ///
    /// `tracking_em` adds `tracking_em · size` after every character, matching
    /// [`crate::text::font::tracked_width`].
    fn draw_text(
        &mut self,
        text: &str,
        origin: Point,
        font: &FontSpec,
        tracking_em: f64,
        color: Rgba8,
    ) -> CoverResult<()>;

    fn set_alpha(&mut self, alpha: f64);

    fn save(&mut self);

    /// Pop the last saved state; a restore without a matching save is ignored.
    fn restore(&mut self);

    fn translate(&mut self, offset: Vec2);

    fn rotate(&mut self, radians: f64);

    fn scale(&mut self, factor: f64);
}

/// Surfaces whose drawn content can be reduced to a comparable hash.
///
/// Raster surfaces flush pending work first, hence `&mut self`.
pub trait SurfaceFingerprint {
    fn fingerprint(&mut self) -> u64;
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Transform and global alpha of a surface.
pub struct DrawState {
    pub transform: Affine,
    pub alpha: f64,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            alpha: 1.0,
        }
    }
}

/// Current [`DrawState`] plus the saved ones.
#[derive(Clone, Debug, Default)]
pub struct StateStack {
    current: DrawState,
    saved: Vec<DrawState>,
}

impl StateStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> DrawState {
        self.current
    }

    pub fn transform(&self) -> Affine {
        self.current.transform
    }

    pub fn alpha(&self) -> f64 {
        self.current.alpha
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn save(&mut self) {
        self.saved.push(self.current);
    }

    pub fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.current = state;
        }
    }

    pub fn set_alpha(&mut self, alpha: f64) {
        self.current.alpha = if alpha.is_finite() {
            alpha.clamp(0.0, 1.0)
        } else {
            1.0
        };
    }

    pub fn translate(&mut self, offset: Vec2) {
        self.current.transform = self.current.transform * Affine::translate(offset);
    }

    pub fn rotate(&mut self, radians: f64) {
        self.current.transform = self.current.transform * Affine::rotate(radians);
    }

    pub fn scale(&mut self, factor: f64) {
        self.current.transform = self.current.transform * Affine::scale(factor);
    }

    /// `color` with its alpha multiplied by the global alpha.
    pub fn paint(&self, color: Rgba8) -> Rgba8 {
        color.with_alpha_scaled(self.current.alpha)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
