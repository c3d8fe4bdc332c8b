use crate::foundation::error::{CoverError, CoverResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Side length used to express typography sizes; sizes scale by `canvas / REFERENCE_CANVAS_PX`.
pub const REFERENCE_CANVAS_PX: f64 = 1000.0;

/// Square render target size in pixels.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct Canvas {
    /// Width and height in pixels.
    pub size: u32,
}

impl Canvas {
    /// Build a canvas, rejecting zero-sized targets.
    pub fn new(size: u32) -> CoverResult<Self> {
        let canvas = Self { size };
        canvas.validate()?;
        Ok(canvas)
    }

    /// Reject zero-sized targets.
    pub fn validate(self) -> CoverResult<()> {
        if self.size == 0 {
            return Err(CoverError::validation("canvas size must be > 0"));
        }
        Ok(())
    }

    /// Side length as `f64`.
    pub fn side(self) -> f64 {
        f64::from(self.size)
    }

    /// Canvas center in pixels.
    pub fn center(self) -> Point {
        let half = self.side() * 0.5;
        Point::new(half, half)
    }

    /// Full-canvas rectangle.
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, self.side(), self.side())
    }

    /// Ratio between this canvas and the typography reference canvas.
    pub fn reference_scale(self) -> f64 {
        self.side() / REFERENCE_CANVAS_PX
    }
}

/// Straight (non-premultiplied) RGBA8 color, serialized as `#RRGGBB` or `#RRGGBBAA`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RRGGBB` / `#RRGGBBAA` (leading `#` optional, case-insensitive).
    pub fn from_hex(s: &str) -> CoverResult<Self> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if !s.is_ascii() {
            return Err(CoverError::validation(format!(
                "invalid hex color \"{s}\""
            )));
        }

        fn hex_byte(pair: &str) -> CoverResult<u8> {
            u8::from_str_radix(pair, 16)
                .map_err(|_| CoverError::validation(format!("invalid hex byte \"{pair}\"")))
        }

        match s.len() {
            6 => Ok(Self::rgb(
                hex_byte(&s[0..2])?,
                hex_byte(&s[2..4])?,
                hex_byte(&s[4..6])?,
            )),
            8 => Ok(Self::rgba(
                hex_byte(&s[0..2])?,
                hex_byte(&s[2..4])?,
                hex_byte(&s[4..6])?,
                hex_byte(&s[6..8])?,
            )),
            _ => Err(CoverError::validation(
                "hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)",
            )),
        }
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    /// Scale alpha by `alpha` in `[0, 1]` (the surface's global alpha).
    pub fn with_alpha_scaled(self, alpha: f64) -> Self {
        let a = (f64::from(self.a) * alpha.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    pub fn to_premul(self) -> Rgba8Premul {
        Rgba8Premul::from_straight_rgba(self.r, self.g, self.b, self.a)
    }
}

impl serde::Serialize for Rgba8 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Rgba8 {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    pub fn to_straight(self) -> Rgba8 {
        if self.a == 0 {
            return Rgba8::rgba(0, 0, 0, 0);
        }
        fn unpremul(c: u8, a: u8) -> u8 {
            let c = u32::from(c);
            let a = u32::from(a);
            ((c * 255 + a / 2) / a).min(255) as u8
        }
        Rgba8::rgba(
            unpremul(self.r, self.a),
            unpremul(self.g, self.a),
            unpremul(self.b, self.a),
            self.a,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
