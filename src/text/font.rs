/// Typeface selection without a size.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FontFace {
    pub family: String,
    pub weight: u16,
}

impl FontFace {
    pub fn new(family: impl Into<String>, weight: u16) -> Self {
        Self {
            family: family.into(),
            weight,
        }
    }

    /// This face at `size_px`.
    pub fn at(&self, size_px: f64) -> FontSpec {
        FontSpec {
            family: self.family.clone(),
            weight: self.weight,
            size_px,
        }
    }
}

/// A fully specified font: face plus pixel size.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub weight: u16,
    pub size_px: f64,
}

/// Pure text width measurement.
///
/// Implementations must not depend on or mutate drawing state: the same `(text, font)` always
/// yields the same width. Letter-spacing is not part of the measurement; see [`tracked_width`].
pub trait TextMeasure {
    fn measure(&self, text: &str, font: &FontSpec) -> f64;
}

impl<F> TextMeasure for F
where
    F: Fn(&str, &FontSpec) -> f64,
{
    fn measure(&self, text: &str, font: &FontSpec) -> f64 {
        self(text, font)
    }
}

/// Fixed advance per character, proportional to the font size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonospaceMeasure {
    /// Advance of one character in ems.
    pub advance_em: f64,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self { advance_em: 0.6 }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn measure(&self, text: &str, font: &FontSpec) -> f64 {
        text.chars().count() as f64 * self.advance_em * font.size_px
    }
}

/// Measured width plus `tracking_em · size` per character.
pub fn tracked_width(
    measure: &(impl TextMeasure + ?Sized),
    text: &str,
    font: &FontSpec,
    tracking_em: f64,
) -> f64 {
    measure.measure(text, font) + tracking_em * font.size_px * text.chars().count() as f64
}
