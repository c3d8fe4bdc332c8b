use crate::foundation::core::Rgba8;
use crate::foundation::error::{CoverError, CoverResult};

/// Pattern layout algorithm used for the motif layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternMode {
    #[serde(alias = "Tiled Grid")]
    Tiled,
    #[serde(alias = "Offset Grid")]
    Offset,
    #[serde(alias = "Diagonal Drift")]
    Diagonal,
    #[serde(alias = "Radial Scatter")]
    RadialScatter,
    #[serde(alias = "Isometric-ish")]
    Isometric,
    #[serde(alias = "Border Band")]
    BorderBand,
}

impl PatternMode {
    pub const ALL: [PatternMode; 6] = [
        PatternMode::Tiled,
        PatternMode::Offset,
        PatternMode::Diagonal,
        PatternMode::RadialScatter,
        PatternMode::Isometric,
        PatternMode::BorderBand,
    ];
}

/// Central region kept clear for text, with a soft transition band around it.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SafeZone {
    /// Rectangle width as a fraction of the canvas, in `[0, 1)`.
    pub width_fraction: f64,
    /// Rectangle height as a fraction of the canvas, in `[0, 1)`.
    pub height_fraction: f64,
    /// Width of the transition band as a fraction of the canvas, in `(0, 1]`.
    pub falloff: f64,
}

impl Default for SafeZone {
    fn default() -> Self {
        Self {
            width_fraction: 0.55,
            height_fraction: 0.3,
            falloff: 0.6,
        }
    }
}

/// Parameters of the motif pattern layer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PatternParameters {
    pub mode: PatternMode,
    /// `(0, 1]`; higher density means tighter spacing.
    pub density: f64,
    /// `> 0`; motif size relative to grid spacing.
    pub element_scale: f64,
    /// `[0, 1]`; rotation spread as a fraction of `±π`.
    pub rotation_variance: f64,
    /// `[0, 1]`; alpha applied to the whole motif layer.
    pub opacity: f64,
    /// `[0, 0.5)`; border excluded from lattice placement on each side.
    pub margin_fraction: f64,
    pub safe_zone: SafeZone,
}

impl Default for PatternParameters {
    fn default() -> Self {
        Self {
            mode: PatternMode::Tiled,
            density: 0.6,
            element_scale: 0.7,
            rotation_variance: 0.2,
            opacity: 0.25,
            margin_fraction: 0.08,
            safe_zone: SafeZone::default(),
        }
    }
}

impl PatternParameters {
    pub fn validate(&self) -> CoverResult<()> {
        finite_in("pattern.density", self.density, |v| v > 0.0 && v <= 1.0, "(0, 1]")?;
        finite_in("pattern.element_scale", self.element_scale, |v| v > 0.0, "> 0")?;
        finite_in(
            "pattern.rotation_variance",
            self.rotation_variance,
            |v| (0.0..=1.0).contains(&v),
            "[0, 1]",
        )?;
        finite_in(
            "pattern.opacity",
            self.opacity,
            |v| (0.0..=1.0).contains(&v),
            "[0, 1]",
        )?;
        finite_in(
            "pattern.margin_fraction",
            self.margin_fraction,
            |v| (0.0..0.5).contains(&v),
            "[0, 0.5)",
        )?;
        finite_in(
            "pattern.safe_zone.width_fraction",
            self.safe_zone.width_fraction,
            |v| (0.0..1.0).contains(&v),
            "[0, 1)",
        )?;
        finite_in(
            "pattern.safe_zone.height_fraction",
            self.safe_zone.height_fraction,
            |v| (0.0..1.0).contains(&v),
            "[0, 1)",
        )?;
        finite_in(
            "pattern.safe_zone.falloff",
            self.safe_zone.falloff,
            |v| v > 0.0 && v <= 1.0,
            "(0, 1]",
        )?;
        Ok(())
    }
}

/// Decorative vocabulary of a theme.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MotifDescriptor {
    pub primary_shape: String,
    /// Falls back to `[primary_shape]` when empty.
    pub secondary_shapes: Vec<String>,
    pub icon_pool: Vec<String>,
    /// `[0, 1]`; treated as 0 when `icon_pool` is empty.
    pub icon_mix_probability: f64,
    /// `[0, 1]`; share of shape draws that pick the primary shape.
    pub primary_weight: f64,
    /// Outline motifs instead of filling them.
    pub stroke: bool,
}

impl Default for MotifDescriptor {
    fn default() -> Self {
        Self {
            primary_shape: "circle".to_string(),
            secondary_shapes: vec![
                "square".to_string(),
                "triangle".to_string(),
                "ring".to_string(),
            ],
            icon_pool: vec![
                "music-note".to_string(),
                "sparkles".to_string(),
                "headphones".to_string(),
            ],
            icon_mix_probability: 0.25,
            primary_weight: 0.6,
            stroke: true,
        }
    }
}

impl MotifDescriptor {
    pub fn effective_secondary_shapes(&self) -> &[String] {
        if self.secondary_shapes.is_empty() {
            std::slice::from_ref(&self.primary_shape)
        } else {
            &self.secondary_shapes
        }
    }

    pub fn effective_icon_probability(&self) -> f64 {
        if self.icon_pool.is_empty() {
            0.0
        } else {
            self.icon_mix_probability
        }
    }

    pub fn validate(&self) -> CoverResult<()> {
        if self.primary_shape.trim().is_empty() {
            return Err(CoverError::validation(
                "motif.primary_shape must be non-empty",
            ));
        }
        finite_in(
            "motif.icon_mix_probability",
            self.icon_mix_probability,
            |v| (0.0..=1.0).contains(&v),
            "[0, 1]",
        )?;
        finite_in(
            "motif.primary_weight",
            self.primary_weight,
            |v| (0.0..=1.0).contains(&v),
            "[0, 1]",
        )?;
        Ok(())
    }
}

/// The fixed pick-list of motif colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PaletteRoles {
    pub primary: Rgba8,
    pub secondary: Rgba8,
    pub accent1: Rgba8,
    pub accent2: Rgba8,
    pub neutral: Rgba8,
}

impl Default for PaletteRoles {
    fn default() -> Self {
        Self {
            primary: Rgba8::rgb(0x7C, 0xF6, 0xFF),
            secondary: Rgba8::rgb(0xE8, 0xE8, 0xE8),
            accent1: Rgba8::rgb(0x63, 0xB3, 0xFF),
            accent2: Rgba8::rgb(0xFF, 0xB4, 0x54),
            neutral: Rgba8::rgb(0xF2, 0xF2, 0xF2),
        }
    }
}

impl PaletteRoles {
    /// Colors in pick order.
    pub fn colors(&self) -> [Rgba8; 5] {
        [
            self.primary,
            self.secondary,
            self.accent1,
            self.accent2,
            self.neutral,
        ]
    }
}

/// One of the three text fields of a cover.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextRole {
    Header,
    Title,
    Subheader,
}

impl std::fmt::Display for TextRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Header => f.write_str("header"),
            Self::Title => f.write_str("title"),
            Self::Subheader => f.write_str("subheader"),
        }
    }
}

/// Typography of one text role. Pixel sizes are relative to a 1000 px canvas.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextStyle {
    pub font_family: String,
    pub font_weight: u16,
    pub tracking_em: f64,
    pub base_size_px: f64,
    pub min_size_px: f64,
    pub max_lines: usize,
}

impl TextStyle {
    fn new(family: &str, weight: u16, tracking_em: f64, base: f64, min: f64, lines: usize) -> Self {
        Self {
            font_family: family.to_string(),
            font_weight: weight,
            tracking_em,
            base_size_px: base,
            min_size_px: min,
            max_lines: lines,
        }
    }

    fn validate(&self, role: TextRole) -> CoverResult<()> {
        if self.font_family.trim().is_empty() {
            return Err(CoverError::validation(format!(
                "typography.{role}.font_family must be non-empty"
            )));
        }
        if !(1..=1000).contains(&self.font_weight) {
            return Err(CoverError::validation(format!(
                "typography.{role}.font_weight must be in [1, 1000]"
            )));
        }
        if !self.tracking_em.is_finite() {
            return Err(CoverError::validation(format!(
                "typography.{role}.tracking_em must be finite"
            )));
        }
        if !self.min_size_px.is_finite() || self.min_size_px <= 0.0 {
            return Err(CoverError::validation(format!(
                "typography.{role}.min_size_px must be finite and > 0"
            )));
        }
        if !self.base_size_px.is_finite() || self.base_size_px < self.min_size_px {
            return Err(CoverError::validation(format!(
                "typography.{role}.base_size_px must be finite and >= min_size_px"
            )));
        }
        if self.max_lines == 0 {
            return Err(CoverError::validation(format!(
                "typography.{role}.max_lines must be >= 1"
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Typography {
    pub header: TextStyle,
    pub title: TextStyle,
    pub subheader: TextStyle,
    pub text_color: Rgba8,
    /// Share of the canvas width available to text before margins are removed.
    pub max_width_fraction: f64,
    /// Vertical rhythm unit (reference px) for line gaps and block spacing.
    pub baseline_unit_px: f64,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            header: TextStyle::new("system-ui", 500, 0.12, 68.0, 40.0, 1),
            title: TextStyle::new("Helvetica Neue", 700, 0.08, 220.0, 100.0, 2),
            subheader: TextStyle::new("system-ui", 500, 0.16, 56.0, 36.0, 1),
            text_color: Rgba8::rgb(0xF2, 0xF2, 0xF2),
            max_width_fraction: 0.8,
            baseline_unit_px: 12.0,
        }
    }
}

impl Typography {
    pub fn style(&self, role: TextRole) -> &TextStyle {
        match role {
            TextRole::Header => &self.header,
            TextRole::Title => &self.title,
            TextRole::Subheader => &self.subheader,
        }
    }

    pub fn validate(&self) -> CoverResult<()> {
        for role in [TextRole::Header, TextRole::Title, TextRole::Subheader] {
            self.style(role).validate(role)?;
        }
        finite_in(
            "typography.max_width_fraction",
            self.max_width_fraction,
            |v| v > 0.0 && v <= 1.0,
            "(0, 1]",
        )?;
        finite_in(
            "typography.baseline_unit_px",
            self.baseline_unit_px,
            |v| v >= 0.0,
            ">= 0",
        )?;
        Ok(())
    }
}

/// Complete, read-only description of a series look.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Theme {
    pub id: String,
    pub background: Rgba8,
    pub palette: PaletteRoles,
    pub motif: MotifDescriptor,
    pub pattern: PatternParameters,
    pub typography: Typography,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            id: "theme-default".to_string(),
            background: Rgba8::rgb(0x11, 0x11, 0x11),
            palette: PaletteRoles::default(),
            motif: MotifDescriptor::default(),
            pattern: PatternParameters::default(),
            typography: Typography::default(),
        }
    }
}

impl Theme {
    pub fn validate(&self) -> CoverResult<()> {
        if self.id.trim().is_empty() {
            return Err(CoverError::validation("theme.id must be non-empty"));
        }
        if self.id.contains(crate::seed::key::SEED_KEY_DELIMITER) {
            return Err(CoverError::validation("theme.id must not contain '|'"));
        }
        self.pattern.validate()?;
        self.motif.validate()?;
        self.typography.validate()?;
        Ok(())
    }
}

/// User-editable text of one cover.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CoverItem {
    pub header: String,
    pub title: String,
    pub subheader: String,
    /// Per-item suffix mixed into the seed key.
    pub seed_suffix: String,
}

impl CoverItem {
    pub fn text(&self, role: TextRole) -> &str {
        match role {
            TextRole::Header => &self.header,
            TextRole::Title => &self.title,
            TextRole::Subheader => &self.subheader,
        }
    }
}

/// Placeholder items for a new series: `Q1..Q4` for quarterly sets, else `01, 02, ...`.
pub fn series_items(count: usize) -> Vec<CoverItem> {
    (0..count)
        .map(|index| CoverItem {
            header: String::new(),
            title: "Playlist Name".to_string(),
            subheader: String::new(),
            seed_suffix: if count == 4 {
                format!("Q{}", index + 1)
            } else {
                format!("{:02}", index + 1)
            },
        })
        .collect()
}

fn finite_in(
    field: &str,
    value: f64,
    ok: impl Fn(f64) -> bool,
    expected: &str,
) -> CoverResult<()> {
    if value.is_finite() && ok(value) {
        Ok(())
    } else {
        Err(CoverError::validation(format!(
            "{field} must be in {expected}, got {value}"
        )))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/theme/model.rs"]
mod tests;
