use crate::{
    foundation::core::{Canvas, Point},
    text::{
        fit::{FitConstraints, TextFit, fit_text},
        font::{FontFace, FontSpec, TextMeasure, tracked_width},
    },
    theme::model::{CoverItem, TextRole, TextStyle, Theme},
};

/// Gap between the title block and the header/subheader, in baseline units.
pub const BLOCK_GAP_UNITS: f64 = 1.8;
/// Extra leading added to the font size for each line, in baseline units.
pub const LINE_GAP_UNITS: f64 = 0.6;

/// One line ready to draw: centered horizontally, `origin` is its left baseline point.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedLine {
    pub role: TextRole,
    pub text: String,
    pub origin: Point,
    pub font: FontSpec,
    pub tracking_em: f64,
}

/// Fitted and positioned header, title and subheader.
#[derive(Clone, Debug, PartialEq)]
pub struct TextBlock {
    pub header: TextFit,
    pub title: TextFit,
    pub subheader: TextFit,
    /// Lines in draw order: header, title, subheader.
    pub lines: Vec<PlacedLine>,
    pub max_width: f64,
}

impl TextBlock {
    pub fn fit(&self, role: TextRole) -> &TextFit {
        match role {
            TextRole::Header => &self.header,
            TextRole::Title => &self.title,
            TextRole::Subheader => &self.subheader,
        }
    }
}

/// Width shared by the three text fields: the typography width share minus both margins.
pub fn shared_max_width(canvas: Canvas, theme: &Theme) -> f64 {
    let side = canvas.side();
    let margin = side * theme.pattern.margin_fraction;
    (side * theme.typography.max_width_fraction - 2.0 * margin).max(0.0)
}

/// Fit the three text fields and stack them around the canvas center.
///
/// The title block is centered vertically; the header's last baseline sits
/// [`BLOCK_GAP_UNITS`] above the block and the subheader's first line starts the same gap below
/// it. All typography sizes are scaled from the 1000 px reference canvas.
pub fn layout_text_block(
    canvas: Canvas,
    theme: &Theme,
    item: &CoverItem,
    measure: &(impl TextMeasure + ?Sized),
) -> TextBlock {
    let typo = &theme.typography;
    let scale = canvas.reference_scale();
    let max_width = shared_max_width(canvas, theme);
    let unit = typo.baseline_unit_px * scale;
    let gap = unit * BLOCK_GAP_UNITS;
    let center = canvas.center();

    let fit_role = |role: TextRole| {
        let style = typo.style(role);
        let constraints = FitConstraints {
            max_width,
            base_size_px: style.base_size_px * scale,
            min_size_px: style.min_size_px * scale,
            max_lines: style.max_lines,
            tracking_em: style.tracking_em,
        };
        fit_text(item.text(role), &constraints, &face_of(style), measure)
    };
    let header = fit_role(TextRole::Header);
    let title = fit_role(TextRole::Title);
    let subheader = fit_role(TextRole::Subheader);

    let line_height = |fit: &TextFit| fit.size_px + unit * LINE_GAP_UNITS;
    let title_height = title.lines.len() as f64 * line_height(&title);
    let block_top = center.y - title_height * 0.5;
    let block_bottom = center.y + title_height * 0.5;

    let mut lines = Vec::new();
    let mut place = |role: TextRole, fit: &TextFit, first_baseline: f64| {
        let style = typo.style(role);
        let font = face_of(style).at(fit.size_px);
        for (i, text) in fit.lines.iter().enumerate() {
            let width = tracked_width(measure, text, &font, style.tracking_em);
            lines.push(PlacedLine {
                role,
                text: text.clone(),
                origin: Point::new(
                    center.x - width * 0.5,
                    first_baseline + i as f64 * line_height(fit),
                ),
                font: font.clone(),
                tracking_em: style.tracking_em,
            });
        }
    };

    let header_span = header.lines.len().saturating_sub(1) as f64 * line_height(&header);
    place(TextRole::Header, &header, block_top - gap - header_span);
    place(TextRole::Title, &title, block_top + title.size_px);
    place(TextRole::Subheader, &subheader, block_bottom + gap + subheader.size_px);

    TextBlock {
        header,
        title,
        subheader,
        lines,
        max_width,
    }
}

fn face_of(style: &TextStyle) -> FontFace {
    FontFace::new(style.font_family.clone(), style.font_weight)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/text_block.rs"]
mod tests;
