use crate::text::font::{FontFace, TextMeasure, tracked_width};

/// Number of equal steps between the base and the minimum size.
///
/// The step is a fraction of the size range rather than a pixel amount, so a preview and an export
/// whose sizes differ only by the canvas scale walk the same candidate sequence.
pub const FIT_STEPS: usize = 32;

/// Box and size range a text field has to fit in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitConstraints {
    pub max_width: f64,
    pub base_size_px: f64,
    pub min_size_px: f64,
    pub max_lines: usize,
    pub tracking_em: f64,
}

/// Outcome of [`fit_text`].
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct TextFit {
    pub size_px: f64,
    pub lines: Vec<String>,
    /// The minimum size was reached without satisfying the constraints.
    pub clamped_to_min: bool,
}

impl TextFit {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Shrink-to-fit search.
///
/// Sizes are tried from `base_size_px` down to `min_size_px` in [`FIT_STEPS`] equal steps; at each
/// size the words are greedily wrapped and the first size where every line fits `max_width` within
/// `max_lines` wins. When none does, the wrap at the minimum size is returned with
/// `clamped_to_min` set and any overflow lines merged into the last permitted line.
///
/// A word wider than `max_width` occupies a line of its own. Whitespace-only text yields no lines
/// at the base size.
pub fn fit_text(
    text: &str,
    constraints: &FitConstraints,
    face: &FontFace,
    measure: &(impl TextMeasure + ?Sized),
) -> TextFit {
    let base = constraints.base_size_px;
    let min = constraints.min_size_px.min(base);
    let max_lines = constraints.max_lines.max(1);

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return TextFit {
            size_px: base,
            lines: Vec::new(),
            clamped_to_min: false,
        };
    }

    let width_at = |line: &str, size: f64| {
        tracked_width(measure, line, &face.at(size), constraints.tracking_em)
    };

    let step = (base - min) / FIT_STEPS as f64;
    for k in 0..=FIT_STEPS {
        let size = if k == FIT_STEPS {
            min
        } else {
            base - k as f64 * step
        };
        let lines = wrap_words(&words, constraints.max_width, |l| width_at(l, size));
        let fits = lines.len() <= max_lines
            && lines
                .iter()
                .all(|l| width_at(l, size) <= constraints.max_width);
        if fits {
            return TextFit {
                size_px: size,
                lines,
                clamped_to_min: false,
            };
        }
        if step == 0.0 {
            break;
        }
    }

    let mut lines = wrap_words(&words, constraints.max_width, |l| width_at(l, min));
    if lines.len() > max_lines {
        let overflow = lines.split_off(max_lines - 1).join(" ");
        lines.push(overflow);
    }
    TextFit {
        size_px: min,
        lines,
        clamped_to_min: true,
    }
}

/// Greedy wrap: a line is extended while its width stays within `max_width`.
pub fn wrap_words(words: &[&str], max_width: f64, width: impl Fn(&str) -> f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in words {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if width(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, (*word).to_string()));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
#[path = "../../tests/unit/text/fit.rs"]
mod tests;
