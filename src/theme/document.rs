use std::{fs::File, io::BufReader, path::Path};

use crate::{
    foundation::error::{CoverError, CoverResult},
    theme::model::{CoverItem, Theme, series_items},
};

/// Placeholder cover count when a document lists neither items nor a count.
pub const DEFAULT_SERIES_COUNT: usize = 4;

/// JSON-facing description of a whole series: seed, theme and the text of every cover.
///
/// `items` may be omitted, in which case `count` placeholder items are generated (see
/// [`series_items`]).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SeriesDoc {
    pub series_seed: String,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub items: Vec<CoverItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl SeriesDoc {
    pub fn from_reader<R: std::io::Read>(r: R) -> CoverResult<Self> {
        let mut doc: SeriesDoc = serde_json::from_reader(r)
            .map_err(|e| CoverError::serde(format!("parse series JSON: {e}")))?;
        if doc.items.is_empty() {
            doc.items = series_items(doc.count.unwrap_or(DEFAULT_SERIES_COUNT));
        }
        Ok(doc)
    }

    pub fn from_path(path: impl AsRef<Path>) -> CoverResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            CoverError::validation(format!("open series JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> CoverResult<()> {
        if self.series_seed.trim().is_empty() {
            return Err(CoverError::validation("series_seed must be non-empty"));
        }
        if self.items.is_empty() {
            return Err(CoverError::validation("series must contain at least one item"));
        }
        self.theme.validate()
    }

    pub fn item(&self, index: usize) -> CoverResult<&CoverItem> {
        self.items.get(index).ok_or_else(|| {
            CoverError::validation(format!(
                "item index {index} out of range (series has {} items)",
                self.items.len()
            ))
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/theme/document.rs"]
mod tests;
