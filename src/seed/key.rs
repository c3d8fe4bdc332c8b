use crate::seed::rng::SeededRng;

/// Delimiter between seed key components.
pub const SEED_KEY_DELIMITER: char = '|';

/// Independent random streams derived from one [`SeedKey`].
///
/// Each stream gets its own generator, so adding or removing draws in one concern never shifts
/// the decisions of another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamTag {
    /// Placement positions, jitter, acceptance, size and rotation.
    Layout,
    /// Shape/icon choice and palette color per placement.
    Motif,
}

impl StreamTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Layout => "layout",
            Self::Motif => "motif",
        }
    }
}

/// Series-level seed inputs for one cover.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SeedContext {
    /// Master seed shared by the whole series.
    pub series_seed: String,
    /// Position of the cover inside the series.
    pub item_index: usize,
}

impl SeedContext {
    pub fn new(series_seed: impl Into<String>, item_index: usize) -> Self {
        Self {
            series_seed: series_seed.into(),
            item_index,
        }
    }
}

/// Opaque seed key identifying one cover: `series|theme|index|suffix`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeedKey(String);

impl SeedKey {
    /// Compose the key for one cover of a series.
    pub fn for_item(ctx: &SeedContext, theme_id: &str, seed_suffix: &str) -> Self {
        Self(format!(
            "{series}{d}{theme_id}{d}{index}{d}{seed_suffix}",
            series = ctx.series_seed,
            index = ctx.item_index,
            d = SEED_KEY_DELIMITER,
        ))
    }

    /// Wrap an already composed key.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key of the given stream: this key with `|{tag}` appended.
    pub fn stream_key(&self, tag: StreamTag) -> SeedKey {
        Self(format!("{}{}{}", self.0, SEED_KEY_DELIMITER, tag.as_str()))
    }

    /// Fresh generator for the given stream.
    pub fn stream(&self, tag: StreamTag) -> SeededRng {
        SeededRng::from_key(self.stream_key(tag).as_str())
    }
}

impl std::fmt::Display for SeedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/seed/key.rs"]
mod tests;
