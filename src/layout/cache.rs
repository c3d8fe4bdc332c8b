use std::{collections::HashMap, sync::Arc};

use crate::{
    foundation::core::Canvas,
    layout::pattern::Placement,
    seed::key::SeedKey,
    theme::model::{PatternMode, PatternParameters},
};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
/// Identity of one cached placement list.
///
/// Floating-point parameters are compared by their bit patterns so that any edit, however small,
/// produces a different key. Opacity only affects painting and is not part of the key.
pub struct PlacementKey {
    layout_key: SeedKey,
    theme_id: String,
    mode: PatternMode,
    param_bits: [u64; 7],
    canvas: u32,
}

impl PlacementKey {
    /// Build a key from the layout stream key (already tagged), theme identity, parameters and
    /// canvas.
    pub fn new(
        layout_key: SeedKey,
        theme_id: impl Into<String>,
        params: &PatternParameters,
        canvas: Canvas,
    ) -> Self {
        let zone = &params.safe_zone;
        Self {
            layout_key,
            theme_id: theme_id.into(),
            mode: params.mode,
            param_bits: [
                params.density.to_bits(),
                params.element_scale.to_bits(),
                params.rotation_variance.to_bits(),
                params.margin_fraction.to_bits(),
                zone.width_fraction.to_bits(),
                zone.height_fraction.to_bits(),
                zone.falloff.to_bits(),
            ],
            canvas: canvas.size,
        }
    }

    pub fn layout_key(&self) -> &SeedKey {
        &self.layout_key
    }

    pub fn theme_id(&self) -> &str {
        &self.theme_id
    }

    pub fn canvas(&self) -> u32 {
        self.canvas
    }

    /// Same cover: layout stream and theme match, parameters and canvas may differ.
    fn same_cover(&self, other: &PlacementKey) -> bool {
        self.layout_key == other.layout_key && self.theme_id == other.theme_id
    }
}

/// Canvas sizes kept per cover (preview and export).
pub const CANVASES_PER_COVER: usize = 2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Lookup counters of a [`PlacementCache`].
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that ran the layout generator.
    pub computations: u64,
}

#[derive(Debug, Default)]
/// Placement lists keyed by [`PlacementKey`].
///
/// Entries are complete lists only: the generator runs to completion before anything is
/// inserted. A cover holds one entry per canvas size and at most [`CANVASES_PER_COVER`] sizes:
/// a miss replaces the entry built from older parameters at the same size, and evicts the least
/// recently used size when the cover is full.
pub struct PlacementCache {
    entries: HashMap<PlacementKey, CacheEntry>,
    clock: u64,
    stats: CacheStats,
}

#[derive(Debug)]
struct CacheEntry {
    placements: Arc<[Placement]>,
    last_used: u64,
}

impl PlacementCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached list for `key`, or build it with `generate` and remember it.
    ///
    /// A hit returns the very same `Arc` that was stored on the first lookup.
    pub fn get_or_insert_with(
        &mut self,
        key: PlacementKey,
        generate: impl FnOnce() -> Vec<Placement>,
    ) -> Arc<[Placement]> {
        self.clock += 1;
        if let Some(hit) = self.entries.get_mut(&key) {
            hit.last_used = self.clock;
            self.stats.hits += 1;
            tracing::debug!(key = %key.layout_key, canvas = key.canvas, "placement cache hit");
            return Arc::clone(&hit.placements);
        }

        let placements: Arc<[Placement]> = generate().into();
        self.stats.computations += 1;
        let evicted = self.make_room_for(&key);
        tracing::debug!(
            key = %key.layout_key,
            canvas = key.canvas,
            placements = placements.len(),
            evicted,
            "placement cache miss"
        );
        self.entries.insert(
            key,
            CacheEntry {
                placements: Arc::clone(&placements),
                last_used: self.clock,
            },
        );
        placements
    }

    /// Drop entries of `key`'s cover that `key` supersedes or displaces; returns how many.
    fn make_room_for(&mut self, key: &PlacementKey) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|k, _| !(k.same_cover(key) && k.canvas == key.canvas));

        while self.entries.keys().filter(|k| k.same_cover(key)).count() >= CANVASES_PER_COVER {
            let Some(victim) = self
                .entries
                .iter()
                .filter(|(k, _)| k.same_cover(key))
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(k, _)| k.clone())
            else {
                break;
            };
            self.entries.remove(&victim);
        }
        before - self.entries.len()
    }

    pub fn get(&self, key: &PlacementKey) -> Option<Arc<[Placement]>> {
        self.entries
            .get(key)
            .map(|entry| Arc::clone(&entry.placements))
    }

    /// Drop every entry. Counters are kept.
    pub fn invalidate(&mut self) {
        self.entries.clear();
    }

    /// Drop every entry built for `theme_id`; returns how many were removed.
    pub fn invalidate_theme(&mut self, theme_id: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.theme_id != theme_id);
        before - self.entries.len()
    }

    /// Drop every entry built for a canvas size other than `keep`.
    pub fn retain_canvas(&mut self, keep: Canvas) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.canvas == keep.size);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/cache.rs"]
mod tests;
