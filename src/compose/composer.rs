use std::sync::Arc;

use crate::{
    compose::text_block::{TextBlock, layout_text_block},
    foundation::core::{Canvas, Vec2},
    foundation::error::{CoverError, CoverResult},
    layout::{
        cache::{PlacementCache, PlacementKey},
        pattern::{Placement, generate_layout},
    },
    motif::{
        geometry::{GeometryLibrary, GeometryLookup, ICON_STROKE_WIDTH, SHAPE_STROKE_WIDTH},
        resolve::{MotifKind, MotifResolver},
    },
    render::surface::{PathPaint, Surface},
    seed::{
        key::{SeedContext, SeedKey, StreamTag},
        rng::SeededRng,
    },
    text::fit::TextFit,
    theme::model::{CoverItem, TextRole, Theme},
};

/// Non-fatal condition noticed while composing a cover.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderWarning {
    /// The text did not fit even at the minimum size.
    TextClamped { role: TextRole },
}

impl std::fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TextClamped { role } => {
                write!(f, "{role} text does not fit and was clamped to the minimum size")
            }
        }
    }
}

/// Summary of one composed cover.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RenderReport {
    pub seed_key: String,
    pub placements: usize,
    pub shapes: usize,
    pub icons: usize,
    pub header: TextFit,
    pub title: TextFit,
    pub subheader: TextFit,
    pub warnings: Vec<RenderWarning>,
}

/// Composes covers onto caller-provided surfaces.
///
/// Owns the placement cache, so repeated renders of the same cover (or the same cover at another
/// zoom of the same canvas) skip layout generation. One composer is meant to be driven from one
/// thread; series rendering gives every worker its own.
pub struct Composer {
    geometry: Arc<dyn GeometryLookup + Send + Sync>,
    cache: PlacementCache,
}

impl std::fmt::Debug for Composer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Composer")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl Composer {
    pub fn new(geometry: Arc<dyn GeometryLookup + Send + Sync>) -> Self {
        Self {
            geometry,
            cache: PlacementCache::new(),
        }
    }

    pub fn with_builtin_geometry() -> CoverResult<Self> {
        Ok(Self::new(Arc::new(GeometryLibrary::builtin()?)))
    }

    pub fn geometry(&self) -> &Arc<dyn GeometryLookup + Send + Sync> {
        &self.geometry
    }

    pub fn cache(&self) -> &PlacementCache {
        &self.cache
    }

    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    pub fn invalidate_theme(&mut self, theme_id: &str) -> usize {
        self.cache.invalidate_theme(theme_id)
    }

    /// Placements of one cover, generated on the first request and cached afterwards.
    pub fn placements(
        &mut self,
        canvas: Canvas,
        theme: &Theme,
        seed_ctx: &SeedContext,
        item: &CoverItem,
    ) -> CoverResult<Arc<[Placement]>> {
        canvas.validate()?;
        theme.pattern.validate()?;
        let seed_key = SeedKey::for_item(seed_ctx, &theme.id, &item.seed_suffix);
        Ok(self.cached_placements(canvas, theme, &seed_key))
    }

    fn cached_placements(
        &mut self,
        canvas: Canvas,
        theme: &Theme,
        seed_key: &SeedKey,
    ) -> Arc<[Placement]> {
        let layout_key = seed_key.stream_key(StreamTag::Layout);
        let key = PlacementKey::new(layout_key.clone(), theme.id.as_str(), &theme.pattern, canvas);
        self.cache.get_or_insert_with(key, || {
            let mut rng = SeededRng::from_key(layout_key.as_str());
            generate_layout(canvas, &theme.pattern, &mut rng)
        })
    }

    /// Fail with [`CoverError::MissingGeometry`] for the first motif id without an outline.
    pub fn check_geometry(&self, theme: &Theme) -> CoverResult<()> {
        let resolver = MotifResolver::new(&theme.motif, &theme.palette);
        for (kind, id) in resolver.referenced_ids() {
            if self.geometry.lookup(kind, id).is_none() {
                return Err(CoverError::missing_geometry(kind.into(), id));
            }
        }
        Ok(())
    }

    /// Draw one cover: background, motif layer, then the text block.
    ///
    /// Theme, canvas and geometry are checked before the first draw call, so an invalid request
    /// leaves the surface untouched.
    #[tracing::instrument(
        level = "debug",
        skip(self, surface, theme, item, seed_ctx),
        fields(theme = %theme.id, index = seed_ctx.item_index, size = canvas.size)
    )]
    pub fn render_composition(
        &mut self,
        surface: &mut (impl Surface + ?Sized),
        canvas: Canvas,
        theme: &Theme,
        item: &CoverItem,
        seed_ctx: &SeedContext,
    ) -> CoverResult<RenderReport> {
        canvas.validate()?;
        if surface.canvas() != canvas {
            return Err(CoverError::validation(format!(
                "surface is {} px but the requested canvas is {} px",
                surface.canvas().size,
                canvas.size
            )));
        }
        theme.validate()?;
        self.check_geometry(theme)?;

        let seed_key = SeedKey::for_item(seed_ctx, &theme.id, &item.seed_suffix);

        surface.fill_rect(canvas.rect(), theme.background)?;

        let placements = self.cached_placements(canvas, theme, &seed_key);
        let (shapes, icons) = self.draw_motifs(surface, theme, &seed_key, &placements)?;

        let block = layout_text_block(canvas, theme, item, &*surface);
        for line in &block.lines {
            surface.draw_text(
                &line.text,
                line.origin,
                &line.font,
                line.tracking_em,
                theme.typography.text_color,
            )?;
        }

        let warnings = clamp_warnings(&block);
        for warning in &warnings {
            tracing::warn!(key = %seed_key, "{warning}");
        }

        let TextBlock {
            header,
            title,
            subheader,
            ..
        } = block;
        Ok(RenderReport {
            seed_key: seed_key.to_string(),
            placements: placements.len(),
            shapes,
            icons,
            header,
            title,
            subheader,
            warnings,
        })
    }

    fn draw_motifs(
        &self,
        surface: &mut (impl Surface + ?Sized),
        theme: &Theme,
        seed_key: &SeedKey,
        placements: &[Placement],
    ) -> CoverResult<(usize, usize)> {
        let resolver = MotifResolver::new(&theme.motif, &theme.palette);
        let mut rng = seed_key.stream(StreamTag::Motif);
        let (mut shapes, mut icons) = (0, 0);

        surface.set_alpha(theme.pattern.opacity);
        for placement in placements {
            let instance = resolver.resolve_instance(&mut rng);
            let path = self
                .geometry
                .lookup(instance.kind, &instance.id)
                .ok_or_else(|| CoverError::missing_geometry(instance.kind.into(), &instance.id))?;
            let paint = match (theme.motif.stroke, instance.kind) {
                (false, _) => PathPaint::Fill,
                (true, MotifKind::Shape) => PathPaint::Stroke {
                    width: SHAPE_STROKE_WIDTH,
                },
                (true, MotifKind::Icon) => PathPaint::Stroke {
                    width: ICON_STROKE_WIDTH,
                },
            };
            match instance.kind {
                MotifKind::Shape => shapes += 1,
                MotifKind::Icon => icons += 1,
            }

            surface.save();
            surface.translate(Vec2::new(placement.x, placement.y));
            surface.rotate(placement.rotation);
            surface.scale(placement.size);
            let drawn = surface.draw_path(path, paint, instance.color);
            surface.restore();
            drawn?;
        }
        surface.set_alpha(1.0);
        Ok((shapes, icons))
    }
}

fn clamp_warnings(block: &TextBlock) -> Vec<RenderWarning> {
    [TextRole::Header, TextRole::Title, TextRole::Subheader]
        .into_iter()
        .filter(|role| block.fit(*role).clamped_to_min)
        .map(|role| RenderWarning::TextClamped { role })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/compose/composer.rs"]
mod tests;
