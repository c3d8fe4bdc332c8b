use std::sync::Arc;

use rayon::prelude::*;

use crate::{
    compose::composer::{Composer, RenderReport},
    foundation::core::Canvas,
    foundation::error::{CoverError, CoverResult},
    motif::geometry::GeometryLookup,
    render::{
        FrameRGBA,
        cpu::{CpuSurface, FontBytes},
        surface::{Surface, SurfaceFingerprint},
    },
    seed::key::SeedContext,
    theme::model::{CoverItem, Theme},
};

/// Image container used when exporting covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Png,
    Jpg,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
        }
    }
}

/// File name for an exported cover: `{n}_{header}_{title}_{subheader}.{ext}`, 1-based.
///
/// Characters outside `[A-Za-z0-9._-]` are dropped, whitespace becomes `-`, and runs of `_` left
/// by empty fields collapse. Falls back to `cover-{n}.{ext}` when nothing usable remains.
pub fn export_file_name(index: usize, item: &CoverItem, format: ExportFormat) -> String {
    let n = index + 1;
    let raw = format!("{n}_{}_{}_{}", item.header, item.title, item.subheader);

    let mut stem = String::with_capacity(raw.len());
    for c in raw.chars() {
        let mapped = match c {
            c if c.is_ascii_alphanumeric() || c == '-' || c == '.' => c,
            '_' => '_',
            c if c.is_whitespace() => '-',
            _ => continue,
        };
        if mapped == '_' && stem.ends_with('_') {
            continue;
        }
        stem.push(mapped);
    }
    let stem = stem.trim_matches(|c| c == '_' || c == '-' || c == '.');

    if stem.is_empty() || stem == n.to_string() {
        format!("cover-{n}.{}", format.extension())
    } else {
        format!("{stem}.{}", format.extension())
    }
}

#[derive(Clone, Debug)]
pub struct SeriesThreading {
    pub parallel: bool,
    pub threads: Option<usize>,
}

impl Default for SeriesThreading {
    fn default() -> Self {
        Self {
            parallel: true,
            threads: None,
        }
    }
}

/// Everything shared by the covers of one series render.
#[derive(Clone, Copy, Debug)]
pub struct SeriesJob<'a> {
    pub canvas: Canvas,
    pub theme: &'a Theme,
    pub items: &'a [CoverItem],
    pub series_seed: &'a str,
    /// Font files registered on every surface.
    pub fonts: &'a [FontBytes],
}

/// One rendered cover of a series.
#[derive(Clone, Debug)]
pub struct CoverFrame {
    pub index: usize,
    pub frame: FrameRGBA,
    pub report: RenderReport,
}

/// Render every item of a series on CPU surfaces, in item order.
///
/// With `threading.parallel` the items are spread over a rayon pool and each worker owns its own
/// [`Composer`] (and therefore its own placement cache). Output is identical either way.
#[tracing::instrument(
    level = "debug",
    skip(geometry, job, threading),
    fields(theme = %job.theme.id, items = job.items.len(), size = job.canvas.size)
)]
pub fn render_series(
    geometry: Arc<dyn GeometryLookup + Send + Sync>,
    job: &SeriesJob<'_>,
    threading: &SeriesThreading,
) -> CoverResult<Vec<CoverFrame>> {
    job.canvas.validate()?;
    job.theme.validate()?;
    Composer::new(Arc::clone(&geometry)).check_geometry(job.theme)?;

    if !threading.parallel || job.items.len() <= 1 {
        let mut composer = Composer::new(geometry);
        return job
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| render_cover(&mut composer, job, index, item))
            .collect();
    }

    let pool = build_thread_pool(threading.threads)?;
    let rendered = pool.install(|| {
        job.items
            .par_iter()
            .enumerate()
            .map_init(
                || Composer::new(Arc::clone(&geometry)),
                |composer, (index, item)| -> CoverResult<CoverFrame> {
                    render_cover(composer, job, index, item)
                },
            )
            .collect::<Vec<_>>()
    });

    let mut out = Vec::with_capacity(rendered.len());
    for frame in rendered {
        out.push(frame?);
    }
    Ok(out)
}

fn render_cover(
    composer: &mut Composer,
    job: &SeriesJob<'_>,
    index: usize,
    item: &CoverItem,
) -> CoverResult<CoverFrame> {
    let mut surface = CpuSurface::new(job.canvas)?;
    surface.register_fonts(job.fonts)?;
    let seed_ctx = SeedContext::new(job.series_seed, index);
    let report = composer.render_composition(&mut surface, job.canvas, job.theme, item, &seed_ctx)?;
    Ok(CoverFrame {
        index,
        frame: surface.into_frame(),
        report,
    })
}

fn build_thread_pool(threads: Option<usize>) -> CoverResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(CoverError::validation(
            "series threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| CoverError::render(format!("failed to build rayon thread pool: {e}")))
}

/// Fingerprints of the same cover rendered through two composers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct DeterminismProbe {
    /// Rendered by a composer with an empty cache.
    pub fresh: u64,
    /// Rendered by the caller's composer, reusing whatever it has cached.
    pub cached: u64,
}

impl DeterminismProbe {
    pub fn is_deterministic(&self) -> bool {
        self.fresh == self.cached
    }
}

/// Render one cover twice on surfaces from `make_surface` and compare their fingerprints.
///
/// The first render goes through a fresh composer sharing `composer`'s geometry; the second goes
/// through `composer` itself, so a stale cache entry shows up as a mismatch.
pub fn probe_determinism<S>(
    composer: &mut Composer,
    mut make_surface: impl FnMut(Canvas) -> CoverResult<S>,
    canvas: Canvas,
    theme: &Theme,
    item: &CoverItem,
    seed_ctx: &SeedContext,
) -> CoverResult<DeterminismProbe>
where
    S: Surface + SurfaceFingerprint,
{
    let mut fresh_composer = Composer::new(Arc::clone(composer.geometry()));
    let mut fresh = make_surface(canvas)?;
    fresh_composer.render_composition(&mut fresh, canvas, theme, item, seed_ctx)?;

    let mut cached = make_surface(canvas)?;
    composer.render_composition(&mut cached, canvas, theme, item, seed_ctx)?;

    let probe = DeterminismProbe {
        fresh: fresh.fingerprint(),
        cached: cached.fingerprint(),
    };
    if probe.is_deterministic() {
        tracing::debug!(hash = probe.fresh, "determinism probe passed");
    } else {
        tracing::warn!(
            fresh = probe.fresh,
            cached = probe.cached,
            "determinism probe mismatch"
        );
    }
    Ok(probe)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/series.rs"]
mod tests;
