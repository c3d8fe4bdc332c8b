//! covergen composes square cover art for themed series.
//!
//! A [`Theme`] describes the look (background, palette, motif vocabulary, pattern layout and
//! typography); a [`CoverItem`] carries the text of one cover; a [`SeedContext`] places it in a
//! series. The same three inputs always produce the same draw calls, at any canvas size:
//!
//! - [`Composer::render_composition`] draws one cover onto any [`Surface`]
//! - [`render_series`] renders a whole series on [`CpuSurface`]s in parallel
//! - [`probe_determinism`] re-renders a cover and compares fingerprints
#![forbid(unsafe_code)]

mod compose;
mod foundation;
mod layout;
mod motif;
mod render;
mod seed;
mod text;
mod theme;

pub use crate::foundation::core::{
    Affine, BezPath, Canvas, Point, REFERENCE_CANVAS_PX, Rect, Rgba8, Rgba8Premul, Vec2,
};
pub use crate::foundation::error::{CoverError, CoverResult, GeometryKind};

pub use crate::seed::hash::{cyrb128, derive_seed};
pub use crate::seed::key::{SEED_KEY_DELIMITER, SeedContext, SeedKey, StreamTag};
pub use crate::seed::rng::SeededRng;

pub use crate::theme::document::{DEFAULT_SERIES_COUNT, SeriesDoc};
pub use crate::theme::model::{
    CoverItem, MotifDescriptor, PaletteRoles, PatternMode, PatternParameters, SafeZone, TextRole,
    TextStyle, Theme, Typography, series_items,
};

pub use crate::layout::cache::{CANVASES_PER_COVER, CacheStats, PlacementCache, PlacementKey};
pub use crate::layout::pattern::{
    LayoutCandidate, LayoutGrid, Placement, generate_candidates, generate_layout,
    safe_zone_acceptance,
};

pub use crate::motif::geometry::{
    GeometryLibrary, GeometryLookup, ICON_GRID, ICON_STROKE_WIDTH, SHAPE_STROKE_WIDTH,
};
pub use crate::motif::resolve::{MotifInstance, MotifKind, MotifResolver};

pub use crate::text::fit::{FIT_STEPS, FitConstraints, TextFit, fit_text, wrap_words};
pub use crate::text::font::{FontFace, FontSpec, MonospaceMeasure, TextMeasure, tracked_width};

pub use crate::render::FrameRGBA;
pub use crate::render::cpu::{CpuSurface, FontBytes};
pub use crate::render::recording::{DrawOp, RecordingSurface};
pub use crate::render::surface::{DrawState, PathPaint, StateStack, Surface, SurfaceFingerprint};

pub use crate::compose::composer::{Composer, RenderReport, RenderWarning};
pub use crate::compose::series::{
    CoverFrame, DeterminismProbe, ExportFormat, SeriesJob, SeriesThreading, export_file_name,
    probe_determinism, render_series,
};
pub use crate::compose::text_block::{
    BLOCK_GAP_UNITS, LINE_GAP_UNITS, PlacedLine, TextBlock, layout_text_block, shared_max_width,
};
