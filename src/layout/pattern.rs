use std::f64::consts::{PI, TAU};

use crate::{
    foundation::core::Canvas,
    seed::rng::SeededRng,
    theme::model::{PatternMode, PatternParameters, SafeZone},
};

/// Lattice spacing (fraction of the canvas) at density 0.
pub const SPACING_AT_ZERO_DENSITY: f64 = 0.24;
/// Spacing removed per unit of density; density 1 gives a spacing of 0.08.
pub const SPACING_DENSITY_SLOPE: f64 = 0.16;
/// Lower bound applied to the spacing so degenerate densities never divide by zero.
pub const MIN_SPACING: f64 = 0.01;
/// Lattice jitter amplitude as a fraction of the spacing (peak to peak).
pub const JITTER_FRACTION: f64 = 0.25;
/// Horizontal shift of odd rows in the offset and isometric modes (fraction of spacing).
pub const OFFSET_ROW_SHIFT: f64 = 0.5;
/// Horizontal drift per row in the diagonal mode (fraction of spacing).
pub const DIAGONAL_SHEAR_X: f64 = 0.12;
/// Vertical drift per column in the diagonal mode (fraction of spacing).
pub const DIAGONAL_SHEAR_Y: f64 = 0.08;
/// Row pitch of the isometric mode relative to the square lattice (√3 / 2).
pub const ISOMETRIC_ROW_PITCH: f64 = 0.866_025_403_784_438_6;
/// Lattice points farther than this from every canvas edge are dropped in border-band mode.
pub const BORDER_BAND_DEPTH: f64 = 0.25;
/// Radial candidate count is `grid² · (RADIAL_BASE_FACTOR + density)`.
pub const RADIAL_BASE_FACTOR: f64 = 0.6;
/// Per-instance size multiplier lower bound.
pub const SIZE_MULTIPLIER_MIN: f64 = 0.7;
/// Per-instance size multiplier span (`[0.7, 1.3)`).
pub const SIZE_MULTIPLIER_SPAN: f64 = 0.6;

/// One motif instance position before shape, icon and color are chosen.
///
/// Coordinates are canvas pixels; list order is the draw order.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub rotation: f64,
}

/// Base lattice shared by every grid-based mode, in unit canvas space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutGrid {
    pub spacing: f64,
    /// Number of cells per axis (intersections are `count + 1`).
    pub count: usize,
    /// Unit-space coordinate of the first intersection on both axes.
    pub origin: f64,
}

impl LayoutGrid {
    pub fn for_params(params: &PatternParameters) -> Self {
        let spacing =
            (SPACING_AT_ZERO_DENSITY - SPACING_DENSITY_SLOPE * params.density).max(MIN_SPACING);
        let usable = 1.0 - 2.0 * params.margin_fraction;
        let count = ((usable / spacing).floor().max(0.0) as usize).max(1);
        let extent = count as f64 * spacing;
        Self {
            spacing,
            count,
            origin: params.margin_fraction + (usable - extent) * 0.5,
        }
    }

    fn point(&self, row: usize, col: usize) -> (f64, f64) {
        (
            self.origin + col as f64 * self.spacing,
            self.origin + row as f64 * self.spacing,
        )
    }
}

/// A candidate in unit space together with the draws that decide its fate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutCandidate {
    pub x: f64,
    pub y: f64,
    /// Draw compared against [`LayoutCandidate::acceptance`].
    pub accept_roll: f64,
    /// Safe-zone accept probability at this position.
    pub acceptance: f64,
    /// Unit-space size.
    pub size: f64,
    pub rotation: f64,
}

impl LayoutCandidate {
    pub fn accepted(&self) -> bool {
        self.accept_roll < self.acceptance
    }

    fn to_placement(self, side: f64) -> Placement {
        Placement {
            x: self.x * side,
            y: self.y * side,
            size: self.size * side,
            rotation: self.rotation,
        }
    }
}

/// Accept probability for a unit-space position.
///
/// 0 inside the centered safe rectangle, rising linearly with the distance outside it and
/// reaching 1 at `falloff`.
pub fn safe_zone_acceptance(zone: &SafeZone, x: f64, y: f64) -> f64 {
    let dx = (x - 0.5).abs() - zone.width_fraction * 0.5;
    let dy = (y - 0.5).abs() - zone.height_fraction * 0.5;
    let outside = dx.max(dy);
    (outside / zone.falloff.max(f64::EPSILON)).clamp(0.0, 1.0)
}

/// Generate every candidate of the pattern in unit space, in draw order.
///
/// Each candidate consumes exactly five draws whether or not it is accepted: lattice modes draw
/// `jitter_x, jitter_y, accept, size, rotation`; radial scatter draws
/// `angle, radius, accept, size, rotation`. Border-band lattice points are discarded before any
/// draw.
pub fn generate_candidates(params: &PatternParameters, rng: &mut SeededRng) -> Vec<LayoutCandidate> {
    let grid = LayoutGrid::for_params(params);
    let mut out = Vec::new();

    if params.mode == PatternMode::RadialScatter {
        let n = radial_candidate_count(grid.count, params.density);
        let max_radius = (0.5 - params.margin_fraction).max(0.0);
        out.reserve(n);
        for _ in 0..n {
            let angle = rng.next_f64() * TAU;
            let radius = rng.next_f64().sqrt() * max_radius;
            let x = 0.5 + angle.cos() * radius;
            let y = 0.5 + angle.sin() * radius;
            out.push(finish_candidate(params, &grid, x, y, rng));
        }
        return out;
    }

    let lattice = grid.count + 1;
    out.reserve(lattice * lattice);
    for row in 0..lattice {
        for col in 0..lattice {
            let Some((x, y)) = lattice_point(params.mode, &grid, row, col) else {
                continue;
            };
            let jitter = JITTER_FRACTION * grid.spacing;
            let jx = (rng.next_f64() - 0.5) * jitter;
            let jy = (rng.next_f64() - 0.5) * jitter;
            out.push(finish_candidate(params, &grid, x + jx, y + jy, rng));
        }
    }
    out
}

/// Produce the ordered placement list for `canvas`.
///
/// All decisions are made in unit space and scaled by the canvas side at the end, so two canvas
/// sizes with the same generator seed give geometrically similar layouts.
#[tracing::instrument(level = "debug", skip(params, rng), fields(mode = ?params.mode))]
pub fn generate_layout(
    canvas: Canvas,
    params: &PatternParameters,
    rng: &mut SeededRng,
) -> Vec<Placement> {
    let side = canvas.side();
    let candidates = generate_candidates(params, rng);
    let total = candidates.len();
    let placements: Vec<Placement> = candidates
        .into_iter()
        .filter(LayoutCandidate::accepted)
        .map(|c| c.to_placement(side))
        .collect();
    tracing::debug!(candidates = total, accepted = placements.len(), "layout generated");
    placements
}

pub fn radial_candidate_count(grid_count: usize, density: f64) -> usize {
    let cells = (grid_count * grid_count) as f64;
    (cells * (RADIAL_BASE_FACTOR + density)).round().max(1.0) as usize
}

fn lattice_point(mode: PatternMode, grid: &LayoutGrid, row: usize, col: usize) -> Option<(f64, f64)> {
    let (mut x, mut y) = grid.point(row, col);
    let spacing = grid.spacing;
    let odd_row = (row % 2) as f64;

    match mode {
        PatternMode::Tiled | PatternMode::RadialScatter => {}
        PatternMode::Offset => {
            x += odd_row * spacing * OFFSET_ROW_SHIFT;
        }
        PatternMode::Diagonal => {
            x += row as f64 * spacing * DIAGONAL_SHEAR_X;
            y += col as f64 * spacing * DIAGONAL_SHEAR_Y;
        }
        PatternMode::Isometric => {
            let shear = ISOMETRIC_ROW_PITCH - 1.0;
            x += odd_row * spacing * OFFSET_ROW_SHIFT;
            y += row as f64 * spacing * shear - grid.count as f64 * spacing * shear * 0.5;
        }
        PatternMode::BorderBand => {
            let edge = x.min(y).min(1.0 - x).min(1.0 - y);
            if edge > BORDER_BAND_DEPTH {
                return None;
            }
        }
    }
    Some((x, y))
}

fn finish_candidate(
    params: &PatternParameters,
    grid: &LayoutGrid,
    x: f64,
    y: f64,
    rng: &mut SeededRng,
) -> LayoutCandidate {
    let accept_roll = rng.next_f64();
    let size_roll = rng.next_f64();
    let rotation_roll = rng.next_f64();
    LayoutCandidate {
        x,
        y,
        accept_roll,
        acceptance: safe_zone_acceptance(&params.safe_zone, x, y),
        size: params.element_scale
            * grid.spacing
            * (SIZE_MULTIPLIER_MIN + SIZE_MULTIPLIER_SPAN * size_roll),
        rotation: (2.0 * rotation_roll - 1.0) * PI * params.rotation_variance,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/pattern.rs"]
mod tests;
