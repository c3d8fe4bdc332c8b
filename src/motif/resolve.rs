use crate::{
    foundation::{core::Rgba8, error::GeometryKind},
    seed::rng::{SeededRng, index_for},
    theme::model::{MotifDescriptor, PaletteRoles},
};

/// Whether a motif instance is drawn from the shape table or the icon table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotifKind {
    Shape,
    Icon,
}

impl From<MotifKind> for GeometryKind {
    fn from(kind: MotifKind) -> Self {
        match kind {
            MotifKind::Shape => GeometryKind::Shape,
            MotifKind::Icon => GeometryKind::Icon,
        }
    }
}

/// Concrete choice for one placement.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MotifInstance {
    pub kind: MotifKind,
    /// Shape or icon identifier, looked up in the geometry table matching `kind`.
    pub id: String,
    pub color: Rgba8,
}

/// Turns placements into shape/icon and color choices for one theme.
///
/// Every call to [`MotifResolver::resolve_instance`] consumes exactly three draws, in order:
///
/// 1. kind: icon iff the draw is below the effective icon probability,
/// 2. item: uniform over the icon pool, or for shapes the primary shape iff the draw is below
///    `primary_weight` and otherwise a secondary shape chosen by the rescaled remainder,
/// 3. color: uniform over the five palette roles.
#[derive(Clone, Debug)]
pub struct MotifResolver<'a> {
    motif: &'a MotifDescriptor,
    colors: [Rgba8; 5],
}

impl<'a> MotifResolver<'a> {
    pub fn new(motif: &'a MotifDescriptor, palette: &PaletteRoles) -> Self {
        Self {
            motif,
            colors: palette.colors(),
        }
    }

    pub fn resolve_instance(&self, rng: &mut SeededRng) -> MotifInstance {
        let kind_roll = rng.next_f64();
        let item_roll = rng.next_f64();
        let color_roll = rng.next_f64();

        let (kind, id) = if kind_roll < self.motif.effective_icon_probability() {
            let pool = &self.motif.icon_pool;
            (MotifKind::Icon, &pool[index_for(item_roll, pool.len())])
        } else {
            (MotifKind::Shape, self.pick_shape(item_roll))
        };

        MotifInstance {
            kind,
            id: id.clone(),
            color: self.colors[index_for(color_roll, self.colors.len())],
        }
    }

    fn pick_shape(&self, u: f64) -> &'a String {
        let weight = self.motif.primary_weight;
        if u < weight {
            return &self.motif.primary_shape;
        }
        let secondary = self.motif.effective_secondary_shapes();
        let rescaled = if weight < 1.0 {
            (u - weight) / (1.0 - weight)
        } else {
            0.0
        };
        &secondary[index_for(rescaled, secondary.len())]
    }

    /// Every identifier named by the motif, tagged with its table.
    pub fn referenced_ids(&self) -> Vec<(MotifKind, &'a str)> {
        let mut out = vec![(MotifKind::Shape, self.motif.primary_shape.as_str())];
        out.extend(
            self.motif
                .effective_secondary_shapes()
                .iter()
                .map(|id| (MotifKind::Shape, id.as_str())),
        );
        out.extend(
            self.motif
                .icon_pool
                .iter()
                .map(|id| (MotifKind::Icon, id.as_str())),
        );
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/motif/resolve.rs"]
mod tests;
