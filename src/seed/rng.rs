use crate::seed::hash::derive_seed;

const GOLDEN_GAMMA: u32 = 0x6D2B_79F5;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Mulberry32 generator: a 32-bit Weyl counter with xorshift-multiply output mixing.
///
/// The whole state is one `u32`, so two generators built from the same seed yield the same
/// sequence forever and cloning forks an identical stream. The counter visits all 2^32 states
/// before repeating.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Build a generator from an arbitrary string key via [`derive_seed`].
    pub fn from_key(key: &str) -> Self {
        Self::new(derive_seed(key))
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        let t = self.state;
        let mut r = (t ^ (t >> 15)).wrapping_mul(t | 1);
        r ^= r.wrapping_add((r ^ (r >> 7)).wrapping_mul(r | 61));
        r ^ (r >> 14)
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / TWO_POW_32
    }

    /// Uniform value in `[min, max)`.
    pub fn range(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min) * self.next_f64()
    }

    /// Uniform index in `0..len`; `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        index_for(self.next_f64(), len)
    }

    /// Uniformly pick one element; `None` for an empty slice (no draw is consumed).
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let i = self.index(items.len());
        items.get(i)
    }

    /// Fisher-Yates shuffle into a new vector.
    pub fn shuffled<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
        let mut out = items.to_vec();
        for i in (1..out.len()).rev() {
            let j = self.index(i + 1);
            out.swap(i, j);
        }
        out
    }
}

/// Map a unit draw onto `0..len`, guarding the `u * len == len` edge.
pub(crate) fn index_for(u: f64, len: usize) -> usize {
    debug_assert!(len > 0);
    ((u * len as f64).floor() as usize).min(len.saturating_sub(1))
}

#[cfg(test)]
#[path = "../../tests/unit/seed/rng.rs"]
mod tests;
