pub(crate) mod cpu;
pub(crate) mod recording;
pub(crate) mod surface;

use crate::foundation::{core::Rgba8Premul, math::Fnv1a64};

/// Rendered pixels in row-major RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    /// Whether color channels are premultiplied by alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel bytes with straight alpha, as image encoders expect.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        let mut out = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            let c = Rgba8Premul {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
            .to_straight();
            out.extend_from_slice(&[c.r, c.g, c.b, c.a]);
        }
        out
    }

    /// FNV-1a over dimensions and pixel bytes.
    pub fn fingerprint(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        h.write_u32(self.width);
        h.write_u32(self.height);
        h.write_u8(u8::from(self.premultiplied));
        h.write_bytes(&self.data);
        h.finish()
    }

    /// Straight-alpha pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        let px = self.data.get(i..i + 4)?;
        if !self.premultiplied {
            return Some([px[0], px[1], px[2], px[3]]);
        }
        let c = Rgba8Premul {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        }
        .to_straight();
        Some([c.r, c.g, c.b, c.a])
    }
}
