/// 128-bit string hash (cyrb128) over the UTF-16 code units of `key`.
///
/// Four 32-bit lanes are mixed per code unit and then cross-folded so a single changed character
/// flips about half of the output bits. Hashing UTF-16 units keeps seeds identical to series
/// produced by the browser build of the generator.
pub fn cyrb128(key: &str) -> [u32; 4] {
    let mut h1: u32 = 1_779_033_703;
    let mut h2: u32 = 3_144_134_277;
    let mut h3: u32 = 1_013_904_242;
    let mut h4: u32 = 2_773_480_762;

    for unit in key.encode_utf16() {
        let k = u32::from(unit);
        h1 = h2 ^ (h1 ^ k).wrapping_mul(597_399_067);
        h2 = h3 ^ (h2 ^ k).wrapping_mul(2_869_860_233);
        h3 = h4 ^ (h3 ^ k).wrapping_mul(951_274_213);
        h4 = h1 ^ (h4 ^ k).wrapping_mul(2_716_044_179);
    }

    h1 = (h3 ^ (h1 >> 18)).wrapping_mul(597_399_067);
    h2 = (h4 ^ (h2 >> 22)).wrapping_mul(2_869_860_233);
    h3 = (h1 ^ (h3 >> 17)).wrapping_mul(951_274_213);
    h4 = (h2 ^ (h4 >> 19)).wrapping_mul(2_716_044_179);

    [h1 ^ h2 ^ h3 ^ h4, h2 ^ h1, h3 ^ h1, h4 ^ h1]
}

/// Reduce a seed key to the 32-bit seed consumed by [`crate::SeededRng`].
pub fn derive_seed(key: &str) -> u32 {
    cyrb128(key)[0]
}

#[cfg(test)]
#[path = "../../tests/unit/seed/hash.rs"]
mod tests;
