use super::*;

#[test]
fn cyrb128_reference_vectors() {
    assert_eq!(cyrb128(""), [41608494, 480788319, 2264674419, 2553211394]);
    assert_eq!(cyrb128("a"), [1589175524, 2314171864, 242127110, 3644391482]);
    assert_eq!(
        cyrb128("series-A|theme-1|0|Q1"),
        [4104228824, 1313755493, 2199978143, 969858594]
    );
}

#[test]
fn hashes_utf16_code_units() {
    // A non-BMP character contributes two surrogate units.
    assert_eq!(
        cyrb128("é𝄞"),
        [3942549910, 1427375901, 2347390246, 872471469]
    );
}

#[test]
fn derive_seed_takes_first_lane() {
    assert_eq!(derive_seed("series-A|theme-1|0|Q1|layout"), 3263685407);
}

#[test]
fn single_character_change_flips_many_bits() {
    let base = derive_seed("workout-series-2026|theme-1|0|Q1");
    let mut total = 0u32;
    for suffix in ["Q2", "Q3", "Q4", "R1", "q1"] {
        let other = derive_seed(&format!("workout-series-2026|theme-1|0|{suffix}"));
        total += (base ^ other).count_ones();
    }
    // Five comparisons of 32 bits; a well-mixed hash lands near 80.
    assert!((48..=112).contains(&total), "flipped bits: {total}");
}
