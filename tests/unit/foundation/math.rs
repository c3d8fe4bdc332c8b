use super::*;

#[test]
fn fnv_streaming_matches_one_shot() {
    let mut a = Fnv1a64::new_default();
    a.write_bytes(b"covergen");
    let mut b = Fnv1a64::new_default();
    b.write_u8(b'c');
    b.write_bytes(b"overgen");
    assert_eq!(a.finish(), b.finish());
}

#[test]
fn str_writes_are_delimited() {
    let mut a = Fnv1a64::new_default();
    a.write_str("ab");
    a.write_str("c");
    let mut b = Fnv1a64::new_default();
    b.write_str("a");
    b.write_str("bc");
    assert_ne!(a.finish(), b.finish());
}
