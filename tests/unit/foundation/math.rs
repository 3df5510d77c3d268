use super::*;

#[test]
fn fnv_hash_is_stable_across_split_writes() {
    let mut a = Fnv1a64::new_default();
    a.write_bytes(b"annorender");
    let mut b = Fnv1a64::new_default();
    b.write_bytes(b"anno");
    b.write_bytes(b"render");
    assert_eq!(a.finish(), b.finish());
}

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn dither_noise_is_bounded_and_deterministic() {
    for y in 0..16 {
        for x in 0..16 {
            for c in 0..3 {
                let n = dither_noise(x, y, c);
                assert!((-0.5..0.5).contains(&n));
                assert_eq!(n, dither_noise(x, y, c));
            }
        }
    }
}
