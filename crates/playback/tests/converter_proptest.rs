//! Property-based tests for the sample converter.
#![allow(clippy::unwrap_used)]

use playback::converter::{float_to_dma, to_fixed};

proptest::proptest! {
    /// Anything above 1.0 converts like 1.0, anything below -1.0 like -1.0.
    #[test]
    fn out_of_range_converts_like_its_clamp(x in proptest::num::f32::NORMAL | proptest::num::f32::INFINITE) {
        proptest::prop_assume!(!(-1.0..=1.0).contains(&x));
        assert_eq!(to_fixed(x), to_fixed(x.clamp(-1.0, 1.0)));
    }

    /// The converter never decreases as its input increases.
    #[test]
    fn conversion_is_monotonic(a in -2.0f32..2.0, b in -2.0f32..2.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        assert!(to_fixed(lo) <= to_fixed(hi));
    }

    /// Output never exceeds the scaled bounds.
    #[test]
    fn output_stays_within_full_scale(x in proptest::num::f32::ANY) {
        let v = to_fixed(x);
        assert!((-838_860..=838_860).contains(&v));
    }

    /// The DMA word is the two's-complement pattern of the fixed-point value.
    #[test]
    fn dma_word_is_bit_pattern(x in -1.0f32..=1.0) {
        assert_eq!(float_to_dma(x), u32::from_ne_bytes(to_fixed(x).to_ne_bytes()));
    }
}
