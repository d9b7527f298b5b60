//! Property-based tests for audio domain math.
//! Verifies invariants hold for ALL valid inputs, not just fixed examples.

use platform::audio_types::{FrequencySelection, SampleRateHz, VolumePercent};
use platform::config::SAMPLE_RATES;

proptest::proptest! {
    /// VolumePercent::new never panics for any u8 input (clamps to 100).
    #[test]
    fn volume_percent_new_never_panics(pct in 0u8..=255u8) {
        let v = VolumePercent::new(pct);
        assert!(v.get() <= 100);
    }

    /// Any sequence of steps stays inside 0..=100.
    #[test]
    fn volume_steps_stay_in_range(start in 0u8..=100u8, ups in proptest::collection::vec(proptest::bool::ANY, 0..64)) {
        let mut v = VolumePercent::new(start);
        for up in ups {
            let before = v.get();
            v = if up { v.step_up() } else { v.step_down() };
            assert!(v.get() <= 100);
            assert!(before.abs_diff(v.get()) <= 5);
        }
    }

    /// Step up is monotone non-decreasing.
    #[test]
    fn volume_step_up_never_decreases(pct in 0u8..=100u8) {
        let v = VolumePercent::new(pct);
        assert!(v.step_up() >= v);
        assert!(v.step_down() <= v);
    }

    /// SampleRateHz::new never panics for any u32 input.
    #[test]
    fn sample_rate_hz_new_never_panics(hz in 0u32..=u32::MAX) {
        let _ = SampleRateHz::new(hz);
    }

    /// Stepping never leaves the rate table.
    #[test]
    fn frequency_steps_stay_in_table(ups in proptest::collection::vec(proptest::bool::ANY, 0..32)) {
        let mut sel = FrequencySelection::new();
        for up in ups {
            let outcome = if up { sel.step_up() } else { sel.step_down() };
            assert_eq!(outcome.rate(), sel.rate());
            assert!(SAMPLE_RATES.contains(&sel.rate().get()));
        }
    }
}
