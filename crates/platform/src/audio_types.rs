//! Audio domain newtypes for compile-time safety.
//!
//! These zero-cost abstractions prevent common errors:
//! - `VolumePercent`: clamps 0–100, steps by [`VOLUME_STEP`] without wrapping
//! - `SampleRateHz`: validates 8000–768000 Hz range
//! - `FrequencySelection`: index into the fixed [`SAMPLE_RATES`] table

use crate::config::{DEFAULT_VOLUME, SAMPLE_RATES, VOLUME_STEP};

// ── Error type ───────────────────────────────────────────────────────────────

/// Error returned when a value is out of the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("value {value} outside {min}..={max}")]
pub struct OutOfRangeError {
    /// The value that was out of range.
    pub value: u32,
    /// The inclusive minimum allowed value.
    pub min: u32,
    /// The inclusive maximum allowed value.
    pub max: u32,
}

// ── VolumePercent ────────────────────────────────────────────────────────────

/// Volume as a percentage, clamped to 0–100.
///
/// Wraps a `u8` with the invariant `0 <= value <= 100`.
/// Construct with [`VolumePercent::new`] (clamping) or
/// [`VolumePercent::try_new`] (fallible, strict).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct VolumePercent(u8);

impl VolumePercent {
    /// Power-on volume.
    pub const DEFAULT: Self = Self(DEFAULT_VOLUME);

    /// Silence.
    pub const MIN: Self = Self(0);

    /// Full scale.
    pub const MAX: Self = Self(100);

    /// Create a `VolumePercent`, clamping values above 100 to 100.
    #[must_use]
    pub fn new(value: u8) -> Self {
        Self(value.min(100))
    }

    /// Create a `VolumePercent`, returning an error if `value > 100`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `value > 100`.
    pub fn try_new(value: u8) -> Result<Self, OutOfRangeError> {
        if value > 100 {
            Err(OutOfRangeError {
                value: u32::from(value),
                min: 0,
                max: 100,
            })
        } else {
            Ok(Self(value))
        }
    }

    /// One step louder, saturating at 100.
    #[must_use]
    pub fn step_up(self) -> Self {
        Self::new(self.0.saturating_add(VOLUME_STEP))
    }

    /// One step quieter, saturating at 0.
    #[must_use]
    pub fn step_down(self) -> Self {
        Self(self.0.saturating_sub(VOLUME_STEP))
    }

    /// Return the inner volume value (0–100).
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for VolumePercent {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ── SampleRateHz ─────────────────────────────────────────────────────────────

/// Sample rate in Hz, validated to the range the codec accepts.
///
/// Valid range: 8000–768000 Hz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct SampleRateHz(u32);

impl SampleRateHz {
    /// Minimum supported sample rate: 8000 Hz (telephony).
    pub const MIN_HZ: u32 = 8_000;

    /// Maximum supported sample rate: 768000 Hz.
    pub const MAX_HZ: u32 = 768_000;

    /// First entry of [`SAMPLE_RATES`].
    pub const LOWEST_TABLE_RATE: Self = Self(SAMPLE_RATES[0]);

    /// Create a `SampleRateHz`, returning an error if out of 8000–768000 Hz.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `hz < 8000` or `hz > 768000`.
    pub fn new(hz: u32) -> Result<Self, OutOfRangeError> {
        if !(Self::MIN_HZ..=Self::MAX_HZ).contains(&hz) {
            Err(OutOfRangeError {
                value: hz,
                min: Self::MIN_HZ,
                max: Self::MAX_HZ,
            })
        } else {
            Ok(Self(hz))
        }
    }

    /// Return the sample rate in Hz.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

// ── FrequencySelection ───────────────────────────────────────────────────────

/// Result of stepping a [`FrequencySelection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepOutcome {
    /// The selection moved to the contained rate.
    Changed(SampleRateHz),
    /// Already at the end of the table; the selection is unchanged.
    AtBoundary(SampleRateHz),
}

impl StepOutcome {
    /// The rate selected after the step.
    #[must_use]
    pub fn rate(self) -> SampleRateHz {
        match self {
            Self::Changed(rate) | Self::AtBoundary(rate) => rate,
        }
    }
}

/// Position in the fixed [`SAMPLE_RATES`] table.
///
/// Steps are clamped at both ends; there is no wrap-around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrequencySelection {
    index: usize,
}

impl FrequencySelection {
    /// Select the lowest rate (8 kHz).
    #[must_use]
    pub const fn new() -> Self {
        Self { index: 0 }
    }

    /// Select `rate` if it is one of the table entries.
    #[must_use]
    pub fn from_rate(rate: SampleRateHz) -> Option<Self> {
        SAMPLE_RATES
            .iter()
            .position(|&hz| hz == rate.get())
            .map(|index| Self { index })
    }

    /// Table index of the current selection.
    #[must_use]
    pub fn index(self) -> usize {
        self.index
    }

    /// Currently selected rate.
    #[must_use]
    pub fn rate(self) -> SampleRateHz {
        // index is only ever set to a valid table position
        SAMPLE_RATES
            .get(self.index)
            .map_or(SampleRateHz::LOWEST_TABLE_RATE, |&hz| SampleRateHz(hz))
    }

    /// Move to the next higher rate.
    pub fn step_up(&mut self) -> StepOutcome {
        match self.index.checked_add(1).filter(|&i| i < SAMPLE_RATES.len()) {
            Some(next) => {
                self.index = next;
                StepOutcome::Changed(self.rate())
            }
            None => StepOutcome::AtBoundary(self.rate()),
        }
    }

    /// Move to the next lower rate.
    pub fn step_down(&mut self) -> StepOutcome {
        match self.index.checked_sub(1) {
            Some(prev) => {
                self.index = prev;
                StepOutcome::Changed(self.rate())
            }
            None => StepOutcome::AtBoundary(self.rate()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_default_is_seventy() {
        assert_eq!(VolumePercent::default().get(), 70);
    }

    #[test]
    fn test_volume_three_steps_up_from_default() {
        let v = VolumePercent::DEFAULT.step_up().step_up().step_up();
        assert_eq!(v.get(), 85);
    }

    #[test]
    fn test_volume_step_up_clamps_at_100() {
        assert_eq!(VolumePercent::new(98).step_up().get(), 100);
        assert_eq!(VolumePercent::MAX.step_up(), VolumePercent::MAX);
    }

    #[test]
    fn test_volume_step_down_clamps_at_0() {
        assert_eq!(VolumePercent::new(3).step_down().get(), 0);
        assert_eq!(VolumePercent::MIN.step_down(), VolumePercent::MIN);
    }

    #[test]
    fn test_frequency_starts_at_8k() {
        assert_eq!(FrequencySelection::new().rate().get(), 8_000);
    }

    #[test]
    fn test_frequency_step_down_at_minimum_is_noop() {
        let mut sel = FrequencySelection::new();
        let outcome = sel.step_down();
        assert_eq!(outcome, StepOutcome::AtBoundary(SampleRateHz(8_000)));
        assert_eq!(sel.rate().get(), 8_000);
    }

    #[test]
    fn test_frequency_walks_whole_table() {
        let mut sel = FrequencySelection::new();
        for &expected in SAMPLE_RATES.iter().skip(1) {
            assert_eq!(sel.step_up(), StepOutcome::Changed(SampleRateHz(expected)));
        }
        assert_eq!(sel.step_up(), StepOutcome::AtBoundary(SampleRateHz(192_000)));
        assert_eq!(sel.index(), SAMPLE_RATES.len() - 1);
    }

    #[test]
    fn test_frequency_from_rate() {
        let rate = SampleRateHz::new(44_100).unwrap();
        assert_eq!(FrequencySelection::from_rate(rate).map(|s| s.index()), Some(5));
        let odd = SampleRateHz::new(12_345).unwrap();
        assert_eq!(FrequencySelection::from_rate(odd), None);
    }
}
