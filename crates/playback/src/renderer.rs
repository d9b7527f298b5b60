//! Reference sine renderer.
//!
//! A phase-accumulator oscillator: the phase is a `u32` that wraps at one
//! full cycle, so long sessions never drift or lose precision. Each sample
//! is evaluated with `libm::sinf`, which is enough for a test tone.

use core::f32::consts::TAU;

use platform::{SampleRateHz, SampleRenderer};

/// Phase units per cycle.
const PHASE_SCALE: f32 = 4_294_967_296.0;

/// Sine oscillator implementing [`SampleRenderer`].
///
/// # Example
/// ```
/// use platform::SampleRenderer;
/// use playback::SineRenderer;
///
/// let mut sine = SineRenderer::new(440.0, 0.5);
/// let mut out = [0.0f32; 32];
/// sine.render(&mut out);
/// assert!(out.iter().all(|s| s.abs() <= 0.5));
/// ```
#[derive(Debug, Clone)]
pub struct SineRenderer {
    frequency_hz: f32,
    amplitude: f32,
    sample_rate: SampleRateHz,
    phase: u32,
    phase_increment: u32,
}

impl SineRenderer {
    /// Oscillator at `frequency_hz`, scaled by `amplitude` (clamped to 0–1),
    /// running at the lowest table rate until told otherwise.
    #[must_use]
    pub fn new(frequency_hz: f32, amplitude: f32) -> Self {
        let mut sine = Self {
            frequency_hz,
            amplitude: amplitude.clamp(0.0, 1.0),
            sample_rate: SampleRateHz::LOWEST_TABLE_RATE,
            phase: 0,
            phase_increment: 0,
        };
        sine.update_increment();
        sine
    }

    /// Change the tone frequency. Phase is kept, so there is no click.
    pub fn set_frequency(&mut self, frequency_hz: f32) {
        self.frequency_hz = frequency_hz;
        self.update_increment();
    }

    /// Change the output level (clamped to 0–1).
    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.amplitude = amplitude.clamp(0.0, 1.0);
    }

    /// Tone frequency in Hz.
    #[must_use]
    pub fn frequency(&self) -> f32 {
        self.frequency_hz
    }

    /// Output level.
    #[must_use]
    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    /// Rate the increment is computed for.
    #[must_use]
    pub fn sample_rate(&self) -> SampleRateHz {
        self.sample_rate
    }

    /// Current phase as a fraction of a cycle, in `[0, 1)`.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::arithmetic_side_effects)]
    pub fn phase(&self) -> f32 {
        self.phase as f32 / PHASE_SCALE
    }

    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::arithmetic_side_effects
    )] // Safety: float math; `as u32` saturates, and the nyquist clamp keeps it below 2^31
    fn update_increment(&mut self) {
        let rate = self.sample_rate.get() as f32;
        let cycles_per_sample = (self.frequency_hz / rate).clamp(0.0, 0.5);
        self.phase_increment = (cycles_per_sample * PHASE_SCALE) as u32;
    }
}

impl Default for SineRenderer {
    /// 440 Hz at half scale.
    fn default() -> Self {
        Self::new(440.0, 0.5)
    }
}

impl SampleRenderer for SineRenderer {
    #[allow(clippy::cast_precision_loss, clippy::arithmetic_side_effects)] // float math only
    fn render(&mut self, out: &mut [f32]) {
        let mut phase = self.phase;
        for slot in out.iter_mut() {
            let radians = phase as f32 / PHASE_SCALE * TAU;
            *slot = self.amplitude * libm::sinf(radians);
            phase = phase.wrapping_add(self.phase_increment);
        }
        self.phase = phase;
    }

    fn set_sample_rate(&mut self, rate: SampleRateHz) {
        self.sample_rate = rate;
        self.update_increment();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    #[test]
    fn test_quarter_rate_tone_hits_peaks() {
        // 2 kHz at 8 kHz: four samples per cycle → 0, 1, 0, -1
        let mut sine = SineRenderer::new(2_000.0, 1.0);
        let mut out = [0.0f32; 4];
        sine.render(&mut out);
        let expected = [0.0, 1.0, 0.0, -1.0];
        for (got, want) in out.iter().zip(expected) {
            assert!((got - want).abs() < 1e-3, "got {got}, want {want}");
        }
    }

    #[test]
    fn test_phase_is_continuous_across_calls() {
        let mut split = SineRenderer::new(440.0, 0.8);
        let mut whole = split.clone();

        let mut a = [0.0f32; 100];
        let mut b = [0.0f32; 156];
        split.render(&mut a);
        split.render(&mut b);

        let mut all = [0.0f32; 256];
        whole.render(&mut all);

        assert_eq!(&all[..100], &a[..]);
        assert_eq!(&all[100..], &b[..]);
    }

    #[test]
    fn test_sample_rate_change_slows_phase() {
        let mut sine = SineRenderer::new(1_000.0, 1.0);
        let mut out = [0.0f32; 1];
        sine.render(&mut out);
        let at_8k = sine.phase();

        let mut sine = SineRenderer::new(1_000.0, 1.0);
        sine.set_sample_rate(SampleRateHz::new(48_000).unwrap());
        sine.render(&mut out);
        assert!(sine.phase() < at_8k);
        assert_eq!(sine.sample_rate().get(), 48_000);
    }

    #[test]
    fn test_amplitude_is_clamped() {
        let mut sine = SineRenderer::new(440.0, 3.0);
        assert_eq!(sine.amplitude(), 1.0);
        sine.set_amplitude(-1.0);
        let mut out = [1.0f32; 8];
        sine.render(&mut out);
        assert!(out.iter().all(|&s| s == 0.0));
    }
}
