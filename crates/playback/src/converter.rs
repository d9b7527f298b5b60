//! Float → DMA word conversion.
//!
//! The codec consumes 24-bit two's-complement samples carried in the low
//! bits of each 32-bit DMA word. Samples are clamped to `[-1.0, 1.0]` and
//! scaled by [`DMA_FULL_SCALE`], which keeps the output at one tenth of full
//! scale.

use platform::config::DMA_FULL_SCALE;

/// Clamp `sample` to `[-1.0, 1.0]`, scale, and truncate toward zero.
///
/// NaN maps to 0.
///
/// ```
/// use playback::converter::to_fixed;
///
/// assert_eq!(to_fixed(0.0), 0);
/// assert_eq!(to_fixed(1.0), 838_860);
/// assert_eq!(to_fixed(-4.0), -838_860);
/// ```
#[must_use]
#[inline]
#[allow(clippy::cast_possible_truncation)] // |x * scale| <= 838_860, fits i32
#[allow(clippy::arithmetic_side_effects)] // Safety: float multiply of clamped input, cannot overflow
pub fn to_fixed(sample: f32) -> i32 {
    // `as` saturates and maps NaN to 0.
    (sample.clamp(-1.0, 1.0) * DMA_FULL_SCALE) as i32
}

/// Convert one sample to the word written into the DMA buffer.
///
/// The word is the two's-complement bit pattern of [`to_fixed`].
#[must_use]
#[inline]
#[allow(clippy::cast_sign_loss)] // bit reinterpretation is the wire format
pub fn float_to_dma(sample: f32) -> u32 {
    to_fixed(sample) as u32
}

/// The DMA word for a silent sample.
pub const SILENCE: u32 = 0;

/// Convert `src` into `dst`, element by element.
///
/// Converts `min(src.len(), dst.len())` samples.
pub fn convert_into(src: &[f32], dst: &mut [u32]) {
    for (word, &sample) in dst.iter_mut().zip(src) {
        *word = float_to_dma(sample);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_map_to_full_scale() {
        assert_eq!(to_fixed(1.0), 838_860);
        assert_eq!(to_fixed(-1.0), -838_860);
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        assert_eq!(to_fixed(1.5), to_fixed(1.0));
        assert_eq!(to_fixed(-100.0), to_fixed(-1.0));
        assert_eq!(to_fixed(f32::INFINITY), to_fixed(1.0));
        assert_eq!(to_fixed(f32::NEG_INFINITY), to_fixed(-1.0));
    }

    #[test]
    fn test_truncates_toward_zero() {
        // 0.5 * 838_860 = 419_430 exactly; a hair under truncates down
        assert_eq!(to_fixed(0.5), 419_430);
        assert_eq!(to_fixed(-0.5), -419_430);
        assert_eq!(to_fixed(1.0e-7), 0);
    }

    #[test]
    fn test_nan_is_silence() {
        assert_eq!(float_to_dma(f32::NAN), SILENCE);
    }

    #[test]
    fn test_negative_word_is_twos_complement() {
        assert_eq!(float_to_dma(-1.0), (-838_860i32) as u32);
        assert_eq!(float_to_dma(-1.0), 0xFFF3_3334);
    }

    #[test]
    fn test_convert_into_stops_at_shorter_slice() {
        let src = [0.0, 1.0, -1.0];
        let mut dst = [7u32; 2];
        convert_into(&src, &mut dst);
        assert_eq!(dst, [0, 838_860]);
    }
}
