//! Playback buffer storage and half bookkeeping.

use platform::dma::Align32;

/// One half of the circular transfer buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Half {
    /// Words `[0, len/2)`
    First,
    /// Words `[len/2, len)`
    Second,
}

impl Half {
    /// The half the hardware reads while this one is refilled.
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}

/// Which half, if any, the hardware has released for refilling.
///
/// Stored as a `u8` in an atomic so the notification handlers can publish it
/// without a lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum RefillRequest {
    /// Nothing to do
    #[default]
    None = 0,
    /// Hardware finished the first half; it now reads the second
    FirstHalfDue = 1,
    /// Hardware finished the second half; it wrapped to the first
    SecondHalfDue = 2,
}

impl RefillRequest {
    /// Decode the atomic representation. Unknown values read as `None`.
    #[must_use]
    pub fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::FirstHalfDue,
            2 => Self::SecondHalfDue,
            _ => Self::None,
        }
    }

    /// The request raised when `half` has been consumed.
    #[must_use]
    pub fn for_half(half: Half) -> Self {
        match half {
            Half::First => Self::FirstHalfDue,
            Half::Second => Self::SecondHalfDue,
        }
    }

    /// The half this request asks to refill.
    #[must_use]
    pub fn half(self) -> Option<Half> {
        match self {
            Self::None => None,
            Self::FirstHalfDue => Some(Half::First),
            Self::SecondHalfDue => Some(Half::Second),
        }
    }
}

/// Backing storage for one playback session.
///
/// `samples` is what the DMA engine reads; `scratch` is where the renderer
/// writes floats before conversion. Both hold `N` entries and use the same
/// offsets, so refilling a half touches the same range in each.
///
/// Large: place it in a `static` (via `StaticCell`) on hardware.
pub struct PlaybackBuffer<const N: usize> {
    samples: Align32<[u32; N]>,
    scratch: [f32; N],
}

impl<const N: usize> PlaybackBuffer<N> {
    /// Zeroed buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            samples: Align32([0; N]),
            scratch: [0.0; N],
        }
    }

    /// Total capacity in samples.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Converted DMA words.
    #[must_use]
    pub fn samples(&self) -> &[u32; N] {
        &self.samples.0
    }

    /// Renderer scratch area.
    #[must_use]
    pub fn scratch(&self) -> &[f32; N] {
        &self.scratch
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut [u32; N], &mut [f32; N]) {
        (&mut self.samples.0, &mut self.scratch)
    }
}

impl<const N: usize> Default for PlaybackBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_roundtrips_through_u8() {
        for req in [
            RefillRequest::None,
            RefillRequest::FirstHalfDue,
            RefillRequest::SecondHalfDue,
        ] {
            assert_eq!(RefillRequest::from_u8(req as u8), req);
        }
        assert_eq!(RefillRequest::from_u8(0xFF), RefillRequest::None);
    }

    #[test]
    fn test_request_names_its_half() {
        assert_eq!(RefillRequest::None.half(), None);
        assert_eq!(RefillRequest::FirstHalfDue.half(), Some(Half::First));
        assert_eq!(RefillRequest::for_half(Half::Second), RefillRequest::SecondHalfDue);
        assert_eq!(Half::First.other(), Half::Second);
    }

    #[test]
    fn test_samples_are_dma_aligned() {
        let buf: PlaybackBuffer<64> = PlaybackBuffer::new();
        assert_eq!(buf.samples().as_ptr() as usize % 32, 0);
        assert_eq!(buf.capacity(), 64);
        assert!(buf.scratch().iter().all(|&s| s == 0.0));
    }
}
