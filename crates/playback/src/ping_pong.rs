//! Ping-pong refill over the circular playback buffer.
//!
//! The transport streams `frame_count` words in a loop. After it finishes a
//! half it raises a notification and moves on to the other half; the refill
//! routine then rewrites the half that was just consumed. The two sides
//! never touch the same half at the same time, which is what lets the
//! buffer be shared without a lock:
//!
//! ```text
//!            ┌──────────── first half ───────────┬──────────── second half ──────────┐
//! hardware:  │ reading                           │                                   │
//!            │                 half-transfer IRQ ┼─▶ reading                         │
//! refill:    │ ◀── rewrite first half ───────────│                 full-transfer IRQ ┼─▶ wraps
//!            │ reading                           │ ◀── rewrite second half ──────────│
//!            └───────────────────────────────────┴───────────────────────────────────┘
//! ```
//!
//! The refill must finish before the hardware wraps back onto the half being
//! rewritten: one half period, e.g. 21 ms for 1024 frames at 48 kHz.

use embassy_time::{with_timeout, Duration};
use platform::{DmaStream, SampleRenderer};

use crate::buffer::{Half, PlaybackBuffer};
use crate::converter::{convert_into, SILENCE};
use crate::engine::PlaybackError;
use crate::notify::TransferFlags;

/// Result of one [`PingPong::refill`] pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RefillOutcome {
    /// No request was pending.
    Idle,
    /// The half was rendered and converted.
    Refilled(Half),
    /// The ready flag never arrived; the half now holds silence.
    Underrun(Half),
    /// The opposite notification arrived during the wait, so the hardware is
    /// reading this half again. Nothing was written and the newer request
    /// is left pending.
    Lapped(Half),
}

/// Refill driver over a borrowed [`PlaybackBuffer`].
///
/// Holds the buffer mutably for `'a`, so the buffer cannot move or be
/// resized while the transport reads it.
pub struct PingPong<'a, const N: usize> {
    buffer: &'a mut PlaybackBuffer<N>,
    flags: &'a TransferFlags,
    frame_count: usize,
}

impl<'a, const N: usize> PingPong<'a, N> {
    /// Wrap `buffer` and the shared `flags`. Nothing is streamed yet.
    pub fn new(buffer: &'a mut PlaybackBuffer<N>, flags: &'a TransferFlags) -> Self {
        Self {
            buffer,
            flags,
            frame_count: 0,
        }
    }

    /// Render and convert the first `frame_count` samples, reset the
    /// transfer flags, and describe the stream to hand to the transport.
    ///
    /// `frame_count` must be non-zero, even, and at most `N`.
    pub fn prime<R: SampleRenderer>(
        &mut self,
        renderer: &mut R,
        frame_count: usize,
    ) -> Result<DmaStream, PlaybackError> {
        let invalid = PlaybackError::InvalidFrameCount {
            requested: frame_count,
            capacity: N,
        };
        if frame_count == 0 || frame_count % 2 != 0 {
            return Err(invalid);
        }
        let (samples, scratch) = self.buffer.parts_mut();
        let (Some(words), Some(floats)) = (
            samples.get_mut(..frame_count),
            scratch.get_mut(..frame_count),
        ) else {
            return Err(invalid);
        };

        renderer.render(floats);
        convert_into(floats, words);

        self.flags.reset();
        self.frame_count = frame_count;

        // SAFETY: the words live in `self.buffer`, which is mutably borrowed
        // for 'a and so cannot move or be dropped while this PingPong exists.
        // Afterwards only the half the hardware has released is rewritten.
        Ok(unsafe { DmaStream::new(words.as_ptr(), frame_count) })
    }

    /// Service the pending refill request, if any.
    ///
    /// Waits up to `timeout` for the half's ready flag. On timeout the half is
    /// filled with silence. Either way the serviced request is cleared,
    /// unless a newer one replaced it while this ran.
    ///
    /// If a newer request replaced this one during the wait, the half is no
    /// longer idle and is left untouched.
    pub async fn refill<R: SampleRenderer>(
        &mut self,
        renderer: &mut R,
        timeout: Duration,
    ) -> RefillOutcome {
        let flags = self.flags;
        let request = flags.request();
        let Some(half) = request.half() else {
            return RefillOutcome::Idle;
        };

        let ready = with_timeout(timeout, flags.ready_signal(half).wait())
            .await
            .is_ok();

        if flags.request() != request {
            // Any mark for this half described data the hardware already skipped.
            flags.ready_signal(half).reset();
            return RefillOutcome::Lapped(half);
        }

        let (start, end) = self.bounds(half);
        let (samples, scratch) = self.buffer.parts_mut();
        let outcome = match (samples.get_mut(start..end), scratch.get_mut(start..end)) {
            (Some(words), Some(floats)) if ready => {
                renderer.render(floats);
                convert_into(floats, words);
                RefillOutcome::Refilled(half)
            }
            (Some(words), _) => {
                words.fill(SILENCE);
                // A late mark belongs to the data just replaced by silence.
                flags.ready_signal(half).reset();
                RefillOutcome::Underrun(half)
            }
            // Not primed: nothing is streaming from this buffer.
            (None, _) => RefillOutcome::Idle,
        };

        flags.complete(request);
        outcome
    }

    /// Forget the streamed length. Call once the transport has stopped.
    pub fn release(&mut self) {
        self.frame_count = 0;
    }

    /// Frames handed to the transport by the last [`prime`](Self::prime),
    /// or 0 when not streaming.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Frames per half.
    #[must_use]
    pub fn half_len(&self) -> usize {
        self.frame_count / 2
    }

    /// `[start, end)` of `half` within the streamed region.
    #[must_use]
    pub fn bounds(&self, half: Half) -> (usize, usize) {
        let half_len = self.half_len();
        match half {
            Half::First => (0, half_len),
            Half::Second => (half_len, self.frame_count),
        }
    }

    /// The underlying buffer.
    #[must_use]
    pub fn buffer(&self) -> &PlaybackBuffer<N> {
        self.buffer
    }

    /// The shared transfer flags.
    #[must_use]
    pub fn flags(&self) -> &'a TransferFlags {
        self.flags
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::buffer::RefillRequest;
    use crate::converter::float_to_dma;
    use crate::notify::ReadySource;
    use platform::mocks::RampRenderer;

    const TIMEOUT: Duration = Duration::from_millis(2);

    #[test]
    fn test_prime_rejects_bad_frame_counts() {
        let flags = TransferFlags::new();
        let mut buf: PlaybackBuffer<16> = PlaybackBuffer::new();
        let mut pp = PingPong::new(&mut buf, &flags);
        let mut r = RampRenderer::constant(0.0);
        for bad in [0, 3, 18] {
            assert_eq!(
                pp.prime(&mut r, bad),
                Err(PlaybackError::InvalidFrameCount {
                    requested: bad,
                    capacity: 16
                })
            );
        }
        assert_eq!(pp.frame_count(), 0);
        assert_eq!(r.rendered(), 0);
    }

    #[test]
    fn test_prime_fills_requested_frames_only() {
        let flags = TransferFlags::new();
        let mut buf: PlaybackBuffer<16> = PlaybackBuffer::new();
        let mut pp = PingPong::new(&mut buf, &flags);
        let mut r = RampRenderer::constant(0.5);
        let stream = pp.prime(&mut r, 8).unwrap();
        assert_eq!(stream.len_words(), 8);
        assert_eq!(stream.as_ptr(), pp.buffer().samples().as_ptr());
        assert_eq!(pp.bounds(Half::Second), (4, 8));
        let samples = pp.buffer().samples();
        assert!(samples[..8].iter().all(|&w| w == float_to_dma(0.5)));
        assert!(samples[8..].iter().all(|&w| w == 0));
    }

    #[tokio::test]
    async fn test_refill_without_request_is_idle() {
        let flags = TransferFlags::new();
        let mut buf: PlaybackBuffer<8> = PlaybackBuffer::new();
        let mut pp = PingPong::new(&mut buf, &flags);
        let mut r = RampRenderer::constant(0.0);
        pp.prime(&mut r, 8).unwrap();
        assert_eq!(pp.refill(&mut r, TIMEOUT).await, RefillOutcome::Idle);
        assert_eq!(r.rendered(), 8);
    }

    #[tokio::test]
    async fn test_refill_second_half_uses_matching_offsets() {
        let flags = TransferFlags::new();
        flags.arm();
        let mut buf: PlaybackBuffer<8> = PlaybackBuffer::new();
        let mut pp = PingPong::new(&mut buf, &flags);
        let mut r = RampRenderer::constant(0.25);
        pp.prime(&mut r, 8).unwrap();

        let mut r = RampRenderer::constant(-0.25);
        flags.notifier().on_full_transfer();
        assert_eq!(
            pp.refill(&mut r, TIMEOUT).await,
            RefillOutcome::Refilled(Half::Second)
        );
        let samples = pp.buffer().samples();
        assert!(samples[..4].iter().all(|&w| w == float_to_dma(0.25)));
        assert!(samples[4..].iter().all(|&w| w == float_to_dma(-0.25)));
        assert!(pp.buffer().scratch()[4..].iter().all(|&s| s == -0.25));
        assert_eq!(flags.request(), RefillRequest::None);
        assert!(!flags.is_ready(Half::Second));
    }

    #[tokio::test]
    async fn test_refill_times_out_to_silence() {
        let flags = TransferFlags::new();
        flags.set_ready_source(ReadySource::Producer);
        flags.arm();
        let mut buf: PlaybackBuffer<8> = PlaybackBuffer::new();
        let mut pp = PingPong::new(&mut buf, &flags);
        let mut r = RampRenderer::constant(0.75);
        pp.prime(&mut r, 8).unwrap();

        flags.notifier().on_half_transfer();
        assert_eq!(
            pp.refill(&mut r, TIMEOUT).await,
            RefillOutcome::Underrun(Half::First)
        );
        let samples = pp.buffer().samples();
        assert!(samples[..4].iter().all(|&w| w == SILENCE));
        assert!(samples[4..].iter().all(|&w| w == float_to_dma(0.75)));
        assert_eq!(flags.request(), RefillRequest::None);
        // Renderer not consulted for the silent half.
        assert_eq!(r.rendered(), 8);
    }

    #[tokio::test]
    async fn test_refill_waits_for_producer_mark() {
        let flags = TransferFlags::new();
        flags.set_ready_source(ReadySource::Producer);
        flags.arm();
        let mut buf: PlaybackBuffer<8> = PlaybackBuffer::new();
        let mut pp = PingPong::new(&mut buf, &flags);
        let mut r = RampRenderer::constant(0.0);
        pp.prime(&mut r, 8).unwrap();

        flags.notifier().on_half_transfer();
        flags.ready_marker().mark_ready(Half::First);
        assert_eq!(
            pp.refill(&mut r, TIMEOUT).await,
            RefillOutcome::Refilled(Half::First)
        );
        assert!(!flags.is_ready(Half::First));
    }

    #[tokio::test]
    async fn test_refill_leaves_half_alone_when_hardware_wraps_during_wait() {
        let flags = TransferFlags::new();
        flags.set_ready_source(ReadySource::Producer);
        flags.arm();
        let mut buf: PlaybackBuffer<8> = PlaybackBuffer::new();
        let mut pp = PingPong::new(&mut buf, &flags);
        let mut r = RampRenderer::constant(0.5);
        pp.prime(&mut r, 8).unwrap();

        flags.notifier().on_half_transfer();
        let (outcome, ()) = tokio::join!(pp.refill(&mut r, TIMEOUT), async {
            flags.notifier().on_full_transfer();
        });
        assert_eq!(outcome, RefillOutcome::Lapped(Half::First));
        // Neither fresh samples nor silence landed in the first half.
        assert!(pp.buffer().samples()[..8].iter().all(|&w| w == float_to_dma(0.5)));
        assert_eq!(r.rendered(), 8);
        assert_eq!(flags.request(), RefillRequest::SecondHalfDue);
    }
}
