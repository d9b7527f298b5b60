//! Audio transport abstraction (codec + circular DMA engine)

use crate::audio_types::{SampleRateHz, VolumePercent};
use crate::dma::DmaStream;

/// Codec/DMA transport driver.
///
/// The driver owns the codec registers and the DMA channel. Once
/// [`begin_streaming`](Self::begin_streaming) returns, the hardware reads the
/// circular buffer continuously and raises half-transfer, full-transfer and
/// error interrupts. Those interrupts are routed to the playback core's
/// notifier handle by board glue; they are not part of this trait.
pub trait TransportDriver {
    /// Error type
    type Error: core::fmt::Debug;

    /// Bring up codec and audio clocks for `config`.
    fn initialize(
        &mut self,
        config: TransportConfig,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Start circular transmission from `stream`.
    ///
    /// The stream stays live until [`stop`](Self::stop).
    fn begin_streaming(
        &mut self,
        stream: DmaStream,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Halt the bit clock without touching DMA state.
    fn pause(&mut self) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Resume clocking after [`pause`](Self::pause).
    fn resume(&mut self) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Set output volume (0-100)
    fn set_volume(
        &mut self,
        volume: VolumePercent,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Reprogram the audio clock for a new sample rate.
    fn set_sample_rate(
        &mut self,
        rate: SampleRateHz,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Stop the DMA stream and mute the codec.
    fn stop(&mut self) -> impl core::future::Future<Output = Result<(), Self::Error>>;
}

/// Codec output routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputDevice {
    /// Loudspeaker only
    Speaker,
    /// Headphone jack only
    Headphone,
    /// Speaker and headphone together
    #[default]
    Both,
    /// Codec picks the output from jack detection
    Auto,
}

/// Transport configuration passed to [`TransportDriver::initialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransportConfig {
    /// Output routing
    pub device: OutputDevice,
    /// Initial volume
    pub volume: VolumePercent,
    /// Initial sample rate
    pub sample_rate: SampleRateHz,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            device: OutputDevice::Both,
            volume: VolumePercent::DEFAULT,
            sample_rate: SampleRateHz::LOWEST_TABLE_RATE,
        }
    }
}

/// Producer of floating-point audio samples.
///
/// Implementations keep their own running state (phase, envelopes) so that
/// consecutive calls produce a continuous signal. Output is expected in
/// `[-1.0, 1.0]`; anything outside is clamped by the converter.
pub trait SampleRenderer {
    /// Fill `out` with the next `out.len()` samples.
    fn render(&mut self, out: &mut [f32]);

    /// Called when the output sample rate changes.
    fn set_sample_rate(&mut self, _rate: SampleRateHz) {}
}

impl<R: SampleRenderer + ?Sized> SampleRenderer for &mut R {
    fn render(&mut self, out: &mut [f32]) {
        (**self).render(out);
    }

    fn set_sample_rate(&mut self, rate: SampleRateHz) {
        (**self).set_sample_rate(rate);
    }
}
