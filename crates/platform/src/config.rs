//! Application configuration and constants
//!
//! Central values shared by the platform boundary and the playback core.
//! Runtime-tunable settings live in `playback::PlaybackConfig`; everything
//! here is fixed at build time.

/// Power-on volume in percent.
pub const DEFAULT_VOLUME: u8 = 70;

/// Volume change per control action, in percent.
pub const VOLUME_STEP: u8 = 5;

/// Samples in the circular transfer buffer (both halves).
///
/// The poll loop runs from a 1 ms tick, so each half must cover more than
/// one tick at the highest rate in use: 2048 samples is enough up to 48 kHz,
/// 96 kHz wants around 4096.
pub const AUDIO_BUFFER_SIZE: usize = 2048;

/// Supported output sample rates, ascending.
pub const SAMPLE_RATES: [u32; 9] = [
    8_000, 11_025, 16_000, 22_050, 32_000, 44_100, 48_000, 96_000, 192_000,
];

/// Default bound on the refill wait for a half's ready flag, in milliseconds.
///
/// Exceeding it is reported as an underrun and the half is filled with
/// silence.
pub const DEFAULT_UNDERRUN_TIMEOUT_MS: u64 = 5;

/// Scale applied to a clamped `[-1.0, 1.0]` sample before truncation.
///
/// The codec takes 24-bit words; the output is kept at one tenth of full
/// scale (838 860 ≈ 2²³ / 10).
pub const DMA_FULL_SCALE: f32 = 838_860.0;
