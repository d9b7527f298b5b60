//! Runtime playback configuration.

use embassy_time::Duration;
use platform::config::DEFAULT_UNDERRUN_TIMEOUT_MS;
use platform::TransportConfig;

use crate::notify::ReadySource;

/// Settings fixed for the lifetime of an [`AudioPipeline`](crate::AudioPipeline).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackConfig {
    /// Output routing, power-on volume, and initial sample rate.
    pub transport: TransportConfig,
    /// How long a refill waits for its half's ready flag before substituting
    /// silence. Must stay well under one half period.
    pub underrun_timeout: Duration,
    /// Who marks halves ready.
    pub ready_source: ReadySource,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            transport: TransportConfig::default(),
            underrun_timeout: Duration::from_millis(DEFAULT_UNDERRUN_TIMEOUT_MS),
            ready_source: ReadySource::Notification,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::{OutputDevice, VolumePercent};

    #[test]
    fn test_defaults_match_power_on_state() {
        let config = PlaybackConfig::default();
        assert_eq!(config.transport.device, OutputDevice::Both);
        assert_eq!(config.transport.volume, VolumePercent::new(70));
        assert_eq!(config.transport.sample_rate.get(), 8_000);
        assert_eq!(config.underrun_timeout, Duration::from_millis(5));
        assert_eq!(config.ready_source, ReadySource::Notification);
    }
}
