//! Playback state machine.
//!
//! `PlaybackEngine` is a pure, `no_std`, allocation-free state machine that
//! tracks the session lifecycle: idle, initialized, playing, or faulted.
//! Pause is a flag inside `Playing`, not a state of its own.
//!
//! It has no I/O. [`AudioPipeline`](crate::AudioPipeline) drives the
//! transport and calls into the engine after each hardware step succeeds,
//! so every transition here is testable on the host.

/// Coarse session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlaybackState {
    /// Power-on, or after a stop. The codec is not configured.
    #[default]
    Idle,
    /// Codec and clocks configured; no stream running.
    Initialized,
    /// The transport is streaming the playback buffer.
    Playing,
    /// A fatal transport error stopped refills. Only
    /// [`reinitialize`](crate::AudioPipeline::reinitialize) leaves this state.
    Faulted,
}

/// Errors reported by the playback core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlaybackError {
    /// The operation needs a running stream.
    #[error("playback is not running")]
    NotReady,
    /// `initialize` called on a session that is already set up.
    #[error("transport already initialized")]
    AlreadyInitialized,
    /// `start` called while already streaming.
    #[error("playback already started")]
    AlreadyStarted,
    /// `start` called before `initialize`.
    #[error("transport not initialized")]
    NotInitialized,
    /// `start` frame count is zero, odd, or larger than the buffer.
    #[error("frame count {requested} invalid for buffer of {capacity}")]
    InvalidFrameCount {
        /// Requested frames
        requested: usize,
        /// Buffer capacity in frames
        capacity: usize,
    },
    /// The transport raised a fatal error; reinitialize to recover.
    #[error("fatal transport error")]
    TransportFault,
}

/// Pure state machine for the playback session.
#[derive(Debug, Default)]
pub struct PlaybackEngine {
    state: PlaybackState,
    paused: bool,
    stop_requested: bool,
}

impl PlaybackEngine {
    /// New engine in [`PlaybackState::Idle`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: PlaybackState::Idle,
            paused: false,
            stop_requested: false,
        }
    }

    /// Record a successful transport initialization.
    ///
    /// Transitions:
    /// - `Idle        → Initialized`  ✓
    /// - anything else               returns `Err(AlreadyInitialized)`
    pub fn on_initialized(&mut self) -> Result<(), PlaybackError> {
        match self.state {
            PlaybackState::Idle => {
                self.state = PlaybackState::Initialized;
                Ok(())
            }
            PlaybackState::Initialized | PlaybackState::Playing | PlaybackState::Faulted => {
                Err(PlaybackError::AlreadyInitialized)
            }
        }
    }

    /// Check that streaming may begin, without changing state.
    pub fn can_start(&self) -> Result<(), PlaybackError> {
        match self.state {
            PlaybackState::Initialized => Ok(()),
            PlaybackState::Idle => Err(PlaybackError::NotInitialized),
            PlaybackState::Playing => Err(PlaybackError::AlreadyStarted),
            PlaybackState::Faulted => Err(PlaybackError::TransportFault),
        }
    }

    /// Record that the transport began streaming.
    ///
    /// Transitions:
    /// - `Initialized → Playing`  ✓ (un-paused)
    /// - `Idle`                  returns `Err(NotInitialized)`
    /// - `Playing`               returns `Err(AlreadyStarted)`
    /// - `Faulted`               returns `Err(TransportFault)`
    pub fn on_streaming_started(&mut self) -> Result<(), PlaybackError> {
        self.can_start()?;
        self.state = PlaybackState::Playing;
        self.paused = false;
        self.stop_requested = false;
        Ok(())
    }

    /// `Ok` only while `Playing`.
    pub fn ensure_playing(&self) -> Result<(), PlaybackError> {
        if self.state == PlaybackState::Playing {
            Ok(())
        } else {
            Err(PlaybackError::NotReady)
        }
    }

    /// Flip the paused flag and return the new value.
    ///
    /// # Errors
    ///
    /// `NotReady` unless `Playing`.
    pub fn toggle_pause(&mut self) -> Result<bool, PlaybackError> {
        self.ensure_playing()?;
        self.paused = !self.paused;
        Ok(self.paused)
    }

    /// Enter `Faulted`. Pending stop requests are dropped.
    pub fn on_fault(&mut self) {
        self.state = PlaybackState::Faulted;
        self.paused = false;
        self.stop_requested = false;
    }

    /// Ask for a cooperative stop. Only meaningful while `Playing`.
    ///
    /// # Errors
    ///
    /// `NotReady` unless `Playing`.
    pub fn request_stop(&mut self) -> Result<(), PlaybackError> {
        self.ensure_playing()?;
        self.stop_requested = true;
        Ok(())
    }

    /// Record that the transport stopped, or force a reset ahead of
    /// re-initialization. Always lands in `Idle`.
    pub fn on_stopped(&mut self) {
        self.state = PlaybackState::Idle;
        self.paused = false;
        self.stop_requested = false;
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Whether the session is `Playing` and paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether the session is `Playing` (paused or not).
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Whether a stop is pending.
    #[must_use]
    pub fn stop_requested(&self) -> bool {
        self.stop_requested
    }

    /// Whether the codec accepts control writes (volume, rate).
    #[must_use]
    pub fn transport_ready(&self) -> bool {
        matches!(
            self.state,
            PlaybackState::Initialized | PlaybackState::Playing
        )
    }
}
