//! The playback pipeline: transport, renderer, ping-pong buffer, and
//! controls behind one poll-driven API.
//!
//! # Contexts
//!
//! - **Interrupt**: the DMA handlers hold a [`TransferNotifier`] obtained
//!   from the same `static` [`TransferFlags`] passed to [`AudioPipeline::new`].
//! - **Poll loop**: one task owns the pipeline and calls
//!   [`process`](AudioPipeline::process) on every tick, plus
//!   [`execute`](AudioPipeline::execute) for each decoded user command.
//!
//! ```ignore
//! static FLAGS: TransferFlags = TransferFlags::new();
//! static BUFFER: StaticCell<PlaybackBuffer<AUDIO_BUFFER_SIZE>> = StaticCell::new();
//!
//! let buffer = BUFFER.init(PlaybackBuffer::new());
//! let mut pipeline = AudioPipeline::new(codec, SineRenderer::default(), buffer, &FLAGS,
//!     PlaybackConfig::default());
//! pipeline.initialize().await?;
//! pipeline.start(AUDIO_BUFFER_SIZE).await?;
//! loop {
//!     pipeline.process().await?;
//!     if let Some(cmd) = input.poll_event().and_then(Command::from_input) {
//!         pipeline.execute(cmd).await?;
//!     }
//!     Timer::after_millis(1).await;
//! }
//! ```
//!
//! [`TransferNotifier`]: crate::TransferNotifier

use platform::{
    FrequencySelection, SampleRateHz, SampleRenderer, StepOutcome, TransportConfig,
    TransportDriver, VolumePercent,
};

use crate::buffer::{Half, PlaybackBuffer};
use crate::config::PlaybackConfig;
use crate::control::{Command, CommandOutcome, Direction, VolumeStep};
use crate::engine::{PlaybackEngine, PlaybackError, PlaybackState};
use crate::notify::TransferFlags;
use crate::ping_pong::{PingPong, RefillOutcome};
use crate::underrun::UnderrunMonitor;

/// Errors from [`AudioPipeline`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError<E: core::fmt::Debug> {
    /// State-machine or buffer error.
    #[error(transparent)]
    Playback(#[from] PlaybackError),
    /// `TransportDriver::initialize` failed; the session stays `Idle`.
    #[error("transport initialization failed: {0:?}")]
    InitializationFailed(E),
    /// Any other transport call failed.
    #[error("transport error: {0:?}")]
    Transport(E),
}

/// Result of one successful [`AudioPipeline::process`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProcessStatus {
    /// No refill was pending.
    Idle,
    /// The half was refilled with fresh samples.
    Refilled(Half),
    /// The half timed out and now holds silence.
    Underrun(Half),
    /// The hardware wrapped onto the half while its refill waited; the half
    /// was left as is and the newer request stays pending.
    Lapped(Half),
    /// A requested stop completed; the session is `Idle`.
    Stopped,
}

/// Poll-driven playback session over a borrowed buffer.
pub struct AudioPipeline<'a, T: TransportDriver, R: SampleRenderer, const N: usize> {
    transport: T,
    renderer: R,
    ping_pong: PingPong<'a, N>,
    engine: PlaybackEngine,
    config: PlaybackConfig,
    volume: VolumePercent,
    frequency: FrequencySelection,
    underruns: UnderrunMonitor,
}

impl<'a, T: TransportDriver, R: SampleRenderer, const N: usize> AudioPipeline<'a, T, R, N> {
    /// Assemble an `Idle` pipeline.
    ///
    /// The initial sample rate snaps to the lowest table entry if
    /// `config.transport.sample_rate` is not one of [`SAMPLE_RATES`].
    ///
    /// [`SAMPLE_RATES`]: platform::config::SAMPLE_RATES
    pub fn new(
        transport: T,
        renderer: R,
        buffer: &'a mut PlaybackBuffer<N>,
        flags: &'a TransferFlags,
        config: PlaybackConfig,
    ) -> Self {
        flags.set_ready_source(config.ready_source);
        Self {
            transport,
            renderer,
            ping_pong: PingPong::new(buffer, flags),
            engine: PlaybackEngine::new(),
            volume: config.transport.volume,
            frequency: FrequencySelection::from_rate(config.transport.sample_rate)
                .unwrap_or_default(),
            config,
            underruns: UnderrunMonitor::new(),
        }
    }

    /// Configure codec and clocks with the current volume and rate.
    ///
    /// On failure the session stays `Idle` and
    /// [`PipelineError::InitializationFailed`] is returned.
    pub async fn initialize(&mut self) -> Result<(), PipelineError<T::Error>> {
        if self.engine.state() != PlaybackState::Idle {
            return Err(PlaybackError::AlreadyInitialized.into());
        }
        let transport_config = TransportConfig {
            volume: self.volume,
            sample_rate: self.frequency.rate(),
            ..self.config.transport
        };
        if let Err(e) = self.transport.initialize(transport_config).await {
            #[cfg(feature = "defmt")]
            defmt::error!("audio: init failed: {}", defmt::Debug2Format(&e));
            return Err(PipelineError::InitializationFailed(e));
        }
        self.engine.on_initialized()?;
        self.renderer.set_sample_rate(transport_config.sample_rate);

        #[cfg(feature = "defmt")]
        defmt::info!(
            "audio: initialized, {} Hz, volume {}",
            transport_config.sample_rate.get(),
            transport_config.volume.get()
        );
        Ok(())
    }

    /// Prime `frame_count` samples and start circular streaming.
    ///
    /// Notifications are accepted from just before the transport starts, so
    /// a first half-transfer that races `begin_streaming` is not lost.
    pub async fn start(&mut self, frame_count: usize) -> Result<(), PipelineError<T::Error>> {
        self.engine.can_start()?;
        let stream = self.ping_pong.prime(&mut self.renderer, frame_count)?;

        let flags = self.ping_pong.flags();
        flags.arm();
        if let Err(e) = self.transport.begin_streaming(stream).await {
            flags.disarm();
            self.ping_pong.release();
            #[cfg(feature = "defmt")]
            defmt::error!("audio: begin_streaming failed: {}", defmt::Debug2Format(&e));
            return Err(PipelineError::Transport(e));
        }
        self.engine.on_streaming_started()?;

        #[cfg(feature = "defmt")]
        defmt::info!("audio: streaming {} frames", frame_count);
        Ok(())
    }

    /// Run one refill pass.
    ///
    /// - Not `Playing`: `Err(NotReady)`, no side effects.
    /// - Fault pending: the session enters `Faulted` and this call returns
    ///   `Err(TransportFault)`; later calls return `NotReady`.
    /// - Otherwise services the pending request (if any) and, when a stop was
    ///   requested, stops the transport afterwards.
    pub async fn process(&mut self) -> Result<ProcessStatus, PipelineError<T::Error>> {
        let flags = self.ping_pong.flags();
        if self.engine.is_playing() && flags.is_faulted() {
            flags.disarm();
            self.engine.on_fault();
            #[cfg(feature = "defmt")]
            defmt::error!("audio: transport fault, refills halted");
            return Err(PlaybackError::TransportFault.into());
        }
        self.engine.ensure_playing()?;

        let status = match self
            .ping_pong
            .refill(&mut self.renderer, self.config.underrun_timeout)
            .await
        {
            RefillOutcome::Idle => ProcessStatus::Idle,
            RefillOutcome::Refilled(half) => ProcessStatus::Refilled(half),
            RefillOutcome::Underrun(half) => {
                self.underruns.on_timeout();
                #[cfg(feature = "defmt")]
                defmt::warn!("audio: underrun, {} half not ready, filled with silence", half);
                ProcessStatus::Underrun(half)
            }
            RefillOutcome::Lapped(half) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("audio: underrun, hardware wrapped onto {} half mid-refill", half);
                ProcessStatus::Lapped(half)
            }
        };

        // Drained after the refill so laps raised during its wait count now.
        let lapped = flags.take_lapped();
        if lapped > 0 {
            self.underruns.on_lapped(lapped);
            #[cfg(feature = "defmt")]
            defmt::warn!("audio: underrun, {} notification(s) lapped the refill", lapped);
        }

        if self.engine.stop_requested() {
            self.finish_stop().await?;
            return Ok(ProcessStatus::Stopped);
        }
        Ok(status)
    }

    /// Ask the next [`process`](Self::process) call to stop the stream once
    /// any pending refill has been serviced.
    pub fn request_stop(&mut self) -> Result<(), PlaybackError> {
        self.engine.request_stop()
    }

    async fn finish_stop(&mut self) -> Result<(), PipelineError<T::Error>> {
        self.ping_pong.flags().disarm();
        let result = self.transport.stop().await;
        self.ping_pong.release();
        match result {
            Ok(()) => {
                self.engine.on_stopped();
                #[cfg(feature = "defmt")]
                defmt::info!("audio: stopped");
                Ok(())
            }
            Err(e) => {
                // The stream may still be running; only a reinitialize is safe.
                self.engine.on_fault();
                #[cfg(feature = "defmt")]
                defmt::error!("audio: stop failed: {}", defmt::Debug2Format(&e));
                Err(PipelineError::Transport(e))
            }
        }
    }

    /// Tear down whatever is running and initialize again.
    ///
    /// This is the only way out of `Faulted`. The transport is stopped first
    /// (errors ignored; a faulted DMA engine may refuse), then flags, engine
    /// and underrun counters are reset. Volume and rate selection are kept.
    pub async fn reinitialize(&mut self) -> Result<(), PipelineError<T::Error>> {
        let flags = self.ping_pong.flags();
        flags.disarm();
        if matches!(
            self.engine.state(),
            PlaybackState::Playing | PlaybackState::Faulted
        ) {
            if let Err(_e) = self.transport.stop().await {
                #[cfg(feature = "defmt")]
                defmt::warn!("audio: stop during reinit failed: {}", defmt::Debug2Format(&_e));
            }
        }
        self.ping_pong.release();
        self.engine.on_stopped();
        flags.reset();
        self.underruns.reset();

        #[cfg(feature = "defmt")]
        defmt::info!("audio: reinitializing");
        self.initialize().await
    }

    /// Apply a user command.
    pub async fn execute(
        &mut self,
        command: Command,
    ) -> Result<CommandOutcome, PipelineError<T::Error>> {
        match command {
            Command::AdjustVolume(step) => self.adjust_volume(step).await,
            Command::StepFrequency(direction) => self.step_frequency(direction).await,
            Command::TogglePause => self.toggle_pause().await,
        }
    }

    async fn adjust_volume(
        &mut self,
        step: VolumeStep,
    ) -> Result<CommandOutcome, PipelineError<T::Error>> {
        let next = match step {
            VolumeStep::Up => self.volume.step_up(),
            VolumeStep::Down => self.volume.step_down(),
        };
        // Before initialize the codec is unpowered; the value is applied by
        // the next `initialize`.
        if self.engine.transport_ready() {
            self.transport
                .set_volume(next)
                .await
                .map_err(PipelineError::Transport)?;
        }
        self.volume = next;

        #[cfg(feature = "defmt")]
        defmt::debug!("audio: volume {}", next.get());
        Ok(CommandOutcome::VolumeChanged(next))
    }

    async fn step_frequency(
        &mut self,
        direction: Direction,
    ) -> Result<CommandOutcome, PipelineError<T::Error>> {
        let mut selection = self.frequency;
        let step = match direction {
            Direction::Up => selection.step_up(),
            Direction::Down => selection.step_down(),
        };
        let rate = match step {
            StepOutcome::Changed(rate) => rate,
            StepOutcome::AtBoundary(rate) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("audio: already at {} Hz", rate.get());
                return Ok(CommandOutcome::AtBoundary(rate));
            }
        };

        if self.engine.transport_ready() {
            self.apply_sample_rate(rate).await?;
        }
        self.frequency = selection;
        self.renderer.set_sample_rate(rate);

        #[cfg(feature = "defmt")]
        defmt::debug!("audio: sample rate {} Hz", rate.get());
        Ok(CommandOutcome::FrequencyChanged(rate))
    }

    /// Reprogram the clock. While audio is audible the clock is halted around
    /// the change and the volume rewritten afterwards, since the codec resets
    /// its attenuation when the clock restarts.
    async fn apply_sample_rate(&mut self, rate: SampleRateHz) -> Result<(), PipelineError<T::Error>> {
        let audible = self.engine.is_playing() && !self.engine.is_paused();
        if audible {
            self.transport.pause().await.map_err(PipelineError::Transport)?;
        }
        self.transport
            .set_sample_rate(rate)
            .await
            .map_err(PipelineError::Transport)?;
        if audible {
            self.transport.resume().await.map_err(PipelineError::Transport)?;
            self.transport
                .set_volume(self.volume)
                .await
                .map_err(PipelineError::Transport)?;
        }
        Ok(())
    }

    async fn toggle_pause(&mut self) -> Result<CommandOutcome, PipelineError<T::Error>> {
        self.engine.ensure_playing()?;
        if self.engine.is_paused() {
            self.transport.resume().await.map_err(PipelineError::Transport)?;
        } else {
            self.transport.pause().await.map_err(PipelineError::Transport)?;
        }
        let paused = self.engine.toggle_pause()?;

        #[cfg(feature = "defmt")]
        defmt::debug!("audio: paused = {}", paused);
        Ok(if paused {
            CommandOutcome::Paused
        } else {
            CommandOutcome::Resumed
        })
    }

    /// Current volume.
    #[must_use]
    pub fn volume(&self) -> VolumePercent {
        self.volume
    }

    /// Current sample rate selection.
    #[must_use]
    pub fn frequency(&self) -> SampleRateHz {
        self.frequency.rate()
    }

    /// Whether output is paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.engine.is_paused()
    }

    /// Whether the stream is running (paused or not).
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.engine.is_playing()
    }

    /// Session state.
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.engine.state()
    }

    /// Underruns since the last (re)initialization.
    #[must_use]
    pub fn underruns(&self) -> UnderrunMonitor {
        self.underruns
    }

    /// The transport driver.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable transport access, e.g. for output routing changes.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// The renderer.
    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Mutable renderer access, e.g. to change the tone.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// The ping-pong buffer view.
    #[must_use]
    pub fn ping_pong(&self) -> &PingPong<'a, N> {
        &self.ping_pong
    }
}
