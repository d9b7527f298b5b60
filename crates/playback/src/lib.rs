//! Double-buffered audio output core: ping-pong DMA refill, playback state
//! machine, and typed controls for the Harp tone generator.
//!
//! The transport streams a circular buffer of converted samples; this crate
//! keeps the half the hardware is not reading refilled with fresh output
//! from a [`SampleRenderer`](platform::SampleRenderer).
//!
//! # Layout
//!
//! - [`converter`] - float sample → DMA word
//! - [`buffer`] - storage and half bookkeeping
//! - [`notify`] - interrupt-side flags and handles
//! - [`ping_pong`] - the refill routine
//! - [`engine`] - lifecycle state machine
//! - [`underrun`] - underrun counters
//! - [`control`] - user commands
//! - [`pipeline`] - everything above behind one poll-driven API
//! - [`renderer`] - reference sine renderer
//!
//! # Features
//!
//! - `std`: enable the platform mocks outside of tests
//! - `defmt`: lifecycle, control, and underrun logging

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod buffer;
pub mod config;
pub mod control;
pub mod converter;
pub mod engine;
pub mod notify;
pub mod ping_pong;
pub mod pipeline;
pub mod renderer;
pub mod underrun;

pub use buffer::{Half, PlaybackBuffer, RefillRequest};
pub use config::PlaybackConfig;
pub use control::{Command, CommandOutcome, Direction, VolumeStep};
pub use engine::{PlaybackEngine, PlaybackError, PlaybackState};
pub use notify::{ReadyMarker, ReadySource, TransferFlags, TransferNotifier};
pub use ping_pong::{PingPong, RefillOutcome};
pub use pipeline::{AudioPipeline, PipelineError, ProcessStatus};
pub use renderer::SineRenderer;
pub use underrun::UnderrunMonitor;
