//! Hardware Abstraction Layer (HAL) for the Harp audio player
//!
//! This crate provides the trait boundaries the playback core is written
//! against, so the refill state machine can be exercised on the host without
//! a codec or DMA engine.
//!
//! # Architecture Layers
//!
//! ```text
//! Board glue (codec driver, DMA interrupts, touch panel)
//!         ↓
//! Playback core (playback crate: ping-pong refill, state machine, controls)
//!         ↓
//! Platform HAL (this crate - trait abstractions + newtypes)
//! ```
//!
//! # Boundaries
//!
//! - [`TransportDriver`] - codec + circular DMA output
//! - [`SampleRenderer`] - DSP signal source
//! - [`InputDevice`] - touch zones, buttons, encoder
//!
//! # Features
//!
//! - `std`: Enable the host mocks outside of `cfg(test)`
//! - `defmt`: Enable defmt::Format derives
//!
//! # Example
//!
//! ```
//! use platform::{FrequencySelection, StepOutcome, VolumePercent};
//!
//! let volume = VolumePercent::DEFAULT.step_up();
//! assert_eq!(volume.get(), 75);
//!
//! let mut freq = FrequencySelection::new();
//! assert!(matches!(freq.step_down(), StepOutcome::AtBoundary(_)));
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer defmt over println! in lib code
// Pedantic lints suppressed for this hardware HAL crate:
#![allow(clippy::doc_markdown)] // register and signal names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors; callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)] // Embassy no_std: single-threaded, Send bounds not needed

pub mod audio;
pub mod audio_types;
pub mod config;
pub mod dma;
pub mod input;
pub mod mocks;

// Re-export main high-level traits
pub use audio::{OutputDevice, SampleRenderer, TransportConfig, TransportDriver};
pub use input::{Button, InputDevice, InputEvent};

// Re-export domain newtypes
pub use audio_types::{FrequencySelection, OutOfRangeError, SampleRateHz, StepOutcome, VolumePercent};

// Re-export DMA types
pub use dma::{Align32, DmaStream};
