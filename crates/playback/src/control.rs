//! Typed control commands.
//!
//! Raw input is decoded once, at the UI boundary, into a [`Command`]; the
//! pipeline never sees button codes.

use platform::{Button, InputEvent, SampleRateHz, VolumePercent};

/// Direction of a volume step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VolumeStep {
    /// Louder by one step
    Up,
    /// Quieter by one step
    Down,
}

/// Direction of a sample-rate step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Next higher table entry
    Up,
    /// Next lower table entry
    Down,
}

/// A user action applied by [`AudioPipeline::execute`](crate::AudioPipeline::execute).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Change volume by one step
    AdjustVolume(VolumeStep),
    /// Move to the adjacent sample rate
    StepFrequency(Direction),
    /// Pause if playing, resume if paused
    TogglePause,
}

impl Command {
    /// Decode an input event. Returns `None` for events with no action.
    ///
    /// Rotary increments adjust the volume: clockwise is louder. One command
    /// is produced per event regardless of magnitude.
    #[must_use]
    pub fn from_input(event: InputEvent) -> Option<Self> {
        match event {
            InputEvent::ButtonPress(button) => Some(match button {
                Button::PlayPause => Self::TogglePause,
                Button::VolumeUp => Self::AdjustVolume(VolumeStep::Up),
                Button::VolumeDown => Self::AdjustVolume(VolumeStep::Down),
                Button::FrequencyUp => Self::StepFrequency(Direction::Up),
                Button::FrequencyDown => Self::StepFrequency(Direction::Down),
            }),
            InputEvent::RotaryIncrement(delta) if delta > 0 => {
                Some(Self::AdjustVolume(VolumeStep::Up))
            }
            InputEvent::RotaryIncrement(delta) if delta < 0 => {
                Some(Self::AdjustVolume(VolumeStep::Down))
            }
            InputEvent::RotaryIncrement(_) => None,
        }
    }
}

/// What a command changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandOutcome {
    /// Volume is now the contained value (may equal the old one at a bound).
    VolumeChanged(VolumePercent),
    /// Sample rate moved to the contained value.
    FrequencyChanged(SampleRateHz),
    /// Already at the end of the rate table; nothing was forwarded.
    AtBoundary(SampleRateHz),
    /// Output paused
    Paused,
    /// Output resumed
    Resumed,
}
