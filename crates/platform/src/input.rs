//! Input device abstraction

/// Input device trait for the touch panel / buttons driving playback controls.
pub trait InputDevice {
    /// Poll for event (non-blocking)
    fn poll_event(&mut self) -> Option<InputEvent>;
}

/// Input events from touch zones, buttons and encoders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputEvent {
    /// Button or touch zone pressed
    ButtonPress(Button),
    /// Rotary encoder increment (positive = clockwise)
    RotaryIncrement(i32),
}

/// Physical buttons or on-screen touch zones
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// Play/Pause toggle
    PlayPause,
    /// Volume up
    VolumeUp,
    /// Volume down
    VolumeDown,
    /// Next higher sample rate
    FrequencyUp,
    /// Next lower sample rate
    FrequencyDown,
}
