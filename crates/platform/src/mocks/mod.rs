//! Mock implementations for testing
//!
//! This module provides mock implementations of the platform traits
//! for use in unit and integration tests.

#![cfg(any(test, feature = "std"))]

use crate::*;

/// Upper bound on calls a [`MockTransport`] remembers.
pub const MOCK_CALL_LOG: usize = 64;

/// One recorded call on [`MockTransport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportCall {
    /// `initialize(config)`
    Initialize(TransportConfig),
    /// `begin_streaming` with the stream length in bytes
    BeginStreaming {
        /// Bytes handed to the DMA engine
        len_bytes: usize,
    },
    /// `pause()`
    Pause,
    /// `resume()`
    Resume,
    /// `set_volume(v)`
    SetVolume(VolumePercent),
    /// `set_sample_rate(r)`
    SetSampleRate(SampleRateHz),
    /// `stop()`
    Stop,
}

/// Error produced by [`MockTransport`] when told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockTransportError;

/// Mock transport: records all calls for test assertions.
pub struct MockTransport {
    calls: heapless::Vec<TransportCall, MOCK_CALL_LOG>,
    stream: Option<DmaStream>,
    /// Make `initialize` fail.
    pub fail_initialize: bool,
    /// Make every other call fail.
    pub fail_all: bool,
    /// Whether a stream is running (set by `begin_streaming`, cleared by `stop`)
    pub streaming: bool,
    /// Whether the bit clock is halted
    pub paused: bool,
    /// Last volume set
    pub volume: Option<VolumePercent>,
    /// Last sample rate programmed
    pub sample_rate: Option<SampleRateHz>,
}

impl MockTransport {
    /// Create a mock that accepts every call.
    pub fn new() -> Self {
        Self {
            calls: heapless::Vec::new(),
            stream: None,
            fail_initialize: false,
            fail_all: false,
            streaming: false,
            paused: false,
            volume: None,
            sample_rate: None,
        }
    }

    /// Create a mock whose `initialize` fails.
    pub fn failing_initialize() -> Self {
        Self {
            fail_initialize: true,
            ..Self::new()
        }
    }

    /// Recorded calls, oldest first.
    pub fn calls(&self) -> &[TransportCall] {
        &self.calls
    }

    /// Forget recorded calls.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Stream handed to the last `begin_streaming`.
    pub fn stream(&self) -> Option<DmaStream> {
        self.stream
    }

    fn record(&mut self, call: TransportCall) -> Result<(), MockTransportError> {
        // Log full: oldest calls are kept, later ones dropped.
        let _ = self.calls.push(call);
        if self.fail_all {
            Err(MockTransportError)
        } else {
            Ok(())
        }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl TransportDriver for MockTransport {
    type Error = MockTransportError;

    async fn initialize(&mut self, config: TransportConfig) -> Result<(), Self::Error> {
        self.record(TransportCall::Initialize(config))?;
        if self.fail_initialize {
            return Err(MockTransportError);
        }
        self.volume = Some(config.volume);
        self.sample_rate = Some(config.sample_rate);
        Ok(())
    }

    async fn begin_streaming(&mut self, stream: DmaStream) -> Result<(), Self::Error> {
        self.record(TransportCall::BeginStreaming {
            len_bytes: stream.len_bytes(),
        })?;
        self.stream = Some(stream);
        self.streaming = true;
        Ok(())
    }

    async fn pause(&mut self) -> Result<(), Self::Error> {
        self.record(TransportCall::Pause)?;
        self.paused = true;
        Ok(())
    }

    async fn resume(&mut self) -> Result<(), Self::Error> {
        self.record(TransportCall::Resume)?;
        self.paused = false;
        Ok(())
    }

    async fn set_volume(&mut self, volume: VolumePercent) -> Result<(), Self::Error> {
        self.record(TransportCall::SetVolume(volume))?;
        self.volume = Some(volume);
        Ok(())
    }

    async fn set_sample_rate(&mut self, rate: SampleRateHz) -> Result<(), Self::Error> {
        self.record(TransportCall::SetSampleRate(rate))?;
        self.sample_rate = Some(rate);
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), Self::Error> {
        self.record(TransportCall::Stop)?;
        self.streaming = false;
        self.stream = None;
        Ok(())
    }
}

/// Deterministic renderer: emits `start, start + step, ...` and keeps going
/// across calls.
pub struct RampRenderer {
    next: f32,
    step: f32,
    rendered: usize,
    /// Last rate passed to `set_sample_rate`
    pub sample_rate: Option<SampleRateHz>,
}

impl RampRenderer {
    /// Ramp starting at `start`, advancing by `step` per sample.
    pub fn new(start: f32, step: f32) -> Self {
        Self {
            next: start,
            step,
            rendered: 0,
            sample_rate: None,
        }
    }

    /// Renderer that always outputs `value`.
    pub fn constant(value: f32) -> Self {
        Self::new(value, 0.0)
    }

    /// Total samples produced so far.
    pub fn rendered(&self) -> usize {
        self.rendered
    }
}

impl SampleRenderer for RampRenderer {
    #[allow(clippy::arithmetic_side_effects)] // float ramp; usize count cannot realistically overflow in tests
    fn render(&mut self, out: &mut [f32]) {
        for slot in out.iter_mut() {
            *slot = self.next;
            self.next += self.step;
        }
        self.rendered += out.len();
    }

    fn set_sample_rate(&mut self, rate: SampleRateHz) {
        self.sample_rate = Some(rate);
    }
}

/// Input device replaying a fixed script of events.
pub struct ScriptedInput {
    events: heapless::Deque<InputEvent, MOCK_CALL_LOG>,
}

impl ScriptedInput {
    /// Replay `events` in order, then report no input.
    pub fn new(events: &[InputEvent]) -> Self {
        let mut queue = heapless::Deque::new();
        for &event in events {
            let _ = queue.push_back(event);
        }
        Self { events: queue }
    }
}

impl InputDevice for ScriptedInput {
    fn poll_event(&mut self) -> Option<InputEvent> {
        self.events.pop_front()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_renderer_is_continuous() {
        let mut r = RampRenderer::new(0.0, 0.25);
        let mut a = [0.0f32; 2];
        let mut b = [0.0f32; 2];
        r.render(&mut a);
        r.render(&mut b);
        assert_eq!(a, [0.0, 0.25]);
        assert_eq!(b, [0.5, 0.75]);
        assert_eq!(r.rendered(), 4);
    }

    #[test]
    fn test_scripted_input_replays_in_order() {
        let mut input = ScriptedInput::new(&[
            InputEvent::ButtonPress(Button::VolumeUp),
            InputEvent::RotaryIncrement(-1),
        ]);
        assert_eq!(input.poll_event(), Some(InputEvent::ButtonPress(Button::VolumeUp)));
        assert_eq!(input.poll_event(), Some(InputEvent::RotaryIncrement(-1)));
        assert_eq!(input.poll_event(), None);
    }

    #[tokio::test]
    async fn test_mock_transport_fails_initialize_on_request() {
        let mut t = MockTransport::failing_initialize();
        let result = t.initialize(TransportConfig::default()).await;
        assert_eq!(result, Err(MockTransportError));
        assert_eq!(t.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_mock_transport_records_volume() {
        let mut t = MockTransport::new();
        t.set_volume(VolumePercent::new(40)).await.unwrap();
        assert_eq!(t.volume, Some(VolumePercent::new(40)));
        assert_eq!(t.calls(), &[TransportCall::SetVolume(VolumePercent::new(40))]);
    }

    #[tokio::test]
    async fn test_mock_transport_stream_lifecycle() {
        let data = [0u32; 8];
        let mut t = MockTransport::new();
        // SAFETY: `data` outlives the mock's use of the stream and is never written.
        let stream = unsafe { DmaStream::new(data.as_ptr(), data.len()) };
        t.begin_streaming(stream).await.unwrap();
        assert!(t.streaming);
        assert_eq!(t.calls(), &[TransportCall::BeginStreaming { len_bytes: 32 }]);
        t.stop().await.unwrap();
        assert!(!t.streaming);
        assert_eq!(t.stream(), None);
    }
}
