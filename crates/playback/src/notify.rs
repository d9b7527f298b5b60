//! Cross-context transfer state.
//!
//! [`TransferFlags`] is the only state shared between the DMA interrupt
//! handlers and the poll loop. Each side gets its own handle so a field has
//! exactly one writer:
//!
//! | Field            | Writer                         | Reader / consumer |
//! |------------------|--------------------------------|-------------------|
//! | refill request   | [`TransferNotifier`] (raise)   | refill routine (clear via CAS) |
//! | half ready flags | [`TransferNotifier`] or [`ReadyMarker`], per [`ReadySource`] | refill routine (consume) |
//! | fault            | [`TransferNotifier`]           | pipeline |
//! | lap counter      | [`TransferNotifier`]           | pipeline (drain) |
//!
//! The refill routine clears the request with a compare-exchange, so a
//! request raised while it was working is kept rather than overwritten.
//!
//! # Usage
//!
//! ```ignore
//! static FLAGS: TransferFlags = TransferFlags::new();
//!
//! #[interrupt]
//! fn DMA2_STREAM1() {
//!     let notifier = FLAGS.notifier();
//!     if half_transfer { notifier.on_half_transfer(); }
//!     if transfer_complete { notifier.on_full_transfer(); }
//!     if transfer_error { notifier.on_transfer_error(); }
//! }
//! ```

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use crate::buffer::{Half, RefillRequest};

// CriticalSectionRawMutex: the ready signals are set from interrupt context,
// so the waker slot must be guarded against preemption, not just other tasks.
type ReadySignal = Signal<CriticalSectionRawMutex, ()>;

/// Who declares a half's scratch data ready for conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadySource {
    /// The transfer notification marks its own half ready (and the other
    /// half not ready). The refill never waits in practice.
    #[default]
    Notification,
    /// A separate producer calls [`ReadyMarker::mark_ready`]; the refill
    /// waits for it up to the underrun timeout.
    Producer,
}

impl ReadySource {
    const fn to_u8(self) -> u8 {
        match self {
            Self::Notification => 0,
            Self::Producer => 1,
        }
    }

    const fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Producer,
            _ => Self::Notification,
        }
    }
}

/// Shared transfer state. `const`-constructible for use in a `static`.
pub struct TransferFlags {
    request: AtomicU8,
    first_ready: ReadySignal,
    second_ready: ReadySignal,
    fault: AtomicBool,
    armed: AtomicBool,
    lapped: AtomicU32,
    ready_source: AtomicU8,
}

impl TransferFlags {
    /// Disarmed flags with no request pending.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            request: AtomicU8::new(RefillRequest::None as u8),
            first_ready: Signal::new(),
            second_ready: Signal::new(),
            fault: AtomicBool::new(false),
            armed: AtomicBool::new(false),
            lapped: AtomicU32::new(0),
            ready_source: AtomicU8::new(ReadySource::Notification.to_u8()),
        }
    }

    /// Handle for the DMA interrupt handlers.
    #[must_use]
    pub fn notifier(&self) -> TransferNotifier<'_> {
        TransferNotifier { flags: self }
    }

    /// Handle for a renderer producer running outside the poll loop.
    #[must_use]
    pub fn ready_marker(&self) -> ReadyMarker<'_> {
        ReadyMarker { flags: self }
    }

    /// Currently pending refill request.
    #[must_use]
    pub fn request(&self) -> RefillRequest {
        RefillRequest::from_u8(self.request.load(Ordering::Acquire))
    }

    /// Whether `half` has been marked ready and not yet consumed.
    #[must_use]
    pub fn is_ready(&self, half: Half) -> bool {
        self.ready_signal(half).signaled()
    }

    /// Whether the transport reported a fatal error.
    #[must_use]
    pub fn is_faulted(&self) -> bool {
        self.fault.load(Ordering::Acquire)
    }

    /// Whether notifications are currently accepted.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Notifications that replaced a still-pending request since the last drain.
    #[must_use]
    pub fn lapped(&self) -> u32 {
        self.lapped.load(Ordering::Relaxed)
    }

    /// Ready-flag policy in effect.
    #[must_use]
    pub fn ready_source(&self) -> ReadySource {
        ReadySource::from_u8(self.ready_source.load(Ordering::Relaxed))
    }

    pub(crate) fn set_ready_source(&self, source: ReadySource) {
        self.ready_source.store(source.to_u8(), Ordering::Relaxed);
    }

    /// Clear request, ready flags, fault, and lap count.
    pub(crate) fn reset(&self) {
        self.request.store(RefillRequest::None as u8, Ordering::Release);
        self.first_ready.reset();
        self.second_ready.reset();
        self.fault.store(false, Ordering::Release);
        self.lapped.store(0, Ordering::Relaxed);
    }

    pub(crate) fn arm(&self) {
        self.armed.store(true, Ordering::Release);
    }

    pub(crate) fn disarm(&self) {
        self.armed.store(false, Ordering::Release);
    }

    pub(crate) fn take_lapped(&self) -> u32 {
        self.lapped.swap(0, Ordering::Relaxed)
    }

    pub(crate) fn ready_signal(&self, half: Half) -> &ReadySignal {
        match half {
            Half::First => &self.first_ready,
            Half::Second => &self.second_ready,
        }
    }

    /// Clear `serviced` unless a newer request replaced it meanwhile.
    pub(crate) fn complete(&self, serviced: RefillRequest) {
        let _ = self.request.compare_exchange(
            serviced as u8,
            RefillRequest::None as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    fn raise(&self, half: Half) {
        if !self.is_armed() {
            return;
        }
        if self.ready_source() == ReadySource::Notification {
            self.ready_signal(half.other()).reset();
            self.ready_signal(half).signal(());
        }
        let previous = self
            .request
            .swap(RefillRequest::for_half(half) as u8, Ordering::AcqRel);
        if RefillRequest::from_u8(previous) != RefillRequest::None {
            self.lapped.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl Default for TransferFlags {
    fn default() -> Self {
        Self::new()
    }
}

/// Interrupt-side handle. Every method is wait-free and never logs.
#[derive(Clone, Copy)]
pub struct TransferNotifier<'a> {
    flags: &'a TransferFlags,
}

impl TransferNotifier<'_> {
    /// Hardware finished reading the first half.
    pub fn on_half_transfer(&self) {
        self.flags.raise(Half::First);
    }

    /// Hardware finished reading the second half and wrapped.
    pub fn on_full_transfer(&self) {
        self.flags.raise(Half::Second);
    }

    /// Fatal DMA error (FIFO, bus, or transfer error).
    pub fn on_transfer_error(&self) {
        if self.flags.is_armed() {
            self.flags.fault.store(true, Ordering::Release);
        }
    }
}

/// Producer-side handle used with [`ReadySource::Producer`].
#[derive(Clone, Copy)]
pub struct ReadyMarker<'a> {
    flags: &'a TransferFlags,
}

impl ReadyMarker<'_> {
    /// Declare `half` of the scratch area ready for conversion.
    pub fn mark_ready(&self, half: Half) {
        self.flags.ready_signal(half).signal(());
    }
}
