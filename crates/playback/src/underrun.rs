//! Underrun accounting.
//!
//! Two things count as an underrun:
//!
//! 1. **Timeout**: the refill routine waited the full underrun timeout for a
//!    half's ready flag. The half is filled with silence so the transport
//!    still has valid data when it wraps around.
//! 2. **Lapped notification**: a transfer notification arrived while the
//!    previous request was still pending. The hardware has already started
//!    re-reading a half that was never refilled.
//!
//! Neither is fatal. The monitor only counts; the pipeline logs and carries on.

/// Saturating underrun counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnderrunMonitor {
    timeouts: u32,
    lapped: u32,
}

impl UnderrunMonitor {
    /// Zeroed counters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeouts: 0,
            lapped: 0,
        }
    }

    /// Record one ready-flag timeout.
    pub fn on_timeout(&mut self) {
        self.timeouts = self.timeouts.saturating_add(1);
    }

    /// Record `count` lapped notifications drained from the transfer flags.
    pub fn on_lapped(&mut self, count: u32) {
        self.lapped = self.lapped.saturating_add(count);
    }

    /// Ready-flag timeouts since the last reset.
    #[must_use]
    pub fn timeouts(&self) -> u32 {
        self.timeouts
    }

    /// Lapped notifications since the last reset.
    #[must_use]
    pub fn lapped(&self) -> u32 {
        self.lapped
    }

    /// All underruns since the last reset. Saturates at [`u32::MAX`].
    #[must_use]
    pub fn total(&self) -> u32 {
        self.timeouts.saturating_add(self.lapped)
    }

    /// Zero both counters.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Test A ────────────────────────────────────────────────────────────────
    /// A fresh monitor has counted nothing.
    #[test]
    fn test_initial_counts_are_zero() {
        let m = UnderrunMonitor::new();
        assert_eq!(m.total(), 0);
        assert_eq!(m, UnderrunMonitor::default());
    }

    // ── Test B ────────────────────────────────────────────────────────────────
    /// Timeouts and laps are tracked separately and summed in total().
    #[test]
    fn test_counts_are_kept_apart() {
        let mut m = UnderrunMonitor::new();
        m.on_timeout();
        m.on_timeout();
        m.on_lapped(3);
        assert_eq!(m.timeouts(), 2);
        assert_eq!(m.lapped(), 3);
        assert_eq!(m.total(), 5);
    }

    // ── Test C ────────────────────────────────────────────────────────────────
    /// reset() returns both counters to zero.
    #[test]
    fn test_reset_clears_counts() {
        let mut m = UnderrunMonitor::new();
        m.on_timeout();
        m.on_lapped(1);
        m.reset();
        assert_eq!(m, UnderrunMonitor::default());
    }

    // ── Test D ────────────────────────────────────────────────────────────────
    /// Counters saturate instead of wrapping.
    #[test]
    fn test_counts_saturate() {
        let mut m = UnderrunMonitor::new();
        m.on_lapped(u32::MAX);
        m.on_lapped(10);
        m.on_timeout();
        assert_eq!(m.lapped(), u32::MAX);
        assert_eq!(m.total(), u32::MAX);
    }
}
