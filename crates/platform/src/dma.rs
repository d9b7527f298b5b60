//! DMA stream descriptors and buffer alignment.
//!
//! The transport reads the playback buffer directly while the CPU rewrites
//! the half it is not reading. Nothing here enforces that split; the
//! ping-pong manager in the playback crate does. These types carry the
//! contract across the [`TransportDriver`](crate::TransportDriver) boundary.
//!
//! # Cache coherency
//!
//! On Cortex-M7 parts any buffer the DMA controller reads must be aligned to
//! the 32-byte cacheline and live in non-cacheable SRAM, or the CPU's writes
//! may sit in cache after the hardware has already fetched the line.
//! [`Align32`] enforces the alignment half of that.

/// A `#[repr(align(32))]` wrapper that enforces 32-byte alignment for
/// Cortex-M7 DMA-accessible buffers.
///
/// # Example
///
/// ```
/// use platform::dma::Align32;
///
/// static BUF: Align32<[u32; 16]> = Align32([0u32; 16]);
/// assert_eq!(core::ptr::addr_of!(BUF) as usize % 32, 0);
/// ```
#[derive(Clone, Copy)]
#[repr(align(32))]
pub struct Align32<T>(
    /// The inner value. Must be public so callers can construct and destructure the wrapper.
    pub T,
);

/// Read-only view of a circular DMA source buffer.
///
/// Holds a raw pointer because the hardware keeps reading the buffer while
/// the CPU refills the idle half; no Rust borrow can express that overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DmaStream {
    ptr: *const u32,
    words: usize,
}

impl DmaStream {
    /// Describe `words` 32-bit words starting at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads of `words` words, must not move, and must
    /// not be freed until the transport has been stopped. The caller is
    /// responsible for never writing the half the hardware is reading.
    #[must_use]
    pub const unsafe fn new(ptr: *const u32, words: usize) -> Self {
        Self { ptr, words }
    }

    /// Start of the buffer.
    #[must_use]
    pub fn as_ptr(&self) -> *const u32 {
        self.ptr
    }

    /// Length in 32-bit words.
    #[must_use]
    pub fn len_words(&self) -> usize {
        self.words
    }

    /// Length in bytes, as most DMA peripherals count.
    #[must_use]
    pub fn len_bytes(&self) -> usize {
        self.words.saturating_mul(core::mem::size_of::<u32>())
    }
}
