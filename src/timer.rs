//! Monotonic time source used to measure clock pulse widths
//!
//! `embedded-hal` has no notion of reading the current time, so the driver
//! asks for anything implementing [`Monotonic`]. On a microcontroller this is
//! typically a cycle counter scaled to nanoseconds; on a hosted target the
//! `std` feature provides [`StdMonotonic`].

/// A monotonic clock with nanosecond resolution
pub trait Monotonic {
    /// Current time in nanoseconds since an arbitrary, fixed origin.
    ///
    /// Successive calls must never go backwards.
    fn now_ns(&mut self) -> u64;
}

impl<T: Monotonic + ?Sized> Monotonic for &mut T {
    fn now_ns(&mut self) -> u64 {
        T::now_ns(self)
    }
}

/// [`Monotonic`] backed by [`std::time::Instant`]
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct StdMonotonic {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdMonotonic {
    /// Create a timer whose origin is the moment of construction
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdMonotonic {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Monotonic for StdMonotonic {
    fn now_ns(&mut self) -> u64 {
        // Saturates after ~584 years of uptime
        u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }
}
