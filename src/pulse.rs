//! Single SCLK pulses with high-phase timing checks
//!
//! The ADS1230 latches a new bit on every rising SCLK edge. The high phase
//! must last at least 100 ns; if it exceeds 20 µs the chip interprets it as
//! a standby request and the transfer in progress is lost. A bit-banged
//! clock on a general-purpose OS can be preempted between the two edges, so
//! every pulse is timed and checked.

use embedded_hal::digital::OutputPin;

use crate::event::{self, Event};
use crate::timer::Monotonic;
use crate::{Error, MAX_HIGH_TIME_NS, MIN_HIGH_TIME_NS, TimingViolation};

/// Check a measured high-phase duration against the chip's timing window
///
/// Both bounds are inclusive.
///
/// # Errors
///
/// Returns the violated bound with the measured duration.
pub const fn check_high_time(high_ns: u64) -> Result<(), TimingViolation> {
    if high_ns < MIN_HIGH_TIME_NS {
        Err(TimingViolation::TooShort { high_ns })
    } else if high_ns > MAX_HIGH_TIME_NS {
        Err(TimingViolation::TooLong { high_ns })
    } else {
        Ok(())
    }
}

/// Owner of the SCLK line
pub struct PulseClock<SCLK, T> {
    sclk: SCLK,
    timer: T,
}

impl<SCLK, T, E> PulseClock<SCLK, T>
where
    SCLK: OutputPin<Error = E>,
    T: Monotonic,
{
    /// Take ownership of the clock pin and drive it low (idle)
    ///
    /// # Errors
    ///
    /// Returns an error if the pin cannot be driven.
    pub fn new(mut sclk: SCLK, timer: T) -> Result<Self, Error<E>> {
        sclk.set_low()?;
        Ok(Self { sclk, timer })
    }

    /// Issue one clock pulse and verify its high phase
    ///
    /// Timestamps are taken immediately before the rising edge and
    /// immediately after the falling edge, so the measured duration is an
    /// upper bound on the real high phase.
    ///
    /// # Errors
    ///
    /// - [`Error::Pin`] if the pin cannot be driven. If the falling edge
    ///   fails, driving SCLK low is retried once; should that fail too, SCLK
    ///   is left high and the chip will enter standby.
    /// - [`Error::Timing`] if the high phase was outside
    ///   [`MIN_HIGH_TIME_NS`]..=[`MAX_HIGH_TIME_NS`]. The pulse has already
    ///   happened at that point; the sequence it belongs to must be
    ///   abandoned.
    pub fn pulse(&mut self) -> Result<(), Error<E>> {
        let before = self.timer.now_ns();
        self.sclk.set_high()?;
        if let Err(e) = self.sclk.set_low() {
            let _ = self.sclk.set_low();
            return Err(Error::Pin(e));
        }
        let after = self.timer.now_ns();

        check_high_time(after.saturating_sub(before)).map_err(|violation| {
            event::emit(&Event::TimingViolation(violation));
            Error::Timing(violation)
        })
    }

    /// Hold SCLK high (standby request once held longer than 20 µs)
    ///
    /// # Errors
    ///
    /// Returns an error if the pin cannot be driven.
    pub fn hold_high(&mut self) -> Result<(), Error<E>> {
        self.sclk.set_high()?;
        Ok(())
    }

    /// Return SCLK to its idle low level
    ///
    /// # Errors
    ///
    /// Returns an error if the pin cannot be driven.
    pub fn hold_low(&mut self) -> Result<(), Error<E>> {
        self.sclk.set_low()?;
        Ok(())
    }

    /// Consume the clock and return the pin and timer
    pub fn release(self) -> (SCLK, T) {
        (self.sclk, self.timer)
    }
}
