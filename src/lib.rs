#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

#[cfg(feature = "std")]
extern crate std;

pub mod config;
pub mod driver;
pub mod event;
pub mod load_cell;
pub mod pulse;
pub mod sample;
pub mod timer;

// Re-export main types
pub use config::PollConfig;
pub use driver::Ads1230;
pub use event::Event;
pub use load_cell::{Calibration, LoadCell, OffsetCalibration};
pub use pulse::PulseClock;
pub use timer::Monotonic;

#[cfg(feature = "std")]
pub use timer::StdMonotonic;

/// Shortest SCLK high phase the ADS1230 accepts, in nanoseconds
pub const MIN_HIGH_TIME_NS: u64 = 100;

/// Longest SCLK high phase before the ADS1230 drops into standby, in nanoseconds
pub const MAX_HIGH_TIME_NS: u64 = 20_000;

/// SCLK pulses clocked out and ignored at the start of offset calibration
pub const CALIBRATION_DISCARD_PULSES: u8 = 22;

/// SCLK pulses at the end of offset calibration after which DOUT must read high
pub const CALIBRATION_CHECK_PULSES: u8 = 4;

/// Width of one conversion result in bits (one SCLK pulse per bit)
pub const SAMPLE_BITS: u8 = 20;

/// A clock pulse outside the chip's accepted high-phase window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimingViolation {
    /// SCLK was high for less than [`MIN_HIGH_TIME_NS`]
    TooShort {
        /// Measured high phase in nanoseconds
        high_ns: u64,
    },
    /// SCLK was high for more than [`MAX_HIGH_TIME_NS`]; the chip entered standby
    TooLong {
        /// Measured high phase in nanoseconds
        high_ns: u64,
    },
}

impl TimingViolation {
    /// The measured high-phase duration that caused the violation
    #[must_use]
    pub const fn high_ns(self) -> u64 {
        match self {
            Self::TooShort { high_ns } | Self::TooLong { high_ns } => high_ns,
        }
    }
}

/// Driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Reading or writing one of the pins failed
    Pin(E),
    /// A clock pulse violated the chip's timing contract.
    ///
    /// The device state is unknown afterwards; recalibrate before relying on
    /// further samples.
    Timing(TimingViolation),
    /// DOUT did not read high after one of the final offset calibration pulses
    CalibrationFailed {
        /// 0-based index of the failing check (0..4)
        check: u8,
    },
    /// The chip did not signal data ready within the configured poll budget
    NotReady,
    /// The load cell has no unit calibration yet (`unit_value` is zero)
    NotCalibrated,
    /// A zero or non-finite fraction was passed to unit calibration
    InvalidFraction,
    /// Invalid configuration parameter
    InvalidConfig,
}

impl<E> Error<E> {
    /// Whether the fault leaves the device in an unknown state.
    ///
    /// Fatal errors abort the running sequence; the caller should recalibrate
    /// before taking further samples.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Pin(_) | Self::Timing(_))
    }

    /// Whether repeating the same call later may succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::CalibrationFailed { .. } | Self::NotReady)
    }
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Pin(error)
    }
}
