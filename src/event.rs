//! Structured driver events
//!
//! Every log record the driver produces goes through [`emit`], which
//! forwards it to `defmt` and/or `log` depending on the enabled features.
//! With neither feature enabled events are discarded.

use core::fmt;

use crate::TimingViolation;

/// Severity an [`Event`] is logged at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Severity {
    /// Protocol fault or failed check
    Error,
    /// Recoverable condition worth noting
    Warn,
    /// Routine protocol traffic
    Debug,
}

/// Something the driver observed on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// DOUT read low after one of the final offset calibration pulses
    CalibrationCheckFailed {
        /// 0-based index of the failing check
        check: u8,
    },
    /// The data-ready line was sampled
    DataReady {
        /// `true` if DOUT read low
        ready: bool,
    },
    /// The ready poll ran out of attempts
    PollTimeout {
        /// Number of sleeps performed
        polls: u16,
    },
    /// A conversion result was shifted in
    Sample {
        /// The 20 bits as clocked out
        raw: u32,
        /// Sign-extended value
        value: i32,
    },
    /// A clock pulse fell outside the accepted high-phase window
    TimingViolation(TimingViolation),
}

impl Event {
    /// Severity this event is logged at
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::CalibrationCheckFailed { .. } | Self::TimingViolation(_) => Severity::Error,
            Self::PollTimeout { .. } => Severity::Warn,
            Self::DataReady { .. } | Self::Sample { .. } => Severity::Debug,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::CalibrationCheckFailed { check } => write!(
                f,
                "offset calibration check {check} failed: DOUT should be high during the last 4 pulses"
            ),
            Self::DataReady { ready } => write!(f, "data ready: {ready}"),
            Self::PollTimeout { polls } => {
                write!(f, "conversion not ready after {polls} polls")
            }
            Self::Sample { raw, value } => {
                write!(f, "measured value {raw:#07x}, decimal {value}")
            }
            Self::TimingViolation(TimingViolation::TooShort { high_ns }) => write!(
                f,
                "SCLK was high for {high_ns}ns, less than the required {}ns",
                crate::MIN_HIGH_TIME_NS
            ),
            Self::TimingViolation(TimingViolation::TooLong { high_ns }) => write!(
                f,
                "SCLK was high for {high_ns}ns, exceeding {}ns: standby was triggered",
                crate::MAX_HIGH_TIME_NS
            ),
        }
    }
}

/// Log an event through whichever logging backends are enabled
pub(crate) fn emit(event: &Event) {
    #[cfg(feature = "defmt")]
    match event.severity() {
        Severity::Error => defmt::error!("{}", event),
        Severity::Warn => defmt::warn!("{}", event),
        Severity::Debug => defmt::debug!("{}", event),
    }

    #[cfg(feature = "log")]
    {
        let level = match event.severity() {
            Severity::Error => log::Level::Error,
            Severity::Warn => log::Level::Warn,
            Severity::Debug => log::Level::Debug,
        };
        log::log!(target: "ads1230", level, "{event}");
    }

    let _ = event;
}
