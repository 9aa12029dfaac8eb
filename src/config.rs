//! Ready-poll configuration

/// Default sleep between two reads of the data-ready line
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 50;

/// Default number of sleeps before a measurement gives up
///
/// 171 × 50 ms ≈ 8.5 s covers the slowest conversion the ADS1230 documents
/// (10 SPS mode after wake-up) with margin.
pub const DEFAULT_MAX_POLLS: u16 = 171;

/// How [`Ads1230`](crate::Ads1230) waits for a conversion to become ready
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollConfig {
    /// Sleep between two ready checks in milliseconds (must be non-zero)
    pub interval_ms: u32,
    /// Maximum number of sleeps before returning [`Error::NotReady`](crate::Error::NotReady)
    pub max_polls: u16,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_POLL_INTERVAL_MS,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }
}

impl PollConfig {
    /// Upper bound on the time spent sleeping in one measurement, in milliseconds
    #[must_use]
    pub const fn timeout_ms(&self) -> u64 {
        self.interval_ms as u64 * self.max_polls as u64
    }

    /// Check that the configuration is usable
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`](crate::Error::InvalidConfig) if
    /// `interval_ms` is zero.
    pub fn validate<E>(&self) -> Result<(), crate::Error<E>> {
        if self.interval_ms == 0 {
            return Err(crate::Error::InvalidConfig);
        }
        Ok(())
    }
}
