//! ADS1230 protocol driver
//!
//! This module implements the chip's two-wire protocol on top of a
//! [`PulseClock`]: offset calibration, data-ready polling and 20-bit sample
//! acquisition.
//!
//! The data line doubles as the ready flag. It goes low when a conversion is
//! available; the next 20 SCLK pulses then shift the result out MSB first.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::config::PollConfig;
use crate::event::{self, Event};
use crate::pulse::PulseClock;
use crate::sample;
use crate::timer::Monotonic;
use crate::{CALIBRATION_CHECK_PULSES, CALIBRATION_DISCARD_PULSES, Error, SAMPLE_BITS};

/// Main driver for the ADS1230
///
/// The driver owns both pins for its whole lifetime. Dropping it drops the
/// pins; use [`release()`](Self::release) to get them back.
pub struct Ads1230<SCLK, DOUT, T> {
    clock: PulseClock<SCLK, T>,
    dout: DOUT,
    config: PollConfig,
    standby: bool,
}

impl<SCLK, DOUT, T, E> Ads1230<SCLK, DOUT, T>
where
    SCLK: OutputPin<Error = E>,
    DOUT: InputPin<Error = E>,
    T: Monotonic,
{
    /// Create a new driver with the default poll configuration
    ///
    /// SCLK is driven low. No calibration is performed; call
    /// [`calibrate()`](Self::calibrate) once the supply has settled.
    ///
    /// # Errors
    ///
    /// Returns an error if the clock pin cannot be driven.
    pub fn new(sclk: SCLK, dout: DOUT, timer: T) -> Result<Self, Error<E>> {
        Self::with_config(sclk, dout, timer, PollConfig::default())
    }

    /// Create a new driver with a custom poll configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration is invalid ([`Error::InvalidConfig`])
    /// - The clock pin cannot be driven
    pub fn with_config(
        sclk: SCLK,
        dout: DOUT,
        timer: T,
        config: PollConfig,
    ) -> Result<Self, Error<E>> {
        config.validate::<E>()?;

        Ok(Self {
            clock: PulseClock::new(sclk, timer)?,
            dout,
            config,
            standby: false,
        })
    }

    /// Run the chip's offset calibration
    ///
    /// Issues 26 SCLK pulses. The first 22 are ignored; after each of the
    /// last 4 DOUT must read high. Once calibration finishes the chip pulls
    /// DOUT low again, which [`is_ready()`](Self::is_ready) observes.
    ///
    /// # Errors
    ///
    /// - [`Error::CalibrationFailed`] if one of the 4 checks read low. This
    ///   is not fatal; calibration may simply be retried.
    /// - [`Error::Timing`] if a pulse violated the timing window. The
    ///   sequence is aborted at that pulse.
    /// - [`Error::Pin`] on pin I/O failure
    pub fn calibrate(&mut self) -> Result<(), Error<E>> {
        self.wake()?;

        for _ in 0..CALIBRATION_DISCARD_PULSES {
            self.clock.pulse()?;
        }

        for check in 0..CALIBRATION_CHECK_PULSES {
            self.clock.pulse()?;
            if !self.dout.is_high()? {
                event::emit(&Event::CalibrationCheckFailed { check });
                return Err(Error::CalibrationFailed { check });
            }
        }

        Ok(())
    }

    /// Whether a conversion result is waiting (DOUT reads low)
    ///
    /// # Errors
    ///
    /// Returns an error if the data pin cannot be read.
    pub fn is_ready(&mut self) -> Result<bool, Error<E>> {
        let ready = self.dout.is_low()?;
        event::emit(&Event::DataReady { ready });
        Ok(ready)
    }

    /// Block until a conversion is ready
    ///
    /// Checks the ready line, sleeping `interval_ms` between checks, and
    /// gives up after `max_polls` sleeps.
    ///
    /// # Errors
    ///
    /// - [`Error::NotReady`] if the poll budget ran out (transient, retry later)
    /// - [`Error::Pin`] on pin I/O failure
    pub fn wait_ready<D>(&mut self, delay: &mut D) -> Result<(), Error<E>>
    where
        D: DelayNs,
    {
        let mut polls: u16 = 0;
        while !self.is_ready()? {
            if polls >= self.config.max_polls {
                event::emit(&Event::PollTimeout { polls });
                return Err(Error::NotReady);
            }
            polls += 1;
            delay.delay_ms(self.config.interval_ms);
        }
        Ok(())
    }

    /// Take one measurement and return the signed 20-bit result
    ///
    /// Wakes the chip from standby if needed, waits for data ready, then
    /// clocks out exactly 20 bits.
    ///
    /// # Errors
    ///
    /// - [`Error::NotReady`] if no conversion became ready in time
    /// - [`Error::Timing`] if a pulse violated the timing window; the
    ///   partial sample is discarded
    /// - [`Error::Pin`] on pin I/O failure
    ///
    /// # Example
    ///
    /// ```ignore
    /// let raw = adc.measure(&mut delay)?;
    /// ```
    pub fn measure<D>(&mut self, delay: &mut D) -> Result<i32, Error<E>>
    where
        D: DelayNs,
    {
        self.wake()?;
        self.wait_ready(delay)?;
        self.read_sample()
    }

    /// Average `samples` consecutive measurements
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidConfig`] if `samples` is zero
    /// - Any error from [`measure()`](Self::measure); earlier samples are
    ///   discarded
    pub fn measure_average<D>(&mut self, delay: &mut D, samples: u8) -> Result<i32, Error<E>>
    where
        D: DelayNs,
    {
        if samples == 0 {
            return Err(Error::InvalidConfig);
        }

        let mut sum: i64 = 0;
        for _ in 0..samples {
            sum += i64::from(self.measure(delay)?);
        }

        // The mean of 20-bit values is itself within the 20-bit range
        #[allow(clippy::cast_possible_truncation)]
        let mean = (sum / i64::from(samples)) as i32;
        Ok(mean)
    }

    /// Put the chip into standby by holding SCLK high
    ///
    /// The chip powers down once SCLK has been high for longer than 20 µs.
    /// [`calibrate()`](Self::calibrate) and [`measure()`](Self::measure)
    /// wake it automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if the clock pin cannot be driven.
    pub fn enter_standby(&mut self) -> Result<(), Error<E>> {
        self.clock.hold_high()?;
        self.standby = true;
        Ok(())
    }

    /// Leave standby by returning SCLK low
    ///
    /// Does nothing if the chip is not in standby. The first conversion after
    /// wake-up takes longer than usual; [`measure()`](Self::measure) covers
    /// this with its poll budget.
    ///
    /// # Errors
    ///
    /// Returns an error if the clock pin cannot be driven.
    pub fn wake(&mut self) -> Result<(), Error<E>> {
        if self.standby {
            self.clock.hold_low()?;
            self.standby = false;
        }
        Ok(())
    }

    /// Whether the chip was put into standby and not woken since
    pub const fn is_standby(&self) -> bool {
        self.standby
    }

    /// Current poll configuration
    pub const fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Consume the driver and return the clock pin, data pin and timer
    pub fn release(self) -> (SCLK, DOUT, T) {
        let (sclk, timer) = self.clock.release();
        (sclk, self.dout, timer)
    }

    /// Shift in one conversion result. DOUT must already read low.
    fn read_sample(&mut self) -> Result<i32, Error<E>> {
        let mut raw: u32 = 0;
        for _ in 0..SAMPLE_BITS {
            self.clock.pulse()?;
            raw = (raw << 1) | u32::from(self.dout.is_high()?);
        }

        let value = sample::decode(raw);
        event::emit(&Event::Sample { raw, value });
        Ok(value)
    }
}

#[cfg(feature = "async")]
impl<SCLK, DOUT, T, E> Ads1230<SCLK, DOUT, T>
where
    SCLK: OutputPin<Error = E>,
    DOUT: InputPin<Error = E>,
    T: Monotonic,
{
    /// Wait until a conversion is ready (async)
    ///
    /// Same poll budget as [`wait_ready()`](Self::wait_ready), but sleeps by
    /// awaiting the delay instead of blocking.
    ///
    /// # Errors
    ///
    /// - [`Error::NotReady`] if the poll budget ran out
    /// - [`Error::Pin`] on pin I/O failure
    pub async fn wait_ready_async<D>(&mut self, delay: &mut D) -> Result<(), Error<E>>
    where
        D: embedded_hal_async::delay::DelayNs,
    {
        let mut polls: u16 = 0;
        while !self.is_ready()? {
            if polls >= self.config.max_polls {
                event::emit(&Event::PollTimeout { polls });
                return Err(Error::NotReady);
            }
            polls += 1;
            delay.delay_ms(self.config.interval_ms).await;
        }
        Ok(())
    }

    /// Take one measurement (async)
    ///
    /// Only the ready wait is asynchronous. The 20-pulse read runs to
    /// completion without yielding, since a pause mid-transfer longer than
    /// 20 µs would put the chip into standby.
    ///
    /// # Errors
    ///
    /// Same as [`measure()`](Self::measure).
    pub async fn measure_async<D>(&mut self, delay: &mut D) -> Result<i32, Error<E>>
    where
        D: embedded_hal_async::delay::DelayNs,
    {
        self.wake()?;
        self.wait_ready_async(delay).await?;
        self.read_sample()
    }
}
