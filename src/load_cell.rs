//! Load cell readings in physical units
//!
//! Maps raw ADC counts to a physical quantity with a two-point linear fit:
//! one reading with no load gives the zero offset, one reading with a known
//! reference load gives the counts per unit.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::driver::Ads1230;
use crate::timer::Monotonic;
use crate::Error;

/// Outcome of the chip's offset calibration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OffsetCalibration {
    /// All four checks passed
    Complete,
    /// DOUT read low on one of the final checks
    Failed {
        /// 0-based index of the failing check
        check: u8,
    },
}

/// Two-point calibration of a load cell
///
/// Can be stored and restored with [`LoadCell::set_calibration()`] to skip
/// the reference-weight step on later runs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    /// Raw counts with no load applied
    pub zero_value: i32,
    /// Raw counts per one unit of load (0 or non-finite = not calibrated)
    pub unit_value: f32,
}

impl Calibration {
    /// Whether readings can be converted (finite, non-zero `unit_value`)
    #[must_use]
    pub fn is_calibrated(&self) -> bool {
        self.unit_value.is_finite() && self.unit_value != 0.0
    }

    /// Convert a raw reading to physical units
    ///
    /// Returns `None` if not calibrated.
    #[must_use]
    pub fn to_units(&self, raw: i32) -> Option<f32> {
        if !self.is_calibrated() {
            return None;
        }
        Some(counts(raw, self.zero_value) / self.unit_value)
    }
}

/// A load cell read through an ADS1230
pub struct LoadCell<SCLK, DOUT, T> {
    adc: Ads1230<SCLK, DOUT, T>,
    offset_calibration: OffsetCalibration,
    calibration: Calibration,
}

impl<SCLK, DOUT, T, E> LoadCell<SCLK, DOUT, T>
where
    SCLK: OutputPin<Error = E>,
    DOUT: InputPin<Error = E>,
    T: Monotonic,
{
    /// Create the ADC driver and run its offset calibration once
    ///
    /// A failed calibration check does not fail construction; inspect
    /// [`offset_calibration()`](Self::offset_calibration) and call
    /// [`recalibrate()`](Self::recalibrate) if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if a pin cannot be driven or a calibration pulse
    /// violated the timing window. The pins are dropped in that case.
    pub fn new(sclk: SCLK, dout: DOUT, timer: T) -> Result<Self, Error<E>> {
        Self::from_adc(Ads1230::new(sclk, dout, timer)?)
    }

    /// Wrap an existing driver and run its offset calibration once
    ///
    /// # Errors
    ///
    /// Same as [`new()`](Self::new).
    pub fn from_adc(mut adc: Ads1230<SCLK, DOUT, T>) -> Result<Self, Error<E>> {
        let offset_calibration = run_offset_calibration(&mut adc)?;
        Ok(Self {
            adc,
            offset_calibration,
            calibration: Calibration::default(),
        })
    }

    /// Repeat the chip's offset calibration
    ///
    /// # Errors
    ///
    /// Returns an error on pin failure or timing violation. A failed check is
    /// reported through the returned [`OffsetCalibration`] instead.
    pub fn recalibrate(&mut self) -> Result<OffsetCalibration, Error<E>> {
        self.offset_calibration = run_offset_calibration(&mut self.adc)?;
        Ok(self.offset_calibration)
    }

    /// Outcome of the most recent offset calibration
    pub const fn offset_calibration(&self) -> OffsetCalibration {
        self.offset_calibration
    }

    /// Record the current reading as the no-load value
    ///
    /// Returns the stored zero value.
    ///
    /// # Errors
    ///
    /// Any error from [`Ads1230::measure()`]. The previous zero value is
    /// kept on failure.
    pub fn calibrate_zero<D>(&mut self, delay: &mut D) -> Result<i32, Error<E>>
    where
        D: DelayNs,
    {
        self.calibration.zero_value = self.adc.measure(delay)?;
        Ok(self.calibration.zero_value)
    }

    /// Record the no-load value as the mean of `samples` readings
    ///
    /// # Errors
    ///
    /// Any error from [`Ads1230::measure_average()`].
    pub fn tare<D>(&mut self, delay: &mut D, samples: u8) -> Result<i32, Error<E>>
    where
        D: DelayNs,
    {
        self.calibration.zero_value = self.adc.measure_average(delay, samples)?;
        Ok(self.calibration.zero_value)
    }

    /// Derive the counts-per-unit scale from a reference load
    ///
    /// Place a known load on the cell first. `fraction` is that load
    /// expressed in the desired unit; pass `1.0` when the reference is
    /// exactly one unit. Stores and returns
    /// `(raw - zero_value) * (1 / fraction)`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidFraction`] if `fraction` is zero, not finite, or so
    ///   small that `1 / fraction` overflows. No measurement is taken. Also
    ///   returned, with the previous scale kept, if the measured scale
    ///   overflows.
    /// - Any error from [`Ads1230::measure()`]
    pub fn calibrate_unit<D>(&mut self, delay: &mut D, fraction: f32) -> Result<f32, Error<E>>
    where
        D: DelayNs,
    {
        check_fraction::<E>(fraction)?;
        let raw = self.adc.measure(delay)?;
        self.calibration.unit_value = unit_value(raw, self.calibration.zero_value, fraction)?;
        Ok(self.calibration.unit_value)
    }

    /// Take a reading in calibrated units
    ///
    /// # Errors
    ///
    /// - [`Error::NotCalibrated`] if `unit_value` is zero. No measurement is
    ///   taken.
    /// - Any error from [`Ads1230::measure()`]
    pub fn measure<D>(&mut self, delay: &mut D) -> Result<f32, Error<E>>
    where
        D: DelayNs,
    {
        if !self.calibration.is_calibrated() {
            return Err(Error::NotCalibrated);
        }
        let raw = self.adc.measure(delay)?;
        self.calibration.to_units(raw).ok_or(Error::NotCalibrated)
    }

    /// Current calibration
    pub const fn calibration(&self) -> Calibration {
        self.calibration
    }

    /// Restore a previously stored calibration
    ///
    /// A NaN or infinite `unit_value` is kept as given but counts as not
    /// calibrated, so [`measure()`](Self::measure) rejects it with
    /// [`Error::NotCalibrated`].
    pub fn set_calibration(&mut self, calibration: Calibration) {
        self.calibration = calibration;
    }

    /// Raw counts with no load applied
    pub const fn zero_value(&self) -> i32 {
        self.calibration.zero_value
    }

    /// Raw counts per unit of load
    pub const fn unit_value(&self) -> f32 {
        self.calibration.unit_value
    }

    /// Whether [`measure()`](Self::measure) can convert readings
    pub fn is_calibrated(&self) -> bool {
        self.calibration.is_calibrated()
    }

    /// Get a mutable reference to the underlying ADC driver (for raw access)
    pub const fn adc_mut(&mut self) -> &mut Ads1230<SCLK, DOUT, T> {
        &mut self.adc
    }

    /// Consume the load cell and return the ADC driver
    pub fn release(self) -> Ads1230<SCLK, DOUT, T> {
        self.adc
    }
}

#[cfg(feature = "async")]
impl<SCLK, DOUT, T, E> LoadCell<SCLK, DOUT, T>
where
    SCLK: OutputPin<Error = E>,
    DOUT: InputPin<Error = E>,
    T: Monotonic,
{
    /// Async version of [`calibrate_zero()`](Self::calibrate_zero)
    ///
    /// # Errors
    ///
    /// Any error from [`Ads1230::measure_async()`].
    pub async fn calibrate_zero_async<D>(&mut self, delay: &mut D) -> Result<i32, Error<E>>
    where
        D: embedded_hal_async::delay::DelayNs,
    {
        self.calibration.zero_value = self.adc.measure_async(delay).await?;
        Ok(self.calibration.zero_value)
    }

    /// Async version of [`calibrate_unit()`](Self::calibrate_unit)
    ///
    /// # Errors
    ///
    /// Same as [`calibrate_unit()`](Self::calibrate_unit).
    pub async fn calibrate_unit_async<D>(
        &mut self,
        delay: &mut D,
        fraction: f32,
    ) -> Result<f32, Error<E>>
    where
        D: embedded_hal_async::delay::DelayNs,
    {
        check_fraction::<E>(fraction)?;
        let raw = self.adc.measure_async(delay).await?;
        self.calibration.unit_value = unit_value(raw, self.calibration.zero_value, fraction)?;
        Ok(self.calibration.unit_value)
    }

    /// Async version of [`measure()`](Self::measure)
    ///
    /// # Errors
    ///
    /// Same as [`measure()`](Self::measure).
    pub async fn measure_async<D>(&mut self, delay: &mut D) -> Result<f32, Error<E>>
    where
        D: embedded_hal_async::delay::DelayNs,
    {
        if !self.calibration.is_calibrated() {
            return Err(Error::NotCalibrated);
        }
        let raw = self.adc.measure_async(delay).await?;
        self.calibration.to_units(raw).ok_or(Error::NotCalibrated)
    }
}

fn run_offset_calibration<SCLK, DOUT, T, E>(
    adc: &mut Ads1230<SCLK, DOUT, T>,
) -> Result<OffsetCalibration, Error<E>>
where
    SCLK: OutputPin<Error = E>,
    DOUT: InputPin<Error = E>,
    T: Monotonic,
{
    match adc.calibrate() {
        Ok(()) => Ok(OffsetCalibration::Complete),
        Err(Error::CalibrationFailed { check }) => Ok(OffsetCalibration::Failed { check }),
        Err(e) => Err(e),
    }
}

fn check_fraction<E>(fraction: f32) -> Result<(), Error<E>> {
    // Subnormal fractions overflow the reciprocal to infinity
    if fraction == 0.0 || !fraction.is_finite() || !(1.0 / fraction).is_finite() {
        return Err(Error::InvalidFraction);
    }
    Ok(())
}

// Differences of 20-bit readings fit in 21 bits, exact in f32
#[allow(clippy::cast_precision_loss)]
fn counts(raw: i32, zero_value: i32) -> f32 {
    (i64::from(raw) - i64::from(zero_value)) as f32
}

fn unit_value<E>(raw: i32, zero_value: i32, fraction: f32) -> Result<f32, Error<E>> {
    let unit_value = counts(raw, zero_value) * (1.0 / fraction);
    if !unit_value.is_finite() {
        return Err(Error::InvalidFraction);
    }
    Ok(unit_value)
}
