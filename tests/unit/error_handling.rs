//! Unit tests for error handling and recovery

use crate::common::mock_pins::MockPinError;
use crate::common::{MockDelay, create_mock_adc};
use ads1230::{Error, TimingViolation};

#[test]
fn test_read_failure_during_ready_check() {
    let (mut adc, bus) = create_mock_adc();
    bus.fail_next_read();

    let result = adc.measure(&mut MockDelay::default());

    assert!(matches!(result, Err(Error::Pin(MockPinError))));
}

#[test]
fn test_read_failure_recovery() {
    let (mut adc, bus) = create_mock_adc();
    bus.fail_next_read();
    assert!(adc.is_ready().is_err());

    bus.queue_sample(500);
    assert_eq!(adc.measure(&mut MockDelay::default()).unwrap(), 500);
}

#[test]
fn test_write_failure_aborts_sample() {
    let (mut adc, bus) = create_mock_adc();
    bus.queue_sample(500);
    bus.fail_next_write();

    let result = adc.measure(&mut MockDelay::default());

    assert!(matches!(result, Err(Error::Pin(MockPinError))));
    assert_eq!(bus.rising_edges(), 0);
}

#[test]
fn test_write_failure_during_calibration() {
    let (mut adc, bus) = create_mock_adc();
    bus.fail_next_write();

    assert!(matches!(adc.calibrate(), Err(Error::Pin(MockPinError))));
    assert!(adc.calibrate().is_ok());
}

#[test]
fn test_read_failure_during_calibration_check() {
    let (mut adc, bus) = create_mock_adc();
    bus.fail_next_read();

    assert!(matches!(adc.calibrate(), Err(Error::Pin(MockPinError))));
    // Sequence aborted at the first check
    assert_eq!(bus.rising_edges(), 23);
}

#[test]
fn test_error_classification() {
    let fatal: [Error<MockPinError>; 3] = [
        Error::Pin(MockPinError),
        Error::Timing(TimingViolation::TooShort { high_ns: 1 }),
        Error::Timing(TimingViolation::TooLong { high_ns: 20_001 }),
    ];
    for err in fatal {
        assert!(err.is_fatal(), "{:?} should be fatal", err);
        assert!(!err.is_retryable(), "{:?} should not be retryable", err);
    }

    let retryable: [Error<MockPinError>; 2] =
        [Error::CalibrationFailed { check: 0 }, Error::NotReady];
    for err in retryable {
        assert!(!err.is_fatal());
        assert!(err.is_retryable());
    }

    let usage: [Error<MockPinError>; 3] = [
        Error::NotCalibrated,
        Error::InvalidFraction,
        Error::InvalidConfig,
    ];
    for err in usage {
        assert!(!err.is_fatal());
        assert!(!err.is_retryable());
    }
}

#[test]
fn test_pin_error_converts_into_driver_error() {
    let err: Error<MockPinError> = MockPinError.into();
    assert_eq!(err, Error::Pin(MockPinError));
}

#[test]
fn test_recalibrate_after_timing_violation() {
    let (mut adc, bus) = create_mock_adc();
    bus.push_data(&[false]);
    bus.queue_pulse_widths(&[10]);

    assert!(matches!(
        adc.measure(&mut MockDelay::default()),
        Err(Error::Timing(TimingViolation::TooShort { high_ns: 10 }))
    ));

    adc.calibrate().unwrap();
    bus.queue_sample(2);
    assert_eq!(adc.measure(&mut MockDelay::default()).unwrap(), 2);
}
