//! Integration tests for basic workflow scenarios

use crate::common::test_utils::assert_float_eq;
use crate::common::{MockBus, MockDelay, create_mock_load_cell};
use ads1230::{Calibration, Error, LoadCell, OffsetCalibration};

#[test]
fn test_complete_weighing_workflow() {
    let bus = MockBus::new();
    let mut delay = MockDelay::default();

    // Power-up: offset calibration runs during construction
    let mut scale = LoadCell::new(bus.clock_pin(), bus.data_pin(), bus.timer()).unwrap();
    assert_eq!(scale.offset_calibration(), OffsetCalibration::Complete);

    // Empty platform, averaged
    for value in [10_002, 9_998, 10_001, 9_999] {
        bus.queue_sample(value);
    }
    assert_eq!(scale.tare(&mut delay, 4).unwrap(), 10_000);

    // 500 g reference weight, calibrating in kilograms
    bus.queue_sample(60_000);
    assert_eq!(scale.calibrate_unit(&mut delay, 0.5).unwrap(), 100_000.0);

    // Unknown loads
    bus.queue_sample(135_000);
    assert_float_eq(scale.measure(&mut delay).unwrap(), 1.25, 1e-6);

    bus.queue_not_ready(3);
    bus.queue_sample(10_000);
    assert_float_eq(scale.measure(&mut delay).unwrap(), 0.0, 1e-6);

    assert_eq!(bus.pending_data(), 0);
}

#[test]
fn test_standby_between_readings() {
    let (mut scale, bus) = create_mock_load_cell();
    let mut delay = MockDelay::default();
    scale.set_calibration(Calibration {
        zero_value: 0,
        unit_value: 10.0,
    });

    scale.adc_mut().enter_standby().unwrap();
    assert!(bus.clock_level());

    // The next reading wakes the chip; the first conversion takes a while
    bus.queue_not_ready(20);
    bus.queue_sample(250);
    assert_float_eq(scale.measure(&mut delay).unwrap(), 25.0, 1e-6);
    assert!(!scale.adc_mut().is_standby());
    assert_eq!(delay.calls, 20);
}

#[test]
fn test_recovery_from_startup_calibration_failure() {
    let bus = MockBus::new();
    let mut delay = MockDelay::default();
    bus.queue_calibration_failing_at(0);

    let mut scale = LoadCell::new(bus.clock_pin(), bus.data_pin(), bus.timer()).unwrap();
    assert_eq!(
        scale.offset_calibration(),
        OffsetCalibration::Failed { check: 0 }
    );

    // Measuring still requires a unit calibration
    assert!(matches!(scale.measure(&mut delay), Err(Error::NotCalibrated)));

    assert_eq!(scale.recalibrate().unwrap(), OffsetCalibration::Complete);

    bus.queue_sample(-1000);
    bus.queue_sample(1000);
    bus.queue_sample(0);
    scale.calibrate_zero(&mut delay).unwrap();
    scale.calibrate_unit(&mut delay, 2.0).unwrap();
    assert_float_eq(scale.measure(&mut delay).unwrap(), 1.0, 1e-6);
}

#[test]
fn test_timeout_then_success() {
    let (mut scale, bus) = create_mock_load_cell();
    let mut delay = MockDelay::default();
    scale.set_calibration(Calibration {
        zero_value: 100,
        unit_value: 50.0,
    });

    assert!(matches!(scale.measure(&mut delay), Err(Error::NotReady)));
    assert_eq!(delay.total_ms(), 8550);

    bus.queue_sample(200);
    assert_float_eq(scale.measure(&mut delay).unwrap(), 2.0, 1e-6);
}
