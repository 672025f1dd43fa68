//! Mock bus helpers shared by the driver unit tests.

use std::{vec, vec::Vec};

use embedded_hal::i2c::ErrorKind;
use embedded_hal_mock::eh1::delay::{CheckedDelay, NoopDelay};
use embedded_hal_mock::eh1::digital::Mock as PinMock;
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

use super::Si4703;
use crate::config::Config;
use crate::device::DEVICE_ADDRESS;
use crate::registers::{ShadowRegisters, REGISTER_COUNT};

pub(crate) type MockTuner = Si4703<I2cMock, PinMock, NoopDelay>;
pub(crate) type TimedTuner = Si4703<I2cMock, PinMock, CheckedDelay>;

/// Bytes the device sends for a read burst: 0x0A..0x0F then 0x00..0x09.
pub(crate) fn read_bytes(shadow: &ShadowRegisters) -> Vec<u8> {
    let words = shadow.words();
    (0..REGISTER_COUNT)
        .flat_map(|i| words[(0x0A + i) % REGISTER_COUNT].to_be_bytes())
        .collect()
}

/// Bytes the driver sends for a write burst: 0x02..0x07.
pub(crate) fn write_bytes(shadow: &ShadowRegisters) -> Vec<u8> {
    shadow.words()[0x02..0x08]
        .iter()
        .flat_map(|word| word.to_be_bytes())
        .collect()
}

pub(crate) fn read(shadow: &ShadowRegisters) -> I2cTransaction {
    I2cTransaction::read(DEVICE_ADDRESS, read_bytes(shadow))
}

pub(crate) fn read_error(error: ErrorKind) -> I2cTransaction {
    I2cTransaction::read(DEVICE_ADDRESS, vec![0; 2 * REGISTER_COUNT]).with_error(error)
}

pub(crate) fn write(shadow: &ShadowRegisters) -> I2cTransaction {
    I2cTransaction::write(DEVICE_ADDRESS, write_bytes(shadow))
}

pub(crate) fn write_error(shadow: &ShadowRegisters, error: ErrorKind) -> I2cTransaction {
    write(shadow).with_error(error)
}

/// Builds an image from scratch.
pub(crate) fn image(build: impl FnOnce(&mut ShadowRegisters)) -> ShadowRegisters {
    with(ShadowRegisters::new(), build)
}

/// Copies `base` and applies `change` to the copy.
pub(crate) fn with(
    base: ShadowRegisters,
    change: impl FnOnce(&mut ShadowRegisters),
) -> ShadowRegisters {
    let mut shadow = base;
    change(&mut shadow);
    shadow
}

pub(crate) fn mock_tuner(expectations: &[I2cTransaction], config: Config) -> MockTuner {
    Si4703::new(
        I2cMock::new(expectations),
        PinMock::new(&[]),
        NoopDelay,
        config,
    )
}

/// Releases the driver and checks every expected transfer happened.
pub(crate) fn finish(tuner: MockTuner) {
    let (mut i2c, mut reset, _) = tuner.release();
    i2c.done();
    reset.done();
}

/// Like [`mock_tuner`], with every delay checked against `delay`.
pub(crate) fn timed_tuner(
    expectations: &[I2cTransaction],
    config: Config,
    delay: CheckedDelay,
) -> TimedTuner {
    Si4703::new(
        I2cMock::new(expectations),
        PinMock::new(&[]),
        delay,
        config,
    )
}

/// Releases the driver and checks every expected transfer and delay happened.
pub(crate) fn finish_timed(tuner: TimedTuner) {
    let (mut i2c, mut reset, mut delay) = tuner.release();
    i2c.done();
    reset.done();
    delay.done();
}
