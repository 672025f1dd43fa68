//! Si4703 bus interface
//!
//! This module provides the raw 2-wire (I2C) transport for the Si4703. The
//! device only understands two transfers:
//! - a 32-byte burst read returning every register, starting at 0x0A
//! - a 12-byte burst write updating the control registers 0x02-0x07
//!
//! The interface is built around the `Device<I2C>` struct which wraps an
//! I2C bus and converts between those frames and [`ShadowRegisters`] /
//! [`ControlBlock`]. Higher-level sequencing lives in [`Si4703`](crate::Si4703).
//!
//! # Example
//! ```no_run
//! use embedded_hal::i2c::I2c;
//! use si4703::device::Device;
//! use si4703::registers::{fields, ShadowRegisters};
//!
//! fn bump_volume<I: I2c>(i2c: I) -> Result<(), I::Error> {
//!     let mut device = Device::new(i2c);
//!     let mut shadow: ShadowRegisters = device.read_registers()?;
//!     shadow.set(fields::VOLUME, 5);
//!     device.write_registers(shadow.control_block())
//! }
//! ```

use embedded_hal::i2c::I2c;
use regiface::{FromByteArray, ToByteArray};

use crate::registers::{ControlBlock, ShadowRegisters, READ_FRAME_LEN, WRITE_FRAME_LEN};

/// 7-bit I2C address of the Si4703.
pub const DEVICE_ADDRESS: u8 = 0x10;

/// Raw bus interface to the Si4703.
pub struct Device<I2C> {
    i2c: I2C,
}

impl<I2C> Device<I2C> {
    /// Creates a new Device instance wrapping the provided I2C bus.
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Releases the underlying I2C bus.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> Device<I2C>
where
    I2C: I2c,
{
    /// Reads the full register map in one burst.
    ///
    /// # Errors
    /// Returns the bus error if the transfer fails.
    pub fn read_registers(&mut self) -> Result<ShadowRegisters, I2C::Error> {
        let mut raw = [0u8; READ_FRAME_LEN];

        self.i2c.read(DEVICE_ADDRESS, &mut raw)?;

        match ShadowRegisters::from_bytes(raw) {
            Ok(shadow) => Ok(shadow),
            Err(never) => match never {},
        }
    }

    /// Writes the control registers 0x02-0x07 in one burst.
    ///
    /// # Errors
    /// Returns the bus error if the transfer fails. Nothing is retried.
    pub fn write_registers(&mut self, block: ControlBlock) -> Result<(), I2C::Error> {
        let raw: [u8; WRITE_FRAME_LEN] = match block.to_bytes() {
            Ok(raw) => raw,
            Err(never) => match never {},
        };

        self.i2c.write(DEVICE_ADDRESS, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec;
    use crate::registers::{fields, Register, CONTROL_REGISTER_COUNT};
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    #[test]
    fn read_uses_one_32_byte_burst() {
        let mut frame = vec![0u8; READ_FRAME_LEN];
        // STATUSRSSI first, DEVICEID is the seventh word
        frame[0] = 0x40;
        frame[12] = 0x12;
        frame[13] = 0x42;
        let mut i2c = I2cMock::new(&[I2cTransaction::read(DEVICE_ADDRESS, frame)]);
        let mut device = Device::new(i2c.clone());

        let shadow = device.read_registers().unwrap();

        assert!(shadow.flag(fields::STC));
        assert_eq!(shadow.word(Register::DeviceId), 0x1242);
        i2c.done();
    }

    #[test]
    fn write_sends_six_big_endian_words() {
        let mut shadow = ShadowRegisters::new();
        shadow.set_word(Register::PowerCfg, 0x4001);
        shadow.set_word(Register::Test1, 0x8100);
        // read-only registers must not leak into the frame
        shadow.set_word(Register::StatusRssi, 0xFFFF);
        shadow.set_word(Register::Test2, 0xFFFF);
        let mut expected = vec![0u8; 2 * CONTROL_REGISTER_COUNT];
        expected[0] = 0x40;
        expected[1] = 0x01;
        expected[10] = 0x81;
        let mut i2c = I2cMock::new(&[I2cTransaction::write(DEVICE_ADDRESS, expected)]);
        let mut device = Device::new(i2c.clone());

        device.write_registers(shadow.control_block()).unwrap();

        i2c.done();
    }

    #[test]
    fn bus_errors_are_returned() {
        let mut i2c = I2cMock::new(&[
            I2cTransaction::read(DEVICE_ADDRESS, vec![0u8; READ_FRAME_LEN])
                .with_error(ErrorKind::Other),
        ]);
        let mut device = Device::new(i2c.clone());

        assert_eq!(device.read_registers(), Err(ErrorKind::Other));
        i2c.done();
    }
}
