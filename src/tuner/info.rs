//! Read-only device information
//!
//! Each call performs one burst read.

use embedded_hal::i2c::I2c;

use super::Si4703;
use crate::error::Error;
use crate::registers::{fields, DeviceIdentity, RdsBlocks, Status};

impl<I2C, RST, D> Si4703<I2C, RST, D>
where
    I2C: I2c,
{
    /// Received signal strength of the current channel, in dBµV.
    pub fn rssi(&mut self) -> Result<u8, Error<I2C::Error>> {
        Ok(self.read_field(fields::RSSI)? as u8)
    }

    /// Whether the stereo pilot is detected.
    pub fn stereo(&mut self) -> Result<bool, Error<I2C::Error>> {
        Ok(self.read_field(fields::ST)? != 0)
    }

    /// RSSI and status flags from a single read.
    pub fn status(&mut self) -> Result<Status, Error<I2C::Error>> {
        self.refresh_shadow().map(Status::from_shadow)
    }

    /// Part number, manufacturer, revision, device and firmware from a
    /// single read.
    pub fn identity(&mut self) -> Result<DeviceIdentity, Error<I2C::Error>> {
        self.refresh_shadow().map(DeviceIdentity::from_shadow)
    }

    /// Part number (PN), 0x1 for the Si4703.
    pub fn part_number(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.identity().map(|id| id.part_number)
    }

    /// Manufacturer id (MFGID), 0x242 for Silicon Labs.
    pub fn manufacturer_id(&mut self) -> Result<u16, Error<I2C::Error>> {
        self.identity().map(|id| id.manufacturer_id)
    }

    /// Chip revision (REV).
    pub fn revision(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.identity().map(|id| id.revision)
    }

    /// Device (DEV), 0b1001 once an Si4703 is powered up.
    pub fn device(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.identity().map(|id| id.device)
    }

    /// Firmware version (FIRMWARE), 0 until powered up.
    pub fn firmware(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.identity().map(|id| id.firmware)
    }

    /// Raw RDS block registers with their error levels.
    ///
    /// The blocks are only meaningful when `ready` is set and RDS was enabled
    /// at start-up. Groups are not decoded.
    pub fn rds_blocks(&mut self) -> Result<RdsBlocks, Error<I2C::Error>> {
        let rds = RdsBlocks::from_shadow(self.refresh_shadow()?);

        #[cfg(feature = "defmt")]
        {
            if rds.ready {
                defmt::trace!("si4703: rds {:#06x}", rds.blocks);
            }
        }

        Ok(rds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::registers::{Register, StatusFlags};
    use crate::tuner::testing::*;
    use embedded_hal::i2c::ErrorKind;

    #[test]
    fn rssi_and_stereo() {
        let hardware = image(|s| s.set_word(Register::StatusRssi, 0x0100 | 38));
        let mut tuner = mock_tuner(&[read(&hardware), read(&hardware)], Config::default());

        assert_eq!(tuner.rssi(), Ok(38));
        assert_eq!(tuner.stereo(), Ok(true));
        finish(tuner);
    }

    #[test]
    fn status_uses_one_read() {
        let hardware = image(|s| s.set_word(Register::StatusRssi, 0x4800 | 51));
        let mut tuner = mock_tuner(&[read(&hardware)], Config::default());

        let status = tuner.status().unwrap();

        assert_eq!(status.rssi, 51);
        assert_eq!(
            status.flags,
            StatusFlags::SEEK_TUNE_COMPLETE | StatusFlags::RDS_SYNC
        );
        finish(tuner);
    }

    #[test]
    fn identity_fields() {
        let hardware = image(|s| {
            s.set_word(Register::DeviceId, 0x1242);
            s.set_word(Register::ChipId, 0x1253);
        });
        let mut tuner = mock_tuner(
            &[
                read(&hardware),
                read(&hardware),
                read(&hardware),
                read(&hardware),
                read(&hardware),
            ],
            Config::default(),
        );

        assert_eq!(tuner.part_number(), Ok(0x01));
        assert_eq!(tuner.manufacturer_id(), Ok(0x242));
        assert_eq!(tuner.revision(), Ok(0x04));
        assert_eq!(tuner.device(), Ok(0b1001));
        assert_eq!(tuner.firmware(), Ok(0x13));
        finish(tuner);
    }

    #[test]
    fn rds_blocks_are_raw() {
        let hardware = image(|s| {
            s.set_word(Register::StatusRssi, 0x8000);
            s.set_word(Register::RdsA, 0x54A8);
            s.set_word(Register::RdsB, 0x0408);
            s.set_word(Register::RdsC, 0xE0CD);
            s.set_word(Register::RdsD, 0x4142);
        });
        let mut tuner = mock_tuner(&[read(&hardware)], Config::default());

        let rds = tuner.rds_blocks().unwrap();

        assert!(rds.ready);
        assert_eq!(rds.blocks, [0x54A8, 0x0408, 0xE0CD, 0x4142]);
        assert_eq!(rds.errors, [0; 4]);
        finish(tuner);
    }

    #[test]
    fn read_errors_propagate() {
        let mut tuner = mock_tuner(&[read_error(ErrorKind::Bus)], Config::default());

        assert_eq!(tuner.rssi(), Err(Error::Bus(ErrorKind::Bus)));
        finish(tuner);
    }
}
