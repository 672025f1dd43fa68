//! Audio and GPIO controls
//!
//! Every setter is one refresh-modify-commit cycle and every getter one
//! refresh, so the values returned always come from the hardware.

use embedded_hal::i2c::I2c;

use super::Si4703;
use crate::config::{Gpio, GpioMode};
use crate::error::Error;
use crate::registers::{fields, Field};

/// Highest volume step.
pub const MAX_VOLUME: u8 = 15;

impl<I2C, RST, D> Si4703<I2C, RST, D>
where
    I2C: I2c,
{
    /// Current volume, 0 to [`MAX_VOLUME`].
    pub fn volume(&mut self) -> Result<u8, Error<I2C::Error>> {
        Ok(self.read_field(fields::VOLUME)? as u8)
    }

    /// Sets the volume and returns the level read back from the device.
    ///
    /// `volume` is clamped to 0..=[`MAX_VOLUME`], so relative changes can be
    /// passed without checking for underflow first.
    pub fn set_volume(&mut self, volume: i32) -> Result<u8, Error<I2C::Error>> {
        let volume = volume.clamp(0, i32::from(MAX_VOLUME)) as u16;
        self.modify_registers(|shadow| shadow.set(fields::VOLUME, volume))?;
        self.volume()
    }

    /// Raises the volume by one step, staying at [`MAX_VOLUME`].
    pub fn inc_volume(&mut self) -> Result<u8, Error<I2C::Error>> {
        let current = self.volume()?;
        self.set_volume(i32::from(current) + 1)
    }

    /// Lowers the volume by one step, staying at 0.
    pub fn dec_volume(&mut self) -> Result<u8, Error<I2C::Error>> {
        let current = self.volume()?;
        self.set_volume(i32::from(current) - 1)
    }

    /// Whether the audio output is enabled (DMUTE set).
    pub fn is_audible(&mut self) -> Result<bool, Error<I2C::Error>> {
        self.read_flag(fields::DMUTE)
    }

    /// Enables (`true`) or silences (`false`) the audio output.
    pub fn set_audible(&mut self, audible: bool) -> Result<(), Error<I2C::Error>> {
        self.write_flag(fields::DMUTE, audible)
    }

    /// Raw state of the DMUTE bit.
    ///
    /// # Important Notes
    /// - DMUTE is a *disable mute* bit: `true` means the audio is playing
    /// - [`Si4703::is_audible`] reads the same bit under a clearer name
    pub fn mute(&mut self) -> Result<bool, Error<I2C::Error>> {
        self.is_audible()
    }

    /// Writes the DMUTE bit. `true` un-mutes the audio output.
    ///
    /// Same as [`Si4703::set_audible`].
    pub fn set_mute(&mut self, dmute: bool) -> Result<(), Error<I2C::Error>> {
        self.set_audible(dmute)
    }

    /// Whether mono output is forced.
    pub fn mono(&mut self) -> Result<bool, Error<I2C::Error>> {
        self.read_flag(fields::MONO)
    }

    /// Forces mono (`true`) or lets the device blend stereo (`false`).
    pub fn set_mono(&mut self, mono: bool) -> Result<(), Error<I2C::Error>> {
        self.write_flag(fields::MONO, mono)
    }

    /// Whether the extended volume range (-30 dBFS lower) is selected.
    pub fn volume_extended(&mut self) -> Result<bool, Error<I2C::Error>> {
        self.read_flag(fields::VOLEXT)
    }

    /// Selects the extended volume range.
    pub fn set_volume_extended(&mut self, extended: bool) -> Result<(), Error<I2C::Error>> {
        self.write_flag(fields::VOLEXT, extended)
    }

    /// Sets the mode of one GPIO pin. The other two pins are left as they are.
    pub fn write_gpio(&mut self, gpio: Gpio, mode: GpioMode) -> Result<(), Error<I2C::Error>> {
        let field = match gpio {
            Gpio::Gpio1 => fields::GPIO1,
            Gpio::Gpio2 => fields::GPIO2,
            Gpio::Gpio3 => fields::GPIO3,
        };
        self.modify_registers(|shadow| shadow.set(field, mode as u16))
    }

    fn read_flag(&mut self, field: Field) -> Result<bool, Error<I2C::Error>> {
        Ok(self.read_field(field)? != 0)
    }

    fn write_flag(&mut self, field: Field, enabled: bool) -> Result<(), Error<I2C::Error>> {
        self.modify_registers(|shadow| shadow.set_flag(field, enabled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::registers::{Register, ShadowRegisters};
    use crate::tuner::testing::*;
    use embedded_hal::i2c::ErrorKind;

    fn at_volume(volume: u16) -> ShadowRegisters {
        image(|s| {
            s.set_word(Register::SysConfig2, 0x1810);
            s.set(fields::VOLUME, volume);
        })
    }

    #[test]
    fn set_volume_clamps_high() {
        let hardware = at_volume(4);
        let updated = at_volume(15);
        let mut tuner = mock_tuner(
            &[read(&hardware), write(&updated), read(&updated)],
            Config::default(),
        );

        assert_eq!(tuner.set_volume(20), Ok(15));
        // seek threshold and band bits untouched
        assert_eq!(tuner.shadow().word(Register::SysConfig2), 0x181F);
        finish(tuner);
    }

    #[test]
    fn set_volume_clamps_negative() {
        let hardware = at_volume(4);
        let updated = at_volume(0);
        let mut tuner = mock_tuner(
            &[read(&hardware), write(&updated), read(&updated)],
            Config::default(),
        );

        assert_eq!(tuner.set_volume(-3), Ok(0));
        finish(tuner);
    }

    #[test]
    fn inc_volume_saturates() {
        let top = at_volume(15);
        let mut tuner = mock_tuner(
            &[read(&top), read(&top), write(&top), read(&top)],
            Config::default(),
        );

        assert_eq!(tuner.inc_volume(), Ok(15));
        finish(tuner);
    }

    #[test]
    fn dec_volume_saturates() {
        let bottom = at_volume(0);
        let mut tuner = mock_tuner(
            &[read(&bottom), read(&bottom), write(&bottom), read(&bottom)],
            Config::default(),
        );

        assert_eq!(tuner.dec_volume(), Ok(0));
        finish(tuner);
    }

    #[test]
    fn dec_volume_steps_down() {
        let hardware = at_volume(8);
        let lowered = at_volume(7);
        let mut tuner = mock_tuner(
            &[read(&hardware), read(&hardware), write(&lowered), read(&lowered)],
            Config::default(),
        );

        assert_eq!(tuner.dec_volume(), Ok(7));
        finish(tuner);
    }

    #[test]
    fn set_mute_true_enables_audio() {
        let hardware = image(|s| s.set_flag(fields::ENABLE, true));
        let updated = with(hardware, |s| s.set_flag(fields::DMUTE, true));
        let mut tuner = mock_tuner(
            &[read(&hardware), write(&updated), read(&updated)],
            Config::default(),
        );

        tuner.set_mute(true).unwrap();

        assert_eq!(tuner.shadow().word(Register::PowerCfg), 0x4001);
        assert_eq!(tuner.mute(), Ok(true));
        finish(tuner);
    }

    #[test]
    fn set_audible_false_silences() {
        let hardware = image(|s| s.set_word(Register::PowerCfg, 0x4001));
        let updated = image(|s| s.set_word(Register::PowerCfg, 0x0001));
        let mut tuner = mock_tuner(
            &[read(&hardware), write(&updated), read(&updated)],
            Config::default(),
        );

        tuner.set_audible(false).unwrap();

        assert_eq!(tuner.is_audible(), Ok(false));
        finish(tuner);
    }

    #[test]
    fn failed_commit_does_not_leak_into_getters() {
        let hardware = at_volume(4);
        let updated = at_volume(15);
        let mut tuner = mock_tuner(
            &[
                read(&hardware),
                write_error(&updated, ErrorKind::Other),
                read(&hardware),
            ],
            Config::default(),
        );

        assert_eq!(tuner.set_volume(15), Err(Error::Bus(ErrorKind::Other)));
        assert_eq!(tuner.volume(), Ok(4));
        finish(tuner);
    }

    #[test]
    fn mono_and_extended_volume() {
        let hardware = image(|_| {});
        let mono = with(hardware, |s| s.set_flag(fields::MONO, true));
        let extended = with(mono, |s| s.set_flag(fields::VOLEXT, true));
        let mut tuner = mock_tuner(
            &[
                read(&hardware),
                write(&mono),
                read(&mono),
                write(&extended),
                read(&extended),
                read(&extended),
            ],
            Config::default(),
        );

        tuner.set_mono(true).unwrap();
        tuner.set_volume_extended(true).unwrap();

        assert_eq!(tuner.mono(), Ok(true));
        assert_eq!(tuner.volume_extended(), Ok(true));
        assert_eq!(tuner.shadow().word(Register::SysConfig3), 0x0100);
        finish(tuner);
    }

    #[test]
    fn gpio_modes_are_independent() {
        let hardware = image(|s| {
            s.set_word(Register::SysConfig1, 0x1000);
            s.set(fields::GPIO1, GpioMode::High as u16);
        });
        let updated = with(hardware, |s| s.set(fields::GPIO3, GpioMode::Function as u16));
        let mut tuner = mock_tuner(&[read(&hardware), write(&updated)], Config::default());

        tuner.write_gpio(Gpio::Gpio3, GpioMode::Function).unwrap();

        assert_eq!(tuner.shadow().word(Register::SysConfig1), 0x1013);
        finish(tuner);
    }
}
