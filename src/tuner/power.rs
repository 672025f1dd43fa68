//! Power sequencing
//!
//! Bring-up order, with the settle time after each step:
//!
//! | Step                         | Settle  |
//! |------------------------------|---------|
//! | reset low, SDIO low          | 1 ms    |
//! | reset high (2-wire selected) | 1 ms    |
//! | crystal oscillator enable    | 500 ms  |
//! | device enable                | 110 ms  |
//! | configuration                | -       |
//!
//! SDIO must be low while reset rises, otherwise the device latches the
//! 3-wire bus mode which this driver does not support.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::I2c;

use super::{PowerState, Si4703};
use crate::config::GpioMode;
use crate::error::Error;
use crate::registers::fields;

const RESET_SETTLE_MS: u32 = 1;
const OSCILLATOR_SETTLE_MS: u32 = 500;
const POWER_UP_SETTLE_MS: u32 = 110;
const POWER_DOWN_SETTLE_MS: u32 = 2;

impl<I2C, RST, D> Si4703<I2C, RST, D>
where
    I2C: I2c,
    RST: OutputPin,
    D: DelayNs,
{
    /// Resets the device into 2-wire mode, powers it up and applies the
    /// configuration.
    ///
    /// # Arguments
    /// * `sdio` - the SDIO/SDA line as an open-drain output. It is driven low
    ///   during reset and set high afterwards, which releases it to the bus
    ///   pull-up so other devices on a shared bus are not blocked.
    ///
    /// # Important Notes
    /// - Takes a little over 600 ms because of the oscillator settle time
    /// - Running it again performs the whole sequence from reset
    ///
    /// # Errors
    /// * `Error::Pin` - the reset or SDIO pin could not be driven
    /// * `Error::Bus` - a register transfer failed
    pub fn start<SDIO>(&mut self, sdio: &mut SDIO) -> Result<(), Error<I2C::Error>>
    where
        SDIO: OutputPin,
    {
        self.select_two_wire_bus(sdio)?;
        self.power_up()?;
        self.configure()
    }

    fn select_two_wire_bus<SDIO>(&mut self, sdio: &mut SDIO) -> Result<(), Error<I2C::Error>>
    where
        SDIO: OutputPin,
    {
        self.reset.set_low().map_err(|_| Error::Pin)?;
        sdio.set_low().map_err(|_| Error::Pin)?;
        self.state = PowerState::ResetAsserted;
        self.delay.delay_ms(RESET_SETTLE_MS);

        if self.reset.set_high().is_err() {
            // SDIO is also SDA: never leave it driven low
            let _ = sdio.set_high();
            return Err(Error::Pin);
        }
        self.delay.delay_ms(RESET_SETTLE_MS);

        sdio.set_high().map_err(|_| Error::Pin)?;
        self.state = PowerState::BusModeSelected;

        #[cfg(feature = "defmt")]
        defmt::debug!("si4703: 2-wire bus selected");
        Ok(())
    }
}

impl<I2C, RST, D> Si4703<I2C, RST, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Enables the crystal oscillator, then the device.
    ///
    /// Audio is left audible (DMUTE = 1).
    pub fn power_up(&mut self) -> Result<(), Error<I2C::Error>> {
        self.modify_registers(|shadow| shadow.set_flag(fields::XOSCEN, true))?;
        self.delay.delay_ms(OSCILLATOR_SETTLE_MS);
        self.state = PowerState::OscillatorEnabled;

        self.modify_registers(|shadow| {
            shadow.set_flag(fields::ENABLE, true);
            shadow.set_flag(fields::DISABLE, false);
            shadow.set_flag(fields::DMUTE, true);
        })?;
        self.delay.delay_ms(POWER_UP_SETTLE_MS);
        self.state = PowerState::DeviceEnabled;

        #[cfg(feature = "defmt")]
        defmt::debug!("si4703: powered up");
        Ok(())
    }

    /// Mutes the audio, puts the audio outputs and GPIOs in high impedance
    /// and disables the device.
    pub fn power_down(&mut self) -> Result<(), Error<I2C::Error>> {
        self.modify_registers(|shadow| {
            shadow.set_flag(fields::AHIZEN, true);
            shadow.set(fields::GPIO1, GpioMode::HighImpedance as u16);
            shadow.set(fields::GPIO2, GpioMode::HighImpedance as u16);
            shadow.set(fields::GPIO3, GpioMode::HighImpedance as u16);
            shadow.set_flag(fields::DMUTE, false);
            shadow.set_flag(fields::ENABLE, true);
            shadow.set_flag(fields::DISABLE, true);
        })?;
        self.delay.delay_ms(POWER_DOWN_SETTLE_MS);
        self.state = PowerState::PoweredDown;

        #[cfg(feature = "defmt")]
        defmt::debug!("si4703: powered down");
        Ok(())
    }
}

impl<I2C, RST, D> Si4703<I2C, RST, D>
where
    I2C: I2c,
{
    /// Applies the configuration in a single read-modify-write cycle.
    ///
    /// Volume starts at 0 and tune/seek complete interrupts stay disabled:
    /// completion is always detected by polling.
    fn configure(&mut self) -> Result<(), Error<I2C::Error>> {
        let config = self.config;

        self.modify_registers(|shadow| {
            // region
            shadow.set(fields::BAND, config.band as u16);
            shadow.set(fields::SPACE, config.spacing as u16);
            shadow.set(fields::DE, config.de_emphasis as u16);

            shadow.set_flag(fields::STCIEN, false);

            // seek
            shadow.set_flag(fields::SEEK, false);
            shadow.set_flag(fields::SEEKUP, true);
            shadow.set(fields::SKMODE, config.seek_mode as u16);
            shadow.set(fields::SEEKTH, config.seek_threshold.into());
            shadow.set(fields::SKCNT, config.seek_impulse_count.into());
            shadow.set(fields::SKSNR, config.seek_snr.into());
            shadow.set_flag(fields::AGCD, config.agc_disabled);

            // RDS reception on, no interrupts, standard mode
            shadow.set_flag(fields::RDSIEN, false);
            shadow.set_flag(fields::RDSM, false);
            shadow.set_flag(fields::RDS, true);

            // audio
            shadow.set_flag(fields::AHIZEN, false);
            shadow.set_flag(fields::MONO, false);
            shadow.set(fields::BLNDADJ, config.blend as u16);
            shadow.set(fields::VOLUME, 0);
            shadow.set_flag(fields::VOLEXT, false);

            // softmute
            shadow.set_flag(fields::DSMUTE, true);
            shadow.set(fields::SMUTEA, config.softmute_attenuation as u16);
            shadow.set(fields::SMUTER, config.softmute_rate as u16);

            shadow.set(fields::GPIO1, GpioMode::HighImpedance as u16);
            shadow.set(fields::GPIO2, GpioMode::HighImpedance as u16);
            shadow.set(fields::GPIO3, GpioMode::HighImpedance as u16);
        })?;
        self.limits = config.band_limits();
        self.state = PowerState::Configured;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "si4703: configured band {=u16}..{=u16} step {=u16}",
            self.limits.start,
            self.limits.end,
            self.limits.spacing
        );
        Ok(())
    }
}
