//! Si4703 tuner driver
//!
//! [`Si4703`] owns the bus, the reset pin, a delay provider and a
//! [`ShadowRegisters`] image of the device. All device state goes through
//! the image with the same discipline:
//!
//! 1. refresh the image with one burst read ([`Si4703::refresh_shadow`])
//! 2. change the fields of interest in the local image
//! 3. write the control registers back in one burst
//!    ([`Si4703::commit_control_registers`])
//!
//! Getters only do step 1 and read a field, so every value returned by the
//! driver reflects the hardware at the time of the call, never a local edit
//! that failed to reach the device.
//!
//! The operations are split across submodules:
//! - `power`: 2-wire bus selection, power up/down and initial configuration
//! - `tune`: tuning and seeking with the seek/tune complete handshake
//! - `audio`: volume, mute, mono, extended volume and GPIO outputs
//! - `info`: RSSI, stereo, status flags, identity and raw RDS blocks

mod audio;
mod info;
mod power;
mod tune;

#[cfg(test)]
pub(crate) mod testing;

use embedded_hal::i2c::I2c;

pub use audio::MAX_VOLUME;
pub use tune::SEEK_POLL_INTERVAL_MS;

use crate::config::{BandLimits, Config};
use crate::device::Device;
use crate::error::Error;
use crate::registers::{Field, ShadowRegisters};

/// Power sequencing stage reached by the driver
///
/// Advances through the variants in declaration order during
/// [`Si4703::start`]. [`Si4703::power_down`] moves to `PoweredDown`, and
/// [`Si4703::power_up`] from there back to `DeviceEnabled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    /// Nothing has been sent to the device yet
    Uninitialized,
    /// Reset held low with SDIO low
    ResetAsserted,
    /// Reset released in 2-wire mode, SDIO handed back to the bus
    BusModeSelected,
    /// Crystal oscillator enabled and settled
    OscillatorEnabled,
    /// Device enabled and settled
    DeviceEnabled,
    /// Region, seek and audio configuration applied
    Configured,
    /// Device disabled, outputs high impedance
    PoweredDown,
}

/// Si4703 FM tuner driver
///
/// # Type Parameters
/// * `I2C` - 2-wire bus implementing [`embedded_hal::i2c::I2c`]
/// * `RST` - reset pin implementing [`embedded_hal::digital::OutputPin`]
/// * `D` - delay provider implementing [`embedded_hal::delay::DelayNs`]
///
/// # Example
/// ```no_run
/// use embedded_hal::{delay::DelayNs, digital::OutputPin, i2c::I2c};
/// use si4703::{Config, Error, Si4703};
///
/// fn play<I, R, S, D>(i2c: I, reset: R, sdio: &mut S, delay: D) -> Result<(), Error<I::Error>>
/// where
///     I: I2c,
///     R: OutputPin,
///     S: OutputPin,
///     D: DelayNs,
/// {
///     let mut radio = Si4703::new(i2c, reset, delay, Config::default());
///     radio.start(sdio)?;
///     radio.set_volume(5)?;
///     let tuned = radio.set_channel(10240)?; // 102.40 MHz
///     assert_eq!(tuned, 10240);
///     Ok(())
/// }
/// ```
pub struct Si4703<I2C, RST, D> {
    device: Device<I2C>,
    reset: RST,
    delay: D,
    config: Config,
    limits: BandLimits,
    shadow: ShadowRegisters,
    state: PowerState,
}

impl<I2C, RST, D> Si4703<I2C, RST, D> {
    /// Creates a driver without touching the hardware.
    ///
    /// The shadow image starts zeroed; call [`Si4703::start`] to bring the
    /// device up.
    pub fn new(i2c: I2C, reset: RST, delay: D, config: Config) -> Self {
        Self {
            device: Device::new(i2c),
            reset,
            delay,
            limits: config.band_limits(),
            config,
            shadow: ShadowRegisters::new(),
            state: PowerState::Uninitialized,
        }
    }

    /// Releases the bus, the reset pin and the delay provider.
    pub fn release(self) -> (I2C, RST, D) {
        (self.device.release(), self.reset, self.delay)
    }

    /// Configuration the driver was created with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Power sequencing stage reached so far.
    pub fn power_state(&self) -> PowerState {
        self.state
    }

    /// Image captured by the most recent refresh.
    ///
    /// Only meaningful right after a driver call; the hardware may have moved
    /// on since.
    pub fn shadow(&self) -> &ShadowRegisters {
        &self.shadow
    }

    /// Changes the maximum number of status polls per wait.
    pub fn set_poll_limit(&mut self, poll_limit: u32) {
        self.config.poll_limit = poll_limit;
    }

    /// Frequency range and spacing in use.
    pub fn band_limits(&self) -> BandLimits {
        self.limits
    }

    /// Lowest frequency of the band, in 10 kHz units.
    pub fn band_start(&self) -> u16 {
        self.limits.start
    }

    /// Highest frequency of the band, in 10 kHz units.
    pub fn band_end(&self) -> u16 {
        self.limits.end
    }

    /// Channel spacing, in 10 kHz units.
    pub fn band_spacing(&self) -> u16 {
        self.limits.spacing
    }
}

impl<I2C, RST, D> Si4703<I2C, RST, D>
where
    I2C: I2c,
{
    /// Replaces the whole shadow image with the registers read from the device.
    ///
    /// Any local change not yet committed is lost.
    ///
    /// # Errors
    /// * `Error::Bus` - the burst read failed; the image is left unchanged
    pub fn refresh_shadow(&mut self) -> Result<&ShadowRegisters, Error<I2C::Error>> {
        self.shadow = self.device.read_registers().map_err(Error::Bus)?;
        Ok(&self.shadow)
    }

    /// Writes the control registers (0x02-0x07) of the shadow image to the
    /// device.
    ///
    /// # Errors
    /// * `Error::Bus` - the burst write failed; it is not retried
    pub fn commit_control_registers(&mut self) -> Result<(), Error<I2C::Error>> {
        self.device
            .write_registers(self.shadow.control_block())
            .map_err(|e| {
                #[cfg(feature = "defmt")]
                defmt::warn!("si4703: control register write failed");
                Error::Bus(e)
            })
    }

    /// Refreshes the image, applies `update` to it and commits the result.
    ///
    /// This is the read-modify-write cycle every setter of the driver uses.
    pub fn modify_registers<F>(&mut self, update: F) -> Result<(), Error<I2C::Error>>
    where
        F: FnOnce(&mut ShadowRegisters),
    {
        self.refresh_shadow()?;
        update(&mut self.shadow);
        self.commit_control_registers()
    }

    /// Refreshes the image and reads one field.
    pub fn read_field(&mut self, field: Field) -> Result<u16, Error<I2C::Error>> {
        Ok(self.refresh_shadow()?.get(field))
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::registers::{fields, Register};
    use embedded_hal::i2c::ErrorKind;

    #[test]
    fn new_does_not_touch_the_bus() {
        let tuner = mock_tuner(&[], Config::default());

        assert_eq!(tuner.power_state(), PowerState::Uninitialized);
        assert_eq!(tuner.shadow(), &ShadowRegisters::new());
        finish(tuner);
    }

    #[test]
    fn band_getters_follow_config() {
        let config = Config::default()
            .with_band(crate::Band::Japan)
            .with_spacing(crate::Spacing::Khz50);
        let tuner = mock_tuner(&[], config);

        assert_eq!(tuner.band_start(), 7600);
        assert_eq!(tuner.band_end(), 9000);
        assert_eq!(tuner.band_spacing(), 5);
        finish(tuner);
    }

    #[test]
    fn modify_preserves_untouched_fields() {
        let hardware = image(|s| {
            s.set(fields::VOLUME, 7);
            s.set(fields::SEEKTH, 24);
            s.set_flag(fields::DMUTE, true);
        });
        let updated = with(hardware, |s| s.set_flag(fields::MONO, true));
        let mut tuner = mock_tuner(&[read(&hardware), write(&updated)], Config::default());

        tuner
            .modify_registers(|s| s.set_flag(fields::MONO, true))
            .unwrap();

        assert_eq!(tuner.shadow().get(fields::VOLUME), 7);
        assert_eq!(tuner.shadow().word(Register::PowerCfg), 0x6000);
        finish(tuner);
    }

    #[test]
    fn failed_refresh_keeps_previous_image() {
        let hardware = image(|s| s.set(fields::VOLUME, 3));
        let mut tuner = mock_tuner(
            &[read(&hardware), read_error(ErrorKind::Other)],
            Config::default(),
        );

        tuner.refresh_shadow().unwrap();
        let result = tuner.refresh_shadow().map(|_| ());

        assert_eq!(result, Err(Error::Bus(ErrorKind::Other)));
        assert_eq!(tuner.shadow().get(fields::VOLUME), 3);
        finish(tuner);
    }

    #[test]
    fn failed_commit_is_reported() {
        let hardware = image(|_| {});
        let updated = with(hardware, |s| s.set(fields::VOLUME, 9));
        let mut tuner = mock_tuner(
            &[read(&hardware), write_error(&updated, ErrorKind::Other)],
            Config::default(),
        );

        let result = tuner.modify_registers(|s| s.set(fields::VOLUME, 9));

        assert_eq!(result, Err(Error::Bus(ErrorKind::Other)));
        finish(tuner);
    }
}
