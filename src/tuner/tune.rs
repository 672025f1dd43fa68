//! Tuning and seeking
//!
//! Both operations follow the same handshake with the device:
//!
//! 1. set the trigger bit (TUNE or SEEK) and commit
//! 2. poll until the seek/tune complete flag (STC) is set
//! 3. clear the trigger bit and commit
//! 4. poll until STC is cleared again
//!
//! Tuning polls back to back. Seeking scans the band and takes much longer,
//! so it waits [`SEEK_POLL_INTERVAL_MS`] between polls.
//!
//! Every poll is one full register read. Each wait gives up after
//! [`Config::poll_limit`](crate::Config::poll_limit) polls with
//! [`Error::Timeout`].

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::Si4703;
use crate::config::SeekDirection;
use crate::error::Error;
use crate::registers::{fields, Field};

/// Delay between status polls while a seek is running.
pub const SEEK_POLL_INTERVAL_MS: u32 = 40;

impl<I2C, RST, D> Si4703<I2C, RST, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Frequency the device is tuned to, in 10 kHz units.
    ///
    /// Reads the READCHAN register, so the value reflects whatever the
    /// hardware last locked to, including in the middle of a seek.
    pub fn channel(&mut self) -> Result<u16, Error<I2C::Error>> {
        let channel = self.read_field(fields::READCHAN)?;
        Ok(self.limits.frequency(channel))
    }

    /// Tunes to `frequency` (10 kHz units) and returns the frequency the
    /// device locked to.
    ///
    /// Frequencies outside the band are clamped to the nearest band edge.
    /// Frequencies between two channels round down to the lower channel.
    ///
    /// # Errors
    /// * `Error::Bus` - a register transfer failed
    /// * `Error::Timeout` - STC did not change within the poll limit. TUNE is
    ///   cleared again before returning when STC never came up.
    pub fn set_channel(&mut self, frequency: u16) -> Result<u16, Error<I2C::Error>> {
        let channel = self.limits.channel(frequency);

        #[cfg(feature = "defmt")]
        defmt::debug!("si4703: tune to channel {=u16}", channel);

        self.modify_registers(|shadow| {
            shadow.set(fields::CHAN, channel);
            shadow.set_flag(fields::TUNE, true);
        })?;
        self.wait_for_seek_tune_complete(true, 0)
            .map_err(|e| self.clear_trigger_after(fields::TUNE, e))?;

        self.modify_registers(|shadow| shadow.set_flag(fields::TUNE, false))?;
        self.wait_for_seek_tune_complete(false, 0)?;

        self.channel()
    }

    /// Tunes one channel up, stopping at the band end.
    pub fn inc_channel(&mut self) -> Result<u16, Error<I2C::Error>> {
        let current = self.channel()?;
        self.set_channel(self.limits.step(current, 1))
    }

    /// Tunes one channel down, stopping at the band start.
    pub fn dec_channel(&mut self) -> Result<u16, Error<I2C::Error>> {
        let current = self.channel()?;
        self.set_channel(self.limits.step(current, -1))
    }

    /// Seeks towards higher frequencies. See [`Si4703::seek`].
    pub fn seek_up(&mut self) -> Result<Option<u16>, Error<I2C::Error>> {
        self.seek(SeekDirection::Up)
    }

    /// Seeks towards lower frequencies. See [`Si4703::seek`].
    pub fn seek_down(&mut self) -> Result<Option<u16>, Error<I2C::Error>> {
        self.seek(SeekDirection::Down)
    }

    /// Seeks to the next station in `direction`.
    ///
    /// Returns the frequency of the station found, or `None` when the seek
    /// failed: no station above the seek thresholds or, in
    /// [`SeekMode::Stop`](crate::SeekMode::Stop), the band limit was reached.
    ///
    /// # Important Notes
    /// - The seek fail flag (SFBL) is latched before SEEK is cleared, since
    ///   clearing SEEK also clears the status bits
    /// - On failure the device stays on whatever channel the seek ended at
    ///
    /// # Errors
    /// * `Error::Bus` - a register transfer failed
    /// * `Error::Timeout` - STC did not change within the poll limit. SEEK is
    ///   cleared again before returning when STC never came up.
    pub fn seek(&mut self, direction: SeekDirection) -> Result<Option<u16>, Error<I2C::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("si4703: seek {}", direction);

        self.modify_registers(|shadow| {
            shadow.set(fields::SEEKUP, direction as u16);
            shadow.set_flag(fields::SEEK, true);
        })?;
        self.wait_for_seek_tune_complete(true, SEEK_POLL_INTERVAL_MS)
            .map_err(|e| self.clear_trigger_after(fields::SEEK, e))?;

        self.refresh_shadow()?;
        let failed = self.shadow.flag(fields::SFBL);
        self.shadow.set_flag(fields::SEEK, false);
        self.commit_control_registers()?;
        self.wait_for_seek_tune_complete(false, 0)?;

        if failed {
            #[cfg(feature = "defmt")]
            defmt::debug!("si4703: seek found no station");
            return Ok(None);
        }
        self.channel().map(Some)
    }

    /// Clears `trigger` after its completion wait timed out.
    ///
    /// The device only starts a tune or seek on a 0 to 1 transition of the
    /// trigger bit. The cleanup is best effort: `error` is returned either way.
    fn clear_trigger_after(
        &mut self,
        trigger: Field,
        error: Error<I2C::Error>,
    ) -> Error<I2C::Error> {
        if matches!(error, Error::Timeout) {
            let _ = self.modify_registers(|shadow| shadow.set_flag(trigger, false));
        }
        error
    }

    /// Polls STC until it reads `complete`.
    fn wait_for_seek_tune_complete(
        &mut self,
        complete: bool,
        interval_ms: u32,
    ) -> Result<(), Error<I2C::Error>> {
        for _ in 0..self.config.poll_limit {
            if self.refresh_shadow()?.flag(fields::STC) == complete {
                return Ok(());
            }
            if interval_ms > 0 {
                self.delay.delay_ms(interval_ms);
            }
        }

        #[cfg(feature = "defmt")]
        defmt::warn!(
            "si4703: STC still {=bool} after {=u32} polls",
            !complete,
            self.config.poll_limit
        );
        Err(Error::Timeout)
    }
}
