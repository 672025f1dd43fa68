#![no_std]
//! Si4703 FM Tuner Driver
//!
//! This crate provides a type-safe interface for the Silicon Labs Si4703
//! broadcast FM radio tuner over its 2-wire (I2C) bus. The Si4703 is a
//! single-chip FM receiver with an integrated RDS/RBDS decoder and a 16-step
//! volume control.
//!
//! # Features
//! - Bands: 87.5-108 MHz (US/Europe), 76-108 MHz (Japan wide), 76-90 MHz (Japan)
//! - Channel spacing: 200, 100 or 50 kHz
//! - Tuning and seeking with configurable RSSI, impulse and SNR thresholds
//! - Volume, mute, forced mono, extended volume range and softmute
//! - Three programmable GPIO pins
//! - Raw RDS block access
//!
//! # Architecture
//! The driver is organized into several modules:
//!
//! - [`registers`]: Register map and bit fields
//!   - [`registers::fields`]: Field descriptor table for every register
//!   - Shadow image, read/write frame encoding and decoded status views
//!
//! - [`device`]: Raw bus transport
//!   - One 32-byte burst read and one 12-byte burst write
//!
//! - [`Si4703`]: Driver built on a shadow copy of the registers
//!   - Power sequencing, tuning, seeking, audio and status accessors
//!
//! - [`config`]: Region, seek and audio settings plus frequency/channel
//!   conversion
//!
//! - [`control`]: Encoder driven front panel loop over the [`control::Tuner`]
//!   trait
//!
//! # Usage
//! The device cannot read or write a single register. Every change is a
//! read-modify-write of the whole control block: the driver refreshes its
//! shadow image with one burst read, edits fields locally and writes
//! registers 0x02-0x07 back in one burst. The `regiface` crate provides the
//! frame conversion for both bursts.
//!
//! Bring-up follows a specific sequence, performed by [`Si4703::start`]:
//!
//! 1. Hold reset low with SDIO low, then release reset to select 2-wire mode
//! 2. Enable the crystal oscillator and wait 500 ms
//! 3. Enable the device, un-mute, and wait 110 ms
//! 4. Apply the band, spacing, seek and audio settings from [`Config`]
//!
//! # Important Notes
//! - All frequencies are in units of 10 kHz (10240 is 102.40 MHz)
//! - Tune and seek block until the device reports completion; bound the wait
//!   with [`Config::with_poll_limit`]
//! - A failed seek returns `Ok(None)`, not an error
//! - The DMUTE bit is a *disable mute* bit: `set_mute(true)` makes the audio
//!   audible. [`Si4703::set_audible`] is the same call under a clearer name
//! - Out of range frequencies and volumes are clamped, never rejected
//!
//! # Example
//! ```no_run
//! use embedded_hal::{delay::DelayNs, digital::OutputPin, i2c::I2c};
//! use si4703::{Band, Config, Error, Si4703};
//!
//! fn listen<I, R, S, D>(i2c: I, reset: R, sdio: &mut S, delay: D) -> Result<(), Error<I::Error>>
//! where
//!     I: I2c,
//!     R: OutputPin,
//!     S: OutputPin,
//!     D: DelayNs,
//! {
//!     let config = Config::default().with_band(Band::UsEurope);
//!     let mut radio = Si4703::new(i2c, reset, delay, config);
//!
//!     radio.start(sdio)?;
//!     radio.set_volume(8)?;
//!
//!     match radio.seek_up()? {
//!         Some(frequency) => { let _ = frequency; }
//!         None => { radio.set_channel(radio.band_start())?; }
//!     }
//!
//!     Ok(())
//! }
//! ```

#[cfg(test)]
extern crate std;

pub mod config;
pub mod control;
pub mod device;
mod error;
pub mod registers;
mod tuner;

pub use config::*;
pub use control::{ControlEvent, ControlLoop, DisplayState, Encoder, EncoderMode, Tuner};
pub use device::Device;
pub use error::Error;
pub use registers::{DeviceIdentity, RdsBlocks, Status, StatusFlags};
pub use tuner::{PowerState, Si4703, MAX_VOLUME, SEEK_POLL_INTERVAL_MS};
