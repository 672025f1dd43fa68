//! Register model for the Si4703
//!
//! The Si4703 exposes sixteen 16-bit registers (0x00-0x0F) but offers no
//! per-register addressing over the 2-wire bus. Every read is a burst that
//! starts at 0x0A and wraps around through 0x00-0x09, and every write is a
//! burst that starts at 0x02 and covers the six control registers
//! 0x02-0x07.
//!
//! The driver therefore keeps a [`ShadowRegisters`] image of the whole map
//! and manipulates individual bit fields through the [`Field`] descriptors in
//! [`fields`]. The image is decoded from / encoded into bus frames with the
//! `regiface` byte array traits:
//! - [`ShadowRegisters`] implements [`FromByteArray`] for the 32-byte read frame
//! - [`ControlBlock`] implements [`ToByteArray`] for the 12-byte write frame
//!
//! # Important Notes
//! - The image is only valid between a refresh and the next hardware change
//! - Status, identity and RDS registers are never part of a write burst
//! - Register 0x08 (TEST2) and 0x09 (BOOTCONFIG) are read-only for the driver

pub mod fields;
mod status;

use core::convert::Infallible;

use regiface::{FromByteArray, ToByteArray};

pub use fields::Field;
pub use status::*;

/// Number of registers in the device map.
pub const REGISTER_COUNT: usize = 16;

/// Number of writable control registers (0x02-0x07).
pub const CONTROL_REGISTER_COUNT: usize = 6;

/// Length of a full read burst in bytes.
pub const READ_FRAME_LEN: usize = 2 * REGISTER_COUNT;

/// Length of a control write burst in bytes.
pub const WRITE_FRAME_LEN: usize = 2 * CONTROL_REGISTER_COUNT;

/// Si4703 register addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    /// Part number and manufacturer id
    DeviceId = 0x00,
    /// Chip revision, device and firmware version
    ChipId = 0x01,
    /// Power, mute, mono and seek control
    PowerCfg = 0x02,
    /// Channel select and tune trigger
    Channel = 0x03,
    /// GPIO, de-emphasis, RDS, AGC and interrupt enables
    SysConfig1 = 0x04,
    /// Seek threshold, band, spacing and volume
    SysConfig2 = 0x05,
    /// Softmute, extended volume and seek quality thresholds
    SysConfig3 = 0x06,
    /// Crystal oscillator and audio high-Z enables
    Test1 = 0x07,
    /// Reserved
    Test2 = 0x08,
    /// Reserved
    BootConfig = 0x09,
    /// RSSI and seek/tune status
    StatusRssi = 0x0A,
    /// Tuned channel and RDS block errors
    ReadChan = 0x0B,
    /// RDS block A
    RdsA = 0x0C,
    /// RDS block B
    RdsB = 0x0D,
    /// RDS block C
    RdsC = 0x0E,
    /// RDS block D
    RdsD = 0x0F,
}

impl Register {
    /// First register returned by a read burst.
    pub const READ_START: Register = Register::StatusRssi;

    /// First register covered by a write burst.
    pub const WRITE_START: Register = Register::PowerCfg;
}

/// Local mirror of the full device register map, indexed by register address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ShadowRegisters {
    words: [u16; REGISTER_COUNT],
}

impl ShadowRegisters {
    /// Creates an all-zero image.
    pub const fn new() -> Self {
        Self {
            words: [0; REGISTER_COUNT],
        }
    }

    /// Creates an image from raw words indexed by register address.
    pub const fn from_words(words: [u16; REGISTER_COUNT]) -> Self {
        Self { words }
    }

    /// Raw words indexed by register address.
    pub const fn words(&self) -> &[u16; REGISTER_COUNT] {
        &self.words
    }

    /// Raw value of one register.
    pub const fn word(&self, register: Register) -> u16 {
        self.words[register as usize]
    }

    /// Overwrites the raw value of one register.
    pub fn set_word(&mut self, register: Register, value: u16) {
        self.words[register as usize] = value;
    }

    /// Reads a bit field.
    pub const fn get(&self, field: Field) -> u16 {
        field.extract(self.word(field.register))
    }

    /// Writes a bit field, truncating `value` to the field width.
    pub fn set(&mut self, field: Field, value: u16) {
        let word = self.word(field.register);
        self.set_word(field.register, field.insert(word, value));
    }

    /// Reads a single-bit field.
    pub const fn flag(&self, field: Field) -> bool {
        self.get(field) != 0
    }

    /// Writes a single-bit field.
    pub fn set_flag(&mut self, field: Field, enabled: bool) {
        self.set(field, enabled as u16);
    }

    /// The six writable control registers, in ascending address order.
    pub fn control_block(&self) -> ControlBlock {
        let start = Register::WRITE_START as usize;
        let mut words = [0u16; CONTROL_REGISTER_COUNT];
        words.copy_from_slice(&self.words[start..start + CONTROL_REGISTER_COUNT]);
        ControlBlock(words)
    }
}

/// Decodes a read burst.
///
/// The device returns its registers starting at 0x0A, each as a big-endian
/// word, and wraps to 0x00 after 0x0F. Words are stored at their own address
/// so the wrap is invisible to the rest of the driver.
impl FromByteArray for ShadowRegisters {
    type Error = Infallible;
    type Array = [u8; READ_FRAME_LEN];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        let mut words = [0u16; REGISTER_COUNT];
        for (i, pair) in bytes.chunks_exact(2).enumerate() {
            let addr = (Register::READ_START as usize + i) % REGISTER_COUNT;
            words[addr] = u16::from_be_bytes([pair[0], pair[1]]);
        }
        Ok(Self { words })
    }
}

/// Control registers 0x02-0x07 as written to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlBlock(pub [u16; CONTROL_REGISTER_COUNT]);

impl ToByteArray for ControlBlock {
    type Error = Infallible;
    type Array = [u8; WRITE_FRAME_LEN];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let mut arr = [0u8; WRITE_FRAME_LEN];
        for (i, word) in self.0.iter().enumerate() {
            let bytes = word.to_be_bytes();
            arr[2 * i] = bytes[0];
            arr[2 * i + 1] = bytes[1];
        }
        Ok(arr)
    }
}
