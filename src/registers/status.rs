//! Read-only register views
//!
//! Decoded snapshots of the status (0x0A), read-channel (0x0B), identity
//! (0x00-0x01) and RDS (0x0C-0x0F) registers. Each view is built from one
//! refreshed [`ShadowRegisters`] image and is not kept up to date afterwards.

use bitflags::bitflags;

use super::{fields, Register, ShadowRegisters};

bitflags! {
    /// Status flags of the STATUSRSSI register (0x0A)
    ///
    /// Bits are kept in their register position so the flags can be built
    /// straight from the register word.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StatusFlags: u16 {
        /// RDS group ready (RDSR)
        const RDS_READY = 1 << 15;
        /// Seek or tune operation complete (STC)
        /// Stays set until the SEEK or TUNE bit is cleared
        const SEEK_TUNE_COMPLETE = 1 << 14;
        /// Seek failed or hit the band limit (SFBL)
        const SEEK_FAIL_BAND_LIMIT = 1 << 13;
        /// AFC railed, the tuned channel may be invalid (AFCRL)
        const AFC_RAIL = 1 << 12;
        /// RDS decoder synchronized (RDSS)
        const RDS_SYNC = 1 << 11;
        /// Stereo pilot detected (ST)
        const STEREO = 1 << 8;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StatusFlags {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "StatusFlags({=u16:#06x})", self.bits())
    }
}

/// Decoded STATUSRSSI register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    /// Received signal strength, dBµV (0-75 typical)
    pub rssi: u8,
    /// Status flags
    pub flags: StatusFlags,
}

impl Status {
    /// Decodes the status register of an image.
    pub fn from_shadow(shadow: &ShadowRegisters) -> Self {
        let word = shadow.word(Register::StatusRssi);
        Self {
            rssi: shadow.get(fields::RSSI) as u8,
            flags: StatusFlags::from_bits_truncate(word),
        }
    }

    /// Seek/tune complete flag.
    pub fn is_complete(&self) -> bool {
        self.flags.contains(StatusFlags::SEEK_TUNE_COMPLETE)
    }

    /// Stereo indicator.
    pub fn is_stereo(&self) -> bool {
        self.flags.contains(StatusFlags::STEREO)
    }
}

/// Device identity, from DEVICEID (0x00) and CHIPID (0x01)
///
/// # Important Notes
/// - A Si4703 reports manufacturer id 0x242 and part number 0x1
/// - DEV reads 0b1001 for a powered-up Si4703 and 0b1000 while disabled
/// - FIRMWARE reads 0 until the device is powered up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceIdentity {
    /// Part number (PN)
    pub part_number: u8,
    /// Manufacturer id (MFGID)
    pub manufacturer_id: u16,
    /// Chip revision (REV)
    pub revision: u8,
    /// Device (DEV)
    pub device: u8,
    /// Firmware version (FIRMWARE)
    pub firmware: u8,
}

impl DeviceIdentity {
    /// Decodes the identity registers of an image.
    pub fn from_shadow(shadow: &ShadowRegisters) -> Self {
        Self {
            part_number: shadow.get(fields::PN) as u8,
            manufacturer_id: shadow.get(fields::MFGID),
            revision: shadow.get(fields::REV) as u8,
            device: shadow.get(fields::DEV) as u8,
            firmware: shadow.get(fields::FIRMWARE) as u8,
        }
    }
}

/// Raw RDS blocks as last latched by the device
///
/// The driver does not decode RDS groups; the words are handed out as read.
/// Block error levels range from 0 (no errors) to 3 (uncorrectable).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RdsBlocks {
    /// A new group is available (RDSR)
    pub ready: bool,
    /// Blocks A, B, C and D
    pub blocks: [u16; 4],
    /// Error levels of blocks A, B, C and D
    pub errors: [u8; 4],
}

impl RdsBlocks {
    /// Decodes the RDS registers of an image.
    pub fn from_shadow(shadow: &ShadowRegisters) -> Self {
        Self {
            ready: shadow.flag(fields::RDSR),
            blocks: [
                shadow.word(Register::RdsA),
                shadow.word(Register::RdsB),
                shadow.word(Register::RdsC),
                shadow.word(Register::RdsD),
            ],
            errors: [
                shadow.get(fields::BLERA) as u8,
                shadow.get(fields::BLERB) as u8,
                shadow.get(fields::BLERC) as u8,
                shadow.get(fields::BLERD) as u8,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_decodes_flags_and_rssi() {
        let mut shadow = ShadowRegisters::new();
        shadow.set_word(Register::StatusRssi, 0x4000 | 0x2000 | 0x0100 | 42);

        let status = Status::from_shadow(&shadow);

        assert_eq!(status.rssi, 42);
        assert!(status.is_complete());
        assert!(status.is_stereo());
        assert!(status.flags.contains(StatusFlags::SEEK_FAIL_BAND_LIMIT));
        assert!(!status.flags.contains(StatusFlags::RDS_READY));
    }

    #[test]
    fn block_error_bits_are_not_flags() {
        let mut shadow = ShadowRegisters::new();
        shadow.set_word(Register::StatusRssi, 0x0600);

        let status = Status::from_shadow(&shadow);

        assert!(status.flags.is_empty());
    }

    #[test]
    fn identity_of_a_powered_si4703() {
        let mut shadow = ShadowRegisters::new();
        shadow.set_word(Register::DeviceId, 0x1242);
        shadow.set_word(Register::ChipId, 0x1253);

        let id = DeviceIdentity::from_shadow(&shadow);

        assert_eq!(id.part_number, 0x1);
        assert_eq!(id.manufacturer_id, 0x242);
        assert_eq!(id.revision, 0x04);
        assert_eq!(id.device, 0b1001);
        assert_eq!(id.firmware, 0x13);
    }

    #[test]
    fn rds_blocks_collect_error_levels() {
        let mut shadow = ShadowRegisters::new();
        shadow.set_word(Register::StatusRssi, 0x8000 | (0b10 << 9));
        shadow.set_word(Register::ReadChan, (0b01 << 14) | (0b11 << 12) | (0b00 << 10) | 149);
        shadow.set_word(Register::RdsA, 0x1234);
        shadow.set_word(Register::RdsD, 0xABCD);

        let rds = RdsBlocks::from_shadow(&shadow);

        assert!(rds.ready);
        assert_eq!(rds.blocks, [0x1234, 0, 0, 0xABCD]);
        assert_eq!(rds.errors, [0b10, 0b01, 0b11, 0b00]);
    }
}
