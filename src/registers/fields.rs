//! Bit field table
//!
//! Every named field of the register map is described once, as data, by a
//! [`Field`] constant: the register it lives in, its least significant bit
//! and its width. Field names follow the Si4703 datasheet (AN230 / Si4702-03
//! rev 1.1).

use super::Register;

/// Location of a bit field inside a register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Field {
    /// Datasheet name of the field
    pub name: &'static str,
    /// Register holding the field
    pub register: Register,
    /// Position of the least significant bit
    pub offset: u8,
    /// Width in bits (1-16)
    pub width: u8,
}

impl Field {
    /// Describes a field.
    pub const fn new(name: &'static str, register: Register, offset: u8, width: u8) -> Self {
        Self {
            name,
            register,
            offset,
            width,
        }
    }

    /// Mask of the field, in register position.
    pub const fn mask(&self) -> u16 {
        self.max() << self.offset
    }

    /// Largest value the field can hold.
    pub const fn max(&self) -> u16 {
        ((1u32 << self.width) - 1) as u16
    }

    /// Extracts the field from a register word.
    pub const fn extract(&self, word: u16) -> u16 {
        (word & self.mask()) >> self.offset
    }

    /// Returns `word` with the field replaced by `value`.
    pub const fn insert(&self, word: u16, value: u16) -> u16 {
        (word & !self.mask()) | ((value & self.max()) << self.offset)
    }
}

// DEVICEID (0x00)
pub const PN: Field = Field::new("PN", Register::DeviceId, 12, 4);
pub const MFGID: Field = Field::new("MFGID", Register::DeviceId, 0, 12);

// CHIPID (0x01)
pub const REV: Field = Field::new("REV", Register::ChipId, 10, 6);
pub const DEV: Field = Field::new("DEV", Register::ChipId, 6, 4);
pub const FIRMWARE: Field = Field::new("FIRMWARE", Register::ChipId, 0, 6);

// POWERCFG (0x02)
/// Softmute disable (1 = softmute disabled)
pub const DSMUTE: Field = Field::new("DSMUTE", Register::PowerCfg, 15, 1);
/// Mute disable: 1 = audio audible, 0 = muted
pub const DMUTE: Field = Field::new("DMUTE", Register::PowerCfg, 14, 1);
pub const MONO: Field = Field::new("MONO", Register::PowerCfg, 13, 1);
pub const RDSM: Field = Field::new("RDSM", Register::PowerCfg, 11, 1);
pub const SKMODE: Field = Field::new("SKMODE", Register::PowerCfg, 10, 1);
pub const SEEKUP: Field = Field::new("SEEKUP", Register::PowerCfg, 9, 1);
pub const SEEK: Field = Field::new("SEEK", Register::PowerCfg, 8, 1);
pub const DISABLE: Field = Field::new("DISABLE", Register::PowerCfg, 6, 1);
pub const ENABLE: Field = Field::new("ENABLE", Register::PowerCfg, 0, 1);

// CHANNEL (0x03)
pub const TUNE: Field = Field::new("TUNE", Register::Channel, 15, 1);
pub const CHAN: Field = Field::new("CHAN", Register::Channel, 0, 10);

// SYSCONFIG1 (0x04)
pub const RDSIEN: Field = Field::new("RDSIEN", Register::SysConfig1, 15, 1);
/// Seek/tune complete interrupt enable
pub const STCIEN: Field = Field::new("STCIEN", Register::SysConfig1, 14, 1);
pub const RDS: Field = Field::new("RDS", Register::SysConfig1, 12, 1);
pub const DE: Field = Field::new("DE", Register::SysConfig1, 11, 1);
pub const AGCD: Field = Field::new("AGCD", Register::SysConfig1, 10, 1);
pub const BLNDADJ: Field = Field::new("BLNDADJ", Register::SysConfig1, 6, 2);
pub const GPIO3: Field = Field::new("GPIO3", Register::SysConfig1, 4, 2);
pub const GPIO2: Field = Field::new("GPIO2", Register::SysConfig1, 2, 2);
pub const GPIO1: Field = Field::new("GPIO1", Register::SysConfig1, 0, 2);

// SYSCONFIG2 (0x05)
pub const SEEKTH: Field = Field::new("SEEKTH", Register::SysConfig2, 8, 8);
pub const BAND: Field = Field::new("BAND", Register::SysConfig2, 6, 2);
pub const SPACE: Field = Field::new("SPACE", Register::SysConfig2, 4, 2);
pub const VOLUME: Field = Field::new("VOLUME", Register::SysConfig2, 0, 4);

// SYSCONFIG3 (0x06)
pub const SMUTER: Field = Field::new("SMUTER", Register::SysConfig3, 14, 2);
pub const SMUTEA: Field = Field::new("SMUTEA", Register::SysConfig3, 12, 2);
pub const VOLEXT: Field = Field::new("VOLEXT", Register::SysConfig3, 8, 1);
pub const SKSNR: Field = Field::new("SKSNR", Register::SysConfig3, 4, 4);
pub const SKCNT: Field = Field::new("SKCNT", Register::SysConfig3, 0, 4);

// TEST1 (0x07)
pub const XOSCEN: Field = Field::new("XOSCEN", Register::Test1, 15, 1);
pub const AHIZEN: Field = Field::new("AHIZEN", Register::Test1, 14, 1);

// STATUSRSSI (0x0A)
pub const RDSR: Field = Field::new("RDSR", Register::StatusRssi, 15, 1);
/// Seek/tune complete
pub const STC: Field = Field::new("STC", Register::StatusRssi, 14, 1);
/// Seek fail / band limit
pub const SFBL: Field = Field::new("SFBL", Register::StatusRssi, 13, 1);
pub const AFCRL: Field = Field::new("AFCRL", Register::StatusRssi, 12, 1);
pub const RDSS: Field = Field::new("RDSS", Register::StatusRssi, 11, 1);
pub const BLERA: Field = Field::new("BLERA", Register::StatusRssi, 9, 2);
pub const ST: Field = Field::new("ST", Register::StatusRssi, 8, 1);
pub const RSSI: Field = Field::new("RSSI", Register::StatusRssi, 0, 8);

// READCHAN (0x0B)
pub const BLERB: Field = Field::new("BLERB", Register::ReadChan, 14, 2);
pub const BLERC: Field = Field::new("BLERC", Register::ReadChan, 12, 2);
pub const BLERD: Field = Field::new("BLERD", Register::ReadChan, 10, 2);
pub const READCHAN: Field = Field::new("READCHAN", Register::ReadChan, 0, 10);

/// Every named field, grouped by register.
pub const ALL: [Field; 48] = [
    PN, MFGID, REV, DEV, FIRMWARE, DSMUTE, DMUTE, MONO, RDSM, SKMODE, SEEKUP, SEEK, DISABLE,
    ENABLE, TUNE, CHAN, RDSIEN, STCIEN, RDS, DE, AGCD, BLNDADJ, GPIO3, GPIO2, GPIO1, SEEKTH,
    BAND, SPACE, VOLUME, SMUTER, SMUTEA, VOLEXT, SKSNR, SKCNT, XOSCEN, AHIZEN, RDSR, STC, SFBL,
    AFCRL, RDSS, BLERA, ST, RSSI, BLERB, BLERC, BLERD, READCHAN,
];

/// Looks a field up by its datasheet name.
pub fn by_name(name: &str) -> Option<Field> {
    ALL.iter().copied().find(|field| field.name == name)
}
