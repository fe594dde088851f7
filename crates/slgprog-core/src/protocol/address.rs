//! Control code encoding

use core::fmt;

use crate::device::{Region, SlaveId};

/// Command class selector for NVM configuration access
pub const NVM_CONFIG: u8 = 0b10;

/// Command class selector for EEPROM configuration access
pub const EEPROM_CONFIG: u8 = 0b11;

/// Erase payload pattern selecting the NVM region
pub const ERASE_NVM: u8 = 0x80;

/// Erase payload pattern selecting the EEPROM region
pub const ERASE_EEPROM: u8 = 0x90;

/// Device-level operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    /// Read a page back
    Read,
    /// Program a page
    Write,
    /// Erase a page
    Erase,
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
            Self::Erase => write!(f, "erase"),
        }
    }
}

/// 2-bit selector placed in the address for reads and writes
pub const fn region_bits(region: Region) -> u8 {
    match region {
        Region::Nvm => NVM_CONFIG,
        Region::Eeprom => EEPROM_CONFIG,
    }
}

/// High-bit pattern combined with the page index in the erase payload
pub const fn erase_selector(region: Region) -> u8 {
    match region {
        Region::Nvm => ERASE_NVM,
        Region::Eeprom => ERASE_EEPROM,
    }
}

/// 7-bit I2C address for an operation on `region` of device `slave`
///
/// Erase is addressed to the bare slave identifier; the region travels in the
/// command payload instead (see [`erase_selector`]).
pub const fn control_code(slave: SlaveId, region: Region, kind: OpKind) -> u8 {
    let base = slave.get() << 3;
    match kind {
        OpKind::Read | OpKind::Write => base | region_bits(region),
        OpKind::Erase => base,
    }
}
