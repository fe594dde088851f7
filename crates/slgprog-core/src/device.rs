//! Device geometry and configuration types
//!
//! An SLG46xxx exposes two independently addressable regions (NVM
//! configuration and EEPROM), each seen through this protocol as 16 pages of
//! 16 bytes.

use core::fmt;
use core::str::FromStr;

use crate::error::{Error, Result};

/// Bytes per page
pub const PAGE_SIZE: usize = 16;

/// Pages per region
pub const PAGE_COUNT: usize = 16;

/// Bytes per region as exposed by the page protocol
pub const REGION_SIZE: usize = PAGE_SIZE * PAGE_COUNT;

/// Highest valid slave identifier (4 bits)
pub const MAX_SLAVE_ID: u8 = 0x0F;

/// Slave identifier used by factory-fresh devices
pub const DEFAULT_SLAVE_ID: u8 = 0x01;

/// Pause after every page write or erase, in microseconds
///
/// The device has no page-completion acknowledgment; it needs this quiescent
/// period to commit a page internally before it accepts the next command.
pub const SETTLE_DELAY_US: u32 = 20_000;

/// Iterate page indices in the order the device commits them
pub fn pages() -> impl Iterator<Item = u8> {
    0..PAGE_COUNT as u8
}

/// Identifier of one device among up to 16 sharing a bus
///
/// Always fits in 4 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlaveId(u8);

impl SlaveId {
    /// Validate and wrap a raw slave identifier
    pub fn new(id: u8) -> Result<Self> {
        if id > MAX_SLAVE_ID {
            return Err(Error::InvalidSlaveId(id));
        }
        Ok(Self(id))
    }

    /// Raw 4-bit value
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for SlaveId {
    fn default() -> Self {
        Self(DEFAULT_SLAVE_ID)
    }
}

impl TryFrom<u8> for SlaveId {
    type Error = Error;

    fn try_from(id: u8) -> Result<Self> {
        Self::new(id)
    }
}

impl fmt::Display for SlaveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Storage region targeted by an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Region {
    /// Non-volatile configuration memory
    #[default]
    Nvm,
    /// User EEPROM
    Eeprom,
}

impl Region {
    /// Lower-case name as accepted on the command line
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nvm => "nvm",
            Self::Eeprom => "eeprom",
        }
    }
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("nvm") {
            Ok(Self::Nvm)
        } else if s.eq_ignore_ascii_case("eeprom") {
            Ok(Self::Eeprom)
        } else {
            Err(Error::InvalidRegion)
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nvm => write!(f, "NVM"),
            Self::Eeprom => write!(f, "EEPROM"),
        }
    }
}

/// Complete contents of one region, rows are pages in ascending order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBuffer {
    pages: [[u8; PAGE_SIZE]; PAGE_COUNT],
}

impl PageBuffer {
    /// A buffer with every byte set to `value`
    pub const fn filled(value: u8) -> Self {
        Self {
            pages: [[value; PAGE_SIZE]; PAGE_COUNT],
        }
    }

    /// Wrap a fully populated page matrix
    pub const fn from_pages(pages: [[u8; PAGE_SIZE]; PAGE_COUNT]) -> Self {
        Self { pages }
    }

    /// Build a buffer from a flat region image
    pub fn from_bytes(bytes: &[u8; REGION_SIZE]) -> Self {
        let mut buf = Self::default();
        for (page, chunk) in buf.pages.iter_mut().zip(bytes.chunks_exact(PAGE_SIZE)) {
            page.copy_from_slice(chunk);
        }
        buf
    }

    /// Data bytes of one page
    ///
    /// Panics if `page` is not below [`PAGE_COUNT`].
    pub fn page(&self, page: u8) -> &[u8; PAGE_SIZE] {
        &self.pages[usize::from(page)]
    }

    /// Mutable data bytes of one page
    pub fn page_mut(&mut self, page: u8) -> &mut [u8; PAGE_SIZE] {
        &mut self.pages[usize::from(page)]
    }

    /// Iterate `(page index, data)` in ascending page order
    pub fn iter(&self) -> impl Iterator<Item = (u8, &[u8; PAGE_SIZE])> + '_ {
        pages().zip(self.pages.iter())
    }

    /// Iterate all bytes in page-then-offset order
    pub fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.pages.iter().flat_map(|page| page.iter().copied())
    }

    /// First position where `self` and `other` differ
    ///
    /// Returns `(page, offset, self byte, other byte)`.
    pub fn first_difference(&self, other: &Self) -> Option<(u8, u8, u8, u8)> {
        self.iter().find_map(|(page, data)| {
            data.iter()
                .zip(other.page(page).iter())
                .position(|(a, b)| a != b)
                .map(|offset| {
                    (
                        page,
                        offset as u8,
                        data[offset],
                        other.page(page)[offset],
                    )
                })
        })
    }
}

impl Default for PageBuffer {
    fn default() -> Self {
        Self::filled(0x00)
    }
}
