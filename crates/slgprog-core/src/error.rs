//! Error types for slgprog-core
//!
//! This module provides a no_std compatible error type that can be used
//! throughout the crate.

use core::fmt;

use crate::programmer::TransportError;
use crate::protocol::OpKind;

/// Details about an image that could not be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageError {
    /// The image ends before the last data byte of page 15
    TooShort {
        /// Length of the supplied image
        len: usize,
        /// Minimum length that covers every page
        required: usize,
    },
    /// A data field does not hold two hexadecimal digits
    InvalidHex {
        /// Page the field belongs to
        page: u8,
        /// Byte offset within the page
        offset: u8,
        /// Position of the first character in the image
        position: usize,
    },
}

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    // Configuration errors
    /// Slave identifier does not fit in 4 bits
    InvalidSlaveId(u8),
    /// Region name is neither NVM nor EEPROM
    InvalidRegion,

    // Image errors
    /// HEX image is too short or holds non-hex characters
    MalformedImage(ImageError),

    // Device errors
    /// A bus transaction failed; the operation stopped at `page`
    Transport {
        /// Operation that was running
        op: OpKind,
        /// Page whose transaction failed
        page: u8,
        /// Error reported by the bus adapter
        source: TransportError,
    },
    /// Read-back after a write does not match the image
    VerifyMismatch {
        /// Page of the first differing byte
        page: u8,
        /// Offset of the first differing byte
        offset: u8,
        /// Byte from the image
        expected: u8,
        /// Byte read from the device
        found: u8,
    },
    /// The operator did not confirm the power cycle
    PowerCycleAborted,
}

impl From<ImageError> for Error {
    fn from(err: ImageError) -> Self {
        Self::MalformedImage(err)
    }
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { len, required } => write!(
                f,
                "image is {} bytes long, at least {} bytes are required",
                len, required
            ),
            Self::InvalidHex {
                page,
                offset,
                position,
            } => write!(
                f,
                "invalid hex digits for page {} offset {} at byte {}",
                page, offset, position
            ),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSlaveId(id) => write!(f, "slave id {} is out of range 0-15", id),
            Self::InvalidRegion => write!(f, "target must be one of NVM or EEPROM"),
            Self::MalformedImage(err) => write!(f, "malformed HEX image: {}", err),
            Self::Transport { op, page, source } => write!(
                f,
                "{} failed at page {} (offset 0x{:02X}): {}",
                op,
                page,
                page << 4,
                source
            ),
            Self::VerifyMismatch {
                page,
                offset,
                expected,
                found,
            } => write!(
                f,
                "verify failed at page {} offset {}: expected 0x{:02X}, found 0x{:02X}",
                page, offset, expected, found
            ),
            Self::PowerCycleAborted => write!(f, "power cycle was not confirmed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ImageError {}

#[cfg(feature = "std")]
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MalformedImage(err) => Some(err),
            Self::Transport { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
