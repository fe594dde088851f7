//! Programmer trait definitions

use core::fmt;

/// One message of a combined I2C transaction
///
/// Messages of a transaction are separated by repeated starts; the bus is
/// released after the last one.
#[derive(Debug)]
pub enum I2cMessage<'a> {
    /// Send `data` to the 7-bit `address`
    Write {
        /// 7-bit target address
        address: u8,
        /// Bytes to send
        data: &'a [u8],
    },
    /// Fill `buf` with bytes read from the 7-bit `address`
    Read {
        /// 7-bit target address
        address: u8,
        /// Buffer sized to the number of bytes to read
        buf: &'a mut [u8],
    },
}

impl I2cMessage<'_> {
    /// Target address of the message
    pub fn address(&self) -> u8 {
        match self {
            Self::Write { address, .. } | Self::Read { address, .. } => *address,
        }
    }

    /// Number of bytes transferred
    pub fn len(&self) -> usize {
        match self {
            Self::Write { data, .. } => data.len(),
            Self::Read { buf, .. } => buf.len(),
        }
    }

    /// Whether the message carries no bytes
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the message reads from the device
    pub fn is_read(&self) -> bool {
        matches!(self, Self::Read { .. })
    }
}

/// Failure reported by a bus adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The addressed device did not acknowledge
    Nack {
        /// Address that was not acknowledged
        address: u8,
    },
    /// The operating system rejected the transaction
    Os {
        /// Raw OS error code
        errno: i32,
    },
    /// The adapter cannot perform this kind of transaction
    Unsupported,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nack { address } => {
                write!(f, "no acknowledgment from address 0x{:02X}", address)
            }
            #[cfg(feature = "std")]
            Self::Os { errno } => write!(
                f,
                "{} (errno={})",
                std::io::Error::from_raw_os_error(*errno),
                errno
            ),
            #[cfg(not(feature = "std"))]
            Self::Os { errno } => write!(f, "bus transaction failed (errno={})", errno),
            Self::Unsupported => write!(f, "transaction not supported by the adapter"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TransportError {}

/// I2C master able to run combined transactions
///
/// This trait represents the host adapter the device hangs off. The protocol
/// layer only ever has one transaction outstanding and never retries.
pub trait I2cMaster {
    /// Execute all `msgs` as one combined transaction
    ///
    /// Read messages have their buffers filled on success. On failure the
    /// contents of read buffers are unspecified.
    fn transfer(&mut self, msgs: &mut [I2cMessage<'_>]) -> Result<(), TransportError>;

    /// Delay for the specified number of microseconds
    fn delay_us(&mut self, us: u32);
}
