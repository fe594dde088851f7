//! Linux I2C device implementation
//!
//! This module provides the `LinuxI2c` struct that implements the `I2cMaster`
//! trait using Linux's i2c-dev interface.

use crate::error::{LinuxI2cError, Result};

use bitflags::bitflags;
use slgprog_core::programmer::{I2cMaster, I2cMessage, TransportError};

use std::fs::{File, OpenOptions};
use std::os::unix::io::AsRawFd;

/// Largest message count the kernel accepts in one I2C_RDWR call
const I2C_RDWR_IOCTL_MAX_MSGS: usize = 42;

/// Highest 7-bit address
const MAX_ADDRESS: u8 = 0x7F;

/// Linux i2c-dev ioctl constants
mod ioctl {
    use nix::{ioctl_read_bad, ioctl_write_ptr_bad};

    /// Combined read/write transfer
    pub const I2C_RDWR: u16 = 0x0707;
    /// Get the adapter functionality mask
    pub const I2C_FUNCS: u16 = 0x0705;

    /// Message flag: read data from slave to master
    pub const I2C_M_RD: u16 = 0x0001;

    ioctl_read_bad!(i2c_funcs, I2C_FUNCS, libc::c_ulong);
    ioctl_write_ptr_bad!(i2c_rdwr, I2C_RDWR, super::I2cRdwrIoctlData);
}

bitflags! {
    /// Adapter functionality reported by I2C_FUNCS
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct I2cFuncs: libc::c_ulong {
        /// Plain I2C transactions (I2C_RDWR)
        const I2C             = 0x0000_0001;
        /// 10-bit addressing
        const TEN_BIT_ADDR    = 0x0000_0002;
        /// Protocol mangling flags (I2C_M_IGNORE_NAK and friends)
        const PROTOCOL_MANGLING = 0x0000_0004;
        /// SMBus packet error checking
        const SMBUS_PEC       = 0x0000_0008;
        /// Messages without a repeated start
        const NOSTART         = 0x0000_0010;
        /// Target mode
        const SLAVE           = 0x0000_0020;
    }
}

/// Message structure for I2C_RDWR
/// This must match the kernel's struct i2c_msg layout
#[repr(C)]
#[derive(Debug)]
struct I2cMsg {
    addr: u16,    // __u16 addr
    flags: u16,   // __u16 flags
    len: u16,     // __u16 len
    buf: *mut u8, // __u8 *buf
}

/// Argument of I2C_RDWR, matches struct i2c_rdwr_ioctl_data
#[repr(C)]
#[derive(Debug)]
pub(crate) struct I2cRdwrIoctlData {
    msgs: *mut I2cMsg, // struct i2c_msg *msgs
    nmsgs: u32,        // __u32 nmsgs
}

/// Configuration for opening a Linux I2C bus
#[derive(Debug, Clone, Default)]
pub struct LinuxI2cConfig {
    /// Device path (e.g., "/dev/i2c-1")
    pub device: String,
}

impl LinuxI2cConfig {
    /// Create a new configuration with the given device path
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
        }
    }

    /// Create a configuration for `/dev/i2c-<bus>`
    pub fn for_bus(bus: u32) -> Self {
        Self::new(format!("/dev/i2c-{}", bus))
    }
}

/// Linux I2C programmer using the i2c-dev interface
///
/// This struct implements the `I2cMaster` trait for Linux systems using
/// the `/dev/i2c-N` device interface.
pub struct LinuxI2c {
    /// File handle for the i2c-dev node
    file: File,
    /// Adapter functionality
    funcs: I2cFuncs,
}

impl LinuxI2c {
    /// Open a Linux I2C bus with the given configuration
    pub fn open(config: &LinuxI2cConfig) -> Result<Self> {
        if config.device.is_empty() {
            return Err(LinuxI2cError::NoDevice);
        }

        log::debug!("linux_i2c: Opening device {}", config.device);

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&config.device)
            .map_err(|e| LinuxI2cError::OpenFailed {
                path: config.device.clone(),
                source: e,
            })?;

        let mut raw: libc::c_ulong = 0;
        unsafe {
            ioctl::i2c_funcs(file.as_raw_fd(), &mut raw).map_err(|e| {
                LinuxI2cError::FuncsFailed {
                    path: config.device.clone(),
                    source: std::io::Error::from_raw_os_error(e as i32),
                }
            })?;
        }
        let funcs = I2cFuncs::from_bits_truncate(raw);
        log::debug!("linux_i2c: Adapter functionality {:?}", funcs);

        if !funcs.contains(I2cFuncs::I2C) {
            return Err(LinuxI2cError::NotI2cCapable {
                path: config.device.clone(),
            });
        }

        log::info!("linux_i2c: Opened {}", config.device);

        Ok(Self { file, funcs })
    }

    /// Functionality reported by the adapter
    pub fn funcs(&self) -> I2cFuncs {
        self.funcs
    }

    /// Run `msgs` as one I2C_RDWR transaction
    fn rdwr(&mut self, msgs: &mut [I2cMessage<'_>]) -> Result<()> {
        let mut table = build_msgs(msgs)?;
        let data = I2cRdwrIoctlData {
            msgs: table.as_mut_ptr(),
            nmsgs: table.len() as u32,
        };

        // The kernel writes read results through the buffer pointers in
        // `table`, which borrow from `msgs` for the duration of the call.
        unsafe {
            ioctl::i2c_rdwr(self.file.as_raw_fd(), &data).map_err(|e| {
                LinuxI2cError::TransferFailed(std::io::Error::from_raw_os_error(e as i32))
            })?;
        }

        Ok(())
    }
}

/// Translate protocol messages into the kernel's message table
fn build_msgs(msgs: &mut [I2cMessage<'_>]) -> Result<Vec<I2cMsg>> {
    if msgs.is_empty() || msgs.len() > I2C_RDWR_IOCTL_MAX_MSGS {
        return Err(LinuxI2cError::InvalidParameter(format!(
            "{} messages in one transaction (1-{} allowed)",
            msgs.len(),
            I2C_RDWR_IOCTL_MAX_MSGS
        )));
    }

    msgs.iter_mut()
        .map(|msg| {
            let addr = msg.address();
            if addr > MAX_ADDRESS {
                return Err(LinuxI2cError::InvalidParameter(format!(
                    "address 0x{:02X} is not a 7-bit address",
                    addr
                )));
            }
            let len = u16::try_from(msg.len()).map_err(|_| {
                LinuxI2cError::InvalidParameter(format!("message of {} bytes", msg.len()))
            })?;

            Ok(match msg {
                I2cMessage::Write { data, .. } => I2cMsg {
                    addr: u16::from(addr),
                    flags: 0,
                    len,
                    // Never written through for messages without I2C_M_RD
                    buf: data.as_ptr() as *mut u8,
                },
                I2cMessage::Read { buf, .. } => I2cMsg {
                    addr: u16::from(addr),
                    flags: ioctl::I2C_M_RD,
                    len,
                    buf: buf.as_mut_ptr(),
                },
            })
        })
        .collect()
}

impl I2cMaster for LinuxI2c {
    fn transfer(&mut self, msgs: &mut [I2cMessage<'_>]) -> std::result::Result<(), TransportError> {
        log::debug!(
            "linux_i2c: {} message(s) to 0x{:02X}, {} bytes",
            msgs.len(),
            msgs.first().map(|m| m.address()).unwrap_or(0),
            msgs.iter().map(|m| m.len()).sum::<usize>()
        );

        self.rdwr(msgs).map_err(|e| {
            log::debug!("linux_i2c: {}", e);
            match e {
                LinuxI2cError::TransferFailed(io) => TransportError::Os {
                    errno: io.raw_os_error().unwrap_or(libc::EIO),
                },
                _ => TransportError::Unsupported,
            }
        })
    }

    fn delay_us(&mut self, us: u32) {
        std::thread::sleep(std::time::Duration::from_micros(us as u64));
    }
}

/// Parse programmer options from a list of key-value pairs
pub fn parse_options(options: &[(&str, &str)]) -> std::result::Result<LinuxI2cConfig, String> {
    let mut config = LinuxI2cConfig::default();

    for (key, value) in options {
        match *key {
            "dev" => {
                config.device = value.to_string();
            }
            "bus" => {
                let bus: u32 = value
                    .parse()
                    .map_err(|_| format!("Invalid bus value: {}", value))?;
                config = LinuxI2cConfig::for_bus(bus);
            }
            _ => {
                log::warn!("linux_i2c: Unknown option: {}={}", key, value);
            }
        }
    }

    if config.device.is_empty() {
        return Err("No bus specified. Use bus=<N> or dev=/dev/i2c-N".to_string());
    }

    Ok(config)
}
