//! slgprog-linux-i2c - Linux i2c-dev support
//!
//! This crate provides access to SLG46xxx devices through the Linux
//! `/dev/i2c-N` character devices.
//!
//! # Overview
//!
//! Every I2C adapter the kernel knows about is exposed as `/dev/i2c-N` once
//! the `i2c-dev` module is loaded. Transactions are issued with the
//! `I2C_RDWR` ioctl, which runs a write followed by a read as one combined
//! transfer with a repeated start in between, as page reads require.
//!
//! # Example
//!
//! ```no_run
//! use slgprog_linux_i2c::{LinuxI2c, LinuxI2cConfig};
//! use slgprog_core::device::{Region, SlaveId};
//! use slgprog_core::session::{NoProgress, ProgrammingSession};
//!
//! let mut bus = LinuxI2c::open(&LinuxI2cConfig::for_bus(1))?;
//!
//! let session = ProgrammingSession::new(SlaveId::new(1)?, Region::Nvm);
//! let pages = session.read(&mut bus, &mut NoProgress)?;
//! println!("{:02X?}", pages.page(0));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Usage with slgprog CLI
//!
//! ```bash
//! # Dump the NVM of the device with id 1 on /dev/i2c-1
//! slgprog read 1
//!
//! # Erase the EEPROM of device 3
//! slgprog erase -t eeprom -i 3 1
//! ```
//!
//! # System Requirements
//!
//! - Linux kernel with `CONFIG_I2C_CHARDEV` (module `i2c-dev`)
//! - An adapter supporting plain I2C transfers (not SMBus-only)
//! - Read/write access to `/dev/i2c-N`, e.g. via the `i2c` group

pub mod device;
pub mod error;

// Re-exports
pub use device::{parse_options, I2cFuncs, LinuxI2c, LinuxI2cConfig};
pub use error::{LinuxI2cError, Result};
