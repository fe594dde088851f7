//! slgprog-core - Protocol core for programming SLG46xxx devices
//!
//! This crate turns the three device-level operations (read, write and erase
//! of a whole region) into correctly addressed and correctly timed I2C
//! transactions, and decodes the fixed-width HEX images the write operation
//! consumes. It is `no_std` compatible; the bus itself is reached through the
//! [`programmer::I2cMaster`] trait which backends implement.
//!
//! # Features
//!
//! - `std` - Enable standard library support (`std::error::Error` impls and
//!   OS error messages in transport errors)
//!
//! # Example
//!
//! ```ignore
//! use slgprog_core::device::{Region, SlaveId};
//! use slgprog_core::programmer::I2cMaster;
//! use slgprog_core::session::{NoProgress, ProgrammingSession};
//!
//! fn dump<M: I2cMaster>(master: &mut M) -> slgprog_core::Result<()> {
//!     let session = ProgrammingSession::new(SlaveId::new(1)?, Region::Nvm);
//!     let pages = session.read(master, &mut NoProgress)?;
//!     for (page, data) in pages.iter() {
//!         println!("{:02X}: {:02X?}", page << 4, data);
//!     }
//!     Ok(())
//! }
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(any(feature = "std", test))]
extern crate std;

pub mod device;
pub mod error;
pub mod image;
pub mod programmer;
pub mod protocol;
pub mod sequence;
pub mod session;

pub use error::{Error, Result};
