//! Bus adapter abstraction
//!
//! Backends implement [`I2cMaster`] to run combined I2C transactions for the
//! protocol layer.

mod traits;

#[cfg(test)]
pub(crate) mod mock;

pub use traits::{I2cMaster, I2cMessage, TransportError};
