//! SLG46xxx I2C protocol
//!
//! The device decodes its 7-bit I2C address as a control code: the upper four
//! bits carry the slave identifier, the lower bits select the command class.
//! Register-style reads and writes pick the region in the address, while the
//! erase command is sent to the plain slave address and names the region in
//! its payload.

pub mod address;
pub mod command;

pub use address::{control_code, erase_selector, region_bits, OpKind};
pub use command::{erase_command, page_offset, read_command, write_command, ERASE_OPCODE};
