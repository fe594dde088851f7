//! Per-page command framing

use crate::device::{Region, PAGE_SIZE};
use crate::protocol::address::erase_selector;

/// Opcode of the page erase command
pub const ERASE_OPCODE: u8 = 0xE3;

/// Offset of the first byte of `page` within the region
pub const fn page_offset(page: u8) -> u8 {
    page << 4
}

/// Address phase of a page read; 16 bytes are read back afterwards
pub const fn read_command(page: u8) -> [u8; 1] {
    [page_offset(page)]
}

/// Page offset followed by the 16 data bytes
pub fn write_command(page: u8, data: &[u8; PAGE_SIZE]) -> [u8; PAGE_SIZE + 1] {
    let mut cmd = [0u8; PAGE_SIZE + 1];
    cmd[0] = page_offset(page);
    cmd[1..].copy_from_slice(data);
    cmd
}

/// Erase opcode followed by the region pattern with the page in the low nibble
pub const fn erase_command(region: Region, page: u8) -> [u8; 2] {
    [ERASE_OPCODE, erase_selector(region) | (page & 0x0F)]
}
