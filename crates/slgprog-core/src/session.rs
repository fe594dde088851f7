//! Page-level read, write and erase of one region
//!
//! All three operations walk pages 0 to 15 in ascending order with exactly
//! one transaction outstanding. A failed transaction aborts the operation at
//! that page; nothing is retried and nothing is rolled back, so the device is
//! left with the earlier pages processed and the rest untouched.

use crate::device::{self, PageBuffer, Region, SlaveId, PAGE_SIZE, SETTLE_DELAY_US};
use crate::error::{Error, Result};
use crate::programmer::{I2cMaster, I2cMessage, TransportError};
use crate::protocol::{self, control_code, OpKind};

/// Callback for progress reporting during page operations
pub trait PageProgress {
    /// Called before the first page is processed
    fn starting(&mut self, op: OpKind, region: Region);

    /// Called after a page was read back
    fn page_read(&mut self, page: u8, data: &[u8; PAGE_SIZE]);

    /// Called after a page write was issued
    fn page_written(&mut self, page: u8, data: &[u8; PAGE_SIZE]);

    /// Called after a page erase was issued
    fn page_erased(&mut self, page: u8);

    /// Called when all pages were processed
    fn complete(&mut self, op: OpKind);
}

/// A no-op progress reporter
pub struct NoProgress;

impl PageProgress for NoProgress {
    fn starting(&mut self, _op: OpKind, _region: Region) {}
    fn page_read(&mut self, _page: u8, _data: &[u8; PAGE_SIZE]) {}
    fn page_written(&mut self, _page: u8, _data: &[u8; PAGE_SIZE]) {}
    fn page_erased(&mut self, _page: u8) {}
    fn complete(&mut self, _op: OpKind) {}
}

/// Programming session bound to one device and one region
///
/// The session only holds configuration. The bus is borrowed for the
/// duration of each operation and never retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgrammingSession {
    slave: SlaveId,
    region: Region,
}

impl ProgrammingSession {
    /// Create a session for `region` of device `slave`
    pub fn new(slave: SlaveId, region: Region) -> Self {
        Self { slave, region }
    }

    /// Device the session talks to
    pub fn slave(&self) -> SlaveId {
        self.slave
    }

    /// Region the session targets
    pub fn region(&self) -> Region {
        self.region
    }

    /// Read all 16 pages
    pub fn read<M, P>(&self, master: &mut M, progress: &mut P) -> Result<PageBuffer>
    where
        M: I2cMaster + ?Sized,
        P: PageProgress + ?Sized,
    {
        let address = control_code(self.slave, self.region, OpKind::Read);
        log::info!(
            "Reading {} of device {} (address 0x{:02X})",
            self.region,
            self.slave,
            address
        );
        progress.starting(OpKind::Read, self.region);

        let mut pages = PageBuffer::default();
        for page in device::pages() {
            let cmd = protocol::read_command(page);
            {
                let mut msgs = [
                    I2cMessage::Write {
                        address,
                        data: &cmd,
                    },
                    I2cMessage::Read {
                        address,
                        buf: pages.page_mut(page),
                    },
                ];
                master
                    .transfer(&mut msgs)
                    .map_err(|source| self.transport_error(OpKind::Read, page, source))?;
            }
            log::trace!("page {:2}: {:02X?}", page, pages.page(page));
            progress.page_read(page, pages.page(page));
        }

        progress.complete(OpKind::Read);
        Ok(pages)
    }

    /// Write all 16 pages of `image`
    ///
    /// Each page write is followed by the settle delay. The region must have
    /// been erased, and the device power cycled, beforehand.
    pub fn write<M, P>(&self, master: &mut M, image: &PageBuffer, progress: &mut P) -> Result<()>
    where
        M: I2cMaster + ?Sized,
        P: PageProgress + ?Sized,
    {
        let address = control_code(self.slave, self.region, OpKind::Write);
        log::info!(
            "Writing {} of device {} (address 0x{:02X})",
            self.region,
            self.slave,
            address
        );
        progress.starting(OpKind::Write, self.region);

        for (page, data) in image.iter() {
            let cmd = protocol::write_command(page, data);
            master
                .transfer(&mut [I2cMessage::Write {
                    address,
                    data: &cmd,
                }])
                .map_err(|source| self.transport_error(OpKind::Write, page, source))?;
            log::trace!("page {:2}: {:02X?}", page, data);
            progress.page_written(page, data);
            master.delay_us(SETTLE_DELAY_US);
        }

        progress.complete(OpKind::Write);
        Ok(())
    }

    /// Erase all 16 pages
    pub fn erase<M, P>(&self, master: &mut M, progress: &mut P) -> Result<()>
    where
        M: I2cMaster + ?Sized,
        P: PageProgress + ?Sized,
    {
        let address = control_code(self.slave, self.region, OpKind::Erase);
        log::info!(
            "Erasing {} of device {} (address 0x{:02X})",
            self.region,
            self.slave,
            address
        );
        progress.starting(OpKind::Erase, self.region);

        for page in device::pages() {
            let cmd = protocol::erase_command(self.region, page);
            master
                .transfer(&mut [I2cMessage::Write {
                    address,
                    data: &cmd,
                }])
                .map_err(|source| self.transport_error(OpKind::Erase, page, source))?;
            master.delay_us(SETTLE_DELAY_US);
            progress.page_erased(page);
        }

        progress.complete(OpKind::Erase);
        Ok(())
    }

    fn transport_error(&self, op: OpKind, page: u8, source: TransportError) -> Error {
        log::debug!("{} of page {} failed: {}", op, page, source);
        Error::Transport { op, page, source }
    }
}
