//! Full programming workflow
//!
//! After an erase the device only accepts a write once it has been power
//! cycled, and the same holds between a write and the read that verifies it.
//! Software cannot do this; [`program`] stops at a [`PowerCycle`] barrier the
//! caller provides, typically a prompt for the operator.

use crate::device::PageBuffer;
use crate::error::{Error, Result};
use crate::programmer::I2cMaster;
use crate::protocol::OpKind;
use crate::session::{PageProgress, ProgrammingSession};

/// Barrier between dependent operations
pub trait PowerCycle {
    /// Block until the device has been power cycled
    ///
    /// `next` is the operation that runs once this returns. Return
    /// [`Error::PowerCycleAborted`] to stop the workflow.
    fn wait_for_power_cycle(&mut self, next: OpKind) -> Result<()>;
}

/// Erase, write and (optionally) verify `image`
///
/// The image must already be decoded, so a malformed file never reaches the
/// device. With `verify` the region is read back after the second power
/// cycle and compared byte for byte.
pub fn program<M, B, P>(
    session: &ProgrammingSession,
    master: &mut M,
    image: &PageBuffer,
    barrier: &mut B,
    progress: &mut P,
    verify: bool,
) -> Result<()>
where
    M: I2cMaster + ?Sized,
    B: PowerCycle + ?Sized,
    P: PageProgress + ?Sized,
{
    session.erase(master, progress)?;
    barrier.wait_for_power_cycle(OpKind::Write)?;

    session.write(master, image, progress)?;
    if !verify {
        log::info!("Skipping verification");
        return Ok(());
    }
    barrier.wait_for_power_cycle(OpKind::Read)?;

    let read_back = session.read(master, progress)?;
    if let Some((page, offset, expected, found)) = image.first_difference(&read_back) {
        return Err(Error::VerifyMismatch {
            page,
            offset,
            expected,
            found,
        });
    }

    log::info!("Verified {} bytes", image.bytes().count());
    Ok(())
}
