//! Erase command implementation

use super::{CommandError, IndicatifProgress};
use slgprog_core::programmer::I2cMaster;
use slgprog_core::session::ProgrammingSession;

/// Erase every page of the session's region
pub fn run_erase<M: I2cMaster + ?Sized>(
    session: &ProgrammingSession,
    master: &mut M,
) -> Result<(), CommandError> {
    let mut progress = IndicatifProgress::new(false);
    session.erase(master, &mut progress)?;

    println!("Erase complete, power cycle the device before writing");
    Ok(())
}
