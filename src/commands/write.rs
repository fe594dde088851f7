//! Write command implementation

use super::{CommandError, IndicatifProgress};
use slgprog_core::device::PageBuffer;
use slgprog_core::image;
use slgprog_core::programmer::I2cMaster;
use slgprog_core::protocol::OpKind;
use slgprog_core::sequence::{self, PowerCycle};
use slgprog_core::session::ProgrammingSession;
use std::io::{BufRead, Write};
use std::path::Path;

/// Read and decode a HEX image file
pub fn load_image(path: &Path) -> Result<PageBuffer, CommandError> {
    let data = std::fs::read(path).map_err(|source| CommandError::ReadImage {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("Read {} bytes from {}", data.len(), path.display());
    Ok(image::decode(&data)?)
}

/// Power-cycle barrier that waits for Enter on a line-based input
///
/// End of input or a read error aborts the sequence.
pub struct StdinPowerCycle<R> {
    input: R,
}

impl StdinPowerCycle<std::io::StdinLock<'static>> {
    pub fn new() -> Self {
        Self::with_input(std::io::stdin().lock())
    }
}

impl Default for StdinPowerCycle<std::io::StdinLock<'static>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: BufRead> StdinPowerCycle<R> {
    pub fn with_input(input: R) -> Self {
        Self { input }
    }
}

impl<R: BufRead> PowerCycle for StdinPowerCycle<R> {
    fn wait_for_power_cycle(&mut self, next: OpKind) -> slgprog_core::Result<()> {
        print!("Waiting for power cycle before {}, press Enter to continue...", next);
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => {
                println!();
                Err(slgprog_core::Error::PowerCycleAborted)
            }
            Ok(_) => Ok(()),
        }
    }
}

/// Erase the region, write `image` and optionally verify it
pub fn run_write<M, B>(
    session: &ProgrammingSession,
    master: &mut M,
    image: &PageBuffer,
    barrier: &mut B,
    verify: bool,
) -> Result<(), CommandError>
where
    M: I2cMaster + ?Sized,
    B: PowerCycle + ?Sized,
{
    log::info!(
        "Programming {} of device {}",
        session.region(),
        session.slave()
    );

    let mut progress = IndicatifProgress::new(true);
    sequence::program(session, master, image, barrier, &mut progress, verify)?;

    if verify {
        println!("Verification passed!");
    } else {
        println!("Write complete (not verified)");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use slgprog_core::Error;
    use std::io::Cursor;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("slgprog-{}-{}.hex", name, std::process::id()))
    }

    #[test]
    fn test_load_image() {
        let path = temp_path("load");
        let mut text = String::new();
        image::encode(&PageBuffer::filled(0x5A), &mut text).unwrap();
        std::fs::write(&path, text).unwrap();

        let pages = load_image(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(pages, PageBuffer::filled(0x5A));
    }

    #[test]
    fn test_load_image_errors() {
        let missing = temp_path("missing");
        assert!(matches!(
            load_image(&missing),
            Err(CommandError::ReadImage { .. })
        ));

        let short = temp_path("short");
        std::fs::write(&short, [b'0'; 100]).unwrap();
        let result = load_image(&short);
        std::fs::remove_file(&short).unwrap();
        assert!(matches!(
            result,
            Err(CommandError::Device(Error::MalformedImage(_)))
        ));
    }

    #[test]
    fn test_power_cycle_prompt() {
        let mut barrier = StdinPowerCycle::with_input(Cursor::new(b"\n".to_vec()));
        assert_eq!(barrier.wait_for_power_cycle(OpKind::Write), Ok(()));
        assert_eq!(
            barrier.wait_for_power_cycle(OpKind::Read),
            Err(Error::PowerCycleAborted)
        );
    }

    #[test]
    #[cfg(feature = "dummy")]
    fn test_write_and_verify() {
        use slgprog_core::device::{Region, SlaveId};

        let mut dev = slgprog_dummy::DummySlg::new_default();
        let session = ProgrammingSession::new(SlaveId::default(), Region::Nvm);
        let mut barrier = StdinPowerCycle::with_input(Cursor::new(b"\n\n".to_vec()));

        run_write(&session, &mut dev, &PageBuffer::filled(0xC3), &mut barrier, true).unwrap();
        assert_eq!(dev.region(Region::Nvm), &PageBuffer::filled(0xC3));
    }

    #[test]
    #[cfg(feature = "dummy")]
    fn test_write_aborted_before_writing() {
        use slgprog_core::device::{Region, SlaveId};

        let mut dev = slgprog_dummy::DummySlg::with_data(
            Default::default(),
            PageBuffer::filled(0x11),
            PageBuffer::default(),
        );
        let session = ProgrammingSession::new(SlaveId::default(), Region::Nvm);
        let mut barrier = StdinPowerCycle::with_input(Cursor::new(Vec::new()));

        let err = run_write(&session, &mut dev, &PageBuffer::filled(0xC3), &mut barrier, true)
            .unwrap_err();
        assert!(matches!(
            err,
            CommandError::Device(Error::PowerCycleAborted)
        ));
        // Erased, nothing written
        assert_eq!(dev.region(Region::Nvm), &PageBuffer::default());
    }
}
