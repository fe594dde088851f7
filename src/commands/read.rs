//! Read command implementation

use super::{CommandError, IndicatifProgress};
use slgprog_core::image;
use slgprog_core::programmer::I2cMaster;
use slgprog_core::session::ProgrammingSession;
use std::path::Path;

/// Read the session's region, dump it and optionally save it as HEX
pub fn run_read<M: I2cMaster + ?Sized>(
    session: &ProgrammingSession,
    master: &mut M,
    output: Option<&Path>,
) -> Result<(), CommandError> {
    let mut progress = IndicatifProgress::new(true);
    let pages = session.read(master, &mut progress)?;

    if let Some(path) = output {
        let mut text = String::with_capacity(image::ENCODED_LEN);
        image::encode(&pages, &mut text).map_err(CommandError::EncodeImage)?;
        std::fs::write(path, text).map_err(|source| CommandError::WriteImage {
            path: path.to_path_buf(),
            source,
        })?;
        println!("Saved {} to {}", session.region(), path.display());
    }

    Ok(())
}

#[cfg(all(test, feature = "dummy"))]
mod tests {
    use super::*;
    use slgprog_core::device::{PageBuffer, Region, SlaveId};
    use slgprog_dummy::{DummyConfig, DummySlg};

    #[test]
    fn test_read_saves_decodable_image() {
        let mut bytes = [0u8; 256];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = (255 - i) as u8;
        }
        let contents = PageBuffer::from_bytes(&bytes);
        let mut dev = DummySlg::with_data(DummyConfig::default(), PageBuffer::default(), contents);

        let path = std::env::temp_dir().join(format!("slgprog-read-{}.hex", std::process::id()));
        let session = ProgrammingSession::new(SlaveId::default(), Region::Eeprom);
        run_read(&session, &mut dev, Some(&path)).unwrap();

        let saved = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(saved.len(), image::ENCODED_LEN);
        assert_eq!(image::decode(&saved).unwrap(), contents);
    }
}
