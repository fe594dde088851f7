//! CLI command implementations
//!
//! Each command borrows the bus for its whole run and reports pages through
//! an [`IndicatifProgress`]. Image files are decoded before the bus is
//! touched, so a bad file never leaves the device half-programmed.

mod erase;
mod list;
mod progress;
mod read;
mod write;

pub use erase::run_erase;
pub use list::list_programmers;
pub use progress::IndicatifProgress;
pub use read::run_read;
pub use write::{load_image, run_write, StdinPowerCycle};

use std::path::PathBuf;

/// Errors raised by the command layer
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The image file could not be read
    #[error("failed to read {}: {source}", path.display())]
    ReadImage {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The read-back image could not be saved
    #[error("failed to write {}: {source}", path.display())]
    WriteImage {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The read-back contents could not be formatted as HEX
    #[error("failed to encode the image as HEX: {0}")]
    EncodeImage(#[source] std::fmt::Error),

    /// The image or the device reported an error
    #[error(transparent)]
    Device(#[from] slgprog_core::Error),
}
