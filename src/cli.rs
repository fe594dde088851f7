//! CLI argument parsing

use clap::{Parser, Subcommand};
use slgprog_core::device::{Region, SlaveId, DEFAULT_SLAVE_ID, MAX_SLAVE_ID};
use slgprog_core::session::ProgrammingSession;
use std::path::PathBuf;

/// Parse a region name (case-insensitive)
fn parse_region(s: &str) -> Result<Region, String> {
    s.parse::<Region>().map_err(|e| e.to_string())
}

/// Exit status for a failed argument parse
///
/// Help and version output exit 0; any invalid or missing argument is a
/// validation failure and exits 1.
pub fn parse_error_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        1
    } else {
        0
    }
}

#[derive(Parser)]
#[command(name = "slgprog")]
#[command(author, version, about = "SLG46xxx in-circuit programmer", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Device selection shared across commands
#[derive(clap::Args, Debug, Clone)]
pub struct DeviceArgs {
    /// I2C bus number (opens /dev/i2c-<BUS>)
    pub bus: u32,

    /// Region to operate on (nvm or eeprom)
    #[arg(short, long, default_value = "nvm", value_parser = parse_region)]
    pub target: Region,

    /// Device id (0-15)
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_SLAVE_ID,
        value_parser = clap::value_parser!(u8).range(0..=MAX_SLAVE_ID as i64)
    )]
    pub id: u8,

    /// Programmer to use (linux_i2c or dummy, options as name:key=value)
    #[arg(short, long, default_value = "linux_i2c")]
    pub programmer: String,
}

impl DeviceArgs {
    /// Session for the selected device and region
    pub fn session(&self) -> Result<ProgrammingSession, slgprog_core::Error> {
        Ok(ProgrammingSession::new(SlaveId::new(self.id)?, self.target))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read the target region and print its pages
    Read {
        #[command(flatten)]
        device: DeviceArgs,

        /// Also save the contents as a HEX image
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Erase the target region, write a HEX image and read it back
    ///
    /// The device has to be power cycled after the erase and after the
    /// write; the command waits for Enter at each step.
    Write {
        #[command(flatten)]
        device: DeviceArgs,

        /// HEX image to write
        file: PathBuf,

        /// Don't read back and compare after writing
        #[arg(long)]
        no_verify: bool,
    },

    /// Erase the target region
    Erase {
        #[command(flatten)]
        device: DeviceArgs,
    },

    /// List supported programmers
    ListProgrammers,
}
