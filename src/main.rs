//! slgprog - In-circuit programmer for SLG46xxx configurable mixed-signal ICs
//!
//! Reads, erases and writes the NVM and EEPROM regions of a device on an I2C
//! bus. Every command opens the bus through the selected programmer
//! (`linux_i2c` for real hardware, `dummy` for dry runs), drives one
//! [`ProgrammingSession`](slgprog_core::session::ProgrammingSession) over it
//! and closes it again.
//!
//! Writing is a three-step sequence: the region is erased, the device is
//! power cycled, the image is written, the device is power cycled again and
//! the region is read back to verify it.

mod cli;
mod commands;
mod programmers;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(cli::parse_error_exit_code(&e));
        }
    };

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    match cli.command {
        Commands::Read { device, output } => {
            let session = device.session()?;
            programmers::with_programmer(&device, |master| {
                commands::run_read(&session, master, output.as_deref())?;
                Ok(())
            })
        }
        Commands::Write {
            device,
            file,
            no_verify,
        } => {
            let session = device.session()?;
            // Decode before touching the device
            let image = commands::load_image(&file)?;
            log::info!("Loaded image {}", file.display());

            programmers::with_programmer(&device, |master| {
                let mut barrier = commands::StdinPowerCycle::new();
                commands::run_write(&session, master, &image, &mut barrier, !no_verify)?;
                Ok(())
            })
        }
        Commands::Erase { device } => {
            let session = device.session()?;
            programmers::with_programmer(&device, |master| {
                commands::run_erase(&session, master)?;
                Ok(())
            })
        }
        Commands::ListProgrammers => {
            commands::list_programmers();
            Ok(())
        }
    }
}
