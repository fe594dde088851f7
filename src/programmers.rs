//! Programmer registration and dispatch
//!
//! This module provides a centralized registry for all programmers, with support
//! for feature-gated inclusion and dynamic help text generation.

use crate::cli::DeviceArgs;
use slgprog_core::programmer::I2cMaster;

/// Information about a programmer
pub struct ProgrammerInfo {
    /// Primary name (used for matching)
    pub name: &'static str,
    /// Alternative names/aliases
    pub aliases: &'static [&'static str],
    /// Short description
    pub description: &'static str,
}

/// Get information about all available programmers (enabled at compile time)
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_programmers() -> Vec<ProgrammerInfo> {
    let mut programmers = Vec::new();

    #[cfg(feature = "linux-i2c")]
    programmers.push(ProgrammerInfo {
        name: "linux_i2c",
        aliases: &["linux-i2c", "i2cdev"],
        description: "Linux i2c-dev interface (/dev/i2c-<BUS>, or dev=<path>)",
    });

    #[cfg(feature = "dummy")]
    programmers.push(ProgrammerInfo {
        name: "dummy",
        aliases: &[],
        description: "In-memory device emulator for dry runs (nvm=<hex>,eeprom=<hex>)",
    });

    programmers
}

/// Generate help text listing all available programmers
pub fn programmer_help() -> String {
    let programmers = available_programmers();

    if programmers.is_empty() {
        return "No programmers available (recompile with programmer features enabled)".to_string();
    }

    let mut help = String::from("Available programmers:\n");
    for p in &programmers {
        help.push_str(&format!("  {:12} - {}\n", p.name, p.description));
    }

    help
}

/// Check if a programmer name matches any available programmer
pub fn find_programmer(name: &str) -> Option<&'static str> {
    available_programmers()
        .into_iter()
        .find(|p| p.name == name || p.aliases.contains(&name))
        .map(|p| p.name)
}

/// Execute a function with the programmer selected by `device`
///
/// The programmer string can be just the name (e.g., "linux_i2c") or include
/// parameters (e.g., "dummy:nvm=image.hex"). The bus is only opened for the
/// duration of `f`.
#[allow(unused_variables)]
pub fn with_programmer<F>(device: &DeviceArgs, f: F) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(&mut dyn I2cMaster) -> Result<(), Box<dyn std::error::Error>>,
{
    let (name, options) = parse_programmer_string(&device.programmer);

    let canonical_name = match find_programmer(name) {
        Some(n) => n,
        None => {
            return Err(unknown_programmer_error(name));
        }
    };

    match canonical_name {
        #[cfg(feature = "linux-i2c")]
        "linux_i2c" => {
            use slgprog_linux_i2c::{parse_options, LinuxI2c};

            let bus = device.bus.to_string();
            let options = with_default_bus(options, &bus);

            log::info!("Opening Linux I2C programmer...");

            let config = parse_options(&options)
                .map_err(|e| format!("Invalid linux_i2c parameters: {}", e))?;

            let mut master = LinuxI2c::open(&config).map_err(|e| {
                format!(
                    "Failed to open I2C bus: {}\n\
                     Make sure the i2c-dev module is loaded and you have read/write permissions.\n\
                     You may need to: sudo usermod -aG i2c $USER",
                    e
                )
            })?;
            log::debug!("Adapter functionality: {:?}", master.funcs());

            f(&mut master)
        }

        #[cfg(feature = "dummy")]
        "dummy" => {
            use slgprog_core::device::{PageBuffer, Region, SlaveId};
            use slgprog_dummy::{DummyConfig, DummySlg};

            let config = DummyConfig {
                slave: SlaveId::new(device.id)?,
                ..Default::default()
            };
            let erased = PageBuffer::filled(config.erased_value);

            let preload = |region: Region| -> Result<PageBuffer, Box<dyn std::error::Error>> {
                match options.iter().find(|(k, _)| *k == region.name()) {
                    Some((_, path)) => Ok(crate::commands::load_image(std::path::Path::new(path))?),
                    None => Ok(erased),
                }
            };
            let nvm = preload(Region::Nvm)?;
            let eeprom = preload(Region::Eeprom)?;

            log::info!("Using dummy device with id {}", device.id);
            let mut master = DummySlg::with_data(config, nvm, eeprom);
            f(&mut master)
        }

        _ => Err(unknown_programmer_error(name)),
    }
}

/// Add the positional bus number unless the options already pick a device
///
/// An explicit `bus=` or `dev=` in the programmer string wins.
#[cfg(feature = "linux-i2c")]
fn with_default_bus<'a>(mut options: Vec<(&'a str, &'a str)>, bus: &'a str) -> Vec<(&'a str, &'a str)> {
    if !options.iter().any(|(k, _)| *k == "dev" || *k == "bus") {
        options.push(("bus", bus));
    }
    options
}

/// Parse a programmer string into name and options
///
/// Format: "name" or "name:option1=value1,option2=value2"
pub fn parse_programmer_string(s: &str) -> (&str, Vec<(&str, &str)>) {
    if let Some((name, opts)) = s.split_once(':') {
        let options: Vec<_> = opts
            .split(',')
            .filter_map(|opt| opt.split_once('='))
            .collect();
        (name, options)
    } else {
        (s, Vec::new())
    }
}

fn unknown_programmer_error(name: &str) -> Box<dyn std::error::Error> {
    let mut msg = format!("Unknown programmer: {}\n\n", name);
    msg.push_str(&programmer_help());
    msg.push_str("\nUse 'slgprog list-programmers' for more details");
    msg.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_programmer_string() {
        assert_eq!(parse_programmer_string("linux_i2c"), ("linux_i2c", vec![]));
        assert_eq!(
            parse_programmer_string("dummy:nvm=a.hex,eeprom=b.hex"),
            ("dummy", vec![("nvm", "a.hex"), ("eeprom", "b.hex")])
        );
        assert_eq!(
            parse_programmer_string("linux_i2c:dev=/dev/i2c-7"),
            ("linux_i2c", vec![("dev", "/dev/i2c-7")])
        );
    }

    #[test]
    #[cfg(all(feature = "linux-i2c", feature = "dummy"))]
    fn test_find_programmer_aliases() {
        assert_eq!(find_programmer("i2cdev"), Some("linux_i2c"));
        assert_eq!(find_programmer("dummy"), Some("dummy"));
        assert_eq!(find_programmer("ch341a"), None);
    }

    #[test]
    #[cfg(feature = "linux-i2c")]
    fn test_positional_bus_does_not_override_options() {
        use slgprog_linux_i2c::parse_options;

        let config = parse_options(&with_default_bus(vec![], "1")).unwrap();
        assert_eq!(config.device, "/dev/i2c-1");

        let (_, options) = parse_programmer_string("linux_i2c:bus=5");
        let config = parse_options(&with_default_bus(options, "1")).unwrap();
        assert_eq!(config.device, "/dev/i2c-5");

        let (_, options) = parse_programmer_string("linux_i2c:dev=/dev/i2c-mux");
        let config = parse_options(&with_default_bus(options, "1")).unwrap();
        assert_eq!(config.device, "/dev/i2c-mux");
    }
}
