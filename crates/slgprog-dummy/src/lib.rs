//! slgprog-dummy - In-memory SLG46xxx emulator for testing
//!
//! This crate provides a dummy programmer that emulates one device on the
//! bus in memory. It decodes control codes, the register pointer used by page
//! reads and writes, and the page erase command, so the whole protocol can be
//! exercised without real hardware.

#![cfg_attr(not(feature = "std"), no_std)]

use slgprog_core::device::{PageBuffer, Region, SlaveId, REGION_SIZE};
use slgprog_core::programmer::{I2cMaster, I2cMessage, TransportError};
use slgprog_core::protocol::{self, control_code, OpKind, ERASE_OPCODE};

/// Configuration for the dummy device
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// Slave identifier the device answers to
    pub slave: SlaveId,
    /// Value of every byte of an erased page
    pub erased_value: u8,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            slave: SlaveId::default(),
            erased_value: 0x00,
        }
    }
}

/// Dummy SLG46xxx device
///
/// Emulates both regions of one device in memory.
pub struct DummySlg {
    config: DummyConfig,
    nvm: PageBuffer,
    eeprom: PageBuffer,
    /// Register pointer set by the first byte of a write
    pointer: u8,
    transactions: usize,
    elapsed_us: u64,
}

impl DummySlg {
    /// Create a new dummy device with both regions erased
    pub fn new(config: DummyConfig) -> Self {
        let erased = PageBuffer::filled(config.erased_value);
        Self {
            config,
            nvm: erased,
            eeprom: erased,
            pointer: 0,
            transactions: 0,
            elapsed_us: 0,
        }
    }

    /// Create a new dummy device answering to the default slave id
    pub fn new_default() -> Self {
        Self::new(DummyConfig::default())
    }

    /// Create a dummy device with pre-filled regions
    pub fn with_data(config: DummyConfig, nvm: PageBuffer, eeprom: PageBuffer) -> Self {
        let mut dev = Self::new(config);
        dev.nvm = nvm;
        dev.eeprom = eeprom;
        dev
    }

    /// Get the contents of a region
    pub fn region(&self, region: Region) -> &PageBuffer {
        match region {
            Region::Nvm => &self.nvm,
            Region::Eeprom => &self.eeprom,
        }
    }

    /// Number of transactions executed so far
    pub fn transactions(&self) -> usize {
        self.transactions
    }

    /// Total time spent in `delay_us`
    pub fn elapsed_us(&self) -> u64 {
        self.elapsed_us
    }

    /// Get the configuration
    pub fn config(&self) -> &DummyConfig {
        &self.config
    }

    /// Region addressed by a read/write control code, if it is ours
    fn decode_address(&self, address: u8) -> Option<Region> {
        [Region::Nvm, Region::Eeprom]
            .into_iter()
            .find(|&region| control_code(self.config.slave, region, OpKind::Read) == address)
    }

    fn region_mut(&mut self, region: Region) -> &mut PageBuffer {
        match region {
            Region::Nvm => &mut self.nvm,
            Region::Eeprom => &mut self.eeprom,
        }
    }

    fn handle_erase(&mut self, data: &[u8]) -> Result<(), TransportError> {
        let &[ERASE_OPCODE, selector] = data else {
            log::warn!("dummy: unsupported command {:02X?}", data);
            return Err(TransportError::Unsupported);
        };

        let page = selector & 0x0F;
        let region = [Region::Nvm, Region::Eeprom]
            .into_iter()
            .find(|&region| protocol::erase_selector(region) == selector & 0xF0)
            .ok_or(TransportError::Unsupported)?;

        log::debug!("dummy: erasing {} page {}", region, page);
        let erased = self.config.erased_value;
        self.region_mut(region).page_mut(page).fill(erased);
        Ok(())
    }

    fn handle_write(&mut self, region: Region, data: &[u8]) {
        let Some((&pointer, payload)) = data.split_first() else {
            return;
        };
        self.pointer = pointer;
        for &b in payload {
            self.store(region, b);
        }
    }

    fn handle_read(&mut self, region: Region, buf: &mut [u8]) {
        for b in buf.iter_mut() {
            let page = self.pointer >> 4;
            let offset = usize::from(self.pointer & 0x0F);
            *b = self.region(region).page(page)[offset];
            self.advance();
        }
    }

    fn store(&mut self, region: Region, value: u8) {
        let page = self.pointer >> 4;
        let offset = usize::from(self.pointer & 0x0F);
        self.region_mut(region).page_mut(page)[offset] = value;
        self.advance();
    }

    fn advance(&mut self) {
        self.pointer = ((usize::from(self.pointer) + 1) % REGION_SIZE) as u8;
    }
}

impl I2cMaster for DummySlg {
    fn transfer(&mut self, msgs: &mut [I2cMessage<'_>]) -> Result<(), TransportError> {
        self.transactions += 1;
        let erase_address = control_code(self.config.slave, Region::Nvm, OpKind::Erase);

        for msg in msgs.iter_mut() {
            let address = msg.address();
            match msg {
                I2cMessage::Write { data, .. } if address == erase_address => {
                    self.handle_erase(data)?
                }
                I2cMessage::Read { .. } if address == erase_address => {
                    return Err(TransportError::Unsupported)
                }
                I2cMessage::Write { data, .. } => {
                    let region = self
                        .decode_address(address)
                        .ok_or(TransportError::Nack { address })?;
                    self.handle_write(region, data);
                }
                I2cMessage::Read { buf, .. } => {
                    let region = self
                        .decode_address(address)
                        .ok_or(TransportError::Nack { address })?;
                    self.handle_read(region, buf);
                }
            }
        }
        Ok(())
    }

    fn delay_us(&mut self, us: u32) {
        // No real delay needed for in-memory operations
        self.elapsed_us += u64::from(us);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slgprog_core::device::SETTLE_DELAY_US;
    use slgprog_core::session::{NoProgress, ProgrammingSession};
    use slgprog_core::Error;

    fn counting() -> PageBuffer {
        let mut bytes = [0u8; REGION_SIZE];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = i as u8;
        }
        PageBuffer::from_bytes(&bytes)
    }

    #[test]
    fn test_write_then_read() {
        let mut dev = DummySlg::new_default();
        let session = ProgrammingSession::new(SlaveId::default(), Region::Nvm);

        session.write(&mut dev, &counting(), &mut NoProgress).unwrap();
        assert_eq!(dev.region(Region::Nvm), &counting());
        assert_eq!(dev.region(Region::Eeprom), &PageBuffer::default());
        assert_eq!(dev.elapsed_us(), 16 * u64::from(SETTLE_DELAY_US));

        let pages = session.read(&mut dev, &mut NoProgress).unwrap();
        assert_eq!(pages, counting());
        assert_eq!(dev.transactions(), 32);
    }

    #[test]
    fn test_erase_only_touches_target_region() {
        let config = DummyConfig {
            slave: SlaveId::new(4).unwrap(),
            erased_value: 0x00,
        };
        let mut dev = DummySlg::with_data(config, PageBuffer::filled(0x11), PageBuffer::filled(0x22));

        ProgrammingSession::new(SlaveId::new(4).unwrap(), Region::Eeprom)
            .erase(&mut dev, &mut NoProgress)
            .unwrap();

        assert_eq!(dev.region(Region::Eeprom), &PageBuffer::filled(0x00));
        assert_eq!(dev.region(Region::Nvm), &PageBuffer::filled(0x11));
    }

    #[test]
    fn test_wrong_slave_is_not_acknowledged() {
        let mut dev = DummySlg::new_default();
        let err = ProgrammingSession::new(SlaveId::new(2).unwrap(), Region::Nvm)
            .read(&mut dev, &mut NoProgress)
            .unwrap_err();

        assert_eq!(
            err,
            Error::Transport {
                op: OpKind::Read,
                page: 0,
                source: TransportError::Nack { address: 0x12 },
            }
        );
    }

    #[test]
    fn test_unknown_erase_payload() {
        let mut dev = DummySlg::new_default();
        let mut msgs = [I2cMessage::Write {
            address: 0x08,
            data: &[0xE3, 0xA0],
        }];
        assert_eq!(dev.transfer(&mut msgs), Err(TransportError::Unsupported));
    }
}
