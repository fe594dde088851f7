//! Recording I2C master for unit tests

use std::vec::Vec;

use crate::device::{PageBuffer, PAGE_SIZE};
use crate::programmer::{I2cMaster, I2cMessage, TransportError};

/// EREMOTEIO, what i2c-dev reports for a missing acknowledgment
pub const MOCK_ERRNO: i32 = 121;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Write { address: u8, data: Vec<u8> },
    Read { address: u8, len: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Transaction(Vec<Message>),
    Delay(u32),
}

/// Records every transaction and delay in one timeline
///
/// Page writes (offset byte plus 16 data bytes) land in `memory`; a read
/// following a one-byte write returns `memory` from that offset.
pub struct MockMaster {
    pub events: Vec<Event>,
    pub memory: PageBuffer,
    pub fail_at: Option<usize>,
    attempted: usize,
}

impl MockMaster {
    pub fn new() -> Self {
        Self::with_memory(PageBuffer::default())
    }

    pub fn with_memory(memory: PageBuffer) -> Self {
        Self {
            events: Vec::new(),
            memory,
            fail_at: None,
            attempted: 0,
        }
    }

    /// Fail the transaction with the given zero-based index
    pub fn failing_at(index: usize) -> Self {
        let mut mock = Self::new();
        mock.fail_at = Some(index);
        mock
    }

    pub fn transactions(&self) -> Vec<&Vec<Message>> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Transaction(msgs) => Some(msgs),
                Event::Delay(_) => None,
            })
            .collect()
    }
}

impl I2cMaster for MockMaster {
    fn transfer(&mut self, msgs: &mut [I2cMessage<'_>]) -> Result<(), TransportError> {
        let index = self.attempted;
        self.attempted += 1;

        let recorded = msgs
            .iter()
            .map(|msg| match msg {
                I2cMessage::Write { address, data } => Message::Write {
                    address: *address,
                    data: data.to_vec(),
                },
                I2cMessage::Read { address, buf } => Message::Read {
                    address: *address,
                    len: buf.len(),
                },
            })
            .collect();
        self.events.push(Event::Transaction(recorded));

        if self.fail_at == Some(index) {
            return Err(TransportError::Os { errno: MOCK_ERRNO });
        }

        let mut page = 0u8;
        for msg in msgs.iter_mut() {
            match msg {
                I2cMessage::Write { data, .. } if data.len() == PAGE_SIZE + 1 => {
                    self.memory.page_mut(data[0] >> 4).copy_from_slice(&data[1..]);
                }
                I2cMessage::Write { data, .. } if data.len() == 1 => page = data[0] >> 4,
                I2cMessage::Write { .. } => {}
                I2cMessage::Read { buf, .. } => {
                    let len = buf.len().min(PAGE_SIZE);
                    buf[..len].copy_from_slice(&self.memory.page(page)[..len]);
                }
            }
        }
        Ok(())
    }

    fn delay_us(&mut self, us: u32) {
        self.events.push(Event::Delay(us));
    }
}
