//! # Recording Bus
//!
//! A [`Bus`] with no chip behind it. Every completed register write is kept,
//! together with how many settle reads followed each half of it, so the
//! driver's output can be checked byte for byte without hardware.
//!
//! ```ignore
//! let mut opl = Opl2::new(RecordingBus::<256>::new());
//! opl.reset();
//! assert_eq!(opl.bus().len(), 57);
//! ```

use heapless::Vec;
use log::warn;

use crate::bus::Bus;
use crate::regs::register_name;

/// One register write as seen on the bus.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RegisterWrite {
    pub register: u8,
    pub value: u8,
    /// Address-port reads between the index write and the value write.
    pub address_reads: u8,
    /// Data-port reads after the value write.
    pub data_reads: u8,
}

impl RegisterWrite {
    pub const fn new(register: u8, value: u8) -> Self {
        Self {
            register,
            value,
            address_reads: 0,
            data_reads: 0,
        }
    }

    /// Register and value only.
    pub const fn pair(&self) -> (u8, u8) {
        (self.register, self.value)
    }

    pub fn name(&self) -> &'static str {
        register_name(self.register)
    }
}

pub struct RecordingBus<const N: usize> {
    writes: Vec<RegisterWrite, N>,
    latched: Option<u8>,
    address_reads: u8,
    overflowed: bool,
}

impl<const N: usize> RecordingBus<N> {
    pub const fn new() -> Self {
        Self {
            writes: Vec::new(),
            latched: None,
            address_reads: 0,
            overflowed: false,
        }
    }

    pub fn writes(&self) -> &[RegisterWrite] {
        &self.writes
    }

    /// `(register, value)` of every recorded write, in bus order.
    pub fn pairs(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.writes.iter().map(RegisterWrite::pair)
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Whether writes were dropped because the log was full.
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    pub fn clear(&mut self) {
        self.writes.clear();
        self.latched = None;
        self.address_reads = 0;
        self.overflowed = false;
    }
}

impl<const N: usize> Default for RecordingBus<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Bus for RecordingBus<N> {
    fn write_address(&mut self, index: u8) {
        self.latched = Some(index);
        self.address_reads = 0;
    }

    fn write_data(&mut self, value: u8) {
        let Some(register) = self.latched else {
            warn!("data write ${:02X} without a latched register", value);
            return;
        };

        let write = RegisterWrite {
            register,
            value,
            address_reads: self.address_reads,
            data_reads: 0,
        };
        if self.writes.push(write).is_err() {
            if !self.overflowed {
                warn!("recording bus full after {} writes, dropping the rest", N);
            }
            self.overflowed = true;
        }
    }

    fn read_address(&mut self) -> u8 {
        self.address_reads = self.address_reads.saturating_add(1);
        0
    }

    fn read_data(&mut self) -> u8 {
        if !self.overflowed {
            if let Some(last) = self.writes.last_mut() {
                last.data_reads = last.data_reads.saturating_add(1);
            }
        }
        0
    }
}
