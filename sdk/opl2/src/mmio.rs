//! # Memory-Mapped Ports
//!
//! Hardware side of the driver: the chip's two ports and the system's
//! free-running millisecond counter, all as 32-bit bus words.
//!
//! | Default address | Register | Use |
//! |-----------------|----------|-----|
//! | `$4000_0000` | OPL address port | write register index, read as busy probe |
//! | `$4000_0004` | OPL data port | write register value, read as busy probe |
//! | `$2000_0004` | Clock | milliseconds since power-on |
//!
//! ```ignore
//! let config = PortConfig::DEFAULT;
//! let bus = unsafe { MmioBus::new(&config) };
//! let clock = unsafe { MmioClock::new(&config) };
//!
//! let mut opl = Opl2::new(bus);
//! opl.reset();
//! delay_ms(&clock, 250);
//! ```

use volatile_register::{RO, RW};

use crate::bus::Bus;

pub const OPL_ADDRESS_PORT: usize = 0x4000_0000;
pub const OPL_DATA_PORT: usize = 0x4000_0004;
pub const CLOCK_MILLIS: usize = 0x2000_0004;

/// Where the ports live on the host bus.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PortConfig {
    pub address_port: usize,
    pub data_port: usize,
    pub clock: usize,
}

impl PortConfig {
    pub const DEFAULT: PortConfig = PortConfig {
        address_port: OPL_ADDRESS_PORT,
        data_port: OPL_DATA_PORT,
        clock: CLOCK_MILLIS,
    };
}

impl Default for PortConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// [`Bus`] over the real ports. The chip latches the low byte of each word.
pub struct MmioBus {
    address: &'static mut RW<u32>,
    data: &'static mut RW<u32>,
}

impl MmioBus {
    /// # Safety
    /// `config` must name the chip's ports, and nothing else may access them
    /// while this bus exists.
    pub unsafe fn new(config: &PortConfig) -> Self {
        unsafe {
            Self {
                address: &mut *(config.address_port as *mut RW<u32>),
                data: &mut *(config.data_port as *mut RW<u32>),
            }
        }
    }
}

impl Bus for MmioBus {
    #[inline(always)]
    fn write_address(&mut self, index: u8) {
        unsafe { self.address.write(u32::from(index)) };
    }

    #[inline(always)]
    fn write_data(&mut self, value: u8) {
        unsafe { self.data.write(u32::from(value)) };
    }

    #[inline(always)]
    fn read_address(&mut self) -> u8 {
        self.address.read() as u8
    }

    #[inline(always)]
    fn read_data(&mut self) -> u8 {
        self.data.read() as u8
    }
}

/// A free-running millisecond counter.
pub trait Clock {
    fn millis(&self) -> u32;
}

pub struct MmioClock {
    counter: &'static RO<u32>,
}

impl MmioClock {
    /// # Safety
    /// `config.clock` must be the address of the millisecond counter.
    pub unsafe fn new(config: &PortConfig) -> Self {
        unsafe {
            Self {
                counter: &*(config.clock as *const RO<u32>),
            }
        }
    }
}

impl Clock for MmioClock {
    #[inline(always)]
    fn millis(&self) -> u32 {
        self.counter.read()
    }
}

/// Spin until `ms` milliseconds have passed on `clock`. Survives counter wrap.
pub fn delay_ms<C: Clock + ?Sized>(clock: &C, ms: u32) {
    let start = clock.millis();
    while clock.millis().wrapping_sub(start) < ms {
        core::hint::spin_loop();
    }
}
