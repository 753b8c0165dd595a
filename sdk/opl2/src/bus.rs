//! # Register Access
//!
//! The chip exposes its ~240 internal registers through two ports: write a
//! register index to the address port, then the value to the data port. Each
//! write needs time to settle before the chip accepts the next one. The driver
//! waits by reading the port back a fixed number of times instead of using a
//! wall clock:
//!
//! | Step | Port | Settle |
//! |------|------|--------|
//! | 1 | address <- register index | [`ADDRESS_SETTLE_READS`] reads of the address port |
//! | 2 | data <- value | [`DATA_SETTLE_READS`] reads of the data port |

use log::trace;

/// Dummy address-port reads after writing a register index.
pub const ADDRESS_SETTLE_READS: usize = 6;
/// Dummy data-port reads after writing a register value.
pub const DATA_SETTLE_READS: usize = 35;

/// Access to the chip's address and data ports.
///
/// Reads only serve as a busy probe during settle waits; their values are
/// ignored. A hardware implementation keeps the default settle hooks, a test
/// double may override them to skip the reads.
pub trait Bus {
    fn write_address(&mut self, index: u8);

    fn write_data(&mut self, value: u8);

    fn read_address(&mut self) -> u8;

    fn read_data(&mut self) -> u8;

    /// Wait out the address-write settle time.
    #[inline]
    fn settle_address(&mut self) {
        for _ in 0..ADDRESS_SETTLE_READS {
            let _ = self.read_address();
        }
    }

    /// Wait out the data-write settle time.
    #[inline]
    fn settle_data(&mut self) {
        for _ in 0..DATA_SETTLE_READS {
            let _ = self.read_data();
        }
    }
}

impl<B: Bus + ?Sized> Bus for &mut B {
    fn write_address(&mut self, index: u8) {
        (**self).write_address(index);
    }

    fn write_data(&mut self, value: u8) {
        (**self).write_data(value);
    }

    fn read_address(&mut self) -> u8 {
        (**self).read_address()
    }

    fn read_data(&mut self) -> u8 {
        (**self).read_data()
    }

    fn settle_address(&mut self) {
        (**self).settle_address();
    }

    fn settle_data(&mut self) {
        (**self).settle_data();
    }
}

/// Write `value` to chip register `register`.
///
/// The register index is not validated; the protocol is the same for every
/// register. The full settle wait runs before this returns.
pub fn write_register<B: Bus + ?Sized>(bus: &mut B, register: u8, value: u8) {
    trace!("reg ${:02X} <- ${:02X}", register, value);
    bus.write_address(register);
    bus.settle_address();
    bus.write_data(value);
    bus.settle_data();
}
