//! # OPL2 Driver
//!
//! Register-level driver for an AdLib/OPL2-compatible FM synthesizer that sits
//! behind a pair of memory-mapped address/data ports.
//!
//! ## Quick Start
//!
//! ```ignore
//! use opl2::{Drums, FrequencyWord, Instrument, MmioBus, Note, Opl2, PortConfig, Voice};
//!
//! let bus = unsafe { MmioBus::new(&PortConfig::DEFAULT) };
//! let mut opl = Opl2::new(bus);
//!
//! opl.reset();
//! opl.enable_rhythm_mode();
//! for voice in Voice::ALL {
//!     opl.program_instrument(&Instrument::DEMO, voice)?;
//! }
//!
//! opl.trigger_percussion(Drums::SNARE);
//! opl.play_note(FrequencyWord::from_note(Note::A, 3)?, Voice::V0);
//! ```
//!
//! ## What lives where
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`bus`] | The [`Bus`] capability and the timed two-phase register write |
//! | [`mmio`] | Memory-mapped ports, the millisecond clock, `delay_ms` |
//! | [`recorder`] | [`RecordingBus`], an in-memory bus for tests and tracing |
//! | [`regs`] | Register bases and the rhythm control flags |
//! | [`topology`] | Oscillator offsets and the voice-to-oscillator pairs |
//! | [`instrument`] | Instrument definitions and their register packing |
//! | [`pitch_table`] | Semitone frequency numbers and frequency/block words |
//! | [`driver`] | [`Opl2`], the driver itself |
//! | [`demo`] | The scale-with-snare test sequence |
//!
//! ## Call order
//!
//! A program calls [`Opl2::reset`], then [`Opl2::enable_rhythm_mode`], then
//! [`Opl2::program_instrument`] once per voice, and after that any mix of
//! [`Opl2::play_note`] and [`Opl2::trigger_percussion`]. Rhythm mode retunes
//! the bass drum and tom-tom without resetting them first, so calling it again
//! without a reset in between is not idempotent.

#![cfg_attr(not(test), no_std)]

pub mod bus;
pub mod demo;
pub mod driver;
pub mod error;
pub mod instrument;
pub mod mmio;
pub mod pitch_table;
pub mod recorder;
pub mod regs;
pub mod topology;

pub use bus::{Bus, write_register};
pub use driver::Opl2;
pub use error::OplError;
pub use instrument::{Instrument, Operator, Oscillator, OscillatorField};
pub use mmio::{Clock, MmioBus, MmioClock, PortConfig, delay_ms};
pub use pitch_table::{FrequencyWord, Note};
pub use recorder::{RecordingBus, RegisterWrite};
pub use regs::{Drums, RhythmFlags};
pub use topology::Voice;
