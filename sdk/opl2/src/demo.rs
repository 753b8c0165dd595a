//! Scale demo: one octave on a single voice, a snare hit on every note.
//!
//! ```ignore
//! let config = PortConfig::DEFAULT;
//! let clock = unsafe { MmioClock::new(&config) };
//! let mut opl = Opl2::new(unsafe { MmioBus::new(&config) });
//!
//! run_scale_demo(&mut opl, 4, Voice::V0, |ms| delay_ms(&clock, ms))?;
//! ```

use log::info;

use crate::bus::Bus;
use crate::driver::Opl2;
use crate::error::OplError;
use crate::instrument::Instrument;
use crate::pitch_table::{FrequencyWord, Note};
use crate::regs::Drums;
use crate::topology::Voice;

/// How long each note of the scale is held.
pub const NOTE_MILLIS: u32 = 1000;

/// Play C through B at `block` on `voice`, then reset the chip.
///
/// `wait` is called with [`NOTE_MILLIS`] after each note and should block for
/// that many milliseconds.
pub fn run_scale_demo<B: Bus>(
    opl: &mut Opl2<B>,
    block: u8,
    voice: Voice,
    mut wait: impl FnMut(u32),
) -> Result<(), OplError> {
    let mut words = [FrequencyWord::default(); Note::ALL.len()];
    for (word, note) in words.iter_mut().zip(Note::ALL) {
        *word = FrequencyWord::from_note(note, block)?;
    }

    opl.reset();
    opl.enable_rhythm_mode();
    for v in Voice::ALL {
        opl.program_instrument(&Instrument::DEMO, v)?;
    }

    info!("playing scale at block {} on voice {}", block, voice.index());
    for word in words {
        opl.trigger_percussion(Drums::SNARE);
        opl.play_note(word, voice);
        wait(NOTE_MILLIS);
    }

    opl.reset();
    Ok(())
}
