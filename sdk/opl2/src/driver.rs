//! # Driver
//!
//! [`Opl2`] owns the bus and the only two pieces of state the chip protocol
//! needs the host to remember:
//!
//! - the `$BD` byte, because drums trigger on a rising edge of their bit and
//!   each write must repeat everything else in the byte;
//! - the last frequency word of every voice, because a new note first has to
//!   key off the old one with the old block and frequency bits.
//!
//! Owning the bus through `&mut self` keeps address/data pairs from ever
//! interleaving. Sharing a chip between threads needs one lock around the
//! whole driver.

use log::debug;

use crate::bus::{Bus, write_register};
use crate::error::OplError;
use crate::instrument::Instrument;
use crate::pitch_table::FrequencyWord;
use crate::regs::{self, CHANNEL_COUNT, Drums, KEY_ON, RhythmFlags, WSE};
use crate::topology::{
    BASS_DRUM_CHANNEL, CYMBAL_OSCILLATOR, HI_HAT_OSCILLATOR, OSCILLATOR_OFFSETS,
    TOM_TOM_CHANNEL, VOICE_COUNT, Voice,
};

/// AR=9 DR=9, applied to every oscillator on reset.
const RESET_ATTACK_DECAY: u8 = 0x99;
/// SL=6 RR=6, applied to every oscillator on reset.
const RESET_SUSTAIN_RELEASE: u8 = 0x66;
/// AR=8 DR=8 for the cymbal and hi-hat.
const PERCUSSION_ATTACK_DECAY: u8 = 0x88;
/// SL=5 RR=5 for the cymbal and hi-hat.
const PERCUSSION_SUSTAIN_RELEASE: u8 = 0x55;

const fn word(block: u8, fnumber: u16) -> FrequencyWord {
    match FrequencyWord::new(block, fnumber) {
        Ok(word) => word,
        Err(_) => panic!("invalid frequency constant"),
    }
}

/// Pitch every channel is parked on after reset, A at block 3.
const REFERENCE_PITCH: FrequencyWord = word(3, 290);
const TOM_TOM_PITCH: FrequencyWord = word(3, 870);
const BASS_DRUM_PITCH: FrequencyWord = word(3, 70);

pub struct Opl2<B: Bus> {
    bus: B,
    rhythm: RhythmFlags,
    last_frequency: [FrequencyWord; VOICE_COUNT],
}

impl<B: Bus> Opl2<B> {
    /// Wrap `bus`. Nothing is written until [`Opl2::reset`].
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            rhythm: RhythmFlags::empty(),
            last_frequency: [FrequencyWord::default(); VOICE_COUNT],
        }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn into_bus(self) -> B {
        self.bus
    }

    /// Shadow of the `$BD` register.
    pub fn rhythm_control(&self) -> RhythmFlags {
        self.rhythm
    }

    /// Frequency word most recently played on `voice`.
    pub fn last_frequency(&self, voice: Voice) -> FrequencyWord {
        self.last_frequency[voice.index() as usize]
    }

    #[inline]
    pub fn write_register(&mut self, register: u8, value: u8) {
        write_register(&mut self.bus, register, value);
    }

    fn set_channel_frequency(&mut self, channel: u8, word: FrequencyWord) {
        self.write_register(regs::FNUM_LOW + channel, word.low_byte());
        self.write_register(regs::KEY_ON_BLOCK_FNUM_HIGH + channel, word.high_byte());
    }

    /// Put the chip into a known, silent state.
    ///
    /// Enables waveform select, turns off CSM and keyboard split, switches the
    /// chip into rhythm mode, gives all 18 oscillators a medium envelope and
    /// parks all 9 channels on the reference pitch with key-on clear. The
    /// `$BD` shadow follows what was written, so percussion triggered after a
    /// mid-playback reset keeps rhythm mode on. Last frequency words go back
    /// to zero. Safe to call at any time, and every call writes the same 57
    /// registers.
    pub fn reset(&mut self) {
        debug!("resetting OPL2");

        self.write_register(regs::WAVEFORM_SELECT_ENABLE, WSE);
        self.write_register(regs::CSM_KEYBOARD_SPLIT, 0x00);
        self.write_register(regs::RHYTHM, RhythmFlags::RHYTHM.bits());

        for offset in OSCILLATOR_OFFSETS {
            self.write_register(regs::ATTACK_DECAY + offset, RESET_ATTACK_DECAY);
            self.write_register(regs::SUSTAIN_RELEASE + offset, RESET_SUSTAIN_RELEASE);
        }

        for channel in 0..CHANNEL_COUNT {
            self.set_channel_frequency(channel, REFERENCE_PITCH);
        }

        self.rhythm = RhythmFlags::RHYTHM;
        self.last_frequency = [FrequencyWord::default(); VOICE_COUNT];
    }

    /// Turn on percussion and tune it.
    ///
    /// Sets the rhythm bit in the `$BD` shadow and writes it, moves the tom-tom
    /// up and the bass drum down, and slows the cymbal and hi-hat envelopes.
    /// The retuning is not undone first, so call [`Opl2::reset`] before calling
    /// this a second time.
    pub fn enable_rhythm_mode(&mut self) {
        debug!("enabling rhythm mode");

        self.rhythm.insert(RhythmFlags::RHYTHM);
        self.write_register(regs::RHYTHM, self.rhythm.bits());

        self.set_channel_frequency(TOM_TOM_CHANNEL, TOM_TOM_PITCH);
        self.set_channel_frequency(BASS_DRUM_CHANNEL, BASS_DRUM_PITCH);

        for oscillator in [CYMBAL_OSCILLATOR, HI_HAT_OSCILLATOR] {
            let offset = OSCILLATOR_OFFSETS[oscillator];
            self.write_register(regs::ATTACK_DECAY + offset, PERCUSSION_ATTACK_DECAY);
            self.write_register(regs::SUSTAIN_RELEASE + offset, PERCUSSION_SUSTAIN_RELEASE);
        }
    }

    /// Set the chip-wide tremolo and vibrato depth bits of `$BD`.
    pub fn set_modulation_depth(&mut self, tremolo_deep: bool, vibrato_deep: bool) {
        self.rhythm.set(RhythmFlags::AM_DEPTH, tremolo_deep);
        self.rhythm.set(RhythmFlags::VIBRATO_DEPTH, vibrato_deep);
        self.write_register(regs::RHYTHM, self.rhythm.bits());
    }

    /// Load `instrument` into `voice`.
    ///
    /// The whole instrument is validated before the first write, so a bad
    /// field leaves the chip untouched. On success exactly 11 registers are
    /// written: envelopes, flags, levels and waveforms (modulator before
    /// carrier each time), then feedback/connection.
    pub fn program_instrument(
        &mut self,
        instrument: &Instrument,
        voice: Voice,
    ) -> Result<(), OplError> {
        instrument.validate()?;
        debug!("programming instrument on voice {}", voice.index());

        let modulator = voice.modulator_offset();
        let carrier = voice.carrier_offset();
        let (m, c) = (&instrument.modulator, &instrument.carrier);

        self.write_register(regs::ATTACK_DECAY + modulator, m.attack_decay());
        self.write_register(regs::SUSTAIN_RELEASE + modulator, m.sustain_release());
        self.write_register(regs::ATTACK_DECAY + carrier, c.attack_decay());
        self.write_register(regs::SUSTAIN_RELEASE + carrier, c.sustain_release());

        self.write_register(regs::AM_VIB_EG_KSR_MULT + modulator, m.flags());
        self.write_register(regs::AM_VIB_EG_KSR_MULT + carrier, c.flags());

        self.write_register(regs::KSL_TOTAL_LEVEL + modulator, m.level());
        self.write_register(regs::KSL_TOTAL_LEVEL + carrier, c.level());

        self.write_register(regs::WAVEFORM_SELECT + modulator, m.waveform_select());
        self.write_register(regs::WAVEFORM_SELECT + carrier, c.waveform_select());

        self.write_register(
            regs::FEEDBACK_CONNECTION + voice.index(),
            instrument.feedback_connection(),
        );
        Ok(())
    }

    /// Start `word` on `voice`, ending whatever it was playing.
    ///
    /// Keys off with the previous word's block and high frequency bits, then
    /// writes the new low byte, then the new high byte with key-on. Keying on
    /// before the frequency bytes are in place glitches the pitch.
    pub fn play_note(&mut self, word: FrequencyWord, voice: Voice) {
        let channel = voice.index();
        let previous = self.last_frequency[channel as usize];

        self.write_register(regs::KEY_ON_BLOCK_FNUM_HIGH + channel, previous.high_byte());
        self.write_register(regs::FNUM_LOW + channel, word.low_byte());
        self.write_register(
            regs::KEY_ON_BLOCK_FNUM_HIGH + channel,
            KEY_ON | word.high_byte(),
        );

        self.last_frequency[channel as usize] = word;
    }

    /// Hit `drums`.
    ///
    /// Writes the `$BD` shadow unchanged, then with the drum bits set, giving
    /// each drum the 0 to 1 edge it triggers on even if it is still ringing
    /// from the last hit. The shadow itself keeps the drum bits clear.
    pub fn trigger_percussion(&mut self, drums: Drums) {
        let baseline = self.rhythm;
        self.write_register(regs::RHYTHM, baseline.bits());
        self.write_register(regs::RHYTHM, (baseline | RhythmFlags::from(drums)).bits());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::{Operator, OscillatorField};
    use crate::pitch_table::Note;
    use crate::recorder::RecordingBus;

    type TestOpl = Opl2<RecordingBus<512>>;

    fn opl() -> TestOpl {
        Opl2::new(RecordingBus::new())
    }

    fn pairs(opl: &TestOpl) -> Vec<(u8, u8)> {
        opl.bus().pairs().collect()
    }

    #[test]
    fn new_driver_writes_nothing() {
        let opl = opl();
        assert!(opl.bus().is_empty());
        assert_eq!(opl.rhythm_control(), RhythmFlags::empty());
    }

    #[test]
    fn reset_sequence() {
        let mut opl = opl();
        opl.reset();
        let writes = pairs(&opl);

        assert_eq!(writes.len(), 57);
        assert_eq!(&writes[..3], &[(0x01, 0x20), (0x08, 0x00), (0xBD, 0x20)]);
        assert_eq!(&writes[3..5], &[(0x60, 0x99), (0x80, 0x66)]);
        assert_eq!(&writes[37..39], &[(0x75, 0x99), (0x95, 0x66)]);
        for (channel, pair) in writes[39..].chunks(2).enumerate() {
            let channel = channel as u8;
            assert_eq!(pair, &[(0xA0 + channel, 0x22), (0xB0 + channel, 0x0D)]);
        }
        assert!(
            writes
                .iter()
                .filter(|(reg, _)| (0xB0..=0xB8).contains(reg))
                .all(|(_, value)| value & KEY_ON == 0)
        );
    }

    #[test]
    fn reset_is_repeatable() {
        let mut opl = opl();
        opl.reset();
        let first = pairs(&opl);
        opl.bus_mut().clear();

        opl.enable_rhythm_mode();
        opl.play_note(FrequencyWord::from_note(Note::C, 4).unwrap(), Voice::V2);
        opl.bus_mut().clear();

        opl.reset();
        assert_eq!(pairs(&opl), first);
        assert_eq!(opl.rhythm_control(), RhythmFlags::RHYTHM);
        assert_eq!(opl.last_frequency(Voice::V2), FrequencyWord::default());
    }

    #[test]
    fn percussion_after_reset_keeps_rhythm_mode() {
        let mut opl = opl();
        opl.reset();
        opl.enable_rhythm_mode();
        for voice in Voice::ALL {
            opl.program_instrument(&Instrument::DEMO, voice).unwrap();
        }
        opl.set_modulation_depth(true, true);

        opl.reset();
        opl.bus_mut().clear();
        opl.trigger_percussion(Drums::SNARE);

        assert_eq!(pairs(&opl), vec![(0xBD, 0x20), (0xBD, 0x28)]);
    }

    #[test]
    fn rhythm_mode_sequence() {
        let mut opl = opl();
        opl.enable_rhythm_mode();
        assert_eq!(
            pairs(&opl),
            vec![
                (0xBD, 0x20),
                (0xA8, 0x66),
                (0xB8, 0x0F),
                (0xA6, 0x46),
                (0xB6, 0x0C),
                (0x71, 0x88),
                (0x91, 0x55),
                (0x75, 0x88),
                (0x95, 0x55),
            ]
        );
        assert_eq!(opl.rhythm_control(), RhythmFlags::RHYTHM);
    }

    #[test]
    fn instrument_writes_in_order() {
        let mut opl = opl();
        opl.program_instrument(&Instrument::DEMO, Voice::V0).unwrap();
        assert_eq!(
            pairs(&opl),
            vec![
                (0x60, 0x66),
                (0x80, 0x61),
                (0x63, 0x64),
                (0x83, 0xB6),
                (0x20, 0xC0),
                (0x23, 0xC0),
                (0x40, 0x3F),
                (0x43, 0x00),
                (0xE0, 0x03),
                (0xE3, 0x03),
                (0xC0, 0x00),
            ]
        );
    }

    #[test]
    fn instrument_uses_voice_oscillators() {
        let mut opl = opl();
        let instrument = Instrument {
            connection: true,
            feedback: 7,
            ..Instrument::DEMO
        };
        opl.program_instrument(&instrument, Voice::V3).unwrap();
        let registers: Vec<u8> = opl.bus().pairs().map(|(reg, _)| reg).collect();
        assert_eq!(
            registers,
            vec![0x68, 0x88, 0x6B, 0x8B, 0x28, 0x2B, 0x48, 0x4B, 0xE8, 0xEB, 0xC3]
        );
        assert_eq!(pairs(&opl)[10], (0xC3, 0x0F));
    }

    #[test]
    fn every_voice_gets_eleven_writes() {
        let mut opl = opl();
        for voice in Voice::ALL {
            opl.program_instrument(&Instrument::default(), voice).unwrap();
        }
        assert_eq!(opl.bus().len(), 66);
    }

    #[test]
    fn bad_instrument_writes_nothing() {
        let mut opl = opl();
        let mut instrument = Instrument::DEMO;
        instrument.carrier.sustain_level = 16;
        assert_eq!(
            opl.program_instrument(&instrument, Voice::V1),
            Err(OplError::OscillatorField {
                operator: Operator::Carrier,
                field: OscillatorField::SustainLevel,
                value: 16,
            })
        );

        let instrument = Instrument {
            feedback: 9,
            ..Instrument::DEMO
        };
        assert_eq!(
            opl.program_instrument(&instrument, Voice::V1),
            Err(OplError::FeedbackOutOfRange(9))
        );
        assert!(opl.bus().is_empty());
    }

    #[test]
    fn note_keys_off_previous_word_first() {
        let mut opl = opl();
        let a3 = FrequencyWord::try_from(0x0D22).unwrap();
        let c5 = FrequencyWord::from_note(Note::C, 5).unwrap();

        opl.play_note(a3, Voice::V0);
        opl.play_note(c5, Voice::V0);

        assert_eq!(
            pairs(&opl),
            vec![
                (0xB0, 0x00),
                (0xA0, 0x22),
                (0xB0, 0x2D),
                (0xB0, 0x0D),
                (0xA0, 0xAC),
                (0xB0, 0x34),
            ]
        );
        assert_eq!(opl.last_frequency(Voice::V0), c5);
    }

    #[test]
    fn voices_track_their_own_previous_note() {
        let mut opl = opl();
        let word = FrequencyWord::new(7, 0x3FF).unwrap();
        opl.play_note(word, Voice::V5);
        opl.play_note(word, Voice::V4);

        assert_eq!(pairs(&opl)[3], (0xB4, 0x00));
        assert_eq!(pairs(&opl)[2], (0xB5, 0x3F));
        assert_eq!(opl.last_frequency(Voice::V0), FrequencyWord::default());
    }

    #[test]
    fn percussion_pulses_from_baseline() {
        let mut opl = opl();
        opl.enable_rhythm_mode();
        opl.bus_mut().clear();

        opl.trigger_percussion(Drums::SNARE);
        opl.trigger_percussion(Drums::BASS_DRUM | Drums::HI_HAT);

        assert_eq!(
            pairs(&opl),
            vec![(0xBD, 0x20), (0xBD, 0x28), (0xBD, 0x20), (0xBD, 0x31)]
        );
        assert_eq!(opl.rhythm_control(), RhythmFlags::RHYTHM);
    }

    #[test]
    fn empty_drum_mask_still_pulses() {
        let mut opl = opl();
        opl.trigger_percussion(Drums::empty());
        assert_eq!(pairs(&opl), vec![(0xBD, 0x00), (0xBD, 0x00)]);
    }

    #[test]
    fn modulation_depth_rides_along_with_drums() {
        let mut opl = opl();
        opl.enable_rhythm_mode();
        opl.set_modulation_depth(true, false);
        opl.bus_mut().clear();

        opl.trigger_percussion(Drums::CYMBAL);
        assert_eq!(pairs(&opl), vec![(0xBD, 0xA0), (0xBD, 0xA2)]);

        opl.set_modulation_depth(false, true);
        assert_eq!(pairs(&opl)[2], (0xBD, 0x60));
    }
}
