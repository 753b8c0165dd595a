//! # Chip Register Map
//!
//! | Base | Register | Indexed by |
//! |------|----------|------------|
//! | `$01` | Waveform select enable | - |
//! | `$08` | CSM speech mode / keyboard split | - |
//! | `$20` | AM / VIB / EG sustain / KSR / multiplier | oscillator offset |
//! | `$40` | Key scale level / total level | oscillator offset |
//! | `$60` | Attack rate / decay rate | oscillator offset |
//! | `$80` | Sustain level / release rate | oscillator offset |
//! | `$A0` | Frequency number, low 8 bits | channel |
//! | `$B0` | Key on / block / frequency number high bits | channel |
//! | `$BD` | AM depth / vibrato depth / rhythm mode / drum triggers | - |
//! | `$C0` | Feedback / connection | channel |
//! | `$E0` | Waveform select | oscillator offset |

pub const WAVEFORM_SELECT_ENABLE: u8 = 0x01;
pub const CSM_KEYBOARD_SPLIT: u8 = 0x08;
pub const AM_VIB_EG_KSR_MULT: u8 = 0x20;
pub const KSL_TOTAL_LEVEL: u8 = 0x40;
pub const ATTACK_DECAY: u8 = 0x60;
pub const SUSTAIN_RELEASE: u8 = 0x80;
pub const FNUM_LOW: u8 = 0xA0;
pub const KEY_ON_BLOCK_FNUM_HIGH: u8 = 0xB0;
pub const RHYTHM: u8 = 0xBD;
pub const FEEDBACK_CONNECTION: u8 = 0xC0;
pub const WAVEFORM_SELECT: u8 = 0xE0;

/// `WSE` bit of register `$01`.
pub const WSE: u8 = 0x20;
/// Key-on bit of the `$B0` channel registers.
pub const KEY_ON: u8 = 0x20;

/// Melodic channels the chip has, including the three rhythm mode borrows.
pub const CHANNEL_COUNT: u8 = 9;

bitflags::bitflags! {
    /// Register `$BD`.
    ///
    /// The driver keeps a shadow copy because the drum bits fire on a rising
    /// edge and every write has to carry the rest of the byte along.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct RhythmFlags: u8 {
        /// Tremolo depth 4.8 dB instead of 1 dB.
        const AM_DEPTH      = 0b1000_0000;
        /// Vibrato depth 14 cents instead of 7.
        const VIBRATO_DEPTH = 0b0100_0000;
        /// Channels 6-8 become percussion.
        const RHYTHM        = 0b0010_0000;
        const BASS_DRUM     = 0b0001_0000;
        const SNARE         = 0b0000_1000;
        const TOM_TOM       = 0b0000_0100;
        const CYMBAL        = 0b0000_0010;
        const HI_HAT        = 0b0000_0001;
    }

    /// Percussion trigger bits, the low five bits of `$BD`.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct Drums: u8 {
        const BASS_DRUM = 0b0001_0000;
        const SNARE     = 0b0000_1000;
        const TOM_TOM   = 0b0000_0100;
        const CYMBAL    = 0b0000_0010;
        const HI_HAT    = 0b0000_0001;
    }
}

impl From<Drums> for RhythmFlags {
    fn from(drums: Drums) -> Self {
        RhythmFlags::from_bits_truncate(drums.bits())
    }
}

/// Short name of the register at `index`, for traces and logs.
pub fn register_name(index: u8) -> &'static str {
    match index {
        WAVEFORM_SELECT_ENABLE => "WSE",
        CSM_KEYBOARD_SPLIT => "CSM/SEL",
        RHYTHM => "AM/VIB depth/rhythm",
        0x20..=0x35 => "AM/VIB/EG/KSR/MULT",
        0x40..=0x55 => "KSL/TL",
        0x60..=0x75 => "AR/DR",
        0x80..=0x95 => "SL/RR",
        0xA0..=0xA8 => "FNUM low",
        0xB0..=0xB8 => "KON/BLOCK/FNUM high",
        0xC0..=0xC8 => "FB/C",
        0xE0..=0xF5 => "WS",
        _ => "unknown",
    }
}
