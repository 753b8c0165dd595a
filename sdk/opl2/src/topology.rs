//! # Oscillator Topology
//!
//! The chip has 18 oscillators but addresses them through offsets that skip
//! `$06-$07` and `$0E-$0F`, so a logical oscillator index has to go through
//! [`OSCILLATOR_OFFSETS`]. A melodic voice is a modulator/carrier pair of
//! those offsets, listed in [`VOICE_OSCILLATORS`].
//!
//! Only voices 0-5 are exposed. With rhythm mode on, channels 6-8 belong to
//! the percussion generators and are driven through register `$BD` instead.

use crate::error::OplError;

/// Register offset of each logical oscillator, 0-17.
#[rustfmt::skip]
pub const OSCILLATOR_OFFSETS: [u8; 18] = [
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05,
    0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D,
    0x10, 0x11, 0x12, 0x13, 0x14, 0x15,
];

/// (modulator, carrier) oscillator offsets for each melodic voice.
pub const VOICE_OSCILLATORS: [(u8, u8); VOICE_COUNT] = [
    (0x00, 0x03),
    (0x01, 0x04),
    (0x02, 0x05),
    (0x08, 0x0B),
    (0x09, 0x0C),
    (0x0A, 0x0D),
];

pub const VOICE_COUNT: usize = 6;

/// Logical oscillator driving the cymbal in rhythm mode.
pub const CYMBAL_OSCILLATOR: usize = 13;
/// Logical oscillator driving the hi-hat in rhythm mode.
pub const HI_HAT_OSCILLATOR: usize = 17;

/// Percussion channel carrying the bass drum pitch.
pub const BASS_DRUM_CHANNEL: u8 = 6;
/// Percussion channel carrying the tom-tom pitch.
pub const TOM_TOM_CHANNEL: u8 = 8;

/// A melodic voice index, always 0-5.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Voice(u8);

impl Voice {
    pub const V0: Voice = Voice(0);
    pub const V1: Voice = Voice(1);
    pub const V2: Voice = Voice(2);
    pub const V3: Voice = Voice(3);
    pub const V4: Voice = Voice(4);
    pub const V5: Voice = Voice(5);

    pub const ALL: [Voice; VOICE_COUNT] = [
        Self::V0,
        Self::V1,
        Self::V2,
        Self::V3,
        Self::V4,
        Self::V5,
    ];

    pub const fn new(index: u8) -> Result<Self, OplError> {
        if (index as usize) < VOICE_COUNT {
            Ok(Voice(index))
        } else {
            Err(OplError::VoiceOutOfRange(index))
        }
    }

    /// Channel number, used directly by the `$A0`, `$B0` and `$C0` banks.
    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn modulator_offset(self) -> u8 {
        VOICE_OSCILLATORS[self.0 as usize].0
    }

    #[inline]
    pub const fn carrier_offset(self) -> u8 {
        VOICE_OSCILLATORS[self.0 as usize].1
    }
}

impl TryFrom<u8> for Voice {
    type Error = OplError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Voice::new(index)
    }
}

impl From<Voice> for u8 {
    fn from(voice: Voice) -> u8 {
        voice.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voice_pairs_match_table() {
        let pairs: Vec<(u8, u8)> = Voice::ALL
            .iter()
            .map(|v| (v.modulator_offset(), v.carrier_offset()))
            .collect();
        assert_eq!(pairs, VOICE_OSCILLATORS.to_vec());
        assert_eq!(Voice::V3.modulator_offset(), 0x08);
        assert_eq!(Voice::V3.carrier_offset(), 0x0B);
    }

    #[test]
    fn voice_pairs_are_real_oscillators() {
        for (modulator, carrier) in VOICE_OSCILLATORS {
            assert!(OSCILLATOR_OFFSETS.contains(&modulator));
            assert!(OSCILLATOR_OFFSETS.contains(&carrier));
            assert_eq!(carrier - modulator, 3);
        }
    }

    #[test]
    fn offsets_skip_the_gaps() {
        for gap in [0x06, 0x07, 0x0E, 0x0F] {
            assert!(!OSCILLATOR_OFFSETS.contains(&gap));
        }
        assert_eq!(OSCILLATOR_OFFSETS[CYMBAL_OSCILLATOR], 0x11);
        assert_eq!(OSCILLATOR_OFFSETS[HI_HAT_OSCILLATOR], 0x15);
    }

    #[test]
    fn rejects_voices_past_five() {
        assert_eq!(Voice::try_from(5), Ok(Voice::V5));
        assert_eq!(Voice::try_from(6), Err(OplError::VoiceOutOfRange(6)));
        assert_eq!(Voice::new(255), Err(OplError::VoiceOutOfRange(255)));
    }
}
