//! # Pitch Table
//!
//! The chip takes a pitch as a 10-bit frequency number plus a 3-bit octave
//! block, packed as `(block << 10) | fnumber`. One octave of frequency numbers
//! is enough: other octaves reuse the table with a different block.
//!
//! The table is not perfectly linear at the octave boundary. That is how the
//! hardware behaves, not a driver bug.

use crate::error::OplError;

/// Frequency numbers for C through B.
pub const FNUMBERS: [u16; 12] = [172, 182, 193, 205, 217, 230, 243, 258, 273, 290, 307, 325];

pub const MAX_BLOCK: u8 = 7;
pub const MAX_FNUMBER: u16 = 0x3FF;
pub const MAX_WORD: u16 = 0x1FFF;

#[rustfmt::skip]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Note {
    C, Cs, D, Ds, E, F, Fs, G, Gs, A, As, B,
}

impl Note {
    #[rustfmt::skip]
    pub const ALL: [Note; 12] = [
        Note::C, Note::Cs, Note::D, Note::Ds, Note::E, Note::F,
        Note::Fs, Note::G, Note::Gs, Note::A, Note::As, Note::B,
    ];

    pub const fn from_index(index: u8) -> Result<Note, OplError> {
        if (index as usize) < Self::ALL.len() {
            Ok(Self::ALL[index as usize])
        } else {
            Err(OplError::NoteOutOfRange(index))
        }
    }

    #[inline(always)]
    pub const fn fnumber(self) -> u16 {
        FNUMBERS[self as u8 as usize]
    }
}

/// A packed 13-bit frequency/block word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
pub struct FrequencyWord(u16);

impl FrequencyWord {
    pub const fn new(block: u8, fnumber: u16) -> Result<Self, OplError> {
        if block > MAX_BLOCK {
            return Err(OplError::BlockOutOfRange(block));
        }
        if fnumber > MAX_FNUMBER {
            return Err(OplError::FrequencyNumberOutOfRange(fnumber));
        }
        Ok(FrequencyWord(((block as u16) << 10) | fnumber))
    }

    pub const fn from_note(note: Note, block: u8) -> Result<Self, OplError> {
        Self::new(block, note.fnumber())
    }

    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn block(self) -> u8 {
        (self.0 >> 10) as u8
    }

    #[inline]
    pub const fn fnumber(self) -> u16 {
        self.0 & MAX_FNUMBER
    }

    /// `$A0` byte.
    #[inline]
    pub const fn low_byte(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// Block and frequency high bits as laid out in `$B0`, key-on clear.
    #[inline]
    pub const fn high_byte(self) -> u8 {
        ((self.0 >> 8) & 0x1F) as u8
    }
}

impl TryFrom<u16> for FrequencyWord {
    type Error = OplError;

    fn try_from(word: u16) -> Result<Self, Self::Error> {
        if word > MAX_WORD {
            Err(OplError::FrequencyWordOutOfRange(word))
        } else {
            Ok(FrequencyWord(word))
        }
    }
}

impl From<FrequencyWord> for u16 {
    fn from(word: FrequencyWord) -> u16 {
        word.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_in_block_three() {
        assert_eq!(Note::from_index(9), Ok(Note::A));
        assert_eq!(Note::A.fnumber(), 290);

        let word = FrequencyWord::from_note(Note::A, 3).unwrap();
        assert_eq!(word.raw(), 0x0D22);
        assert_eq!(word.low_byte(), 0x22);
        assert_eq!(word.high_byte(), 0x0D);
        assert_eq!(word.block(), 3);
        assert_eq!(word.fnumber(), 290);
    }

    #[test]
    fn table_is_ascending() {
        assert!(FNUMBERS.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(Note::ALL.map(Note::fnumber), FNUMBERS);
    }

    #[test]
    fn rejects_out_of_range_parts() {
        assert_eq!(Note::from_index(12), Err(OplError::NoteOutOfRange(12)));
        assert_eq!(
            FrequencyWord::new(8, 100),
            Err(OplError::BlockOutOfRange(8))
        );
        assert_eq!(
            FrequencyWord::new(0, 1024),
            Err(OplError::FrequencyNumberOutOfRange(1024))
        );
        assert_eq!(
            FrequencyWord::try_from(0x2000),
            Err(OplError::FrequencyWordOutOfRange(0x2000))
        );
    }

    #[test]
    fn raw_word_round_trips_parts() {
        let word = FrequencyWord::try_from(0x1FFF).unwrap();
        assert_eq!(word.block(), 7);
        assert_eq!(word.fnumber(), 0x3FF);
        assert_eq!(word.high_byte(), 0x1F);
        assert_eq!(FrequencyWord::new(7, 0x3FF), Ok(word));
    }
}
