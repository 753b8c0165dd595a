use core::fmt::{self, Display};

use crate::instrument::{Operator, OscillatorField};

/// Caller-contract violations caught before anything reaches the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OplError {
    VoiceOutOfRange(u8),
    NoteOutOfRange(u8),
    BlockOutOfRange(u8),
    FrequencyNumberOutOfRange(u16),
    FrequencyWordOutOfRange(u16),
    FeedbackOutOfRange(u8),
    OscillatorField {
        operator: Operator,
        field: OscillatorField,
        value: u8,
    },
}

impl Display for OplError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VoiceOutOfRange(v) => write!(f, "voice {v} out of range (0-5)"),
            Self::NoteOutOfRange(n) => write!(f, "note index {n} out of range (0-11)"),
            Self::BlockOutOfRange(b) => write!(f, "block {b} out of range (0-7)"),
            Self::FrequencyNumberOutOfRange(n) => {
                write!(f, "frequency number {n} out of range (0-1023)")
            }
            Self::FrequencyWordOutOfRange(w) => {
                write!(f, "frequency word ${w:04X} out of range ($0000-$1FFF)")
            }
            Self::FeedbackOutOfRange(fb) => write!(f, "feedback {fb} out of range (0-7)"),
            Self::OscillatorField {
                operator,
                field,
                value,
            } => write!(
                f,
                "{operator} {field} {value} out of range (0-{})",
                field.max()
            ),
        }
    }
}

impl core::error::Error for OplError {}
