//! # Instruments
//!
//! An [`Instrument`] is a modulator/carrier pair of [`Oscillator`] envelopes
//! plus the voice-wide connection and feedback settings. Instruments are plain
//! data owned by the caller; the driver writes them through and keeps no copy.
//!
//! ## Register packing
//!
//! | Register | Bit 7 | Bit 6 | Bit 5 | Bit 4 | Bits 3-0 |
//! |----------|-------|-------|-------|-------|----------|
//! | `$20` | AM | VIB | SUS | KSR | MULT |
//! | `$40` | KSL (7-6) | | TL (5-0) | | |
//! | `$60` | AR (7-4) | | | | DR |
//! | `$80` | SL (7-4) | | | | RR |
//! | `$E0` | | | | | WS (1-0) |
//! | `$C0` | | | | | FB (3-1), C (0) |

use core::fmt::{self, Display};

use bit_field::BitField;

use crate::error::OplError;

const NIBBLE: u8 = 0x0F;
const KSL_MASK: u8 = 0x03;
const TL_MASK: u8 = 0x3F;
const WS_MASK: u8 = 0x03;
const FB_MASK: u8 = 0x07;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Operator {
    Modulator,
    Carrier,
}

impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Modulator => f.write_str("modulator"),
            Operator::Carrier => f.write_str("carrier"),
        }
    }
}

/// Width-limited fields of an [`Oscillator`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OscillatorField {
    AttackRate,
    DecayRate,
    SustainLevel,
    ReleaseRate,
    Multiplier,
    KeyScaleLevel,
    TotalLevel,
    Waveform,
}

impl OscillatorField {
    /// Largest value the field's register bits can hold.
    pub const fn max(self) -> u8 {
        match self {
            Self::AttackRate
            | Self::DecayRate
            | Self::SustainLevel
            | Self::ReleaseRate
            | Self::Multiplier => NIBBLE,
            Self::KeyScaleLevel => KSL_MASK,
            Self::TotalLevel => TL_MASK,
            Self::Waveform => WS_MASK,
        }
    }
}

impl Display for OscillatorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AttackRate => "attack rate",
            Self::DecayRate => "decay rate",
            Self::SustainLevel => "sustain level",
            Self::ReleaseRate => "release rate",
            Self::Multiplier => "multiplier",
            Self::KeyScaleLevel => "key scale level",
            Self::TotalLevel => "total level",
            Self::Waveform => "waveform",
        })
    }
}

/// Envelope and waveform settings of one oscillator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Oscillator {
    /// 0-15
    pub attack_rate: u8,
    /// 0-15
    pub decay_rate: u8,
    /// 0-15, higher is quieter
    pub sustain_level: u8,
    /// 0-15
    pub release_rate: u8,
    /// Amplitude modulation (AM).
    pub tremolo: bool,
    pub vibrato: bool,
    /// Hold the sustain level until key-off.
    pub sustain: bool,
    /// Shorten the envelope at higher pitches (KSR).
    pub key_scale_rate: bool,
    /// 0-15, frequency multiplier code.
    pub multiplier: u8,
    /// 0-3, attenuation rise with pitch.
    pub key_scale_level: u8,
    /// 0-63, base attenuation, 0 is loudest.
    pub total_level: u8,
    /// 0-3, index into the chip's waveform table.
    pub waveform: u8,
}

impl Oscillator {
    /// Check every field against its register width.
    pub fn validate(&self, operator: Operator) -> Result<(), OplError> {
        let fields = [
            (OscillatorField::AttackRate, self.attack_rate),
            (OscillatorField::DecayRate, self.decay_rate),
            (OscillatorField::SustainLevel, self.sustain_level),
            (OscillatorField::ReleaseRate, self.release_rate),
            (OscillatorField::Multiplier, self.multiplier),
            (OscillatorField::KeyScaleLevel, self.key_scale_level),
            (OscillatorField::TotalLevel, self.total_level),
            (OscillatorField::Waveform, self.waveform),
        ];

        for (field, value) in fields {
            if value > field.max() {
                return Err(OplError::OscillatorField {
                    operator,
                    field,
                    value,
                });
            }
        }
        Ok(())
    }

    /// `$60` byte.
    pub fn attack_decay(&self) -> u8 {
        let mut byte = 0u8;
        byte.set_bits(4..8, self.attack_rate & NIBBLE)
            .set_bits(0..4, self.decay_rate & NIBBLE);
        byte
    }

    /// `$80` byte.
    pub fn sustain_release(&self) -> u8 {
        let mut byte = 0u8;
        byte.set_bits(4..8, self.sustain_level & NIBBLE)
            .set_bits(0..4, self.release_rate & NIBBLE);
        byte
    }

    /// `$20` byte.
    pub fn flags(&self) -> u8 {
        let mut byte = 0u8;
        byte.set_bit(7, self.tremolo)
            .set_bit(6, self.vibrato)
            .set_bit(5, self.sustain)
            .set_bit(4, self.key_scale_rate)
            .set_bits(0..4, self.multiplier & NIBBLE);
        byte
    }

    /// `$40` byte.
    pub fn level(&self) -> u8 {
        let mut byte = 0u8;
        byte.set_bits(6..8, self.key_scale_level & KSL_MASK)
            .set_bits(0..6, self.total_level & TL_MASK);
        byte
    }

    /// `$E0` byte.
    pub fn waveform_select(&self) -> u8 {
        self.waveform & WS_MASK
    }
}

/// A two-operator FM patch.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Instrument {
    pub modulator: Oscillator,
    pub carrier: Oscillator,
    /// `true` plays both oscillators side by side (additive), `false` has the
    /// modulator drive the carrier (FM).
    pub connection: bool,
    /// 0-7, modulator self-feedback.
    pub feedback: u8,
}

impl Instrument {
    /// Bright organ-like patch used by the scale demo.
    pub const DEMO: Instrument = Instrument {
        modulator: Oscillator {
            attack_rate: 0x6,
            decay_rate: 0x6,
            sustain_level: 0x6,
            release_rate: 0x1,
            tremolo: true,
            vibrato: true,
            sustain: false,
            key_scale_rate: false,
            multiplier: 0,
            key_scale_level: 0,
            total_level: 0x3F,
            waveform: 3,
        },
        carrier: Oscillator {
            attack_rate: 0x6,
            decay_rate: 0x4,
            sustain_level: 0xB,
            release_rate: 0x6,
            tremolo: true,
            vibrato: true,
            sustain: false,
            key_scale_rate: false,
            multiplier: 0,
            key_scale_level: 0,
            total_level: 0x00,
            waveform: 3,
        },
        connection: false,
        feedback: 0,
    };

    pub fn validate(&self) -> Result<(), OplError> {
        self.modulator.validate(Operator::Modulator)?;
        self.carrier.validate(Operator::Carrier)?;
        if self.feedback > FB_MASK {
            return Err(OplError::FeedbackOutOfRange(self.feedback));
        }
        Ok(())
    }

    /// `$C0` byte.
    pub fn feedback_connection(&self) -> u8 {
        let mut byte = 0u8;
        byte.set_bits(1..4, self.feedback & FB_MASK)
            .set_bit(0, self.connection);
        byte
    }
}
