//! Instrument definitions.

use alloc::string::String;
use alloc::vec::Vec;

/// Decode the stored finetune nibble into a signed value.
///
/// 0-7 are positive, 8-15 map to -8..-1.
pub fn decode_finetune(raw: u8) -> i8 {
    let value = (raw & 0x0F) as i8;
    if value > 7 {
        value - 16
    } else {
        value
    }
}

/// Pack a signed finetune back into its 4-bit storage form.
pub fn encode_finetune(finetune: i8) -> u8 {
    (finetune as u8) & 0x0F
}

/// An instrument: a mono 8-bit waveform plus playback metadata.
///
/// Lengths and loop points are in words (2 bytes) as stored in the file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Instrument {
    /// Instrument name
    pub name: String,
    /// Signed finetune (-8..=7)
    pub finetune: i8,
    /// Volume (0-64 nominal, kept as stored)
    pub volume: u8,
    /// Loop start, in words
    pub loop_offset: u16,
    /// Loop length, in words (0 or 1 = no loop)
    pub loop_length: u16,
    /// Declared length, in words
    pub length: u16,
    /// Raw waveform bytes (signed 8-bit stored as unsigned)
    pub data: Vec<u8>,
}

impl Instrument {
    /// Create a new instrument with no waveform.
    pub fn new(name: &str) -> Self {
        Self {
            name: String::from(name),
            ..Default::default()
        }
    }

    /// Declared waveform size in bytes.
    pub fn declared_bytes(&self) -> usize {
        self.length as usize * 2
    }

    /// Returns true if the instrument has real waveform data.
    ///
    /// A declared length of 0 or 1 word is a blank instrument.
    pub fn is_playable(&self) -> bool {
        self.length >= 2
    }

    /// Returns true if the instrument repeats once its waveform runs out.
    pub fn has_loop(&self) -> bool {
        self.loop_length > 1
    }
}
