//! Pattern and note types for MOD sequences.

use alloc::vec::Vec;
use crate::effects::Effect;

/// Every MOD pattern has exactly this many rows.
pub const ROWS_PER_PATTERN: usize = 64;

/// Size of one encoded note in bytes.
pub const NOTE_SIZE: usize = 4;

/// A single note event in a pattern.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Note {
    /// Instrument slot (0 = keep the channel's current instrument)
    pub instrument: u8,
    /// Amiga period, 12 bits (0 = no new pitch on this row)
    pub period: u16,
    /// Effect code (0-15)
    pub effect: u8,
    /// Effect parameter
    pub parameter: u8,
}

impl Note {
    /// Create an empty note.
    pub const fn empty() -> Self {
        Self {
            instrument: 0,
            period: 0,
            effect: 0,
            parameter: 0,
        }
    }

    /// Decode a note from its 4-byte pattern encoding.
    ///
    /// Byte 0: upper 4 bits of instrument, upper 4 bits of period
    /// Byte 1: lower 8 bits of period
    /// Byte 2: lower 4 bits of instrument, effect code
    /// Byte 3: effect parameter
    pub const fn decode(data: [u8; NOTE_SIZE]) -> Self {
        Self {
            instrument: (data[0] & 0xF0) | (data[2] >> 4),
            period: 256 * (data[0] & 0x0F) as u16 + data[1] as u16,
            effect: data[2] & 0x0F,
            parameter: data[3],
        }
    }

    /// Encode back into the 4-byte pattern layout. Inverse of [`Note::decode`].
    pub const fn encode(&self) -> [u8; NOTE_SIZE] {
        [
            (self.instrument & 0xF0) | ((self.period >> 8) as u8 & 0x0F),
            self.period as u8,
            (self.instrument << 4) | (self.effect & 0x0F),
            self.parameter,
        ]
    }

    /// Classify the effect column.
    pub fn effect_command(&self) -> Effect {
        Effect::parse(self.effect, self.parameter)
    }
}

/// A 64-row grid of notes, one column per channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    /// Number of channels
    pub channels: u8,
    /// Pattern data, stored row-major: data[row * channels + channel]
    pub data: Vec<Note>,
}

impl Pattern {
    /// Create a new pattern with empty notes.
    pub fn new(channels: u8) -> Self {
        Self {
            channels,
            data: alloc::vec![Note::empty(); ROWS_PER_PATTERN * channels as usize],
        }
    }

    /// Number of rows. Always [`ROWS_PER_PATTERN`].
    pub fn rows(&self) -> usize {
        ROWS_PER_PATTERN
    }

    /// Get a reference to a note.
    pub fn note(&self, row: usize, channel: u8) -> &Note {
        debug_assert!(row < ROWS_PER_PATTERN);
        debug_assert!(channel < self.channels);
        &self.data[row * self.channels as usize + channel as usize]
    }

    /// Get a mutable reference to a note.
    pub fn note_mut(&mut self, row: usize, channel: u8) -> &mut Note {
        debug_assert!(row < ROWS_PER_PATTERN);
        debug_assert!(channel < self.channels);
        &mut self.data[row * self.channels as usize + channel as usize]
    }

    /// All notes in a row, in channel order.
    pub fn row(&self, row: usize) -> &[Note] {
        let start = row * self.channels as usize;
        &self.data[start..start + self.channels as usize]
    }
}
