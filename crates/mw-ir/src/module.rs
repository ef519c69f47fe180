//! The parsed song.

use alloc::string::String;
use alloc::vec::Vec;

use crate::diagnostic::Diagnostic;
use crate::format::Format;
use crate::instrument::Instrument;
use crate::pattern::Pattern;

/// Length of the title field.
pub const TITLE_LEN: usize = 20;

/// The order table always occupies this many bytes on disk.
pub const ORDER_TABLE_LEN: usize = 128;

/// How blank instruments (declared length 0) are laid out in the waveform
/// section. Only the total file size tells the two apart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlankSampleConvention {
    /// Blank instruments occupy no bytes.
    #[default]
    Empty,
    /// Blank instruments occupy one padding word (2 bytes).
    PaddingWord,
}

impl BlankSampleConvention {
    /// Number of bytes stored on disk for an instrument's waveform.
    pub fn stored_bytes(&self, instrument: &Instrument) -> usize {
        match self {
            BlankSampleConvention::PaddingWord if instrument.length == 0 => 2,
            _ => instrument.declared_bytes(),
        }
    }
}

/// A complete MOD song.
#[derive(Clone, Debug)]
pub struct Module {
    /// Song title, trailing NULs removed
    pub title: String,
    /// Layout variant
    pub format: Format,
    /// Instrument slots; slot 0 is always `None`
    pub instruments: Vec<Option<Instrument>>,
    /// Stored song length
    pub position_count: u8,
    /// The byte after the song length, ignored by players
    pub restart: u8,
    /// Raw order table as stored
    pub order_table: [u8; ORDER_TABLE_LEN],
    /// Pattern indices to play, `position_count` long
    pub order: Vec<u8>,
    /// Patterns `0..=max(order)`
    pub patterns: Vec<Pattern>,
    /// Total size of the source in bytes
    pub file_size: u64,
    /// Bytes left after the last waveform
    pub unread: usize,
    /// Resolved layout of blank instruments
    pub blank_samples: BlankSampleConvention,
    /// Anomalies found while parsing
    pub diagnostics: Vec<Diagnostic>,
}

impl Module {
    /// Create an empty song with blank instrument slots and no patterns.
    pub fn new(title: &str, format: Format) -> Self {
        let slots = format.instrument_slots() as usize;
        let mut instruments = Vec::with_capacity(slots);
        instruments.push(None);
        for _ in 1..slots {
            instruments.push(Some(Instrument::default()));
        }

        Self {
            title: String::from(title),
            format,
            instruments,
            position_count: 0,
            restart: 0,
            order_table: [0; ORDER_TABLE_LEN],
            order: Vec::new(),
            patterns: Vec::new(),
            file_size: 0,
            unread: 0,
            blank_samples: BlankSampleConvention::Empty,
            diagnostics: Vec::new(),
        }
    }

    /// Replace the order table, keeping the raw copy and the stored count in sync.
    pub fn set_order(&mut self, order: &[u8]) {
        let count = order.len().min(u8::MAX as usize);
        self.position_count = count as u8;
        self.order = order[..count].to_vec();
        self.order_table = [0; ORDER_TABLE_LEN];
        for (slot, &value) in self.order_table.iter_mut().zip(&self.order) {
            *slot = value;
        }
    }

    /// Number of channels.
    pub fn channels(&self) -> u8 {
        self.format.channels()
    }

    /// Number of instrument slots, including slot 0.
    pub fn instrument_slots(&self) -> u8 {
        self.format.instrument_slots()
    }

    /// Look up an instrument by slot. Slot 0 and out-of-range slots give `None`.
    pub fn instrument(&self, slot: u8) -> Option<&Instrument> {
        self.instruments.get(slot as usize).and_then(Option::as_ref)
    }

    /// Mutable instrument lookup.
    pub fn instrument_mut(&mut self, slot: u8) -> Option<&mut Instrument> {
        self.instruments.get_mut(slot as usize).and_then(Option::as_mut)
    }

    /// Real instruments, in slot order, with their slot numbers.
    pub fn real_instruments(&self) -> impl Iterator<Item = (u8, &Instrument)> {
        self.instruments
            .iter()
            .enumerate()
            .filter_map(|(slot, inst)| inst.as_ref().map(|i| (slot as u8, i)))
    }

    /// The pattern played at an order-table position.
    pub fn pattern_at(&self, order_index: usize) -> Option<&Pattern> {
        let pattern = *self.order.get(order_index)?;
        self.patterns.get(pattern as usize)
    }

    /// Highest pattern index the order table names.
    pub fn highest_pattern(&self) -> Option<u8> {
        self.order.iter().copied().max()
    }

    /// Total waveform bytes across all instruments.
    pub fn sample_bytes(&self) -> usize {
        self.real_instruments().map(|(_, i)| i.data.len()).sum()
    }
}
