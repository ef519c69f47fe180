//! ProTracker MOD format parser.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use mw_ir::{
    decode_finetune, Diagnostic, Instrument, Module, Note, Pattern, NOTE_SIZE, ORDER_TABLE_LEN,
    ROWS_PER_PATTERN, TITLE_LEN,
};

use crate::detect::detect_format;
use crate::reader::{decode_text, ByteReader};
use crate::size::{expected_sizes, resolve_blank_convention};
use crate::FormatError;

/// Load a MOD file from bytes.
pub fn load_mod(data: &[u8]) -> Result<Module, FormatError> {
    read_module(Cursor::new(data))
}

/// Load a MOD file from disk.
pub fn load_mod_file(path: impl AsRef<Path>) -> Result<Module, FormatError> {
    let file = File::open(path)?;
    read_module(BufReader::new(file))
}

/// Parse a complete module from a seekable source positioned anywhere.
pub fn read_module<R: Read + Seek>(source: R) -> Result<Module, FormatError> {
    let mut reader = ByteReader::new(source);
    let file_size = reader.stream_len()?;
    let format = detect_format(&mut reader)?;

    let title = reader.read_string(TITLE_LEN, "title")?;
    let mut module = Module::new(&title, format);
    module.file_size = file_size;

    for slot in 1..format.instrument_slots() {
        let header = reader.read_instrument_header()?;
        module.instruments[slot as usize] = Some(Instrument {
            name: decode_text(&header.name),
            finetune: decode_finetune(header.finetune),
            volume: header.volume,
            loop_offset: header.loop_offset,
            loop_length: header.loop_length,
            length: header.length,
            data: Vec::new(),
        });
    }

    read_order_table(&mut reader, &mut module)?;

    if format.tag_bytes().is_some() {
        // Already classified by the detector; it is still physically here.
        reader.read_array::<{ mw_ir::TAG_LEN }>("format tag")?;
    }

    let pattern_count = module.highest_pattern().map_or(0, |p| p as usize + 1);
    for _ in 0..pattern_count {
        let pattern = read_pattern(&mut reader, format.channels())?;
        module.patterns.push(pattern);
    }
    log::debug!(
        "{:?}: {} positions, {} patterns",
        module.title,
        module.order.len(),
        module.patterns.len()
    );

    let candidates = expected_sizes(
        format,
        module.patterns.len(),
        module.real_instruments().map(|(_, inst)| inst),
    );
    module.blank_samples = resolve_blank_convention(file_size, candidates)?;

    let convention = module.blank_samples;
    for inst in module.instruments.iter_mut().flatten() {
        let len = convention.stored_bytes(inst);
        inst.data = reader.read_bytes(len, "sample data")?;
    }

    module.unread = reader.drain()?;
    if module.unread > 0 {
        report(&mut module.diagnostics, Diagnostic::TrailingBytes { count: module.unread });
    }

    Ok(module)
}

/// Song length, the ignored byte, and the fixed 128-entry order table.
fn read_order_table<R: Read + Seek>(
    reader: &mut ByteReader<R>,
    module: &mut Module,
) -> Result<(), FormatError> {
    let position_count = reader.read_u8("song length")?;
    module.restart = reader.read_u8("restart byte")?;
    module.order_table = reader.read_array::<ORDER_TABLE_LEN>("order table")?;
    module.position_count = position_count;

    // Counts above 128 read as zeros past the physical table.
    module.order = (0..position_count as usize)
        .map(|i| module.order_table.get(i).copied().unwrap_or(0))
        .collect();

    if let Some(index) = module
        .order_table
        .iter()
        .enumerate()
        .skip(position_count as usize)
        .position(|(_, &v)| v != 0)
    {
        let index = index + position_count as usize;
        report(
            &mut module.diagnostics,
            Diagnostic::OrderTableOverflow {
                position_count,
                index: index as u8,
                value: module.order_table[index],
            },
        );
    }

    // All 128 entries count, including the unused tail and its zeros.
    let named: BTreeSet<u8> = module.order_table.iter().copied().collect();
    if let Some(&highest) = named.last() {
        let missing: Vec<u8> = (0..=highest).filter(|p| !named.contains(p)).collect();
        if !missing.is_empty() {
            report(
                &mut module.diagnostics,
                Diagnostic::UnreferencedPatterns { patterns: missing },
            );
        }
    }

    Ok(())
}

/// Parse one 64-row pattern.
fn read_pattern<R: Read + Seek>(
    reader: &mut ByteReader<R>,
    channels: u8,
) -> Result<Pattern, FormatError> {
    let mut pattern = Pattern::new(channels);
    for row in 0..ROWS_PER_PATTERN {
        for ch in 0..channels {
            let bytes = reader.read_array::<NOTE_SIZE>("pattern note")?;
            *pattern.note_mut(row, ch) = Note::decode(bytes);
        }
    }
    Ok(pattern)
}

fn report(diagnostics: &mut Vec<Diagnostic>, diagnostic: Diagnostic) {
    log::warn!("{}", diagnostic);
    diagnostics.push(diagnostic);
}
