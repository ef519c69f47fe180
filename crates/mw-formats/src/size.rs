//! File-size cross-check that resolves how blank instruments are stored.
//!
//! Some writers store a declared length of 0 as zero bytes, others pad it
//! to one word. The header cannot tell them apart, so both totals are
//! computed and compared against the real size.

use mw_ir::{BlankSampleConvention, Format, Instrument, NOTE_SIZE, ORDER_TABLE_LEN, ROWS_PER_PATTERN, TITLE_LEN};

use crate::FormatError;

/// Bytes per instrument record.
pub const INSTRUMENT_HEADER_LEN: u64 = 30;

/// Position count byte plus the ignored byte that follows it.
const SONG_LENGTH_FIELDS: u64 = 2;

/// The two totals a well-formed file can have.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SizeCandidates {
    /// Blank instruments take no bytes.
    pub small: u64,
    /// Blank instruments take one padding word each.
    pub large: u64,
}

/// Expected total size for a layout, a pattern count, and the declared
/// instrument lengths.
pub fn expected_sizes<'a>(
    format: Format,
    pattern_count: usize,
    instruments: impl IntoIterator<Item = &'a Instrument>,
) -> SizeCandidates {
    let mut naive = TITLE_LEN as u64
        + INSTRUMENT_HEADER_LEN * (format.instrument_slots() as u64 - 1)
        + SONG_LENGTH_FIELDS
        + ORDER_TABLE_LEN as u64
        + format.tag_len() as u64
        + format.channels() as u64 * ROWS_PER_PATTERN as u64 * NOTE_SIZE as u64 * pattern_count as u64;

    let mut blanks = 0u64;
    for inst in instruments {
        naive += inst.declared_bytes() as u64;
        if inst.length == 0 {
            blanks += 1;
        }
    }

    SizeCandidates {
        small: naive,
        large: naive + 2 * blanks,
    }
}

/// Pick the blank-instrument convention that explains `actual`.
pub fn resolve_blank_convention(
    actual: u64,
    candidates: SizeCandidates,
) -> Result<BlankSampleConvention, FormatError> {
    if actual == candidates.small {
        Ok(BlankSampleConvention::Empty)
    } else if actual == candidates.large {
        Ok(BlankSampleConvention::PaddingWord)
    } else {
        Err(FormatError::SizeMismatch {
            actual,
            small: candidates.small,
            large: candidates.large,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inst(length: u16) -> Instrument {
        Instrument { length, ..Default::default() }
    }

    #[test]
    fn tagged_layout_totals() {
        let format = Format::from_tag(*b"M.K.");
        let mut instruments = vec![inst(0); 31];
        instruments[0] = inst(2);
        let sizes = expected_sizes(format, 1, &instruments);
        // 20 + 31*30 + 2 + 128 + 4 + 1024 + 4
        assert_eq!(sizes.small, 2112);
        assert_eq!(sizes.large, 2112 + 60);
    }

    #[test]
    fn untagged_layout_has_no_tag_bytes() {
        let sizes = expected_sizes(Format::Unrecognized, 2, &vec![inst(1); 15]);
        // 20 + 15*30 + 2 + 128 + 2048 + 15*2
        assert_eq!(sizes.small, 2678);
        assert_eq!(sizes.large, sizes.small);
    }

    #[test]
    fn eight_channel_patterns_are_twice_as_big() {
        let four = expected_sizes(Format::from_tag(*b"M.K."), 1, &[]);
        let eight = expected_sizes(Format::from_tag(*b"8CHN"), 1, &[]);
        assert_eq!(eight.small - four.small, 1024);
    }

    #[test]
    fn resolution_picks_matching_candidate() {
        let c = SizeCandidates { small: 100, large: 104 };
        assert_eq!(resolve_blank_convention(100, c).unwrap(), BlankSampleConvention::Empty);
        assert_eq!(resolve_blank_convention(104, c).unwrap(), BlankSampleConvention::PaddingWord);
        match resolve_blank_convention(102, c) {
            Err(FormatError::SizeMismatch { actual, small, large }) => {
                assert_eq!((actual, small, large), (102, 100, 104));
            }
            other => panic!("expected size mismatch, got {:?}", other),
        }
    }

    #[test]
    fn equal_candidates_prefer_empty() {
        let c = SizeCandidates { small: 50, large: 50 };
        assert_eq!(resolve_blank_convention(50, c).unwrap(), BlankSampleConvention::Empty);
    }
}
