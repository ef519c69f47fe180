//! Layout detection from the tag at offset 1080.

use std::io::{Read, Seek};

use mw_ir::{Format, TAG_LEN, TAG_OFFSET};

use crate::reader::ByteReader;
use crate::FormatError;

/// Peek at the format tag and classify the layout.
///
/// A source too short to hold the tag is treated as the untagged layout; the
/// parse that follows will then report the truncation. The cursor is left at
/// offset 0.
pub fn detect_format<R: Read + Seek>(reader: &mut ByteReader<R>) -> Result<Format, FormatError> {
    reader.seek_to(TAG_OFFSET)?;
    let format = match reader.read_array::<TAG_LEN>("format tag") {
        Ok(tag) => Format::from_tag(tag),
        Err(FormatError::Truncated { .. }) => Format::Unrecognized,
        Err(e) => return Err(e),
    };
    reader.seek_to(0)?;

    log::debug!(
        "detected format {:?}: {} channels, {} instrument slots",
        format.tag(),
        format.channels(),
        format.instrument_slots()
    );
    Ok(format)
}
