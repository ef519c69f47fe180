//! MOD layout variants.

/// Byte offset of the 4-byte format tag in files that carry one.
pub const TAG_OFFSET: u64 = 1080;

/// Length of the format tag.
pub const TAG_LEN: usize = 4;

/// Known tags and the channel count they imply. All of them use 32
/// instrument slots.
const KNOWN_TAGS: [(&[u8; TAG_LEN], u8); 9] = [
    (b"M.K.", 4),
    (b"FLT4", 4),
    (b"M!K!", 4),
    (b"4CHN", 4),
    (b"6CHN", 6),
    (b"OCTA", 8),
    (b"FLT8", 8),
    (b"CD81", 8),
    (b"8CHN", 8),
];

/// Which layout a file uses, decided once from the tag at [`TAG_OFFSET`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// A tagged layout: 31 instruments, tag present in the stream.
    Recognized {
        tag: [u8; TAG_LEN],
        channels: u8,
        instruments: u8,
    },
    /// Old untagged layout: 15 instruments, 4 channels, no tag bytes.
    Unrecognized,
}

impl Format {
    /// Classify a tag.
    pub fn from_tag(tag: [u8; TAG_LEN]) -> Self {
        KNOWN_TAGS
            .iter()
            .find(|(known, _)| **known == tag)
            .map(|&(_, channels)| Format::Recognized {
                tag,
                channels,
                instruments: 32,
            })
            .unwrap_or(Format::Unrecognized)
    }

    /// Number of channels.
    pub fn channels(&self) -> u8 {
        match self {
            Format::Recognized { channels, .. } => *channels,
            Format::Unrecognized => 4,
        }
    }

    /// Number of instrument slots, including the unused slot 0.
    pub fn instrument_slots(&self) -> u8 {
        match self {
            Format::Recognized { instruments, .. } => *instruments,
            Format::Unrecognized => 16,
        }
    }

    /// The tag as text, empty for the untagged layout.
    pub fn tag(&self) -> &str {
        match self {
            Format::Recognized { tag, .. } => core::str::from_utf8(tag).unwrap_or(""),
            Format::Unrecognized => "",
        }
    }

    /// Raw tag bytes, if the layout stores them.
    pub fn tag_bytes(&self) -> Option<[u8; TAG_LEN]> {
        match self {
            Format::Recognized { tag, .. } => Some(*tag),
            Format::Unrecognized => None,
        }
    }

    /// Bytes the tag occupies in the stream (0 or 4).
    pub fn tag_len(&self) -> usize {
        match self {
            Format::Recognized { .. } => TAG_LEN,
            Format::Unrecognized => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_channel_tags() {
        for tag in [b"M.K.", b"FLT4", b"M!K!", b"4CHN"] {
            let format = Format::from_tag(*tag);
            assert_eq!(format.channels(), 4);
            assert_eq!(format.instrument_slots(), 32);
            assert_eq!(format.tag().as_bytes(), tag);
        }
    }

    #[test]
    fn six_and_eight_channel_tags() {
        assert_eq!(Format::from_tag(*b"6CHN").channels(), 6);
        for tag in [b"OCTA", b"FLT8", b"CD81", b"8CHN"] {
            assert_eq!(Format::from_tag(*tag).channels(), 8);
        }
    }

    #[test]
    fn unknown_tag_falls_back_to_old_layout() {
        let format = Format::from_tag(*b"\0\0\0\0");
        assert_eq!(format, Format::Unrecognized);
        assert_eq!(format.channels(), 4);
        assert_eq!(format.instrument_slots(), 16);
        assert_eq!(format.tag(), "");
        assert_eq!(format.tag_len(), 0);
        assert_eq!(format.tag_bytes(), None);
    }
}
