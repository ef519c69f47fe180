//! Sequential big-endian field reader.
//!
//! Everything above this module reads named fields; byte offsets only show
//! up here and in errors.

use std::io::{self, Read, Seek, SeekFrom};

use binrw::{BinRead, BinReaderExt};

use crate::FormatError;

/// 30-byte instrument record as stored after the title.
#[derive(BinRead, Clone, Debug, PartialEq, Eq)]
#[br(big)]
pub(crate) struct InstrumentHeader {
    pub name: [u8; 22],
    pub length: u16,
    pub finetune: u8,
    pub volume: u8,
    pub loop_offset: u16,
    pub loop_length: u16,
}

/// Forward-only reader over a seekable source.
pub struct ByteReader<R> {
    inner: R,
}

impl<R: Read + Seek> ByteReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Current byte offset.
    pub fn position(&mut self) -> Result<u64, FormatError> {
        Ok(self.inner.stream_position()?)
    }

    /// Move to an absolute offset.
    pub fn seek_to(&mut self, offset: u64) -> Result<(), FormatError> {
        self.inner.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    /// Total size of the source. The cursor is left where it was.
    pub fn stream_len(&mut self) -> Result<u64, FormatError> {
        let here = self.inner.stream_position()?;
        let end = self.inner.seek(SeekFrom::End(0))?;
        self.inner.seek(SeekFrom::Start(here))?;
        Ok(end)
    }

    pub fn read_u8(&mut self, field: &'static str) -> Result<u8, FormatError> {
        let offset = self.position()?;
        self.inner
            .read_be::<u8>()
            .map_err(|e| decode_error(e, field, offset))
    }

    pub fn read_array<const N: usize>(
        &mut self,
        field: &'static str,
    ) -> Result<[u8; N], FormatError> {
        let offset = self.position()?;
        self.inner
            .read_be::<[u8; N]>()
            .map_err(|e| decode_error(e, field, offset))
    }

    pub(crate) fn read_instrument_header(&mut self) -> Result<InstrumentHeader, FormatError> {
        let offset = self.position()?;
        self.inner
            .read_be::<InstrumentHeader>()
            .map_err(|e| decode_error(e, "instrument header", offset))
    }

    /// Read a fixed-width text field, dropping trailing NUL padding.
    pub fn read_string(&mut self, len: usize, field: &'static str) -> Result<String, FormatError> {
        let raw = self.read_bytes(len, field)?;
        Ok(decode_text(&raw))
    }

    /// Read a raw run of `len` bytes.
    pub fn read_bytes(&mut self, len: usize, field: &'static str) -> Result<Vec<u8>, FormatError> {
        let offset = self.position()?;
        let mut buf = vec![0u8; len];
        self.inner.read_exact(&mut buf).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => FormatError::Truncated { field, offset },
            _ => FormatError::Io(e),
        })?;
        Ok(buf)
    }

    /// Consume everything that is left and return how many bytes that was.
    pub fn drain(&mut self) -> Result<usize, FormatError> {
        let count = io::copy(&mut self.inner, &mut io::sink())?;
        Ok(count as usize)
    }
}

/// Text fields are Latin-1 with NUL padding on the right. Interior NULs
/// are kept so the field re-encodes to the same bytes.
pub(crate) fn decode_text(raw: &[u8]) -> String {
    let end = raw.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    raw[..end].iter().map(|&b| b as char).collect()
}

fn decode_error(err: binrw::Error, field: &'static str, offset: u64) -> FormatError {
    if err.is_eof() {
        return FormatError::Truncated { field, offset };
    }
    match err {
        binrw::Error::Io(e) => FormatError::Io(e),
        other => FormatError::Decode { field, offset, source: Box::new(other) },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(bytes: &[u8]) -> ByteReader<Cursor<Vec<u8>>> {
        ByteReader::new(Cursor::new(bytes.to_vec()))
    }

    #[test]
    fn reads_bytes_in_order() {
        let mut r = reader(&[0x01, 0xAC, 0xFF]);
        assert_eq!(r.read_array::<2>("len").unwrap(), [0x01, 0xAC]);
        assert_eq!(r.read_u8("vol").unwrap(), 0xFF);
    }

    #[test]
    fn truncation_names_field_and_offset() {
        let mut r = reader(&[0x00, 0x01, 0x02]);
        r.read_array::<2>("first").unwrap();
        match r.read_array::<2>("second") {
            Err(FormatError::Truncated { field, offset }) => {
                assert_eq!(field, "second");
                assert_eq!(offset, 2);
            }
            other => panic!("expected truncation, got {:?}", other),
        }
    }

    #[test]
    fn strings_drop_trailing_nuls_only() {
        let mut r = reader(b"ab\0cd\0\0\0");
        assert_eq!(r.read_string(8, "title").unwrap(), "ab\0cd");
        assert_eq!(decode_text(&[0, 0]), "");
        assert_eq!(decode_text(&[0xE9]), "\u{e9}");
    }

    #[test]
    fn instrument_header_layout() {
        let mut bytes = b"piano".to_vec();
        bytes.resize(22, 0);
        bytes.extend([0x00, 0x10, 0x0F, 0x40, 0x00, 0x02, 0x00, 0x04]);
        let mut r = reader(&bytes);
        let header = r.read_instrument_header().unwrap();
        assert_eq!(decode_text(&header.name), "piano");
        assert_eq!(header.length, 16);
        assert_eq!(header.finetune, 15);
        assert_eq!(header.volume, 64);
        assert_eq!(header.loop_offset, 2);
        assert_eq!(header.loop_length, 4);
        assert_eq!(r.position().unwrap(), 30);
    }

    #[test]
    fn short_instrument_header_is_truncation() {
        let mut r = reader(&[0; 29]);
        assert!(matches!(
            r.read_instrument_header(),
            Err(FormatError::Truncated { field: "instrument header", offset: 0 })
        ));
    }

    #[test]
    fn drain_counts_the_rest() {
        let mut r = reader(&[1, 2, 3, 4, 5]);
        r.read_bytes(2, "head").unwrap();
        assert_eq!(r.drain().unwrap(), 3);
        assert_eq!(r.drain().unwrap(), 0);
    }

    #[test]
    fn len_keeps_cursor() {
        let mut r = reader(&[0; 10]);
        r.seek_to(4).unwrap();
        assert_eq!(r.stream_len().unwrap(), 10);
        assert_eq!(r.position().unwrap(), 4);
    }
}
