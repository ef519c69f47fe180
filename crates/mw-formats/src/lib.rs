//! Format parsers for modwave.
//!
//! Parses MOD files into the core types and writes rendered audio as WAV.

mod detect;
mod mod_format;
mod mod_writer;
mod reader;
mod size;
mod wav_format;

pub use detect::detect_format;
pub use mod_format::{load_mod, load_mod_file, read_module};
pub use mod_writer::{save_mod, write_mod};
pub use reader::ByteReader;
pub use size::{expected_sizes, resolve_blank_convention, SizeCandidates, INSTRUMENT_HEADER_LEN};
pub use wav_format::{buffer_to_wav, save_wav, to_i16, write_wav};

/// Error type for format parsing and audio output.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// The source ended inside a required field
    #[error("unexpected end of data reading {field} at offset {offset}")]
    Truncated { field: &'static str, offset: u64 },
    /// The file size fits neither blank-instrument layout
    #[error("file size was {actual}, expected {small} or {large}")]
    SizeMismatch { actual: u64, small: u64, large: u64 },
    /// A field decoded to something unusable
    #[error("could not decode {field} at offset {offset}")]
    Decode {
        field: &'static str,
        offset: u64,
        #[source]
        source: Box<binrw::Error>,
    },
    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// WAV output failed
    #[error("WAV output failed: {0}")]
    Wav(#[from] hound::Error),
}
