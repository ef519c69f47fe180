//! WAV encoding for 16-bit PCM.

use std::io::{Seek, Write};
use std::path::Path;

use mw_ir::AudioBuffer;

use crate::FormatError;

/// Convert a nominal `-1.0..=1.0` sample to 16-bit PCM, clamping overs.
pub fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

fn spec(buffer: &AudioBuffer, sample_rate: u32) -> hound::WavSpec {
    hound::WavSpec {
        channels: buffer.channels().max(1),
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

/// Write `buffer` as interleaved 16-bit PCM.
pub fn write_wav<W: Write + Seek>(
    w: W,
    buffer: &AudioBuffer,
    sample_rate: u32,
) -> Result<(), FormatError> {
    let mut writer = hound::WavWriter::new(w, spec(buffer, sample_rate))?;
    write_frames(&mut writer, buffer)?;
    writer.finalize()?;
    Ok(())
}

/// Write `buffer` to a WAV file at `path`.
pub fn save_wav(
    path: impl AsRef<Path>,
    buffer: &AudioBuffer,
    sample_rate: u32,
) -> Result<(), FormatError> {
    let mut writer = hound::WavWriter::create(path, spec(buffer, sample_rate))?;
    write_frames(&mut writer, buffer)?;
    writer.finalize()?;
    Ok(())
}

/// Encode `buffer` into an in-memory WAV image.
pub fn buffer_to_wav(buffer: &AudioBuffer, sample_rate: u32) -> Result<Vec<u8>, FormatError> {
    let mut cursor = std::io::Cursor::new(Vec::new());
    write_wav(&mut cursor, buffer, sample_rate)?;
    Ok(cursor.into_inner())
}

fn write_frames<W: Write + Seek>(
    writer: &mut hound::WavWriter<W>,
    buffer: &AudioBuffer,
) -> Result<(), FormatError> {
    if buffer.channels() == 0 {
        return Ok(());
    }
    for i in 0..buffer.frames() {
        for ch in 0..buffer.channels() {
            writer.write_sample(to_i16(buffer.channel(ch)[i]))?;
        }
    }
    Ok(())
}
