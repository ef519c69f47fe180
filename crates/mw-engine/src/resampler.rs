//! Waveform pitch conversion.
//!
//! An instrument's raw 8-bit waveform is stretched or squeezed to the output
//! sample rate for one period value, by linear interpolation. Results are
//! cached per (instrument slot, period).

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use mw_ir::Instrument;

/// Amiga clock constant: playback rate in Hz is this divided by the period.
pub const PERIOD_CLOCK: f64 = 3_563_219.0;

/// Widen a signed 8-bit sample to 16 bits, mapping 127 to 32767 and -128
/// to -32768.
pub const fn sample_to_i16(byte: u8) -> i16 {
    let value = byte as i8 as i32;
    (value * 257 + 128) as i16
}

/// Source playback rate for a period.
pub fn source_rate(period: u16) -> f64 {
    PERIOD_CLOCK / period as f64
}

/// Output frames a waveform of `raw_len` bytes lasts at `period`.
pub fn output_len(raw_len: usize, period: u16, output_rate: u32) -> usize {
    if period == 0 {
        return 0;
    }
    libm::round(output_rate as f64 * raw_len as f64 / source_rate(period)) as usize
}

/// Resample a waveform for playback at `period`.
///
/// The first output frame is the first raw sample and the last is the last
/// raw sample. Frame `n` in between reads source position
/// `n / (N - 1) * (raw - 1)`, interpolating between its two neighbours.
pub fn resample(data: &[u8], period: u16, output_rate: u32) -> Vec<i16> {
    let Some(&last) = data.last() else {
        return Vec::new();
    };
    let frames = output_len(data.len(), period, output_rate);
    match frames {
        0 => return Vec::new(),
        1 => return alloc::vec![sample_to_i16(last)],
        _ => {}
    }

    // Positions are kept as the exact fraction n * (raw - 1) / (N - 1) so
    // integer source positions reproduce the raw sample.
    let span = (data.len() - 1) as u64;
    let steps = (frames - 1) as u64;
    let mut out = Vec::with_capacity(frames);
    for n in 0..steps {
        let numerator = n * span;
        let index = (numerator / steps) as usize;
        let fraction = (numerator % steps) as f64 / steps as f64;

        let a = sample_to_i16(data[index]) as f64;
        let b = data
            .get(index + 1)
            .map_or(a, |&next| sample_to_i16(next) as f64);
        out.push(libm::round(a + (b - a) * fraction) as i16);
    }
    out.push(sample_to_i16(last));
    out
}

/// Resampled waveforms keyed by (instrument slot, period).
#[derive(Clone, Debug)]
pub struct ResampleCache {
    output_rate: u32,
    entries: BTreeMap<(u8, u16), Vec<i16>>,
}

impl ResampleCache {
    pub fn new(output_rate: u32) -> Self {
        Self {
            output_rate,
            entries: BTreeMap::new(),
        }
    }

    /// Fetch the waveform for `slot` at `period`, computing it on first use.
    pub fn get_or_insert(&mut self, slot: u8, instrument: &Instrument, period: u16) -> &[i16] {
        let output_rate = self.output_rate;
        self.entries.entry((slot, period)).or_insert_with(|| {
            let waveform = resample(&instrument.data, period, output_rate);
            log::trace!(
                "resampled instrument {} at period {}: {} -> {} frames",
                slot,
                period,
                instrument.data.len(),
                waveform.len()
            );
            waveform
        })
    }

    pub fn contains(&self, slot: u8, period: u16) -> bool {
        self.entries.contains_key(&(slot, period))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn sample_widening_hits_both_rails() {
        assert_eq!(sample_to_i16(0x7F), 32767);
        assert_eq!(sample_to_i16(0x80), -32768);
        assert_eq!(sample_to_i16(0x00), 128);
        assert_eq!(sample_to_i16(0xFF), -129);
    }

    #[test]
    fn length_follows_period() {
        // round(44100 * 4 * 428 / 3563219)
        assert_eq!(output_len(4, 428, 44100), 21);
        assert_eq!(output_len(4, 214, 44100), 11);
        assert_eq!(output_len(4, 0, 44100), 0);
        assert_eq!(output_len(0, 428, 44100), 0);
    }

    #[test]
    fn endpoints_are_raw_samples() {
        let data = [0x10, 0x7F, 0x80, 0x20];
        let out = resample(&data, 428, 44100);
        assert_eq!(out.len(), 21);
        assert_eq!(out[0], sample_to_i16(0x10));
        assert_eq!(out[20], sample_to_i16(0x20));
    }

    #[test]
    fn integer_positions_are_exact() {
        // 5 raw samples over 21 frames: every 5th frame sits on a raw sample.
        let data = [0x00, 0x40, 0x7F, 0xC0, 0x80];
        let frames = output_len(data.len(), 342, 44100);
        assert_eq!(frames, 21);
        let out = resample(&data, 342, 44100);
        for (i, &raw) in data.iter().enumerate() {
            assert_eq!(out[i * 5], sample_to_i16(raw));
        }
    }

    #[test]
    fn midpoints_interpolate() {
        // Two raw samples over four frames: the inner frames sit at thirds.
        let data = [0x00, 0x10];
        let frames = output_len(2, 1000, 8000);
        assert_eq!(frames, 4);
        let out = resample(&data, 1000, 8000);
        let a = sample_to_i16(0x00) as f64;
        let b = sample_to_i16(0x10) as f64;
        assert_eq!(out[1], libm::round(a + (b - a) / 3.0) as i16);
        assert_eq!(out[2], libm::round(a + (b - a) * 2.0 / 3.0) as i16);
    }

    #[test]
    fn single_frame_is_last_sample() {
        let data = [0x01, 0x02, 0x03];
        // 10 kHz gives round(0.95) = 1 frame, 1 kHz gives none.
        assert_eq!(output_len(3, 113, 10_000), 1);
        assert_eq!(resample(&data, 113, 10_000), vec![sample_to_i16(0x03)]);
        assert!(resample(&data, 113, 1000).is_empty());
    }

    #[test]
    fn empty_inputs_give_nothing() {
        assert!(resample(&[], 428, 44100).is_empty());
        assert!(resample(&[1, 2], 0, 44100).is_empty());
    }

    #[test]
    fn cache_computes_once_per_key() {
        let inst = Instrument {
            length: 2,
            data: vec![0, 10, 20, 30],
            ..Default::default()
        };
        let mut cache = ResampleCache::new(44100);
        assert!(cache.is_empty());
        let first = cache.get_or_insert(1, &inst, 428).to_vec();
        assert_eq!(first.len(), 21);
        cache.get_or_insert(1, &inst, 428);
        assert_eq!(cache.len(), 1);
        cache.get_or_insert(1, &inst, 214);
        cache.get_or_insert(2, &inst, 428);
        assert_eq!(cache.len(), 3);
        assert!(cache.contains(2, 428));
        assert!(!cache.contains(2, 214));
    }
}
