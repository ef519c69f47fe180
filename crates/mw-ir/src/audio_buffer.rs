//! Multichannel f32 audio buffer with planar layout.

use alloc::vec;
use alloc::vec::Vec;

/// A stereo sample pair.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Frame {
    pub left: f32,
    pub right: f32,
}

impl Frame {
    /// Create a silent frame.
    pub const fn silence() -> Self {
        Self { left: 0.0, right: 0.0 }
    }

    /// Create a mono frame (same value for both channels).
    pub const fn mono(value: f32) -> Self {
        Self { left: value, right: value }
    }

    /// Mix another frame into this one.
    pub fn mix(&mut self, other: Frame) {
        self.left += other.left;
        self.right += other.right;
    }
}

/// A multichannel f32 audio buffer in planar layout.
///
/// Data is stored as `channels` contiguous planes of `frames` samples each.
/// `data[ch * frames + frame]` gives the sample for channel `ch` at `frame`.
/// Samples are nominally in `-1.0..=1.0`.
#[derive(Clone, Debug)]
pub struct AudioBuffer {
    data: Vec<f32>,
    channels: u16,
    frames: usize,
}

impl AudioBuffer {
    /// Create a new silent buffer with the given dimensions.
    pub fn new(channels: u16, frames: usize) -> Self {
        Self {
            data: vec![0.0; channels as usize * frames],
            channels,
            frames,
        }
    }

    /// Create a silent two-channel buffer.
    pub fn stereo(frames: usize) -> Self {
        Self::new(2, frames)
    }

    /// Number of channels.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Number of frames.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Read-only access to one channel's sample data.
    pub fn channel(&self, ch: u16) -> &[f32] {
        let start = ch as usize * self.frames;
        &self.data[start..start + self.frames]
    }

    /// Read the stereo pair at `index`. Mono buffers report the same value on
    /// both sides; out-of-range reads are silent.
    pub fn frame(&self, index: usize) -> Frame {
        if index >= self.frames || self.channels == 0 {
            return Frame::silence();
        }
        let left = self.data[index];
        let right = if self.channels > 1 {
            self.data[self.frames + index]
        } else {
            left
        };
        Frame { left, right }
    }

    /// Write the stereo pair at `index`. Out-of-range writes are dropped.
    pub fn set_frame(&mut self, index: usize, frame: Frame) {
        if index >= self.frames || self.channels == 0 {
            return;
        }
        self.data[index] = frame.left;
        if self.channels > 1 {
            self.data[self.frames + index] = frame.right;
        }
    }

    /// Add `len` frames of `source`, starting at `src_start`, into this buffer
    /// at `dst_offset`.
    ///
    /// `balance` runs from -1.0 (left only) through 0.0 (both sides at `gain`)
    /// to 1.0 (right only). Frames that fall outside either buffer are skipped.
    pub fn mix_range(
        &mut self,
        source: &AudioBuffer,
        src_start: usize,
        dst_offset: usize,
        len: usize,
        gain: f32,
        balance: f32,
    ) {
        let balance = balance.clamp(-1.0, 1.0);
        let left_gain = gain * (1.0 - balance.max(0.0));
        let right_gain = gain * (1.0 + balance.min(0.0));

        let available = source
            .frames
            .saturating_sub(src_start)
            .min(self.frames.saturating_sub(dst_offset));
        for i in 0..len.min(available) {
            let src = source.frame(src_start + i);
            let mut dst = self.frame(dst_offset + i);
            dst.mix(Frame {
                left: src.left * left_gain,
                right: src.right * right_gain,
            });
            self.set_frame(dst_offset + i, dst);
        }
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f32 {
        self.data.iter().fold(0.0f32, |acc, s| acc.max(libm::fabsf(*s)))
    }
}
