//! Per-channel playback state.

use mw_ir::{Instrument, Note};

/// What a channel is playing and where it is in the resampled waveform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChannelState {
    /// Current instrument slot, 0 if none yet
    pub instrument: u8,
    /// Current period, 0 when silent
    pub period: u16,
    /// Frame position in the resampled waveform
    pub position: usize,
}

impl ChannelState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a row's note. A nonzero period restarts the waveform at that
    /// pitch; a nonzero instrument changes the instrument without
    /// retriggering.
    pub fn apply(&mut self, note: &Note) {
        if note.instrument != 0 {
            self.instrument = note.instrument;
        }
        if note.period != 0 {
            self.period = note.period;
            self.position = 0;
        }
    }

    /// Returns true while the channel has a pitch to play.
    pub fn is_active(&self) -> bool {
        self.period != 0
    }

    /// Silence the channel until the next note.
    pub fn stop(&mut self) {
        self.period = 0;
        self.position = 0;
    }

    /// Produce the next output sample from `waveform`, the instrument's
    /// waveform resampled at the current period.
    ///
    /// At the end of the waveform a looped instrument restarts at its loop
    /// offset and anything else falls silent.
    pub fn next_sample(&mut self, waveform: &[i16], instrument: &Instrument) -> Option<i16> {
        if !self.is_active() {
            return None;
        }
        if self.position >= waveform.len() {
            if !instrument.has_loop() {
                self.stop();
                return None;
            }
            self.position = instrument.loop_offset as usize * 2;
            if self.position >= waveform.len() {
                self.stop();
                return None;
            }
        }
        let sample = waveform[self.position];
        self.position += 1;
        Some(sample)
    }
}
