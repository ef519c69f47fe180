//! Offline renderer.
//!
//! Renders each channel into its own stereo buffer, then sums them into the
//! final output with a silent tail.

use alloc::vec::Vec;
use mw_ir::{AudioBuffer, Diagnostic, Frame, Module};

use crate::channel::ChannelState;
use crate::config::RenderConfig;
use crate::resampler::ResampleCache;
use crate::sequencer::{RowStep, Sequencer};

/// Left and right gain for a channel. Channels 0 and 1 of each group of
/// four lean left, 2 and 3 lean right.
pub fn stereo_gains(channel: u8) -> (f32, f32) {
    match channel % 4 {
        0 | 1 => (0.25, 0.125),
        _ => (0.125, 0.25),
    }
}

/// Result of rendering a module.
#[derive(Clone, Debug)]
pub struct Render {
    /// Stereo output: the song followed by the silent tail
    pub buffer: AudioBuffer,
    /// Rows played
    pub rows: usize,
    /// Frames covered by the rows, excluding the tail
    pub song_frames: usize,
    /// Anomalies seen while sequencing
    pub diagnostics: Vec<Diagnostic>,
}

/// Renders rows into per-channel buffers.
pub struct Mixer<'a> {
    module: &'a Module,
    channels: Vec<ChannelState>,
    buffers: Vec<AudioBuffer>,
    cache: ResampleCache,
}

impl<'a> Mixer<'a> {
    /// Create a mixer with room for `frames` frames per channel.
    pub fn new(module: &'a Module, sample_rate: u32, frames: usize) -> Self {
        let count = module.channels() as usize;
        Self {
            module,
            channels: alloc::vec![ChannelState::new(); count],
            buffers: (0..count).map(|_| AudioBuffer::stereo(frames)).collect(),
            cache: ResampleCache::new(sample_rate),
        }
    }

    /// Render one row starting at frame `offset`.
    pub fn render_row(&mut self, step: &RowStep, offset: usize) {
        let module = self.module;
        for (ch, state) in self.channels.iter_mut().enumerate() {
            if let Some(note) = step.notes.get(ch) {
                state.apply(note);
            }
            if !state.is_active() {
                continue;
            }
            let Some(instrument) = module
                .instrument(state.instrument)
                .filter(|inst| inst.is_playable())
            else {
                continue;
            };

            let waveform = self.cache.get_or_insert(state.instrument, instrument, state.period);
            let (left, right) = stereo_gains(ch as u8);
            let buffer = &mut self.buffers[ch];
            for n in 0..step.frames {
                let Some(sample) = state.next_sample(waveform, instrument) else {
                    break;
                };
                let value = sample as f32 / 32768.0;
                buffer.set_frame(
                    offset + n,
                    Frame {
                        left: value * left,
                        right: value * right,
                    },
                );
            }
        }
    }

    pub fn channel_state(&self, ch: usize) -> Option<&ChannelState> {
        self.channels.get(ch)
    }

    pub fn channel_buffer(&self, ch: usize) -> Option<&AudioBuffer> {
        self.buffers.get(ch)
    }

    pub fn cache(&self) -> &ResampleCache {
        &self.cache
    }

    /// Sum all channels at unity gain into a buffer `tail_frames` longer
    /// than the song.
    pub fn mixdown(&self, song_frames: usize, tail_frames: usize) -> AudioBuffer {
        let mut out = AudioBuffer::stereo(song_frames + tail_frames);
        for buffer in &self.buffers {
            out.mix_range(buffer, 0, 0, song_frames, 1.0, 0.0);
        }
        out
    }
}

/// Render a whole module to stereo audio.
pub fn render_module(module: &Module, config: &RenderConfig) -> Render {
    let mut sequencer = Sequencer::new(module, config);
    let max_frames = config.max_frames();

    let mut steps = Vec::new();
    let mut song_frames = 0usize;
    let mut limited = false;
    for step in sequencer.by_ref() {
        // Zero-length rows never reach the cap, so a loop of them ends here.
        if step.frames == 0 || song_frames + step.frames > max_frames {
            limited = true;
            break;
        }
        song_frames += step.frames;
        steps.push(step);
    }

    let mut diagnostics = sequencer.into_diagnostics();
    if limited {
        let diagnostic = Diagnostic::RenderLimitReached { frames: song_frames };
        log::warn!("{}", diagnostic);
        diagnostics.push(diagnostic);
    }
    log::info!(
        "sequenced {} rows, {} frames at {} Hz",
        steps.len(),
        song_frames,
        config.sample_rate
    );

    let mut mixer = Mixer::new(module, config.sample_rate, song_frames);
    let mut offset = 0;
    for step in &steps {
        mixer.render_row(step, offset);
        offset += step.frames;
    }
    log::debug!("{} resampled waveforms", mixer.cache().len());

    Render {
        buffer: mixer.mixdown(song_frames, config.tail_frames()),
        rows: steps.len(),
        song_frames,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use mw_ir::{Format, Instrument, Note, Pattern};

    fn test_module() -> Module {
        let mut module = Module::new("mix", Format::from_tag(*b"M.K."));
        module.instruments[1] = Some(Instrument {
            length: 2,
            volume: 64,
            data: vec![0x7F, 0x7F, 0x7F, 0x7F],
            ..Default::default()
        });
        module.patterns.push(Pattern::new(4));
        module.set_order(&[0]);
        module
    }

    fn config() -> RenderConfig {
        RenderConfig::default().with_tail_seconds(0)
    }

    #[test]
    fn gains_alternate_in_pairs() {
        assert_eq!(stereo_gains(0), (0.25, 0.125));
        assert_eq!(stereo_gains(1), (0.25, 0.125));
        assert_eq!(stereo_gains(2), (0.125, 0.25));
        assert_eq!(stereo_gains(3), (0.125, 0.25));
        assert_eq!(stereo_gains(6), (0.125, 0.25));
    }

    #[test]
    fn silent_song_renders_silence() {
        let module = test_module();
        let render = render_module(&module, &RenderConfig::default());
        assert_eq!(render.rows, 64);
        assert_eq!(render.song_frames, 64 * 5292);
        assert_eq!(render.buffer.frames(), 64 * 5292 + 220_500);
        assert_eq!(render.buffer.peak(), 0.0);
    }

    #[test]
    fn note_plays_once_then_stops() {
        let mut module = test_module();
        *module.patterns[0].note_mut(0, 0) = Note { instrument: 1, period: 428, ..Note::empty() };
        let render = render_module(&module, &config());

        let expected = 32767.0 / 32768.0;
        let first = render.buffer.frame(0);
        assert_eq!(first.left, expected * 0.25);
        assert_eq!(first.right, expected * 0.125);
        assert_eq!(render.buffer.frame(20).left, expected * 0.25);
        assert_eq!(render.buffer.frame(21), Frame::silence());
    }

    #[test]
    fn right_leaning_channel() {
        let mut module = test_module();
        *module.patterns[0].note_mut(0, 2) = Note { instrument: 1, period: 428, ..Note::empty() };
        let render = render_module(&module, &config());
        let frame = render.buffer.frame(0);
        assert!(frame.right > frame.left);
    }

    #[test]
    fn looped_instrument_keeps_sounding() {
        let mut module = test_module();
        if let Some(inst) = module.instrument_mut(1) {
            inst.loop_length = 2;
        }
        *module.patterns[0].note_mut(0, 1) = Note { instrument: 1, period: 428, ..Note::empty() };
        let render = render_module(&module, &config());
        assert!(render.buffer.frame(5000).left > 0.0);
        assert!(render.buffer.frame(64 * 5292 - 1).left > 0.0);
    }

    #[test]
    fn unplayable_instrument_is_skipped() {
        let mut module = test_module();
        if let Some(inst) = module.instrument_mut(1) {
            inst.length = 1;
            inst.data.truncate(2);
        }
        *module.patterns[0].note_mut(0, 0) = Note { instrument: 1, period: 428, ..Note::empty() };
        let render = render_module(&module, &config());
        assert_eq!(render.buffer.peak(), 0.0);
    }

    #[test]
    fn channels_sum_at_unity() {
        let mut module = test_module();
        for ch in 0..4 {
            *module.patterns[0].note_mut(0, ch) = Note { instrument: 1, period: 428, ..Note::empty() };
        }
        let render = render_module(&module, &config());
        let expected = 32767.0 / 32768.0 * 0.75;
        let frame = render.buffer.frame(0);
        assert!(libm::fabsf(frame.left - expected) < 1e-6);
        assert!(libm::fabsf(frame.right - expected) < 1e-6);
    }

    #[test]
    fn length_cap_stops_rendering() {
        let module = test_module();
        let config = config().with_max_seconds(1);
        let render = render_module(&module, &config);
        // 8 rows of 5292 fit in 44100 frames, the 9th does not.
        assert_eq!(render.rows, 8);
        assert_eq!(render.song_frames, 8 * 5292);
        assert_eq!(
            render.diagnostics,
            vec![Diagnostic::RenderLimitReached { frames: 8 * 5292 }]
        );
    }

    #[test]
    fn zero_frame_rows_stop_rendering() {
        let mut module = test_module();
        module.patterns[0].note_mut(10, 0).effect = 0xB;
        let config = config().with_sample_rate(0).with_loop_guard(false);
        let render = render_module(&module, &config);
        assert_eq!(render.rows, 0);
        assert_eq!(render.song_frames, 0);
        assert_eq!(
            render.diagnostics,
            vec![Diagnostic::RenderLimitReached { frames: 0 }]
        );
    }

    #[test]
    fn mixer_tracks_channel_state() {
        let module = test_module();
        let mut mixer = Mixer::new(&module, 44100, 5292);
        let notes = [
            Note { instrument: 1, period: 428, ..Note::empty() },
            Note::empty(),
            Note::empty(),
            Note::empty(),
        ];
        let step = RowStep {
            order_index: 0,
            pattern: 0,
            row: 0,
            tempo: 125,
            ticks_per_row: 6,
            frames: 5292,
            notes: &notes,
        };
        mixer.render_row(&step, 0);
        assert!(mixer.cache().contains(1, 428));
        assert!(!mixer.channel_state(0).is_some_and(|c| c.is_active()));
        assert_eq!(mixer.channel_state(1), Some(&ChannelState::new()));
        assert!(mixer.channel_buffer(0).is_some_and(|b| b.peak() > 0.0));
    }
}
