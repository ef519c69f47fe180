//! Playback engine for modwave.
//!
//! Walks a module's order table, resamples instrument waveforms to the
//! output rate and mixes all channels into one stereo buffer.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod channel;
mod config;
mod mixer;
mod resampler;
pub mod sequencer;

pub use channel::ChannelState;
pub use config::{RenderConfig, DEFAULT_SAMPLE_RATE};
pub use mixer::{render_module, stereo_gains, Mixer, Render};
pub use resampler::{output_len, resample, sample_to_i16, source_rate, ResampleCache, PERIOD_CLOCK};
pub use sequencer::{row_frames, RowStep, Sequencer, DEFAULT_TEMPO, DEFAULT_TICKS_PER_ROW};
