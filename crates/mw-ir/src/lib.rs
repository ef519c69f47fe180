//! Core types for modwave.
//!
//! This crate defines the in-memory representation of a MOD song and the
//! audio buffer rendering writes into. The format parser emits these types
//! and the playback engine consumes them.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod audio_buffer;
mod diagnostic;
mod effects;
mod format;
mod instrument;
mod module;
mod pattern;
mod summary;

pub use audio_buffer::{AudioBuffer, Frame};
pub use diagnostic::Diagnostic;
pub use effects::{Effect, PATTERN_BREAK, POSITION_JUMP, SET_SPEED, TEMPO_THRESHOLD};
pub use format::{Format, TAG_LEN, TAG_OFFSET};
pub use instrument::{decode_finetune, encode_finetune, Instrument};
pub use module::{BlankSampleConvention, Module, ORDER_TABLE_LEN, TITLE_LEN};
pub use pattern::{Note, Pattern, NOTE_SIZE, ROWS_PER_PATTERN};
pub use summary::{ModuleSummary, PatternGrid};
