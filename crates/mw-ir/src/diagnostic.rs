//! Non-fatal anomalies found while parsing or sequencing.

use alloc::vec::Vec;
use core::fmt;

/// A structural anomaly. Reported, never acted upon.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// The order table has nonzero entries past the stored position count.
    OrderTableOverflow {
        position_count: u8,
        /// First offending order-table index
        index: u8,
        value: u8,
    },
    /// Patterns below the highest referenced one that the order table never names.
    UnreferencedPatterns { patterns: Vec<u8> },
    /// Bytes left over after the last waveform.
    TrailingBytes { count: usize },
    /// A set-speed effect with parameter 0.
    IgnoredSpeedZero { order_index: usize, row: usize, channel: u8 },
    /// A position jump that does not move forward in the order table.
    SuppressedJump { order_index: usize, row: usize, channel: u8, target: u8 },
    /// A pattern break to a row that does not exist.
    BreakRowOutOfRange { order_index: usize, row: usize, channel: u8, target: u8 },
    /// Rendering stopped at the configured length cap.
    RenderLimitReached { frames: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::OrderTableOverflow { position_count, index, value } => write!(
                f,
                "order table continues past its length {}: entry {} is {}",
                position_count, index, value
            ),
            Diagnostic::UnreferencedPatterns { patterns } => {
                write!(f, "patterns not in the order table:")?;
                for p in patterns {
                    write!(f, " {}", p)?;
                }
                Ok(())
            }
            Diagnostic::TrailingBytes { count } => {
                write!(f, "{} unread bytes after the last sample", count)
            }
            Diagnostic::IgnoredSpeedZero { order_index, row, channel } => write!(
                f,
                "{:2}:{:2} ch {}: ignored speed 0",
                order_index, row, channel
            ),
            Diagnostic::SuppressedJump { order_index, row, channel, target } => write!(
                f,
                "{:2}:{:2} ch {}: ignored jump to {} (probable infinite loop)",
                order_index, row, channel, target
            ),
            Diagnostic::BreakRowOutOfRange { order_index, row, channel, target } => write!(
                f,
                "{:2}:{:2} ch {}: break to row {} past pattern end, using row 0",
                order_index, row, channel, target
            ),
            Diagnostic::RenderLimitReached { frames } => {
                write!(f, "render stopped at the length cap ({} frames)", frames)
            }
        }
    }
}
