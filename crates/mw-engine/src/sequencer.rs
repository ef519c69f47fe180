//! Order-table walker and control-effect interpreter.
//!
//! Steps through the song one row at a time. Each step reports which notes
//! start on that row and how many output frames the row lasts. Tempo and
//! speed changes are latched: an effect on one row changes the duration of
//! the next.

use alloc::vec::Vec;
use mw_ir::{Diagnostic, Effect, Module, Note, ROWS_PER_PATTERN};

use crate::config::RenderConfig;

/// Initial tempo in BPM.
pub const DEFAULT_TEMPO: u8 = 125;

/// Initial speed in ticks per row.
pub const DEFAULT_TICKS_PER_ROW: u8 = 6;

/// Output frames one row lasts at the given timing.
///
/// rows per minute = 24 * tempo / ticks, so a row is 60 / that seconds.
pub fn row_frames(sample_rate: u32, tempo: u8, ticks_per_row: u8) -> usize {
    let rows_per_minute = 24.0 * tempo as f64 / ticks_per_row as f64;
    let seconds_per_row = 60.0 / rows_per_minute;
    libm::round(sample_rate as f64 * seconds_per_row) as usize
}

/// One row of playback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowStep<'a> {
    /// Position in the order table
    pub order_index: usize,
    /// Pattern played at that position
    pub pattern: u8,
    /// Row within the pattern
    pub row: usize,
    /// Tempo in effect for this row
    pub tempo: u8,
    /// Speed in effect for this row
    pub ticks_per_row: u8,
    /// Duration in output frames
    pub frames: usize,
    /// The row's notes, in channel order
    pub notes: &'a [Note],
}

/// Position changes requested by the current row.
#[derive(Clone, Copy, Debug, Default)]
struct Schedule {
    jump: Option<u8>,
    break_row: Option<u8>,
}

/// Walks a module's order table row by row.
pub struct Sequencer<'a> {
    module: &'a Module,
    sample_rate: u32,
    loop_guard: bool,
    order_index: usize,
    row: usize,
    tempo: u8,
    ticks_per_row: u8,
    next_tempo: u8,
    next_ticks_per_row: u8,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Sequencer<'a> {
    pub fn new(module: &'a Module, config: &RenderConfig) -> Self {
        Self {
            module,
            sample_rate: config.sample_rate,
            loop_guard: config.loop_guard,
            order_index: 0,
            row: 0,
            tempo: DEFAULT_TEMPO,
            ticks_per_row: DEFAULT_TICKS_PER_ROW,
            next_tempo: DEFAULT_TEMPO,
            next_ticks_per_row: DEFAULT_TICKS_PER_ROW,
            diagnostics: Vec::new(),
        }
    }

    /// Anomalies seen so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Interpret the control effects of a row, in channel order. A later
    /// channel overrides an earlier one of the same kind.
    fn interpret(&mut self, notes: &[Note]) -> Schedule {
        let mut schedule = Schedule::default();

        for (ch, note) in notes.iter().enumerate() {
            let channel = ch as u8;
            match note.effect_command() {
                Effect::SetSpeed(0) => self.report(Diagnostic::IgnoredSpeedZero {
                    order_index: self.order_index,
                    row: self.row,
                    channel,
                }),
                Effect::SetSpeed(ticks) => {
                    log::debug!("{}:{}: speed {}", self.order_index, self.row, ticks);
                    self.next_ticks_per_row = ticks;
                }
                Effect::SetTempo(bpm) => {
                    log::debug!("{}:{}: tempo {}", self.order_index, self.row, bpm);
                    self.next_tempo = bpm;
                }
                Effect::PositionJump(target) => {
                    if !self.loop_guard || target as usize > self.order_index {
                        log::debug!("{}:{}: jump to {}", self.order_index, self.row, target);
                        schedule.jump = Some(target);
                    } else {
                        self.report(Diagnostic::SuppressedJump {
                            order_index: self.order_index,
                            row: self.row,
                            channel,
                            target,
                        });
                    }
                }
                Effect::PatternBreak(target) => {
                    if target as usize >= ROWS_PER_PATTERN {
                        self.report(Diagnostic::BreakRowOutOfRange {
                            order_index: self.order_index,
                            row: self.row,
                            channel,
                            target,
                        });
                        schedule.break_row = Some(0);
                    } else {
                        log::debug!("{}:{}: break to row {}", self.order_index, self.row, target);
                        schedule.break_row = Some(target);
                    }
                }
                Effect::None | Effect::Other { .. } => {}
            }
        }

        schedule
    }

    /// Move to the next row. A break advances the order by one and lands on
    /// its row; a jump in the same row then replaces both with its target
    /// at row 0.
    fn advance(&mut self, schedule: Schedule) {
        self.row += 1;
        self.tempo = self.next_tempo;
        self.ticks_per_row = self.next_ticks_per_row;

        if let Some(row) = schedule.break_row {
            self.order_index += 1;
            self.row = row as usize;
        }
        if let Some(target) = schedule.jump {
            self.order_index = target as usize;
            self.row = 0;
        }
        if self.row >= ROWS_PER_PATTERN {
            self.row = 0;
            self.order_index += 1;
        }
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        log::warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }
}

impl<'a> Iterator for Sequencer<'a> {
    type Item = RowStep<'a>;

    fn next(&mut self) -> Option<RowStep<'a>> {
        let module = self.module;
        let pattern = module.pattern_at(self.order_index)?;
        let pattern_index = module.order[self.order_index];
        let notes = pattern.row(self.row);

        let schedule = self.interpret(notes);
        let step = RowStep {
            order_index: self.order_index,
            pattern: pattern_index,
            row: self.row,
            tempo: self.tempo,
            ticks_per_row: self.ticks_per_row,
            frames: row_frames(self.sample_rate, self.tempo, self.ticks_per_row),
            notes,
        };
        self.advance(schedule);
        Some(step)
    }
}
