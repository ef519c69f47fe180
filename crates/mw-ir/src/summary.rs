//! Human-readable dumps of a parsed module.

use core::fmt;

use crate::module::Module;
use crate::pattern::Pattern;

/// Title, order table and instrument listing for a module.
pub struct ModuleSummary<'a>(pub &'a Module);

impl fmt::Display for ModuleSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let module = self.0;
        writeln!(
            f,
            "Title: \"{}\" -- format: \"{}\" -- {} bytes of sample data",
            module.title,
            module.format.tag(),
            module.sample_bytes()
        )?;
        write!(f, "Table:")?;
        for entry in &module.order {
            write!(f, " {}", entry)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "File size: {} ({} unread bytes)",
            module.file_size, module.unread
        )?;

        for (_, inst) in module.real_instruments() {
            writeln!(
                f,
                "{:>22} ({:5} bytes) - ft {}, v {}, rep {} {}",
                inst.name,
                inst.data.len(),
                inst.finetune,
                inst.volume,
                inst.loop_offset,
                inst.loop_length
            )?;
        }
        Ok(())
    }
}

/// One pattern as a grid of `instrument - period` cells.
pub struct PatternGrid<'a>(pub &'a Pattern);

impl fmt::Display for PatternGrid<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pattern = self.0;
        for row in 0..pattern.rows() {
            write!(f, "| ")?;
            for note in pattern.row(row) {
                write!(f, "{:3} - {:3} |", note.instrument, note.period)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
