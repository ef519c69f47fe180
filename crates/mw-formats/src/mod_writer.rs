//! MOD encoder, the inverse of the parser.

use std::io::{self, Write};

use mw_ir::{encode_finetune, Module, TITLE_LEN};

/// Encode a module into MOD bytes.
///
/// Parsing the output yields the same module. Trailing bytes that followed
/// the last waveform in the source are not reproduced.
pub fn save_mod(module: &Module) -> Vec<u8> {
    let mut buf = Vec::new();
    write_mod(&mut buf, module).expect("Vec<u8> write cannot fail");
    buf
}

/// Stream a module in MOD layout.
pub fn write_mod(w: &mut impl Write, module: &Module) -> io::Result<()> {
    w.write_all(&encode_text::<TITLE_LEN>(&module.title))?;

    for slot in 1..module.instrument_slots() {
        let inst = module.instrument(slot).cloned().unwrap_or_default();
        w.write_all(&encode_text::<22>(&inst.name))?;
        w.write_all(&inst.length.to_be_bytes())?;
        w.write_all(&[encode_finetune(inst.finetune), inst.volume])?;
        w.write_all(&inst.loop_offset.to_be_bytes())?;
        w.write_all(&inst.loop_length.to_be_bytes())?;
    }

    w.write_all(&[module.position_count, module.restart])?;
    w.write_all(&module.order_table)?;
    if let Some(tag) = module.format.tag_bytes() {
        w.write_all(&tag)?;
    }

    for pattern in &module.patterns {
        for note in &pattern.data {
            w.write_all(&note.encode())?;
        }
    }

    for (_, inst) in module.real_instruments() {
        let stored = module.blank_samples.stored_bytes(inst);
        let mut data = inst.data.clone();
        data.resize(stored, 0);
        w.write_all(&data)?;
    }
    Ok(())
}

/// Latin-1 encode and NUL-pad a text field. Characters outside Latin-1
/// become `?`, overlong text is cut.
fn encode_text<const N: usize>(text: &str) -> [u8; N] {
    let mut out = [0u8; N];
    for (slot, c) in out.iter_mut().zip(text.chars()) {
        *slot = u8::try_from(u32::from(c)).unwrap_or(b'?');
    }
    out
}
