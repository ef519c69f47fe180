//! Effect command types for MOD patterns.

/// Effect code: position jump (Bxx).
pub const POSITION_JUMP: u8 = 0xB;
/// Effect code: pattern break (Dxy).
pub const PATTERN_BREAK: u8 = 0xD;
/// Effect code: set speed or tempo (Fxx).
pub const SET_SPEED: u8 = 0xF;

/// Parameters below this value set ticks-per-row, the rest set BPM.
pub const TEMPO_THRESHOLD: u8 = 32;

/// Effect column command.
///
/// Only the playback-control effects are interpreted; everything else is
/// carried through as [`Effect::Other`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Effect {
    #[default]
    None,
    /// Set ticks per row (0-31, 0 is ignored during playback)
    SetSpeed(u8),
    /// Set tempo in BPM (32-255)
    SetTempo(u8),
    /// Jump to order position
    PositionJump(u8),
    /// Break to row in next pattern (already decoded from BCD-style digits)
    PatternBreak(u8),
    /// Any effect without playback-control meaning
    Other { code: u8, param: u8 },
}

impl Effect {
    /// Parse an effect code and its parameter.
    pub fn parse(code: u8, param: u8) -> Self {
        match code {
            SET_SPEED if param < TEMPO_THRESHOLD => Effect::SetSpeed(param),
            SET_SPEED => Effect::SetTempo(param),
            POSITION_JUMP => Effect::PositionJump(param),
            // Two decimal digits packed in the nibbles: 0x12 means row 12.
            PATTERN_BREAK => Effect::PatternBreak((param >> 4) * 10 + (param & 0x0F)),
            0 if param == 0 => Effect::None,
            _ => Effect::Other { code, param },
        }
    }
}
