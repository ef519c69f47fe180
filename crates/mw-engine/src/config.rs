//! Render settings.

/// Output sample rate used when nothing else is asked for.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Settings for one offline render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// Song length cap; rendering stops at the first row that would cross it
    pub max_seconds: u32,
    /// Silence appended after the last row
    pub tail_seconds: u32,
    /// Ignore position jumps that do not move forward in the order table
    pub loop_guard: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            max_seconds: 20 * 60,
            tail_seconds: 5,
            loop_guard: true,
        }
    }
}

impl RenderConfig {
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_max_seconds(mut self, max_seconds: u32) -> Self {
        self.max_seconds = max_seconds;
        self
    }

    pub fn with_tail_seconds(mut self, tail_seconds: u32) -> Self {
        self.tail_seconds = tail_seconds;
        self
    }

    pub fn with_loop_guard(mut self, loop_guard: bool) -> Self {
        self.loop_guard = loop_guard;
        self
    }

    /// Song length cap in frames.
    pub fn max_frames(&self) -> usize {
        self.sample_rate as usize * self.max_seconds as usize
    }

    /// Trailing silence in frames.
    pub fn tail_frames(&self) -> usize {
        self.sample_rate as usize * self.tail_seconds as usize
    }
}
