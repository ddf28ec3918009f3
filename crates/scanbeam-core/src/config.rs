use core::fmt;

use crate::ppu::DOTS_PER_FRAME;

/// PPU dots per CPU cycle on NTSC hardware.
pub const NTSC_DOTS_PER_CPU_CYCLE: u32 = 3;

/// How the session driver interleaves CPU and PPU work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Interleave {
    /// One CPU instruction, then the PPU dots that instruction's cycles are
    /// worth. Interrupts raised mid-frame are seen by the next instruction.
    #[default]
    Instruction,
    /// A frame's worth of CPU cycles, then a whole frame of PPU dots.
    Frame,
}

impl fmt::Display for Interleave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Interleave::Instruction => "instruction",
            Interleave::Frame => "frame",
        };
        f.write_str(s)
    }
}

/// Session-wide settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionConfig {
    pub interleave: Interleave,
    /// PPU dots per CPU cycle. Zero is treated as one.
    pub dots_per_cpu_cycle: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            interleave: Interleave::default(),
            dots_per_cpu_cycle: NTSC_DOTS_PER_CPU_CYCLE,
        }
    }
}

impl SessionConfig {
    pub fn with_interleave(mut self, interleave: Interleave) -> Self {
        self.interleave = interleave;
        self
    }

    /// Clamped ratio the driver actually uses.
    pub fn dot_ratio(&self) -> u32 {
        self.dots_per_cpu_cycle.max(1)
    }

    /// CPU cycles that fit in one frame at this ratio, rounded up.
    pub fn cpu_cycles_per_frame(&self) -> u32 {
        DOTS_PER_FRAME.div_ceil(self.dot_ratio())
    }
}
