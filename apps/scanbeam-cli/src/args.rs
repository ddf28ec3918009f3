use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use scanbeam_core::config::Interleave;

/// Scanbeam headless frontend: runs a cartridge for a number of frames and
/// saves the last picture as a PNG.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the iNES / NES 2.0 ROM file
    #[arg(required = true)]
    pub rom: PathBuf,

    /// Frames to run before capturing the picture
    #[arg(short, long, default_value_t = 1)]
    pub frames: u32,

    /// Output PNG path
    #[arg(short, long, default_value = "frame.png")]
    pub out: PathBuf,

    /// Raw 16 KiB PPU memory image to load over the cartridge's state
    #[arg(long)]
    pub ppu_dump: Option<PathBuf>,

    /// Enable NMI on vertical blank (PPUCTRL bit 7)
    #[arg(long)]
    pub nmi: bool,

    /// Horizontal background scroll in pixels
    #[arg(long, default_value_t = 0)]
    pub scroll_x: u8,

    /// Vertical background scroll in pixels
    #[arg(long, default_value_t = 0)]
    pub scroll_y: u8,

    /// How CPU and PPU work is interleaved
    #[arg(long, value_enum, default_value_t = InterleaveArg::Instruction)]
    pub interleave: InterleaveArg,

    /// Log level filter, overridden by `RUST_LOG` when set
    #[arg(short, long, default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InterleaveArg {
    /// One CPU instruction, then the dots it paid for
    Instruction,
    /// A frame of CPU cycles, then a frame of PPU dots
    Frame,
}

impl From<InterleaveArg> for Interleave {
    fn from(arg: InterleaveArg) -> Self {
        match arg {
            InterleaveArg::Instruction => Interleave::Instruction,
            InterleaveArg::Frame => Interleave::Frame,
        }
    }
}
