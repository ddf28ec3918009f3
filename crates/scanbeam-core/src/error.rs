use thiserror::Error;

use crate::cartridge::header::{NES_HEADER_LEN, RomFormat};

#[derive(Debug, Error)]
pub enum Error {
    /// Provided buffer is shorter than the 16-byte header.
    #[error("header expected {NES_HEADER_LEN} bytes, got {actual}")]
    TooShort { actual: usize },
    /// Magic number ("NES<EOF>") is missing.
    #[error("missing NES magic bytes")]
    InvalidMagic,
    /// Header advertises a format we do not implement.
    #[error("unsupported iNES header format: {0:?}")]
    UnsupportedFormat(RomFormat),
    /// A ROM section (trainer/PRG/CHR) is shorter than advertised.
    #[error("{section} section expected {expected} bytes, got {actual}")]
    SectionTooShort {
        section: &'static str,
        expected: usize,
        actual: usize,
    },
    /// Header names a board this core has no mapper for.
    #[error("mapper {0} is not supported")]
    UnsupportedMapper(u16),
    /// Wrapper for I/O errors raised while reading ROMs from disk.
    #[error("i/o error while reading cartridge: {0}")]
    Io(#[from] std::io::Error),
    /// The raster counters left their wraparound range. This is a bug in the
    /// counter logic, never a property of the running program.
    #[error("frame phase invariant violated at scanline {scanline}, cycle {cycle}")]
    PhaseInvariant { scanline: u16, cycle: u16 },
    /// A raw PPU memory image did not cover the 16 KiB PPU address space.
    #[error("PPU memory dump expected {expected} bytes, got {actual}")]
    InvalidPpuDump { expected: usize, actual: usize },
    /// A trace log line could not be parsed.
    #[error("malformed trace line ({reason}): {line}")]
    Trace { line: String, reason: &'static str },
}
