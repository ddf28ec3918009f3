//! Bit layouts of the CPU-visible PPU registers.
//!
//! The registers themselves are plain CPU-space cells; these types decode the
//! bytes written to them into the PPU-space cells the engine reads.

mod control;
mod status;

pub(crate) use control::Control;
pub(crate) use status::Status;
