//! Picture Processing Unit (PPU) engine.
//!
//! The PPU owns no storage of its own. Its raster position, flags, memories
//! and screen all live in the hardware state and are reached through
//! [`Bus`], so the same engine runs against the live session state and the
//! in-memory fixture alike.
//!
//! Each call to [`step`] advances the raster by one dot, classifies the new
//! position into a [`FramePhase`] and performs that phase's hardware action:
//! draw one background pixel, raise vertical blank (and latch an NMI when
//! PPUCTRL asks for one) or drop vertical blank.

pub mod background;
pub mod buffer;
pub mod palette;
pub mod phase;
pub(crate) mod registers;

use tracing::debug;

use crate::{
    address::{Coord, Cycle, Frame, InterruptLatch, NmiEnable, Scanline, VBlank},
    bus::Bus,
    cpu::Interrupt,
    error::Error,
};

pub use phase::{FramePhase, RenderPhase, VBlankPhase};

/// Visible picture width in pixels.
pub const SCREEN_WIDTH: usize = 256;
/// Visible picture height in pixels.
pub const SCREEN_HEIGHT: usize = 240;
/// Pixels in one frame of the screen buffer.
pub const SCREEN_PIXELS: usize = SCREEN_WIDTH * SCREEN_HEIGHT;

/// Dots per scanline (`0..=340`).
pub const CYCLES_PER_SCANLINE: u16 = 341;
/// Scanlines per frame (`0..=261`).
pub const SCANLINES_PER_FRAME: u16 = 262;
/// Dots in one complete frame.
pub const DOTS_PER_FRAME: u32 = CYCLES_PER_SCANLINE as u32 * SCANLINES_PER_FRAME as u32;

/// Dot the raster sits on after reset.
pub const RESET_CYCLE: u16 = 340;
/// Scanline the raster sits on after reset (post-render line).
pub const RESET_SCANLINE: u16 = 240;

/// Advances the raster by one dot.
///
/// The cycle wraps after 340 into the next scanline; the scanline wraps after
/// 261 into scanline 0 of the next frame, bumping the frame counter.
pub fn tick<M: Bus>(bus: &mut M) {
    let mut cycle = bus.load(Cycle).wrapping_add(1);
    let mut scanline = bus.load(Scanline);

    if cycle >= CYCLES_PER_SCANLINE {
        cycle = 0;
        scanline = scanline.wrapping_add(1);

        if scanline >= SCANLINES_PER_FRAME {
            scanline = 0;
            let frame = bus.load(Frame);
            bus.store(Frame, frame.wrapping_add(1));
        }
    }

    bus.store(Cycle, cycle);
    bus.store(Scanline, scanline);
}

/// Advances one dot and performs the resulting phase's action.
///
/// Returns the phase that was dispatched. Fails only if the raster counters
/// are outside their range, which no sequence of `tick`s can produce.
pub fn step<M: Bus>(bus: &mut M) -> Result<FramePhase, Error> {
    tick(bus);
    let phase = phase::classify(bus.load(Scanline), bus.load(Cycle))?;
    dispatch(bus, phase);
    Ok(phase)
}

/// Performs the hardware action for `phase`.
pub fn dispatch<M: Bus>(bus: &mut M, phase: FramePhase) {
    match phase {
        FramePhase::Render(RenderPhase::Visible { scanline, cycle }) => {
            // Dot 1 draws column 0; the classifier guarantees both fit on screen.
            if let Some(at) = Coord::new((cycle - 1) as u8, scanline as u8) {
                background::render_pixel(bus, at);
            }
        }
        FramePhase::VBlank(VBlankPhase::Enter) => enter_vblank(bus),
        FramePhase::VBlank(VBlankPhase::Exit) => exit_vblank(bus),
        FramePhase::Render(RenderPhase::PreFetch | RenderPhase::Idle)
        | FramePhase::PostRender
        | FramePhase::VBlank(VBlankPhase::Idle) => {}
    }
}

/// Sets the vertical-blank flag and, with NMI enabled, latches an NMI for the
/// CPU engine. The latch is only ever written here and cleared by the CPU.
pub fn enter_vblank<M: Bus>(bus: &mut M) {
    bus.store(VBlank, true);
    let nmi = bus.load(NmiEnable);
    if nmi {
        bus.store(InterruptLatch, Some(Interrupt::Nmi));
    }
    debug!(frame = bus.load(Frame), nmi, "vblank start");
}

/// Clears the vertical-blank flag. NMI enable plays no part here.
pub fn exit_vblank<M: Bus>(bus: &mut M) {
    bus.store(VBlank, false);
    debug!(frame = bus.load(Frame), "vblank end");
}
