//! Typed addresses into the hardware state.
//!
//! Every piece of hardware-visible state is named by an address token, and
//! every token fixes the type of value stored behind it. `bus.load(Scanline)`
//! yields a `u16`, `bus.load(VBlank)` a `bool`, `bus.load(Pixel(at))` a
//! [`Color`]; handing a `bool` to `store(Scanline, ..)` does not compile.
//!
//! Tokens resolve to one of a handful of cell domains ([`ByteCell`],
//! [`WordCell`], [`FlagCell`], the frame counter, the screen and the interrupt
//! latch). Backings only implement those domains, see [`Backing`].

use core::fmt;

use crate::{
    bus::Backing,
    cpu::{CpuReg, Interrupt},
    ppu::{SCREEN_HEIGHT, SCREEN_WIDTH, palette::Color},
};

/// A location in the hardware state together with the type it holds.
pub trait Address: Copy + fmt::Debug {
    type Value: Copy + fmt::Debug + PartialEq;

    fn load<B: Backing + ?Sized>(self, backing: &B) -> Self::Value;

    fn store<B: Backing + ?Sized>(self, backing: &mut B, value: Self::Value);
}

/// 8-bit cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteCell {
    /// CPU general register.
    Cpu(CpuReg),
    /// CPU-visible 64 KiB memory map.
    CpuMem(u16),
    /// PPU-internal 16 KiB memory map.
    PpuMem(u16),
    /// Sprite attribute memory.
    Oam(u8),
    ScrollX,
    ScrollY,
    /// OAM pointer driven by `$2003`/`$2004`.
    OamAddr,
    /// Delayed `$2007` read buffer.
    ReadBuffer,
}

/// 16-bit cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordCell {
    ProgramCounter,
    Cycle,
    Scanline,
    NametableBase,
    BgPatternBase,
    /// VRAM pointer driven by `$2006`/`$2007`.
    VramAddr,
}

/// Boolean cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagCell {
    VBlank,
    NmiEnable,
    /// Shared first/second write latch of `$2005`/`$2006`.
    WriteToggle,
}

impl Address for ByteCell {
    type Value = u8;

    #[inline]
    fn load<B: Backing + ?Sized>(self, backing: &B) -> u8 {
        backing.read_byte(self)
    }

    #[inline]
    fn store<B: Backing + ?Sized>(self, backing: &mut B, value: u8) {
        backing.write_byte(self, value);
    }
}

impl Address for WordCell {
    type Value = u16;

    #[inline]
    fn load<B: Backing + ?Sized>(self, backing: &B) -> u16 {
        backing.read_word(self)
    }

    #[inline]
    fn store<B: Backing + ?Sized>(self, backing: &mut B, value: u16) {
        backing.write_word(self, value);
    }
}

impl Address for FlagCell {
    type Value = bool;

    #[inline]
    fn load<B: Backing + ?Sized>(self, backing: &B) -> bool {
        backing.read_flag(self)
    }

    #[inline]
    fn store<B: Backing + ?Sized>(self, backing: &mut B, value: bool) {
        backing.write_flag(self, value);
    }
}

impl Address for CpuReg {
    type Value = u8;

    #[inline]
    fn load<B: Backing + ?Sized>(self, backing: &B) -> u8 {
        backing.read_byte(ByteCell::Cpu(self))
    }

    #[inline]
    fn store<B: Backing + ?Sized>(self, backing: &mut B, value: u8) {
        backing.write_byte(ByteCell::Cpu(self), value);
    }
}

macro_rules! unit_address {
    ($value:ty: $($(#[$meta:meta])* $token:ident => $cell:expr;)*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            pub struct $token;

            impl Address for $token {
                type Value = $value;

                #[inline]
                fn load<B: Backing + ?Sized>(self, backing: &B) -> Self::Value {
                    $cell.load(backing)
                }

                #[inline]
                fn store<B: Backing + ?Sized>(self, backing: &mut B, value: Self::Value) {
                    $cell.store(backing, value);
                }
            }
        )*
    };
}

unit_address! { u8:
    /// Horizontal scroll offset in pixels.
    ScrollX => ByteCell::ScrollX;
    /// Vertical scroll offset in pixels.
    ScrollY => ByteCell::ScrollY;
    OamAddr => ByteCell::OamAddr;
    ReadBuffer => ByteCell::ReadBuffer;
}

unit_address! { u16:
    ProgramCounter => WordCell::ProgramCounter;
    /// Dot within the current scanline, `0..=340`.
    Cycle => WordCell::Cycle;
    /// Current scanline, `0..=261`.
    Scanline => WordCell::Scanline;
    /// Base address of the nametable selected through PPUCTRL.
    NametableBase => WordCell::NametableBase;
    /// Base address of the background pattern table.
    BgPatternBase => WordCell::BgPatternBase;
    VramAddr => WordCell::VramAddr;
}

unit_address! { bool:
    VBlank => FlagCell::VBlank;
    NmiEnable => FlagCell::NmiEnable;
    WriteToggle => FlagCell::WriteToggle;
}

/// One cell of the CPU-visible memory map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CpuMem(pub u16);

/// One cell of PPU memory (pattern tables, nametables, palette RAM).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PpuMem(pub u16);

/// One byte of sprite attribute memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Oam(pub u8);

macro_rules! indexed_byte_address {
    ($($token:ident => $variant:ident;)*) => {
        $(
            impl Address for $token {
                type Value = u8;

                #[inline]
                fn load<B: Backing + ?Sized>(self, backing: &B) -> u8 {
                    backing.read_byte(ByteCell::$variant(self.0))
                }

                #[inline]
                fn store<B: Backing + ?Sized>(self, backing: &mut B, value: u8) {
                    backing.write_byte(ByteCell::$variant(self.0), value);
                }
            }
        )*
    };
}

indexed_byte_address! {
    CpuMem => CpuMem;
    PpuMem => PpuMem;
    Oam => Oam;
}

/// Number of completed frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame;

impl Address for Frame {
    type Value = u64;

    #[inline]
    fn load<B: Backing + ?Sized>(self, backing: &B) -> u64 {
        backing.read_frame()
    }

    #[inline]
    fn store<B: Backing + ?Sized>(self, backing: &mut B, value: u64) {
        backing.write_frame(value);
    }
}

/// Pending interrupt request raised by the PPU for the CPU engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InterruptLatch;

impl Address for InterruptLatch {
    type Value = Option<Interrupt>;

    #[inline]
    fn load<B: Backing + ?Sized>(self, backing: &B) -> Option<Interrupt> {
        backing.read_interrupt()
    }

    #[inline]
    fn store<B: Backing + ?Sized>(self, backing: &mut B, value: Option<Interrupt>) {
        backing.write_interrupt(value);
    }
}

/// Screen color at a pixel position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pixel(pub Coord);

impl Address for Pixel {
    type Value = Color;

    #[inline]
    fn load<B: Backing + ?Sized>(self, backing: &B) -> Color {
        backing.read_pixel(self.0)
    }

    #[inline]
    fn store<B: Backing + ?Sized>(self, backing: &mut B, value: Color) {
        backing.write_pixel(self.0, value);
    }
}

/// A pixel position on screen, `x < 256`, `y < 240`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    x: u8,
    y: u8,
}

impl Coord {
    /// Returns `None` when `y` falls below the visible picture.
    pub const fn new(x: u8, y: u8) -> Option<Self> {
        if (y as usize) < SCREEN_HEIGHT {
            Some(Self { x, y })
        } else {
            None
        }
    }

    #[inline]
    pub const fn x(self) -> u8 {
        self.x
    }

    #[inline]
    pub const fn y(self) -> u8 {
        self.y
    }

    /// Row-major index into the screen buffer.
    #[inline]
    pub const fn index(self) -> usize {
        self.y as usize * SCREEN_WIDTH + self.x as usize
    }

    /// Every on-screen coordinate in row-major order.
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..SCREEN_HEIGHT as u8).flat_map(|y| (0..=u8::MAX).map(move |x| Coord { x, y }))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coord_rejects_rows_past_the_picture() {
        assert!(Coord::new(255, 239).is_some());
        assert!(Coord::new(0, 240).is_none());
    }

    #[test]
    fn coord_iteration_covers_the_screen_in_order() {
        let coords: Vec<Coord> = Coord::all().collect();
        assert_eq!(coords.len(), SCREEN_WIDTH * SCREEN_HEIGHT);
        for (i, at) in coords.iter().enumerate() {
            assert_eq!(at.index(), i);
        }
    }
}
