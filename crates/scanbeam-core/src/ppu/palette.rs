//! Fixed hardware palette.
//!
//! Palette RAM holds 6-bit indices; the PPU turns those into video levels and
//! this table gives the RGB approximation of each level used by the
//! presentation layer. The table is process-lifetime constant data.

/// An RGB triple as produced by the hardware palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Looks up a palette RAM byte in the hardware palette. Only the low six
    /// bits select a color; the top two bits are not wired on real hardware.
    #[inline]
    pub const fn from_index(index: u8) -> Self {
        HARDWARE_PALETTE[(index & PALETTE_INDEX_MASK) as usize]
    }
}

/// Number of colors the PPU can produce.
pub const PALETTE_SIZE: usize = 64;

const PALETTE_INDEX_MASK: u8 = (PALETTE_SIZE as u8) - 1;

const fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::new(r, g, b)
}

/// 2C02 NTSC palette.
#[rustfmt::skip]
pub static HARDWARE_PALETTE: [Color; PALETTE_SIZE] = [
    // $00
    rgb(84, 84, 84),    rgb(0, 30, 116),    rgb(8, 16, 144),    rgb(48, 0, 136),
    rgb(68, 0, 100),    rgb(92, 0, 48),     rgb(84, 4, 0),      rgb(60, 24, 0),
    rgb(32, 42, 0),     rgb(8, 58, 0),      rgb(0, 64, 0),      rgb(0, 60, 0),
    rgb(0, 50, 60),     rgb(0, 0, 0),       rgb(0, 0, 0),       rgb(0, 0, 0),
    // $10
    rgb(152, 150, 152), rgb(8, 76, 196),    rgb(48, 50, 236),   rgb(92, 30, 228),
    rgb(136, 20, 176),  rgb(160, 20, 100),  rgb(152, 34, 32),   rgb(120, 60, 0),
    rgb(84, 90, 0),     rgb(40, 114, 0),    rgb(8, 124, 0),     rgb(0, 118, 40),
    rgb(0, 102, 120),   rgb(0, 0, 0),       rgb(0, 0, 0),       rgb(0, 0, 0),
    // $20
    rgb(236, 238, 236), rgb(76, 154, 236),  rgb(120, 124, 236), rgb(176, 98, 236),
    rgb(228, 84, 236),  rgb(236, 88, 180),  rgb(236, 106, 100), rgb(212, 136, 32),
    rgb(160, 170, 0),   rgb(116, 196, 0),   rgb(76, 208, 32),   rgb(56, 204, 108),
    rgb(56, 180, 204),  rgb(60, 60, 60),    rgb(0, 0, 0),       rgb(0, 0, 0),
    // $30
    rgb(236, 238, 236), rgb(168, 204, 236), rgb(188, 188, 236), rgb(212, 178, 236),
    rgb(236, 174, 236), rgb(236, 174, 212), rgb(236, 180, 176), rgb(228, 196, 144),
    rgb(204, 210, 120), rgb(180, 222, 120), rgb(168, 226, 144), rgb(152, 226, 180),
    rgb(160, 214, 228), rgb(160, 162, 160), rgb(0, 0, 0),       rgb(0, 0, 0),
];
