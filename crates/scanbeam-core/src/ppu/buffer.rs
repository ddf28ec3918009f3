//! Copying the screen out for presentation.
//!
//! The screen cells hold one [`Color`] per pixel. Frontends want packed
//! bytes in whatever layout their surface uses; [`pack_frame`] reads every
//! pixel through `load` and encodes it row by row.

use crate::{
    address::{Coord, Pixel},
    bus::Bus,
    ppu::{SCREEN_HEIGHT, SCREEN_WIDTH, palette::Color},
};

/// Byte layout of one packed pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorFormat {
    /// 16-bit little-endian `0RRRRRGGGGGBBBBB`.
    Rgb555,
    /// 16-bit little-endian `RRRRRGGGGGGBBBBB`.
    Rgb565,
    /// R, G, B.
    #[default]
    Rgb888,
    /// R, G, B, A.
    Rgba8888,
    /// B, G, R, A.
    Bgra8888,
    /// A, R, G, B.
    Argb8888,
}

impl ColorFormat {
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            ColorFormat::Rgb555 | ColorFormat::Rgb565 => 2,
            ColorFormat::Rgb888 => 3,
            ColorFormat::Rgba8888 | ColorFormat::Bgra8888 | ColorFormat::Argb8888 => 4,
        }
    }

    /// Bytes in one row of packed pixels.
    #[inline]
    pub const fn pitch(self) -> usize {
        SCREEN_WIDTH * self.bytes_per_pixel()
    }

    /// Bytes in one packed frame.
    #[inline]
    pub const fn frame_len(self) -> usize {
        self.pitch() * SCREEN_HEIGHT
    }

    /// Encodes `color` into `out`, which must be exactly
    /// [`bytes_per_pixel`](Self::bytes_per_pixel) long. Alpha is always opaque.
    pub fn encode(self, color: Color, out: &mut [u8]) {
        const OPAQUE: u8 = 0xFF;
        let Color { r, g, b } = color;
        match self {
            ColorFormat::Rgb555 => {
                let packed = (((r >> 3) as u16) << 10) | (((g >> 3) as u16) << 5) | (b >> 3) as u16;
                out.copy_from_slice(&packed.to_le_bytes());
            }
            ColorFormat::Rgb565 => {
                let packed = (((r >> 3) as u16) << 11) | (((g >> 2) as u16) << 5) | (b >> 3) as u16;
                out.copy_from_slice(&packed.to_le_bytes());
            }
            ColorFormat::Rgb888 => out.copy_from_slice(&[r, g, b]),
            ColorFormat::Rgba8888 => out.copy_from_slice(&[r, g, b, OPAQUE]),
            ColorFormat::Bgra8888 => out.copy_from_slice(&[b, g, r, OPAQUE]),
            ColorFormat::Argb8888 => out.copy_from_slice(&[OPAQUE, r, g, b]),
        }
    }
}

/// Packs the whole screen into `out`, replacing its contents.
pub fn pack_frame<M: Bus>(bus: &M, format: ColorFormat, out: &mut Vec<u8>) {
    let bpp = format.bytes_per_pixel();
    out.clear();
    out.resize(format.frame_len(), 0);
    for (at, chunk) in Coord::all().zip(out.chunks_exact_mut(bpp)) {
        format.encode(bus.load(Pixel(at)), chunk);
    }
}
