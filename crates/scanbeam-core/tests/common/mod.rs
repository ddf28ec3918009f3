#![allow(dead_code)]

use anyhow::{Context, Result};
use scanbeam_core::{
    Session,
    address::{Coord, Cycle, PpuMem, Scanline, VBlank},
    bus::{Bus, cpu::cpu_write},
    config::SessionConfig,
    memory::ppu as ppu_mem,
    ppu::{self, DOTS_PER_FRAME, palette::Color},
    state::HardwareState,
};

pub const HEADER_LEN: usize = 16;
pub const PRG_BANK: usize = 16 * 1024;
pub const CHR_BANK: usize = 8 * 1024;

/// Palette RAM byte for black on the 2C02.
pub const BLACK_INDEX: u8 = 0x0F;

/// Builds an iNES image with one PRG bank and either one CHR ROM bank
/// (`chr = Some(..)`) or 8 KiB of CHR RAM (`chr = None`).
pub fn nrom_image(flags6: u8, chr: Option<&[u8]>) -> Vec<u8> {
    let chr_banks = u8::from(chr.is_some());
    let mut rom = b"NES\x1A".to_vec();
    rom.extend([1, chr_banks, flags6]);
    rom.resize(HEADER_LEN, 0);
    rom.extend(vec![0; PRG_BANK]);
    if let Some(chr) = chr {
        let mut bank = chr.to_vec();
        bank.resize(CHR_BANK, 0);
        rom.extend(bank);
    }
    rom
}

/// A session on an NROM board with CHR RAM, so tests can poke pattern data.
pub fn chr_ram_session(config: SessionConfig) -> Result<Session> {
    Session::from_rom(&nrom_image(0, None), config).context("building NROM session")
}

/// Writes every palette entry through the PPU data port.
pub fn fill_palette(state: &mut HardwareState, index: u8) {
    cpu_write(state, 0x2006, (ppu_mem::PALETTE_BASE >> 8) as u8);
    cpu_write(state, 0x2006, ppu_mem::PALETTE_BASE as u8);
    for _ in 0..ppu_mem::PALETTE_RAM_SIZE {
        cpu_write(state, 0x2007, index);
    }
}

/// Stores `bytes` into PPU space starting at `addr` without side effects.
pub fn poke_ppu(state: &mut HardwareState, addr: u16, bytes: &[u8]) {
    for (offset, &byte) in bytes.iter().enumerate() {
        state.store(PpuMem(addr + offset as u16), byte);
    }
}

/// Runs the PPU alone for one frame and records every vblank flag edge as
/// `(scanline, cycle, new_value)`.
pub fn vblank_edges(state: &mut HardwareState) -> Result<Vec<(u16, u16, bool)>> {
    let mut edges = Vec::new();
    let mut last = state.load(VBlank);
    for _ in 0..DOTS_PER_FRAME {
        ppu::step(state)?;
        let now = state.load(VBlank);
        if now != last {
            edges.push((state.load(Scanline), state.load(Cycle), now));
            last = now;
        }
    }
    Ok(edges)
}

pub fn at(x: u8, y: u8) -> Coord {
    Coord::new(x, y).expect("coordinate on screen")
}

pub fn black() -> Color {
    Color::from_index(BLACK_INDEX)
}
