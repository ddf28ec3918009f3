//! Board logic behind the cartridge connector.
//!
//! A mapper decides what the CPU sees at `$4020-$FFFF` and what the PPU sees
//! at `$0000-$1FFF`. The engines never talk to it directly: the live backing
//! routes those address ranges here, so bank switching is just ordinary
//! loads and stores from the engines' point of view.

use std::fmt::Debug;

use dyn_clone::DynClone;

use crate::{
    cartridge::{
        TRAINER_SIZE, TrainerBytes,
        header::{Header, Mirroring},
    },
    memory::cpu as cpu_mem,
};

pub mod chr_storage;
mod mapper0;
mod mapper2;
mod mapper3;

pub use chr_storage::ChrStorage;
pub use mapper0::Mapper0;
pub use mapper2::Mapper2;
pub use mapper3::Mapper3;

/// Offset of the trainer inside PRG RAM (`$7000`).
const TRAINER_OFFSET: usize = 0x1000;

pub trait Mapper: DynClone + Debug {
    /// iNES mapper number.
    fn id(&self) -> u16;

    /// CPU read in cartridge space. `None` means the board does not drive the
    /// data bus at `addr`.
    fn cpu_read(&self, addr: u16) -> Option<u8>;

    /// CPU write in cartridge space (PRG RAM or bank registers).
    fn cpu_write(&mut self, addr: u16, value: u8);

    /// PPU read in pattern-table space, `addr < $2000`.
    fn ppu_read(&self, addr: u16) -> u8;

    /// PPU write in pattern-table space; only CHR RAM keeps it.
    fn ppu_write(&mut self, addr: u16, value: u8);

    fn mirroring(&self) -> Mirroring;
}

dyn_clone::clone_trait_object!(Mapper);

/// Work RAM at `$6000-$7FFF`, shared by the discrete boards.
#[derive(Debug, Clone)]
pub struct PrgRam(Box<[u8]>);

impl PrgRam {
    /// Allocates the RAM advertised by `header` and preloads the trainer at
    /// `$7000` when one is present.
    pub fn new(header: &Header, trainer: TrainerBytes) -> Self {
        let window = (cpu_mem::PRG_RAM_END - cpu_mem::PRG_RAM_START) as usize + 1;
        let mut size = header.prg_ram_size.min(window);
        if trainer.is_some() {
            size = size.max(TRAINER_OFFSET + TRAINER_SIZE);
        }

        let mut ram = vec![0; size].into_boxed_slice();
        if let Some(trainer) = trainer {
            ram[TRAINER_OFFSET..TRAINER_OFFSET + TRAINER_SIZE].copy_from_slice(&trainer[..]);
        }
        Self(ram)
    }

    fn index(&self, addr: u16) -> Option<usize> {
        match addr {
            cpu_mem::PRG_RAM_START..=cpu_mem::PRG_RAM_END if !self.0.is_empty() => {
                Some((addr - cpu_mem::PRG_RAM_START) as usize % self.0.len())
            }
            _ => None,
        }
    }

    /// `None` when `addr` is outside the window or the board has no RAM.
    pub fn read(&self, addr: u16) -> Option<u8> {
        self.index(addr).map(|i| self.0[i])
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        if let Some(i) = self.index(addr) {
            self.0[i] = value;
        }
    }
}

/// Reads PRG ROM through a window starting at `bank * bank_size`, wrapping at
/// the ROM size.
fn read_banked(rom: &[u8], bank: usize, bank_size: usize, offset: usize) -> u8 {
    if rom.is_empty() {
        0
    } else {
        rom[(bank * bank_size + offset) % rom.len()]
    }
}

/// Header for a board with the given sizes, as iNES would describe it.
#[cfg(test)]
fn test_header(
    mapper: u16,
    prg_rom_size: usize,
    chr_rom_size: usize,
    prg_ram_size: usize,
) -> Header {
    Header {
        format: crate::cartridge::header::RomFormat::INes,
        mapper,
        submapper: 0,
        mirroring: Mirroring::Horizontal,
        battery: false,
        trainer_present: false,
        prg_rom_size,
        chr_rom_size,
        prg_ram_size,
        chr_ram_size: if chr_rom_size == 0 { 8 * 1024 } else { 0 },
    }
}
