//! Mapper 0 (NROM).
//!
//! No banking at all:
//!
//! | Area | Range         | Contents                                        |
//! |------|---------------|-------------------------------------------------|
//! | CPU  | `$6000-$7FFF` | PRG RAM, when the board has any                 |
//! | CPU  | `$8000-$FFFF` | 32 KiB PRG ROM, or 16 KiB mirrored twice        |
//! | PPU  | `$0000-$1FFF` | 8 KiB CHR ROM or RAM                            |

use crate::{
    cartridge::{
        ChrRom, PrgRom, TrainerBytes,
        header::{Header, Mirroring},
        mapper::{ChrStorage, Mapper, PrgRam, read_banked},
    },
    memory::cpu as cpu_mem,
};

#[derive(Debug, Clone)]
pub struct Mapper0 {
    prg_rom: PrgRom,
    prg_ram: PrgRam,
    chr: ChrStorage,
    mirroring: Mirroring,
}

impl Mapper0 {
    pub fn new(header: &Header, prg_rom: PrgRom, chr_rom: ChrRom, trainer: TrainerBytes) -> Self {
        Self {
            prg_rom,
            prg_ram: PrgRam::new(header, trainer),
            chr: ChrStorage::for_header(header, chr_rom),
            mirroring: header.mirroring,
        }
    }
}

impl Mapper for Mapper0 {
    fn id(&self) -> u16 {
        0
    }

    fn cpu_read(&self, addr: u16) -> Option<u8> {
        match addr {
            cpu_mem::PRG_ROM_START..=cpu_mem::CPU_ADDR_END => Some(read_banked(
                &self.prg_rom,
                0,
                0,
                (addr - cpu_mem::PRG_ROM_START) as usize,
            )),
            _ => self.prg_ram.read(addr),
        }
    }

    fn cpu_write(&mut self, addr: u16, value: u8) {
        self.prg_ram.write(addr, value);
    }

    fn ppu_read(&self, addr: u16) -> u8 {
        self.chr.read(addr as usize)
    }

    fn ppu_write(&mut self, addr: u16, value: u8) {
        self.chr.write(addr as usize, value);
    }

    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }
}
