//! Mapper 3 (CNROM): fixed PRG, one switchable 8 KiB CHR bank.
//!
//! | Area | Range         | Contents                                        |
//! |------|---------------|-------------------------------------------------|
//! | CPU  | `$6000-$7FFF` | PRG RAM, when the board has any                 |
//! | CPU  | `$8000-$FFFF` | 32 KiB PRG ROM, or 16 KiB mirrored twice        |
//! | PPU  | `$0000-$1FFF` | CHR bank selected by the last write to `$8000+` |

use tracing::trace;

use crate::{
    cartridge::{
        ChrRom, PrgRom, TrainerBytes,
        header::{Header, Mirroring},
        mapper::{ChrStorage, Mapper, PrgRam, read_banked},
    },
    memory::cpu as cpu_mem,
};

const CHR_BANK_SIZE: usize = 8 * 1024;

#[derive(Debug, Clone)]
pub struct Mapper3 {
    prg_rom: PrgRom,
    prg_ram: PrgRam,
    chr: ChrStorage,
    chr_bank_count: usize,
    chr_bank: usize,
    mirroring: Mirroring,
}

impl Mapper3 {
    pub fn new(header: &Header, prg_rom: PrgRom, chr_rom: ChrRom, trainer: TrainerBytes) -> Self {
        let chr = ChrStorage::for_header(header, chr_rom);
        Self {
            prg_rom,
            prg_ram: PrgRam::new(header, trainer),
            chr_bank_count: (chr.len() / CHR_BANK_SIZE).max(1),
            chr,
            chr_bank: 0,
            mirroring: header.mirroring,
        }
    }

    fn chr_offset(&self, addr: u16) -> usize {
        self.chr_bank * CHR_BANK_SIZE + (addr as usize & (CHR_BANK_SIZE - 1))
    }
}

impl Mapper for Mapper3 {
    fn id(&self) -> u16 {
        3
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
        if addr >= cpu_mem::PRG_ROM_START {
            self.chr_bank = value as usize % self.chr_bank_count;
            trace!(bank = self.chr_bank, "cnrom chr bank");
        } else {
            self.prg_ram.write(addr, value);
        }
    }

    fn ppu_read(&self, addr: u16) -> u8 {
        self.chr.read(self.chr_offset(addr))
    }

    fn ppu_write(&mut self, addr: u16, value: u8) {
        let offset = self.chr_offset(addr);
        self.chr.write(offset, value);
    }

    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }
}
