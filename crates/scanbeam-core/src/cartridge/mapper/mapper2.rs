//! Mapper 2 (UxROM): a switchable 16 KiB PRG bank under a fixed last bank.
//!
//! | Area | Range         | Contents                                        |
//! |------|---------------|-------------------------------------------------|
//! | CPU  | `$6000-$7FFF` | PRG RAM, when the board has any                 |
//! | CPU  | `$8000-$BFFF` | PRG bank selected by the last write to `$8000+` |
//! | CPU  | `$C000-$FFFF` | Last PRG bank                                   |
//! | PPU  | `$0000-$1FFF` | 8 KiB CHR, usually RAM                          |

use tracing::trace;

use crate::{
    cartridge::{
        ChrRom, PrgRom, TrainerBytes,
        header::{Header, Mirroring},
        mapper::{ChrStorage, Mapper, PrgRam, read_banked},
    },
    memory::cpu as cpu_mem,
};

const PRG_BANK_SIZE: usize = 16 * 1024;
/// Start of the window fixed to the last bank.
const FIXED_WINDOW_START: u16 = 0xC000;

#[derive(Debug, Clone)]
pub struct Mapper2 {
    prg_rom: PrgRom,
    prg_ram: PrgRam,
    chr: ChrStorage,
    bank_count: usize,
    selected_bank: usize,
    mirroring: Mirroring,
}

impl Mapper2 {
    pub fn new(header: &Header, prg_rom: PrgRom, chr_rom: ChrRom, trainer: TrainerBytes) -> Self {
        let bank_count = (prg_rom.len() / PRG_BANK_SIZE).max(1);
        Self {
            prg_rom,
            prg_ram: PrgRam::new(header, trainer),
            chr: ChrStorage::for_header(header, chr_rom),
            bank_count,
            selected_bank: 0,
            mirroring: header.mirroring,
        }
    }
}

impl Mapper for Mapper2 {
    fn id(&self) -> u16 {
        2
    }

    fn cpu_read(&self, addr: u16) -> Option<u8> {
        let offset = addr as usize & (PRG_BANK_SIZE - 1);
        match addr {
            cpu_mem::PRG_ROM_START..FIXED_WINDOW_START => Some(read_banked(
                &self.prg_rom,
                self.selected_bank,
                PRG_BANK_SIZE,
                offset,
            )),
            FIXED_WINDOW_START..=cpu_mem::CPU_ADDR_END => Some(read_banked(
                &self.prg_rom,
                self.bank_count - 1,
                PRG_BANK_SIZE,
                offset,
            )),
            _ => self.prg_ram.read(addr),
        }
    }

    fn cpu_write(&mut self, addr: u16, value: u8) {
        if addr >= cpu_mem::PRG_ROM_START {
            self.selected_bank = value as usize % self.bank_count;
            trace!(bank = self.selected_bank, "uxrom prg bank");
        } else {
            self.prg_ram.write(addr, value);
        }
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
