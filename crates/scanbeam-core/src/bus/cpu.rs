//! CPU-side decode of the PPU register window.
//!
//! A CPU engine reads and writes its 64 KiB map through [`cpu_read`] and
//! [`cpu_write`]. Ordinary addresses are single-cell loads/stores; the PPU
//! registers at `$2000-$3FFF` and OAM DMA at `$4014` fan out into the PPU-space
//! cells the rendering engine consumes. Every effect is still expressed as a
//! sequence of `load`/`store` calls, so this works over any backing.

use tracing::trace;

use crate::{
    address::{
        BgPatternBase, CpuMem, NametableBase, NmiEnable, Oam, OamAddr, PpuMem, ReadBuffer,
        ScrollX, ScrollY, VBlank, VramAddr, WriteToggle,
    },
    bus::Bus,
    memory::{
        cpu as cpu_mem,
        ppu::{self as ppu_mem, Register},
    },
    ppu::registers::{Control, Status},
};

/// Bytes moved by one OAM DMA transfer.
const OAM_DMA_LEN: u16 = 0x100;

/// Reads a byte as the CPU sees it, applying register read side effects.
pub fn cpu_read<M: Bus>(bus: &mut M, addr: u16) -> u8 {
    match addr {
        cpu_mem::PPU_REGISTER_BASE..=cpu_mem::PPU_REGISTER_END => {
            read_register(bus, Register::from_cpu_addr(addr))
        }
        _ => bus.load(CpuMem(addr)),
    }
}

/// Writes a byte as the CPU does, applying register write side effects.
pub fn cpu_write<M: Bus>(bus: &mut M, addr: u16, value: u8) {
    match addr {
        cpu_mem::PPU_REGISTER_BASE..=cpu_mem::PPU_REGISTER_END => {
            let register = Register::from_cpu_addr(addr);
            trace!(?register, value, "ppu register write");
            bus.store(CpuMem(register.addr()), value);
            write_register(bus, register, value);
        }
        ppu_mem::OAM_DMA => {
            bus.store(CpuMem(addr), value);
            oam_dma(bus, value);
        }
        _ => bus.store(CpuMem(addr), value),
    }
}

fn read_register<M: Bus>(bus: &mut M, register: Register) -> u8 {
    match register {
        Register::Status => {
            let status = Status::from_vblank(bus.load(VBlank));
            // Reading status acknowledges vblank and resets the `$2005/$2006` latch.
            bus.store(VBlank, false);
            bus.store(WriteToggle, false);
            status.bits()
        }
        Register::OamData => {
            let index = bus.load(OamAddr);
            bus.load(Oam(index))
        }
        Register::Data => read_data(bus),
        // Write-only registers return whatever was last latched into them.
        _ => bus.load(CpuMem(register.addr())),
    }
}

fn write_register<M: Bus>(bus: &mut M, register: Register, value: u8) {
    match register {
        Register::Control => {
            let control = Control::from_bits_retain(value);
            bus.store(NametableBase, control.base_nametable_addr());
            bus.store(BgPatternBase, control.background_pattern_table());
            bus.store(NmiEnable, control.nmi_enabled());
        }
        Register::Mask | Register::Status => {}
        Register::OamAddr => bus.store(OamAddr, value),
        Register::OamData => {
            let index = bus.load(OamAddr);
            bus.store(Oam(index), value);
            bus.store(OamAddr, index.wrapping_add(1));
        }
        Register::Scroll => {
            let second = bus.load(WriteToggle);
            if second {
                bus.store(ScrollY, value);
            } else {
                bus.store(ScrollX, value);
            }
            bus.store(WriteToggle, !second);
        }
        Register::Addr => {
            let second = bus.load(WriteToggle);
            let current = bus.load(VramAddr);
            let next = if second {
                (current & 0xFF00) | value as u16
            } else {
                (current & 0x00FF) | (((value & 0x3F) as u16) << 8)
            };
            bus.store(VramAddr, next);
            bus.store(WriteToggle, !second);
        }
        Register::Data => {
            let addr = bus.load(VramAddr);
            bus.store(PpuMem(addr), value);
            advance_vram_addr(bus, addr);
        }
    }
}

fn read_data<M: Bus>(bus: &mut M) -> u8 {
    let addr = bus.load(VramAddr);
    let data = bus.load(PpuMem(addr));
    let buffered = bus.load(ReadBuffer);
    bus.store(ReadBuffer, data);
    advance_vram_addr(bus, addr);

    if addr & ppu_mem::VRAM_MIRROR_MASK >= ppu_mem::PALETTE_BASE {
        data
    } else {
        buffered
    }
}

fn advance_vram_addr<M: Bus>(bus: &mut M, addr: u16) {
    let control = Control::from_bits_retain(bus.load(CpuMem(Register::Control.addr())));
    let next = addr.wrapping_add(control.vram_increment()) & ppu_mem::VRAM_MIRROR_MASK;
    bus.store(VramAddr, next);
}

fn oam_dma<M: Bus>(bus: &mut M, page: u8) {
    let base = (page as u16) << 8;
    let start = bus.load(OamAddr);
    for offset in 0..OAM_DMA_LEN {
        let byte = bus.load(CpuMem(base | offset));
        bus.store(Oam(start.wrapping_add(offset as u8)), byte);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::FixtureBus;

    #[test]
    fn control_write_updates_engine_cells() {
        let mut bus = FixtureBus::new();
        cpu_write(&mut bus, Register::Control.addr(), 0b1001_0001);
        assert!(bus.load(NmiEnable));
        assert_eq!(bus.load(NametableBase), 0x2400);
        assert_eq!(bus.load(BgPatternBase), ppu_mem::PATTERN_TABLE_1);

        // Mirrors of `$2000` decode the same way.
        cpu_write(&mut bus, 0x3FF8, 0x00);
        assert!(!bus.load(NmiEnable));
        assert_eq!(bus.load(NametableBase), ppu_mem::NAMETABLE_BASE);
    }

    #[test]
    fn buffered_ppu_data_read() {
        let mut bus = FixtureBus::new();
        cpu_write(&mut bus, Register::Addr.addr(), 0x20);
        cpu_write(&mut bus, Register::Addr.addr(), 0x00);
        cpu_write(&mut bus, Register::Data.addr(), 0x12);

        cpu_write(&mut bus, Register::Addr.addr(), 0x20);
        cpu_write(&mut bus, Register::Addr.addr(), 0x00);

        let first = cpu_read(&mut bus, Register::Data.addr());
        let second = cpu_read(&mut bus, Register::Data.addr());
        assert_eq!(first, 0x00, "First read should return buffered value");
        assert_eq!(second, 0x12, "Second read should contain VRAM data");
    }

    #[test]
    fn palette_reads_bypass_buffer() {
        let mut bus = FixtureBus::new();
        cpu_write(&mut bus, Register::Addr.addr(), 0x3F);
        cpu_write(&mut bus, Register::Addr.addr(), 0x00);
        cpu_write(&mut bus, Register::Data.addr(), 0x0F);

        cpu_write(&mut bus, Register::Addr.addr(), 0x3F);
        cpu_write(&mut bus, Register::Addr.addr(), 0x00);
        assert_eq!(cpu_read(&mut bus, Register::Data.addr()), 0x0F);
    }

    #[test]
    fn data_writes_step_by_32_when_requested() {
        let mut bus = FixtureBus::new();
        cpu_write(&mut bus, Register::Control.addr(), 0b0000_0100);
        cpu_write(&mut bus, Register::Addr.addr(), 0x20);
        cpu_write(&mut bus, Register::Addr.addr(), 0x00);
        cpu_write(&mut bus, Register::Data.addr(), 0xAA);
        cpu_write(&mut bus, Register::Data.addr(), 0xBB);

        assert_eq!(bus.load(PpuMem(0x2000)), 0xAA);
        assert_eq!(bus.load(PpuMem(0x2020)), 0xBB);
        assert_eq!(bus.load(VramAddr), 0x2040);
    }

    #[test]
    fn status_read_acknowledges_vblank_and_resets_latch() {
        let mut bus = FixtureBus::new();
        bus.store(VBlank, true);
        cpu_write(&mut bus, Register::Scroll.addr(), 0x12);

        let status = cpu_read(&mut bus, Register::Status.addr());
        assert_eq!(status & 0x80, 0x80);
        assert!(!bus.load(VBlank));

        // The next scroll write targets X again.
        cpu_write(&mut bus, Register::Scroll.addr(), 0x56);
        assert_eq!(bus.load(ScrollX), 0x56);
        assert_eq!(bus.load(ScrollY), 0x00);
    }

    #[test]
    fn scroll_writes_alternate_between_axes() {
        let mut bus = FixtureBus::new();
        cpu_write(&mut bus, Register::Scroll.addr(), 0x12);
        cpu_write(&mut bus, Register::Scroll.addr(), 0x34);
        assert_eq!(bus.load(ScrollX), 0x12);
        assert_eq!(bus.load(ScrollY), 0x34);
    }

    #[test]
    fn oam_data_auto_increments() {
        let mut bus = FixtureBus::new();
        cpu_write(&mut bus, Register::OamAddr.addr(), 0x02);
        cpu_write(&mut bus, Register::OamData.addr(), 0xAA);
        cpu_write(&mut bus, Register::OamData.addr(), 0xBB);
        assert_eq!(bus.load(Oam(2)), 0xAA);
        assert_eq!(bus.load(Oam(3)), 0xBB);
    }

    #[test]
    fn oam_dma_copies_a_page() {
        let mut bus = FixtureBus::new();
        for i in 0..=0xFFu16 {
            bus.store(CpuMem(0x0200 | i), i as u8);
        }
        cpu_write(&mut bus, ppu_mem::OAM_DMA, 0x02);
        assert_eq!(bus.load(Oam(0x00)), 0x00);
        assert_eq!(bus.load(Oam(0x7F)), 0x7F);
        assert_eq!(bus.load(Oam(0xFF)), 0xFF);
    }

    #[test]
    fn plain_addresses_are_single_cells() {
        let mut bus = FixtureBus::new();
        cpu_write(&mut bus, 0x0010, 0x99);
        assert_eq!(cpu_read(&mut bus, 0x0010), 0x99);
        assert_eq!(bus.load(CpuMem(0x0010)), 0x99);
    }
}
