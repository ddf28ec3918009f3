use crate::{
    address::{ByteCell, Coord, FlagCell, WordCell},
    bus::Backing,
    cpu::{CpuReg, Interrupt},
    mem_block::{cpu as cpu_block, ppu as ppu_block},
    memory::ppu as ppu_mem,
    ppu::{RESET_CYCLE, RESET_SCANLINE, palette::Color},
};

/// Deterministic in-memory backing for exercising engines without a session.
///
/// CPU and PPU space are flat arrays: no mirroring, no cartridge, no register
/// side effects. Counters and flags start at the same reset values as
/// [`crate::state::HardwareState`].
#[derive(Debug, Clone)]
pub struct FixtureBus {
    registers: [u8; 5],
    program_counter: u16,
    cpu_mem: cpu_block::AddressSpace,
    ppu_mem: ppu_block::AddressSpace,
    oam: ppu_block::OamRam,
    scroll: [u8; 2],
    oam_addr: u8,
    read_buffer: u8,
    cycle: u16,
    scanline: u16,
    nametable_base: u16,
    bg_pattern_base: u16,
    vram_addr: u16,
    vblank: bool,
    nmi_enable: bool,
    write_toggle: bool,
    frame: u64,
    screen: ppu_block::Screen,
    interrupt: Option<Interrupt>,
}

impl Default for FixtureBus {
    fn default() -> Self {
        Self::new()
    }
}

impl FixtureBus {
    pub fn new() -> Self {
        Self {
            registers: [0; 5],
            program_counter: 0,
            cpu_mem: cpu_block::AddressSpace::new(),
            ppu_mem: ppu_block::AddressSpace::new(),
            oam: ppu_block::OamRam::new(),
            scroll: [0; 2],
            oam_addr: 0,
            read_buffer: 0,
            cycle: RESET_CYCLE,
            scanline: RESET_SCANLINE,
            nametable_base: ppu_mem::NAMETABLE_BASE,
            bg_pattern_base: ppu_mem::PATTERN_TABLE_0,
            vram_addr: 0,
            vblank: false,
            nmi_enable: false,
            write_toggle: false,
            frame: 0,
            screen: ppu_block::Screen::new(),
            interrupt: None,
        }
    }

    /// Copies `bytes` into PPU space starting at `addr`, wrapping at 16 KiB.
    pub fn with_ppu_bytes(mut self, addr: u16, bytes: &[u8]) -> Self {
        for (offset, &byte) in bytes.iter().enumerate() {
            let at = addr.wrapping_add(offset as u16) & ppu_mem::VRAM_MIRROR_MASK;
            self.ppu_mem[at as usize] = byte;
        }
        self
    }

    /// Fills `len` bytes of PPU space starting at `addr` with `value`.
    pub fn with_ppu_fill(mut self, addr: u16, len: usize, value: u8) -> Self {
        for offset in 0..len {
            let at = addr.wrapping_add(offset as u16) & ppu_mem::VRAM_MIRROR_MASK;
            self.ppu_mem[at as usize] = value;
        }
        self
    }

    /// Places the raster at `(scanline, cycle)` without running the PPU.
    pub fn at_position(mut self, scanline: u16, cycle: u16) -> Self {
        self.scanline = scanline;
        self.cycle = cycle;
        self
    }
}

fn register_slot(reg: CpuReg) -> usize {
    match reg {
        CpuReg::A => 0,
        CpuReg::X => 1,
        CpuReg::Y => 2,
        CpuReg::Status => 3,
        CpuReg::StackPointer => 4,
    }
}

impl Backing for FixtureBus {
    fn read_byte(&self, cell: ByteCell) -> u8 {
        match cell {
            ByteCell::Cpu(reg) => self.registers[register_slot(reg)],
            ByteCell::CpuMem(addr) => self.cpu_mem[addr as usize],
            ByteCell::PpuMem(addr) => self.ppu_mem[(addr & ppu_mem::VRAM_MIRROR_MASK) as usize],
            ByteCell::Oam(index) => self.oam[index as usize],
            ByteCell::ScrollX => self.scroll[0],
            ByteCell::ScrollY => self.scroll[1],
            ByteCell::OamAddr => self.oam_addr,
            ByteCell::ReadBuffer => self.read_buffer,
        }
    }

    fn write_byte(&mut self, cell: ByteCell, value: u8) {
        match cell {
            ByteCell::Cpu(reg) => self.registers[register_slot(reg)] = value,
            ByteCell::CpuMem(addr) => self.cpu_mem[addr as usize] = value,
            ByteCell::PpuMem(addr) => {
                self.ppu_mem[(addr & ppu_mem::VRAM_MIRROR_MASK) as usize] = value
            }
            ByteCell::Oam(index) => self.oam[index as usize] = value,
            ByteCell::ScrollX => self.scroll[0] = value,
            ByteCell::ScrollY => self.scroll[1] = value,
            ByteCell::OamAddr => self.oam_addr = value,
            ByteCell::ReadBuffer => self.read_buffer = value,
        }
    }

    fn read_word(&self, cell: WordCell) -> u16 {
        match cell {
            WordCell::ProgramCounter => self.program_counter,
            WordCell::Cycle => self.cycle,
            WordCell::Scanline => self.scanline,
            WordCell::NametableBase => self.nametable_base,
            WordCell::BgPatternBase => self.bg_pattern_base,
            WordCell::VramAddr => self.vram_addr,
        }
    }

    fn write_word(&mut self, cell: WordCell, value: u16) {
        match cell {
            WordCell::ProgramCounter => self.program_counter = value,
            WordCell::Cycle => self.cycle = value,
            WordCell::Scanline => self.scanline = value,
            WordCell::NametableBase => self.nametable_base = value,
            WordCell::BgPatternBase => self.bg_pattern_base = value,
            WordCell::VramAddr => self.vram_addr = value,
        }
    }

    fn read_flag(&self, cell: FlagCell) -> bool {
        match cell {
            FlagCell::VBlank => self.vblank,
            FlagCell::NmiEnable => self.nmi_enable,
            FlagCell::WriteToggle => self.write_toggle,
        }
    }

    fn write_flag(&mut self, cell: FlagCell, value: bool) {
        match cell {
            FlagCell::VBlank => self.vblank = value,
            FlagCell::NmiEnable => self.nmi_enable = value,
            FlagCell::WriteToggle => self.write_toggle = value,
        }
    }

    fn read_frame(&self) -> u64 {
        self.frame
    }

    fn write_frame(&mut self, value: u64) {
        self.frame = value;
    }

    fn read_pixel(&self, at: Coord) -> Color {
        self.screen[at.index()]
    }

    fn write_pixel(&mut self, at: Coord, color: Color) {
        self.screen[at.index()] = color;
    }

    fn read_interrupt(&self) -> Option<Interrupt> {
        self.interrupt
    }

    fn write_interrupt(&mut self, value: Option<Interrupt>) {
        self.interrupt = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        address::{Cycle, PpuMem, Scanline, VBlank},
        bus::Bus,
    };

    #[test]
    fn starts_at_reset_position() {
        let bus = FixtureBus::new();
        assert_eq!(bus.load(Cycle), 340);
        assert_eq!(bus.load(Scanline), 240);
        assert!(!bus.load(VBlank));
    }

    #[test]
    fn ppu_space_is_flat() {
        let bus = FixtureBus::new().with_ppu_bytes(0x3F10, &[0x21]);
        assert_eq!(bus.load(PpuMem(0x3F10)), 0x21);
        // No palette aliasing in the fixture.
        assert_eq!(bus.load(PpuMem(0x3F00)), 0x00);
        // Addresses still wrap at 14 bits.
        assert_eq!(bus.load(PpuMem(0x7F10)), 0x21);
    }
}
