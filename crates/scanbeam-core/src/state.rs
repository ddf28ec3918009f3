//! The live hardware state of one session.
//!
//! [`HardwareState`] is the single aggregate behind every typed address. It
//! routes CPU-space and PPU-space cells through the console memory map
//! (internal RAM mirroring, the PPU register window, nametable and palette
//! mirroring, the cartridge board) and holds the PPU's counters, flags and
//! screen. Engines reach it only through [`crate::bus::Bus`].

use crate::{
    address::{ByteCell, Coord, FlagCell, PpuMem, WordCell},
    bus::{Backing, Bus},
    cartridge::{Cartridge, header::Mirroring},
    cpu::{CpuReg, Interrupt},
    error::Error,
    mem_block::{cpu as cpu_block, ppu as ppu_block},
    memory::{cpu as cpu_mem, ppu as ppu_mem},
    ppu::{RESET_CYCLE, RESET_SCANLINE, palette::Color},
};

/// Stack pointer after the reset sequence.
const RESET_STACK_POINTER: u8 = 0xFD;
/// Status after reset: interrupts masked, unused bit set.
const RESET_STATUS: u8 = 0x24;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct CpuRegisters {
    a: u8,
    x: u8,
    y: u8,
    status: u8,
    stack_pointer: u8,
    program_counter: u16,
}

impl CpuRegisters {
    fn slot(&mut self, reg: CpuReg) -> &mut u8 {
        match reg {
            CpuReg::A => &mut self.a,
            CpuReg::X => &mut self.x,
            CpuReg::Y => &mut self.y,
            CpuReg::Status => &mut self.status,
            CpuReg::StackPointer => &mut self.stack_pointer,
        }
    }

    fn get(&self, reg: CpuReg) -> u8 {
        match reg {
            CpuReg::A => self.a,
            CpuReg::X => self.x,
            CpuReg::Y => self.y,
            CpuReg::Status => self.status,
            CpuReg::StackPointer => self.stack_pointer,
        }
    }
}

/// PPU-internal cells that are not memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PpuCells {
    cycle: u16,
    scanline: u16,
    frame: u64,
    scroll_x: u8,
    scroll_y: u8,
    nametable_base: u16,
    bg_pattern_base: u16,
    vram_addr: u16,
    oam_addr: u8,
    read_buffer: u8,
    vblank: bool,
    nmi_enable: bool,
    write_toggle: bool,
}

impl Default for PpuCells {
    fn default() -> Self {
        Self {
            cycle: RESET_CYCLE,
            scanline: RESET_SCANLINE,
            frame: 0,
            scroll_x: 0,
            scroll_y: 0,
            nametable_base: ppu_mem::NAMETABLE_BASE,
            bg_pattern_base: ppu_mem::PATTERN_TABLE_0,
            vram_addr: 0,
            oam_addr: 0,
            read_buffer: 0,
            vblank: false,
            nmi_enable: false,
            write_toggle: false,
        }
    }
}

/// Everything hardware-visible in one running console.
#[derive(Debug, Clone)]
pub struct HardwareState {
    cpu: CpuRegisters,
    ram: cpu_block::Ram,
    ppu_registers: cpu_block::PpuRegisters,
    io_registers: cpu_block::IoRegisters,
    cartridge: Cartridge,
    nametables: ppu_block::NametableRam,
    palette: ppu_block::PaletteRam,
    oam: ppu_block::OamRam,
    ppu: PpuCells,
    screen: ppu_block::Screen,
    interrupt: Option<Interrupt>,
}

impl HardwareState {
    /// Builds the power-on state around `cartridge`.
    ///
    /// Memories are zeroed, the raster sits at its reset position and the
    /// program counter holds the cartridge's reset vector.
    pub fn new(cartridge: Cartridge) -> Self {
        let cpu = CpuRegisters {
            status: RESET_STATUS,
            stack_pointer: RESET_STACK_POINTER,
            program_counter: cartridge.reset_vector(),
            ..CpuRegisters::default()
        };

        Self {
            cpu,
            ram: cpu_block::Ram::new(),
            ppu_registers: cpu_block::PpuRegisters::new(),
            io_registers: cpu_block::IoRegisters::new(),
            cartridge,
            nametables: ppu_block::NametableRam::new(),
            palette: ppu_block::PaletteRam::new(),
            oam: ppu_block::OamRam::new(),
            ppu: PpuCells::default(),
            screen: ppu_block::Screen::new(),
            interrupt: None,
        }
    }

    /// Parses `bytes` as a cartridge image and builds the power-on state.
    pub fn from_rom(bytes: &[u8]) -> Result<Self, Error> {
        Ok(Self::new(Cartridge::from_bytes(bytes)?))
    }

    pub fn cartridge(&self) -> &Cartridge {
        &self.cartridge
    }

    /// Overwrites PPU space with a raw 16 KiB image, byte `i` going to
    /// `PpuMem(i)`. Bytes at mirror-only addresses (`$3000-$3EFF`, palette
    /// mirrors) are skipped. Pattern bytes only stick on boards with CHR RAM.
    pub fn load_ppu_dump(&mut self, dump: &[u8]) -> Result<(), Error> {
        if dump.len() != ppu_mem::ADDRESS_SPACE_SIZE {
            return Err(Error::InvalidPpuDump {
                expected: ppu_mem::ADDRESS_SPACE_SIZE,
                actual: dump.len(),
            });
        }
        for (addr, &byte) in dump.iter().enumerate() {
            let addr = addr as u16;
            if is_primary_ppu_addr(addr) {
                self.store(PpuMem(addr), byte);
            }
        }
        Ok(())
    }

    /// Screen contents in row-major order.
    pub fn screen(&self) -> &[Color] {
        &self.screen
    }

    fn read_cpu(&self, addr: u16) -> u8 {
        match addr {
            0..=cpu_mem::INTERNAL_RAM_MIRROR_END => {
                self.ram[(addr & cpu_mem::INTERNAL_RAM_MASK) as usize]
            }
            cpu_mem::PPU_REGISTER_BASE..=cpu_mem::PPU_REGISTER_END => {
                self.ppu_registers[(addr & ppu_mem::REGISTER_SELECT_MASK) as usize]
            }
            cpu_mem::IO_REGISTER_BASE..=cpu_mem::IO_REGISTER_END => {
                self.io_registers[(addr - cpu_mem::IO_REGISTER_BASE) as usize]
            }
            // Nothing drives the bus where the board maps nothing.
            _ => self.cartridge.cpu_read(addr).unwrap_or(0),
        }
    }

    fn write_cpu(&mut self, addr: u16, value: u8) {
        match addr {
            0..=cpu_mem::INTERNAL_RAM_MIRROR_END => {
                self.ram[(addr & cpu_mem::INTERNAL_RAM_MASK) as usize] = value;
            }
            cpu_mem::PPU_REGISTER_BASE..=cpu_mem::PPU_REGISTER_END => {
                self.ppu_registers[(addr & ppu_mem::REGISTER_SELECT_MASK) as usize] = value;
            }
            cpu_mem::IO_REGISTER_BASE..=cpu_mem::IO_REGISTER_END => {
                self.io_registers[(addr - cpu_mem::IO_REGISTER_BASE) as usize] = value;
            }
            _ => self.cartridge.cpu_write(addr, value),
        }
    }

    fn read_ppu(&self, addr: u16) -> u8 {
        match ppu_slot(addr, self.cartridge.mirroring()) {
            PpuSlot::Pattern(addr) => self.cartridge.ppu_read(addr),
            PpuSlot::Nametable(index) => self.nametables[index],
            PpuSlot::Palette(index) => self.palette[index],
        }
    }

    fn write_ppu(&mut self, addr: u16, value: u8) {
        match ppu_slot(addr, self.cartridge.mirroring()) {
            PpuSlot::Pattern(addr) => self.cartridge.ppu_write(addr, value),
            PpuSlot::Nametable(index) => self.nametables[index] = value,
            PpuSlot::Palette(index) => self.palette[index] = value,
        }
    }
}

/// Physical home of a PPU address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PpuSlot {
    Pattern(u16),
    Nametable(usize),
    Palette(usize),
}

fn ppu_slot(addr: u16, mirroring: Mirroring) -> PpuSlot {
    let addr = addr & ppu_mem::VRAM_MIRROR_MASK;
    match addr {
        0..=ppu_mem::PATTERN_TABLE_END => PpuSlot::Pattern(addr),
        ppu_mem::NAMETABLE_BASE..ppu_mem::PALETTE_BASE => {
            PpuSlot::Nametable(nametable_index(addr, mirroring))
        }
        _ => PpuSlot::Palette(palette_index(addr)),
    }
}

/// Whether `addr` is the first address of its cell rather than a mirror.
fn is_primary_ppu_addr(addr: u16) -> bool {
    match addr {
        0..ppu_mem::NAMETABLE_MIRROR_BASE => true,
        ppu_mem::NAMETABLE_MIRROR_BASE..ppu_mem::PALETTE_BASE => false,
        _ => palette_index(addr) == (addr - ppu_mem::PALETTE_BASE) as usize,
    }
}

/// Folds `$2000-$3EFF` onto console VRAM. `$3000-$3EFF` repeats
/// `$2000-$2EFF`; the four logical tables then collapse per `mirroring`.
fn nametable_index(addr: u16, mirroring: Mirroring) -> usize {
    let table_size = ppu_mem::NAMETABLE_SIZE as usize;
    let offset = (addr - ppu_mem::NAMETABLE_BASE) as usize % (4 * table_size);
    let logical = offset / table_size;
    let physical = match mirroring {
        Mirroring::Horizontal => logical / 2,
        Mirroring::Vertical => logical % 2,
        Mirroring::FourScreen => logical,
    };
    physical * table_size + offset % table_size
}

/// Folds `$3F00-$3FFF` onto the 32 palette bytes. The backdrop entries of the
/// sprite palettes (`$3F10/$14/$18/$1C`) are the background ones.
fn palette_index(addr: u16) -> usize {
    let index = ((addr - ppu_mem::PALETTE_BASE) % ppu_mem::PALETTE_STRIDE) as usize;
    if index >= 0x10 && index % 4 == 0 {
        index - 0x10
    } else {
        index
    }
}

impl Backing for HardwareState {
    fn read_byte(&self, cell: ByteCell) -> u8 {
        match cell {
            ByteCell::Cpu(reg) => self.cpu.get(reg),
            ByteCell::CpuMem(addr) => self.read_cpu(addr),
            ByteCell::PpuMem(addr) => self.read_ppu(addr),
            ByteCell::Oam(index) => self.oam[index as usize],
            ByteCell::ScrollX => self.ppu.scroll_x,
            ByteCell::ScrollY => self.ppu.scroll_y,
            ByteCell::OamAddr => self.ppu.oam_addr,
            ByteCell::ReadBuffer => self.ppu.read_buffer,
        }
    }

    fn write_byte(&mut self, cell: ByteCell, value: u8) {
        match cell {
            ByteCell::Cpu(reg) => *self.cpu.slot(reg) = value,
            ByteCell::CpuMem(addr) => self.write_cpu(addr, value),
            ByteCell::PpuMem(addr) => self.write_ppu(addr, value),
            ByteCell::Oam(index) => self.oam[index as usize] = value,
            ByteCell::ScrollX => self.ppu.scroll_x = value,
            ByteCell::ScrollY => self.ppu.scroll_y = value,
            ByteCell::OamAddr => self.ppu.oam_addr = value,
            ByteCell::ReadBuffer => self.ppu.read_buffer = value,
        }
    }

    fn read_word(&self, cell: WordCell) -> u16 {
        match cell {
            WordCell::ProgramCounter => self.cpu.program_counter,
            WordCell::Cycle => self.ppu.cycle,
            WordCell::Scanline => self.ppu.scanline,
            WordCell::NametableBase => self.ppu.nametable_base,
            WordCell::BgPatternBase => self.ppu.bg_pattern_base,
            WordCell::VramAddr => self.ppu.vram_addr,
        }
    }

    fn write_word(&mut self, cell: WordCell, value: u16) {
        match cell {
            WordCell::ProgramCounter => self.cpu.program_counter = value,
            WordCell::Cycle => self.ppu.cycle = value,
            WordCell::Scanline => self.ppu.scanline = value,
            WordCell::NametableBase => self.ppu.nametable_base = value,
            WordCell::BgPatternBase => self.ppu.bg_pattern_base = value,
            WordCell::VramAddr => self.ppu.vram_addr = value,
        }
    }

    fn read_flag(&self, cell: FlagCell) -> bool {
        match cell {
            FlagCell::VBlank => self.ppu.vblank,
            FlagCell::NmiEnable => self.ppu.nmi_enable,
            FlagCell::WriteToggle => self.ppu.write_toggle,
        }
    }

    fn write_flag(&mut self, cell: FlagCell, value: bool) {
        match cell {
            FlagCell::VBlank => self.ppu.vblank = value,
            FlagCell::NmiEnable => self.ppu.nmi_enable = value,
            FlagCell::WriteToggle => self.ppu.write_toggle = value,
        }
    }

    fn read_frame(&self) -> u64 {
        self.ppu.frame
    }

    fn write_frame(&mut self, value: u64) {
        self.ppu.frame = value;
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
