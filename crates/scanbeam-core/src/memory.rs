//! Console memory map constants.

/// CPU-side map.
pub mod cpu {
    pub const RESET_VECTOR_LO: u16 = 0xFFFC;
    pub const RESET_VECTOR_HI: u16 = 0xFFFD;

    /// 2 KiB of console RAM, repeated four times up to `$1FFF`.
    pub const INTERNAL_RAM_SIZE: usize = 0x0800;
    pub const INTERNAL_RAM_MIRROR_END: u16 = 0x1FFF;
    pub const INTERNAL_RAM_MASK: u16 = (INTERNAL_RAM_SIZE as u16) - 1;

    /// The eight PPU registers, repeated every 8 bytes.
    pub const PPU_REGISTER_BASE: u16 = 0x2000;
    pub const PPU_REGISTER_END: u16 = 0x3FFF;

    /// APU, controller and test-mode ports. Held as plain cells here.
    pub const IO_REGISTER_BASE: u16 = 0x4000;
    pub const IO_REGISTER_END: u16 = 0x401F;
    pub const IO_REGISTER_SIZE: usize = (IO_REGISTER_END - IO_REGISTER_BASE + 1) as usize;

    pub const PRG_RAM_START: u16 = 0x6000;
    pub const PRG_RAM_END: u16 = 0x7FFF;
    pub const PRG_ROM_START: u16 = 0x8000;
    pub const CPU_ADDR_END: u16 = 0xFFFF;
    pub const ADDRESS_SPACE_SIZE: usize = CPU_ADDR_END as usize + 1;
}

/// PPU-side map and the CPU window onto it.
pub mod ppu {
    /// `$2000-$3FFF` decodes on the low three bits only.
    pub const REGISTER_SELECT_MASK: u16 = 0x0007;
    pub const REGISTER_COUNT: usize = 8;

    /// PPU addresses are 14 bits wide.
    pub const VRAM_MIRROR_MASK: u16 = 0x3FFF;
    pub const ADDRESS_SPACE_SIZE: usize = VRAM_MIRROR_MASK as usize + 1;

    /// Pattern tables live on the cartridge (CHR ROM or CHR RAM).
    pub const PATTERN_TABLE_0: u16 = 0x0000;
    pub const PATTERN_TABLE_1: u16 = 0x1000;
    pub const PATTERN_TABLE_END: u16 = 0x1FFF;
    /// Low plane (8 bytes) followed by high plane (8 bytes).
    pub const TILE_BYTES: u16 = 16;

    pub const NAMETABLE_BASE: u16 = 0x2000;
    /// 960 tile bytes plus the 64-byte attribute table.
    pub const NAMETABLE_SIZE: u16 = 0x0400;
    pub const ATTRIBUTE_OFFSET: u16 = 0x03C0;
    /// `$3000-$3EFF` repeats `$2000-$2EFF`.
    pub const NAMETABLE_MIRROR_BASE: u16 = 0x3000;
    /// Room for four logical tables. Only two are reachable unless the board
    /// wires four-screen VRAM.
    pub const NAMETABLE_RAM_SIZE: usize = 4 * NAMETABLE_SIZE as usize;

    /// 32 bytes at `$3F00`, repeated up to `$3FFF`.
    pub const PALETTE_BASE: u16 = 0x3F00;
    pub const PALETTE_RAM_SIZE: usize = 0x20;
    pub const PALETTE_STRIDE: u16 = 0x20;

    pub const OAM_RAM_SIZE: usize = 0x100;
    /// CPU port that copies a RAM page into OAM.
    pub const OAM_DMA: u16 = 0x4014;

    /// The eight registers at `$2000-$2007`.
    #[repr(u16)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Register {
        /// `$2000` - PPUCTRL
        Control = 0x2000,
        /// `$2001` - PPUMASK
        Mask = 0x2001,
        /// `$2002` - PPUSTATUS
        Status = 0x2002,
        /// `$2003` - OAMADDR
        OamAddr = 0x2003,
        /// `$2004` - OAMDATA
        OamData = 0x2004,
        /// `$2005` - PPUSCROLL
        Scroll = 0x2005,
        /// `$2006` - PPUADDR
        Addr = 0x2006,
        /// `$2007` - PPUDATA
        Data = 0x2007,
    }

    impl Register {
        pub const fn addr(self) -> u16 {
            self as u16
        }

        /// Decodes any address in the `$2000-$3FFF` window.
        pub const fn from_cpu_addr(addr: u16) -> Self {
            match addr & REGISTER_SELECT_MASK {
                0 => Self::Control,
                1 => Self::Mask,
                2 => Self::Status,
                3 => Self::OamAddr,
                4 => Self::OamData,
                5 => Self::Scroll,
                6 => Self::Addr,
                _ => Self::Data,
            }
        }
    }
}
