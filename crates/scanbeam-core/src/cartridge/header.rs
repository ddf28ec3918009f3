//! iNES / NES 2.0 header decoding.
//!
//! The first 16 bytes of a `.nes` image describe the board: how much PRG and
//! CHR data follow, which mapper wires them up, how the nametables are
//! mirrored and whether a 512-byte trainer precedes the PRG data. NES 2.0
//! images reuse the same layout with wider size fields; both are decoded into
//! one [`Header`]. Pre-iNES ("archaic") headers are rejected.

use bitflags::bitflags;

use crate::error::Error;

const NES_MAGIC: &[u8; 4] = b"NES\x1A";

/// Size of the fixed iNES header in bytes.
pub const NES_HEADER_LEN: usize = 16;

/// PRG ROM size unit of the legacy size fields.
const PRG_ROM_UNIT: usize = 16 * 1024;
/// CHR ROM size unit of the legacy size fields.
const CHR_ROM_UNIT: usize = 8 * 1024;
/// PRG RAM size unit of iNES byte 8, and the size assumed when it is 0.
const PRG_RAM_UNIT: usize = 8 * 1024;
/// CHR RAM a board without CHR ROM is assumed to carry.
const DEFAULT_CHR_RAM: usize = 8 * 1024;

bitflags! {
    /// Header byte 6.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Flags6: u8 {
        const VERTICAL_MIRRORING = 0b0000_0001;
        const BATTERY            = 0b0000_0010;
        const TRAINER            = 0b0000_0100;
        const FOUR_SCREEN        = 0b0000_1000;
        const MAPPER_LOW         = 0b1111_0000;
    }
}

bitflags! {
    /// Header byte 7.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Flags7: u8 {
        const CONSOLE_TYPE = 0b0000_0011;
        const FORMAT       = 0b0000_1100;
        const MAPPER_MID   = 0b1111_0000;
    }
}

/// Nametable arrangement wired by the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mirroring {
    /// `$2000 = $2400`, `$2800 = $2C00`.
    #[default]
    Horizontal,
    /// `$2000 = $2800`, `$2400 = $2C00`.
    Vertical,
    /// Four distinct nametables; the board adds the extra 2 KiB.
    FourScreen,
}

/// Header flavour, from bits 2-3 of byte 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RomFormat {
    INes,
    Nes20,
    /// Prototype-era headers whose upper bytes are garbage.
    Archaic,
}

impl RomFormat {
    fn detect(flags7: Flags7) -> Self {
        match (flags7 & Flags7::FORMAT).bits() >> 2 {
            0b00 => Self::INes,
            0b10 => Self::Nes20,
            _ => Self::Archaic,
        }
    }
}

/// Decoded cartridge header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Header {
    pub format: RomFormat,
    /// Mapper number (0 = NROM, 2 = UxROM, 3 = CNROM, ...).
    pub mapper: u16,
    /// NES 2.0 submapper; 0 for iNES images.
    pub submapper: u8,
    pub mirroring: Mirroring,
    pub battery: bool,
    /// A 512-byte trainer sits between the header and PRG ROM.
    pub trainer_present: bool,
    pub prg_rom_size: usize,
    pub chr_rom_size: usize,
    /// Cartridge PRG RAM at `$6000-$7FFF`, volatile and battery-backed combined.
    pub prg_ram_size: usize,
    /// CHR RAM in place of (or beside) CHR ROM.
    pub chr_ram_size: usize,
}

impl Header {
    /// Parses the first [`NES_HEADER_LEN`] bytes of `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<Self, Error> {
        let bytes: &[u8; NES_HEADER_LEN] = bytes
            .get(..NES_HEADER_LEN)
            .and_then(|head| head.try_into().ok())
            .ok_or(Error::TooShort {
                actual: bytes.len(),
            })?;

        if &bytes[..4] != NES_MAGIC {
            return Err(Error::InvalidMagic);
        }

        let flags6 = Flags6::from_bits_truncate(bytes[6]);
        let flags7 = Flags7::from_bits_truncate(bytes[7]);

        match RomFormat::detect(flags7) {
            RomFormat::INes => Ok(Self::ines(bytes, flags6, flags7)),
            RomFormat::Nes20 => Ok(Self::nes20(bytes, flags6, flags7)),
            format @ RomFormat::Archaic => Err(Error::UnsupportedFormat(format)),
        }
    }

    fn ines(bytes: &[u8; NES_HEADER_LEN], flags6: Flags6, flags7: Flags7) -> Self {
        let chr_rom_size = bytes[5] as usize * CHR_ROM_UNIT;
        Self {
            format: RomFormat::INes,
            mapper: mapper_number(flags6, flags7, 0),
            submapper: 0,
            mirroring: mirroring(flags6),
            battery: flags6.contains(Flags6::BATTERY),
            trainer_present: flags6.contains(Flags6::TRAINER),
            prg_rom_size: bytes[4] as usize * PRG_ROM_UNIT,
            chr_rom_size,
            prg_ram_size: bytes[8].max(1) as usize * PRG_RAM_UNIT,
            chr_ram_size: if chr_rom_size == 0 { DEFAULT_CHR_RAM } else { 0 },
        }
    }

    fn nes20(bytes: &[u8; NES_HEADER_LEN], flags6: Flags6, flags7: Flags7) -> Self {
        let prg_rom_size = nes2_rom_size(bytes[4], bytes[9] & 0x0F, PRG_ROM_UNIT);
        let chr_rom_size = nes2_rom_size(bytes[5], bytes[9] >> 4, CHR_ROM_UNIT);
        let prg_ram_size = nes2_ram_size(bytes[10] & 0x0F) + nes2_ram_size(bytes[10] >> 4);
        let chr_ram_size = nes2_ram_size(bytes[11] & 0x0F) + nes2_ram_size(bytes[11] >> 4);

        Self {
            format: RomFormat::Nes20,
            mapper: mapper_number(flags6, flags7, bytes[8] & 0x0F),
            submapper: bytes[8] >> 4,
            mirroring: mirroring(flags6),
            battery: flags6.contains(Flags6::BATTERY) || bytes[10] >> 4 != 0,
            trainer_present: flags6.contains(Flags6::TRAINER),
            prg_rom_size,
            chr_rom_size,
            prg_ram_size,
            chr_ram_size,
        }
    }
}

fn mirroring(flags6: Flags6) -> Mirroring {
    if flags6.contains(Flags6::FOUR_SCREEN) {
        Mirroring::FourScreen
    } else if flags6.contains(Flags6::VERTICAL_MIRRORING) {
        Mirroring::Vertical
    } else {
        Mirroring::Horizontal
    }
}

fn mapper_number(flags6: Flags6, flags7: Flags7, high_nibble: u8) -> u16 {
    let low = (flags6 & Flags6::MAPPER_LOW).bits() >> 4;
    let mid = (flags7 & Flags7::MAPPER_MID).bits();
    (high_nibble as u16) << 8 | (mid | low) as u16
}

/// NES 2.0 ROM size: a 12-bit unit count, or `2^E * (M*2+1)` bytes when the
/// high nibble is `$F`.
fn nes2_rom_size(lsb: u8, msb_nibble: u8, unit: usize) -> usize {
    if msb_nibble == 0x0F {
        let exponent = (lsb >> 2) as u32;
        let multiplier = (lsb & 0b11) as usize * 2 + 1;
        1usize
            .checked_shl(exponent)
            .map_or(usize::MAX, |base| base.saturating_mul(multiplier))
    } else {
        ((msb_nibble as usize) << 8 | lsb as usize).saturating_mul(unit)
    }
}

/// NES 2.0 RAM size: `64 << n` bytes, or none for `n == 0`.
fn nes2_ram_size(shift: u8) -> usize {
    match shift {
        0 => 0,
        n => 64 << n,
    }
}
