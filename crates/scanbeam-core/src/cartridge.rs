use std::{fs, path::Path};

use tracing::info;

use crate::{
    cartridge::header::{Header, Mirroring, NES_HEADER_LEN},
    error::Error,
    memory::cpu as cpu_mem,
};

use self::mapper::{Mapper0, Mapper2, Mapper3};

pub mod header;
pub mod mapper;
pub use mapper::Mapper;

pub const TRAINER_SIZE: usize = 512;

pub type PrgRom = Box<[u8]>;
pub type ChrRom = Box<[u8]>;
pub type TrainerBytes = Option<Box<[u8; TRAINER_SIZE]>>;

/// A parsed cartridge image: header plus the board that serves its memory.
#[derive(Debug)]
pub struct Cartridge {
    header: Header,
    mapper: Box<dyn Mapper>,
}

impl Clone for Cartridge {
    fn clone(&self) -> Self {
        Self {
            header: self.header,
            mapper: dyn_clone::clone_box(&*self.mapper),
        }
    }
}

impl Cartridge {
    /// Parses an iNES / NES 2.0 image. Every size and format check happens
    /// here, so a `Cartridge` that exists is always well-formed.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let header = Header::parse(bytes)?;
        let (trainer, prg_rom, chr_rom) = slice_sections(bytes, &header)?;

        let mapper: Box<dyn Mapper> = match header.mapper {
            0 => Box::new(Mapper0::new(&header, prg_rom, chr_rom, trainer)),
            2 => Box::new(Mapper2::new(&header, prg_rom, chr_rom, trainer)),
            3 => Box::new(Mapper3::new(&header, prg_rom, chr_rom, trainer)),
            other => return Err(Error::UnsupportedMapper(other)),
        };

        info!(
            mapper = header.mapper,
            prg_rom = header.prg_rom_size,
            chr_rom = header.chr_rom_size,
            chr_ram = header.chr_ram_size,
            mirroring = ?header.mirroring,
            "cartridge loaded"
        );

        Ok(Self { header, mapper })
    }

    /// Reads and parses an image from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn mapper(&self) -> &dyn Mapper {
        &*self.mapper
    }

    pub fn cpu_read(&self, addr: u16) -> Option<u8> {
        self.mapper.cpu_read(addr)
    }

    pub fn cpu_write(&mut self, addr: u16, value: u8) {
        self.mapper.cpu_write(addr, value);
    }

    pub fn ppu_read(&self, addr: u16) -> u8 {
        self.mapper.ppu_read(addr)
    }

    pub fn ppu_write(&mut self, addr: u16, value: u8) {
        self.mapper.ppu_write(addr, value);
    }

    pub fn mirroring(&self) -> Mirroring {
        self.mapper.mirroring()
    }

    /// Little-endian word at `$FFFC`, where the CPU starts after reset.
    pub fn reset_vector(&self) -> u16 {
        let lo = self.cpu_read(cpu_mem::RESET_VECTOR_LO).unwrap_or(0);
        let hi = self.cpu_read(cpu_mem::RESET_VECTOR_HI).unwrap_or(0);
        u16::from_le_bytes([lo, hi])
    }
}

fn slice_sections(
    bytes: &[u8],
    header: &Header,
) -> Result<(TrainerBytes, PrgRom, ChrRom), Error> {
    let mut rest = &bytes[NES_HEADER_LEN..];

    let trainer = if header.trainer_present {
        let section = take(&mut rest, TRAINER_SIZE, "trainer")?;
        let mut block = Box::new([0; TRAINER_SIZE]);
        block.copy_from_slice(section);
        Some(block)
    } else {
        None
    };

    let prg_rom = take(&mut rest, header.prg_rom_size, "PRG ROM")?;
    let chr_rom = take(&mut rest, header.chr_rom_size, "CHR ROM")?;

    Ok((trainer, prg_rom.into(), chr_rom.into()))
}

/// Splits `len` bytes off the front of `rest`.
fn take<'a>(rest: &mut &'a [u8], len: usize, section: &'static str) -> Result<&'a [u8], Error> {
    if rest.len() < len {
        return Err(Error::SectionTooShort {
            section,
            expected: len,
            actual: rest.len(),
        });
    }
    let (head, tail) = rest.split_at(len);
    *rest = tail;
    Ok(head)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(prg_banks: u8, chr_banks: u8, flags6: u8) -> Vec<u8> {
        let mut out = b"NES\x1A".to_vec();
        out.extend([prg_banks, chr_banks, flags6]);
        out.resize(NES_HEADER_LEN, 0);
        out
    }

    #[test]
    fn loads_nrom() {
        let mut rom = header(1, 1, 0b0000_0001);
        rom.extend(vec![0xAA; 16 * 1024]);
        rom.extend(vec![0x55; 8 * 1024]);

        let cart = Cartridge::from_bytes(&rom).expect("parse cartridge");
        assert_eq!(cart.mapper().id(), 0);
        assert_eq!(cart.mirroring(), Mirroring::Vertical);
        assert_eq!(cart.cpu_read(cpu_mem::PRG_ROM_START), Some(0xAA));
        assert_eq!(cart.ppu_read(0x0000), 0x55);
        assert_eq!(cart.reset_vector(), 0xAAAA);
    }

    #[test]
    fn trainer_is_skipped_and_preloaded() {
        let mut rom = header(1, 0, 0b0000_0100);
        rom.extend(vec![0xFE; TRAINER_SIZE]);
        rom.extend(vec![0xAA; 16 * 1024]);

        let cart = Cartridge::from_bytes(&rom).expect("parse cartridge");
        assert!(cart.header().trainer_present);
        assert_eq!(cart.cpu_read(cpu_mem::PRG_ROM_START), Some(0xAA));
        assert_eq!(cart.cpu_read(0x7000), Some(0xFE));
    }

    #[test]
    fn short_prg_is_rejected() {
        let mut rom = header(1, 0, 0);
        rom.extend(vec![0xAA; 1024]);

        let err = Cartridge::from_bytes(&rom).expect_err("should fail");
        assert!(matches!(
            err,
            Error::SectionTooShort {
                section: "PRG ROM",
                expected: 16384,
                actual: 1024,
            }
        ));
    }

    #[test]
    fn unknown_boards_are_rejected() {
        // Mapper 4 (MMC3).
        let mut rom = header(1, 1, 0b0100_0000);
        rom.extend(vec![0; 24 * 1024]);
        assert!(matches!(
            Cartridge::from_bytes(&rom),
            Err(Error::UnsupportedMapper(4))
        ));
    }
}
