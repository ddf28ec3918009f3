//! Pattern-table memory on the cartridge.
//!
//! Discrete boards carry either CHR ROM from the image or a CHR RAM chip the
//! program fills through `$2007`. Both are addressed by a flat offset that
//! wraps at the storage size.

use crate::cartridge::header::Header;

#[derive(Debug, Clone)]
pub enum ChrStorage {
    /// Neither ROM nor RAM; reads float to 0.
    None,
    Rom(Box<[u8]>),
    Ram(Box<[u8]>),
}

impl ChrStorage {
    /// Picks CHR ROM when the image has any, CHR RAM of the advertised size
    /// otherwise.
    pub fn for_header(header: &Header, chr_rom: Box<[u8]>) -> Self {
        if !chr_rom.is_empty() {
            Self::Rom(chr_rom)
        } else if header.chr_ram_size > 0 {
            Self::Ram(vec![0; header.chr_ram_size].into_boxed_slice())
        } else {
            Self::None
        }
    }

    fn bytes(&self) -> &[u8] {
        match self {
            Self::Rom(bytes) | Self::Ram(bytes) => bytes,
            Self::None => &[],
        }
    }

    /// Reads the byte at `offset`, wrapping at the storage size.
    pub fn read(&self, offset: usize) -> u8 {
        let bytes = self.bytes();
        if bytes.is_empty() {
            0
        } else {
            bytes[offset % bytes.len()]
        }
    }

    /// Writes reach CHR RAM only.
    pub fn write(&mut self, offset: usize, value: u8) {
        if let Self::Ram(ram) = self
            && !ram.is_empty()
        {
            let len = ram.len();
            ram[offset % len] = value;
        }
    }

    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rom_ignores_writes_and_ram_keeps_them() {
        let mut rom = ChrStorage::Rom(vec![0x11; 0x2000].into_boxed_slice());
        rom.write(0, 0x99);
        assert_eq!(rom.read(0), 0x11);

        let mut ram = ChrStorage::Ram(vec![0; 0x2000].into_boxed_slice());
        ram.write(0x10, 0x99);
        assert_eq!(ram.read(0x10), 0x99);
        assert_eq!(ram.read(0x2010), 0x99);
    }

    #[test]
    fn missing_chr_reads_zero() {
        let mut none = ChrStorage::None;
        none.write(0, 1);
        assert_eq!(none.read(0), 0);
        assert!(none.is_empty());
    }
}
