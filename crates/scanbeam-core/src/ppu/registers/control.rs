use bitflags::bitflags;

use crate::memory::ppu as ppu_mem;

bitflags! {
    /// `$2000` as written by the CPU.
    ///
    /// ```text
    /// 7 6 5 4 3 2 1 0
    /// N . . B . I n n
    /// ```
    ///
    /// Only the bits the background engine and the data port consume are
    /// named. Sprite table, sprite size and master/slave select (bits 3, 5
    /// and 6) are latched in the CPU-space cell and otherwise ignored.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub(crate) struct Control: u8 {
        /// Base nametable, `$2000 + n * $400`.
        const NAMETABLE = 0b0000_0011;
        /// `$2007` steps the VRAM address by 32 instead of 1.
        const INCREMENT_32 = 0b0000_0100;
        /// Background tiles come from `$1000` instead of `$0000`.
        const BACKGROUND_TABLE = 0b0001_0000;
        /// Latch an NMI when vertical blank begins.
        const GENERATE_NMI = 0b1000_0000;
    }
}

impl Control {
    pub(crate) fn base_nametable_addr(self) -> u16 {
        let select = (self & Control::NAMETABLE).bits() as u16;
        ppu_mem::NAMETABLE_BASE + select * ppu_mem::NAMETABLE_SIZE
    }

    pub(crate) fn vram_increment(self) -> u16 {
        if self.contains(Control::INCREMENT_32) { 32 } else { 1 }
    }

    pub(crate) fn background_pattern_table(self) -> u16 {
        if self.contains(Control::BACKGROUND_TABLE) {
            ppu_mem::PATTERN_TABLE_1
        } else {
            ppu_mem::PATTERN_TABLE_0
        }
    }

    pub(crate) fn nmi_enabled(self) -> bool {
        self.contains(Control::GENERATE_NMI)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_engine_fields() {
        let control = Control::from_bits_retain(0b1001_0110);
        assert!(control.nmi_enabled());
        assert_eq!(control.vram_increment(), 32);
        assert_eq!(control.base_nametable_addr(), 0x2800);
        assert_eq!(control.background_pattern_table(), ppu_mem::PATTERN_TABLE_1);
    }

    #[test]
    fn unnamed_bits_do_not_leak_into_fields() {
        let control = Control::from_bits_retain(0b0110_1000);
        assert!(!control.nmi_enabled());
        assert_eq!(control.vram_increment(), 1);
        assert_eq!(control.base_nametable_addr(), ppu_mem::NAMETABLE_BASE);
        assert_eq!(control.background_pattern_table(), ppu_mem::PATTERN_TABLE_0);
    }
}
