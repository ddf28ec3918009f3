use bitflags::bitflags;

bitflags! {
    /// `$2002` as read by the CPU.
    ///
    /// Only vertical blank is modelled; sprite zero hit and sprite overflow
    /// (bits 6 and 5) always read back clear.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub(crate) struct Status: u8 {
        const VERTICAL_BLANK = 0b1000_0000;
    }
}

impl Status {
    pub(crate) fn from_vblank(vblank: bool) -> Self {
        if vblank { Status::VERTICAL_BLANK } else { Status::empty() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_bit_seven_reports_vblank() {
        assert_eq!(Status::from_vblank(true).bits(), 0x80);
        assert_eq!(Status::from_vblank(false).bits(), 0x00);
    }
}
