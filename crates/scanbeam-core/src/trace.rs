//! CPU trace lines in the common reference-log layout.
//!
//! ```text
//! C000  4C F5 C5  A:00 X:00 Y:00 P:24 SP:FD PPU:  0, 21 CYC:7
//! ```
//!
//! A CPU engine captures one line before each instruction and the result is
//! compared field by field against a reference log. Reference logs usually
//! carry a disassembly column between the opcode bytes and `A:`; parsing
//! skips it. Nothing in the PPU or the session driver depends on this.

use core::{fmt, str::FromStr};

use crate::{
    address::{CpuMem, Cycle, ProgramCounter, Scanline},
    bus::Bus,
    cpu::CpuReg,
    error::Error,
};

/// Longest 6502 instruction encoding.
const MAX_OPCODE_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceLine {
    pub pc: u16,
    /// Instruction bytes, 1 to 3 of them.
    pub opcode: Vec<u8>,
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub p: u8,
    pub sp: u8,
    pub scanline: u16,
    pub cycle: u16,
    pub cpu_cycles: u64,
}

impl TraceLine {
    /// Records the machine state ahead of the instruction at the program
    /// counter. Opcode bytes are raw memory loads, so capturing never
    /// triggers register side effects.
    pub fn capture<M: Bus>(bus: &M, opcode_len: usize, cpu_cycles: u64) -> Self {
        let pc = bus.load(ProgramCounter);
        let opcode = (0..opcode_len.clamp(1, MAX_OPCODE_LEN) as u16)
            .map(|offset| bus.load(CpuMem(pc.wrapping_add(offset))))
            .collect();

        Self {
            pc,
            opcode,
            a: bus.load(CpuReg::A),
            x: bus.load(CpuReg::X),
            y: bus.load(CpuReg::Y),
            p: bus.load(CpuReg::Status),
            sp: bus.load(CpuReg::StackPointer),
            scanline: bus.load(Scanline),
            cycle: bus.load(Cycle),
            cpu_cycles,
        }
    }
}

impl fmt::Display for TraceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self
            .opcode
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(" ");
        write!(
            f,
            "{:04X}  {:<8}  A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} PPU:{:>3},{:>3} CYC:{}",
            self.pc,
            bytes,
            self.a,
            self.x,
            self.y,
            self.p,
            self.sp,
            self.scanline,
            self.cycle,
            self.cpu_cycles
        )
    }
}

impl FromStr for TraceLine {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fail = |reason| Error::Trace {
            line: line.to_owned(),
            reason,
        };

        let mut tokens = line.split_whitespace();
        let pc = tokens
            .next()
            .filter(|t| t.len() == 4)
            .and_then(|t| u16::from_str_radix(t, 16).ok())
            .ok_or_else(|| fail("program counter"))?;

        let opcode: Vec<u8> = tokens
            .map_while(|t| {
                (t.len() == 2)
                    .then(|| u8::from_str_radix(t, 16).ok())
                    .flatten()
            })
            .take(MAX_OPCODE_LEN)
            .collect();
        if opcode.is_empty() {
            return Err(fail("opcode bytes"));
        }

        let registers = line.find(" A:").ok_or_else(|| fail("register block"))?;
        let mut rest = &line[registers..];

        let a = hex_field(&mut rest, "A:").ok_or_else(|| fail("A"))?;
        let x = hex_field(&mut rest, "X:").ok_or_else(|| fail("X"))?;
        let y = hex_field(&mut rest, "Y:").ok_or_else(|| fail("Y"))?;
        let p = hex_field(&mut rest, "P:").ok_or_else(|| fail("P"))?;
        let sp = hex_field(&mut rest, "SP:").ok_or_else(|| fail("SP"))?;

        let ppu = rest
            .trim_start()
            .strip_prefix("PPU:")
            .ok_or_else(|| fail("PPU"))?;
        let (scanline, ppu) = ppu.split_once(',').ok_or_else(|| fail("PPU"))?;
        let scanline = scanline.trim().parse().map_err(|_| fail("PPU scanline"))?;
        let ppu = ppu.trim_start();
        let (cycle, rest) = ppu.split_once(' ').ok_or_else(|| fail("PPU cycle"))?;
        let cycle = cycle.parse().map_err(|_| fail("PPU cycle"))?;

        let cpu_cycles = rest
            .trim()
            .strip_prefix("CYC:")
            .and_then(|c| c.parse().ok())
            .ok_or_else(|| fail("CYC"))?;

        Ok(Self {
            pc,
            opcode,
            a,
            x,
            y,
            p,
            sp,
            scanline,
            cycle,
            cpu_cycles,
        })
    }
}

/// Consumes `key` followed by two hex digits from the front of `rest`.
fn hex_field(rest: &mut &str, key: &str) -> Option<u8> {
    let after = rest.trim_start().strip_prefix(key)?;
    let digits = after.get(..2)?;
    let value = u8::from_str_radix(digits, 16).ok()?;
    *rest = &after[2..];
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::FixtureBus;

    const REFERENCE: &str = "C000  4C F5 C5  A:00 X:00 Y:00 P:24 SP:FD PPU:  0, 21 CYC:7";

    #[test]
    fn renders_reference_layout() {
        let line = TraceLine {
            pc: 0xC000,
            opcode: vec![0x4C, 0xF5, 0xC5],
            a: 0,
            x: 0,
            y: 0,
            p: 0x24,
            sp: 0xFD,
            scanline: 0,
            cycle: 21,
            cpu_cycles: 7,
        };
        assert_eq!(line.to_string(), REFERENCE);
    }

    #[test]
    fn parses_its_own_output() {
        let line: TraceLine = REFERENCE.parse().expect("parses");
        assert_eq!(line.pc, 0xC000);
        assert_eq!(line.opcode, [0x4C, 0xF5, 0xC5]);
        assert_eq!(line.to_string(), REFERENCE);
    }

    #[test]
    fn skips_disassembly_column() {
        let reference = "C72A  A9 40     LDA #$40                        \
                         A:00 X:00 Y:00 P:27 SP:FB PPU: 30,121 CYC:3482";
        let line: TraceLine = reference.parse().expect("parses");
        assert_eq!(line.pc, 0xC72A);
        assert_eq!(line.opcode, [0xA9, 0x40]);
        assert_eq!(line.p, 0x27);
        assert_eq!(line.sp, 0xFB);
        assert_eq!(line.scanline, 30);
        assert_eq!(line.cycle, 121);
        assert_eq!(line.cpu_cycles, 3482);
    }

    #[test]
    fn reports_the_broken_field() {
        let err = "C000  4C F5 C5  A:00 X:00 Y:00 P:24 SP:FD CYC:7"
            .parse::<TraceLine>()
            .expect_err("missing PPU block");
        assert!(matches!(err, Error::Trace { reason: "PPU", .. }));
    }

    #[test]
    fn captures_from_the_bus() {
        let mut bus = FixtureBus::new().at_position(0, 21);
        bus.store(ProgramCounter, 0xC000);
        bus.store(CpuMem(0xC000), 0x4C);
        bus.store(CpuMem(0xC001), 0xF5);
        bus.store(CpuMem(0xC002), 0xC5);
        bus.store(CpuReg::Status, 0x24);
        bus.store(CpuReg::StackPointer, 0xFD);

        let line = TraceLine::capture(&bus, 3, 7);
        assert_eq!(line.to_string(), REFERENCE);
    }
}
