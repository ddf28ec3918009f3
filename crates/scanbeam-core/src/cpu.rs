//! CPU engine boundary.
//!
//! Instruction decoding and execution live outside this crate. The engine
//! plugs into the session through [`Cpu`], reads and writes the same hardware
//! state as the PPU, and is the only component that clears the interrupt
//! latch the PPU raises.

use tracing::debug;

use crate::{address::InterruptLatch, bus::Bus, error::Error};

/// CPU general registers. The program counter is addressed separately as
/// [`crate::address::ProgramCounter`] since it is 16 bits wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CpuReg {
    A,
    X,
    Y,
    /// Processor status (`P`).
    Status,
    /// Stack pointer (`S`).
    StackPointer,
}

/// Interrupt requests that can sit in the interrupt latch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interrupt {
    /// Non-maskable interrupt, raised by the PPU on vertical blank entry.
    Nmi,
}

/// One instruction-at-a-time CPU engine.
pub trait Cpu {
    /// Executes one instruction against `bus` and returns the CPU cycles it
    /// took. An engine that observes [`Interrupt::Nmi`] in the latch services
    /// it and clears the latch.
    fn step<M: Bus>(&mut self, bus: &mut M) -> Result<u32, Error>;
}

/// Engine stand-in that runs no program.
///
/// Every step burns one cycle. Pending NMIs are acknowledged so the latch
/// behaves as it does with a live engine attached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdleCpu {
    nmi_serviced: u64,
}

impl IdleCpu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of NMIs acknowledged so far.
    pub fn nmi_serviced(&self) -> u64 {
        self.nmi_serviced
    }
}

impl Cpu for IdleCpu {
    fn step<M: Bus>(&mut self, bus: &mut M) -> Result<u32, Error> {
        if bus.load(InterruptLatch) == Some(Interrupt::Nmi) {
            bus.store(InterruptLatch, None);
            self.nmi_serviced += 1;
            debug!(count = self.nmi_serviced, "idle cpu acknowledged nmi");
        }
        Ok(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::FixtureBus;

    #[test]
    fn idle_cpu_clears_pending_nmi() {
        let mut bus = FixtureBus::new();
        let mut cpu = IdleCpu::new();

        assert_eq!(cpu.step(&mut bus).expect("step"), 1);
        assert_eq!(cpu.nmi_serviced(), 0);

        bus.store(InterruptLatch, Some(Interrupt::Nmi));
        cpu.step(&mut bus).expect("step");
        assert_eq!(bus.load(InterruptLatch), None);
        assert_eq!(cpu.nmi_serviced(), 1);
    }
}
