use std::path::Path;

use tracing::debug;

use crate::{
    address::{Coord, Frame, Pixel},
    bus::Bus,
    cartridge::Cartridge,
    config::{Interleave, SessionConfig},
    cpu::{Cpu, IdleCpu},
    error::Error,
    ppu::{DOTS_PER_FRAME, palette::Color},
    state::HardwareState,
};

pub mod address;
pub mod bus;
pub mod cartridge;
pub mod config;
pub mod cpu;
pub mod error;
pub mod mem_block;
pub mod memory;
pub mod ppu;
pub mod state;
pub mod trace;

/// One emulation session: the hardware state and the CPU engine that share
/// it, stepped together on a single thread.
///
/// The session owns the state outright and lends it to each engine by
/// mutable reference for the duration of one step.
#[derive(Debug, Clone)]
pub struct Session<C: Cpu = IdleCpu> {
    state: HardwareState,
    cpu: C,
    config: SessionConfig,
    /// PPU dots the last CPU instruction has paid for but the PPU has not
    /// run yet.
    owed_dots: u64,
}

impl Session<IdleCpu> {
    /// Starts a session on a cartridge image with the stand-in CPU.
    pub fn from_rom(bytes: &[u8], config: SessionConfig) -> Result<Self, Error> {
        Ok(Self::new(HardwareState::from_rom(bytes)?, IdleCpu::new(), config))
    }

    /// Reads a cartridge image from disk and starts a session on it.
    pub fn from_file<P: AsRef<Path>>(path: P, config: SessionConfig) -> Result<Self, Error> {
        let cartridge = Cartridge::from_file(path)?;
        Ok(Self::new(HardwareState::new(cartridge), IdleCpu::new(), config))
    }
}

impl<C: Cpu> Session<C> {
    pub fn new(state: HardwareState, cpu: C, config: SessionConfig) -> Self {
        Self {
            state,
            cpu,
            config,
            owed_dots: 0,
        }
    }

    /// Advances the PPU by one dot.
    ///
    /// With [`Interleave::Instruction`] the CPU runs its next instruction
    /// first whenever the dots it paid for are used up. With
    /// [`Interleave::Frame`] only the PPU moves; the CPU runs in
    /// [`step_frame`](Self::step_frame).
    pub fn step(&mut self) -> Result<(), Error> {
        if self.config.interleave == Interleave::Instruction && self.owed_dots == 0 {
            let cycles = self.cpu.step(&mut self.state)?.max(1);
            self.owed_dots = cycles as u64 * self.config.dot_ratio() as u64;
        }

        ppu::step(&mut self.state)?;
        self.owed_dots = self.owed_dots.saturating_sub(1);
        Ok(())
    }

    /// Runs exactly one frame's worth of PPU dots (341 x 262).
    ///
    /// From the reset position this draws every pixel once and crosses each
    /// vertical-blank edge once.
    pub fn step_frame(&mut self) -> Result<(), Error> {
        match self.config.interleave {
            Interleave::Instruction => {
                for _ in 0..DOTS_PER_FRAME {
                    self.step()?;
                }
            }
            Interleave::Frame => {
                let budget = self.config.cpu_cycles_per_frame() as u64;
                let mut spent = 0;
                while spent < budget {
                    spent += self.cpu.step(&mut self.state)?.max(1) as u64;
                }
                for _ in 0..DOTS_PER_FRAME {
                    ppu::step(&mut self.state)?;
                }
            }
        }

        debug!(frame = self.state.load(Frame), "frame stepped");
        Ok(())
    }

    /// Copies the screen out, row-major, 256 x 240.
    pub fn frame(&self) -> Vec<Color> {
        Coord::all().map(|at| self.state.load(Pixel(at))).collect()
    }

    pub fn state(&self) -> &HardwareState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut HardwareState {
        &mut self.state
    }

    pub fn cpu(&self) -> &C {
        &self.cpu
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}
