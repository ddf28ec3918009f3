//! Load/store access to the hardware state.
//!
//! Hardware units never touch storage directly. They are written against
//! [`Bus`], whose two operations are `load(addr)` and `store(addr, value)`,
//! with the value type fixed by the address (see [`crate::address`]). Any
//! storage that implements the low-level [`Backing`] hooks gets `Bus` for
//! free, so the live [`crate::state::HardwareState`] and the in-memory
//! [`FixtureBus`] are interchangeable under every engine.

use crate::{
    address::{Address, ByteCell, Coord, FlagCell, WordCell},
    cpu::Interrupt,
    ppu::palette::Color,
};

pub mod cpu;
mod fixture;

pub use fixture::FixtureBus;

/// Storage hooks a backing provides for each cell domain.
///
/// Every hook reads or writes exactly the one cell it names. Engines go
/// through [`Bus::load`] / [`Bus::store`] instead of calling these.
pub trait Backing {
    fn read_byte(&self, cell: ByteCell) -> u8;

    fn write_byte(&mut self, cell: ByteCell, value: u8);

    fn read_word(&self, cell: WordCell) -> u16;

    fn write_word(&mut self, cell: WordCell, value: u16);

    fn read_flag(&self, cell: FlagCell) -> bool;

    fn write_flag(&mut self, cell: FlagCell, value: bool);

    fn read_frame(&self) -> u64;

    fn write_frame(&mut self, value: u64);

    fn read_pixel(&self, at: Coord) -> Color;

    fn write_pixel(&mut self, at: Coord, color: Color);

    fn read_interrupt(&self) -> Option<Interrupt>;

    fn write_interrupt(&mut self, value: Option<Interrupt>);
}

/// Typed load/store effect over a backing.
pub trait Bus: Backing {
    #[inline]
    fn load<A: Address>(&self, addr: A) -> A::Value {
        addr.load(self)
    }

    #[inline]
    fn store<A: Address>(&mut self, addr: A, value: A::Value) {
        addr.store(self, value);
    }
}

impl<B: Backing + ?Sized> Bus for B {}
