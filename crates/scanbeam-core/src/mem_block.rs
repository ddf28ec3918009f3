use core::ops::{Deref, DerefMut};

/// Fixed-size, heap-backed block of hardware cells.
///
/// The length is part of the type so a block can never be resized after
/// construction; the screen buffer relies on this to always hold exactly one
/// frame of pixels.
#[repr(transparent)]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemBlock<T, const N: usize>(Box<[T; N]>);

/// Convenience alias for a `MemBlock` of bytes.
pub type ByteBlock<const N: usize> = MemBlock<u8, N>;

pub mod cpu {
    use crate::memory::{cpu as cpu_mem, ppu as ppu_mem};

    pub type Ram = super::ByteBlock<{ cpu_mem::INTERNAL_RAM_SIZE }>;
    pub type PpuRegisters = super::ByteBlock<{ ppu_mem::REGISTER_COUNT }>;
    pub type IoRegisters = super::ByteBlock<{ cpu_mem::IO_REGISTER_SIZE }>;
    pub type AddressSpace = super::ByteBlock<{ cpu_mem::ADDRESS_SPACE_SIZE }>;
}

pub mod ppu {
    use crate::{
        memory::ppu as ppu_mem,
        ppu::{SCREEN_PIXELS, palette::Color},
    };

    pub type NametableRam = super::ByteBlock<{ ppu_mem::NAMETABLE_RAM_SIZE }>;
    pub type PaletteRam = super::ByteBlock<{ ppu_mem::PALETTE_RAM_SIZE }>;
    pub type OamRam = super::ByteBlock<{ ppu_mem::OAM_RAM_SIZE }>;
    pub type AddressSpace = super::ByteBlock<{ ppu_mem::ADDRESS_SPACE_SIZE }>;
    pub type Screen = super::MemBlock<Color, SCREEN_PIXELS>;
}

impl<T, const N: usize> MemBlock<T, N> {
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &*self.0
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut *self.0
    }
}

impl<T: Copy + Default, const N: usize> MemBlock<T, N> {
    pub fn new() -> Self {
        Self::filled(T::default())
    }
}

impl<T: Copy, const N: usize> MemBlock<T, N> {
    /// Create a `MemBlock` where every element is initialized to `value`.
    ///
    /// The cells are allocated directly on the heap; large blocks such as the
    /// 64 KiB fixture address space never pass through the stack.
    pub fn filled(value: T) -> Self {
        let boxed: Box<[T]> = vec![value; N].into_boxed_slice();
        match boxed.try_into() {
            Ok(block) => Self(block),
            Err(_) => unreachable!("vec![_; N] always has length N"),
        }
    }
}

impl<T: Copy + Default, const N: usize> Default for MemBlock<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> Deref for MemBlock<T, N> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T, const N: usize> DerefMut for MemBlock<T, N> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}
