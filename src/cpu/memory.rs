//! Byte-addressable memory banks.
//!
//! The trainer's address space is built from two banks: a 64 KB RAM
//! bank and the 1 KB monitor ROM mapped over its top. Both share one
//! type; a ROM bank simply refuses writes.

use serde::{Deserialize, Serialize};

/// Size of the trainer's full address space.
pub const ADDRESS_SPACE: usize = 0x10000;

/// A flat bank of byte cells, writable (RAM) or read-only (ROM).
#[derive(Clone, Serialize, Deserialize)]
pub struct Memory {
    cells: Vec<u8>,
    read_only: bool,
}

impl Memory {
    /// Create a zero-filled RAM bank.
    pub fn ram(size: usize) -> Self {
        Self {
            cells: vec![0; size],
            read_only: false,
        }
    }

    /// Create a ROM bank holding a copy of `image`.
    pub fn rom(image: &[u8]) -> Self {
        Self {
            cells: image.to_vec(),
            read_only: true,
        }
    }

    /// Number of cells in the bank.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Read the byte at a bank-relative address.
    ///
    /// Addresses past the end of the bank read as 0 (open bus); a ROM
    /// image shorter than its mapped window behaves as if zero-filled.
    #[inline]
    pub fn read_byte(&self, address: u16) -> u8 {
        self.cells.get(address as usize).copied().unwrap_or(0)
    }

    /// Write a byte at a bank-relative address.
    ///
    /// Writes into a ROM bank are discarded with a warning.
    #[inline]
    pub fn write_byte(&mut self, address: u16, byte: u8) {
        if self.read_only {
            log::warn!("discarded write of {byte:#04X} to ROM address {address:#06X}");
            return;
        }
        if let Some(cell) = self.cells.get_mut(address as usize) {
            *cell = byte;
        }
    }

    /// Zero-fill the bank. A ROM bank keeps its image.
    pub fn clear(&mut self) {
        if self.read_only {
            log::warn!("discarded attempt to clear ROM");
            return;
        }
        self.cells.fill(0);
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let non_zero = self.cells.iter().filter(|&&cell| cell != 0).count();
        f.debug_struct("Memory")
            .field("len", &self.cells.len())
            .field("read_only", &self.read_only)
            .field("non_zero_cells", &non_zero)
            .finish()
    }
}
