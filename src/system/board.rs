//! Address routing for the trainer board.
//!
//! The board is the [`Bus`] the CPU core runs against. It owns the RAM
//! bank, the monitor ROM bank mapped at the top of memory, and the LED
//! display, and applies the trainer's memory-mapped side effects on
//! every write.

use crate::cpu::memory::{Memory, ADDRESS_SPACE};
use crate::cpu::Bus;
use crate::system::display::Display;
use crate::system::monitor::{MONITOR_BASE, MONITOR_ROM};
use serde::{Deserialize, Serialize};

/// First address of the LED control window. Each address in the
/// window controls a single segment: the window offset's high nibble
/// selects the digit (rightmost digit first), the low three address
/// bits the segment, and bit 0 of the data byte its new state.
pub const LED_WINDOW_START: u16 = 0xC110;

/// Last address of the LED control window.
pub const LED_WINDOW_END: u16 = 0xC16F;

/// The trainer's memory system and display.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Board {
    ram: Memory,
    rom: Memory,
    pub display: Display,
}

impl Board {
    /// A board with blank RAM and no monitor installed; the ROM
    /// window reads as open bus until [`install_monitor`] runs.
    ///
    /// [`install_monitor`]: Board::install_monitor
    pub fn new() -> Self {
        Self {
            ram: Memory::ram(ADDRESS_SPACE),
            rom: Memory::rom(&[]),
            display: Display::new(),
        }
    }

    /// Map the embedded monitor image at [`MONITOR_BASE`].
    pub fn install_monitor(&mut self) {
        self.rom = Memory::rom(&MONITOR_ROM);
    }

    /// Unmap the monitor; its window reads as open bus again.
    pub fn remove_monitor(&mut self) {
        self.rom = Memory::rom(&[]);
    }

    pub fn clear_ram(&mut self) {
        self.ram.clear();
    }

    /// Store a byte directly into RAM, bypassing the memory-mapped
    /// side effects; the hex loader uses this path. Bytes aimed at
    /// the ROM window are discarded with a warning.
    pub fn load_byte(&mut self, address: u16, byte: u8) {
        if address >= MONITOR_BASE {
            log::warn!("hex load into ROM window at {address:#06X} discarded");
            return;
        }
        self.ram.write_byte(address, byte);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for Board {
    fn read_byte(&self, address: u16) -> u8 {
        if address >= MONITOR_BASE {
            self.rom.read_byte(address - MONITOR_BASE)
        } else {
            self.ram.read_byte(address)
        }
    }

    fn write_byte(&mut self, address: u16, byte: u8) {
        if (LED_WINDOW_START..=LED_WINDOW_END).contains(&address) {
            let digit = 5 - usize::from((address - LED_WINDOW_START) >> 4);
            self.display
                .set_segment(digit, (address & 0x07) as u8, byte & 1 != 0);
        }
        if address < 0x00D0 {
            log::trace!("write {address:#06X}: {byte:#04X}");
        }
        if address >= MONITOR_BASE {
            self.rom.write_byte(address - MONITOR_BASE, byte);
        } else {
            self.ram.write_byte(address, byte);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::display::{SEG_A, SEG_DP, SEG_G};

    #[test]
    fn test_led_window_maps_digits_and_segments() {
        let mut board = Board::new();
        // Lowest window address: digit 5, segment g.
        board.write_byte(0xC110, 0x01);
        assert_eq!(board.display.leds()[5], SEG_G);
        // Highest window address: digit 0, decimal point.
        board.write_byte(0xC167, 0x01);
        assert_eq!(board.display.leds()[0], SEG_DP);
        // Segment a of digit 5.
        board.write_byte(0xC116, 0x01);
        assert_eq!(board.display.leds()[5], SEG_G | SEG_A);
        // Data bit 0 clear turns the segment back off.
        board.write_byte(0xC110, 0x00);
        assert_eq!(board.display.leds()[5], SEG_A);
    }

    #[test]
    fn test_led_writes_also_land_in_ram() {
        let mut board = Board::new();
        board.write_byte(0xC110, 0x01);
        assert_eq!(board.read_byte(0xC110), 0x01);
    }

    #[test]
    fn test_dirty_only_on_change() {
        let mut board = Board::new();
        board.write_byte(0xC110, 0x01);
        assert!(board.display.take_dirty());
        board.write_byte(0xC110, 0x01);
        assert!(!board.display.take_dirty());
    }

    #[test]
    fn test_monitor_window_reads_rom_and_discards_writes() {
        let mut board = Board::new();
        assert_eq!(board.read_byte(MONITOR_BASE), 0x00);
        board.install_monitor();
        assert_eq!(board.read_byte(MONITOR_BASE), MONITOR_ROM[0]);
        board.write_byte(MONITOR_BASE, 0x55);
        assert_eq!(board.read_byte(MONITOR_BASE), MONITOR_ROM[0]);
        // RAM just below the window stays writable.
        board.write_byte(MONITOR_BASE - 1, 0x55);
        assert_eq!(board.read_byte(MONITOR_BASE - 1), 0x55);
    }

    #[test]
    fn test_load_byte_bypasses_led_decode() {
        let mut board = Board::new();
        board.load_byte(0xC110, 0x01);
        assert_eq!(board.display.leds()[5], 0x00);
        assert_eq!(board.read_byte(0xC110), 0x01);
        board.load_byte(MONITOR_BASE, 0xAA);
        assert_eq!(board.read_byte(MONITOR_BASE), 0x00);
    }
}
