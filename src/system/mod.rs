//! The ET-3400 trainer system.
//!
//! [`Et3400`] owns the CPU core and the board and exposes the
//! operations the outside world has: power, reset, keypad, hex
//! loading, and the host-driven execution tick.

pub mod board;
pub mod display;
pub mod keypad;
pub mod monitor;

use crate::cpu::{Bus, CpuError, Microprocessor};
use board::Board;
use keypad::KEYPAD_BASE;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Malformed input handed to the hex loader.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("hex string has odd length {length}; trailing {trailing:?}")]
    OddLength { length: usize, trailing: String },

    #[error("invalid hex byte {substring:?} at offset {offset}")]
    InvalidByte { substring: String, offset: usize },
}

/// What one execution slice did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceReport {
    /// Emulated cycles executed (0 when halted or powered off).
    pub cycles: u32,
    /// Whether any LED segment changed during the slice; the host
    /// should re-render the display.
    pub display_changed: bool,
}

/// Serializable snapshot of the externally visible machine state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemState {
    pub powered: bool,
    pub accumulator_a: u8,
    pub accumulator_b: u8,
    pub index_register: u16,
    pub stack_pointer: u16,
    pub program_counter: u16,
    pub condition_codes: u8,
    pub display_leds: [u8; display::DIGITS],
}

/// The trainer: CPU, board, and power switch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Et3400 {
    pub mpu: Microprocessor,
    pub board: Board,
    powered: bool,
}

impl Et3400 {
    /// A powered-off trainer with blank memory.
    pub fn new() -> Self {
        Self {
            mpu: Microprocessor::new(),
            board: Board::new(),
            powered: false,
        }
    }

    pub fn powered(&self) -> bool {
        self.powered
    }

    /// Power up: fresh RAM and decode table, monitor installed, then
    /// the reset sequence.
    pub fn power_on(&mut self) {
        self.powered = true;
        self.board.display.clear();
        self.board.clear_ram();
        self.board.install_monitor();
        self.mpu.rebuild_decode_table();
        self.reset();
    }

    /// Power down: halt and blank everything. Register contents are
    /// left behind, exactly as the hardware would.
    pub fn power_off(&mut self) {
        self.mpu.set_running(false);
        self.powered = false;
        self.board.display.clear();
        self.board.clear_ram();
        self.board.remove_monitor();
    }

    /// Toggle the power switch.
    pub fn power_button(&mut self) {
        if self.powered {
            self.power_off();
        } else {
            self.power_on();
        }
    }

    /// The CPU reset sequence (also wired to releasing the RESET key).
    pub fn reset(&mut self) {
        self.mpu.reset(&mut self.board);
    }

    /// Run one execution slice and report what happened. The display
    /// dirty flag is consumed here; render after a `display_changed`
    /// report.
    pub fn tick(&mut self) -> Result<SliceReport, CpuError> {
        let cycles = self.mpu.run_slice(&mut self.board)?;
        let display_changed = self.board.display.take_dirty();
        Ok(SliceReport {
            cycles,
            display_changed,
        })
    }

    /// Execute a single instruction; returns its cycle cost.
    pub fn step(&mut self) -> Result<u8, CpuError> {
        self.mpu.step(&mut self.board)
    }

    /// Press a keypad key. The code's high nibble selects the row bit
    /// to pull low, the low nibble the row address offset from 0xC000.
    /// `None` (the RESET key) does nothing until release. Ignored
    /// while powered off.
    pub fn press_key(&mut self, code: Option<u8>) {
        if !self.powered {
            return;
        }
        let Some(code) = code else {
            return;
        };
        let address = KEYPAD_BASE | u16::from(code & 0x0F);
        let up_bit = 1u8 << (code >> 4);
        let row = self.board.read_byte(address);
        self.board.write_byte(address, row & !up_bit);
    }

    /// Release a keypad key, restoring its row bit. Releasing the
    /// RESET key (`None`) performs the full reset sequence.
    pub fn release_key(&mut self, code: Option<u8>) {
        if !self.powered {
            return;
        }
        let Some(code) = code else {
            return self.reset();
        };
        let address = KEYPAD_BASE | u16::from(code & 0x0F);
        let up_bit = 1u8 << (code >> 4);
        let row = self.board.read_byte(address);
        self.board.write_byte(address, row | up_bit);
    }

    /// Validate and load a string of hex byte pairs at `address`,
    /// wrapping at the top of memory. The CPU is halted around the
    /// load and resumed afterwards; nothing is written if the string
    /// is malformed.
    pub fn load_hex(&mut self, address: u16, hex: &str) -> Result<(), InputError> {
        let bytes = parse_hex_pairs(hex)?;
        self.mpu.set_running(false);
        let mut address = address;
        for byte in bytes {
            self.board.load_byte(address, byte);
            address = address.wrapping_add(1);
        }
        self.mpu.set_running(true);
        Ok(())
    }

    /// Point the program counter at `address` and store `bytes` there
    /// through the CPU write path, advancing it as the bytes land.
    pub fn load_program(&mut self, address: u16, bytes: &[u8]) {
        self.mpu.regs.program_counter = address;
        for &byte in bytes {
            self.mpu.store_program_byte(&mut self.board, byte);
        }
    }

    /// Point the program counter at `address` without touching memory.
    pub fn jump(&mut self, address: u16) {
        self.mpu.regs.program_counter = address;
    }

    /// The raw per-digit segment masks.
    pub fn display_leds(&self) -> [u8; display::DIGITS] {
        self.board.display.leds()
    }

    /// Three-row text rendering of the display.
    pub fn render_display(&self) -> String {
        self.board.display.render()
    }

    /// Snapshot the externally visible state.
    pub fn snapshot(&self) -> SystemState {
        SystemState {
            powered: self.powered,
            accumulator_a: self.mpu.regs.accumulator_a,
            accumulator_b: self.mpu.regs.accumulator_b,
            index_register: self.mpu.regs.index_register,
            stack_pointer: self.mpu.regs.stack_pointer,
            program_counter: self.mpu.regs.program_counter,
            condition_codes: self.mpu.condition_codes(),
            display_leds: self.board.display.leds(),
        }
    }
}

impl Default for Et3400 {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a bare string of hex byte pairs.
fn parse_hex_pairs(hex: &str) -> Result<Vec<u8>, InputError> {
    let raw = hex.as_bytes();
    if raw.len() % 2 != 0 {
        return Err(InputError::OddLength {
            length: raw.len(),
            trailing: hex.chars().last().map(String::from).unwrap_or_default(),
        });
    }
    let mut bytes = Vec::with_capacity(raw.len() / 2);
    for offset in (0..raw.len()).step_by(2) {
        let pair = &raw[offset..offset + 2];
        let byte = std::str::from_utf8(pair)
            .ok()
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
            .ok_or_else(|| InputError::InvalidByte {
                substring: String::from_utf8_lossy(pair).into_owned(),
                offset,
            })?;
        bytes.push(byte);
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::keypad::Key;

    /// Segment masks the monitor paints at boot: `CPU UP` with a lit
    /// decimal point on the prompt digit.
    const CPU_UP: [u8; 6] = [0x4E, 0x67, 0x3E, 0x00, 0x3E, 0xE7];

    #[test]
    fn test_power_on_boots_monitor() {
        let mut et3400 = Et3400::new();
        et3400.power_on();
        assert!(et3400.powered());
        assert_eq!(et3400.mpu.regs.program_counter, monitor::MONITOR_BASE);
        assert_eq!(et3400.mpu.regs.stack_pointer, 0x00EB);
        assert!(et3400.mpu.regs.status.interrupt());

        let report = et3400.tick().unwrap();
        assert!(report.cycles >= crate::cpu::SLICE_CYCLE_BUDGET);
        assert!(report.display_changed);
        assert_eq!(et3400.display_leds(), CPU_UP);
    }

    #[test]
    fn test_monitor_display_is_stable_across_slices() {
        let mut et3400 = Et3400::new();
        et3400.power_on();
        et3400.tick().unwrap();
        let report = et3400.tick().unwrap();
        assert!(!report.display_changed);
        assert_eq!(et3400.display_leds(), CPU_UP);
    }

    #[test]
    fn test_acca_key_shows_accumulator() {
        let mut et3400 = Et3400::new();
        et3400.power_on();
        et3400.tick().unwrap();
        et3400.press_key(Key::Acca.code());
        et3400.tick().unwrap();
        et3400.release_key(Key::Acca.code());
        et3400.tick().unwrap();
        // The monitor answers with "Acc A. 00".
        assert_eq!(et3400.display_leds(), [0x77, 0x0D, 0x0D, 0xFD, 0x7E, 0x7E]);
    }

    #[test]
    fn test_press_and_release_key_bits() {
        let mut et3400 = Et3400::new();
        et3400.power_on();
        // DO key: code 0x06 = bit 0 of row 0xC006.
        et3400.press_key(Some(0x06));
        assert_eq!(et3400.board.read_byte(0xC006), 0xFE);
        et3400.release_key(Some(0x06));
        assert_eq!(et3400.board.read_byte(0xC006), 0xFF);
        // ZERO key: code 0x56 = bit 5 of the same row.
        et3400.press_key(Some(0x56));
        assert_eq!(et3400.board.read_byte(0xC006), 0xDF);
        et3400.release_key(Some(0x56));
        assert_eq!(et3400.board.read_byte(0xC006), 0xFF);
    }

    #[test]
    fn test_release_none_resets() {
        let mut et3400 = Et3400::new();
        et3400.power_on();
        et3400.jump(0x0000);
        et3400.mpu.regs.accumulator_a = 0x42;
        et3400.press_key(None); // no-op
        assert_eq!(et3400.mpu.regs.accumulator_a, 0x42);
        et3400.release_key(None);
        assert_eq!(et3400.mpu.regs.accumulator_a, 0x00);
        assert_eq!(et3400.mpu.regs.program_counter, monitor::MONITOR_BASE);
    }

    #[test]
    fn test_keys_ignored_when_powered_off() {
        let mut et3400 = Et3400::new();
        et3400.press_key(Some(0x06));
        assert_eq!(et3400.board.read_byte(0xC006), 0x00);
        et3400.release_key(None);
        assert_eq!(et3400.mpu.regs.program_counter, 0x0000);
    }

    #[test]
    fn test_load_hex_and_step() {
        let mut et3400 = Et3400::new();
        et3400.power_on();
        et3400.load_hex(0x0000, "8601").unwrap();
        et3400.jump(0x0000);
        et3400.step().unwrap();
        assert_eq!(et3400.mpu.regs.accumulator_a, 0x01);
        assert!(!et3400.mpu.regs.status.zero());
        assert!(!et3400.mpu.regs.status.negative());
    }

    #[test]
    fn test_load_hex_wraps_address() {
        let mut et3400 = Et3400::new();
        et3400.load_hex(0xFFFF, "AABB").unwrap();
        // 0xFFFF is inside the ROM window, so only the wrapped byte
        // lands.
        assert_eq!(et3400.board.read_byte(0x0000), 0xBB);
    }

    #[test]
    fn test_load_hex_rejects_odd_length() {
        let mut et3400 = Et3400::new();
        let error = et3400.load_hex(0x0000, "86011").unwrap_err();
        assert_eq!(
            error,
            InputError::OddLength {
                length: 5,
                trailing: "1".to_string(),
            }
        );
        assert_eq!(et3400.board.read_byte(0x0000), 0x00);
    }

    #[test]
    fn test_load_hex_rejects_bad_digits() {
        let mut et3400 = Et3400::new();
        let error = et3400.load_hex(0x0000, "86ZZ01").unwrap_err();
        assert_eq!(
            error,
            InputError::InvalidByte {
                substring: "ZZ".to_string(),
                offset: 2,
            }
        );
        // Nothing written, including the valid leading pair.
        assert_eq!(et3400.board.read_byte(0x0000), 0x00);
    }

    #[test]
    fn test_load_program_writes_through_cpu_path() {
        let mut et3400 = Et3400::new();
        et3400.power_on();
        et3400.load_program(0x0100, &[0x86, 0x2A]);
        assert_eq!(et3400.mpu.regs.program_counter, 0x0102);
        assert_eq!(et3400.board.read_byte(0x0100), 0x86);
        assert_eq!(et3400.board.read_byte(0x0101), 0x2A);
    }

    #[test]
    fn test_power_off_blanks_machine() {
        let mut et3400 = Et3400::new();
        et3400.power_on();
        et3400.tick().unwrap();
        et3400.power_off();
        assert!(!et3400.powered());
        assert!(!et3400.mpu.is_running());
        assert_eq!(et3400.display_leds(), [0; 6]);
        assert_eq!(et3400.board.read_byte(monitor::MONITOR_BASE), 0x00);
        assert_eq!(et3400.tick().unwrap().cycles, 0);
    }

    #[test]
    fn test_snapshot_roundtrips_through_json() {
        let mut et3400 = Et3400::new();
        et3400.power_on();
        let state = et3400.snapshot();
        let json = serde_json::to_string(&state).unwrap();
        let back: SystemState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
        assert!(back.powered);
        assert_eq!(back.stack_pointer, 0x00EB);
        assert_eq!(back.program_counter, monitor::MONITOR_BASE);
    }
}
