//! # ET-3400 Emulator
//!
//! An emulator of the Heathkit ET-3400 microprocessor trainer: a
//! Motorola 6800 CPU, 64 KB of address space with the monitor program
//! in ROM at the top, a six-digit seven-segment LED display and a
//! hexadecimal keypad, both reached through memory-mapped I/O.
//!
//! The CPU core runs cooperatively: the host drives it one bounded
//! slice at a time and renders the display between slices.

pub mod cpu;
pub mod system;

// Re-export commonly used types
pub use cpu::decode::{AddressingMode, Mnemonic, OpcodeTable};
pub use cpu::{Bus, CpuError, CpuState, Memory, Microprocessor, Registers, StatusRegister};
pub use system::keypad::Key;
pub use system::{Et3400, InputError, SliceReport, SystemState};
