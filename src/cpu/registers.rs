//! The 6800 register file.

use crate::cpu::status::StatusRegister;
use serde::{Deserialize, Serialize};

/// CPU registers, including the two internal registers the addressing
/// modes feed: `address_register` holds the most recently resolved
/// effective address and `operand` the most recently fetched operand
/// value (8 or 16 bits wide depending on the mode).
///
/// Every mutation masks to the register's width; the ALU computes in
/// wider intermediates and stores masked results here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registers {
    pub accumulator_a: u8,
    pub accumulator_b: u8,
    pub index_register: u16,
    pub stack_pointer: u16,
    pub program_counter: u16,
    pub address_register: u16,
    pub operand: u16,
    pub status: StatusRegister,
}

impl Registers {
    /// Create a register file with everything zeroed.
    pub fn new() -> Self {
        Self::default()
    }
}
