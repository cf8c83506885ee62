//! Execution engine for the 6800.
//!
//! Implements the fetch-decode-execute cycle, the ALU flag algebra,
//! the stack and interrupt protocol, and every opcode's semantics.
//!
//! The core never runs free: the host drives it one bounded slice at a
//! time through [`Microprocessor::run_slice`] (or one instruction at a
//! time through [`Microprocessor::step`]) and regains control between
//! slices to render the display and inject keypad input.

use crate::cpu::decode::{AddressingMode, Mnemonic, OpcodeTable};
use crate::cpu::registers::Registers;
use crate::cpu::Bus;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Emulated cycles executed per slice before control returns to the
/// host.
pub const SLICE_CYCLE_BUDGET: u32 = 20_000;

/// Interrupt and reset vector addresses.
pub mod vectors {
    pub const IRQ: u16 = 0xFFF8;
    pub const SWI: u16 = 0xFFFA;
    pub const NMI: u16 = 0xFFFC;
    pub const RST: u16 = 0xFFFE;
}

/// CPU execution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CpuState {
    /// The loop executes slices when driven.
    Running,
    /// The loop refuses to execute until re-enabled.
    Halted,
}

/// Fatal CPU conditions. Everything else the 6800 does wraps or sets
/// flags; only executing one of the seven HCF slots locks the machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CpuError {
    #[error("undocumented opcode {opcode:#04X} executed at program counter {program_counter:#06X}")]
    UndocumentedOpcode { opcode: u8, program_counter: u16 },
}

/// The 6800 core.
///
/// Owns registers and the decode table; memory is reached exclusively
/// through the [`Bus`] the caller passes in.
#[derive(Clone, Serialize, Deserialize)]
pub struct Microprocessor {
    pub regs: Registers,
    pub state: CpuState,
    #[serde(skip, default)]
    table: OpcodeTable,
}

impl Microprocessor {
    /// Create a halted CPU with zeroed registers.
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            state: CpuState::Halted,
            table: OpcodeTable::decode(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == CpuState::Running
    }

    /// Gate the execution loop. `set_running(false)` takes effect at
    /// the next slice boundary; an in-progress slice runs to
    /// completion.
    pub fn set_running(&mut self, running: bool) {
        self.state = if running {
            CpuState::Running
        } else {
            CpuState::Halted
        };
    }

    /// Rebuild the decode table from the embedded opcode metadata.
    pub fn rebuild_decode_table(&mut self) {
        self.table = OpcodeTable::decode();
    }

    /// The packed condition-code byte (bits 7:6 read as 1).
    pub fn condition_codes(&self) -> u8 {
        self.regs.status.value()
    }

    pub fn set_condition_codes(&mut self, byte: u8) {
        self.regs.status.set_value(byte);
    }

    /// Reset protocol: halt, force the keypad rows to "all keys up",
    /// clear A/B/X, point the stack at its startup address, mask
    /// interrupts, jump through the reset vector, and re-enable the
    /// loop.
    pub fn reset(&mut self, bus: &mut dyn Bus) {
        self.set_running(false);
        // Keypad rows idle high; the monitor polls for cleared bits.
        bus.write_byte(0xC003, 0xFF);
        bus.write_byte(0xC005, 0xFF);
        bus.write_byte(0xC006, 0xFF);
        self.regs.accumulator_a = 0;
        self.regs.accumulator_b = 0;
        self.regs.index_register = 0;
        self.regs.stack_pointer = 0x00EB;
        self.set_condition_codes(0x10);
        self.regs.address_register = self.read_word(bus, vectors::RST);
        self.regs.program_counter = self.regs.address_register;
        self.set_running(true);
    }

    /// Execute one bounded slice.
    ///
    /// Returns the number of cycles actually executed: 0 when halted,
    /// otherwise at least [`SLICE_CYCLE_BUDGET`]. A fatal opcode halts
    /// the CPU and surfaces the error immediately.
    pub fn run_slice(&mut self, bus: &mut dyn Bus) -> Result<u32, CpuError> {
        if !self.is_running() {
            return Ok(0);
        }
        let mut clock = 0u32;
        while clock < SLICE_CYCLE_BUDGET {
            clock += u32::from(self.step(bus)?);
        }
        Ok(clock)
    }

    /// Fetch, decode and execute a single instruction; returns its
    /// cycle cost.
    pub fn step(&mut self, bus: &mut dyn Bus) -> Result<u8, CpuError> {
        let opcode = self.fetch_byte(bus);
        let entry = self.table.entry(opcode);
        if let Some(value) = self.resolve_operand(entry.mode, bus) {
            self.regs.operand = value;
        }
        self.execute(entry.mnemonic, opcode, bus)?;
        Ok(entry.cycles)
    }

    /// Store a byte at the program counter and advance it; used by the
    /// host to inject program images through the CPU write path.
    pub fn store_program_byte(&mut self, bus: &mut dyn Bus, byte: u8) {
        let address = self.regs.program_counter;
        self.regs.program_counter = self.regs.program_counter.wrapping_add(1);
        bus.write_byte(address, byte);
    }

    // ==================== Fetch and memory access ====================

    fn fetch_byte(&mut self, bus: &mut dyn Bus) -> u8 {
        let value = bus.read_byte(self.regs.program_counter);
        self.regs.program_counter = self.regs.program_counter.wrapping_add(1);
        value
    }

    fn fetch_word(&mut self, bus: &mut dyn Bus) -> u16 {
        let high = self.fetch_byte(bus);
        let low = self.fetch_byte(bus);
        u16::from(high) << 8 | u16::from(low)
    }

    /// Big-endian word read; the second byte wraps around the top of
    /// the address space.
    fn read_word(&self, bus: &mut dyn Bus, address: u16) -> u16 {
        u16::from(bus.read_byte(address)) << 8 | u16::from(bus.read_byte(address.wrapping_add(1)))
    }

    fn write_word(&self, bus: &mut dyn Bus, address: u16, word: u16) {
        bus.write_byte(address, (word >> 8) as u8);
        bus.write_byte(address.wrapping_add(1), (word & 0xFF) as u8);
    }

    /// Commit a read-modify-write result to the resolved effective
    /// address.
    fn write_back(&mut self, bus: &mut dyn Bus, byte: u8) {
        bus.write_byte(self.regs.address_register, byte);
    }

    // ==================== Addressing modes ====================

    /// Resolve an opcode's operand, consuming program-counter bytes as
    /// the mode requires.
    ///
    /// Returns the operand value for the read modes and `None` for the
    /// sentinel and write modes. Every mode that computes an effective
    /// address records it in `address_register`; stores, jumps and the
    /// memory read-modify-write forms commit through it.
    fn resolve_operand(&mut self, mode: AddressingMode, bus: &mut dyn Bus) -> Option<u16> {
        use AddressingMode::*;
        match mode {
            Invalid | Undocumented | Reserved | Inherent => None,
            Relative => {
                let offset = self.fetch_byte(bus);
                self.regs.operand = u16::from(offset);
                // Signed displacement, except 0x80 exactly, which is
                // taken as +128.
                let displacement = if offset > 128 {
                    i32::from(offset) - 256
                } else {
                    i32::from(offset)
                };
                self.regs.address_register =
                    ((i32::from(self.regs.program_counter) + displacement) & 0xFFFF) as u16;
                Some(u16::from(offset))
            }
            IndexedByteRead => {
                let address = self.indexed_address(bus);
                Some(u16::from(bus.read_byte(address)))
            }
            IndexedWordRead => {
                let address = self.indexed_address(bus);
                Some(self.read_word(bus, address))
            }
            IndexedWordWrite => {
                self.indexed_address(bus);
                None
            }
            ImmediateByte => Some(u16::from(self.fetch_byte(bus))),
            ImmediateWord => Some(self.fetch_word(bus)),
            DirectByteRead => {
                let address = self.direct_address(bus);
                Some(u16::from(bus.read_byte(address)))
            }
            DirectWordRead => {
                let address = self.direct_address(bus);
                Some(self.read_word(bus, address))
            }
            DirectWordWrite => {
                self.direct_address(bus);
                None
            }
            ExtendedByteRead => {
                let address = self.extended_address(bus);
                Some(u16::from(bus.read_byte(address)))
            }
            ExtendedWordRead => {
                let address = self.extended_address(bus);
                Some(self.read_word(bus, address))
            }
            ExtendedWordWrite => {
                self.extended_address(bus);
                None
            }
        }
    }

    /// Index register plus unsigned offset byte.
    fn indexed_address(&mut self, bus: &mut dyn Bus) -> u16 {
        let offset = self.fetch_byte(bus);
        let address = self.regs.index_register.wrapping_add(u16::from(offset));
        self.regs.address_register = address;
        address
    }

    /// One-byte zero-page address.
    fn direct_address(&mut self, bus: &mut dyn Bus) -> u16 {
        let address = u16::from(self.fetch_byte(bus));
        self.regs.address_register = address;
        address
    }

    /// Two-byte absolute address.
    fn extended_address(&mut self, bus: &mut dyn Bus) -> u16 {
        let address = self.fetch_word(bus);
        self.regs.address_register = address;
        address
    }

    // ==================== Flag algebra ====================

    /// Set V/N/Z from an 8-bit result; returns the masked byte.
    fn flags_nzv(&mut self, overflow: bool, value: i32) -> u8 {
        let masked = (value & 0xFF) as u8;
        let status = &mut self.regs.status;
        status.set_overflow(overflow);
        status.set_negative(masked & 0x80 != 0);
        status.set_zero(masked == 0);
        masked
    }

    /// Set C/V/N/Z from an 8-bit result; returns the masked byte.
    fn flags_cnzv(&mut self, carry: bool, overflow: bool, value: i32) -> u8 {
        self.regs.status.set_carry(carry);
        self.flags_nzv(overflow, value)
    }

    /// Shift/rotate flags: C is the bit shifted out, V = C xor N.
    fn flags_shifted(&mut self, carry: bool, value: i32) -> u8 {
        let masked = (value & 0xFF) as u8;
        let negative = masked & 0x80 != 0;
        let status = &mut self.regs.status;
        status.set_carry(carry);
        status.set_negative(negative);
        status.set_overflow(carry ^ negative);
        status.set_zero(masked == 0);
        masked
    }

    /// 16-bit load flags: V cleared, N from bit 15.
    fn flags_loaded16(&mut self, value: u16) -> u16 {
        let status = &mut self.regs.status;
        status.set_overflow(false);
        status.set_negative(value & 0x8000 != 0);
        status.set_zero(value == 0);
        value
    }

    // ==================== ALU ====================

    /// Add the current operand to `argument`, deriving H, C, V, N, Z.
    fn add(&mut self, argument: i32) -> u8 {
        let operand = i32::from(self.regs.operand);
        let result = argument + operand;
        self.regs
            .status
            .set_half(carry_from(argument, operand, result, 3));
        self.regs
            .status
            .set_carry(carry_from(argument, operand, result, 7));
        self.flags_nzv(add_overflow(argument, operand, result), result)
    }

    /// Subtract the current operand from `argument`, deriving C, V, N,
    /// Z (half-carry is unaffected by subtraction).
    fn sub(&mut self, argument: i32) -> u8 {
        let operand = i32::from(self.regs.operand);
        let result = argument - operand;
        self.flags_cnzv(
            operand > argument,
            sub_overflow(argument, operand, result),
            result,
        )
    }

    /// Subtraction for flags only.
    fn compare(&mut self, argument: i32) {
        let operand = i32::from(self.regs.operand);
        let result = argument - operand;
        self.flags_cnzv(
            operand > argument,
            sub_overflow(argument, operand, result),
            result,
        );
    }

    /// 16-bit compare against the index register. Carry is untouched;
    /// the overflow algebra and the N/Z derivation inspect the same
    /// low-byte bits as the 8-bit path.
    fn compare_index(&mut self) {
        let operand = i32::from(self.regs.operand);
        let index = i32::from(self.regs.index_register);
        let result = index - operand;
        let overflow = sub_overflow(index, operand, result);
        self.flags_nzv(overflow, result);
    }

    /// Load/transfer flags: V cleared, N and Z from the value.
    fn loaded(&mut self, value: i32) -> u8 {
        self.flags_nzv(false, value)
    }

    fn negate(&mut self, value: i32) -> u8 {
        self.flags_cnzv(value != 0, value == 0x80, -value)
    }

    fn complement(&mut self, value: i32) -> u8 {
        self.flags_cnzv(true, false, !value)
    }

    fn logical_shift_right(&mut self, value: i32) -> u8 {
        self.flags_shifted(value & 1 != 0, value >> 1)
    }

    fn rotate_right(&mut self, value: i32) -> u8 {
        let carry = i32::from(self.regs.status.carry());
        self.flags_shifted(value & 1 != 0, (value >> 1) | (carry << 7))
    }

    fn arithmetic_shift_right(&mut self, value: i32) -> u8 {
        self.flags_shifted(value & 1 != 0, (value >> 1) | (value & 0x80))
    }

    fn arithmetic_shift_left(&mut self, value: i32) -> u8 {
        self.flags_shifted(value & 0x80 != 0, value << 1)
    }

    fn rotate_left(&mut self, value: i32) -> u8 {
        let carry = i32::from(self.regs.status.carry());
        self.flags_shifted(value & 0x80 != 0, (value << 1) | carry)
    }

    fn decrement(&mut self, value: i32) -> u8 {
        self.flags_nzv(value == 0x80, value - 1)
    }

    fn increment(&mut self, value: i32) -> u8 {
        self.flags_nzv(value == 0x7F, value + 1)
    }

    fn test(&mut self, value: i32) {
        self.flags_cnzv(false, false, value);
    }

    fn clear(&mut self) -> u8 {
        self.regs.status.set_carry(false);
        self.flags_nzv(false, 0)
    }

    /// Binary-coded-decimal correction of accumulator A after an
    /// addition. Works on the unmasked running sum so a correction
    /// that wraps past 0xFF still raises carry; N and Z also derive
    /// from the unmasked sum.
    fn decimal_adjust(&mut self) {
        let mut value = i32::from(self.regs.accumulator_a);
        if (value & 0x0F) > 0x09 || self.regs.status.half() {
            value += 0x06;
        }
        if (value >> 4) > 0x09 || self.regs.status.carry() {
            value += 0x60;
        }
        if (value & 0x0F) > 0x09 && (value & 0xF0) == 0x90 {
            value += 0x60;
        }
        if (value >> 4) > 0x09 {
            self.regs.status.set_carry(true);
        }
        self.regs.status.set_negative(value & 0x80 != 0);
        self.regs.status.set_zero(value == 0);
        self.regs.accumulator_a = (value & 0xFF) as u8;
    }

    // ==================== Stack ====================

    /// Write at the stack pointer, then decrement it.
    fn push_byte(&mut self, bus: &mut dyn Bus, byte: u8) {
        let address = self.regs.stack_pointer;
        self.regs.stack_pointer = self.regs.stack_pointer.wrapping_sub(1);
        bus.write_byte(address, byte);
    }

    /// Push low byte first so the word reads big-endian in memory.
    fn push_word(&mut self, bus: &mut dyn Bus, word: u16) {
        self.push_byte(bus, (word & 0xFF) as u8);
        self.push_byte(bus, (word >> 8) as u8);
    }

    /// Increment the stack pointer, then read at it.
    fn pull_byte(&mut self, bus: &mut dyn Bus) -> u8 {
        self.regs.stack_pointer = self.regs.stack_pointer.wrapping_add(1);
        bus.read_byte(self.regs.stack_pointer)
    }

    fn pull_word(&mut self, bus: &mut dyn Bus) -> u16 {
        let high = self.pull_byte(bus);
        let low = self.pull_byte(bus);
        u16::from(high) << 8 | u16::from(low)
    }

    // ==================== Control flow ====================

    fn branch(&mut self, condition: bool) {
        if condition {
            self.regs.program_counter = self.regs.address_register;
        }
    }

    fn jump_subroutine(&mut self, bus: &mut dyn Bus) {
        let return_address = self.regs.program_counter;
        self.push_word(bus, return_address);
        self.regs.program_counter = self.regs.address_register;
    }

    fn return_subroutine(&mut self, bus: &mut dyn Bus) {
        self.regs.address_register = self.pull_word(bus);
        self.regs.program_counter = self.regs.address_register;
    }

    /// Shared interrupt entry: push PC, X, A, B and the condition
    /// codes, mask interrupts, vector.
    fn interrupt(&mut self, bus: &mut dyn Bus, vector: u16) {
        let program_counter = self.regs.program_counter;
        self.push_word(bus, program_counter);
        let index = self.regs.index_register;
        self.push_word(bus, index);
        let a = self.regs.accumulator_a;
        self.push_byte(bus, a);
        let b = self.regs.accumulator_b;
        self.push_byte(bus, b);
        let codes = self.condition_codes();
        self.push_byte(bus, codes);
        self.regs.status.set_interrupt(true);
        self.regs.address_register = self.read_word(bus, vector);
        self.regs.program_counter = self.regs.address_register;
    }

    // ==================== Dispatch ====================

    fn execute(&mut self, mnemonic: Mnemonic, opcode: u8, bus: &mut dyn Bus) -> Result<(), CpuError> {
        use Mnemonic::*;
        let status = self.regs.status;
        match mnemonic {
            Iop | Nop => {}
            Hcf => {
                self.set_running(false);
                return Err(CpuError::UndocumentedOpcode {
                    opcode,
                    program_counter: self.regs.program_counter,
                });
            }

            // Condition-code transfers and flag manipulation
            Tap => {
                let a = self.regs.accumulator_a;
                self.set_condition_codes(a);
            }
            Tpa => self.regs.accumulator_a = self.condition_codes(),
            Clv => self.regs.status.set_overflow(false),
            Sev => self.regs.status.set_overflow(true),
            Clc => self.regs.status.set_carry(false),
            Sec => self.regs.status.set_carry(true),
            Cli => self.regs.status.set_interrupt(false),
            Sei => self.regs.status.set_interrupt(true),

            // 16-bit increments/decrements: only the zero flag moves
            Inx => {
                self.regs.index_register = self.regs.index_register.wrapping_add(1);
                self.regs.status.set_zero(self.regs.index_register == 0);
            }
            Dex => {
                self.regs.index_register = self.regs.index_register.wrapping_sub(1);
                self.regs.status.set_zero(self.regs.index_register == 0);
            }
            Ins => self.regs.stack_pointer = self.regs.stack_pointer.wrapping_add(1),
            Des => self.regs.stack_pointer = self.regs.stack_pointer.wrapping_sub(1),
            Tsx => self.regs.index_register = self.regs.stack_pointer.wrapping_add(1),
            Txs => self.regs.stack_pointer = self.regs.index_register.wrapping_sub(1),

            // Accumulator-to-accumulator arithmetic
            Aba => {
                self.regs.operand = u16::from(self.regs.accumulator_b);
                self.regs.accumulator_a = self.add(i32::from(self.regs.accumulator_a));
            }
            Sba => {
                self.regs.operand = u16::from(self.regs.accumulator_b);
                self.regs.accumulator_a = self.sub(i32::from(self.regs.accumulator_a));
            }
            Cba => {
                self.regs.operand = u16::from(self.regs.accumulator_b);
                self.compare(i32::from(self.regs.accumulator_a));
            }
            Tab => {
                self.regs.accumulator_b = self.loaded(i32::from(self.regs.accumulator_a));
            }
            Tba => {
                self.regs.accumulator_a = self.loaded(i32::from(self.regs.accumulator_b));
            }
            Daa => self.decimal_adjust(),

            // Arithmetic against the operand
            Adda => self.regs.accumulator_a = self.add(i32::from(self.regs.accumulator_a)),
            Addb => self.regs.accumulator_b = self.add(i32::from(self.regs.accumulator_b)),
            Adca => {
                let argument = i32::from(self.regs.accumulator_a) + i32::from(status.carry());
                self.regs.accumulator_a = self.add(argument);
            }
            Adcb => {
                let argument = i32::from(self.regs.accumulator_b) + i32::from(status.carry());
                self.regs.accumulator_b = self.add(argument);
            }
            Suba => self.regs.accumulator_a = self.sub(i32::from(self.regs.accumulator_a)),
            Subb => self.regs.accumulator_b = self.sub(i32::from(self.regs.accumulator_b)),
            Sbca => {
                let argument = i32::from(self.regs.accumulator_a) - i32::from(status.carry());
                self.regs.accumulator_a = self.sub(argument);
            }
            Sbcb => {
                let argument = i32::from(self.regs.accumulator_b) - i32::from(status.carry());
                self.regs.accumulator_b = self.sub(argument);
            }
            Cmpa => self.compare(i32::from(self.regs.accumulator_a)),
            Cmpb => self.compare(i32::from(self.regs.accumulator_b)),
            Cpx => self.compare_index(),

            // Logical
            Anda => {
                let value = i32::from(self.regs.accumulator_a) & i32::from(self.regs.operand);
                self.regs.accumulator_a = self.flags_nzv(false, value);
            }
            Andb => {
                let value = i32::from(self.regs.accumulator_b) & i32::from(self.regs.operand);
                self.regs.accumulator_b = self.flags_nzv(false, value);
            }
            Bita => {
                let value = i32::from(self.regs.accumulator_a) & i32::from(self.regs.operand);
                self.flags_nzv(false, value);
            }
            Bitb => {
                let value = i32::from(self.regs.accumulator_b) & i32::from(self.regs.operand);
                self.flags_nzv(false, value);
            }
            Oraa => {
                let value = i32::from(self.regs.accumulator_a) | i32::from(self.regs.operand);
                self.regs.accumulator_a = self.flags_nzv(false, value);
            }
            Orab => {
                let value = i32::from(self.regs.accumulator_b) | i32::from(self.regs.operand);
                self.regs.accumulator_b = self.flags_nzv(false, value);
            }
            Eora => {
                let value = i32::from(self.regs.accumulator_a) ^ i32::from(self.regs.operand);
                self.regs.accumulator_a = self.flags_nzv(false, value);
            }
            Eorb => {
                let value = i32::from(self.regs.accumulator_b) ^ i32::from(self.regs.operand);
                self.regs.accumulator_b = self.flags_nzv(false, value);
            }

            // Loads and stores
            Ldaa => {
                let operand = i32::from(self.regs.operand);
                self.regs.accumulator_a = self.loaded(operand);
            }
            Ldab => {
                let operand = i32::from(self.regs.operand);
                self.regs.accumulator_b = self.loaded(operand);
            }
            Staa => {
                let value = self.loaded(i32::from(self.regs.accumulator_a));
                self.write_back(bus, value);
            }
            Stab => {
                let value = self.loaded(i32::from(self.regs.accumulator_b));
                self.write_back(bus, value);
            }
            Lds => {
                let operand = self.regs.operand;
                self.regs.stack_pointer = self.flags_loaded16(operand);
            }
            Ldx => {
                let operand = self.regs.operand;
                self.regs.index_register = self.flags_loaded16(operand);
            }
            Sts => {
                let word = self.regs.stack_pointer;
                self.write_word(bus, self.regs.address_register, word);
            }
            Stx => {
                let word = self.regs.index_register;
                self.write_word(bus, self.regs.address_register, word);
            }

            // Unary operations, accumulator forms
            Nega => self.regs.accumulator_a = self.negate(i32::from(self.regs.accumulator_a)),
            Negb => self.regs.accumulator_b = self.negate(i32::from(self.regs.accumulator_b)),
            Coma => self.regs.accumulator_a = self.complement(i32::from(self.regs.accumulator_a)),
            Comb => self.regs.accumulator_b = self.complement(i32::from(self.regs.accumulator_b)),
            Lsra => {
                self.regs.accumulator_a = self.logical_shift_right(i32::from(self.regs.accumulator_a))
            }
            Lsrb => {
                self.regs.accumulator_b = self.logical_shift_right(i32::from(self.regs.accumulator_b))
            }
            Rora => self.regs.accumulator_a = self.rotate_right(i32::from(self.regs.accumulator_a)),
            Rorb => self.regs.accumulator_b = self.rotate_right(i32::from(self.regs.accumulator_b)),
            Asra => {
                self.regs.accumulator_a =
                    self.arithmetic_shift_right(i32::from(self.regs.accumulator_a))
            }
            Asrb => {
                self.regs.accumulator_b =
                    self.arithmetic_shift_right(i32::from(self.regs.accumulator_b))
            }
            Asla => {
                self.regs.accumulator_a =
                    self.arithmetic_shift_left(i32::from(self.regs.accumulator_a))
            }
            Aslb => {
                self.regs.accumulator_b =
                    self.arithmetic_shift_left(i32::from(self.regs.accumulator_b))
            }
            Rola => self.regs.accumulator_a = self.rotate_left(i32::from(self.regs.accumulator_a)),
            Rolb => self.regs.accumulator_b = self.rotate_left(i32::from(self.regs.accumulator_b)),
            Deca => self.regs.accumulator_a = self.decrement(i32::from(self.regs.accumulator_a)),
            Decb => self.regs.accumulator_b = self.decrement(i32::from(self.regs.accumulator_b)),
            Inca => self.regs.accumulator_a = self.increment(i32::from(self.regs.accumulator_a)),
            Incb => self.regs.accumulator_b = self.increment(i32::from(self.regs.accumulator_b)),
            Tsta => self.test(i32::from(self.regs.accumulator_a)),
            Tstb => self.test(i32::from(self.regs.accumulator_b)),
            Clra => self.regs.accumulator_a = self.clear(),
            Clrb => self.regs.accumulator_b = self.clear(),

            // Unary operations, memory (read-modify-write) forms
            Neg => {
                let value = self.negate(i32::from(self.regs.operand));
                self.write_back(bus, value);
            }
            Com => {
                let value = self.complement(i32::from(self.regs.operand));
                self.write_back(bus, value);
            }
            Lsr => {
                let value = self.logical_shift_right(i32::from(self.regs.operand));
                self.write_back(bus, value);
            }
            Ror => {
                let value = self.rotate_right(i32::from(self.regs.operand));
                self.write_back(bus, value);
            }
            Asr => {
                let value = self.arithmetic_shift_right(i32::from(self.regs.operand));
                self.write_back(bus, value);
            }
            Asl => {
                let value = self.arithmetic_shift_left(i32::from(self.regs.operand));
                self.write_back(bus, value);
            }
            Rol => {
                let value = self.rotate_left(i32::from(self.regs.operand));
                self.write_back(bus, value);
            }
            Dec => {
                let value = self.decrement(i32::from(self.regs.operand));
                self.write_back(bus, value);
            }
            Inc => {
                let value = self.increment(i32::from(self.regs.operand));
                self.write_back(bus, value);
            }
            Tst => self.test(i32::from(self.regs.operand)),
            Clr => {
                let value = self.clear();
                self.write_back(bus, value);
            }

            // Branches: the relative resolver has already computed the
            // target into the address register.
            Jmp => self.regs.program_counter = self.regs.address_register,
            Bhi => self.branch(!(status.carry() | status.zero())),
            Bls => self.branch(status.carry() | status.zero()),
            Bcc => self.branch(!status.carry()),
            Bcs => self.branch(status.carry()),
            Bne => self.branch(!status.zero()),
            Beq => self.branch(status.zero()),
            Bvc => self.branch(!status.overflow()),
            Bvs => self.branch(status.overflow()),
            Bpl => self.branch(!status.negative()),
            Bmi => self.branch(status.negative()),
            Bge => self.branch(!(status.negative() ^ status.overflow())),
            Blt => self.branch(status.negative() ^ status.overflow()),
            Bgt => self.branch(!(status.zero() | (status.negative() ^ status.overflow()))),
            Ble => self.branch(status.zero() | (status.negative() ^ status.overflow())),

            // Subroutines and interrupts
            Jsr | Bsr => self.jump_subroutine(bus),
            Rts => self.return_subroutine(bus),
            Rti => {
                let codes = self.pull_byte(bus);
                self.set_condition_codes(codes);
                self.regs.accumulator_b = self.pull_byte(bus);
                self.regs.accumulator_a = self.pull_byte(bus);
                self.regs.index_register = self.pull_word(bus);
                self.return_subroutine(bus);
            }
            Swi => self.interrupt(bus, vectors::SWI),
            Wai => {
                self.regs.program_counter = self.regs.program_counter.wrapping_add(1);
                let program_counter = self.regs.program_counter;
                self.push_word(bus, program_counter);
                let index = self.regs.index_register;
                self.push_word(bus, index);
                let a = self.regs.accumulator_a;
                self.push_byte(bus, a);
                let b = self.regs.accumulator_b;
                self.push_byte(bus, b);
                let codes = self.condition_codes();
                self.push_byte(bus, codes);
            }

            // Stack accumulator traffic
            Psha => {
                let a = self.regs.accumulator_a;
                self.push_byte(bus, a);
            }
            Pshb => {
                let b = self.regs.accumulator_b;
                self.push_byte(bus, b);
            }
            Pula => self.regs.accumulator_a = self.pull_byte(bus),
            Pulb => self.regs.accumulator_b = self.pull_byte(bus),
        }
        Ok(())
    }
}

impl Default for Microprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Microprocessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Microprocessor")
            .field("state", &self.state)
            .field("regs", &self.regs)
            .finish()
    }
}

#[inline]
fn bit(value: i32, position: u32) -> i32 {
    (value >> position) & 1
}

/// Carry out of `position`: set when both inputs have the bit, or
/// either input has it and the result does not.
fn carry_from(argument: i32, operand: i32, result: i32, position: u32) -> bool {
    let a = bit(argument, position);
    let m = bit(operand, position);
    let r = bit(result, position) ^ 1;
    ((a & m) | (m & r) | (r & a)) != 0
}

/// Two's-complement overflow for addition: operands agree in sign and
/// the result does not.
fn add_overflow(argument: i32, operand: i32, result: i32) -> bool {
    let a = bit(argument, 7);
    let m = bit(operand, 7);
    let r = bit(result, 7);
    ((a & m & (r ^ 1)) | ((a ^ 1) & (m ^ 1) & r)) != 0
}

/// Two's-complement overflow for subtraction.
fn sub_overflow(argument: i32, operand: i32, result: i32) -> bool {
    let a = bit(argument, 7);
    let m = bit(operand, 7);
    let r = bit(result, 7);
    ((a & (m ^ 1) & (r ^ 1)) | ((a ^ 1) & m & r)) != 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::memory::{Memory, ADDRESS_SPACE};

    fn setup(origin: u16, program: &[u8]) -> (Microprocessor, Memory) {
        let mut bus = Memory::ram(ADDRESS_SPACE);
        for (index, &byte) in program.iter().enumerate() {
            bus.write_byte(origin.wrapping_add(index as u16), byte);
        }
        let mut mpu = Microprocessor::new();
        mpu.regs.program_counter = origin;
        mpu.set_running(true);
        (mpu, bus)
    }

    #[test]
    fn test_reset_state() {
        let mut bus = Memory::ram(ADDRESS_SPACE);
        bus.write_byte(vectors::RST, 0xFC);
        bus.write_byte(vectors::RST.wrapping_add(1), 0x00);
        let mut mpu = Microprocessor::new();
        mpu.regs.accumulator_a = 0x55;
        mpu.regs.index_register = 0x1234;
        mpu.reset(&mut bus);

        assert_eq!(mpu.regs.accumulator_a, 0);
        assert_eq!(mpu.regs.accumulator_b, 0);
        assert_eq!(mpu.regs.index_register, 0);
        assert_eq!(mpu.regs.stack_pointer, 0x00EB);
        assert_eq!(mpu.regs.program_counter, 0xFC00);
        assert!(mpu.regs.status.interrupt());
        assert!(mpu.is_running());
        // Keypad rows forced to all-keys-up.
        assert_eq!(bus.read_byte(0xC003), 0xFF);
        assert_eq!(bus.read_byte(0xC005), 0xFF);
        assert_eq!(bus.read_byte(0xC006), 0xFF);
    }

    #[test]
    fn test_lda_immediate() {
        let (mut mpu, mut bus) = setup(0x0000, &[0x86, 0x01]);
        let cycles = mpu.step(&mut bus).unwrap();
        assert_eq!(cycles, 2);
        assert_eq!(mpu.regs.accumulator_a, 0x01);
        assert!(!mpu.regs.status.zero());
        assert!(!mpu.regs.status.negative());
        assert!(!mpu.regs.status.overflow());
    }

    #[test]
    fn test_add_carry_out() {
        let (mut mpu, mut bus) = setup(0x0000, &[0x8B, 0x01]); // ADDA #$01
        mpu.regs.accumulator_a = 0xFF;
        mpu.step(&mut bus).unwrap();
        assert_eq!(mpu.regs.accumulator_a, 0x00);
        assert!(mpu.regs.status.carry());
        assert!(mpu.regs.status.zero());
        assert!(!mpu.regs.status.negative());
        assert!(!mpu.regs.status.overflow());
        assert!(mpu.regs.status.half());
    }

    #[test]
    fn test_add_signed_overflow() {
        let (mut mpu, mut bus) = setup(0x0000, &[0x8B, 0x01]); // ADDA #$01
        mpu.regs.accumulator_a = 0x7F;
        mpu.step(&mut bus).unwrap();
        assert_eq!(mpu.regs.accumulator_a, 0x80);
        assert!(mpu.regs.status.overflow());
        assert!(mpu.regs.status.negative());
        assert!(!mpu.regs.status.carry());
    }

    #[test]
    fn test_adc_folds_carry_into_argument() {
        // ADC routes A + C through the ADD path; with A = 0xFF and
        // C set, the flag algebra sees 0x100 + 0x00: no bit-7 carry
        // out, result byte zero.
        let (mut mpu, mut bus) = setup(0x0000, &[0x89, 0x00]); // ADCA #$00
        mpu.regs.accumulator_a = 0xFF;
        mpu.regs.status.set_carry(true);
        mpu.step(&mut bus).unwrap();
        assert_eq!(mpu.regs.accumulator_a, 0x00);
        assert!(mpu.regs.status.zero());
        assert!(!mpu.regs.status.carry());
        assert!(!mpu.regs.status.overflow());
    }

    #[test]
    fn test_sbc_folds_carry_into_argument() {
        let (mut mpu, mut bus) = setup(0x0000, &[0x82, 0x00]); // SBCA #$00
        mpu.regs.status.set_carry(true);
        mpu.step(&mut bus).unwrap();
        assert_eq!(mpu.regs.accumulator_a, 0xFF);
        assert!(mpu.regs.status.carry());
        assert!(mpu.regs.status.negative());
        assert!(!mpu.regs.status.overflow());
    }

    #[test]
    fn test_sub_borrow_and_overflow() {
        let (mut mpu, mut bus) = setup(0x0000, &[0x80, 0x01]); // SUBA #$01
        mpu.regs.accumulator_a = 0x80;
        mpu.step(&mut bus).unwrap();
        assert_eq!(mpu.regs.accumulator_a, 0x7F);
        assert!(!mpu.regs.status.carry());
        assert!(mpu.regs.status.overflow());
        assert!(!mpu.regs.status.negative());
    }

    #[test]
    fn test_cmp_discards_result() {
        let (mut mpu, mut bus) = setup(0x0000, &[0x81, 0x10]); // CMPA #$10
        mpu.regs.accumulator_a = 0x0F;
        mpu.step(&mut bus).unwrap();
        assert_eq!(mpu.regs.accumulator_a, 0x0F);
        assert!(mpu.regs.status.carry()); // borrow
        assert!(mpu.regs.status.negative());
    }

    #[test]
    fn test_daa_low_nibble_correction() {
        let (mut mpu, mut bus) = setup(0x0000, &[0x19]); // DAA
        mpu.regs.accumulator_a = 0x0F;
        mpu.regs.status.set_half(true);
        mpu.step(&mut bus).unwrap();
        assert_eq!(mpu.regs.accumulator_a, 0x15);
        assert!(!mpu.regs.status.carry());
    }

    #[test]
    fn test_daa_carry_from_high_correction() {
        let (mut mpu, mut bus) = setup(0x0000, &[0x19]); // DAA
        mpu.regs.accumulator_a = 0x9A;
        mpu.step(&mut bus).unwrap();
        assert_eq!(mpu.regs.accumulator_a, 0x00);
        assert!(mpu.regs.status.carry());
        // The zero test runs on the unmasked sum (0x100), not the
        // stored byte.
        assert!(!mpu.regs.status.zero());
    }

    #[test]
    fn test_inx_dex_touch_only_zero() {
        let (mut mpu, mut bus) = setup(0x0000, &[0x08, 0x09]); // INX, DEX
        mpu.regs.index_register = 0xFFFF;
        mpu.regs.status.set_negative(true);
        mpu.regs.status.set_overflow(true);
        mpu.regs.status.set_carry(true);
        mpu.step(&mut bus).unwrap();
        assert_eq!(mpu.regs.index_register, 0);
        assert!(mpu.regs.status.zero());
        assert!(mpu.regs.status.negative());
        assert!(mpu.regs.status.overflow());
        assert!(mpu.regs.status.carry());
        mpu.step(&mut bus).unwrap();
        assert_eq!(mpu.regs.index_register, 0xFFFF);
        assert!(!mpu.regs.status.zero());
        assert!(mpu.regs.status.carry());
    }

    #[test]
    fn test_inc_dec_signed_boundary() {
        let (mut mpu, mut bus) = setup(0x0000, &[0x4C, 0x4A]); // INCA, DECA
        mpu.regs.accumulator_a = 0x7F;
        mpu.step(&mut bus).unwrap();
        assert_eq!(mpu.regs.accumulator_a, 0x80);
        assert!(mpu.regs.status.overflow());
        assert!(mpu.regs.status.negative());
        mpu.step(&mut bus).unwrap();
        assert_eq!(mpu.regs.accumulator_a, 0x7F);
        assert!(mpu.regs.status.overflow());
        assert!(!mpu.regs.status.negative());
    }

    #[test]
    fn test_shift_left_carry_and_overflow() {
        let (mut mpu, mut bus) = setup(0x0000, &[0x48]); // ASLA
        mpu.regs.accumulator_a = 0x81;
        mpu.step(&mut bus).unwrap();
        assert_eq!(mpu.regs.accumulator_a, 0x02);
        assert!(mpu.regs.status.carry());
        assert!(mpu.regs.status.overflow()); // C xor N
        assert!(!mpu.regs.status.negative());
    }

    #[test]
    fn test_rotate_folds_carry() {
        let (mut mpu, mut bus) = setup(0x0000, &[0x46, 0x49]); // RORA, ROLA
        mpu.regs.accumulator_a = 0x01;
        mpu.step(&mut bus).unwrap();
        assert_eq!(mpu.regs.accumulator_a, 0x00);
        assert!(mpu.regs.status.carry());
        assert!(mpu.regs.status.zero());
        // ROL now pulls the carry back in at bit 0.
        mpu.step(&mut bus).unwrap();
        assert_eq!(mpu.regs.accumulator_a, 0x01);
        assert!(!mpu.regs.status.carry());
    }

    #[test]
    fn test_complement_forces_carry() {
        let (mut mpu, mut bus) = setup(0x0000, &[0x43]); // COMA
        mpu.regs.accumulator_a = 0x55;
        mpu.step(&mut bus).unwrap();
        assert_eq!(mpu.regs.accumulator_a, 0xAA);
        assert!(mpu.regs.status.carry());
        assert!(!mpu.regs.status.overflow());
        assert!(mpu.regs.status.negative());
    }

    #[test]
    fn test_negate() {
        let (mut mpu, mut bus) = setup(0x0000, &[0x40, 0x40]); // NEGA x2
        mpu.regs.accumulator_a = 0x01;
        mpu.step(&mut bus).unwrap();
        assert_eq!(mpu.regs.accumulator_a, 0xFF);
        assert!(mpu.regs.status.carry());
        assert!(!mpu.regs.status.overflow());
        mpu.regs.accumulator_a = 0x80;
        mpu.step(&mut bus).unwrap();
        assert_eq!(mpu.regs.accumulator_a, 0x80);
        assert!(mpu.regs.status.overflow());
    }

    #[test]
    fn test_clear_accumulator() {
        let (mut mpu, mut bus) = setup(0x0000, &[0x4F]); // CLRA
        mpu.regs.accumulator_a = 0x99;
        mpu.regs.status.set_carry(true);
        mpu.step(&mut bus).unwrap();
        assert_eq!(mpu.regs.accumulator_a, 0x00);
        assert!(!mpu.regs.status.carry());
        assert!(mpu.regs.status.zero());
    }

    #[test]
    fn test_memory_shift_writes_back() {
        // ASL $0010 (extended)
        let (mut mpu, mut bus) = setup(0x0000, &[0x78, 0x00, 0x10]);
        bus.write_byte(0x0010, 0x81);
        mpu.step(&mut bus).unwrap();
        assert_eq!(bus.read_byte(0x0010), 0x02);
        assert!(mpu.regs.status.carry());
        assert!(mpu.regs.status.overflow());
    }

    #[test]
    fn test_memory_clear_and_test() {
        // CLR $20,X then TST $20,X
        let (mut mpu, mut bus) = setup(0x0000, &[0x6F, 0x20, 0x6D, 0x20]);
        mpu.regs.index_register = 0x0100;
        bus.write_byte(0x0120, 0x77);
        mpu.step(&mut bus).unwrap();
        assert_eq!(bus.read_byte(0x0120), 0x00);
        mpu.step(&mut bus).unwrap();
        assert!(mpu.regs.status.zero());
        assert!(!mpu.regs.status.carry());
        assert_eq!(bus.read_byte(0x0120), 0x00);
    }

    #[test]
    fn test_branch_taken_and_not_taken() {
        // BEQ +2 with Z clear: fall through to the next instruction.
        let (mut mpu, mut bus) = setup(0x0000, &[0x27, 0x02, 0x01, 0x01]);
        mpu.step(&mut bus).unwrap();
        assert_eq!(mpu.regs.program_counter, 0x0002);
        // Taken this time.
        mpu.regs.program_counter = 0x0000;
        mpu.regs.status.set_zero(true);
        mpu.step(&mut bus).unwrap();
        assert_eq!(mpu.regs.program_counter, 0x0004);
    }

    #[test]
    fn test_branch_backwards() {
        // BRA -2 loops onto itself.
        let (mut mpu, mut bus) = setup(0x0010, &[0x20, 0xFE]);
        mpu.step(&mut bus).unwrap();
        assert_eq!(mpu.regs.program_counter, 0x0010);
    }

    #[test]
    fn test_signed_branch_predicates() {
        // BLT taken when N xor V.
        let (mut mpu, mut bus) = setup(0x0000, &[0x2D, 0x10]);
        mpu.regs.status.set_negative(true);
        mpu.step(&mut bus).unwrap();
        assert_eq!(mpu.regs.program_counter, 0x0012);

        let (mut mpu, mut bus) = setup(0x0000, &[0x2D, 0x10]);
        mpu.regs.status.set_negative(true);
        mpu.regs.status.set_overflow(true);
        mpu.step(&mut bus).unwrap();
        assert_eq!(mpu.regs.program_counter, 0x0002);
    }

    #[test]
    fn test_jsr_rts_roundtrip() {
        // JSR $0020 from $0010; RTS at $0020.
        let (mut mpu, mut bus) = setup(0x0010, &[0xBD, 0x00, 0x20]);
        bus.write_byte(0x0020, 0x39);
        mpu.regs.stack_pointer = 0x00EB;
        mpu.step(&mut bus).unwrap();
        assert_eq!(mpu.regs.program_counter, 0x0020);
        assert_eq!(mpu.regs.stack_pointer, 0x00E9);
        // Return address 0x0013 stored big-endian: low byte at the
        // original stack pointer, high byte below it.
        assert_eq!(bus.read_byte(0x00EB), 0x13);
        assert_eq!(bus.read_byte(0x00EA), 0x00);
        mpu.step(&mut bus).unwrap();
        assert_eq!(mpu.regs.program_counter, 0x0013);
        assert_eq!(mpu.regs.stack_pointer, 0x00EB);
    }

    #[test]
    fn test_bsr() {
        // BSR +4 from $0040.
        let (mut mpu, mut bus) = setup(0x0040, &[0x8D, 0x04]);
        mpu.regs.stack_pointer = 0x00EB;
        mpu.step(&mut bus).unwrap();
        assert_eq!(mpu.regs.program_counter, 0x0046);
        assert_eq!(bus.read_byte(0x00EB), 0x42);
        assert_eq!(bus.read_byte(0x00EA), 0x00);
    }

    #[test]
    fn test_push_pull_accumulators() {
        let (mut mpu, mut bus) = setup(0x0000, &[0x36, 0x37, 0x32, 0x33]); // PSHA PSHB PULA PULB
        mpu.regs.stack_pointer = 0x00EB;
        mpu.regs.accumulator_a = 0xAA;
        mpu.regs.accumulator_b = 0xBB;
        mpu.step(&mut bus).unwrap();
        mpu.step(&mut bus).unwrap();
        assert_eq!(bus.read_byte(0x00EB), 0xAA);
        assert_eq!(bus.read_byte(0x00EA), 0xBB);
        assert_eq!(mpu.regs.stack_pointer, 0x00E9);
        // Pulls come back in reverse order.
        mpu.step(&mut bus).unwrap();
        assert_eq!(mpu.regs.accumulator_a, 0xBB);
        mpu.step(&mut bus).unwrap();
        assert_eq!(mpu.regs.accumulator_b, 0xAA);
        assert_eq!(mpu.regs.stack_pointer, 0x00EB);
    }

    #[test]
    fn test_swi_rti_roundtrip() {
        let (mut mpu, mut bus) = setup(0x0100, &[0x3F]); // SWI
        bus.write_byte(vectors::SWI, 0x02);
        bus.write_byte(vectors::SWI.wrapping_add(1), 0x00);
        bus.write_byte(0x0200, 0x3B); // RTI at the handler
        mpu.regs.stack_pointer = 0x00EB;
        mpu.regs.accumulator_a = 0x11;
        mpu.regs.accumulator_b = 0x22;
        mpu.regs.index_register = 0x3344;
        mpu.regs.status.set_carry(true);

        mpu.step(&mut bus).unwrap();
        assert_eq!(mpu.regs.program_counter, 0x0200);
        assert!(mpu.regs.status.interrupt());
        assert_eq!(mpu.regs.stack_pointer, 0x00EB - 7);

        // Clobber state, then RTI restores the frame.
        mpu.regs.accumulator_a = 0;
        mpu.regs.accumulator_b = 0;
        mpu.regs.index_register = 0;
        mpu.set_condition_codes(0);
        mpu.step(&mut bus).unwrap();
        assert_eq!(mpu.regs.program_counter, 0x0101);
        assert_eq!(mpu.regs.accumulator_a, 0x11);
        assert_eq!(mpu.regs.accumulator_b, 0x22);
        assert_eq!(mpu.regs.index_register, 0x3344);
        assert!(mpu.regs.status.carry());
    }

    #[test]
    fn test_wai_pushes_frame_without_vectoring() {
        let (mut mpu, mut bus) = setup(0x0100, &[0x3E]); // WAI
        mpu.regs.stack_pointer = 0x00EB;
        mpu.step(&mut bus).unwrap();
        assert_eq!(mpu.regs.stack_pointer, 0x00EB - 7);
        // The pushed program counter skips the byte after WAI.
        assert_eq!(bus.read_byte(0x00EB), 0x02);
        assert_eq!(bus.read_byte(0x00EA), 0x01);
        assert_eq!(mpu.regs.program_counter, 0x0102);
        assert!(!mpu.regs.status.interrupt());
    }

    #[test]
    fn test_tap_tpa() {
        let (mut mpu, mut bus) = setup(0x0000, &[0x06, 0x07]); // TAP, TPA
        mpu.regs.accumulator_a = 0x15;
        mpu.step(&mut bus).unwrap();
        assert!(mpu.regs.status.interrupt());
        assert!(mpu.regs.status.zero());
        assert!(mpu.regs.status.carry());
        assert!(!mpu.regs.status.half());
        mpu.step(&mut bus).unwrap();
        // Bits 7:6 read back as 1 through TPA.
        assert_eq!(mpu.regs.accumulator_a, 0xD5);
    }

    #[test]
    fn test_cpx_zero_from_low_byte() {
        let (mut mpu, mut bus) = setup(0x0000, &[0x8C, 0x00, 0x00]); // CPX #$0000
        mpu.regs.index_register = 0x0100;
        mpu.regs.status.set_carry(true);
        mpu.step(&mut bus).unwrap();
        // Difference is 0x0100; only its low byte feeds N/Z.
        assert!(mpu.regs.status.zero());
        assert!(!mpu.regs.status.negative());
        // CPX never touches carry.
        assert!(mpu.regs.status.carry());
    }

    #[test]
    fn test_lds_ldx_flags() {
        let (mut mpu, mut bus) = setup(0x0000, &[0xCE, 0x80, 0x00, 0x8E, 0x00, 0x00]);
        mpu.step(&mut bus).unwrap(); // LDX #$8000
        assert_eq!(mpu.regs.index_register, 0x8000);
        assert!(mpu.regs.status.negative());
        assert!(!mpu.regs.status.zero());
        mpu.step(&mut bus).unwrap(); // LDS #$0000
        assert_eq!(mpu.regs.stack_pointer, 0x0000);
        assert!(mpu.regs.status.zero());
        assert!(!mpu.regs.status.negative());
    }

    #[test]
    fn test_sts_stx_store_word_without_flags() {
        let (mut mpu, mut bus) = setup(0x0000, &[0xFF, 0x00, 0x40]); // STX $0040
        mpu.regs.index_register = 0xBEEF;
        mpu.regs.status.set_zero(true);
        mpu.step(&mut bus).unwrap();
        assert_eq!(bus.read_byte(0x0040), 0xBE);
        assert_eq!(bus.read_byte(0x0041), 0xEF);
        assert!(mpu.regs.status.zero());
    }

    #[test]
    fn test_tsx_txs_offset_by_one() {
        let (mut mpu, mut bus) = setup(0x0000, &[0x30, 0x35]); // TSX, TXS
        mpu.regs.stack_pointer = 0x00E0;
        mpu.step(&mut bus).unwrap();
        assert_eq!(mpu.regs.index_register, 0x00E1);
        mpu.regs.index_register = 0x0100;
        mpu.step(&mut bus).unwrap();
        assert_eq!(mpu.regs.stack_pointer, 0x00FF);
    }

    #[test]
    fn test_hcf_is_fatal() {
        let (mut mpu, mut bus) = setup(0x0000, &[0x14]);
        let error = mpu.step(&mut bus).unwrap_err();
        assert_eq!(
            error,
            CpuError::UndocumentedOpcode {
                opcode: 0x14,
                program_counter: 0x0001,
            }
        );
        assert!(!mpu.is_running());
        // A halted CPU refuses further slices.
        assert_eq!(mpu.run_slice(&mut bus).unwrap(), 0);
    }

    #[test]
    fn test_illegal_opcodes_are_quiet_no_ops() {
        let (mut mpu, mut bus) = setup(0x0000, &[0x00, 0x02]);
        assert_eq!(mpu.step(&mut bus).unwrap(), 2);
        assert_eq!(mpu.step(&mut bus).unwrap(), 2);
        assert_eq!(mpu.regs.program_counter, 0x0002);
    }

    #[test]
    fn test_run_slice_consumes_full_budget() {
        // Zero-filled memory decodes as 2-cycle illegal no-ops.
        let (mut mpu, mut bus) = setup(0x0000, &[]);
        let cycles = mpu.run_slice(&mut bus).unwrap();
        assert_eq!(cycles, SLICE_CYCLE_BUDGET);
        assert_eq!(mpu.regs.program_counter, (SLICE_CYCLE_BUDGET / 2) as u16);
    }

    #[test]
    fn test_relative_offset_128_branches_forward() {
        // Offset 0x80 is taken as +128 rather than -128.
        let (mut mpu, mut bus) = setup(0x0000, &[0x20, 0x80]);
        mpu.step(&mut bus).unwrap();
        assert_eq!(mpu.regs.program_counter, 0x0082);
    }
}
