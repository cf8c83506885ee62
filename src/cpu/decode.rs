//! Opcode metadata: addressing modes, mnemonics, and the decode table.
//!
//! The hardware's 256-slot opcode matrix is carried as two compressed
//! constants: [`DISPATCH_TABLE`] packs each opcode's addressing mode
//! into its low nibble and its cycle count into the high nibble, and
//! [`MNEMONIC_TABLE`] names each slot (`IOP` marks the unimplemented
//! ones). [`OpcodeTable::decode`] expands both into the 256-entry
//! lookup table the execution loop dispatches through.

use serde::{Deserialize, Serialize};

/// Mode/cycle metadata, one byte per opcode: low nibble selects one of
/// the 16 addressing modes, high nibble is the instruction's cycle
/// count.
pub const DISPATCH_TABLE: [u8; 256] = [
    0x20, 0x23, 0x20, 0x20, 0x20, 0x20, 0x23, 0x23, 0x43, 0x43, 0x23, 0x23, 0x23, 0x23, 0x23, 0x23,
    0x23, 0x23, 0x20, 0x20, 0x21, 0x20, 0x23, 0x23, 0x20, 0x23, 0x20, 0x23, 0x20, 0x20, 0x20, 0x20,
    0x44, 0x20, 0x44, 0x44, 0x44, 0x44, 0x44, 0x44, 0x44, 0x44, 0x44, 0x44, 0x44, 0x44, 0x44, 0x44,
    0x43, 0x43, 0x43, 0x43, 0x43, 0x43, 0x43, 0x43, 0x20, 0x53, 0x20, 0xA3, 0x20, 0x20, 0x93, 0xC3,
    0x23, 0x20, 0x20, 0x23, 0x23, 0x20, 0x23, 0x23, 0x23, 0x23, 0x23, 0x20, 0x23, 0x23, 0x20, 0x23,
    0x23, 0x20, 0x20, 0x23, 0x23, 0x20, 0x23, 0x23, 0x23, 0x23, 0x23, 0x20, 0x23, 0x23, 0x20, 0x23,
    0x75, 0x20, 0x20, 0x75, 0x75, 0x20, 0x75, 0x75, 0x75, 0x75, 0x75, 0x20, 0x75, 0x75, 0x47, 0x77,
    0x6D, 0x20, 0x20, 0x6D, 0x6D, 0x20, 0x6D, 0x6D, 0x6D, 0x6D, 0x6D, 0x20, 0x6D, 0x6D, 0x3F, 0x6F,
    0x28, 0x28, 0x28, 0x20, 0x28, 0x28, 0x28, 0x21, 0x28, 0x28, 0x28, 0x28, 0x3C, 0x84, 0x3C, 0x21,
    0x39, 0x39, 0x39, 0x20, 0x39, 0x39, 0x39, 0x4B, 0x39, 0x39, 0x39, 0x39, 0x4A, 0x21, 0x4A, 0x5B,
    0x55, 0x55, 0x55, 0x20, 0x55, 0x55, 0x55, 0x67, 0x55, 0x55, 0x55, 0x55, 0x66, 0x87, 0x66, 0x77,
    0x4D, 0x4D, 0x4D, 0x20, 0x4D, 0x4D, 0x4D, 0x5F, 0x4D, 0x4D, 0x4D, 0x4D, 0x5E, 0x9F, 0x5E, 0x6F,
    0x28, 0x28, 0x28, 0x20, 0x28, 0x28, 0x28, 0x21, 0x28, 0x28, 0x28, 0x28, 0x20, 0x20, 0x3C, 0x21,
    0x39, 0x39, 0x39, 0x20, 0x39, 0x39, 0x39, 0x4B, 0x39, 0x39, 0x39, 0x39, 0x20, 0x21, 0x4A, 0x5B,
    0x55, 0x55, 0x55, 0x20, 0x55, 0x55, 0x55, 0x67, 0x55, 0x55, 0x55, 0x55, 0x20, 0x20, 0x66, 0x77,
    0x4D, 0x4D, 0x4D, 0x20, 0x4D, 0x4D, 0x4D, 0x5F, 0x4D, 0x4D, 0x4D, 0x4D, 0x20, 0x20, 0x5E, 0x6F,
];

/// One mnemonic per opcode slot, 16 per row.
pub const MNEMONIC_TABLE: &str = concat!(
    "IOP NOP IOP IOP IOP IOP TAP TPA INX DEX CLV SEV CLC SEC CLI SEI ",
    "SBA CBA IOP IOP HCF IOP TAB TBA IOP DAA IOP ABA IOP IOP IOP IOP ",
    "JMP IOP BHI BLS BCC BCS BNE BEQ BVC BVS BPL BMI BGE BLT BGT BLE ",
    "TSX INS PULA PULB DES TXS PSHA PSHB IOP RTS IOP RTI IOP IOP WAI SWI ",
    "NEGA IOP IOP COMA LSRA IOP RORA ASRA ASLA ROLA DECA IOP INCA TSTA IOP CLRA ",
    "NEGB IOP IOP COMB LSRB IOP RORB ASRB ASLB ROLB DECB IOP INCB TSTB IOP CLRB ",
    "NEG IOP IOP COM LSR IOP ROR ASR ASL ROL DEC IOP INC TST JMP CLR ",
    "NEG IOP IOP COM LSR IOP ROR ASR ASL ROL DEC IOP INC TST JMP CLR ",
    "SUBA CMPA SBCA IOP ANDA BITA LDAA HCF EORA ADCA ORAA ADDA CPX BSR LDS HCF ",
    "SUBA CMPA SBCA IOP ANDA BITA LDAA STAA EORA ADCA ORAA ADDA CPX HCF LDS STS ",
    "SUBA CMPA SBCA IOP ANDA BITA LDAA STAA EORA ADCA ORAA ADDA CPX JSR LDS STS ",
    "SUBA CMPA SBCA IOP ANDA BITA LDAA STAA EORA ADCA ORAA ADDA CPX JSR LDS STS ",
    "SUBB CMPB SBCB IOP ANDB BITB LDAB HCF EORB ADCB ORAB ADDB IOP IOP LDX HCF ",
    "SUBB CMPB SBCB IOP ANDB BITB LDAB STAB EORB ADCB ORAB ADDB IOP HCF LDX STX ",
    "SUBB CMPB SBCB IOP ANDB BITB LDAB STAB EORB ADCB ORAB ADDB IOP IOP LDX STX ",
    "SUBB CMPB SBCB IOP ANDB BITB LDAB STAB EORB ADCB ORAB ADDB IOP IOP LDX STX",
);

/// How an opcode locates its operand.
///
/// The discriminants match the low-nibble encoding of
/// [`DISPATCH_TABLE`]. Read variants produce a value; write variants
/// only record the effective address for the instruction to store
/// through later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressingMode {
    /// Illegal opcode slot; no operand.
    Invalid = 0,
    /// Undocumented opcode slot; no operand.
    Undocumented = 1,
    /// Reserved slot, unused by the opcode matrix.
    Reserved = 2,
    /// No operand bytes.
    Inherent = 3,
    /// One signed offset byte relative to the program counter.
    Relative = 4,
    IndexedByteRead = 5,
    IndexedWordRead = 6,
    IndexedWordWrite = 7,
    ImmediateByte = 8,
    DirectByteRead = 9,
    DirectWordRead = 10,
    DirectWordWrite = 11,
    ImmediateWord = 12,
    ExtendedByteRead = 13,
    ExtendedWordRead = 14,
    ExtendedWordWrite = 15,
}

impl AddressingMode {
    /// Decode a mode from the low nibble of a dispatch-table byte.
    pub fn from_nibble(nibble: u8) -> Self {
        match nibble & 0x0F {
            0 => Self::Invalid,
            1 => Self::Undocumented,
            2 => Self::Reserved,
            3 => Self::Inherent,
            4 => Self::Relative,
            5 => Self::IndexedByteRead,
            6 => Self::IndexedWordRead,
            7 => Self::IndexedWordWrite,
            8 => Self::ImmediateByte,
            9 => Self::DirectByteRead,
            10 => Self::DirectWordRead,
            11 => Self::DirectWordWrite,
            12 => Self::ImmediateWord,
            13 => Self::ExtendedByteRead,
            14 => Self::ExtendedWordRead,
            _ => Self::ExtendedWordWrite,
        }
    }
}

/// Instruction mnemonics, one variant per distinct name in
/// [`MNEMONIC_TABLE`]. Bare shift/increment/test/clear names (no A/B
/// suffix) are the memory forms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mnemonic {
    Aba, Adca, Adcb, Adda, Addb, Anda, Andb, Asl, Asla, Aslb, Asr, Asra, Asrb,
    Bcc, Bcs, Beq, Bge, Bgt, Bhi, Bita, Bitb, Ble, Bls, Blt, Bmi, Bne, Bpl,
    Bsr, Bvc, Bvs, Cba, Clc, Cli, Clr, Clra, Clrb, Clv, Cmpa, Cmpb, Com,
    Coma, Comb, Cpx, Daa, Dec, Deca, Decb, Des, Dex, Eora, Eorb, Hcf, Inc,
    Inca, Incb, Ins, Inx, Iop, Jmp, Jsr, Ldaa, Ldab, Lds, Ldx, Lsr, Lsra,
    Lsrb, Neg, Nega, Negb, Nop, Oraa, Orab, Psha, Pshb, Pula, Pulb, Rol,
    Rola, Rolb, Ror, Rora, Rorb, Rti, Rts, Sba, Sbca, Sbcb, Sec, Sei, Sev,
    Staa, Stab, Sts, Stx, Suba, Subb, Swi, Tab, Tap, Tba, Tpa, Tst, Tsta,
    Tstb, Tsx, Txs, Wai,
}

impl Mnemonic {
    /// Look up a mnemonic by its table name.
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "ABA" => Self::Aba,
            "ADCA" => Self::Adca,
            "ADCB" => Self::Adcb,
            "ADDA" => Self::Adda,
            "ADDB" => Self::Addb,
            "ANDA" => Self::Anda,
            "ANDB" => Self::Andb,
            "ASL" => Self::Asl,
            "ASLA" => Self::Asla,
            "ASLB" => Self::Aslb,
            "ASR" => Self::Asr,
            "ASRA" => Self::Asra,
            "ASRB" => Self::Asrb,
            "BCC" => Self::Bcc,
            "BCS" => Self::Bcs,
            "BEQ" => Self::Beq,
            "BGE" => Self::Bge,
            "BGT" => Self::Bgt,
            "BHI" => Self::Bhi,
            "BITA" => Self::Bita,
            "BITB" => Self::Bitb,
            "BLE" => Self::Ble,
            "BLS" => Self::Bls,
            "BLT" => Self::Blt,
            "BMI" => Self::Bmi,
            "BNE" => Self::Bne,
            "BPL" => Self::Bpl,
            "BSR" => Self::Bsr,
            "BVC" => Self::Bvc,
            "BVS" => Self::Bvs,
            "CBA" => Self::Cba,
            "CLC" => Self::Clc,
            "CLI" => Self::Cli,
            "CLR" => Self::Clr,
            "CLRA" => Self::Clra,
            "CLRB" => Self::Clrb,
            "CLV" => Self::Clv,
            "CMPA" => Self::Cmpa,
            "CMPB" => Self::Cmpb,
            "COM" => Self::Com,
            "COMA" => Self::Coma,
            "COMB" => Self::Comb,
            "CPX" => Self::Cpx,
            "DAA" => Self::Daa,
            "DEC" => Self::Dec,
            "DECA" => Self::Deca,
            "DECB" => Self::Decb,
            "DES" => Self::Des,
            "DEX" => Self::Dex,
            "EORA" => Self::Eora,
            "EORB" => Self::Eorb,
            "HCF" => Self::Hcf,
            "INC" => Self::Inc,
            "INCA" => Self::Inca,
            "INCB" => Self::Incb,
            "INS" => Self::Ins,
            "INX" => Self::Inx,
            "IOP" => Self::Iop,
            "JMP" => Self::Jmp,
            "JSR" => Self::Jsr,
            "LDAA" => Self::Ldaa,
            "LDAB" => Self::Ldab,
            "LDS" => Self::Lds,
            "LDX" => Self::Ldx,
            "LSR" => Self::Lsr,
            "LSRA" => Self::Lsra,
            "LSRB" => Self::Lsrb,
            "NEG" => Self::Neg,
            "NEGA" => Self::Nega,
            "NEGB" => Self::Negb,
            "NOP" => Self::Nop,
            "ORAA" => Self::Oraa,
            "ORAB" => Self::Orab,
            "PSHA" => Self::Psha,
            "PSHB" => Self::Pshb,
            "PULA" => Self::Pula,
            "PULB" => Self::Pulb,
            "ROL" => Self::Rol,
            "ROLA" => Self::Rola,
            "ROLB" => Self::Rolb,
            "ROR" => Self::Ror,
            "RORA" => Self::Rora,
            "RORB" => Self::Rorb,
            "RTI" => Self::Rti,
            "RTS" => Self::Rts,
            "SBA" => Self::Sba,
            "SBCA" => Self::Sbca,
            "SBCB" => Self::Sbcb,
            "SEC" => Self::Sec,
            "SEI" => Self::Sei,
            "SEV" => Self::Sev,
            "STAA" => Self::Staa,
            "STAB" => Self::Stab,
            "STS" => Self::Sts,
            "STX" => Self::Stx,
            "SUBA" => Self::Suba,
            "SUBB" => Self::Subb,
            "SWI" => Self::Swi,
            "TAB" => Self::Tab,
            "TAP" => Self::Tap,
            "TBA" => Self::Tba,
            "TPA" => Self::Tpa,
            "TST" => Self::Tst,
            "TSTA" => Self::Tsta,
            "TSTB" => Self::Tstb,
            "TSX" => Self::Tsx,
            "TXS" => Self::Txs,
            "WAI" => Self::Wai,
            _ => return None,
        })
    }
}

/// One decoded opcode slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpcodeEntry {
    pub mnemonic: Mnemonic,
    pub mode: AddressingMode,
    pub cycles: u8,
}

/// The expanded 256-entry decode table.
#[derive(Clone)]
pub struct OpcodeTable {
    entries: [OpcodeEntry; 256],
}

impl OpcodeTable {
    /// Expand the compressed metadata into the lookup table.
    pub fn decode() -> Self {
        let mut entries = [OpcodeEntry {
            mnemonic: Mnemonic::Iop,
            mode: AddressingMode::Invalid,
            cycles: 2,
        }; 256];
        for (opcode, name) in MNEMONIC_TABLE.split_whitespace().enumerate() {
            let packed = DISPATCH_TABLE[opcode];
            entries[opcode] = OpcodeEntry {
                mnemonic: Mnemonic::parse(name).unwrap_or_else(|| {
                    panic!("corrupt mnemonic table at opcode {opcode:#04X}: {name:?}")
                }),
                mode: AddressingMode::from_nibble(packed & 0x0F),
                cycles: packed >> 4,
            };
        }
        Self { entries }
    }

    /// The entry for one opcode byte.
    #[inline]
    pub fn entry(&self, opcode: u8) -> OpcodeEntry {
        self.entries[opcode as usize]
    }
}

impl Default for OpcodeTable {
    fn default() -> Self {
        Self::decode()
    }
}

impl std::fmt::Debug for OpcodeTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpcodeTable").finish_non_exhaustive()
    }
}
