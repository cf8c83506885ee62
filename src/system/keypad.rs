//! The trainer's hexadecimal keypad.
//!
//! Keys are wired into three I/O rows polled by the monitor. A key's
//! packed code carries its row wiring: the high nibble selects the bit
//! within the row, the low nibble the row's address offset from
//! 0xC000. Pressing pulls the bit low, releasing lets it float high.
//! The RESET key is not matrixed at all; it is hard-wired to the CPU
//! reset line and has no code.

/// Base of the keypad I/O window.
pub const KEYPAD_BASE: u16 = 0xC000;

/// The row addresses the monitor polls (and reset forces to 0xFF).
pub const KEYPAD_ROWS: [u16; 3] = [0xC003, 0xC005, 0xC006];

/// One trainer key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Zero,
    Acca,
    Accb,
    Pc,
    Index,
    Cc,
    Sp,
    Rti,
    Ss,
    Br,
    Auto,
    Back,
    Chan,
    Do,
    Exam,
    Fwd,
    Reset,
}

impl Key {
    pub const ALL: [Key; 17] = [
        Key::Zero,
        Key::Acca,
        Key::Accb,
        Key::Pc,
        Key::Index,
        Key::Cc,
        Key::Sp,
        Key::Rti,
        Key::Ss,
        Key::Br,
        Key::Auto,
        Key::Back,
        Key::Chan,
        Key::Do,
        Key::Exam,
        Key::Fwd,
        Key::Reset,
    ];

    /// The packed keypad code, or `None` for the hard-wired RESET key.
    pub fn code(self) -> Option<u8> {
        match self {
            Key::Zero => Some(0x56),
            Key::Acca => Some(0x46),
            Key::Accb => Some(0x45),
            Key::Pc => Some(0x43),
            Key::Index => Some(0x36),
            Key::Cc => Some(0x35),
            Key::Sp => Some(0x33),
            Key::Rti => Some(0x26),
            Key::Ss => Some(0x25),
            Key::Br => Some(0x23),
            Key::Auto => Some(0x16),
            Key::Back => Some(0x15),
            Key::Chan => Some(0x13),
            Key::Do => Some(0x06),
            Key::Exam => Some(0x05),
            Key::Fwd => Some(0x03),
            Key::Reset => None,
        }
    }

    /// The keycap legend.
    pub fn label(self) -> &'static str {
        match self {
            Key::Zero => "0",
            Key::Acca => "ACCA / 1",
            Key::Accb => "ACCB / 2",
            Key::Pc => "PC / 3",
            Key::Index => "INDEX / 4",
            Key::Cc => "CC / 5",
            Key::Sp => "SP / 6",
            Key::Rti => "RTI / 7",
            Key::Ss => "SS / 8",
            Key::Br => "BR / 9",
            Key::Auto => "AUTO / A",
            Key::Back => "BACK / B",
            Key::Chan => "CHAN / C",
            Key::Do => "DO / D",
            Key::Exam => "EXAM / E",
            Key::Fwd => "FWD / F",
            Key::Reset => "RESET",
        }
    }

    /// What the monitor does when the key is pressed.
    pub fn function(self) -> &'static str {
        match self {
            Key::Zero => "Hex digit 0",
            Key::Acca => "View contents of Accumulator A register",
            Key::Accb => "View contents of Accumulator B register",
            Key::Pc => "View contents of Program Counter register",
            Key::Index => "View contents of Index Pointer register",
            Key::Cc => "View contents of Condition Codes register",
            Key::Sp => "View contents of Stack Pointer register",
            Key::Rti => "Return from interrupt",
            Key::Ss => "Single step",
            Key::Br => "Set breakpoint",
            Key::Auto => "Start entering hex at a specified address",
            Key::Back => "Examine mode: move address back",
            Key::Chan => "Change hex at the selected address or register",
            Key::Do => "Execute RAM at a given address",
            Key::Exam => "Start viewing hex at a specified address",
            Key::Fwd => "Examine mode: move address forward",
            Key::Reset => "Reset the CPU",
        }
    }
}

/// The key chart the CLI prints.
pub fn key_chart() -> String {
    let mut chart = String::from("Trainer key   Function\n");
    for key in Key::ALL {
        chart.push_str(&format!("{:<13} {}\n", key.label(), key.function()));
    }
    chart
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_address_known_rows() {
        for key in Key::ALL {
            if let Some(code) = key.code() {
                let address = KEYPAD_BASE | u16::from(code & 0x0F);
                assert!(
                    KEYPAD_ROWS.contains(&address),
                    "{key:?} maps outside the keypad rows"
                );
                assert!(code >> 4 <= 7, "{key:?} selects a bit past the byte");
            }
        }
    }

    #[test]
    fn test_reset_has_no_code() {
        assert_eq!(Key::Reset.code(), None);
    }

    #[test]
    fn test_chart_lists_every_key() {
        let chart = key_chart();
        assert_eq!(chart.lines().count(), 1 + Key::ALL.len());
    }
}
