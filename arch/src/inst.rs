use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Operand arity category of an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstKind {
    None,
    Single,
    Double,
    Jump,
}

/// Operation width, also the B/W bit of the opcode word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Size {
    Word,
    Byte,
}

impl Size {
    pub fn bw_bit(self) -> u16 {
        match self {
            Size::Word => 0,
            Size::Byte => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstDesc {
    pub mnemonic: &'static str,
    pub opcode: u16,
    pub kind: InstKind,
    pub size: Size,
}

const fn inst(mnemonic: &'static str, opcode: u16, kind: InstKind, size: Size) -> InstDesc {
    InstDesc {
        mnemonic,
        opcode,
        kind,
        size,
    }
}

use InstKind::{Double, Jump, None as NoOperand, Single};
use Size::{Byte, Word};

/// The MSP430 mnemonic catalog. Double/single opcodes are the field value
/// packed by `encode`; RETI carries its full opcode word.
const INST_LIST: &[InstDesc] = &[
    inst("ADD", 0x5, Double, Word),
    inst("ADD.B", 0x5, Double, Byte),
    inst("ADD.W", 0x5, Double, Word),
    inst("ADDC", 0x6, Double, Word),
    inst("ADDC.B", 0x6, Double, Byte),
    inst("ADDC.W", 0x6, Double, Word),
    inst("AND", 0xF, Double, Word),
    inst("AND.B", 0xF, Double, Byte),
    inst("AND.W", 0xF, Double, Word),
    inst("BIC", 0xC, Double, Word),
    inst("BIC.B", 0xC, Double, Byte),
    inst("BIC.W", 0xC, Double, Word),
    inst("BIS", 0xD, Double, Word),
    inst("BIS.B", 0xD, Double, Byte),
    inst("BIS.W", 0xD, Double, Word),
    inst("BIT", 0xB, Double, Word),
    inst("BIT.B", 0xB, Double, Byte),
    inst("BIT.W", 0xB, Double, Word),
    inst("CALL", 0x25, Single, Word),
    inst("CMP", 0x9, Double, Word),
    inst("CMP.B", 0x9, Double, Byte),
    inst("CMP.W", 0x9, Double, Word),
    inst("DADD", 0xA, Double, Word),
    inst("DADD.B", 0xA, Double, Byte),
    inst("DADD.W", 0xA, Double, Word),
    inst("JC", 0xB, Jump, Word),
    inst("JEQ", 0x9, Jump, Word),
    inst("JGE", 0xD, Jump, Word),
    inst("JHS", 0xB, Jump, Word),
    inst("JL", 0xE, Jump, Word),
    inst("JLO", 0xA, Jump, Word),
    inst("JMP", 0xF, Jump, Word),
    inst("JN", 0xC, Jump, Word),
    inst("JNC", 0xA, Jump, Word),
    inst("JNE", 0x8, Jump, Word),
    inst("JNZ", 0x8, Jump, Word),
    inst("JZ", 0x9, Jump, Word),
    inst("MOV", 0x4, Double, Word),
    inst("MOV.B", 0x4, Double, Byte),
    inst("MOV.W", 0x4, Double, Word),
    inst("PUSH", 0x24, Single, Word),
    inst("PUSH.B", 0x24, Single, Byte),
    inst("PUSH.W", 0x24, Single, Word),
    inst("RETI", 0x1300, NoOperand, Word),
    inst("RRA", 0x22, Single, Word),
    inst("RRA.B", 0x22, Single, Byte),
    inst("RRA.W", 0x22, Single, Word),
    inst("RRC", 0x20, Single, Word),
    inst("RRC.B", 0x20, Single, Byte),
    inst("RRC.W", 0x20, Single, Word),
    inst("SUB", 0x8, Double, Word),
    inst("SUB.B", 0x8, Double, Byte),
    inst("SUB.W", 0x8, Double, Word),
    inst("SUBC", 0x7, Double, Word),
    inst("SUBC.B", 0x7, Double, Byte),
    inst("SUBC.W", 0x7, Double, Word),
    inst("SWPB", 0x21, Single, Word),
    inst("SXT", 0x23, Single, Word),
    inst("XOR", 0xE, Double, Word),
    inst("XOR.B", 0xE, Double, Byte),
    inst("XOR.W", 0xE, Double, Word),
];

static INST_TABLE: Lazy<HashMap<&'static str, &'static InstDesc>> =
    Lazy::new(|| INST_LIST.iter().map(|d| (d.mnemonic, d)).collect());

/// Case-insensitive exact-match lookup into the instruction catalog.
pub fn get_inst(name: &str) -> Option<&'static InstDesc> {
    INST_TABLE
        .get(name.to_ascii_uppercase().as_str())
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(get_inst("mov").unwrap().opcode, 0x4);
        assert_eq!(get_inst("MOV").unwrap().opcode, 0x4);
        assert_eq!(get_inst("Mov.b").unwrap().size, Size::Byte);
        assert!(get_inst("MOVE").is_none());
    }

    #[test]
    fn suffix_variants() {
        assert_eq!(get_inst("ADD.B").unwrap().size, Size::Byte);
        assert_eq!(get_inst("ADD.W").unwrap().size, Size::Word);
        assert_eq!(get_inst("ADD").unwrap().size, Size::Word);
    }

    #[test]
    fn categories() {
        assert_eq!(get_inst("RETI").unwrap().kind, InstKind::None);
        assert_eq!(get_inst("RETI").unwrap().opcode, 0x1300);
        assert_eq!(get_inst("PUSH").unwrap().kind, InstKind::Single);
        assert_eq!(get_inst("JMP").unwrap().kind, InstKind::Jump);
        assert_eq!(get_inst("JMP").unwrap().opcode, 0xF);
        assert_eq!(get_inst("CMP").unwrap().kind, InstKind::Double);
    }
}
