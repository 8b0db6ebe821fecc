use serde::{Deserialize, Serialize};

/// The seven operand addressing modes. A line whose operand fits none of
/// them is rejected during the first pass, so no `Invalid` sentinel is
/// carried here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddrMode {
    Register,
    Indexed,
    Relative,
    Absolute,
    Indirect,
    IndirectAutoInc,
    Immediate,
}

impl AddrMode {
    /// Source addressing field ("As") of the opcode word.
    pub fn as_bits(self) -> u16 {
        match self {
            AddrMode::Register => 0,
            AddrMode::Indexed | AddrMode::Relative | AddrMode::Absolute => 1,
            AddrMode::Indirect => 2,
            AddrMode::IndirectAutoInc | AddrMode::Immediate => 3,
        }
    }

    /// Destination addressing bit ("Ad"); only register-direct clears it.
    pub fn ad_bit(self) -> u16 {
        match self {
            AddrMode::Register => 0,
            _ => 1,
        }
    }

    /// Bytes of extension word the operand occupies after the opcode word.
    /// Constant-generator immediates override this to zero.
    pub fn ext_bytes(self) -> i32 {
        match self {
            AddrMode::Indexed | AddrMode::Relative | AddrMode::Absolute | AddrMode::Immediate => 2,
            AddrMode::Register | AddrMode::Indirect | AddrMode::IndirectAutoInc => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_field_per_mode() {
        assert_eq!(AddrMode::Register.as_bits(), 0);
        assert_eq!(AddrMode::Indexed.as_bits(), 1);
        assert_eq!(AddrMode::Relative.as_bits(), 1);
        assert_eq!(AddrMode::Absolute.as_bits(), 1);
        assert_eq!(AddrMode::Indirect.as_bits(), 2);
        assert_eq!(AddrMode::IndirectAutoInc.as_bits(), 3);
        assert_eq!(AddrMode::Immediate.as_bits(), 3);
    }

    #[test]
    fn extension_bytes() {
        assert_eq!(AddrMode::Register.ext_bytes(), 0);
        assert_eq!(AddrMode::Indirect.ext_bytes(), 0);
        assert_eq!(AddrMode::IndirectAutoInc.ext_bytes(), 0);
        assert_eq!(AddrMode::Immediate.ext_bytes(), 2);
        assert_eq!(AddrMode::Absolute.ext_bytes(), 2);
    }
}
