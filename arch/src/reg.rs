use num_enum::{FromPrimitive, IntoPrimitive};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// MSP430 register file. R0..R2 carry the architectural aliases PC, SP
/// and SR; R2 and R3 double as the constant generators.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Default,
    FromPrimitive,
    IntoPrimitive,
    EnumString,
    Display,
)]
#[repr(u8)]
#[strum(ascii_case_insensitive)]
pub enum Reg {
    #[default]
    #[strum(to_string = "R0", serialize = "PC")]
    R0,
    #[strum(to_string = "R1", serialize = "SP")]
    R1,
    #[strum(to_string = "R2", serialize = "SR")]
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
    R8,
    R9,
    R10,
    R11,
    R12,
    R13,
    R14,
    R15,
}

pub const PC: Reg = Reg::R0;
pub const SP: Reg = Reg::R1;
pub const SR: Reg = Reg::R2;
pub const CG: Reg = Reg::R3;

impl Reg {
    /// The alias names seeded into a fresh symbol table, in register order.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Reg::R0 => &["PC"],
            Reg::R1 => &["SP"],
            Reg::R2 => &["SR"],
            _ => &[],
        }
    }
}

impl From<Reg> for u16 {
    fn from(reg: Reg) -> u16 {
        reg as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_names_and_aliases() {
        assert_eq!("R0".parse::<Reg>(), Ok(Reg::R0));
        assert_eq!("pc".parse::<Reg>(), Ok(Reg::R0));
        assert_eq!("SP".parse::<Reg>(), Ok(Reg::R1));
        assert_eq!("sr".parse::<Reg>(), Ok(Reg::R2));
        assert_eq!("r15".parse::<Reg>(), Ok(Reg::R15));
        assert!("R16".parse::<Reg>().is_err());
        assert!("hoge".parse::<Reg>().is_err());
    }

    #[test]
    fn alias_table() {
        assert_eq!(Reg::R0.aliases(), &["PC"]);
        assert_eq!(Reg::R1.aliases(), &["SP"]);
        assert_eq!(Reg::R2.aliases(), &["SR"]);
        assert!(Reg::R4.aliases().is_empty());
    }

    #[test]
    fn numbers() {
        assert_eq!(u16::from(Reg::R0), 0);
        assert_eq!(u16::from(Reg::R15), 15);
        assert_eq!(Reg::from(3u8), Reg::R3);
    }
}
