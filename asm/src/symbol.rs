use indexmap::IndexMap;
use std::io::{self, Write};

use arch::reg::Reg;

use crate::error::AsmError;

pub const MAX_NAME_LEN: usize = 32;
const MAX_VALUE: i32 = 65535;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymKind {
    Register,
    Label,
    /// Referenced before its defining line has been seen.
    Unresolved,
}

impl SymKind {
    fn name(self) -> &'static str {
        match self {
            SymKind::Register => "Register",
            SymKind::Label => "Label",
            SymKind::Unresolved => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    pub value: i32,
    pub kind: SymKind,
}

/// Name-keyed symbol store. Insertion order is kept for the listing dump.
#[derive(Debug)]
pub struct SymbolTable {
    entries: IndexMap<String, Symbol>,
}

impl SymbolTable {
    /// A fresh table is pre-seeded with the register file and its aliases.
    pub fn new() -> Self {
        let mut table = SymbolTable {
            entries: IndexMap::new(),
        };
        for n in 0..16u8 {
            let reg = Reg::from(n);
            table.seed(&reg.to_string(), n as i32);
            for alias in reg.aliases() {
                table.seed(alias, n as i32);
            }
        }
        table
    }

    fn seed(&mut self, name: &str, value: i32) {
        self.entries.insert(
            name.to_string(),
            Symbol {
                value,
                kind: SymKind::Register,
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.entries.get(name)
    }

    pub fn kind(&self, name: &str) -> Option<SymKind> {
        self.get(name).map(|s| s.kind)
    }

    pub fn insert(&mut self, name: &str, value: i32, kind: SymKind) -> Result<(), AsmError> {
        if self.entries.contains_key(name) {
            return Err(AsmError::DuplicateSymbol(name.to_string()));
        }
        if kind != SymKind::Register && !(0..=MAX_VALUE).contains(&value) {
            return Err(AsmError::ValueOutOfRange(name.to_string(), value));
        }
        self.entries.insert(name.to_string(), Symbol { value, kind });
        Ok(())
    }

    pub fn update(&mut self, name: &str, value: i32, kind: SymKind) -> Result<(), AsmError> {
        if kind != SymKind::Register && !(0..=MAX_VALUE).contains(&value) {
            return Err(AsmError::ValueOutOfRange(name.to_string(), value));
        }
        match self.entries.get_mut(name) {
            Some(entry) => {
                entry.value = value;
                entry.kind = kind;
                Ok(())
            }
            None => Err(AsmError::UnknownSymbol(name.to_string())),
        }
    }

    /// Names still unresolved at the end of pass one, in insertion order.
    pub fn unresolved(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, sym)| sym.kind == SymKind::Unresolved)
            .map(|(name, _)| name.as_str())
    }

    pub fn has_unresolved(&self) -> bool {
        self.unresolved().next().is_some()
    }

    pub fn dump<W: Write>(&self, w: &mut W) -> io::Result<()> {
        writeln!(w, "\n--------------    Symbol Table    --------------")?;
        for (name, sym) in &self.entries {
            writeln!(
                w,
                "Name: {}\t\tValue: {}\t\tType: {}",
                name,
                sym.value,
                sym.kind.name()
            )?;
        }
        Ok(())
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
