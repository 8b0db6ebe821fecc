pub mod directive;
pub mod encoder;
pub mod error;
pub mod operand;
pub mod parser;
pub mod record;
pub mod srec;
pub mod symbol;
pub mod util;

use std::io::{self, Write};

use crate::error::{AsmError, Diag};
use crate::record::{Record, RecordKind};
use crate::srec::SrecWriter;
use crate::symbol::{SymKind, SymbolTable};

/// Input lines are truncated to this many bytes.
pub const LINE_LEN: usize = 256;
/// Highest address the location counter may reach.
pub const MAX_LC: i32 = 65535;

/// The whole of the assembler's mutable state, threaded through both
/// passes. `listing` receives the human-readable diagnostics stream.
pub struct Assembler<W: Write> {
    pub symbols: SymbolTable,
    pub records: Vec<Record>,
    pub diags: Vec<Diag>,
    pub lc: i32,
    pub line: u32,
    pub start_address: u16,
    pub listing: W,
    /// Label preceding the statement currently being analyzed.
    pub(crate) label: Option<String>,
    /// Set by END; no further lines are consumed.
    pub(crate) done: bool,
    /// Latched when the LC would pass `MAX_LC`; stops further allocation.
    pub(crate) max_lc: bool,
}

impl<W: Write> Assembler<W> {
    pub fn new(listing: W) -> Self {
        Assembler {
            symbols: SymbolTable::new(),
            records: Vec::new(),
            diags: Vec::new(),
            lc: 0,
            line: 1,
            start_address: 0,
            listing,
            label: None,
            done: false,
            max_lc: false,
        }
    }

    /// Records a diagnostic against the current line and keeps going;
    /// pass one is best-effort.
    pub(crate) fn error(&mut self, error: AsmError) {
        let _ = writeln!(self.listing, "ERROR: {error}");
        self.diags.push(Diag {
            line: self.line,
            error,
        });
    }

    pub(crate) fn push_record(&mut self, kind: RecordKind) {
        self.records.push(Record {
            line: self.line,
            lc: self.lc as u16,
            kind,
        });
    }

    pub(crate) fn advance_lc(&mut self, by: i32) {
        if self.max_lc {
            return;
        }
        if self.lc + by <= MAX_LC {
            self.lc += by;
        } else {
            self.max_lc = true;
            self.error(AsmError::MaxLc);
        }
    }

    pub(crate) fn set_lc(&mut self, to: i32) {
        // callers validate the range; ORG rejects bad addresses itself
        self.lc = to;
    }

    /// Binds the pending label, if any, to `value`. A forward reference is
    /// promoted; a fresh name is inserted; anything else is a
    /// redefinition.
    pub(crate) fn bind_label(&mut self, value: i32) {
        let Some(name) = self.label.take() else {
            return;
        };
        let result = match self.symbols.kind(&name) {
            None => self.symbols.insert(&name, value, SymKind::Label),
            Some(SymKind::Unresolved) => self.symbols.update(&name, value, SymKind::Label),
            Some(_) => Err(AsmError::DuplicateSymbol(name.clone())),
        };
        if let Err(error) = result {
            self.error(error);
        }
    }

    pub fn dump_symbols(&mut self) {
        let _ = self.symbols.dump(&mut self.listing);
    }
}

/// Result of running both passes over an in-memory source.
pub struct Output {
    pub srec: String,
    pub listing: String,
    pub diags: Vec<Diag>,
    pub symbols: SymbolTable,
}

/// Convenience driver: both passes over a source string, S-records and
/// listing collected into strings. The S-record text is empty when the
/// second-pass gate fails.
pub fn assemble(source: &str) -> io::Result<Output> {
    let mut asm = Assembler::new(Vec::new());
    asm.first_pass(source.as_bytes())?;
    asm.dump_symbols();
    let mut srec_buf = Vec::new();
    if asm.clear_for_second_pass() {
        let mut srec = SrecWriter::new(&mut srec_buf);
        asm.second_pass(&mut srec)?;
    }
    Ok(Output {
        srec: String::from_utf8_lossy(&srec_buf).into_owned(),
        listing: String::from_utf8_lossy(&asm.listing).into_owned(),
        diags: asm.diags,
        symbols: asm.symbols,
    })
}
