use arch::addr::AddrMode;
use arch::inst::{InstDesc, Size};

/// A jump operand as written in the source: either a label (re-resolved in
/// pass two, so forward references pick up final values) or a literal
/// absolute address.
#[derive(Debug, Clone, PartialEq)]
pub enum JumpTarget {
    Symbol(String),
    Literal(i32),
}

/// One per-line encoding task produced by pass one. Operand strings are
/// stored with their sigil stripped; Indexed operands keep the
/// `BASE(INDEX)` form.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordKind {
    InstNone {
        inst: &'static InstDesc,
    },
    InstSingle {
        inst: &'static InstDesc,
        src: String,
        src_mode: AddrMode,
        /// Immediate collapses into the constant generator; decided in
        /// pass one so the layout both passes see is identical.
        src_congen: bool,
    },
    InstDouble {
        inst: &'static InstDesc,
        src: String,
        dst: String,
        src_mode: AddrMode,
        dst_mode: AddrMode,
        src_congen: bool,
    },
    Jump {
        inst: &'static InstDesc,
        target: JumpTarget,
    },
    Data {
        value: u16,
        width: Size,
    },
    Ascii {
        text: String,
    },
    Origin {
        address: u16,
    },
    Reserve {
        count: u16,
    },
}

/// IR entry: the encoding task plus the source line and the LC captured
/// when the record was appended.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub line: u32,
    pub lc: u16,
    pub kind: RecordKind,
}
