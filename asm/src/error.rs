use arch::directive::Directive;
use thiserror::Error;

/// Everything the assembler can complain about. Each variant renders as the
/// message written to the listing and echoed on the console.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AsmError {
    // --- line classification ---
    #[error("Unclassifiable first token `{0}`")]
    UnknownToken(String),
    #[error("Invalid token after label: `{0}`")]
    InvalidAfterLabel(String),

    // --- symbol table ---
    #[error("Re-defined symbol: `{0}`")]
    DuplicateSymbol(String),
    #[error("Value {1} for symbol `{0}` is out of range")]
    ValueOutOfRange(String, i32),
    #[error("Update of unknown symbol: `{0}`")]
    UnknownSymbol(String),
    #[error("Undeclared label: `{0}`")]
    UnresolvedSymbol(String),

    // --- operands ---
    #[error("Missing operand(s) for instruction")]
    MissingOperand,
    #[error("Missing `,` for double-operand instruction")]
    MissingComma,
    #[error("Missing second operand for double-operand instruction")]
    MissingSecondOperand,
    #[error("Invalid absolute operand: `{0}`")]
    InvalidAbsolute(String),
    #[error("Operand must be a register in register-indirect addressing: `{0}`")]
    IndirectNotRegister(String),
    #[error("Operand cannot be a register in immediate addressing: `{0}`")]
    ImmediateRegister(String),
    #[error("Invalid immediate operand: `{0}`")]
    InvalidImmediate(String),
    #[error("Missing closing parenthesis in `{0}`")]
    MissingParen(String),
    #[error("Index operand is not a register: `{0}`")]
    IndexNotRegister(String),
    #[error("Base address cannot be a register: `{0}`")]
    BaseIsRegister(String),
    #[error("Invalid base address: `{0}`")]
    InvalidBase(String),
    #[error("Unidentifiable operand: `{0}`")]
    UnknownOperand(String),
    #[error("Invalid destination addressing mode")]
    InvalidDestination,
    #[error("Missing jump operand")]
    MissingJumpOperand,
    #[error("Invalid jump operand: `{0}`")]
    InvalidJumpOperand(String),
    #[error("Line contains unnecessary text after instruction")]
    TrailingText,

    // --- directives ---
    #[error("Missing value for {0}")]
    MissingDirectiveValue(Directive),
    #[error("BSS count {0} is out of range")]
    BssOutOfRange(i32),
    #[error("Invalid BSS count: `{0}`")]
    InvalidBssCount(String),
    #[error("Byte values must lie in [0, 255], got {0}")]
    ByteOutOfRange(i32),
    #[error("Word values must lie in [0, 65535], got {0}")]
    WordOutOfRange(i32),
    #[error("String must be enclosed in quotation marks")]
    UnterminatedString,
    #[error("END directive cannot carry a label: `{0}`")]
    LabelOnEnd(String),
    #[error("Missing label for EQU")]
    MissingEquLabel,
    #[error("Cannot equate register `{0}`")]
    EquRegister(String),
    #[error("Invalid equate value: `{0}`")]
    InvalidEquValue(String),
    #[error("Invalid origin: `{0}`")]
    InvalidOrigin(String),

    // --- capacity and range ---
    #[error("Exceeded maximum location counter")]
    MaxLc,
    #[error("Jump distance {0} is beyond the attainable offset")]
    JumpOutOfRange(i32),
    #[error("Invalid odd jump distance {0}")]
    OddJumpDistance(i32),
}

/// One collected diagnostic: the 1-based source line and what went wrong.
#[derive(Debug, Clone, PartialEq)]
pub struct Diag {
    pub line: u32,
    pub error: AsmError,
}
