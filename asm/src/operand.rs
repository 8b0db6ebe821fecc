use std::io::Write;

use arch::addr::AddrMode;
use arch::encode::congen;
use arch::inst::{InstDesc, InstKind};

use crate::error::AsmError;
use crate::record::{JumpTarget, RecordKind};
use crate::symbol::SymKind;
use crate::util::{is_label, parse_number, split_first_token};
use crate::Assembler;

/// Instruction word size; every instruction occupies at least this much.
const WORD_INC: i32 = 2;

/// Addressing mode plus the operand text stored for the second pass,
/// sigils stripped.
struct ClassifiedOperand {
    mode: AddrMode,
    text: String,
    congen: bool,
}

impl<W: Write> Assembler<W> {
    /// Entry point for a line whose first token is an instruction. The
    /// pending label binds to the instruction's address regardless of what
    /// the operand analysis later decides.
    pub(crate) fn analyze_instruction(&mut self, inst: &'static InstDesc, rest: &str) {
        let lc = self.lc;
        self.bind_label(lc);
        match inst.kind {
            InstKind::None => self.check_none(inst, rest),
            InstKind::Jump => self.check_jump(inst, rest),
            InstKind::Single | InstKind::Double => self.operand_parser(inst, rest),
        }
    }

    fn check_none(&mut self, inst: &'static InstDesc, rest: &str) {
        match split_first_token(rest) {
            Some((token, _)) if !token.starts_with(';') => self.error(AsmError::TrailingText),
            _ => {
                self.push_record(RecordKind::InstNone { inst });
                self.advance_lc(WORD_INC);
            }
        }
    }

    fn check_jump(&mut self, inst: &'static InstDesc, rest: &str) {
        let token = match split_first_token(rest) {
            Some((token, _)) if !token.starts_with(';') => token,
            _ => return self.error(AsmError::MissingJumpOperand),
        };
        let target = if is_label(token) {
            match self.symbols.kind(token) {
                Some(SymKind::Register) => {
                    return self.error(AsmError::InvalidJumpOperand(token.to_string()));
                }
                Some(_) => {}
                None => {
                    if let Err(error) = self.symbols.insert(token, 0, SymKind::Unresolved) {
                        return self.error(error);
                    }
                }
            }
            JumpTarget::Symbol(token.to_string())
        } else if let Some(value) = parse_number(token) {
            JumpTarget::Literal(value)
        } else {
            return self.error(AsmError::InvalidJumpOperand(token.to_string()));
        };
        self.push_record(RecordKind::Jump { inst, target });
        self.advance_lc(WORD_INC);
    }

    fn operand_parser(&mut self, inst: &'static InstDesc, rest: &str) {
        let (src, dst) = match tokenize_operands(rest, inst.kind) {
            Ok(pair) => pair,
            Err(error) => return self.error(error),
        };

        let src = match self.check_operand(src, false) {
            Ok(op) => op,
            Err(error) => return self.error(error),
        };

        if inst.kind == InstKind::Single {
            let ext = if src.congen { 0 } else { src.mode.ext_bytes() };
            self.push_record(RecordKind::InstSingle {
                inst,
                src: src.text,
                src_mode: src.mode,
                src_congen: src.congen,
            });
            self.advance_lc(WORD_INC + ext);
            return;
        }

        // dst was present or tokenize_operands would have failed
        let dst = match self.check_operand(dst.unwrap_or_default(), true) {
            Ok(op) => op,
            Err(error) => return self.error(error),
        };

        let src_ext = if src.congen { 0 } else { src.mode.ext_bytes() };
        let dst_ext = dst.mode.ext_bytes();
        self.push_record(RecordKind::InstDouble {
            inst,
            src: src.text,
            dst: dst.text,
            src_mode: src.mode,
            dst_mode: dst.mode,
            src_congen: src.congen,
        });
        self.advance_lc(WORD_INC + src_ext + dst_ext);
    }

    /// Decides the addressing mode from the operand's leading character.
    /// Destinations refuse `@` and `#` outright.
    fn check_operand(
        &mut self,
        operand: String,
        is_dst: bool,
    ) -> Result<ClassifiedOperand, AsmError> {
        if is_dst && (operand.starts_with('@') || operand.starts_with('#')) {
            return Err(AsmError::InvalidDestination);
        }
        match operand.chars().next() {
            Some('&') => self.check_absolute(&operand[1..]),
            Some('@') => self.check_indirect(&operand[1..]),
            Some('#') => self.check_immediate(&operand[1..]),
            _ => self.check_default(operand),
        }
    }

    fn check_absolute(&mut self, operand: &str) -> Result<ClassifiedOperand, AsmError> {
        if is_label(operand) {
            self.forward_declare(operand)?;
        } else {
            match parse_number(operand) {
                Some(value) if (0..=65535).contains(&value) => {}
                _ => return Err(AsmError::InvalidAbsolute(operand.to_string())),
            }
        }
        Ok(ClassifiedOperand {
            mode: AddrMode::Absolute,
            text: operand.to_string(),
            congen: false,
        })
    }

    fn check_indirect(&mut self, operand: &str) -> Result<ClassifiedOperand, AsmError> {
        let (name, autoinc) = match operand.strip_suffix('+') {
            Some(name) => (name, true),
            None => (operand, false),
        };
        match self.symbols.kind(name) {
            Some(SymKind::Register) => Ok(ClassifiedOperand {
                mode: if autoinc {
                    AddrMode::IndirectAutoInc
                } else {
                    AddrMode::Indirect
                },
                text: name.to_string(),
                congen: false,
            }),
            _ => Err(AsmError::IndirectNotRegister(operand.to_string())),
        }
    }

    /// The constant-generator collapse only applies when the value is
    /// already known; a forward reference keeps its extension word.
    fn check_immediate(&mut self, operand: &str) -> Result<ClassifiedOperand, AsmError> {
        let known = if is_label(operand) {
            match self.symbols.get(operand).copied() {
                Some(sym) if sym.kind == SymKind::Register => {
                    return Err(AsmError::ImmediateRegister(operand.to_string()));
                }
                Some(sym) => Some(sym.value),
                None => {
                    self.forward_declare(operand)?;
                    None
                }
            }
        } else {
            match parse_number(operand) {
                Some(value) => Some(value),
                None => return Err(AsmError::InvalidImmediate(operand.to_string())),
            }
        };
        Ok(ClassifiedOperand {
            mode: AddrMode::Immediate,
            text: operand.to_string(),
            congen: known.is_some_and(|v| congen(v).is_some()),
        })
    }

    /// No sigil: register direct, `BASE(INDEX)` indexed, or a number or
    /// label reference taken as relative.
    fn check_default(&mut self, operand: String) -> Result<ClassifiedOperand, AsmError> {
        if is_label(&operand) {
            let mode = match self.symbols.kind(&operand) {
                Some(SymKind::Register) => AddrMode::Register,
                Some(_) => AddrMode::Relative,
                None => {
                    self.forward_declare(&operand)?;
                    AddrMode::Relative
                }
            };
            return Ok(ClassifiedOperand {
                mode,
                text: operand,
                congen: false,
            });
        }
        if let Some(open) = operand.find('(') {
            let base = &operand[..open];
            let Some(index) = operand[open + 1..].strip_suffix(')') else {
                return Err(AsmError::MissingParen(operand.to_string()));
            };
            if self.symbols.kind(index) != Some(SymKind::Register) {
                return Err(AsmError::IndexNotRegister(index.to_string()));
            }
            if !is_label(base) {
                return Err(AsmError::InvalidBase(base.to_string()));
            }
            match self.symbols.kind(base) {
                Some(SymKind::Register) => {
                    return Err(AsmError::BaseIsRegister(base.to_string()));
                }
                Some(_) => {}
                None => self.forward_declare(base)?,
            }
            return Ok(ClassifiedOperand {
                mode: AddrMode::Indexed,
                text: operand,
                congen: false,
            });
        }
        if parse_number(&operand).is_some() {
            return Ok(ClassifiedOperand {
                mode: AddrMode::Relative,
                text: operand,
                congen: false,
            });
        }
        Err(AsmError::UnknownOperand(operand))
    }

    fn forward_declare(&mut self, name: &str) -> Result<(), AsmError> {
        if self.symbols.get(name).is_none() {
            self.symbols.insert(name, 0, SymKind::Unresolved)?;
        }
        Ok(())
    }
}

/// Splits the operand field into one or two operand tokens. Double-operand
/// sources may not contain a comma; anything after a `;` is comment.
fn tokenize_operands(rest: &str, kind: InstKind) -> Result<(String, Option<String>), AsmError> {
    let rest = match rest.find(';') {
        Some(at) => &rest[..at],
        None => rest,
    };
    let rest = rest.trim();
    if rest.is_empty() {
        return Err(AsmError::MissingOperand);
    }
    if kind == InstKind::Double {
        let Some((src, dst)) = rest.split_once(',') else {
            return Err(AsmError::MissingComma);
        };
        let src = src
            .split_whitespace()
            .next()
            .ok_or(AsmError::MissingOperand)?;
        let dst = dst
            .split_whitespace()
            .next()
            .ok_or(AsmError::MissingSecondOperand)?;
        Ok((src.to_string(), Some(dst.to_string())))
    } else {
        let src = rest
            .split_whitespace()
            .next()
            .ok_or(AsmError::MissingOperand)?;
        Ok((src.to_string(), None))
    }
}
