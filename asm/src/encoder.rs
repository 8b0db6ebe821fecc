use std::io::{self, Write};
use std::mem;

use arch::addr::AddrMode;
use arch::encode::{congen, pack_double, pack_jump, pack_single};
use arch::inst::Size;
use arch::reg::{PC, SR};

use crate::error::AsmError;
use crate::record::{JumpTarget, Record, RecordKind};
use crate::srec::SrecWriter;
use crate::symbol::SymKind;
use crate::util::{is_label, parse_number};
use crate::Assembler;

/// Encoded operand fields for one side of an instruction word.
struct Fields {
    reg: u16,
    as_bits: u16,
    ext: Option<u16>,
}

impl<W: Write> Assembler<W> {
    /// The gate between the passes: every symbol must be resolved and
    /// pass one must have been clean. Unresolved names each get their own
    /// diagnostic.
    pub fn clear_for_second_pass(&mut self) -> bool {
        let names: Vec<String> = self.symbols.unresolved().map(str::to_string).collect();
        for name in names {
            let _ = writeln!(self.listing, "ERROR: Unresolved symbol `{name}`");
            self.diags.push(crate::error::Diag {
                line: 0,
                error: AsmError::UnresolvedSymbol(name),
            });
        }
        self.diags.is_empty()
    }

    /// Walks the pass-one records, encoding each into the S-record stream.
    /// Jump-range failures are reported and that record is skipped.
    pub fn second_pass<O: Write>(&mut self, out: &mut SrecWriter<O>) -> io::Result<()> {
        let records = mem::take(&mut self.records);
        for record in &records {
            self.line = record.line;
            self.emit_record(record, out)?;
        }
        self.records = records;
        out.finish(self.start_address)
    }

    fn emit_record<O: Write>(
        &mut self,
        record: &Record,
        out: &mut SrecWriter<O>,
    ) -> io::Result<()> {
        let lc = record.lc as i32;
        match &record.kind {
            RecordKind::Origin { address } => out.set_origin(*address),
            RecordKind::Reserve { count } => {
                for _ in 0..*count {
                    out.write_byte(0)?;
                }
                Ok(())
            }
            RecordKind::Data { value, width } => match width {
                Size::Byte => out.write_byte(*value as u8),
                Size::Word => out.write_word(*value),
            },
            RecordKind::Ascii { text } => {
                for byte in text.bytes() {
                    out.write_byte(byte)?;
                }
                Ok(())
            }
            RecordKind::InstNone { inst } => {
                self.trace(lc, inst.opcode, None, None);
                out.write_word(inst.opcode)
            }
            RecordKind::InstSingle {
                inst,
                src,
                src_mode,
                src_congen,
            } => {
                let fields = match self.resolve(src, *src_mode, *src_congen, lc + 2) {
                    Ok(fields) => fields,
                    Err(error) => {
                        self.error(error);
                        return Ok(());
                    }
                };
                let word = pack_single(
                    inst.opcode,
                    inst.size.bw_bit(),
                    fields.as_bits,
                    fields.reg,
                );
                self.trace(lc, word, fields.ext, None);
                out.write_word(word)?;
                if let Some(ext) = fields.ext {
                    out.write_word(ext)?;
                }
                Ok(())
            }
            RecordKind::InstDouble {
                inst,
                src,
                dst,
                src_mode,
                dst_mode,
                src_congen,
            } => {
                let src_fields = match self.resolve(src, *src_mode, *src_congen, lc + 2) {
                    Ok(fields) => fields,
                    Err(error) => {
                        self.error(error);
                        return Ok(());
                    }
                };
                // the destination extension word sits after the source's
                let dst_base = lc + 2 + if src_fields.ext.is_some() { 2 } else { 0 };
                let dst_fields = match self.resolve(dst, *dst_mode, false, dst_base) {
                    Ok(fields) => fields,
                    Err(error) => {
                        self.error(error);
                        return Ok(());
                    }
                };
                let word = pack_double(
                    inst.opcode,
                    src_fields.reg,
                    dst_mode.ad_bit(),
                    inst.size.bw_bit(),
                    src_fields.as_bits,
                    dst_fields.reg,
                );
                self.trace(lc, word, src_fields.ext, dst_fields.ext);
                out.write_word(word)?;
                if let Some(ext) = src_fields.ext {
                    out.write_word(ext)?;
                }
                if let Some(ext) = dst_fields.ext {
                    out.write_word(ext)?;
                }
                Ok(())
            }
            RecordKind::Jump { inst, target } => {
                let value = match target {
                    JumpTarget::Literal(value) => *value,
                    JumpTarget::Symbol(name) => match self.value_of(name) {
                        Ok(value) => value,
                        Err(error) => {
                            self.error(error);
                            return Ok(());
                        }
                    },
                };
                let distance = value - (lc + 2);
                if distance >= 1024 || distance <= -1022 {
                    self.error(AsmError::JumpOutOfRange(distance));
                    return Ok(());
                }
                if distance & 1 != 0 {
                    self.error(AsmError::OddJumpDistance(distance));
                    return Ok(());
                }
                let word = pack_jump(inst.opcode, (distance / 2) as i16);
                self.trace(lc, word, None, None);
                out.write_word(word)
            }
        }
    }

    /// Encoded value of a symbol or numeric literal.
    fn value_of(&self, text: &str) -> Result<i32, AsmError> {
        if is_label(text) {
            match self.symbols.get(text) {
                Some(sym) => Ok(sym.value),
                None => Err(AsmError::UnknownSymbol(text.to_string())),
            }
        } else {
            parse_number(text).ok_or_else(|| AsmError::UnknownSymbol(text.to_string()))
        }
    }

    /// Register, As and extension fields for one operand. `pc_base` is the
    /// address the PC holds when a PC-relative extension word is consumed.
    fn resolve(
        &self,
        text: &str,
        mode: AddrMode,
        collapse: bool,
        pc_base: i32,
    ) -> Result<Fields, AsmError> {
        match mode {
            AddrMode::Register => Ok(Fields {
                reg: self.register_of(text)?,
                as_bits: 0,
                ext: None,
            }),
            AddrMode::Indirect | AddrMode::IndirectAutoInc => {
                let name = text.strip_suffix('+').unwrap_or(text);
                Ok(Fields {
                    reg: self.register_of(name)?,
                    as_bits: mode.as_bits(),
                    ext: None,
                })
            }
            AddrMode::Indexed => {
                let open = text
                    .find('(')
                    .ok_or_else(|| AsmError::MissingParen(text.to_string()))?;
                let index = text[open + 1..]
                    .strip_suffix(')')
                    .ok_or_else(|| AsmError::MissingParen(text.to_string()))?;
                let base = self.value_of(&text[..open])?;
                Ok(Fields {
                    reg: self.register_of(index)?,
                    as_bits: mode.as_bits(),
                    ext: Some((base - pc_base) as u16),
                })
            }
            AddrMode::Relative => {
                let value = self.value_of(text)?;
                Ok(Fields {
                    reg: u16::from(PC),
                    as_bits: mode.as_bits(),
                    ext: Some((value - pc_base) as u16),
                })
            }
            AddrMode::Absolute => Ok(Fields {
                reg: u16::from(SR),
                as_bits: mode.as_bits(),
                ext: Some(self.value_of(text)? as u16),
            }),
            AddrMode::Immediate => {
                let value = self.value_of(text)?;
                if collapse {
                    if let Some((reg, as_bits)) = congen(value) {
                        return Ok(Fields {
                            reg: u16::from(reg),
                            as_bits,
                            ext: None,
                        });
                    }
                }
                Ok(Fields {
                    reg: u16::from(PC),
                    as_bits: mode.as_bits(),
                    ext: Some(value as u16),
                })
            }
        }
    }

    fn register_of(&self, name: &str) -> Result<u16, AsmError> {
        match self.symbols.get(name) {
            Some(sym) if sym.kind == SymKind::Register => Ok(sym.value as u16),
            _ => Err(AsmError::UnknownSymbol(name.to_string())),
        }
    }

    /// Opcode trace line in the listing.
    fn trace(&mut self, lc: i32, word: u16, ext1: Option<u16>, ext2: Option<u16>) {
        let _ = write!(self.listing, "{lc:04X}: {word:04X}");
        for ext in [ext1, ext2].into_iter().flatten() {
            let _ = write!(self.listing, " {ext:04X}");
        }
        let _ = writeln!(self.listing);
    }
}
