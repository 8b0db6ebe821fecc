use std::io::Write;

use arch::directive::Directive;
use arch::inst::Size;

use crate::error::AsmError;
use crate::record::RecordKind;
use crate::symbol::SymKind;
use crate::util::{parse_number, split_first_token};
use crate::{Assembler, MAX_LC};

impl<W: Write> Assembler<W> {
    pub(crate) fn analyze_directive(&mut self, dir: Directive, rest: &str) {
        match dir {
            Directive::Align => self.dir_align(),
            Directive::Ascii => self.dir_ascii(rest),
            Directive::Bss => self.dir_bss(rest),
            Directive::Byte => self.dir_byte(rest),
            Directive::End => self.dir_end(rest),
            Directive::Equ => self.dir_equ(rest),
            Directive::Org => self.dir_org(rest),
            Directive::Word => self.dir_word(rest),
        }
    }

    /// First operand token of a directive, or a soft error if absent.
    fn dir_operand<'a>(&mut self, dir: Directive, rest: &'a str) -> Option<&'a str> {
        match split_first_token(rest) {
            Some((token, _)) if !token.starts_with(';') => Some(token),
            _ => {
                self.error(AsmError::MissingDirectiveValue(dir));
                None
            }
        }
    }

    /// Operand that may be a literal or an already-defined non-register
    /// symbol (ORG, BSS, END all resolve this way).
    fn number_or_symbol(&self, token: &str) -> Option<i32> {
        if let Some(sym) = self.symbols.get(token) {
            if sym.kind == SymKind::Label {
                return Some(sym.value);
            }
            return None;
        }
        parse_number(token)
    }

    /// Odd LCs are padded with a single zero byte so the emitted stream
    /// stays in step with the addresses pass one hands out.
    fn dir_align(&mut self) {
        if self.lc % 2 == 1 {
            self.push_record(RecordKind::Reserve { count: 1 });
            self.advance_lc(1);
        }
        let lc = self.lc;
        self.bind_label(lc);
    }

    fn dir_org(&mut self, rest: &str) {
        let Some(token) = self.dir_operand(Directive::Org, rest) else {
            return;
        };
        match self.number_or_symbol(token) {
            Some(address) if (0..=MAX_LC).contains(&address) => {
                self.set_lc(address);
                self.push_record(RecordKind::Origin {
                    address: address as u16,
                });
                self.bind_label(address);
            }
            _ => self.error(AsmError::InvalidOrigin(token.to_string())),
        }
    }

    /// EQU binds the preceding label to a plain numeric value, not an
    /// address; the LC is untouched and no record is appended.
    fn dir_equ(&mut self, rest: &str) {
        let Some(name) = self.label.take() else {
            self.error(AsmError::MissingEquLabel);
            return;
        };
        let Some(token) = self.dir_operand(Directive::Equ, rest) else {
            return;
        };
        let Some(value) = parse_number(token) else {
            self.error(AsmError::InvalidEquValue(token.to_string()));
            return;
        };
        let result = match self.symbols.kind(&name) {
            None => self.symbols.insert(&name, value, SymKind::Label),
            Some(SymKind::Register) => Err(AsmError::EquRegister(name.clone())),
            Some(_) => self.symbols.update(&name, value, SymKind::Label),
        };
        if let Err(error) = result {
            self.error(error);
        }
    }

    fn dir_bss(&mut self, rest: &str) {
        let Some(token) = self.dir_operand(Directive::Bss, rest) else {
            return;
        };
        let Some(count) = self.number_or_symbol(token) else {
            self.error(AsmError::InvalidBssCount(token.to_string()));
            return;
        };
        if !(1..=MAX_LC - self.lc).contains(&count) {
            self.error(AsmError::BssOutOfRange(count));
            return;
        }
        let lc = self.lc;
        self.bind_label(lc);
        self.push_record(RecordKind::Reserve {
            count: count as u16,
        });
        self.advance_lc(count);
    }

    fn dir_byte(&mut self, rest: &str) {
        let Some(token) = self.dir_operand(Directive::Byte, rest) else {
            return;
        };
        match parse_number(token) {
            Some(value) if (0..=255).contains(&value) => {
                let lc = self.lc;
                self.bind_label(lc);
                self.push_record(RecordKind::Data {
                    value: value as u16,
                    width: Size::Byte,
                });
                self.advance_lc(1);
            }
            Some(value) => self.error(AsmError::ByteOutOfRange(value)),
            None => self.error(AsmError::ByteOutOfRange(-1)),
        }
    }

    fn dir_word(&mut self, rest: &str) {
        let Some(token) = self.dir_operand(Directive::Word, rest) else {
            return;
        };
        match parse_number(token) {
            Some(value) if (0..=65535).contains(&value) => {
                let lc = self.lc;
                self.bind_label(lc);
                self.push_record(RecordKind::Data {
                    value: value as u16,
                    width: Size::Word,
                });
                self.advance_lc(2);
            }
            Some(value) => self.error(AsmError::WordOutOfRange(value)),
            None => self.error(AsmError::WordOutOfRange(-1)),
        }
    }

    fn dir_ascii(&mut self, rest: &str) {
        let Some(open) = rest.find('"') else {
            self.error(AsmError::UnterminatedString);
            return;
        };
        let body = &rest[open + 1..];
        let Some(close) = body.find('"') else {
            self.error(AsmError::UnterminatedString);
            return;
        };
        let text = body[..close].to_string();
        let lc = self.lc;
        self.bind_label(lc);
        let length = text.len() as i32;
        self.push_record(RecordKind::Ascii { text });
        self.advance_lc(length);
    }

    /// END stops line consumption; its optional operand is the program
    /// start address placed in the terminating record.
    fn dir_end(&mut self, rest: &str) {
        if let Some(name) = self.label.take() {
            self.error(AsmError::LabelOnEnd(name));
        }
        self.done = true;
        match split_first_token(rest) {
            Some((token, _)) if !token.starts_with(';') => {
                match self.number_or_symbol(token) {
                    Some(address) if (0..=MAX_LC).contains(&address) => {
                        self.start_address = address as u16;
                    }
                    _ => self.error(AsmError::InvalidOrigin(token.to_string())),
                }
            }
            _ => self.start_address = 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    fn asm_with(source: &str) -> Assembler<Vec<u8>> {
        let mut asm = Assembler::new(Vec::new());
        asm.first_pass(source.as_bytes()).unwrap();
        asm
    }

    fn kinds(records: &[Record]) -> Vec<&RecordKind> {
        records.iter().map(|r| &r.kind).collect()
    }

    #[test]
    fn org_sets_lc_and_appends_record() {
        let asm = asm_with("ORG $100\nWORD 7\n");
        assert_eq!(
            kinds(&asm.records),
            vec![
                &RecordKind::Origin { address: 0x100 },
                &RecordKind::Data {
                    value: 7,
                    width: Size::Word
                },
            ]
        );
        assert_eq!(asm.records[1].lc, 0x100);
        assert_eq!(asm.lc, 0x102);
    }

    #[test]
    fn org_accepts_equated_symbol() {
        let asm = asm_with("BASE EQU $200\nORG BASE\n");
        assert_eq!(asm.lc, 0x200);
        assert!(asm.diags.is_empty());
    }

    #[test]
    fn org_rejects_bad_address() {
        let asm = asm_with("ORG 65536\n");
        assert!(matches!(asm.diags[0].error, AsmError::InvalidOrigin(_)));
        assert_eq!(asm.lc, 0);
    }

    #[test]
    fn equ_binds_value_not_address() {
        let asm = asm_with("ORG 100\nTEN EQU 10\n");
        assert_eq!(asm.symbols.get("TEN").unwrap().value, 10);
        assert_eq!(asm.lc, 100); // LC untouched
        assert!(asm.records.len() == 1); // only the ORG record
    }

    #[test]
    fn equ_without_label_is_an_error() {
        let asm = asm_with("EQU 10\n");
        assert_eq!(asm.diags[0].error, AsmError::MissingEquLabel);
    }

    #[test]
    fn bss_binds_label_to_block_start() {
        let asm = asm_with("ORG 10\nBUF: BSS 8\n");
        assert_eq!(asm.symbols.get("BUF").unwrap().value, 10);
        assert_eq!(asm.lc, 18);
        assert_eq!(asm.records[1].kind, RecordKind::Reserve { count: 8 });
        assert_eq!(asm.records[1].lc, 10);
    }

    #[test]
    fn bss_rejects_zero_and_overflow() {
        let asm = asm_with("BSS 0\n");
        assert!(matches!(asm.diags[0].error, AsmError::BssOutOfRange(0)));
        let asm = asm_with("ORG 65000\nBSS 1000\n");
        assert!(matches!(asm.diags[0].error, AsmError::BssOutOfRange(1000)));
        assert_eq!(asm.lc, 65000);
    }

    #[test]
    fn bss_rejects_unparsable_count() {
        let asm = asm_with("BSS R5\n");
        assert_eq!(
            asm.diags[0].error,
            AsmError::InvalidBssCount("R5".to_string())
        );
        let asm = asm_with("BSS ?\n");
        assert!(matches!(asm.diags[0].error, AsmError::InvalidBssCount(_)));
        assert_eq!(asm.lc, 0);
    }

    #[test]
    fn byte_range_and_lc() {
        let asm = asm_with("BYTE 0\nBYTE 255\nBYTE 256\n");
        assert_eq!(asm.records.len(), 2);
        assert_eq!(asm.lc, 2);
        assert!(matches!(asm.diags[0].error, AsmError::ByteOutOfRange(256)));
    }

    #[test]
    fn word_label_binds_before_advance() {
        let asm = asm_with("RETI\nVAL: WORD 5\n");
        assert_eq!(asm.symbols.get("VAL").unwrap().value, 2);
        assert_eq!(asm.lc, 4);
    }

    #[test]
    fn ascii_stores_text_and_advances() {
        let asm = asm_with("MSG: ASCII \"hi there\"\n");
        assert_eq!(asm.symbols.get("MSG").unwrap().value, 0);
        assert_eq!(
            asm.records[0].kind,
            RecordKind::Ascii {
                text: "hi there".to_string()
            }
        );
        assert_eq!(asm.lc, 8);
    }

    #[test]
    fn ascii_requires_quotes() {
        let asm = asm_with("ASCII hello\n");
        assert_eq!(asm.diags[0].error, AsmError::UnterminatedString);
        let asm = asm_with("ASCII \"unterminated\n");
        assert_eq!(asm.diags[0].error, AsmError::UnterminatedString);
    }

    #[test]
    fn align_pads_odd_lc() {
        let asm = asm_with("BYTE 1\nALIGN\nHERE: WORD 2\n");
        assert_eq!(asm.symbols.get("HERE").unwrap().value, 2);
        let asm = asm_with("ALIGN\n");
        assert_eq!(asm.lc, 0); // even LC untouched
    }

    #[test]
    fn end_stops_reading_and_sets_start() {
        let asm = asm_with("START: RETI\nEND START\nWORD 1\n");
        assert_eq!(asm.start_address, 0);
        assert_eq!(asm.records.len(), 1); // WORD never seen
        let asm = asm_with("END $40\n");
        assert_eq!(asm.start_address, 0x40);
    }

    #[test]
    fn label_on_end_is_an_error() {
        let asm = asm_with("STOP: END\n");
        assert!(matches!(asm.diags[0].error, AsmError::LabelOnEnd(_)));
    }
}
