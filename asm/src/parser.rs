use std::io::{self, BufRead, Write};

use arch::directive::{get_dir, Directive};
use arch::inst::{get_inst, InstDesc};

use crate::error::AsmError;
use crate::symbol::SymKind;
use crate::util::{is_label, split_first_token, truncate_line};
use crate::{Assembler, LINE_LEN};

/// Classification of the leading token of a line (or of the token
/// following a label).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FirstToken {
    Inst(&'static InstDesc),
    Dir(Directive),
    Label,
    Comment,
    Unknown,
}

impl<W: Write> Assembler<W> {
    /// Pass one: streams source lines into the classifier, building the
    /// symbol table and the record list. Stops at END.
    pub fn first_pass<R: BufRead>(&mut self, input: R) -> io::Result<()> {
        let _ = writeln!(
            self.listing,
            "--------------    Input Records    --------------"
        );
        for line in input.lines() {
            if self.done {
                break;
            }
            let mut line = line?;
            truncate_line(&mut line, LINE_LEN);
            let _ = writeln!(self.listing, "------Record {}------: {}", self.line, line);
            let trimmed = line.trim_start();
            if !trimmed.is_empty() && !trimmed.starts_with(';') {
                self.parse_line(&line);
            }
            self.line += 1;
        }
        Ok(())
    }

    fn parse_line(&mut self, line: &str) {
        let Some((token, rest)) = split_first_token(line) else {
            return;
        };
        match self.classify(token) {
            FirstToken::Inst(inst) => self.analyze_instruction(inst, rest),
            FirstToken::Dir(dir) => self.analyze_directive(dir, rest),
            FirstToken::Label => {
                self.analyze_label(token.strip_suffix(':').unwrap_or(token), rest)
            }
            FirstToken::Comment => {}
            FirstToken::Unknown => self.error(AsmError::UnknownToken(token.to_string())),
        }
    }

    /// Catalog lookups first, then label rules (a trailing `:` is
    /// accepted and ignored), then comment marker. A "label" that names a
    /// register is unclassifiable.
    pub(crate) fn classify(&self, token: &str) -> FirstToken {
        if let Some(inst) = get_inst(token) {
            return FirstToken::Inst(inst);
        }
        if let Some(dir) = get_dir(token) {
            return FirstToken::Dir(dir);
        }
        let name = token.strip_suffix(':').unwrap_or(token);
        if is_label(name) {
            if self.symbols.kind(name) == Some(SymKind::Register) {
                return FirstToken::Unknown;
            }
            return FirstToken::Label;
        }
        if token.starts_with(';') {
            return FirstToken::Comment;
        }
        FirstToken::Unknown
    }

    /// A leading label: what follows must be an instruction, a directive,
    /// or nothing. A solo label binds to the current LC immediately.
    fn analyze_label(&mut self, token: &str, rest: &str) {
        self.label = Some(token.to_string());
        match split_first_token(rest) {
            None => {
                let lc = self.lc;
                self.bind_label(lc);
            }
            Some((next, _)) if next.starts_with(';') => {
                let lc = self.lc;
                self.bind_label(lc);
            }
            Some((next, after)) => match self.classify(next) {
                FirstToken::Inst(inst) => self.analyze_instruction(inst, after),
                FirstToken::Dir(dir) => self.analyze_directive(dir, after),
                _ => self.error(AsmError::InvalidAfterLabel(next.to_string())),
            },
        }
        self.label = None;
    }
}
