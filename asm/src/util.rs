use arch::directive::get_dir;
use arch::inst::get_inst;

use crate::symbol::MAX_NAME_LEN;

/// Numeric literal scanner: optional leading `-`, then `$AB` hex,
/// `0xAB`/`0XAB` hex, or plain decimal.
pub fn parse_number(s: &str) -> Option<i32> {
    let (neg, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let value = if let Some(hex) = digits.strip_prefix('$') {
        i64::from_str_radix(hex, 16).ok()?
    } else if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()?
    } else if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        digits.parse::<i64>().ok()?
    } else {
        return None;
    };
    let value = i32::try_from(value).ok()?;
    Some(if neg { -value } else { value })
}

/// Label rules: alphabetic first character, alphanumeric rest, at most 32
/// characters, and never the name of an instruction or directive.
pub fn is_label(token: &str) -> bool {
    let mut chars = token.chars();
    let head_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    head_ok
        && chars.all(|c| c.is_ascii_alphanumeric())
        && token.len() <= MAX_NAME_LEN
        && get_inst(token).is_none()
        && get_dir(token).is_none()
}

/// Splits off the first whitespace-delimited token; the remainder keeps its
/// own leading whitespace trimmed.
pub fn split_first_token(line: &str) -> Option<(&str, &str)> {
    let line = line.trim_start();
    if line.is_empty() {
        return None;
    }
    match line.find(char::is_whitespace) {
        Some(end) => Some((&line[..end], line[end..].trim_start())),
        None => Some((line, "")),
    }
}

/// Truncates in place to `max` bytes without splitting a UTF-8 sequence.
pub fn truncate_line(line: &mut String, max: usize) {
    if line.len() <= max {
        return;
    }
    let mut end = max;
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    line.truncate(end);
}
