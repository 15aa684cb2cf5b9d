//! Decoding and encoding of Go string literals.

use std::fmt::Write as _;

/// Decodes an interpreted (`"..."`) or raw (`` `...` ``) Go string literal.
///
/// # Errors
///
/// Returns a message if the literal is not quoted, contains an invalid escape
/// sequence, or decodes to bytes that are not valid UTF-8.
pub fn unquote(literal: &str) -> Result<String, String> {
    if literal.len() >= 2 && literal.starts_with('`') && literal.ends_with('`') {
        return Ok(literal[1..literal.len() - 1].replace('\r', ""));
    }
    if literal.len() < 2 || !literal.starts_with('"') || !literal.ends_with('"') {
        return Err("not a string literal".into());
    }

    let body = &literal[1..literal.len() - 1];
    let mut out: Vec<u8> = Vec::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => decode_escape(&mut chars, &mut out)?,
            '"' => return Err("unescaped `\"` inside literal".into()),
            '\n' => return Err("newline inside literal".into()),
            c => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    }
    String::from_utf8(out).map_err(|_| "literal is not valid UTF-8".to_string())
}

fn decode_escape(chars: &mut std::str::Chars<'_>, out: &mut Vec<u8>) -> Result<(), String> {
    let Some(c) = chars.next() else {
        return Err("escape sequence not terminated".into());
    };
    let simple = match c {
        'a' => Some(0x07),
        'b' => Some(0x08),
        'f' => Some(0x0c),
        'n' => Some(b'\n'),
        'r' => Some(b'\r'),
        't' => Some(b'\t'),
        'v' => Some(0x0b),
        '\\' => Some(b'\\'),
        '"' => Some(b'"'),
        _ => None,
    };
    if let Some(byte) = simple {
        out.push(byte);
        return Ok(());
    }

    match c {
        'x' => {
            let value = take_digits(chars, 2, 16)?;
            out.push(u8::try_from(value).map_err(|_| "hex escape out of range".to_string())?);
        }
        '0'..='7' => {
            let rest = take_digits(chars, 2, 8)?;
            let value = (c.to_digit(8).unwrap_or(0) << 6) | rest;
            let byte = u8::try_from(value).map_err(|_| "octal escape value > 255".to_string())?;
            out.push(byte);
        }
        'u' | 'U' => {
            let digits = if c == 'u' { 4 } else { 8 };
            let value = take_digits(chars, digits, 16)?;
            let decoded = char::from_u32(value)
                .ok_or_else(|| format!("escape sequence is invalid Unicode code point {value:#x}"))?;
            let mut buf = [0u8; 4];
            out.extend_from_slice(decoded.encode_utf8(&mut buf).as_bytes());
        }
        other => return Err(format!("unknown escape sequence \\{other}")),
    }
    Ok(())
}

fn take_digits(chars: &mut std::str::Chars<'_>, count: usize, radix: u32) -> Result<u32, String> {
    let mut value: u32 = 0;
    for _ in 0..count {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(radix))
            .ok_or_else(|| format!("escape sequence needs {count} base-{radix} digits"))?;
        value = value * radix + digit;
    }
    Ok(value)
}

/// Encodes `value` as an interpreted Go string literal.
///
/// Printable characters are kept as-is; quotes, backslashes and control
/// characters are escaped the way Go's `strconv.Quote` does.
#[must_use]
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0b}' => out.push_str("\\v"),
            c if is_printable(c) => out.push(c),
            c if (c as u32) < 0x80 => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c if (c as u32) < 0x1_0000 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => {
                let _ = write!(out, "\\U{:08x}", c as u32);
            }
        }
    }
    out.push('"');
    out
}

/// Code points `strconv.IsPrint` rejects besides controls: format
/// characters (Cf), space and line/paragraph separators (Zs, Zl, Zp),
/// private use (Co) and noncharacters.
const NOT_PRINTABLE: &[(u32, u32)] = &[
    (0x00A0, 0x00A0),
    (0x00AD, 0x00AD),
    (0x0600, 0x0605),
    (0x061C, 0x061C),
    (0x06DD, 0x06DD),
    (0x070F, 0x070F),
    (0x0890, 0x0891),
    (0x08E2, 0x08E2),
    (0x1680, 0x1680),
    (0x180E, 0x180E),
    (0x2000, 0x200F),
    (0x2028, 0x202F),
    (0x205F, 0x2064),
    (0x2066, 0x206F),
    (0x3000, 0x3000),
    (0xE000, 0xF8FF),
    (0xFDD0, 0xFDEF),
    (0xFEFF, 0xFEFF),
    (0xFFF9, 0xFFFB),
    (0x110BD, 0x110BD),
    (0x110CD, 0x110CD),
    (0x13430, 0x1343F),
    (0x1BCA0, 0x1BCA3),
    (0x1D173, 0x1D17A),
    (0xE0001, 0xE0001),
    (0xE0020, 0xE007F),
    (0xF0000, 0x10FFFF),
];

fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    if c.is_control() {
        return false;
    }
    let cp = c as u32;
    if cp & 0xFFFE == 0xFFFE {
        return false;
    }
    NOT_PRINTABLE
        .binary_search_by(|&(lo, hi)| {
            if hi < cp {
                std::cmp::Ordering::Less
            } else if lo > cp {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        })
        .is_err()
}
