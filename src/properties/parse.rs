use super::PropertiesError;

/// Decode every `key=value` entry in document order.
pub(super) fn entries(text: &str) -> Result<Vec<(String, String)>, PropertiesError> {
    let lines = natural_lines(text);
    let mut entries = Vec::new();
    let mut idx = 0;
    while idx < lines.len() {
        let line_number = idx + 1;
        let first = trim_leading(lines[idx]);
        idx += 1;
        if first.is_empty() || first.starts_with('#') || first.starts_with('!') {
            continue;
        }

        let mut logical = String::new();
        let mut current = first;
        loop {
            if !continues(current) {
                logical.push_str(current);
                break;
            }
            logical.push_str(&current[..current.len() - 1]);
            match lines.get(idx) {
                Some(next) => {
                    idx += 1;
                    current = trim_leading(next);
                }
                None => break,
            }
        }
        entries.push(split_entry(&logical, line_number)?);
    }
    Ok(entries)
}

/// Split on `\n`, `\r` or `\r\n`.
fn natural_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut idx = 0;
    while idx < bytes.len() {
        match bytes[idx] {
            b'\n' => {
                lines.push(&text[start..idx]);
                idx += 1;
                start = idx;
            }
            b'\r' => {
                lines.push(&text[start..idx]);
                idx += 1;
                if bytes.get(idx) == Some(&b'\n') {
                    idx += 1;
                }
                start = idx;
            }
            _ => idx += 1,
        }
    }
    if start < bytes.len() {
        lines.push(&text[start..]);
    }
    lines
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

fn trim_leading(line: &str) -> &str {
    line.trim_start_matches(is_blank)
}

/// An odd run of trailing backslashes joins the next line.
fn continues(line: &str) -> bool {
    let trailing = line.bytes().rev().take_while(|b| *b == b'\\').count();
    trailing % 2 == 1
}

fn split_entry(logical: &str, line: usize) -> Result<(String, String), PropertiesError> {
    let chars: Vec<char> = logical.chars().collect();
    let mut key_end = chars.len();
    let mut value_start = chars.len();
    let mut has_separator = false;
    let mut escaped = false;
    for (idx, &c) in chars.iter().enumerate() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' {
            key_end = idx;
            value_start = idx + 1;
            has_separator = true;
            break;
        } else if is_blank(c) {
            key_end = idx;
            value_start = idx + 1;
            break;
        }
    }

    while let Some(&c) = chars.get(value_start) {
        if is_blank(c) {
            value_start += 1;
        } else if !has_separator && (c == '=' || c == ':') {
            has_separator = true;
            value_start += 1;
        } else {
            break;
        }
    }

    let key = unescape(&chars[..key_end], line)?;
    let value = unescape(&chars[value_start..], line)?;
    Ok((key, value))
}

fn unescape(chars: &[char], line: usize) -> Result<String, PropertiesError> {
    let mut out = String::with_capacity(chars.len());
    let mut idx = 0;
    while idx < chars.len() {
        let c = chars[idx];
        idx += 1;
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(&next) = chars.get(idx) else {
            break;
        };
        idx += 1;
        match next {
            't' => out.push('\t'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            'f' => out.push('\x0c'),
            'u' => {
                let unit = hex_unit(chars, idx, line)?;
                idx += 4;
                out.push(decode_unit(unit, chars, &mut idx));
            }
            other => out.push(other),
        }
    }
    Ok(out)
}

fn hex_unit(chars: &[char], start: usize, line: usize) -> Result<u32, PropertiesError> {
    let digits = chars
        .get(start..start + 4)
        .ok_or(PropertiesError::MalformedEscape { line })?;
    digits.iter().try_fold(0u32, |acc, c| {
        c.to_digit(16)
            .map(|digit| acc * 16 + digit)
            .ok_or(PropertiesError::MalformedEscape { line })
    })
}

/// Resolve a UTF-16 unit, pairing a high surrogate with a following `\uDCxx`.
fn decode_unit(unit: u32, chars: &[char], idx: &mut usize) -> char {
    if (0xD800..0xDC00).contains(&unit) {
        let low = match chars.get(*idx..*idx + 6) {
            Some([a, b, rest @ ..]) if *a == '\\' && *b == 'u' => rest
                .iter()
                .try_fold(0u32, |acc, c| c.to_digit(16).map(|digit| acc * 16 + digit)),
            _ => None,
        };
        if let Some(low) = low.filter(|low| (0xDC00..0xE000).contains(low)) {
            *idx += 6;
            let combined = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
            return char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER);
        }
    }
    char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER)
}
