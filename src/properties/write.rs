use super::Properties;

pub(super) fn render(properties: &Properties, comment: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(comment) = comment {
        push_comment(&mut out, comment);
    }
    for (key, value) in properties.sorted_entries() {
        push_escaped(&mut out, key, true);
        out.push('=');
        push_escaped(&mut out, value, false);
        out.push('\n');
    }
    out
}

fn push_comment(out: &mut String, comment: &str) {
    for line in comment.lines() {
        if !(line.starts_with('#') || line.starts_with('!')) {
            out.push('#');
        }
        out.push_str(line);
        out.push('\n');
    }
}

/// Keys escape every space; values only a leading one.
fn push_escaped(out: &mut String, text: &str, escape_space: bool) {
    for (idx, c) in text.chars().enumerate() {
        match c {
            ' ' if escape_space || idx == 0 => out.push_str("\\ "),
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x0c' => out.push_str("\\f"),
            '=' | ':' | '#' | '!' => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
}
