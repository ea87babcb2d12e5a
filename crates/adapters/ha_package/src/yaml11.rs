//! Quoting for scalars that Home Assistant's YAML 1.1 loader would not read
//! as strings.
//!
//! `serde_yaml` emits YAML 1.2, where `off`, `yes` or `10:00:00` are plain
//! strings. Home Assistant reads packages as YAML 1.1, where the first two
//! are booleans and the last one a base-60 integer. Plain scalars in key or
//! value position that match one of those forms are single-quoted; block
//! scalars (`|-`) are copied through untouched.

/// Booleans in YAML 1.1 that YAML 1.2 reads as strings. `true`/`false` and
/// the null forms are ambiguous in both, so `serde_yaml` quotes them itself.
const BOOLEAN_WORDS: &[&str] = &[
    "y", "Y", "yes", "Yes", "YES", "n", "N", "no", "No", "NO", "on", "On", "ON", "off", "Off",
    "OFF",
];

/// Rewrite `rendered` so every YAML 1.1-ambiguous plain scalar is quoted.
pub(crate) fn quote_ambiguous_scalars(rendered: &str) -> String {
    let mut out = String::with_capacity(rendered.len() + 64);
    // Column of the key that opened the block scalar being copied, if any.
    let mut block_owner: Option<usize> = None;

    for line in rendered.lines() {
        let indent = line.len() - line.trim_start_matches(' ').len();
        if let Some(owner) = block_owner {
            if line.trim().is_empty() || indent > owner {
                out.push_str(line);
                out.push('\n');
                continue;
            }
            block_owner = None;
        }

        let (quoted, opens_block) = quote_line(line, indent);
        if opens_block {
            block_owner = Some(quoted.column);
        }
        out.push_str(&quoted.text);
        out.push('\n');
    }
    out
}

struct Line {
    text: String,
    column: usize,
}

/// Quote the key and value of one block-style line.
fn quote_line(line: &str, indent: usize) -> (Line, bool) {
    let mut column = indent;
    let mut rest = &line[indent..];
    while let Some(item) = rest.strip_prefix("- ") {
        rest = item;
        column += 2;
    }
    let prefix = &line[..column];

    let (key, value) = if let Some(key) = rest.strip_suffix(':') {
        (Some(key), None)
    } else if let Some((key, value)) = rest.split_once(": ") {
        (Some(key), Some(value))
    } else {
        (None, Some(rest))
    };

    let opens_block = value.is_some_and(|v| v.starts_with('|') || v.starts_with('>'));
    let mut text = String::from(prefix);
    match (key, value) {
        (Some(key), None) => {
            text.push_str(&quote_if_ambiguous(key));
            text.push(':');
        }
        (Some(key), Some(value)) => {
            text.push_str(&quote_if_ambiguous(key));
            text.push_str(": ");
            text.push_str(&quote_if_ambiguous(value));
        }
        (None, Some(value)) => text.push_str(&quote_if_ambiguous(value)),
        (None, None) => {}
    }
    (Line { text, column }, opens_block)
}

fn quote_if_ambiguous(scalar: &str) -> String {
    if is_ambiguous(scalar) {
        format!("'{scalar}'")
    } else {
        scalar.to_string()
    }
}

fn is_ambiguous(scalar: &str) -> bool {
    BOOLEAN_WORDS.contains(&scalar) || matches!(scalar, "=" | "<<") || is_sexagesimal(scalar)
}

/// `[-+]?[0-9][0-9_]*(:[0-5]?[0-9])+(\.[0-9_]*)?`: base-60 integers and
/// floats, which is how YAML 1.1 reads `HH:MM:SS` without a leading zero.
fn is_sexagesimal(scalar: &str) -> bool {
    let unsigned = scalar
        .strip_prefix(['-', '+'])
        .unwrap_or(scalar);
    let mut parts = unsigned.split(':');
    let Some(head) = parts.next() else {
        return false;
    };
    if !head.starts_with(|c: char| c.is_ascii_digit())
        || !head.chars().all(|c| c.is_ascii_digit() || c == '_')
    {
        return false;
    }
    let tail: Vec<&str> = parts.collect();
    let Some((last, middle)) = tail.split_last() else {
        return false;
    };
    let (last_digits, fraction) = match last.split_once('.') {
        Some((digits, fraction)) => (digits, Some(fraction)),
        None => (*last, None),
    };
    middle.iter().all(|part| is_base60_digit(part))
        && is_base60_digit(last_digits)
        && fraction.is_none_or(|f| f.chars().all(|c| c.is_ascii_digit() || c == '_'))
}

fn is_base60_digit(part: &str) -> bool {
    match part.as_bytes() {
        [d] => d.is_ascii_digit(),
        [tens, units] => (b'0'..=b'5').contains(tens) && units.is_ascii_digit(),
        _ => false,
    }
}
