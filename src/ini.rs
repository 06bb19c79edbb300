//! Reader for the INI-shaped configuration grammar.
//!
//! The format is line-oriented. `[group]` sections become key prefixes so
//! subsequent `key = value` lines are reported as `group.key`; an empty
//! `[]` clears the prefix. Values are comma-separated and every comma
//! splits into an independent assignment in document order, so
//! `keybind.left = h, left` reports two assignments. A `;` in the first
//! non-space column starts a comment.
//!
//! Malformed lines are reported through the logging façade and skipped;
//! parsing never fails as a whole.

/// Maximum accepted line length, in bytes.
pub const MAX_LINE_LEN: usize = 512;

/// Maximum accepted group and key length, in bytes.
pub const MAX_KEY_LEN: usize = 32;

/// Maximum accepted single-value length, in bytes.
pub const MAX_VALUE_LEN: usize = 32;

/// Parse a configuration source, feeding each `(key, value)` assignment to
/// `sink` in document order.
///
/// Keys are case-insensitive and reported lowercased, prefixed by the
/// current `group.` if one is open.
pub fn parse<F>(source: &str, mut sink: F)
where
    F: FnMut(&str, &str),
{
    let mut group = String::new();

    for (number, line) in source.lines().enumerate() {
        let number = number + 1;

        if line.len() > MAX_LINE_LEN {
            warn!("line {}: longer than {} bytes, skipping", number, MAX_LINE_LEN);
            continue;
        }

        let line = line.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        if line.starts_with('[') {
            match parse_group(line) {
                Some(name) if name.len() > MAX_KEY_LEN => {
                    warn!("line {}: group name too long, skipping", number);
                }
                Some(name) => group = name.to_ascii_lowercase(),
                None => warn!("line {}: malformed section header, skipping", number),
            }
            continue;
        }

        let (key, values) = match split_assignment(line) {
            Some(pair) => pair,
            None => {
                warn!("line {}: expected `key = value`, skipping", number);
                continue;
            }
        };

        if key.is_empty() || key.len() > MAX_KEY_LEN {
            warn!("line {}: bad key `{}`, skipping", number, key);
            continue;
        }

        let full_key = if group.is_empty() {
            key.to_ascii_lowercase()
        } else {
            format!("{}.{}", group, key.to_ascii_lowercase())
        };

        // Each comma yields an independent assignment; a trailing comma is
        // tolerated as an empty final piece.
        for value in values.split(',') {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            if value.len() > MAX_VALUE_LEN {
                warn!("line {}: value `{}` too long, skipping", number, value);
                continue;
            }

            sink(&full_key, value);
        }
    }
}

fn parse_group(line: &str) -> Option<&str> {
    if !line.ends_with(']') {
        return None;
    }

    Some(line[1..line.len() - 1].trim())
}

fn split_assignment(line: &str) -> Option<(&str, &str)> {
    let eq = line.find('=')?;
    Some((line[..eq].trim(), line[eq + 1..].trim()))
}
