//! Line and field splitting shared by the tag file, manifest and fetch parsers.

/// Field separators: ASCII space, tab, newline, vertical tab, form feed, carriage return.
/// Unicode spaces such as U+00A0 are ordinary path characters.
pub fn is_field_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

pub fn is_blank(line: &str) -> bool {
    line.chars().all(is_field_space)
}

pub fn trim(s: &str) -> &str {
    s.trim_matches(is_field_space)
}

/// Lines of `contents`, each ended by `\n`, `\r\n` or a lone `\r`.
/// A terminator at the very end does not start an extra empty line.
pub fn lines(contents: &str) -> impl Iterator<Item = &str> {
    let mut rest = contents;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let Some(end) = rest.find(['\r', '\n']) else {
            return Some(std::mem::take(&mut rest));
        };
        let line = &rest[..end];
        let terminator = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[end + terminator..];
        Some(line)
    })
}

/// Split off the first field at the first run of field spaces. The remainder keeps any
/// trailing text verbatim, including spaces inside it.
pub fn split_field(line: &str) -> Option<(&str, &str)> {
    let (head, rest) = line.split_once(is_field_space)?;
    Some((head, rest.trim_start_matches(is_field_space)))
}
