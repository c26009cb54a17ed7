//! The `key: value` grammar shared by bagit.txt, bag-info.txt and package-info.txt.
//!
//! A line that starts with ASCII whitespace continues the value of the previous line; the
//! stripped text is appended with a newline.

use crate::error::{BagError, Result};
use crate::text;
use std::path::Path;
use tracing::debug;

pub const TAG_SEPARATOR: &str = ":";

/// Encoding labels whose text decodes correctly as UTF-8. Compared case-insensitively.
const UTF8_LABELS: [&str; 5] = ["UTF-8", "UTF8", "unicode-1-1-utf-8", "US-ASCII", "ASCII"];

/// True when tag files declared with `label` can be read as UTF-8.
pub fn is_utf8_label(label: &str) -> bool {
    UTF8_LABELS.iter().any(|known| known.eq_ignore_ascii_case(label))
}

/// Parse tag-file contents into ordered (key, value) pairs. `file` is only used for errors.
pub fn parse_key_values(
    file: &Path,
    contents: &str,
    separator: &str,
) -> Result<Vec<(String, String)>> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for (idx, line) in text::lines(contents).enumerate() {
        let invalid = || BagError::InvalidTagFormat {
            file: file.to_path_buf(),
            line_number: idx + 1,
            line: line.to_string(),
        };
        if line.starts_with(text::is_field_space) {
            let (key, value) = pairs.last_mut().ok_or_else(invalid)?;
            debug!("merging indented line into key [{}] in {:?}", key, file);
            value.push('\n');
            value.push_str(text::trim(line));
            continue;
        }
        let (key, value) = line.split_once(separator).ok_or_else(invalid)?;
        let (key, value) = (text::trim(key).to_string(), text::trim(value).to_string());
        debug!("found key [{}] value [{}] in {:?}", key, value, file);
        pairs.push((key, value));
    }
    Ok(pairs)
}

/// Read a tag file from disk and parse it.
pub fn read_key_values(path: &Path, separator: &str) -> Result<Vec<(String, String)>> {
    let contents = std::fs::read_to_string(path).map_err(|e| BagError::io(path, e))?;
    let contents = contents.strip_prefix('\u{feff}').unwrap_or(&contents);
    parse_key_values(path, contents, separator)
}
