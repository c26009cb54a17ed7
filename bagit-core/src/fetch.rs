use crate::error::{BagError, Result};
use crate::options::ReadOptions;
use crate::path_codec;
use crate::text;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use url::Url;

/// One fetch.txt entry: payload bytes that live at `url` rather than in the bag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchItem {
    pub url: Url,
    /// Declared byte count; `None` when the file says `-`.
    pub length: Option<u64>,
    /// Destination, relative to the bag root.
    pub path: PathBuf,
}

impl FetchItem {
    pub fn new(url: Url, length: Option<u64>, path: impl Into<PathBuf>) -> Self {
        Self { url, length, path: path.into() }
    }
}

fn split_fields(line: &str) -> Option<(&str, &str, &str)> {
    let (url, rest) = text::split_field(line)?;
    let (length, path) = text::split_field(rest)?;
    (!url.is_empty() && !length.is_empty() && !path.is_empty()).then_some((url, length, path))
}

fn parse_length(token: &str) -> std::result::Result<Option<u64>, String> {
    if token == "-" {
        return Ok(None);
    }
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("length [{token}] is neither a byte count nor -"));
    }
    token.parse().map(Some).map_err(|e| format!("length [{token}]: {e}"))
}

/// Parse fetch.txt contents: `<url> <length|-> <path>` per line, blank lines ignored.
pub fn parse_fetch(
    fetch_file: &Path,
    contents: &str,
    bag_root: &Path,
    options: &ReadOptions,
) -> Result<Vec<FetchItem>> {
    let mut items = Vec::new();
    for (idx, line) in text::lines(contents).enumerate() {
        if text::is_blank(line) {
            continue;
        }
        let invalid = |reason: String| BagError::InvalidFetchLine {
            file: fetch_file.to_path_buf(),
            line_number: idx + 1,
            line: line.to_string(),
            reason,
        };
        let (url, length, encoded) = split_fields(line)
            .ok_or_else(|| invalid("expected <url> <length> <path>".to_string()))?;
        let length = parse_length(length).map_err(invalid)?;
        let url = Url::parse(url).map_err(|e| invalid(format!("url [{url}]: {e}")))?;

        match path_codec::resolve_within(bag_root, encoded) {
            Ok(_) => {}
            Err(source) if options.check_fetch_containment => {
                return Err(BagError::MaliciousFetchItem { file: fetch_file.to_path_buf(), source });
            }
            Err(escape) => warn!("fetch destination not checked for containment: {}", escape),
        }

        let path = PathBuf::from(path_codec::decode_filename(encoded));
        debug!("read url [{}] length {:?} path {:?} from {:?}", url, length, path, fetch_file);
        items.push(FetchItem { url, length, path });
    }
    Ok(items)
}

pub fn read_fetch(
    fetch_file: &Path,
    bag_root: &Path,
    options: &ReadOptions,
) -> Result<Vec<FetchItem>> {
    let contents =
        std::fs::read_to_string(fetch_file).map_err(|e| BagError::io(fetch_file, e))?;
    parse_fetch(fetch_file, &contents, bag_root, options)
}
