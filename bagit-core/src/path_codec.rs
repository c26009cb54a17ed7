use crate::error::PathEscape;
use std::path::{Component, Path, PathBuf};

/// Decode a path token as written in a manifest or fetch.txt.
///
/// Percent escapes `%0A`, `%0D` and `%25` (hex in either case) and backslash escapes
/// `\n`, `\r`, `\t`, `\\` and `\ ` are recognised. Anything else is kept literally.
pub fn decode_filename(encoded: &str) -> String {
    let mut out = String::with_capacity(encoded.len());
    let mut chars = encoded.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '%' => {
                let mut ahead = chars.clone();
                let hex: String = ahead.by_ref().take(2).collect();
                let decoded = match hex.to_ascii_uppercase().as_str() {
                    "0A" => Some('\n'),
                    "0D" => Some('\r'),
                    "25" => Some('%'),
                    _ => None,
                };
                match decoded {
                    Some(d) => {
                        out.push(d);
                        chars = ahead;
                    }
                    None => out.push('%'),
                }
            }
            '\\' => {
                let decoded = match chars.peek() {
                    Some('n') => Some('\n'),
                    Some('r') => Some('\r'),
                    Some('t') => Some('\t'),
                    Some('\\') => Some('\\'),
                    Some(' ') => Some(' '),
                    _ => None,
                };
                match decoded {
                    Some(d) => {
                        out.push(d);
                        chars.next();
                    }
                    None => out.push('\\'),
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Lexically resolve `.` and `..` without touching the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Decode `encoded` and join it to `root`, refusing anything that does not stay strictly
/// below `root` once normalized. Absolute tokens always escape.
pub fn resolve_within(root: &Path, encoded: &str) -> Result<PathBuf, PathEscape> {
    let decoded = PathBuf::from(decode_filename(encoded));
    let rel = normalize(&decoded);
    let contained = !rel.as_os_str().is_empty()
        && rel.components().all(|c| matches!(c, Component::Normal(_)));
    if !contained {
        return Err(PathEscape { path: root.join(&decoded), root: root.to_path_buf() });
    }
    Ok(root.join(rel))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_percent_escapes() {
        assert_eq!(decode_filename("a%0Ab%0dc%25d"), "a\nb\rc%d");
        assert_eq!(decode_filename("100%"), "100%");
        assert_eq!(decode_filename("%41"), "%41");
    }

    #[test]
    fn decodes_backslash_escapes() {
        assert_eq!(decode_filename(r"a\ b\tc\\d\ne"), "a b\tc\\d\ne");
        assert_eq!(decode_filename(r"dir\file"), r"dir\file");
        assert_eq!(decode_filename("trailing\\"), "trailing\\");
    }

    #[test]
    fn normalize_is_lexical() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("a/../../b")), PathBuf::from("../b"));
        assert_eq!(normalize(Path::new("/..")), PathBuf::from("/"));
    }

    #[test]
    fn resolves_contained_paths() {
        let root = Path::new("/bags/one");
        assert_eq!(
            resolve_within(root, "data/sub/../file.txt").unwrap(),
            PathBuf::from("/bags/one/data/file.txt")
        );
        assert_eq!(
            resolve_within(root, "data/with%0Anewline").unwrap(),
            PathBuf::from("/bags/one/data/with\nnewline")
        );
    }

    #[test]
    fn rejects_escapes() {
        for root in ["/bags/one", "relative/bag", ".", ""] {
            let root = Path::new(root);
            for bad in ["../outside.txt", "data/../../outside.txt", "/etc/passwd", ".", "a/.."] {
                let err = resolve_within(root, bad).expect_err(bad);
                assert_eq!(err.root, root);
            }
        }
    }
}
