use crate::algorithm::{AlgorithmNameMapping, SupportedAlgorithm};
use crate::error::{BagError, Result};
use crate::path_codec;
use crate::text;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const PAYLOAD_MANIFEST_PREFIX: &str = "manifest-";
pub const TAG_MANIFEST_PREFIX: &str = "tagmanifest-";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ManifestKind {
    /// `manifest-<alg>.txt`, checksums of payload files.
    Payload,
    /// `tagmanifest-<alg>.txt`, checksums of the bag's own tag files.
    Tag,
}

impl ManifestKind {
    /// Classify a file name. `tagmanifest-` is tested first; `manifest-` is a suffix of it.
    pub fn from_file_name(name: &str) -> Option<Self> {
        if name.starts_with(TAG_MANIFEST_PREFIX) {
            Some(ManifestKind::Tag)
        } else if name.starts_with(PAYLOAD_MANIFEST_PREFIX) {
            Some(ManifestKind::Payload)
        } else {
            None
        }
    }
}

/// Checksums for one algorithm, keyed by the absolute path of each file inside the bag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Manifest {
    algorithm: SupportedAlgorithm,
    file_to_checksum: BTreeMap<PathBuf, String>,
}

impl Manifest {
    pub fn new(algorithm: SupportedAlgorithm) -> Self {
        Self { algorithm, file_to_checksum: BTreeMap::new() }
    }

    pub fn algorithm(&self) -> &SupportedAlgorithm {
        &self.algorithm
    }

    pub fn file_to_checksum(&self) -> &BTreeMap<PathBuf, String> {
        &self.file_to_checksum
    }

    pub fn checksum_for(&self, path: &Path) -> Option<&str> {
        self.file_to_checksum.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.file_to_checksum.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file_to_checksum.is_empty()
    }
}

/// The algorithm token of a manifest file name: `tagmanifest-sha512.txt` -> `sha512`.
pub fn algorithm_token(file_name: &str) -> Option<&str> {
    let (_, rest) = file_name.split_once('-')?;
    let token = rest.split(['-', '.']).next()?;
    (!token.is_empty()).then_some(token)
}

/// Parse manifest contents. Every path is decoded and must resolve inside `bag_root`;
/// a path listed twice keeps the checksum from its last line.
pub fn parse_manifest(
    manifest_file: &Path,
    contents: &str,
    bag_root: &Path,
    algorithm: SupportedAlgorithm,
) -> Result<Manifest> {
    let mut manifest = Manifest::new(algorithm);
    for (idx, line) in text::lines(contents).enumerate() {
        if text::is_blank(line) {
            continue;
        }
        let (checksum, encoded) = text::split_field(line)
            .filter(|(checksum, encoded)| !checksum.is_empty() && !encoded.is_empty())
            .ok_or_else(|| BagError::InvalidManifestLine {
                manifest: manifest_file.to_path_buf(),
                line_number: idx + 1,
                line: line.to_string(),
            })?;
        let file = path_codec::resolve_within(bag_root, encoded).map_err(|source| {
            BagError::MaliciousManifest { manifest: manifest_file.to_path_buf(), source }
        })?;
        debug!("read checksum [{}] and file {:?} from manifest {:?}", checksum, file, manifest_file);
        manifest.file_to_checksum.insert(file, checksum.to_string());
    }
    Ok(manifest)
}

/// Read one `manifest-*` or `tagmanifest-*` file, resolving its algorithm through `mapping`.
pub fn read_manifest(
    manifest_file: &Path,
    bag_root: &Path,
    mapping: &dyn AlgorithmNameMapping,
) -> Result<Manifest> {
    debug!("reading manifest {:?}", manifest_file);
    let file_name = manifest_file.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    let token = algorithm_token(&file_name).unwrap_or_default();
    let algorithm = mapping.supported_algorithm(token).map_err(|source| {
        BagError::UnsupportedAlgorithm { manifest: manifest_file.to_path_buf(), source }
    })?;
    let contents =
        std::fs::read_to_string(manifest_file).map_err(|e| BagError::io(manifest_file, e))?;
    parse_manifest(manifest_file, &contents, bag_root, algorithm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::StandardAlgorithmNameMapping;

    fn parse(contents: &str) -> Result<Manifest> {
        parse_manifest(
            Path::new("/bag/manifest-md5.txt"),
            contents,
            Path::new("/bag"),
            SupportedAlgorithm::MD5,
        )
    }

    #[test]
    fn classifies_file_names() {
        assert_eq!(ManifestKind::from_file_name("tagmanifest-md5.txt"), Some(ManifestKind::Tag));
        assert_eq!(ManifestKind::from_file_name("manifest-md5.txt"), Some(ManifestKind::Payload));
        assert_eq!(ManifestKind::from_file_name("bag-info.txt"), None);
    }

    #[test]
    fn extracts_algorithm_token() {
        assert_eq!(algorithm_token("manifest-sha256.txt"), Some("sha256"));
        assert_eq!(algorithm_token("tagmanifest-MD5.txt"), Some("MD5"));
        assert_eq!(algorithm_token("manifest-.txt"), None);
        assert_eq!(algorithm_token("manifest"), None);
    }

    #[test]
    fn splits_checksum_from_path_on_first_whitespace_run() {
        let m = parse("abc123  sub/dir/file.txt\nDEF456\tdata/name with spaces.txt\n").unwrap();
        assert_eq!(m.checksum_for(Path::new("/bag/sub/dir/file.txt")), Some("abc123"));
        assert_eq!(m.checksum_for(Path::new("/bag/data/name with spaces.txt")), Some("DEF456"));
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn last_declaration_wins() {
        let m = parse("aaaa data/a.txt\nbbbb data/a.txt\n").unwrap();
        assert_eq!(m.len(), 1);
        assert_eq!(m.checksum_for(Path::new("/bag/data/a.txt")), Some("bbbb"));
    }

    #[test]
    fn cr_only_and_crlf_manifests_keep_every_entry() {
        let cr = "aaaa data/a.txt\rbbbb data/b.txt\r";
        let crlf = "aaaa data/a.txt\r\nbbbb data/b.txt\r\n";
        for contents in [cr, crlf] {
            let m = parse(contents).unwrap();
            assert_eq!(m.len(), 2, "{contents:?}");
            assert_eq!(m.checksum_for(Path::new("/bag/data/a.txt")), Some("aaaa"));
            assert_eq!(m.checksum_for(Path::new("/bag/data/b.txt")), Some("bbbb"));
        }
    }

    #[test]
    fn unicode_space_at_start_of_path_is_kept() {
        let m = parse("aaaa \u{a0}file.txt\nbbbb\t\u{3000}other.txt\n").unwrap();
        assert_eq!(m.checksum_for(Path::new("/bag/\u{a0}file.txt")), Some("aaaa"));
        assert_eq!(m.checksum_for(Path::new("/bag/\u{3000}other.txt")), Some("bbbb"));
        assert_eq!(m.checksum_for(Path::new("/bag/file.txt")), None);
    }

    #[test]
    fn skips_blank_lines() {
        let m = parse("\naaaa data/a.txt\n   \n").unwrap();
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn single_field_line_is_a_manifest_format_error() {
        let err = parse("aaaa data/a.txt\nlonelychecksum\n").unwrap_err();
        assert!(matches!(err, BagError::InvalidManifestLine { line_number: 2, .. }), "{err}");
        let err = parse(" data/a.txt\n").unwrap_err();
        assert!(matches!(err, BagError::InvalidManifestLine { line_number: 1, .. }), "{err}");
    }

    #[test]
    fn escaping_path_is_malicious() {
        let err = parse("abc ../outside.txt\n").unwrap_err();
        assert!(err.is_security_violation());
        match err {
            BagError::MaliciousManifest { source, .. } => {
                assert_eq!(source.root, PathBuf::from("/bag"));
                assert_eq!(source.path, PathBuf::from("/bag/../outside.txt"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_algorithm_in_file_name_is_rejected_before_reading() {
        let err = read_manifest(
            Path::new("/does/not/exist/manifest-crc32.txt"),
            Path::new("/does/not/exist"),
            &StandardAlgorithmNameMapping,
        )
        .unwrap_err();
        assert!(matches!(err, BagError::UnsupportedAlgorithm { ref source, .. } if source.bagit_name == "crc32"));
    }
}
