//! The in-memory model of a bag.
//!
//! A [`Bag`] is never mutated in place. Each read phase consumes the previous snapshot and
//! returns a new one with one more facet filled in, so a finished bag is a plain immutable
//! value that can be shared freely across threads.

use crate::fetch::FetchItem;
use crate::manifest::Manifest;
use crate::version::Version;
use std::path::{Path, PathBuf};

pub const DEFAULT_TAG_FILE_ENCODING: &str = "UTF-8";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bag {
    root: PathBuf,
    version: Version,
    tag_file_encoding: String,
    metadata: Vec<(String, String)>,
    payload_manifests: Vec<Manifest>,
    tag_manifests: Vec<Manifest>,
    items_to_fetch: Vec<FetchItem>,
}

impl Bag {
    /// An empty snapshot rooted at `root`; the read phases fill in the rest.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            version: Version::new(0, 0),
            tag_file_encoding: DEFAULT_TAG_FILE_ENCODING.to_string(),
            metadata: Vec::new(),
            payload_manifests: Vec::new(),
            tag_manifests: Vec::new(),
            items_to_fetch: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Declared Tag-File-Character-Encoding label, `UTF-8` unless bagit.txt says otherwise.
    pub fn tag_file_encoding(&self) -> &str {
        &self.tag_file_encoding
    }

    /// bag-info.txt (or package-info.txt) pairs in file order; keys may repeat.
    pub fn metadata(&self) -> &[(String, String)] {
        &self.metadata
    }

    /// All values recorded for `key`, compared ASCII case-insensitively, in file order.
    pub fn metadata_values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.metadata
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn payload_manifests(&self) -> &[Manifest] {
        &self.payload_manifests
    }

    pub fn tag_manifests(&self) -> &[Manifest] {
        &self.tag_manifests
    }

    /// The payload manifest for a bagit algorithm token such as `sha256`.
    pub fn payload_manifest(&self, bagit_name: &str) -> Option<&Manifest> {
        find_manifest(&self.payload_manifests, bagit_name)
    }

    pub fn tag_manifest(&self, bagit_name: &str) -> Option<&Manifest> {
        find_manifest(&self.tag_manifests, bagit_name)
    }

    pub fn items_to_fetch(&self) -> &[FetchItem] {
        &self.items_to_fetch
    }

    pub fn with_version(self, version: Version) -> Self {
        Self { version, ..self }
    }

    pub fn with_tag_file_encoding(self, tag_file_encoding: impl Into<String>) -> Self {
        Self { tag_file_encoding: tag_file_encoding.into(), ..self }
    }

    pub fn with_metadata(self, metadata: Vec<(String, String)>) -> Self {
        Self { metadata, ..self }
    }

    pub fn with_manifests(
        self,
        payload_manifests: Vec<Manifest>,
        tag_manifests: Vec<Manifest>,
    ) -> Self {
        Self { payload_manifests, tag_manifests, ..self }
    }

    pub fn with_items_to_fetch(self, items_to_fetch: Vec<FetchItem>) -> Self {
        Self { items_to_fetch, ..self }
    }
}

fn find_manifest<'a>(manifests: &'a [Manifest], bagit_name: &str) -> Option<&'a Manifest> {
    manifests.iter().find(|m| m.algorithm().bagit_name().eq_ignore_ascii_case(bagit_name))
}
