use crate::algorithm::{AlgorithmNameMapping, StandardAlgorithmNameMapping};
use crate::bag::{Bag, DEFAULT_TAG_FILE_ENCODING};
use crate::error::{BagError, Result};
use crate::fetch;
use crate::manifest::{self, Manifest, ManifestKind};
use crate::options::{MetadataPrecedence, ReadOptions};
use crate::tag_file::{self, TAG_SEPARATOR};
use crate::version::Version;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

pub const BAGIT_TXT: &str = "bagit.txt";
pub const BAG_INFO_TXT: &str = "bag-info.txt";
/// Metadata file name used by bags of versions 0.93 - 0.95.
pub const PACKAGE_INFO_TXT: &str = "package-info.txt";
pub const FETCH_TXT: &str = "fetch.txt";
/// Hidden tag directory of the incubating layout.
pub const LEGACY_TAG_DIR: &str = ".bagit";

const VERSION_KEY: &str = "BagIt-Version";
const ENCODING_KEY: &str = "Tag-File-Character-Encoding";

/// Reads bags from the filesystem.
///
/// A reader holds no per-read state, so one instance can read any number of bags,
/// concurrently, from any number of threads.
#[derive(Clone)]
pub struct BagReader {
    name_mapping: Arc<dyn AlgorithmNameMapping>,
    options: ReadOptions,
}

impl Default for BagReader {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BagReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BagReader").field("options", &self.options).finish_non_exhaustive()
    }
}

impl BagReader {
    pub fn new() -> Self {
        Self::with_name_mapping(StandardAlgorithmNameMapping)
    }

    /// Use `mapping` instead of the standard algorithm set when resolving manifest names.
    pub fn with_name_mapping(mapping: impl AlgorithmNameMapping + 'static) -> Self {
        Self { name_mapping: Arc::new(mapping), options: ReadOptions::default() }
    }

    pub fn with_options(self, options: ReadOptions) -> Self {
        Self { options, ..self }
    }

    pub fn options(&self) -> &ReadOptions {
        &self.options
    }

    pub fn name_mapping(&self) -> &dyn AlgorithmNameMapping {
        self.name_mapping.as_ref()
    }

    /// Read the bag rooted at `root`. Nothing is returned unless every phase succeeds.
    pub fn read(&self, root: &Path) -> Result<Bag> {
        info!("reading bag at {:?}", root);
        let tag_dir = tag_directory(root);

        let bag = self.read_bagit_text_file(&tag_dir.join(BAGIT_TXT), Bag::new(root))?;
        let bag = self.read_all_manifests(&tag_dir, bag)?;
        let bag = self.read_bag_metadata(&tag_dir, bag)?;

        let fetch_file = tag_dir.join(FETCH_TXT);
        if exists(&fetch_file)? {
            return self.read_fetch(&fetch_file, bag);
        }
        Ok(bag)
    }

    /// Take the version and tag file encoding from bagit.txt. A missing version is malformed,
    /// and an encoding other than UTF-8 (or its ASCII subset) is refused.
    pub fn read_bagit_text_file(&self, bagit_file: &Path, bag: Bag) -> Result<Bag> {
        debug!("reading {:?}", bagit_file);
        let pairs = tag_file::read_key_values(bagit_file, TAG_SEPARATOR)?;

        let mut version = "";
        let mut encoding = DEFAULT_TAG_FILE_ENCODING;
        for (key, value) in &pairs {
            match key.as_str() {
                VERSION_KEY => version = value.as_str(),
                ENCODING_KEY => encoding = value.as_str(),
                _ => {}
            }
        }
        debug!("{} is [{}], {} is [{}]", VERSION_KEY, version, ENCODING_KEY, encoding);

        let version = Version::parse(version)?;
        if !tag_file::is_utf8_label(encoding) {
            return Err(BagError::UnsupportedEncoding {
                file: bagit_file.to_path_buf(),
                encoding: encoding.to_string(),
            });
        }
        Ok(bag.with_version(version).with_tag_file_encoding(encoding))
    }

    /// Parse every `tagmanifest-*` and `manifest-*` file directly inside `tag_dir`.
    pub fn read_all_manifests(&self, tag_dir: &Path, bag: Bag) -> Result<Bag> {
        info!("finding and reading manifests in {:?}", tag_dir);
        let mut payload = Vec::new();
        let mut tags = Vec::new();
        for found in manifest_files(tag_dir) {
            let (kind, path) = found?;
            let manifest = self.read_manifest(&path, bag.root())?;
            match kind {
                ManifestKind::Tag => {
                    debug!("found tag manifest {:?}", path);
                    tags.push(manifest);
                }
                ManifestKind::Payload => {
                    debug!("found payload manifest {:?}", path);
                    payload.push(manifest);
                }
            }
        }
        Ok(bag.with_manifests(payload, tags))
    }

    pub fn read_manifest(&self, manifest_file: &Path, bag_root: &Path) -> Result<Manifest> {
        manifest::read_manifest(manifest_file, bag_root, self.name_mapping())
    }

    /// Read bag-info.txt and/or package-info.txt; a bag with neither has empty metadata.
    pub fn read_bag_metadata(&self, tag_dir: &Path, bag: Bag) -> Result<Bag> {
        info!("reading bag metadata in {:?}", tag_dir);
        let bag_info = tag_dir.join(BAG_INFO_TXT);
        let package_info = tag_dir.join(PACKAGE_INFO_TXT);
        let has_bag_info = exists(&bag_info)?;
        let has_package_info = exists(&package_info)?;

        let mut metadata = Vec::new();
        if has_bag_info {
            debug!("found {:?}", bag_info);
            metadata = tag_file::read_key_values(&bag_info, TAG_SEPARATOR)?;
        }
        if has_package_info {
            let legacy_wins =
                self.options.metadata_precedence == MetadataPrecedence::LegacyPackageInfo;
            if has_bag_info {
                warn!(
                    "bag at {:?} has both {} and {}; using {}",
                    bag.root(),
                    BAG_INFO_TXT,
                    PACKAGE_INFO_TXT,
                    if legacy_wins { PACKAGE_INFO_TXT } else { BAG_INFO_TXT }
                );
            }
            if !has_bag_info || legacy_wins {
                debug!("found {:?}", package_info);
                metadata = tag_file::read_key_values(&package_info, TAG_SEPARATOR)?;
            }
        }
        Ok(bag.with_metadata(metadata))
    }

    pub fn read_fetch(&self, fetch_file: &Path, bag: Bag) -> Result<Bag> {
        info!("reading {:?}", fetch_file);
        let items = fetch::read_fetch(fetch_file, bag.root(), &self.options)?;
        Ok(bag.with_items_to_fetch(items))
    }
}

/// `<root>/.bagit` when present, otherwise `root`.
pub fn tag_directory(root: &Path) -> PathBuf {
    let legacy = root.join(LEGACY_TAG_DIR);
    if legacy.is_dir() {
        debug!("using incubating tag directory {:?}", legacy);
        return legacy;
    }
    root.to_path_buf()
}

/// Manifest files directly inside `tag_dir`, in file name order. Directories are skipped.
pub fn manifest_files(tag_dir: &Path) -> impl Iterator<Item = Result<(ManifestKind, PathBuf)>> {
    let tag_dir = tag_dir.to_path_buf();
    WalkDir::new(&tag_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(move |entry| {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(tag_dir.as_path()).to_path_buf();
                    return Some(Err(BagError::io(path, e.into())));
                }
            };
            if entry.file_type().is_dir() {
                return None;
            }
            let kind = ManifestKind::from_file_name(&entry.file_name().to_string_lossy())?;
            Some(Ok((kind, entry.into_path())))
        })
}

fn exists(path: &Path) -> Result<bool> {
    path.try_exists().map_err(|e| BagError::io(path, e))
}
