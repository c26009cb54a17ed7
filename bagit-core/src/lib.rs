//! Reading BagIt bags from disk into an immutable, validated [`Bag`].

pub mod algorithm;
pub mod bag;
pub mod error;
pub mod fetch;
pub mod manifest;
pub mod options;
pub mod path_codec;
pub mod reader;
pub mod tag_file;
mod text;
pub mod version;

pub use algorithm::{AlgorithmNameMapping, StandardAlgorithmNameMapping, SupportedAlgorithm};
pub use bag::Bag;
pub use error::{BagError, PathEscape, UnsupportedAlgorithm};
pub use fetch::FetchItem;
pub use manifest::{Manifest, ManifestKind};
pub use options::{MetadataPrecedence, ReadOptions};
pub use reader::BagReader;
pub use version::Version;
