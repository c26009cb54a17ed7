use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A bagit algorithm token that no registered algorithm claims.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported algorithm [{bagit_name}]")]
pub struct UnsupportedAlgorithm {
    pub bagit_name: String,
}

/// A decoded path that normalizes to somewhere outside the bag root.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("path {path:?} is outside the bag root directory {root:?}")]
pub struct PathEscape {
    pub path: PathBuf,
    pub root: PathBuf,
}

/// Everything that can abort a bag read.
#[derive(Error, Debug)]
pub enum BagError {
    #[error("version must be in format MAJOR.MINOR but was [{version}]")]
    MalformedVersion { version: String },

    #[error(
        "line {line_number} [{line}] of {file:?} is not a valid tag file line; \
         it must be <key>:<value> or, when continuing the previous value, indented by a space or a tab"
    )]
    InvalidTagFormat { file: PathBuf, line_number: usize, line: String },

    #[error("{file:?} declares tag file encoding [{encoding}]; only UTF-8 tag files can be read")]
    UnsupportedEncoding { file: PathBuf, encoding: String },

    #[error("manifest {manifest:?} uses an unsupported algorithm")]
    UnsupportedAlgorithm {
        manifest: PathBuf,
        #[source]
        source: UnsupportedAlgorithm,
    },

    #[error("manifest {manifest:?} references a path outside the bag")]
    MaliciousManifest {
        manifest: PathBuf,
        #[source]
        source: PathEscape,
    },

    #[error("line {line_number} [{line}] of manifest {manifest:?} is not <checksum> <path>")]
    InvalidManifestLine { manifest: PathBuf, line_number: usize, line: String },

    #[error("line {line_number} [{line}] of {file:?} is not a valid fetch entry: {reason}")]
    InvalidFetchLine { file: PathBuf, line_number: usize, line: String, reason: String },

    #[error("fetch file {file:?} has a destination outside the bag")]
    MaliciousFetchItem {
        file: PathBuf,
        #[source]
        source: PathEscape,
    },

    #[error("i/o error on {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BagError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        BagError::Io { path: path.into(), source }
    }

    /// True for errors raised because a bag tried to reference something outside its root.
    pub fn is_security_violation(&self) -> bool {
        matches!(self, BagError::MaliciousManifest { .. } | BagError::MaliciousFetchItem { .. })
    }
}

pub type Result<T, E = BagError> = std::result::Result<T, E>;
