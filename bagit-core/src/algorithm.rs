//! Checksum algorithms named by manifest files, and the replaceable mapping from the
//! bagit token in a filename (`manifest-sha256.txt` -> `sha256`) to an algorithm.

use crate::error::UnsupportedAlgorithm;
use md5::Md5;
use sha1::Sha1;
use sha2::digest::DynDigest;
use sha2::{Sha224, Sha256, Sha384, Sha512};
use std::borrow::Cow;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Canonical identity of a checksum function plus the token that names it in bag filenames.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SupportedAlgorithm {
    message_digest_name: Cow<'static, str>,
    bagit_name: Cow<'static, str>,
}

impl SupportedAlgorithm {
    pub const MD5: Self = Self::standard("MD5", "md5");
    pub const SHA1: Self = Self::standard("SHA-1", "sha1");
    pub const SHA224: Self = Self::standard("SHA-224", "sha224");
    pub const SHA256: Self = Self::standard("SHA-256", "sha256");
    pub const SHA384: Self = Self::standard("SHA-384", "sha384");
    pub const SHA512: Self = Self::standard("SHA-512", "sha512");

    pub const STANDARD: [Self; 6] =
        [Self::MD5, Self::SHA1, Self::SHA224, Self::SHA256, Self::SHA384, Self::SHA512];

    const fn standard(message_digest_name: &'static str, bagit_name: &'static str) -> Self {
        Self {
            message_digest_name: Cow::Borrowed(message_digest_name),
            bagit_name: Cow::Borrowed(bagit_name),
        }
    }

    /// Describe an algorithm outside the standard set, e.g. for a vendor mapping.
    pub fn custom(message_digest_name: impl Into<String>, bagit_name: impl Into<String>) -> Self {
        Self {
            message_digest_name: Cow::Owned(message_digest_name.into()),
            bagit_name: Cow::Owned(bagit_name.into()),
        }
    }

    pub fn message_digest_name(&self) -> &str {
        &self.message_digest_name
    }

    pub fn bagit_name(&self) -> &str {
        &self.bagit_name
    }

    /// A fresh streaming hasher, or `None` when no built-in implementation backs this name.
    pub fn hasher(&self) -> Option<Box<dyn DynDigest>> {
        let h: Box<dyn DynDigest> = match self.message_digest_name.as_ref() {
            "MD5" => Box::new(Md5::default()),
            "SHA-1" => Box::new(Sha1::default()),
            "SHA-224" => Box::new(Sha224::default()),
            "SHA-256" => Box::new(Sha256::default()),
            "SHA-384" => Box::new(Sha384::default()),
            "SHA-512" => Box::new(Sha512::default()),
            _ => return None,
        };
        Some(h)
    }

    /// Lowercase hex digest of everything `reader` yields.
    pub fn digest_reader<R: Read>(&self, mut reader: R) -> io::Result<Option<String>> {
        let Some(mut h) = self.hasher() else {
            return Ok(None);
        };
        let mut buf = vec![0u8; 64 * 1024];
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            h.update(&buf[..n]);
        }
        Ok(Some(hex::encode(h.finalize())))
    }

    pub fn digest_file(&self, path: &Path) -> io::Result<Option<String>> {
        self.digest_reader(File::open(path)?)
    }
}

impl fmt::Display for SupportedAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message_digest_name)
    }
}

/// Resolves the bagit token found in a manifest filename.
pub trait AlgorithmNameMapping: Send + Sync {
    fn supported_algorithm(&self, bagit_name: &str)
        -> Result<SupportedAlgorithm, UnsupportedAlgorithm>;
}

/// The algorithms every reader understands. Tokens match case-insensitively.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardAlgorithmNameMapping;

impl AlgorithmNameMapping for StandardAlgorithmNameMapping {
    fn supported_algorithm(
        &self,
        bagit_name: &str,
    ) -> Result<SupportedAlgorithm, UnsupportedAlgorithm> {
        SupportedAlgorithm::STANDARD
            .into_iter()
            .find(|alg| alg.bagit_name().eq_ignore_ascii_case(bagit_name))
            .ok_or_else(|| UnsupportedAlgorithm { bagit_name: bagit_name.to_string() })
    }
}

impl<F> AlgorithmNameMapping for F
where
    F: Fn(&str) -> Result<SupportedAlgorithm, UnsupportedAlgorithm> + Send + Sync,
{
    fn supported_algorithm(
        &self,
        bagit_name: &str,
    ) -> Result<SupportedAlgorithm, UnsupportedAlgorithm> {
        self(bagit_name)
    }
}
