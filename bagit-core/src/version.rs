use crate::error::{BagError, Result};
use std::fmt;
use std::str::FromStr;

/// BagIt-Version as declared in bagit.txt. Orders by (major, minor).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parse `MAJOR.MINOR`. Both parts must be plain decimal digits.
    pub fn parse(s: &str) -> Result<Self> {
        let malformed = || BagError::MalformedVersion { version: s.to_string() };
        let (major, minor) = s.split_once('.').ok_or_else(malformed)?;
        Ok(Self {
            major: parse_component(major).ok_or_else(malformed)?,
            minor: parse_component(minor).ok_or_else(malformed)?,
        })
    }
}

fn parse_component(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl FromStr for Version {
    type Err = BagError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
