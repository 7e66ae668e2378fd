// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Version hash: the opaque identifier of one installed build.

use serde::{Deserialize, Serialize};

use crate::StoreError;

/// Identifier of an installed build, e.g. `8f3c2a1`.
///
/// Hashes become part of directory names, so parsing rejects anything that
/// could escape the data root (separators, `..`, whitespace).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionHash(String);

impl VersionHash {
    /// Parse and validate a hash.
    pub fn parse(s: impl Into<String>) -> Result<Self, StoreError> {
        let s = s.into();
        if s.is_empty()
            || s == "."
            || s.contains("..")
            || s.contains('/')
            || s.contains('\\')
            || s.chars().any(char::is_whitespace)
        {
            return Err(StoreError::InvalidHash(s));
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VersionHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for VersionHash {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for VersionHash {
    type Error = StoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<VersionHash> for String {
    fn from(hash: VersionHash) -> Self {
        hash.0
    }
}

impl AsRef<str> for VersionHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for VersionHash {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for VersionHash {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
#[path = "hash_tests.rs"]
mod tests;
