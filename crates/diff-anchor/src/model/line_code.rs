//! Compact line identifiers.
//!
//! A line code has the shape `<sha1(path)>_<old>_<new>`. A missing line
//! number is written as `0`; diff line numbers start at 1, so the two never
//! collide.

use sha1::{Digest, Sha1};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const DIGEST_LENGTH: usize = 40;

/// Errors that can occur when parsing a line code.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineCodeError {
    #[error("Line code must have three '_'-separated parts: {0}")]
    InvalidShape(String),
    #[error("Invalid path digest in line code: {0}")]
    InvalidDigest(String),
    #[error("Invalid line number in line code: {0}")]
    InvalidLineNumber(String),
}

/// A deterministic string key for one diff line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineCode(String);

impl LineCode {
    /// Derive the code for a line of `file_path`.
    pub fn generate(file_path: &str, old_line: Option<u32>, new_line: Option<u32>) -> Self {
        Self(format!(
            "{}_{}_{}",
            path_digest(file_path),
            old_line.unwrap_or(0),
            new_line.unwrap_or(0)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The SHA-1 hex digest of the path this code was generated for.
    pub fn path_digest(&self) -> &str {
        &self.0[..DIGEST_LENGTH]
    }

    /// Check whether this code belongs to a line of `file_path`.
    pub fn matches_path(&self, file_path: &str) -> bool {
        self.path_digest() == path_digest(file_path)
    }

    /// The (old, new) line numbers encoded in the code.
    pub fn line_numbers(&self) -> (Option<u32>, Option<u32>) {
        let mut parts = self.0[DIGEST_LENGTH + 1..].split('_');
        let mut next = || {
            parts
                .next()
                .and_then(|n| n.parse::<u32>().ok())
                .filter(|n| *n != 0)
        };
        let old = next();
        let new = next();
        (old, new)
    }
}

impl fmt::Display for LineCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LineCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for LineCode {
    type Err = LineCodeError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = code.split('_').collect();
        let [digest, old, new] = parts.as_slice() else {
            return Err(LineCodeError::InvalidShape(code.to_string()));
        };

        if digest.len() != DIGEST_LENGTH || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(LineCodeError::InvalidDigest(digest.to_string()));
        }
        let line_number = |number: &str| {
            number
                .parse::<u32>()
                .map_err(|_| LineCodeError::InvalidLineNumber(number.to_string()))
        };
        let old = line_number(*old)?;
        let new = line_number(*new)?;

        // Rebuilt so "+5" or "05" compare equal to generated codes
        Ok(Self(format!(
            "{}_{}_{}",
            digest.to_ascii_lowercase(),
            old,
            new
        )))
    }
}

fn path_digest(file_path: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(file_path.as_bytes());
    format!("{:x}", hasher.finalize())
}
