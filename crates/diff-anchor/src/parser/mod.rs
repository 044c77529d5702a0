//! Turning raw diff text into line sequences and metadata.

mod git_header;
mod unified;

pub use git_header::read_git_header;
pub use unified::UnifiedDiffParser;

use crate::model::DiffLine;
use thiserror::Error;

/// Errors that can occur during diff parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to parse diff: {0}")]
    ParseFailed(String),
    #[error("Expected a single file diff, found {0} files")]
    UnexpectedFileCount(usize),
}

/// Produces the ordered line sequence of one file's diff.
///
/// Implementations must keep source order, classify every line, and set
/// line numbers according to the kind: additions have no old number,
/// deletions no new number, meta lines neither. `index` must equal the
/// line's position in the returned vector.
pub trait DiffParser {
    fn parse(&self, raw: &str) -> Result<Vec<DiffLine>, ParseError>;
}
