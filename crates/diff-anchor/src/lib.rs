//! # diff-anchor
//!
//! Stable, revision-anchored addressing for the lines of a single file's diff.
//!
//! Review tools attach annotations to diff lines and need to find those lines
//! again after the diff is regenerated. This crate gives every line two
//! identifiers:
//!
//! - a [`Position`]: the path pair, old/new line numbers and the
//!   base/start/head commits ([`DiffRefs`]) the diff was taken between;
//! - a [`LineCode`]: a compact string derived from the file path and the
//!   line's old/new numbers, usable as a map key or URL fragment.
//!
//! [`DiffFile`] owns the parsed line sequence and answers lookups in both
//! directions. Parsing and content retrieval are pluggable through the
//! [`DiffParser`] and [`ContentResolver`] traits.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use diff_anchor::{Diff, DiffFile, DiffRefs};
//!
//! let diff = Diff::from_git_patch(patch_text);
//! let refs = DiffRefs::new(base_sha, start_sha, head_sha)?;
//! let file = DiffFile::new(diff).with_diff_refs(refs);
//!
//! for line in file.lines()? {
//!     if let Some(code) = file.line_code(line) {
//!         println!("{code} {}", line.content);
//!     }
//! }
//!
//! // Later, with a freshly parsed diff:
//! let line = file.line_for_position(&stored_position)?;
//! ```

pub mod diff_file;
pub mod model;
pub mod parser;
pub mod traits;

// Re-export commonly used types
pub use diff_file::DiffFile;
pub use model::{
    Diff, DiffLine, DiffRefs, DiffRefsError, DiffSide, FileStatus, LineCode, LineCodeError,
    LineKind, Position,
};
pub use parser::{DiffParser, ParseError, UnifiedDiffParser};
pub use traits::{Blob, Commit, ContentResolver, ResolveError};
