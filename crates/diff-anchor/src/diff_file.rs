//! One file's diff with stable line addressing.
//!
//! [`DiffFile`] owns the lazily parsed line sequence of a single file and
//! translates between lines, [`Position`]s and [`LineCode`]s. Lookups that
//! cannot be answered (no diff refs, meta line, unknown commit) return
//! `None`; only a malformed payload is an error.

use crate::model::{Diff, DiffLine, DiffRefs, LineCode, Position};
use crate::parser::{DiffParser, ParseError, UnifiedDiffParser};
use crate::traits::{Blob, Commit, ContentResolver};
use once_cell::unsync::OnceCell;

static DEFAULT_PARSER: UnifiedDiffParser = UnifiedDiffParser;

/// A single file's diff between two revisions.
///
/// The line sequence is parsed on first use and never changes afterwards.
/// Not meant to be shared between threads; build one per request.
pub struct DiffFile<'a> {
    diff: Diff,
    diff_refs: Option<DiffRefs>,
    parser: &'a dyn DiffParser,
    repository: Option<&'a dyn ContentResolver>,
    lines: OnceCell<Vec<DiffLine>>,
}

impl std::fmt::Debug for DiffFile<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiffFile")
            .field("diff", &self.diff)
            .field("diff_refs", &self.diff_refs)
            .field("has_repository", &self.repository.is_some())
            .field("lines", &self.lines.get().map(Vec::len))
            .finish()
    }
}

impl<'a> DiffFile<'a> {
    /// Create a diff file using the default unified diff parser.
    pub fn new(diff: Diff) -> Self {
        Self {
            diff,
            diff_refs: None,
            parser: &DEFAULT_PARSER,
            repository: None,
            lines: OnceCell::new(),
        }
    }

    /// Attach the commits the diff was computed between.
    pub fn with_diff_refs(mut self, diff_refs: DiffRefs) -> Self {
        self.diff_refs = Some(diff_refs);
        self
    }

    /// Attach a backend for blob lookups.
    pub fn with_repository(mut self, repository: &'a dyn ContentResolver) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Use a different parser for the line sequence.
    pub fn with_parser(mut self, parser: &'a dyn DiffParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn diff(&self) -> &Diff {
        &self.diff
    }

    pub fn diff_refs(&self) -> Option<&DiffRefs> {
        self.diff_refs.as_ref()
    }

    // === Diff metadata ===

    pub fn old_path(&self) -> Option<&str> {
        self.diff.old_path.as_deref()
    }

    pub fn new_path(&self) -> Option<&str> {
        self.diff.new_path.as_deref()
    }

    pub fn a_mode(&self) -> Option<&str> {
        self.diff.a_mode.as_deref()
    }

    pub fn b_mode(&self) -> Option<&str> {
        self.diff.b_mode.as_deref()
    }

    pub fn new_file(&self) -> bool {
        self.diff.new_file
    }

    pub fn deleted_file(&self) -> bool {
        self.diff.deleted_file
    }

    pub fn renamed_file(&self) -> bool {
        self.diff.renamed_file
    }

    pub fn submodule(&self) -> bool {
        self.diff.submodule
    }

    pub fn too_large(&self) -> bool {
        self.diff.too_large
    }

    pub fn raw_diff(&self) -> &str {
        &self.diff.diff
    }

    /// True iff both modes are known and differ.
    pub fn mode_changed(&self) -> bool {
        matches!((self.a_mode(), self.b_mode()), (Some(a), Some(b)) if a != b)
    }

    /// Old and new path, skipping absent ones. Equal paths are both kept.
    pub fn paths(&self) -> Vec<&str> {
        [self.old_path(), self.new_path()]
            .into_iter()
            .flatten()
            .collect()
    }

    /// The path used for line codes and blob lookups: the new path, falling
    /// back to the old one for deletions.
    pub fn file_path(&self) -> Option<&str> {
        self.new_path()
            .filter(|p| !p.is_empty())
            .or_else(|| self.old_path().filter(|p| !p.is_empty()))
    }

    // === Line sequence ===

    /// The parsed line sequence, computed on first call.
    pub fn lines(&self) -> Result<&[DiffLine], ParseError> {
        self.lines
            .get_or_try_init(|| {
                log::debug!("Parsing diff lines for {:?}", self.file_path());
                self.parser.parse(self.raw_diff())
            })
            .map(Vec::as_slice)
    }

    /// The line after `index`, if any.
    pub fn next_line(&self, index: usize) -> Result<Option<&DiffLine>, ParseError> {
        Ok(self.lines()?.get(index.saturating_add(1)))
    }

    /// The line before `index`, if any.
    pub fn prev_line(&self, index: usize) -> Result<Option<&DiffLine>, ParseError> {
        let lines = self.lines()?;
        Ok(index.checked_sub(1).and_then(|i| lines.get(i)))
    }

    /// Number of added lines.
    pub fn added_lines(&self) -> Result<usize, ParseError> {
        Ok(self.lines()?.iter().filter(|l| l.is_added()).count())
    }

    /// Number of removed lines.
    pub fn removed_lines(&self) -> Result<usize, ParseError> {
        Ok(self.lines()?.iter().filter(|l| l.is_removed()).count())
    }

    // === Addressing ===

    /// The position of `line`, or `None` when the diff has no refs.
    pub fn position(&self, line: &DiffLine) -> Option<Position> {
        let diff_refs = self.diff_refs.as_ref()?;

        Some(Position::new(
            self.diff.old_path.clone(),
            self.diff.new_path.clone(),
            line.old_line,
            line.new_line,
            diff_refs,
        ))
    }

    /// The line code of `line`. Meta lines have none.
    pub fn line_code(&self, line: &DiffLine) -> Option<LineCode> {
        if line.is_meta() {
            return None;
        }

        let Some(file_path) = self.file_path() else {
            log::warn!("Diff has neither an old nor a new path; lines are unaddressable");
            return None;
        };

        Some(LineCode::generate(file_path, line.old_line, line.new_line))
    }

    /// The first line whose code equals `code`.
    pub fn line_for_line_code(&self, code: &LineCode) -> Result<Option<&DiffLine>, ParseError> {
        Ok(self
            .lines()?
            .iter()
            .find(|line| self.line_code(line).as_ref() == Some(code)))
    }

    /// The first line whose position has the same key as `position`.
    pub fn line_for_position(
        &self,
        position: &Position,
    ) -> Result<Option<&DiffLine>, ParseError> {
        let key = position.key();
        Ok(self.lines()?.iter().find(|line| {
            self.position(line)
                .is_some_and(|candidate| candidate.key() == key)
        }))
    }

    pub fn position_for_line_code(&self, code: &LineCode) -> Result<Option<Position>, ParseError> {
        Ok(self
            .line_for_line_code(code)?
            .and_then(|line| self.position(line)))
    }

    pub fn line_code_for_position(
        &self,
        position: &Position,
    ) -> Result<Option<LineCode>, ParseError> {
        Ok(self
            .line_for_position(position)?
            .and_then(|line| self.line_code(line)))
    }

    // === Content ===

    /// The commit whose tree holds this file's content: base for deletions,
    /// head otherwise.
    pub fn content_commit(&self) -> Option<Commit> {
        let diff_refs = self.diff_refs.as_ref()?;
        let repository = self.repository?;

        let commit_id = if self.deleted_file() {
            diff_refs.old_ref()
        } else {
            diff_refs.new_ref()
        };
        if commit_id.is_empty() {
            return None;
        }

        match repository.commit(commit_id) {
            Ok(commit) => commit,
            Err(e) => {
                log::warn!("Failed to look up commit {}: {}", commit_id, e);
                None
            }
        }
    }

    /// This file's blob at [`content_commit`](Self::content_commit).
    pub fn blob(&self) -> Option<Blob> {
        self.blob_at_commit(&self.content_commit()?)
    }

    /// This file's blob at `commit`.
    pub fn blob_at_commit(&self, commit: &Commit) -> Option<Blob> {
        let path = self.file_path()?;
        self.fetch_blob(&commit.id, path)
    }

    /// The pre-change blob: the old path at the parent of
    /// [`content_commit`](Self::content_commit).
    pub fn old_blob(&self) -> Option<Blob> {
        self.old_blob_at_commit(&self.content_commit()?)
    }

    /// The old path at the parent of `commit`. `None` for root commits.
    pub fn old_blob_at_commit(&self, commit: &Commit) -> Option<Blob> {
        let parent_id = commit.parent_id.as_deref()?;
        let path = self.old_path()?;
        self.fetch_blob(parent_id, path)
    }

    fn fetch_blob(&self, commit_id: &str, path: &str) -> Option<Blob> {
        let repository = self.repository?;

        match repository.blob_at(commit_id, path) {
            Ok(blob) => blob,
            Err(e) => {
                log::warn!("Failed to fetch {} at {}: {}", path, commit_id, e);
                None
            }
        }
    }
}
