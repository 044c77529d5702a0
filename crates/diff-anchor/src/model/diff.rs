//! Diff data structures for a single file's change.

/// The underlying diff of one file: its raw payload plus the metadata the
/// VCS reported about it.
///
/// Nothing here is computed from the payload; the flags and modes are taken
/// as given by whoever produced the diff (see [`Diff::from_git_patch`] for the
/// git header reader).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diff {
    /// Raw unified diff text (hunks, optionally preceded by file headers).
    pub diff: String,
    /// Path before the change (`None` for added files).
    pub old_path: Option<String>,
    /// Path after the change (`None` for deleted files).
    pub new_path: Option<String>,
    /// File mode before the change (e.g. "100644").
    pub a_mode: Option<String>,
    /// File mode after the change.
    pub b_mode: Option<String>,
    pub new_file: bool,
    pub deleted_file: bool,
    pub renamed_file: bool,
    pub submodule: bool,
    pub too_large: bool,
}

impl Diff {
    /// Create a diff for an unchanged path with the given payload.
    pub fn new(path: impl Into<String>, diff: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            diff: diff.into(),
            old_path: Some(path.clone()),
            new_path: Some(path),
            ..Self::default()
        }
    }

    /// Set both paths explicitly (renames, additions, deletions).
    pub fn with_paths(mut self, old_path: Option<String>, new_path: Option<String>) -> Self {
        self.old_path = old_path;
        self.new_path = new_path;
        self
    }

    /// Set the before/after file modes.
    pub fn with_modes(mut self, a_mode: Option<String>, b_mode: Option<String>) -> Self {
        self.a_mode = a_mode;
        self.b_mode = b_mode;
        self
    }

    /// Mark this diff as introducing a new file.
    pub fn added(mut self) -> Self {
        self.new_file = true;
        self
    }

    /// Mark this diff as removing the file.
    pub fn deleted(mut self) -> Self {
        self.deleted_file = true;
        self
    }

    /// Mark this diff as a rename.
    pub fn renamed(mut self) -> Self {
        self.renamed_file = true;
        self
    }

    /// Build a diff from a single-file git patch, reading the extended header
    /// (`diff --git`, mode lines, rename lines, `---`/`+++`).
    pub fn from_git_patch(patch: &str) -> Self {
        crate::parser::read_git_header(patch)
    }

    /// Drop the payload of a diff whose raw text exceeds `limit` bytes.
    ///
    /// A pruned diff keeps its metadata but has no addressable lines.
    /// Returns `true` if the diff was pruned.
    pub fn prune_if_larger_than(&mut self, limit: usize) -> bool {
        if self.diff.len() <= limit {
            return false;
        }
        log::debug!(
            "Pruning diff for {:?}: {} bytes exceeds limit of {}",
            self.new_path.as_deref().or(self.old_path.as_deref()),
            self.diff.len(),
            limit
        );
        self.diff.clear();
        self.too_large = true;
        true
    }

    /// Get the file status derived from the metadata flags.
    pub fn status(&self) -> FileStatus {
        if self.new_file {
            FileStatus::Added
        } else if self.deleted_file {
            FileStatus::Deleted
        } else if self.renamed_file {
            FileStatus::Renamed
        } else {
            FileStatus::Modified
        }
    }
}

/// File status in the diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
}

impl FileStatus {
    /// Get a single-character representation.
    pub fn as_char(&self) -> char {
        match self {
            FileStatus::Added => 'A',
            FileStatus::Modified => 'M',
            FileStatus::Deleted => 'D',
            FileStatus::Renamed => 'R',
        }
    }
}

/// A single line in the diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    /// Line type.
    pub kind: LineKind,
    /// Line content (without leading +/-/ ).
    pub content: String,
    /// Line number in old file (for Context and Deletion).
    pub old_line: Option<u32>,
    /// Line number in new file (for Context and Addition).
    pub new_line: Option<u32>,
    /// Position of this line within the diff's line sequence.
    pub index: usize,
}

impl DiffLine {
    /// Create a new context line.
    pub fn context(content: impl Into<String>, old_line: u32, new_line: u32) -> Self {
        Self {
            kind: LineKind::Context,
            content: content.into(),
            old_line: Some(old_line),
            new_line: Some(new_line),
            index: 0,
        }
    }

    /// Create a new addition line.
    pub fn addition(content: impl Into<String>, new_line: u32) -> Self {
        Self {
            kind: LineKind::Addition,
            content: content.into(),
            old_line: None,
            new_line: Some(new_line),
            index: 0,
        }
    }

    /// Create a new deletion line.
    pub fn deletion(content: impl Into<String>, old_line: u32) -> Self {
        Self {
            kind: LineKind::Deletion,
            content: content.into(),
            old_line: Some(old_line),
            new_line: None,
            index: 0,
        }
    }

    /// Create a meta line (hunk header, "no newline" marker).
    pub fn meta(content: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Meta,
            content: content.into(),
            old_line: None,
            new_line: None,
            index: 0,
        }
    }

    /// Set the sequence index.
    pub fn at(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    pub fn is_added(&self) -> bool {
        self.kind == LineKind::Addition
    }

    pub fn is_removed(&self) -> bool {
        self.kind == LineKind::Deletion
    }

    pub fn is_meta(&self) -> bool {
        self.kind == LineKind::Meta
    }

    /// Get the line number to display (prefers new_line, falls back to old_line).
    pub fn display_line_number(&self) -> Option<u32> {
        self.new_line.or(self.old_line)
    }
}

/// Line type in the diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Unchanged line (for context).
    Context,
    /// Added line (+).
    Addition,
    /// Removed line (-).
    Deletion,
    /// Hunk header or "\ No newline at end of file" marker.
    Meta,
}

impl LineKind {
    /// Get the prefix character for this line type.
    pub fn prefix(&self) -> char {
        match self {
            LineKind::Context => ' ',
            LineKind::Addition => '+',
            LineKind::Deletion => '-',
            LineKind::Meta => '@',
        }
    }

    /// Lowercase name, as used in CLI output.
    pub fn as_str(&self) -> &'static str {
        match self {
            LineKind::Context => "context",
            LineKind::Addition => "added",
            LineKind::Deletion => "removed",
            LineKind::Meta => "meta",
        }
    }
}
