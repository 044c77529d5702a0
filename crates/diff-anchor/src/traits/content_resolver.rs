//! Trait for fetching file content from a version-control backend.

use thiserror::Error;

/// Errors that can occur when resolving content.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The backend could not be reached or failed to run.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// The backend answered with something we could not interpret.
    #[error("Unexpected backend output: {0}")]
    InvalidOutput(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A commit as far as content lookup is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub id: String,
    /// First parent; `None` for a root commit.
    pub parent_id: Option<String>,
}

impl Commit {
    pub fn new(id: impl Into<String>, parent_id: Option<String>) -> Self {
        Self {
            id: id.into(),
            parent_id,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Raw file content at a specific commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub commit_id: String,
    pub path: String,
    pub data: Vec<u8>,
}

impl Blob {
    pub fn new(commit_id: impl Into<String>, path: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            commit_id: commit_id.into(),
            path: path.into(),
            data,
        }
    }

    /// Content as text, if it is valid UTF-8.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }
}

/// Provides commits and file content.
///
/// Both methods are read-only and idempotent. `Ok(None)` means the object
/// does not exist; `Err` means the backend could not answer.
///
/// # Example
///
/// ```ignore
/// struct StaticResolver(HashMap<(String, String), Vec<u8>>);
///
/// impl ContentResolver for StaticResolver {
///     fn blob_at(&self, commit_id: &str, path: &str) -> Result<Option<Blob>, ResolveError> {
///         Ok(self
///             .0
///             .get(&(commit_id.to_string(), path.to_string()))
///             .map(|data| Blob::new(commit_id, path, data.clone())))
///     }
///
///     fn commit(&self, commit_id: &str) -> Result<Option<Commit>, ResolveError> {
///         Ok(Some(Commit::new(commit_id, None)))
///     }
/// }
/// ```
pub trait ContentResolver {
    /// Fetch the blob stored at `path` in `commit_id`.
    fn blob_at(&self, commit_id: &str, path: &str) -> Result<Option<Blob>, ResolveError>;

    /// Look up a commit and its first parent.
    fn commit(&self, commit_id: &str) -> Result<Option<Commit>, ResolveError>;
}
