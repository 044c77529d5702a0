//! The commit triple that defines a comparison.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when building [`DiffRefs`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiffRefsError {
    #[error("Diff refs require a head commit")]
    MissingHead,
}

/// The three commits a diff was computed from.
///
/// `start_id` is the tip of the target branch when the diff was taken,
/// `base_id` the merge base of start and head, `head_id` the tip of the
/// changes. `base_id` and `start_id` may be empty (e.g. initial commit);
/// `head_id` never is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "DiffRefsRecord")]
pub struct DiffRefs {
    pub base_id: String,
    pub start_id: String,
    pub head_id: String,
}

/// Unchecked wire form of [`DiffRefs`].
#[derive(Deserialize)]
struct DiffRefsRecord {
    base_id: String,
    start_id: String,
    head_id: String,
}

impl TryFrom<DiffRefsRecord> for DiffRefs {
    type Error = DiffRefsError;

    fn try_from(record: DiffRefsRecord) -> Result<Self, Self::Error> {
        DiffRefs::new(record.base_id, record.start_id, record.head_id)
    }
}

impl DiffRefs {
    /// Create a new set of diff refs.
    pub fn new(
        base_id: impl Into<String>,
        start_id: impl Into<String>,
        head_id: impl Into<String>,
    ) -> Result<Self, DiffRefsError> {
        let head_id = head_id.into();
        if head_id.is_empty() {
            return Err(DiffRefsError::MissingHead);
        }

        Ok(Self {
            base_id: base_id.into(),
            start_id: start_id.into(),
            head_id,
        })
    }

    /// The commit holding the pre-change content.
    pub fn old_ref(&self) -> &str {
        &self.base_id
    }

    /// The commit holding the post-change content.
    pub fn new_ref(&self) -> &str {
        &self.head_id
    }
}
