//! Revision-anchored line positions.

use super::{DiffRefs, DiffRefsError};
use serde::{Deserialize, Serialize};

/// Where an annotation is anchored in a diff.
///
/// A position names one logical line of one file's diff: the path pair, the
/// line's number on each side (absent where the line does not exist) and the
/// commits the diff was taken between. Two positions with equal fields denote
/// the same line across re-renders of the same diff.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PositionRecord")]
pub struct Position {
    pub old_path: Option<String>,
    pub new_path: Option<String>,
    pub old_line: Option<u32>,
    pub new_line: Option<u32>,
    pub base_id: String,
    pub start_id: String,
    pub head_id: String,
}

/// Unchecked wire form of [`Position`].
#[derive(Deserialize)]
struct PositionRecord {
    old_path: Option<String>,
    new_path: Option<String>,
    old_line: Option<u32>,
    new_line: Option<u32>,
    base_id: String,
    start_id: String,
    head_id: String,
}

impl TryFrom<PositionRecord> for Position {
    type Error = DiffRefsError;

    fn try_from(record: PositionRecord) -> Result<Self, Self::Error> {
        let refs = DiffRefs::new(record.base_id, record.start_id, record.head_id)?;
        Ok(Position::new(
            record.old_path,
            record.new_path,
            record.old_line,
            record.new_line,
            &refs,
        ))
    }
}

/// The full identity of a [`Position`].
pub type PositionKey<'a> = (
    Option<&'a str>,
    Option<&'a str>,
    Option<u32>,
    Option<u32>,
    &'a str,
    &'a str,
    &'a str,
);

impl Position {
    /// Create a position for the given paths and line numbers.
    pub fn new(
        old_path: Option<String>,
        new_path: Option<String>,
        old_line: Option<u32>,
        new_line: Option<u32>,
        refs: &DiffRefs,
    ) -> Self {
        Self {
            old_path,
            new_path,
            old_line,
            new_line,
            base_id: refs.base_id.clone(),
            start_id: refs.start_id.clone(),
            head_id: refs.head_id.clone(),
        }
    }

    /// All seven fields, borrowed. Equal keys mean interchangeable positions.
    pub fn key(&self) -> PositionKey<'_> {
        (
            self.old_path.as_deref(),
            self.new_path.as_deref(),
            self.old_line,
            self.new_line,
            self.base_id.as_str(),
            self.start_id.as_str(),
            self.head_id.as_str(),
        )
    }

    /// Path the position points into (new path, falling back to old path).
    pub fn file_path(&self) -> Option<&str> {
        self.new_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .or_else(|| self.old_path.as_deref().filter(|p| !p.is_empty()))
    }

    /// Which side of the diff the line lives on.
    ///
    /// Lines that exist only in the old file are on the left, everything
    /// else is addressed on the right.
    pub fn side(&self) -> DiffSide {
        match (self.old_line, self.new_line) {
            (Some(_), None) => DiffSide::Left,
            _ => DiffSide::Right,
        }
    }

    /// Rebuild the diff refs the position was taken against.
    ///
    /// Fails when the head id was cleared after construction.
    pub fn diff_refs(&self) -> Result<DiffRefs, DiffRefsError> {
        DiffRefs::new(
            self.base_id.as_str(),
            self.start_id.as_str(),
            self.head_id.as_str(),
        )
    }

    /// Serialize to the flat JSON record consumers store.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse a position from its JSON record.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Which side of the diff a position is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffSide {
    /// Old file (deletions side).
    Left,
    /// New file (additions side).
    Right,
}

impl DiffSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffSide::Left => "old",
            DiffSide::Right => "new",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn refs() -> DiffRefs {
        DiffRefs::new("base", "start", "head").unwrap()
    }

    #[test]
    fn test_position_side() {
        let pos = Position::new(
            Some("a.rs".into()),
            Some("a.rs".into()),
            Some(4),
            None,
            &refs(),
        );
        assert_eq!(pos.side(), DiffSide::Left);

        let pos = Position::new(None, Some("a.rs".into()), None, Some(4), &refs());
        assert_eq!(pos.side(), DiffSide::Right);

        let pos = Position::new(
            Some("a.rs".into()),
            Some("a.rs".into()),
            Some(3),
            Some(4),
            &refs(),
        );
        assert_eq!(pos.side(), DiffSide::Right);
        assert_eq!(DiffSide::Right.as_str(), "new");
    }

    #[test]
    fn test_position_key_covers_refs() {
        let a = Position::new(None, Some("a.rs".into()), None, Some(1), &refs());
        let other_refs = DiffRefs::new("base", "start", "other").unwrap();
        let b = Position::new(None, Some("a.rs".into()), None, Some(1), &other_refs);

        assert_ne!(a.key(), b.key());
        assert_ne!(a, b);
        assert_eq!(a.key(), a.clone().key());
    }

    #[test]
    fn test_position_file_path() {
        let pos = Position::new(Some("gone.rs".into()), None, Some(1), None, &refs());
        assert_eq!(pos.file_path(), Some("gone.rs"));

        let pos = Position::new(
            Some("old.rs".into()),
            Some("new.rs".into()),
            Some(1),
            Some(1),
            &refs(),
        );
        assert_eq!(pos.file_path(), Some("new.rs"));
        assert_eq!(pos.diff_refs(), Ok(refs()));

        let mut detached = pos.clone();
        detached.head_id.clear();
        assert_eq!(detached.diff_refs(), Err(DiffRefsError::MissingHead));
    }

    #[test]
    fn test_position_json_record() {
        let pos = Position::new(None, Some("a.rs".into()), None, Some(7), &refs());
        let json = pos.to_json().unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_object().unwrap().len(), 7);
        assert_eq!(value["old_path"], serde_json::Value::Null);
        assert_eq!(value["new_line"], 7);
        assert_eq!(value["head_id"], "head");

        assert_eq!(Position::from_json(&json).unwrap(), pos);
    }

    #[test]
    fn test_position_json_requires_head() {
        let json = r#"{"old_path":null,"new_path":"a.rs","old_line":null,"new_line":7,"base_id":"base","start_id":"start","head_id":""}"#;
        let err = Position::from_json(json).unwrap_err();
        assert!(err.to_string().contains("head commit"));
    }
}
