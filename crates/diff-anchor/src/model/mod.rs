//! Data models for diff addressing.

mod diff;
mod line_code;
mod position;
mod refs;

pub use diff::{Diff, DiffLine, FileStatus, LineKind};
pub use line_code::{LineCode, LineCodeError};
pub use position::{DiffSide, Position, PositionKey};
pub use refs::{DiffRefs, DiffRefsError};
