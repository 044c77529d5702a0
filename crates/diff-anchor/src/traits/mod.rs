//! Extension traits for plugging in content backends.

mod content_resolver;

pub use content_resolver::{Blob, Commit, ContentResolver, ResolveError};
