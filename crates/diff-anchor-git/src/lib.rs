//! git backed content resolution for diff-anchor
//!
//! This crate provides `ContentResolver` implementations for local git
//! repositories. The design follows the decorator pattern, allowing caching
//! to be composed with the base resolver.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │          ContentResolver trait (diff-anchor)     │
//! │  - blob_at()                                     │
//! │  - commit()                                      │
//! └─────────────────────────────────────────────────┘
//!                        │
//!        ┌───────────────┴───────────────┐
//!        ▼                               ▼
//! ┌─────────────────┐         ┌─────────────────────┐
//! │ GitRepository   │         │ CachedResolver      │
//! │ (git CLI)       │◄────────│ (decorator)         │
//! └─────────────────┘         └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use diff_anchor::{Diff, DiffFile};
//! use diff_anchor_git::{CachedResolver, GitRepository};
//!
//! # fn example() -> anyhow::Result<()> {
//! let git = GitRepository::open(".");
//! let refs = git.diff_refs("main", "HEAD")?;
//! let patch = git.file_patch(&refs.start_id, &refs.head_id, "src/lib.rs")?;
//!
//! let repository = CachedResolver::new(git);
//! let file = DiffFile::new(Diff::from_git_patch(&patch))
//!     .with_diff_refs(refs)
//!     .with_repository(&repository);
//! let current = file.blob();
//! # Ok(())
//! # }
//! ```

pub mod cached_resolver;
pub mod repository;

pub use cached_resolver::{CacheStats, CachedResolver};
pub use repository::GitRepository;
