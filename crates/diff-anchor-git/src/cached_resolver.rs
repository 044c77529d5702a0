//! Cached content resolver (decorator pattern)
//!
//! Wraps any `ContentResolver` and remembers answers for the lifetime of the
//! wrapper. Only answers are cached: a backend error is passed through and
//! the next call asks the inner resolver again.

use diff_anchor::{Blob, Commit, ContentResolver, ResolveError};
use log::debug;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// Hit/miss counters of a [`CachedResolver`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

/// Content resolver that memoizes another resolver
///
/// # Example
///
/// ```rust,ignore
/// use diff_anchor_git::{CachedResolver, GitRepository};
///
/// let repository = CachedResolver::new(GitRepository::open("."));
/// let file = DiffFile::new(diff).with_diff_refs(refs).with_repository(&repository);
/// ```
#[derive(Debug)]
pub struct CachedResolver<R: ContentResolver> {
    inner: R,
    commits: RefCell<HashMap<String, Option<Commit>>>,
    blobs: RefCell<HashMap<(String, String), Option<Blob>>>,
    stats: Cell<CacheStats>,
}

impl<R: ContentResolver> CachedResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            commits: RefCell::new(HashMap::new()),
            blobs: RefCell::new(HashMap::new()),
            stats: Cell::new(CacheStats::default()),
        }
    }

    /// Get a reference to the inner resolver
    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.get()
    }

    fn record(&self, hit: bool) {
        let mut stats = self.stats.get();
        if hit {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }
        self.stats.set(stats);
    }
}

impl<R: ContentResolver> ContentResolver for CachedResolver<R> {
    fn blob_at(&self, commit_id: &str, path: &str) -> Result<Option<Blob>, ResolveError> {
        let key = (commit_id.to_string(), path.to_string());
        if let Some(blob) = self.blobs.borrow().get(&key) {
            self.record(true);
            return Ok(blob.clone());
        }

        self.record(false);
        let blob = self.inner.blob_at(commit_id, path)?;
        debug!("Caching blob {}:{}", commit_id, path);
        self.blobs.borrow_mut().insert(key, blob.clone());
        Ok(blob)
    }

    fn commit(&self, commit_id: &str) -> Result<Option<Commit>, ResolveError> {
        if let Some(commit) = self.commits.borrow().get(commit_id) {
            self.record(true);
            return Ok(commit.clone());
        }

        self.record(false);
        let commit = self.inner.commit(commit_id)?;
        debug!("Caching commit {}", commit_id);
        self.commits
            .borrow_mut()
            .insert(commit_id.to_string(), commit.clone());
        Ok(commit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Answers every lookup, failing the first `failures` calls
    #[derive(Default)]
    struct CountingResolver {
        calls: Cell<usize>,
        failures: Cell<usize>,
    }

    impl CountingResolver {
        fn tick(&self) -> Result<(), ResolveError> {
            self.calls.set(self.calls.get() + 1);
            if self.failures.get() > 0 {
                self.failures.set(self.failures.get() - 1);
                return Err(ResolveError::Unavailable("flaky".to_string()));
            }
            Ok(())
        }
    }

    impl ContentResolver for CountingResolver {
        fn blob_at(&self, commit_id: &str, path: &str) -> Result<Option<Blob>, ResolveError> {
            self.tick()?;
            if path == "missing" {
                return Ok(None);
            }
            Ok(Some(Blob::new(commit_id, path, b"data".to_vec())))
        }

        fn commit(&self, commit_id: &str) -> Result<Option<Commit>, ResolveError> {
            self.tick()?;
            Ok(Some(Commit::new(commit_id, None)))
        }
    }

    #[test]
    fn test_repeated_lookups_hit_cache() {
        let cached = CachedResolver::new(CountingResolver::default());

        let first = cached.blob_at("head", "a.rs").unwrap();
        let second = cached.blob_at("head", "a.rs").unwrap();
        assert_eq!(first, second);

        cached.commit("head").unwrap();
        cached.commit("head").unwrap();

        assert_eq!(cached.inner().calls.get(), 2);
        assert_eq!(cached.stats(), CacheStats { hits: 2, misses: 2 });
    }

    #[test]
    fn test_absence_is_cached() {
        let cached = CachedResolver::new(CountingResolver::default());

        assert_eq!(cached.blob_at("head", "missing").unwrap(), None);
        assert_eq!(cached.blob_at("head", "missing").unwrap(), None);
        assert_eq!(cached.inner().calls.get(), 1);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let inner = CountingResolver::default();
        inner.failures.set(1);
        let cached = CachedResolver::new(inner);

        assert!(cached.commit("head").is_err());
        assert_eq!(
            cached.commit("head").unwrap(),
            Some(Commit::new("head", None))
        );
        assert_eq!(cached.inner().calls.get(), 2);
    }
}
