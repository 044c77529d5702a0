//! git CLI based content resolver
//!
//! Direct implementation of the `ContentResolver` trait that shells out to
//! `git`. Every call spawns a process; wrap it in `CachedResolver` when the
//! same objects are requested repeatedly.

use anyhow::{bail, Context, Result};
use diff_anchor::{Blob, Commit, ContentResolver, DiffRefs, ResolveError};
use log::debug;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// A local git repository accessed through the `git` executable
#[derive(Debug, Clone)]
pub struct GitRepository {
    git: String,
    workdir: PathBuf,
}

impl GitRepository {
    /// Open the repository containing `workdir`
    pub fn open(workdir: impl Into<PathBuf>) -> Self {
        Self {
            git: "git".to_string(),
            workdir: workdir.into(),
        }
    }

    /// Use a different git executable
    pub fn with_git_command(mut self, git: impl Into<String>) -> Self {
        self.git = git.into();
        self
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn run(&self, args: &[&str]) -> std::io::Result<Output> {
        debug!("Running {} {}", self.git, args.join(" "));
        Command::new(&self.git)
            .args(args)
            .current_dir(&self.workdir)
            .output()
    }

    /// Run git and return stdout, failing on a non-zero exit
    fn run_checked(&self, args: &[&str]) -> Result<String> {
        let output = self
            .run(args)
            .with_context(|| format!("Failed to run '{} {}'", self.git, args.join(" ")))?;

        if !output.status.success() {
            bail!(
                "'{} {}' failed: {}",
                self.git,
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        String::from_utf8(output.stdout).context("Invalid UTF-8 in git output")
    }

    /// Resolve a revision to a full commit SHA
    pub fn rev_parse(&self, rev: &str) -> Result<String> {
        let spec = format!("{}^{{commit}}", rev);
        let sha = self.run_checked(&["rev-parse", "--verify", "--quiet", &spec])?;
        Ok(sha.trim().to_string())
    }

    /// Build the diff refs for comparing `head` against `start`
    ///
    /// The base is the merge base of both; unrelated histories get an empty
    /// base.
    pub fn diff_refs(&self, start: &str, head: &str) -> Result<DiffRefs> {
        let start_id = self.rev_parse(start)?;
        let head_id = self.rev_parse(head)?;

        let base_id = match self.run_checked(&["merge-base", &start_id, &head_id]) {
            Ok(base) => base.trim().to_string(),
            Err(e) => {
                log::warn!("No merge base for {}..{}: {}", start, head, e);
                String::new()
            }
        };

        Ok(DiffRefs::new(base_id, start_id, head_id)?)
    }

    /// The git patch of a single path between two revisions
    pub fn file_patch(&self, from: &str, to: &str, path: &str) -> Result<String> {
        self.run_checked(&["diff", "--full-index", "--no-color", from, to, "--", path])
            .with_context(|| format!("Failed to diff {} between {} and {}", path, from, to))
    }
}

/// `rev-parse --verify --quiet` exits with 1, silently, for names that do not
/// resolve. Anything else non-zero (not a repository, corrupt objects) is a
/// backend failure.
const EXIT_UNKNOWN_OBJECT: i32 = 1;

impl GitRepository {
    /// Resolve an object name to its id; `Ok(None)` when it does not exist
    fn resolve_object(&self, name: &str) -> Result<Option<String>, ResolveError> {
        let output = self.run(&["rev-parse", "--verify", "--quiet", name])?;

        match output.status.code() {
            Some(0) => {
                let id = String::from_utf8(output.stdout)
                    .map_err(|e| ResolveError::InvalidOutput(e.to_string()))?;
                Ok(Some(id.trim().to_string()))
            }
            Some(EXIT_UNKNOWN_OBJECT) => {
                debug!("No object named {}", name);
                Ok(None)
            }
            _ => Err(self.unavailable(&output)),
        }
    }

    /// Run a command on an object known to exist; any failure is the backend's
    fn read_object(&self, args: &[&str]) -> Result<Vec<u8>, ResolveError> {
        let output = self.run(args)?;
        if !output.status.success() {
            return Err(self.unavailable(&output));
        }
        Ok(output.stdout)
    }

    fn unavailable(&self, output: &Output) -> ResolveError {
        ResolveError::Unavailable(format!(
            "{} in {}: {}",
            self.git,
            self.workdir.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        ))
    }
}

impl ContentResolver for GitRepository {
    fn blob_at(&self, commit_id: &str, path: &str) -> Result<Option<Blob>, ResolveError> {
        let object = format!("{}:{}", commit_id, path);
        let Some(id) = self.resolve_object(&object)? else {
            return Ok(None);
        };

        // Directories and submodules resolve too, but have no blob
        let kind = self.read_object(&["cat-file", "-t", &id])?;
        if String::from_utf8_lossy(&kind).trim() != "blob" {
            debug!("{} is not a blob", object);
            return Ok(None);
        }

        let data = self.read_object(&["cat-file", "blob", &id])?;
        Ok(Some(Blob::new(commit_id, path, data)))
    }

    fn commit(&self, commit_id: &str) -> Result<Option<Commit>, ResolveError> {
        let spec = format!("{}^{{commit}}", commit_id);
        let Some(id) = self.resolve_object(&spec)? else {
            return Ok(None);
        };

        let stdout = self.read_object(&["rev-list", "--parents", "-n", "1", &id, "--"])?;
        let stdout =
            String::from_utf8(stdout).map_err(|e| ResolveError::InvalidOutput(e.to_string()))?;
        parse_parents(&stdout)
            .map(Some)
            .ok_or_else(|| ResolveError::InvalidOutput(stdout.trim().to_string()))
    }
}

/// Parse a `rev-list --parents` line: the commit followed by its parents
fn parse_parents(line: &str) -> Option<Commit> {
    let mut ids = line.split_whitespace();
    let id = ids.next()?;
    let parent_id = ids.next().map(String::from);
    Some(Commit::new(id, parent_id))
}
