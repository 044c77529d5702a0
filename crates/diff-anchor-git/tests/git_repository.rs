use diff_anchor::{ContentResolver, Diff, DiffFile, LineKind};
use diff_anchor_git::{CachedResolver, GitRepository};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use std::process::Command;

fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

fn git_available() -> bool {
    Command::new("git").arg("--version").output().is_ok()
}

/// Two commits: a.txt = "one", then a.txt = "one\ntwo" plus gone.txt removed
fn fixture() -> (tempfile::TempDir, String, String) {
    let dir = tempfile::TempDir::new().expect("failed to create temp dir");
    let path = dir.path();

    git(path, &["init", "--quiet"]);
    git(path, &["config", "user.email", "test@example.com"]);
    git(path, &["config", "user.name", "Test User"]);
    git(path, &["config", "commit.gpgsign", "false"]);

    fs::write(path.join("a.txt"), "one\n").unwrap();
    fs::write(path.join("gone.txt"), "bye\n").unwrap();
    git(path, &["add", "."]);
    git(path, &["commit", "--quiet", "-m", "Initial commit"]);
    let first = git(path, &["rev-parse", "HEAD"]);

    fs::write(path.join("a.txt"), "one\ntwo\n").unwrap();
    fs::remove_file(path.join("gone.txt")).unwrap();
    git(path, &["add", "-A"]);
    git(path, &["commit", "--quiet", "-m", "Second commit"]);
    let second = git(path, &["rev-parse", "HEAD"]);

    (dir, first, second)
}

#[test]
fn resolves_commits_and_blobs() {
    if !git_available() {
        return;
    }
    let (dir, first, second) = fixture();
    let repository = GitRepository::open(dir.path());

    let head = repository.commit(&second).unwrap().unwrap();
    assert_eq!(head.id, second);
    assert_eq!(head.parent_id.as_deref(), Some(first.as_str()));

    let root = repository.commit(&first).unwrap().unwrap();
    assert!(root.is_root());

    assert_eq!(repository.commit("0123456789abcdef").unwrap(), None);

    let blob = repository.blob_at(&second, "a.txt").unwrap().unwrap();
    assert_eq!(blob.text(), Some("one\ntwo\n"));
    assert_eq!(repository.blob_at(&second, "gone.txt").unwrap(), None);
    // The root tree resolves but is not a blob
    assert_eq!(repository.blob_at(&second, "").unwrap(), None);
}

#[test]
fn diff_refs_use_merge_base() {
    if !git_available() {
        return;
    }
    let (dir, first, second) = fixture();
    let repository = GitRepository::open(dir.path());

    let refs = repository.diff_refs(&first, "HEAD").unwrap();
    assert_eq!(refs.base_id, first);
    assert_eq!(refs.start_id, first);
    assert_eq!(refs.head_id, second);

    assert!(repository.diff_refs("no-such-branch", "HEAD").is_err());
}

#[test]
fn addresses_lines_of_a_real_patch() {
    if !git_available() {
        return;
    }
    let (dir, first, second) = fixture();
    let git = GitRepository::open(dir.path());
    let refs = git.diff_refs(&first, &second).unwrap();
    let patch = git.file_patch(&first, &second, "a.txt").unwrap();

    let repository = CachedResolver::new(git);
    let file = DiffFile::new(Diff::from_git_patch(&patch))
        .with_diff_refs(refs)
        .with_repository(&repository);

    assert_eq!(file.file_path(), Some("a.txt"));
    assert_eq!(file.added_lines().unwrap(), 1);
    assert_eq!(file.removed_lines().unwrap(), 0);

    let added = file
        .lines()
        .unwrap()
        .iter()
        .find(|l| l.kind == LineKind::Addition)
        .unwrap();
    assert_eq!(added.content, "two");
    assert_eq!(added.new_line, Some(2));

    let code = file.line_code(added).unwrap();
    assert_eq!(file.line_for_line_code(&code).unwrap(), Some(added));

    let current = file.blob().unwrap();
    assert_eq!(current.text(), Some("one\ntwo\n"));
    let previous = file.old_blob().unwrap();
    assert_eq!(previous.text(), Some("one\n"));
}

#[test]
fn deleted_file_content_comes_from_base() {
    if !git_available() {
        return;
    }
    let (dir, first, second) = fixture();
    let git = GitRepository::open(dir.path());
    let refs = git.diff_refs(&first, &second).unwrap();
    let patch = git.file_patch(&first, &second, "gone.txt").unwrap();

    let file = DiffFile::new(Diff::from_git_patch(&patch))
        .with_diff_refs(refs)
        .with_repository(&git);

    assert!(file.deleted_file());
    assert_eq!(file.content_commit().map(|c| c.id), Some(first));
    assert_eq!(file.blob().and_then(|b| b.text().map(String::from)), Some("bye\n".to_string()));
    // The base is the root commit, so there is nothing before it
    assert_eq!(file.old_blob(), None);
}

#[test]
fn cached_resolver_does_not_cache_backend_failures() {
    if !git_available() {
        return;
    }
    let dir = tempfile::TempDir::new().expect("failed to create temp dir");
    let repository = CachedResolver::new(GitRepository::open(dir.path()));

    assert!(repository.commit("HEAD").is_err());
    assert!(repository.blob_at("HEAD", "a.txt").is_err());

    git(dir.path(), &["init", "--quiet"]);
    assert_eq!(repository.commit("HEAD").unwrap(), None);
    assert_eq!(repository.blob_at("HEAD", "a.txt").unwrap(), None);
}
