//! Read file metadata from the extended header of a git patch.

use crate::model::Diff;

const DEV_NULL: &str = "/dev/null";
const SUBMODULE_MODE: &str = "160000";

/// Build a [`Diff`] from a single-file git patch.
///
/// Only the header (everything before the first `@@`) is inspected; the full
/// text is kept as the diff payload.
pub fn read_git_header(patch: &str) -> Diff {
    let mut diff = Diff {
        diff: patch.to_string(),
        ..Diff::default()
    };

    for line in patch.lines().take_while(|l| !l.starts_with("@@")) {
        if let Some(paths) = line.strip_prefix("diff --git ") {
            if let Some((old, new)) = split_git_paths(paths) {
                diff.old_path = Some(old);
                diff.new_path = Some(new);
            }
        } else if let Some(mode) = line.strip_prefix("old mode ") {
            diff.a_mode = Some(mode.trim().to_string());
        } else if let Some(mode) = line.strip_prefix("new mode ") {
            diff.b_mode = Some(mode.trim().to_string());
        } else if let Some(mode) = line.strip_prefix("new file mode ") {
            diff.new_file = true;
            diff.b_mode = Some(mode.trim().to_string());
        } else if let Some(mode) = line.strip_prefix("deleted file mode ") {
            diff.deleted_file = true;
            diff.a_mode = Some(mode.trim().to_string());
        } else if let Some(path) = line.strip_prefix("rename from ") {
            diff.renamed_file = true;
            diff.old_path = Some(path.to_string());
        } else if let Some(path) = line.strip_prefix("rename to ") {
            diff.renamed_file = true;
            diff.new_path = Some(path.to_string());
        } else if let Some(index) = line.strip_prefix("index ") {
            // "index abc..def 100644" carries the mode when it did not change
            if let Some((_, mode)) = index.split_once(' ') {
                let mode = mode.trim().to_string();
                diff.a_mode.get_or_insert_with(|| mode.clone());
                diff.b_mode.get_or_insert(mode);
            }
        } else if let Some(path) = line.strip_prefix("--- ") {
            diff.old_path = clean_path(path, "a/");
        } else if let Some(path) = line.strip_prefix("+++ ") {
            diff.new_path = clean_path(path, "b/");
        }
    }

    if diff.new_file {
        diff.old_path = None;
        diff.a_mode = None;
    }
    if diff.deleted_file {
        diff.new_path = None;
        diff.b_mode = None;
    }
    diff.submodule = [&diff.a_mode, &diff.b_mode]
        .iter()
        .any(|mode| mode.as_deref() == Some(SUBMODULE_MODE));

    diff
}

/// Split the `a/<old> b/<new>` part of a `diff --git` line.
fn split_git_paths(paths: &str) -> Option<(String, String)> {
    let paths = paths.trim();
    let (old, new) = paths.rsplit_once(" b/")?;
    let old = old.strip_prefix("a/").unwrap_or(old);
    Some((old.to_string(), new.to_string()))
}

/// Remove the a/ or b/ prefix from a `---`/`+++` path; `/dev/null` means the
/// side does not exist.
fn clean_path(path: &str, prefix: &str) -> Option<String> {
    // Drop a trailing timestamp, as written by `diff -u`
    let path = path.split('\t').next().unwrap_or(path).trim();

    if path == DEV_NULL || path.is_empty() {
        return None;
    }
    Some(path.strip_prefix(prefix).unwrap_or(path).to_string())
}
