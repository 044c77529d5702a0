//! Subcommand implementations
//!
//! Each command writes to the given writer so it can be exercised without a
//! terminal. `Ok(false)` means the lookup found nothing.

use anyhow::{Context, Result};
use diff_anchor::{ContentResolver, Diff, DiffFile, DiffLine, DiffRefs, LineCode, Position};
use diff_anchor_git::{CachedResolver, GitRepository};
use std::io::{Read, Write};
use std::path::Path;

/// Read a patch from a file, or stdin for `-`
pub fn read_patch(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read patch from stdin")?;
        return Ok(text);
    }

    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read patch {}", path.display()))
}

/// Build the diff for a patch, dropping the payload if it is too large
pub fn load_diff(patch: &str, max_diff_bytes: usize) -> Diff {
    let mut diff = Diff::from_git_patch(patch);
    if diff.prune_if_larger_than(max_diff_bytes) {
        log::warn!(
            "Diff of {} bytes exceeds the {} byte limit; it has no addressable lines",
            patch.len(),
            max_diff_bytes
        );
    }
    diff
}

fn describe(file: &DiffFile<'_>, line: &DiffLine) -> String {
    let number = |n: Option<u32>| n.map_or_else(|| "-".to_string(), |n| n.to_string());
    let code = file
        .line_code(line)
        .map_or_else(|| "-".to_string(), |c| c.to_string());

    format!(
        "{:>4} {:<7} {:>5} {:>5} {} {}{}",
        line.index,
        line.kind.as_str(),
        number(line.old_line),
        number(line.new_line),
        code,
        line.kind.prefix(),
        line.content
    )
}

/// Print every line with its coordinates and line code
///
/// With diff refs, addressable lines also carry their position JSON after a
/// tab.
pub fn lines(file: &DiffFile<'_>, out: &mut impl Write) -> Result<()> {
    let path = file.file_path().unwrap_or("<unknown>");
    writeln!(
        out,
        "{} [{}] +{} -{}{}",
        path,
        file.diff().status().as_char(),
        file.added_lines()?,
        file.removed_lines()?,
        if file.mode_changed() {
            format!(
                " mode {} -> {}",
                file.a_mode().unwrap_or("?"),
                file.b_mode().unwrap_or("?")
            )
        } else {
            String::new()
        }
    )?;

    for line in file.lines()? {
        let row = describe(file, line);
        match file.position(line).filter(|_| !line.is_meta()) {
            Some(position) => writeln!(out, "{}\t{}", row, position.to_json()?)?,
            None => writeln!(out, "{}", row)?,
        }
    }
    Ok(())
}

/// Print the line for a line code, and its position when refs are known
pub fn locate(file: &DiffFile<'_>, code: &LineCode, out: &mut impl Write) -> Result<bool> {
    let Some(line) = file.line_for_line_code(code)? else {
        log::info!("No line matches code {}", code);
        return Ok(false);
    };

    writeln!(out, "{}", describe(file, line))?;
    if let Some(position) = file.position(line) {
        writeln!(out, "{}", position.to_json()?)?;
    }
    Ok(true)
}

/// Print the line code for a stored position
pub fn code(diff: Diff, position: &Position, out: &mut impl Write) -> Result<bool> {
    let file = DiffFile::new(diff).with_diff_refs(position.diff_refs()?);

    match file.line_code_for_position(position)? {
        Some(code) => {
            writeln!(out, "{}", code)?;
            Ok(true)
        }
        None => {
            log::info!("No line matches position {:?}", position.key());
            Ok(false)
        }
    }
}

/// Print the content of `path` at head (or before the change with `old`)
pub fn show(
    git: GitRepository,
    start: &str,
    head: &str,
    path: &str,
    old: bool,
    out: &mut impl Write,
) -> Result<bool> {
    let refs = git.diff_refs(start, head)?;
    let patch = git.file_patch(&refs.start_id, &refs.head_id, path)?;
    let diff = if patch.trim().is_empty() {
        Diff::new(path, "")
    } else {
        Diff::from_git_patch(&patch)
    };

    let repository = CachedResolver::new(git);
    let blob = content(diff, refs, &repository, old);
    log::debug!("Resolver cache: {:?}", repository.stats());

    match blob {
        Some(data) => {
            out.write_all(&data)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

fn content(
    diff: Diff,
    refs: DiffRefs,
    repository: &dyn ContentResolver,
    old: bool,
) -> Option<Vec<u8>> {
    let file = DiffFile::new(diff)
        .with_diff_refs(refs)
        .with_repository(repository);

    let blob = if old { file.old_blob() } else { file.blob() };
    blob.map(|b| b.data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PATCH: &str = "diff --git a/run.sh b/run.sh
old mode 100644
new mode 100755
index 1111111..2222222
--- a/run.sh
+++ b/run.sh
@@ -1,2 +1,2 @@
 #!/bin/sh
-echo old
+echo new
";

    fn refs() -> DiffRefs {
        DiffRefs::new("base", "start", "head").unwrap()
    }

    fn output(f: impl FnOnce(&mut Vec<u8>) -> Result<bool>) -> (bool, String) {
        let mut out = Vec::new();
        let found = f(&mut out).unwrap();
        (found, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_lines_output() {
        let file = DiffFile::new(load_diff(PATCH, 1024));
        let (_, text) = output(|out| lines(&file, out).map(|_| true));
        let rows: Vec<&str> = text.lines().collect();

        assert_eq!(rows[0], "run.sh [M] +1 -1 mode 100644 -> 100755");
        assert_eq!(rows.len(), 5);
        assert!(rows[1].contains("meta"));
        assert!(rows[3].contains("removed"));
        assert!(rows[3].ends_with("-echo old"));
        assert!(rows[4].ends_with("+echo new"));
    }

    #[test]
    fn test_lines_with_refs_print_positions() {
        let file = DiffFile::new(load_diff(PATCH, 1024)).with_diff_refs(refs());
        let (_, text) = output(|out| lines(&file, out).map(|_| true));
        let rows: Vec<&str> = text.lines().collect();

        assert_eq!(rows.len(), 5);
        assert!(!rows[1].contains('\t'));

        let (row, json) = rows[4].split_once('\t').unwrap();
        assert!(row.ends_with("+echo new"));
        let position = Position::from_json(json).unwrap();
        assert_eq!(position.old_line, None);
        assert_eq!(position.new_line, Some(2));
        assert_eq!(position.head_id, "head");
    }

    #[test]
    fn test_lines_without_refs_have_no_positions() {
        let file = DiffFile::new(load_diff(PATCH, 1024));
        let (_, text) = output(|out| lines(&file, out).map(|_| true));
        assert!(!text.contains('\t'));
    }

    #[test]
    fn test_code_rejects_position_without_head() {
        let mut position = Position::new(
            Some("run.sh".into()),
            Some("run.sh".into()),
            Some(2),
            None,
            &refs(),
        );
        position.head_id.clear();

        let mut out = Vec::new();
        assert!(code(load_diff(PATCH, 1024), &position, &mut out).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn test_locate_prints_position() {
        let file = DiffFile::new(load_diff(PATCH, 1024)).with_diff_refs(refs());
        let code = LineCode::generate("run.sh", None, Some(2));

        let (found, text) = output(|out| locate(&file, &code, out));
        assert!(found);
        let json = text.lines().nth(1).unwrap();
        let position = Position::from_json(json).unwrap();
        assert_eq!(position.new_line, Some(2));
        assert_eq!(position.head_id, "head");
    }

    #[test]
    fn test_locate_missing_code() {
        let file = DiffFile::new(load_diff(PATCH, 1024));
        let code = LineCode::generate("other.sh", None, Some(2));

        let (found, text) = output(|out| locate(&file, &code, out));
        assert!(!found);
        assert!(text.is_empty());
    }

    #[test]
    fn test_code_for_position() {
        let position = Position::new(
            Some("run.sh".into()),
            Some("run.sh".into()),
            Some(2),
            None,
            &refs(),
        );

        let (found, text) = output(|out| code(load_diff(PATCH, 1024), &position, out));
        assert!(found);
        assert_eq!(
            text.trim(),
            LineCode::generate("run.sh", Some(2), None).as_str()
        );
    }

    #[test]
    fn test_too_large_diff_has_no_lines() {
        let file = DiffFile::new(load_diff(PATCH, 16));
        assert!(file.too_large());
        assert!(file.lines().unwrap().is_empty());
    }
}
