//! Parse unified diff format (as produced by `git diff`).

use super::{DiffParser, ParseError};
use crate::model::{DiffLine, LineKind};
use unidiff::{Hunk as UnidiffHunk, Line as UnidiffLine, PatchSet};

/// Default [`DiffParser`] built on the `unidiff` crate.
///
/// Accepts either a full single-file patch (with `---`/`+++` headers) or bare
/// hunks. Each hunk header becomes a meta line.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnifiedDiffParser;

impl UnifiedDiffParser {
    pub fn new() -> Self {
        Self
    }
}

impl DiffParser for UnifiedDiffParser {
    fn parse(&self, raw: &str) -> Result<Vec<DiffLine>, ParseError> {
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        let text = with_file_header(raw);
        let mut patch_set = PatchSet::new();
        patch_set
            .parse(&*text)
            .map_err(|e| ParseError::ParseFailed(e.to_string()))?;

        let files = patch_set.files();
        if files.len() > 1 {
            return Err(ParseError::UnexpectedFileCount(files.len()));
        }

        let markers = no_newline_markers(raw);
        let mut lines = Vec::new();
        for file in files {
            for (i, hunk) in file.hunks().iter().enumerate() {
                let hunk_markers = markers.get(i).map_or(&[][..], Vec::as_slice);
                parse_hunk(hunk, hunk_markers, &mut lines);
            }
        }

        log::debug!("Parsed {} diff lines", lines.len());
        Ok(lines)
    }
}

/// Bare hunks need file headers before `unidiff` will attach them to a file.
fn with_file_header(raw: &str) -> std::borrow::Cow<'_, str> {
    let starts_with_hunk = raw
        .lines()
        .find(|l| !l.trim().is_empty())
        .is_some_and(|l| l.starts_with("@@"));

    if starts_with_hunk {
        format!("--- a/file\n+++ b/file\n{raw}").into()
    } else {
        raw.into()
    }
}

/// A `\ No newline at end of file` marker and the number of body lines
/// of its hunk that precede it.
#[derive(Debug, PartialEq, Eq)]
struct Marker {
    after: usize,
    text: String,
}

/// Collect the `\` markers of every hunk from the raw text.
///
/// `unidiff` closes a hunk as soon as its line counts are used up, so a
/// marker following the last line is never attached to it.
fn no_newline_markers(raw: &str) -> Vec<Vec<Marker>> {
    let mut hunks: Vec<Vec<Marker>> = Vec::new();
    let mut body_lines = 0;

    for line in raw.lines() {
        if line.starts_with("@@") {
            hunks.push(Vec::new());
            body_lines = 0;
        } else if let Some(markers) = hunks.last_mut() {
            if line.starts_with('\\') {
                markers.push(Marker {
                    after: body_lines,
                    text: line.trim_end_matches('\r').to_string(),
                });
            } else {
                body_lines += 1;
            }
        }
    }
    hunks
}

fn parse_hunk(hunk: &UnidiffHunk, markers: &[Marker], lines: &mut Vec<DiffLine>) {
    let mut header = format!(
        "@@ -{},{} +{},{} @@",
        hunk.source_start, hunk.source_length, hunk.target_start, hunk.target_length
    );
    if !hunk.section_header.is_empty() {
        header.push(' ');
        header.push_str(&hunk.section_header);
    }
    lines.push(DiffLine::meta(header).at(lines.len()));

    let mut markers = markers.iter().peekable();
    let mut body_lines = 0;
    for line in hunk.lines().iter().filter(|l| l.line_type != "\\") {
        let parsed = parse_line(line).at(lines.len());
        lines.push(parsed);
        body_lines += 1;

        while let Some(marker) = markers.next_if(|m| m.after == body_lines) {
            lines.push(DiffLine::meta(marker.text.clone()).at(lines.len()));
        }
    }
}

fn parse_line(line: &UnidiffLine) -> DiffLine {
    let content = line.value.trim_end_matches(['\r', '\n']).to_string();
    let source_line = line.source_line_no.map(|n| n as u32);
    let target_line = line.target_line_no.map(|n| n as u32);

    let kind = match line.line_type.as_str() {
        "+" => LineKind::Addition,
        "-" => LineKind::Deletion,
        _ => LineKind::Context,
    };

    match kind {
        LineKind::Addition => DiffLine {
            kind,
            content,
            old_line: None,
            new_line: target_line,
            index: 0,
        },
        LineKind::Deletion => DiffLine {
            kind,
            content,
            old_line: source_line,
            new_line: None,
            index: 0,
        },
        LineKind::Context | LineKind::Meta => DiffLine {
            kind,
            content,
            old_line: source_line,
            new_line: target_line,
            index: 0,
        },
    }
}
