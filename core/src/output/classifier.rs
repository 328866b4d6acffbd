use std::path::{Path, PathBuf};

use super::item::{Category, Location, OutputItem};

const LOCATION_ARROW: &str = "-->";

/// Context carried from one line to the next within a single job's output.
///
/// A fresh state must be used for every process invocation, otherwise the
/// file of an earlier diagnostic would be attributed to unrelated lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifierState {
    pub current_file: Option<String>,
    pub last_category: Category,
}

/// Classifies one line of the tool's human-readable output.
///
/// Diagnostics span several lines: a header (`error[E0308]: ...`), a location
/// line (`--> src/main.rs:10:5`) and gutter lines (`10 |     code`). Only the
/// previous category and the last seen file are needed to attribute the
/// continuation lines, so nothing is buffered.
///
/// Relative paths are joined onto `base_dir` when one is given. Malformed
/// input never fails; the worst case is a `Standard` line.
pub fn classify(line: &str, state: &mut ClassifierState, base_dir: Option<&Path>) -> OutputItem {
    let item = if line.starts_with("error:") || line.starts_with("error[") {
        OutputItem::plain(line, Category::Error)
    } else if line.starts_with("warning:") || line.starts_with("warning[") {
        OutputItem::plain(line, Category::Warning)
    } else if is_progress_marker(line) {
        OutputItem::plain(line, Category::Action)
    } else {
        classify_tokens(line, state, base_dir)
    };

    state.last_category = item.category;
    item
}

fn is_progress_marker(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.len() < line.len()
        && (trimmed.starts_with("Compiling") || trimmed.starts_with("Finished"))
}

fn classify_tokens(line: &str, state: &mut ClassifierState, base_dir: Option<&Path>) -> OutputItem {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    match tokens.as_slice() {
        [arrow, target, ..] if *arrow == LOCATION_ARROW => {
            let mut parts = target.split(':');
            let file = parts.next().unwrap_or_default();
            state.current_file = Some(file.to_string());

            let location = Location {
                path: resolve(file, base_dir),
                line: parts.next().and_then(parse_one_based),
                column: parts.next().and_then(parse_one_based),
            };
            OutputItem::located(line, state.last_category, location)
        }
        [first, ..] if *first == "|" || *first == "=" => {
            OutputItem::plain(line, Category::Information)
        }
        [number, bar, ..] if *bar == "|" => {
            let Some(file) = state.current_file.as_deref() else {
                return OutputItem::plain(line, Category::Information);
            };
            let location = Location {
                path: resolve(file, base_dir),
                line: parse_one_based(number),
                column: Some(gutter_column(line, number)),
            };
            OutputItem::located(line, Category::Information, location)
        }
        _ => OutputItem::plain(line, Category::Standard),
    }
}

/// The tool counts lines and columns from 1; items are 0-based.
fn parse_one_based(part: &str) -> Option<u32> {
    part.trim().parse::<u32>().ok()?.checked_sub(1)
}

/// Column of the first non-blank character after the `<num> | ` gutter.
///
/// The scan starts at the width of the number plus `" | "`, counted from the
/// start of the line. Indented gutters therefore shift the result; this
/// mirrors the tool integration's historical behaviour.
fn gutter_column(line: &str, number: &str) -> u32 {
    let start = number.chars().count() + 3;
    line.chars()
        .skip(start)
        .position(|c| !c.is_whitespace())
        .map(|offset| offset as u32)
        .unwrap_or(0)
}

fn resolve(file: &str, base_dir: Option<&Path>) -> PathBuf {
    let path = Path::new(file);
    match base_dir {
        Some(base) if path.is_relative() => base.join(path),
        _ => path.to_path_buf(),
    }
}

/// Owns the classifier state for one job's output stream.
#[derive(Debug, Default)]
pub struct OutputClassifier {
    base_dir: Option<PathBuf>,
    state: ClassifierState,
}

impl OutputClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
            state: ClassifierState::default(),
        }
    }

    pub fn classify(&mut self, line: &str) -> OutputItem {
        classify(line, &mut self.state, self.base_dir.as_deref())
    }

    pub fn state(&self) -> &ClassifierState {
        &self.state
    }
}
