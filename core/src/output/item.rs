use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Semantic category of one line of build-tool output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Error,
    Warning,
    Action,
    Information,
    #[default]
    Standard,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Error => "error",
            Category::Warning => "warning",
            Category::Action => "action",
            Category::Information => "information",
            Category::Standard => "standard",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source position a diagnostic line points at. Line and column are 0-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

impl Location {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            line: None,
            column: None,
        }
    }
}

impl fmt::Display for Location {
    /// Renders the location back in the tool's 1-based `path:line:col` form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line + 1)?;
            if let Some(column) = self.column {
                write!(f, ":{}", column + 1)?;
            }
        }
        Ok(())
    }
}

/// One classified output line. Immutable once emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputItem {
    pub text: String,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub activatable: bool,
}

impl OutputItem {
    pub fn plain(text: impl Into<String>, category: Category) -> Self {
        Self {
            text: text.into(),
            category,
            location: None,
            activatable: false,
        }
    }

    pub fn located(text: impl Into<String>, category: Category, location: Location) -> Self {
        Self {
            text: text.into(),
            category,
            location: Some(location),
            activatable: true,
        }
    }
}

/// A line as delivered to the output sink: either a classified tool line or a
/// raw line synthesised by the job itself (command echo, final status).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutputLine {
    Echo { text: String },
    Item(OutputItem),
}

impl OutputLine {
    pub fn text(&self) -> &str {
        match self {
            OutputLine::Echo { text } => text,
            OutputLine::Item(item) => &item.text,
        }
    }

    pub fn item(&self) -> Option<&OutputItem> {
        match self {
            OutputLine::Item(item) => Some(item),
            OutputLine::Echo { .. } => None,
        }
    }
}
