use serde::Deserialize;
use serde::Serialize;
use serde_with::skip_serializing_none;

use crate::markup::Markup;

/// Payload of the source request: the file's path segments and its
/// highlighted lines.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    #[serde(default)]
    pub path: Vec<String>,
    #[serde(default)]
    pub lines: Vec<Markup>,
}

/// The source request answers with a tagged payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceResponse {
    Source(SourceFile),
}

/// Lines are 1-based and inclusive. Columns are 1-based; `column_end` is
/// exclusive.
#[skip_serializing_none]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightRange {
    pub line_start: usize,
    pub line_end: usize,
    #[serde(default)]
    pub column_start: Option<usize>,
    #[serde(default)]
    pub column_end: Option<usize>,
}

impl HighlightRange {
    pub fn lines(line_start: usize, line_end: usize) -> Self {
        Self {
            line_start,
            line_end,
            column_start: None,
            column_end: None,
        }
    }

    pub fn contains_line(&self, line: usize) -> bool {
        (self.line_start..=self.line_end).contains(&line)
    }

    /// Column span to paint on `line`, as a 0-based half-open range of
    /// character offsets. `None` means the whole line.
    pub fn columns_on(&self, line: usize) -> Option<(usize, Option<usize>)> {
        let (Some(start), Some(end)) = (self.column_start, self.column_end) else {
            return None;
        };
        let from = if line == self.line_start {
            start.saturating_sub(1)
        } else {
            0
        };
        let to = if line == self.line_end {
            Some(end.saturating_sub(1))
        } else {
            None
        };
        if from == 0 && to.is_none() {
            None
        } else {
            Some((from, to))
        }
    }
}
