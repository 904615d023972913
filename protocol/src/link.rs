use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::source::HighlightRange;

const SUMMARY_PREFIX: &str = "summary:";

/// A navigation target as carried by clickable elements.
///
/// `summary:<id>` opens the summary of a symbol. Anything else names a file,
/// optionally followed by `:<line>`, `:<line>:<col>` or
/// `:<line>:<col>:<line_end>:<col_end>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Link {
    Summary(String),
    Source {
        file: String,
        highlight: Option<HighlightRange>,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LinkParseError {
    #[error("empty link")]
    Empty,
    #[error("summary link without an id")]
    MissingId,
    #[error("invalid position `{part}` in link `{link}`")]
    InvalidPosition { link: String, part: String },
    #[error("unsupported position format in link `{0}`")]
    UnsupportedShape(String),
}

impl Link {
    pub fn summary(id: impl Into<String>) -> Self {
        Link::Summary(id.into())
    }

    pub fn source_line(file: impl Into<String>, line: usize) -> Self {
        Link::Source {
            file: file.into(),
            highlight: Some(HighlightRange::lines(line, line)),
        }
    }

    /// First line to bring into view when the link is followed.
    pub fn start_line(&self) -> usize {
        match self {
            Link::Source {
                highlight: Some(range),
                ..
            } => range.line_start,
            _ => 1,
        }
    }
}

impl FromStr for Link {
    type Err = LinkParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LinkParseError::Empty);
        }
        if let Some(id) = trimmed.strip_prefix(SUMMARY_PREFIX) {
            if id.is_empty() {
                return Err(LinkParseError::MissingId);
            }
            return Ok(Link::Summary(id.to_string()));
        }

        let mut parts = trimmed.split(':');
        let file = parts.next().unwrap_or_default().to_string();
        if file.is_empty() {
            return Err(LinkParseError::Empty);
        }
        let numbers = parts
            .map(|part| {
                part.parse::<usize>()
                    .map_err(|_| LinkParseError::InvalidPosition {
                        link: trimmed.to_string(),
                        part: part.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let non_zero = |value: usize| (value > 0).then_some(value);
        let highlight = match numbers.as_slice() {
            [] => None,
            [line] => Some(HighlightRange::lines(*line, *line)),
            [line, column] => Some(HighlightRange {
                line_start: *line,
                line_end: *line,
                column_start: non_zero(*column),
                column_end: None,
            }),
            [line_start, column_start, line_end, column_end] => Some(HighlightRange {
                line_start: *line_start,
                line_end: *line_end,
                column_start: non_zero(*column_start),
                column_end: non_zero(*column_end),
            }),
            _ => return Err(LinkParseError::UnsupportedShape(trimmed.to_string())),
        };
        Ok(Link::Source { file, highlight })
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Link::Summary(id) => write!(f, "{SUMMARY_PREFIX}{id}"),
            Link::Source {
                file,
                highlight: None,
            } => write!(f, "{file}"),
            Link::Source {
                file,
                highlight: Some(range),
            } => {
                let column_start = range.column_start.unwrap_or(0);
                let column_end = range.column_end.unwrap_or(0);
                if range.line_start == range.line_end && range.column_end.is_none() {
                    match range.column_start {
                        Some(column) => write!(f, "{file}:{}:{column}", range.line_start),
                        None => write!(f, "{file}:{}", range.line_start),
                    }
                } else {
                    write!(
                        f,
                        "{file}:{}:{column_start}:{}:{column_end}",
                        range.line_start, range.line_end
                    )
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_summary_links() {
        assert_eq!("summary:42".parse::<Link>(), Ok(Link::summary("42")));
        assert_eq!("summary:".parse::<Link>(), Err(LinkParseError::MissingId));
    }

    #[test]
    fn parses_line_links() {
        assert_eq!("src/main.rs:7".parse::<Link>(), Ok(Link::source_line("src/main.rs", 7)));
        assert_eq!(
            "src/main.rs".parse::<Link>(),
            Ok(Link::Source {
                file: "src/main.rs".into(),
                highlight: None
            })
        );
    }

    #[test]
    fn parses_full_ranges() {
        let link: Link = "src/lib.rs:3:5:4:9".parse().unwrap();
        assert_eq!(
            link,
            Link::Source {
                file: "src/lib.rs".into(),
                highlight: Some(HighlightRange {
                    line_start: 3,
                    line_end: 4,
                    column_start: Some(5),
                    column_end: Some(9),
                }),
            }
        );
        assert_eq!(link.start_line(), 3);
        assert_eq!(link.to_string(), "src/lib.rs:3:5:4:9");
    }

    #[test]
    fn rejects_garbage_positions() {
        assert_eq!(
            "a.rs:x".parse::<Link>(),
            Err(LinkParseError::InvalidPosition {
                link: "a.rs:x".into(),
                part: "x".into()
            })
        );
        assert_eq!(
            "a.rs:1:2:3".parse::<Link>(),
            Err(LinkParseError::UnsupportedShape("a.rs:1:2:3".into()))
        );
    }

    #[test]
    fn display_round_trips_short_forms() {
        for raw in ["summary:9", "lib.rs", "lib.rs:12", "lib.rs:12:4"] {
            let link: Link = raw.parse().unwrap();
            assert_eq!(link.to_string(), raw);
        }
    }
}
