use serde::Deserialize;
use serde::Serialize;
use serde_with::skip_serializing_none;

/// A substring of rendered source that refers to a symbol.
///
/// Spans that share a `context_id` refer to the same symbol and are
/// highlighted together.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceSpan {
    pub text: String,
    #[serde(default)]
    pub context_id: Option<String>,
    /// Navigation target in link form (`summary:<id>` or `<file>:<line>...`).
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub doc_url: Option<String>,
    #[serde(default)]
    pub src_url: Option<String>,
    #[serde(default)]
    pub impls: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segment {
    Text(String),
    Reference(ReferenceSpan),
}

impl Segment {
    pub fn text(&self) -> &str {
        match self {
            Segment::Text(text) => text,
            Segment::Reference(span) => &span.text,
        }
    }
}

/// Highlighted text as produced by the backend: plain runs interleaved with
/// reference spans. On the wire this is either a bare string or a list of
/// segments.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawMarkup", into = "Vec<Segment>")]
pub struct Markup {
    segments: Vec<Segment>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMarkup {
    Plain(String),
    Segments(Vec<Segment>),
}

impl From<RawMarkup> for Markup {
    fn from(raw: RawMarkup) -> Self {
        match raw {
            RawMarkup::Plain(text) => Markup::plain(text),
            RawMarkup::Segments(segments) => Markup { segments },
        }
    }
}

impl From<Markup> for Vec<Segment> {
    fn from(markup: Markup) -> Self {
        markup.segments
    }
}

impl From<Vec<Segment>> for Markup {
    fn from(segments: Vec<Segment>) -> Self {
        Markup { segments }
    }
}

impl From<&str> for Markup {
    fn from(text: &str) -> Self {
        Markup::plain(text)
    }
}

impl Markup {
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            return Markup::default();
        }
        Markup {
            segments: vec![Segment::Text(text)],
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_blank(&self) -> bool {
        self.segments.iter().all(|segment| segment.text().is_empty())
    }

    pub fn text(&self) -> String {
        self.segments.iter().map(Segment::text).collect()
    }

    /// Reference spans with their segment index.
    pub fn references(&self) -> impl Iterator<Item = (usize, &ReferenceSpan)> {
        self.segments
            .iter()
            .enumerate()
            .filter_map(|(idx, segment)| match segment {
                Segment::Reference(span) => Some((idx, span)),
                Segment::Text(_) => None,
            })
    }
}
