use serde::Deserialize;
use serde::Serialize;
use serde_with::skip_serializing_none;

use crate::markup::Markup;
use crate::search::SearchKind;
use crate::search::SearchResults;
use crate::source::HighlightRange;
use crate::summary::SummaryData;

/// The page currently shown. Exactly one is current at a time; a
/// navigation replaces it wholesale.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "page", content = "data", rename_all = "snake_case")]
pub enum ViewState {
    Source(SourcePage),
    Summary(SummaryPage),
    Search(SearchPage),
    Error(ErrorPage),
}

#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePage {
    /// The file as requested, used for edit and VCS links.
    pub file: String,
    /// Path segments shown as breadcrumbs.
    pub path: Vec<String>,
    pub lines: Vec<Markup>,
    #[serde(default)]
    pub highlight: Option<HighlightRange>,
    pub start_line: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryPage {
    pub id: String,
    pub data: SummaryData,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
    pub kind: SearchKind,
    pub id: String,
    pub results: SearchResults,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPage {
    pub message: String,
}

impl ViewState {
    pub fn error(message: impl Into<String>) -> Self {
        ViewState::Error(ErrorPage {
            message: message.into(),
        })
    }

    /// Location fragment recorded in history for this view.
    pub fn fragment(&self) -> String {
        match self {
            ViewState::Source(page) => source_fragment(&page.file, page.start_line),
            ViewState::Summary(page) => summary_fragment(&page.id),
            ViewState::Search(page) => search_fragment(page.kind, &page.id),
            ViewState::Error(_) => "#error".to_string(),
        }
    }
}

pub fn summary_fragment(id: &str) -> String {
    format!("#summary={id}")
}

pub fn source_fragment(file: &str, line: usize) -> String {
    format!("#src={file}:{line}")
}

pub fn search_fragment(kind: SearchKind, id: &str) -> String {
    match kind {
        SearchKind::Uses => format!("#search={id}"),
        SearchKind::Impls => format!("#impls={id}"),
    }
}

/// A navigation history record. Entries pushed after a failed request
/// carry no state.
#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub url: String,
    #[serde(default)]
    pub state: Option<ViewState>,
}

impl HistoryEntry {
    pub fn placeholder(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            state: None,
        }
    }

    pub fn for_view(view: &ViewState) -> Self {
        Self {
            url: view.fragment(),
            state: Some(view.clone()),
        }
    }
}
