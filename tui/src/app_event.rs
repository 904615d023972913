use srcview_backend_client::RequestError;
use srcview_protocol::HighlightRange;
use srcview_protocol::Link;
use srcview_protocol::SearchKind;
use srcview_protocol::SearchResults;
use srcview_protocol::SourceFile;
use srcview_protocol::SummaryData;

#[allow(clippy::large_enum_variant)]
#[derive(Debug)]
pub(crate) enum AppEvent {
    /// Follow a link: request the summary or source it names.
    Navigate(Link),

    /// Search for uses of the symbol with this context id.
    FindUses(String),

    /// Search for implementations of the trait with this context id.
    FindImpls(String),

    SummaryLoaded {
        id: String,
        result: Result<SummaryData, RequestError>,
    },
    SourceLoaded {
        file: String,
        highlight: Option<HighlightRange>,
        result: Result<SourceFile, RequestError>,
    },
    SearchLoaded {
        kind: SearchKind,
        id: String,
        result: Result<SearchResults, RequestError>,
    },

    /// Ask the server to open `<file>:<line>` in an editor.
    Edit(String),
    EditFinished {
        link: String,
        result: Result<(), RequestError>,
    },

    /// Hand a URL to the system browser.
    OpenExternal(String),

    HistoryBack,
    HistoryForward,

    /// Request to exit the application gracefully.
    ExitRequest,
}
