//! Data shared between the backend client and the source browser UI.

pub mod link;
pub mod markup;
pub mod search;
pub mod source;
pub mod summary;
pub mod view;

pub use link::Link;
pub use link::LinkParseError;
pub use markup::Markup;
pub use markup::ReferenceSpan;
pub use markup::Segment;
pub use search::FileResult;
pub use search::ImplResults;
pub use search::SearchKind;
pub use search::SearchLine;
pub use search::SearchResults;
pub use source::HighlightRange;
pub use source::SourceFile;
pub use source::SourceResponse;
pub use summary::BreadCrumb;
pub use summary::SummaryChild;
pub use summary::SummaryData;
pub use view::ErrorPage;
pub use view::HistoryEntry;
pub use view::SearchPage;
pub use view::SourcePage;
pub use view::SummaryPage;
pub use view::ViewState;
