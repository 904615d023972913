use serde::Deserialize;
use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub defs: Vec<FileResult>,
    #[serde(default)]
    pub refs: Vec<FileResult>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty() && self.refs.is_empty()
    }

    pub fn hit_count(&self) -> usize {
        self.defs
            .iter()
            .chain(self.refs.iter())
            .map(|file| file.lines.len())
            .sum()
    }
}

/// Payload of the implementation search, folded into [`SearchResults`] as
/// references.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplResults {
    #[serde(default)]
    pub results: Vec<FileResult>,
}

impl From<ImplResults> for SearchResults {
    fn from(impls: ImplResults) -> Self {
        SearchResults {
            defs: Vec::new(),
            refs: impls.results,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileResult {
    pub file_name: String,
    #[serde(default)]
    pub lines: Vec<SearchLine>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchLine {
    pub line_start: usize,
    #[serde(default)]
    pub column_start: usize,
    #[serde(default)]
    pub column_end: usize,
    #[serde(default)]
    pub line: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchKind {
    Uses,
    Impls,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn impl_results_become_references() {
        let impls: ImplResults = serde_json::from_str(
            r#"{"results": [{"file_name": "src/a.rs", "lines": [{"line_start": 3, "column_start": 1, "column_end": 4, "line": "impl A"}]}]}"#,
        )
        .unwrap();
        let results = SearchResults::from(impls);
        assert!(results.defs.is_empty());
        assert_eq!(results.refs[0].file_name, "src/a.rs");
        assert_eq!(results.hit_count(), 1);
    }
}
