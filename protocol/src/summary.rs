use serde::Deserialize;
use serde::Serialize;
use serde_with::skip_serializing_none;

use crate::markup::Markup;

/// One segment of a symbol's enclosing module path.
#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawBreadCrumb")]
pub struct BreadCrumb {
    pub name: String,
    pub id: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBreadCrumb {
    Name(String),
    Item {
        name: String,
        #[serde(default)]
        id: Option<String>,
    },
}

impl From<RawBreadCrumb> for BreadCrumb {
    fn from(raw: RawBreadCrumb) -> Self {
        match raw {
            RawBreadCrumb::Name(name) => BreadCrumb { name, id: None },
            RawBreadCrumb::Item { name, id } => BreadCrumb { name, id },
        }
    }
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryData {
    #[serde(rename = "breadCrumbs", default)]
    pub bread_crumbs: Vec<BreadCrumb>,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub signature: Markup,
    #[serde(default)]
    pub doc_summary: String,
    #[serde(default)]
    pub doc_rest: Option<String>,
    #[serde(default)]
    pub children: Vec<SummaryChild>,
}

impl SummaryData {
    /// The remainder of the documentation, if there is any to expand.
    pub fn doc_rest(&self) -> Option<&str> {
        self.doc_rest.as_deref().filter(|rest| !rest.trim().is_empty())
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref().filter(|parent| !parent.is_empty())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryChild {
    pub id: String,
    #[serde(default)]
    pub signature: Markup,
    #[serde(default)]
    pub doc_summary: String,
}
