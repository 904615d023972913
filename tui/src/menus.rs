//! The two context menus of the browser: the reference menu opened on a
//! symbol and the line-number menu opened on the gutter.

use srcview_protocol::Link;
use srcview_protocol::ReferenceSpan;

use crate::app_event::AppEvent;
use crate::menu::MenuItem;
use crate::menu::MenuItemFactory;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuAction {
    ViewSummary(String),
    ViewDocs(String),
    ViewSource(String),
    FindUses(String),
    FindImpls(String),
    Edit(String),
    ViewInVcs(String),
}

impl MenuAction {
    pub(crate) fn into_event(self) -> AppEvent {
        match self {
            MenuAction::ViewSummary(id) => AppEvent::Navigate(Link::summary(id)),
            MenuAction::ViewDocs(url) | MenuAction::ViewSource(url) | MenuAction::ViewInVcs(url) => {
                AppEvent::OpenExternal(url)
            }
            MenuAction::FindUses(id) => AppEvent::FindUses(id),
            MenuAction::FindImpls(id) => AppEvent::FindImpls(id),
            MenuAction::Edit(link) => AppEvent::Edit(link),
        }
    }
}

/// The symbol a reference menu was opened on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RefTarget {
    pub id: String,
    pub doc_url: Option<String>,
    pub src_url: Option<String>,
    pub impls: u32,
}

impl RefTarget {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Target for a span that carries a context id.
    pub fn from_span(span: &ReferenceSpan) -> Option<Self> {
        let id = span.context_id.as_deref().filter(|id| !id.is_empty())?;
        Some(Self {
            id: id.to_string(),
            doc_url: span.doc_url.clone().filter(|url| !url.is_empty()),
            src_url: span.src_url.clone().filter(|url| !url.is_empty()),
            impls: span.impls,
        })
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RefMenu;

impl MenuItemFactory for RefMenu {
    type Target = RefTarget;
    type Action = MenuAction;

    fn items(&self, target: &RefTarget) -> Vec<MenuItem<MenuAction>> {
        let mut items = vec![MenuItem::new(
            "ref_menu_view_summary",
            "view summary",
            MenuAction::ViewSummary(target.id.clone()),
        )];
        if let Some(url) = &target.doc_url {
            items.push(MenuItem::new(
                "ref_menu_view_docs",
                "view docs",
                MenuAction::ViewDocs(url.clone()),
            ));
        }
        if let Some(url) = &target.src_url {
            items.push(MenuItem::new(
                "ref_menu_view_source",
                "view source",
                MenuAction::ViewSource(url.clone()),
            ));
        }
        items.push(MenuItem::new(
            "ref_menu_find_uses",
            "find all uses",
            MenuAction::FindUses(target.id.clone()),
        ));
        if target.impls > 0 {
            items.push(MenuItem::new(
                "ref_menu_find_impls",
                format!("find impls ({})", target.impls),
                MenuAction::FindImpls(target.id.clone()),
            ));
        }
        items
    }
}

/// Gutter menu of a source view. Targets are 1-based line numbers.
#[derive(Clone, Debug)]
pub struct LineNumberMenu {
    file: String,
    vcs_link: Option<String>,
}

impl LineNumberMenu {
    pub fn new(file: impl Into<String>, vcs_link: Option<String>) -> Self {
        Self {
            file: file.into(),
            vcs_link: vcs_link.filter(|template| !template.trim().is_empty()),
        }
    }
}

impl MenuItemFactory for LineNumberMenu {
    type Target = usize;
    type Action = MenuAction;

    fn items(&self, line: &usize) -> Vec<MenuItem<MenuAction>> {
        let mut items = vec![
            MenuItem::new(
                "line_number_menu_edit",
                "edit",
                MenuAction::Edit(format!("{}:{line}", self.file)),
            )
            .unstable(),
        ];
        if let Some(template) = &self.vcs_link {
            items.push(MenuItem::new(
                "line_number_vcs",
                "view in VCS",
                MenuAction::ViewInVcs(vcs_url(template, &self.file, *line)),
            ));
        }
        items
    }
}

/// Fill a VCS link template. Only the first `$file` and `$line` are
/// substituted.
pub fn vcs_url(template: &str, file: &str, line: usize) -> String {
    template
        .replacen("$file", file, 1)
        .replacen("$line", &line.to_string(), 1)
}
