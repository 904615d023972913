use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;
use crossterm::event::MouseEvent;
use crossterm::event::MouseEventKind;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use srcview_protocol::Link;
use srcview_protocol::Markup;
use srcview_protocol::Segment;
use srcview_protocol::SummaryPage;

use crate::app_event_sender::AppEventSender;
use crate::bindings::Interaction;
use crate::bindings::Trigger;
use crate::elements::ElementId;
use crate::interactive::ClickPolicy;
use crate::interactive::Interactive;
use crate::interactive::MouseResult;
use crate::menus::RefTarget;
use crate::render::rows::H_SCROLL_STEP;
use crate::render::rows::Piece;
use crate::render::rows::Row;
use crate::render::rows::max_h_scroll;
use crate::render::rows::paint_rows;
use crate::text_formatting::sanitize_line;

const CRUMB_SEPARATOR: &str = " :: ";
const PARENT_BUTTON: &str = "\u{2191}";
const CHILD_BUTTON: &str = "\u{2192}";
const MIN_WRAP_WIDTH: usize = 20;

/// Block number of the main signature; child `i` uses `i + 1`.
const SIGNATURE_BLOCK: usize = 0;

pub(crate) struct SummaryView {
    page: SummaryPage,
    /// Whether the rest of the documentation is expanded. Never survives a
    /// navigation.
    show_docs: bool,
    scroll: usize,
    /// Sideways offset for signatures wider than the view.
    h_scroll: usize,
    max_h_scroll: usize,
    scroll_step: usize,
    row_count: usize,
    mounted: bool,
    pub(crate) interactive: Interactive,
}

impl SummaryView {
    pub(crate) fn new(page: SummaryPage, scroll_step: usize) -> Self {
        Self {
            page,
            show_docs: false,
            scroll: 0,
            h_scroll: 0,
            max_h_scroll: 0,
            scroll_step: scroll_step.max(1),
            row_count: 0,
            mounted: false,
            interactive: Interactive::default(),
        }
    }

    #[cfg(test)]
    pub(crate) fn page(&self) -> &SummaryPage {
        &self.page
    }

    pub(crate) fn show_docs(&self) -> bool {
        self.show_docs
    }

    pub(crate) fn toggle_docs(&mut self) {
        if self.page.data.doc_rest().is_some() {
            self.show_docs = !self.show_docs;
        }
    }

    pub(crate) fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        let data = &self.page.data;
        let interactive = &mut self.interactive;

        for (idx, crumb) in data.bread_crumbs.iter().enumerate() {
            let Some(id) = crumb.id.as_deref().filter(|id| !id.is_empty()) else {
                continue;
            };
            interactive.bindings.bind(
                ElementId::Crumb(idx),
                Trigger::Click,
                Interaction::Navigate(Link::summary(id)),
            );
            interactive.bindings.bind(
                ElementId::Crumb(idx),
                Trigger::ContextMenu,
                Interaction::RefMenu(RefTarget::new(id)),
            );
        }
        if let Some(parent) = data.parent() {
            interactive.bindings.bind(
                ElementId::Parent,
                Trigger::Click,
                Interaction::Navigate(Link::summary(parent)),
            );
        }
        if data.doc_rest().is_some() {
            interactive
                .bindings
                .bind(ElementId::DocToggle, Trigger::Click, Interaction::ToggleDocs);
        }
        bind_markup(interactive, SIGNATURE_BLOCK, &data.signature);
        for (idx, child) in data.children.iter().enumerate() {
            interactive.bindings.bind(
                ElementId::Child(idx),
                Trigger::Click,
                Interaction::Navigate(Link::summary(child.id.clone())),
            );
            bind_markup(interactive, idx + 1, &child.signature);
        }
    }

    fn scroll_by(&mut self, delta: isize) {
        let max = self.row_count.saturating_sub(1) as isize;
        self.scroll = (self.scroll as isize + delta).clamp(0, max.max(0)) as usize;
    }

    fn scroll_sideways(&mut self, delta: isize) {
        let max = self.max_h_scroll as isize;
        self.h_scroll = (self.h_scroll as isize + delta).clamp(0, max) as usize;
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent, tx: &AppEventSender) -> bool {
        if self.interactive.handle_key(key, tx) {
            return true;
        }
        let step = H_SCROLL_STEP as isize;
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_by(1),
            KeyCode::Left | KeyCode::Char('h') => self.scroll_sideways(-step),
            KeyCode::Right | KeyCode::Char('l') => self.scroll_sideways(step),
            KeyCode::Home => {
                self.scroll = 0;
                self.h_scroll = 0;
            }
            KeyCode::Char('d') => self.toggle_docs(),
            _ => return false,
        }
        true
    }

    pub(crate) fn handle_mouse(&mut self, event: MouseEvent, tx: &AppEventSender) -> bool {
        match self.interactive.handle_mouse(event, tx) {
            MouseResult::Custom(Interaction::ToggleDocs) => {
                self.toggle_docs();
                true
            }
            MouseResult::Handled | MouseResult::Custom(_) => true,
            MouseResult::Ignored => {
                let shift = event.modifiers.contains(KeyModifiers::SHIFT);
                let step = self.scroll_step as isize;
                let sideways = H_SCROLL_STEP as isize;
                match event.kind {
                    MouseEventKind::ScrollLeft => self.scroll_sideways(-sideways),
                    MouseEventKind::ScrollRight => self.scroll_sideways(sideways),
                    MouseEventKind::ScrollUp if shift => self.scroll_sideways(-sideways),
                    MouseEventKind::ScrollDown if shift => self.scroll_sideways(sideways),
                    MouseEventKind::ScrollUp => self.scroll_by(-step),
                    MouseEventKind::ScrollDown => self.scroll_by(step),
                    _ => return false,
                }
                true
            }
        }
    }

    pub(crate) fn render(&mut self, area: Rect, buf: &mut Buffer) {
        self.mount();
        self.interactive.bounds = area;
        self.interactive.hits.clear();
        let width = (area.width as usize).saturating_sub(2).max(MIN_WRAP_WIDTH);
        let rows = build_rows(&self.page, self.show_docs, width);
        self.row_count = rows.len();
        self.max_h_scroll = max_h_scroll(&rows, area.width);
        self.h_scroll = self.h_scroll.min(self.max_h_scroll);
        paint_rows(
            &rows,
            self.scroll,
            self.h_scroll,
            area,
            buf,
            &self.interactive.states,
            &mut self.interactive.hits,
        );
        self.interactive.render_menus(buf);
    }
}

fn bind_markup(interactive: &mut Interactive, block: usize, markup: &Markup) {
    for (segment, span) in markup.references() {
        interactive.bind_reference(ElementId::Span { block, segment }, span, ClickPolicy::LinkOnly);
    }
}

fn markup_pieces(block: usize, markup: &Markup) -> Vec<Piece> {
    let reference_style = Style::default().fg(Color::Cyan);
    markup
        .segments()
        .iter()
        .enumerate()
        .map(|(segment, part)| match part {
            Segment::Text(text) => Piece::plain(sanitize_line(text)),
            Segment::Reference(span) => Piece::styled(sanitize_line(&span.text), reference_style)
                .element(ElementId::Span { block, segment }),
        })
        .collect()
}

fn wrapped(text: &str, width: usize, indent: &str) -> Vec<Row> {
    text.lines()
        .flat_map(|paragraph| {
            if paragraph.trim().is_empty() {
                return vec![Row::blank()];
            }
            textwrap::wrap(paragraph, width.saturating_sub(indent.len()).max(1))
                .into_iter()
                .map(|line| Row::new(vec![Piece::plain(format!("{indent}{line}"))]))
                .collect()
        })
        .collect()
}

fn build_rows(page: &SummaryPage, show_docs: bool, width: usize) -> Vec<Row> {
    let data = &page.data;
    let button = Style::default().add_modifier(Modifier::BOLD);
    let mut rows = Vec::new();

    let mut crumbs = Vec::new();
    for (idx, crumb) in data.bread_crumbs.iter().enumerate() {
        if idx > 0 {
            crumbs.push(Piece::styled(CRUMB_SEPARATOR, Style::default().fg(Color::DarkGray)));
        }
        let style = if crumb.id.is_some() {
            Style::default().add_modifier(Modifier::UNDERLINED)
        } else {
            Style::default()
        };
        crumbs.push(Piece::styled(crumb.name.clone(), style).element(ElementId::Crumb(idx)));
    }
    rows.push(Row::new(crumbs));
    rows.push(Row::blank());

    let mut title = Vec::new();
    if data.parent().is_some() {
        title.push(Piece::styled(PARENT_BUTTON, button).element(ElementId::Parent));
        title.push(Piece::plain(" "));
    }
    title.extend(markup_pieces(SIGNATURE_BLOCK, &data.signature));
    rows.push(Row::new(title));
    rows.push(Row::blank());

    let has_rest = data.doc_rest().is_some();
    let indent = if has_rest { "  " } else { "" };
    let mut doc_rows = wrapped(&data.doc_summary, width, indent);
    if has_rest {
        let toggle = if show_docs { "-" } else { "+" };
        let first = doc_rows.first_mut().map(|row| std::mem::take(&mut row.pieces));
        let mut pieces = vec![
            Piece::styled(toggle, button).element(ElementId::DocToggle),
            Piece::plain(" "),
        ];
        if let Some(first) = first {
            // Drop the indent the toggle replaces.
            pieces.extend(first.into_iter().map(|mut piece| {
                piece.text = piece.text.trim_start().to_string();
                piece
            }));
            doc_rows[0] = Row::new(pieces);
        } else {
            doc_rows.push(Row::new(pieces));
        }
    }
    rows.extend(doc_rows);
    if let (true, Some(rest)) = (show_docs, data.doc_rest()) {
        rows.push(Row::blank());
        rows.extend(wrapped(rest, width, "  "));
    }

    if !data.children.is_empty() {
        rows.push(Row::blank());
    }
    for (idx, child) in data.children.iter().enumerate() {
        let mut pieces = vec![
            Piece::styled(CHILD_BUTTON, button).element(ElementId::Child(idx)),
            Piece::plain(" "),
        ];
        pieces.extend(markup_pieces(idx + 1, &child.signature));
        rows.push(Row::new(pieces));
        rows.extend(wrapped(&child.doc_summary, width, "  "));
    }
    rows
}
