use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::MouseEvent;
use crossterm::event::MouseEventKind;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use srcview_protocol::FileResult;
use srcview_protocol::HighlightRange;
use srcview_protocol::Link;
use srcview_protocol::SearchKind;
use srcview_protocol::SearchLine;
use srcview_protocol::SearchPage;

use crate::app_event_sender::AppEventSender;
use crate::bindings::Interaction;
use crate::bindings::Trigger;
use crate::elements::ElementId;
use crate::interactive::Interactive;
use crate::interactive::MouseResult;
use crate::render::rows::Piece;
use crate::render::rows::Row;
use crate::render::rows::paint_rows;
use crate::text_formatting::sanitize_line;

/// Results of "find all uses" or "find impls", grouped by file. Clicking a
/// hit opens the file at that line.
pub(crate) struct SearchView {
    rows: Vec<Row>,
    scroll: usize,
    scroll_step: usize,
    pub(crate) interactive: Interactive,
}

impl SearchView {
    pub(crate) fn new(page: &SearchPage, scroll_step: usize) -> Self {
        let mut interactive = Interactive::default();
        let rows = build_rows(page, &mut interactive);
        Self {
            rows,
            scroll: 0,
            scroll_step: scroll_step.max(1),
            interactive,
        }
    }

    fn scroll_by(&mut self, delta: isize) {
        let max = self.rows.len().saturating_sub(1) as isize;
        self.scroll = (self.scroll as isize + delta).clamp(0, max.max(0)) as usize;
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent, tx: &AppEventSender) -> bool {
        if self.interactive.handle_key(key, tx) {
            return true;
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_by(1),
            KeyCode::Home => self.scroll = 0,
            _ => return false,
        }
        true
    }

    pub(crate) fn handle_mouse(&mut self, event: MouseEvent, tx: &AppEventSender) -> bool {
        match self.interactive.handle_mouse(event, tx) {
            MouseResult::Handled | MouseResult::Custom(_) => true,
            MouseResult::Ignored => match event.kind {
                MouseEventKind::ScrollUp => {
                    self.scroll_by(-(self.scroll_step as isize));
                    true
                }
                MouseEventKind::ScrollDown => {
                    self.scroll_by(self.scroll_step as isize);
                    true
                }
                _ => false,
            },
        }
    }

    pub(crate) fn render(&mut self, area: Rect, buf: &mut Buffer) {
        self.interactive.bounds = area;
        self.interactive.hits.clear();
        paint_rows(
            &self.rows,
            self.scroll,
            0,
            area,
            buf,
            &self.interactive.states,
            &mut self.interactive.hits,
        );
    }
}

/// Where a hit leads: its line, with the matched columns highlighted.
fn hit_link(file: &str, hit: &SearchLine) -> Link {
    let columns = (hit.column_start > 0 && hit.column_end > hit.column_start)
        .then_some((hit.column_start, hit.column_end));
    Link::Source {
        file: file.to_string(),
        highlight: Some(HighlightRange {
            line_start: hit.line_start,
            line_end: hit.line_start,
            column_start: columns.map(|(start, _)| start),
            column_end: columns.map(|(_, end)| end),
        }),
    }
}

fn build_rows(page: &SearchPage, interactive: &mut Interactive) -> Vec<Row> {
    let heading = Style::default().add_modifier(Modifier::BOLD);
    let title = match page.kind {
        SearchKind::Uses => "Uses",
        SearchKind::Impls => "Implementations",
    };
    let mut rows = vec![
        Row::new(vec![Piece::styled(
            format!("{title} ({} results)", page.results.hit_count()),
            heading,
        )]),
        Row::blank(),
    ];
    if page.results.is_empty() {
        rows.push(Row::new(vec![Piece::plain("No results")]));
        return rows;
    }

    let mut next_hit = 0;
    for (label, files) in [
        ("Definitions", &page.results.defs),
        ("References", &page.results.refs),
    ] {
        if files.is_empty() {
            continue;
        }
        rows.push(Row::new(vec![Piece::styled(label, heading)]));
        for file in files {
            rows.extend(file_rows(file, &mut next_hit, interactive));
        }
        rows.push(Row::blank());
    }
    rows
}

fn file_rows(file: &FileResult, next_hit: &mut usize, interactive: &mut Interactive) -> Vec<Row> {
    let mut rows = vec![Row::new(vec![Piece::styled(
        format!("  {}", file.file_name),
        Style::default().fg(Color::Green),
    )])];
    let width = file
        .lines
        .iter()
        .map(|hit| hit.line_start.to_string().len())
        .max()
        .unwrap_or(1);
    for hit in &file.lines {
        let element = ElementId::Hit(*next_hit);
        *next_hit += 1;
        interactive.bindings.bind(
            element.clone(),
            Trigger::Click,
            Interaction::Navigate(hit_link(&file.file_name, hit)),
        );
        rows.push(Row::new(vec![
            Piece::plain("    "),
            Piece::styled(
                format!("{:>width$}: {}", hit.line_start, sanitize_line(hit.line.trim_end())),
                Style::default(),
            )
            .element(element),
        ]));
    }
    rows
}
