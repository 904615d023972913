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
use srcview_protocol::Segment;
use srcview_protocol::SourcePage;

use crate::app_event_sender::AppEventSender;
use crate::bindings::Interaction;
use crate::bindings::Trigger;
use crate::elements::ElementId;
use crate::interactive::ClickPolicy;
use crate::interactive::Interactive;
use crate::interactive::MouseResult;
use crate::menus::LineNumberMenu;
use crate::render::rows::H_SCROLL_STEP;
use crate::render::rows::Piece;
use crate::render::rows::Row;
use crate::render::rows::max_h_scroll;
use crate::render::rows::paint_rows;
use crate::text_formatting::sanitize_line;

/// Rows kept above the start line when a file is opened.
pub(crate) const START_LINE_MARGIN: usize = 5;
const BLANK_LINE: &str = "\u{a0}";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Phase {
    Idle,
    Rendering,
    Interactive,
}

pub(crate) struct SourceView {
    page: SourcePage,
    phase: Phase,
    scroll: usize,
    h_scroll: usize,
    scroll_step: usize,
    body_height: usize,
    body_width: u16,
    rows: Vec<Row>,
    pub(crate) interactive: Interactive,
}

impl SourceView {
    pub(crate) fn new(page: SourcePage, vcs_link: Option<String>, scroll_step: usize) -> Self {
        let menu = LineNumberMenu::new(page.file.clone(), vcs_link);
        Self {
            page,
            phase: Phase::Idle,
            scroll: 0,
            h_scroll: 0,
            scroll_step: scroll_step.max(1),
            body_height: 0,
            body_width: 0,
            rows: Vec::new(),
            interactive: Interactive::with_line_menu(menu),
        }
    }

    #[cfg(test)]
    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    #[cfg(test)]
    pub(crate) fn scroll(&self) -> usize {
        self.scroll
    }

    /// First render: apply the highlight, wire every element, then jump to
    /// the start line.
    pub(crate) fn mount(&mut self) {
        if self.phase != Phase::Idle {
            return;
        }
        self.phase = Phase::Rendering;
        self.rows = build_rows(&self.page);

        let line_count = self.page.lines.len();
        if let Some(range) = self.page.highlight {
            for line in range.line_start.max(1)..=range.line_end.min(line_count) {
                self.interactive
                    .states
                    .set_selected(ElementId::LineNumber(line), true);
                self.interactive.states.set_selected(ElementId::Line(line), true);
            }
        }

        for (idx, markup) in self.page.lines.iter().enumerate() {
            let line = idx + 1;
            for (segment, span) in markup.references() {
                self.interactive.bind_reference(
                    ElementId::Span {
                        block: line,
                        segment,
                    },
                    span,
                    ClickPolicy::DocsFirst,
                );
            }
            self.interactive.bindings.bind(
                ElementId::LineNumber(line),
                Trigger::Click,
                Interaction::LineMenu(line),
            );
        }

        self.scroll = start_scroll(self.page.start_line).min(self.max_scroll());
        self.phase = Phase::Interactive;
    }

    fn max_scroll(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    fn scroll_by(&mut self, delta: isize) {
        let next = (self.scroll as isize + delta).clamp(0, self.max_scroll() as isize);
        self.scroll = next as usize;
    }

    fn scroll_sideways(&mut self, delta: isize) {
        let max = max_h_scroll(&self.rows, self.body_width) as isize;
        self.h_scroll = (self.h_scroll as isize + delta).clamp(0, max) as usize;
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent, tx: &AppEventSender) -> bool {
        if self.interactive.handle_key(key, tx) {
            return true;
        }
        let page = self.body_height.max(1) as isize;
        let step = H_SCROLL_STEP as isize;
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_by(1),
            KeyCode::Left | KeyCode::Char('h') => self.scroll_sideways(-step),
            KeyCode::Right | KeyCode::Char('l') => self.scroll_sideways(step),
            KeyCode::PageUp => self.scroll_by(-page),
            KeyCode::PageDown | KeyCode::Char(' ') => self.scroll_by(page),
            KeyCode::Home => {
                self.scroll = 0;
                self.h_scroll = 0;
            }
            KeyCode::End => self.scroll = self.max_scroll(),
            _ => return false,
        }
        true
    }

    pub(crate) fn handle_mouse(&mut self, event: MouseEvent, tx: &AppEventSender) -> bool {
        match self.interactive.handle_mouse(event, tx) {
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
        if area.height == 0 {
            return;
        }

        let header = self.page.path.join(" / ");
        buf.set_stringn(
            area.x,
            area.y,
            header,
            area.width as usize,
            Style::default().add_modifier(Modifier::BOLD),
        );
        let body = Rect::new(
            area.x,
            area.y.saturating_add(2),
            area.width,
            area.height.saturating_sub(2),
        );
        self.body_height = body.height as usize;
        self.body_width = body.width;
        self.h_scroll = self.h_scroll.min(max_h_scroll(&self.rows, body.width));
        paint_rows(
            &self.rows,
            self.scroll,
            self.h_scroll,
            body,
            buf,
            &self.interactive.states,
            &mut self.interactive.hits,
        );
        self.interactive.render_menus(buf);
    }
}

fn start_scroll(start_line: usize) -> usize {
    start_line.saturating_sub(1).saturating_sub(START_LINE_MARGIN)
}

fn build_rows(page: &SourcePage) -> Vec<Row> {
    let gutter = page.lines.len().max(1).to_string().len();
    let number_style = Style::default().fg(Color::DarkGray);
    let reference_style = Style::default().fg(Color::Cyan);

    page.lines
        .iter()
        .enumerate()
        .map(|(idx, markup)| {
            let line = idx + 1;
            let mut pieces = vec![
                Piece::styled(format!("{line:>gutter$}"), number_style)
                    .element(ElementId::LineNumber(line))
                    .pinned(),
                Piece::plain(" ").pinned(),
            ];
            let container = ElementId::Line(line);
            if markup.is_blank() {
                pieces.push(Piece::plain(BLANK_LINE).within(container));
                return Row::new(pieces);
            }
            let columns = page.highlight.as_ref().and_then(|range| {
                range
                    .contains_line(line)
                    .then(|| range.columns_on(line))
                    .flatten()
            });
            let mut offset = 0;
            for (segment, part) in markup.segments().iter().enumerate() {
                let (text, element, style) = match part {
                    Segment::Text(text) => (text.as_str(), None, Style::default()),
                    Segment::Reference(span) => (
                        span.text.as_str(),
                        Some(ElementId::Span {
                            block: line,
                            segment,
                        }),
                        reference_style,
                    ),
                };
                for (chunk, selectable) in split_columns(text, offset, columns) {
                    let mut piece = Piece::styled(sanitize_line(chunk), style).within(container.clone());
                    if let Some(element) = &element {
                        piece = piece.element(element.clone());
                    }
                    if !selectable {
                        piece = piece.unselectable();
                    }
                    pieces.push(piece);
                }
                offset += text.chars().count();
            }
            Row::new(pieces)
        })
        .collect()
}

/// Split `text`, which starts at character `offset` of its line, where the
/// highlighted column span begins and ends. Without a span every chunk is
/// selectable.
fn split_columns(
    text: &str,
    offset: usize,
    columns: Option<(usize, Option<usize>)>,
) -> Vec<(&str, bool)> {
    let Some((from, to)) = columns else {
        return vec![(text, true)];
    };
    let len = text.chars().count();
    let local = |column: usize| column.saturating_sub(offset).min(len);
    let start = local(from);
    let end = to.map(local).unwrap_or(len).max(start);
    let byte = |chars: usize| {
        text.char_indices()
            .nth(chars)
            .map(|(idx, _)| idx)
            .unwrap_or(text.len())
    };
    let (start_byte, end_byte) = (byte(start), byte(end));
    [
        (&text[..start_byte], false),
        (&text[start_byte..end_byte], true),
        (&text[end_byte..], false),
    ]
    .into_iter()
    .filter(|(chunk, _)| !chunk.is_empty())
    .collect()
}
