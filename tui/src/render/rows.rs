use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Style;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

use crate::elements::ElementId;
use crate::elements::ElementStates;
use crate::elements::HitMap;

/// Background of every element in the hovered symbol's group.
pub(crate) const HOVER_BG: Color = Color::Rgb(0xd5, 0xf3, 0xb5);
pub(crate) const SELECTED_BG: Color = Color::Rgb(0xff, 0xf2, 0xa8);
/// Columns moved per sideways scroll step.
pub(crate) const H_SCROLL_STEP: usize = 8;

/// A run of text on one row.
#[derive(Clone, Debug, Default)]
pub(crate) struct Piece {
    pub text: String,
    pub style: Style,
    /// The element this text belongs to, if it is interactive.
    pub element: Option<ElementId>,
    /// Enclosing element, e.g. the line a reference sits on.
    pub container: Option<ElementId>,
    /// Whether a selected container paints this piece.
    pub selectable: bool,
    /// Stays put when the row is scrolled sideways, like a gutter.
    pub pinned: bool,
}

impl Piece {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            selectable: true,
            ..Self::default()
        }
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            style,
            ..Self::plain(text)
        }
    }

    pub fn element(mut self, element: ElementId) -> Self {
        self.element = Some(element);
        self
    }

    pub fn within(mut self, container: ElementId) -> Self {
        self.container = Some(container);
        self
    }

    pub fn unselectable(mut self) -> Self {
        self.selectable = false;
        self
    }

    pub fn pinned(mut self) -> Self {
        self.pinned = true;
        self
    }

    fn resolved_style(&self, states: &ElementStates) -> Style {
        let mut style = self.style;
        let selected = self.element.as_ref().is_some_and(|e| states.is_selected(e))
            || (self.selectable && self.container.as_ref().is_some_and(|c| states.is_selected(c)));
        if selected {
            style = style.bg(SELECTED_BG).fg(Color::Black);
        }
        if self.element.as_ref().is_some_and(|e| states.is_highlighted(e)) {
            style = style.bg(HOVER_BG).fg(Color::Black);
        }
        style
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Row {
    pub pieces: Vec<Piece>,
}

impl Row {
    pub fn new(pieces: Vec<Piece>) -> Self {
        Self { pieces }
    }

    pub fn blank() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.pieces.iter().map(|piece| piece.text.as_str()).collect()
    }

    pub fn width(&self) -> usize {
        self.pieces.iter().map(|piece| piece.text.width()).sum()
    }
}

/// Largest sideways offset that still shows the end of the widest row.
pub(crate) fn max_h_scroll(rows: &[Row], width: u16) -> usize {
    rows.iter()
        .map(Row::width)
        .max()
        .unwrap_or(0)
        .saturating_sub(width as usize)
}

/// Drop the first `columns` display columns of `text`. Returns the rest and
/// how many columns were dropped, which can exceed `columns` by one when a
/// wide character straddles the cut.
fn skip_columns(text: &str, columns: usize) -> (&str, usize) {
    let mut skipped = 0;
    for (idx, ch) in text.char_indices() {
        if skipped >= columns {
            return (&text[idx..], skipped);
        }
        skipped += ch.width().unwrap_or(0);
    }
    ("", skipped)
}

/// Paint `rows` starting at `scroll` into `area`, recording the region of
/// every element painted. Unpinned text is shifted left by `h_scroll`
/// columns and cut at the right edge.
pub(crate) fn paint_rows(
    rows: &[Row],
    scroll: usize,
    h_scroll: usize,
    area: Rect,
    buf: &mut Buffer,
    states: &ElementStates,
    hits: &mut HitMap,
) {
    for (offset, row) in rows
        .iter()
        .skip(scroll)
        .take(area.height as usize)
        .enumerate()
    {
        let y = area.y + offset as u16;
        let mut x = area.x;
        let mut skip = h_scroll;
        for piece in &row.pieces {
            if x >= area.right() {
                break;
            }
            let text = if piece.pinned {
                piece.text.as_str()
            } else {
                let (rest, skipped) = skip_columns(&piece.text, skip);
                skip = skip.saturating_sub(skipped);
                rest
            };
            if text.is_empty() {
                continue;
            }
            let remaining = (area.right() - x) as usize;
            let style = piece.resolved_style(states);
            let (end_x, _) = buf.set_stringn(x, y, text, remaining, style);
            let width = end_x.saturating_sub(x).min(text.width() as u16);
            let rect = Rect::new(x, y, width, 1);
            if let Some(container) = &piece.container {
                hits.push(rect, container.clone());
            }
            if let Some(element) = &piece.element {
                hits.push(rect, element.clone());
            }
            x = end_x;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ratatui::layout::Position;

    #[test]
    fn regions_follow_painted_text() {
        let rows = vec![
            Row::new(vec![Piece::plain("skipped")]),
            Row::new(vec![
                Piece::plain("1").element(ElementId::LineNumber(2)),
                Piece::plain(" "),
                Piece::plain("let ").within(ElementId::Line(2)),
                Piece::plain("x")
                    .element(ElementId::Span { block: 2, segment: 1 })
                    .within(ElementId::Line(2)),
            ]),
        ];
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        let mut hits = HitMap::default();
        paint_rows(&rows, 1, 0, area, &mut buf, &ElementStates::default(), &mut hits);

        assert_eq!(hits.locate(&ElementId::LineNumber(2)), Some(Rect::new(0, 0, 1, 1)));
        assert_eq!(
            hits.element_at(Position::new(6, 0)),
            Some(&ElementId::Span { block: 2, segment: 1 })
        );
        assert_eq!(hits.element_at(Position::new(3, 0)), Some(&ElementId::Line(2)));
        assert_eq!(buf[(6, 0)].symbol(), "x");
    }

    #[test]
    fn unselectable_pieces_keep_their_background() {
        let mut states = ElementStates::default();
        states.set_selected(ElementId::Line(1), true);
        let rows = vec![Row::new(vec![
            Piece::plain("ab").within(ElementId::Line(1)).unselectable(),
            Piece::plain("cd").within(ElementId::Line(1)),
        ])];
        let area = Rect::new(0, 0, 10, 1);
        let mut buf = Buffer::empty(area);
        paint_rows(&rows, 0, 0, area, &mut buf, &states, &mut HitMap::default());

        assert_eq!(buf[(0, 0)].bg, Color::Reset);
        assert_eq!(buf[(2, 0)].bg, SELECTED_BG);
    }

    #[test]
    fn sideways_scroll_keeps_pinned_pieces_and_moves_regions() {
        let rows = vec![Row::new(vec![
            Piece::plain("7").element(ElementId::LineNumber(7)).pinned(),
            Piece::plain(" ").pinned(),
            Piece::plain("abcdefgh").within(ElementId::Line(7)),
            Piece::plain("Tail")
                .element(ElementId::Span { block: 7, segment: 1 })
                .within(ElementId::Line(7)),
        ])];
        let area = Rect::new(0, 0, 8, 1);

        let mut hits = HitMap::default();
        let mut buf = Buffer::empty(area);
        paint_rows(&rows, 0, 0, area, &mut buf, &ElementStates::default(), &mut hits);
        assert_eq!(hits.locate(&ElementId::Span { block: 7, segment: 1 }), None);

        assert_eq!(max_h_scroll(&rows, area.width), 6);
        let mut hits = HitMap::default();
        let mut buf = Buffer::empty(area);
        paint_rows(&rows, 0, 6, area, &mut buf, &ElementStates::default(), &mut hits);
        assert_eq!(buf[(0, 0)].symbol(), "7");
        assert_eq!(buf[(2, 0)].symbol(), "g");
        assert_eq!(
            hits.locate(&ElementId::Span { block: 7, segment: 1 }),
            Some(Rect::new(4, 0, 4, 1))
        );
    }

    #[test]
    fn skipping_past_a_piece_carries_into_the_next() {
        assert_eq!(skip_columns("abc", 5), ("", 3));
        assert_eq!(skip_columns("abc", 0), ("abc", 0));
        assert_eq!(skip_columns("\u{4e2d}x", 1), ("x", 2));
    }
}
