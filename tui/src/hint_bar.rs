use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Widget;

/// Key hints along the bottom edge, one line per row. Lines that do not fit
/// are cut off rather than wrapped.
#[derive(Clone, Debug, Default)]
pub(crate) struct HintBar {
    lines: Vec<Line<'static>>,
}

impl HintBar {
    pub(crate) fn new(lines: Vec<Line<'static>>) -> Self {
        Self { lines }
    }

    pub(crate) fn render(&self, area: Rect, buf: &mut Buffer) {
        for (row, line) in (area.y..area.bottom()).zip(&self.lines) {
            Paragraph::new(line.clone())
                .style(Style::default().fg(Color::Gray))
                .render(Rect::new(area.x, row, area.width, 1), buf);
        }
    }
}
