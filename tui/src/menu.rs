//! Floating context menus.
//!
//! A [`MenuHost`] owns at most one open menu. The items come from a
//! [`MenuItemFactory`] and are rebuilt every time the menu opens, since what
//! is offered depends on the element the menu was opened for.

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::MouseButton;
use crossterm::event::MouseEvent;
use crossterm::event::MouseEventKind;
use ratatui::buffer::Buffer;
use ratatui::layout::Margin;
use ratatui::layout::Position;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::widgets::Clear;
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthStr;

use crate::elements::ElementId;
use crate::text_formatting::truncate_text;

const MAX_LABEL_WIDTH: usize = 48;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuItem<A> {
    pub id: &'static str,
    pub label: String,
    pub action: A,
    /// Offered but not reliable; drawn dimmed.
    pub unstable: bool,
}

impl<A> MenuItem<A> {
    pub fn new(id: &'static str, label: impl Into<String>, action: A) -> Self {
        Self {
            id,
            label: label.into(),
            action,
            unstable: false,
        }
    }

    pub fn unstable(mut self) -> Self {
        self.unstable = true;
        self
    }
}

pub trait MenuItemFactory {
    type Target;
    type Action: Clone;

    fn items(&self, target: &Self::Target) -> Vec<MenuItem<Self::Action>>;
}

/// Screen cell the menu was requested at. The panel's top-left corner goes
/// there unless that would push it off screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuPosition {
    pub column: u16,
    pub row: u16,
}

impl From<Position> for MenuPosition {
    fn from(position: Position) -> Self {
        Self {
            column: position.x,
            row: position.y,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuOutcome<A> {
    /// No menu is open; the event is the caller's.
    Ignored,
    /// The menu swallowed the event.
    Consumed,
    /// The menu closed without a choice.
    Dismissed,
    /// An item was chosen. The menu is already closed.
    Dispatch { action: A, element: ElementId },
}

#[derive(Debug)]
struct OpenMenu<T, A> {
    position: MenuPosition,
    element: ElementId,
    target: T,
    items: Vec<MenuItem<A>>,
    selected: usize,
}

#[derive(Debug)]
pub struct MenuHost<F: MenuItemFactory> {
    factory: F,
    open: Option<OpenMenu<F::Target, F::Action>>,
}

impl<F: MenuItemFactory> MenuHost<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            open: None,
        }
    }

    pub fn open(&mut self, position: MenuPosition, element: ElementId, target: F::Target) {
        let items = self.factory.items(&target);
        if items.is_empty() {
            self.open = None;
            return;
        }
        self.open = Some(OpenMenu {
            position,
            element,
            target,
            items,
            selected: 0,
        });
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn items(&self) -> &[MenuItem<F::Action>] {
        self.open.as_ref().map(|menu| menu.items.as_slice()).unwrap_or(&[])
    }

    pub fn item_ids(&self) -> Vec<&'static str> {
        self.items().iter().map(|item| item.id).collect()
    }

    pub fn target(&self) -> Option<&F::Target> {
        self.open.as_ref().map(|menu| &menu.target)
    }

    pub fn element(&self) -> Option<&ElementId> {
        self.open.as_ref().map(|menu| &menu.element)
    }

    /// Panel area inside `bounds`, or `None` when closed.
    pub fn area(&self, bounds: Rect) -> Option<Rect> {
        let menu = self.open.as_ref()?;
        let label_width = menu
            .items
            .iter()
            .map(|item| item.label.width().min(MAX_LABEL_WIDTH))
            .max()
            .unwrap_or(0);
        let width = (label_width as u16 + 4).min(bounds.width);
        let height = (menu.items.len() as u16 + 2).min(bounds.height);
        let x = menu
            .position
            .column
            .clamp(bounds.x, bounds.right().saturating_sub(width));
        let y = menu
            .position
            .row
            .clamp(bounds.y, bounds.bottom().saturating_sub(height));
        Some(Rect::new(x, y, width, height))
    }

    fn item_at(&self, bounds: Rect, position: Position) -> Option<usize> {
        let area = self.area(bounds)?;
        let inner = area.inner(Margin::new(1, 1));
        if !inner.contains(position) {
            return None;
        }
        let idx = (position.y - inner.y) as usize;
        (idx < self.items().len()).then_some(idx)
    }

    fn take_selected(&mut self, idx: usize) -> MenuOutcome<F::Action> {
        let Some(menu) = self.open.take() else {
            return MenuOutcome::Ignored;
        };
        match menu.items.get(idx) {
            Some(item) => MenuOutcome::Dispatch {
                action: item.action.clone(),
                element: menu.element,
            },
            None => MenuOutcome::Dismissed,
        }
    }

    pub fn handle_mouse(&mut self, event: MouseEvent, bounds: Rect) -> MenuOutcome<F::Action> {
        let Some(area) = self.area(bounds) else {
            return MenuOutcome::Ignored;
        };
        let position = Position::new(event.column, event.row);
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => match self.item_at(bounds, position) {
                Some(idx) => self.take_selected(idx),
                None if area.contains(position) => MenuOutcome::Consumed,
                None => {
                    self.close();
                    MenuOutcome::Dismissed
                }
            },
            MouseEventKind::Down(_) => {
                if area.contains(position) {
                    MenuOutcome::Consumed
                } else {
                    self.close();
                    MenuOutcome::Dismissed
                }
            }
            MouseEventKind::Moved => {
                let hovered = self.item_at(bounds, position);
                if let (Some(idx), Some(menu)) = (hovered, self.open.as_mut()) {
                    menu.selected = idx;
                }
                MenuOutcome::Consumed
            }
            _ => MenuOutcome::Consumed,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> MenuOutcome<F::Action> {
        let Some(menu) = self.open.as_mut() else {
            return MenuOutcome::Ignored;
        };
        match key.code {
            KeyCode::Up => {
                menu.selected = menu.selected.checked_sub(1).unwrap_or(menu.items.len() - 1);
                MenuOutcome::Consumed
            }
            KeyCode::Down => {
                menu.selected = (menu.selected + 1) % menu.items.len();
                MenuOutcome::Consumed
            }
            KeyCode::Enter => {
                let selected = menu.selected;
                self.take_selected(selected)
            }
            KeyCode::Esc => {
                self.close();
                MenuOutcome::Dismissed
            }
            _ => MenuOutcome::Consumed,
        }
    }

    pub fn render(&self, bounds: Rect, buf: &mut Buffer) {
        let (Some(area), Some(menu)) = (self.area(bounds), self.open.as_ref()) else {
            return;
        };
        Clear.render(area, buf);
        Block::bordered()
            .border_style(Style::default().fg(Color::DarkGray))
            .render(area, buf);
        let inner = area.inner(Margin::new(1, 1));
        for (idx, item) in menu.items.iter().enumerate().take(inner.height as usize) {
            let mut style = Style::default();
            if item.unstable {
                style = style.add_modifier(Modifier::DIM);
            }
            if idx == menu.selected {
                style = style.add_modifier(Modifier::REVERSED);
            }
            let label = format!(" {}", truncate_text(&item.label, MAX_LABEL_WIDTH));
            buf.set_stringn(
                inner.x,
                inner.y + idx as u16,
                format!("{label:<width$}", width = inner.width as usize),
                inner.width as usize,
                style,
            );
        }
    }
}
