//! Mouse wiring shared by every view that shows references: hover groups,
//! click bindings and the context menus.

use crossterm::event::KeyEvent;
use crossterm::event::MouseButton;
use crossterm::event::MouseEvent;
use crossterm::event::MouseEventKind;
use ratatui::buffer::Buffer;
use ratatui::layout::Position;
use ratatui::layout::Rect;
use srcview_protocol::Link;
use srcview_protocol::ReferenceSpan;
use tracing::debug;

use crate::app_event::AppEvent;
use crate::app_event_sender::AppEventSender;
use crate::bindings::BindingTable;
use crate::bindings::Interaction;
use crate::bindings::Trigger;
use crate::elements::ElementId;
use crate::elements::ElementStates;
use crate::elements::HitMap;
use crate::elements::HoverGroups;
use crate::menu::MenuHost;
use crate::menu::MenuOutcome;
use crate::menu::MenuPosition;
use crate::menus::LineNumberMenu;
use crate::menus::MenuAction;
use crate::menus::RefMenu;
use crate::menus::RefTarget;

/// What a left click on a reference does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ClickPolicy {
    /// Open the documentation URL when there is one, else follow the link.
    DocsFirst,
    /// Always follow the link.
    LinkOnly,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum MouseResult {
    /// Not for us; the view may use it (e.g. to scroll).
    Ignored,
    Handled,
    /// A view-specific interaction fired.
    Custom(Interaction),
}

#[derive(Debug)]
pub(crate) struct Interactive {
    pub states: ElementStates,
    pub hits: HitMap,
    pub bindings: BindingTable,
    pub groups: HoverGroups,
    pub ref_menu: MenuHost<RefMenu>,
    pub line_menu: Option<MenuHost<LineNumberMenu>>,
    hovered: Option<ElementId>,
    /// Area of the last render, used to place menus.
    pub bounds: Rect,
}

impl Default for Interactive {
    fn default() -> Self {
        Self {
            states: ElementStates::default(),
            hits: HitMap::default(),
            bindings: BindingTable::default(),
            groups: HoverGroups::default(),
            ref_menu: MenuHost::new(RefMenu),
            line_menu: None,
            hovered: None,
            bounds: Rect::default(),
        }
    }
}

impl Interactive {
    pub fn with_line_menu(menu: LineNumberMenu) -> Self {
        Self {
            line_menu: Some(MenuHost::new(menu)),
            ..Self::default()
        }
    }

    /// Wire a reference span: click, context menu, and hover group.
    pub fn bind_reference(&mut self, element: ElementId, span: &ReferenceSpan, policy: ClickPolicy) {
        let docs = match policy {
            ClickPolicy::DocsFirst => span.doc_url.clone().filter(|url| !url.is_empty()),
            ClickPolicy::LinkOnly => None,
        };
        let link = span.link.as_deref().and_then(|raw| match raw.parse::<Link>() {
            Ok(link) => Some(link),
            Err(err) => {
                debug!(link = raw, %err, "ignoring unparseable link");
                None
            }
        });
        if let Some(url) = docs {
            self.bindings
                .bind(element.clone(), Trigger::Click, Interaction::OpenExternal(url));
        } else if let Some(link) = link {
            self.bindings
                .bind(element.clone(), Trigger::Click, Interaction::Navigate(link));
        }

        if let Some(target) = RefTarget::from_span(span) {
            self.groups.insert(&target.id, element.clone());
            self.bindings.bind(
                element.clone(),
                Trigger::HoverEnter,
                Interaction::HighlightGroup(target.id.clone()),
            );
            self.bindings.bind(
                element.clone(),
                Trigger::HoverLeave,
                Interaction::ClearGroup(target.id.clone()),
            );
            self.bindings
                .bind(element, Trigger::ContextMenu, Interaction::RefMenu(target));
        }
    }

    pub fn any_menu_open(&self) -> bool {
        self.ref_menu.is_open() || self.line_menu.as_ref().is_some_and(MenuHost::is_open)
    }

    pub fn close_menus(&mut self) {
        self.ref_menu.close();
        if let Some(menu) = self.line_menu.as_mut() {
            menu.close();
        }
    }

    fn dispatch(outcome: MenuOutcome<MenuAction>, tx: &AppEventSender) -> Option<MouseResult> {
        match outcome {
            MenuOutcome::Ignored => None,
            MenuOutcome::Consumed | MenuOutcome::Dismissed => Some(MouseResult::Handled),
            MenuOutcome::Dispatch { action, .. } => {
                tx.send(action.into_event());
                Some(MouseResult::Handled)
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, tx: &AppEventSender) -> bool {
        if Self::dispatch(self.ref_menu.handle_key(key), tx).is_some() {
            return true;
        }
        match self.line_menu.as_mut() {
            Some(menu) => Self::dispatch(menu.handle_key(key), tx).is_some(),
            None => false,
        }
    }

    pub fn handle_mouse(&mut self, event: MouseEvent, tx: &AppEventSender) -> MouseResult {
        let bounds = self.bounds;
        if let Some(result) = Self::dispatch(self.ref_menu.handle_mouse(event, bounds), tx) {
            return result;
        }
        if let Some(menu) = self.line_menu.as_mut() {
            if let Some(result) = Self::dispatch(menu.handle_mouse(event, bounds), tx) {
                return result;
            }
        }

        let position = Position::new(event.column, event.row);
        let element = self.hits.element_at(position).cloned();
        match event.kind {
            MouseEventKind::Moved => {
                self.hover(element);
                MouseResult::Handled
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(element) = element else {
                    return MouseResult::Ignored;
                };
                match self.bindings.get(&element, Trigger::Click).cloned() {
                    Some(interaction) => self.fire(interaction, element, position, tx),
                    None => MouseResult::Ignored,
                }
            }
            MouseEventKind::Down(MouseButton::Right) => {
                let Some(element) = element else {
                    return MouseResult::Ignored;
                };
                match self.bindings.get(&element, Trigger::ContextMenu).cloned() {
                    Some(interaction) => self.fire(interaction, element, position, tx),
                    None => MouseResult::Ignored,
                }
            }
            _ => MouseResult::Ignored,
        }
    }

    fn hover(&mut self, element: Option<ElementId>) {
        if self.hovered == element {
            return;
        }
        let leave = self
            .hovered
            .take()
            .and_then(|previous| self.bindings.get(&previous, Trigger::HoverLeave).cloned());
        if let Some(Interaction::ClearGroup(id)) = leave {
            self.set_group_highlight(&id, false);
        }
        let enter = element
            .as_ref()
            .and_then(|next| self.bindings.get(next, Trigger::HoverEnter).cloned());
        if let Some(Interaction::HighlightGroup(id)) = enter {
            self.set_group_highlight(&id, true);
        }
        self.hovered = element;
    }

    fn set_group_highlight(&mut self, context_id: &str, highlighted: bool) {
        for member in self.groups.members(context_id) {
            self.states.set_highlighted(member.clone(), highlighted);
        }
    }

    fn fire(
        &mut self,
        interaction: Interaction,
        element: ElementId,
        position: Position,
        tx: &AppEventSender,
    ) -> MouseResult {
        match interaction {
            Interaction::Navigate(link) => tx.send(AppEvent::Navigate(link)),
            Interaction::OpenExternal(url) => tx.send(AppEvent::OpenExternal(url)),
            Interaction::RefMenu(target) => {
                self.close_menus();
                self.ref_menu.open(MenuPosition::from(position), element, target);
            }
            Interaction::LineMenu(line) => {
                self.close_menus();
                if let Some(menu) = self.line_menu.as_mut() {
                    menu.open(MenuPosition::from(position), element, line);
                }
            }
            Interaction::HighlightGroup(id) => self.set_group_highlight(&id, true),
            Interaction::ClearGroup(id) => self.set_group_highlight(&id, false),
            other @ Interaction::ToggleDocs => return MouseResult::Custom(other),
        }
        MouseResult::Handled
    }

    pub fn render_menus(&self, buf: &mut Buffer) {
        self.ref_menu.render(self.bounds, buf);
        if let Some(menu) = &self.line_menu {
            menu.render(self.bounds, buf);
        }
    }
}
