use std::collections::HashMap;

use srcview_protocol::Link;

use crate::elements::ElementId;
use crate::menus::RefTarget;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Trigger {
    Click,
    ContextMenu,
    HoverEnter,
    HoverLeave,
}

/// What an element does when triggered. Decided once, when the view mounts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Interaction {
    Navigate(Link),
    OpenExternal(String),
    RefMenu(RefTarget),
    LineMenu(usize),
    HighlightGroup(String),
    ClearGroup(String),
    ToggleDocs,
}

#[derive(Debug, Default)]
pub struct BindingTable {
    bindings: HashMap<(ElementId, Trigger), Interaction>,
}

impl BindingTable {
    pub fn bind(&mut self, element: ElementId, trigger: Trigger, interaction: Interaction) {
        self.bindings.insert((element, trigger), interaction);
    }

    pub fn get(&self, element: &ElementId, trigger: Trigger) -> Option<&Interaction> {
        self.bindings.get(&(element.clone(), trigger))
    }

    pub fn is_bound(&self, element: &ElementId, trigger: Trigger) -> bool {
        self.get(element, trigger).is_some()
    }
}
