//! Screen elements and their interactive state.
//!
//! Every clickable or stateful thing a view draws is named by an
//! [`ElementId`]. Views record where each element landed in a [`HitMap`] while
//! painting, so mouse events can be resolved back to elements.

use std::collections::HashMap;

use ratatui::layout::Position;
use ratatui::layout::Rect;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElementId {
    /// Line number gutter cell, 1-based.
    LineNumber(usize),
    /// Line content, 1-based.
    Line(usize),
    /// A reference span: `block` is the source line (or the markup block in
    /// a summary), `segment` the index inside its markup.
    Span { block: usize, segment: usize },
    Crumb(usize),
    Parent,
    DocToggle,
    Child(usize),
    Hit(usize),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Flags {
    selected: bool,
    highlighted: bool,
}

/// Per-element state flags. Elements without an entry have every flag
/// cleared.
#[derive(Debug, Default)]
pub struct ElementStates {
    flags: HashMap<ElementId, Flags>,
}

impl ElementStates {
    pub fn set_selected(&mut self, element: ElementId, selected: bool) {
        self.flags.entry(element).or_default().selected = selected;
    }

    pub fn set_highlighted(&mut self, element: ElementId, highlighted: bool) {
        self.flags.entry(element).or_default().highlighted = highlighted;
    }

    pub fn is_selected(&self, element: &ElementId) -> bool {
        self.flags.get(element).is_some_and(|flags| flags.selected)
    }

    pub fn is_highlighted(&self, element: &ElementId) -> bool {
        self.flags.get(element).is_some_and(|flags| flags.highlighted)
    }

    pub fn selected(&self) -> impl Iterator<Item = &ElementId> {
        self.flags
            .iter()
            .filter(|(_, flags)| flags.selected)
            .map(|(element, _)| element)
    }

    pub fn highlighted(&self) -> impl Iterator<Item = &ElementId> {
        self.flags
            .iter()
            .filter(|(_, flags)| flags.highlighted)
            .map(|(element, _)| element)
    }
}

/// Screen regions painted during the last render. Later regions sit on top
/// of earlier ones.
#[derive(Debug, Default)]
pub struct HitMap {
    regions: Vec<(Rect, ElementId)>,
}

impl HitMap {
    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn push(&mut self, rect: Rect, element: ElementId) {
        if rect.width > 0 && rect.height > 0 {
            self.regions.push((rect, element));
        }
    }

    pub fn element_at(&self, position: Position) -> Option<&ElementId> {
        self.regions
            .iter()
            .rev()
            .find(|(rect, _)| rect.contains(position))
            .map(|(_, element)| element)
    }

    /// First painted region of `element`.
    pub fn locate(&self, element: &ElementId) -> Option<Rect> {
        self.regions
            .iter()
            .find(|(_, candidate)| candidate == element)
            .map(|(rect, _)| *rect)
    }
}

/// Elements that refer to the same symbol, keyed by context id. Built once
/// when a view mounts.
#[derive(Debug, Default)]
pub struct HoverGroups {
    groups: HashMap<String, Vec<ElementId>>,
}

impl HoverGroups {
    pub fn insert(&mut self, context_id: &str, element: ElementId) {
        self.groups
            .entry(context_id.to_string())
            .or_default()
            .push(element);
    }

    pub fn members(&self, context_id: &str) -> &[ElementId] {
        self.groups.get(context_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn later_regions_win() {
        let mut hits = HitMap::default();
        hits.push(Rect::new(0, 0, 10, 1), ElementId::Line(1));
        hits.push(Rect::new(2, 0, 3, 1), ElementId::Span { block: 1, segment: 0 });

        assert_eq!(
            hits.element_at(Position::new(3, 0)),
            Some(&ElementId::Span { block: 1, segment: 0 })
        );
        assert_eq!(hits.element_at(Position::new(8, 0)), Some(&ElementId::Line(1)));
        assert_eq!(hits.element_at(Position::new(8, 1)), None);
    }

    #[test]
    fn empty_regions_are_not_recorded() {
        let mut hits = HitMap::default();
        hits.push(Rect::new(0, 0, 0, 1), ElementId::Parent);
        assert_eq!(hits.locate(&ElementId::Parent), None);
    }

    #[test]
    fn flags_are_independent() {
        let mut states = ElementStates::default();
        states.set_selected(ElementId::Line(2), true);
        states.set_highlighted(ElementId::Line(2), true);
        states.set_highlighted(ElementId::Line(2), false);

        assert!(states.is_selected(&ElementId::Line(2)));
        assert!(!states.is_highlighted(&ElementId::Line(2)));
        assert!(!states.is_selected(&ElementId::Line(3)));
    }
}
