//! Single-element selection state machine.
//!
//! Each input tick is bracketed by [`Selection::start_event_processing`] and
//! [`Selection::end_event_processing`]. Elements claim selection in between;
//! a primary press nobody claims returns the selection to idle.

use crate::editor::input::{InputEvent, PointerButton};
use crate::node_types::{ElementId, SelectionKind};

#[derive(Clone, Debug, Default)]
pub struct Selection {
    current: Option<ElementId>,
    claimed: Option<ElementId>,
    clear_pending: bool,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_event_processing(&mut self, event: &InputEvent) {
        self.claimed = None;
        self.clear_pending = matches!(
            event,
            InputEvent::PointerPressed {
                button: PointerButton::Primary,
                ..
            }
        );
    }

    /// Claims selection for the current tick. A later claim within the same
    /// tick replaces an earlier one.
    pub fn claim(&mut self, element: ElementId) {
        self.claimed = Some(element);
    }

    /// Commits this tick's claim, or goes idle if an unclaimed primary press
    /// was seen.
    /// Returns whether the selection changed.
    pub fn end_event_processing(&mut self, _event: &InputEvent) -> bool {
        let clear = std::mem::take(&mut self.clear_pending);
        let next = match self.claimed.take() {
            Some(element) => Some(element),
            None if clear => None,
            None => return false,
        };
        let changed = next != self.current;
        self.current = next;
        changed
    }

    /// Selects `element` outside of event processing.
    pub fn select(&mut self, element: ElementId) -> bool {
        let changed = self.current != Some(element);
        self.current = Some(element);
        changed
    }

    /// Goes idle if `element` is selected or is an ancestor of the selection.
    pub fn deselect(&mut self, element: ElementId) -> bool {
        if self
            .claimed
            .is_some_and(|claimed| claimed.ancestors().any(|e| e == element))
        {
            self.claimed = None;
        }
        match self.current {
            Some(current) if current.ancestors().any(|e| e == element) => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    /// Drops the selection if `keep` rejects it.
    pub fn retain(&mut self, keep: impl FnOnce(ElementId) -> bool) -> bool {
        match self.current {
            Some(current) if !keep(current) => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn selected(&self) -> Option<ElementId> {
        self.current
    }

    pub fn selected_kind(&self) -> SelectionKind {
        self.current.map(|element| element.kind()).into()
    }

    pub fn is_selected(&self, element: ElementId) -> bool {
        self.current == Some(element)
    }
}
