//! Multiple-selection state for category chips.
//!
//! Holds the ordered list of chosen category values and which chip, if any,
//! has keyboard focus. Every action that changes the chosen values yields a
//! [`SelectionChange`] carrying the full selection.

use tracing::debug;

use crate::types::CategoryValue;

/// Actions understood by [`SelectionState::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionAction {
    /// Append a value unless one with the same `value` is already chosen.
    Add(CategoryValue),
    /// Remove the chosen value with this `value` string.
    Remove(String),
    /// Remove the chip that has focus.
    RemoveActive,
    /// Give focus to the last chip.
    FocusLast,
    /// Move chip focus one to the left.
    FocusPrevious,
    /// Move chip focus one to the right, leaving the chips after the last one.
    FocusNext,
    /// Drop chip focus.
    Blur,
    /// Remove every chosen value.
    Reset,
}

/// What kind of change produced a [`SelectionChange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChangeType {
    /// A value was appended.
    ItemAdded,
    /// A value was removed.
    ItemRemoved,
    /// The selection was cleared.
    Reset,
}

/// Emitted whenever the chosen values change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChange {
    /// What caused the change.
    pub change_type: SelectionChangeType,
    /// The full selection after the change, in insertion order.
    pub selected_items: Vec<CategoryValue>,
}

/// Ordered, unique selection with independent chip focus.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    selected_items: Vec<CategoryValue>,
    active_index: Option<usize>,
}

impl SelectionState {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// The chosen values in insertion order.
    pub fn selected_items(&self) -> &[CategoryValue] {
        &self.selected_items
    }

    /// Index of the focused chip.
    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    /// Check whether a value with this `value` string is chosen.
    pub fn contains(&self, value: &str) -> bool {
        self.selected_items.iter().any(|item| item.value == value)
    }

    /// Number of chosen values.
    pub fn len(&self) -> usize {
        self.selected_items.len()
    }

    /// Check if nothing is chosen.
    pub fn is_empty(&self) -> bool {
        self.selected_items.is_empty()
    }

    /// Apply an action.
    ///
    /// Returns a change only when the chosen values were modified; focus
    /// movement never produces one.
    pub fn dispatch(&mut self, action: SelectionAction) -> Option<SelectionChange> {
        match action {
            SelectionAction::Add(item) => {
                if self.contains(&item.value) {
                    debug!(value = %item.value, "Ignoring duplicate selection");
                    return None;
                }
                debug!(value = %item.value, "Selecting category value");
                self.selected_items.push(item);
                Some(self.change(SelectionChangeType::ItemAdded))
            }
            SelectionAction::Remove(value) => {
                let index = self
                    .selected_items
                    .iter()
                    .position(|item| item.value == value)?;
                Some(self.remove_at(index))
            }
            SelectionAction::RemoveActive => {
                let index = self.active_index?;
                if index >= self.selected_items.len() {
                    self.active_index = None;
                    return None;
                }
                Some(self.remove_at(index))
            }
            SelectionAction::FocusLast => {
                if !self.selected_items.is_empty() {
                    self.active_index = Some(self.selected_items.len() - 1);
                }
                None
            }
            SelectionAction::FocusPrevious => {
                if let Some(index) = self.active_index {
                    self.active_index = Some(index.saturating_sub(1));
                }
                None
            }
            SelectionAction::FocusNext => {
                if let Some(index) = self.active_index {
                    self.active_index = if index + 1 < self.selected_items.len() {
                        Some(index + 1)
                    } else {
                        None
                    };
                }
                None
            }
            SelectionAction::Blur => {
                self.active_index = None;
                None
            }
            SelectionAction::Reset => {
                self.active_index = None;
                if self.selected_items.is_empty() {
                    return None;
                }
                self.selected_items.clear();
                Some(self.change(SelectionChangeType::Reset))
            }
        }
    }

    fn remove_at(&mut self, index: usize) -> SelectionChange {
        let removed = self.selected_items.remove(index);
        debug!(value = %removed.value, "Removing category value");

        // Focus stays on the same slot, or moves left when the last chip went.
        self.active_index = match self.active_index {
            _ if self.selected_items.is_empty() => None,
            Some(active) if active > index => Some(active - 1),
            Some(active) => Some(active.min(self.selected_items.len() - 1)),
            None => None,
        };

        self.change(SelectionChangeType::ItemRemoved)
    }

    fn change(&self, change_type: SelectionChangeType) -> SelectionChange {
        SelectionChange {
            change_type,
            selected_items: self.selected_items.clone(),
        }
    }
}
