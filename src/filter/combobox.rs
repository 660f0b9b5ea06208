//! Searchable dropdown state.
//!
//! Tracks whether the menu is open, which candidate is highlighted, and the
//! raw text typed into the input. The reducer knows nothing about the
//! candidates themselves, only how many there are; commits report the
//! candidate index and leave it to the owner to look the item up.

use tracing::trace;

/// Actions understood by [`ComboboxState::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComboboxAction {
    /// The user edited the input text.
    InputChange(String),
    /// Arrow down in the input.
    InputKeyDownArrowDown,
    /// Arrow up in the input.
    InputKeyDownArrowUp,
    /// Enter in the input.
    InputKeyDownEnter,
    /// Escape in the input.
    InputKeyDownEscape,
    /// Focus left the input.
    InputBlur,
    /// A menu item was clicked.
    ItemClick(usize),
    /// The pointer moved over a menu item.
    ItemMouseMove(usize),
    /// Open or close the menu.
    ToggleMenu,
    /// Open the menu.
    OpenMenu,
    /// Close the menu.
    CloseMenu,
    /// Replace the input text without opening the menu.
    SetInputValue(String),
}

/// The kind of state change a dispatch produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChangeType {
    /// The user edited the input text.
    InputChange,
    /// Down arrow in the input.
    InputKeyDownArrowDown,
    /// Up arrow in the input.
    InputKeyDownArrowUp,
    /// Enter in the input; commits the highlighted row.
    InputKeyDownEnter,
    /// Escape in the input.
    InputKeyDownEscape,
    /// Focus left the input; commits the highlighted row if the menu was open.
    InputBlur,
    /// A dropdown row was clicked; commits that row.
    ItemClick,
    /// The pointer moved over a dropdown row.
    ItemMouseMove,
    /// The toggle control flipped the menu.
    ToggleMenu,
    /// The menu was opened without moving the highlight.
    OpenMenu,
    /// The menu was closed without committing.
    CloseMenu,
    /// The input text was replaced programmatically.
    SetInputValue,
}

impl StateChangeType {
    /// Check whether this change can commit a highlighted item.
    pub fn is_commit(&self) -> bool {
        matches!(
            self,
            StateChangeType::InputKeyDownEnter
                | StateChangeType::ItemClick
                | StateChangeType::InputBlur
        )
    }
}

/// Result of a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboboxChange {
    /// Which action produced this change.
    pub change_type: StateChangeType,
    /// Index of the committed candidate, for commit changes only.
    pub selected_index: Option<usize>,
}

/// Open/closed state, highlight and input text of a searchable dropdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComboboxState {
    is_open: bool,
    highlighted_index: Option<usize>,
    input_value: String,
}

impl ComboboxState {
    /// Create a closed dropdown with empty input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the menu is open.
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// The highlighted candidate, if any.
    pub fn highlighted_index(&self) -> Option<usize> {
        self.highlighted_index
    }

    /// The raw input text.
    pub fn input_value(&self) -> &str {
        &self.input_value
    }

    /// Apply an action given the current number of candidates.
    pub fn dispatch(&mut self, action: ComboboxAction, item_count: usize) -> ComboboxChange {
        trace!(?action, item_count, "Combobox dispatch");

        let mut selected_index = None;
        let change_type = match action {
            ComboboxAction::InputChange(text) => {
                self.input_value = text;
                self.is_open = true;
                self.highlighted_index = None;
                StateChangeType::InputChange
            }
            ComboboxAction::InputKeyDownArrowDown => {
                self.highlighted_index = if !self.is_open {
                    self.is_open = true;
                    first_index(item_count)
                } else {
                    next_index(self.highlighted_index, item_count)
                };
                StateChangeType::InputKeyDownArrowDown
            }
            ComboboxAction::InputKeyDownArrowUp => {
                self.highlighted_index = if !self.is_open {
                    self.is_open = true;
                    last_index(item_count)
                } else {
                    previous_index(self.highlighted_index, item_count)
                };
                StateChangeType::InputKeyDownArrowUp
            }
            ComboboxAction::InputKeyDownEnter => {
                if self.is_open {
                    if let Some(index) = self.highlighted_index.filter(|&i| i < item_count) {
                        selected_index = Some(index);
                        self.close();
                    }
                }
                StateChangeType::InputKeyDownEnter
            }
            ComboboxAction::InputKeyDownEscape => {
                if self.is_open {
                    self.close();
                } else {
                    self.input_value.clear();
                }
                StateChangeType::InputKeyDownEscape
            }
            ComboboxAction::InputBlur => {
                if self.is_open {
                    selected_index = self.highlighted_index.filter(|&i| i < item_count);
                }
                self.close();
                StateChangeType::InputBlur
            }
            ComboboxAction::ItemClick(index) => {
                if index < item_count {
                    selected_index = Some(index);
                    self.close();
                }
                StateChangeType::ItemClick
            }
            ComboboxAction::ItemMouseMove(index) => {
                if self.is_open && index < item_count {
                    self.highlighted_index = Some(index);
                }
                StateChangeType::ItemMouseMove
            }
            ComboboxAction::ToggleMenu => {
                if self.is_open {
                    self.close();
                } else {
                    self.is_open = true;
                }
                StateChangeType::ToggleMenu
            }
            ComboboxAction::OpenMenu => {
                self.is_open = true;
                StateChangeType::OpenMenu
            }
            ComboboxAction::CloseMenu => {
                self.close();
                StateChangeType::CloseMenu
            }
            ComboboxAction::SetInputValue(text) => {
                self.input_value = text;
                StateChangeType::SetInputValue
            }
        };

        ComboboxChange {
            change_type,
            selected_index,
        }
    }

    fn close(&mut self) {
        self.is_open = false;
        self.highlighted_index = None;
    }
}

fn first_index(item_count: usize) -> Option<usize> {
    (item_count > 0).then_some(0)
}

fn last_index(item_count: usize) -> Option<usize> {
    item_count.checked_sub(1)
}

fn next_index(current: Option<usize>, item_count: usize) -> Option<usize> {
    match current {
        _ if item_count == 0 => None,
        Some(index) if index + 1 < item_count => Some(index + 1),
        _ => Some(0),
    }
}

fn previous_index(current: Option<usize>, item_count: usize) -> Option<usize> {
    match current {
        _ if item_count == 0 => None,
        Some(index) if index > 0 && index < item_count => Some(index - 1),
        _ => Some(item_count - 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_closed_and_empty() {
        let state = ComboboxState::new();
        assert!(!state.is_open());
        assert_eq!(state.highlighted_index(), None);
        assert_eq!(state.input_value(), "");
    }

    #[test]
    fn test_input_change_opens_and_clears_highlight() {
        let mut state = ComboboxState::new();
        state.dispatch(ComboboxAction::InputKeyDownArrowDown, 3);
        assert_eq!(state.highlighted_index(), Some(0));

        let change = state.dispatch(ComboboxAction::InputChange("ap".into()), 3);
        assert_eq!(change.change_type, StateChangeType::InputChange);
        assert_eq!(change.selected_index, None);
        assert!(state.is_open());
        assert_eq!(state.input_value(), "ap");
        assert_eq!(state.highlighted_index(), None);
    }

    #[test]
    fn test_arrow_down_opens_on_first_item() {
        let mut state = ComboboxState::new();
        state.dispatch(ComboboxAction::InputKeyDownArrowDown, 3);
        assert!(state.is_open());
        assert_eq!(state.highlighted_index(), Some(0));
    }

    #[test]
    fn test_arrow_up_opens_on_last_item() {
        let mut state = ComboboxState::new();
        state.dispatch(ComboboxAction::InputKeyDownArrowUp, 3);
        assert!(state.is_open());
        assert_eq!(state.highlighted_index(), Some(2));
    }

    #[test]
    fn test_arrow_navigation_wraps() {
        let mut state = ComboboxState::new();
        state.dispatch(ComboboxAction::OpenMenu, 2);

        state.dispatch(ComboboxAction::InputKeyDownArrowDown, 2);
        assert_eq!(state.highlighted_index(), Some(0));
        state.dispatch(ComboboxAction::InputKeyDownArrowDown, 2);
        assert_eq!(state.highlighted_index(), Some(1));
        state.dispatch(ComboboxAction::InputKeyDownArrowDown, 2);
        assert_eq!(state.highlighted_index(), Some(0));

        state.dispatch(ComboboxAction::InputKeyDownArrowUp, 2);
        assert_eq!(state.highlighted_index(), Some(1));
    }

    #[test]
    fn test_arrows_with_no_items() {
        let mut state = ComboboxState::new();
        state.dispatch(ComboboxAction::InputKeyDownArrowDown, 0);
        assert!(state.is_open());
        assert_eq!(state.highlighted_index(), None);
        state.dispatch(ComboboxAction::InputKeyDownArrowUp, 0);
        assert_eq!(state.highlighted_index(), None);
    }

    #[test]
    fn test_enter_commits_highlighted() {
        let mut state = ComboboxState::new();
        state.dispatch(ComboboxAction::InputChange("a".into()), 2);
        state.dispatch(ComboboxAction::InputKeyDownArrowDown, 2);
        state.dispatch(ComboboxAction::InputKeyDownArrowDown, 2);

        let change = state.dispatch(ComboboxAction::InputKeyDownEnter, 2);
        assert_eq!(change.change_type, StateChangeType::InputKeyDownEnter);
        assert_eq!(change.selected_index, Some(1));
        assert!(!state.is_open());
        assert_eq!(state.highlighted_index(), None);
        // The owner decides what happens to the text
        assert_eq!(state.input_value(), "a");
    }

    #[test]
    fn test_enter_without_highlight_does_nothing() {
        let mut state = ComboboxState::new();
        state.dispatch(ComboboxAction::InputChange("a".into()), 2);

        let change = state.dispatch(ComboboxAction::InputKeyDownEnter, 2);
        assert_eq!(change.selected_index, None);
        assert!(state.is_open());
    }

    #[test]
    fn test_enter_when_closed_does_nothing() {
        let mut state = ComboboxState::new();
        let change = state.dispatch(ComboboxAction::InputKeyDownEnter, 2);
        assert_eq!(change.selected_index, None);
        assert!(!state.is_open());
    }

    #[test]
    fn test_blur_commits_highlighted_and_closes() {
        let mut state = ComboboxState::new();
        state.dispatch(ComboboxAction::InputKeyDownArrowDown, 2);

        let change = state.dispatch(ComboboxAction::InputBlur, 2);
        assert_eq!(change.selected_index, Some(0));
        assert!(!state.is_open());
    }

    #[test]
    fn test_blur_without_highlight_only_closes() {
        let mut state = ComboboxState::new();
        state.dispatch(ComboboxAction::OpenMenu, 2);

        let change = state.dispatch(ComboboxAction::InputBlur, 2);
        assert_eq!(change.selected_index, None);
        assert!(!state.is_open());
    }

    #[test]
    fn test_item_click() {
        let mut state = ComboboxState::new();
        state.dispatch(ComboboxAction::OpenMenu, 3);

        let change = state.dispatch(ComboboxAction::ItemClick(2), 3);
        assert_eq!(change.selected_index, Some(2));
        assert!(!state.is_open());

        let change = state.dispatch(ComboboxAction::ItemClick(5), 3);
        assert_eq!(change.selected_index, None);
    }

    #[test]
    fn test_item_mouse_move_highlights() {
        let mut state = ComboboxState::new();
        state.dispatch(ComboboxAction::ItemMouseMove(1), 3);
        assert_eq!(state.highlighted_index(), None);

        state.dispatch(ComboboxAction::OpenMenu, 3);
        state.dispatch(ComboboxAction::ItemMouseMove(1), 3);
        assert_eq!(state.highlighted_index(), Some(1));
    }

    #[test]
    fn test_escape_closes_then_clears() {
        let mut state = ComboboxState::new();
        state.dispatch(ComboboxAction::InputChange("ban".into()), 1);
        assert!(state.is_open());

        state.dispatch(ComboboxAction::InputKeyDownEscape, 1);
        assert!(!state.is_open());
        assert_eq!(state.input_value(), "ban");

        state.dispatch(ComboboxAction::InputKeyDownEscape, 1);
        assert_eq!(state.input_value(), "");
    }

    #[test]
    fn test_toggle_menu() {
        let mut state = ComboboxState::new();
        state.dispatch(ComboboxAction::ToggleMenu, 1);
        assert!(state.is_open());
        state.dispatch(ComboboxAction::ToggleMenu, 1);
        assert!(!state.is_open());
    }

    #[test]
    fn test_set_input_value_keeps_menu_state() {
        let mut state = ComboboxState::new();
        let change = state.dispatch(ComboboxAction::SetInputValue("x".into()), 0);
        assert_eq!(change.change_type, StateChangeType::SetInputValue);
        assert_eq!(state.input_value(), "x");
        assert!(!state.is_open());
    }

    #[test]
    fn test_is_commit() {
        assert!(StateChangeType::InputKeyDownEnter.is_commit());
        assert!(StateChangeType::ItemClick.is_commit());
        assert!(StateChangeType::InputBlur.is_commit());
        assert!(!StateChangeType::InputChange.is_commit());
        assert!(!StateChangeType::InputKeyDownEscape.is_commit());
    }
}
