//! Multi-select category filter combobox.
//!
//! Shows the chosen category values as chips above a text input. Typing
//! narrows a dropdown of candidates by case-insensitive prefix; committing a
//! candidate (Enter, click, or Tab away from the input) turns it into a chip.
//! Chips have their own keyboard focus, reached with Left at the start of the
//! input, and can be removed with Backspace/Delete or by clicking their `×`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};
use tracing::debug;

use super::input::TextInput;
use crate::filter::{
    self, ComboboxAction, ComboboxState, SelectionAction, SelectionChange, SelectionState,
};
use crate::types::CategoryValue;
use crate::ui::theme::{format_count, Theme};

/// Rows the widget needs, borders included. The dropdown draws below it.
pub const CATEGORY_FILTER_HEIGHT: u16 = 4;

/// Default number of dropdown rows before the list scrolls.
const DEFAULT_MAX_DROPDOWN_ITEMS: usize = 8;

/// Action resulting from category filter input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilterAction {
    /// The selection changed; carries the full selection in chip order.
    SelectionChanged(Vec<CategoryValue>),
    /// Escape with nothing left to close or clear.
    Dismiss,
}

impl From<SelectionChange> for CategoryFilterAction {
    fn from(change: SelectionChange) -> Self {
        debug!(
            change = ?change.change_type,
            selected = change.selected_items.len(),
            "Selection changed"
        );
        CategoryFilterAction::SelectionChanged(change.selected_items)
    }
}

/// Clickable `×` of a rendered chip.
#[derive(Debug, Clone)]
struct ChipHitArea {
    area: Rect,
    value: String,
}

/// Category filter widget.
#[derive(Debug)]
pub struct CategoryFilter {
    /// Column name shown in the border title.
    title: String,
    /// Chosen values and chip focus.
    selection: SelectionState,
    /// Dropdown open state, highlight and input text.
    combobox: ComboboxState,
    /// Editing buffer mirroring the dropdown's input text.
    text_input: TextInput,
    /// Values offered by the parent.
    possible_values: Vec<CategoryValue>,
    /// Number of records currently passing all filters.
    record_count: u64,
    /// Styling hint from the parent; accents the input text when set.
    value: Option<CategoryValue>,
    /// Dropdown height limit.
    max_dropdown_items: usize,
    theme: Theme,
    /// Scroll state of the dropdown list.
    menu_state: ListState,
    /// Where the dropdown rows were last drawn.
    menu_area: Option<Rect>,
    /// Where the input line was last drawn.
    input_area: Option<Rect>,
    /// Where chip close buttons were last drawn.
    chip_hits: Vec<ChipHitArea>,
}

impl CategoryFilter {
    /// Create a new category filter for the named column.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            selection: SelectionState::new(),
            combobox: ComboboxState::new(),
            text_input: TextInput::new(),
            possible_values: Vec::new(),
            record_count: 0,
            value: None,
            max_dropdown_items: DEFAULT_MAX_DROPDOWN_ITEMS,
            theme: Theme::default(),
            menu_state: ListState::default(),
            menu_area: None,
            input_area: None,
            chip_hits: Vec::new(),
        }
    }

    /// Set the dropdown height limit.
    pub fn with_max_dropdown_items(mut self, max: usize) -> Self {
        self.max_dropdown_items = max.max(1);
        self
    }

    /// Set the theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Get the column title.
    #[cfg(test)]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Set the column title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Replace the values offered in the dropdown.
    pub fn set_possible_values(&mut self, values: Vec<CategoryValue>) {
        self.possible_values = values;
    }

    /// Get the values offered in the dropdown.
    #[cfg(test)]
    pub fn possible_values(&self) -> &[CategoryValue] {
        &self.possible_values
    }

    /// Set the number of records shown in the placeholder.
    pub fn set_record_count(&mut self, count: usize) {
        self.record_count = count as u64;
    }

    /// Set the styling hint value.
    pub fn set_value(&mut self, value: Option<CategoryValue>) {
        self.value = value;
    }

    /// Forget all state, as if the widget was just created.
    ///
    /// Possible values, record count and title are kept. Returns the
    /// emptied selection if anything was selected.
    pub fn reset(&mut self) -> Option<CategoryFilterAction> {
        let change = self.selection.dispatch(SelectionAction::Reset);
        self.combobox = ComboboxState::new();
        self.text_input.clear();
        self.menu_state = ListState::default();
        debug!(column = %self.title, "Category filter reset");
        change.map(Into::into)
    }

    /// The chosen values in chip order.
    pub fn selected_items(&self) -> &[CategoryValue] {
        self.selection.selected_items()
    }

    /// Index of the focused chip.
    pub fn active_chip(&self) -> Option<usize> {
        self.selection.active_index()
    }

    /// Whether the dropdown is open.
    pub fn is_open(&self) -> bool {
        self.combobox.is_open()
    }

    /// The highlighted dropdown row.
    #[cfg(test)]
    pub fn highlighted_index(&self) -> Option<usize> {
        self.combobox.highlighted_index()
    }

    /// The text typed into the input.
    #[cfg(test)]
    pub fn input_value(&self) -> &str {
        self.combobox.input_value()
    }

    /// The placeholder shown in an empty input.
    pub fn placeholder(&self) -> String {
        format!("Filter {} records", format_count(self.record_count))
    }

    /// Current dropdown candidates.
    ///
    /// Recomputed on every call from the possible values, the selection and
    /// the input text.
    pub fn candidates(&self) -> Vec<&CategoryValue> {
        filter::candidates(
            &self.possible_values,
            self.selection.selected_items(),
            self.combobox.input_value(),
        )
    }

    /// Add a value to the selection.
    pub fn add_selection(&mut self, item: CategoryValue) -> Option<CategoryFilterAction> {
        self.selection
            .dispatch(SelectionAction::Add(item))
            .map(Into::into)
    }

    /// Remove the value with this `value` string from the selection.
    pub fn remove_selection(&mut self, value: &str) -> Option<CategoryFilterAction> {
        self.selection
            .dispatch(SelectionAction::Remove(value.to_string()))
            .map(Into::into)
    }

    /// Dispatch to the dropdown and commit any chosen candidate.
    fn dispatch_combobox(&mut self, action: ComboboxAction) -> Option<CategoryFilterAction> {
        let item_count = self.candidates().len();
        let change = self.combobox.dispatch(action, item_count);

        let chosen = change
            .selected_index
            .filter(|_| change.change_type.is_commit())
            .and_then(|index| self.candidates().get(index).map(|item| (*item).clone()));
        let result = match chosen {
            Some(item) => {
                self.combobox
                    .dispatch(ComboboxAction::SetInputValue(String::new()), 0);
                self.add_selection(item)
            }
            None => None,
        };

        self.sync_text_input();
        result
    }

    /// Keep the editing buffer in step with the dropdown's input text.
    fn sync_text_input(&mut self) {
        if self.text_input.value() != self.combobox.input_value() {
            self.text_input.set_value(self.combobox.input_value());
        }
    }

    /// Handle keyboard input.
    ///
    /// Returns an optional action to be handled by the parent view.
    pub fn handle_input(&mut self, key: KeyEvent) -> Option<CategoryFilterAction> {
        if self.selection.active_index().is_some() {
            match key.code {
                KeyCode::Left => {
                    self.selection.dispatch(SelectionAction::FocusPrevious);
                    return None;
                }
                KeyCode::Right => {
                    self.selection.dispatch(SelectionAction::FocusNext);
                    return None;
                }
                KeyCode::Backspace | KeyCode::Delete => {
                    return self
                        .selection
                        .dispatch(SelectionAction::RemoveActive)
                        .map(Into::into);
                }
                KeyCode::Esc => {
                    self.selection.dispatch(SelectionAction::Blur);
                    return None;
                }
                // Anything else goes back to the input
                _ => {
                    self.selection.dispatch(SelectionAction::Blur);
                }
            }
        }

        match (key.code, key.modifiers) {
            // Open without moving the highlight
            (KeyCode::Down, KeyModifiers::ALT) => self.dispatch_combobox(ComboboxAction::OpenMenu),
            (KeyCode::Down, _) => self.dispatch_combobox(ComboboxAction::InputKeyDownArrowDown),
            (KeyCode::Up, _) => self.dispatch_combobox(ComboboxAction::InputKeyDownArrowUp),
            (KeyCode::Enter, _) => self.dispatch_combobox(ComboboxAction::InputKeyDownEnter),
            (KeyCode::Tab, _) | (KeyCode::BackTab, _) => {
                self.dispatch_combobox(ComboboxAction::InputBlur)
            }
            (KeyCode::Esc, _) => {
                if !self.combobox.is_open() && self.combobox.input_value().is_empty() {
                    return Some(CategoryFilterAction::Dismiss);
                }
                self.dispatch_combobox(ComboboxAction::InputKeyDownEscape)
            }
            // Chip keys stay inactive while the dropdown is open
            (KeyCode::Left, KeyModifiers::NONE)
                if self.text_input.cursor() == 0
                    && !self.selection.is_empty()
                    && !self.combobox.is_open() =>
            {
                self.selection.dispatch(SelectionAction::FocusLast);
                None
            }
            (KeyCode::Backspace, _)
                if self.text_input.is_empty()
                    && !self.selection.is_empty()
                    && !self.combobox.is_open() =>
            {
                let last = self.selection.selected_items().last()?.value.clone();
                self.remove_selection(&last)
            }
            _ => {
                if self.text_input.handle_input(key) {
                    let text = self.text_input.value().to_string();
                    self.dispatch_combobox(ComboboxAction::InputChange(text))
                } else {
                    None
                }
            }
        }
    }

    /// Insert pasted text into the input.
    pub fn handle_paste(&mut self, text: &str) -> Option<CategoryFilterAction> {
        self.selection.dispatch(SelectionAction::Blur);
        if !self.text_input.insert_str(text) {
            return None;
        }
        let text = self.text_input.value().to_string();
        self.dispatch_combobox(ComboboxAction::InputChange(text))
    }

    /// Handle mouse input against the areas drawn by the last render.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> Option<CategoryFilterAction> {
        let position = Position::new(mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(index) = self.menu_row_at(position) {
                    return self.dispatch_combobox(ComboboxAction::ItemClick(index));
                }
                if let Some(hit) = self
                    .chip_hits
                    .iter()
                    .find(|hit| hit.area.contains(position))
                    .cloned()
                {
                    return self.remove_selection(&hit.value);
                }
                if self.input_area.is_some_and(|area| area.contains(position)) {
                    self.selection.dispatch(SelectionAction::Blur);
                    return self.dispatch_combobox(ComboboxAction::ToggleMenu);
                }
                if self.combobox.is_open() {
                    return self.dispatch_combobox(ComboboxAction::CloseMenu);
                }
                None
            }
            MouseEventKind::Moved => {
                if let Some(index) = self.menu_row_at(position) {
                    self.dispatch_combobox(ComboboxAction::ItemMouseMove(index));
                }
                None
            }
            MouseEventKind::ScrollDown if self.menu_contains(position) => {
                self.dispatch_combobox(ComboboxAction::InputKeyDownArrowDown)
            }
            MouseEventKind::ScrollUp if self.menu_contains(position) => {
                self.dispatch_combobox(ComboboxAction::InputKeyDownArrowUp)
            }
            _ => None,
        }
    }

    fn menu_contains(&self, position: Position) -> bool {
        self.combobox.is_open() && self.menu_area.is_some_and(|area| area.contains(position))
    }

    /// Map a screen position to a candidate index in the open dropdown.
    fn menu_row_at(&self, position: Position) -> Option<usize> {
        if !self.menu_contains(position) {
            return None;
        }
        let area = self.menu_area?;
        let index = self.menu_state.offset() + (position.y - area.y) as usize;
        (index < self.candidates().len()).then_some(index)
    }

    /// Render the chips and input, then the dropdown below them when open.
    ///
    /// The dropdown overlays whatever is below `area`, so render this widget
    /// after the content underneath it.
    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let border_style = if focused {
            Style::default().fg(self.theme.accent)
        } else {
            Style::default().fg(self.theme.muted)
        };

        let title = if self.selection.is_empty() {
            format!(" {} ", self.title)
        } else {
            format!(" {} ({}) ", self.title, self.selection.len())
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        self.chip_hits.clear();
        self.input_area = None;
        self.menu_area = None;

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let chips_area = Rect::new(inner.x, inner.y, inner.width, 1);
        self.render_chips(frame, chips_area);

        if inner.height >= 2 {
            let input_area = Rect::new(inner.x, inner.y + 1, inner.width, 1);
            self.render_input(frame, input_area, focused);
            self.input_area = Some(input_area);
        }

        if self.combobox.is_open() {
            self.render_dropdown(frame, area);
        }
    }

    fn chip_style(&self, item: &CategoryValue, active: bool) -> Style {
        let style = Style::default()
            .fg(self.theme.chip_fg)
            .bg(item.terminal_color().unwrap_or(self.theme.chip_bg));
        if active {
            style.add_modifier(Modifier::REVERSED | Modifier::BOLD)
        } else {
            style
        }
    }

    /// Render chips on one line, recording where each `×` landed.
    fn render_chips(&mut self, frame: &mut Frame, area: Rect) {
        if self.selection.is_empty() {
            let hint = Paragraph::new(Span::styled(
                "No values selected",
                Style::default().fg(self.theme.muted),
            ));
            frame.render_widget(hint, area);
            return;
        }

        let active = self.selection.active_index();
        let mut spans: Vec<Span> = Vec::new();
        let mut hits = Vec::new();
        let mut x = area.x;
        let right = area.x + area.width;

        for (index, item) in self.selection.selected_items().iter().enumerate() {
            if index > 0 {
                spans.push(Span::raw(" "));
                x = x.saturating_add(1);
            }
            let style = self.chip_style(item, active == Some(index));
            let label = Span::styled(format!(" {} ", item.value), style);
            let close_x = x.saturating_add(label.width() as u16);
            if close_x < right {
                hits.push(ChipHitArea {
                    area: Rect::new(close_x, area.y, 1, 1),
                    value: item.value.clone(),
                });
            }
            spans.push(label);
            spans.push(Span::styled("× ", style));
            x = close_x.saturating_add(2);
        }

        self.chip_hits = hits;
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_input(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let prompt = Span::styled("› ", Style::default().fg(self.theme.accent));
        let prompt_width = prompt.width() as u16;

        let text = if self.text_input.is_empty() {
            Span::styled(self.placeholder(), Style::default().fg(self.theme.muted))
        } else {
            let color = if self.value.is_some() {
                self.theme.accent
            } else {
                Color::Gray
            };
            Span::styled(self.text_input.value().to_string(), Style::default().fg(color))
        };

        frame.render_widget(Paragraph::new(Line::from(vec![prompt, text])), area);

        if focused && self.selection.active_index().is_none() {
            let cursor_x = area
                .x
                .saturating_add(prompt_width)
                .saturating_add(self.text_input.cursor_offset());
            if cursor_x < area.right() {
                frame.set_cursor_position(Position::new(cursor_x, area.y));
            }
        }
    }

    /// Render the candidate list below `anchor`, clipped to the frame.
    fn render_dropdown(&mut self, frame: &mut Frame, anchor: Rect) {
        let bounds = frame.area();
        let top = anchor.y.saturating_add(anchor.height);
        let available = bounds.bottom().saturating_sub(top);
        if available < 3 {
            return;
        }

        let candidates: Vec<CategoryValue> = self.candidates().into_iter().cloned().collect();
        let rows = u16::try_from(candidates.len().clamp(1, self.max_dropdown_items.max(1)))
            .unwrap_or(u16::MAX);
        let height = rows.saturating_add(2).min(available);
        let dropdown_area = Rect::new(anchor.x, top, anchor.width, height);

        frame.render_widget(Clear, dropdown_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent));
        let inner = block.inner(dropdown_area);
        frame.render_widget(block, dropdown_area);

        if candidates.is_empty() {
            let message = if self.possible_values.is_empty() {
                "No values available"
            } else {
                "No matching values"
            };
            frame.render_widget(
                Paragraph::new(message).style(Style::default().fg(self.theme.muted)),
                inner,
            );
            return;
        }

        let items: Vec<ListItem> = candidates
            .iter()
            .map(|item| {
                let color = item.terminal_color().unwrap_or(self.theme.fg);
                ListItem::new(Line::from(vec![
                    Span::styled(item.value.clone(), Style::default().fg(color)),
                    Span::styled(
                        format!(" ({})", format_count(item.count)),
                        Style::default().fg(self.theme.muted),
                    ),
                ]))
            })
            .collect();

        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .fg(self.theme.highlight)
                    .bg(self.theme.muted)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let highlighted = self
            .combobox
            .highlighted_index()
            .filter(|&index| index < candidates.len());
        self.menu_state.select(highlighted);
        frame.render_stateful_widget(list, inner, &mut self.menu_state);
        self.menu_area = Some(inner);
    }
}

impl Default for CategoryFilter {
    fn default() -> Self {
        Self::new("")
    }
}
