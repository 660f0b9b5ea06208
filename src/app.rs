//! Main application state and event loop.
//!
//! This module implements The Elm Architecture (TEA) pattern: every event
//! goes through [`App::update`], and [`App::view`] draws the current state.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::{debug, info, trace, warn};

use crate::config::Settings;
use crate::dataset::{Dataset, DatasetError, Record};
use crate::error::Result;
use crate::events::Event;
use crate::types::{CategoryValue, FilterMap, FilterValue};
use crate::ui::theme::{format_count, Theme};
use crate::ui::{
    render_context_help, CategoryFilter, CategoryFilterAction, HintContext, PreviewView,
    CATEGORY_FILTER_HEIGHT,
};

/// The main application struct that holds all state.
///
/// This implements the Model part of The Elm Architecture (TEA).
pub struct App {
    /// Whether the application should quit.
    should_quit: bool,
    /// Records being filtered.
    dataset: Dataset,
    /// Where the records came from, shown in the header.
    source: String,
    settings: Settings,
    /// Column offered in the category filter; `None` for an empty dataset.
    column: Option<String>,
    /// Filters given on the command line.
    base_filters: FilterMap<FilterValue>,
    /// Category filter for `column`.
    filter: CategoryFilter,
    /// Records passing all filters.
    matching: usize,
    preview: PreviewView,
    theme: Theme,
}

impl App {
    /// Create a new application instance.
    ///
    /// The filtered column is `column`, else the configured default, else the
    /// dataset's first column.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::UnknownColumn` if the chosen column or a base
    /// filter's column does not exist.
    pub fn new(
        dataset: Dataset,
        source: impl Into<String>,
        settings: Settings,
        column: Option<String>,
        base_filters: FilterMap<FilterValue>,
    ) -> Result<Self> {
        if let Some(unknown) = base_filters.keys().find(|c| !dataset.has_column(c)) {
            return Err(DatasetError::UnknownColumn(unknown.clone()).into());
        }

        let column = column
            .or_else(|| settings.default_column.clone())
            .or_else(|| dataset.columns().first().cloned());

        let theme = Theme::default();
        let filter = CategoryFilter::new("")
            .with_max_dropdown_items(settings.max_dropdown_items)
            .with_theme(theme);

        let mut app = Self {
            should_quit: false,
            dataset,
            source: source.into(),
            settings,
            column: None,
            base_filters,
            filter,
            matching: 0,
            preview: PreviewView::new(),
            theme,
        };
        if let Some(column) = column {
            app.mount_filter(column)?;
        }
        app.refresh();

        if app.dataset.is_empty() {
            warn!(source = %app.source, "Dataset has no records");
        }
        info!(
            source = %app.source,
            column = ?app.column,
            records = app.dataset.len(),
            "Application initialized"
        );
        Ok(app)
    }

    /// Returns whether the application should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// The column being filtered by category.
    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    /// Number of records passing all filters.
    pub fn matching(&self) -> usize {
        self.matching
    }

    /// The category filter widget.
    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    /// Point the category filter at `column`, starting from an empty state.
    fn mount_filter(&mut self, column: String) -> Result<()> {
        let values = self
            .dataset
            .category_values(&column, &self.settings.palette)?;

        self.filter.reset();
        self.filter.set_value(None);
        self.filter.set_title(column.clone());
        self.filter.set_possible_values(values);

        debug!(column = %column, "Mounted category filter");
        self.column = Some(column);
        Ok(())
    }

    /// Move the category filter to the next or previous column, wrapping.
    fn cycle_column(&mut self, forward: bool) {
        let columns = self.dataset.columns();
        if columns.len() < 2 {
            return;
        }

        let current = self
            .column
            .as_ref()
            .and_then(|c| columns.iter().position(|other| other == c))
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % columns.len()
        } else {
            (current + columns.len() - 1) % columns.len()
        };
        let column = columns[next].clone();

        if let Err(e) = self.mount_filter(column) {
            warn!(error = %e, "Failed to switch column");
            return;
        }
        self.refresh();
    }

    /// Base filters plus the category selection.
    ///
    /// A non-empty selection replaces any base filter on the same column.
    pub fn effective_filters(&self) -> FilterMap<FilterValue> {
        let mut filters = self.base_filters.clone();
        let selected = self.selected();
        if let Some(column) = &self.column {
            if !selected.is_empty() {
                filters.insert(column.clone(), FilterValue::Categories(selected.to_vec()));
            }
        }
        filters
    }

    /// Recount matching records after the filters changed.
    fn refresh(&mut self) {
        self.matching = self.dataset.apply(&self.effective_filters()).len();
        self.filter.set_record_count(self.matching);
        self.preview.reset_scroll();
        debug!(matching = self.matching, "Filters applied");
    }

    /// Update the application state based on an event.
    ///
    /// This implements the Update part of The Elm Architecture (TEA).
    pub fn update(&mut self, event: Event) {
        match event {
            Event::Key(key_event) => {
                trace!(key = ?key_event.code, modifiers = ?key_event.modifiers, "Key event");
                self.handle_key_event(key_event);
            }
            Event::Mouse(mouse_event) => {
                let action = self.filter.handle_mouse(mouse_event);
                self.handle_filter_action(action);
            }
            Event::Paste(text) => {
                let action = self.filter.handle_paste(&text);
                self.handle_filter_action(action);
            }
            Event::Resize(width, height) => {
                trace!(width, height, "Terminal resize event");
            }
            Event::Tick => {}
        }
    }

    /// Handle keyboard input events.
    fn handle_key_event(&mut self, key_event: KeyEvent) {
        match (key_event.code, key_event.modifiers) {
            // Quit on Ctrl+C (always works)
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            (KeyCode::Char('n'), KeyModifiers::CONTROL) => self.cycle_column(true),
            (KeyCode::Char('p'), KeyModifiers::CONTROL) => self.cycle_column(false),
            (KeyCode::PageDown, _) => self.preview.page_down(),
            (KeyCode::PageUp, _) => self.preview.page_up(),
            _ => {
                let action = self.filter.handle_input(key_event);
                self.handle_filter_action(action);
            }
        }
    }

    fn handle_filter_action(&mut self, action: Option<CategoryFilterAction>) {
        match action {
            Some(CategoryFilterAction::SelectionChanged(items)) => {
                debug!(
                    selected = ?items.iter().map(|v| v.value.as_str()).collect::<Vec<_>>(),
                    "Category selection changed"
                );
                self.filter.set_value(items.first().cloned());
                self.refresh();
            }
            Some(CategoryFilterAction::Dismiss) => {
                info!("Filter dismissed, quitting");
                self.should_quit = true;
            }
            None => {}
        }
    }

    /// Render the application UI.
    ///
    /// This implements the View part of The Elm Architecture (TEA).
    pub fn view(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),                      // Header
                Constraint::Length(CATEGORY_FILTER_HEIGHT), // Filter
                Constraint::Min(3),                         // Preview
                Constraint::Length(1),                      // Footer
            ])
            .split(frame.area());

        self.render_header(frame, chunks[0]);
        self.render_preview(frame, chunks[2]);
        render_context_help(frame, chunks[3], self.hint_context());

        // Last, so the dropdown overlays the preview
        self.filter.render(frame, chunks[1], true);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let column = self.column().unwrap_or("-");
        let line = Line::from(vec![
            Span::styled(
                "catfilter",
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::raw(self.source.clone()),
            Span::styled("  column: ", Style::default().fg(self.theme.muted)),
            Span::raw(column.to_string()),
            Span::styled("  matching: ", Style::default().fg(self.theme.muted)),
            Span::raw(format!(
                "{} of {}",
                format_count(self.matching() as u64),
                format_count(self.dataset.len() as u64)
            )),
        ]);

        let header = Paragraph::new(line).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(self.theme.muted)),
        );
        frame.render_widget(header, area);
    }

    fn render_preview(&mut self, frame: &mut Frame, area: Rect) {
        let filters = self.effective_filters();
        let records: Vec<&Record> = self
            .dataset
            .apply(&filters)
            .into_iter()
            .take(self.settings.preview_rows)
            .collect();
        self.preview.render(
            frame,
            area,
            self.dataset.columns(),
            &records,
            self.matching,
        );
    }

    fn hint_context(&self) -> HintContext {
        if self.filter.active_chip().is_some() {
            HintContext::Chips
        } else if self.filter.is_open() {
            HintContext::Dropdown
        } else {
            HintContext::Input
        }
    }

    /// The values currently selected in the category filter.
    pub fn selected(&self) -> &[CategoryValue] {
        self.filter.selected_items()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    const SAMPLE: &str = r#"[
        {"fruit": "Apple", "origin": "Spain", "price": 1.5},
        {"fruit": "Banana", "origin": "Ecuador", "price": 0.5},
        {"fruit": "Apple", "origin": "Italy", "price": 2.0},
        {"fruit": "Apricot", "origin": "Spain", "price": 3.0}
    ]"#;

    fn app() -> App {
        app_with(None, FilterMap::new())
    }

    fn app_with(column: Option<&str>, base: FilterMap<FilterValue>) -> App {
        let dataset = Dataset::from_json_str(SAMPLE).unwrap();
        App::new(
            dataset,
            "fruit.json",
            Settings::default(),
            column.map(String::from),
            base,
        )
        .unwrap()
    }

    fn press(app: &mut App, code: KeyCode) {
        app.update(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    fn ctrl(app: &mut App, c: char) {
        app.update(Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)));
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn selected_values(app: &App) -> Vec<&str> {
        app.selected().iter().map(|v| v.value.as_str()).collect()
    }

    fn render(app: &mut App) -> Vec<String> {
        let backend = TestBackend::new(60, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| app.view(frame)).unwrap();

        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect()
    }

    #[test]
    fn test_app_new_uses_first_column() {
        let app = app();
        assert_eq!(app.column(), Some("fruit"));
        assert_eq!(app.matching(), 4);
        assert!(!app.should_quit());
        assert_eq!(app.filter().possible_values().len(), 3);
        assert_eq!(app.filter().placeholder(), "Filter 4 records");
    }

    #[test]
    fn test_app_new_with_column() {
        let app = app_with(Some("origin"), FilterMap::new());
        assert_eq!(app.column(), Some("origin"));
        assert_eq!(app.filter().title(), "origin");
    }

    #[test]
    fn test_app_new_default_column_from_settings() {
        let dataset = Dataset::from_json_str(SAMPLE).unwrap();
        let settings = Settings {
            default_column: Some("origin".to_string()),
            ..Settings::default()
        };
        let app = App::new(dataset, "fruit.json", settings, None, FilterMap::new()).unwrap();
        assert_eq!(app.column(), Some("origin"));
    }

    #[test]
    fn test_app_new_unknown_column() {
        let dataset = Dataset::from_json_str(SAMPLE).unwrap();
        let result = App::new(
            dataset,
            "fruit.json",
            Settings::default(),
            Some("colour".to_string()),
            FilterMap::new(),
        );
        assert!(matches!(
            result,
            Err(AppError::Dataset(DatasetError::UnknownColumn(c))) if c == "colour"
        ));
    }

    #[test]
    fn test_app_new_unknown_base_filter_column() {
        let dataset = Dataset::from_json_str(SAMPLE).unwrap();
        let mut base = FilterMap::new();
        base.insert("weight".to_string(), FilterValue::Range((0.0, 1.0)));
        let result = App::new(dataset, "fruit.json", Settings::default(), None, base);
        assert!(result.is_err());
    }

    #[test]
    fn test_app_new_empty_dataset() {
        let app = App::new(
            Dataset::default(),
            "empty.json",
            Settings::default(),
            None,
            FilterMap::new(),
        )
        .unwrap();
        assert_eq!(app.column(), None);
        assert_eq!(app.matching(), 0);
    }

    #[test]
    fn test_select_value_narrows_records() {
        let mut app = app();
        type_str(&mut app, "ap");
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);

        assert_eq!(selected_values(&app), vec!["Apple"]);
        assert_eq!(app.matching(), 2);
        assert_eq!(app.filter().placeholder(), "Filter 2 records");
        assert_eq!(app.filter().input_value(), "");
    }

    #[test]
    fn test_selections_combine_as_union() {
        let mut app = app();
        type_str(&mut app, "ap");
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "b");
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);

        assert_eq!(selected_values(&app), vec!["Apple", "Banana"]);
        assert_eq!(app.matching(), 3);
    }

    #[test]
    fn test_removing_chip_restores_records() {
        let mut app = app();
        type_str(&mut app, "b");
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.matching(), 1);

        press(&mut app, KeyCode::Backspace);
        assert!(app.selected().is_empty());
        assert_eq!(app.matching(), 4);
    }

    #[test]
    fn test_base_filters_apply() {
        let mut base = FilterMap::new();
        base.insert("origin".to_string(), FilterValue::Text("spain".to_string()));
        let mut app = app_with(None, base);
        assert_eq!(app.matching(), 2);

        type_str(&mut app, "apr");
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.matching(), 1);
    }

    #[test]
    fn test_selection_overrides_base_filter_on_same_column() {
        let mut base = FilterMap::new();
        base.insert("fruit".to_string(), FilterValue::Text("ban".to_string()));
        let mut app = app_with(None, base);
        assert_eq!(app.matching(), 1);

        type_str(&mut app, "apple");
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.matching(), 2);
    }

    #[test]
    fn test_quit_on_ctrl_c() {
        let mut app = app();
        type_str(&mut app, "ap");
        ctrl(&mut app, 'c');
        assert!(app.should_quit());
    }

    #[test]
    fn test_escape_closes_then_clears_then_quits() {
        let mut app = app();
        type_str(&mut app, "ap");
        assert!(app.filter().is_open());

        press(&mut app, KeyCode::Esc);
        assert!(!app.filter().is_open());
        assert!(!app.should_quit());

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.filter().input_value(), "");
        assert!(!app.should_quit());

        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit());
    }

    #[test]
    fn test_cycle_column_remounts_filter() {
        let mut app = app();
        type_str(&mut app, "b");
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.matching(), 1);

        type_str(&mut app, "x");
        ctrl(&mut app, 'n');
        assert_eq!(app.column(), Some("origin"));
        assert_eq!(app.filter().title(), "origin");
        assert_eq!(app.filter().possible_values().len(), 3);
        assert!(app.selected().is_empty());
        assert_eq!(app.filter().input_value(), "");
        assert!(!app.filter().is_open());
        assert_eq!(app.matching(), 4);
        assert_eq!(app.filter().placeholder(), "Filter 4 records");

        ctrl(&mut app, 'p');
        ctrl(&mut app, 'p');
        assert_eq!(app.column(), Some("price"));
    }

    #[test]
    fn test_paste_opens_dropdown() {
        let mut app = app();
        app.update(Event::Paste("Ban".to_string()));
        assert!(app.filter().is_open());
        assert_eq!(app.filter().candidates().len(), 1);
    }

    #[test]
    fn test_effective_filters() {
        let mut app = app();
        assert!(app.effective_filters().is_empty());

        type_str(&mut app, "ban");
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);

        let filters = app.effective_filters();
        match &filters["fruit"] {
            FilterValue::Categories(values) => assert_eq!(values[0].value, "Banana"),
            other => panic!("unexpected filter {other:?}"),
        }
    }

    #[test]
    fn test_hint_context_follows_focus() {
        let mut app = app();
        assert_eq!(app.hint_context(), HintContext::Input);

        type_str(&mut app, "a");
        assert_eq!(app.hint_context(), HintContext::Dropdown);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.hint_context(), HintContext::Chips);
    }

    #[test]
    fn test_view_renders_dashboard() {
        let mut app = app();
        let lines = render(&mut app);

        assert!(lines[0].contains("fruit.json"));
        assert!(lines[0].contains("4 of 4"));
        assert!(lines[2].contains("fruit"));
        assert!(lines[4].contains("Filter 4 records"));
        assert!(lines.iter().any(|l| l.contains("Records (4)")));
        assert!(lines.iter().any(|l| l.contains("Banana")));
        assert!(lines[19].contains("[type] filter"));
    }

    #[test]
    fn test_view_after_selection() {
        let mut app = app();
        type_str(&mut app, "ban");
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);

        let lines = render(&mut app);
        assert!(lines[0].contains("1 of 4"));
        assert!(lines.iter().any(|l| l.contains("Records (1)")));
        assert!(!lines.iter().skip(6).any(|l| l.contains("Apricot")));
    }
}
