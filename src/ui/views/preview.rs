//! Preview table of the records passing the current filters.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{
        Block, Borders, Cell, Paragraph, Row, Scrollbar, ScrollbarOrientation, ScrollbarState,
        Table,
    },
    Frame,
};

use crate::dataset::{field_text, Record};
use crate::ui::theme::{format_count, Theme};

/// Scrollable table of filtered records.
#[derive(Debug, Default)]
pub struct PreviewView {
    /// First visible row.
    scroll: usize,
    /// Rows available for records, from the last render.
    visible_height: usize,
    /// Rows held by the last render.
    total_rows: usize,
    theme: Theme,
}

impl PreviewView {
    /// Create a new preview.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the first visible row.
    #[cfg(test)]
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Jump back to the first row.
    pub fn reset_scroll(&mut self) {
        self.scroll = 0;
    }

    /// Scroll down one page.
    pub fn page_down(&mut self) {
        let page = self.visible_height.max(1);
        self.scroll = (self.scroll + page).min(self.max_scroll());
    }

    /// Scroll up one page.
    pub fn page_up(&mut self) {
        let page = self.visible_height.max(1);
        self.scroll = self.scroll.saturating_sub(page);
    }

    fn max_scroll(&self) -> usize {
        self.total_rows.saturating_sub(self.visible_height)
    }

    /// Render `records` under a header of `columns`.
    ///
    /// `matching` is the number of records passing the filters, which can be
    /// larger than the rows handed in.
    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        columns: &[String],
        records: &[&Record],
        matching: usize,
    ) {
        let title = if matching > records.len() {
            format!(
                " Records (first {} of {}) ",
                format_count(records.len() as u64),
                format_count(matching as u64)
            )
        } else {
            format!(" Records ({}) ", format_count(matching as u64))
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.muted));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if records.is_empty() {
            let empty = Paragraph::new(Line::styled(
                "No records match the current filters",
                Style::default().fg(self.theme.muted),
            ));
            frame.render_widget(empty, inner);
            self.total_rows = 0;
            self.scroll = 0;
            return;
        }

        // One row goes to the header
        self.visible_height = inner.height.saturating_sub(1) as usize;
        self.total_rows = records.len();
        self.scroll = self.scroll.min(self.max_scroll());

        let header = Row::new(columns.iter().map(|c| Cell::from(c.clone())))
            .style(
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            );

        let rows = records
            .iter()
            .skip(self.scroll)
            .take(self.visible_height)
            .map(|record| {
                Row::new(columns.iter().map(|column| {
                    let text = record.get(column).and_then(field_text).unwrap_or_default();
                    Cell::from(text)
                }))
            });

        let widths = vec![Constraint::Fill(1); columns.len()];
        let table = Table::new(rows, widths)
            .header(header)
            .style(Style::default().fg(self.theme.fg))
            .column_spacing(1);
        frame.render_widget(table, inner);

        if self.total_rows > self.visible_height {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("▲"))
                .end_symbol(Some("▼"));
            let mut scrollbar_state = ScrollbarState::new(self.max_scroll()).position(self.scroll);
            frame.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
        }
    }
}
