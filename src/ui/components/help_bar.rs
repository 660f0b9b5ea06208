//! Contextual help bar component.
//!
//! Displays context-sensitive keyboard shortcut hints at the bottom of the screen.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Where keyboard focus sits in the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintContext {
    /// Typing in the filter input with the dropdown closed.
    Input,
    /// The dropdown is open.
    Dropdown,
    /// A chip has focus.
    Chips,
}

/// Get the hint line for a context.
pub fn context_hints(context: HintContext) -> &'static str {
    match context {
        HintContext::Input => {
            "[type] filter  [↓] values  [←] chips  [^N/^P] column  [Esc] quit"
        }
        HintContext::Dropdown => "[↑/↓] highlight  [Enter/Tab] select  [Esc] close",
        HintContext::Chips => "[←/→] move  [Del] remove  [Esc] back to input",
    }
}

/// Render a contextual help bar with hints for the given context.
///
/// This renders a single line of text showing the keyboard shortcuts that
/// apply where focus currently is.
pub fn render_context_help(frame: &mut Frame, area: Rect, context: HintContext) {
    let hints = context_hints(context);

    let spans = parse_hints_to_spans(hints);
    let line = Line::from(spans);
    let paragraph = Paragraph::new(line);

    frame.render_widget(paragraph, area);
}

/// Parse hint text into styled spans.
///
/// Highlights the key portion (in brackets) differently from the description.
fn parse_hints_to_spans(hints: &str) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let chars = hints.chars().peekable();
    let mut current = String::new();
    let mut in_bracket = false;

    for c in chars {
        match c {
            '[' => {
                // Flush any pending text
                if !current.is_empty() {
                    spans.push(Span::styled(
                        current.clone(),
                        Style::default().fg(Color::DarkGray),
                    ));
                    current.clear();
                }
                in_bracket = true;
                current.push(c);
            }
            ']' => {
                current.push(c);
                if in_bracket {
                    // This is a key, style it differently
                    spans.push(Span::styled(
                        current.clone(),
                        Style::default().fg(Color::Cyan),
                    ));
                    current.clear();
                    in_bracket = false;
                }
            }
            _ => {
                current.push(c);
            }
        }
    }

    // Flush any remaining text
    if !current.is_empty() {
        spans.push(Span::styled(current, Style::default().fg(Color::DarkGray)));
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hints_to_spans_simple() {
        let hints = "[↑/↓] highlight";
        let spans = parse_hints_to_spans(hints);
        assert_eq!(spans.len(), 2);
    }

    #[test]
    fn test_parse_hints_to_spans_multiple_keys() {
        let hints = "[↑/↓] highlight  [Enter] select  [Esc] close";
        let spans = parse_hints_to_spans(hints);
        // Should have: [↑/↓], " highlight  ", [Enter], " select  ", [Esc], " close"
        assert_eq!(spans.len(), 6);
    }

    #[test]
    fn test_parse_hints_to_spans_empty() {
        let hints = "";
        let spans = parse_hints_to_spans(hints);
        assert!(spans.is_empty());
    }

    #[test]
    fn test_parse_hints_to_spans_no_brackets() {
        let hints = "just text";
        let spans = parse_hints_to_spans(hints);
        assert_eq!(spans.len(), 1);
    }

    #[test]
    fn test_every_context_has_keys() {
        for context in [HintContext::Input, HintContext::Dropdown, HintContext::Chips] {
            let spans = parse_hints_to_spans(context_hints(context));
            assert!(spans.iter().any(|span| span.content.starts_with('[')));
        }
    }
}
