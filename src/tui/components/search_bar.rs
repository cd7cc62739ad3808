use super::Component;
use crate::browse::BlogBrowser;
use crate::tui::{styles::Theme, Frame};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

const PLACEHOLDER: &str = "Search for Support";

/// Text input plus the search button
pub struct SearchBar;

impl Component for SearchBar {
    fn render(&self, frame: &mut Frame, area: Rect, browser: &BlogBrowser, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(10), Constraint::Length(10)])
            .split(area);

        let input = browser.search().input();
        let content = if input.is_empty() {
            Line::from(Span::styled(PLACEHOLDER, theme.placeholder_style()))
        } else {
            Line::from(vec![
                Span::styled("🔍 ", theme.dim_style()),
                Span::styled(input.to_string(), theme.text_style()),
            ])
        };

        let border = if browser.search().is_pending() {
            theme.focused_border_style()
        } else {
            theme.border_style()
        };

        frame.render_widget(
            Paragraph::new(content).block(Block::default().borders(Borders::ALL).border_style(border)),
            chunks[0],
        );
        frame.render_widget(
            Paragraph::new(Span::styled(" Search", theme.arrow_style()))
                .block(Block::default().borders(Borders::ALL).border_style(theme.border_style())),
            chunks[1],
        );

        // Cursor after the typed text
        let prefix = if input.is_empty() { 0 } else { 3 };
        let x = chunks[0].x + 1 + prefix + unicode_width::UnicodeWidthStr::width(input) as u16;
        if x < chunks[0].right().saturating_sub(1) {
            frame.set_cursor(x, chunks[0].y + 1);
        }
    }

    fn height(&self, _browser: &BlogBrowser) -> Option<u16> {
        Some(3)
    }
}
