use super::Component;
use crate::browse::{BlogBrowser, GridView};
use crate::content::Post;
use crate::tui::{
    styles::Theme,
    utils::{layout, text::truncate},
    Frame,
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

const CARD_WIDTH: u16 = 24;
const CARD_HEIGHT: u16 = 5;
const SKELETON_CARDS: usize = 8;

/// Card grid with skeleton and empty states
pub struct BlogGrid;

impl BlogGrid {
    /// Columns that fit in `width`, at least one
    pub fn columns_for(width: u16) -> usize {
        (width / CARD_WIDTH).max(1) as usize
    }

    /// Card rows to draw for `len` items, and how many items do not fit.
    /// A row is given up for the overflow marker when needed.
    pub fn fit_rows(height: u16, columns: usize, len: usize) -> (usize, usize) {
        let needed = len.div_ceil(columns);
        let rows = (height / CARD_HEIGHT).max(1) as usize;
        if needed <= rows {
            return (needed, 0);
        }
        let rows = (height.saturating_sub(1) / CARD_HEIGHT).max(1) as usize;
        (rows, len.saturating_sub(rows * columns))
    }

    /// Draw items row by row; returns the number left out
    fn render_cells<T>(
        frame: &mut Frame,
        area: Rect,
        items: &[T],
        mut draw: impl FnMut(&mut Frame, Rect, &T),
    ) -> usize {
        let columns = Self::columns_for(area.width);
        let (rows, hidden) = Self::fit_rows(area.height, columns, items.len());

        for (row_index, row) in items.chunks(columns).take(rows).enumerate() {
            let row_area = Rect {
                y: area.y + row_index as u16 * CARD_HEIGHT,
                height: CARD_HEIGHT.min(area.height.saturating_sub(row_index as u16 * CARD_HEIGHT)),
                ..area
            };
            let cells = layout::columns(row_area, columns);
            for (item, cell) in row.iter().zip(cells) {
                draw(frame, cell, item);
            }
        }
        hidden
    }

    fn render_overflow(frame: &mut Frame, area: Rect, hidden: usize, theme: &Theme) {
        if hidden == 0 || area.height == 0 {
            return;
        }
        let line_area = Rect {
            y: area.bottom() - 1,
            height: 1,
            ..area
        };
        frame.render_widget(
            Paragraph::new(Line::styled(format!("+{} more, enlarge the terminal to see them", hidden), theme.dim_style()))
                .alignment(Alignment::Right),
            line_area,
        );
    }

    fn render_card(frame: &mut Frame, area: Rect, post: &&Post, theme: &Theme) {
        let inner_width = area.width.saturating_sub(2) as usize;
        let thumbnail = match &post.thumbnail_url {
            Some(_) => Span::styled("▣ image", theme.dim_style()),
            None => Span::styled("▢ no image", theme.placeholder_style()),
        };
        let lines = vec![
            Line::from(thumbnail),
            Line::from(Span::styled(truncate(&post.path, inner_width), theme.dim_style())),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style())
            .title(Span::styled(truncate(post.card_title(), inner_width), theme.title_style()));

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_skeleton(frame: &mut Frame, area: Rect, theme: &Theme) {
        let width = area.width.saturating_sub(4) as usize;
        let lines = vec![
            Line::styled("░".repeat(width), theme.skeleton_style()),
            Line::styled("░".repeat(width / 2), theme.skeleton_style()),
        ];
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.skeleton_style());
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_empty(frame: &mut Frame, area: Rect, browser: &BlogBrowser, theme: &Theme) {
        let mut lines = vec![Line::styled("Not found", theme.title_style())];
        if let Some(failure) = browser.last_error() {
            lines.push(Line::default());
            lines.push(Line::styled(
                format!("Request failed ({}): {}", failure.kind, failure.message),
                theme.error_style(),
            ));
            lines.push(Line::styled("Press Ctrl+R to retry", theme.dim_style()));
        }

        let height = lines.len() as u16;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(area.height.saturating_sub(height) / 2),
                Constraint::Length(height),
                Constraint::Min(0),
            ])
            .split(area);
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), chunks[1]);
    }
}

impl Component for BlogGrid {
    fn render(&self, frame: &mut Frame, area: Rect, browser: &BlogBrowser, theme: &Theme) {
        match browser.view() {
            GridView::Loading => {
                let slots = [(); SKELETON_CARDS];
                Self::render_cells(frame, area, &slots, |f, cell, _| Self::render_skeleton(f, cell, theme));
            }
            GridView::Empty => Self::render_empty(frame, area, browser, theme),
            GridView::Posts(posts) => {
                let hidden =
                    Self::render_cells(frame, area, &posts, |f, cell, post| Self::render_card(f, cell, post, theme));
                Self::render_overflow(frame, area, hidden, theme);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::content::types::fixtures::{page, posts};
    use ratatui::{backend::TestBackend, Terminal};

    fn render_to_string(browser: &BlogBrowser) -> String {
        render_sized(browser, 80, 20)
    }

    fn render_sized(browser: &BlogBrowser, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.size();
                BlogGrid.render(frame, area, browser, &Theme::default())
            })
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer.content.iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_columns_for_width() {
        assert_eq!(BlogGrid::columns_for(10), 1);
        assert_eq!(BlogGrid::columns_for(80), 3);
    }

    #[test]
    fn test_empty_state_shows_not_found() {
        let mut browser = BlogBrowser::from_config(&Config::default());
        let request = browser.mount();
        browser.complete_fetch(request.token, Ok(page(Vec::new(), 0, None, false)));

        assert!(render_to_string(&browser).contains("Not found"));
    }

    #[test]
    fn test_loading_state_shows_skeleton() {
        let mut browser = BlogBrowser::from_config(&Config::default());
        browser.mount();

        let screen = render_to_string(&browser);
        assert!(screen.contains('░'));
        assert!(!screen.contains("Not found"));
    }

    #[test]
    fn test_cards_show_first_word_title() {
        let mut browser = BlogBrowser::from_config(&Config::default());
        let request = browser.mount();
        browser.complete_fetch(request.token, Ok(page(posts(0..3), 3, None, false)));

        let screen = render_to_string(&browser);
        assert!(screen.contains("Post"));
        assert!(screen.contains("no image"));
    }

    #[test]
    fn test_fit_rows_reserves_marker_line() {
        assert_eq!(BlogGrid::fit_rows(20, 3, 10), (4, 0));
        assert_eq!(BlogGrid::fit_rows(20, 3, 3), (1, 0));
        assert_eq!(BlogGrid::fit_rows(12, 1, 10), (2, 8));
        assert_eq!(BlogGrid::fit_rows(10, 2, 10), (1, 8));
    }

    #[test]
    fn test_short_terminal_reports_hidden_cards() {
        let mut browser = BlogBrowser::from_config(&Config::default());
        let request = browser.mount();
        browser.complete_fetch(request.token, Ok(page(posts(0..10), 10, None, false)));

        let screen = render_sized(&browser, 80, 11);
        assert!(screen.contains("+4 more"));

        assert!(!render_sized(&browser, 80, 20).contains("more"));
    }
}
