use super::Component;
use crate::browse::BlogBrowser;
use crate::tui::{styles::Theme, Frame};
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};

/// "‹ 2 / 3 ›" page indicator, hidden when there is a single page
pub struct Pagination;

impl Pagination {
    pub fn indicator(browser: &BlogBrowser) -> Option<String> {
        browser
            .show_pagination()
            .then(|| format!("{} / {}", browser.current_page(), browser.total_slides()))
    }
}

impl Component for Pagination {
    fn render(&self, frame: &mut Frame, area: Rect, browser: &BlogBrowser, theme: &Theme) {
        let Some(indicator) = Self::indicator(browser) else {
            return;
        };

        let arrow = |enabled: bool| if enabled { theme.arrow_style() } else { theme.disabled_style() };
        let line = Line::from(vec![
            Span::styled("‹ ", arrow(browser.can_go_prev())),
            Span::styled(indicator, theme.text_style()),
            Span::styled(" ›", arrow(browser.can_go_next())),
        ]);

        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
    }

    fn height(&self, _browser: &BlogBrowser) -> Option<u16> {
        Some(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::content::types::fixtures::{page, posts};

    #[test]
    fn test_hidden_for_single_page() {
        let mut browser = BlogBrowser::from_config(&Config::default());
        let request = browser.mount();
        browser.complete_fetch(request.token, Ok(page(posts(0..3), 3, None, false)));
        assert_eq!(Pagination::indicator(&browser), None);
    }

    #[test]
    fn test_indicator_shows_position() {
        let mut browser = BlogBrowser::from_config(&Config::default());
        let request = browser.mount();
        browser.complete_fetch(request.token, Ok(page(posts(0..20), 25, Some("c1"), true)));
        browser.next_page();
        assert_eq!(Pagination::indicator(&browser).as_deref(), Some("2 / 3"));
    }
}
