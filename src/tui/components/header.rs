use super::Component;
use crate::browse::BlogBrowser;
use crate::tui::{styles::Theme, Frame};
use ratatui::{
    layout::{Alignment, Rect},
    text::Line,
    widgets::Paragraph,
};

/// Heading and subtitle above the controls
pub struct Header {
    title: String,
    subtitle: String,
}

impl Header {
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
        }
    }
}

impl Component for Header {
    fn render(&self, frame: &mut Frame, area: Rect, _browser: &BlogBrowser, theme: &Theme) {
        let lines = vec![
            Line::styled(self.title.clone(), theme.title_style()),
            Line::styled(self.subtitle.clone(), theme.dim_style()),
        ];
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
    }

    fn height(&self, _browser: &BlogBrowser) -> Option<u16> {
        Some(2)
    }
}
