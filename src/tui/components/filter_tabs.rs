use super::Component;
use crate::browse::BlogBrowser;
use crate::config::Tab;
use crate::tui::{styles::Theme, Frame};
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};

/// One button per configured tab, the active tag highlighted
pub struct FilterTabs {
    tabs: Vec<Tab>,
}

impl FilterTabs {
    pub fn new(tabs: Vec<Tab>) -> Self {
        Self { tabs }
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    /// Index of the active tag, if it is one of the tabs
    pub fn active_index(&self, active_tag: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.tag == active_tag)
    }

    /// Tag `offset` positions away from the active one, wrapping around
    pub fn cycle(&self, active_tag: &str, offset: isize) -> Option<&str> {
        if self.tabs.is_empty() {
            return None;
        }
        let len = self.tabs.len() as isize;
        let index = match self.active_index(active_tag) {
            Some(i) => (i as isize + offset).rem_euclid(len),
            None => 0,
        };
        Some(&self.tabs[index as usize].tag)
    }
}

impl Component for FilterTabs {
    fn render(&self, frame: &mut Frame, area: Rect, browser: &BlogBrowser, theme: &Theme) {
        let mut spans = Vec::with_capacity(self.tabs.len() * 2);
        for tab in &self.tabs {
            let style = if tab.tag == browser.active_tag() {
                theme.active_tab_style()
            } else {
                theme.tab_style()
            };
            spans.push(Span::styled(format!(" {} ", tab.label), style));
            spans.push(Span::raw(" "));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Center), area);
    }

    fn height(&self, _browser: &BlogBrowser) -> Option<u16> {
        Some(if self.tabs.is_empty() { 0 } else { 1 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tabs() -> FilterTabs {
        FilterTabs::new(vec![
            Tab::new("dashcam", "Dash Cams"),
            Tab::new("carplay", "CarPlay"),
            Tab::new("mirror", "Mirrors"),
        ])
    }

    #[test]
    fn test_cycle_wraps() {
        let tabs = tabs();
        assert_eq!(tabs.cycle("dashcam", 1), Some("carplay"));
        assert_eq!(tabs.cycle("mirror", 1), Some("dashcam"));
        assert_eq!(tabs.cycle("dashcam", -1), Some("mirror"));
    }

    #[test]
    fn test_cycle_from_unknown_tag_starts_at_first() {
        assert_eq!(tabs().cycle("", 1), Some("dashcam"));
        assert_eq!(FilterTabs::new(Vec::new()).cycle("", 1), None);
    }
}
