use ratatui::layout::{Constraint, Direction, Layout, Rect};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Layout utilities for TUI components
pub mod layout {
    use super::*;

    /// Create a centered rectangle with given width and height
    pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
        let popup_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length((area.height.saturating_sub(height)) / 2),
                Constraint::Length(height),
                Constraint::Length((area.height.saturating_sub(height)) / 2),
            ])
            .split(area);

        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length((area.width.saturating_sub(width)) / 2),
                Constraint::Length(width),
                Constraint::Length((area.width.saturating_sub(width)) / 2),
            ])
            .split(popup_layout[1])[1]
    }

    /// Split `area` into `count` equal-width columns
    pub fn columns(area: Rect, count: usize) -> Vec<Rect> {
        let count = count.max(1) as u32;
        let constraints: Vec<Constraint> = (0..count).map(|_| Constraint::Ratio(1, count)).collect();
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area)
            .to_vec()
    }
}

/// Text utilities for fixed-width cells
pub mod text {
    use super::*;

    /// Truncate `s` to at most `width` terminal columns, marking cuts with an ellipsis
    pub fn truncate(s: &str, width: usize) -> String {
        if s.width() <= width {
            return s.to_string();
        }
        if width == 0 {
            return String::new();
        }

        let mut out = String::new();
        let mut used = 0;
        for c in s.chars() {
            let w = c.width().unwrap_or(0);
            if used + w > width - 1 {
                break;
            }
            out.push(c);
            used += w;
        }
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::text::truncate;

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate("S90", 10), "S90");
    }

    #[test]
    fn test_truncate_long_text() {
        assert_eq!(truncate("/blog/s90-dashcam-setup/", 8), "/blog/s…");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn test_truncate_wide_characters() {
        // Each CJK character takes two columns
        assert_eq!(truncate("行车记录仪", 5), "行车…");
    }
}
