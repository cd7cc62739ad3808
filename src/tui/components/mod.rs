//! Widgets making up the browser screen.
//!
//! Components read the browser state and draw it; they never mutate it.

pub mod blog_grid;
pub mod filter_tabs;
pub mod header;
pub mod pagination;
pub mod search_bar;

pub use blog_grid::BlogGrid;
pub use filter_tabs::FilterTabs;
pub use header::Header;
pub use pagination::Pagination;
pub use search_bar::SearchBar;

use crate::browse::BlogBrowser;
use crate::tui::{styles::Theme, Frame};
use ratatui::layout::Rect;

/// Base trait for all UI components
pub trait Component {
    /// Render the component for the current browser state
    fn render(&self, frame: &mut Frame, area: Rect, browser: &BlogBrowser, theme: &Theme);

    /// Rows the component wants; `None` takes whatever is left
    fn height(&self, _browser: &BlogBrowser) -> Option<u16> {
        None
    }
}
