use crate::browse::{BlogBrowser, FetchRequest};
use crate::config::Config;
use crate::content::ContentClient;
use crate::tui::{
    components::{BlogGrid, Component, FilterTabs, Header, Pagination, SearchBar},
    events::Event,
    keys::{Action, KeyMap},
    styles::Theme,
    utils::layout::centered_rect,
    Frame,
};
use anyhow::Result;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::debug;

/// Main application state and controller
pub struct App {
    /// Whether the application should quit
    pub should_quit: bool,

    /// Show the key binding overlay
    pub show_help: bool,

    /// Browsing state
    browser: BlogBrowser,

    /// Content source shared with spawned fetch tasks
    client: Arc<dyn ContentClient>,

    /// Key mappings for the application
    key_map: KeyMap,

    /// Current theme for styling
    theme: Theme,

    header: Header,
    tabs: FilterTabs,

    /// Event sender fetch tasks report back through
    event_sender: mpsc::UnboundedSender<Event>,
}

impl App {
    /// Create a new application instance
    pub fn new(config: &Config, client: Arc<dyn ContentClient>, event_sender: mpsc::UnboundedSender<Event>) -> Self {
        Self {
            should_quit: false,
            show_help: false,
            browser: BlogBrowser::from_config(config),
            client,
            key_map: KeyMap::default(),
            theme: Theme::default(),
            header: Header::new(config.title.clone(), config.subtitle.clone()),
            tabs: FilterTabs::new(config.tabs.clone()),
            event_sender,
        }
    }

    /// Mount the browser and start loading the default tag
    pub fn start(&mut self) {
        let request = self.browser.mount();
        self.dispatch(Some(request));
    }

    /// Tear down: pending timers are cancelled and late responses ignored
    pub fn shutdown(&mut self) {
        self.browser.unmount();
    }

    pub fn browser(&self) -> &BlogBrowser {
        &self.browser
    }

    /// Spawn a fetch; its result comes back as `Event::FetchCompleted`
    fn dispatch(&self, request: Option<FetchRequest>) {
        let Some(request) = request else {
            return;
        };
        let client = Arc::clone(&self.client);
        let sender = self.event_sender.clone();

        tokio::spawn(async move {
            let result = client.fetch_page(&request.query).await;
            // The receiver is gone only after the UI loop has exited
            let _ = sender.send(Event::FetchCompleted {
                token: request.token,
                result,
            });
        });
    }

    /// Handle incoming events. Returns true when the application should exit.
    pub fn handle_event(&mut self, event: Event) -> Result<bool> {
        let request = match event {
            Event::Key(key_event) => match self.key_map.action_for(&key_event) {
                Some(action) => self.apply(action, Instant::now()),
                None => None,
            },
            Event::Resize(width, height) => {
                debug!("Resized to {}x{}", width, height);
                None
            }
            Event::Tick => {
                self.browser.tick(Instant::now());
                None
            }
            Event::FetchCompleted { token, result } => self.browser.complete_fetch(token, result),
        };

        self.dispatch(request);
        Ok(self.should_quit)
    }

    /// Apply a user action to the browser
    pub fn apply(&mut self, action: Action, now: Instant) -> Option<FetchRequest> {
        match action {
            Action::Quit => {
                self.should_quit = true;
                None
            }
            Action::ToggleHelp => {
                self.show_help = !self.show_help;
                None
            }
            Action::NextTab | Action::PrevTab => {
                let offset = if action == Action::NextTab { 1 } else { -1 };
                let tag = self.tabs.cycle(self.browser.active_tag(), offset)?.to_string();
                self.browser.select_tag(&tag)
            }
            Action::SelectTab(index) => {
                let tag = self.tabs.tabs().get(index)?.tag.clone();
                self.browser.select_tag(&tag)
            }
            Action::PrevPage => self.browser.prev_page(),
            Action::NextPage => self.browser.next_page(),
            Action::Submit => {
                self.browser.submit_search();
                None
            }
            Action::Retry => self.browser.retry(),
            Action::Restart => Some(self.browser.restart()),
            Action::Backspace => {
                let mut input = self.browser.search().input().to_string();
                input.pop();
                self.browser.set_search_input(input, now);
                None
            }
            Action::ClearSearch => {
                self.browser.set_search_input(String::new(), now);
                None
            }
            Action::Type(c) => {
                let mut input = self.browser.search().input().to_string();
                input.push(c);
                self.browser.set_search_input(input, now);
                None
            }
        }
    }

    /// Render the application UI
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.size();
        frame.render_widget(Block::default().style(self.theme.base_style()), area);

        let components: [&dyn Component; 5] = [&self.header, &self.tabs, &SearchBar, &BlogGrid, &Pagination];
        let mut constraints: Vec<Constraint> = components
            .iter()
            .map(|c| match c.height(&self.browser) {
                Some(height) => Constraint::Length(height),
                None => Constraint::Min(CARD_ROWS_MIN),
            })
            .collect();
        constraints.push(Constraint::Length(1));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (component, chunk) in components.iter().zip(chunks.iter()) {
            component.render(frame, *chunk, &self.browser, &self.theme);
        }

        self.render_status_bar(frame, chunks[components.len()]);

        if self.show_help {
            self.render_help_overlay(frame);
        }
    }

    /// Render the status bar
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let tag = match self.browser.active_tag() {
            "" => "all",
            tag => tag,
        };
        let status_text = format!(
            "Tag: {} | {} | {} of {} loaded | Ctrl+G for help | Esc to quit",
            tag,
            self.browser.strategy_kind(),
            self.browser.loaded_count(),
            self.browser.total_items()
        );

        frame.render_widget(
            Paragraph::new(status_text).style(self.theme.status_bar_style()),
            area,
        );
    }

    /// Render help overlay
    fn render_help_overlay(&self, frame: &mut Frame) {
        let lines: Vec<Line> = self
            .key_map
            .help_lines()
            .into_iter()
            .map(|(key, description)| Line::from(format!("{:<10} {}", key, description)))
            .collect();
        let help_area = centered_rect(44, lines.len() as u16 + 2, frame.size());

        let help_block = Block::default()
            .borders(Borders::ALL)
            .title("Help")
            .style(self.theme.help_style());

        frame.render_widget(Clear, help_area);
        frame.render_widget(Paragraph::new(lines).block(help_block), help_area);
    }
}

const CARD_ROWS_MIN: u16 = 5;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tab;
    use crate::content::client::testing::ScriptedClient;
    use crate::content::types::fixtures::{page, posts};
    use crate::content::PostsQuery;
    use ratatui::{backend::TestBackend, Terminal};

    fn app() -> App {
        let config = Config {
            tabs: vec![Tab::new("dashcam", "Dash Cams"), Tab::new("carplay", "CarPlay")],
            ..Default::default()
        };
        let (sender, _receiver) = mpsc::unbounded_channel();
        App::new(&config, Arc::new(ScriptedClient::new()), sender)
    }

    #[test]
    fn test_typing_edits_search_input() {
        let mut app = app();
        let now = Instant::now();
        for c in "S90x".chars() {
            app.apply(Action::Type(c), now);
        }
        app.apply(Action::Backspace, now);

        assert_eq!(app.browser().search().input(), "S90");
        assert_eq!(app.browser().search().query(), "");
        assert!(app.browser().search().is_pending());

        app.apply(Action::Submit, now);
        assert_eq!(app.browser().search().query(), "S90");
    }

    #[test]
    fn test_tab_actions_switch_tags() {
        let mut app = app();
        let first = app.browser.mount();
        assert_eq!(first.query.tag, "dashcam");

        let request = app.apply(Action::NextTab, Instant::now()).unwrap();
        assert_eq!(request.query, PostsQuery::first_page("carplay", 20));

        let request = app.apply(Action::SelectTab(0), Instant::now()).unwrap();
        assert_eq!(request.query.tag, "dashcam");
        assert_eq!(app.apply(Action::SelectTab(5), Instant::now()), None);
    }

    #[test]
    fn test_quit_and_help() {
        let mut app = app();
        app.apply(Action::ToggleHelp, Instant::now());
        assert!(app.show_help);
        app.apply(Action::Quit, Instant::now());
        assert!(app.should_quit);
    }

    #[test]
    fn test_render_full_screen() {
        let mut app = app();
        let request = app.browser.mount();
        app.browser
            .complete_fetch(request.token, Ok(page(posts(0..20), 25, Some("c1"), true)));
        app.show_help = true;

        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        let screen: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();

        assert!(screen.contains("Choose your Dash Cam"));
        assert!(screen.contains("Dash Cams"));
        assert!(screen.contains("1 / 3"));
        assert!(screen.contains("Tag: dashcam"));
        assert!(screen.contains("Help"));
    }
}
