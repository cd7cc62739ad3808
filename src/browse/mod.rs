//! Blog browsing state machine
//!
//! This module reconciles the cursor-paginated posts connection with the
//! page-numbered grid: it owns the active tag, the search query, the current
//! page and the bookkeeping for in-flight requests. It performs no I/O itself.
//! Operations that need server data return a [`FetchRequest`]; the driver runs
//! it and hands the result back through [`BlogBrowser::complete_fetch`].

pub mod full_refetch;
pub mod local_only;
pub mod search;
pub mod sliding_window;
pub mod strategy;

pub use search::{filter_posts, SearchState};
pub use strategy::{strategy_for, FetchPlan, Navigation, PageStrategy, StrategyKind};

use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::content::{ContentClient, ContentResult, Post, PostPage, PostsQuery};

/// Identifies one request. Responses carrying any other token are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    /// Bumped on every tag change, restart and unmount
    pub generation: u64,
    pub request_id: u64,
}

/// A fetch the driver must perform on behalf of the browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub token: RequestToken,
    pub query: PostsQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchPurpose {
    /// Initial load for a tag, including drain follow-ups
    Load,
    /// Data needed before switching to another page
    Navigate,
}

#[derive(Debug, Clone)]
struct InFlight {
    token: RequestToken,
    plan: FetchPlan,
    purpose: FetchPurpose,
}

/// The last fetch that failed, kept so it can be retried
#[derive(Debug, Clone)]
pub struct FetchFailure {
    pub kind: &'static str,
    pub message: String,
    plan: FetchPlan,
    purpose: FetchPurpose,
}

/// What the grid should display
#[derive(Debug, PartialEq)]
pub enum GridView<'a> {
    Loading,
    Empty,
    Posts(Vec<&'a Post>),
}

#[derive(Debug)]
pub struct BlogBrowser {
    default_tag: String,
    active_tag: String,
    current_page: usize,
    search: SearchState,
    strategy: Box<dyn PageStrategy>,
    generation: u64,
    next_request_id: u64,
    in_flight: Option<InFlight>,
    last_error: Option<FetchFailure>,
    mounted: bool,
}

impl BlogBrowser {
    pub fn new(config: &Config, strategy: Box<dyn PageStrategy>) -> Self {
        Self {
            default_tag: config.default_tag().to_string(),
            active_tag: config.default_tag().to_string(),
            current_page: 1,
            search: SearchState::new(Duration::from_millis(config.search_debounce_ms)),
            strategy,
            generation: 0,
            next_request_id: 0,
            in_flight: None,
            last_error: None,
            mounted: false,
        }
    }

    /// Create a browser using the strategy selected in `config`
    pub fn from_config(config: &Config) -> Self {
        Self::new(config, strategy_for(config))
    }

    /// Start browsing the default tag
    pub fn mount(&mut self) -> FetchRequest {
        self.mounted = true;
        let tag = self.default_tag.clone();
        self.load_tag(tag)
    }

    /// Stop browsing: cancel the debounce timer and orphan in-flight requests
    pub fn unmount(&mut self) {
        debug!("Unmounting browser");
        self.mounted = false;
        self.search.cancel_pending();
        self.generation += 1;
        self.in_flight = None;
    }

    /// Switch to `tag`, discarding all loaded posts, cursors and search state
    pub fn select_tag(&mut self, tag: &str) -> Option<FetchRequest> {
        if self.mounted && tag == self.active_tag {
            debug!("Tag '{}' already active", tag);
            self.search.clear();
            return self.return_to_first_page();
        }
        self.mounted = true;
        Some(self.load_tag(tag.to_string()))
    }

    /// Return to the default tag with a fresh first page
    pub fn restart(&mut self) -> FetchRequest {
        info!("Restarting browser");
        self.mounted = true;
        let tag = self.default_tag.clone();
        self.load_tag(tag)
    }

    fn load_tag(&mut self, tag: String) -> FetchRequest {
        info!("Loading tag '{}' ({})", tag, self.strategy.kind());
        self.generation += 1;
        self.active_tag = tag;
        self.search.clear();
        self.current_page = 1;
        self.last_error = None;
        let plan = self.strategy.reset();
        self.issue(plan, FetchPurpose::Load)
    }

    fn issue(&mut self, plan: FetchPlan, purpose: FetchPurpose) -> FetchRequest {
        self.next_request_id += 1;
        let token = RequestToken {
            generation: self.generation,
            request_id: self.next_request_id,
        };
        let query = match &plan.after {
            Some(cursor) => PostsQuery::after(self.active_tag.as_str(), plan.first, cursor.clone()),
            None => PostsQuery::first_page(self.active_tag.as_str(), plan.first),
        };
        debug!(
            "Issuing request {} for page {} (first={}, after={:?})",
            token.request_id, plan.target_page, plan.first, plan.after
        );
        self.in_flight = Some(InFlight { token, plan, purpose });
        FetchRequest { token, query }
    }

    /// Apply a finished request. May return a follow-up request.
    pub fn complete_fetch(
        &mut self,
        token: RequestToken,
        result: ContentResult<PostPage>,
    ) -> Option<FetchRequest> {
        let flight = match self.in_flight.take() {
            Some(flight) if flight.token == token => flight,
            other => {
                if token.generation != self.generation {
                    warn!(
                        "Discarding response {} from generation {} (now {})",
                        token.request_id, token.generation, self.generation
                    );
                } else {
                    warn!("Discarding superseded response {}", token.request_id);
                }
                self.in_flight = other;
                return None;
            }
        };

        match result {
            Ok(page) => {
                self.last_error = None;
                if let Some(next) = self.strategy.absorb(&flight.plan, page) {
                    return Some(self.issue(next, flight.purpose));
                }
                if flight.purpose == FetchPurpose::Navigate {
                    self.current_page = flight.plan.target_page;
                }
            }
            Err(e) => {
                warn!("Fetch for tag '{}' failed: {}", self.active_tag, e);
                self.last_error = Some(FetchFailure {
                    kind: e.kind(),
                    message: e.to_string(),
                    plan: flight.plan,
                    purpose: flight.purpose,
                });
            }
        }

        self.clamp_page();
        None
    }

    /// Re-issue the last failed request
    pub fn retry(&mut self) -> Option<FetchRequest> {
        if self.in_flight.is_some() {
            return None;
        }
        let failure = self.last_error.take()?;
        info!("Retrying failed {} request", failure.kind);
        Some(self.issue(failure.plan, failure.purpose))
    }

    /// Record a keystroke in the search box
    pub fn set_search_input(&mut self, input: impl Into<String>, now: Instant) {
        self.search.set_input(input, now);
    }

    /// Apply the search input now (Enter or the search button)
    pub fn submit_search(&mut self) {
        self.search.submit();
        self.on_query_committed();
    }

    /// Advance timers. Returns true when the debounced search was committed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let committed = self.search.poll(now);
        if committed {
            self.on_query_committed();
        }
        committed
    }

    /// Filtering only narrows resident posts. Page 1 is shown when it is
    /// already loaded; otherwise the current page is filtered in place.
    fn on_query_committed(&mut self) {
        self.drop_pending_navigation();
        if self.current_page != 1 {
            match self.strategy.plan(self.current_page, 1) {
                Navigation::Show(page) => self.current_page = page,
                Navigation::Fetch(_) | Navigation::Ignore => {
                    debug!("Page 1 not resident, filtering page {} in place", self.current_page);
                }
            }
        }
        self.clamp_page();
    }

    fn drop_pending_navigation(&mut self) {
        if matches!(&self.in_flight, Some(f) if f.purpose == FetchPurpose::Navigate) {
            debug!("Dropping pending page fetch");
            self.in_flight = None;
        }
    }

    /// Show page 1, superseding any page fetch still in flight
    fn return_to_first_page(&mut self) -> Option<FetchRequest> {
        self.drop_pending_navigation();
        if self.current_page == 1 {
            return None;
        }
        self.navigate(1)
    }

    /// Request page `target`. Out-of-range, current-page and mid-fetch
    /// requests are ignored.
    pub fn go_to_page(&mut self, target: usize) -> Option<FetchRequest> {
        if !self.mounted {
            return None;
        }
        if self.in_flight.is_some() {
            debug!("Fetch in flight, ignoring request for page {}", target);
            return None;
        }
        if target < 1 || target > self.total_slides() || target == self.current_page {
            return None;
        }
        self.navigate(target)
    }

    pub fn next_page(&mut self) -> Option<FetchRequest> {
        self.go_to_page(self.current_page + 1)
    }

    pub fn prev_page(&mut self) -> Option<FetchRequest> {
        self.go_to_page(self.current_page.saturating_sub(1))
    }

    fn navigate(&mut self, target: usize) -> Option<FetchRequest> {
        match self.strategy.plan(self.current_page, target) {
            Navigation::Ignore => None,
            Navigation::Show(page) => {
                debug!("Page {} -> {}", self.current_page, page);
                self.current_page = page;
                None
            }
            Navigation::Fetch(plan) => Some(self.issue(plan, FetchPurpose::Navigate)),
        }
    }

    fn clamp_page(&mut self) {
        let total = self.total_slides();
        if self.current_page > total {
            debug!("Clamping page {} to {}", self.current_page, total);
            self.current_page = total;
        }
        self.current_page = self.current_page.max(1);
    }

    /// Loaded posts surviving the committed search
    pub fn filtered_posts(&self) -> Vec<&Post> {
        filter_posts(self.strategy.posts(), self.search.query())
    }

    /// Posts in the current window
    pub fn visible_posts(&self) -> Vec<&Post> {
        let filtered = self.filtered_posts();
        let range = self.strategy.window(self.current_page, filtered.len());
        filtered[range].to_vec()
    }

    pub fn view(&self) -> GridView<'_> {
        if self.is_loading() {
            return GridView::Loading;
        }
        let visible = self.visible_posts();
        if visible.is_empty() {
            GridView::Empty
        } else {
            GridView::Posts(visible)
        }
    }

    pub fn total_slides(&self) -> usize {
        self.strategy.total_slides(self.filtered_posts().len())
    }

    /// Page controls are hidden when everything fits on one page
    pub fn show_pagination(&self) -> bool {
        self.total_slides() > 1
    }

    pub fn can_go_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.current_page < self.total_slides()
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn active_tag(&self) -> &str {
        &self.active_tag
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn last_error(&self) -> Option<&FetchFailure> {
        self.last_error.as_ref()
    }

    pub fn strategy_kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    pub fn total_items(&self) -> usize {
        self.strategy.total_items()
    }

    pub fn loaded_count(&self) -> usize {
        self.strategy.posts().len()
    }
}

/// Run `request` and any follow-ups to completion against `client`
pub async fn settle(
    browser: &mut BlogBrowser,
    client: &dyn ContentClient,
    mut request: Option<FetchRequest>,
) {
    while let Some(req) = request.take() {
        let result = client.fetch_page(&req.query).await;
        request = browser.complete_fetch(req.token, result);
    }
}
