//! Strategy trait and factory for pagination policies

use serde::{Deserialize, Serialize};
use std::{fmt, ops::Range, str::FromStr};

use crate::browse::{
    full_refetch::FullRefetch, local_only::LocalOnly, sliding_window::SlidingWindow,
};
use crate::config::Config;
use crate::content::{Cursor, Post, PostPage};

/// Selectable pagination policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// One server fetch per UI page, cursors remembered per page
    FullRefetch,
    /// Overlapping windows over a growing buffer, prefetching ahead
    #[default]
    SlidingWindow,
    /// Everything fetched up front, pages sliced locally
    LocalOnly,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::FullRefetch => "full_refetch",
            StrategyKind::SlidingWindow => "sliding_window",
            StrategyKind::LocalOnly => "local_only",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "full_refetch" | "full" => Ok(StrategyKind::FullRefetch),
            "sliding_window" | "sliding" => Ok(StrategyKind::SlidingWindow),
            "local_only" | "local" => Ok(StrategyKind::LocalOnly),
            other => Err(format!("Unknown pagination strategy: {}", other)),
        }
    }
}

/// A server fetch a strategy needs before `target_page` can be shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan {
    pub first: usize,
    pub after: Option<Cursor>,
    pub target_page: usize,
}

/// Outcome of planning a page change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// The page cannot be reached from the current state
    Ignore,
    /// Data is resident; switch immediately
    Show(usize),
    /// Fetch first, switch once the response lands
    Fetch(FetchPlan),
}

/// Trait for pagination policies.
///
/// A strategy owns the loaded posts and any cursor state. The browser owns
/// the current page, the search query, and request bookkeeping.
pub trait PageStrategy: Send + Sync + fmt::Debug {
    fn kind(&self) -> StrategyKind;

    /// Discard all loaded posts and cursors, returning the first fetch to issue
    fn reset(&mut self) -> FetchPlan;

    /// Decide how to move from `current` to `target`.
    ///
    /// Callers have already checked that `target` is in range and differs
    /// from `current`.
    fn plan(&self, current: usize, target: usize) -> Navigation;

    /// Merge a successful response. Returns a follow-up fetch when the plan's
    /// target still lacks data and the server reports more.
    fn absorb(&mut self, plan: &FetchPlan, page: PostPage) -> Option<FetchPlan>;

    /// Posts currently resident, in server order
    fn posts(&self) -> &[Post];

    /// Number of UI pages given how many posts survive the search filter
    fn total_slides(&self, filtered_len: usize) -> usize;

    /// Slice of the filtered posts visible on `page`
    fn window(&self, page: usize, filtered_len: usize) -> Range<usize>;

    /// Total reported by the server for the active tag
    fn total_items(&self) -> usize;
}

/// Create the strategy selected by `config`
pub fn strategy_for(config: &Config) -> Box<dyn PageStrategy> {
    match config.strategy {
        StrategyKind::FullRefetch => Box::new(FullRefetch::new(config.posts_per_page)),
        StrategyKind::SlidingWindow => Box::new(SlidingWindow::new(
            config.posts_per_page,
            config.posts_display_count,
        )),
        StrategyKind::LocalOnly => Box::new(LocalOnly::new(
            config.posts_per_page,
            config.local_batch_size,
        )),
    }
}

/// `max(1, ceil(count / per_page))`
pub(crate) fn page_count(count: usize, per_page: usize) -> usize {
    count.div_ceil(per_page.max(1)).max(1)
}

/// Clamp `start..start + len` to `0..limit`
pub(crate) fn bounded(start: usize, len: usize, limit: usize) -> Range<usize> {
    let start = start.min(limit);
    start..(start + len).min(limit)
}
