//! Sliding window over a growing buffer.
//!
//! Windows are `per_page` wide and advance by `per_page - 2`, so each page
//! repeats the last two posts of the previous one. The buffer is filled in
//! `batch` sized fetches and only ever appended to until the next reset.

use std::ops::Range;

use crate::browse::strategy::{bounded, FetchPlan, Navigation, PageStrategy, StrategyKind};
use crate::content::{Cursor, Post, PostPage};

/// Posts repeated from the previous window
pub const PEEK_BACK: usize = 2;

/// New posts revealed per step for `per_page` wide windows; 0 when too narrow
pub fn shift_for(per_page: usize) -> usize {
    per_page.saturating_sub(PEEK_BACK)
}

#[derive(Debug)]
pub struct SlidingWindow {
    per_page: usize,
    batch: usize,
    posts: Vec<Post>,
    total_items: usize,
    end_cursor: Option<Cursor>,
    has_next_page: bool,
}

impl SlidingWindow {
    pub fn new(per_page: usize, batch: usize) -> Self {
        Self {
            per_page,
            batch,
            posts: Vec::new(),
            total_items: 0,
            end_cursor: None,
            has_next_page: false,
        }
    }

    pub fn shift(&self) -> usize {
        shift_for(self.per_page).max(1)
    }

    fn offset(&self, page: usize) -> usize {
        page.saturating_sub(1) * self.shift()
    }

    /// Buffer length needed before `page` can be shown in full
    pub fn required_for(&self, page: usize) -> usize {
        self.offset(page) + self.per_page
    }

    fn next_fetch(&self, target_page: usize) -> Option<FetchPlan> {
        if self.posts.len() >= self.required_for(target_page) || !self.has_next_page {
            return None;
        }
        let cursor = self.end_cursor.clone()?;
        Some(FetchPlan {
            first: self.batch,
            after: Some(cursor),
            target_page,
        })
    }
}

impl PageStrategy for SlidingWindow {
    fn kind(&self) -> StrategyKind {
        StrategyKind::SlidingWindow
    }

    fn reset(&mut self) -> FetchPlan {
        self.posts.clear();
        self.total_items = 0;
        self.end_cursor = None;
        self.has_next_page = false;

        FetchPlan {
            first: self.batch,
            after: None,
            target_page: 1,
        }
    }

    fn plan(&self, current: usize, target: usize) -> Navigation {
        if target < current {
            return Navigation::Show(target);
        }
        match self.next_fetch(target) {
            Some(plan) => Navigation::Fetch(plan),
            None => Navigation::Show(target),
        }
    }

    fn absorb(&mut self, plan: &FetchPlan, page: PostPage) -> Option<FetchPlan> {
        let received = page.posts.len();
        self.posts.extend(page.posts);
        self.total_items = page.total_items;
        self.end_cursor = page.page_info.end_cursor;
        self.has_next_page = page.page_info.has_next_page;

        if received == 0 {
            return None;
        }
        self.next_fetch(plan.target_page)
    }

    fn posts(&self) -> &[Post] {
        &self.posts
    }

    fn total_slides(&self, _filtered_len: usize) -> usize {
        if self.total_items <= self.per_page {
            1
        } else {
            (self.total_items - self.per_page).div_ceil(self.shift()) + 1
        }
    }

    fn window(&self, page: usize, filtered_len: usize) -> Range<usize> {
        bounded(self.offset(page), self.per_page, filtered_len)
    }

    fn total_items(&self) -> usize {
        self.total_items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::types::fixtures::{page, posts};

    fn loaded(total: usize, count: usize, has_next: bool) -> SlidingWindow {
        let mut strategy = SlidingWindow::new(10, 20);
        let plan = strategy.reset();
        strategy.absorb(&plan, page(posts(0..count), total, Some("c1"), has_next));
        strategy
    }

    #[test]
    fn test_total_slides() {
        assert_eq!(loaded(3, 3, false).total_slides(3), 1);
        assert_eq!(loaded(10, 10, false).total_slides(10), 1);
        assert_eq!(loaded(25, 20, true).total_slides(20), 3);
        assert_eq!(loaded(26, 20, true).total_slides(20), 3);
        assert_eq!(loaded(27, 20, true).total_slides(20), 4);
    }

    #[test]
    fn test_windows_overlap_by_two() {
        let strategy = loaded(25, 20, true);
        assert_eq!(strategy.shift(), 8);
        assert_eq!(strategy.window(1, 20), 0..10);
        assert_eq!(strategy.window(2, 20), 8..18);
        assert_eq!(strategy.window(3, 25), 16..25);
    }

    #[test]
    fn test_forward_navigation_prefetches_when_short() {
        let strategy = loaded(40, 20, true);
        // Page 2 needs 18 posts, page 3 needs 26
        assert_eq!(strategy.plan(1, 2), Navigation::Show(2));
        assert_eq!(
            strategy.plan(2, 3),
            Navigation::Fetch(FetchPlan { first: 20, after: Some("c1".into()), target_page: 3 })
        );
    }

    #[test]
    fn test_no_prefetch_without_next_page() {
        let strategy = loaded(25, 20, false);
        assert_eq!(strategy.plan(2, 3), Navigation::Show(3));
    }

    #[test]
    fn test_backward_navigation_never_fetches() {
        let mut strategy = loaded(60, 20, true);
        strategy.posts.truncate(5);
        assert_eq!(strategy.plan(3, 2), Navigation::Show(2));
    }

    #[test]
    fn test_absorb_appends_and_chains_for_far_jumps() {
        let mut strategy = loaded(100, 20, true);
        let plan = match strategy.plan(1, 6) {
            Navigation::Fetch(plan) => plan,
            other => panic!("expected fetch, got {other:?}"),
        };

        // Page 6 needs 50 posts; 40 is not enough yet
        let follow_up = strategy.absorb(&plan, page(posts(20..40), 100, Some("c2"), true));
        assert_eq!(strategy.posts().len(), 40);
        assert_eq!(
            follow_up,
            Some(FetchPlan { first: 20, after: Some("c2".into()), target_page: 6 })
        );

        let done = strategy.absorb(&follow_up.unwrap(), page(posts(40..60), 100, Some("c3"), true));
        assert_eq!(done, None);
        assert_eq!(strategy.posts()[59].entity_id, 59);
    }

    #[test]
    fn test_empty_response_stops_chaining() {
        let mut strategy = loaded(100, 20, true);
        let plan = FetchPlan { first: 20, after: Some("c1".into()), target_page: 6 };
        assert_eq!(strategy.absorb(&plan, page(Vec::new(), 100, Some("c1"), true)), None);
    }
}
