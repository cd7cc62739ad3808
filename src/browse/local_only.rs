//! Local pagination: drain the tag once, then slice in memory.

use std::ops::Range;

use crate::browse::strategy::{bounded, page_count, FetchPlan, Navigation, PageStrategy, StrategyKind};
use crate::content::{Post, PostPage};

#[derive(Debug)]
pub struct LocalOnly {
    per_page: usize,
    batch: usize,
    posts: Vec<Post>,
    total_items: usize,
}

impl LocalOnly {
    pub fn new(per_page: usize, batch: usize) -> Self {
        Self {
            per_page,
            batch,
            posts: Vec::new(),
            total_items: 0,
        }
    }
}

impl PageStrategy for LocalOnly {
    fn kind(&self) -> StrategyKind {
        StrategyKind::LocalOnly
    }

    fn reset(&mut self) -> FetchPlan {
        self.posts.clear();
        self.total_items = 0;

        FetchPlan {
            first: self.batch,
            after: None,
            target_page: 1,
        }
    }

    fn plan(&self, _current: usize, target: usize) -> Navigation {
        Navigation::Show(target)
    }

    fn absorb(&mut self, plan: &FetchPlan, page: PostPage) -> Option<FetchPlan> {
        let received = page.posts.len();
        self.posts.extend(page.posts);
        self.total_items = page.total_items;

        match page.page_info.end_cursor {
            Some(cursor) if page.page_info.has_next_page && received > 0 => Some(FetchPlan {
                first: self.batch,
                after: Some(cursor),
                target_page: plan.target_page,
            }),
            _ => None,
        }
    }

    fn posts(&self) -> &[Post] {
        &self.posts
    }

    fn total_slides(&self, filtered_len: usize) -> usize {
        page_count(filtered_len, self.per_page)
    }

    fn window(&self, page: usize, filtered_len: usize) -> Range<usize> {
        bounded(page.saturating_sub(1) * self.per_page, self.per_page, filtered_len)
    }

    fn total_items(&self) -> usize {
        self.total_items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::types::fixtures::{page, posts};

    #[test]
    fn test_drains_until_no_next_page() {
        let mut strategy = LocalOnly::new(10, 50);
        let plan = strategy.reset();
        assert_eq!(plan.first, 50);

        let next = strategy.absorb(&plan, page(posts(0..50), 70, Some("c1"), true)).unwrap();
        assert_eq!(next.after.as_deref(), Some("c1"));

        assert_eq!(strategy.absorb(&next, page(posts(50..70), 70, Some("c2"), false)), None);
        assert_eq!(strategy.posts().len(), 70);
        assert_eq!(strategy.total_slides(70), 7);
    }

    #[test]
    fn test_slices_are_disjoint() {
        let strategy = LocalOnly::new(10, 50);
        assert_eq!(strategy.window(1, 25), 0..10);
        assert_eq!(strategy.window(2, 25), 10..20);
        assert_eq!(strategy.window(3, 25), 20..25);
    }

    #[test]
    fn test_total_follows_filtered_count() {
        let strategy = LocalOnly::new(10, 50);
        assert_eq!(strategy.total_slides(0), 1);
        assert_eq!(strategy.total_slides(11), 2);
    }

    #[test]
    fn test_navigation_never_fetches() {
        let strategy = LocalOnly::new(10, 50);
        assert_eq!(strategy.plan(1, 3), Navigation::Show(3));
    }
}
