//! One server fetch per UI page.
//!
//! Cursors are learned as pages are visited: page N+1 becomes reachable only
//! after page N reported `hasNextPage`. Jumping to a page whose cursor has not
//! been learned yet is ignored rather than walking the connection.

use std::collections::HashMap;
use std::ops::Range;
use tracing::debug;

use crate::browse::strategy::{bounded, page_count, FetchPlan, Navigation, PageStrategy, StrategyKind};
use crate::content::{Cursor, Post, PostPage};

#[derive(Debug)]
pub struct FullRefetch {
    per_page: usize,
    /// UI page -> cursor to fetch it with; page 1 maps to `None`
    cursors: HashMap<usize, Option<Cursor>>,
    posts: Vec<Post>,
    total_items: usize,
}

impl FullRefetch {
    pub fn new(per_page: usize) -> Self {
        Self {
            per_page,
            cursors: HashMap::from([(1, None)]),
            posts: Vec::new(),
            total_items: 0,
        }
    }

    /// Whether the cursor needed for `page` is known
    #[cfg(test)]
    pub fn knows_page(&self, page: usize) -> bool {
        self.cursors.contains_key(&page)
    }
}

impl PageStrategy for FullRefetch {
    fn kind(&self) -> StrategyKind {
        StrategyKind::FullRefetch
    }

    fn reset(&mut self) -> FetchPlan {
        self.cursors = HashMap::from([(1, None)]);
        self.posts.clear();
        self.total_items = 0;

        FetchPlan {
            first: self.per_page,
            after: None,
            target_page: 1,
        }
    }

    fn plan(&self, _current: usize, target: usize) -> Navigation {
        match self.cursors.get(&target) {
            Some(cursor) => Navigation::Fetch(FetchPlan {
                first: self.per_page,
                after: cursor.clone(),
                target_page: target,
            }),
            None => {
                debug!("No cursor known for page {}, ignoring", target);
                Navigation::Ignore
            }
        }
    }

    fn absorb(&mut self, plan: &FetchPlan, page: PostPage) -> Option<FetchPlan> {
        if page.page_info.has_next_page {
            if let Some(cursor) = page.page_info.end_cursor {
                self.cursors.insert(plan.target_page + 1, Some(cursor));
            }
        }

        self.posts = page.posts;
        self.total_items = page.total_items;
        None
    }

    fn posts(&self) -> &[Post] {
        &self.posts
    }

    fn total_slides(&self, _filtered_len: usize) -> usize {
        page_count(self.total_items, self.per_page)
    }

    fn window(&self, _page: usize, filtered_len: usize) -> Range<usize> {
        // The resident posts are exactly the current page
        bounded(0, self.per_page, filtered_len)
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
    fn test_reset_requests_first_page() {
        let mut strategy = FullRefetch::new(10);
        let plan = strategy.reset();
        assert_eq!(plan, FetchPlan { first: 10, after: None, target_page: 1 });
        assert_eq!(strategy.total_slides(0), 1);
    }

    #[test]
    fn test_cursor_learned_only_after_has_next() {
        let mut strategy = FullRefetch::new(10);
        let plan = strategy.reset();

        assert_eq!(strategy.plan(1, 2), Navigation::Ignore);

        strategy.absorb(&plan, page(posts(0..10), 25, Some("c1"), true));
        assert_eq!(strategy.total_slides(10), 3);
        assert_eq!(
            strategy.plan(1, 2),
            Navigation::Fetch(FetchPlan { first: 10, after: Some("c1".into()), target_page: 2 })
        );
        // Page 3 is not reachable until page 2 has been seen
        assert_eq!(strategy.plan(1, 3), Navigation::Ignore);
    }

    #[test]
    fn test_posts_replaced_per_page() {
        let mut strategy = FullRefetch::new(10);
        let first = strategy.reset();
        strategy.absorb(&first, page(posts(0..10), 25, Some("c1"), true));

        let second = FetchPlan { first: 10, after: Some("c1".into()), target_page: 2 };
        strategy.absorb(&second, page(posts(10..20), 25, Some("c2"), true));

        assert_eq!(strategy.posts().len(), 10);
        assert_eq!(strategy.posts()[0].entity_id, 10);
        assert!(strategy.knows_page(3));

        let third = FetchPlan { first: 10, after: Some("c2".into()), target_page: 3 };
        strategy.absorb(&third, page(posts(20..25), 25, Some("c3"), false));
        assert!(!strategy.knows_page(4));
        assert_eq!(strategy.window(3, 5), 0..5);
    }

    #[test]
    fn test_backward_navigation_refetches_with_known_cursor() {
        let mut strategy = FullRefetch::new(10);
        let first = strategy.reset();
        strategy.absorb(&first, page(posts(0..10), 25, Some("c1"), true));

        assert_eq!(
            strategy.plan(2, 1),
            Navigation::Fetch(FetchPlan { first: 10, after: None, target_page: 1 })
        );
    }

    #[test]
    fn test_reset_forgets_cursors() {
        let mut strategy = FullRefetch::new(10);
        let first = strategy.reset();
        strategy.absorb(&first, page(posts(0..10), 25, Some("c1"), true));
        strategy.reset();

        assert!(!strategy.knows_page(2));
        assert!(strategy.posts().is_empty());
        assert_eq!(strategy.total_items(), 0);
    }
}
