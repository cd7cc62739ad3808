//! Debounced, case-insensitive title search over loaded posts

use std::time::{Duration, Instant};
use tracing::debug;

use crate::content::Post;

/// Single outstanding timer; rescheduling replaces the previous deadline
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Consume the timer if its deadline has passed
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Live input plus the committed query that actually filters
#[derive(Debug, Clone)]
pub struct SearchState {
    input: String,
    query: String,
    debounce: Debouncer,
}

impl SearchState {
    pub fn new(delay: Duration) -> Self {
        Self {
            input: String::new(),
            query: String::new(),
            debounce: Debouncer::new(delay),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_pending(&self) -> bool {
        self.debounce.is_pending()
    }

    /// Record a keystroke and restart the debounce timer
    pub fn set_input(&mut self, input: impl Into<String>, now: Instant) {
        self.input = input.into();
        self.debounce.schedule(now);
    }

    /// Commit the input immediately, cancelling any pending timer
    pub fn submit(&mut self) {
        self.debounce.cancel();
        self.commit();
    }

    /// Commit the input if the debounce deadline has passed
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.debounce.fire_if_due(now) {
            self.commit();
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.debounce.cancel();
        self.input.clear();
        self.query.clear();
    }

    pub fn cancel_pending(&mut self) {
        self.debounce.cancel();
    }

    fn commit(&mut self) {
        debug!("Search query committed: '{}'", self.input);
        self.query = self.input.clone();
    }
}

/// Posts whose name contains `query`, ignoring case. Blank queries keep everything.
pub fn filter_posts<'a>(posts: &'a [Post], query: &str) -> Vec<&'a Post> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return posts.iter().collect();
    }
    posts.iter().filter(|post| post.name_matches(&needle)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::types::fixtures::post;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn sample() -> Vec<Post> {
        vec![
            post(1, "S90 Dashcam Setup"),
            post(2, "Wireless CarPlay FAQ"),
            post(3, "T2 DASHCAM firmware"),
        ]
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let posts = sample();
        let names: Vec<_> = filter_posts(&posts, "dashcam").iter().map(|p| p.entity_id).collect();
        assert_eq!(names, vec![1, 3]);
    }

    #[test]
    fn test_blank_query_keeps_everything() {
        let posts = sample();
        assert_eq!(filter_posts(&posts, "").len(), 3);
        assert_eq!(filter_posts(&posts, "   ").len(), 3);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let posts = sample();
        let once: Vec<Post> = filter_posts(&posts, "CAM").into_iter().cloned().collect();
        let twice: Vec<Post> = filter_posts(&once, "CAM").into_iter().cloned().collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_debounce_commits_after_delay() {
        let start = Instant::now();
        let mut search = SearchState::new(ms(300));

        search.set_input("d", start);
        search.set_input("da", start + ms(100));
        assert!(!search.poll(start + ms(300)));
        assert_eq!(search.query(), "");

        assert!(search.poll(start + ms(400)));
        assert_eq!(search.query(), "da");
        assert!(!search.is_pending());
    }

    #[test]
    fn test_submit_applies_immediately_and_cancels_timer() {
        let start = Instant::now();
        let mut search = SearchState::new(ms(300));

        search.set_input("carplay", start);
        search.submit();
        assert_eq!(search.query(), "carplay");
        assert!(!search.is_pending());
        assert!(!search.poll(start + ms(300)));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut search = SearchState::new(ms(300));
        search.set_input("x", Instant::now());
        search.submit();
        search.set_input("xy", Instant::now());
        search.clear();

        assert_eq!(search.input(), "");
        assert_eq!(search.query(), "");
        assert!(!search.is_pending());
    }
}
