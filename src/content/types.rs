//! Common types for the blog content API

use serde::{Deserialize, Serialize};

/// Opaque server-issued position marker in a posts connection
pub type Cursor = String;

/// A blog post as returned by the content API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub entity_id: i64,
    pub name: String,
    pub path: String,
    pub tags: Vec<String>,
    pub thumbnail_url: Option<String>,
}

impl Post {
    /// Key used to identify the post in rendered lists.
    ///
    /// Falls back to the numeric entity id when the node id is missing.
    pub fn key(&self) -> String {
        if self.id.is_empty() {
            self.entity_id.to_string()
        } else {
            self.id.clone()
        }
    }

    /// Short title shown on cards: the first word of the post name
    pub fn card_title(&self) -> &str {
        self.name.split(' ').next().unwrap_or_default()
    }

    /// Whether the post name contains `needle`, ignoring case.
    ///
    /// `needle` is expected to be lowercased already.
    pub fn name_matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
    }
}

/// Position of the last fetched server page within the connection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub end_cursor: Option<Cursor>,
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<Cursor>,
}

/// One server page of posts plus pagination metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub page_info: PageInfo,
    pub total_items: usize,
}

impl PostPage {
    /// The fail-soft result: no posts, no cursors, zero total
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

/// Arguments for a single posts request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostsQuery {
    /// Tag filter, passed verbatim as a query variable
    pub tag: String,
    /// Number of posts to request
    pub first: usize,
    /// Cursor to continue after; `None` requests the first page
    pub after: Option<Cursor>,
}

impl PostsQuery {
    pub fn first_page(tag: impl Into<String>, first: usize) -> Self {
        Self {
            tag: tag.into(),
            first,
            after: None,
        }
    }

    pub fn after(tag: impl Into<String>, first: usize, cursor: Cursor) -> Self {
        Self {
            tag: tag.into(),
            first,
            after: Some(cursor),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn post(n: usize, name: &str) -> Post {
        Post {
            id: format!("post-{}", n),
            entity_id: n as i64,
            name: name.to_string(),
            path: format!("/blog/{}/", n),
            tags: vec!["dashcam".to_string()],
            thumbnail_url: None,
        }
    }

    pub fn posts(range: std::ops::Range<usize>) -> Vec<Post> {
        range.map(|n| post(n, &format!("Post {}", n))).collect()
    }

    pub fn page(posts: Vec<Post>, total_items: usize, end_cursor: Option<&str>, has_next: bool) -> PostPage {
        PostPage {
            posts,
            page_info: PageInfo {
                end_cursor: end_cursor.map(str::to_string),
                has_next_page: has_next,
                has_previous_page: false,
                start_cursor: None,
            },
            total_items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::post;
    use super::*;

    #[test]
    fn test_key_falls_back_to_entity_id() {
        let mut p = post(42, "Choose your device");
        assert_eq!(p.key(), "post-42");

        p.id.clear();
        assert_eq!(p.key(), "42");
    }

    #[test]
    fn test_card_title_is_first_word() {
        assert_eq!(post(1, "S90 Dashcam support").card_title(), "S90");
        assert_eq!(post(2, "").card_title(), "");
    }

    #[test]
    fn test_name_matches_ignores_case() {
        let p = post(1, "Wireless CarPlay Adapter");
        assert!(p.name_matches("carplay"));
        assert!(!p.name_matches("dashcam"));
    }
}
