//! GraphQL request construction and response decoding for the posts connection

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::content::{
    errors::{ContentError, ContentResult},
    types::{PageInfo, Post, PostPage, PostsQuery},
};

/// Posts connection query. User-supplied values travel only as variables.
pub const POSTS_QUERY: &str = r#"query BlogPosts($tag: String!, $first: Int!, $after: String) {
  site {
    content {
      blog {
        posts(filters: {tags: [$tag]}, first: $first, after: $after) {
          edges {
            node {
              name
              id
              path
              tags
              thumbnailImage {
                urlOriginal(lossy: false)
              }
              entityId
            }
            cursor
          }
          pageInfo {
            endCursor
            hasNextPage
            hasPreviousPage
            startCursor
          }
          collectionInfo {
            totalItems
          }
        }
      }
    }
  }
}"#;

/// Build the JSON request body for a posts query
pub fn request_body(query: &PostsQuery) -> serde_json::Value {
    json!({
        "query": POSTS_QUERY,
        "operationName": "BlogPosts",
        "variables": {
            "tag": query.tag,
            "first": query.first,
            "after": query.after,
        },
    })
}

/// Decode a response body into a page of posts
pub fn decode_response(body: &str) -> ContentResult<PostPage> {
    let envelope: GraphqlEnvelope = serde_json::from_str(body)?;
    envelope.into_page()
}

#[derive(Debug, Deserialize)]
struct GraphqlEnvelope {
    data: Option<GraphqlData>,
    #[serde(default)]
    errors: Vec<GraphqlErrorItem>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorItem {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GraphqlData {
    site: Option<SiteNode>,
}

#[derive(Debug, Deserialize)]
struct SiteNode {
    content: Option<ContentNode>,
}

#[derive(Debug, Deserialize)]
struct ContentNode {
    blog: Option<BlogNode>,
}

#[derive(Debug, Deserialize)]
struct BlogNode {
    posts: Option<PostsConnection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostsConnection {
    #[serde(default)]
    edges: Vec<PostEdge>,
    #[serde(default)]
    page_info: Option<RawPageInfo>,
    #[serde(default)]
    collection_info: Option<CollectionInfo>,
}

#[derive(Debug, Deserialize)]
struct PostEdge {
    node: PostNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostNode {
    #[serde(default)]
    id: String,
    #[serde(default)]
    entity_id: i64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    path: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    thumbnail_image: Option<ThumbnailImage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThumbnailImage {
    url_original: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPageInfo {
    end_cursor: Option<String>,
    #[serde(default)]
    has_next_page: bool,
    #[serde(default)]
    has_previous_page: bool,
    start_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CollectionInfo {
    total_items: Option<u64>,
}

impl GraphqlEnvelope {
    fn into_page(self) -> ContentResult<PostPage> {
        if !self.errors.is_empty() {
            let messages: Vec<String> = self.errors.into_iter().map(|e| e.message).collect();
            return Err(ContentError::Graphql(messages.join("; ")));
        }

        let posts = self
            .data
            .and_then(|d| d.site)
            .and_then(|s| s.content)
            .and_then(|c| c.blog)
            .and_then(|b| b.posts)
            .ok_or_else(|| ContentError::Shape("missing data.site.content.blog.posts".to_string()))?;

        let page_info = posts.page_info.unwrap_or_default();
        let total_items = posts
            .collection_info
            .and_then(|info| info.total_items)
            .unwrap_or(0) as usize;

        Ok(PostPage {
            posts: posts.edges.into_iter().map(|edge| edge.node.into()).collect(),
            page_info: PageInfo {
                end_cursor: page_info.end_cursor,
                has_next_page: page_info.has_next_page,
                has_previous_page: page_info.has_previous_page,
                start_cursor: page_info.start_cursor,
            },
            total_items,
        })
    }
}

impl From<PostNode> for Post {
    fn from(node: PostNode) -> Self {
        Post {
            id: node.id,
            entity_id: node.entity_id,
            name: node.name,
            path: node.path,
            tags: node.tags,
            thumbnail_url: node.thumbnail_image.and_then(|img| img.url_original),
        }
    }
}
