//! Content client trait and the GraphQL-over-HTTP implementation

use async_trait::async_trait;
use reqwest::{Client, header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE}};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;
use crate::content::{
    errors::{ContentError, ContentResult},
    query::{decode_response, request_body},
    types::{PostPage, PostsQuery},
};

/// Trait for sources of blog posts
#[async_trait]
pub trait ContentClient: Send + Sync {
    /// Fetch one page of posts. Performs exactly one request; no cache, no retry.
    async fn fetch_page(&self, query: &PostsQuery) -> ContentResult<PostPage>;

    /// Fail-soft variant: any failure is logged and collapsed into an empty page
    async fn fetch_page_or_empty(&self, query: &PostsQuery) -> PostPage {
        match self.fetch_page(query).await {
            Ok(page) => page,
            Err(e) => {
                warn!("Error fetching blog posts for tag '{}': {}", query.tag, e);
                PostPage::empty()
            }
        }
    }
}

/// Content API client speaking GraphQL over HTTP POST
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    client: Client,
    endpoint: String,
}

impl GraphqlClient {
    /// Create a new client for `endpoint`, authenticating with `token` when present
    pub fn new(endpoint: &str, token: Option<&str>, timeout: Duration) -> ContentResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = token.filter(|t| !t.is_empty()) {
            let auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ContentError::Config(format!("Invalid token: {}", e)))?;
            headers.insert(AUTHORIZATION, auth_value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .user_agent(concat!("blog-grid/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ContentError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> ContentResult<Self> {
        Self::new(
            &config.endpoint,
            config.token.as_deref(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ContentClient for GraphqlClient {
    async fn fetch_page(&self, query: &PostsQuery) -> ContentResult<PostPage> {
        debug!(
            "Fetching posts tag='{}' first={} after={:?}",
            query.tag, query.first, query.after
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request_body(query))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ContentError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let page = decode_response(&body)?;
        debug!(
            "Fetched {} posts (total {}, has_next={})",
            page.posts.len(),
            page.total_items,
            page.page_info.has_next_page
        );
        Ok(page)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Scripted client returning queued responses and recording every query
    #[derive(Default)]
    pub struct ScriptedClient {
        responses: Mutex<VecDeque<ContentResult<PostPage>>>,
        pub queries: Mutex<Vec<PostsQuery>>,
    }

    impl ScriptedClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push(&self, response: ContentResult<PostPage>) {
            self.responses.lock().unwrap().push_back(response);
        }

        pub fn calls(&self) -> usize {
            self.queries.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ContentClient for ScriptedClient {
        async fn fetch_page(&self, query: &PostsQuery) -> ContentResult<PostPage> {
            self.queries.lock().unwrap().push(query.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(PostPage::empty()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve a single canned HTTP response and hand back the raw request
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request);
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|l| {
                            let lower = l.to_ascii_lowercase();
                            lower.strip_prefix("content-length:").map(|v| v.trim().parse::<usize>().unwrap())
                        })
                        .unwrap_or(0);
                    if request.len() >= header_end + 4 + content_length {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            let response = format!(
                "{}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            String::from_utf8_lossy(&request).to_string()
        });

        (format!("http://{}/graphql", addr), handle)
    }

    #[tokio::test]
    async fn test_fetch_page_sends_bearer_and_variables() {
        let body = r#"{"data":{"site":{"content":{"blog":{"posts":{"edges":[],"pageInfo":{"hasNextPage":false},"collectionInfo":{"totalItems":0}}}}}}}"#;
        let (endpoint, server) = serve_once("HTTP/1.1 200 OK", body).await;

        let client = GraphqlClient::new(&endpoint, Some("secret"), Duration::from_secs(5)).unwrap();
        let page = client.fetch_page(&PostsQuery::first_page("dashcam", 10)).await.unwrap();
        assert!(page.is_empty());

        let request = server.await.unwrap();
        let lower = request.to_ascii_lowercase();
        assert!(request.starts_with("POST /graphql"));
        assert!(lower.contains("authorization: bearer secret"));
        assert!(lower.contains("content-type: application/json"));
        assert!(request.contains(r#""tag":"dashcam""#));
    }

    #[tokio::test]
    async fn test_non_success_status_is_typed_error() {
        let (endpoint, server) = serve_once("HTTP/1.1 500 Internal Server Error", r#"{"error":"boom"}"#).await;

        let client = GraphqlClient::new(&endpoint, None, Duration::from_secs(5)).unwrap();
        let err = client.fetch_page(&PostsQuery::first_page("dashcam", 10)).await.unwrap_err();
        server.await.unwrap();

        match err {
            ContentError::Status { status, .. } => assert_eq!(status, 500),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_network_failure_collapses_to_empty_page() {
        // Bind then drop to obtain a port nobody listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = GraphqlClient::new(&format!("http://{}/graphql", addr), None, Duration::from_secs(2)).unwrap();
        let query = PostsQuery::first_page("dashcam", 10);

        assert!(matches!(client.fetch_page(&query).await, Err(ContentError::Transport(_))));
        assert_eq!(client.fetch_page_or_empty(&query).await, PostPage::empty());
    }

    #[test]
    fn test_invalid_token_is_config_error() {
        let err = GraphqlClient::new("http://localhost/graphql", Some("bad\ntoken"), Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ContentError::Config(_)));
    }
}
