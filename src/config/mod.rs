use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::browse::{sliding_window, StrategyKind};

/// A filter tab: the tag sent to the API and the label shown to the visitor
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    pub tag: String,
    pub label: String,
}

impl Tab {
    pub fn new(tag: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            label: label.into(),
        }
    }
}

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GraphQL endpoint receiving POST requests
    pub endpoint: String,

    /// Storefront bearer token
    pub token: Option<String>,

    /// Number of posts visible at once
    pub posts_per_page: usize,

    /// Batch size for sliding-window fetches, a multiple of `posts_per_page`
    pub posts_display_count: usize,

    /// Batch size used while draining a tag for local-only pagination
    pub local_batch_size: usize,

    /// Ordered filter tabs; the first one is the default
    pub tabs: Vec<Tab>,

    /// Heading shown above the tabs
    pub title: String,

    /// Line shown under the heading
    pub subtitle: String,

    /// Pagination strategy
    pub strategy: StrategyKind,

    /// Delay between the last keystroke and the search being applied
    pub search_debounce_ms: u64,

    /// HTTP request timeout
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3000/graphql".to_string(),
            token: None,
            posts_per_page: 10,
            posts_display_count: 20,
            local_batch_size: 50,
            tabs: Vec::new(),
            title: "Choose your Dash Cam".to_string(),
            subtitle: "You can find your Dash Cam model below".to_string(),
            strategy: StrategyKind::SlidingWindow,
            search_debounce_ms: 300,
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Initialize configuration from file and environment.
    ///
    /// An explicit `path` must exist; otherwise the usual locations are searched.
    pub async fn init(path: Option<&Path>) -> Result<Self> {
        debug!("Initializing configuration");

        let mut config = match path {
            Some(path) => Self::load_from_path(path).await?,
            None => Self::load_from_file().await.unwrap_or_default(),
        };

        config.load_from_env();

        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(endpoint) = var("BLOG_GRID_ENDPOINT") {
            self.endpoint = endpoint;
        }

        if let Some(token) = var("BLOG_GRID_TOKEN") {
            self.token = Some(token);
        }

        if let Some(per_page) = var("BLOG_GRID_POSTS_PER_PAGE").and_then(|v| v.parse().ok()) {
            self.posts_per_page = per_page;
        }

        if let Some(count) = var("BLOG_GRID_POSTS_DISPLAY_COUNT").and_then(|v| v.parse().ok()) {
            self.posts_display_count = count;
        }

        if let Some(strategy) = var("BLOG_GRID_STRATEGY").and_then(|v| v.parse().ok()) {
            self.strategy = strategy;
        }

        if let Some(tabs) = var("BLOG_GRID_TABS") {
            self.tabs = parse_tabs(&tabs);
        }
    }

    /// Load configuration from the first blog-grid.json found
    pub async fn load_from_file() -> Result<Self> {
        let mut config_paths = vec![
            PathBuf::from("./.blog-grid.json"),
            PathBuf::from("./blog-grid.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            config_paths.push(config_dir.join("blog-grid").join("blog-grid.json"));
        }

        for path in config_paths {
            if path.exists() {
                return Self::load_from_path(&path).await;
            }
        }

        Err(anyhow::anyhow!("No configuration file found"))
    }

    async fn load_from_path(path: &Path) -> Result<Self> {
        debug!("Loading configuration from: {}", path.display());
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Tag selected on mount and on restart
    pub fn default_tag(&self) -> &str {
        self.tabs.first().map(|t| t.tag.as_str()).unwrap_or("")
    }

    /// Number of new posts revealed by each sliding-window step
    pub fn shift_count(&self) -> usize {
        sliding_window::shift_for(self.posts_per_page)
    }

    /// Directory for log files
    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("blog-grid")
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(anyhow::anyhow!("endpoint is required"));
        }

        if self.posts_per_page == 0 {
            return Err(anyhow::anyhow!("posts_per_page must be greater than 0"));
        }

        if self.strategy == StrategyKind::SlidingWindow && self.shift_count() == 0 {
            return Err(anyhow::anyhow!(
                "posts_per_page must be greater than 2 for the sliding window strategy"
            ));
        }

        if self.posts_display_count == 0 || self.posts_display_count % self.posts_per_page != 0 {
            return Err(anyhow::anyhow!(
                "posts_display_count ({}) must be a positive multiple of posts_per_page ({})",
                self.posts_display_count,
                self.posts_per_page
            ));
        }

        if self.local_batch_size == 0 {
            return Err(anyhow::anyhow!("local_batch_size must be greater than 0"));
        }

        Ok(())
    }
}

/// Parse `tag:Label,tag2:Label2`. A bare `tag` uses itself as the label.
pub fn parse_tabs(value: &str) -> Vec<Tab> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once(':') {
            Some((tag, label)) => Tab::new(tag.trim(), label.trim()),
            None => Tab::new(entry, entry),
        })
        .collect()
}
