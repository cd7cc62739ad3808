use anyhow::{anyhow, Context, Result};
use clap::Args;
use futures::future::join_all;
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::browse::{settle, BlogBrowser};
use crate::config::Config;
use crate::content::{ContentClient, Post, PostsQuery};

/// Print a page of posts non-interactively
#[derive(Args)]
pub struct ListCommand {
    /// Tag to filter by; defaults to the first configured tab
    #[arg(short = 't', long = "tag")]
    pub tag: Option<String>,

    /// Page to print, starting at 1
    #[arg(short = 'p', long = "page", default_value_t = 1)]
    pub page: usize,

    /// Only show posts whose name contains this text
    #[arg(long = "search")]
    pub search: Option<String>,

    /// Print JSON instead of text
    #[arg(long = "json")]
    pub json: bool,

    /// Print the number of posts under every configured tab instead
    #[arg(long = "summary", conflicts_with_all = ["tag", "page", "search"])]
    pub summary: bool,
}

/// One printed page
#[derive(Debug, Serialize)]
pub struct ListOutput<'a> {
    pub tag: &'a str,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub search: &'a str,
    pub posts: Vec<&'a Post>,
}

/// Post count under one tab
#[derive(Debug, Serialize, PartialEq)]
pub struct TabSummary {
    pub tag: String,
    pub label: String,
    pub total_items: usize,
}

impl ListCommand {
    pub async fn execute(&self, config: &Config, client: &dyn ContentClient) -> Result<()> {
        if self.summary {
            let summaries = summarize_tabs(config, client).await;
            if self.json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else {
                for summary in &summaries {
                    println!("{:<24} {:>5}  ({})", summary.label, summary.total_items, summary.tag);
                }
            }
            return Ok(());
        }

        let browser = self.browse(config, client).await?;
        let output = ListOutput {
            tag: browser.active_tag(),
            page: browser.current_page(),
            total_pages: browser.total_slides(),
            total_items: browser.total_items(),
            search: browser.search().query(),
            posts: browser.visible_posts(),
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&output).context("Failed to encode posts")?);
        } else {
            print!("{}", render_text(&output));
        }
        Ok(())
    }

    /// Drive a browser to the requested tag, search and page
    async fn browse(&self, config: &Config, client: &dyn ContentClient) -> Result<BlogBrowser> {
        if self.page == 0 {
            return Err(anyhow!("Pages start at 1"));
        }

        let mut browser = BlogBrowser::from_config(config);
        let request = browser.mount();
        settle(&mut browser, client, Some(request)).await;

        if let Some(tag) = &self.tag {
            let request = browser.select_tag(tag);
            settle(&mut browser, client, request).await;
        }

        if let Some(search) = &self.search {
            browser.set_search_input(search.clone(), Instant::now());
            browser.submit_search();
        }

        while browser.current_page() < self.page {
            let before = browser.current_page();
            let request = browser.next_page();
            settle(&mut browser, client, request).await;
            if browser.current_page() == before {
                break;
            }
        }

        if let Some(failure) = browser.last_error() {
            return Err(anyhow!("Request failed ({}): {}", failure.kind, failure.message));
        }

        if browser.current_page() < self.page {
            warn!(
                "Page {} is out of range, showing page {} of {}",
                self.page,
                browser.current_page(),
                browser.total_slides()
            );
        }

        debug!("Listing page {} of tag '{}'", browser.current_page(), browser.active_tag());
        Ok(browser)
    }
}

/// Fetch the first page of every tab concurrently and report its total
pub async fn summarize_tabs(config: &Config, client: &dyn ContentClient) -> Vec<TabSummary> {
    info!("Summarizing {} tabs", config.tabs.len());

    let queries: Vec<PostsQuery> = config
        .tabs
        .iter()
        .map(|tab| PostsQuery::first_page(&tab.tag, 1))
        .collect();
    let pages = join_all(queries.iter().map(|query| client.fetch_page_or_empty(query))).await;

    config
        .tabs
        .iter()
        .zip(pages)
        .map(|(tab, page)| TabSummary {
            tag: tab.tag.clone(),
            label: tab.label.clone(),
            total_items: page.total_items,
        })
        .collect()
}

fn render_text(output: &ListOutput<'_>) -> String {
    let mut text = format!(
        "Page {} / {} · tag '{}' · {} posts\n",
        output.page, output.total_pages, output.tag, output.total_items
    );
    if !output.search.is_empty() {
        text.push_str(&format!("Matching '{}'\n", output.search));
    }
    if output.posts.is_empty() {
        text.push_str("Not found\n");
    }
    for post in &output.posts {
        text.push_str(&format!("  {:<12} {:<20} {}\n", post.key(), post.name, post.path));
    }
    text
}
