use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use super::list::ListCommand;
use crate::browse::StrategyKind;
use crate::config::Config;
use crate::content::GraphqlClient;
use crate::tui;

/// Browse storefront blog posts by tag from the terminal
#[derive(Parser)]
#[command(
    name = "blog-grid",
    version,
    about = "Browse storefront blog posts by tag from the terminal",
    long_about = r#"blog-grid fetches blog posts from a GraphQL content API and shows them as a
paginated card grid, filtered by tag and searchable by title.

Examples:
  blog-grid                                   # Start the interactive grid
  blog-grid --strategy full_refetch           # Use one server fetch per page
  blog-grid list --tag dashcam --page 2       # Print the second page
  blog-grid list --search s90 --json          # Print matching posts as JSON"#
)]
pub struct Cli {
    /// Path to a configuration file
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    /// GraphQL endpoint of the content API
    #[arg(long = "endpoint", global = true)]
    pub endpoint: Option<String>,

    /// Bearer token sent with every request
    #[arg(long = "token", global = true)]
    pub token: Option<String>,

    /// Pagination strategy: full_refetch, sliding_window or local_only
    #[arg(short = 's', long = "strategy", global = true)]
    pub strategy: Option<StrategyKind>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print a page of posts without starting the interactive grid
    List(ListCommand),
}

impl Cli {
    /// Whether the interactive grid will own the terminal
    pub fn is_interactive(&self) -> bool {
        self.command.is_none()
    }

    pub async fn execute(self) -> Result<()> {
        if self.debug {
            debug!("Debug logging enabled");
        }

        let mut config = Config::init(self.config.as_deref()).await?;
        self.apply_overrides(&mut config);
        config.validate()?;
        debug!("Configuration initialized");

        let client = GraphqlClient::from_config(&config).context("Failed to create content client")?;

        match self.command {
            Some(Commands::List(list_cmd)) => list_cmd.execute(&config, &client).await,
            None => {
                info!("Starting interactive mode against {}", client.endpoint());
                tui::run(&config, Arc::new(client)).await
            }
        }
    }

    /// Command line flags win over file and environment settings
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(token) = &self.token {
            config.token = Some(token.clone());
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
    }
}
