use anyhow::{Context, Result};
use clap::Parser;
use food_dashboard::api::HttpFoodsApi;
use food_dashboard::menu::MenuSession;
use food_dashboard::model::ClientConfig;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "food-dashboard",
    version,
    about = "Restaurant menu dashboard backed by a REST API"
)]
pub struct Cli {
    /// Base URL of the menu service (the `/foods` resource is appended)
    #[arg(long, default_value = "http://localhost:3333")]
    pub base_url: String,

    /// Timeout for each request to the menu service
    #[arg(long, default_value = "10s")]
    pub request_timeout: humantime::Duration,

    /// Print the menu as JSON and exit (no TUI)
    #[arg(long)]
    pub json: bool,

    /// Print the menu as text and exit (no TUI)
    #[arg(long)]
    pub text: bool,

    /// Log file used while the TUI is running
    #[arg(long)]
    pub log_file: Option<std::path::PathBuf>,
}

impl Cli {
    /// True when the dashboard will take over the terminal.
    pub fn is_interactive(&self) -> bool {
        cfg!(feature = "tui") && !self.json && !self.text
    }
}

/// Build a `ClientConfig` from CLI arguments.
pub fn build_config(args: &Cli) -> ClientConfig {
    ClientConfig {
        base_url: args.base_url.clone(),
        request_timeout: Duration::from(args.request_timeout),
        user_agent: format!("food-dashboard/{}", env!("CARGO_PKG_VERSION")),
    }
}

pub async fn run(args: Cli) -> Result<()> {
    if args.json && args.text {
        return Err(anyhow::anyhow!("--json and --text cannot be used together"));
    }

    let cfg = build_config(&args);
    let api = Arc::new(HttpFoodsApi::new(&cfg).context("create menu client")?);

    if args.is_interactive() {
        #[cfg(feature = "tui")]
        {
            return crate::tui::run(api).await;
        }
    }

    run_listing(&args, api).await
}

/// Load the menu once and print it.
async fn run_listing(args: &Cli, api: Arc<HttpFoodsApi>) -> Result<()> {
    let mut session = MenuSession::new(api);
    session.load().await;
    if let Some(err) = session.state().last_error.as_deref() {
        return Err(anyhow::anyhow!("load menu from {}: {err}", args.base_url));
    }

    if args.json {
        let out = serde_json::to_string_pretty(session.foods())?;
        println!("{out}");
    } else {
        let summary = crate::text_summary::build_text_summary(session.foods());
        for line in summary.lines {
            println!("{line}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Cli::parse_from(["food-dashboard"]);
        let cfg = build_config(&args);
        assert_eq!(cfg.base_url, "http://localhost:3333");
        assert_eq!(cfg.request_timeout, Duration::from_secs(10));
        assert!(cfg.user_agent.starts_with("food-dashboard/"));
        assert!(!args.json && !args.text);
    }

    #[test]
    fn listing_flags_disable_tui() {
        let args = Cli::parse_from(["food-dashboard", "--text", "--request-timeout", "500ms"]);
        assert!(!args.is_interactive());
        assert_eq!(
            Duration::from(args.request_timeout),
            Duration::from_millis(500)
        );
    }

    #[tokio::test]
    async fn json_and_text_are_exclusive() {
        let args = Cli::parse_from(["food-dashboard", "--json", "--text"]);
        assert!(run(args).await.is_err());
    }
}
