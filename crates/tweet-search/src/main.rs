use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use env_logger::Env;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use tweet_search::{tui, Controller};
use tweet_search_api::{resolve_search_url, HttpFetcher};

/// Upper bound on waiting for a one-shot query; the transport gives up well before this.
const QUERY_WAIT: Duration = Duration::from_secs(300);

#[derive(Parser)]
#[command(name = "tweet-search")]
#[command(about = "Search for tweets from the terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    /// Search endpoint URL [default: $TWEET_SEARCH_URL or the public endpoint]
    #[arg(long, global = true, value_name = "URL")]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive search (default)
    Tui,

    /// Run a single search and print the results
    #[command(alias = "q")]
    Query(QueryArgs),
}

#[derive(Args)]
struct QueryArgs {
    /// Search terms
    #[arg(required = true, num_args = 1..)]
    terms: Vec<String>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct QueryOutput<'a> {
    query: String,
    results: &'a [String],
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", "Error:".red());
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG overrides the default level
    let env = if cli.debug {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("error")
    };
    env_logger::Builder::from_env(env).init();

    let endpoint = resolve_search_url(cli.endpoint.as_deref());
    log::debug!("Using search endpoint {}", endpoint);

    let fetcher = HttpFetcher::new(endpoint.clone()).context("Failed to create HTTP client")?;
    let controller = Controller::new(Arc::new(fetcher));

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => tui::run(controller, &endpoint),
        Commands::Query(args) => execute_query(controller, args),
    }
}

fn execute_query(mut controller: Controller, args: QueryArgs) -> Result<()> {
    let raw = args.terms.join(" ");
    if controller.submit(&raw).is_none() {
        bail!("No search terms given");
    }

    if !controller.wait(QUERY_WAIT) {
        bail!("Search did not complete within {}s", QUERY_WAIT.as_secs());
    }

    let query = controller
        .last_query()
        .map(|q| q.text())
        .unwrap_or_default();

    if args.json {
        let output = QueryOutput {
            query,
            results: controller.results(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if controller.last_was_error() {
        for line in controller.results() {
            println!("{}", line.red());
        }
    } else {
        for line in controller.results() {
            println!("{}", line);
        }
    }

    Ok(())
}
