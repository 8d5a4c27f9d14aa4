use crate::config::{AppConfig, ConfigOverrides};
use crate::server;
use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use colored::Colorize;
use folio_core::intent::describe_error;
use folio_core::{BookQuery, execute_search, fulfill_search};
use folio_scanner::Storefront;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

pub fn print_banner() {
    println!("{}", "═".repeat(60).bright_blue().bold());
    println!(
        "{} {}",
        "  FOLIO".bright_white().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
    );
    println!("{}", "═".repeat(60).bright_blue().bold());
}

/// Pull the configuration overrides out of the global and `serve` flags.
pub fn config_overrides(matches: &ArgMatches) -> ConfigOverrides {
    let listen_addr = match matches.subcommand() {
        Some(("serve", serve)) => serve.get_one::<String>("listen").cloned(),
        _ => None,
    };

    ConfigOverrides {
        config_file: matches.get_one::<PathBuf>("config").cloned(),
        listen_addr,
        base_url: matches.get_one::<String>("base-url").cloned(),
        timeout_secs: matches.get_one::<u64>("timeout").copied(),
    }
}

/// The `search` flags as a validated query.
pub fn search_query(args: &ArgMatches) -> BookQuery {
    BookQuery::new(
        args.get_one::<String>("genre").map(String::as_str),
        args.get_one::<f64>("max-price").copied(),
    )
}

fn spinner(quiet: bool, message: String) -> Option<ProgressBar> {
    if quiet {
        return None;
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(message);
    Some(spinner)
}

fn finish(spinner: Option<ProgressBar>) {
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
}

fn build_storefront(config: &AppConfig) -> Result<Storefront> {
    config
        .storefront()
        .with_context(|| format!("failed to set up storefront client for {}", config.base_url))
}

pub async fn handle_serve(config: &AppConfig, quiet: bool) -> Result<()> {
    let storefront = build_storefront(config)?;

    if !quiet {
        println!("{} Storefront: {}", "→".blue(), config.base_url.bright_white());
        println!(
            "{} Webhook: http://{}{}",
            "→".blue(),
            config.listen_addr,
            server::WEBHOOK_PATH
        );
        println!();
    }

    server::serve(&config.listen_addr, storefront)
        .await
        .context("webhook server failed")
}

pub async fn handle_search(args: &ArgMatches, config: &AppConfig, quiet: bool) -> Result<()> {
    let storefront = build_storefront(config)?;
    let query = search_query(args);

    let target = query.genre.as_deref().unwrap_or("all books");
    let progress = spinner(quiet, format!("Searching {}...", target));

    if args.get_flag("json") {
        let result = execute_search(&storefront, &query).await;
        finish(progress);

        let items = result.map_err(|e| anyhow!(describe_error(&e)))?;
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        let text = fulfill_search(&storefront, &query).await;
        finish(progress);
        println!("{}", text);
    }

    Ok(())
}

pub async fn handle_genres(config: &AppConfig, quiet: bool) -> Result<()> {
    let storefront = build_storefront(config)?;

    let progress = spinner(quiet, "Fetching genres...".to_string());
    let result = storefront.genre_slug_map().await;
    finish(progress);

    let map = result.map_err(|e| anyhow!(describe_error(&e)))?;
    if map.is_empty() {
        println!("{} No genres found at {}", "⚠".yellow(), config.base_url);
        return Ok(());
    }

    if !quiet {
        println!("{} {} genres\n", "✓".green().bold(), map.len().to_string().cyan());
    }
    for (genre, slug) in map.sorted() {
        println!("  {} {}", genre.bright_white(), slug.bright_black());
    }

    Ok(())
}
