//! CLI administration tool for urlsh.
//!
//! Talks to the configured store directly, without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL (reuses the existing code for known URLs)
//! cargo run --bin urlsh-admin -- shorten https://example.com/page
//!
//! # Show where a code points
//! cargo run --bin urlsh-admin -- resolve aZ3_k9Q
//!
//! # List recent links
//! cargo run --bin urlsh-admin -- recent --limit 50
//!
//! # Check store connectivity
//! cargo run --bin urlsh-admin -- check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `STORAGE_BACKEND`, `DATABASE_URL` / `DB_*`,
//! `REDIS_URL` / `REDIS_*`, `STORE_TIMEOUT_MS`, `STORE_READ_RETRIES`.

use urlsh::application::services::{LinkService, RECENT_LIMIT};
use urlsh::config;
use urlsh::infrastructure::persistence::open_store;
use urlsh::utils::code_generator::RandomCodeGenerator;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::sync::Arc;
use std::time::Instant;

/// CLI tool for managing urlsh.
#[derive(Parser)]
#[command(name = "urlsh-admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shorten a URL
    Shorten {
        /// URL to shorten (http or https)
        url: String,
    },

    /// Show the URL and hit count behind a code
    Resolve {
        /// Short code
        code: String,
    },

    /// List the most recent links
    Recent {
        /// Maximum number of links to show
        #[arg(short, long, default_value_t = RECENT_LIMIT)]
        limit: usize,
    },

    /// Check store connectivity
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Invalid configuration")?;
    let store = open_store(&config).await?;
    let service = LinkService::new(store.clone(), Arc::new(RandomCodeGenerator));

    let result = match cli.command {
        Commands::Shorten { url } => shorten(&service, &url).await,
        Commands::Resolve { code } => resolve(&service, &code).await,
        Commands::Recent { limit } => recent(&service, limit).await,
        Commands::Check => check(&service).await,
    };

    store.close().await;
    result
}

async fn shorten(service: &LinkService, url: &str) -> Result<()> {
    let shortened = service
        .shorten(url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to shorten URL: {}", e))?;

    if shortened.created {
        println!("{}", "Created short link".green().bold());
    } else {
        println!("{}", "URL already shortened, reusing code".yellow().bold());
    }
    println!();
    println!("  Code:     {}", shortened.code.bright_yellow().bold());
    println!("  Original: {}", shortened.original.cyan());
    println!("  Hits:     {}", shortened.hits);
    println!();

    Ok(())
}

async fn resolve(service: &LinkService, code: &str) -> Result<()> {
    let entry = service
        .resolve(code)
        .await
        .map_err(|e| anyhow::anyhow!("Lookup failed: {}", e))?;

    let Some(entry) = entry else {
        println!("{} {}", "No link for code".red(), code.bright_white());
        return Ok(());
    };

    println!("  Code:     {}", entry.code.bright_yellow().bold());
    println!("  Original: {}", entry.original.cyan());
    println!("  Hits:     {}", entry.hits);
    println!(
        "  Created:  {}",
        entry
            .created_at
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
            .bright_black()
    );

    Ok(())
}

/// Prints recent links as a table.
///
/// ```text
///   Code     Hits     Created            Original
///   ──────────────────────────────────────────────────────────────
///   aZ3_k9Q  12       2026-01-01 12:00   https://example.com/
/// ```
async fn recent(service: &LinkService, limit: usize) -> Result<()> {
    println!("{}", "Recent links".bright_blue().bold());
    println!();

    let entries = service
        .list_recent(limit)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    if entries.is_empty() {
        println!("{}", "  No links yet".yellow());
        return Ok(());
    }

    println!(
        "  {:<8} {:<8} {:<18} {}",
        "Code".bright_white().bold(),
        "Hits".bright_white().bold(),
        "Created".bright_white().bold(),
        "Original".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for entry in &entries {
        println!(
            "  {:<8} {:<8} {:<18} {}",
            entry.code.cyan(),
            entry.hits,
            entry
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            entry.original
        );
    }

    println!();
    println!(
        "  Shown: {}",
        entries.len().to_string().bright_white().bold()
    );

    Ok(())
}

async fn check(service: &LinkService) -> Result<()> {
    let store = service.store();
    let started = Instant::now();

    match store.ping().await {
        Ok(()) => {
            println!(
                "{} {} ({} ms)",
                "Store reachable:".green().bold(),
                store.backend_name().cyan(),
                started.elapsed().as_millis()
            );
            Ok(())
        }
        Err(e) => {
            println!(
                "{} {}",
                "Store unreachable:".red().bold(),
                store.backend_name().cyan()
            );
            Err(anyhow::anyhow!("Ping failed: {}", e))
        }
    }
}
