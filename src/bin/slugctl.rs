//! Operator CLI for smartlink.
//!
//! Runs the slug engine locally and inspects slugs against the configured
//! storage and cache, without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Run pattern detection on a URL
//! cargo run --bin slugctl -- detect "https://github.com/rust-lang/rust"
//!
//! # Heuristic slug with keywords
//! cargo run --bin slugctl -- fallback "https://example.com/blog/post" -k rust -k async
//!
//! # List supported site patterns
//! cargo run --bin slugctl -- patterns
//!
//! # Availability and alternates for a slug
//! cargo run --bin slugctl -- check github.rust-lang.rust
//!
//! # Drop a slug from the redirect cache
//! cargo run --bin slugctl -- invalidate github.rust-lang.rust
//! ```
//!
//! `check` and `invalidate` read the same environment as the server
//! (`STORAGE_BACKEND`, `DATABASE_URL`, `REDIS_URL`).

use smartlink::application::services::{AlternativeKind, LinkService, SuggestionService};
use smartlink::config::{self, Config};
use smartlink::domain::slug::{self, patterns::supported_patterns};
use smartlink::infrastructure::cache::{RedirectCache, SuggestionCache};
use smartlink::server::{build_cache, build_repository};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::time::Duration;

/// CLI tool for inspecting smartlink slugs.
#[derive(Parser)]
#[command(name = "slugctl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run site pattern detection on a URL
    Detect {
        url: String,
    },

    /// Build the heuristic slug for a URL
    Fallback {
        url: String,

        /// Keyword to weave into the slug (repeatable)
        #[arg(short, long = "keyword")]
        keywords: Vec<String>,
    },

    /// List supported site patterns
    Patterns,

    /// Check whether a slug is free and list alternates
    Check {
        slug: String,
    },

    /// Remove a slug from the redirect cache
    Invalidate {
        slug: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Detect { url } => handle_detect(&url)?,
        Commands::Fallback { url, keywords } => handle_fallback(&url, &keywords)?,
        Commands::Patterns => handle_patterns(),
        Commands::Check { slug } => {
            let service = connect().await?;
            handle_check(&service, &slug).await?;
        }
        Commands::Invalidate { slug, yes } => {
            let service = connect().await?;
            handle_invalidate(&service, &slug, yes).await?;
        }
    }

    Ok(())
}

/// Builds a [`LinkService`] on the configured backends, with AI disabled.
async fn connect() -> Result<LinkService> {
    let config: Config = config::load_from_env().context("Invalid configuration")?;

    let repository = build_repository(&config).await?;
    let cache = build_cache(&config).await;

    let suggestions = SuggestionService::new(
        None,
        SuggestionCache::new(
            cache.clone(),
            Duration::from_secs(config.suggestion_cache_ttl_seconds),
        ),
        config.suggestion_settings(),
    );

    Ok(LinkService::new(
        repository,
        suggestions,
        RedirectCache::new(cache),
        config.link_settings(),
    ))
}

fn normalized(url: &str) -> Result<String> {
    smartlink::utils::url_normalizer::normalize_url(url)
        .map_err(|e| anyhow::anyhow!("Invalid URL: {}", e))
}

fn handle_detect(url: &str) -> Result<()> {
    let url = normalized(url)?;
    let result = slug::detect(&url);

    println!("{}", "🔎 Pattern Detection".bright_blue().bold());
    println!();
    println!("  URL:        {}", url.cyan());

    if !result.matched {
        println!("  Pattern:    {}", "none".yellow());
        println!();
        println!(
            "  Try: {} {}",
            "slugctl fallback".bright_cyan(),
            url.bright_black()
        );
        return Ok(());
    }

    println!("  Pattern:    {}", result.pattern_name.green());
    println!("  Template:   {}", result.template.bright_black());
    println!("  Confidence: {:?}", result.confidence);
    for (key, value) in &result.extracted {
        println!("    {:<10} {}", key.bright_white(), value);
    }

    match result.suggested_slug {
        Some(slug) => println!("  Slug:       {}", slug.bright_yellow().bold()),
        None => println!("  Slug:       {}", "(not enough fields)".yellow()),
    }
    println!();

    Ok(())
}

fn handle_fallback(url: &str, keywords: &[String]) -> Result<()> {
    let url = normalized(url)?;
    let slug = slug::fallback(keywords, &url);

    println!("{}", slug.bright_yellow().bold());

    Ok(())
}

fn handle_patterns() {
    println!("{}", "📋 Site Patterns".bright_blue().bold());
    println!();

    println!(
        "  {:<10} {:<12} {:<40}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Template".bright_white().bold()
    );
    println!("  {}", "─".repeat(64).bright_black());

    let patterns = supported_patterns();
    for pattern in &patterns {
        println!(
            "  {:<10} {:<12} {}",
            pattern.id.cyan(),
            pattern.name,
            pattern.template.bright_black()
        );
    }

    println!();
    println!(
        "  Total: {}",
        patterns.len().to_string().bright_white().bold()
    );
    println!();
}

async fn handle_check(service: &LinkService, slug: &str) -> Result<()> {
    let resolution = service
        .check_slug(slug)
        .await
        .map_err(|e| anyhow::anyhow!("Check failed: {}", e))?;

    if resolution.available {
        println!(
            "{} {}",
            "✅".green(),
            format!("{} is available", resolution.slug).green().bold()
        );
        return Ok(());
    }

    println!(
        "{} {}",
        "❌".red(),
        format!("{} is taken", resolution.slug).red().bold()
    );

    if resolution.suggestions.is_empty() {
        println!("{}", "  No free alternates".yellow());
        return Ok(());
    }

    println!();
    println!("{}", "Alternates:".bright_white().bold());
    for alt in &resolution.suggestions {
        let kind = match alt.kind {
            AlternativeKind::Numbered => "numbered",
            AlternativeKind::Shorter => "shorter",
            AlternativeKind::Dated => "dated",
        };
        println!("  {:<40} {}", alt.slug.cyan(), kind.bright_black());
    }
    println!();

    Ok(())
}

async fn handle_invalidate(service: &LinkService, slug: &str, skip_confirm: bool) -> Result<()> {
    let slug = slug.to_lowercase();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Drop cached redirect for {}?", slug))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    service.invalidate_cache(&slug).await;

    println!("{}", "✅ Cache entry removed".green().bold());

    Ok(())
}
