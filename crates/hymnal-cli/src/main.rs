//! Hymnal operator CLI: lyric formatting, catalog sync and a remote smoke check.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use hymnal_catalog::{CatalogRepository, JsonCatalogRepository};
use hymnal_cli::{duplicate_ids, format_lyrics, init_tracing};
use hymnal_core::models::ImagePage;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "hymnal", about = "Hymnal content service tooling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read lyrics from stdin and print them as one line with literal \n
    FormatLyrics,
    /// Validate a catalog file and copy it into place
    SyncCatalog {
        /// Catalog to read
        #[arg(long)]
        from: PathBuf,
        /// Destination path
        #[arg(long)]
        to: PathBuf,
    },
    /// Fetch the first listing page of a deployed API
    CheckApi {
        /// Base URL, e.g. https://hymns.example.org
        #[arg(long)]
        url: String,
        /// Request timeout in seconds
        #[arg(long, default_value = "15")]
        timeout: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::FormatLyrics => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Read lyrics from stdin")?;
            println!("{}", format_lyrics(&input));
        }
        Commands::SyncCatalog { from, to } => sync_catalog(from, to).await?,
        Commands::CheckApi { url, timeout } => check_api(&url, timeout).await?,
    }

    Ok(())
}

async fn sync_catalog(from: PathBuf, to: PathBuf) -> anyhow::Result<()> {
    let catalog = JsonCatalogRepository::new(from.clone())
        .load()
        .await
        .with_context(|| format!("Catalog {} is not valid", from.display()))?;

    let duplicates = duplicate_ids(catalog.entries());
    if !duplicates.is_empty() {
        tracing::warn!(ids = ?duplicates, "Catalog contains duplicate ids");
    }

    if let Some(parent) = to.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Create {}", parent.display()))?;
    }
    tokio::fs::copy(&from, &to)
        .await
        .with_context(|| format!("Copy {} to {}", from.display(), to.display()))?;

    tracing::info!(
        from = %from.display(),
        to = %to.display(),
        entries = catalog.len(),
        "Catalog synced"
    );
    println!("Synced {} entries to {}", catalog.len(), to.display());
    Ok(())
}

async fn check_api(url: &str, timeout: u64) -> anyhow::Result<()> {
    let endpoint = format!("{}/api/images", url.trim_end_matches('/'));
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout))
        .build()
        .context("Build HTTP client")?;

    let response = client
        .get(&endpoint)
        .query(&[("page", "1")])
        .send()
        .await
        .with_context(|| format!("GET {}", endpoint))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        bail!("GET {} returned {}: {}", endpoint, status, body);
    }

    let page: ImagePage = response
        .json()
        .await
        .context("Listing response is not an image page")?;

    let pagination = &page.pagination;
    println!("Images on page {}: {}", pagination.current, page.images.len());
    println!(
        "pageSize={} total={} hasMore={} nextMarker={}",
        pagination.page_size,
        if pagination.total_is_known() {
            pagination.total.to_string()
        } else {
            "unknown".to_string()
        },
        pagination.has_more,
        pagination.next_marker.as_deref().unwrap_or("-")
    );
    Ok(())
}
