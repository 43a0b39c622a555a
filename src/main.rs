mod fetch;
mod merge;
mod output;
mod overrides;
mod parser;
mod settings;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;

use fetch::{Fetcher, GEOSCHEME_URL, ISO_CODES_URL};
use settings::Settings;

#[derive(Parser)]
#[command(
    name = "geoscheme_scraper",
    about = "Build a country / ISO code / continent / region CSV from Wikipedia"
)]
struct Cli {
    /// Output CSV path [default: scraped_countries.csv]
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Pause before each request, in milliseconds [default: 1000]
    #[arg(long)]
    delay_ms: Option<u64>,
}

const PREVIEW_ROWS: usize = 10;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?.with_overrides(cli.output, cli.delay_ms);
    tracing::debug!(?settings, "Loaded settings");

    let fetcher = Fetcher::new(settings.delay())?;

    println!("Scraping ISO codes...");
    let iso_html = fetcher
        .fetch(ISO_CODES_URL)
        .await
        .context("Failed to fetch ISO code list")?;

    println!("Scraping countries data...");
    let geoscheme_html = fetcher
        .fetch(GEOSCHEME_URL)
        .await
        .context("Failed to fetch geoscheme table")?;

    let outcome = parser::process_documents(&iso_html, &geoscheme_html);
    output::write_csv(&settings.output, &outcome.records)?;
    println!(
        "Created {} with {} countries",
        settings.output.display(),
        outcome.records.len()
    );

    if !outcome.unmatched.is_empty() {
        println!("\nWarning: {} countries missing ISO codes:", outcome.unmatched.len());
        for name in &outcome.unmatched {
            println!("  - {}", name);
        }
    }

    println!("\nFirst {} rows:", PREVIEW_ROWS);
    print!("{}", output::preview(&outcome.records, PREVIEW_ROWS));
    println!("\nTotal countries scraped: {}", outcome.records.len());

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }
    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
