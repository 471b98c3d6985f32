mod args;
mod deals;
mod format;
mod headless;
mod models;
mod notify;
mod preferences;
mod providers;
mod search;
mod settings;
mod shell;
mod validation;

use anyhow::Context;
use args::Args;
use clap::Parser;
use headless::HeadlessOutcome;
use notify::SmtpMailer;
use preferences::PreferenceStore;
use search::DealFinder;
use settings::{LogLevel, Settings};
use shell::Shell;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let settings = Settings::load(&args.config).context("Failed to load configuration")?;

    init_logging(settings.log_level);

    let store = PreferenceStore::new(settings.preferences_path.clone());

    if args.headless {
        println!("Running in headless mode...");
        run_headless(&settings, &store).await
    } else {
        println!("Starting Hotel Deal Finder...");
        run_shell(&settings, store).await
    }
}

/// `RUST_LOG` wins over the configured level. Logs go to stderr, stdout is
/// left to the prompt.
fn init_logging(level: LogLevel) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level.into()).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_headless(settings: &Settings, store: &PreferenceStore) -> anyhow::Result<()> {
    let mailer = SmtpMailer::from_settings(settings).context("Email is not configured")?;
    let finder = DealFinder::from_settings(settings).context("Hotel APIs are not configured")?;

    info!("Checking {} for a pending notification", store.path().display());
    match headless::run(store, &finder, &mailer).await? {
        HeadlessOutcome::NothingSaved => println!("There are no saved preferences."),
        HeadlessOutcome::NoDeals => println!("No results found."),
        HeadlessOutcome::Notified { email } => {
            info!("Cleared preferences of {}", email);
            println!("Email sent successfully!");
        }
    }
    Ok(())
}

async fn run_shell(settings: &Settings, store: PreferenceStore) -> anyhow::Result<()> {
    let finder = DealFinder::from_settings(settings).context("Hotel APIs are not configured")?;
    let today = chrono::Local::now().date_naive();

    Shell::new(
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        Arc::new(finder),
        store,
        today,
    )
    .run()
    .await
    .context("Terminal I/O failed")
}
