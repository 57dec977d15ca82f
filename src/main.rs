use anyhow::Result;
use clap::Parser;
use std::future::Future;
use tracing::{error, info};

mod args;
mod auth;
mod cfg;
mod output;
mod sample;
mod sheets;
mod target;

use args::Args;
use cfg::Cfg;
use output::RowPrinter;
use sheets::SheetRange;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    // Logs go to stderr, stdout only carries rows
    init_logging(&args.log_level);

    if let Err(e) = run(args).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    info!("Starting sheet_push");

    let cfg = Cfg::load(args)?;
    cfg.validate()?;

    let credentials = cfg.credentials().await?;
    let hub = auth::create_sheets_hub(&credentials).await?;
    let range = SheetRange::new(hub, cfg.range_config());

    let stdout = std::io::stdout();
    let mut printer = RowPrinter::new(stdout.lock(), cfg.format);

    until_cancelled(
        sample::run_sample(&range, chrono::Local::now, &mut printer),
        tokio::signal::ctrl_c(),
    )
    .await?;

    info!("sheet_push completed successfully");
    Ok(())
}

/// Runs `work` until `signal` fires. Dropping `work` aborts its in-flight request.
async fn until_cancelled<F, S>(work: F, signal: S) -> Result<()>
where
    F: Future<Output = Result<()>>,
    S: Future,
{
    tokio::select! {
        biased;
        res = work => res,
        _ = signal => anyhow::bail!("interrupted"),
    }
}

fn init_logging(level: &str) {
    let filter = match level {
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_writer(std::io::stderr)
        .init();
}
