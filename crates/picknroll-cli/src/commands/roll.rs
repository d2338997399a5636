use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use picknroll_core::config::ViewerConfig;
use picknroll_core::io::decode::DecoderHost;
use picknroll_core::io::fs::{scan_files, FsFileHandle};
use picknroll_core::{Session, ShowOutcome};
use tokio::task::LocalSet;
use tracing::info;

use super::config::load_config;
use crate::summary;

#[derive(Args)]
pub struct RollArgs {
    /// Files or directories to pick from
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Number of rolls
    #[arg(short = 'n', long, default_value = "1")]
    pub count: usize,

    /// Viewer config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Viewport size as WIDTHxHEIGHT
    #[arg(long, default_value = "1280x800", value_parser = parse_viewport)]
    pub viewport: (f64, f64),

    /// RNG seed for reproducible picks (overrides the config)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Issue every roll before awaiting any; only the last one lands
    #[arg(long)]
    pub burst: bool,

    /// Decode every pixel instead of only the image header
    #[arg(long)]
    pub verify: bool,
}

fn parse_viewport(s: &str) -> std::result::Result<(f64, f64), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w: f64 = w.trim().parse().map_err(|e| format!("bad width '{w}': {e}"))?;
    let h: f64 = h.trim().parse().map_err(|e| format!("bad height '{h}': {e}"))?;
    if w <= 0.0 || h <= 0.0 {
        return Err(format!("viewport must be positive, got {w}x{h}"));
    }
    Ok((w, h))
}

pub fn run(args: &RollArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let files = scan_files(&args.paths);
    info!(files = files.len(), "Scanned input paths");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    LocalSet::new().block_on(&runtime, roll_images(args, config, files))
}

async fn roll_images(args: &RollArgs, config: ViewerConfig, files: Vec<FsFileHandle>) -> Result<()> {
    let host = if args.verify {
        DecoderHost::verifying()
    } else {
        DecoderHost::new()
    };
    let delay = Duration::from_millis(config.loading_indicator_delay_ms);
    let session: Session<FsFileHandle, DecoderHost> = Session::new(host, config)?;
    let (width, height) = args.viewport;
    session.on_viewport_resize(width, height);

    let candidates = session.drop_new_candidates(files);
    if candidates == 0 {
        bail!("No image candidates found");
    }
    summary::print_roll_header(&session, candidates);

    if args.burst {
        let shows = (0..args.count)
            .map(|_| session.roll())
            .collect::<std::result::Result<Vec<_>, _>>()?;
        for (i, show) in shows.into_iter().enumerate() {
            let outcome = with_loading_indicator(show, delay).await;
            summary::print_outcome(&session, i + 1, outcome);
        }
    } else {
        for i in 0..args.count {
            let outcome = with_loading_indicator(session.roll()?, delay).await;
            summary::print_outcome(&session, i + 1, outcome);
        }
    }

    summary::print_history(&session);
    let released = session.teardown();
    info!(released, "Released cached images");
    Ok(())
}

/// Await `show`, putting up a spinner only if it is still pending after `delay`.
async fn with_loading_indicator<F>(show: F, delay: Duration) -> ShowOutcome
where
    F: Future<Output = ShowOutcome>,
{
    tokio::pin!(show);
    tokio::select! {
        outcome = &mut show => return outcome,
        _ = tokio::time::sleep(delay) => {}
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("Taking a long time...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    let outcome = show.await;
    spinner.finish_and_clear();
    outcome
}
