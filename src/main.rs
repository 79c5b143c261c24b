mod app;
mod dataset;
mod util;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use app::{AnimeErasApp, ChartConfig, DEFAULT_SETTLE_SECS};
use dataset::{DEFAULT_MIN_MEMBERS, LoaderConfig};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// CSV or JSON export of the anime catalogue.
    #[arg(default_value = "anime - anime.csv")]
    dataset: PathBuf,

    /// Rows with this many members or fewer are dropped.
    #[arg(long, default_value_t = DEFAULT_MIN_MEMBERS)]
    min_members: u64,

    /// Seconds the layout keeps moving after each reveal.
    #[arg(long, default_value_t = DEFAULT_SETTLE_SECS)]
    settle_secs: f32,

    #[arg(long, default_value_t = 1500.0)]
    width: f32,

    #[arg(long, default_value_t = 1000.0)]
    height: f32,

    /// Tracing filter directive; falls back to RUST_LOG.
    #[arg(long)]
    log_filter: Option<String>,
}

fn init_tracing(directive: Option<&str>) {
    let filter = directive
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("anime_eras=info"));

    fmt().with_env_filter(filter).with_target(true).compact().init();
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_filter.as_deref());

    let config = ChartConfig {
        dataset_path: args.dataset,
        loader: LoaderConfig {
            min_members: args.min_members,
        },
        settle_secs: args.settle_secs,
    };
    tracing::info!(
        dataset = %config.dataset_path.display(),
        min_members = config.loader.min_members,
        settle_secs = config.settle_secs,
        "anime-eras starting"
    );

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([args.width, args.height]),
        ..Default::default()
    };

    eframe::run_native(
        "anime-eras",
        options,
        Box::new(move |cc| Ok(Box::new(AnimeErasApp::new(cc, config)))),
    )
}
