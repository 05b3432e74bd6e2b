use clap::Parser;
use log::{error, info};
use pagestitch::cdp::{CdpConfig, CdpDriver};
use pagestitch::{CaptureConfig, Dimension, FullPageScreenshot};
use std::path::PathBuf;
use std::time::Duration;

/// Capture a full-page screenshot of a URL with headless Chrome.
#[derive(Parser, Debug)]
#[command(name = "pagestitch", version, about)]
struct Args {
    /// Page to capture
    url: String,

    /// Write the PNG here
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the PNG as base64 to stdout
    #[arg(long, conflicts_with = "output")]
    base64: bool,

    /// Print the measured geometry and rects as JSON instead of capturing
    #[arg(long)]
    plan: bool,

    /// Scroll through the page up to N times before capturing
    #[arg(long, value_name = "N")]
    prepare: Option<usize>,

    /// Browser window width
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Browser window height
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Delay between scrolling and capturing each tile
    #[arg(long, default_value_t = 200)]
    settle_ms: u64,

    /// Output magnification
    #[arg(long, default_value_t = 2)]
    scale: u32,
}

fn run(args: Args) -> pagestitch::Result<()> {
    let driver = CdpDriver::launch(CdpConfig {
        window: Dimension::new(args.width, args.height),
        ..Default::default()
    })?;

    let config = CaptureConfig {
        scale: args.scale,
        settle_delay: Duration::from_millis(args.settle_ms),
        ..Default::default()
    };
    let mut shot = FullPageScreenshot::new(driver, config)?;
    shot.navigate(&args.url)?;

    if let Some(limit) = args.prepare {
        let rects = shot.prepare_document_with_limit(limit)?;
        info!("prepared page: {} rects, {} scrolls", rects, rects.min(limit));
    }

    if args.plan {
        let plan = shot.plan()?;
        let json = serde_json::to_string_pretty(&plan).map_err(|e| pagestitch::Error::Other(e.to_string()))?;
        println!("{}", json);
    } else if args.base64 {
        println!("{}", shot.screenshot_as_base64()?);
    } else {
        let path = args.output.unwrap_or_else(|| PathBuf::from("screenshot.png"));
        shot.screenshot_as_file(&path)?;
        println!("{}", path.display());
    }

    shot.close()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        error!("{}", e);
        std::process::exit(1);
    }
}
