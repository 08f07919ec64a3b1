//! Zotac Zone Dial Driver
//!
//! Main entry point: discovery, setup and the blocking dispatch loop.

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use zone_dials::action::ACTION_NAMES;
use zone_dials::backlight::Backlight;
use zone_dials::config::{DialBindings, DialConfig};
use zone_dials::discovery;
use zone_dials::dispatch::Dispatcher;
use zone_dials::sink::{VirtualDials, DEVICE_NAME};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "zone-dials", version = VERSION)]
#[command(about = "Rotary dial driver for the Zotac Zone handheld")]
struct Cli {
    /// Config file path (default: ~/.config/zone-dials/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// hidraw node to read instead of auto-detecting (e.g. /dev/hidraw3)
    #[arg(short, long)]
    device: Option<PathBuf>,

    /// Backlight directory instead of auto-detecting (e.g. /sys/class/backlight/amdgpu_bl0)
    #[arg(short, long)]
    backlight: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print the available dial actions and exit
    #[arg(long)]
    list_actions: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.list_actions {
        for name in ACTION_NAMES {
            println!("{name}");
        }
        return ExitCode::SUCCESS;
    }

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    info!("Zotac Zone Dial Driver v{}", VERSION);

    // Load config
    let config_path = cli.config.unwrap_or_else(DialConfig::default_path);
    info!("Loading config from {:?}", config_path);
    let config = DialConfig::load(&config_path).unwrap_or_else(|e| {
        warn!("Ignoring config {}: {:#}", config_path.display(), e);
        DialConfig::default()
    });
    let bindings = DialBindings::resolve(&config);
    info!("Left dial: {:?}", bindings.left);
    info!("Right dial: {:?}", bindings.right);

    let backlight = cli.backlight.map(Backlight::new).or_else(Backlight::discover);
    match &backlight {
        Some(b) => info!("Backlight controller: {}", b.path().display()),
        None => warn!("No backlight controller found, brightness actions are disabled"),
    }

    let device_path = cli
        .device
        .or_else(discovery::find_dial_device)
        .context("Zotac dial device not found")?;
    info!("Input device: {}", device_path.display());

    let caps = bindings.capabilities();
    if caps.is_empty() {
        info!("No key or scroll actions bound, virtual device will stay idle");
    }
    let mut sink = VirtualDials::new(DEVICE_NAME, &caps)
        .context("Cannot create virtual input device (is /dev/uinput writable?)")?;
    if let Some(path) = sink.device_path() {
        info!("Virtual device: {}", path.display());
    }

    let device = File::open(&device_path)
        .with_context(|| format!("Failed to open {}", device_path.display()))?;

    // Set up Ctrl-C handler
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    if let Err(e) = ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    }) {
        warn!("Failed to install Ctrl+C handler: {}", e);
    }

    info!("Driver running. Press Ctrl+C to exit.");
    let mut dispatcher = Dispatcher::new(bindings, sink, backlight);
    dispatcher.run(device, &running)?;

    info!("Shutting down");
    Ok(())
}
