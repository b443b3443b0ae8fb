//! Klipper status lights
//!
//! Polls Moonraker and mirrors the printer state on a WS2812 strip.

mod app;
mod moonraker;
mod output;
mod settings;

use std::path::PathBuf;
use std::sync::mpsc;

use anyhow::Context;
use clap::Parser;
use printer_light_composer::{Pacer, Strip, ThreadPacer};

use crate::app::App;
use crate::moonraker::Moonraker;
use crate::settings::Settings;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file, falls back to settings.sample.toml next to it
    #[arg(short, long, default_value = "settings.toml")]
    config: PathBuf,
    /// Log frames instead of driving the SPI strip
    #[arg(long)]
    dry_run: bool,
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let settings = Settings::load(&cli.config)?;
    let led_count = settings.strip.layout.led_count;
    if cli.dry_run {
        run(settings, output::dry_run(led_count), ThreadPacer)
    } else {
        let strip = output::open_spi(&settings.strip.spi_device, led_count)?;
        run(settings, strip, ThreadPacer)
    }
}

fn run<S, P>(settings: Settings, strip: S, pacer: P) -> anyhow::Result<()>
where
    S: Strip + Send + 'static,
    P: Pacer + 'static,
{
    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    ctrlc::set_handler(move || {
        let _ = shutdown_tx.send(());
    })
    .context("failed to set Ctrl+C handler")?;

    log::info!("watching {}", settings.moonraker.base_url());
    let api = Moonraker::new(&settings.moonraker);
    let mut app = App::new(settings, api, strip, pacer);
    app.run(&shutdown_rx)
}
