use anyhow::Result;
use clap::Parser;
use kiosk_launcher::config::{self, ConfigPaths};
use kiosk_launcher::exec::ShellRunner;
use kiosk_launcher::fonts::locate_font;
use kiosk_launcher::logging::init_logging;
use kiosk_launcher::native::{NativeFrontend, NativeOptions};
use kiosk_launcher::session::{run_session_loop, SETTLE_DELAY};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "kiosk-launcher",
    version,
    about = "Fullscreen application launcher for TVs and kiosks"
)]
struct Cli {
    /// Run in a 1280x720 window instead of fullscreen
    #[arg(short, long, default_value_t = false)]
    windowed: bool,

    /// Directory holding apps.conf, env.conf and bg.png
    #[arg(long, value_name = "DIR", env = "KIOSK_LAUNCHER_DIR")]
    config_dir: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(short, long, value_name = "FILTER", default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    // ── Configuration ─────────────────────────────────────────────────────────
    let base = cli.config_dir.unwrap_or_else(config::base_dir);
    let paths = ConfigPaths::in_dir(base);
    info!(dir = %paths.base.display(), "starting launcher");

    let catalog = config::load_catalog(&paths.apps)?;
    info!(applications = catalog.len(), "catalog loaded");

    let overlay = config::load_env_overlay(&paths.env);
    config::apply_env_overlay(&overlay);

    let font = locate_font()?;

    // ── Session loop ──────────────────────────────────────────────────────────
    let mut frontend = NativeFrontend::new(NativeOptions {
        windowed: cli.windowed,
        font,
        paths: paths.clone(),
    });
    let mut runner = ShellRunner::new(&paths.base);
    run_session_loop(&catalog, &mut frontend, &mut runner, SETTLE_DELAY)?;
    Ok(())
}
