//! SoundCloud audio downloader GUI

// Window and frame loop
mod app;
// Worker/UI bridge: runs one job and relays its notifications
mod bridge;
// Download profile and window defaults
mod config;
// yt-dlp process driver
mod downloader;
// Error types
mod errors;
// Jobs, worker events and dialogs
mod model;
// Progress line parsing and the progress hook
mod progress;
// Inputs, validation and the in-flight job
mod session;

use app::DownloaderApp;
use config::AppConfig;
use downloader::YtDlp;
use session::Session;

use eframe::egui;
use tokio::runtime::Runtime;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Program entry point: sets up logging and the runtime, then launches the GUI
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::default();
    config.ensure_download_dir()?;

    // Workers run here; the runtime lives until the window closes
    let runtime = Runtime::new()?;
    let session = Session::new(
        runtime.handle().clone(),
        YtDlp::new(config.profile.clone()),
        config.download_dir.clone(),
        config.success_message.clone(),
    );
    info!(folder = %config.download_dir.display(), "Starting downloader");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(config.window_title.clone())
            .with_inner_size(config.window_size)
            .with_resizable(false),
        ..Default::default()
    };
    eframe::run_native(
        &config.window_title,
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(app::visuals());
            Box::new(DownloaderApp::new(session))
        }),
    )?;
    Ok(())
}
