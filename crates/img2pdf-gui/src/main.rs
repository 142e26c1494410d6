#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::egui;

mod app;
mod handlers;
mod logger;
mod views;
mod worker;

const MAX_LOG_ENTRIES: usize = 200;

fn main() -> anyhow::Result<()> {
    let logger = logger::AppLogger::new(MAX_LOG_ENTRIES);
    logger.clone().init()?;

    // Keeps the runtime alive for as long as the window is open
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let tokio_handle = runtime.handle().clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 700.0])
            .with_title("Image to PDF"),
        ..Default::default()
    };

    eframe::run_native(
        "Image to PDF",
        options,
        Box::new(move |cc| Ok(Box::new(app::ImageToPdfApp::new(cc, tokio_handle, logger)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to start window: {e}"))?;

    Ok(())
}
