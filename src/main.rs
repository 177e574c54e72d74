#![cfg_attr(windows, windows_subsystem = "windows")]

use eframe::egui;
use ytdl_picker::app::YtdlApp;
use ytdl_picker::config::Settings;

fn main() -> anyhow::Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        pretty_env_logger::formatted_builder()
            .filter_level(log::LevelFilter::Info)
            .init();
    } else {
        pretty_env_logger::init();
    }

    let settings = Settings::from_env();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(settings.window_size)
            .with_min_inner_size([600.0, 400.0])
            .with_title("Youtube Media Downloader"),
        ..Default::default()
    };

    eframe::run_native(
        "Youtube Media Downloader",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            Box::new(YtdlApp::new(&cc.egui_ctx, settings))
        }),
    )
    .map_err(|e| anyhow::anyhow!("failed to start the window: {e}"))
}
