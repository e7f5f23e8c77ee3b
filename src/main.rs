// GUI-subsystem binary: Windows never allocates a console window.
#![windows_subsystem = "windows"]

use clap::Parser;
use eframe::egui;

use photobench::app::PhotoBenchApp;
use photobench::cli::CliArgs;
use photobench::{i18n, log_info, logger, t};

fn main() -> Result<(), eframe::Error> {
    let args = CliArgs::parse();

    // Initialize session log (overwrites previous session log)
    logger::init();

    i18n::init();
    i18n::set_language(&args.language());
    log_info!("Language: {}", i18n::current_language());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(args.window_size())
            .with_min_inner_size([320.0, 240.0])
            .with_title(t!("app.title")),
        ..Default::default()
    };

    eframe::run_native(
        "PhotoBench",
        options,
        Box::new(move |cc| Box::new(PhotoBenchApp::new(cc, &args))),
    )
}
