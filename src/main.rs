#![warn(clippy::all, rust_2018_idioms)]

use lingxian::LingXianApp;

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("灵闪 LingXian")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "LingXian",
        native_options,
        Box::new(|cc| Ok(Box::new(LingXianApp::new(cc)))),
    )
}
