mod app;
mod overlay;
mod session;
mod sim;
mod util;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Base URL of the travel simulation backend.
    #[arg(long, default_value = "http://localhost:8000")]
    api_base: String,

    /// Background image the graph is calibrated against.
    #[arg(long, default_value = "cbba_bg.png")]
    background: String,

    /// Where calibration and node picks are persisted.
    #[arg(long, default_value = "travel-viz-session.json")]
    state_file: String,
}

fn main() -> eframe::Result<()> {
    simple_logging::log_to_stderr(log::LevelFilter::Info);

    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };

    eframe::run_native(
        "travel-viz",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::TravelApp::new(
                cc,
                app::AppConfig {
                    api_base: args.api_base.clone(),
                    background: args.background.clone().into(),
                    state_file: args.state_file.clone().into(),
                },
            )))
        }),
    )
}
