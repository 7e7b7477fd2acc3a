use std::path::PathBuf;

use clap::Parser;

use lexigraph::app::LexigraphApp;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Text file to analyze.
    text_path: PathBuf,

    /// Directory for cached keyword analyses.
    #[arg(long, default_value = ".")]
    cache_dir: PathBuf,
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "lexigraph",
        options,
        Box::new(move |cc| {
            Ok(Box::new(LexigraphApp::new(
                cc,
                args.text_path.clone(),
                args.cache_dir.clone(),
            )))
        }),
    )
}
