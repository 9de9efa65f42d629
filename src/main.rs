mod engine;
mod error;
mod network;
mod types;
mod ui;
mod utils;

use std::env;
use ui::app::App;

fn main() -> eframe::Result {
    env_logger::init();

    // Fetch the symbol from command-line arguments or default to BTCUSDT.
    let args: Vec<String> = env::args().collect();
    let symbol: String = if args.len() > 1 {
        args[1].to_ascii_lowercase()
    } else {
        "btcusdt".to_string()
    };

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Liquidation Heatmap",
        options,
        Box::new(move |cc| Ok(Box::new(App::new(cc, symbol)))),
    )
}
