//! Rope Dots entry point
//!
//! There is no renderer in this crate; the native binary plays the bundled
//! levels headlessly and logs what happens. Set `RUST_LOG=debug` to see every
//! tap and rope.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use rope_dots::consts::LEVEL_DATA_PATH;
use rope_dots::demo::run_all_levels_from_resource;
use rope_dots::Settings;

const SETTINGS_PATH: &str = "settings.json";

fn main() {
    env_logger::init();
    log::info!("Rope Dots (headless) starting...");

    let settings = match std::fs::read_to_string(SETTINGS_PATH) {
        Ok(json) => Settings::from_json(&json),
        Err(_) => {
            log::info!("Using default settings");
            Settings::default()
        }
    };

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    log::info!("Autoplayer seed: {}", seed);

    match run_all_levels_from_resource(Path::new(LEVEL_DATA_PATH), settings, seed) {
        Ok(report) => println!(
            "Completed {} levels ({} empty, {} rejected taps, {} stalled)",
            report.levels_completed,
            report.empty_levels,
            report.rejected_taps,
            report.stalled_levels
        ),
        Err(e) => {
            log::error!("Could not load levels: {}", e);
            std::process::exit(1);
        }
    }
}
