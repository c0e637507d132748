#![cfg(not(target_arch = "wasm32"))]

use anyhow::{anyhow, Context};
use bio_core::{PageConfig, PresetRegistry};
use bio_web::BioPageApp;

/// `bio-page [PRESET_KEY] [PRESETS_JSON]`
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let initial = args.next();
    let registry = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path).with_context(|| format!("reading presets from {path}"))?;
            PresetRegistry::from_json(&json).with_context(|| format!("parsing presets from {path}"))?
        }
        None => PresetRegistry::builtin()?,
    };
    let config = match initial {
        Some(key) => PageConfig::default().with_initial_preset(key),
        None => PageConfig::default(),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 900.0])
            .with_title("Bio Page"),
        ..Default::default()
    };

    eframe::run_native(
        "Bio Page",
        options,
        Box::new(move |cc| Ok(Box::new(BioPageApp::new(cc, registry, config)))),
    )
    .map_err(|e| anyhow!("eframe exited: {e}"))
}
