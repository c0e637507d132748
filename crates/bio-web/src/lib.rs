//! egui front end for the bio page. Runs natively through `eframe::run_native`
//! and in the browser through the wasm entry point in `web`.

mod app;
pub mod media;
pub mod paint;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use app::BioPageApp;
