//! Preset and widget model behind the bio page.
//!
//! A [`PresetRegistry`] holds the presets, a [`ViewSession`] tracks which one
//! is active along with pointer, scroll and playback state, and
//! [`ViewSession::render`] produces a [`PageView`] that a front end paints.
//! Nothing in here touches a UI toolkit.

pub mod audio;
pub mod config;
pub mod css;
mod error;
pub mod preset;
pub mod registry;
pub mod render;
pub mod session;
pub mod theme;
pub mod tracker;
pub mod transform;
pub mod widget;

pub use audio::{format_time, AudioController, MediaRequest, PlaybackCollaborator, PlaybackPhase, PlaybackState};
pub use config::PageConfig;
pub use css::Rgba;
pub use error::{BioError, Result};
pub use preset::{Background, BackgroundKind, Layout, Panel, Preset};
pub use registry::PresetRegistry;
pub use render::{render, Visual};
pub use session::{PageView, PlayerId, ViewEvent, ViewSession};
pub use theme::{Theme, ThemeStyle};
pub use tracker::{Pointer, ReferenceRect, Tracker};
pub use transform::{compute_transform, Transform3D};
pub use widget::{Widget, WidgetKind};
