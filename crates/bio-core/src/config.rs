use serde::{Deserialize, Serialize};

use crate::transform::DEFAULT_PERSPECTIVE;

/// Page-wide knobs that are not part of any preset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageConfig {
    /// Preset shown first; the registry's first entry when unset or unknown.
    pub initial_preset: Option<String>,
    pub perspective: f32,
    /// Scroll to background drift for backgrounds with `parallax` set.
    pub background_parallax: f32,
    /// How far the cursor dot follows the pointer, in px.
    pub cursor_follow: f32,
    /// Opacity of the dark layer laid over the background.
    pub scrim_opacity: f32,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            initial_preset: None,
            perspective: DEFAULT_PERSPECTIVE,
            background_parallax: 0.01,
            cursor_follow: 20.0,
            scrim_opacity: 0.3,
        }
    }
}

impl PageConfig {
    pub fn with_initial_preset(mut self, key: impl Into<String>) -> Self {
        self.initial_preset = Some(key.into());
        self
    }
}
