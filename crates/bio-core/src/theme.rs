use serde::{Deserialize, Serialize};

use crate::css::{self, Border, Rgba};

/// Visual parameters shared by every widget of a preset.
///
/// Style fields are kept as authored (CSS strings); [`Theme::style`] turns
/// them into concrete colors for painting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub widget_border: String,
    pub widget_background: String,
    pub widget_hover_background: String,
    pub text_color: String,
    pub accent_color: String,
    pub button_background: String,
    pub button_hover_background: String,
    /// Scroll offset to panel translation, in px per px scrolled.
    pub parallax_intensity: f32,
    /// Pointer offset to panel rotation, in degrees at the container edge.
    pub mouse_grind_intensity: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            widget_border: "2px solid rgba(255, 255, 255, 0.3)".into(),
            widget_background: "rgba(0, 0, 0, 0.6)".into(),
            widget_hover_background: "rgba(20, 20, 20, 0.8)".into(),
            text_color: "#fff".into(),
            accent_color: "#ffffff".into(),
            button_background: "rgba(255, 255, 255, 0.15)".into(),
            button_hover_background: "rgba(255, 255, 255, 0.25)".into(),
            parallax_intensity: 0.05,
            mouse_grind_intensity: 5.0,
        }
    }
}

/// A [`Theme`] with every style string resolved to a concrete value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThemeStyle {
    pub border: Border,
    pub background: Rgba,
    pub hover_background: Rgba,
    pub text: Rgba,
    pub accent: Rgba,
    pub button_background: Rgba,
    pub button_hover_background: Rgba,
}

impl Theme {
    /// Resolves the style strings. Values that cannot be parsed fall back to
    /// a neutral default and are logged, they never fail the render.
    pub fn style(&self) -> ThemeStyle {
        let border = css::parse_border(&self.widget_border).unwrap_or_else(|| {
            log::warn!("unparseable widget border `{}`", self.widget_border);
            Border {
                width: 1.0,
                color: Rgba::from_rgba(255, 255, 255, 77),
            }
        });
        ThemeStyle {
            border,
            background: color_or(&self.widget_background, Rgba::from_rgba(0, 0, 0, 153)),
            hover_background: color_or(&self.widget_hover_background, Rgba::from_rgba(20, 20, 20, 204)),
            text: color_or(&self.text_color, Rgba::WHITE),
            accent: color_or(&self.accent_color, Rgba::WHITE),
            button_background: color_or(&self.button_background, Rgba::from_rgba(255, 255, 255, 38)),
            button_hover_background: color_or(
                &self.button_hover_background,
                Rgba::from_rgba(255, 255, 255, 64),
            ),
        }
    }
}

/// Plain colors first, then the midpoint of a gradient, then `fallback`.
fn color_or(value: &str, fallback: Rgba) -> Rgba {
    if let Some(c) = css::parse_color(value) {
        return c;
    }
    if let Some(g) = css::parse_linear_gradient(value) {
        return g.color_at(0.5);
    }
    log::warn!("unparseable color `{value}`, using fallback");
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_authored_strings() {
        let theme = Theme {
            widget_border: "2px solid #ff0000".into(),
            widget_background: "rgba(0,0,0,0.6)".into(),
            accent_color: "#ff0000".into(),
            ..Theme::default()
        };
        let style = theme.style();
        assert_eq!(style.border.width, 2.0);
        assert_eq!(style.border.color, Rgba::from_rgb(255, 0, 0));
        assert_eq!(style.background, Rgba::from_rgba(0, 0, 0, 153));
        assert_eq!(style.accent, Rgba::from_rgb(255, 0, 0));
    }

    #[test]
    fn bad_values_fall_back() {
        let theme = Theme {
            widget_border: "thick".into(),
            text_color: "???".into(),
            ..Theme::default()
        };
        let style = theme.style();
        assert_eq!(style.border.width, 1.0);
        assert_eq!(style.text, Rgba::WHITE);
    }

    #[test]
    fn none_border_is_invisible() {
        let theme = Theme {
            widget_border: "none".into(),
            ..Theme::default()
        };
        let border = theme.style().border;
        assert_eq!(border.width, 0.0);
        assert_eq!(border.color, Rgba::TRANSPARENT);
    }

    #[test]
    fn deserializes_camel_case() {
        let json = r##"{
            "widgetBorder": "2px solid #ff0000",
            "widgetBackground": "rgba(0,0,0,0.6)",
            "widgetHoverBackground": "rgba(20,0,0,0.8)",
            "textColor": "#fff",
            "accentColor": "#ff0000",
            "buttonBackground": "#ff0000",
            "buttonHoverBackground": "#cc0000",
            "parallaxIntensity": 0.03,
            "mouseGrindIntensity": 5
        }"##;
        let theme: Theme = serde_json::from_str(json).unwrap();
        assert_eq!(theme.mouse_grind_intensity, 5.0);
        assert_eq!(theme.button_hover_background, "#cc0000");
    }
}
