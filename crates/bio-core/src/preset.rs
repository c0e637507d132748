use serde::Deserialize;
use serde_json::Value;

use crate::error::BioError;
use crate::theme::Theme;
use crate::widget::{RawWidget, Widget};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    Image,
    Gradient,
    Solid,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Background {
    #[serde(rename = "type", alias = "kind")]
    pub kind: BackgroundKind,
    /// Image URL, CSS gradient or CSS color depending on `kind`.
    pub value: String,
    /// When set, the background layer drifts with the scroll offset.
    #[serde(default)]
    pub parallax: bool,
}

/// Widgets sharing one themed container.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Panel {
    pub widgets: Vec<Widget>,
}

/// How a preset lays out its widgets.
#[derive(Clone, Debug, PartialEq)]
pub enum Layout {
    Panels(Vec<Panel>),
    /// Each widget gets a container of its own.
    Flat(Vec<Widget>),
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "RawPreset")]
pub struct Preset {
    pub key: String,
    pub display_name: String,
    pub background: Background,
    pub layout: Layout,
    pub theme: Theme,
}

impl Preset {
    /// Widget groups in display order, one slice per visual container.
    pub fn containers(&self) -> Vec<&[Widget]> {
        match &self.layout {
            Layout::Panels(panels) => panels.iter().map(|p| p.widgets.as_slice()).collect(),
            Layout::Flat(widgets) => widgets.iter().map(std::slice::from_ref).collect(),
        }
    }

    pub fn widgets(&self) -> impl Iterator<Item = &Widget> {
        self.containers().into_iter().flatten()
    }
}

/// A `panels` entry is either a group (`{"widgets": [...]}`) or a bare widget,
/// which is shorthand for a single-widget panel.
fn panel_entry(entry: Value) -> Result<Panel, BioError> {
    if entry.get("widgets").is_some() {
        return Ok(serde_json::from_value(entry)?);
    }
    let raw: RawWidget = serde_json::from_value(entry)?;
    Ok(Panel {
        widgets: vec![Widget::try_from(raw)?],
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPreset {
    #[serde(default)]
    key: Option<String>,
    #[serde(alias = "name")]
    display_name: String,
    background: Background,
    #[serde(default)]
    panels: Option<Vec<Value>>,
    #[serde(default)]
    widgets: Option<Vec<Widget>>,
    theme: Theme,
}

impl TryFrom<RawPreset> for Preset {
    type Error = BioError;

    fn try_from(raw: RawPreset) -> Result<Self, Self::Error> {
        let key = raw
            .key
            .unwrap_or_else(|| raw.display_name.to_lowercase().replace(char::is_whitespace, "-"));
        let layout = match (raw.panels, raw.widgets) {
            (Some(entries), _) => Layout::Panels(
                entries
                    .into_iter()
                    .map(panel_entry)
                    .collect::<Result<_, _>>()?,
            ),
            (None, Some(widgets)) => Layout::Flat(widgets),
            (None, None) => return Err(BioError::MissingContent { key }),
        };
        Ok(Self {
            key,
            display_name: raw.display_name,
            background: raw.background,
            layout,
            theme: raw.theme,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::WidgetKind;
    use serde_json::json;

    fn theme() -> serde_json::Value {
        serde_json::to_value(Theme::default()).unwrap()
    }

    #[test]
    fn bare_widgets_in_panels_become_single_panels() {
        let p: Preset = serde_json::from_value(json!({
            "key": "aiden",
            "name": "Aiden",
            "background": { "type": "image", "value": "bg.jpg" },
            "panels": [
                { "type": "text", "data": { "title": "Hi", "text": "there" } },
                { "widgets": [
                    { "type": "button", "data": { "label": "Go", "url": "https://example.com" } },
                    { "type": "text", "data": { "text": "below" } }
                ] }
            ],
            "theme": theme()
        }))
        .unwrap();
        let containers = p.containers();
        assert_eq!(containers.len(), 2);
        assert_eq!(containers[0].len(), 1);
        assert_eq!(containers[1][0].kind(), WidgetKind::Button);
        assert_eq!(p.widgets().count(), 3);
    }

    #[test]
    fn flat_widgets_get_one_container_each() {
        let p: Preset = serde_json::from_value(json!({
            "displayName": "Night Sky",
            "background": { "type": "solid", "value": "#000", "parallax": true },
            "widgets": [
                { "type": "text", "data": { "text": "a" } },
                { "type": "text", "data": { "text": "b" } }
            ],
            "theme": theme()
        }))
        .unwrap();
        assert_eq!(p.key, "night-sky");
        assert!(p.background.parallax);
        assert!(matches!(p.layout, Layout::Flat(_)));
        assert_eq!(p.containers().len(), 2);
    }

    #[test]
    fn malformed_widget_in_panels_names_its_kind() {
        let bad = json!({ "type": "button", "data": { "label": 3 } });
        let preset = |panels: serde_json::Value| {
            json!({
                "key": "broken",
                "name": "Broken",
                "background": { "type": "solid", "value": "#000" },
                "panels": panels,
                "theme": theme()
            })
        };

        let bare = serde_json::from_value::<Preset>(preset(json!([bad.clone()]))).unwrap_err();
        assert!(bare.to_string().contains("malformed `button` widget payload"), "{bare}");

        let grouped = serde_json::from_value::<Preset>(preset(json!([{ "widgets": [bad] }]))).unwrap_err();
        assert!(grouped.to_string().contains("malformed `button` widget payload"), "{grouped}");
    }

    #[test]
    fn bare_widget_error_is_invalid_widget() {
        let entry = json!({ "type": "music", "data": { "song": "Dare" } });
        let err = panel_entry(entry).unwrap_err();
        assert!(matches!(err, BioError::InvalidWidget { ref kind, .. } if kind == "music"), "{err}");
    }

    #[test]
    fn preset_without_content_is_rejected() {
        let err = serde_json::from_value::<Preset>(json!({
            "key": "empty",
            "name": "Empty",
            "background": { "type": "solid", "value": "#000" },
            "theme": theme()
        }))
        .unwrap_err();
        assert!(err.to_string().contains("empty"));
    }
}
