//! Widget kinds and their payloads.
//!
//! Preset data tags each widget with a `type` string and keeps the payload
//! under `data`. Tags outside the known set are kept as [`Widget::Unknown`]
//! so that newer preset data still loads; the renderer shows a placeholder
//! for them.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::error::BioError;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Profile,
    SocialIcons,
    MusicPlayer,
    Text,
    Gallery,
    Video,
    Button,
    Unknown(String),
}

impl WidgetKind {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "profile" => Self::Profile,
            "social-icons" | "socials" => Self::SocialIcons,
            "music-player" | "music" => Self::MusicPlayer,
            "text" => Self::Text,
            "gallery" => Self::Gallery,
            "video" | "video-frame" => Self::Video,
            "button" => Self::Button,
            other => Self::Unknown(other.to_owned()),
        }
    }

    /// Canonical tag; unknown kinds keep the tag they were authored with.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Profile => "profile",
            Self::SocialIcons => "social-icons",
            Self::MusicPlayer => "music-player",
            Self::Text => "text",
            Self::Gallery => "gallery",
            Self::Video => "video",
            Self::Button => "button",
            Self::Unknown(tag) => tag,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "RawWidget")]
pub enum Widget {
    Profile(Profile),
    SocialIcons(SocialIcons),
    MusicPlayer(MusicPlayer),
    Text(TextBlock),
    Gallery(Gallery),
    Video(VideoFrame),
    Button(ButtonLink),
    Unknown { kind: String, data: Value },
}

impl Widget {
    pub fn kind(&self) -> WidgetKind {
        match self {
            Self::Profile(_) => WidgetKind::Profile,
            Self::SocialIcons(_) => WidgetKind::SocialIcons,
            Self::MusicPlayer(_) => WidgetKind::MusicPlayer,
            Self::Text(_) => WidgetKind::Text,
            Self::Gallery(_) => WidgetKind::Gallery,
            Self::Video(_) => WidgetKind::Video,
            Self::Button(_) => WidgetKind::Button,
            Self::Unknown { kind, .. } => WidgetKind::Unknown(kind.clone()),
        }
    }

    pub fn as_music_player(&self) -> Option<&MusicPlayer> {
        match self {
            Self::MusicPlayer(m) => Some(m),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct RawWidget {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

impl TryFrom<RawWidget> for Widget {
    type Error = BioError;

    fn try_from(raw: RawWidget) -> Result<Self, Self::Error> {
        fn payload<T: serde::de::DeserializeOwned>(kind: &str, data: Value) -> Result<T, BioError> {
            serde_json::from_value(data).map_err(|source| BioError::InvalidWidget {
                kind: kind.to_owned(),
                source,
            })
        }

        let RawWidget { kind, data } = raw;
        let widget = match WidgetKind::parse(&kind) {
            WidgetKind::Profile => Self::Profile(payload(&kind, data)?),
            WidgetKind::SocialIcons => Self::SocialIcons(payload(&kind, data)?),
            WidgetKind::MusicPlayer => Self::MusicPlayer(payload(&kind, data)?),
            WidgetKind::Text => Self::Text(payload(&kind, data)?),
            WidgetKind::Gallery => Self::Gallery(payload(&kind, data)?),
            WidgetKind::Video => Self::Video(payload(&kind, data)?),
            WidgetKind::Button => Self::Button(payload(&kind, data)?),
            WidgetKind::Unknown(_) => Self::Unknown { kind, data },
        };
        Ok(widget)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Badge {
    pub icon: String,
    pub tooltip: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Profile {
    pub avatar: String,
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub badges: Vec<Badge>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SocialLink {
    pub label: String,
    pub url: String,
    /// Either a glyph (usually an emoji) or an image reference.
    #[serde(default)]
    pub icon: String,
}

impl SocialLink {
    pub fn icon_image(&self) -> Option<&str> {
        let icon = self.icon.as_str();
        let is_image = icon.starts_with("http://")
            || icon.starts_with("https://")
            || icon.starts_with("data:")
            || icon.starts_with('/');
        is_image.then_some(icon)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SocialIcons {
    pub icons: Vec<SocialLink>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicPlayer {
    #[serde(alias = "title")]
    pub song: String,
    #[serde(alias = "src")]
    pub audio_url: String,
    /// Advisory only, the media's own metadata wins once loaded.
    #[serde(default)]
    pub duration: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub title: String,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Gallery {
    #[serde(alias = "sources")]
    pub images: Vec<String>,
    #[serde(default)]
    pub autoplay: bool,
    /// Seconds between auto-advance steps.
    #[serde(default)]
    pub interval: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoFrame {
    #[serde(default)]
    pub title: String,
    #[serde(alias = "videoUrl", alias = "src")]
    pub url: String,
    #[serde(default)]
    pub aspect_ratio: Option<f32>,
}

impl VideoFrame {
    pub const DEFAULT_ASPECT_RATIO: f32 = 16.0 / 9.0;

    /// Width over height; missing or nonsensical ratios use 16:9.
    pub fn aspect(&self) -> f32 {
        match self.aspect_ratio {
            Some(r) if r.is_finite() && r > 0.0 => r,
            _ => Self::DEFAULT_ASPECT_RATIO,
        }
    }

    /// URL suitable for an embedded frame. YouTube watch, short and embed
    /// links are normalized to the embed form; anything else passes through.
    pub fn embed_url(&self) -> String {
        match youtube_id(&self.url) {
            Some(id) => format!("https://www.youtube.com/embed/{id}"),
            None => self.url.clone(),
        }
    }
}

fn youtube_id(url: &str) -> Option<&str> {
    if !(url.contains("youtube.com") || url.contains("youtu.be")) {
        return None;
    }
    let tail = ["youtu.be/", "/embed/", "/shorts/", "v="]
        .iter()
        .find_map(|marker| url.split_once(marker).map(|(_, rest)| rest))?;
    let id = tail.split(['?', '&', '#', '/']).next().unwrap_or(tail);
    (!id.is_empty()).then_some(id)
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ButtonLink {
    pub label: String,
    #[serde(alias = "target", alias = "targetUrl", alias = "href")]
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn widget(value: Value) -> Widget {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn kind_aliases_resolve() {
        assert_eq!(WidgetKind::parse("socials"), WidgetKind::SocialIcons);
        assert_eq!(WidgetKind::parse("music"), WidgetKind::MusicPlayer);
        assert_eq!(WidgetKind::parse("video-frame"), WidgetKind::Video);
        assert_eq!(WidgetKind::parse("marquee"), WidgetKind::Unknown("marquee".into()));
        assert_eq!(WidgetKind::parse("socials").as_str(), "social-icons");
    }

    #[test]
    fn profile_without_badges() {
        let w = widget(json!({
            "type": "profile",
            "data": { "avatar": "a.svg", "name": "Vell", "bio": "hi" }
        }));
        match w {
            Widget::Profile(p) => {
                assert_eq!(p.name, "Vell");
                assert!(p.badges.is_empty());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn music_player_field_aliases() {
        let w = widget(json!({
            "type": "music",
            "data": { "title": "Dare", "src": "dare.mp3", "duration": 243 }
        }));
        let m = w.as_music_player().unwrap();
        assert_eq!(m.song, "Dare");
        assert_eq!(m.audio_url, "dare.mp3");
        assert_eq!(m.duration, 243.0);
    }

    #[test]
    fn unknown_kind_is_kept() {
        let w = widget(json!({ "type": "countdown", "data": { "to": "2030-01-01" } }));
        assert_eq!(w.kind(), WidgetKind::Unknown("countdown".into()));
        assert!(!w.kind().is_known());
    }

    #[test]
    fn malformed_known_payload_is_an_error() {
        let err = serde_json::from_value::<Widget>(json!({ "type": "button", "data": { "label": 3 } }))
            .unwrap_err();
        assert!(err.to_string().contains("button"));
    }

    #[test]
    fn video_aspect_defaults() {
        let mut v = VideoFrame {
            title: String::new(),
            url: "https://example.com/v".into(),
            aspect_ratio: None,
        };
        assert_eq!(v.aspect(), 16.0 / 9.0);
        v.aspect_ratio = Some(-1.0);
        assert_eq!(v.aspect(), 16.0 / 9.0);
        v.aspect_ratio = Some(4.0 / 3.0);
        assert_eq!(v.aspect(), 4.0 / 3.0);
    }

    #[test]
    fn youtube_links_become_embeds() {
        let video = |url: &str| VideoFrame { title: String::new(), url: url.into(), aspect_ratio: None };
        assert_eq!(
            video("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=10").embed_url(),
            "https://www.youtube.com/embed/dQw4w9WgXcQ"
        );
        assert_eq!(
            video("https://youtu.be/dQw4w9WgXcQ?si=abc").embed_url(),
            "https://www.youtube.com/embed/dQw4w9WgXcQ"
        );
        assert_eq!(
            video("https://www.youtube.com/embed/dQw4w9WgXcQ").embed_url(),
            "https://www.youtube.com/embed/dQw4w9WgXcQ"
        );
        assert_eq!(video("https://player.vimeo.com/video/1").embed_url(), "https://player.vimeo.com/video/1");
    }

    #[test]
    fn social_icon_image_detection() {
        let glyph = SocialLink { label: "Web".into(), url: "https://example.com".into(), icon: "🌐".into() };
        let image = SocialLink { icon: "https://cdn.example.com/gh.png".into(), ..glyph.clone() };
        assert_eq!(glyph.icon_image(), None);
        assert_eq!(image.icon_image(), Some("https://cdn.example.com/gh.png"));
    }
}
