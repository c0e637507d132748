//! Widget dispatcher: turns preset data plus the resolved theme into a
//! toolkit-independent description of what to draw.

use crate::audio::{format_time, PlaybackState};
use crate::css::{self, Border, LinearGradient, Rgba};
use crate::preset::{Background, BackgroundKind};
use crate::theme::ThemeStyle;
use crate::widget::{
    ButtonLink, Gallery, MusicPlayer, Profile, SocialIcons, TextBlock, VideoFrame, Widget, WidgetKind,
};

pub const DEFAULT_GALLERY_INTERVAL: f64 = 3.0;
pub const GALLERY_COLUMNS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkTarget {
    /// Opened in a new browsing context, the page stays put.
    NewContext,
    /// Replaces the page.
    SameContext,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Activation {
    pub url: String,
    pub target: LinkTarget,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BadgeView {
    pub icon: String,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProfileView {
    pub avatar: String,
    pub name: String,
    pub bio: String,
    pub badges: Vec<BadgeView>,
    pub ring: Rgba,
    pub text: Rgba,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SocialIconView {
    pub label: String,
    pub glyph: String,
    pub image: Option<String>,
    pub activation: Activation,
    pub background: Rgba,
    pub hover_background: Rgba,
    pub ring: Rgba,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MusicPlayerView {
    pub title: String,
    pub elapsed: String,
    pub total: String,
    /// Filled share of the progress bar, `0..=1`.
    pub progress: f32,
    pub is_playing: bool,
    pub control: Rgba,
    pub text: Rgba,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextView {
    pub title: String,
    pub body: String,
    pub text: Rgba,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GalleryView {
    pub images: Vec<String>,
    pub columns: usize,
    /// Seconds per auto-advance step, `None` when autoplay is off.
    pub autoplay_interval: Option<f64>,
    pub highlight: Rgba,
}

impl GalleryView {
    /// Image emphasized after `elapsed` seconds of autoplay.
    pub fn highlighted(&self, elapsed: f64) -> Option<usize> {
        let interval = self.autoplay_interval?;
        if self.images.is_empty() || elapsed < 0.0 {
            return None;
        }
        Some((elapsed / interval) as usize % self.images.len())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VideoView {
    pub title: String,
    pub embed_url: String,
    /// Width over height.
    pub aspect_ratio: f32,
    pub text: Rgba,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ButtonView {
    pub label: String,
    pub activation: Activation,
    pub background: Rgba,
    pub hover_background: Rgba,
    pub text: Rgba,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlaceholderView {
    pub kind: String,
    pub message: String,
    pub text: Rgba,
}

/// One rendered widget.
#[derive(Clone, Debug, PartialEq)]
pub enum Visual {
    Profile(ProfileView),
    SocialIcons(Vec<SocialIconView>),
    MusicPlayer(MusicPlayerView),
    Text(TextView),
    Gallery(GalleryView),
    Video(VideoView),
    Button(ButtonView),
    Placeholder(PlaceholderView),
}

impl Visual {
    pub fn kind(&self) -> WidgetKind {
        match self {
            Self::Profile(_) => WidgetKind::Profile,
            Self::SocialIcons(_) => WidgetKind::SocialIcons,
            Self::MusicPlayer(_) => WidgetKind::MusicPlayer,
            Self::Text(_) => WidgetKind::Text,
            Self::Gallery(_) => WidgetKind::Gallery,
            Self::Video(_) => WidgetKind::Video,
            Self::Button(_) => WidgetKind::Button,
            Self::Placeholder(p) => WidgetKind::Unknown(p.kind.clone()),
        }
    }
}

/// Renders one widget. Total over every kind string: unknown kinds become
/// a [`Visual::Placeholder`].
///
/// `playback` is the state of the widget's audio controller, if it has one;
/// music players without it show the initial `00:00 / 00:00`.
pub fn render(widget: &Widget, style: &ThemeStyle, playback: Option<&PlaybackState>) -> Visual {
    match widget {
        Widget::Profile(p) => Visual::Profile(profile(p, style)),
        Widget::SocialIcons(s) => Visual::SocialIcons(social_icons(s, style)),
        Widget::MusicPlayer(m) => Visual::MusicPlayer(music_player(m, style, playback.copied().unwrap_or_default())),
        Widget::Text(t) => Visual::Text(text(t, style)),
        Widget::Gallery(g) => Visual::Gallery(gallery(g, style)),
        Widget::Video(v) => Visual::Video(video(v, style)),
        Widget::Button(b) => Visual::Button(button(b, style)),
        Widget::Unknown { kind, .. } => Visual::Placeholder(PlaceholderView {
            kind: kind.clone(),
            message: format!("Unrecognized widget: {kind}"),
            text: style.text,
        }),
    }
}

fn profile(p: &Profile, style: &ThemeStyle) -> ProfileView {
    ProfileView {
        avatar: p.avatar.clone(),
        name: p.name.clone(),
        bio: p.bio.clone(),
        badges: p
            .badges
            .iter()
            .map(|b| BadgeView {
                icon: b.icon.clone(),
                label: b.tooltip.clone(),
            })
            .collect(),
        ring: style.accent,
        text: style.text,
    }
}

fn social_icons(s: &SocialIcons, style: &ThemeStyle) -> Vec<SocialIconView> {
    s.icons
        .iter()
        .map(|link| SocialIconView {
            label: link.label.clone(),
            glyph: link.icon.clone(),
            image: link.icon_image().map(str::to_owned),
            activation: Activation {
                url: link.url.clone(),
                target: LinkTarget::NewContext,
            },
            background: style.button_background,
            hover_background: style.button_hover_background,
            ring: style.accent,
        })
        .collect()
}

fn music_player(m: &MusicPlayer, style: &ThemeStyle, state: PlaybackState) -> MusicPlayerView {
    MusicPlayerView {
        title: m.song.clone(),
        elapsed: format_time(state.current_time),
        total: format_time(state.duration),
        progress: state.progress().clamp(0.0, 1.0) as f32,
        is_playing: state.is_playing,
        control: style.accent,
        text: style.text,
    }
}

fn text(t: &TextBlock, style: &ThemeStyle) -> TextView {
    TextView {
        title: t.title.clone(),
        body: t.text.clone(),
        text: style.text,
    }
}

fn gallery(g: &Gallery, style: &ThemeStyle) -> GalleryView {
    let interval = g
        .interval
        .filter(|i| i.is_finite() && *i > 0.0)
        .unwrap_or(DEFAULT_GALLERY_INTERVAL);
    GalleryView {
        images: g.images.clone(),
        columns: g.images.len().clamp(1, GALLERY_COLUMNS),
        autoplay_interval: g.autoplay.then_some(interval),
        highlight: style.accent,
    }
}

fn video(v: &VideoFrame, style: &ThemeStyle) -> VideoView {
    VideoView {
        title: v.title.clone(),
        embed_url: v.embed_url(),
        aspect_ratio: v.aspect(),
        text: style.text,
    }
}

fn button(b: &ButtonLink, style: &ThemeStyle) -> ButtonView {
    ButtonView {
        label: b.label.clone(),
        activation: Activation {
            url: b.url.clone(),
            target: LinkTarget::SameContext,
        },
        background: style.button_background,
        hover_background: style.button_hover_background,
        text: style.text,
    }
}

/// Widgets of one container, rendered inside the theme's frame.
#[derive(Clone, Debug, PartialEq)]
pub struct PanelView {
    pub border: Border,
    pub background: Rgba,
    pub hover_background: Rgba,
    pub items: Vec<Visual>,
}

/// `playback(slot)` yields the controller state for the widget at `slot`.
pub fn render_panel(
    widgets: &[Widget],
    style: &ThemeStyle,
    playback: impl Fn(usize) -> Option<PlaybackState>,
) -> PanelView {
    PanelView {
        border: style.border,
        background: style.background,
        hover_background: style.hover_background,
        items: widgets
            .iter()
            .enumerate()
            .map(|(slot, w)| render(w, style, playback(slot).as_ref()))
            .collect(),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum BackgroundView {
    Image(String),
    Gradient(LinearGradient),
    Solid(Rgba),
}

pub fn render_background(background: &Background) -> BackgroundView {
    match background.kind {
        BackgroundKind::Image => BackgroundView::Image(background.value.clone()),
        BackgroundKind::Gradient => match css::parse_linear_gradient(&background.value) {
            Some(g) => BackgroundView::Gradient(g),
            None => {
                log::warn!("unparseable background gradient `{}`", background.value);
                BackgroundView::Solid(Rgba::BLACK)
            }
        },
        BackgroundKind::Solid => BackgroundView::Solid(css::parse_color(&background.value).unwrap_or_else(|| {
            log::warn!("unparseable background color `{}`", background.value);
            Rgba::BLACK
        })),
    }
}
