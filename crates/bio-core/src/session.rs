//! State owned by one visible page: the active preset, pointer and scroll
//! samples, and one audio controller per mounted music player.

use std::collections::BTreeMap;

use crate::audio::{AudioController, PlaybackCollaborator};
use crate::config::PageConfig;
use crate::css::Rgba;
use crate::error::{BioError, Result};
use crate::preset::Preset;
use crate::registry::PresetRegistry;
use crate::render::{self, BackgroundView, PanelView};
use crate::tracker::{ReferenceRect, Tracker};
use crate::transform::{self, Transform3D};
use crate::widget::MusicPlayer;

/// Position of a music player inside the active preset. The same id is
/// reused by whichever preset mounts a player in that slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlayerId {
    pub container: usize,
    pub slot: usize,
}

/// Everything the page reacts to.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewEvent {
    SelectPreset(String),
    PointerMoved { x: f32, y: f32, reference: ReferenceRect },
    Scrolled(f32),
    TogglePlayback(PlayerId),
    SeekFraction(PlayerId, f64),
    TimeUpdate(PlayerId, f64),
    MetadataLoaded(PlayerId, f64),
    Ended(PlayerId),
    MediaError(PlayerId, String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SelectorEntry {
    pub key: String,
    pub label: String,
    pub active: bool,
}

/// A full frame of the page, ready to paint.
#[derive(Clone, Debug, PartialEq)]
pub struct PageView {
    pub background: BackgroundView,
    pub background_offset: f32,
    pub scrim_opacity: f32,
    pub transform: Transform3D,
    pub selector: Vec<SelectorEntry>,
    pub panels: Vec<PanelView>,
    pub accent: Rgba,
    pub text: Rgba,
}

type MountFn<C> = Box<dyn FnMut(PlayerId, &MusicPlayer) -> C>;

pub struct ViewSession<C: PlaybackCollaborator> {
    registry: PresetRegistry,
    config: PageConfig,
    active: usize,
    tracker: Tracker,
    players: BTreeMap<PlayerId, AudioController<C>>,
    mount: MountFn<C>,
}

impl<C: PlaybackCollaborator> ViewSession<C> {
    /// `mount` creates the media collaborator for each music player of
    /// whichever preset becomes active.
    pub fn new(
        registry: PresetRegistry,
        config: PageConfig,
        mount: impl FnMut(PlayerId, &MusicPlayer) -> C + 'static,
    ) -> Self {
        let active = match config.initial_preset.as_deref() {
            Some(key) => registry.position(key).unwrap_or_else(|| {
                log::warn!("initial preset `{key}` is not registered, using the first preset");
                0
            }),
            None => 0,
        };
        let mut session = Self {
            registry,
            config,
            active,
            tracker: Tracker::default(),
            players: BTreeMap::new(),
            mount: Box::new(mount),
        };
        session.mount_players();
        session
    }

    pub fn registry(&self) -> &PresetRegistry {
        &self.registry
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn active_preset(&self) -> &Preset {
        &self.registry.presets()[self.active]
    }

    pub fn active_key(&self) -> &str {
        &self.active_preset().key
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn player(&self, id: PlayerId) -> Option<&AudioController<C>> {
        self.players.get(&id)
    }

    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.keys().copied()
    }

    /// Switches the active preset. Players of the old preset are stopped and
    /// dropped; the new preset's players start idle.
    pub fn set_active(&mut self, key: &str) -> Result<()> {
        let Some(index) = self.registry.position(key) else {
            return Err(BioError::NotFound { key: key.to_owned() });
        };
        if index == self.active {
            return Ok(());
        }
        log::debug!("switching preset {} -> {key}", self.active_key());
        self.unmount_players();
        self.active = index;
        self.mount_players();
        Ok(())
    }

    pub fn handle(&mut self, event: ViewEvent) -> Result<()> {
        match event {
            ViewEvent::SelectPreset(key) => return self.set_active(&key),
            ViewEvent::PointerMoved { x, y, reference } => self.tracker.on_pointer_move(x, y, reference),
            ViewEvent::Scrolled(offset) => self.tracker.on_scroll(offset),
            ViewEvent::TogglePlayback(id) => self.with_player(id, |p| {
                p.toggle();
            }),
            ViewEvent::SeekFraction(id, f) => self.with_player(id, |p| p.seek_to_fraction(f)),
            ViewEvent::TimeUpdate(id, t) => self.with_player(id, |p| p.on_time_update(t)),
            ViewEvent::MetadataLoaded(id, d) => self.with_player(id, |p| p.on_metadata_loaded(d)),
            ViewEvent::Ended(id) => self.with_player(id, AudioController::on_ended),
            ViewEvent::MediaError(id, message) => self.with_player(id, |p| p.on_error(&message)),
        }
        Ok(())
    }

    pub fn transform(&self) -> Transform3D {
        let preset = self.active_preset();
        transform::compute_transform(self.tracker.pointer, self.tracker.scroll, &preset.theme)
            .with_perspective(self.config.perspective)
    }

    pub fn render(&self) -> PageView {
        let preset = self.active_preset();
        let style = preset.theme.style();
        let panels = preset
            .containers()
            .into_iter()
            .enumerate()
            .map(|(container, widgets)| {
                render::render_panel(widgets, &style, |slot| {
                    self.players
                        .get(&PlayerId { container, slot })
                        .map(AudioController::state)
                })
            })
            .collect();
        PageView {
            background: render::render_background(&preset.background),
            background_offset: transform::background_offset(
                self.tracker.scroll,
                &preset.background,
                self.config.background_parallax,
            ),
            scrim_opacity: self.config.scrim_opacity,
            transform: self.transform(),
            selector: self
                .registry
                .presets()
                .iter()
                .enumerate()
                .map(|(i, p)| SelectorEntry {
                    key: p.key.clone(),
                    label: p.display_name.clone(),
                    active: i == self.active,
                })
                .collect(),
            panels,
            accent: style.accent,
            text: style.text,
        }
    }

    fn with_player(&mut self, id: PlayerId, f: impl FnOnce(&mut AudioController<C>)) {
        match self.players.get_mut(&id) {
            Some(player) => f(player),
            // No player in this slot of the active preset. Ids carry no
            // generation, so callers drop a collaborator's listeners before
            // its slot is remounted.
            None => log::debug!("ignoring event for unmounted player {id:?}"),
        }
    }

    fn mount_players(&mut self) {
        let preset = &self.registry.presets()[self.active];
        for (container, widgets) in preset.containers().into_iter().enumerate() {
            for (slot, widget) in widgets.iter().enumerate() {
                if let Some(music) = widget.as_music_player() {
                    let id = PlayerId { container, slot };
                    let collaborator = (self.mount)(id, music);
                    self.players.insert(id, AudioController::new(collaborator));
                }
            }
        }
    }

    fn unmount_players(&mut self) {
        for player in self.players.values_mut() {
            player.stop();
        }
        self.players.clear();
    }
}

impl<C: PlaybackCollaborator> Drop for ViewSession<C> {
    fn drop(&mut self) {
        self.unmount_players();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::MediaRequest;
    use crate::render::Visual;

    fn session() -> ViewSession<Vec<MediaRequest>> {
        ViewSession::new(PresetRegistry::builtin().unwrap(), PageConfig::default(), |_, _| Vec::new())
    }

    const AURORA_PLAYER: PlayerId = PlayerId { container: 2, slot: 0 };

    #[test]
    fn defaults_to_first_preset_and_mounts_players() {
        let s = session();
        assert_eq!(s.active_key(), "aurora");
        assert_eq!(s.player_ids().collect::<Vec<_>>(), vec![AURORA_PLAYER]);
    }

    #[test]
    fn unknown_initial_preset_falls_back() {
        let s: ViewSession<Vec<MediaRequest>> = ViewSession::new(
            PresetRegistry::builtin().unwrap(),
            PageConfig::default().with_initial_preset("nope"),
            |_, _| Vec::new(),
        );
        assert_eq!(s.active_key(), "aurora");
    }

    #[test]
    fn selecting_unknown_preset_fails_and_keeps_active() {
        let mut s = session();
        let err = s.handle(ViewEvent::SelectPreset("missing".into())).unwrap_err();
        assert!(matches!(err, crate::BioError::NotFound { key } if key == "missing"));
        assert_eq!(s.active_key(), "aurora");
    }

    #[test]
    fn reselecting_active_preset_keeps_players() {
        let mut s = session();
        s.handle(ViewEvent::MetadataLoaded(AURORA_PLAYER, 118.0)).unwrap();
        s.set_active("aurora").unwrap();
        assert_eq!(s.player(AURORA_PLAYER).unwrap().state().duration, 118.0);
    }

    #[test]
    fn switching_remounts_idle_players() {
        let mut s = session();
        s.handle(ViewEvent::MetadataLoaded(AURORA_PLAYER, 118.0)).unwrap();
        s.handle(ViewEvent::TogglePlayback(AURORA_PLAYER)).unwrap();
        s.set_active("crimson").unwrap();

        let player = s.player(AURORA_PLAYER).unwrap();
        assert_eq!(player.state(), crate::PlaybackState::default());
        assert!(player.collaborator().is_empty());

        s.set_active("studio").unwrap();
        assert_eq!(s.player_ids().count(), 0);
        // Stale notification for the unmounted player.
        s.handle(ViewEvent::TimeUpdate(AURORA_PLAYER, 3.0)).unwrap();
    }

    #[test]
    fn pointer_and_scroll_drive_the_transform() {
        let mut s = session();
        let reference = ReferenceRect {
            left: 0.0,
            top: 0.0,
            width: 200.0,
            height: 200.0,
        };
        s.handle(ViewEvent::PointerMoved { x: 200.0, y: 100.0, reference }).unwrap();
        s.handle(ViewEvent::Scrolled(100.0)).unwrap();
        let t = s.transform();
        assert_eq!(t.rotate_y, 8.0);
        assert_eq!(t.rotate_x, 0.0);
        assert_eq!(t.translate_y, 100.0 * 0.05);
        assert_eq!(s.render().transform, t);
    }

    #[test]
    fn render_marks_active_selector_entry() {
        let page = session().render();
        let active: Vec<&str> = page
            .selector
            .iter()
            .filter(|e| e.active)
            .map(|e| e.label.as_str())
            .collect();
        assert_eq!(active, ["Aiden"]);
        assert_eq!(page.panels.len(), 3);
        assert!(matches!(page.panels[2].items[0], Visual::MusicPlayer(_)));
    }
}
