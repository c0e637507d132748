//! Media collaborators mounted for each music player.

use std::cell::RefCell;
use std::rc::Rc;

use bio_core::widget::MusicPlayer;
use bio_core::{PlayerId, ViewEvent};

#[cfg(target_arch = "wasm32")]
pub use crate::web::WebMedia as Media;
#[cfg(not(target_arch = "wasm32"))]
pub use silent::SilentMedia as Media;

/// Notifications from media elements, drained once per frame.
pub type EventQueue = Rc<RefCell<Vec<ViewEvent>>>;

/// Builds the mount callback handed to the view session.
pub fn mounter(ctx: &egui::Context, queue: &EventQueue) -> impl FnMut(PlayerId, &MusicPlayer) -> Media + 'static {
    let ctx = ctx.clone();
    let queue = Rc::clone(queue);
    move |id, music| Media::mount(id, music, &queue, &ctx)
}

#[cfg(not(target_arch = "wasm32"))]
mod silent {
    use bio_core::widget::MusicPlayer;
    use bio_core::{PlaybackCollaborator, PlayerId, ViewEvent};

    use super::EventQueue;

    /// Stand-in for builds without an audio element. The player reports a
    /// media error on mount, so it shows `00:00 / 00:00` and toggles without
    /// sound.
    pub struct SilentMedia {
        song: String,
    }

    impl SilentMedia {
        pub fn mount(id: PlayerId, music: &MusicPlayer, queue: &EventQueue, ctx: &egui::Context) -> Self {
            queue.borrow_mut().push(ViewEvent::MediaError(
                id,
                format!("no audio output for {}", music.audio_url),
            ));
            ctx.request_repaint();
            Self {
                song: music.song.clone(),
            }
        }
    }

    impl PlaybackCollaborator for SilentMedia {
        fn play(&mut self) {
            log::info!("`{}` stays silent in this build", self.song);
        }

        fn pause(&mut self) {}

        fn seek(&mut self, seconds: f64) {
            log::debug!("seek `{}` to {seconds:.1}s ignored", self.song);
        }
    }

}
