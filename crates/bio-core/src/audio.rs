//! Playback state for one music-player widget.

/// Control surface of the media element backing a player.
///
/// Requests are fire-and-forget: the element may refuse or fail them, and
/// the controller never waits for confirmation.
pub trait PlaybackCollaborator {
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, seconds: f64);
}

/// A request made to a [`PlaybackCollaborator`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MediaRequest {
    Play,
    Pause,
    Seek(f64),
}

/// Records every request; useful wherever no real media element exists.
impl PlaybackCollaborator for Vec<MediaRequest> {
    fn play(&mut self) {
        self.push(MediaRequest::Play);
    }

    fn pause(&mut self) {
        self.push(MediaRequest::Pause);
    }

    fn seek(&mut self, seconds: f64) {
        self.push(MediaRequest::Seek(seconds));
    }
}

impl<C: PlaybackCollaborator + ?Sized> PlaybackCollaborator for Box<C> {
    fn play(&mut self) {
        (**self).play();
    }

    fn pause(&mut self) {
        (**self).pause();
    }

    fn seek(&mut self, seconds: f64) {
        (**self).seek(seconds);
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub current_time: f64,
    pub duration: f64,
}

impl PlaybackState {
    /// `current_time / duration`, or 0 while the duration is unknown.
    pub fn progress(&self) -> f64 {
        if self.duration > 0.0 {
            self.current_time / self.duration
        } else {
            0.0
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackPhase {
    Idle,
    Loaded,
    Playing,
    Paused,
}

/// `mm:ss`, both fields floored and zero padded.
pub fn format_time(seconds: f64) -> String {
    let mins = (seconds / 60.0) as u32;
    let secs = (seconds % 60.0) as u32;
    format!("{mins:02}:{secs:02}")
}

pub struct AudioController<C> {
    state: PlaybackState,
    started: bool,
    collaborator: C,
}

impl<C: PlaybackCollaborator> AudioController<C> {
    pub fn new(collaborator: C) -> Self {
        Self {
            state: PlaybackState::default(),
            started: false,
            collaborator,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn phase(&self) -> PlaybackPhase {
        if self.state.is_playing {
            PlaybackPhase::Playing
        } else if self.started {
            PlaybackPhase::Paused
        } else if self.state.duration > 0.0 {
            PlaybackPhase::Loaded
        } else {
            PlaybackPhase::Idle
        }
    }

    /// Requests play or pause and flips `is_playing` right away, without
    /// waiting for the element to confirm.
    pub fn toggle(&mut self) -> bool {
        if self.state.is_playing {
            self.collaborator.pause();
        } else {
            self.collaborator.play();
        }
        self.started = true;
        self.state.is_playing = !self.state.is_playing;
        log::debug!("playback toggled, playing = {}", self.state.is_playing);
        self.state.is_playing
    }

    /// Jumps to `fraction` of the duration. Ignored until the duration is
    /// known.
    pub fn seek_to_fraction(&mut self, fraction: f64) {
        if self.state.duration <= 0.0 || fraction.is_nan() {
            return;
        }
        let target = fraction.clamp(0.0, 1.0) * self.state.duration;
        log::debug!("seeking to {target:.2}s");
        self.collaborator.seek(target);
        self.state.current_time = target;
    }

    pub fn on_time_update(&mut self, current_time: f64) {
        self.state.current_time = finite_or_zero(current_time);
    }

    /// Safe to repeat; the latest reported duration wins.
    pub fn on_metadata_loaded(&mut self, duration: f64) {
        self.state.duration = finite_or_zero(duration);
    }

    /// The element reached the end; the play control goes back to "play".
    pub fn on_ended(&mut self) {
        self.state.is_playing = false;
    }

    /// Load or playback failure. There is no recovery: the state stays
    /// wherever it was and the UI keeps showing it.
    pub fn on_error(&mut self, message: &str) {
        log::warn!("media unavailable: {message}");
    }

    /// Pauses the element if it is playing; used when the player unmounts.
    pub fn stop(&mut self) {
        if self.state.is_playing {
            self.collaborator.pause();
            self.state.is_playing = false;
        }
    }

    pub fn collaborator(&self) -> &C {
        &self.collaborator
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}
