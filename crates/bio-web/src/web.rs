//! Browser glue: the wasm entry point, `<audio>` backed players and the
//! iframes laid over video widgets.

use std::collections::HashMap;

use anyhow::anyhow;
use bio_core::widget::MusicPlayer;
use bio_core::{PageConfig, PlaybackCollaborator, PlayerId, PresetRegistry, ViewEvent};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlAudioElement, HtmlIFrameElement};

use crate::media::EventQueue;
use crate::paint::VideoSlot;
use crate::BioPageApp;

pub const CANVAS_ID: &str = "bio_page_canvas";

// WASM entry point
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();

    wasm_bindgen_futures::spawn_local(async {
        if let Err(e) = run().await {
            log::error!("bio page failed to start: {e:#}");
        }
    });

    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let document = document().ok_or_else(|| anyhow!("no document on window"))?;
    let canvas = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow!("no canvas element with id '{CANVAS_ID}'"))?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .map_err(|_| anyhow!("element with id '{CANVAS_ID}' is not a canvas"))?;

    let registry = PresetRegistry::builtin()?;
    let config = match preset_from_url() {
        Some(key) => PageConfig::default().with_initial_preset(key),
        None => PageConfig::default(),
    };

    eframe::WebRunner::new()
        .start(
            canvas,
            eframe::WebOptions::default(),
            Box::new(move |cc| Ok(Box::new(BioPageApp::new(cc, registry, config)))),
        )
        .await
        .map_err(|e| anyhow!("failed to start eframe: {e:?}"))
}

fn document() -> Option<Document> {
    web_sys::window().and_then(|w| w.document())
}

/// `?preset=<key>` picks the first preset shown.
fn preset_from_url() -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    web_sys::UrlSearchParams::new_with_str(&search).ok()?.get("preset")
}

type Listener = (&'static str, Closure<dyn FnMut()>);

/// A detached `<audio>` element per music player. Its notifications land in
/// the shared event queue.
pub struct WebMedia {
    audio: Option<HtmlAudioElement>,
    listeners: Vec<Listener>,
}

impl WebMedia {
    pub fn mount(id: PlayerId, music: &MusicPlayer, queue: &EventQueue, ctx: &egui::Context) -> Self {
        match Self::try_mount(id, &music.audio_url, queue, ctx) {
            Ok(media) => media,
            Err(e) => {
                log::error!("could not create audio element for `{}`: {e:?}", music.song);
                queue
                    .borrow_mut()
                    .push(ViewEvent::MediaError(id, format!("{e:?}")));
                Self {
                    audio: None,
                    listeners: Vec::new(),
                }
            }
        }
    }

    fn try_mount(id: PlayerId, url: &str, queue: &EventQueue, ctx: &egui::Context) -> Result<Self, JsValue> {
        let audio = HtmlAudioElement::new_with_src(url)?;
        audio.set_preload("metadata");

        let listeners = vec![
            listen(&audio, "timeupdate", queue, ctx, move |a| ViewEvent::TimeUpdate(id, a.current_time()))?,
            listen(&audio, "loadedmetadata", queue, ctx, move |a| {
                ViewEvent::MetadataLoaded(id, a.duration())
            })?,
            listen(&audio, "ended", queue, ctx, move |_| ViewEvent::Ended(id))?,
            listen(&audio, "error", queue, ctx, move |a| {
                ViewEvent::MediaError(id, format!("failed to load {}", a.src()))
            })?,
        ];

        Ok(Self {
            audio: Some(audio),
            listeners,
        })
    }
}

fn listen(
    audio: &HtmlAudioElement,
    event: &'static str,
    queue: &EventQueue,
    ctx: &egui::Context,
    make: impl Fn(&HtmlAudioElement) -> ViewEvent + 'static,
) -> Result<Listener, JsValue> {
    let element = audio.clone();
    let queue = queue.clone();
    let ctx = ctx.clone();
    let callback = Closure::wrap(Box::new(move || {
        queue.borrow_mut().push(make(&element));
        ctx.request_repaint();
    }) as Box<dyn FnMut()>);
    audio.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
    Ok((event, callback))
}

impl PlaybackCollaborator for WebMedia {
    fn play(&mut self) {
        if let Some(audio) = &self.audio {
            // A rejected promise (autoplay policy) fires no media event, so
            // the controller keeps its optimistic state.
            audio.play().ok();
        }
    }

    fn pause(&mut self) {
        if let Some(audio) = &self.audio {
            audio.pause().ok();
        }
    }

    fn seek(&mut self, seconds: f64) {
        if let Some(audio) = &self.audio {
            audio.set_current_time(seconds);
        }
    }
}

impl Drop for WebMedia {
    fn drop(&mut self) {
        let Some(audio) = self.audio.take() else {
            return;
        };
        for (event, callback) in self.listeners.drain(..) {
            audio
                .remove_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
                .ok();
        }
        audio.pause().ok();
        audio.set_src("");
    }
}

/// Iframes positioned over the video slots painted this frame.
#[derive(Default)]
pub struct VideoOverlays {
    frames: HashMap<PlayerId, (String, HtmlIFrameElement)>,
}

impl VideoOverlays {
    pub fn sync(&mut self, slots: &[VideoSlot]) {
        let Some(document) = document() else {
            return;
        };
        let (left, top) = document
            .get_element_by_id(CANVAS_ID)
            .map(|canvas| {
                let r = canvas.get_bounding_client_rect();
                (r.left(), r.top())
            })
            .unwrap_or((0.0, 0.0));

        self.frames.retain(|id, (url, frame)| {
            let keep = slots.iter().any(|s| s.id == *id && s.url == *url);
            if !keep {
                frame.remove();
            }
            keep
        });

        for slot in slots {
            if !self.frames.contains_key(&slot.id) {
                match create_iframe(&document, &slot.url) {
                    Ok(frame) => {
                        self.frames.insert(slot.id, (slot.url.clone(), frame));
                    }
                    Err(e) => {
                        log::error!("could not embed {}: {e:?}", slot.url);
                        continue;
                    }
                }
            }
            if let Some((_, frame)) = self.frames.get(&slot.id) {
                place(frame, left, top, slot.rect);
            }
        }
    }
}

impl Drop for VideoOverlays {
    fn drop(&mut self) {
        for (_, (_, frame)) in self.frames.drain() {
            frame.remove();
        }
    }
}

fn create_iframe(document: &Document, url: &str) -> Result<HtmlIFrameElement, JsValue> {
    let frame = document.create_element("iframe")?.dyn_into::<HtmlIFrameElement>()?;
    frame.set_src(url);
    frame.set_attribute("allow", "autoplay; encrypted-media; picture-in-picture")?;
    frame.set_attribute("allowfullscreen", "")?;
    let style = frame.style();
    style.set_property("position", "fixed")?;
    style.set_property("border", "0")?;
    style.set_property("border-radius", "12px")?;
    style.set_property("z-index", "10")?;
    document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?
        .append_child(&frame)?;
    Ok(frame)
}

fn place(frame: &HtmlIFrameElement, left: f64, top: f64, rect: egui::Rect) {
    let style = frame.style();
    let px = |v: f64| format!("{v}px");
    style.set_property("left", &px(left + f64::from(rect.left()))).ok();
    style.set_property("top", &px(top + f64::from(rect.top()))).ok();
    style.set_property("width", &px(f64::from(rect.width()))).ok();
    style.set_property("height", &px(f64::from(rect.height()))).ok();
}
