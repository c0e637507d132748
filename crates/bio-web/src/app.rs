use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use bio_core::tracker::ReferenceRect;
use bio_core::{PageConfig, PageView, PresetRegistry, ViewEvent, ViewSession, Visual};
use egui::Rect;
use web_time::Instant;

use crate::media::{self, EventQueue, Media};
use crate::paint::{self, PaintOutput};

/// Repaint cadence while something on the page animates on its own.
const TICK: Duration = Duration::from_millis(250);

pub struct BioPageApp {
    session: ViewSession<Media>,
    queue: EventQueue,
    started: Instant,
    /// Page rect from the previous frame, used to normalize the pointer.
    viewport: Option<Rect>,
    #[cfg(target_arch = "wasm32")]
    videos: crate::web::VideoOverlays,
}

impl BioPageApp {
    pub fn new(cc: &eframe::CreationContext<'_>, registry: PresetRegistry, config: PageConfig) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);
        let queue: EventQueue = Rc::new(RefCell::new(Vec::new()));
        let session = ViewSession::new(registry, config, media::mounter(&cc.egui_ctx, &queue));
        log::info!("bio page ready, showing `{}`", session.active_key());
        Self {
            session,
            queue,
            started: Instant::now(),
            viewport: None,
            #[cfg(target_arch = "wasm32")]
            videos: crate::web::VideoOverlays::default(),
        }
    }

    fn dispatch(&mut self, event: ViewEvent) {
        if let Err(e) = self.session.handle(event) {
            log::warn!("{e}");
        }
    }

    fn process_media_events(&mut self) {
        let events: Vec<ViewEvent> = self.queue.borrow_mut().drain(..).collect();
        for event in events {
            self.dispatch(event);
        }
    }

    fn track_pointer(&mut self, ctx: &egui::Context) {
        let (Some(viewport), Some(pos)) = (self.viewport, ctx.input(|i| i.pointer.hover_pos())) else {
            return;
        };
        self.dispatch(ViewEvent::PointerMoved {
            x: pos.x,
            y: pos.y,
            reference: ReferenceRect {
                left: viewport.left(),
                top: viewport.top(),
                width: viewport.width(),
                height: viewport.height(),
            },
        });
    }
}

/// Whether the page changes without input: autoplaying galleries and
/// playing tracks.
fn animates(page: &PageView) -> bool {
    page.panels.iter().flat_map(|p| &p.items).any(|item| match item {
        Visual::Gallery(g) => g.autoplay_interval.is_some(),
        Visual::MusicPlayer(m) => m.is_playing,
        _ => false,
    })
}

impl eframe::App for BioPageApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_media_events();
        self.track_pointer(ctx);

        let page = self.session.render();
        let elapsed = self.started.elapsed().as_secs_f64();
        let mut out = PaintOutput::default();
        let mut scrolled = None;

        egui::CentralPanel::default()
            .frame(egui::Frame::new())
            .show(ctx, |ui| {
                let viewport = ui.max_rect();
                self.viewport = Some(viewport);
                paint::background(ui, viewport, &page);

                let scroll = egui::ScrollArea::vertical()
                    .auto_shrink(false)
                    .show(ui, |ui| paint::panels(ui, &page, viewport.center(), elapsed, &mut out));
                scrolled = Some(scroll.state.offset.y);
            });

        paint::selector(ctx, &page, &mut out.events);

        if let Some(viewport) = self.viewport {
            let follow = self.session.config().cursor_follow;
            let (x, y) = self
                .session
                .tracker()
                .cursor_position(viewport.width(), viewport.height(), follow);
            paint::cursor(ctx, viewport.min + egui::vec2(x, y), page.accent);
        }

        #[cfg(target_arch = "wasm32")]
        self.videos.sync(&out.videos);

        if let Some(offset) = scrolled {
            if (offset - self.session.tracker().scroll).abs() > f32::EPSILON {
                out.events.push(ViewEvent::Scrolled(offset));
            }
        }
        let changed = !out.events.is_empty();
        for event in out.events {
            self.dispatch(event);
        }

        if changed {
            ctx.request_repaint();
        } else if animates(&page) {
            ctx.request_repaint_after(TICK);
        }
    }
}
