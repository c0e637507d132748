//! Paints a [`PageView`] with egui.
//!
//! Widgets are laid out flat; the panel frames behind them are projected
//! through the page's [`Transform3D`] so the tilt shows on the cards. egui
//! cannot rotate laid-out widgets, so only the frames tilt while the content
//! follows the vertical drift.

use bio_core::render::{
    ButtonView, GalleryView, LinkTarget, MusicPlayerView, PanelView, PlaceholderView, ProfileView, SocialIconView,
    TextView, VideoView,
};
use bio_core::css::LinearGradient;
use bio_core::render::{Activation, BackgroundView};
use bio_core::{PageView, PlayerId, Rgba, Transform3D, ViewEvent, Visual};
use egui::{
    epaint::PathShape, vec2, Align2, Color32, CornerRadius, FontId, Id, LayerId, Mesh, Order, Pos2, Rect, RichText,
    Sense, Shape, Stroke, StrokeKind, Ui, UiBuilder, Vec2,
};

pub const COLUMN_WIDTH: f32 = 512.0;
const PAGE_PADDING: f32 = 128.0;
const PANEL_GAP: f32 = 48.0;
const PANEL_PADDING: f32 = 32.0;
const PANEL_RADIUS: f32 = 24.0;
const AVATAR_SIZE: f32 = 128.0;
const ICON_SIZE: f32 = 48.0;
const GRADIENT_GRID: usize = 8;

/// A video frame reserved on the page. The web build lays an iframe over it.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoSlot {
    pub id: PlayerId,
    pub url: String,
    pub rect: Rect,
}

/// What a painted frame asks of the app.
#[derive(Default)]
pub struct PaintOutput {
    pub events: Vec<ViewEvent>,
    pub videos: Vec<VideoSlot>,
}

pub fn color(c: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
}

pub fn background(ui: &Ui, rect: Rect, page: &PageView) {
    let painter = ui.painter_at(rect);
    let layer = drifted(rect, page.background_offset);
    match &page.background {
        BackgroundView::Solid(c) => {
            painter.rect_filled(rect, 0.0, color(*c));
        }
        BackgroundView::Gradient(g) => {
            painter.add(Shape::mesh(gradient_mesh(layer, g)));
        }
        BackgroundView::Image(uri) => {
            egui::Image::new(uri.as_str())
                .maintain_aspect_ratio(false)
                .paint_at(ui, layer);
        }
    }
    let scrim = Rgba::BLACK.with_alpha(page.scrim_opacity);
    painter.rect_filled(rect, 0.0, color(scrim));
}

/// Background layer moved up by `offset` and grown so it still covers `rect`.
pub fn drifted(rect: Rect, offset: f32) -> Rect {
    rect.expand2(vec2(0.0, offset.abs())).translate(vec2(0.0, -offset))
}

/// Position of `pos` along a CSS gradient line through `rect`, `0..=1`
/// between the corners the line starts and ends at.
pub fn gradient_t(angle_deg: f32, rect: Rect, pos: Pos2) -> f32 {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    let dir = vec2(sin, -cos);
    let half = (rect.width() * sin).abs() / 2.0 + (rect.height() * cos).abs() / 2.0;
    if half <= 0.0 {
        return 0.0;
    }
    let along = (pos - rect.center()).dot(dir);
    (along / half * 0.5 + 0.5).clamp(0.0, 1.0)
}

fn gradient_mesh(rect: Rect, gradient: &LinearGradient) -> Mesh {
    let mut mesh = Mesh::default();
    let n = GRADIENT_GRID;
    let step = |i: usize| i as f32 / n as f32;
    for row in 0..=n {
        for col in 0..=n {
            let pos = rect.lerp_inside(vec2(step(col), step(row)));
            let t = gradient_t(gradient.angle_deg, rect, pos);
            mesh.colored_vertex(pos, color(gradient.color_at(t)));
        }
    }
    let index = |row: usize, col: usize| (row * (n + 1) + col) as u32;
    for row in 0..n {
        for col in 0..n {
            mesh.add_triangle(index(row, col), index(row, col + 1), index(row + 1, col));
            mesh.add_triangle(index(row, col + 1), index(row + 1, col + 1), index(row + 1, col));
        }
    }
    mesh
}

/// Outline of a rounded rectangle, clockwise from the top-left arc.
pub fn rounded_outline(rect: Rect, radius: f32, segments: usize) -> Vec<Pos2> {
    let r = radius.min(rect.width() / 2.0).min(rect.height() / 2.0).max(0.0);
    let corners = [
        (rect.left_top() + vec2(r, r), 180.0_f32),
        (rect.right_top() + vec2(-r, r), 270.0),
        (rect.right_bottom() + vec2(-r, -r), 0.0),
        (rect.left_bottom() + vec2(r, -r), 90.0),
    ];
    let mut points = Vec::with_capacity(corners.len() * (segments + 1));
    for (center, start) in corners {
        for i in 0..=segments {
            let angle = (start + 90.0 * i as f32 / segments.max(1) as f32).to_radians();
            points.push(center + r * Vec2::angled(angle));
        }
    }
    points
}

fn project(points: &mut [Pos2], origin: Pos2, tilt: &Transform3D) {
    for p in points {
        let rel = *p - origin;
        let (x, y) = tilt.project(rel.x, rel.y);
        *p = origin + vec2(x, y);
    }
}

/// Lays out every panel in a centered column. `origin` is the point the
/// tilt rotates around.
pub fn panels(ui: &mut Ui, page: &PageView, origin: Pos2, elapsed: f64, out: &mut PaintOutput) {
    let available = ui.available_rect_before_wrap();
    let width = available.width().min(COLUMN_WIDTH);
    let column = Rect::from_min_size(
        Pos2::new(available.center().x - width / 2.0, available.top() + PAGE_PADDING + page.transform.translate_y),
        vec2(width, available.height()),
    );
    let tilt = Transform3D {
        translate_y: 0.0,
        ..page.transform
    };
    ui.scope_builder(UiBuilder::new().max_rect(column), |ui| {
        ui.spacing_mut().item_spacing.y = PANEL_GAP;
        for (container, panel_view) in page.panels.iter().enumerate() {
            panel(ui, container, panel_view, &tilt, origin, elapsed, out);
        }
    });
    ui.add_space(PAGE_PADDING);
}

fn panel(
    ui: &mut Ui,
    container: usize,
    view: &PanelView,
    tilt: &Transform3D,
    origin: Pos2,
    elapsed: f64,
    out: &mut PaintOutput,
) {
    let frame_slot = ui.painter().add(Shape::Noop);
    let content = ui.vertical(|ui| {
        ui.add_space(PANEL_PADDING);
        let width = ui.available_width() - 2.0 * PANEL_PADDING;
        ui.horizontal(|ui| {
            ui.add_space(PANEL_PADDING);
            ui.vertical(|ui| {
                ui.set_width(width);
                ui.spacing_mut().item_spacing.y = 16.0;
                for (slot, item) in view.items.iter().enumerate() {
                    visual(ui, PlayerId { container, slot }, item, elapsed, out);
                }
            });
        });
        ui.add_space(PANEL_PADDING);
    });

    let rect = content.response.rect;
    let fill = if ui.rect_contains_pointer(rect) {
        view.hover_background
    } else {
        view.background
    };
    let mut outline = rounded_outline(rect, PANEL_RADIUS, 6);
    if !tilt.is_flat() {
        project(&mut outline, origin, tilt);
    }
    let stroke = Stroke::new(view.border.width, color(view.border.color));
    ui.painter().set(
        frame_slot,
        Shape::Vec(vec![
            Shape::convex_polygon(outline.clone(), color(fill), Stroke::NONE),
            PathShape::closed_line(outline, stroke).into(),
        ]),
    );
}

fn visual(ui: &mut Ui, id: PlayerId, item: &Visual, elapsed: f64, out: &mut PaintOutput) {
    match item {
        Visual::Profile(p) => profile(ui, p),
        Visual::SocialIcons(icons) => social_icons(ui, icons),
        Visual::MusicPlayer(m) => music_player(ui, id, m, out),
        Visual::Text(t) => text(ui, t),
        Visual::Gallery(g) => gallery(ui, g, elapsed),
        Visual::Video(v) => video(ui, id, v, out),
        Visual::Button(b) => button(ui, b),
        Visual::Placeholder(p) => placeholder(ui, p),
    }
}

fn open(ui: &Ui, activation: &Activation) {
    let url = activation.url.clone();
    let open = match activation.target {
        LinkTarget::NewContext => egui::OpenUrl::new_tab(url),
        LinkTarget::SameContext => egui::OpenUrl::same_tab(url),
    };
    ui.ctx().open_url(open);
}

fn profile(ui: &mut Ui, p: &ProfileView) {
    ui.vertical_centered(|ui| {
        let (rect, _) = ui.allocate_exact_size(Vec2::splat(AVATAR_SIZE), Sense::hover());
        egui::Image::new(p.avatar.as_str())
            .corner_radius(CornerRadius::same(64))
            .paint_at(ui, rect);
        ui.painter()
            .circle_stroke(rect.center(), AVATAR_SIZE / 2.0, Stroke::new(4.0, color(p.ring)));

        ui.label(RichText::new(&p.name).size(30.0).strong().color(color(p.text)));
        if !p.bio.is_empty() {
            ui.label(RichText::new(&p.bio).color(color(p.text.with_alpha(0.8))));
        }
        if !p.badges.is_empty() {
            ui.horizontal(|ui| {
                for badge in &p.badges {
                    ui.label(RichText::new(&badge.icon).size(20.0).color(color(p.ring)))
                        .on_hover_text(&badge.label);
                }
            });
        }
    });
}

fn social_icons(ui: &mut Ui, icons: &[SocialIconView]) {
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 16.0;
        for icon in icons {
            let (rect, response) = ui.allocate_exact_size(Vec2::splat(ICON_SIZE), Sense::click());
            let fill = if response.hovered() {
                icon.hover_background
            } else {
                icon.background
            };
            let painter = ui.painter();
            painter.circle_filled(rect.center(), ICON_SIZE / 2.0, color(fill));
            painter.circle_stroke(rect.center(), ICON_SIZE / 2.0, Stroke::new(2.0, color(icon.ring)));
            match &icon.image {
                Some(uri) => {
                    egui::Image::new(uri.as_str()).paint_at(ui, rect.shrink(12.0));
                }
                None => {
                    painter.text(
                        rect.center(),
                        Align2::CENTER_CENTER,
                        &icon.glyph,
                        FontId::proportional(20.0),
                        Color32::WHITE,
                    );
                }
            }
            let response = response.on_hover_text(&icon.label);
            if response.clicked() {
                open(ui, &icon.activation);
            }
        }
    });
}

/// Fraction of `rect`'s width left of `x`, clamped to `0..=1`.
pub fn fraction_at(rect: Rect, x: f32) -> f64 {
    if rect.width() <= 0.0 {
        return 0.0;
    }
    f64::from(((x - rect.left()) / rect.width()).clamp(0.0, 1.0))
}

fn music_player(ui: &mut Ui, id: PlayerId, m: &MusicPlayerView, out: &mut PaintOutput) {
    let text = color(m.text);
    ui.label(RichText::new(&m.title).size(18.0).strong().color(text));
    ui.horizontal(|ui| {
        ui.label(RichText::new(&m.elapsed).monospace().color(text));

        let bar_width = (ui.available_width() - 110.0).max(40.0);
        let (bar, response) = ui.allocate_exact_size(vec2(bar_width, 8.0), Sense::click());
        let painter = ui.painter();
        painter.rect_filled(bar, 4.0, color(m.text.with_alpha(0.2)));
        let mut filled = bar;
        filled.set_width(bar.width() * m.progress.clamp(0.0, 1.0));
        painter.rect_filled(filled, 4.0, color(m.control));
        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                out.events.push(ViewEvent::SeekFraction(id, fraction_at(bar, pos.x)));
            }
        }

        ui.label(RichText::new(&m.total).monospace().color(text));

        let (knob, response) = ui.allocate_exact_size(Vec2::splat(36.0), Sense::click());
        let fill = if response.hovered() {
            m.control.with_alpha(0.85)
        } else {
            m.control
        };
        ui.painter().circle_filled(knob.center(), 18.0, color(fill));
        ui.painter().text(
            knob.center(),
            Align2::CENTER_CENTER,
            if m.is_playing { "⏸" } else { "▶" },
            FontId::proportional(16.0),
            Color32::WHITE,
        );
        if response.clicked() {
            out.events.push(ViewEvent::TogglePlayback(id));
        }
    });
}

fn text(ui: &mut Ui, t: &TextView) {
    if !t.title.is_empty() {
        ui.label(RichText::new(&t.title).size(20.0).strong().color(color(t.text)));
    }
    ui.label(RichText::new(&t.body).color(color(t.text)));
}

fn gallery(ui: &mut Ui, g: &GalleryView, elapsed: f64) {
    let columns = g.columns.max(1);
    let spacing = 8.0;
    let cell = ((ui.available_width() - spacing * (columns - 1) as f32) / columns as f32).max(1.0);
    let highlighted = g.highlighted(elapsed);
    for (row, chunk) in g.images.chunks(columns).enumerate() {
        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = spacing;
            for (col, uri) in chunk.iter().enumerate() {
                let (rect, _) = ui.allocate_exact_size(Vec2::splat(cell), Sense::hover());
                egui::Image::new(uri.as_str())
                    .corner_radius(CornerRadius::same(12))
                    .paint_at(ui, rect);
                if highlighted == Some(row * columns + col) {
                    ui.painter()
                        .rect_stroke(rect, 12.0, Stroke::new(3.0, color(g.highlight)), StrokeKind::Inside);
                }
            }
        });
    }
}

fn video(ui: &mut Ui, id: PlayerId, v: &VideoView, out: &mut PaintOutput) {
    let text = color(v.text);
    if !v.title.is_empty() {
        ui.label(RichText::new(&v.title).size(18.0).strong().color(text));
    }
    let width = ui.available_width();
    let height = width / v.aspect_ratio.max(0.1);
    let (rect, response) = ui.allocate_exact_size(vec2(width, height), Sense::click());
    ui.painter().rect_filled(rect, 12.0, Color32::from_black_alpha(200));
    ui.painter()
        .text(rect.center(), Align2::CENTER_CENTER, "▶", FontId::proportional(40.0), text);
    if response.on_hover_text(&v.embed_url).clicked() {
        ui.ctx().open_url(egui::OpenUrl::new_tab(v.embed_url.clone()));
    }
    out.videos.push(VideoSlot {
        id,
        url: v.embed_url.clone(),
        rect,
    });
}

fn button(ui: &mut Ui, b: &ButtonView) {
    let (rect, response) = ui.allocate_exact_size(vec2(ui.available_width(), 48.0), Sense::click());
    let fill = if response.hovered() {
        b.hover_background
    } else {
        b.background
    };
    ui.painter().rect_filled(rect, 16.0, color(fill));
    ui.painter().text(
        rect.center(),
        Align2::CENTER_CENTER,
        &b.label,
        FontId::proportional(18.0),
        color(b.text),
    );
    if response.clicked() {
        open(ui, &b.activation);
    }
}

fn placeholder(ui: &mut Ui, p: &PlaceholderView) {
    egui::Frame::new()
        .stroke(Stroke::new(1.0, color(p.text.with_alpha(0.4))))
        .corner_radius(12.0)
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(&p.message).italics().color(color(p.text.with_alpha(0.7))));
        });
}

/// Pill bar of preset names along the top edge.
pub fn selector(ctx: &egui::Context, page: &PageView, events: &mut Vec<ViewEvent>) {
    egui::Area::new(Id::new("preset_selector"))
        .anchor(Align2::CENTER_TOP, [0.0, 24.0])
        .order(Order::Foreground)
        .show(ctx, |ui| {
            egui::Frame::new()
                .fill(Color32::from_black_alpha(140))
                .corner_radius(24.0)
                .inner_margin(8.0)
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        for entry in &page.selector {
                            let label = RichText::new(&entry.label).color(color(page.text));
                            if ui.selectable_label(entry.active, label).clicked() && !entry.active {
                                events.push(ViewEvent::SelectPreset(entry.key.clone()));
                            }
                        }
                    });
                });
        });
}

/// Decorative dot that drifts after the pointer.
pub fn cursor(ctx: &egui::Context, pos: Pos2, accent: Rgba) {
    let painter = ctx.layer_painter(LayerId::new(Order::Tooltip, Id::new("cursor_dot")));
    painter.circle_filled(pos, 6.0, color(accent.with_alpha(0.8)));
    painter.circle_stroke(pos, 14.0, Stroke::new(1.0, color(accent.with_alpha(0.4))));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> Rect {
        Rect::from_min_size(Pos2::ZERO, vec2(200.0, 100.0))
    }

    #[test]
    fn gradient_runs_from_bottom_to_top_at_zero_degrees() {
        let r = rect();
        assert!((gradient_t(0.0, r, r.center_bottom()) - 0.0).abs() < 1e-5);
        assert!((gradient_t(0.0, r, r.center_top()) - 1.0).abs() < 1e-5);
        assert!((gradient_t(0.0, r, r.center()) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn gradient_diagonal_reaches_the_corners() {
        let r = Rect::from_min_size(Pos2::ZERO, vec2(100.0, 100.0));
        assert!(gradient_t(135.0, r, r.left_top()) < 1e-4);
        assert!((gradient_t(135.0, r, r.right_bottom()) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn drifted_layer_moves_and_still_covers() {
        let r = rect();
        let layer = drifted(r, 30.0);
        assert_eq!(layer.center().y, r.center().y - 30.0);
        assert!(layer.contains_rect(r));
        assert_eq!(drifted(r, 0.0), r);
    }

    #[test]
    fn outline_stays_inside_the_rect() {
        let r = rect();
        let points = rounded_outline(r, 24.0, 6);
        assert_eq!(points.len(), 28);
        assert!(points.iter().all(|p| r.expand(0.01).contains(*p)));
    }

    #[test]
    fn seek_fraction_is_clamped() {
        let bar = Rect::from_min_size(Pos2::new(10.0, 0.0), vec2(100.0, 8.0));
        assert_eq!(fraction_at(bar, 60.0), 0.5);
        assert_eq!(fraction_at(bar, -5.0), 0.0);
        assert_eq!(fraction_at(bar, 500.0), 1.0);
    }

    #[test]
    fn flat_projection_is_identity() {
        let mut points = vec![Pos2::new(3.0, 4.0), Pos2::new(-10.0, 7.5)];
        let before = points.clone();
        project(&mut points, Pos2::new(100.0, 100.0), &Transform3D::default());
        for (a, b) in points.iter().zip(&before) {
            assert!((*a - *b).length() < 1e-3);
        }
    }
}
