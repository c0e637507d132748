/// Screen-space rectangle the pointer is normalized against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReferenceRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ReferenceRect {
    pub fn center(&self) -> (f32, f32) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

/// Pointer offset from the reference center, `-1..=1` at the edges.
/// Positions outside the rectangle go past that range.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
}

impl Pointer {
    pub const CENTER: Self = Self { x: 0.0, y: 0.0 };

    pub fn normalize(client_x: f32, client_y: f32, rect: ReferenceRect) -> Self {
        let (cx, cy) = rect.center();
        let axis = |v: f32, c: f32, half: f32| if half > 0.0 { (v - c) / half } else { 0.0 };
        Self {
            x: axis(client_x, cx, rect.width / 2.0),
            y: axis(client_y, cy, rect.height / 2.0),
        }
    }
}

/// Latest pointer and scroll samples. Each notification overwrites the
/// previous value; nothing else is retained.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Tracker {
    pub pointer: Pointer,
    pub scroll: f32,
}

impl Tracker {
    pub fn on_pointer_move(&mut self, client_x: f32, client_y: f32, rect: ReferenceRect) {
        self.pointer = Pointer::normalize(client_x, client_y, rect);
    }

    pub fn on_scroll(&mut self, offset: f32) {
        self.scroll = offset;
    }

    /// Where the decorative cursor dot sits: viewport center pushed towards
    /// the pointer by `follow` px at the container edge.
    pub fn cursor_position(&self, viewport_width: f32, viewport_height: f32, follow: f32) -> (f32, f32) {
        (
            self.pointer.x * follow + viewport_width / 2.0,
            self.pointer.y * follow + viewport_height / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECT: ReferenceRect = ReferenceRect {
        left: 100.0,
        top: 50.0,
        width: 400.0,
        height: 200.0,
    };

    #[test]
    fn normalizes_against_half_extents() {
        assert_eq!(Pointer::normalize(300.0, 150.0, RECT), Pointer::CENTER);
        assert_eq!(Pointer::normalize(500.0, 250.0, RECT), Pointer { x: 1.0, y: 1.0 });
        assert_eq!(Pointer::normalize(100.0, 100.0, RECT), Pointer { x: -1.0, y: -0.5 });
    }

    #[test]
    fn degenerate_rect_does_not_produce_nan() {
        let flat = ReferenceRect { width: 0.0, height: 0.0, ..RECT };
        let p = Pointer::normalize(10.0, 10.0, flat);
        assert_eq!(p, Pointer::CENTER);
    }

    #[test]
    fn latest_sample_wins() {
        let mut t = Tracker::default();
        t.on_pointer_move(500.0, 150.0, RECT);
        t.on_pointer_move(300.0, 50.0, RECT);
        t.on_scroll(40.0);
        t.on_scroll(12.0);
        assert_eq!(t.pointer, Pointer { x: 0.0, y: -1.0 });
        assert_eq!(t.scroll, 12.0);
        assert_eq!(t.cursor_position(800.0, 600.0, 20.0), (400.0, 280.0));
    }
}
