use crate::preset::Background;
use crate::theme::Theme;
use crate::tracker::Pointer;

/// Distance from the viewer to the z = 0 plane, in px.
pub const DEFAULT_PERSPECTIVE: f32 = 1000.0;

/// `perspective → rotateX → rotateY → translateY`, angles in degrees and
/// lengths in px, origin at the container center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform3D {
    pub perspective: f32,
    pub rotate_x: f32,
    pub rotate_y: f32,
    pub translate_y: f32,
}

impl Default for Transform3D {
    fn default() -> Self {
        Self {
            perspective: DEFAULT_PERSPECTIVE,
            rotate_x: 0.0,
            rotate_y: 0.0,
            translate_y: 0.0,
        }
    }
}

/// Tilt from the pointer and drift from the scroll offset.
pub fn compute_transform(pointer: Pointer, scroll: f32, theme: &Theme) -> Transform3D {
    Transform3D {
        perspective: DEFAULT_PERSPECTIVE,
        rotate_x: pointer.y * -theme.mouse_grind_intensity,
        rotate_y: pointer.x * theme.mouse_grind_intensity,
        translate_y: scroll * theme.parallax_intensity,
    }
}

/// Vertical drift of the background layer. Only backgrounds that opt into
/// parallax move, and they use the page-wide `coefficient`.
pub fn background_offset(scroll: f32, background: &Background, coefficient: f32) -> f32 {
    if background.parallax {
        scroll * coefficient
    } else {
        0.0
    }
}

impl Transform3D {
    pub fn with_perspective(self, perspective: f32) -> Self {
        Self { perspective, ..self }
    }

    pub fn is_flat(&self) -> bool {
        self.rotate_x == 0.0 && self.rotate_y == 0.0 && self.translate_y == 0.0
    }

    pub fn to_css(&self) -> String {
        format!(
            "perspective({}px) rotateX({}deg) rotateY({}deg) translateY({}px)",
            self.perspective, self.rotate_x, self.rotate_y, self.translate_y
        )
    }

    /// Maps a point on the container plane (relative to the origin) to its
    /// on-screen position, also relative to the origin.
    pub fn project(&self, x: f32, y: f32) -> (f32, f32) {
        let y = y + self.translate_y;

        let (sin_y, cos_y) = self.rotate_y.to_radians().sin_cos();
        let x1 = x * cos_y;
        let z1 = -x * sin_y;

        let (sin_x, cos_x) = self.rotate_x.to_radians().sin_cos();
        let y2 = y * cos_x - z1 * sin_x;
        let z2 = y * sin_x + z1 * cos_x;

        if self.perspective <= 0.0 {
            return (x1, y2);
        }
        // Points at or behind the eye would flip; pin them just in front.
        let depth = (self.perspective - z2).max(1.0);
        let scale = self.perspective / depth;
        (x1 * scale, y2 * scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::BackgroundKind;
    use proptest::prelude::*;

    fn theme(tilt: f32, parallax: f32) -> Theme {
        Theme {
            mouse_grind_intensity: tilt,
            parallax_intensity: parallax,
            ..Theme::default()
        }
    }

    #[test]
    fn rest_position_is_flat() {
        for t in [theme(8.0, 0.05), theme(0.0, 0.0), theme(-3.0, 10.0)] {
            let tr = compute_transform(Pointer::CENTER, 0.0, &t);
            assert_eq!((tr.rotate_x, tr.rotate_y, tr.translate_y), (0.0, 0.0, 0.0));
            assert!(tr.is_flat());
        }
    }

    #[test]
    fn signs_follow_the_pointer() {
        let tr = compute_transform(Pointer { x: 1.0, y: 0.5 }, 200.0, &theme(8.0, 0.05));
        assert_eq!(tr.rotate_x, -4.0);
        assert_eq!(tr.rotate_y, 8.0);
        assert_eq!(tr.translate_y, 10.0);
        assert_eq!(
            tr.to_css(),
            "perspective(1000px) rotateX(-4deg) rotateY(8deg) translateY(10px)"
        );
    }

    #[test]
    fn flat_projection_only_translates() {
        let tr = Transform3D {
            translate_y: 12.0,
            ..Transform3D::default()
        };
        assert_eq!(tr.project(30.0, -40.0), (30.0, -28.0));
    }

    #[test]
    fn tilting_right_recedes_the_right_edge() {
        let tr = Transform3D {
            rotate_y: 10.0,
            ..Transform3D::default()
        };
        let (right, _) = tr.project(200.0, 0.0);
        let (left, _) = tr.project(-200.0, 0.0);
        assert!(right < 200.0);
        assert!(left.abs() > right.abs());
    }

    #[test]
    fn background_moves_only_with_parallax() {
        let mut bg = Background {
            kind: BackgroundKind::Solid,
            value: "#000".into(),
            parallax: false,
        };
        assert_eq!(background_offset(300.0, &bg, 0.01), 0.0);
        bg.parallax = true;
        assert_eq!(background_offset(300.0, &bg, 0.01), 3.0);
    }

    proptest! {
        #[test]
        fn monotonic_per_axis(
            a in -1.0f32..=1.0,
            b in -1.0f32..=1.0,
            other in -1.0f32..=1.0,
            tilt in 0.0f32..10.0,
        ) {
            let t = theme(tilt, 0.05);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };

            let x_lo = compute_transform(Pointer { x: lo, y: other }, 0.0, &t);
            let x_hi = compute_transform(Pointer { x: hi, y: other }, 0.0, &t);
            prop_assert!(x_lo.rotate_y <= x_hi.rotate_y);
            prop_assert_eq!(x_lo.rotate_x, x_hi.rotate_x);

            let y_lo = compute_transform(Pointer { x: other, y: lo }, 0.0, &t);
            let y_hi = compute_transform(Pointer { x: other, y: hi }, 0.0, &t);
            prop_assert!(y_lo.rotate_x >= y_hi.rotate_x);
            prop_assert_eq!(y_lo.rotate_y, y_hi.rotate_y);
        }

        #[test]
        fn continuous_in_the_pointer(
            x in -1.0f32..=1.0,
            y in -1.0f32..=1.0,
            dx in -0.01f32..=0.01,
            dy in -0.01f32..=0.01,
            tilt in 0.0f32..10.0,
        ) {
            let t = theme(tilt, 0.05);
            let a = compute_transform(Pointer { x, y }, 0.0, &t);
            let b = compute_transform(Pointer { x: x + dx, y: y + dy }, 0.0, &t);
            let bound = tilt * 0.01 + 1e-4;
            prop_assert!((a.rotate_y - b.rotate_y).abs() <= bound);
            prop_assert!((a.rotate_x - b.rotate_x).abs() <= bound);
        }
    }
}
