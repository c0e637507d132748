//! Parsing for the handful of CSS value shapes that preset data uses:
//! colors, `border` shorthands and `linear-gradient(...)` backgrounds.

use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while1},
    character::complete::{char, multispace0, multispace1, one_of},
    combinator::{all_consuming, map, map_opt, opt, value},
    multi::separated_list1,
    number::complete::float,
    sequence::{delimited, pair, preceded, terminated},
    IResult,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Self = Self::from_rgb(255, 255, 255);
    pub const BLACK: Self = Self::from_rgb(0, 0, 0);
    pub const TRANSPARENT: Self = Self::from_rgba(0, 0, 0, 0);

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: unit_to_byte(alpha),
            ..self
        }
    }

    /// Channel-wise linear blend, `t = 0` is `self`, `t = 1` is `other`.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

fn unit_to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Parses `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb()`, `rgba()` and a few
/// named colors.
pub fn parse_color(value: &str) -> Option<Rgba> {
    let value = value.trim();
    if let Ok((_, color)) = all_consuming(alt((hex_color, functional_color)))(value) {
        return Some(color);
    }
    named_color(&value.to_ascii_lowercase())
}

fn hex_color(input: &str) -> IResult<&str, Rgba> {
    map_opt(
        preceded(char('#'), take_while1(|c: char| c.is_ascii_hexdigit())),
        hex_digits,
    )(input)
}

fn hex_digits(hex: &str) -> Option<Rgba> {
    let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|n| n * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some(Rgba::from_rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Some(Rgba::from_rgba(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
        6 => Some(Rgba::from_rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Rgba::from_rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

/// A number with an optional `%` suffix.
fn component(input: &str) -> IResult<&str, (f32, bool)> {
    pair(float, map(opt(char('%')), |pct| pct.is_some()))(input)
}

/// Commas, slashes or bare whitespace between components.
fn separator(input: &str) -> IResult<&str, char> {
    alt((
        delimited(multispace0, one_of(",/"), multispace0),
        value(' ', multispace1),
    ))(input)
}

/// `rgb(r, g, b)`, `rgba(r, g, b, a)` and the space separated forms.
fn functional_color(input: &str) -> IResult<&str, Rgba> {
    let (input, _) = terminated(alt((tag_no_case("rgba"), tag_no_case("rgb"))), multispace0)(input)?;
    map_opt(
        delimited(
            terminated(char('('), multispace0),
            separated_list1(separator, component),
            preceded(multispace0, char(')')),
        ),
        |args| rgba_from_components(&args),
    )(input)
}

fn rgba_from_components(args: &[(f32, bool)]) -> Option<Rgba> {
    let channel = |(v, pct): (f32, bool)| {
        if pct {
            unit_to_byte(v / 100.0)
        } else {
            v.clamp(0.0, 255.0).round() as u8
        }
    };
    let alpha = |(v, pct): (f32, bool)| unit_to_byte(if pct { v / 100.0 } else { v });
    match *args {
        [r, g, b] => Some(Rgba::from_rgb(channel(r), channel(g), channel(b))),
        [r, g, b, a] => Some(Rgba::from_rgba(channel(r), channel(g), channel(b), alpha(a))),
        _ => None,
    }
}

fn named_color(name: &str) -> Option<Rgba> {
    let c = match name {
        "white" => Rgba::WHITE,
        "black" => Rgba::BLACK,
        "transparent" => Rgba::TRANSPARENT,
        "red" => Rgba::from_rgb(255, 0, 0),
        "green" => Rgba::from_rgb(0, 128, 0),
        "blue" => Rgba::from_rgb(0, 0, 255),
        "gray" | "grey" => Rgba::from_rgb(128, 128, 128),
        "crimson" => Rgba::from_rgb(220, 20, 60),
        "gold" => Rgba::from_rgb(255, 215, 0),
        "purple" => Rgba::from_rgb(128, 0, 128),
        _ => return None,
    };
    Some(c)
}

/// Splits on `sep` while ignoring separators nested in parentheses.
fn split_top_level(value: &str, sep: impl Fn(char) -> bool) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in value.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if depth == 0 && sep(c) => {
                out.push(value[start..i].trim());
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    out.push(value[start..].trim());
    out.retain(|s| !s.is_empty());
    out
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Border {
    pub width: f32,
    pub color: Rgba,
}

/// Parses a `border` shorthand such as `2px solid rgba(255, 255, 255, 0.3)`.
/// Token order is free; a missing width defaults to 1px. `none`, or a zero
/// width without a color, is an invisible border.
pub fn parse_border(value: &str) -> Option<Border> {
    let mut width = None;
    let mut color = None;
    for token in split_top_level(value, char::is_whitespace) {
        if token.eq_ignore_ascii_case("none") {
            width = Some(0.0);
        } else if let Some(px) = token.strip_suffix("px") {
            width = Some(px.parse::<f32>().ok()?);
        } else if let Some(c) = parse_color(token) {
            color = Some(c);
        }
    }
    match (width, color) {
        (width, Some(color)) => Some(Border {
            width: width.unwrap_or(1.0),
            color,
        }),
        (Some(width), None) if width == 0.0 => Some(Border {
            width: 0.0,
            color: Rgba::TRANSPARENT,
        }),
        _ => None,
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    pub color: Rgba,
    /// Position along the gradient line in `0..=1`, when declared.
    pub position: Option<f32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
    /// CSS angle: 0deg points up, 90deg points right.
    pub angle_deg: f32,
    pub stops: Vec<GradientStop>,
}

impl LinearGradient {
    /// Color at `t` along the gradient line. Stops without a position are
    /// spread evenly by index.
    pub fn color_at(&self, t: f32) -> Rgba {
        let n = self.stops.len();
        match n {
            0 => return Rgba::TRANSPARENT,
            1 => return self.stops[0].color,
            _ => {}
        }
        let pos = |i: usize| {
            self.stops[i]
                .position
                .unwrap_or(i as f32 / (n - 1) as f32)
        };
        let t = t.clamp(0.0, 1.0);
        if t <= pos(0) {
            return self.stops[0].color;
        }
        for i in 1..n {
            let (p0, p1) = (pos(i - 1), pos(i));
            if t <= p1 {
                let span = (p1 - p0).max(f32::EPSILON);
                return self.stops[i - 1].color.lerp(self.stops[i].color, (t - p0) / span);
            }
        }
        self.stops[n - 1].color
    }
}

pub fn parse_linear_gradient(value: &str) -> Option<LinearGradient> {
    let lower = value.trim().to_ascii_lowercase();
    let args = lower
        .strip_prefix("linear-gradient(")?
        .strip_suffix(')')?;
    let mut parts = split_top_level(args, |c| c == ',').into_iter().peekable();

    let mut angle_deg = 180.0;
    if let Some(first) = parts.peek() {
        if let Some(deg) = first.strip_suffix("deg") {
            angle_deg = deg.trim().parse().ok()?;
            parts.next();
        } else if let Some(side) = first.strip_prefix("to ") {
            angle_deg = match side.trim() {
                "top" => 0.0,
                "right" => 90.0,
                "bottom" => 180.0,
                "left" => 270.0,
                _ => return None,
            };
            parts.next();
        }
    }

    let mut stops = Vec::new();
    for part in parts {
        let tokens = split_top_level(part, char::is_whitespace);
        let color = parse_color(tokens.first()?)?;
        let position = match tokens.get(1) {
            Some(p) => Some(p.strip_suffix('%')?.parse::<f32>().ok()? / 100.0),
            None => None,
        };
        stops.push(GradientStop { color, position });
    }
    if stops.is_empty() {
        return None;
    }
    Some(LinearGradient { angle_deg, stops })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        assert_eq!(parse_color("#fff"), Some(Rgba::WHITE));
        assert_eq!(parse_color("#5b7ebd"), Some(Rgba::from_rgb(0x5b, 0x7e, 0xbd)));
        assert_eq!(parse_color("#ff000080"), Some(Rgba::from_rgba(255, 0, 0, 128)));
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#ggg"), None);
        assert_eq!(parse_color("#fffz"), None);
    }

    #[test]
    fn functional_colors() {
        assert_eq!(
            parse_color("rgba(30, 58, 108, 0.85)"),
            Some(Rgba::from_rgba(30, 58, 108, 217))
        );
        assert_eq!(parse_color("rgba(255,255,255,0.15)"), Some(Rgba::from_rgba(255, 255, 255, 38)));
        assert_eq!(parse_color("rgb(0 0 0)"), Some(Rgba::BLACK));
        assert_eq!(parse_color("rgb(1, 2)"), None);
        assert_eq!(parse_color("RGB( 10%, 100%, 0% )"), Some(Rgba::from_rgb(26, 255, 0)));
        assert_eq!(parse_color("rgb(0 0 0 / 50%)"), Some(Rgba::from_rgba(0, 0, 0, 128)));
        assert_eq!(parse_color("rgb(0, 0, 0) trailing"), None);
    }

    #[test]
    fn named_and_unknown() {
        assert_eq!(parse_color("White"), Some(Rgba::WHITE));
        assert_eq!(parse_color("not-a-color"), None);
    }

    #[test]
    fn border_shorthand() {
        let b = parse_border("2px solid rgba(255, 255, 255, 0.3)").unwrap();
        assert_eq!(b.width, 2.0);
        assert_eq!(b.color, Rgba::from_rgba(255, 255, 255, 77));

        let b = parse_border("2px solid #ff0000").unwrap();
        assert_eq!(b.color, Rgba::from_rgb(255, 0, 0));

        assert!(parse_border("2px solid").is_none());

        let hidden = Border {
            width: 0.0,
            color: Rgba::TRANSPARENT,
        };
        assert_eq!(parse_border("none"), Some(hidden));
        assert_eq!(parse_border("0px solid"), Some(hidden));
        assert_eq!(parse_border("none #fff").map(|b| b.width), Some(0.0));
    }

    #[test]
    fn gradient_with_positions() {
        let g = parse_linear_gradient("linear-gradient(135deg, #1a0000 0%, #4a0000 50%, #1a0000 100%)")
            .unwrap();
        assert_eq!(g.angle_deg, 135.0);
        assert_eq!(g.stops.len(), 3);
        assert_eq!(g.color_at(0.5), Rgba::from_rgb(0x4a, 0, 0));
        assert_eq!(g.color_at(0.25), Rgba::from_rgb(0x32, 0, 0));
        assert_eq!(g.color_at(1.0), Rgba::from_rgb(0x1a, 0, 0));
    }

    #[test]
    fn gradient_default_direction_and_even_stops() {
        let g = parse_linear_gradient("linear-gradient(#000, #fff)").unwrap();
        assert_eq!(g.angle_deg, 180.0);
        assert_eq!(g.color_at(0.0), Rgba::BLACK);
        assert_eq!(g.color_at(1.0), Rgba::WHITE);

        let g = parse_linear_gradient("linear-gradient(to right, red, blue)").unwrap();
        assert_eq!(g.angle_deg, 90.0);
        assert!(parse_linear_gradient("radial-gradient(red, blue)").is_none());
    }
}
