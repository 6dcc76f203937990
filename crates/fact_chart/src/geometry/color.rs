//! RGB colors as used by shape primitives, lights and scene backgrounds.
use serde::{Deserialize, Serialize};

/// Linear RGB color with components in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    /// Neutral dark grey used by translation and moment glyphs.
    pub const NEUTRAL: Color = Color::from_hex(0x333333);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from a `0xRRGGBB` integer.
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    pub fn to_hex(self) -> u32 {
        let [r, g, b, _] = self.to_rgba8(1.0);
        ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
    }

    /// Parses `#rgb`, `#rrggbb`, `0xrrggbb` and a handful of CSS color names.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let lower = text.to_ascii_lowercase();
        if let Some(hex) = lower
            .strip_prefix('#')
            .or_else(|| lower.strip_prefix("0x"))
        {
            return parse_hex_digits(hex);
        }
        let hex = match lower.as_str() {
            "black" => 0x000000,
            "white" => 0xffffff,
            "red" => 0xff0000,
            "green" => 0x008000,
            "lime" => 0x00ff00,
            "blue" => 0x0000ff,
            "yellow" => 0xffff00,
            "orange" => 0xffa500,
            "purple" => 0x800080,
            "cyan" => 0x00ffff,
            "magenta" => 0xff00ff,
            "gray" | "grey" => 0x808080,
            "darkgray" | "darkgrey" => 0xa9a9a9,
            "lightgray" | "lightgrey" => 0xd3d3d3,
            _ => return None,
        };
        Some(Self::from_hex(hex))
    }

    /// Builds a color from three components, either normalized `[0, 1]` or bytes `[0, 255]`.
    pub fn from_components(components: [f32; 3]) -> Option<Self> {
        if components.iter().any(|c| !c.is_finite() || *c < 0.0) {
            return None;
        }
        let max = components.iter().copied().fold(0.0f32, f32::max);
        let scale = if max > 1.0 { 255.0 } else { 1.0 };
        Some(Self::new(
            (components[0] / scale).min(1.0),
            (components[1] / scale).min(1.0),
            (components[2] / scale).min(1.0),
        ))
    }

    /// Linear interpolation in RGB space.
    pub fn lerp(self, other: Color, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    /// Darkens by `amount` in `[0, 1]`, where `1` yields black.
    pub fn darken(self, amount: f32) -> Self {
        self.scale(1.0 - amount.clamp(0.0, 1.0))
    }

    pub fn scale(self, factor: f32) -> Self {
        Self::new(
            (self.r * factor).clamp(0.0, 1.0),
            (self.g * factor).clamp(0.0, 1.0),
            (self.b * factor).clamp(0.0, 1.0),
        )
    }

    pub fn to_rgba8(self, alpha: f32) -> [u8; 4] {
        [
            to_byte(self.r),
            to_byte(self.g),
            to_byte(self.b),
            to_byte(alpha),
        ]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

#[inline]
fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn parse_hex_digits(hex: &str) -> Option<Color> {
    match hex.len() {
        3 => {
            let v = u32::from_str_radix(hex, 16).ok()?;
            let (r, g, b) = ((v >> 8) & 0xf, (v >> 4) & 0xf, v & 0xf);
            Some(Color::from_hex((r * 17) << 16 | (g * 17) << 8 | (b * 17)))
        }
        6 => u32::from_str_radix(hex, 16).ok().map(Color::from_hex),
        _ => None,
    }
}
