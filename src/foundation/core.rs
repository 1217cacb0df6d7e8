use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{CarouselError, CarouselResult};

pub use kurbo::{Point, Rect, RoundedRect, Vec2};

/// Wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Pixel dimensions of a slide, platform preset or surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Create a validated size with both dimensions `> 0`.
    pub fn new(width: u32, height: u32) -> CarouselResult<Self> {
        if width == 0 || height == 0 {
            return Err(CarouselError::validation("width/height must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// Width as `f64`.
    pub fn w(self) -> f64 {
        f64::from(self.width)
    }

    /// Height as `f64`.
    pub fn h(self) -> f64 {
        f64::from(self.height)
    }

    /// Full-canvas rectangle anchored at the origin.
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, self.w(), self.h())
    }
}

/// Straight (non-premultiplied) RGBA8 color.
///
/// Serialized as a CSS hex string: `#rrggbb`, or `#rrggbbaa` when not fully opaque.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// Opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from RGBA channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa` (leading `#` optional), or CSS
    /// `rgb(r, g, b)` / `rgba(r, g, b, a)` with `a` in `0..=1`.
    pub fn parse(s: &str) -> CarouselResult<Self> {
        let s = s.trim();
        let lower = s.to_ascii_lowercase();
        if let Some(args) = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
        {
            return parse_css_rgb(args);
        }
        parse_hex(s)
    }

    /// Premultiplied `[r, g, b, a]` bytes.
    pub fn to_premul(self) -> [u8; 4] {
        let a = u16::from(self.a);
        [
            crate::foundation::math::mul_div255(u16::from(self.r), a),
            crate::foundation::math::mul_div255(u16::from(self.g), a),
            crate::foundation::math::mul_div255(u16::from(self.b), a),
            self.a,
        ]
    }

    /// Component-wise linear interpolation in straight-alpha space, `t` clamped to `0..=1`.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| -> u8 {
            let af = f32::from(a);
            let bf = f32::from(b);
            (af + (bf - af) * t).round().clamp(0.0, 255.0) as u8
        };
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

impl fmt::Display for Rgba8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "#{:02x}{:02x}{:02x}{:02x}",
                self.r, self.g, self.b, self.a
            )
        }
    }
}

impl FromStr for Rgba8 {
    type Err = CarouselError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for Rgba8 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Rgba8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

fn parse_hex(s: &str) -> CarouselResult<Rgba8> {
    let digits = s.strip_prefix('#').unwrap_or(s);
    if !digits.is_ascii() {
        return Err(CarouselError::validation(format!("invalid hex color \"{s}\"")));
    }

    let nibble = |i: usize| -> CarouselResult<u8> {
        u8::from_str_radix(&digits[i..i + 1], 16)
            .map(|v| v * 17)
            .map_err(|_| CarouselError::validation(format!("invalid hex color \"{s}\"")))
    };
    let byte = |i: usize| -> CarouselResult<u8> {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .map_err(|_| CarouselError::validation(format!("invalid hex color \"{s}\"")))
    };

    match digits.len() {
        3 => Ok(Rgba8::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Ok(Rgba8::rgba(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
        6 => Ok(Rgba8::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Ok(Rgba8::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => Err(CarouselError::validation(format!(
            "hex color must be #rgb, #rgba, #rrggbb or #rrggbbaa, got \"{s}\""
        ))),
    }
}

fn parse_css_rgb(args: &str) -> CarouselResult<Rgba8> {
    let inner = args
        .strip_suffix(')')
        .ok_or_else(|| CarouselError::validation("css color is missing ')'"))?;
    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();

    let channel = |p: &str| -> CarouselResult<u8> {
        p.parse::<f64>()
            .map(|v| v.round().clamp(0.0, 255.0) as u8)
            .map_err(|_| CarouselError::validation(format!("invalid color channel \"{p}\"")))
    };

    match parts.as_slice() {
        [r, g, b] => Ok(Rgba8::rgb(channel(r)?, channel(g)?, channel(b)?)),
        [r, g, b, a] => {
            let a = a
                .parse::<f64>()
                .map_err(|_| CarouselError::validation(format!("invalid alpha \"{a}\"")))?;
            Ok(Rgba8::rgba(
                channel(r)?,
                channel(g)?,
                channel(b)?,
                (a.clamp(0.0, 1.0) * 255.0).round() as u8,
            ))
        }
        _ => Err(CarouselError::validation(
            "css rgb()/rgba() takes 3 or 4 components",
        )),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
