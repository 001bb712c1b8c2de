//! 8-bit RGB colors with hex round-tripping.
//!
//! Exported colors are whole bytes per channel so that they always survive a
//! trip through `#rrggbb` unchanged. Slow drifts keep fractional channels
//! (`to_channels` / `from_channels`) and round only on the way out.

use glam::Vec3;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("expected six hex digits, got {0:?}")]
    Length(String),
    #[error("invalid hex digit in {0:?}")]
    Digit(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `rrggbb`, case-insensitive.
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let digits = hex.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        if digits.len() != 6 {
            return Err(ColorError::Length(hex.to_owned()));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorError::Digit(hex.to_owned()));
        }
        let value =
            u32::from_str_radix(digits, 16).map_err(|_| ColorError::Digit(hex.to_owned()))?;
        Ok(Self::new((value >> 16) as u8, (value >> 8) as u8, value as u8))
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Per-channel linear blend toward `target`. `t` is clamped to \[0, 1\]
    /// and each channel is rounded to the nearest byte.
    pub fn lerp(self, target: Rgb, t: f32) -> Rgb {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let mix = |a: u8, b: u8| -> u8 {
            let v = a as f32 + (b as f32 - a as f32) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Rgb::new(
            mix(self.r, target.r),
            mix(self.g, target.g),
            mix(self.b, target.b),
        )
    }

    /// Channels as floats in \[0, 255\].
    pub fn to_channels(self) -> Vec3 {
        Vec3::new(self.r as f32, self.g as f32, self.b as f32)
    }

    /// Round fractional channels to the nearest byte, clamped to \[0, 255\].
    /// Non-finite channels become 0.
    pub fn from_channels(c: Vec3) -> Rgb {
        let byte = |v: f32| -> u8 {
            if v.is_finite() {
                v.round().clamp(0.0, 255.0) as u8
            } else {
                0
            }
        };
        Rgb::new(byte(c.x), byte(c.y), byte(c.z))
    }

    /// Channels scaled to \[0, 1\] for shader uniforms.
    pub fn to_unit(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgb::from_hex(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_hash() {
        assert_eq!(Rgb::from_hex("#6fdcff"), Ok(Rgb::new(0x6f, 0xdc, 0xff)));
        assert_eq!(Rgb::from_hex("FFA500"), Ok(Rgb::new(0xff, 0xa5, 0x00)));
        assert_eq!("#F7FEFF".parse::<Rgb>(), Ok(Rgb::new(0xf7, 0xfe, 0xff)));
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(matches!(Rgb::from_hex("#fff"), Err(ColorError::Length(_))));
        assert!(matches!(Rgb::from_hex("#ggeeff"), Err(ColorError::Digit(_))));
        assert!(matches!(Rgb::from_hex("+12345"), Err(ColorError::Digit(_))));
        assert!(Rgb::from_hex("").is_err());
    }

    #[test]
    fn hex_output_is_lowercase_and_padded() {
        assert_eq!(Rgb::new(0, 10, 255).to_hex(), "#000aff");
        assert_eq!(Rgb::new(0x39, 0xff, 0x14).to_string(), "#39ff14");
    }

    #[test]
    fn lerp_endpoints_are_exact() {
        assert_eq!(Rgb::BLACK.lerp(Rgb::WHITE, 1.0), Rgb::WHITE);
        assert_eq!(Rgb::BLACK.lerp(Rgb::WHITE, 0.0), Rgb::BLACK);
        assert_eq!(Rgb::BLACK.lerp(Rgb::WHITE, 1.0).to_hex(), "#ffffff");
    }

    #[test]
    fn lerp_clamps_factor_and_rounds() {
        assert_eq!(Rgb::BLACK.lerp(Rgb::WHITE, 7.5), Rgb::WHITE);
        assert_eq!(Rgb::WHITE.lerp(Rgb::BLACK, -1.0), Rgb::WHITE);
        assert_eq!(Rgb::BLACK.lerp(Rgb::WHITE, f32::NAN), Rgb::BLACK);
        // 255 * 0.5 = 127.5 rounds away from zero
        assert_eq!(Rgb::BLACK.lerp(Rgb::WHITE, 0.5), Rgb::new(128, 128, 128));
    }

    #[test]
    fn channels_round_trip_and_clamp() {
        let c = Rgb::new(0x6f, 0xdc, 0xff);
        assert_eq!(Rgb::from_channels(c.to_channels()), c);
        assert_eq!(
            Rgb::from_channels(Vec3::new(0.49, 127.5, 300.0)),
            Rgb::new(0, 128, 255)
        );
        assert_eq!(Rgb::from_channels(Vec3::new(-4.0, f32::NAN, 1.0)), Rgb::new(0, 0, 1));
    }
}
