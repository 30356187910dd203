//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between [`operations`](super::operations) (which decides what
//! each template needs) and the [`backend`](super::backend) (which does the
//! pixel work). This separation allows swapping backends (e.g. for testing
//! with a mock) without changing generation logic.
//!
//! ## Types
//!
//! - [`Fit`]: How a source is mapped onto the target rectangle.
//! - [`Color`]: An RGBA color parsed from `#rgb`, `#rrggbb` or `#rrggbbaa`.
//! - [`RenderParams`]: Resize/crop one source into one output file.
//! - [`LogoParams`]: Center a logo on a solid canvas.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Resize policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    /// Scale to fit inside the target, pad the rest with the background.
    Contain,
    /// Scale to cover the target, center-crop the overflow.
    Cover,
}

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub [u8; 4]);

impl Color {
    pub const WHITE: Color = Color([255, 255, 255, 255]);

    pub fn is_opaque(self) -> bool {
        self.0[3] == 255
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| format!("color '{s}' must start with '#'"))?;
        // from_str_radix alone would accept a leading '+'
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("color '{s}' is not valid hex"));
        }
        let channel = |digits: &str| {
            u8::from_str_radix(digits, 16).map_err(|_| format!("color '{s}' is not valid hex"))
        };
        match hex.len() {
            3 => {
                let mut rgba = [255; 4];
                for (i, c) in hex.chars().enumerate() {
                    let v = channel(&c.to_string())?;
                    rgba[i] = v * 17;
                }
                Ok(Color(rgba))
            }
            6 | 8 => {
                let mut rgba = [255; 4];
                for i in 0..hex.len() / 2 {
                    rgba[i] = channel(&hex[i * 2..i * 2 + 2])?;
                }
                Ok(Color(rgba))
            }
            _ => Err(format!(
                "color '{s}' must be #rgb, #rrggbb or #rrggbbaa"
            )),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0;
        if a == 255 {
            write!(f, "#{r:02x}{g:02x}{b:02x}")
        } else {
            write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

/// Parameters for rendering one template from a source image.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderParams {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Exact output dimensions.
    pub width: u32,
    pub height: u32,
    pub fit: Fit,
    /// Flatten onto this color. `None` keeps transparency.
    pub background: Option<Color>,
}

/// Parameters for compositing a logo onto a solid canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct LogoParams {
    pub logo: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Logo box edge as a fraction of the canvas' short edge.
    pub logo_scale: f32,
    pub background: Color,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_six_digit_color() {
        assert_eq!("#ff8000".parse::<Color>(), Ok(Color([255, 128, 0, 255])));
    }

    #[test]
    fn parse_short_color() {
        assert_eq!("#fff".parse::<Color>(), Ok(Color::WHITE));
        assert_eq!("#102".parse::<Color>(), Ok(Color([17, 0, 34, 255])));
    }

    #[test]
    fn parse_color_with_alpha() {
        let c: Color = "#00000080".parse().unwrap();
        assert_eq!(c, Color([0, 0, 0, 128]));
        assert!(!c.is_opaque());
    }

    #[test]
    fn parse_color_rejects_garbage() {
        assert!("ffffff".parse::<Color>().is_err());
        assert!("#ggg".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
        assert!("#ééé".parse::<Color>().is_err());
    }

    #[test]
    fn parse_color_rejects_sign_characters() {
        assert!("#+f+f+f".parse::<Color>().is_err());
        assert!("#+ff".parse::<Color>().is_err());
        assert!("#-1ffff".parse::<Color>().is_err());
    }

    #[test]
    fn color_display_is_lowercase_hex() {
        assert_eq!(Color([17, 17, 17, 255]).to_string(), "#111111");
        assert_eq!(Color([255, 0, 0, 16]).to_string(), "#ff000010");
    }
}
