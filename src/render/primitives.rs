use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
///
/// Deserializes from CSS-like strings (`#rgb`, `#rrggbb`, `#rrggbbaa`,
/// `rgb(r, g, b)`, `rgba(r, g, b, a)`) or from explicit channel objects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr")]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Css(String),
    Channels {
        red: f64,
        green: f64,
        blue: f64,
        #[serde(default = "opaque")]
        alpha: f64,
    },
}

fn opaque() -> f64 {
    1.0
}

impl TryFrom<ColorRepr> for Color {
    type Error = ChartError;

    fn try_from(repr: ColorRepr) -> ChartResult<Self> {
        let color = match repr {
            ColorRepr::Css(input) => Self::parse(&input)?,
            ColorRepr::Channels {
                red,
                green,
                blue,
                alpha,
            } => Self::rgba(red, green, blue, alpha),
        };
        color.validate()?;
        Ok(color)
    }
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Builds a color from 8-bit channels.
    #[must_use]
    pub fn rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::rgb(
            f64::from(red) / 255.0,
            f64::from(green) / 255.0,
            f64::from(blue) / 255.0,
        )
    }

    /// Parses a CSS-like color string.
    pub fn parse(input: &str) -> ChartResult<Self> {
        let value = input.trim();
        if let Some(hex) = value.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| invalid_color(input));
        }

        let lower = value.to_ascii_lowercase();
        if lower == "transparent" {
            return Ok(Self::rgba(0.0, 0.0, 0.0, 0.0));
        }

        let (body, with_alpha) = if let Some(rest) = lower.strip_prefix("rgba(") {
            (rest, true)
        } else if let Some(rest) = lower.strip_prefix("rgb(") {
            (rest, false)
        } else {
            return Err(invalid_color(input));
        };
        let body = body.strip_suffix(')').ok_or_else(|| invalid_color(input))?;
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        let expected = if with_alpha { 4 } else { 3 };
        if parts.len() != expected {
            return Err(invalid_color(input));
        }

        let mut channels = [0.0; 3];
        for (slot, part) in channels.iter_mut().zip(&parts) {
            let channel: f64 = part.parse().map_err(|_| invalid_color(input))?;
            if !(0.0..=255.0).contains(&channel) {
                return Err(invalid_color(input));
            }
            *slot = channel / 255.0;
        }
        let alpha = if with_alpha {
            parts[3].parse().map_err(|_| invalid_color(input))?
        } else {
            1.0
        };

        let color = Self::rgba(channels[0], channels[1], channels[2], alpha);
        color.validate()?;
        Ok(color)
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |digits: &str| u8::from_str_radix(digits, 16).ok();
    match hex.len() {
        3 => {
            let expand = |index: usize| channel(&hex[index..=index].repeat(2));
            Some(Color::rgb8(expand(0)?, expand(1)?, expand(2)?))
        }
        6 | 8 => {
            let mut color = Color::rgb8(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?);
            if hex.len() == 8 {
                color.alpha = f64::from(channel(&hex[6..8])?) / 255.0;
            }
            Some(color)
        }
        _ => None,
    }
}

fn invalid_color(input: &str) -> ChartError {
    ChartError::InvalidData(format!("unsupported color `{input}`"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Font selection for one text role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub family: String,
    pub size_px: f64,
    pub weight: FontWeight,
}

impl Font {
    #[must_use]
    pub fn new(family: impl Into<String>, size_px: f64, weight: FontWeight) -> Self {
        Self {
            family: family.into(),
            size_px,
            weight,
        }
    }
}

/// Horizontal text alignment relative to the anchor x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextHAlign {
    Left,
    Center,
    Right,
}

/// Vertical text alignment relative to the anchor y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextBaseline {
    Alphabetic,
    Top,
    Middle,
    Bottom,
}

/// Complete styling for one `fill_text` call.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font: Font,
    pub color: Color,
    pub h_align: TextHAlign,
    pub baseline: TextBaseline,
}

impl TextStyle {
    #[must_use]
    pub fn new(font: Font, color: Color) -> Self {
        Self {
            font,
            color,
            h_align: TextHAlign::Left,
            baseline: TextBaseline::Alphabetic,
        }
    }

    #[must_use]
    pub fn aligned(mut self, h_align: TextHAlign) -> Self {
        self.h_align = h_align;
        self
    }

    #[must_use]
    pub fn with_baseline(mut self, baseline: TextBaseline) -> Self {
        self.baseline = baseline;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn parses_css_color_forms() {
        assert_eq!(Color::parse("rgb(255, 0, 0)").expect("rgb"), Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(
            Color::parse("rgba(0,0,0,0.5)").expect("rgba"),
            Color::rgba(0.0, 0.0, 0.0, 0.5)
        );
        assert_eq!(Color::parse("#fff").expect("short hex"), Color::WHITE);
        assert_eq!(Color::parse("#000000").expect("hex"), Color::BLACK);
        assert_eq!(Color::parse("#00000000").expect("hex alpha").alpha, 0.0);
    }

    #[test]
    fn rejects_malformed_colors() {
        assert!(Color::parse("red").is_err());
        assert!(Color::parse("rgb(300, 0, 0)").is_err());
        assert!(Color::parse("rgba(0, 0, 0)").is_err());
        assert!(Color::parse("#12").is_err());
        assert!(Color::parse("rgba(0, 0, 0, 2)").is_err());
    }

    #[test]
    fn deserializes_from_string_or_channels() {
        let from_css: Color = serde_json::from_str("\"rgb(0, 0, 255)\"").expect("css");
        assert_eq!(from_css, Color::rgb(0.0, 0.0, 1.0));
        let from_channels: Color =
            serde_json::from_str(r#"{"red": 0.5, "green": 0.5, "blue": 0.5}"#).expect("channels");
        assert_eq!(from_channels, Color::rgb(0.5, 0.5, 0.5));
        assert!(serde_json::from_str::<Color>(r#"{"red": 2, "green": 0, "blue": 0}"#).is_err());
    }
}
