use serde::{Deserialize, Serialize};

/// Identifier for one of the built-in color palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    Neon,
    Sunset,
    Ocean,
    Forest,
    Cosmic,
}

impl ThemeName {
    pub const ALL: [ThemeName; 5] = [
        ThemeName::Neon,
        ThemeName::Sunset,
        ThemeName::Ocean,
        ThemeName::Forest,
        ThemeName::Cosmic,
    ];

    /// Resolves a theme from its lowercase name.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "neon" => Some(Self::Neon),
            "sunset" => Some(Self::Sunset),
            "ocean" => Some(Self::Ocean),
            "forest" => Some(Self::Forest),
            "cosmic" => Some(Self::Cosmic),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neon => "neon",
            Self::Sunset => "sunset",
            Self::Ocean => "ocean",
            Self::Forest => "forest",
            Self::Cosmic => "cosmic",
        }
    }
}

impl Default for ThemeName {
    fn default() -> Self {
        Self::Neon
    }
}

/// Immutable palette of the three colors every render mode draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub accent: Rgb,
}

impl Theme {
    /// Hue of the primary color, used by modes that derive per-element hues.
    pub fn base_hue(&self) -> f32 {
        self.primary.to_hsl().h
    }

    /// Primary color shifted by the given hue offset in degrees.
    pub fn primary_with_hue_offset(&self, degrees: f32) -> Rgb {
        self.primary.to_hsl().with_hue_offset(degrees).to_rgb()
    }
}

/// Returns the palette registered under the given name.
pub fn theme(name: ThemeName) -> Theme {
    match name {
        ThemeName::Neon => Theme {
            primary: Rgb::new(0x00, 0xf3, 0xff),
            secondary: Rgb::new(0xff, 0x00, 0xff),
            accent: Rgb::new(0xff, 0xd7, 0x00),
        },
        ThemeName::Sunset => Theme {
            primary: Rgb::new(0xff, 0x6b, 0x6b),
            secondary: Rgb::new(0xfe, 0xca, 0x57),
            accent: Rgb::new(0xff, 0x9f, 0xf3),
        },
        ThemeName::Ocean => Theme {
            primary: Rgb::new(0x00, 0xd2, 0xd3),
            secondary: Rgb::new(0x54, 0xa0, 0xff),
            accent: Rgb::new(0x5f, 0x27, 0xcd),
        },
        ThemeName::Forest => Theme {
            primary: Rgb::new(0x26, 0xde, 0x81),
            secondary: Rgb::new(0x20, 0xbf, 0x6b),
            accent: Rgb::new(0x0f, 0xb9, 0xb1),
        },
        ThemeName::Cosmic => Theme {
            primary: Rgb::new(0xa5, 0x5e, 0xea),
            secondary: Rgb::new(0xff, 0x6b, 0x81),
            accent: Rgb::new(0xfd, 0x96, 0x44),
        },
    }
}

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a `#rrggbb` hex string, with or without the leading `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self::new(r, g, b))
    }

    /// Converts to hue/saturation/lightness. Hue is in degrees, saturation
    /// and lightness in percent.
    pub fn to_hsl(self) -> Hsl {
        let r = self.r as f32 / 255.0;
        let g = self.g as f32 / 255.0;
        let b = self.b as f32 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if (max - min).abs() <= f32::EPSILON {
            return Hsl {
                h: 0.0,
                s: 0.0,
                l: l * 100.0,
            };
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };

        let h = if max == r {
            ((g - b) / d + if g < b { 6.0 } else { 0.0 }) / 6.0
        } else if max == g {
            ((b - r) / d + 2.0) / 6.0
        } else {
            ((r - g) / d + 4.0) / 6.0
        };

        Hsl {
            h: h * 360.0,
            s: s * 100.0,
            l: l * 100.0,
        }
    }
}

/// Hue/saturation/lightness representation used for hue offsetting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    /// Degrees, not normalised.
    pub h: f32,
    /// Percent.
    pub s: f32,
    /// Percent.
    pub l: f32,
}

impl Hsl {
    pub fn with_hue_offset(self, degrees: f32) -> Self {
        Self {
            h: self.h + degrees,
            ..self
        }
    }

    pub fn to_rgb(self) -> Rgb {
        let h = self.h.rem_euclid(360.0);
        let s = (self.s / 100.0).clamp(0.0, 1.0);
        let l = (self.l / 100.0).clamp(0.0, 1.0);

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
        let m = l - c / 2.0;

        let (r, g, b) = match h {
            h if h < 60.0 => (c, x, 0.0),
            h if h < 120.0 => (x, c, 0.0),
            h if h < 180.0 => (0.0, c, x),
            h if h < 240.0 => (0.0, x, c),
            h if h < 300.0 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        Rgb::new(
            ((r + m) * 255.0).round() as u8,
            ((g + m) * 255.0).round() as u8,
            ((b + m) * 255.0).round() as u8,
        )
    }
}

/// Convenience for modes that paint with raw HSL values.
pub fn hsl(h: f32, s: f32, l: f32) -> Rgb {
    Hsl { h, s, l }.to_rgb()
}
