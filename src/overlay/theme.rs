// SPDX-License-Identifier: GPL-3.0-only

//! Color palettes for the overlay.
//!
//! The overlay does not follow the desktop theme; it ships four fixed
//! palettes selectable from the theme picker:
//!
//! | Name    | Background | Key fill  | Outline   | Highlight | Text      | Flash     |
//! |---------|------------|-----------|-----------|-----------|-----------|-----------|
//! | `Dark`  | `#111111`  | `#222222` | `#00FFFF` | `#00FF00` | `#00FFFF` | `#00FF00` |
//! | `Pink`  | `#1E001E`  | `#330033` | `#FF66FF` | `#FF00FF` | `#FF99FF` | `#FF00FF` |
//! | `Neon`  | `#000000`  | `#111111` | `#39FF14` | `#00FFFF` | `#39FF14` | `#00FFFF` |
//! | `Cyber` | `#0D0D0D`  | `#1A1A1A` | `#FF1493` | `#FF69B4` | `#FF69B4` | `#FF69B4` |

use cosmic::iced::Color;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Fill of CAPS and SHIFT while their modifier is on.
pub fn modifier_active_color() -> Color {
    Color::from_rgb8(0xFF, 0xFF, 0x00)
}

/// Selectable palette names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ThemeName {
    #[default]
    Dark,
    Pink,
    Neon,
    Cyber,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown theme {0:?}")]
pub struct UnknownTheme(pub String);

impl ThemeName {
    /// All palettes in picker order.
    pub const ALL: [ThemeName; 4] = [
        ThemeName::Dark,
        ThemeName::Pink,
        ThemeName::Neon,
        ThemeName::Cyber,
    ];

    /// Picker labels, in the same order as [`ThemeName::ALL`].
    pub const LABELS: [&'static str; 4] = ["Dark", "Pink", "Neon", "Cyber"];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeName::Dark => "Dark",
            ThemeName::Pink => "Pink",
            ThemeName::Neon => "Neon",
            ThemeName::Cyber => "Cyber",
        }
    }

    /// Position in [`ThemeName::ALL`], used by the picker.
    #[must_use]
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|name| name == self).unwrap_or(0)
    }

    #[must_use]
    pub fn palette(&self) -> Palette {
        let rgb = |hex: u32| {
            Color::from_rgb8((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
        };

        match self {
            ThemeName::Dark => Palette {
                background: rgb(0x111111),
                key_fill: rgb(0x222222),
                key_outline: rgb(0x00FFFF),
                highlight: rgb(0x00FF00),
                text: rgb(0x00FFFF),
                flash: rgb(0x00FF00),
            },
            ThemeName::Pink => Palette {
                background: rgb(0x1E001E),
                key_fill: rgb(0x330033),
                key_outline: rgb(0xFF66FF),
                highlight: rgb(0xFF00FF),
                text: rgb(0xFF99FF),
                flash: rgb(0xFF00FF),
            },
            ThemeName::Neon => Palette {
                background: rgb(0x000000),
                key_fill: rgb(0x111111),
                key_outline: rgb(0x39FF14),
                highlight: rgb(0x00FFFF),
                text: rgb(0x39FF14),
                flash: rgb(0x00FFFF),
            },
            ThemeName::Cyber => Palette {
                background: rgb(0x0D0D0D),
                key_fill: rgb(0x1A1A1A),
                key_outline: rgb(0xFF1493),
                highlight: rgb(0xFF69B4),
                text: rgb(0xFF69B4),
                flash: rgb(0xFF69B4),
            },
        }
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeName {
    type Err = UnknownTheme;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownTheme(s.to_string()))
    }
}

/// Colors of one palette.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub key_fill: Color,
    pub key_outline: Color,
    /// Outline of hovered keys.
    pub highlight: Color,
    pub text: Color,
    /// Fill of recently pressed keys.
    pub flash: Color,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: names round-trip through parsing
    #[test]
    fn test_theme_names_parse() {
        for name in ThemeName::ALL {
            assert_eq!(name.as_str().parse::<ThemeName>(), Ok(name));
        }
        assert_eq!("neon".parse::<ThemeName>(), Ok(ThemeName::Neon), "Parsing ignores case");
        assert_eq!(
            "Solarized".parse::<ThemeName>(),
            Err(UnknownTheme("Solarized".to_string()))
        );
    }

    /// Test: Dark is the default palette
    #[test]
    fn test_default_theme() {
        assert_eq!(ThemeName::default(), ThemeName::Dark);
        assert_eq!(ThemeName::default().index(), 0);
        assert_eq!(ThemeName::Cyber.index(), 3);
    }

    /// Test: picker labels line up with the palette order
    #[test]
    fn test_labels_match_names() {
        for (label, name) in ThemeName::LABELS.iter().zip(ThemeName::ALL) {
            assert_eq!(*label, name.as_str());
            assert_eq!(ThemeName::ALL[name.index()], name);
        }
    }

    /// Test: palette colors match their hex values
    #[test]
    fn test_palette_colors() {
        let dark = ThemeName::Dark.palette();
        assert_eq!(dark.background, Color::from_rgb8(0x11, 0x11, 0x11));
        assert_eq!(dark.key_outline, Color::from_rgb8(0x00, 0xFF, 0xFF));

        let neon = ThemeName::Neon.palette();
        assert_eq!(neon.text, Color::from_rgb8(0x39, 0xFF, 0x14));
        assert_eq!(neon.background, Color::BLACK);
    }
}
