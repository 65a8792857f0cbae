// SPDX-License-Identifier: GPL-3.0-only

//! Key rendering for the overlay.
//!
//! Keys are fixed-size containers laid out exactly like their hit-test
//! rectangles. Their look depends on three independent states:
//!
//! - **Hovered**: a fingertip is over the key; thick highlight outline
//! - **Flashing**: the key fired within the last few ticks; flash fill
//! - **Modifier on**: CAPS or SHIFT whose modifier is active; yellow fill

use cosmic::iced::{Alignment, Background, Border, Color, Length};
use cosmic::widget::{self, container};
use cosmic::Element;

use super::theme::{modifier_active_color, Palette};
use crate::layout::Key;

/// Outline width of hovered keys and modifier keys.
pub const THICK_OUTLINE: f32 = 3.0;

/// Outline width of every other key.
pub const THIN_OUTLINE: f32 = 1.0;

/// Label size of single-character keys.
const CHAR_LABEL_SIZE: u16 = 12;

/// Label size of named keys.
const NAME_LABEL_SIZE: u16 = 10;

/// Per-key rendering state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub hovered: bool,
    pub flashing: bool,
    pub modifier_on: bool,
}

/// Resolved colors of one key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyVisual {
    pub fill: Color,
    pub outline: Color,
    pub outline_width: f32,
    pub text: Color,
}

/// Resolves the colors of `key` under `state`.
///
/// Modifier keys always show their modifier state and never flash.
#[must_use]
pub fn key_style(palette: &Palette, key: &Key, state: KeyState) -> KeyVisual {
    let is_modifier = key.action.is_modifier();

    let fill = if is_modifier {
        if state.modifier_on {
            modifier_active_color()
        } else {
            palette.key_fill
        }
    } else if state.flashing {
        palette.flash
    } else {
        palette.key_fill
    };

    let (outline, outline_width) = if state.hovered {
        (palette.highlight, THICK_OUTLINE)
    } else if is_modifier {
        (palette.key_outline, THICK_OUTLINE)
    } else {
        (palette.key_outline, THIN_OUTLINE)
    };

    KeyVisual {
        fill,
        outline,
        outline_width,
        text: palette.text,
    }
}

/// Renders a single key as an Element.
pub fn render_key<'a, M: 'a>(key: &Key, visual: KeyVisual) -> Element<'a, M> {
    let size = if key.label.chars().count() == 1 {
        CHAR_LABEL_SIZE
    } else {
        NAME_LABEL_SIZE
    };

    let label = widget::text(key.label.clone())
        .size(size)
        .font(cosmic::font::bold());

    container(label)
        .width(Length::Fixed(key.rect.width()))
        .height(Length::Fixed(key.rect.height()))
        .align_x(Alignment::Center)
        .align_y(Alignment::Center)
        .class(cosmic::style::Container::custom(move |_theme| container::Style {
            background: Some(Background::Color(visual.fill)),
            border: Border {
                color: visual.outline,
                width: visual.outline_width,
                radius: 0.0.into(),
            },
            text_color: Some(visual.text),
            ..Default::default()
        }))
        .into()
}

// ============================================================================
// Tests
// ============================================================================
