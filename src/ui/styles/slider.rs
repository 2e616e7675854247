// SPDX-License-Identifier: MPL-2.0
//! Slider styles.

use crate::ui::design_tokens::{opacity, palette, sizing};
use iced::widget::slider;
use iced::{Background, Border, Color, Theme};

/// Transport scrubber: brand-colored progress, faded remainder.
pub fn transport(theme: &Theme, status: slider::Status) -> slider::Style {
    let is_light = matches!(theme, Theme::Light);

    let filled = match status {
        slider::Status::Hovered | slider::Status::Dragged => palette::PRIMARY_400,
        slider::Status::Active => palette::PRIMARY_500,
    };
    let remainder = if is_light {
        Color {
            a: opacity::OVERLAY_MEDIUM,
            ..palette::GRAY_400
        }
    } else {
        Color {
            a: opacity::OVERLAY_MEDIUM,
            ..palette::GRAY_200
        }
    };

    slider::Style {
        rail: slider::Rail {
            backgrounds: (Background::Color(filled), Background::Color(remainder)),
            width: sizing::TIMELINE_TRACK,
            border: Border {
                color: Color::TRANSPARENT,
                width: 0.0,
                radius: (sizing::TIMELINE_TRACK / 2.0).into(),
            },
        },
        handle: slider::Handle {
            shape: slider::HandleShape::Circle {
                radius: sizing::SCRUBBER_THUMB / 2.0,
            },
            background: Background::Color(palette::WHITE),
            border_width: 1.0,
            border_color: palette::PRIMARY_600,
        },
    }
}
