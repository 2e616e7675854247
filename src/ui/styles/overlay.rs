// SPDX-License-Identifier: MPL-2.0
//! Overlay styles for the stats panel, side labels and error badges.

use crate::ui::design_tokens::{
    opacity,
    palette::{self, BLACK, WHITE},
    radius,
};
use iced::widget::{container, svg};
use iced::{Background, Border, Color, Theme};

fn container_background() -> Color {
    Color {
        a: opacity::OVERLAY_STRONG,
        ..BLACK
    }
}

fn container_border() -> Color {
    Color {
        a: opacity::OVERLAY_SUBTLE,
        ..WHITE
    }
}

/// Dark translucent box with white text, drawn above a video.
pub fn indicator(rad: f32) -> impl Fn(&Theme) -> container::Style {
    move |_theme: &Theme| container::Style {
        background: Some(Background::Color(container_background())),
        text_color: Some(WHITE),
        border: Border {
            color: container_border(),
            width: 1.0,
            radius: rad.into(),
        },
        ..Default::default()
    }
}

/// Badge shown over a side whose decoder failed.
pub fn error_badge(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(Color {
            a: opacity::OVERLAY_PRESSED,
            ..palette::ERROR_500
        })),
        text_color: Some(WHITE),
        border: Border {
            radius: radius::SM.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Black backdrop behind video frames.
pub fn video_backdrop(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(BLACK)),
        ..Default::default()
    }
}

/// Tints SVG icons placed on overlays.
pub fn icon(color: Color) -> impl Fn(&Theme, svg::Status) -> svg::Style {
    move |_theme: &Theme, _status: svg::Status| svg::Style { color: Some(color) }
}
