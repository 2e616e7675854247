// SPDX-License-Identifier: MPL-2.0
//! Container styles.

use crate::ui::design_tokens::{palette, radius};
use iced::widget::container;
use iced::{Background, Border, Theme};

/// Dark strip under the compare canvas holding the transport controls.
///
/// Stays dark in both theme modes so it reads as part of the video surface.
pub fn transport_bar(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(palette::GRAY_900)),
        text_color: Some(palette::GRAY_200),
        border: Border {
            radius: radius::NONE.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}
