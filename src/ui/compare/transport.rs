// SPDX-License-Identifier: MPL-2.0
//! Transport bar: one play/pause toggle and the shared scrubber.

use super::controller::TransportState;
use super::stats::format_time;
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{opacity, palette, sizing, spacing, typography};
use crate::ui::{icons, styles};
use iced::alignment::Vertical;
use iced::widget::{button, slider, tooltip, Container, Row, Text};
use iced::{Element, Length};

/// Scrubber granularity in seconds.
pub const SLIDER_STEP_SECS: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Message {
    TogglePlayback,
    /// Scrubber moved to a position in seconds.
    Seek(f64),
}

pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
}

/// Scrubber value kept inside `[0, duration]` so the slider never renders
/// a handle outside its rail.
pub fn slider_position(transport: &TransportState) -> f64 {
    let max = transport.duration.max(0.0);
    if transport.slider_value.is_finite() {
        transport.slider_value.clamp(0.0, max)
    } else {
        0.0
    }
}

pub fn view<'a>(ctx: ViewContext<'a>, transport: &TransportState) -> Element<'a, Message> {
    let (icon, tip) = if transport.is_playing {
        (icons::pause(), ctx.i18n.tr("compare-pause-tooltip"))
    } else {
        (icons::play(), ctx.i18n.tr("compare-play-tooltip"))
    };

    let toggle = button(
        icon.width(Length::Fixed(sizing::ICON_MD))
            .height(Length::Fixed(sizing::ICON_MD))
            .style(styles::overlay::icon(palette::GRAY_200)),
    )
    .on_press(Message::TogglePlayback)
    .padding(spacing::XXS)
    .height(Length::Fixed(sizing::BUTTON_HEIGHT))
    .style(styles::button::overlay(
        palette::GRAY_200,
        opacity::TRANSPARENT,
        opacity::OVERLAY_SUBTLE,
    ));

    let toggle = tooltip(toggle, Text::new(tip), tooltip::Position::Top).gap(spacing::XXS);

    let duration = transport.duration.max(0.0);
    let scrubber = slider(0.0..=duration, slider_position(transport), Message::Seek)
        .step(SLIDER_STEP_SECS)
        .width(Length::Fill)
        .style(styles::slider::transport);

    let time = Text::new(format!(
        "{} / {}",
        format_time(slider_position(transport)),
        format_time(duration)
    ))
    .size(typography::CAPTION)
    .color(palette::GRAY_200);

    Container::new(
        Row::new()
            .spacing(spacing::XS)
            .align_y(Vertical::Center)
            .push(toggle)
            .push(scrubber)
            .push(time),
    )
    .width(Length::Fill)
    .padding([spacing::XS, spacing::SM])
    .style(styles::container::transport_bar)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slider_position_stays_on_rail() {
        let mut transport = TransportState {
            slider_value: 12.0,
            duration: 10.0,
            is_playing: true,
        };
        assert_eq!(slider_position(&transport), 10.0);

        transport.slider_value = -1.0;
        assert_eq!(slider_position(&transport), 0.0);

        transport.slider_value = f64::NAN;
        assert_eq!(slider_position(&transport), 0.0);
    }

    #[test]
    fn zero_duration_pins_scrubber_at_start() {
        let transport = TransportState {
            slider_value: 3.0,
            duration: 0.0,
            is_playing: false,
        };
        assert_eq!(slider_position(&transport), 0.0);
    }
}
