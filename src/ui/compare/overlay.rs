// SPDX-License-Identifier: MPL-2.0
//! Stats overlay drawn over the compare canvas.
//!
//! Two translucent panels (original top-left, compressed top-right) list
//! the latest [`DisplayStats`] of each side. Closing them leaves a single
//! "Show Stats" button in their place. Error badges are shown at the bottom
//! regardless of the overlay's visibility.

use super::stats::{format_ratio, DisplayStats};
use crate::error::VideoError;
use crate::i18n::fluent::I18n;
use crate::media::Side;
use crate::ui::design_tokens::{opacity, palette, radius, sizing, spacing, typography};
use crate::ui::{icons, styles};
use iced::alignment::{Horizontal, Vertical};
use iced::widget::{button, Column, Container, Row, Space, Stack, Text};
use iced::{Element, Length};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    ShowStats,
    HideStats,
}

/// Everything the overlay renders.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub show_stats: bool,
    pub original: Option<&'a DisplayStats>,
    pub compressed: Option<&'a DisplayStats>,
    pub original_error: Option<&'a VideoError>,
    pub compressed_error: Option<&'a VideoError>,
    /// `None` hides the compression line entirely; `Some(None)` renders the
    /// pending placeholder.
    pub compression: Option<Option<f64>>,
}

/// One `label: value` line of a stats panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatLine {
    pub label: String,
    pub value: String,
}

impl StatLine {
    fn render(&self) -> String {
        format!("{}: {}", self.label, self.value)
    }
}

/// Text lines of one side's panel, with placeholders for unknown fields.
pub fn stat_lines(i18n: &I18n, stats: Option<&DisplayStats>) -> Vec<StatLine> {
    let loading = || i18n.tr("compare-placeholder-loading");
    let not_available = || i18n.tr("compare-placeholder-na");
    let line = |key: &str, value: String| StatLine {
        label: i18n.tr(key),
        value,
    };

    vec![
        line(
            "compare-stat-resolution",
            stats
                .and_then(|s| s.resolution.clone())
                .unwrap_or_else(loading),
        ),
        line(
            "compare-stat-duration",
            stats.and_then(|s| s.duration.clone()).unwrap_or_else(loading),
        ),
        line(
            "compare-stat-current-time",
            stats
                .map(|s| s.current_time.clone())
                .unwrap_or_else(|| "0:00".to_string()),
        ),
        line(
            "compare-stat-codec",
            stats.map(|s| s.codec.clone()).unwrap_or_else(not_available),
        ),
        line(
            "compare-stat-estimated-size",
            stats
                .and_then(DisplayStats::estimated_size)
                .unwrap_or_else(|| i18n.tr("compare-placeholder-calculating")),
        ),
        line(
            "compare-stat-playback-state",
            stats
                .map(|s| i18n.tr(s.playback.i18n_key()))
                .unwrap_or_else(not_available),
        ),
    ]
}

/// Compression line under the compressed panel.
pub fn compression_line(i18n: &I18n, ratio: Option<f64>) -> String {
    match ratio {
        Some(ratio) => {
            let ratio = format_ratio(ratio);
            i18n.tr_with_args("compare-compression", &[("ratio", ratio.as_str())])
        }
        None => i18n.tr("compare-compression-pending"),
    }
}

pub fn view<'a>(ctx: ViewContext<'a>) -> Element<'a, Message> {
    let mut stack = Stack::new().width(Length::Fill).height(Length::Fill);

    if ctx.show_stats {
        let original = panel(&ctx, Side::Original, ctx.original, true);
        let compressed = panel(&ctx, Side::Compressed, ctx.compressed, false);

        stack = stack.push(
            Container::new(
                Row::new()
                    .push(original)
                    .push(Space::new().width(Length::Fill))
                    .push(compressed),
            )
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(spacing::XS)
            .align_y(Vertical::Top),
        );
    } else {
        let show_button = button(
            Row::new()
                .spacing(spacing::XXS)
                .align_y(Vertical::Center)
                .push(
                    icons::chart()
                        .width(Length::Fixed(sizing::ICON_SM))
                        .height(Length::Fixed(sizing::ICON_SM))
                        .style(styles::overlay::icon(palette::WHITE)),
                )
                .push(Text::new(ctx.i18n.tr("compare-show-stats")).size(typography::BODY)),
        )
        .on_press(Message::ShowStats)
        .padding(spacing::XS)
        .style(styles::button::primary);

        stack = stack.push(
            Container::new(show_button)
                .width(Length::Fill)
                .height(Length::Fill)
                .padding(spacing::XS)
                .align_x(Horizontal::Left)
                .align_y(Vertical::Top),
        );
    }

    let badges = [
        (Side::Original, ctx.original_error, Horizontal::Left),
        (Side::Compressed, ctx.compressed_error, Horizontal::Right),
    ];
    for (side, error, align) in badges {
        if let Some(error) = error {
            stack = stack.push(
                Container::new(error_badge(ctx.i18n, side, error))
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .padding(spacing::SM)
                    .align_x(align)
                    .align_y(Vertical::Bottom),
            );
        }
    }

    stack.into()
}

fn panel<'a>(
    ctx: &ViewContext<'a>,
    side: Side,
    stats: Option<&DisplayStats>,
    with_close: bool,
) -> Element<'a, Message> {
    let heading = Text::new(ctx.i18n.tr(side.i18n_key())).size(typography::TITLE_SM);

    let header: Element<'a, Message> = if with_close {
        let close = button(
            icons::close()
                .width(Length::Fixed(sizing::ICON_SM))
                .height(Length::Fixed(sizing::ICON_SM))
                .style(styles::overlay::icon(palette::WHITE)),
        )
        .on_press(Message::HideStats)
        .padding(spacing::XXS)
        .style(styles::button::overlay(
            palette::WHITE,
            opacity::TRANSPARENT,
            opacity::OVERLAY_HOVER,
        ));

        Row::new()
            .align_y(Vertical::Center)
            .push(heading)
            .push(Space::new().width(Length::Fill))
            .push(close)
            .into()
    } else {
        heading.into()
    };

    let mut column = Column::new().spacing(spacing::XXS).push(header);
    for line in stat_lines(ctx.i18n, stats) {
        column = column.push(Text::new(line.render()).size(typography::BODY_SM));
    }

    if side == Side::Compressed {
        if let Some(ratio) = ctx.compression {
            column = column.push(
                Text::new(compression_line(ctx.i18n, ratio))
                    .size(typography::BODY)
                    .color(palette::SUCCESS_500),
            );
        }
    }

    Container::new(column)
        .width(Length::Fixed(sizing::STATS_PANEL_WIDTH))
        .padding(spacing::XS)
        .style(styles::overlay::indicator(radius::MD))
        .into()
}

fn error_badge<'a>(i18n: &I18n, side: Side, error: &VideoError) -> Element<'a, Message> {
    let text = format!("{}: {}", i18n.tr(side.i18n_key()), i18n.tr(error.i18n_key()));
    Container::new(Text::new(text).size(typography::BODY_SM))
        .padding(spacing::XS)
        .style(styles::overlay::error_badge)
        .into()
}
