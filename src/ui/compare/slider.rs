// SPDX-License-Identifier: MPL-2.0
//! Compare canvas: both videos layered under a draggable vertical divider.
//!
//! The original is visible left of the divider and the compressed video to
//! its right. The divider position lives in the canvas widget state
//! ([`DividerState`]); the pair controller never sees it.

use crate::ui::design_tokens::{opacity, palette, sizing};
use iced::mouse;
use iced::widget::canvas::{self, Frame, Geometry, Path, Stroke};
use iced::widget::{image, Action};
use iced::{Color, Event, Point, Rectangle, Renderer, Size, Theme};

/// Divider position and drag status.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DividerState {
    /// Horizontal position as a fraction of the canvas width.
    pub ratio: f32,
    pub dragging: bool,
}

impl Default for DividerState {
    fn default() -> Self {
        Self {
            ratio: 0.5,
            dragging: false,
        }
    }
}

impl DividerState {
    fn x(&self, bounds: Rectangle) -> f32 {
        bounds.width * self.ratio
    }

    fn is_near(&self, bounds: Rectangle, position: Point) -> bool {
        (position.x - self.x(bounds)).abs() <= sizing::DIVIDER_HIT_SIZE / 2.0
    }
}

/// Fraction of `width` at `x`, clamped to `[0, 1]`.
pub fn ratio_at(x: f32, width: f32) -> f32 {
    if width <= 0.0 || !x.is_finite() {
        return 0.5;
    }
    (x / width).clamp(0.0, 1.0)
}

/// Largest rectangle with the aspect of `content` centered in `bounds`.
pub fn fit_rect(bounds: Size, content: Size) -> Rectangle {
    if content.width <= 0.0 || content.height <= 0.0 {
        return Rectangle::new(Point::ORIGIN, bounds);
    }
    let content_aspect = content.width / content.height;
    let bounds_aspect = bounds.width / bounds.height;

    if content_aspect > bounds_aspect {
        let height = bounds.width / content_aspect;
        Rectangle::new(
            Point::new(0.0, (bounds.height - height) / 2.0),
            Size::new(bounds.width, height),
        )
    } else {
        let width = bounds.height * content_aspect;
        Rectangle::new(
            Point::new((bounds.width - width) / 2.0, 0.0),
            Size::new(width, bounds.height),
        )
    }
}

/// Latest frame of one side.
#[derive(Debug, Clone)]
pub struct Layer {
    pub handle: image::Handle,
    pub width: u32,
    pub height: u32,
}

/// Canvas program drawing the two layers.
#[derive(Debug, Clone, Default)]
pub struct CompareCanvas {
    pub original: Option<Layer>,
    pub compressed: Option<Layer>,
}

impl CompareCanvas {
    /// Both layers share the original's display rectangle so the wipe lines
    /// up even when the compressed video was downscaled.
    fn video_rect(&self, bounds: Size) -> Rectangle {
        let reference = self.original.as_ref().or(self.compressed.as_ref());
        match reference {
            Some(layer) => fit_rect(
                bounds,
                Size::new(layer.width as f32, layer.height as f32),
            ),
            None => Rectangle::new(Point::ORIGIN, bounds),
        }
    }
}

impl<Message> canvas::Program<Message> for CompareCanvas {
    type State = DividerState;

    fn update(
        &self,
        state: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<Action<Message>> {
        match event {
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let position = cursor.position_in(bounds)?;
                state.ratio = ratio_at(position.x, bounds.width);
                state.dragging = true;
                Some(Action::request_redraw().and_capture())
            }
            Event::Mouse(mouse::Event::CursorMoved { .. }) if state.dragging => {
                let position = cursor.position_from(bounds.position())?;
                state.ratio = ratio_at(position.x, bounds.width);
                Some(Action::request_redraw().and_capture())
            }
            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left))
                if state.dragging =>
            {
                state.dragging = false;
                Some(Action::request_redraw())
            }
            _ => None,
        }
    }

    fn draw(
        &self,
        state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), palette::BLACK);

        let video_rect = self.video_rect(bounds.size());
        let divider_x = state.x(bounds);

        if let Some(layer) = &self.original {
            let visible = Rectangle::new(
                Point::ORIGIN,
                Size::new(divider_x, bounds.height),
            );
            frame.with_clip(visible, |frame| {
                frame.draw_image(video_rect, canvas::Image::new(layer.handle.clone()));
            });
        }

        if let Some(layer) = &self.compressed {
            let visible = Rectangle::new(
                Point::new(divider_x, 0.0),
                Size::new(bounds.width - divider_x, bounds.height),
            );
            // Clipped frames use local coordinates.
            let local = Rectangle::new(
                Point::new(video_rect.x - divider_x, video_rect.y),
                video_rect.size(),
            );
            frame.with_clip(visible, |frame| {
                frame.draw_image(local, canvas::Image::new(layer.handle.clone()));
            });
        }

        let line = Path::line(
            Point::new(divider_x, 0.0),
            Point::new(divider_x, bounds.height),
        );
        frame.stroke(
            &line,
            Stroke::default()
                .with_width(sizing::DIVIDER_WIDTH)
                .with_color(palette::WHITE),
        );

        let grip = Path::circle(
            Point::new(divider_x, bounds.height / 2.0),
            sizing::DIVIDER_GRIP / 2.0,
        );
        frame.fill(
            &grip,
            Color {
                a: opacity::OVERLAY_STRONG,
                ..palette::BLACK
            },
        );
        frame.stroke(
            &grip,
            Stroke::default()
                .with_width(sizing::DIVIDER_WIDTH)
                .with_color(palette::WHITE),
        );

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if state.dragging {
            return mouse::Interaction::ResizingHorizontally;
        }
        match cursor.position_in(bounds) {
            Some(position) if state.is_near(bounds, position) => {
                mouse::Interaction::ResizingHorizontally
            }
            Some(_) => mouse::Interaction::Pointer,
            None => mouse::Interaction::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;

    const PIXEL_EPSILON: f32 = 1e-3;

    #[test]
    fn divider_starts_centered() {
        let state = DividerState::default();
        assert_abs_diff_eq!(state.ratio, 0.5);
        assert!(!state.dragging);
    }

    #[test]
    fn ratio_is_clamped_to_canvas() {
        assert_abs_diff_eq!(ratio_at(-20.0, 400.0), 0.0);
        assert_abs_diff_eq!(ratio_at(100.0, 400.0), 0.25);
        assert_abs_diff_eq!(ratio_at(900.0, 400.0), 1.0);
        assert_abs_diff_eq!(ratio_at(10.0, 0.0), 0.5);
    }

    #[test]
    fn wide_content_is_letterboxed() {
        let rect = fit_rect(Size::new(800.0, 800.0), Size::new(1920.0, 1080.0));
        assert_abs_diff_eq!(rect.width, 800.0, epsilon = PIXEL_EPSILON);
        assert_abs_diff_eq!(rect.height, 450.0, epsilon = PIXEL_EPSILON);
        assert_abs_diff_eq!(rect.y, 175.0, epsilon = PIXEL_EPSILON);
        assert_abs_diff_eq!(rect.x, 0.0, epsilon = PIXEL_EPSILON);
    }

    #[test]
    fn tall_content_is_pillarboxed() {
        let rect = fit_rect(Size::new(1000.0, 500.0), Size::new(500.0, 1000.0));
        assert_abs_diff_eq!(rect.height, 500.0, epsilon = PIXEL_EPSILON);
        assert_abs_diff_eq!(rect.width, 250.0, epsilon = PIXEL_EPSILON);
        assert_abs_diff_eq!(rect.x, 375.0, epsilon = PIXEL_EPSILON);
    }

    #[test]
    fn divider_hit_zone_surrounds_the_line() {
        let state = DividerState::default();
        let bounds = Rectangle::new(Point::ORIGIN, Size::new(400.0, 300.0));
        assert!(state.is_near(bounds, Point::new(200.0 + sizing::DIVIDER_HIT_SIZE / 2.0, 10.0)));
        assert!(!state.is_near(bounds, Point::new(10.0, 10.0)));
    }

    #[test]
    fn compressed_layer_uses_original_rect() {
        let canvas = CompareCanvas {
            original: Some(Layer {
                handle: image::Handle::from_rgba(2, 1, vec![0; 8]),
                width: 1920,
                height: 1080,
            }),
            compressed: Some(Layer {
                handle: image::Handle::from_rgba(1, 1, vec![0; 4]),
                width: 640,
                height: 640,
            }),
        };
        let rect = canvas.video_rect(Size::new(800.0, 800.0));
        assert_abs_diff_eq!(rect.height, 450.0, epsilon = PIXEL_EPSILON);
    }
}
