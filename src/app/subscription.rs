// SPDX-License-Identifier: MPL-2.0
//! Routing of native events to the compare widget.

use super::Message;
use crate::ui::compare;
use iced::{event, Subscription};

/// Window close requests go to the app for teardown; keyboard events nobody
/// captured go to the compare widget as shortcuts.
pub fn create_event_subscription() -> Subscription<Message> {
    event::listen_with(|event, status, window_id| {
        if let event::Event::Window(iced::window::Event::CloseRequested) = &event {
            return Some(Message::WindowCloseRequested(window_id));
        }

        match (&event, status) {
            (event::Event::Keyboard(..), event::Status::Ignored) => {
                Some(Message::Compare(compare::Message::RawEvent(event)))
            }
            _ => None,
        }
    })
}
