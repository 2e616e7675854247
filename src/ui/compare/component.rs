// SPDX-License-Identifier: MPL-2.0
//! The compare widget: canvas, stats overlay and transport bar over one
//! [`PairController`].
//!
//! `mount` binds a fresh [`VideoElement`] to each side and starts a new
//! playback session; `subscription` runs one decoder per side for that
//! session. `unmount` releases both bindings and, by dropping the sources,
//! ends both subscriptions.

use super::controller::{ControllerOptions, PairController};
use super::slider::{CompareCanvas, Layer};
use super::{overlay, transport};
use crate::config::{self, Config};
use crate::i18n::fluent::I18n;
use crate::media::{MediaElement, Side};
use crate::ui::styles;
use crate::video_player::{video_playback, PlaybackEvent, VideoElement};
use iced::widget::{canvas, Column, Container, Stack};
use iced::{event, keyboard, Element, Length, Subscription};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub enum Message {
    Playback(PlaybackEvent),
    Overlay(overlay::Message),
    Transport(transport::Message),
    /// Native event not captured by any widget (keyboard shortcuts).
    RawEvent(event::Event),
}

/// The two files being compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sources {
    pub original: PathBuf,
    pub compressed: PathBuf,
}

impl Sources {
    pub fn path(&self, side: Side) -> &Path {
        match side {
            Side::Original => &self.original,
            Side::Compressed => &self.compressed,
        }
    }
}

/// Widget settings taken from the configuration file.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub controller: ControllerOptions,
    pub autoplay: bool,
    pub show_stats: bool,
    pub show_compression_estimate: bool,
    pub seek_step_secs: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl Settings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            controller: config.controller_options(),
            autoplay: config.playback.autoplay.unwrap_or(config::DEFAULT_AUTOPLAY),
            show_stats: config.show_stats_on_start(),
            show_compression_estimate: config.show_compression_estimate(),
            seek_step_secs: config.keyboard_seek_step_secs(),
        }
    }
}

/// Environment required to render the widget.
pub struct ViewEnv<'a> {
    pub i18n: &'a I18n,
}

pub struct State {
    controller: PairController<VideoElement>,
    sources: Option<Sources>,
    /// Bumped on every mount so a remount restarts both decoders.
    session_id: u64,
    show_stats: bool,
    settings: Settings,
}

impl State {
    pub fn new(settings: Settings) -> Self {
        Self {
            controller: PairController::new(settings.controller.clone()),
            sources: None,
            session_id: 0,
            show_stats: settings.show_stats,
            settings,
        }
    }

    /// Binds both videos. A mounted pair is released first.
    pub fn mount(&mut self, sources: Sources) {
        if self.is_mounted() {
            self.unmount();
        }
        self.session_id = self.session_id.wrapping_add(1);
        for side in Side::ALL {
            self.controller
                .mount(side, VideoElement::new(self.settings.autoplay));
        }
        log::info!(
            "Comparing {} with {}",
            sources.original.display(),
            sources.compressed.display()
        );
        self.sources = Some(sources);
    }

    /// Releases both bindings and stops both decoders. Idempotent.
    pub fn unmount(&mut self) {
        self.controller.unmount();
        if self.sources.take().is_some() {
            log::debug!("Compare widget unmounted (session {})", self.session_id);
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.sources.is_some()
    }

    pub fn sources(&self) -> Option<&Sources> {
        self.sources.as_ref()
    }

    pub fn controller(&self) -> &PairController<VideoElement> {
        &self.controller
    }

    pub fn show_stats(&self) -> bool {
        self.show_stats
    }

    pub fn update(&mut self, message: Message) {
        match message {
            Message::Playback(PlaybackEvent { side, message }) => {
                self.controller.on_input(side, message);
            }
            Message::Overlay(overlay::Message::ShowStats) => self.show_stats = true,
            Message::Overlay(overlay::Message::HideStats) => self.show_stats = false,
            Message::Transport(transport::Message::TogglePlayback) => {
                self.controller.toggle_both();
            }
            Message::Transport(transport::Message::Seek(secs)) => {
                self.controller.seek_both(secs);
            }
            Message::RawEvent(event) => self.handle_raw_event(&event),
        }
    }

    fn handle_raw_event(&mut self, event: &event::Event) {
        let event::Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. }) = event
        else {
            return;
        };
        if modifiers.command() || modifiers.alt() {
            return;
        }

        match key.as_ref() {
            keyboard::Key::Named(keyboard::key::Named::Space) => self.controller.toggle_both(),
            keyboard::Key::Named(keyboard::key::Named::ArrowLeft) => {
                self.seek_relative(-self.settings.seek_step_secs);
            }
            keyboard::Key::Named(keyboard::key::Named::ArrowRight) => {
                self.seek_relative(self.settings.seek_step_secs);
            }
            keyboard::Key::Character(c) if c.eq_ignore_ascii_case("s") => {
                self.show_stats = !self.show_stats;
            }
            _ => {}
        }
    }

    /// Keyboard seeks go through the same bounds as the scrubber.
    fn seek_relative(&mut self, delta_secs: f64) {
        if !self.is_mounted() {
            return;
        }
        let transport = self.controller.transport();
        let target = (transport.slider_value + delta_secs).clamp(0.0, transport.duration.max(0.0));
        self.controller.seek_both(target);
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let Some(sources) = &self.sources else {
            return Subscription::none();
        };

        Subscription::batch(Side::ALL.map(|side| {
            video_playback(side, sources.path(side).to_path_buf(), self.session_id)
                .map(Message::Playback)
        }))
    }

    fn layer(&self, side: Side) -> Option<Layer> {
        let element = self.controller.element(side)?;
        let handle = element.frame()?.clone();
        let snapshot = element.snapshot();
        Some(Layer {
            handle,
            width: snapshot.video_width,
            height: snapshot.video_height,
        })
    }

    pub fn view<'a>(&'a self, env: ViewEnv<'a>) -> Element<'a, Message> {
        let compare = canvas(CompareCanvas {
            original: self.layer(Side::Original),
            compressed: self.layer(Side::Compressed),
        })
        .width(Length::Fill)
        .height(Length::Fill);

        let error = |side| {
            self.controller
                .element(side)
                .and_then(VideoElement::error)
        };
        let stats_overlay = overlay::view(overlay::ViewContext {
            i18n: env.i18n,
            show_stats: self.show_stats,
            original: self.controller.stats(Side::Original),
            compressed: self.controller.stats(Side::Compressed),
            original_error: error(Side::Original),
            compressed_error: error(Side::Compressed),
            compression: self
                .settings
                .show_compression_estimate
                .then(|| self.controller.compression_estimate()),
        })
        .map(Message::Overlay);

        let surface = Container::new(
            Stack::new()
                .width(Length::Fill)
                .height(Length::Fill)
                .push(compare)
                .push(stats_overlay),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .style(styles::overlay::video_backdrop);

        let transport_bar = transport::view(
            transport::ViewContext { i18n: env.i18n },
            self.controller.transport(),
        )
        .map(Message::Transport);

        Column::new()
            .width(Length::Fill)
            .height(Length::Fill)
            .push(surface)
            .push(transport_bar)
            .into()
    }
}

impl Drop for State {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::probe::VideoMetadata;
    use crate::video_player::PlaybackMessage;

    fn sources() -> Sources {
        Sources {
            original: PathBuf::from("original.mp4"),
            compressed: PathBuf::from("compressed.mp4"),
        }
    }

    fn metadata(width: u32, height: u32, duration_secs: f64) -> Message {
        Message::Playback(PlaybackEvent {
            side: Side::Original,
            message: PlaybackMessage::MetadataLoaded(VideoMetadata {
                width,
                height,
                duration_secs,
                fps: 30.0,
                codec_name: "h264".to_string(),
            }),
        })
    }

    fn key_press(key: keyboard::Key) -> Message {
        Message::RawEvent(event::Event::Keyboard(keyboard::Event::KeyPressed {
            key: key.clone(),
            modified_key: key,
            physical_key: keyboard::key::Physical::Unidentified(
                keyboard::key::NativeCode::Unidentified,
            ),
            location: keyboard::Location::Standard,
            modifiers: keyboard::Modifiers::empty(),
            text: None,
            repeat: false,
        }))
    }

    fn mounted() -> State {
        let mut state = State::new(Settings::default());
        state.mount(sources());
        state
    }

    #[test]
    fn mount_binds_both_sides() {
        let state = mounted();
        for side in Side::ALL {
            assert!(state.controller().is_mounted(side));
        }
        assert_eq!(state.sources(), Some(&sources()));
    }

    #[test]
    fn unmount_is_idempotent() {
        let mut state = mounted();
        state.unmount();
        state.unmount();
        assert!(!state.is_mounted());
        assert!(!state.controller().is_mounted(Side::Original));
    }

    #[test]
    fn stats_visibility_toggles_leave_transport_alone() {
        let mut state = mounted();
        state.update(metadata(1280, 720, 8.0));
        let before = *state.controller().transport();

        state.update(Message::Overlay(overlay::Message::HideStats));
        assert!(!state.show_stats());
        state.update(key_press(keyboard::Key::Character("s".into())));
        assert!(state.show_stats());

        assert_eq!(*state.controller().transport(), before);
    }

    #[test]
    fn metadata_sets_transport_duration() {
        let mut state = mounted();
        state.update(metadata(1280, 720, 8.0));

        assert_eq!(state.controller().transport().duration, 8.0);
        let stats = state.controller().stats(Side::Original).unwrap();
        assert_eq!(stats.resolution.as_deref(), Some("1280x720"));
    }

    #[test]
    fn arrow_keys_seek_within_range() {
        let mut state = mounted();
        state.update(metadata(1280, 720, 8.0));

        state.update(key_press(keyboard::Key::Named(keyboard::key::Named::ArrowRight)));
        assert_eq!(state.controller().transport().slider_value, 5.0);

        state.update(key_press(keyboard::Key::Named(keyboard::key::Named::ArrowRight)));
        assert_eq!(state.controller().transport().slider_value, 8.0);

        state.update(key_press(keyboard::Key::Named(keyboard::key::Named::ArrowLeft)));
        assert_eq!(state.controller().transport().slider_value, 3.0);
    }

    #[test]
    fn scrubber_seeks_both_sides() {
        let mut state = mounted();
        state.update(Message::Transport(transport::Message::Seek(2.5)));

        for side in Side::ALL {
            let snapshot = state.controller().element(side).unwrap().snapshot();
            assert_eq!(snapshot.current_time, 2.5);
        }
    }

    #[test]
    fn keys_are_ignored_when_unmounted() {
        let mut state = State::new(Settings::default());
        state.update(key_press(keyboard::Key::Named(keyboard::key::Named::ArrowRight)));
        assert_eq!(state.controller().transport().slider_value, 0.0);
    }
}
