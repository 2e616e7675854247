// SPDX-License-Identifier: MPL-2.0
//! Application root state.
//!
//! `App` owns the localization bundle and the compare widget, loads the
//! configuration at boot and runs the widget teardown before the window
//! closes.

mod message;
pub mod paths;
mod subscription;

pub use message::{Flags, Message};

use crate::config;
use crate::i18n::fluent::I18n;
use crate::ui::compare;
use crate::ui::theming::ThemeMode;
use iced::{window, Element, Subscription, Task, Theme};
use std::fmt;

/// Root Iced application state.
pub struct App {
    pub i18n: I18n,
    compare: compare::State,
    theme_mode: ThemeMode,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("theme_mode", &self.theme_mode)
            .field("mounted", &self.compare.is_mounted())
            .finish()
    }
}

pub const WINDOW_DEFAULT_HEIGHT: u32 = 720;
pub const WINDOW_DEFAULT_WIDTH: u32 = 1100;
pub const MIN_WINDOW_HEIGHT: u32 = 480;
pub const MIN_WINDOW_WIDTH: u32 = 640;

/// Builds the window settings. Close requests are handled by the app so the
/// decoders are released before the window goes away.
pub fn window_settings() -> window::Settings {
    window::Settings {
        size: iced::Size::new(WINDOW_DEFAULT_WIDTH as f32, WINDOW_DEFAULT_HEIGHT as f32),
        min_size: Some(iced::Size::new(
            MIN_WINDOW_WIDTH as f32,
            MIN_WINDOW_HEIGHT as f32,
        )),
        exit_on_close_request: false,
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    // iced 0.14 requires a `Fn` boot closure; flags are consumed on the first call.
    let boot_state = RefCell::new(Some(flags));
    let boot = move || match boot_state.borrow_mut().take() {
        Some(flags) => App::new(flags),
        None => {
            log::warn!("boot called more than once, starting without sources");
            App::new(Flags::default())
        }
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

impl Default for App {
    fn default() -> Self {
        Self {
            i18n: I18n::default(),
            compare: compare::State::new(compare::Settings::default()),
            theme_mode: ThemeMode::System,
        }
    }
}

impl App {
    fn new(flags: Flags) -> (Self, Task<Message>) {
        let (config, config_warning) = config::load();
        let i18n = I18n::new(flags.lang.clone(), &config);

        if let Some(key) = config_warning {
            log::warn!("{}", i18n.tr(&key));
        }

        let mut compare = compare::State::new(compare::Settings::from_config(&config));
        if let Some(sources) = flags.sources {
            compare.mount(sources);
        }

        let app = App {
            i18n,
            compare,
            theme_mode: config.general.theme_mode,
        };
        (app, Task::none())
    }

    fn title(&self) -> String {
        let app_name = self.i18n.tr("window-title");
        let Some(sources) = self.compare.sources() else {
            return app_name;
        };

        let file_name = |path: &std::path::Path| {
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string())
        };
        let original = file_name(&sources.original);
        let compressed = file_name(&sources.compressed);
        let pair = self.i18n.tr_with_args(
            "window-title-comparing",
            &[("original", original.as_str()), ("compressed", compressed.as_str())],
        );
        format!("{pair} - {app_name}")
    }

    fn theme(&self) -> Theme {
        self.theme_mode.iced_theme()
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            subscription::create_event_subscription(),
            self.compare.subscription().map(Message::Compare),
        ])
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Compare(message) => {
                self.compare.update(message);
                Task::none()
            }
            Message::WindowCloseRequested(id) => {
                self.compare.unmount();
                window::close(id)
            }
        }
    }

    fn view(&self) -> Element<'_, Message> {
        self.compare
            .view(compare::ViewEnv { i18n: &self.i18n })
            .map(Message::Compare)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::Side;
    use crate::ui::compare::Sources;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn with_temp_config_dir<F>(test: F)
    where
        F: FnOnce(&std::path::Path),
    {
        let _guard = paths::ENV_MUTEX.lock().expect("failed to lock mutex");
        let temp_dir = tempdir().expect("failed to create temp dir");
        let previous = std::env::var(paths::ENV_CONFIG_DIR).ok();
        std::env::set_var(paths::ENV_CONFIG_DIR, temp_dir.path());

        test(temp_dir.path());

        if let Some(value) = previous {
            std::env::set_var(paths::ENV_CONFIG_DIR, value);
        } else {
            std::env::remove_var(paths::ENV_CONFIG_DIR);
        }
    }

    fn sources() -> Sources {
        Sources {
            original: PathBuf::from("/videos/original.mp4"),
            compressed: PathBuf::from("/videos/compressed.mp4"),
        }
    }

    #[test]
    fn new_mounts_sources_from_flags() {
        with_temp_config_dir(|_| {
            let (app, _task) = App::new(Flags {
                lang: Some("en-US".to_string()),
                sources: Some(sources()),
                ..Flags::default()
            });
            assert!(app.compare.is_mounted());
            assert!(app.compare.controller().is_mounted(Side::Compressed));
        });
    }

    #[test]
    fn new_reads_theme_from_config() {
        with_temp_config_dir(|dir| {
            std::fs::write(dir.join("settings.toml"), "[general]\ntheme_mode = \"light\"\n")
                .expect("failed to write config");
            let (app, _task) = App::new(Flags::default());
            assert_eq!(app.theme(), Theme::Light);
        });
    }

    #[test]
    fn title_shows_app_name_without_sources() {
        let app = App::default();
        assert_eq!(app.title(), "VidCompare");
    }

    #[test]
    fn title_names_both_files_when_mounted() {
        with_temp_config_dir(|_| {
            let (app, _task) = App::new(Flags {
                lang: Some("en-US".to_string()),
                sources: Some(sources()),
                ..Flags::default()
            });
            assert_eq!(
                app.title(),
                "original.mp4 vs compressed.mp4 - VidCompare"
            );
        });
    }

    #[test]
    fn close_request_unmounts_before_closing() {
        let mut app = App::default();
        app.compare.mount(sources());

        let _ = app.update(Message::WindowCloseRequested(window::Id::unique()));

        assert!(!app.compare.is_mounted());
        assert!(!app.compare.controller().is_mounted(Side::Original));
    }
}
