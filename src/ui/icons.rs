// SPDX-License-Identifier: MPL-2.0
//! Icons used by the comparison view.
//!
//! Icons are small SVG documents embedded in the binary. Handles are cached
//! with `OnceLock` so each document is parsed once. Colors come from the
//! caller's svg style (`currentColor`), which keeps one icon set usable on
//! both light and dark backgrounds.

use iced::widget::svg::{Handle, Svg};
use std::sync::OnceLock;

/// Defines an icon function with a cached handle.
macro_rules! define_icon {
    ($name:ident, $source:literal, $doc:literal) => {
        #[doc = $doc]
        pub fn $name() -> Svg<'static> {
            static HANDLE: OnceLock<Handle> = OnceLock::new();
            let handle = HANDLE.get_or_init(|| Handle::from_memory($source.as_bytes()));
            Svg::new(handle.clone())
        }
    };
}

define_icon!(
    play,
    r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path fill="currentColor" d="M7 4.5v15a1 1 0 0 0 1.5.86l12.5-7.5a1 1 0 0 0 0-1.72L8.5 3.64A1 1 0 0 0 7 4.5z"/></svg>"#,
    "Play icon: triangle pointing right."
);

define_icon!(
    pause,
    r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><rect fill="currentColor" x="5" y="4" width="5" height="16" rx="1"/><rect fill="currentColor" x="14" y="4" width="5" height="16" rx="1"/></svg>"#,
    "Pause icon: two vertical bars."
);

define_icon!(
    close,
    r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path stroke="currentColor" stroke-width="2.5" stroke-linecap="round" d="M6 6l12 12M18 6L6 18"/></svg>"#,
    "Close icon: diagonal cross."
);

define_icon!(
    chart,
    r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path fill="currentColor" d="M4 20h16v-2H4zM6 16h3V9H6zm5 0h3V4h-3zm5 0h3v-5h-3z"/></svg>"#,
    "Chart icon: three bars of different height."
);
