// SPDX-License-Identifier: MPL-2.0
//! Media element port and FFmpeg probing.

pub mod element;
pub mod headless;
pub mod probe;

pub use element::{
    ListenerId, ListenerRegistry, MediaElement, MediaEvent, MediaSnapshot, Side,
};
pub use headless::{HeadlessElement, HeadlessInput, ListenerProbe};
pub use probe::{extract_video_metadata, init_ffmpeg, VideoMetadata};
