// SPDX-License-Identifier: MPL-2.0
//! `vid_compare` plays an original video and its compressed version in
//! lockstep behind a draggable wipe, with a stats overlay and a shared
//! scrubber.
//!
//! The pairing logic ([`ui::compare::PairController`]) is generic over
//! [`media::MediaElement`], so it runs against the FFmpeg-backed
//! [`video_player::VideoElement`] in the application and against
//! [`media::HeadlessElement`] in tests.

pub mod app;
pub mod config;
pub mod error;
pub mod i18n;
pub mod media;
pub mod ui;
pub mod video_player;

#[cfg(test)]
mod test_utils;
