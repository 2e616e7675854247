// SPDX-License-Identifier: MPL-2.0
//! Video playback engine.
//!
//! FFmpeg decodes on a blocking Tokio thread, an Iced subscription relays
//! frames, and [`VideoElement`] exposes the result as a
//! [`MediaElement`](crate::media::MediaElement).

mod decoder;
mod state;
pub mod subscription;

pub use decoder::{AsyncDecoder, DecodedFrame, DecoderCommand, DecoderEvent};
pub use state::{PlaybackState, VideoElement};
pub use subscription::{
    video_playback, DecoderCommandSender, PlaybackEvent, PlaybackMessage, VideoPlaybackId,
};
