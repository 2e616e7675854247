// SPDX-License-Identifier: MPL-2.0
//! Iced subscription for video playback events.
//!
//! One subscription drives one side of the comparison. It probes the file,
//! starts an [`AsyncDecoder`], hands the UI a [`DecoderCommandSender`] and
//! then relays decoder events until the decoder closes or the subscription
//! is dropped. Dropping the subscription drops the decoder channels, which
//! stops the decoder thread.

use super::{AsyncDecoder, DecoderCommand, DecoderEvent};
use crate::error::VideoError;
use crate::media::{extract_video_metadata, Side, VideoMetadata};
use iced::futures::SinkExt;
use iced::stream;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Subscription identity. A new session id recreates the subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VideoPlaybackId {
    side: Side,
    session: u64,
}

/// Cloneable handle the UI uses to drive the decoder.
#[derive(Clone)]
pub struct DecoderCommandSender {
    tx: mpsc::UnboundedSender<DecoderCommand>,
}

impl DecoderCommandSender {
    pub fn send(&self, command: DecoderCommand) -> Result<(), String> {
        self.tx
            .send(command)
            .map_err(|_| "Video decoder not running".to_string())
    }

    /// Builds a sender backed by a bare channel, for driving an element
    /// without a decoder.
    pub fn detached() -> (Self, mpsc::UnboundedReceiver<DecoderCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl std::fmt::Debug for DecoderCommandSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoderCommandSender")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

/// Messages emitted by the video playback subscription.
#[derive(Debug, Clone)]
pub enum PlaybackMessage {
    /// Container metadata is known. Always precedes `Started`.
    MetadataLoaded(VideoMetadata),

    /// Decoder is running and accepts commands.
    Started(DecoderCommandSender),

    FrameReady {
        rgba_data: Arc<Vec<u8>>,
        width: u32,
        height: u32,
        pts_secs: f64,
    },

    Buffering,

    EndOfStream,

    Error(VideoError),
}

/// A [`PlaybackMessage`] tagged with the side it belongs to.
#[derive(Debug, Clone)]
pub struct PlaybackEvent {
    pub side: Side,
    pub message: PlaybackMessage,
}

enum State {
    Idle,
    Decoding {
        decoder: AsyncDecoder,
        external_cmd_rx: mpsc::UnboundedReceiver<DecoderCommand>,
    },
}

/// Creates the playback subscription for one side.
pub fn video_playback(
    side: Side,
    video_path: PathBuf,
    session_id: u64,
) -> iced::Subscription<PlaybackEvent> {
    iced::Subscription::run_with_id(
        VideoPlaybackId {
            side,
            session: session_id,
        },
        stream::channel(100, move |mut output| async move {
            let mut state = State::Idle;

            loop {
                match &mut state {
                    State::Idle => {
                        let probe_path = video_path.clone();
                        let probed = tokio::task::spawn_blocking(move || {
                            extract_video_metadata(probe_path)
                        })
                        .await;

                        let metadata = match probed {
                            Ok(Ok(metadata)) => metadata,
                            Ok(Err(e)) => {
                                let error = match e {
                                    crate::error::Error::Video(video) => video,
                                    other => VideoError::from_message(&other.to_string()),
                                };
                                let _ = output
                                    .send(PlaybackEvent {
                                        side,
                                        message: PlaybackMessage::Error(error),
                                    })
                                    .await;
                                break;
                            }
                            Err(join) => {
                                let _ = output
                                    .send(PlaybackEvent {
                                        side,
                                        message: PlaybackMessage::Error(VideoError::Other(
                                            join.to_string(),
                                        )),
                                    })
                                    .await;
                                break;
                            }
                        };

                        log::info!(
                            "{side}: {} {}x{} {:.2}s @ {:.2} fps",
                            metadata.codec_name,
                            metadata.width,
                            metadata.height,
                            metadata.duration_secs,
                            metadata.fps
                        );

                        let decoder = match AsyncDecoder::new(&video_path) {
                            Ok(decoder) => decoder,
                            Err(e) => {
                                let _ = output
                                    .send(PlaybackEvent {
                                        side,
                                        message: PlaybackMessage::Error(
                                            VideoError::from_message(&e.to_string()),
                                        ),
                                    })
                                    .await;
                                break;
                            }
                        };

                        let (external_cmd_tx, external_cmd_rx) = mpsc::unbounded_channel();

                        let _ = output
                            .send(PlaybackEvent {
                                side,
                                message: PlaybackMessage::MetadataLoaded(metadata),
                            })
                            .await;
                        let _ = output
                            .send(PlaybackEvent {
                                side,
                                message: PlaybackMessage::Started(DecoderCommandSender {
                                    tx: external_cmd_tx,
                                }),
                            })
                            .await;

                        state = State::Decoding {
                            decoder,
                            external_cmd_rx,
                        };
                    }

                    State::Decoding {
                        decoder,
                        external_cmd_rx,
                    } => {
                        tokio::select! {
                            cmd = external_cmd_rx.recv() => {
                                let Some(command) = cmd else {
                                    // UI dropped every sender
                                    break;
                                };
                                if let Err(e) = decoder.send_command(command) {
                                    let _ = output
                                        .send(PlaybackEvent {
                                            side,
                                            message: PlaybackMessage::Error(
                                                VideoError::from_message(&e.to_string()),
                                            ),
                                        })
                                        .await;
                                }
                            }

                            event = decoder.recv_event() => {
                                let Some(event) = event else {
                                    break;
                                };
                                let message = match event {
                                    DecoderEvent::FrameReady(frame) => PlaybackMessage::FrameReady {
                                        rgba_data: frame.rgba_data,
                                        width: frame.width,
                                        height: frame.height,
                                        pts_secs: frame.pts_secs,
                                    },
                                    DecoderEvent::Buffering => PlaybackMessage::Buffering,
                                    DecoderEvent::EndOfStream => PlaybackMessage::EndOfStream,
                                    DecoderEvent::Error(msg) => {
                                        PlaybackMessage::Error(VideoError::from_message(&msg))
                                    }
                                };
                                let _ = output.send(PlaybackEvent { side, message }).await;
                            }
                        }
                    }
                }
            }

            log::debug!("{side} playback subscription idle");
            std::future::pending::<()>().await;
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_id_distinguishes_sides_and_sessions() {
        let a = VideoPlaybackId {
            side: Side::Original,
            session: 1,
        };
        let b = VideoPlaybackId {
            side: Side::Compressed,
            session: 1,
        };
        let c = VideoPlaybackId {
            side: Side::Original,
            session: 2,
        };

        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, a);
    }

    #[test]
    fn detached_sender_delivers_commands() {
        let (sender, mut rx) = DecoderCommandSender::detached();
        sender.send(DecoderCommand::Pause).unwrap();
        assert_eq!(rx.try_recv().unwrap(), DecoderCommand::Pause);
    }

    #[test]
    fn send_fails_once_receiver_is_gone() {
        let (sender, rx) = DecoderCommandSender::detached();
        drop(rx);
        assert!(sender.send(DecoderCommand::Pause).is_err());
    }

    #[test]
    fn playback_event_debug_names_side() {
        let event = PlaybackEvent {
            side: Side::Compressed,
            message: PlaybackMessage::Buffering,
        };
        let debug_str = format!("{:?}", event);
        assert!(debug_str.contains("Compressed"));
    }
}
