// SPDX-License-Identifier: MPL-2.0
//! Playback state machine and the FFmpeg-backed media element.
//!
//! [`VideoElement`] is fed [`PlaybackMessage`]s by its subscription and turns
//! transport calls into [`DecoderCommand`]s. Commands issued before the
//! decoder has started are queued and flushed on `Started`.

use super::subscription::{DecoderCommandSender, PlaybackMessage};
use super::DecoderCommand;
use crate::error::VideoError;
use crate::media::{
    ListenerId, ListenerRegistry, MediaElement, MediaEvent, MediaSnapshot, VideoMetadata,
};
use iced::widget::image;
use std::sync::Arc;

/// Distance from the end under which `play` restarts from zero.
const END_RESTART_TOLERANCE_SECS: f64 = 0.1;

/// A frame within this distance of the seek target ends the seek. Frames
/// further away were queued before the seek (or lead up to the target from
/// a keyframe) and leave the position at the target.
const SEEK_LAND_TOLERANCE_SECS: f64 = 0.5;

/// Playback state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackState {
    /// Nothing played yet.
    Stopped,

    Playing { position_secs: f64 },

    Paused { position_secs: f64 },

    /// Waiting for the decoder to land on `target_secs`.
    Seeking {
        target_secs: f64,
        resume_playing: bool,
    },

    /// Playing, but the decoder is refilling.
    Buffering { position_secs: f64 },

    Error { error: VideoError },
}

impl PlaybackState {
    /// Returns the current playback position in seconds, if available.
    pub fn position(&self) -> Option<f64> {
        match self {
            Self::Stopped => Some(0.0),
            Self::Playing { position_secs }
            | Self::Paused { position_secs }
            | Self::Buffering { position_secs } => Some(*position_secs),
            Self::Seeking { target_secs, .. } => Some(*target_secs),
            Self::Error { .. } => None,
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Returns true if the video is playing or will resume playing after a
    /// seek or buffer.
    pub fn is_playing_or_will_resume(&self) -> bool {
        match self {
            Self::Playing { .. } | Self::Buffering { .. } => true,
            Self::Seeking { resume_playing, .. } => *resume_playing,
            _ => false,
        }
    }
}

/// Media element backed by an FFmpeg decoder subscription.
#[derive(Debug)]
pub struct VideoElement {
    state: PlaybackState,
    metadata: Option<VideoMetadata>,
    frame: Option<image::Handle>,
    command_sender: Option<DecoderCommandSender>,
    /// Commands issued before `Started`.
    pending: Vec<DecoderCommand>,
    /// Last known position, kept across the error state.
    last_position: f64,
    autoplay: bool,
    listeners: ListenerRegistry,
}

impl VideoElement {
    /// Creates an element waiting for its subscription. With `autoplay`,
    /// playback starts as soon as metadata arrives. The element is always
    /// muted, no audio is decoded.
    pub fn new(autoplay: bool) -> Self {
        Self {
            state: PlaybackState::Stopped,
            metadata: None,
            frame: None,
            command_sender: None,
            pending: Vec::new(),
            last_position: 0.0,
            autoplay,
            listeners: ListenerRegistry::new(),
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn metadata(&self) -> Option<&VideoMetadata> {
        self.metadata.as_ref()
    }

    /// Most recently decoded frame.
    pub fn frame(&self) -> Option<&image::Handle> {
        self.frame.as_ref()
    }

    pub fn error(&self) -> Option<&VideoError> {
        match &self.state {
            PlaybackState::Error { error } => Some(error),
            _ => None,
        }
    }

    fn duration(&self) -> f64 {
        self.metadata.as_ref().map_or(0.0, |m| m.duration_secs)
    }

    fn send(&mut self, command: DecoderCommand) {
        match &self.command_sender {
            Some(sender) => {
                if let Err(e) = sender.send(command) {
                    log::debug!("Dropping decoder command: {e}");
                }
            }
            None => self.pending.push(command),
        }
    }

    fn set_command_sender(&mut self, sender: DecoderCommandSender) {
        for command in self.pending.drain(..) {
            let _ = sender.send(command);
        }
        self.command_sender = Some(sender);
    }

    fn set_position(&mut self, position_secs: f64) {
        self.last_position = position_secs;
        self.state = match &self.state {
            PlaybackState::Playing { .. } | PlaybackState::Buffering { .. } => {
                PlaybackState::Playing { position_secs }
            }
            PlaybackState::Seeking { resume_playing, .. } => {
                if *resume_playing {
                    PlaybackState::Playing { position_secs }
                } else {
                    PlaybackState::Paused { position_secs }
                }
            }
            PlaybackState::Stopped | PlaybackState::Paused { .. } => {
                PlaybackState::Paused { position_secs }
            }
            PlaybackState::Error { .. } => return,
        };
    }

    fn seek_and_play(&mut self, target_secs: f64) {
        self.state = PlaybackState::Seeking {
            target_secs,
            resume_playing: true,
        };
        self.last_position = target_secs;
        self.send(DecoderCommand::Seek { target_secs });
        self.send(DecoderCommand::Play {
            resume_position_secs: None,
        });
    }

    fn pause_at(&mut self, position_secs: f64) {
        self.state = PlaybackState::Paused { position_secs };
        self.last_position = position_secs;
        self.send(DecoderCommand::Pause);
    }
}

impl MediaElement for VideoElement {
    type Input = PlaybackMessage;

    fn snapshot(&self) -> MediaSnapshot {
        let (video_width, video_height) = self
            .metadata
            .as_ref()
            .map_or((0, 0), |m| (m.width, m.height));
        MediaSnapshot {
            current_time: self.state.position().unwrap_or(self.last_position),
            duration: self.duration(),
            video_width,
            video_height,
            paused: !self.state.is_playing_or_will_resume(),
            metadata_loaded: self.metadata.is_some(),
        }
    }

    fn play(&mut self) {
        match self.state.clone() {
            PlaybackState::Stopped => {
                self.state = PlaybackState::Playing { position_secs: 0.0 };
                self.send(DecoderCommand::Play {
                    resume_position_secs: None,
                });
            }
            PlaybackState::Paused { position_secs } => {
                let duration = self.duration();
                if duration > 0.0 && (position_secs - duration).abs() < END_RESTART_TOLERANCE_SECS
                {
                    self.seek_and_play(0.0);
                    return;
                }
                self.state = PlaybackState::Playing { position_secs };
                let resume = (position_secs > 0.0).then_some(position_secs);
                self.send(DecoderCommand::Play {
                    resume_position_secs: resume,
                });
            }
            PlaybackState::Seeking {
                target_secs,
                resume_playing: false,
            } => {
                self.state = PlaybackState::Seeking {
                    target_secs,
                    resume_playing: true,
                };
                self.send(DecoderCommand::Play {
                    resume_position_secs: None,
                });
            }
            PlaybackState::Playing { .. }
            | PlaybackState::Buffering { .. }
            | PlaybackState::Seeking { .. }
            | PlaybackState::Error { .. } => {}
        }
    }

    fn pause(&mut self) {
        match self.state.clone() {
            PlaybackState::Playing { position_secs }
            | PlaybackState::Buffering { position_secs } => {
                self.pause_at(position_secs);
            }
            PlaybackState::Seeking {
                target_secs,
                resume_playing: true,
            } => {
                self.state = PlaybackState::Seeking {
                    target_secs,
                    resume_playing: false,
                };
                self.send(DecoderCommand::Pause);
            }
            _ => {}
        }
    }

    fn set_current_time(&mut self, secs: f64) {
        if self.state.is_error() {
            return;
        }
        let mut target = secs.max(0.0);
        if self.metadata.is_some() {
            target = target.min(self.duration());
        }

        let should_resume = self.state.is_playing_or_will_resume();
        self.state = PlaybackState::Seeking {
            target_secs: target,
            resume_playing: should_resume,
        };
        self.last_position = target;

        self.send(DecoderCommand::Seek {
            target_secs: target,
        });
        if should_resume {
            self.send(DecoderCommand::Play {
                resume_position_secs: None,
            });
        }
        self.listeners.emit(MediaEvent::TimeAdvanced);
    }

    fn handle_input(&mut self, input: PlaybackMessage) {
        match input {
            PlaybackMessage::MetadataLoaded(metadata) => {
                self.metadata = Some(metadata);
                if self.autoplay {
                    self.play();
                }
                self.listeners.emit(MediaEvent::MetadataReady);
            }
            PlaybackMessage::Started(sender) => {
                self.set_command_sender(sender);
            }
            PlaybackMessage::FrameReady {
                rgba_data,
                width,
                height,
                pts_secs,
            } => {
                let data = Arc::try_unwrap(rgba_data).unwrap_or_else(|arc| (*arc).clone());
                self.frame = Some(image::Handle::from_rgba(width, height, data));
                if let PlaybackState::Seeking { target_secs, .. } = self.state {
                    if (pts_secs - target_secs).abs() > SEEK_LAND_TOLERANCE_SECS {
                        log::trace!("Frame at {pts_secs:.2}s does not land seek to {target_secs:.2}s");
                        return;
                    }
                }
                self.set_position(pts_secs);
                self.listeners.emit(MediaEvent::TimeAdvanced);
            }
            PlaybackMessage::Buffering => {
                if let PlaybackState::Playing { position_secs } = self.state {
                    self.state = PlaybackState::Buffering { position_secs };
                }
            }
            PlaybackMessage::EndOfStream => {
                let end = self.duration().max(self.last_position);
                self.pause_at(end);
                self.listeners.emit(MediaEvent::TimeAdvanced);
            }
            PlaybackMessage::Error(error) => {
                log::warn!("Playback failed: {error}");
                self.state = PlaybackState::Error { error };
            }
        }
    }

    fn add_listener(&mut self, event: MediaEvent) -> ListenerId {
        self.listeners.add(event)
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    fn listener_count(&self) -> usize {
        self.listeners.count()
    }

    fn take_events(&mut self) -> Vec<MediaEvent> {
        self.listeners.drain()
    }

    fn failed(&self) -> bool {
        self.state.is_error()
    }
}
