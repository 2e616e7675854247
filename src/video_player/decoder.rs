// SPDX-License-Identifier: MPL-2.0
//! Async video frame decoder using FFmpeg.
//!
//! Decoding runs on a blocking Tokio thread and frames travel back over a
//! bounded channel, so a slow UI applies backpressure instead of piling up
//! RGBA buffers.

use crate::error::{Error, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Represents a decoded video frame ready for display.
#[derive(Debug, Clone)]
pub struct DecodedFrame {
    /// RGBA pixel data (width × height × 4 bytes).
    pub rgba_data: Arc<Vec<u8>>,

    pub width: u32,

    pub height: u32,

    /// Presentation timestamp in seconds.
    pub pts_secs: f64,
}

/// Commands sent to the decoder task.
#[derive(Debug, Clone, PartialEq)]
pub enum DecoderCommand {
    /// Start or resume decoding. A resume position makes the decoder seek
    /// there first (the stream may have been read ahead while paused).
    Play { resume_position_secs: Option<f64> },

    /// Stop sending frames, keep the position.
    Pause,

    /// Jump to a timestamp. While paused, one frame is decoded to show it.
    Seek { target_secs: f64 },

    /// Terminate the decoder task.
    Stop,
}

/// Events sent from the decoder to the UI.
#[derive(Debug, Clone)]
pub enum DecoderEvent {
    FrameReady(DecodedFrame),

    /// Decoder is refilling after play or seek.
    Buffering,

    /// No more packets in the stream.
    EndOfStream,

    Error(String),
}

/// Async video decoder that runs in a Tokio task.
pub struct AsyncDecoder {
    command_tx: mpsc::UnboundedSender<DecoderCommand>,

    /// Bounded to prevent memory accumulation during rapid seeks.
    event_rx: mpsc::Receiver<DecoderEvent>,
}

impl AsyncDecoder {
    /// Spawns the decoder thread for `video_path`.
    ///
    /// The first frame is decoded right away so a paused element still has
    /// something to show.
    pub fn new<P: AsRef<Path>>(video_path: P) -> Result<Self> {
        let path = video_path.as_ref().to_path_buf();

        if !path.exists() {
            return Err(Error::Io(format!("Video file not found: {:?}", path)));
        }

        // Commands: unbounded (UI must never block on send)
        // Events: two frames of slack
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel(2);

        // FFmpeg contexts are not Send, keep them on one blocking thread
        tokio::task::spawn_blocking(move || {
            if let Err(e) = Self::decoder_loop_blocking(&path, command_rx, &event_tx) {
                log::warn!("Decoder task for {} failed: {}", path.display(), e);
                let _ = event_tx.blocking_send(DecoderEvent::Error(e.to_string()));
            }
        });

        Ok(Self {
            command_tx,
            event_rx,
        })
    }

    pub fn send_command(&self, command: DecoderCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .map_err(|_| Error::Io("Decoder task is not running".into()))
    }

    /// Receives the next event from the decoder.
    ///
    /// Returns `None` once the decoder task has terminated.
    pub async fn recv_event(&mut self) -> Option<DecoderEvent> {
        self.event_rx.recv().await
    }

    fn decoder_loop_blocking(
        video_path: &Path,
        mut command_rx: mpsc::UnboundedReceiver<DecoderCommand>,
        event_tx: &mpsc::Sender<DecoderEvent>,
    ) -> Result<()> {
        crate::media::init_ffmpeg()?;

        let mut ictx = ffmpeg_next::format::input(video_path)
            .map_err(|e| Error::Io(format!("Failed to open video: {}", e)))?;

        let input = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or_else(|| Error::Io("No video stream found".to_string()))?;
        let video_stream_index = input.index();

        let context_decoder =
            ffmpeg_next::codec::context::Context::from_parameters(input.parameters())
                .map_err(|e| Error::Io(format!("Failed to create codec context: {}", e)))?;
        let mut decoder = context_decoder
            .decoder()
            .video()
            .map_err(|e| Error::Io(format!("Failed to create video decoder: {}", e)))?;

        let width = decoder.width();
        let height = decoder.height();

        let mut scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGBA,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )
        .map_err(|e| Error::Io(format!("Failed to create scaler: {}", e)))?;

        let time_base = input.time_base();
        let time_base_f64 = f64::from(time_base.numerator()) / f64::from(time_base.denominator());

        let mut is_playing = false;
        let mut playback_start_time: Option<Instant> = None;
        let mut first_pts: Option<f64> = None;
        let mut decode_single_frame = true;

        loop {
            match command_rx.try_recv() {
                Ok(DecoderCommand::Play {
                    resume_position_secs,
                }) => {
                    if let Some(position) = resume_position_secs {
                        // AV_TIME_BASE units, RangeTo lets FFmpeg land on the previous keyframe
                        let timestamp = (position * 1_000_000.0) as i64;
                        if let Err(e) = ictx.seek(timestamp, ..timestamp) {
                            let _ = event_tx.blocking_send(DecoderEvent::Error(format!(
                                "Resume seek failed: {}",
                                e
                            )));
                        } else {
                            decoder.flush();
                        }
                    }
                    is_playing = true;
                    playback_start_time = Some(Instant::now());
                    first_pts = None;
                    let _ = event_tx.blocking_send(DecoderEvent::Buffering);
                }
                Ok(DecoderCommand::Pause) => {
                    is_playing = false;
                    playback_start_time = None;
                    first_pts = None;
                }
                Ok(DecoderCommand::Seek { target_secs }) => {
                    let timestamp = (target_secs * 1_000_000.0) as i64;
                    if let Err(e) = ictx.seek(timestamp, ..timestamp) {
                        let _ = event_tx
                            .blocking_send(DecoderEvent::Error(format!("Seek failed: {}", e)));
                    } else {
                        decoder.flush();
                        playback_start_time = Some(Instant::now());
                        first_pts = None;
                        if !is_playing {
                            decode_single_frame = true;
                        }
                    }
                }
                Ok(DecoderCommand::Stop) | Err(mpsc::error::TryRecvError::Disconnected) => {
                    break;
                }
                Err(mpsc::error::TryRecvError::Empty) => {}
            }

            if !is_playing && !decode_single_frame {
                std::thread::sleep(Duration::from_millis(10));
                continue;
            }

            let mut frame_decoded = false;
            let mut receiver_gone = false;
            for (stream, packet) in ictx.packets() {
                if stream.index() != video_stream_index {
                    continue;
                }

                if let Err(e) = decoder.send_packet(&packet) {
                    let _ = event_tx
                        .blocking_send(DecoderEvent::Error(format!("Packet send failed: {}", e)));
                    continue;
                }

                let mut decoded_frame = ffmpeg_next::frame::Video::empty();
                if decoder.receive_frame(&mut decoded_frame).is_err() {
                    continue;
                }

                let mut rgb_frame = ffmpeg_next::frame::Video::empty();
                if let Err(e) = scaler.run(&decoded_frame, &mut rgb_frame) {
                    let _ = event_tx
                        .blocking_send(DecoderEvent::Error(format!("Scaling failed: {}", e)));
                    continue;
                }

                let rgba_data = extract_rgba_data(&rgb_frame);
                let pts_secs = decoded_frame
                    .timestamp()
                    .map_or(0.0, |pts| pts as f64 * time_base_f64);

                // Frame pacing relative to the first frame after play/seek
                if is_playing {
                    if let Some(start_time) = playback_start_time {
                        let first = *first_pts.get_or_insert(pts_secs);
                        let target_time =
                            start_time + Duration::from_secs_f64((pts_secs - first).max(0.0));
                        let now = Instant::now();
                        if target_time > now {
                            std::thread::sleep(target_time - now);
                        }
                    }
                }

                let decoded = DecodedFrame {
                    rgba_data: Arc::new(rgba_data),
                    width,
                    height,
                    pts_secs,
                };

                if event_tx
                    .blocking_send(DecoderEvent::FrameReady(decoded))
                    .is_err()
                {
                    receiver_gone = true;
                    break;
                }

                frame_decoded = true;
                decode_single_frame = false;
                break;
            }

            if receiver_gone {
                break;
            }

            if !frame_decoded {
                let _ = event_tx.blocking_send(DecoderEvent::EndOfStream);
                is_playing = false;
                playback_start_time = None;
                first_pts = None;
                decode_single_frame = false;
            }
        }

        log::debug!("Decoder for {} stopped", video_path.display());
        Ok(())
    }
}

/// Copies the RGBA plane row by row, dropping the stride padding.
fn extract_rgba_data(frame: &ffmpeg_next::frame::Video) -> Vec<u8> {
    let width = frame.width() as usize;
    let height = frame.height() as usize;
    let data = frame.data(0);
    let stride = frame.stride(0);

    let row_bytes = width * 4;
    let mut rgba_bytes = Vec::with_capacity(row_bytes * height);
    for y in 0..height {
        let row_start = y * stride;
        rgba_bytes.extend_from_slice(&data[row_start..row_start + row_bytes]);
    }

    rgba_bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn decoder_fails_for_nonexistent_file() {
        let result = AsyncDecoder::new("/nonexistent/video.mp4");
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn decoder_reports_error_for_garbage_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let video_path = temp_dir.path().join("broken.mp4");
        std::fs::write(&video_path, b"fake video data").unwrap();

        let mut decoder = AsyncDecoder::new(&video_path).unwrap();
        let event = tokio::time::timeout(Duration::from_secs(2), decoder.recv_event())
            .await
            .expect("decoder should answer");

        assert!(matches!(event, Some(DecoderEvent::Error(_))));
    }

    #[tokio::test]
    async fn decoder_sends_first_frame_for_sample() {
        let video_path = "tests/data/sample.mp4";
        if !std::path::Path::new(video_path).exists() {
            return;
        }

        let mut decoder = AsyncDecoder::new(video_path).unwrap();
        let event = tokio::time::timeout(Duration::from_secs(2), decoder.recv_event())
            .await
            .expect("timeout waiting for decoder event");

        assert!(matches!(event, Some(DecoderEvent::FrameReady(_))));
        decoder.send_command(DecoderCommand::Stop).unwrap();
    }
}
