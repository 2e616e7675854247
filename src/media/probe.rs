// SPDX-License-Identifier: MPL-2.0
//! FFmpeg initialisation and container metadata probing.

use crate::error::{Error, Result, VideoError};
use std::path::Path;
use std::sync::Once;

/// Static flag to ensure FFmpeg is initialized only once.
static FFMPEG_INIT: Once = Once::new();

/// Initialize FFmpeg with appropriate log level.
///
/// Safe to call multiple times. Sets the FFmpeg log level to ERROR to
/// suppress warning messages like "Detected creation time before 1970".
pub fn init_ffmpeg() -> Result<()> {
    let mut init_result: Result<()> = Ok(());

    FFMPEG_INIT.call_once(|| {
        if let Err(e) = ffmpeg_next::init() {
            init_result = Err(Error::Io(format!("FFmpeg initialization failed: {e}")));
            return;
        }

        // SAFETY: av_log_set_level is thread-safe and only affects logging
        unsafe {
            ffmpeg_next::ffi::av_log_set_level(ffmpeg_next::ffi::AV_LOG_ERROR);
        }
    });

    init_result
}

/// Video metadata extracted from a video file
#[derive(Debug, Clone, PartialEq)]
pub struct VideoMetadata {
    /// Video width in pixels
    pub width: u32,
    /// Video height in pixels
    pub height: u32,
    /// Duration in seconds
    pub duration_secs: f64,
    /// Frames per second
    pub fps: f64,
    /// Codec name as reported by FFmpeg (e.g. "h264").
    pub codec_name: String,
}

/// Extract video metadata (dimensions, duration, FPS, codec).
///
/// Only reads container metadata, no frame is decoded.
pub fn extract_video_metadata<P: AsRef<Path>>(path: P) -> Result<VideoMetadata> {
    init_ffmpeg()?;

    let ictx = ffmpeg_next::format::input(&path)
        .map_err(|e| VideoError::from_message(&format!("Failed to open video file: {e}")))?;

    let video_stream = ictx
        .streams()
        .best(ffmpeg_next::media::Type::Video)
        .ok_or(VideoError::NoVideoStream)?;

    let context_decoder =
        ffmpeg_next::codec::context::Context::from_parameters(video_stream.parameters())
            .map_err(|e| {
                VideoError::from_message(&format!("Failed to create codec context: {e}"))
            })?;
    let decoder = context_decoder
        .decoder()
        .video()
        .map_err(|e| VideoError::from_message(&format!("Failed to create video decoder: {e}")))?;

    let width = decoder.width();
    let height = decoder.height();

    if width == 0 || height == 0 {
        return Err(VideoError::DecodingFailed(format!(
            "Invalid video dimensions: {width}x{height} (possibly unsupported format)"
        ))
        .into());
    }

    let duration_secs = if video_stream.duration() > 0 {
        let time_base = video_stream.time_base();
        video_stream.duration() as f64 * f64::from(time_base.numerator())
            / f64::from(time_base.denominator())
    } else if ictx.duration() > 0 {
        // Fallback to container duration
        ictx.duration() as f64 / f64::from(ffmpeg_next::ffi::AV_TIME_BASE)
    } else {
        0.0
    };

    let fps = {
        let frame_rate = video_stream.avg_frame_rate();
        if frame_rate.denominator() == 0 {
            0.0
        } else {
            f64::from(frame_rate.numerator()) / f64::from(frame_rate.denominator())
        }
    };

    let codec_name = video_stream.parameters().id().name().to_string();

    Ok(VideoMetadata {
        width,
        height,
        duration_secs,
        fps,
        codec_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_ffmpeg_is_idempotent() {
        assert!(init_ffmpeg().is_ok());
        assert!(init_ffmpeg().is_ok());
    }

    #[test]
    fn probe_missing_file_is_an_error() {
        let result = extract_video_metadata("/nonexistent/clip.mp4");
        assert!(result.is_err());
    }

    #[test]
    fn probe_sample_video_when_available() {
        let path = "tests/data/sample.mp4";
        if !std::path::Path::new(path).exists() {
            return;
        }
        let metadata = extract_video_metadata(path).expect("sample should probe");
        assert!(metadata.width > 0);
        assert!(metadata.height > 0);
        assert!(metadata.duration_secs > 0.0);
    }
}
