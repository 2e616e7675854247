// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Config(String),
    Video(VideoError),
}

/// Why one side of the comparison cannot play.
///
/// Each variant maps to a localized badge shown over that side.
#[derive(Debug, Clone, PartialEq)]
pub enum VideoError {
    /// FFmpeg has no decoder for the stream's codec (codec name, uppercase).
    UnsupportedCodec(String),
    CorruptedFile,
    /// The container opened but holds no video stream.
    NoVideoStream,
    /// Failure while decoding or scaling frames.
    DecodingFailed(String),
    /// The file could not be opened or read.
    Io(String),
    Other(String),
}

/// Codec names recognised in FFmpeg messages.
const KNOWN_CODECS: [&str; 8] = ["h264", "hevc", "h265", "vp8", "vp9", "av1", "mpeg4", "mpeg2"];

#[derive(Clone, Copy)]
enum Category {
    Io,
    NoVideoStream,
    Corrupted,
    Decoding,
}

/// Checked in order, first match wins.
const CLASSIFIERS: [(Category, &[&str]); 4] = [
    (
        Category::Io,
        &["no such file", "not found", "permission denied", "i/o error"],
    ),
    (
        Category::NoVideoStream,
        &["no video stream", "invalid data found"],
    ),
    (Category::Corrupted, &["corrupt", "invalid", "malformed"]),
    (Category::Decoding, &["packet", "scaling", "seek", "decode"]),
];

impl VideoError {
    pub fn i18n_key(&self) -> &'static str {
        match self {
            VideoError::UnsupportedCodec(_) => "error-video-unsupported-codec",
            VideoError::CorruptedFile => "error-video-corrupted",
            VideoError::NoVideoStream => "error-video-no-video-stream",
            VideoError::DecodingFailed(_) => "error-video-decoding-failed",
            VideoError::Io(_) => "error-video-io",
            VideoError::Other(_) => "error-video-general",
        }
    }

    /// Sorts a raw FFmpeg or decoder message into a category.
    pub fn from_message(msg: &str) -> Self {
        let lower = msg.to_lowercase();

        // Codec messages often say "not found" too, so they go first.
        if lower.contains("codec") || lower.contains("decoder") {
            if let Some(codec) = KNOWN_CODECS.iter().find(|codec| lower.contains(*codec)) {
                return VideoError::UnsupportedCodec(codec.to_uppercase());
            }
            if lower.contains("not found") || lower.contains("unsupported") {
                return VideoError::DecodingFailed(msg.to_string());
            }
        }

        let category = CLASSIFIERS
            .iter()
            .find(|(_, needles)| needles.iter().any(|needle| lower.contains(needle)))
            .map(|(category, _)| *category);

        match category {
            Some(Category::Io) => VideoError::Io(msg.to_string()),
            Some(Category::NoVideoStream) => VideoError::NoVideoStream,
            Some(Category::Corrupted) => VideoError::CorruptedFile,
            Some(Category::Decoding) => VideoError::DecodingFailed(msg.to_string()),
            None => VideoError::Other(msg.to_string()),
        }
    }
}

impl fmt::Display for VideoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoError::UnsupportedCodec(codec) => write!(f, "unsupported codec {codec}"),
            VideoError::CorruptedFile => f.write_str("corrupted file"),
            VideoError::NoVideoStream => f.write_str("no video stream"),
            VideoError::DecodingFailed(msg) => write!(f, "decoding failed: {msg}"),
            VideoError::Io(msg) => write!(f, "cannot read video: {msg}"),
            VideoError::Other(msg) => f.write_str(msg),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::Config(e) => write!(f, "config error: {e}"),
            Error::Video(e) => write!(f, "video error: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<VideoError> for Error {
    fn from(err: VideoError) -> Self {
        Error::Video(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_convert_and_display() {
        let err: Error = std::io::Error::other("disk gone").into();
        assert!(matches!(&err, Error::Io(msg) if msg.contains("disk gone")));
        assert_eq!(err.to_string(), "I/O error: disk gone");
    }

    #[test]
    fn video_errors_nest_in_error() {
        let err: Error = VideoError::NoVideoStream.into();
        assert_eq!(err.to_string(), "video error: no video stream");
    }

    #[test]
    fn classifies_ffmpeg_messages() {
        let cases = [
            (
                "Failed to open video file: No such file or directory",
                "error-video-io",
            ),
            ("Decoder h264 not found", "error-video-unsupported-codec"),
            ("Failed to create codec context: not found", "error-video-decoding-failed"),
            ("Invalid data found when processing input", "error-video-no-video-stream"),
            ("moov atom malformed", "error-video-corrupted"),
            ("Packet send failed", "error-video-decoding-failed"),
            ("something else entirely", "error-video-general"),
        ];
        for (message, key) in cases {
            assert_eq!(VideoError::from_message(message).i18n_key(), key, "{message}");
        }
    }

    #[test]
    fn codec_name_is_uppercased() {
        assert_eq!(
            VideoError::from_message("codec vp9 unsupported"),
            VideoError::UnsupportedCodec("VP9".to_string())
        );
    }
}
