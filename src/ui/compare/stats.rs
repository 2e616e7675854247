// SPDX-License-Identifier: MPL-2.0
//! Per-side statistics derived from a media snapshot.
//!
//! Everything here is a pure function of a [`MediaSnapshot`] and the codec
//! label, so both sides go through the same [`compute_stats`].

use crate::media::MediaSnapshot;

/// Bits per pixel assumed by the uncompressed-bitmap size estimate.
const BITS_PER_PIXEL: f64 = 24.0;

/// Playback state shown in the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackLabel {
    Playing,
    Paused,
}

impl PlaybackLabel {
    pub fn i18n_key(self) -> &'static str {
        match self {
            PlaybackLabel::Playing => "compare-state-playing",
            PlaybackLabel::Paused => "compare-state-paused",
        }
    }
}

/// Human-readable statistics for one side.
///
/// Fields that depend on metadata are `None` until it has loaded; the
/// overlay renders them as placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayStats {
    /// `"WxH"`.
    pub resolution: Option<String>,
    /// `"M:SS"`.
    pub duration: Option<String>,
    /// `"M:SS"`.
    pub current_time: String,
    pub codec: String,
    /// Uncompressed size estimate in megabytes.
    pub estimated_size_mb: Option<f64>,
    pub playback: PlaybackLabel,
}

impl DisplayStats {
    /// `"X.XX MB"`, if the size is known.
    pub fn estimated_size(&self) -> Option<String> {
        self.estimated_size_mb.map(format_size_mb)
    }
}

/// Derives the display statistics of one side.
pub fn compute_stats(snapshot: &MediaSnapshot, codec_label: &str) -> DisplayStats {
    let loaded = snapshot.metadata_loaded;
    DisplayStats {
        resolution: loaded
            .then(|| format!("{}x{}", snapshot.video_width, snapshot.video_height)),
        duration: loaded.then(|| format_time(snapshot.duration)),
        current_time: format_time(snapshot.current_time),
        codec: codec_label.to_string(),
        estimated_size_mb: loaded.then(|| {
            estimated_size_mb(snapshot.video_width, snapshot.video_height, snapshot.duration)
        }),
        playback: if snapshot.paused {
            PlaybackLabel::Paused
        } else {
            PlaybackLabel::Playing
        },
    }
}

/// Formats seconds as `M:SS`. Minutes are not wrapped into hours.
///
/// Negative or non-finite input renders as `0:00`.
pub fn format_time(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return "0:00".to_string();
    }
    let minutes = (secs / 60.0).floor() as u64;
    let seconds = (secs % 60.0).floor() as u64;
    format!("{minutes}:{seconds:02}")
}

/// Size of the stream as raw 24-bit frames, in megabytes.
pub fn estimated_size_mb(width: u32, height: u32, duration_secs: f64) -> f64 {
    f64::from(width) * f64::from(height) * BITS_PER_PIXEL * duration_secs / (8.0 * 1e6)
}

pub fn format_size_mb(mb: f64) -> String {
    format!("{mb:.2} MB")
}

/// Percentage saved by the compressed side, `None` while either size is
/// unknown or zero.
pub fn compression_ratio(original_mb: f64, compressed_mb: f64) -> Option<f64> {
    let usable = |mb: f64| mb.is_finite() && mb != 0.0;
    if usable(original_mb) && usable(compressed_mb) {
        Some((original_mb - compressed_mb) / original_mb * 100.0)
    } else {
        None
    }
}

/// One decimal, e.g. `"42.5"`.
pub fn format_ratio(ratio: f64) -> String {
    format!("{ratio:.1}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{assert_abs_diff_eq, F64_EPSILON};

    fn loaded_snapshot() -> MediaSnapshot {
        MediaSnapshot {
            current_time: 65.4,
            duration: 10.0,
            video_width: 1920,
            video_height: 1080,
            paused: false,
            metadata_loaded: true,
        }
    }

    #[test]
    fn format_time_matches_expected_strings() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(65.0), "1:05");
        assert_eq!(format_time(3600.0), "60:00");
        assert_eq!(format_time(59.99), "0:59");
    }

    #[test]
    fn format_time_guards_invalid_input() {
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(f64::INFINITY), "0:00");
        assert_eq!(format_time(-3.0), "0:00");
    }

    #[test]
    fn estimated_size_for_full_hd_ten_seconds() {
        let mb = estimated_size_mb(1920, 1080, 10.0);
        assert_abs_diff_eq!(mb, 62.208, epsilon = F64_EPSILON);
        assert_eq!(format_size_mb(mb), "62.21 MB");
    }

    #[test]
    fn compute_stats_formats_loaded_snapshot() {
        let stats = compute_stats(&loaded_snapshot(), "H.264/AVC");

        assert_eq!(stats.resolution.as_deref(), Some("1920x1080"));
        assert_eq!(stats.duration.as_deref(), Some("0:10"));
        assert_eq!(stats.current_time, "1:05");
        assert_eq!(stats.codec, "H.264/AVC");
        assert_eq!(stats.estimated_size().as_deref(), Some("62.21 MB"));
        assert_eq!(stats.playback, PlaybackLabel::Playing);
    }

    #[test]
    fn compute_stats_leaves_metadata_fields_empty_until_loaded() {
        let stats = compute_stats(&MediaSnapshot::default(), "H.264/AVC");

        assert_eq!(stats.resolution, None);
        assert_eq!(stats.duration, None);
        assert_eq!(stats.estimated_size_mb, None);
        assert_eq!(stats.current_time, "0:00");
        assert_eq!(stats.playback, PlaybackLabel::Paused);
    }

    #[test]
    fn compression_ratio_needs_both_sizes() {
        assert_eq!(compression_ratio(0.0, 10.0), None);
        assert_eq!(compression_ratio(10.0, 0.0), None);
        assert_eq!(compression_ratio(f64::NAN, 10.0), None);

        let ratio = compression_ratio(100.0, 25.0).unwrap();
        assert_eq!(format_ratio(ratio), "75.0");
    }

    #[test]
    fn compression_ratio_can_be_negative() {
        let ratio = compression_ratio(10.0, 20.0).unwrap();
        assert_eq!(format_ratio(ratio), "-100.0");
    }
}
