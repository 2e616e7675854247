// SPDX-License-Identifier: MPL-2.0
//! Default values for every configuration setting.
//!
//! # Categories
//!
//! - **Playback**: Autoplay and keyboard seeking
//! - **Stats**: Overlay visibility and codec label
//! - **Transport**: Shared scrubber range

// ==========================================================================
// Playback Defaults
// ==========================================================================

/// Both videos start playing as soon as their metadata is known.
pub const DEFAULT_AUTOPLAY: bool = true;

/// Default keyboard seek step in seconds (arrow keys).
pub const DEFAULT_KEYBOARD_SEEK_STEP_SECS: f64 = 5.0;

/// Minimum keyboard seek step.
pub const MIN_KEYBOARD_SEEK_STEP_SECS: f64 = 0.5;

/// Maximum keyboard seek step.
pub const MAX_KEYBOARD_SEEK_STEP_SECS: f64 = 60.0;

// ==========================================================================
// Stats Defaults
// ==========================================================================

/// The stats overlay is open on launch.
pub const DEFAULT_SHOW_STATS: bool = true;

/// Codec shown in the overlay for both sides.
pub const DEFAULT_CODEC_LABEL: &str = "H.264/AVC";

/// The compression line under the compressed panel is off by default.
pub const DEFAULT_SHOW_COMPRESSION_ESTIMATE: bool = false;

// ==========================================================================
// Transport Defaults
// ==========================================================================

/// Scrubber maximum before any metadata has loaded.
pub const DEFAULT_INITIAL_DURATION_SECS: f64 = 0.0;

/// The scrubber range tracks the original video's duration.
pub const DEFAULT_FOLLOW_MEDIA_DURATION: bool = true;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(MIN_KEYBOARD_SEEK_STEP_SECS > 0.0);
    assert!(MAX_KEYBOARD_SEEK_STEP_SECS > MIN_KEYBOARD_SEEK_STEP_SECS);
    assert!(DEFAULT_KEYBOARD_SEEK_STEP_SECS >= MIN_KEYBOARD_SEEK_STEP_SECS);
    assert!(DEFAULT_KEYBOARD_SEEK_STEP_SECS <= MAX_KEYBOARD_SEEK_STEP_SECS);

    assert!(DEFAULT_INITIAL_DURATION_SECS >= 0.0);
};
