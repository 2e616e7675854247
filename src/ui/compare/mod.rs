// SPDX-License-Identifier: MPL-2.0
//! Side-by-side comparison of an original video and its compressed version.
//!
//! - [`controller`] - Paired transport over the two media elements
//! - [`stats`] - Display statistics derived from element snapshots
//! - [`overlay`] - Stats panels and the "Show Stats" button
//! - [`slider`] - Compare canvas with the draggable divider
//! - [`transport`] - Play/pause toggle and shared scrubber
//! - [`component`] - The widget gluing them together

pub mod component;
pub mod controller;
pub mod overlay;
pub mod slider;
pub mod stats;
pub mod transport;

pub use component::{Message, Settings, Sources, State, ViewEnv};
pub use controller::{Binding, ControllerOptions, PairController, Phase, TransportState};
pub use stats::{compute_stats, format_time, DisplayStats, PlaybackLabel};
