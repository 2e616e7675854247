// SPDX-License-Identifier: MPL-2.0
//! Paired transport over the original and compressed media elements.
//!
//! [`PairController`] holds exactly two [`Binding`]s and only exposes paired
//! operations ([`seek_both`](PairController::seek_both),
//! [`toggle_both`](PairController::toggle_both)). Elements can be read but
//! never mutated independently from outside.
//!
//! # Listener lifetime
//!
//! A [`Binding`] registers its listeners when created and removes them in
//! [`Binding::release`]. `release` runs on unmount and again from `Drop`, so
//! a binding dropped any other way still leaves its element with zero
//! listeners.

use super::stats::{compression_ratio, compute_stats, DisplayStats};
use crate::media::{ListenerId, MediaElement, MediaEvent, Side};

/// Events every binding listens to.
const SUBSCRIBED_EVENTS: [MediaEvent; 2] = [MediaEvent::MetadataReady, MediaEvent::TimeAdvanced];

/// A media element together with the listeners registered on it.
#[derive(Debug)]
pub struct Binding<E: MediaElement> {
    element: E,
    listeners: Vec<ListenerId>,
}

impl<E: MediaElement> Binding<E> {
    /// Takes ownership of `element` and subscribes to its events.
    pub fn attach(mut element: E) -> Self {
        let listeners = SUBSCRIBED_EVENTS
            .iter()
            .map(|event| element.add_listener(*event))
            .collect();
        Self { element, listeners }
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    /// Number of listeners this binding still holds.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Removes every listener registered by this binding. Idempotent.
    pub fn release(&mut self) {
        for id in self.listeners.drain(..) {
            if !self.element.remove_listener(id) {
                log::debug!("Listener {id:?} was already gone");
            }
        }
    }
}

impl<E: MediaElement> Drop for Binding<E> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Lifecycle of one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Unmounted,
    /// Bound, waiting for metadata.
    Loading,
    Playing,
    Paused,
    /// The element reported an unrecoverable error.
    Failed,
}

/// Transport values shown by the transport bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransportState {
    /// Mirrors the original element's current time.
    pub slider_value: f64,
    /// Upper bound of the seek range.
    pub duration: f64,
    /// Optimistic flag flipped by [`PairController::toggle_both`].
    pub is_playing: bool,
}

/// Controller settings, usually taken from the configuration file.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerOptions {
    pub codec_label: String,
    /// Seek range before the original's metadata arrives.
    pub initial_duration_secs: f64,
    /// Adopt the original's duration as the seek range once known.
    pub follow_media_duration: bool,
    /// Initial value of [`TransportState::is_playing`].
    pub initially_playing: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            codec_label: crate::config::DEFAULT_CODEC_LABEL.to_string(),
            initial_duration_secs: crate::config::DEFAULT_INITIAL_DURATION_SECS,
            follow_media_duration: crate::config::DEFAULT_FOLLOW_MEDIA_DURATION,
            initially_playing: crate::config::DEFAULT_AUTOPLAY,
        }
    }
}

#[derive(Debug)]
pub struct PairController<E: MediaElement> {
    original: Option<Binding<E>>,
    compressed: Option<Binding<E>>,
    original_stats: Option<DisplayStats>,
    compressed_stats: Option<DisplayStats>,
    transport: TransportState,
    codec_label: String,
    follow_media_duration: bool,
}

impl<E: MediaElement> PairController<E> {
    pub fn new(options: ControllerOptions) -> Self {
        Self {
            original: None,
            compressed: None,
            original_stats: None,
            compressed_stats: None,
            transport: TransportState {
                slider_value: 0.0,
                duration: options.initial_duration_secs.max(0.0),
                is_playing: options.initially_playing,
            },
            codec_label: options.codec_label,
            follow_media_duration: options.follow_media_duration,
        }
    }

    /// Binds `element` to `side`, replacing (and releasing) any previous one.
    pub fn mount(&mut self, side: Side, element: E) {
        let binding = Binding::attach(element);
        log::debug!("Mounted {side} element");
        *self.slot_mut(side) = Some(binding);
        *self.stats_slot_mut(side) = None;
        self.pump(side);
    }

    /// Releases both bindings and drops their elements.
    pub fn unmount(&mut self) {
        for side in Side::ALL {
            if let Some(mut binding) = self.slot_mut(side).take() {
                binding.release();
                log::debug!("Unmounted {side} element");
            }
        }
    }

    pub fn is_mounted(&self, side: Side) -> bool {
        self.slot(side).is_some()
    }

    /// Read-only access to a bound element.
    pub fn element(&self, side: Side) -> Option<&E> {
        self.slot(side).map(Binding::element)
    }

    pub fn transport(&self) -> &TransportState {
        &self.transport
    }

    /// Latest statistics of `side`, `None` before its first event.
    pub fn stats(&self, side: Side) -> Option<&DisplayStats> {
        match side {
            Side::Original => self.original_stats.as_ref(),
            Side::Compressed => self.compressed_stats.as_ref(),
        }
    }

    pub fn phase(&self, side: Side) -> Phase {
        let Some(binding) = self.slot(side) else {
            return Phase::Unmounted;
        };
        let element = binding.element();
        if element.failed() {
            return Phase::Failed;
        }
        let snapshot = element.snapshot();
        if !snapshot.metadata_loaded {
            Phase::Loading
        } else if snapshot.paused {
            Phase::Paused
        } else {
            Phase::Playing
        }
    }

    /// Percentage saved by the compressed side, once both sizes are known.
    pub fn compression_estimate(&self) -> Option<f64> {
        let original = self.original_stats.as_ref()?.estimated_size_mb?;
        let compressed = self.compressed_stats.as_ref()?.estimated_size_mb?;
        compression_ratio(original, compressed)
    }

    /// Moves both elements to `new_time`.
    ///
    /// No clamping happens here, the transport range bounds the input.
    pub fn seek_both(&mut self, new_time: f64) {
        for side in Side::ALL {
            if let Some(binding) = self.slot_mut(side) {
                binding.element.set_current_time(new_time);
            }
        }
        self.transport.slider_value = new_time;
        self.pump_both();
    }

    /// Plays or pauses both elements, based on the original's paused flag.
    ///
    /// The compressed side is not consulted, so diverged sides stay diverged.
    pub fn toggle_both(&mut self) {
        let Some(original) = &self.original else {
            log::warn!("Playback toggle ignored: original video is not mounted");
            return;
        };

        if original.element.snapshot().paused {
            for side in Side::ALL {
                if let Some(binding) = self.slot_mut(side) {
                    binding.element.play();
                }
            }
            self.transport.is_playing = true;
        } else {
            for side in Side::ALL {
                if let Some(binding) = self.slot_mut(side) {
                    binding.element.pause();
                }
            }
            self.transport.is_playing = false;
        }
        self.pump_both();
    }

    /// Feeds an external input to one element and processes what it emits.
    pub fn on_input(&mut self, side: Side, input: E::Input) {
        let Some(binding) = self.slot_mut(side) else {
            log::debug!("Dropping input for unmounted {side} element");
            return;
        };
        binding.element.handle_input(input);
        self.pump(side);
    }

    fn pump_both(&mut self) {
        for side in Side::ALL {
            self.pump(side);
        }
    }

    fn pump(&mut self, side: Side) {
        let events = match self.slot_mut(side) {
            Some(binding) => binding.element.take_events(),
            None => return,
        };
        for event in events {
            self.on_event(side, event);
        }
    }

    fn on_event(&mut self, side: Side, event: MediaEvent) {
        match event {
            MediaEvent::MetadataReady => {
                self.refresh_stats(side);
                if self.follow_media_duration && side == Side::Original {
                    if let Some(binding) = &self.original {
                        self.transport.duration = binding.element.snapshot().duration;
                    }
                }
            }
            MediaEvent::TimeAdvanced => {
                if let Some(binding) = &self.original {
                    self.transport.slider_value = binding.element.snapshot().current_time;
                }
                for side in Side::ALL {
                    self.refresh_stats(side);
                }
            }
        }
    }

    fn refresh_stats(&mut self, side: Side) {
        let stats = self
            .slot(side)
            .map(|binding| compute_stats(&binding.element.snapshot(), &self.codec_label));
        if stats.is_some() {
            *self.stats_slot_mut(side) = stats;
        }
    }

    fn slot(&self, side: Side) -> Option<&Binding<E>> {
        match side {
            Side::Original => self.original.as_ref(),
            Side::Compressed => self.compressed.as_ref(),
        }
    }

    fn slot_mut(&mut self, side: Side) -> &mut Option<Binding<E>> {
        match side {
            Side::Original => &mut self.original,
            Side::Compressed => &mut self.compressed,
        }
    }

    fn stats_slot_mut(&mut self, side: Side) -> &mut Option<DisplayStats> {
        match side {
            Side::Original => &mut self.original_stats,
            Side::Compressed => &mut self.compressed_stats,
        }
    }
}

impl<E: MediaElement> Drop for PairController<E> {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{HeadlessElement, HeadlessInput};
    use crate::test_utils::{assert_abs_diff_eq, F64_EPSILON};

    fn loaded_pair() -> PairController<HeadlessElement> {
        let mut controller = PairController::new(ControllerOptions::default());
        controller.mount(Side::Original, HeadlessElement::new(true));
        controller.mount(Side::Compressed, HeadlessElement::new(true));
        for side in Side::ALL {
            controller.on_input(
                side,
                HeadlessInput::LoadMetadata {
                    width: 1920,
                    height: 1080,
                    duration_secs: 10.0,
                },
            );
        }
        controller
    }

    #[test]
    fn binding_attaches_two_listeners() {
        let binding = Binding::attach(HeadlessElement::new(false));
        assert_eq!(binding.listener_count(), 2);
        assert_eq!(binding.element().listener_count(), 2);
    }

    #[test]
    fn binding_release_is_idempotent() {
        let mut binding = Binding::attach(HeadlessElement::new(false));
        binding.release();
        binding.release();
        assert_eq!(binding.element().listener_count(), 0);
    }

    #[test]
    fn dropping_binding_releases_listeners() {
        let element = HeadlessElement::new(false);
        let probe = element.listener_probe();
        let binding = Binding::attach(element);
        assert_eq!(probe.count(), 2);

        drop(binding);
        assert_eq!(probe.count(), 0);
    }

    #[test]
    fn phases_follow_lifecycle() {
        let mut controller: PairController<HeadlessElement> =
            PairController::new(ControllerOptions::default());
        assert_eq!(controller.phase(Side::Original), Phase::Unmounted);

        controller.mount(Side::Original, HeadlessElement::new(true));
        assert_eq!(controller.phase(Side::Original), Phase::Loading);

        controller.on_input(
            Side::Original,
            HeadlessInput::LoadMetadata {
                width: 640,
                height: 360,
                duration_secs: 3.0,
            },
        );
        assert_eq!(controller.phase(Side::Original), Phase::Playing);

        controller.toggle_both();
        assert_eq!(controller.phase(Side::Original), Phase::Paused);

        controller.on_input(Side::Original, HeadlessInput::Fail);
        assert_eq!(controller.phase(Side::Original), Phase::Failed);

        controller.unmount();
        assert_eq!(controller.phase(Side::Original), Phase::Unmounted);
    }

    #[test]
    fn metadata_sets_duration_from_original_only() {
        let mut controller = PairController::new(ControllerOptions::default());
        controller.mount(Side::Compressed, HeadlessElement::new(false));
        controller.on_input(
            Side::Compressed,
            HeadlessInput::LoadMetadata {
                width: 640,
                height: 360,
                duration_secs: 7.0,
            },
        );
        assert_eq!(controller.transport().duration, 0.0);

        controller.mount(Side::Original, HeadlessElement::new(false));
        controller.on_input(
            Side::Original,
            HeadlessInput::LoadMetadata {
                width: 640,
                height: 360,
                duration_secs: 12.0,
            },
        );
        assert_eq!(controller.transport().duration, 12.0);
    }

    #[test]
    fn fixed_duration_when_not_following_media() {
        let mut controller = PairController::new(ControllerOptions {
            initial_duration_secs: 30.0,
            follow_media_duration: false,
            ..ControllerOptions::default()
        });
        controller.mount(Side::Original, HeadlessElement::new(false));
        controller.on_input(
            Side::Original,
            HeadlessInput::LoadMetadata {
                width: 640,
                height: 360,
                duration_secs: 12.0,
            },
        );
        assert_eq!(controller.transport().duration, 30.0);
    }

    #[test]
    fn time_advance_on_compressed_mirrors_original_time() {
        let mut controller = loaded_pair();
        controller.on_input(Side::Original, HeadlessInput::Advance(2.0));
        controller.on_input(Side::Compressed, HeadlessInput::Advance(3.0));

        assert_eq!(controller.transport().slider_value, 2.0);
        let compressed = controller.stats(Side::Compressed).unwrap();
        assert_eq!(compressed.current_time, "0:03");
    }

    #[test]
    fn stats_refresh_for_both_sides_on_time_advance() {
        let mut controller = loaded_pair();
        controller.on_input(Side::Original, HeadlessInput::Advance(1.0));

        assert_eq!(
            controller.stats(Side::Original).unwrap().current_time,
            "0:01"
        );
        assert_eq!(
            controller.stats(Side::Compressed).unwrap().current_time,
            "0:00"
        );
    }

    #[test]
    fn toggle_without_original_is_a_no_op() {
        let mut controller = PairController::new(ControllerOptions::default());
        controller.mount(Side::Compressed, HeadlessElement::loaded(640, 360, 5.0));

        controller.toggle_both();

        assert!(controller.transport().is_playing);
        assert!(controller.element(Side::Compressed).unwrap().snapshot().paused);
    }

    #[test]
    fn toggle_reads_only_the_original() {
        let mut controller = PairController::new(ControllerOptions::default());
        let mut compressed = HeadlessElement::loaded(640, 360, 5.0);
        compressed.play();
        controller.mount(Side::Original, HeadlessElement::loaded(640, 360, 5.0));
        controller.mount(Side::Compressed, compressed);

        // Original paused -> play both
        controller.toggle_both();
        assert!(!controller.element(Side::Original).unwrap().snapshot().paused);
        assert!(!controller.element(Side::Compressed).unwrap().snapshot().paused);
        assert!(controller.transport().is_playing);
    }

    #[test]
    fn compression_estimate_needs_both_sides() {
        let mut controller = PairController::new(ControllerOptions::default());
        controller.mount(Side::Original, HeadlessElement::new(false));
        controller.on_input(
            Side::Original,
            HeadlessInput::LoadMetadata {
                width: 1920,
                height: 1080,
                duration_secs: 10.0,
            },
        );
        assert_eq!(controller.compression_estimate(), None);

        controller.mount(Side::Compressed, HeadlessElement::new(false));
        controller.on_input(
            Side::Compressed,
            HeadlessInput::LoadMetadata {
                width: 960,
                height: 540,
                duration_secs: 10.0,
            },
        );
        let ratio = controller.compression_estimate().unwrap();
        assert_abs_diff_eq!(ratio, 75.0, epsilon = F64_EPSILON);
    }

    #[test]
    fn remount_replaces_and_releases_previous_element() {
        let mut controller = PairController::new(ControllerOptions::default());
        let first = HeadlessElement::new(false);
        let probe = first.listener_probe();
        controller.mount(Side::Original, first);
        assert_eq!(probe.count(), 2);

        controller.mount(Side::Original, HeadlessElement::new(false));
        assert_eq!(probe.count(), 0);
    }

    #[test]
    fn dropping_controller_releases_listeners() {
        let element = HeadlessElement::new(false);
        let probe = element.listener_probe();
        let mut controller = PairController::new(ControllerOptions::default());
        controller.mount(Side::Original, element);

        drop(controller);
        assert_eq!(probe.count(), 0);
    }
}
