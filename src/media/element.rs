// SPDX-License-Identifier: MPL-2.0
//! Media element port.
//!
//! A media element is a playable video handle together with its live transport
//! state. The compare widget only talks to elements through [`MediaElement`],
//! so the FFmpeg-backed [`VideoElement`](crate::video_player::VideoElement) and
//! the in-memory [`HeadlessElement`](super::HeadlessElement) are interchangeable.
//!
//! # Events
//!
//! Elements announce state changes through [`MediaEvent`]s. An event is only
//! queued when at least one listener is registered for it, so an element whose
//! listeners were all removed stays silent.

use std::fmt;

/// Which half of the comparison an element belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Original,
    Compressed,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Original, Side::Compressed];

    /// Returns the i18n key of the side's heading.
    pub fn i18n_key(self) -> &'static str {
        match self {
            Side::Original => "compare-original-heading",
            Side::Compressed => "compare-compressed-heading",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Original => write!(f, "original"),
            Side::Compressed => write!(f, "compressed"),
        }
    }
}

/// Events an element can notify listeners about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaEvent {
    /// Dimensions and duration are known.
    MetadataReady,
    /// The playback position moved (frame presented, or seek).
    TimeAdvanced,
}

/// Point-in-time view of an element's transport state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaSnapshot {
    /// Playback position in seconds.
    pub current_time: f64,
    /// Total duration in seconds, 0.0 until metadata is loaded.
    pub duration: f64,
    /// Frame width in pixels, 0 until metadata is loaded.
    pub video_width: u32,
    /// Frame height in pixels, 0 until metadata is loaded.
    pub video_height: u32,
    pub paused: bool,
    pub metadata_loaded: bool,
}

impl Default for MediaSnapshot {
    fn default() -> Self {
        Self {
            current_time: 0.0,
            duration: 0.0,
            video_width: 0,
            video_height: 0,
            paused: true,
            metadata_loaded: false,
        }
    }
}

/// Handle returned when registering a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Listener bookkeeping shared by element implementations.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    next_id: u64,
    listeners: Vec<(ListenerId, MediaEvent)>,
    pending: Vec<MediaEvent>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener for `event`.
    pub fn add(&mut self, event: MediaEvent) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.push((id, event));
        id
    }

    /// Removes a listener. Returns false if the id was unknown.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        if self.listeners.is_empty() {
            self.pending.clear();
        }
        self.listeners.len() != before
    }

    pub fn count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_subscribed(&self, event: MediaEvent) -> bool {
        self.listeners.iter().any(|(_, kind)| *kind == event)
    }

    /// Queues `event` if anyone listens for it.
    pub fn emit(&mut self, event: MediaEvent) {
        if self.is_subscribed(event) {
            self.pending.push(event);
        }
    }

    /// Takes the queued events in emission order.
    pub fn drain(&mut self) -> Vec<MediaEvent> {
        std::mem::take(&mut self.pending)
    }
}

/// Playable media handle driven by the compare widget.
///
/// `Input` is whatever the host feeds the element from outside the widget
/// (decoder messages for the FFmpeg element, scripted steps for the headless
/// one).
pub trait MediaElement {
    type Input;

    fn snapshot(&self) -> MediaSnapshot;

    fn play(&mut self);

    fn pause(&mut self);

    /// Moves the playback position. Emits [`MediaEvent::TimeAdvanced`].
    fn set_current_time(&mut self, secs: f64);

    /// Applies an external input, possibly emitting events.
    fn handle_input(&mut self, input: Self::Input);

    fn add_listener(&mut self, event: MediaEvent) -> ListenerId;

    fn remove_listener(&mut self, id: ListenerId) -> bool;

    fn listener_count(&self) -> usize;

    /// Takes the events emitted since the last call.
    fn take_events(&mut self) -> Vec<MediaEvent>;

    /// True once the element hit an unrecoverable playback error.
    fn failed(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_without_listener_is_dropped() {
        let mut registry = ListenerRegistry::new();
        registry.emit(MediaEvent::TimeAdvanced);
        assert!(registry.drain().is_empty());
    }

    #[test]
    fn emit_only_queues_subscribed_kinds() {
        let mut registry = ListenerRegistry::new();
        registry.add(MediaEvent::MetadataReady);

        registry.emit(MediaEvent::TimeAdvanced);
        registry.emit(MediaEvent::MetadataReady);

        assert_eq!(registry.drain(), vec![MediaEvent::MetadataReady]);
        assert!(registry.drain().is_empty());
    }

    #[test]
    fn remove_unknown_listener_returns_false() {
        let mut registry = ListenerRegistry::new();
        let id = registry.add(MediaEvent::TimeAdvanced);
        assert!(registry.remove(id));
        assert!(!registry.remove(id));
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn removing_last_listener_discards_pending_events() {
        let mut registry = ListenerRegistry::new();
        let id = registry.add(MediaEvent::TimeAdvanced);
        registry.emit(MediaEvent::TimeAdvanced);
        registry.remove(id);
        assert!(registry.drain().is_empty());
    }

    #[test]
    fn listener_ids_are_unique() {
        let mut registry = ListenerRegistry::new();
        let a = registry.add(MediaEvent::TimeAdvanced);
        let b = registry.add(MediaEvent::TimeAdvanced);
        assert_ne!(a, b);
        assert_eq!(registry.count(), 2);
    }

    #[test]
    fn default_snapshot_is_paused_and_unloaded() {
        let snapshot = MediaSnapshot::default();
        assert!(snapshot.paused);
        assert!(!snapshot.metadata_loaded);
        assert_eq!(snapshot.video_width, 0);
    }
}
