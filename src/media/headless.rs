// SPDX-License-Identifier: MPL-2.0
//! In-memory media element.
//!
//! [`HeadlessElement`] keeps a transport state without decoding anything. Time
//! only moves when the host feeds [`HeadlessInput::Advance`], which makes it
//! the deterministic stand-in for a real decoder in tests and benchmarks.

use super::element::{ListenerId, ListenerRegistry, MediaElement, MediaEvent, MediaSnapshot};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Scripted inputs for a [`HeadlessElement`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeadlessInput {
    /// Metadata arrived.
    LoadMetadata {
        width: u32,
        height: u32,
        duration_secs: f64,
    },
    /// Wall clock moved by the given seconds.
    Advance(f64),
    /// The element stops responding to `play` (buffering stall).
    Stall,
    /// Unrecoverable failure. The element pauses and reports `failed()`.
    Fail,
}

/// Read-only view of an element's listener count that outlives moves of the
/// element itself.
#[derive(Debug, Clone, Default)]
pub struct ListenerProbe(Arc<AtomicUsize>);

impl ListenerProbe {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct HeadlessElement {
    snapshot: MediaSnapshot,
    autoplay: bool,
    stalled: bool,
    failed: bool,
    listeners: ListenerRegistry,
    probe: ListenerProbe,
}

impl HeadlessElement {
    pub fn new(autoplay: bool) -> Self {
        Self {
            snapshot: MediaSnapshot::default(),
            autoplay,
            stalled: false,
            failed: false,
            listeners: ListenerRegistry::new(),
            probe: ListenerProbe::default(),
        }
    }

    /// Creates an element whose metadata is already known.
    pub fn loaded(width: u32, height: u32, duration_secs: f64) -> Self {
        let mut element = Self::new(false);
        element.snapshot.video_width = width;
        element.snapshot.video_height = height;
        element.snapshot.duration = duration_secs;
        element.snapshot.metadata_loaded = true;
        element
    }

    pub fn listener_probe(&self) -> ListenerProbe {
        self.probe.clone()
    }

    fn sync_probe(&self) {
        self.probe.0.store(self.listeners.count(), Ordering::SeqCst);
    }
}

impl MediaElement for HeadlessElement {
    type Input = HeadlessInput;

    fn snapshot(&self) -> MediaSnapshot {
        self.snapshot
    }

    fn play(&mut self) {
        if !self.stalled && !self.failed {
            self.snapshot.paused = false;
        }
    }

    fn pause(&mut self) {
        self.snapshot.paused = true;
    }

    fn set_current_time(&mut self, secs: f64) {
        self.snapshot.current_time = secs;
        self.listeners.emit(MediaEvent::TimeAdvanced);
    }

    fn handle_input(&mut self, input: HeadlessInput) {
        match input {
            HeadlessInput::LoadMetadata {
                width,
                height,
                duration_secs,
            } => {
                self.snapshot.video_width = width;
                self.snapshot.video_height = height;
                self.snapshot.duration = duration_secs;
                self.snapshot.metadata_loaded = true;
                if self.autoplay {
                    self.play();
                }
                self.listeners.emit(MediaEvent::MetadataReady);
            }
            HeadlessInput::Advance(delta) => {
                if self.snapshot.paused {
                    return;
                }
                let mut position = self.snapshot.current_time + delta;
                if self.snapshot.metadata_loaded && position >= self.snapshot.duration {
                    position = self.snapshot.duration;
                    self.snapshot.paused = true;
                }
                self.snapshot.current_time = position;
                self.listeners.emit(MediaEvent::TimeAdvanced);
            }
            HeadlessInput::Stall => {
                self.stalled = true;
                self.snapshot.paused = true;
            }
            HeadlessInput::Fail => {
                self.failed = true;
                self.snapshot.paused = true;
            }
        }
    }

    fn add_listener(&mut self, event: MediaEvent) -> ListenerId {
        let id = self.listeners.add(event);
        self.sync_probe();
        id
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        let removed = self.listeners.remove(id);
        self.sync_probe();
        removed
    }

    fn listener_count(&self) -> usize {
        self.listeners.count()
    }

    fn take_events(&mut self) -> Vec<MediaEvent> {
        self.listeners.drain()
    }

    fn failed(&self) -> bool {
        self.failed
    }
}
