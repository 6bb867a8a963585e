// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playback of bound timelines.
//!
//! The controller is a pure simulation step: the host calls [`tick`] once per
//! frame (or [`seek`] while scrubbing) and passes in the [`PropertySink`] that
//! receives the sampled values. Every call evaluates all tracks at one fixed
//! time.
//!
//! [`tick`]: PlaybackController::tick
//! [`seek`]: PlaybackController::seek

use crate::binding::{BoundTimeline, PropertySink};
use crate::interpolate;
use crate::keyframe::PropertyId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Stopped
    #[default]
    Stopped,
    /// Playing forward
    Playing,
}

/// How time re-enters the timeline after passing its end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapMode {
    /// Restart at zero, dropping the overshoot
    #[default]
    Reset,
    /// Restart at the overshoot past the end.
    ///
    /// An overshoot longer than the timeline counts every pass it spans.
    CarryOver,
}

/// Loop and repeat settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlaybackConfig {
    /// Restart unconditionally at the end (ignored when `repeat_count > 0`)
    #[serde(rename = "loop")]
    pub looping: bool,
    /// Number of passes to play before stopping; zero defers to `looping`
    pub repeat_count: u32,
    /// Wrap behavior at loop boundaries
    pub wrap: WrapMode,
}

impl PlaybackConfig {
    /// Loop forever
    pub fn looping() -> Self {
        Self {
            looping: true,
            ..Self::default()
        }
    }

    /// Play `count` passes, then stop
    pub fn repeat(count: u32) -> Self {
        Self {
            repeat_count: count,
            ..Self::default()
        }
    }

    /// Whether playback continues after `loops_completed` passes
    pub fn should_continue(&self, loops_completed: u32) -> bool {
        if self.repeat_count > 0 {
            loops_completed < self.repeat_count
        } else {
            self.looping
        }
    }
}

/// Events raised while ticking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// Time wrapped back into the timeline
    Looped {
        /// Passes completed so far
        loop_count: u32,
    },
    /// Playback reached its end and stopped on its own
    Finished {
        /// Passes completed in total
        loops_completed: u32,
    },
}

/// Playback errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaybackError {
    /// `play` was called with no timeline loaded
    #[error("No timeline loaded")]
    NoTimelineLoaded,
}

/// Drives a bound timeline and pushes sampled values into a [`PropertySink`]
#[derive(Debug)]
pub struct PlaybackController<H> {
    timeline: Option<BoundTimeline<H>>,
    config: PlaybackConfig,
    state: PlaybackState,
    time: f32,
    loop_count: u32,
    /// Pre-animation values per target path, captured on first write
    snapshot: IndexMap<String, IndexMap<PropertyId, f32>>,
    pending_events: Vec<PlaybackEvent>,
}

impl<H> PlaybackController<H> {
    /// Create a controller with no timeline loaded
    pub fn new(config: PlaybackConfig) -> Self {
        Self {
            timeline: None,
            config,
            state: PlaybackState::Stopped,
            time: 0.0,
            loop_count: 0,
            snapshot: IndexMap::new(),
            pending_events: Vec::new(),
        }
    }

    /// Replace the loaded timeline.
    ///
    /// The current session is stopped first, restoring animated targets.
    pub fn load<S>(&mut self, timeline: BoundTimeline<H>, sink: &mut S) -> Option<BoundTimeline<H>>
    where
        S: PropertySink<Handle = H>,
    {
        self.stop(sink);
        tracing::info!(
            "Timeline loaded: {} tracks, duration {}s",
            timeline.document().track_count(),
            timeline.document().duration()
        );
        self.timeline.replace(timeline)
    }

    /// Stop the current session and remove the timeline
    pub fn unload<S>(&mut self, sink: &mut S) -> Option<BoundTimeline<H>>
    where
        S: PropertySink<Handle = H>,
    {
        self.stop(sink);
        self.timeline.take()
    }

    /// Start playing from the beginning
    pub fn play(&mut self) -> Result<(), PlaybackError> {
        if self.timeline.is_none() {
            tracing::error!("Cannot play: no timeline loaded");
            return Err(PlaybackError::NoTimelineLoaded);
        }

        self.time = 0.0;
        self.loop_count = 0;
        self.state = PlaybackState::Playing;
        tracing::info!("Playback started");
        Ok(())
    }

    /// Stop, rewind and restore every animated property to its pre-animation value
    pub fn stop<S>(&mut self, sink: &mut S)
    where
        S: PropertySink<Handle = H>,
    {
        self.state = PlaybackState::Stopped;
        self.time = 0.0;

        let snapshot = std::mem::take(&mut self.snapshot);
        let Some(timeline) = self.timeline.as_ref() else {
            return;
        };

        let mut restored = 0usize;
        for (path, values) in &snapshot {
            let Some(handle) = timeline.handle(path) else {
                continue;
            };
            for (property, value) in values {
                sink.apply(handle, property, *value);
                restored += 1;
            }
        }

        tracing::info!("Playback stopped, restored {restored} properties");
    }

    /// Advance playback by `delta_time` seconds and apply the timeline
    pub fn tick<S>(&mut self, delta_time: f32, sink: &mut S)
    where
        S: PropertySink<Handle = H>,
    {
        if self.state != PlaybackState::Playing {
            return;
        }
        let Some(duration) = self.timeline.as_ref().map(|t| t.document().duration()) else {
            return;
        };

        if delta_time.is_finite() && delta_time > 0.0 {
            self.time += delta_time;
        }

        // A carried-over overshoot can span several passes in one tick
        while self.time > duration {
            self.loop_count += 1;

            if !self.config.should_continue(self.loop_count) {
                self.time = duration;
                self.state = PlaybackState::Stopped;
                tracing::info!("Playback finished after {} pass(es)", self.loop_count);
                self.pending_events.push(PlaybackEvent::Finished {
                    loops_completed: self.loop_count,
                });
                break;
            }

            self.time = match self.config.wrap {
                WrapMode::Reset => 0.0,
                WrapMode::CarryOver => self.time - duration,
            };
            tracing::debug!("Timeline looped ({} passes)", self.loop_count);
            self.pending_events.push(PlaybackEvent::Looped {
                loop_count: self.loop_count,
            });
        }

        self.apply_timeline(sink);
    }

    /// Jump to `time` (clamped to the timeline) and apply it immediately.
    ///
    /// Loop state is left untouched.
    pub fn seek<S>(&mut self, time: f32, sink: &mut S)
    where
        S: PropertySink<Handle = H>,
    {
        let Some(duration) = self.timeline.as_ref().map(|t| t.document().duration()) else {
            return;
        };
        if !time.is_finite() {
            return;
        }

        self.time = time.clamp(0.0, duration);
        self.apply_timeline(sink);
    }

    /// Sample every bound track at the current time and write the values
    fn apply_timeline<S>(&mut self, sink: &mut S)
    where
        S: PropertySink<Handle = H>,
    {
        let Some(timeline) = self.timeline.as_ref() else {
            return;
        };
        let time = self.time;

        for track in timeline.document().tracks() {
            let Some(handle) = timeline.handle(track.target_path()) else {
                continue;
            };

            for property in track.properties() {
                let Some(value) = interpolate::sample(track, property.as_str(), time) else {
                    continue;
                };

                let captured = self
                    .snapshot
                    .get(track.target_path())
                    .is_some_and(|saved| saved.contains_key(property));
                if !captured {
                    if let Some(original) = sink.read(handle, property) {
                        self.snapshot
                            .entry(track.target_path().to_owned())
                            .or_default()
                            .insert(property.clone(), original);
                    }
                }

                sink.apply(handle, property, value);
            }
        }
    }

    /// Get pending events and clear them
    pub fn take_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Current playback time
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Current state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Is currently playing
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Passes completed since the last `play`
    pub fn loop_count(&self) -> u32 {
        self.loop_count
    }

    /// Loop and repeat settings
    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Change loop and repeat settings
    pub fn set_config(&mut self, config: PlaybackConfig) {
        self.config = config;
    }

    /// Whether a timeline is loaded
    pub fn is_loaded(&self) -> bool {
        self.timeline.is_some()
    }

    /// Get the loaded timeline
    pub fn timeline(&self) -> Option<&BoundTimeline<H>> {
        self.timeline.as_ref()
    }

    /// Get the loaded timeline for authoring edits
    pub fn timeline_mut(&mut self) -> Option<&mut BoundTimeline<H>> {
        self.timeline.as_mut()
    }

    /// Whether pre-animation values of a target have been captured
    pub fn has_snapshot(&self, target_path: &str) -> bool {
        self.snapshot.contains_key(target_path)
    }
}

impl<H> Default for PlaybackController<H> {
    fn default() -> Self {
        Self::new(PlaybackConfig::default())
    }
}
